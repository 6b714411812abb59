use atlas_shared::locations::{Contracts, NavTarget};
use atlas_shared::models::{index_tiles, Tiles};
use dioxus::logger::tracing;
use dioxus::prelude::*;

use crate::api::{self, TileData};
use crate::components::atlas::Atlas;
use crate::components::tile_details::TileDetails;
use crate::pages::atlas_page::go_to;

#[derive(Debug, Clone, PartialEq)]
struct NftSelection {
    is_estate: bool,
    tiles: Vec<TileData>,
}

async fn load_selection(target: &NavTarget, contracts: &Contracts) -> Result<NftSelection, String> {
    if target.is_estate(contracts) {
        let tiles = api::fetch_estate_tiles(&target.token_id).await?;
        return Ok(NftSelection {
            is_estate: true,
            tiles,
        });
    }
    let tiles = api::fetch_parcel(&target.token_id).await?.into_iter().collect();
    Ok(NftSelection {
        is_estate: false,
        tiles,
    })
}

/// Registry addresses from the `contracts` query. A failed query falls back to
/// mainnet, like the atlas itself.
fn contracts_or_mainnet(fetched: &Result<Contracts, String>) -> Contracts {
    match fetched {
        Ok(contracts) => contracts.clone(),
        Err(e) => {
            tracing::warn!("Couldn't fetch contracts, using mainnet addresses: {}", e);
            Contracts::default()
        }
    }
}

/// Detail page for a single parcel or estate. The atlas highlights the NFT and
/// clicks on it don't navigate.
#[component]
pub fn NftPage(address: String, id: String) -> Element {
    let tiles_resource = use_resource(api::fetch_tiles);
    let contracts_resource = use_resource(api::fetch_contracts);

    let target = NavTarget::nft(&address, &id);
    // Waits for the contracts query; reruns once it settles
    let selection_resource = use_resource(use_reactive((&target,), move |(target,)| {
        let fetched = (*contracts_resource.read()).clone();
        async move {
            let contracts = contracts_or_mainnet(&fetched?);
            Some(load_selection(&target, &contracts).await)
        }
    }));

    let tiles = use_memo(move || match &*tiles_resource.read() {
        Some(Ok(tiles)) => index_tiles(tiles.iter().cloned()),
        _ => Tiles::new(),
    });
    let loaded = match &*selection_resource.read() {
        Some(Some(Ok(sel))) => Some(sel.clone()),
        _ => None,
    };
    let load_error = match &*selection_resource.read() {
        Some(Some(Err(e))) => Some(e.clone()),
        _ => None,
    };

    let is_estate = loaded.as_ref().is_some_and(|sel| sel.is_estate);
    let selection = use_memo(move || match &*selection_resource.read() {
        Some(Some(Ok(sel))) => Some(
            sel.tiles
                .iter()
                .map(TileData::selection_pair)
                .collect::<Vec<_>>(),
        ),
        _ => None,
    });

    let contracts = match &*contracts_resource.read() {
        Some(Ok(c)) => c.clone(),
        _ => Contracts::default(),
    };

    rsx! {
        div { class: "app",
            div { class: "header",
                h1 { "Atlas" }
                Link { to: crate::Route::AtlasPage {}, class: "header-info", "Back to the atlas" }
            }
            div { class: "map-area",
                Atlas {
                    tiles,
                    selection,
                    contracts,
                    is_estate,
                    with_navigation: false,
                    on_navigate: go_to,
                }
            }
            div { class: "sidebar",
                if let Some(e) = load_error {
                    div { class: "panel error", "Couldn't load token {id}: {e}" }
                }
                if let Some(sel) = loaded {
                    TileDetails {
                        target: target.clone(),
                        is_estate: sel.is_estate,
                        tiles: sel.tiles,
                    }
                }
            }
        }
    }
}
