use atlas_shared::locations::{Contracts, NavTarget};
use atlas_shared::models::{index_tiles, SelectionPair, Tiles};
use dioxus::prelude::*;

use crate::api;
use crate::components::atlas::Atlas;
use crate::Route;

pub(crate) fn go_to(target: NavTarget) {
    navigator().push(Route::NftView {
        address: target.contract_address,
        id: target.token_id,
    });
}

/// Marketplace landing page: the whole atlas, parcels on sale highlighted.
#[component]
pub fn AtlasPage() -> Element {
    let tiles_resource = use_resource(api::fetch_tiles);
    let contracts_resource = use_resource(api::fetch_contracts);

    let tiles = use_memo(move || match &*tiles_resource.read() {
        Some(Ok(tiles)) => index_tiles(tiles.iter().cloned()),
        _ => Tiles::new(),
    });
    let selection = use_signal(|| None::<Vec<SelectionPair>>);

    let contracts = match &*contracts_resource.read() {
        Some(Ok(c)) => c.clone(),
        _ => Contracts::default(),
    };
    let load_error = match &*tiles_resource.read() {
        Some(Err(e)) => Some(e.clone()),
        _ => None,
    };
    let on_sale = tiles.read().values().filter(|t| t.is_on_sale()).count();

    rsx! {
        div { class: "app",
            div { class: "header",
                h1 { "Atlas" }
                span { class: "header-info", "{on_sale} parcels on sale" }
            }
            div { class: "map-area",
                if let Some(e) = load_error {
                    div { class: "error", "Couldn't load the atlas: {e}" }
                }
                Atlas {
                    tiles,
                    selection,
                    contracts,
                    on_navigate: go_to,
                }
            }
        }
    }
}
