use atlas_shared::locations::NavTarget;
use dioxus::prelude::*;

use crate::api::TileData;

/// How long the "Copied" confirmation stays visible.
const COPIED_FEEDBACK_MS: u32 = 1500;

fn share_url(target: &NavTarget) -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default();
    format!("{origin}{}", target.path())
}

fn short_address(address: &str) -> String {
    if address.len() <= 12 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}…{}", &address[..6], &address[address.len() - 4..])
}

/// Side panel for the NFT currently shown on the atlas.
#[component]
pub fn TileDetails(target: NavTarget, is_estate: bool, tiles: Vec<TileData>) -> Element {
    let mut copied = use_signal(|| false);
    let url = share_url(&target);

    let heading = match (is_estate, tiles.first()) {
        (true, _) => format!("Estate {}", target.token_id),
        (false, Some(t)) => format!("Parcel {},{}", t.x, t.y),
        (false, None) => "Unknown parcel".to_string(),
    };
    let first = tiles.first().cloned();

    rsx! {
        div { class: "panel",
            h3 { "{heading}" }
            if let Some(tile) = first {
                div { class: "result-grid",
                    if let Some(name) = tile.name {
                        span { class: "result-label", "Name" }
                        span { class: "result-value", "{name}" }
                    }
                    if let Some(owner) = tile.owner {
                        span { class: "result-label", "Owner" }
                        span { class: "result-value", title: "{owner}", "{short_address(&owner)}" }
                    }
                    if let Some(price) = tile.price {
                        span { class: "result-label", "Price" }
                        span { class: "result-value", "{price} MANA" }
                    }
                    if is_estate {
                        span { class: "result-label", "Parcels" }
                        span { class: "result-value", "{tiles.len()}" }
                    }
                }
            }
            div { class: "plan-url",
                input {
                    r#type: "text",
                    readonly: true,
                    value: "{url}",
                }
                button {
                    class: "secondary",
                    onclick: {
                        let url = url.clone();
                        move |_| {
                            let url = url.clone();
                            wasm_bindgen_futures::spawn_local(async move {
                                if let Some(window) = web_sys::window() {
                                    let clipboard = window.navigator().clipboard();
                                    if wasm_bindgen_futures::JsFuture::from(
                                        clipboard.write_text(&url)
                                    ).await.is_ok() {
                                        copied.set(true);
                                        gloo_timers::future::TimeoutFuture::new(COPIED_FEEDBACK_MS).await;
                                        copied.set(false);
                                    }
                                }
                            });
                        }
                    },
                    if *copied.read() { "Copied" } else { "Copy link" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0xf87e31492faf9a91b02ee0deaad50d51d56d5d4d"),
            "0xf87e…5d4d"
        );
        assert_eq!(short_address("0xabc"), "0xabc");
    }
}
