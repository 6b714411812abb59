mod api;
mod components;
mod coords;
mod pages;

use dioxus::prelude::*;

use pages::atlas_page::AtlasPage;
use pages::nft_page::NftPage;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    AtlasPage {},
    #[route("/contracts/:address/tokens/:id")]
    NftView { address: String, id: String },
}

#[component]
fn NftView(address: String, id: String) -> Element {
    rsx! {
        NftPage { address, id }
    }
}

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    launch(App);
}
