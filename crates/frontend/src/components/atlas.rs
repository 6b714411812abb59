use atlas_shared::click::{ClickAction, ClickHandler, Resolution};
use atlas_shared::grid;
use atlas_shared::layers::{self, Layer, LayerStyle};
use atlas_shared::locations::{Contracts, NavTarget};
use atlas_shared::models::{SelectionPair, Tile, TileKind, Tiles};
use atlas_shared::selection::{Selection, SelectionView};
use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::logger::tracing;
use dioxus::prelude::*;

use crate::api::GraphqlTokenIds;
use crate::coords;

const ATLAS_CONTAINER_ID: &str = "atlas-container";

/// Drag threshold in pixels. Movement below this counts as a click.
const DRAG_THRESHOLD: f64 = 3.0;

const ZOOM_MIN: f64 = 1.0;
const ZOOM_MAX: f64 = 40.0;
const ZOOM_STEP: f64 = 1.1;

/// Gap left between unconnected tiles, in atlas pixels.
const TILE_GAP_PX: f64 = 1.0;

const BACKGROUND_COLOR: &str = "#18141a";

/// Caller-supplied layer, drawn above the for-sale layer and below the
/// selection layers.
pub type ExtraLayer = Callback<(i32, i32), Option<LayerStyle>>;

fn kind_color(kind: TileKind) -> &'static str {
    match kind {
        TileKind::Owned => "#3d3a46",
        TileKind::Unowned => "#09080a",
        TileKind::Plaza => "#70ac76",
        TileKind::Road => "#716c7a",
        TileKind::District => "#5054d4",
    }
}

// ---------------------------------------------------------------------------
// DOM helpers
// ---------------------------------------------------------------------------

fn container_rect() -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(ATLAS_CONTAINER_ID)?;
    Some(element.get_bounding_client_rect())
}

// ---------------------------------------------------------------------------
// Zoom / pan math
// ---------------------------------------------------------------------------

/// Pan offsets that keep `cursor` over the same content point when zooming
/// from `old_zoom` to `new_zoom`.
fn zoom_pan_at_cursor(
    cursor_x: f64,
    cursor_y: f64,
    old_zoom: f64,
    new_zoom: f64,
    old_pan_x: f64,
    old_pan_y: f64,
) -> (f64, f64) {
    let content_x = (cursor_x - old_pan_x) / old_zoom;
    let content_y = (cursor_y - old_pan_y) / old_zoom;
    (
        cursor_x - content_x * new_zoom,
        cursor_y - content_y * new_zoom,
    )
}

/// Clamp pan values so the atlas can't be dragged off-screen.
///
/// The atlas is square and rendered at `width: 100%`, so its rendered height
/// equals the container width and may exceed the container height.
fn clamp_pan(pan_x: f64, pan_y: f64, zoom: f64, container_w: f64, container_h: f64) -> (f64, f64) {
    let content_w = container_w * zoom;
    let content_h = container_w * zoom;
    let min_pan_x = -(content_w - container_w).max(0.0);
    let min_pan_y = -(content_h - container_h).max(0.0);
    (pan_x.clamp(min_pan_x, 0.0), pan_y.clamp(min_pan_y, 0.0))
}

fn clamp_pan_to_container(pan_x: f64, pan_y: f64, zoom: f64) -> (f64, f64) {
    match container_rect() {
        Some(rect) => clamp_pan(pan_x, pan_y, zoom, rect.width(), rect.height()),
        None => (pan_x, pan_y),
    }
}

fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

// ---------------------------------------------------------------------------
// SVG builder
// ---------------------------------------------------------------------------

/// Emit one tile square. Without a scale, the tile leaves a gap on its left
/// and top edges unless the neighbour there is connected. With a scale, the
/// square is resized around the tile centre and the hints are ignored.
#[allow(clippy::too_many_arguments)]
fn push_tile(
    svg: &mut String,
    x: i32,
    y: i32,
    color: &str,
    scale: Option<f64>,
    left: bool,
    top: bool,
    top_left: bool,
) {
    let (px, py) = grid::tile_origin_px(x, y);
    let size = grid::TILE_SIZE_PX;

    if let Some(scale) = scale {
        let scaled = size * scale;
        let offset = (size - scaled) / 2.0;
        let (sx, sy) = (px + offset, py + offset);
        svg.push_str(&format!(
            r#"<rect x="{sx}" y="{sy}" width="{scaled}" height="{scaled}" fill="{color}"/>"#
        ));
        return;
    }

    let g = TILE_GAP_PX;
    let inner = size - g;
    let (ix, iy) = (px + g, py + g);
    svg.push_str(&format!(
        r#"<rect x="{ix}" y="{iy}" width="{inner}" height="{inner}" fill="{color}"/>"#
    ));
    if left {
        svg.push_str(&format!(
            r#"<rect x="{px}" y="{iy}" width="{g}" height="{inner}" fill="{color}"/>"#
        ));
    }
    if top {
        svg.push_str(&format!(
            r#"<rect x="{ix}" y="{py}" width="{inner}" height="{g}" fill="{color}"/>"#
        ));
    }
    if top_left {
        svg.push_str(&format!(
            r#"<rect x="{px}" y="{py}" width="{g}" height="{g}" fill="{color}"/>"#
        ));
    }
}

fn push_style(svg: &mut String, x: i32, y: i32, style: &LayerStyle) {
    push_tile(
        svg,
        x,
        y,
        &style.color,
        style.scale,
        style.left.unwrap_or(false),
        style.top.unwrap_or(false),
        style.top_left.unwrap_or(false),
    );
}

/// Build the atlas SVG body: base tiles, then every layer bottom-up.
///
/// Scaled styles overflow into neighbouring cells, so each layer is painted
/// in its own pass over the grid rather than tile by tile.
fn build_svg_content(tiles: &Tiles, layers: &[Layer<'_>]) -> String {
    let mut svg = String::with_capacity(64 * 1024);

    let mut base: Vec<&Tile> = tiles.values().collect();
    base.sort_by_key(|t| (-t.y, t.x));
    for tile in base {
        push_tile(
            &mut svg,
            tile.x,
            tile.y,
            kind_color(tile.kind),
            None,
            tile.left,
            tile.top,
            tile.top_left,
        );
    }

    for layer in layers {
        for y in (grid::MIN_COORD..=grid::MAX_COORD).rev() {
            for x in grid::MIN_COORD..=grid::MAX_COORD {
                if let Some(style) = layer(x, y) {
                    push_style(&mut svg, x, y, &style);
                }
            }
        }
    }

    svg
}

fn tile_caption(tile: Option<&Tile>, x: i32, y: i32) -> String {
    let Some(tile) = tile else {
        return format!("{x},{y}");
    };
    let mut caption = match &tile.name {
        Some(name) => format!("{x},{y} · {name}"),
        None => format!("{x},{y} · {}", tile.kind),
    };
    if let Some(price) = tile.price {
        caption.push_str(&format!(" · {price} MANA"));
    }
    caption
}

/// Readout for the tile under the cursor, if any.
fn hover_caption(tiles: &Tiles, hovered: Option<(i32, i32)>) -> Option<String> {
    let (x, y) = hovered?;
    Some(tile_caption(tiles.get(&grid::coord_key(x, y)), x, y))
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// Interactive atlas with sale and selection highlighting.
///
/// `selection` lists the coordinates to highlight. With `is_estate`, tiles of
/// the same estate as the first selected coordinate are highlighted too.
/// Clicking a tile resolves it to its NFT and calls `on_navigate`, unless
/// `with_navigation` is off.
#[component]
pub fn Atlas(
    tiles: ReadSignal<Tiles>,
    selection: ReadSignal<Option<Vec<SelectionPair>>>,
    contracts: Contracts,
    #[props(default)] is_estate: bool,
    #[props(default = true)] with_navigation: bool,
    on_navigate: EventHandler<NavTarget>,
    #[props(default)] extra_layers: Vec<ExtraLayer>,
) -> Element {
    // Zoom / pan state
    let mut zoom = use_signal(|| 1.0_f64);
    let mut pan_x = use_signal(|| 0.0_f64);
    let mut pan_y = use_signal(|| 0.0_f64);

    // Drag state
    let mut is_dragging = use_signal(|| false);
    let mut did_drag = use_signal(|| false);
    let mut drag_start_x = use_signal(|| 0.0_f64);
    let mut drag_start_y = use_signal(|| 0.0_f64);
    let mut drag_start_pan_x = use_signal(|| 0.0_f64);
    let mut drag_start_pan_y = use_signal(|| 0.0_f64);

    let mut hovered = use_signal(|| None::<(i32, i32)>);

    // One generation counter for the lifetime of the component
    let base_handler = use_hook(|| ClickHandler::new(GraphqlTokenIds, Contracts::default()));
    use_drop({
        let base_handler = base_handler.clone();
        move || base_handler.cancel_pending()
    });
    let handler = base_handler.reconfigured(contracts, with_navigation);

    let selection_set = use_memo(move || Selection::from_pairs(selection.read().as_deref()));

    // Only recomputes when tiles, selection or layer inputs change; zoom and
    // pan are applied as a CSS transform.
    let svg_html = use_memo(use_reactive(
        (&is_estate, &extra_layers),
        move |(is_estate, extra_layers)| {
            let tiles_guard = tiles.read();
            let selection_guard = selection_set.read();
            let tiles: &Tiles = &tiles_guard;
            let selection: &Selection = &selection_guard;

            let view = SelectionView::new(selection, Some(tiles), is_estate);
            let extra = extra_layers.iter().map(|cb| {
                let cb = *cb;
                Box::new(move |x: i32, y: i32| cb.call((x, y))) as Layer<'_>
            });
            let stack = layers::atlas_layers(tiles, view, extra);

            format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" shape-rendering="crispEdges" style="position:absolute;top:0;left:0;width:100%;height:100%;pointer-events:none;">{}</svg>"#,
                grid::MAP_WIDTH_PX,
                grid::MAP_HEIGHT_PX,
                build_svg_content(tiles, &stack)
            )
        },
    ));

    let cur_pan_x = *pan_x.read();
    let cur_pan_y = *pan_y.read();
    let cur_zoom = *zoom.read();
    let dragging = *is_dragging.read();

    let transform_style = format!(
        "transform: translate({cur_pan_x}px, {cur_pan_y}px) scale({cur_zoom}); transform-origin: 0 0;"
    );
    let container_class = if dragging {
        "atlas-container dragging"
    } else {
        "atlas-container"
    };

    let caption = hover_caption(&tiles.read(), *hovered.read());

    rsx! {
        div {
            id: ATLAS_CONTAINER_ID,
            class: "{container_class}",
            style: "background: {BACKGROUND_COLOR};",

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();

                let delta_y = wheel_delta_y(evt.data().delta());
                let factor = if delta_y < 0.0 { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
                let old_z = *zoom.read();
                let new_z = (old_z * factor).clamp(ZOOM_MIN, ZOOM_MAX);
                if (new_z - old_z).abs() < 1e-9 {
                    return;
                }

                let Some(rect) = container_rect() else { return };
                let client = evt.data().client_coordinates();
                let cx = client.x - rect.left();
                let cy = client.y - rect.top();

                let (new_px, new_py) =
                    zoom_pan_at_cursor(cx, cy, old_z, new_z, *pan_x.read(), *pan_y.read());
                let (px, py) = clamp_pan(new_px, new_py, new_z, rect.width(), rect.height());

                zoom.set(new_z);
                pan_x.set(px);
                pan_y.set(py);
            },

            onmousedown: move |evt: Event<MouseData>| {
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                let client = evt.client_coordinates();
                is_dragging.set(true);
                did_drag.set(false);
                drag_start_x.set(client.x);
                drag_start_y.set(client.y);
                drag_start_pan_x.set(*pan_x.read());
                drag_start_pan_y.set(*pan_y.read());
            },

            onmousemove: move |evt: Event<MouseData>| {
                let client = evt.client_coordinates();
                if !*is_dragging.read() {
                    let tile = coords::click_to_tile(
                        client.x, client.y, ATLAS_CONTAINER_ID,
                        *zoom.read(), *pan_x.read(), *pan_y.read(),
                    );
                    if *hovered.peek() != tile {
                        hovered.set(tile);
                    }
                    return;
                }
                let dx = client.x - *drag_start_x.read();
                let dy = client.y - *drag_start_y.read();

                if !*did_drag.read() && (dx.abs() > DRAG_THRESHOLD || dy.abs() > DRAG_THRESHOLD) {
                    did_drag.set(true);
                }
                if *did_drag.read() {
                    let new_px = *drag_start_pan_x.read() + dx;
                    let new_py = *drag_start_pan_y.read() + dy;
                    let (px, py) = clamp_pan_to_container(new_px, new_py, *zoom.read());
                    pan_x.set(px);
                    pan_y.set(py);
                }
            },

            onmouseleave: move |_| {
                is_dragging.set(false);
                hovered.set(None);
            },

            onmouseup: move |evt: Event<MouseData>| {
                let was_dragging = *is_dragging.read();
                let was_drag = *did_drag.read();
                is_dragging.set(false);

                // A mouseup without drag movement = a click
                if !was_dragging || was_drag {
                    return;
                }
                let client = evt.client_coordinates();
                let Some((x, y)) = coords::click_to_tile(
                    client.x, client.y, ATLAS_CONTAINER_ID,
                    *zoom.read(), *pan_x.read(), *pan_y.read(),
                ) else {
                    return;
                };

                let action = handler.begin(&tiles.read(), x, y);
                match action {
                    ClickAction::Ignore => {}
                    ClickAction::Navigate(target) => on_navigate.call(target),
                    ClickAction::Lookup(pending) => {
                        tracing::debug!(x, y, "Resolving parcel token id");
                        let handler = handler.clone();
                        spawn(async move {
                            if let Resolution::Navigate(target) = handler.resolve(pending).await {
                                on_navigate.call(target);
                            }
                        });
                    }
                }
            },

            ondoubleclick: move |_| {
                zoom.set(1.0);
                pan_x.set(0.0);
                pan_y.set(0.0);
            },

            // CSS transform applies zoom/pan to the whole atlas
            div {
                class: "atlas-inner",
                style: "{transform_style}",
                dangerous_inner_html: "{svg_html}",
            }

            if let Some(caption) = caption {
                div { class: "coord-readout",
                    span { class: "coord-tag", "{caption}" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_shared::layers::{FOR_SALE_COLOR, SELECTED_FILL_COLOR, SELECTED_STROKE_COLOR};
    use atlas_shared::models::index_tiles;

    fn tile(x: i32, y: i32) -> Tile {
        Tile {
            x,
            y,
            kind: TileKind::Owned,
            price: None,
            estate_id: None,
            owner: None,
            name: None,
            left: false,
            top: false,
            top_left: false,
        }
    }

    #[test]
    fn test_push_tile_without_hints_is_single_rect() {
        let mut svg = String::new();
        push_tile(&mut svg, 0, 0, "#fff", None, false, false, false);
        assert_eq!(svg.matches("<rect").count(), 1);
    }

    #[test]
    fn test_push_tile_fills_connected_edges() {
        let mut svg = String::new();
        push_tile(&mut svg, 0, 0, "#fff", None, true, true, true);
        assert_eq!(svg.matches("<rect").count(), 4);
    }

    #[test]
    fn test_push_tile_scaled_is_centered() {
        let mut svg = String::new();
        push_tile(&mut svg, grid::MIN_COORD, grid::MAX_COORD, "#fff", Some(1.5), true, true, true);
        // 16 * 1.5 = 24, offset (16 - 24) / 2 = -4
        assert!(svg.contains(r#"x="-4""#));
        assert!(svg.contains(r#"width="24""#));
        assert_eq!(svg.matches("<rect").count(), 1);
    }

    #[test]
    fn test_build_svg_paints_layers_in_order() {
        let mut on_sale = tile(0, 0);
        on_sale.price = Some(10.0);
        let tiles = index_tiles(vec![on_sale]);
        let pairs = vec![SelectionPair::new(0, 0)];
        let selection = Selection::from_pairs(Some(&pairs));
        let view = SelectionView::new(&selection, Some(&tiles), false);
        let stack = layers::atlas_layers(&tiles, view, Vec::new());

        let svg = build_svg_content(&tiles, &stack);
        let sale = svg.find(FOR_SALE_COLOR).unwrap();
        let stroke = svg.find(SELECTED_STROKE_COLOR).unwrap();
        let fill = svg.find(SELECTED_FILL_COLOR).unwrap();
        assert!(sale < stroke && stroke < fill);
    }

    #[test]
    fn test_build_svg_empty_atlas_is_empty() {
        let tiles = Tiles::new();
        let selection = Selection::default();
        let view = SelectionView::new(&selection, Some(&tiles), false);
        let stack = layers::atlas_layers(&tiles, view, Vec::new());
        assert!(build_svg_content(&tiles, &stack).is_empty());
    }

    #[test]
    fn test_tile_caption() {
        let mut t = tile(3, -4);
        t.price = Some(1500.0);
        assert_eq!(tile_caption(Some(&t), 3, -4), "3,-4 · owned · 1500 MANA");
        assert_eq!(tile_caption(None, 9, 9), "9,9");
    }

    #[test]
    fn test_hover_caption_looks_up_hovered_tile() {
        let mut named = tile(2, -1);
        named.name = Some("Harbour".to_string());
        let tiles = index_tiles(vec![named]);

        assert_eq!(hover_caption(&tiles, None), None);
        assert_eq!(
            hover_caption(&tiles, Some((2, -1))).as_deref(),
            Some("2,-1 · Harbour")
        );
        assert_eq!(hover_caption(&tiles, Some((5, 5))).as_deref(), Some("5,5"));
    }

    #[test]
    fn test_clamp_pan_prevents_positive_pan() {
        let (px, py) = clamp_pan(50.0, 50.0, 2.0, 800.0, 600.0);
        assert_eq!((px, py), (0.0, 0.0));
    }

    #[test]
    fn test_clamp_pan_limits_to_content() {
        let (px, py) = clamp_pan(-5000.0, -5000.0, 2.0, 800.0, 600.0);
        assert!((px - -800.0).abs() < 1e-9);
        assert!((py - -1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_pan_at_cursor_keeps_point_fixed() {
        let (px, py) = zoom_pan_at_cursor(100.0, 100.0, 1.0, 2.0, 0.0, 0.0);
        assert!((px - -100.0).abs() < 1e-9);
        assert!((py - -100.0).abs() < 1e-9);
    }
}
