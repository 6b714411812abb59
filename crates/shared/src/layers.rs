//! Per-tile overlay layers.
//!
//! A layer maps a coordinate to an optional style. The renderer evaluates the
//! layer stack for every visible tile and paints the results in order, so
//! later layers draw on top of earlier ones.

use serde::Serialize;

use crate::grid::coord_key;
use crate::models::Tiles;
use crate::selection::SelectionView;

pub const FOR_SALE_COLOR: &str = "#00d3ff";
pub const SELECTED_STROKE_COLOR: &str = "#ff0044";
pub const SELECTED_FILL_COLOR: &str = "#ff9990";

pub const SELECTED_STROKE_SCALE: f64 = 1.4;
pub const SELECTED_FILL_SCALE: f64 = 1.2;

/// Style emitted by a layer for a single tile.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStyle {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_left: Option<bool>,
}

impl LayerStyle {
    pub fn color(color: impl Into<String>) -> Self {
        LayerStyle {
            color: color.into(),
            ..Default::default()
        }
    }

    pub fn scaled(color: impl Into<String>, scale: f64) -> Self {
        LayerStyle {
            color: color.into(),
            scale: Some(scale),
            ..Default::default()
        }
    }
}

/// A boxed layer function.
pub type Layer<'a> = Box<dyn Fn(i32, i32) -> Option<LayerStyle> + 'a>;

/// Marks tiles that carry a listing price, keeping their adjacency hints.
pub fn for_sale_layer(tiles: &Tiles) -> impl Fn(i32, i32) -> Option<LayerStyle> + '_ {
    move |x, y| {
        let tile = tiles.get(&coord_key(x, y))?;
        tile.price?;
        Some(LayerStyle {
            color: FOR_SALE_COLOR.to_string(),
            scale: None,
            left: Some(tile.left),
            top: Some(tile.top),
            top_left: Some(tile.top_left),
        })
    }
}

/// Outline drawn under the selection fill.
pub fn selected_stroke_layer<'a>(
    view: SelectionView<'a>,
) -> impl Fn(i32, i32) -> Option<LayerStyle> + 'a {
    move |x, y| {
        view.is_selected(x, y)
            .then(|| LayerStyle::scaled(SELECTED_STROKE_COLOR, SELECTED_STROKE_SCALE))
    }
}

pub fn selected_fill_layer<'a>(
    view: SelectionView<'a>,
) -> impl Fn(i32, i32) -> Option<LayerStyle> + 'a {
    move |x, y| {
        view.is_selected(x, y)
            .then(|| LayerStyle::scaled(SELECTED_FILL_COLOR, SELECTED_FILL_SCALE))
    }
}

/// Assemble the full layer stack: for-sale, caller layers, selection stroke,
/// selection fill.
pub fn atlas_layers<'a>(
    tiles: &'a Tiles,
    view: SelectionView<'a>,
    extra: impl IntoIterator<Item = Layer<'a>>,
) -> Vec<Layer<'a>> {
    let mut layers: Vec<Layer<'a>> = vec![Box::new(for_sale_layer(tiles))];
    layers.extend(extra);
    layers.push(Box::new(selected_stroke_layer(view)));
    layers.push(Box::new(selected_fill_layer(view)));
    layers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{index_tiles, SelectionPair, Tile};
    use crate::selection::Selection;

    fn styles_at(layers: &[Layer<'_>], x: i32, y: i32) -> Vec<LayerStyle> {
        layers.iter().filter_map(|layer| layer(x, y)).collect()
    }

    fn tile(x: i32, y: i32) -> Tile {
        Tile {
            x,
            y,
            kind: Default::default(),
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
    fn test_for_sale_layer_copies_layout_hints() {
        let mut on_sale = tile(1, 1);
        on_sale.price = Some(2500.0);
        on_sale.left = true;
        on_sale.top_left = true;
        let tiles = index_tiles(vec![on_sale, tile(2, 2)]);
        let layer = for_sale_layer(&tiles);

        let style = layer(1, 1).unwrap();
        assert_eq!(style.color, FOR_SALE_COLOR);
        assert_eq!(style.left, Some(true));
        assert_eq!(style.top, Some(false));
        assert_eq!(style.top_left, Some(true));
        assert!(style.scale.is_none());
    }

    #[test]
    fn test_for_sale_layer_skips_unpriced_and_missing() {
        let tiles = index_tiles(vec![tile(2, 2)]);
        let layer = for_sale_layer(&tiles);
        assert!(layer(2, 2).is_none());
        assert!(layer(40, 40).is_none());
    }

    #[test]
    fn test_selection_layers_use_distinct_styles() {
        let pairs = vec![SelectionPair::new(3, 3)];
        let selection = Selection::from_pairs(Some(&pairs));
        let view = SelectionView::new(&selection, None, false);

        let stroke = selected_stroke_layer(view)(3, 3).unwrap();
        let fill = selected_fill_layer(view)(3, 3).unwrap();
        assert_eq!(stroke.color, SELECTED_STROKE_COLOR);
        assert_eq!(stroke.scale, Some(1.4));
        assert_eq!(fill.color, SELECTED_FILL_COLOR);
        assert_eq!(fill.scale, Some(1.2));

        assert!(selected_stroke_layer(view)(0, 0).is_none());
        assert!(selected_fill_layer(view)(0, 0).is_none());
    }

    #[test]
    fn test_layer_stack_order() {
        let mut on_sale = tile(0, 0);
        on_sale.price = Some(1.0);
        let tiles = index_tiles(vec![on_sale]);
        let pairs = vec![SelectionPair::new(0, 0)];
        let selection = Selection::from_pairs(Some(&pairs));
        let view = SelectionView::new(&selection, Some(&tiles), false);

        let extra: Layer<'_> = Box::new(|_, _| Some(LayerStyle::color("#123456")));
        let layers = atlas_layers(&tiles, view, vec![extra]);
        assert_eq!(layers.len(), 4);

        let colors: Vec<String> = styles_at(&layers, 0, 0)
            .into_iter()
            .map(|s| s.color)
            .collect();
        assert_eq!(
            colors,
            vec![
                FOR_SALE_COLOR,
                "#123456",
                SELECTED_STROKE_COLOR,
                SELECTED_FILL_COLOR
            ]
        );
    }

    #[test]
    fn test_styles_at_unselected_empty_tile() {
        let tiles = Tiles::new();
        let selection = Selection::default();
        let view = SelectionView::new(&selection, Some(&tiles), true);
        let layers = atlas_layers(&tiles, view, Vec::new());
        assert!(styles_at(&layers, 10, 10).is_empty());
    }

    #[test]
    fn test_layer_style_serializes_without_empty_fields() {
        let json = serde_json::to_value(LayerStyle::scaled("#fff", 1.2)).unwrap();
        assert_eq!(json["color"], "#fff");
        assert_eq!(json["scale"], 1.2);
        assert!(json.get("topLeft").is_none());
    }
}
