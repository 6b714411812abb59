use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::grid::coord_key;

/// Base classification of a tile, used by the renderer for its background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Owned,
    #[default]
    Unowned,
    Plaza,
    Road,
    District,
}

impl std::fmt::Display for TileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileKind::Owned => write!(f, "owned"),
            TileKind::Unowned => write!(f, "unowned"),
            TileKind::Plaza => write!(f, "plaza"),
            TileKind::Road => write!(f, "road"),
            TileKind::District => write!(f, "district"),
        }
    }
}

/// A single map cell.
///
/// `left`, `top` and `top_left` tell the renderer whether the neighbour in that
/// direction belongs to the same group, so connected tiles draw without seams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "type", default)]
    pub kind: TileKind,
    /// Listing price in MANA. Present only while the parcel is on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estate_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub top: bool,
    #[serde(default)]
    pub top_left: bool,
}

impl Tile {
    pub fn key(&self) -> String {
        coord_key(self.x, self.y)
    }

    pub fn is_on_sale(&self) -> bool {
        self.price.is_some()
    }

    /// Estate id, treating an empty string the same as no estate.
    pub fn estate(&self) -> Option<&str> {
        self.estate_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Tile-set keyed by `"x,y"`.
pub type Tiles = HashMap<String, Tile>;

/// Index a list of tiles by their coordinate key. Later duplicates win.
pub fn index_tiles(tiles: impl IntoIterator<Item = Tile>) -> Tiles {
    tiles.into_iter().map(|t| (t.key(), t)).collect()
}

/// One half of a selection pair. The data source sends coordinates either as
/// JSON numbers or as numeric strings, and both are keyed the same way.
/// Integral floats key like integers (`1.0` becomes `"1"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordPart {
    Int(i64),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for CoordPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordPart::Int(v) => write!(f, "{v}"),
            CoordPart::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            CoordPart::Float(v) => write!(f, "{v}"),
            CoordPart::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i32> for CoordPart {
    fn from(v: i32) -> Self {
        CoordPart::Int(v as i64)
    }
}

impl From<&str> for CoordPart {
    fn from(s: &str) -> Self {
        CoordPart::Text(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionPair {
    pub x: CoordPart,
    pub y: CoordPart,
}

impl SelectionPair {
    pub fn new(x: impl Into<CoordPart>, y: impl Into<CoordPart>) -> Self {
        SelectionPair {
            x: x.into(),
            y: y.into(),
        }
    }
}

/// An open bid on a parcel or estate. `price` is in wei, as a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: String,
    pub bidder: String,
    pub price: String,
    pub contract_address: String,
    pub token_id: String,
    #[serde(default)]
    pub fingerprint: Option<String>,
}
