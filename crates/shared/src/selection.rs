use std::collections::HashSet;

use crate::grid::coord_key;
use crate::models::{SelectionPair, Tiles};

/// Set of selected coordinate keys.
///
/// Iteration follows first-insertion order, so the anchor used for estate
/// highlighting is always the first distinct pair of the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    order: Vec<String>,
    keys: HashSet<String>,
}

impl Selection {
    /// Build a selection from the pair sequence. `None` is an empty selection.
    pub fn from_pairs(pairs: Option<&[SelectionPair]>) -> Self {
        let mut selection = Selection::default();
        for pair in pairs.unwrap_or_default() {
            selection.insert(coord_key(&pair.x, &pair.y));
        }
        selection
    }

    pub fn insert(&mut self, key: String) -> bool {
        if self.keys.contains(&key) {
            return false;
        }
        self.keys.insert(key.clone());
        self.order.push(key);
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// First selected key. Stands in for the whole selection when inferring
    /// estate membership.
    pub fn anchor(&self) -> Option<&str> {
        self.order.first().map(String::as_str)
    }
}

/// Everything the selection predicate reads, borrowed for one render.
#[derive(Debug, Clone, Copy)]
pub struct SelectionView<'a> {
    pub selection: &'a Selection,
    pub tiles: Option<&'a Tiles>,
    pub estate_mode: bool,
}

impl<'a> SelectionView<'a> {
    pub fn new(selection: &'a Selection, tiles: Option<&'a Tiles>, estate_mode: bool) -> Self {
        SelectionView {
            selection,
            tiles,
            estate_mode,
        }
    }

    /// Whether `(x, y)` is highlighted as selected.
    ///
    /// Besides direct membership, a tile counts as selected when it shares its
    /// estate with the anchor tile. The indexer caps query results, so the pair
    /// list for a large estate can miss some of its parcels. Only the anchor's
    /// estate is considered, even when the selection spans several estates.
    pub fn is_selected(&self, x: i32, y: i32) -> bool {
        let key = coord_key(x, y);
        if self.selection.contains(&key) {
            return true;
        }
        let Some(tiles) = self.tiles else {
            return false;
        };
        if !self.estate_mode {
            return false;
        }
        let anchor = self.selection.anchor().and_then(|k| tiles.get(k));
        let tile = tiles.get(&key);
        match (anchor.and_then(|t| t.estate()), tile.and_then(|t| t.estate())) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}
