//! Atlas grid geometry.
//!
//! Parcels span x in -150..=150 and y in -150..=150.
//! The atlas image space draws each parcel as a TILE_SIZE_PX square,
//! with y growing north (up) while pixel rows grow down.

use std::fmt::Display;

pub const MIN_COORD: i32 = -150;
pub const MAX_COORD: i32 = 150;

// Tiles per side
pub const GRID_SIZE: usize = (MAX_COORD - MIN_COORD + 1) as usize; // 301

// Native pixel size of a single tile in image space
pub const TILE_SIZE_PX: f64 = 16.0;

pub const MAP_WIDTH_PX: f64 = GRID_SIZE as f64 * TILE_SIZE_PX;
pub const MAP_HEIGHT_PX: f64 = GRID_SIZE as f64 * TILE_SIZE_PX;

/// Join two coordinate parts into the `"x,y"` key used by tile-sets and selections.
pub fn coord_key(x: impl Display, y: impl Display) -> String {
    format!("{x},{y}")
}

pub fn in_bounds(x: i32, y: i32) -> bool {
    (MIN_COORD..=MAX_COORD).contains(&x) && (MIN_COORD..=MAX_COORD).contains(&y)
}

/// Top-left pixel of a tile in image space.
pub fn tile_origin_px(x: i32, y: i32) -> (f64, f64) {
    let col = (x - MIN_COORD) as f64;
    let row = (MAX_COORD - y) as f64;
    (col * TILE_SIZE_PX, row * TILE_SIZE_PX)
}

/// Tile under an image-space pixel, or `None` outside the map.
pub fn px_to_tile(px_x: f64, px_y: f64) -> Option<(i32, i32)> {
    if !(0.0..MAP_WIDTH_PX).contains(&px_x) || !(0.0..MAP_HEIGHT_PX).contains(&px_y) {
        return None;
    }
    let col = (px_x / TILE_SIZE_PX).floor() as i32;
    let row = (px_y / TILE_SIZE_PX).floor() as i32;
    Some((MIN_COORD + col, MAX_COORD - row))
}
