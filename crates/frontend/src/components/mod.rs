pub mod atlas;
pub mod tile_details;
