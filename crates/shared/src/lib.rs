pub mod bid;
pub mod click;
pub mod error;
pub mod grid;
pub mod layers;
pub mod locations;
pub mod models;
pub mod selection;
#[cfg(feature = "token-id")]
pub mod token_id;
