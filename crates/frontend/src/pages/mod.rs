pub mod atlas_page;
pub mod nft_page;
