use std::sync::Arc;

use async_graphql::{Context, Enum, InputObject, Object, SimpleObject, ID};
use atlas_shared::{
    bid,
    locations::Contracts,
    models::{self, TileKind},
    token_id,
};

use crate::assets::Assets;

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum GqlTileKind {
    Owned,
    Unowned,
    Plaza,
    Road,
    District,
}

impl From<TileKind> for GqlTileKind {
    fn from(k: TileKind) -> Self {
        match k {
            TileKind::Owned => GqlTileKind::Owned,
            TileKind::Unowned => GqlTileKind::Unowned,
            TileKind::Plaza => GqlTileKind::Plaza,
            TileKind::Road => GqlTileKind::Road,
            TileKind::District => GqlTileKind::District,
        }
    }
}

// GraphQL output types

#[derive(SimpleObject)]
pub struct GqlTile {
    pub x: i32,
    pub y: i32,
    pub kind: GqlTileKind,
    pub price: Option<f64>,
    pub estate_id: Option<ID>,
    pub owner: Option<String>,
    pub name: Option<String>,
    pub left: bool,
    pub top: bool,
    pub top_left: bool,
}

impl From<&models::Tile> for GqlTile {
    fn from(t: &models::Tile) -> Self {
        GqlTile {
            x: t.x,
            y: t.y,
            kind: t.kind.into(),
            price: t.price,
            estate_id: t.estate().map(|id| ID(id.to_string())),
            owner: t.owner.clone(),
            name: t.name.clone(),
            left: t.left,
            top: t.top,
            top_left: t.top_left,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlContracts {
    pub land_registry: String,
    pub estate_registry: String,
    pub mana_token: String,
}

impl From<&Contracts> for GqlContracts {
    fn from(c: &Contracts) -> Self {
        GqlContracts {
            land_registry: c.land_registry.clone(),
            estate_registry: c.estate_registry.clone(),
            mana_token: c.mana_token.clone(),
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlBidStatus {
    pub fingerprint_valid: bool,
    pub insufficient_balance: bool,
}

// Input types

#[derive(InputObject)]
pub struct BidInput {
    pub id: ID,
    pub bidder: String,
    pub price: String,
    pub contract_address: String,
    pub token_id: String,
    pub fingerprint: Option<String>,
}

impl From<BidInput> for models::Bid {
    fn from(b: BidInput) -> Self {
        models::Bid {
            id: b.id.to_string(),
            bidder: b.bidder,
            price: b.price,
            contract_address: b.contract_address,
            token_id: b.token_id,
            fingerprint: b.fingerprint,
        }
    }
}

// Query root

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Every tile of the atlas. `onSaleOnly` keeps only tiles with a price.
    async fn tiles(&self, ctx: &Context<'_>, on_sale_only: Option<bool>) -> Vec<GqlTile> {
        let assets = ctx.data_unchecked::<Arc<Assets>>();
        let on_sale_only = on_sale_only.unwrap_or(false);
        let mut tiles: Vec<GqlTile> = assets
            .tiles
            .values()
            .filter(|t| !on_sale_only || t.is_on_sale())
            .map(GqlTile::from)
            .collect();
        tiles.sort_by_key(|t| (t.x, t.y));
        tiles
    }

    async fn tile(&self, ctx: &Context<'_>, x: i32, y: i32) -> Option<GqlTile> {
        let assets = ctx.data_unchecked::<Arc<Assets>>();
        assets.tile(x, y).map(GqlTile::from)
    }

    async fn estate_tiles(&self, ctx: &Context<'_>, estate_id: ID) -> Vec<GqlTile> {
        let assets = ctx.data_unchecked::<Arc<Assets>>();
        assets
            .estate_tiles(&estate_id)
            .into_iter()
            .map(GqlTile::from)
            .collect()
    }

    /// LAND token id of parcel (x, y), as a decimal string.
    async fn token_id(&self, x: i32, y: i32) -> async_graphql::Result<String> {
        token_id::encode(x as i64, y as i64).map_err(|e| {
            tracing::debug!(x, y, error = %e, "Rejected token id request");
            async_graphql::Error::new(e.to_string())
        })
    }

    /// Parcel coordinates of a LAND token id.
    async fn parcel(
        &self,
        ctx: &Context<'_>,
        token_id: String,
    ) -> async_graphql::Result<Option<GqlTile>> {
        let assets = ctx.data_unchecked::<Arc<Assets>>();
        let (x, y) =
            token_id::decode(&token_id).map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(assets.tile(x, y).map(GqlTile::from))
    }

    async fn contracts(&self, ctx: &Context<'_>) -> GqlContracts {
        let contracts = ctx.data_unchecked::<Arc<Contracts>>();
        GqlContracts::from(contracts.as_ref())
    }

    /// Validity of a bid: fingerprint match against `fingerprint`, and whether
    /// the bidder's balance snapshot still covers the price.
    async fn bid_status(
        &self,
        ctx: &Context<'_>,
        bid: BidInput,
        fingerprint: Option<String>,
        address: String,
    ) -> GqlBidStatus {
        let assets = ctx.data_unchecked::<Arc<Assets>>();
        let bid: models::Bid = bid.into();
        GqlBidStatus {
            fingerprint_valid: bid::check_fingerprint(&bid, fingerprint.as_deref()),
            insufficient_balance: bid::is_insufficient_balance(
                Some(assets.as_ref()),
                &address,
                &bid,
            )
            .await,
        }
    }
}

pub type Schema = async_graphql::Schema<
    QueryRoot,
    async_graphql::EmptyMutation,
    async_graphql::EmptySubscription,
>;

pub fn build_schema(assets: Arc<Assets>, contracts: Arc<Contracts>) -> Schema {
    async_graphql::Schema::build(
        QueryRoot,
        async_graphql::EmptyMutation,
        async_graphql::EmptySubscription,
    )
    .data(assets)
    .data(contracts)
    .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn schema() -> Schema {
        let tiles: Vec<models::Tile> = serde_json::from_str(
            r#"[
                {"x":0,"y":0,"type":"owned","estateId":"5"},
                {"x":0,"y":1,"type":"owned","estateId":"5","top":true},
                {"x":3,"y":3,"type":"unowned","price":1200},
                {"x":-1,"y":0,"type":"road"}
            ]"#,
        )
        .unwrap();
        let balances = HashMap::from([("0xrich".to_string(), 5_000u128)]);
        build_schema(
            Arc::new(Assets::from_parts(tiles, balances)),
            Arc::new(Contracts::default()),
        )
    }

    async fn run(query: &str) -> serde_json::Value {
        let resp = schema().execute(query).await;
        assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
        resp.data.into_json().unwrap()
    }

    #[tokio::test]
    async fn test_tiles_query() {
        let data = run("{ tiles { x y kind estateId topLeft } }").await;
        let tiles = data["tiles"].as_array().unwrap();
        assert_eq!(tiles.len(), 4);
        assert_eq!(tiles[0]["x"], -1);
        assert_eq!(tiles[0]["kind"], "ROAD");
    }

    #[tokio::test]
    async fn test_tiles_on_sale_only() {
        let data = run("{ tiles(onSaleOnly: true) { x y price } }").await;
        let tiles = data["tiles"].as_array().unwrap();
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0]["price"], 1200.0);
    }

    #[tokio::test]
    async fn test_single_tile() {
        let data = run("{ tile(x: 0, y: 1) { estateId top } missing: tile(x: 9, y: 9) { x } }").await;
        assert_eq!(data["tile"]["estateId"], "5");
        assert_eq!(data["tile"]["top"], true);
        assert!(data["missing"].is_null());
    }

    #[tokio::test]
    async fn test_estate_tiles() {
        let data = run(r#"{ estateTiles(estateId: "5") { x y } }"#).await;
        assert_eq!(data["estateTiles"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_token_id() {
        let data = run("{ tokenId(x: 1, y: 0) }").await;
        assert_eq!(data["tokenId"], "340282366920938463463374607431768211456");
    }

    #[tokio::test]
    async fn test_token_id_out_of_range_is_error() {
        let resp = schema().execute("{ tokenId(x: 1000000, y: 0) }").await;
        assert_eq!(resp.errors.len(), 1);
        assert!(resp.errors[0].message.contains("out of range"));
    }

    #[tokio::test]
    async fn test_parcel_by_token_id() {
        let data = run(r#"{ parcel(tokenId: "340282366920938463463374607431768211455") { x y } }"#).await;
        // (0, -1) is not in the fixture
        assert!(data["parcel"].is_null());
        let data = run(r#"{ parcel(tokenId: "1") { x y estateId } }"#).await;
        assert_eq!(data["parcel"]["estateId"], "5");
    }

    #[tokio::test]
    async fn test_contracts() {
        let data = run("{ contracts { landRegistry estateRegistry manaToken } }").await;
        assert_eq!(
            data["contracts"]["landRegistry"],
            Contracts::default().land_registry
        );
    }

    #[tokio::test]
    async fn test_bid_status() {
        let query = r#"{
            covered: bidStatus(
                bid: { id: "b1", bidder: "0xRICH", price: "1000", contractAddress: "0xland", tokenId: "1", fingerprint: "0xaa" },
                fingerprint: "0xaa",
                address: "0xme"
            ) { fingerprintValid insufficientBalance }
            short: bidStatus(
                bid: { id: "b2", bidder: "0xpoor", price: "1000", contractAddress: "0xland", tokenId: "1", fingerprint: "0xaa" },
                fingerprint: "0xbb",
                address: "0xme"
            ) { fingerprintValid insufficientBalance }
        }"#;
        let data = run(query).await;
        assert_eq!(data["covered"]["fingerprintValid"], true);
        assert_eq!(data["covered"]["insufficientBalance"], false);
        assert_eq!(data["short"]["fingerprintValid"], false);
        assert_eq!(data["short"]["insufficientBalance"], true);
    }
}
