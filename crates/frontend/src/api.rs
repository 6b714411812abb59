use atlas_shared::click::TokenIdLookup;
use atlas_shared::locations::Contracts;
use atlas_shared::models::{SelectionPair, Tile, TileKind};
use serde::{Deserialize, Serialize};
use std::future::Future;

#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

fn api_url() -> Result<String, String> {
    let origin = web_sys::window()
        .ok_or("No window")?
        .location()
        .origin()
        .map_err(|_| "No origin".to_string())?;
    Ok(format!("{}/graphql", origin))
}

async fn query<T: for<'de> Deserialize<'de>>(
    query_str: &str,
    variables: Option<serde_json::Value>,
) -> Result<T, String> {
    let req = GraphQLRequest {
        query: query_str.to_string(),
        variables,
    };

    let resp = reqwest::Client::new()
        .post(api_url()?)
        .json(&req)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let gql_resp: GraphQLResponse<T> = resp.json().await.map_err(|e| e.to_string())?;
    unwrap_response(gql_resp)
}

/// First GraphQL error wins over any partial data.
fn unwrap_response<T>(resp: GraphQLResponse<T>) -> Result<T, String> {
    if let Some(errors) = resp.errors {
        if let Some(first) = errors.into_iter().next() {
            return Err(first.message);
        }
    }
    resp.data.ok_or_else(|| "No data returned".to_string())
}

// Types mirroring the GraphQL schema

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileData {
    pub x: i32,
    pub y: i32,
    pub kind: String,
    pub price: Option<f64>,
    pub estate_id: Option<String>,
    pub owner: Option<String>,
    pub name: Option<String>,
    pub left: bool,
    pub top: bool,
    pub top_left: bool,
}

impl TileData {
    pub fn into_tile(self) -> Tile {
        let kind = match self.kind.as_str() {
            "OWNED" => TileKind::Owned,
            "PLAZA" => TileKind::Plaza,
            "ROAD" => TileKind::Road,
            "DISTRICT" => TileKind::District,
            _ => TileKind::Unowned,
        };
        Tile {
            x: self.x,
            y: self.y,
            kind,
            price: self.price,
            estate_id: self.estate_id,
            owner: self.owner,
            name: self.name,
            left: self.left,
            top: self.top,
            top_left: self.top_left,
        }
    }

    pub fn selection_pair(&self) -> SelectionPair {
        SelectionPair::new(self.x, self.y)
    }
}

const TILE_FIELDS: &str = "x y kind price estateId owner name left top topLeft";

// API functions

#[derive(Deserialize)]
pub struct TilesResponse {
    pub tiles: Vec<TileData>,
}

pub async fn fetch_tiles() -> Result<Vec<Tile>, String> {
    let resp: TilesResponse = query(&format!("query {{ tiles {{ {TILE_FIELDS} }} }}"), None).await?;
    Ok(resp.tiles.into_iter().map(TileData::into_tile).collect())
}

#[derive(Deserialize)]
pub struct EstateTilesResponse {
    #[serde(rename = "estateTiles")]
    pub estate_tiles: Vec<TileData>,
}

pub async fn fetch_estate_tiles(estate_id: &str) -> Result<Vec<TileData>, String> {
    let variables = serde_json::json!({ "estateId": estate_id });
    let resp: EstateTilesResponse = query(
        &format!("query EstateTiles($estateId: ID!) {{ estateTiles(estateId: $estateId) {{ {TILE_FIELDS} }} }}"),
        Some(variables),
    )
    .await?;
    Ok(resp.estate_tiles)
}

#[derive(Deserialize)]
pub struct ParcelResponse {
    pub parcel: Option<TileData>,
}

pub async fn fetch_parcel(token_id: &str) -> Result<Option<TileData>, String> {
    let variables = serde_json::json!({ "tokenId": token_id });
    let resp: ParcelResponse = query(
        &format!("query Parcel($tokenId: String!) {{ parcel(tokenId: $tokenId) {{ {TILE_FIELDS} }} }}"),
        Some(variables),
    )
    .await?;
    Ok(resp.parcel)
}

#[derive(Deserialize)]
pub struct TokenIdResponse {
    #[serde(rename = "tokenId")]
    pub token_id: String,
}

pub async fn fetch_token_id(x: i32, y: i32) -> Result<String, String> {
    let variables = serde_json::json!({ "x": x, "y": y });
    let resp: TokenIdResponse = query(
        r#"query TokenId($x: Int!, $y: Int!) { tokenId(x: $x, y: $y) }"#,
        Some(variables),
    )
    .await?;
    Ok(resp.token_id)
}

#[derive(Deserialize)]
pub struct ContractsResponse {
    pub contracts: Contracts,
}

pub async fn fetch_contracts() -> Result<Contracts, String> {
    let resp: ContractsResponse = query(
        r#"query { contracts { landRegistry estateRegistry manaToken } }"#,
        None,
    )
    .await?;
    Ok(resp.contracts)
}

/// Token-id resolution backed by the `tokenId` query.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphqlTokenIds;

impl TokenIdLookup for GraphqlTokenIds {
    type Error = String;

    fn fetch_token_id(&self, x: i32, y: i32) -> impl Future<Output = Result<String, String>> {
        fetch_token_id(x, y)
    }
}
