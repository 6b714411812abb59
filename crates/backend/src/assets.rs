use std::collections::HashMap;
use std::path::Path;

use atlas_shared::bid::BalanceSource;
use atlas_shared::grid::{self, coord_key};
use atlas_shared::models::{index_tiles, Tile, Tiles};

/// Read-only data loaded at startup: the tile-set and a MANA balance snapshot.
pub struct Assets {
    pub tiles: Tiles,
    pub balances: HashMap<String, u128>,
}

impl Assets {
    pub fn load(assets_dir: &Path) -> Result<Self, String> {
        let tiles_path = assets_dir.join("tiles.json");
        let tiles_data = std::fs::read_to_string(&tiles_path)
            .map_err(|e| format!("Failed to read {}: {}", tiles_path.display(), e))?;
        let mut tiles: Vec<Tile> = serde_json::from_str(&tiles_data)
            .map_err(|e| format!("Failed to parse tiles.json: {}", e))?;

        let total = tiles.len();
        tiles.retain(|t| grid::in_bounds(t.x, t.y));
        if tiles.len() < total {
            tracing::warn!(skipped = total - tiles.len(), "Ignoring tiles outside the atlas");
        }

        // Balances are optional; without them every bid counts as covered.
        let balances_path = assets_dir.join("balances.json");
        let balances = match std::fs::read_to_string(&balances_path) {
            Ok(data) => parse_balances(&data)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(format!("Failed to read {}: {}", balances_path.display(), e)),
        };

        tracing::info!(
            tiles = tiles.len(),
            balances = balances.len(),
            "Loaded atlas assets"
        );

        Ok(Self::from_parts(tiles, balances))
    }

    pub fn from_parts(tiles: Vec<Tile>, balances: HashMap<String, u128>) -> Self {
        Assets {
            tiles: index_tiles(tiles),
            balances,
        }
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.tiles.get(&coord_key(x, y))
    }

    /// All tiles of one estate, sorted by (x, y).
    pub fn estate_tiles(&self, estate_id: &str) -> Vec<&Tile> {
        let mut tiles: Vec<&Tile> = self
            .tiles
            .values()
            .filter(|t| t.estate() == Some(estate_id))
            .collect();
        tiles.sort_by_key(|t| (t.x, t.y));
        tiles
    }
}

/// Balances are stored as `{ "0xaddress": "wei" }`; keys are matched lowercase.
fn parse_balances(data: &str) -> Result<HashMap<String, u128>, String> {
    let raw: HashMap<String, String> =
        serde_json::from_str(data).map_err(|e| format!("Failed to parse balances.json: {}", e))?;
    raw.into_iter()
        .map(|(address, wei)| {
            let amount = wei
                .parse::<u128>()
                .map_err(|_| format!("Invalid balance for {}: {}", address, wei))?;
            Ok((address.to_lowercase(), amount))
        })
        .collect()
}

impl BalanceSource for Assets {
    type Error = String;

    async fn balance_of(&self, address: &str) -> Result<u128, String> {
        Ok(self
            .balances
            .get(&address.to_lowercase())
            .copied()
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILES: &str = r#"[
        {"x":0,"y":0,"type":"owned","estateId":"5"},
        {"x":0,"y":1,"type":"owned","estateId":"5","top":true},
        {"x":3,"y":3,"type":"unowned","price":1200},
        {"x":-1,"y":0,"type":"road"}
    ]"#;

    fn assets_dir(with_balances: Option<&str>) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tiles.json"), TILES).unwrap();
        if let Some(balances) = with_balances {
            std::fs::write(dir.path().join("balances.json"), balances).unwrap();
        }
        dir
    }

    #[test]
    fn test_load_tiles_and_balances() {
        let dir = assets_dir(Some(r#"{"0xABC":"1000"}"#));
        let assets = Assets::load(dir.path()).unwrap();
        assert_eq!(assets.tiles.len(), 4);
        assert_eq!(assets.balances.get("0xabc"), Some(&1000));
        assert!(assets.tile(3, 3).unwrap().is_on_sale());
    }

    #[test]
    fn test_missing_balances_is_empty() {
        let dir = assets_dir(None);
        let assets = Assets::load(dir.path()).unwrap();
        assert!(assets.balances.is_empty());
    }

    #[test]
    fn test_out_of_bounds_tiles_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let tiles = r#"[{"x":0,"y":0,"type":"road"},{"x":151,"y":0,"type":"owned"}]"#;
        std::fs::write(dir.path().join("tiles.json"), tiles).unwrap();
        let assets = Assets::load(dir.path()).unwrap();
        assert_eq!(assets.tiles.len(), 1);
        assert!(assets.tile(151, 0).is_none());
    }

    #[test]
    fn test_missing_tiles_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Assets::load(dir.path()).err().unwrap();
        assert!(err.contains("tiles.json"));
    }

    #[test]
    fn test_invalid_balance_fails() {
        let dir = assets_dir(Some(r#"{"0xabc":"ten"}"#));
        let err = Assets::load(dir.path()).err().unwrap();
        assert!(err.contains("Invalid balance"));
    }

    #[test]
    fn test_estate_tiles_sorted() {
        let dir = assets_dir(None);
        let assets = Assets::load(dir.path()).unwrap();
        let estate: Vec<(i32, i32)> = assets
            .estate_tiles("5")
            .iter()
            .map(|t| (t.x, t.y))
            .collect();
        assert_eq!(estate, vec![(0, 0), (0, 1)]);
        assert!(assets.estate_tiles("404").is_empty());
    }

    #[tokio::test]
    async fn test_balance_lookup_is_case_insensitive() {
        let assets = Assets::from_parts(
            Vec::new(),
            HashMap::from([("0xabc".to_string(), 7)]),
        );
        assert_eq!(assets.balance_of("0xABC").await.unwrap(), 7);
        assert_eq!(assets.balance_of("0xdef").await.unwrap(), 0);
    }
}
