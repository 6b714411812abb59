use std::path::PathBuf;

use atlas_shared::locations::Contracts;

/// Server settings, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub assets_dir: PathBuf,
    pub contracts: Contracts,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup, so tests don't touch the process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| format!("Invalid PORT {:?}: {}", raw, e))?,
            None => 3000,
        };
        let assets_dir = PathBuf::from(get("ASSETS_DIR").unwrap_or_else(|| "assets".to_string()));

        let defaults = Contracts::default();
        let contracts = Contracts {
            land_registry: get("LAND_REGISTRY").unwrap_or(defaults.land_registry),
            estate_registry: get("ESTATE_REGISTRY").unwrap_or(defaults.estate_registry),
            mana_token: get("MANA_TOKEN").unwrap_or(defaults.mana_token),
        };

        Ok(Config {
            port,
            assets_dir,
            contracts,
        })
    }
}
