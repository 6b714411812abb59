use serde::{Deserialize, Serialize};

// Ethereum mainnet deployments
pub const LAND_REGISTRY_MAINNET: &str = "0xf87e31492faf9a91b02ee0deaad50d51d56d5d4d";
pub const ESTATE_REGISTRY_MAINNET: &str = "0x959e104e1a4db6317fa58f8295f586e1a978c297";
pub const MANA_TOKEN_MAINNET: &str = "0x0f5d2fb29fb7d3cfee444a200298f468908cc942";

/// Registry addresses the marketplace links to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contracts {
    pub land_registry: String,
    pub estate_registry: String,
    pub mana_token: String,
}

impl Default for Contracts {
    fn default() -> Self {
        Contracts {
            land_registry: LAND_REGISTRY_MAINNET.to_string(),
            estate_registry: ESTATE_REGISTRY_MAINNET.to_string(),
            mana_token: MANA_TOKEN_MAINNET.to_string(),
        }
    }
}

/// Destination of a click on the atlas: one NFT of one registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavTarget {
    pub contract_address: String,
    pub token_id: String,
}

impl NavTarget {
    pub fn nft(contract_address: &str, token_id: &str) -> Self {
        NavTarget {
            contract_address: contract_address.to_string(),
            token_id: token_id.to_string(),
        }
    }

    pub fn path(&self) -> String {
        format!("/contracts/{}/tokens/{}", self.contract_address, self.token_id)
    }

    pub fn is_estate(&self, contracts: &Contracts) -> bool {
        self.contract_address
            .eq_ignore_ascii_case(&contracts.estate_registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nft_path() {
        let target = NavTarget::nft("0xabc", "1234");
        assert_eq!(target.path(), "/contracts/0xabc/tokens/1234");
    }

    #[test]
    fn test_is_estate_ignores_case() {
        let contracts = Contracts::default();
        let target = NavTarget::nft(&ESTATE_REGISTRY_MAINNET.to_uppercase(), "7");
        assert!(target.is_estate(&contracts));
        assert!(!NavTarget::nft(LAND_REGISTRY_MAINNET, "7").is_estate(&contracts));
    }
}
