use std::fmt::Display;
use std::future::Future;

use crate::error::BidCheckError;
use crate::models::Bid;

/// Reads MANA balances (in wei) for an address.
pub trait BalanceSource {
    type Error: Display;

    fn balance_of(&self, address: &str) -> impl Future<Output = Result<u128, Self::Error>>;
}

/// A bid made under a different fingerprint than the asset's current one is
/// stale. Missing fingerprints on either side are accepted.
pub fn check_fingerprint(bid: &Bid, fingerprint: Option<&str>) -> bool {
    match (fingerprint, bid.fingerprint.as_deref()) {
        (Some(current), Some(bid_fp)) if !current.is_empty() && !bid_fp.is_empty() => {
            current == bid_fp
        }
        _ => true,
    }
}

pub fn parse_wei(amount: &str) -> Result<u128, BidCheckError> {
    amount
        .trim()
        .parse::<u128>()
        .map_err(|_| BidCheckError::InvalidAmount(amount.to_string()))
}

async fn bidder_balance_short<B: BalanceSource>(
    source: Option<&B>,
    address: &str,
    bid: &Bid,
) -> Result<bool, BidCheckError> {
    let source = source.ok_or(BidCheckError::NotConnected)?;
    if address.is_empty() {
        return Err(BidCheckError::WalletNotConnected);
    }
    let price = parse_wei(&bid.price)?;
    let balance = source
        .balance_of(&bid.bidder)
        .await
        .map_err(|e| BidCheckError::Balance(e.to_string()))?;
    Ok(balance < price)
}

/// Whether the bidder's balance no longer covers the bid.
///
/// `address` is the connected wallet; checking requires one even though the
/// balance read is the bidder's. Any failure is logged and reported as
/// "not insufficient", so a flaky node never hides a bid.
pub async fn is_insufficient_balance<B: BalanceSource>(
    source: Option<&B>,
    address: &str,
    bid: &Bid,
) -> bool {
    match bidder_balance_short(source, address, bid).await {
        Ok(short) => short,
        Err(e) => {
            tracing::warn!(bid = %bid.id, "{}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Balances(HashMap<String, u128>);

    impl BalanceSource for Balances {
        type Error = String;

        async fn balance_of(&self, address: &str) -> Result<u128, String> {
            self.0
                .get(address)
                .copied()
                .ok_or_else(|| format!("unknown address {address}"))
        }
    }

    fn bid(price: &str, fingerprint: Option<&str>) -> Bid {
        Bid {
            id: "bid-1".to_string(),
            bidder: "0xbidder".to_string(),
            price: price.to_string(),
            contract_address: "0xland".to_string(),
            token_id: "1".to_string(),
            fingerprint: fingerprint.map(str::to_string),
        }
    }

    fn balances(amount: u128) -> Balances {
        Balances(HashMap::from([("0xbidder".to_string(), amount)]))
    }

    #[test]
    fn test_fingerprint_match() {
        assert!(check_fingerprint(&bid("1", Some("0xaa")), Some("0xaa")));
        assert!(!check_fingerprint(&bid("1", Some("0xaa")), Some("0xbb")));
    }

    #[test]
    fn test_fingerprint_missing_side_accepted() {
        assert!(check_fingerprint(&bid("1", None), Some("0xbb")));
        assert!(check_fingerprint(&bid("1", Some("0xaa")), None));
        assert!(check_fingerprint(&bid("1", Some("0xaa")), Some("")));
    }

    #[tokio::test]
    async fn test_balance_below_price_is_insufficient() {
        let source = balances(500);
        assert!(is_insufficient_balance(Some(&source), "0xme", &bid("1000", None)).await);
    }

    #[tokio::test]
    async fn test_balance_covering_price_is_fine() {
        let source = balances(1000);
        assert!(!is_insufficient_balance(Some(&source), "0xme", &bid("1000", None)).await);
    }

    #[tokio::test]
    async fn test_failures_report_not_insufficient() {
        let source = balances(0);
        // no provider
        assert!(!is_insufficient_balance::<Balances>(None, "0xme", &bid("1000", None)).await);
        // wallet not connected
        assert!(!is_insufficient_balance(Some(&source), "", &bid("1000", None)).await);
        // unparsable price
        assert!(!is_insufficient_balance(Some(&source), "0xme", &bid("lots", None)).await);
        // unknown bidder
        let empty = Balances(HashMap::new());
        assert!(!is_insufficient_balance(Some(&empty), "0xme", &bid("1000", None)).await);
    }

    #[tokio::test]
    async fn test_error_kinds() {
        let source = balances(0);
        assert_eq!(
            bidder_balance_short::<Balances>(None, "0xme", &bid("1", None)).await,
            Err(BidCheckError::NotConnected)
        );
        assert_eq!(
            bidder_balance_short(Some(&source), "", &bid("1", None)).await,
            Err(BidCheckError::WalletNotConnected)
        );
    }

    #[test]
    fn test_parse_wei() {
        assert_eq!(parse_wei("1000000000000000000").unwrap(), 1_000_000_000_000_000_000);
        assert!(parse_wei("-1").is_err());
    }
}
