//! Atlas click handling.
//!
//! A click on an estate tile navigates straight to the estate. A click on a
//! plain parcel first resolves the parcel's token id through a
//! [`TokenIdLookup`], which is the only asynchronous step.
//!
//! Every navigating click takes a ticket from a generation counter shared by
//! all clones of the handler. A lookup only navigates if its ticket is still
//! the latest one, so a slow response for an old click cannot override a newer
//! click, and [`ClickHandler::cancel_pending`] drops any answer still in flight
//! when the atlas goes away.

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::grid::coord_key;
use crate::locations::{Contracts, NavTarget};
use crate::models::Tiles;

/// Resolves parcel coordinates to a LAND token id.
pub trait TokenIdLookup {
    type Error: Display;

    fn fetch_token_id(&self, x: i32, y: i32) -> impl Future<Output = Result<String, Self::Error>>;
}

/// What a click asks for, decided synchronously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    /// Navigation disabled, or no tile under the cursor.
    Ignore,
    Navigate(NavTarget),
    Lookup(PendingLookup),
}

/// A token-id lookup waiting to be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingLookup {
    pub x: i32,
    pub y: i32,
    ticket: u64,
}

/// Result of a finished lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Navigate(NavTarget),
    /// A newer click or a teardown happened while the lookup was running.
    Superseded,
    /// The lookup failed. Already logged.
    Failed,
}

#[derive(Debug, Clone)]
pub struct ClickHandler<L> {
    lookup: L,
    contracts: Contracts,
    with_navigation: bool,
    generation: Arc<AtomicU64>,
}

impl<L: TokenIdLookup> ClickHandler<L> {
    pub fn new(lookup: L, contracts: Contracts) -> Self {
        ClickHandler {
            lookup,
            contracts,
            with_navigation: true,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_navigation(mut self, enabled: bool) -> Self {
        self.with_navigation = enabled;
        self
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    fn next_ticket(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    /// A handler with new settings that keeps sharing this one's generation
    /// counter, so tickets issued by either stay comparable.
    pub fn reconfigured(&self, contracts: Contracts, with_navigation: bool) -> Self
    where
        L: Clone,
    {
        ClickHandler {
            lookup: self.lookup.clone(),
            contracts,
            with_navigation,
            generation: Arc::clone(&self.generation),
        }
    }

    /// Invalidate any lookup still in flight.
    pub fn cancel_pending(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Decide what a click on `(x, y)` should do.
    pub fn begin(&self, tiles: &Tiles, x: i32, y: i32) -> ClickAction {
        if !self.with_navigation {
            return ClickAction::Ignore;
        }
        let Some(tile) = tiles.get(&coord_key(x, y)) else {
            return ClickAction::Ignore;
        };
        let ticket = self.next_ticket();
        match tile.estate() {
            Some(estate_id) => {
                ClickAction::Navigate(NavTarget::nft(&self.contracts.estate_registry, estate_id))
            }
            None => ClickAction::Lookup(PendingLookup {
                x: tile.x,
                y: tile.y,
                ticket,
            }),
        }
    }

    /// Run the token-id lookup for a pending click. Failures are logged and
    /// swallowed.
    pub async fn resolve(&self, pending: PendingLookup) -> Resolution {
        match self.lookup.fetch_token_id(pending.x, pending.y).await {
            Ok(token_id) => {
                if !self.is_current(pending.ticket) {
                    tracing::debug!(
                        x = pending.x,
                        y = pending.y,
                        "Dropping token id for superseded click"
                    );
                    return Resolution::Superseded;
                }
                Resolution::Navigate(NavTarget::nft(&self.contracts.land_registry, &token_id))
            }
            Err(e) => {
                tracing::warn!(
                    x = pending.x,
                    y = pending.y,
                    "Couldn't fetch parcel {},{}: {}",
                    pending.x,
                    pending.y,
                    e
                );
                Resolution::Failed
            }
        }
    }
}
