//! Escrow conservation invariant checker.
//!
//! Mathematical invariant enforced over every auction's lifetime:
//! ```text
//! ∀ auction: Σ(deposits) == held + Σ(refunds) + Σ(settlements)
//! ```
//!
//! If this invariant ever breaks, value has been created or destroyed
//! inside the ledger — the one failure the escrow must never exhibit.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sealbid_types::{AuctionId, Result, SealbidError};

/// Tracks per-auction deposit, refund, and settlement totals and validates
/// conservation on demand.
#[derive(Debug, Default)]
pub struct ConservationTracker {
    /// Total deposited per auction since genesis.
    deposited: HashMap<AuctionId, Decimal>,
    /// Total refunded to bidders per auction since genesis.
    refunded: HashMap<AuctionId, Decimal>,
    /// Total settled out to sellers per auction since genesis.
    settled: HashMap<AuctionId, Decimal>,
}

impl ConservationTracker {
    /// Create a new conservation tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a deposit entering custody.
    pub fn record_deposit(&mut self, auction_id: AuctionId, amount: Decimal) {
        *self.deposited.entry(auction_id).or_insert(Decimal::ZERO) += amount;
    }

    /// Record a refund leaving custody.
    pub fn record_refund(&mut self, auction_id: AuctionId, amount: Decimal) {
        *self.refunded.entry(auction_id).or_insert(Decimal::ZERO) += amount;
    }

    /// Record a settlement leaving custody.
    pub fn record_settlement(&mut self, auction_id: AuctionId, amount: Decimal) {
        *self.settled.entry(auction_id).or_insert(Decimal::ZERO) += amount;
    }

    /// Expected held amount for an auction: deposited - refunded - settled.
    #[must_use]
    pub fn expected_held(&self, auction_id: AuctionId) -> Decimal {
        self.total_deposited(auction_id)
            - self.total_refunded(auction_id)
            - self.total_settled(auction_id)
    }

    /// Verify that the actual held amount matches the expected one.
    ///
    /// # Errors
    /// Returns [`SealbidError::ConservationViolation`] if actual ≠ expected.
    pub fn verify(&self, auction_id: AuctionId, actual_held: Decimal) -> Result<()> {
        let expected = self.expected_held(auction_id);
        if actual_held != expected {
            return Err(SealbidError::ConservationViolation {
                reason: format!(
                    "{auction_id}: actual held {actual_held} != expected {expected} \
                     (deposited={}, refunded={}, settled={})",
                    self.total_deposited(auction_id),
                    self.total_refunded(auction_id),
                    self.total_settled(auction_id),
                ),
            });
        }
        Ok(())
    }

    /// Total deposited for an auction.
    #[must_use]
    pub fn total_deposited(&self, auction_id: AuctionId) -> Decimal {
        self.deposited
            .get(&auction_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Total refunded for an auction.
    #[must_use]
    pub fn total_refunded(&self, auction_id: AuctionId) -> Decimal {
        self.refunded
            .get(&auction_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Total settled for an auction.
    #[must_use]
    pub fn total_settled(&self, auction_id: AuctionId) -> Decimal {
        self.settled
            .get(&auction_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}
