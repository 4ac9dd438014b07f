//! Bid model — one sealed bid per (auction, bidder).
//!
//! A [`Bid`] moves through two one-way latches, both guarded:
//! `revealed` flips at most once during the reveal window, and `settled`
//! flips exactly once during finalize. The `settled` latch is what prevents
//! a deposit from ever being refunded or paid out twice.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, AuctionId, Commitment, Result, SealbidError};

/// A sealed bid: commitment plus escrowed deposit.
///
/// In the observed protocol the deposit equals the true bid value, so the
/// amount is visible on-ledger at commit time. That confidentiality gap is
/// part of the protocol being modeled, not an accident of this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    /// The auction this bid belongs to.
    pub auction_id: AuctionId,
    /// The committing bidder.
    pub bidder: AccountId,
    /// Digest binding the bidder to `(amount, secret)`.
    pub commitment: Commitment,
    /// Value escrowed at commit time.
    pub deposit: Decimal,
    /// Whether the bid has been revealed.
    pub revealed: bool,
    /// The revealed amount; populated only on a successful reveal.
    pub revealed_amount: Option<Decimal>,
    /// When the reveal landed. Drives the earliest-reveal tie-break.
    pub revealed_at: Option<DateTime<Utc>>,
    /// Whether the deposit has been refunded or settled.
    pub settled: bool,
    /// When the commitment was submitted.
    pub committed_at: DateTime<Utc>,
}

impl Bid {
    /// Create a freshly committed, unrevealed, unsettled bid.
    #[must_use]
    pub fn new(
        auction_id: AuctionId,
        bidder: AccountId,
        commitment: Commitment,
        deposit: Decimal,
        committed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            auction_id,
            bidder,
            commitment,
            deposit,
            revealed: false,
            revealed_amount: None,
            revealed_at: None,
            settled: false,
            committed_at,
        }
    }

    /// Record a successful reveal.
    ///
    /// # Errors
    /// Returns [`SealbidError::AlreadyRevealed`] if the bid was already
    /// revealed — a bid reveals at most once.
    pub fn mark_revealed(&mut self, amount: Decimal, at: DateTime<Utc>) -> Result<()> {
        if self.revealed {
            return Err(SealbidError::AlreadyRevealed {
                auction_id: self.auction_id,
                bidder: self.bidder,
            });
        }
        self.revealed = true;
        self.revealed_amount = Some(amount);
        self.revealed_at = Some(at);
        Ok(())
    }

    /// Record that the deposit has been paid out (refund or settlement).
    ///
    /// # Errors
    /// Returns [`SealbidError::AlreadySettled`] if the deposit was already
    /// paid out. **Irreversible.** This is what prevents double payout.
    pub fn mark_settled(&mut self) -> Result<()> {
        if self.settled {
            return Err(SealbidError::AlreadySettled {
                auction_id: self.auction_id,
                bidder: self.bidder,
            });
        }
        self.settled = true;
        Ok(())
    }

    /// Whether this bid is eligible to win against the given reserve.
    #[must_use]
    pub fn qualifies(&self, reserve_price: Decimal) -> bool {
        self.revealed_amount.is_some_and(|a| a >= reserve_price)
    }
}

/// Dummy bid for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Bid {
    /// Create a dummy committed bid with a random secret.
    pub fn dummy(auction_id: AuctionId, bidder: AccountId, deposit: Decimal) -> Self {
        let secret = format!("secret-{}", rand::random::<u64>());
        Self::new(
            auction_id,
            bidder,
            Commitment::compute(deposit, &secret),
            deposit,
            Utc::now(),
        )
    }
}
