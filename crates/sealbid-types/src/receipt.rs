//! Deposit receipts for the SealBid audit trail.
//!
//! Every escrow deposit produces a [`DepositReceipt`] whose payload hash can
//! be independently recomputed, so a bidder can prove what they escrowed
//! without trusting the ledger's internal state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AccountId, AuctionId};

/// Proof that a deposit entered escrow custody.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositReceipt {
    /// The auction the deposit is held against.
    pub auction_id: AuctionId,
    /// The depositing bidder.
    pub bidder: AccountId,
    /// Amount pulled into custody.
    pub amount: Decimal,
    /// SHA-256 hash over (auction_id, bidder, amount).
    pub payload_hash: [u8; 32],
    /// When the deposit was recorded.
    pub issued_at: DateTime<Utc>,
}

impl DepositReceipt {
    /// Issue a receipt, computing the payload hash.
    #[must_use]
    pub fn issue(
        auction_id: AuctionId,
        bidder: AccountId,
        amount: Decimal,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            auction_id,
            bidder,
            amount,
            payload_hash: Self::compute_payload_hash(auction_id, bidder, amount),
            issued_at,
        }
    }

    /// Recompute the payload hash and compare against the stored one.
    #[must_use]
    pub fn verify(&self) -> bool {
        Self::compute_payload_hash(self.auction_id, self.bidder, self.amount) == self.payload_hash
    }

    fn compute_payload_hash(
        auction_id: AuctionId,
        bidder: AccountId,
        amount: Decimal,
    ) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"sealbid:receipt:v1:");
        hasher.update(auction_id.0.to_le_bytes());
        hasher.update(bidder.as_bytes());
        hasher.update(amount.to_string().as_bytes());
        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }
}
