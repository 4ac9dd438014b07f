//! Events emitted by the auction engine.
//!
//! Every externally visible transition produces an [`AuctionEvent`] for
//! notification and indexing layers. The engine appends events to an
//! internal log that the embedding application drains.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, AuctionId, Commitment};

/// An externally observable auction transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionEvent {
    /// A seller listed a new auction.
    AuctionCreated {
        auction_id: AuctionId,
        seller: AccountId,
        reserve_price: Decimal,
        bidding_deadline: DateTime<Utc>,
        reveal_deadline: DateTime<Utc>,
    },
    /// A bidder committed to a sealed bid and escrowed a deposit.
    ///
    /// The deposit amount is observable here — the protocol's known
    /// confidentiality gap.
    BidSubmitted {
        auction_id: AuctionId,
        bidder: AccountId,
        commitment: Commitment,
        amount: Decimal,
    },
    /// A bidder successfully revealed a committed bid.
    BidRevealed {
        auction_id: AuctionId,
        bidder: AccountId,
        amount: Decimal,
    },
    /// The seller cancelled an auction before any bid committed.
    AuctionCancelled { auction_id: AuctionId },
    /// The auction settled: winner paid the seller, everyone else refunded.
    /// `winner` is `None` when no reveal met the reserve.
    AuctionFinalized {
        auction_id: AuctionId,
        winner: Option<AccountId>,
        winning_amount: Option<Decimal>,
    },
}

impl AuctionEvent {
    /// The auction this event belongs to.
    #[must_use]
    pub fn auction_id(&self) -> AuctionId {
        match self {
            Self::AuctionCreated { auction_id, .. }
            | Self::BidSubmitted { auction_id, .. }
            | Self::BidRevealed { auction_id, .. }
            | Self::AuctionCancelled { auction_id }
            | Self::AuctionFinalized { auction_id, .. } => *auction_id,
        }
    }
}

impl std::fmt::Display for AuctionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuctionCreated { auction_id, .. } => {
                write!(f, "AUCTION_CREATED {auction_id}")
            }
            Self::BidSubmitted {
                auction_id, bidder, ..
            } => write!(f, "BID_SUBMITTED {auction_id} by {bidder}"),
            Self::BidRevealed {
                auction_id,
                bidder,
                amount,
            } => write!(f, "BID_REVEALED {auction_id} by {bidder} = {amount}"),
            Self::AuctionCancelled { auction_id } => {
                write!(f, "AUCTION_CANCELLED {auction_id}")
            }
            Self::AuctionFinalized {
                auction_id, winner, ..
            } => match winner {
                Some(w) => write!(f, "AUCTION_FINALIZED {auction_id} winner {w}"),
                None => write!(f, "AUCTION_FINALIZED {auction_id} no winner"),
            },
        }
    }
}
