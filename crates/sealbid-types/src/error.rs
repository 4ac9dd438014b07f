//! Error types for the SealBid auction engine.
//!
//! All errors use the `SB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Validation errors
//! - 2xx: Timing errors
//! - 3xx: Commitment errors
//! - 4xx: State errors
//! - 5xx: Escrow errors
//! - 9xx: General / internal errors

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AccountId, AuctionId, AuctionState};

/// Central error enum for all SealBid operations.
#[derive(Debug, Error)]
pub enum SealbidError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// The requested auction was not found in the registry.
    #[error("SB_ERR_100: Auction not found: {0}")]
    AuctionNotFound(AuctionId),

    /// An auction with this caller-assigned id already exists.
    #[error("SB_ERR_101: Auction already exists: {0}")]
    DuplicateAuction(AuctionId),

    /// The bidder already has a bid on this auction (one per bidder).
    #[error("SB_ERR_102: Duplicate bid by {bidder} on {auction_id}")]
    DuplicateBid {
        auction_id: AuctionId,
        bidder: AccountId,
    },

    /// The caller is not the seller of this auction.
    #[error("SB_ERR_103: Caller {caller} is not the seller of {auction_id}")]
    NotSeller {
        auction_id: AuctionId,
        caller: AccountId,
    },

    /// Reserve price must be a non-negative amount.
    #[error("SB_ERR_104: Invalid reserve price: {0}")]
    InvalidReserve(Decimal),

    /// Bidding and reveal durations must both be positive.
    #[error("SB_ERR_105: Auction durations must be positive")]
    InvalidDuration,

    /// A deposit must be a positive amount.
    #[error("SB_ERR_106: Invalid deposit amount: {0}")]
    InvalidDeposit(Decimal),

    /// No bid exists for this (auction, bidder) pair.
    #[error("SB_ERR_107: No bid by {bidder} on {auction_id}")]
    BidNotFound {
        auction_id: AuctionId,
        bidder: AccountId,
    },

    // =================================================================
    // Timing Errors (2xx)
    // =================================================================
    /// The bidding window has closed for this auction.
    #[error("SB_ERR_200: Bidding closed for {auction_id} (deadline was {deadline})")]
    BiddingClosed {
        auction_id: AuctionId,
        deadline: DateTime<Utc>,
    },

    /// A reveal was attempted outside [bidding_deadline, reveal_deadline).
    #[error("SB_ERR_201: Outside reveal window for {auction_id} ({opens} .. {closes})")]
    OutsideRevealWindow {
        auction_id: AuctionId,
        opens: DateTime<Utc>,
        closes: DateTime<Utc>,
    },

    /// The operation's time window has not opened yet.
    #[error("SB_ERR_202: Too early for {auction_id}: window opens at {opens}")]
    TooEarly {
        auction_id: AuctionId,
        opens: DateTime<Utc>,
    },

    // =================================================================
    // Commitment Errors (3xx)
    // =================================================================
    /// The revealed (amount, secret) does not hash to the stored commitment.
    /// The deposit is not forfeited — it is refunded at finalize.
    #[error("SB_ERR_300: Reveal does not match commitment by {bidder} on {auction_id}")]
    InvalidReveal {
        auction_id: AuctionId,
        bidder: AccountId,
    },

    /// The bid has already been revealed (a bid can reveal at most once).
    #[error("SB_ERR_301: Bid already revealed by {bidder} on {auction_id}")]
    AlreadyRevealed {
        auction_id: AuctionId,
        bidder: AccountId,
    },

    /// The revealed amount does not equal the escrowed deposit.
    #[error("SB_ERR_302: Revealed amount {revealed} does not equal deposit {deposit}")]
    DepositMismatch { revealed: Decimal, deposit: Decimal },

    // =================================================================
    // State Errors (4xx)
    // =================================================================
    /// The operation is invalid for the auction's current state.
    #[error("SB_ERR_400: Invalid state for {auction_id}: expected {expected}, got {actual}")]
    InvalidState {
        auction_id: AuctionId,
        expected: AuctionState,
        actual: AuctionState,
    },

    /// The auction has already been finalized (settlement runs exactly once).
    #[error("SB_ERR_401: Auction already finalized: {0}")]
    AlreadyFinalized(AuctionId),

    /// Finalize was called before a winner was determined.
    #[error("SB_ERR_402: Winner not yet determined for {0}")]
    NotDetermined(AuctionId),

    /// The auction was cancelled — a terminal state.
    #[error("SB_ERR_403: Auction cancelled: {0}")]
    Cancelled(AuctionId),

    /// An auction with committed bids cannot be cancelled.
    #[error("SB_ERR_404: Cannot cancel {0}: bids already committed")]
    CancelWithBids(AuctionId),

    // =================================================================
    // Escrow Errors (5xx)
    // =================================================================
    /// Not enough token balance to fund the deposit.
    #[error("SB_ERR_500: Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },

    /// The underlying token transfer primitive rejected the transfer.
    #[error("SB_ERR_501: Token transfer failed: {reason}")]
    TransferFailed { reason: String },

    /// No escrowed deposit exists for this (auction, bidder) pair,
    /// or it was already released.
    #[error("SB_ERR_502: Nothing escrowed for {bidder} on {auction_id}")]
    NothingEscrowed {
        auction_id: AuctionId,
        bidder: AccountId,
    },

    /// The deposit was already paid out (double refund/settlement guard).
    #[error("SB_ERR_503: Deposit already settled for {bidder} on {auction_id}")]
    AlreadySettled {
        auction_id: AuctionId,
        bidder: AccountId,
    },

    /// The settlement amount does not match the held deposit.
    #[error("SB_ERR_504: Settlement amount {requested} does not match held deposit {held}")]
    AmountMismatch { requested: Decimal, held: Decimal },

    /// Escrow conservation invariant violated — critical safety alert.
    #[error("SB_ERR_505: Escrow conservation violation: {reason}")]
    ConservationViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("SB_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SealbidError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = SealbidError::AuctionNotFound(AuctionId(9));
        let msg = format!("{err}");
        assert!(msg.starts_with("SB_ERR_100"), "Got: {msg}");
    }

    #[test]
    fn insufficient_funds_display() {
        let err = SealbidError::InsufficientFunds {
            needed: Decimal::new(100, 0),
            available: Decimal::new(50, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("SB_ERR_500"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn invalid_state_display() {
        let err = SealbidError::InvalidState {
            auction_id: AuctionId(1),
            expected: AuctionState::Created,
            actual: AuctionState::Finalized,
        };
        let msg = format!("{err}");
        assert!(msg.contains("SB_ERR_400"));
        assert!(msg.contains("CREATED"));
        assert!(msg.contains("FINALIZED"));
    }

    #[test]
    fn all_errors_have_sb_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(SealbidError::DuplicateAuction(AuctionId(1))),
            Box::new(SealbidError::InvalidDuration),
            Box::new(SealbidError::AlreadyFinalized(AuctionId(1))),
            Box::new(SealbidError::NotDetermined(AuctionId(1))),
            Box::new(SealbidError::Internal("test".into())),
            Box::new(SealbidError::DepositMismatch {
                revealed: Decimal::ONE,
                deposit: Decimal::TWO,
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("SB_ERR_"),
                "Error missing SB_ERR_ prefix: {msg}"
            );
        }
    }
}
