//! Auction model for the SealBid engine.
//!
//! The stored [`AuctionState`] carries only the transitions that settlement
//! depends on: `Created → Determined → Finalized`, plus the terminal
//! `Cancelled` branch. The bidding and reveal phases are **time-derived**
//! as an [`AuctionPhase`] computed from `(state, now, deadlines)` — they are
//! never stored, so clock and state cannot drift apart.

use std::{fmt, time::Duration};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, AuctionId, Result, SealbidError};

/// Stored lifecycle state of an auction.
///
/// Transitions are **monotonic** (never go backwards):
/// - `Created → Determined` (reveal window closed, winner computed)
/// - `Determined → Finalized` (funds settled and refunded)
/// - `Created → Cancelled` (seller cancelled before any bid committed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuctionState {
    /// Listed. Bidding and reveal windows are derived from the clock.
    Created,
    /// Reveal window closed and the winner (or absence of one) is fixed.
    Determined,
    /// Funds settled and refunded. Terminal; the auction stays queryable.
    Finalized,
    /// Cancelled by the seller before any bid committed. Terminal.
    Cancelled,
}

impl AuctionState {
    /// Can this auction transition to the given target state?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Created, Self::Determined | Self::Cancelled)
                | (Self::Determined, Self::Finalized)
        )
    }
}

impl fmt::Display for AuctionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "CREATED"),
            Self::Determined => write!(f, "DETERMINED"),
            Self::Finalized => write!(f, "FINALIZED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Externally observable phase, computed from `(state, now, deadlines)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuctionPhase {
    /// Commitments are accepted (`now < bidding_deadline`).
    Bidding,
    /// Reveals are accepted (`bidding_deadline <= now < reveal_deadline`).
    Reveal,
    /// Reveal window closed; awaiting winner determination.
    Closed,
    /// Winner fixed; awaiting finalize.
    Determined,
    /// Settled. Terminal.
    Finalized,
    /// Cancelled. Terminal.
    Cancelled,
}

impl fmt::Display for AuctionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bidding => write!(f, "BIDDING"),
            Self::Reveal => write!(f, "REVEAL"),
            Self::Closed => write!(f, "CLOSED"),
            Self::Determined => write!(f, "DETERMINED"),
            Self::Finalized => write!(f, "FINALIZED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// The winning bid fixed by determination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    /// The bidder whose reveal won.
    pub bidder: AccountId,
    /// The winning revealed amount.
    pub amount: Decimal,
}

/// A single-item sealed-bid auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Auction {
    /// Caller-assigned identifier.
    pub id: AuctionId,
    /// The account that listed the auction. Sole authority to cancel;
    /// not required to trigger determination or finalize.
    pub seller: AccountId,
    /// Minimum revealed amount eligible to win.
    pub reserve_price: Decimal,
    /// When the auction was listed.
    pub created_at: DateTime<Utc>,
    /// End of the commitment window (`created_at + bidding_duration`).
    pub bidding_deadline: DateTime<Utc>,
    /// End of the reveal window (`bidding_deadline + reveal_duration`).
    pub reveal_deadline: DateTime<Utc>,
    /// Stored lifecycle state. Bidding/reveal phases are time-derived.
    pub state: AuctionState,
    /// Set by determination. `None` means no reveal met the reserve.
    pub winner: Option<Winner>,
}

impl Auction {
    /// Open a new auction, computing both deadlines from the durations.
    ///
    /// # Errors
    /// - [`SealbidError::InvalidReserve`] if `reserve_price` is negative
    /// - [`SealbidError::InvalidDuration`] if either duration is zero or
    ///   does not fit a chrono duration
    pub fn open(
        id: AuctionId,
        seller: AccountId,
        reserve_price: Decimal,
        created_at: DateTime<Utc>,
        bidding_duration: Duration,
        reveal_duration: Duration,
    ) -> Result<Self> {
        if reserve_price.is_sign_negative() {
            return Err(SealbidError::InvalidReserve(reserve_price));
        }
        if bidding_duration.is_zero() || reveal_duration.is_zero() {
            return Err(SealbidError::InvalidDuration);
        }
        let bidding =
            chrono::Duration::from_std(bidding_duration).map_err(|_| SealbidError::InvalidDuration)?;
        let reveal =
            chrono::Duration::from_std(reveal_duration).map_err(|_| SealbidError::InvalidDuration)?;

        let bidding_deadline = created_at + bidding;
        let reveal_deadline = bidding_deadline + reveal;

        Ok(Self {
            id,
            seller,
            reserve_price,
            created_at,
            bidding_deadline,
            reveal_deadline,
            state: AuctionState::Created,
            winner: None,
        })
    }

    /// The observable phase at time `now`.
    #[must_use]
    pub fn phase(&self, now: DateTime<Utc>) -> AuctionPhase {
        match self.state {
            AuctionState::Created => {
                if now < self.bidding_deadline {
                    AuctionPhase::Bidding
                } else if now < self.reveal_deadline {
                    AuctionPhase::Reveal
                } else {
                    AuctionPhase::Closed
                }
            }
            AuctionState::Determined => AuctionPhase::Determined,
            AuctionState::Finalized => AuctionPhase::Finalized,
            AuctionState::Cancelled => AuctionPhase::Cancelled,
        }
    }

    /// Whether commitments are accepted at time `now`.
    #[must_use]
    pub fn bidding_open(&self, now: DateTime<Utc>) -> bool {
        self.state == AuctionState::Created && now < self.bidding_deadline
    }

    /// Whether reveals are accepted at time `now`.
    #[must_use]
    pub fn in_reveal_window(&self, now: DateTime<Utc>) -> bool {
        self.state == AuctionState::Created
            && now >= self.bidding_deadline
            && now < self.reveal_deadline
    }

    /// Whether the reveal window has closed at time `now`.
    #[must_use]
    pub fn reveal_closed(&self, now: DateTime<Utc>) -> bool {
        now >= self.reveal_deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    fn make_auction() -> Auction {
        Auction::open(
            AuctionId(1),
            AccountId::new(),
            Decimal::new(10, 0),
            t0(),
            Duration::from_secs(3600),
            Duration::from_secs(1800),
        )
        .unwrap()
    }

    #[test]
    fn open_computes_deadlines() {
        let a = make_auction();
        assert_eq!(a.bidding_deadline, t0() + chrono::Duration::seconds(3600));
        assert_eq!(a.reveal_deadline, t0() + chrono::Duration::seconds(5400));
        assert_eq!(a.state, AuctionState::Created);
        assert!(a.winner.is_none());
    }

    #[test]
    fn open_rejects_negative_reserve() {
        let err = Auction::open(
            AuctionId(1),
            AccountId::new(),
            Decimal::new(-1, 0),
            t0(),
            Duration::from_secs(3600),
            Duration::from_secs(1800),
        )
        .unwrap_err();
        assert!(matches!(err, SealbidError::InvalidReserve(_)));
    }

    #[test]
    fn open_accepts_zero_reserve() {
        let a = Auction::open(
            AuctionId(1),
            AccountId::new(),
            Decimal::ZERO,
            t0(),
            Duration::from_secs(1),
            Duration::from_secs(1),
        );
        assert!(a.is_ok());
    }

    #[test]
    fn open_rejects_zero_durations() {
        for (bidding, reveal) in [(0, 1800), (3600, 0), (0, 0)] {
            let err = Auction::open(
                AuctionId(1),
                AccountId::new(),
                Decimal::TEN,
                t0(),
                Duration::from_secs(bidding),
                Duration::from_secs(reveal),
            )
            .unwrap_err();
            assert!(matches!(err, SealbidError::InvalidDuration));
        }
    }

    #[test]
    fn state_transitions_valid() {
        assert!(AuctionState::Created.can_transition_to(AuctionState::Determined));
        assert!(AuctionState::Created.can_transition_to(AuctionState::Cancelled));
        assert!(AuctionState::Determined.can_transition_to(AuctionState::Finalized));
    }

    #[test]
    fn state_transitions_invalid() {
        assert!(!AuctionState::Created.can_transition_to(AuctionState::Finalized));
        assert!(!AuctionState::Determined.can_transition_to(AuctionState::Created));
        assert!(!AuctionState::Determined.can_transition_to(AuctionState::Cancelled));
        assert!(!AuctionState::Finalized.can_transition_to(AuctionState::Determined));
        assert!(!AuctionState::Cancelled.can_transition_to(AuctionState::Created));
    }

    #[test]
    fn phase_is_time_derived() {
        let a = make_auction();
        assert_eq!(a.phase(t0()), AuctionPhase::Bidding);
        assert_eq!(
            a.phase(t0() + chrono::Duration::seconds(3599)),
            AuctionPhase::Bidding
        );
        assert_eq!(
            a.phase(t0() + chrono::Duration::seconds(3600)),
            AuctionPhase::Reveal
        );
        assert_eq!(
            a.phase(t0() + chrono::Duration::seconds(5399)),
            AuctionPhase::Reveal
        );
        assert_eq!(
            a.phase(t0() + chrono::Duration::seconds(5400)),
            AuctionPhase::Closed
        );
    }

    #[test]
    fn phase_follows_stored_state() {
        let mut a = make_auction();
        a.state = AuctionState::Determined;
        assert_eq!(a.phase(t0()), AuctionPhase::Determined);
        a.state = AuctionState::Finalized;
        assert_eq!(a.phase(t0()), AuctionPhase::Finalized);
        a.state = AuctionState::Cancelled;
        assert_eq!(a.phase(t0()), AuctionPhase::Cancelled);
    }

    #[test]
    fn window_predicates_at_boundaries() {
        let a = make_auction();
        let deadline = a.bidding_deadline;
        assert!(a.bidding_open(deadline - chrono::Duration::seconds(1)));
        assert!(!a.bidding_open(deadline));
        assert!(a.in_reveal_window(deadline));
        assert!(!a.in_reveal_window(a.reveal_deadline));
        assert!(a.reveal_closed(a.reveal_deadline));
    }

    #[test]
    fn state_display() {
        assert_eq!(format!("{}", AuctionState::Created), "CREATED");
        assert_eq!(format!("{}", AuctionState::Determined), "DETERMINED");
        assert_eq!(format!("{}", AuctionState::Finalized), "FINALIZED");
        assert_eq!(format!("{}", AuctionState::Cancelled), "CANCELLED");
    }

    #[test]
    fn serde_roundtrip() {
        let a = make_auction();
        let json = serde_json::to_string(&a).unwrap();
        let back: Auction = serde_json::from_str(&json).unwrap();
        assert_eq!(a.id, back.id);
        assert_eq!(a.reserve_price, back.reserve_price);
        assert_eq!(a.state, back.state);
        assert_eq!(a.reveal_deadline, back.reveal_deadline);
    }
}
