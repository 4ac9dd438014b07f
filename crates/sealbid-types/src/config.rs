//! Configuration types for SealBid auctions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Result, SealbidError, constants};

/// Timing parameters for a single auction's windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionTiming {
    /// Length of the commitment window, starting at creation.
    pub bidding_duration: Duration,
    /// Length of the reveal window, starting at the bidding deadline.
    pub reveal_duration: Duration,
}

impl AuctionTiming {
    #[must_use]
    pub fn new(bidding_duration: Duration, reveal_duration: Duration) -> Self {
        Self {
            bidding_duration,
            reveal_duration,
        }
    }

    /// Validate that both windows are non-empty.
    ///
    /// # Errors
    /// Returns [`SealbidError::InvalidDuration`] if either duration is zero.
    pub fn validate(&self) -> Result<()> {
        if self.bidding_duration.is_zero() || self.reveal_duration.is_zero() {
            return Err(SealbidError::InvalidDuration);
        }
        Ok(())
    }

    /// Total time from creation to the end of the reveal window.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.bidding_duration + self.reveal_duration
    }
}

impl Default for AuctionTiming {
    fn default() -> Self {
        Self {
            bidding_duration: Duration::from_secs(constants::DEFAULT_BIDDING_SECS),
            reveal_duration: Duration::from_secs(constants::DEFAULT_REVEAL_SECS),
        }
    }
}
