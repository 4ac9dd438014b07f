//! The auction engine — commit-reveal state machine over escrowed deposits.
//!
//! Every operation is a single atomic step: guards run first, the external
//! transfer (if any) runs next, and engine state mutates only after the
//! transfer succeeded. Time enters exclusively through the injected
//! [`Clock`]; the engine holds no timers of its own.

use rust_decimal::Decimal;
use sealbid_types::{
    AccountId, Auction, AuctionEvent, AuctionId, AuctionPhase, AuctionState, AuctionTiming, Bid,
    Clock, Commitment, DepositReceipt, Result, SealbidError, Winner,
};

use sealbid_escrow::{EscrowLedger, TokenTransfer};

use crate::book::AuctionBook;

/// The auction engine: registry, protocol guards, and settlement driver.
///
/// Operations on a single auction are linearized by `&mut self`. The token
/// primitive and clock are passed into each call — the engine never reads
/// wall-clock time or moves balances on its own.
pub struct AuctionEngine {
    /// Auction arena plus the secondary bid map.
    book: AuctionBook,
    /// Deposit custody.
    escrow: EscrowLedger,
    /// Pending events, drained by the embedding application.
    events: Vec<AuctionEvent>,
}

impl AuctionEngine {
    /// Create an engine custodying deposits under the given account.
    #[must_use]
    pub fn new(custody: AccountId) -> Self {
        Self {
            book: AuctionBook::new(),
            escrow: EscrowLedger::new(custody),
            events: Vec::new(),
        }
    }

    // =====================================================================
    // createAuction
    // =====================================================================

    /// List a new auction. Deadlines are computed from `timing` at the
    /// current clock reading.
    ///
    /// # Errors
    /// - [`SealbidError::DuplicateAuction`] if `id` is already registered
    /// - [`SealbidError::InvalidReserve`] / [`SealbidError::InvalidDuration`]
    ///   on bad parameters
    pub fn create_auction(
        &mut self,
        clock: &impl Clock,
        id: AuctionId,
        seller: AccountId,
        reserve_price: Decimal,
        timing: AuctionTiming,
    ) -> Result<()> {
        timing.validate()?;
        let auction = Auction::open(
            id,
            seller,
            reserve_price,
            clock.now(),
            timing.bidding_duration,
            timing.reveal_duration,
        )?;
        let bidding_deadline = auction.bidding_deadline;
        let reveal_deadline = auction.reveal_deadline;
        self.book.insert_auction(auction)?;

        tracing::info!(
            auction = %id,
            seller = %seller,
            reserve = %reserve_price,
            bidding_deadline = %bidding_deadline,
            reveal_deadline = %reveal_deadline,
            "Auction created"
        );
        self.events.push(AuctionEvent::AuctionCreated {
            auction_id: id,
            seller,
            reserve_price,
            bidding_deadline,
            reveal_deadline,
        });
        Ok(())
    }

    // =====================================================================
    // cancelAuction
    // =====================================================================

    /// Cancel an auction. Seller only, bidding window still open, and no
    /// bid committed. `Cancelled` is terminal.
    ///
    /// # Errors
    /// - [`SealbidError::NotSeller`] if `caller` did not list the auction
    /// - [`SealbidError::CancelWithBids`] if any bid has committed
    /// - [`SealbidError::BiddingClosed`] once the bidding window has passed
    /// - state errors if the auction already left `Created`
    pub fn cancel_auction(
        &mut self,
        clock: &impl Clock,
        id: AuctionId,
        caller: AccountId,
    ) -> Result<()> {
        let now = clock.now();
        let auction = self.book.auction(id)?;

        if auction.seller != caller {
            return Err(SealbidError::NotSeller {
                auction_id: id,
                caller,
            });
        }
        match auction.state {
            AuctionState::Created => {}
            AuctionState::Cancelled => return Err(SealbidError::Cancelled(id)),
            actual => {
                return Err(SealbidError::InvalidState {
                    auction_id: id,
                    expected: AuctionState::Created,
                    actual,
                });
            }
        }
        if !auction.bidding_open(now) {
            return Err(SealbidError::BiddingClosed {
                auction_id: id,
                deadline: auction.bidding_deadline,
            });
        }
        if self.book.has_bids(id) {
            return Err(SealbidError::CancelWithBids(id));
        }

        self.book.auction_mut(id)?.state = AuctionState::Cancelled;
        tracing::info!(auction = %id, "Auction cancelled");
        self.events
            .push(AuctionEvent::AuctionCancelled { auction_id: id });
        Ok(())
    }

    // =====================================================================
    // submitBid
    // =====================================================================

    /// Commit to a sealed bid, escrowing `deposit`.
    ///
    /// The deposit is pulled through the token primitive before any engine
    /// state changes; a rejected transfer leaves nothing behind.
    ///
    /// # Errors
    /// - [`SealbidError::BiddingClosed`] once `now >= bidding_deadline`
    /// - [`SealbidError::DuplicateBid`] on a second bid by the same bidder
    /// - [`SealbidError::InvalidDeposit`] on a non-positive deposit
    /// - escrow errors from the transfer primitive
    pub fn submit_bid(
        &mut self,
        token: &mut impl TokenTransfer,
        clock: &impl Clock,
        id: AuctionId,
        bidder: AccountId,
        commitment: Commitment,
        deposit: Decimal,
    ) -> Result<DepositReceipt> {
        let now = clock.now();
        let auction = self.book.auction(id)?;

        match auction.state {
            AuctionState::Created => {}
            AuctionState::Cancelled => return Err(SealbidError::Cancelled(id)),
            // Determined/Finalized imply the window is long past.
            _ => {
                return Err(SealbidError::BiddingClosed {
                    auction_id: id,
                    deadline: auction.bidding_deadline,
                });
            }
        }
        if !auction.bidding_open(now) {
            return Err(SealbidError::BiddingClosed {
                auction_id: id,
                deadline: auction.bidding_deadline,
            });
        }
        if deposit <= Decimal::ZERO {
            return Err(SealbidError::InvalidDeposit(deposit));
        }
        if self.book.bid(id, bidder).is_some() {
            return Err(SealbidError::DuplicateBid {
                auction_id: id,
                bidder,
            });
        }

        // Funds move first; the bid is only recorded against held custody.
        let receipt = self.escrow.deposit(token, id, bidder, deposit, now)?;
        self.book
            .insert_bid(Bid::new(id, bidder, commitment, deposit, now))?;

        tracing::debug!(
            auction = %id,
            bidder = %bidder,
            commitment = %commitment,
            deposit = %deposit,
            "Bid submitted"
        );
        self.events.push(AuctionEvent::BidSubmitted {
            auction_id: id,
            bidder,
            commitment,
            amount: deposit,
        });
        Ok(receipt)
    }

    // =====================================================================
    // revealBid
    // =====================================================================

    /// Reveal a committed bid.
    ///
    /// A failed hash check does **not** forfeit the deposit — the bid simply
    /// stays unrevealed and is refunded at finalize. The caller may retry
    /// with corrected parameters while the window is open.
    ///
    /// # Errors
    /// - [`SealbidError::OutsideRevealWindow`] outside
    ///   `[bidding_deadline, reveal_deadline)`
    /// - [`SealbidError::BidNotFound`] if no commitment exists
    /// - [`SealbidError::AlreadyRevealed`] on a second reveal
    /// - [`SealbidError::InvalidReveal`] on hash mismatch
    /// - [`SealbidError::DepositMismatch`] if the revealed amount differs
    ///   from the escrowed deposit
    pub fn reveal_bid(
        &mut self,
        clock: &impl Clock,
        id: AuctionId,
        bidder: AccountId,
        amount: Decimal,
        secret: &str,
    ) -> Result<()> {
        let now = clock.now();
        let auction = self.book.auction(id)?;

        if auction.state == AuctionState::Cancelled {
            return Err(SealbidError::Cancelled(id));
        }
        if !auction.in_reveal_window(now) {
            return Err(SealbidError::OutsideRevealWindow {
                auction_id: id,
                opens: auction.bidding_deadline,
                closes: auction.reveal_deadline,
            });
        }

        let bid = self.book.bid_mut(id, bidder)?;
        if bid.revealed {
            return Err(SealbidError::AlreadyRevealed {
                auction_id: id,
                bidder,
            });
        }
        if !bid.commitment.verify(amount, secret) {
            tracing::debug!(
                auction = %id,
                bidder = %bidder,
                "Invalid reveal blocked: digest mismatch"
            );
            return Err(SealbidError::InvalidReveal {
                auction_id: id,
                bidder,
            });
        }
        if amount != bid.deposit {
            return Err(SealbidError::DepositMismatch {
                revealed: amount,
                deposit: bid.deposit,
            });
        }

        bid.mark_revealed(amount, now)?;

        tracing::debug!(
            auction = %id,
            bidder = %bidder,
            amount = %amount,
            "Bid revealed"
        );
        self.events.push(AuctionEvent::BidRevealed {
            auction_id: id,
            bidder,
            amount,
        });
        Ok(())
    }

    // =====================================================================
    // determineWinner
    // =====================================================================

    /// Fix the winner after the reveal window closes.
    ///
    /// Pure recomputation: safe to call repeatedly until finalize. The
    /// winner is the highest revealed amount at or above the reserve;
    /// ties go to the earliest reveal, then to the lowest bidder id so the
    /// outcome never depends on map iteration order.
    ///
    /// # Errors
    /// - [`SealbidError::TooEarly`] while `now < reveal_deadline`
    /// - [`SealbidError::AlreadyFinalized`] / [`SealbidError::Cancelled`]
    ///   in terminal states
    pub fn determine_winner(
        &mut self,
        clock: &impl Clock,
        id: AuctionId,
    ) -> Result<Option<Winner>> {
        let now = clock.now();
        let auction = self.book.auction(id)?;

        match auction.state {
            AuctionState::Created | AuctionState::Determined => {}
            AuctionState::Finalized => return Err(SealbidError::AlreadyFinalized(id)),
            AuctionState::Cancelled => return Err(SealbidError::Cancelled(id)),
        }
        if !auction.reveal_closed(now) {
            return Err(SealbidError::TooEarly {
                auction_id: id,
                opens: auction.reveal_deadline,
            });
        }
        let reserve_price = auction.reserve_price;

        let mut best: Option<&Bid> = None;
        for bid in self.book.bids_for(id) {
            if !bid.qualifies(reserve_price) {
                continue;
            }
            let better = match best {
                None => true,
                Some(current) => {
                    let (amount, current_amount) = (
                        bid.revealed_amount.unwrap_or(Decimal::ZERO),
                        current.revealed_amount.unwrap_or(Decimal::ZERO),
                    );
                    amount > current_amount
                        || (amount == current_amount && bid.revealed_at < current.revealed_at)
                }
            };
            if better {
                best = Some(bid);
            }
        }
        let winner = best.map(|bid| Winner {
            bidder: bid.bidder,
            amount: bid.revealed_amount.unwrap_or(Decimal::ZERO),
        });

        let auction = self.book.auction_mut(id)?;
        auction.state = AuctionState::Determined;
        auction.winner = winner;

        match winner {
            Some(w) => tracing::info!(
                auction = %id,
                winner = %w.bidder,
                amount = %w.amount,
                "Winner determined"
            ),
            None => tracing::info!(auction = %id, "No qualifying reveal; winner is none"),
        }
        Ok(winner)
    }

    // =====================================================================
    // finalizeAuction
    // =====================================================================

    /// Settle the auction: pay the seller from the winning deposit and
    /// refund every other bidder (revealed or not) in full.
    ///
    /// Payouts run in deterministic bidder order, each flipping the bid's
    /// `settled` latch. If a transfer fails mid-stream, the error surfaces
    /// and the auction stays `Determined`; a retried finalize skips bidders
    /// already paid. The state flips to `Finalized` only after every payout
    /// succeeded.
    ///
    /// # Errors
    /// - [`SealbidError::NotDetermined`] before `determine_winner`
    /// - [`SealbidError::AlreadyFinalized`] on a second call
    /// - escrow errors from the transfer primitive (auction stays
    ///   `Determined`)
    pub fn finalize_auction(
        &mut self,
        token: &mut impl TokenTransfer,
        id: AuctionId,
    ) -> Result<Option<Winner>> {
        let auction = self.book.auction(id)?;
        match auction.state {
            AuctionState::Determined => {}
            AuctionState::Created => return Err(SealbidError::NotDetermined(id)),
            AuctionState::Finalized => return Err(SealbidError::AlreadyFinalized(id)),
            AuctionState::Cancelled => return Err(SealbidError::Cancelled(id)),
        }
        let seller = auction.seller;
        let winner = auction.winner;

        // Winner's deposit pays the seller.
        if let Some(w) = winner {
            let settled = self.book.bid_mut(id, w.bidder)?.settled;
            if !settled {
                self.escrow.settle(token, id, w.bidder, seller, w.amount)?;
                self.book.bid_mut(id, w.bidder)?.mark_settled()?;
            }
        }

        // Everyone else is refunded in full, winner excluded.
        for bidder in self.book.bidders_for(id) {
            if winner.is_some_and(|w| w.bidder == bidder) {
                continue;
            }
            if self.book.bid_mut(id, bidder)?.settled {
                continue;
            }
            self.escrow.refund(token, id, bidder)?;
            self.book.bid_mut(id, bidder)?.mark_settled()?;
        }

        self.book.auction_mut(id)?.state = AuctionState::Finalized;

        tracing::info!(
            auction = %id,
            winner = ?winner.map(|w| w.bidder.to_string()),
            amount = ?winner.map(|w| w.amount.to_string()),
            "Auction finalized"
        );
        self.events.push(AuctionEvent::AuctionFinalized {
            auction_id: id,
            winner: winner.map(|w| w.bidder),
            winning_amount: winner.map(|w| w.amount),
        });
        Ok(winner)
    }

    // =====================================================================
    // Queries
    // =====================================================================

    /// Look up an auction.
    ///
    /// # Errors
    /// Returns [`SealbidError::AuctionNotFound`] if the id is unknown.
    pub fn auction(&self, id: AuctionId) -> Result<&Auction> {
        self.book.auction(id)
    }

    /// Look up a bid, if one exists.
    #[must_use]
    pub fn bid(&self, id: AuctionId, bidder: AccountId) -> Option<&Bid> {
        self.book.bid(id, bidder)
    }

    /// The auction's observable phase at the current clock reading.
    ///
    /// # Errors
    /// Returns [`SealbidError::AuctionNotFound`] if the id is unknown.
    pub fn phase(&self, clock: &impl Clock, id: AuctionId) -> Result<AuctionPhase> {
        Ok(self.book.auction(id)?.phase(clock.now()))
    }

    /// Number of registered auctions (history included).
    #[must_use]
    pub fn auction_count(&self) -> usize {
        self.book.auction_count()
    }

    /// The escrow ledger, for balance and conservation queries.
    #[must_use]
    pub fn escrow(&self) -> &EscrowLedger {
        &self.escrow
    }

    /// Drain the pending event log.
    pub fn take_events(&mut self) -> Vec<AuctionEvent> {
        std::mem::take(&mut self.events)
    }
}
