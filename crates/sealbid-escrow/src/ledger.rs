//! Escrow ledger — custody of bidder deposits per auction.
//!
//! The ledger credits a deposit exactly once at commit and debits it exactly
//! once at refund or settlement. It does not deduplicate deposits — the
//! engine's one-bid-per-bidder guard is what makes a repeat deposit
//! unreachable through the public protocol.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sealbid_types::{AccountId, AuctionId, DepositReceipt, Result, SealbidError};

use crate::conservation::ConservationTracker;
use crate::token::TokenTransfer;

/// Per-(auction, bidder) deposit custody.
///
/// Funds live in the token primitive under the ledger's `custody` account;
/// the ledger's maps record who they belong to. Every operation performs
/// the external transfer first and mutates ledger state only on success.
pub struct EscrowLedger {
    /// The account holding escrowed funds in the token primitive.
    custody: AccountId,
    /// Deposits currently held, keyed by (auction, bidder).
    held: HashMap<(AuctionId, AccountId), Decimal>,
    /// Per-auction conservation totals.
    conservation: ConservationTracker,
}

impl EscrowLedger {
    /// Create a ledger custodying funds under the given account.
    #[must_use]
    pub fn new(custody: AccountId) -> Self {
        Self {
            custody,
            held: HashMap::new(),
            conservation: ConservationTracker::new(),
        }
    }

    /// Pull `amount` from the bidder into custody.
    ///
    /// Repeat deposits for the same (auction, bidder) accumulate; the
    /// caller is responsible for idempotency.
    ///
    /// # Errors
    /// - [`SealbidError::InvalidDeposit`] if `amount` is not positive
    /// - [`SealbidError::InsufficientFunds`] / [`SealbidError::TransferFailed`]
    ///   from the transfer primitive — ledger state is unchanged
    pub fn deposit(
        &mut self,
        token: &mut impl TokenTransfer,
        auction_id: AuctionId,
        bidder: AccountId,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<DepositReceipt> {
        if amount <= Decimal::ZERO {
            return Err(SealbidError::InvalidDeposit(amount));
        }

        // Transfer first; the ledger only records custody it actually has.
        token.transfer(bidder, self.custody, amount)?;

        *self
            .held
            .entry((auction_id, bidder))
            .or_insert(Decimal::ZERO) += amount;
        self.conservation.record_deposit(auction_id, amount);

        tracing::debug!(
            auction = %auction_id,
            bidder = %bidder,
            amount = %amount,
            "Deposit escrowed"
        );
        Ok(DepositReceipt::issue(auction_id, bidder, amount, now))
    }

    /// Release the bidder's full held deposit back to them.
    ///
    /// # Errors
    /// - [`SealbidError::NothingEscrowed`] if no deposit is held (or it was
    ///   already released)
    /// - transfer errors from the primitive — ledger state is unchanged
    pub fn refund(
        &mut self,
        token: &mut impl TokenTransfer,
        auction_id: AuctionId,
        bidder: AccountId,
    ) -> Result<Decimal> {
        let key = (auction_id, bidder);
        let amount = self
            .held
            .get(&key)
            .copied()
            .filter(|a| *a > Decimal::ZERO)
            .ok_or(SealbidError::NothingEscrowed { auction_id, bidder })?;

        token.transfer(self.custody, bidder, amount)?;

        self.held.remove(&key);
        self.conservation.record_refund(auction_id, amount);

        tracing::debug!(
            auction = %auction_id,
            bidder = %bidder,
            amount = %amount,
            "Deposit refunded"
        );
        Ok(amount)
    }

    /// Pay `amount` out of the named bidder's held deposit to `payee`.
    ///
    /// Used exactly once per auction, for the winning bid only. The funding
    /// bidder is named explicitly so their entry is debited exactly once.
    ///
    /// # Errors
    /// - [`SealbidError::NothingEscrowed`] if no deposit is held
    /// - [`SealbidError::AmountMismatch`] if `amount` differs from the held
    ///   deposit
    /// - transfer errors from the primitive — ledger state is unchanged
    pub fn settle(
        &mut self,
        token: &mut impl TokenTransfer,
        auction_id: AuctionId,
        bidder: AccountId,
        payee: AccountId,
        amount: Decimal,
    ) -> Result<()> {
        let key = (auction_id, bidder);
        let held = self
            .held
            .get(&key)
            .copied()
            .filter(|a| *a > Decimal::ZERO)
            .ok_or(SealbidError::NothingEscrowed { auction_id, bidder })?;

        if held != amount {
            return Err(SealbidError::AmountMismatch {
                requested: amount,
                held,
            });
        }

        token.transfer(self.custody, payee, amount)?;

        self.held.remove(&key);
        self.conservation.record_settlement(auction_id, amount);

        tracing::info!(
            auction = %auction_id,
            bidder = %bidder,
            payee = %payee,
            amount = %amount,
            "Deposit settled"
        );
        Ok(())
    }

    /// Amount currently held for a (auction, bidder) pair.
    #[must_use]
    pub fn held(&self, auction_id: AuctionId, bidder: AccountId) -> Decimal {
        self.held
            .get(&(auction_id, bidder))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Total amount currently held against an auction.
    #[must_use]
    pub fn auction_total(&self, auction_id: AuctionId) -> Decimal {
        self.held
            .iter()
            .filter(|((a, _), _)| *a == auction_id)
            .map(|(_, amount)| *amount)
            .sum()
    }

    /// Check the conservation invariant for an auction:
    /// `deposited == held + refunded + settled`.
    ///
    /// # Errors
    /// Returns [`SealbidError::ConservationViolation`] on imbalance.
    pub fn verify_conservation(&self, auction_id: AuctionId) -> Result<()> {
        self.conservation
            .verify(auction_id, self.auction_total(auction_id))
    }

    /// The conservation totals, for audit queries.
    #[must_use]
    pub fn conservation(&self) -> &ConservationTracker {
        &self.conservation
    }

    /// The custody account this ledger holds funds under.
    #[must_use]
    pub fn custody(&self) -> AccountId {
        self.custody
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::InMemoryToken;

    fn setup() -> (EscrowLedger, InMemoryToken, AccountId) {
        let custody = AccountId::new();
        let ledger = EscrowLedger::new(custody);
        let token = InMemoryToken::new();
        (ledger, token, custody)
    }

    fn funded_bidder(token: &mut InMemoryToken, amount: Decimal) -> AccountId {
        let bidder = AccountId::new();
        token.mint(bidder, amount);
        bidder
    }

    #[test]
    fn deposit_moves_funds_into_custody() {
        let (mut ledger, mut token, custody) = setup();
        let bidder = funded_bidder(&mut token, Decimal::new(100, 0));

        let receipt = ledger
            .deposit(&mut token, AuctionId(1), bidder, Decimal::new(40, 0), Utc::now())
            .unwrap();

        assert_eq!(token.balance_of(bidder), Decimal::new(60, 0));
        assert_eq!(token.balance_of(custody), Decimal::new(40, 0));
        assert_eq!(ledger.held(AuctionId(1), bidder), Decimal::new(40, 0));
        assert!(receipt.verify());
        assert_eq!(receipt.amount, Decimal::new(40, 0));
    }

    #[test]
    fn deposit_insufficient_leaves_ledger_unchanged() {
        let (mut ledger, mut token, custody) = setup();
        let bidder = funded_bidder(&mut token, Decimal::new(10, 0));

        let err = ledger
            .deposit(&mut token, AuctionId(1), bidder, Decimal::new(40, 0), Utc::now())
            .unwrap_err();
        assert!(matches!(err, SealbidError::InsufficientFunds { .. }));

        assert_eq!(token.balance_of(bidder), Decimal::new(10, 0));
        assert_eq!(token.balance_of(custody), Decimal::ZERO);
        assert_eq!(ledger.held(AuctionId(1), bidder), Decimal::ZERO);
        ledger.verify_conservation(AuctionId(1)).unwrap();
    }

    #[test]
    fn deposit_rejects_non_positive_amounts() {
        let (mut ledger, mut token, _) = setup();
        let bidder = funded_bidder(&mut token, Decimal::new(10, 0));

        for amount in [Decimal::ZERO, Decimal::new(-5, 0)] {
            let err = ledger
                .deposit(&mut token, AuctionId(1), bidder, amount, Utc::now())
                .unwrap_err();
            assert!(matches!(err, SealbidError::InvalidDeposit(_)));
        }
    }

    #[test]
    fn repeat_deposits_accumulate() {
        // The ledger does not deduplicate — idempotency is the engine's job.
        let (mut ledger, mut token, _) = setup();
        let bidder = funded_bidder(&mut token, Decimal::new(100, 0));

        ledger
            .deposit(&mut token, AuctionId(1), bidder, Decimal::new(30, 0), Utc::now())
            .unwrap();
        ledger
            .deposit(&mut token, AuctionId(1), bidder, Decimal::new(20, 0), Utc::now())
            .unwrap();
        assert_eq!(ledger.held(AuctionId(1), bidder), Decimal::new(50, 0));
        ledger.verify_conservation(AuctionId(1)).unwrap();
    }

    #[test]
    fn refund_returns_full_deposit() {
        let (mut ledger, mut token, custody) = setup();
        let bidder = funded_bidder(&mut token, Decimal::new(100, 0));

        ledger
            .deposit(&mut token, AuctionId(1), bidder, Decimal::new(40, 0), Utc::now())
            .unwrap();
        let refunded = ledger.refund(&mut token, AuctionId(1), bidder).unwrap();

        assert_eq!(refunded, Decimal::new(40, 0));
        assert_eq!(token.balance_of(bidder), Decimal::new(100, 0));
        assert_eq!(token.balance_of(custody), Decimal::ZERO);
        assert_eq!(ledger.held(AuctionId(1), bidder), Decimal::ZERO);
        ledger.verify_conservation(AuctionId(1)).unwrap();
    }

    #[test]
    fn double_refund_blocked() {
        let (mut ledger, mut token, _) = setup();
        let bidder = funded_bidder(&mut token, Decimal::new(100, 0));

        ledger
            .deposit(&mut token, AuctionId(1), bidder, Decimal::new(40, 0), Utc::now())
            .unwrap();
        ledger.refund(&mut token, AuctionId(1), bidder).unwrap();

        let err = ledger.refund(&mut token, AuctionId(1), bidder).unwrap_err();
        assert!(matches!(err, SealbidError::NothingEscrowed { .. }));
    }

    #[test]
    fn refund_without_deposit_fails() {
        let (mut ledger, mut token, _) = setup();
        let err = ledger
            .refund(&mut token, AuctionId(1), AccountId::new())
            .unwrap_err();
        assert!(matches!(err, SealbidError::NothingEscrowed { .. }));
    }

    #[test]
    fn settle_pays_the_payee() {
        let (mut ledger, mut token, custody) = setup();
        let bidder = funded_bidder(&mut token, Decimal::new(100, 0));
        let seller = AccountId::new();

        ledger
            .deposit(&mut token, AuctionId(1), bidder, Decimal::new(40, 0), Utc::now())
            .unwrap();
        ledger
            .settle(&mut token, AuctionId(1), bidder, seller, Decimal::new(40, 0))
            .unwrap();

        assert_eq!(token.balance_of(seller), Decimal::new(40, 0));
        assert_eq!(token.balance_of(custody), Decimal::ZERO);
        assert_eq!(ledger.held(AuctionId(1), bidder), Decimal::ZERO);
        ledger.verify_conservation(AuctionId(1)).unwrap();
    }

    #[test]
    fn settle_amount_must_match_held() {
        let (mut ledger, mut token, _) = setup();
        let bidder = funded_bidder(&mut token, Decimal::new(100, 0));
        let seller = AccountId::new();

        ledger
            .deposit(&mut token, AuctionId(1), bidder, Decimal::new(40, 0), Utc::now())
            .unwrap();
        let err = ledger
            .settle(&mut token, AuctionId(1), bidder, seller, Decimal::new(39, 0))
            .unwrap_err();
        assert!(matches!(err, SealbidError::AmountMismatch { .. }));
        // Still held in full.
        assert_eq!(ledger.held(AuctionId(1), bidder), Decimal::new(40, 0));
    }

    #[test]
    fn settled_deposit_cannot_be_refunded() {
        let (mut ledger, mut token, _) = setup();
        let bidder = funded_bidder(&mut token, Decimal::new(100, 0));
        let seller = AccountId::new();

        ledger
            .deposit(&mut token, AuctionId(1), bidder, Decimal::new(40, 0), Utc::now())
            .unwrap();
        ledger
            .settle(&mut token, AuctionId(1), bidder, seller, Decimal::new(40, 0))
            .unwrap();

        let err = ledger.refund(&mut token, AuctionId(1), bidder).unwrap_err();
        assert!(matches!(err, SealbidError::NothingEscrowed { .. }));
    }

    #[test]
    fn auction_total_sums_all_bidders() {
        let (mut ledger, mut token, _) = setup();
        let a = funded_bidder(&mut token, Decimal::new(100, 0));
        let b = funded_bidder(&mut token, Decimal::new(100, 0));

        ledger
            .deposit(&mut token, AuctionId(1), a, Decimal::new(10, 0), Utc::now())
            .unwrap();
        ledger
            .deposit(&mut token, AuctionId(1), b, Decimal::new(20, 0), Utc::now())
            .unwrap();
        ledger
            .deposit(&mut token, AuctionId(2), a, Decimal::new(7, 0), Utc::now())
            .unwrap();

        assert_eq!(ledger.auction_total(AuctionId(1)), Decimal::new(30, 0));
        assert_eq!(ledger.auction_total(AuctionId(2)), Decimal::new(7, 0));
        ledger.verify_conservation(AuctionId(1)).unwrap();
        ledger.verify_conservation(AuctionId(2)).unwrap();
    }
}
