//! Auction registry — an arena keyed by auction id.
//!
//! Auctions are never physically removed: a finalized or cancelled auction
//! stays queryable as history. Bids live in a secondary map keyed by
//! (auction, bidder) for O(1) lookup, independent of auction lifetime.

use std::collections::HashMap;

use sealbid_types::{AccountId, Auction, AuctionId, Bid, Result, SealbidError};

/// Arena of auctions plus the secondary bid map.
#[derive(Debug, Default)]
pub struct AuctionBook {
    /// All auctions ever created, keyed by caller-assigned id.
    auctions: HashMap<AuctionId, Auction>,
    /// At most one bid per (auction, bidder).
    bids: HashMap<(AuctionId, AccountId), Bid>,
}

impl AuctionBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new auction.
    ///
    /// # Errors
    /// Returns [`SealbidError::DuplicateAuction`] if the id is taken.
    pub fn insert_auction(&mut self, auction: Auction) -> Result<()> {
        if self.auctions.contains_key(&auction.id) {
            return Err(SealbidError::DuplicateAuction(auction.id));
        }
        self.auctions.insert(auction.id, auction);
        Ok(())
    }

    /// Look up an auction.
    ///
    /// # Errors
    /// Returns [`SealbidError::AuctionNotFound`] if the id is unknown.
    pub fn auction(&self, id: AuctionId) -> Result<&Auction> {
        self.auctions
            .get(&id)
            .ok_or(SealbidError::AuctionNotFound(id))
    }

    /// Look up an auction mutably.
    ///
    /// # Errors
    /// Returns [`SealbidError::AuctionNotFound`] if the id is unknown.
    pub fn auction_mut(&mut self, id: AuctionId) -> Result<&mut Auction> {
        self.auctions
            .get_mut(&id)
            .ok_or(SealbidError::AuctionNotFound(id))
    }

    /// Register a bid.
    ///
    /// # Errors
    /// Returns [`SealbidError::DuplicateBid`] if the bidder already has a
    /// bid on this auction.
    pub fn insert_bid(&mut self, bid: Bid) -> Result<()> {
        let key = (bid.auction_id, bid.bidder);
        if self.bids.contains_key(&key) {
            return Err(SealbidError::DuplicateBid {
                auction_id: bid.auction_id,
                bidder: bid.bidder,
            });
        }
        self.bids.insert(key, bid);
        Ok(())
    }

    /// Look up a bid, if one exists.
    #[must_use]
    pub fn bid(&self, auction_id: AuctionId, bidder: AccountId) -> Option<&Bid> {
        self.bids.get(&(auction_id, bidder))
    }

    /// Look up a bid mutably.
    ///
    /// # Errors
    /// Returns [`SealbidError::BidNotFound`] if no bid exists.
    pub fn bid_mut(&mut self, auction_id: AuctionId, bidder: AccountId) -> Result<&mut Bid> {
        self.bids
            .get_mut(&(auction_id, bidder))
            .ok_or(SealbidError::BidNotFound { auction_id, bidder })
    }

    /// All bids on an auction, sorted by bidder id.
    ///
    /// The sort makes every scan over the bid set deterministic — results
    /// never depend on map iteration order.
    #[must_use]
    pub fn bids_for(&self, auction_id: AuctionId) -> Vec<&Bid> {
        let mut bids: Vec<&Bid> = self
            .bids
            .iter()
            .filter(|((a, _), _)| *a == auction_id)
            .map(|(_, bid)| bid)
            .collect();
        bids.sort_by_key(|b| b.bidder);
        bids
    }

    /// All bidders on an auction, sorted.
    #[must_use]
    pub fn bidders_for(&self, auction_id: AuctionId) -> Vec<AccountId> {
        self.bids_for(auction_id).iter().map(|b| b.bidder).collect()
    }

    /// Whether any bid has been committed on this auction.
    #[must_use]
    pub fn has_bids(&self, auction_id: AuctionId) -> bool {
        self.bids.keys().any(|(a, _)| *a == auction_id)
    }

    /// Number of registered auctions.
    #[must_use]
    pub fn auction_count(&self) -> usize {
        self.auctions.len()
    }
}
