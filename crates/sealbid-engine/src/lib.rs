//! # sealbid-engine
//!
//! **Auction Engine**: the auction registry, the commit-reveal protocol,
//! time-window enforcement, winner determination, and finalize/settle.
//!
//! ## Architecture
//!
//! The engine owns two pieces of state and drives one collaborator:
//! 1. **`AuctionBook`**: arena of auctions plus a secondary bid map keyed
//!    by (auction, bidder)
//! 2. **`EscrowLedger`** (from `sealbid-escrow`): deposit custody
//! 3. **`TokenTransfer` / `Clock`**: external collaborators passed into
//!    each operation — the engine keeps no timers and touches no balances
//!    directly
//!
//! ## Protocol Flow
//!
//! ```text
//! create_auction → submit_bid* (escrow.deposit) → reveal_bid*
//!     → determine_winner → finalize_auction (escrow.settle + refunds)
//! ```
//!
//! Operations on a single auction are linearized by `&mut self`; distinct
//! auctions are independent arena entries.

pub mod book;
pub mod engine;

pub use book::AuctionBook;
pub use engine::AuctionEngine;
