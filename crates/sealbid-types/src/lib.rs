//! # sealbid-types
//!
//! Shared types, errors, and configuration for the **SealBid** auction engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AuctionId`], [`AccountId`]
//! - **Auction model**: [`Auction`], [`AuctionState`], [`AuctionPhase`], [`Winner`]
//! - **Bid model**: [`Bid`]
//! - **Commitment**: [`Commitment`] — the commit-reveal digest
//! - **Receipt model**: [`DepositReceipt`]
//! - **Event model**: [`AuctionEvent`]
//! - **Configuration**: [`AuctionTiming`]
//! - **Clock**: [`Clock`], [`SystemClock`]
//! - **Errors**: [`SealbidError`] with `SB_ERR_` prefix codes
//! - **Constants**: system-wide defaults

pub mod auction;
pub mod bid;
pub mod clock;
pub mod commitment;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod receipt;

// Re-export all primary types at crate root for ergonomic imports:
//   use sealbid_types::{Auction, Bid, Commitment, SealbidError, ...};

pub use auction::*;
pub use bid::*;
pub use clock::*;
pub use commitment::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use receipt::*;

// Constants are accessed via `sealbid_types::constants::FOO`
// (not re-exported to avoid name collisions).
