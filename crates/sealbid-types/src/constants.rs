//! System-wide constants for the SealBid auction engine.

/// Default bidding (commitment) window in seconds.
pub const DEFAULT_BIDDING_SECS: u64 = 3600;

/// Default reveal window in seconds.
pub const DEFAULT_REVEAL_SECS: u64 = 1800;

/// Maximum decimal precision for amounts (8 decimal places).
pub const AMOUNT_PRECISION: u32 = 8;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "SealBid";
