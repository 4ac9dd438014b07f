//! # Commitment — the commit-reveal digest
//!
//! A [`Commitment`] binds a bidder to a `(amount, secret)` pair without
//! revealing either until the reveal phase.
//!
//! ## Canonical encoding
//!
//! The digest is SHA-256 over:
//!
//! ```text
//! "sealbid:commit:v1:" || amount.to_string() || "-" || secret
//! ```
//!
//! where `amount.to_string()` is the canonical `rust_decimal` rendering
//! (no trailing zeros beyond the stored scale, `.` separator). This encoding
//! is part of the protocol: bidders and engine must agree on it, otherwise
//! an honest reveal fails the hash check.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Opaque digest binding a bid `(amount, secret)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(pub [u8; 32]);

impl Commitment {
    /// Compute the commitment for a bid amount and secret.
    #[must_use]
    pub fn compute(amount: Decimal, secret: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"sealbid:commit:v1:");
        hasher.update(amount.to_string().as_bytes());
        hasher.update(b"-");
        hasher.update(secret.as_bytes());
        let result = hasher.finalize();
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&result);
        Self(digest)
    }

    /// Check whether `(amount, secret)` hashes to this commitment.
    #[must_use]
    pub fn verify(&self, amount: Decimal, secret: &str) -> bool {
        Self::compute(amount, secret) == *self
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "commit:{}", hex::encode(&self.0[..8]))
    }
}
