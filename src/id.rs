//! Short identifiers for new projects, tasks and events.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Number of hex characters in a generated id
pub const ID_LENGTH: usize = 6;

/// Candidates offered before giving up
pub const MAX_ATTEMPTS: usize = 10;

/// Yields candidate ids hashed from a seed, a timestamp and a random nonce.
///
/// Callers check each candidate for collisions and ask for the next one
/// until they find a free id or the generator is exhausted.
pub struct IdGenerator {
    seed: String,
    timestamp: i64,
    attempts: usize,
}

impl IdGenerator {
    pub fn new(seed: &str, at: DateTime<Utc>) -> Self {
        Self {
            seed: seed.to_string(),
            timestamp: at.timestamp_nanos_opt().unwrap_or_else(|| at.timestamp()),
            attempts: 0,
        }
    }

    /// Next candidate, or `None` after [`MAX_ATTEMPTS`] candidates.
    pub fn next_id(&mut self) -> Option<String> {
        if self.attempts >= MAX_ATTEMPTS {
            return None;
        }
        self.attempts += 1;

        let nonce: u64 = rand::random();
        let mut hasher = Sha256::new();
        hasher.update(self.seed.as_bytes());
        hasher.update(self.timestamp.to_le_bytes());
        hasher.update(nonce.to_le_bytes());
        let digest = hasher.finalize();

        let hex: String = digest
            .iter()
            .take(ID_LENGTH.div_ceil(2))
            .map(|b| format!("{:02x}", b))
            .collect();
        Some(hex[..ID_LENGTH].to_string())
    }
}
