//! Entropy combiner for draw seeds.
//!
//! Folds a monotonic internal counter, the player identity, a venue
//! identifier, and an externally supplied beacon value through SHA-256 into a
//! single wide seed. The counter guarantees that two otherwise-identical
//! requests in the same beacon window still receive distinct seeds: exactly
//! one draw per counter value.
//!
//! ## Determinism
//!
//! Given the same counter value and inputs, `combine` always produces the
//! same seed; unpredictability comes entirely from the beacon, which the host
//! sources (e.g. from a validator randomness beacon). Producing the beacon is
//! out of scope here.
//!
//! ## Zero seeds
//!
//! The all-zero seed is reserved as "absent" downstream, so a mix that lands
//! on zero is remapped to 1. The selector still checks for zero defensively.

use prizeworks_types::AccountId;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};

/// Sentinel a zero mix is remapped to.
pub const ZERO_SEED_SENTINEL: u128 = 1;

/// A non-zero draw seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Seed(u128);

impl Seed {
    /// Wrap a raw mix result, remapping zero to [`ZERO_SEED_SENTINEL`].
    pub fn from_raw(raw: u128) -> Self {
        if raw == 0 {
            Self(ZERO_SEED_SENTINEL)
        } else {
            Self(raw)
        }
    }

    /// The numeric seed value.
    pub fn value(&self) -> u128 {
        self.0
    }
}

/// Stateful seed source with a monotonic draw counter.
///
/// The counter is the only mutable state; it is advanced with a single atomic
/// fetch-and-increment so a genuinely concurrent host still observes exactly
/// one draw per counter value. It is never reset.
#[derive(Debug)]
pub struct EntropyCombiner {
    counter: AtomicU64,
}

impl Default for EntropyCombiner {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropyCombiner {
    /// Create a combiner with the counter at zero.
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Resume a combiner at a persisted counter value (host recovery).
    pub fn resume_at(counter: u64) -> Self {
        Self {
            counter: AtomicU64::new(counter),
        }
    }

    /// Number of seeds issued so far.
    pub fn draws_issued(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    /// Derive a seed and advance the counter.
    ///
    /// `beacon` is the externally supplied unpredictable time-linked signal.
    pub fn combine(&self, player: &AccountId, venue_id: u64, beacon: u64) -> Seed {
        let nonce = self.counter.fetch_add(1, Ordering::SeqCst);

        let mut hasher = Sha256::new();
        hasher.update(nonce.to_be_bytes());
        hasher.update(player.as_bytes());
        hasher.update(venue_id.to_be_bytes());
        hasher.update(beacon.to_be_bytes());
        hasher.update(b"draw_seed"); // Domain separator
        let digest = hasher.finalize();

        let mut wide = [0u8; 16];
        wide.copy_from_slice(&digest[..16]);
        Seed::from_raw(u128::from_be_bytes(wide))
    }
}
