//! Prize inventory snapshots and player draw inputs.
//!
//! These are read-only views supplied by the host per draw. The engine never
//! mutates a [`PrizeItem`]; ownership and custody live with the inventory
//! collaborator.

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Lowest valid rarity tier (common).
pub const RARITY_TIER_MIN: u8 = 1;

/// Highest valid rarity tier (legendary).
pub const RARITY_TIER_MAX: u8 = 4;

/// Invariant violations on draw inputs.
#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum PrizeInvariantError {
    #[error("rarity tier out of range (got={got}, valid={RARITY_TIER_MIN}..={RARITY_TIER_MAX})")]
    InvalidRarity { got: u8 },
}

/// A single prize as seen by the selector: its rarity and whether it can
/// currently be won.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeItem {
    /// Rarity tier, 1 (common) through 4 (legendary).
    pub rarity_tier: u8,
    /// Whether this item may be won in the current draw.
    pub is_eligible: bool,
}

impl PrizeItem {
    /// Create an eligible item of the given rarity.
    pub fn new(rarity_tier: u8) -> Self {
        Self {
            rarity_tier,
            is_eligible: true,
        }
    }

    /// Check the rarity invariant. Out-of-range tiers are a validation
    /// failure, never silently clamped.
    pub fn validate(&self) -> Result<(), PrizeInvariantError> {
        if !(RARITY_TIER_MIN..=RARITY_TIER_MAX).contains(&self.rarity_tier) {
            return Err(PrizeInvariantError::InvalidRarity {
                got: self.rarity_tier,
            });
        }
        Ok(())
    }
}

/// A player's accumulated currency-destruction history.
///
/// Maintained externally; the engine only reads it to bias draw odds toward
/// rarer prizes. Both fields are unsigned by construction so the "never
/// negative" invariant holds for free.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerBurnProfile {
    /// Total reward currency burned, in base token units (18 decimals).
    pub total_burned: u128,
    /// Number of distinct burn events.
    pub burn_event_count: u32,
}

impl PlayerBurnProfile {
    /// Profile for a player with no burn history.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Caller-supplied venue statistics used for quoting draws and emissions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueStats {
    /// Popularity score in 0..=100.
    pub popularity: u8,
    /// Venue performance score (host-defined scale).
    pub performance_score: u64,
    /// Whether the venue's inventory currently contains premium items.
    pub has_premium_items: bool,
}
