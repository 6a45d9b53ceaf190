//! Weighted random selection over a prize snapshot.
//!
//! Builds a cumulative-weight table over the supplied items (delegating
//! per-item weights to [`crate::odds`]), draws `value = (seed % total) + 1`,
//! and returns the first eligible item in declaration order whose cumulative
//! weight reaches the drawn value.
//!
//! The trailing "first eligible item" fallback is deliberate tie-break
//! behavior, not dead code: it guarantees a result whenever the total weight
//! is positive, including the exact `value == total` boundary.

use crate::entropy::Seed;
use crate::odds::{item_probability, OddsError};
use prizeworks_types::{PlayerBurnProfile, PrizeItem};
use std::fmt;

/// Error during weighted selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// Empty, all-ineligible, or zero-total-weight item set. An expected
    /// business outcome, not a fault: the caller takes the emission path.
    NoEligibleItems,
    /// Zero seed. The combiner never produces one; seeing this indicates an
    /// upstream integrity bug.
    InvalidSeed,
    /// An item carried a rarity tier outside 1..=4.
    InvalidRarity(u8),
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEligibleItems => write!(f, "no eligible items to select from"),
            Self::InvalidSeed => write!(f, "draw seed must be non-zero"),
            Self::InvalidRarity(tier) => write!(f, "invalid rarity tier: {tier} (valid 1..=4)"),
        }
    }
}

impl std::error::Error for SelectError {}

impl From<OddsError> for SelectError {
    fn from(err: OddsError) -> Self {
        match err {
            OddsError::InvalidRarity(tier) => Self::InvalidRarity(tier),
        }
    }
}

/// Select the winning item index for a draw.
///
/// Ineligible items contribute zero weight but keep their slot in the
/// cumulative table, so indices always refer into the caller's array.
pub fn select_item(
    items: &[PrizeItem],
    seed: Seed,
    burn_profile: &PlayerBurnProfile,
    base_improvement_factor: u64,
) -> Result<usize, SelectError> {
    if seed.value() == 0 {
        return Err(SelectError::InvalidSeed);
    }

    let mut weights = Vec::with_capacity(items.len());
    let mut total: u64 = 0;
    for item in items {
        let weight = if item.is_eligible {
            item_probability(
                item.rarity_tier,
                burn_profile.total_burned,
                base_improvement_factor,
            )?
        } else {
            0
        };
        total = total.saturating_add(weight);
        weights.push(weight);
    }

    if total == 0 {
        return Err(SelectError::NoEligibleItems);
    }

    // value in 1..=total.
    let value = (seed.value() % u128::from(total)) as u64 + 1;

    let mut cumulative: u64 = 0;
    for (index, (item, weight)) in items.iter().zip(&weights).enumerate() {
        cumulative = cumulative.saturating_add(*weight);
        if item.is_eligible && cumulative >= value {
            return Ok(index);
        }
    }

    // Tie-break fallback: total > 0 implies at least one eligible item with
    // positive weight exists.
    items
        .iter()
        .position(|item| item.is_eligible)
        .ok_or(SelectError::NoEligibleItems)
}
