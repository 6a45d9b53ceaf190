//! Rarity-weight, odds-improvement, and token-emission formulas.
//!
//! These are the platform's business rules expressed as literal constants and
//! explicit step functions. Adjustments are ordered pipelines of pure
//! functions so the compounding order is visible and individually testable;
//! reordering any step changes the numeric result and is a breaking change.
//!
//! All arithmetic is integer with truncating division.

use std::fmt;

/// Base probability weights by rarity tier (1..=4), proportioned 50/30/15/5.
pub const TIER_BASE_WEIGHTS: [u64; 4] = [5_000, 3_000, 1_500, 500];

/// Sum of the base weights; also the ceiling for any adjusted weight.
pub const TOTAL_WEIGHT: u64 = 10_000;

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// One whole reward token in base units (18 decimals). Burn-derived bonuses
/// are granted per whole token burned.
pub const BURN_UNIT: u128 = 1_000_000_000_000_000_000;

/// Venue performance score above which emission gets +10%.
pub const VENUE_PERFORMANCE_HIGH: u64 = 1_000;
/// Venue performance score above which emission gets +5%.
pub const VENUE_PERFORMANCE_MID: u64 = 500;

/// Loyalty (lifetime plays) above which emission gets +8%.
pub const LOYALTY_HIGH: u64 = 100;
/// Loyalty above which emission gets +4%.
pub const LOYALTY_MID: u64 = 50;
/// Loyalty above which emission gets +2%.
pub const LOYALTY_LOW: u64 = 20;

/// Error during odds calculations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OddsError {
    /// Rarity tier outside 1..=4.
    InvalidRarity(u8),
}

impl fmt::Display for OddsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRarity(tier) => write!(f, "invalid rarity tier: {tier} (valid 1..=4)"),
        }
    }
}

impl std::error::Error for OddsError {}

/// Base weight for a rarity tier, before burn adjustments.
pub fn tier_base_weight(rarity_tier: u8) -> Result<u64, OddsError> {
    match rarity_tier {
        1..=4 => Ok(TIER_BASE_WEIGHTS[usize::from(rarity_tier) - 1]),
        other => Err(OddsError::InvalidRarity(other)),
    }
}

/// Adjusted probability weight for one item.
///
/// The improvement is `(burned / BURN_UNIT) * base_improvement_factor`,
/// capped at half the tier's base weight. For rare tiers (3-4) it is added;
/// for common tiers (1-2) it is subtracted at one-quarter rate. The asymmetry
/// is intentional: burning currency biases outcomes toward rarer prizes, not
/// toward any prize.
pub fn item_probability(
    rarity_tier: u8,
    burned_amount: u128,
    base_improvement_factor: u64,
) -> Result<u64, OddsError> {
    let base = tier_base_weight(rarity_tier)?;

    let burn_units = u64::try_from(burned_amount / BURN_UNIT).unwrap_or(u64::MAX);
    let improvement = burn_units
        .saturating_mul(base_improvement_factor)
        .min(base / 2);

    let weight = match rarity_tier {
        3 | 4 => base.saturating_add(improvement),
        _ => base.saturating_sub(improvement / 4),
    };
    Ok(weight.min(TOTAL_WEIGHT))
}

/// Frequency bonus step, in percent, for a burn event count.
fn frequency_bonus_pct(burn_event_count: u32) -> u64 {
    if burn_event_count > 50 {
        25
    } else if burn_event_count > 20 {
        15
    } else if burn_event_count > 10 {
        10
    } else if burn_event_count > 5 {
        5
    } else {
        0
    }
}

/// Odds improvement earned by a player's burn history.
///
/// One unit per whole token burned, boosted by the frequency bonus, capped at
/// `max_improvement`. Monotonic non-decreasing in both inputs up to the cap.
pub fn odds_improvement(burned_amount: u128, burn_event_count: u32, max_improvement: u64) -> u64 {
    let base = u64::try_from(burned_amount / BURN_UNIT).unwrap_or(u64::MAX);
    let bonus_pct = frequency_bonus_pct(burn_event_count);
    let improved = base.saturating_mul(100 + bonus_pct) / 100;
    improved.min(max_improvement)
}

/// Venue-performance step of the emission pipeline.
fn apply_venue_bonus(amount: u64, venue_performance: u64) -> u64 {
    if venue_performance > VENUE_PERFORMANCE_HIGH {
        amount.saturating_mul(110) / 100
    } else if venue_performance > VENUE_PERFORMANCE_MID {
        amount.saturating_mul(105) / 100
    } else {
        amount
    }
}

/// Loyalty step of the emission pipeline.
fn apply_loyalty_bonus(amount: u64, player_loyalty: u64) -> u64 {
    if player_loyalty > LOYALTY_HIGH {
        amount.saturating_mul(108) / 100
    } else if player_loyalty > LOYALTY_MID {
        amount.saturating_mul(104) / 100
    } else if player_loyalty > LOYALTY_LOW {
        amount.saturating_mul(102) / 100
    } else {
        amount
    }
}

/// Reward-currency emission for a losing draw.
///
/// `base = play_price * emission_rate_bps / 10_000`, then the venue bonus and
/// the loyalty bonus are applied in that order, each compounding on the
/// running amount rather than the original base. The order is a contract.
pub fn token_emission(
    play_price: u64,
    venue_performance: u64,
    player_loyalty: u64,
    emission_rate_bps: u64,
) -> u64 {
    let base = play_price.saturating_mul(emission_rate_bps) / BPS_DENOMINATOR;
    let with_venue = apply_venue_bonus(base, venue_performance);
    apply_loyalty_bonus(with_venue, player_loyalty)
}
