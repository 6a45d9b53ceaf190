//! Dynamic draw pricing.
//!
//! The cost of a single draw is the venue base price pushed through a fixed
//! pipeline of multiplicative adjustments: popularity tier, then peak-hour
//! window, then premium-inventory flag. Each step compounds on the running
//! price with truncating integer division, so the step order changes the
//! numeric result and must not be rearranged.

use std::fmt;

/// Seconds in a civil day; `time_of_day` must be below this.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// First hour (inclusive) of the peak-pricing window.
pub const PEAK_HOUR_START: u32 = 18;

/// Last hour (inclusive) of the peak-pricing window.
pub const PEAK_HOUR_END: u32 = 22;

/// Error during draw pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Venue popularity above 100.
    PopularityOutOfRange(u8),
    /// Time of day at or beyond 86_400 seconds.
    TimeOfDayOutOfRange(u32),
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PopularityOutOfRange(got) => {
                write!(f, "venue popularity out of range (got={got}, max=100)")
            }
            Self::TimeOfDayOutOfRange(got) => {
                write!(f, "time of day out of range (got={got}, max={})", SECONDS_PER_DAY - 1)
            }
        }
    }
}

impl std::error::Error for PricingError {}

/// Popularity step: >80 +10%, >60 +5%, <20 -5%, otherwise unchanged.
fn apply_popularity(price: u64, popularity: u8) -> u64 {
    if popularity > 80 {
        price.saturating_mul(110) / 100
    } else if popularity > 60 {
        price.saturating_mul(105) / 100
    } else if popularity < 20 {
        price.saturating_mul(95) / 100
    } else {
        price
    }
}

/// Peak-hour step: +2% when the hour of day falls in [18, 22].
fn apply_peak_hour(price: u64, time_of_day_secs: u32) -> u64 {
    let hour = time_of_day_secs / 3_600;
    if (PEAK_HOUR_START..=PEAK_HOUR_END).contains(&hour) {
        price.saturating_mul(102) / 100
    } else {
        price
    }
}

/// Premium-inventory step: +3% when the venue holds premium items.
fn apply_premium(price: u64, has_premium_items: bool) -> u64 {
    if has_premium_items {
        price.saturating_mul(103) / 100
    } else {
        price
    }
}

/// Price of a single draw.
///
/// Pipeline order is fixed: popularity, peak hour, premium flag.
pub fn play_cost(
    base_price: u64,
    venue_popularity: u8,
    time_of_day_secs: u32,
    has_premium_items: bool,
) -> Result<u64, PricingError> {
    if venue_popularity > 100 {
        return Err(PricingError::PopularityOutOfRange(venue_popularity));
    }
    if time_of_day_secs >= SECONDS_PER_DAY {
        return Err(PricingError::TimeOfDayOutOfRange(time_of_day_secs));
    }

    let price = apply_popularity(base_price, venue_popularity);
    let price = apply_peak_hour(price, time_of_day_secs);
    Ok(apply_premium(price, has_premium_items))
}
