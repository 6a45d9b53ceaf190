//! Marketplace statistics: fee splits, volume discounts, trend and
//! volatility, and listing desirability scores.
//!
//! Everything here is a pure function over caller-supplied series; nothing is
//! persisted. All arithmetic is integer-only so results are bit-identical
//! across platforms, which matters because hosts cross-check each other's
//! fee math.

use std::fmt;

/// Maximum accepted marketplace fee rate (20%).
pub const MAX_FEE_RATE_BPS: u64 = 2_000;

/// Basis-point denominator.
const BPS_DENOMINATOR: u64 = 10_000;

/// Cumulative-volume thresholds and the fee discount (percent off the base
/// rate) each unlocks. Evaluated top-down; first match wins.
pub const VOLUME_DISCOUNT_SCHEDULE: [(u128, u64); 5] = [
    (1_000_000, 50),
    (500_000, 40),
    (100_000, 30),
    (50_000, 20),
    (10_000, 10),
];

/// Error during analytics calculations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// Fee rate above [`MAX_FEE_RATE_BPS`].
    FeeRateTooHigh { got: u64, max: u64 },
    /// No samples available (empty series or empty time window).
    EmptySeries,
}

impl fmt::Display for AnalyticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FeeRateTooHigh { got, max } => {
                write!(f, "fee rate too high (got={got} bps, max={max} bps)")
            }
            Self::EmptySeries => write!(f, "no price samples in range"),
        }
    }
}

impl std::error::Error for AnalyticsError {}

/// One historical price sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PricePoint {
    pub price: u64,
    pub timestamp: u64,
}

/// A marketplace fee split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeSplit {
    /// Amount retained as fee.
    pub fee: u64,
    /// Amount forwarded to the seller.
    pub net: u64,
}

/// Split a sale price into fee and seller proceeds.
///
/// The fee floor is applied after the rate, and the fee can never exceed the
/// sale price itself.
pub fn fees(sale_price: u64, fee_rate_bps: u64, min_fee: u64) -> Result<FeeSplit, AnalyticsError> {
    if fee_rate_bps > MAX_FEE_RATE_BPS {
        return Err(AnalyticsError::FeeRateTooHigh {
            got: fee_rate_bps,
            max: MAX_FEE_RATE_BPS,
        });
    }
    let fee = (sale_price.saturating_mul(fee_rate_bps) / BPS_DENOMINATOR)
        .max(min_fee)
        .min(sale_price);
    Ok(FeeSplit {
        fee,
        net: sale_price - fee,
    })
}

/// Fee rate after the cumulative-volume discount schedule.
pub fn volume_fee_discount(cumulative_volume: u128, base_fee_bps: u64) -> u64 {
    let discount_pct = VOLUME_DISCOUNT_SCHEDULE
        .iter()
        .find(|(threshold, _)| cumulative_volume >= *threshold)
        .map(|(_, pct)| *pct)
        .unwrap_or(0);
    base_fee_bps - base_fee_bps * discount_pct / 100
}

/// Arithmetic mean of a price series, truncating.
pub fn mean(series: &[PricePoint]) -> Result<u64, AnalyticsError> {
    if series.is_empty() {
        return Err(AnalyticsError::EmptySeries);
    }
    let sum: u128 = series.iter().map(|point| u128::from(point.price)).sum();
    Ok((sum / series.len() as u128) as u64)
}

/// Percentage change from the first to the last sample inside `[from, to]`.
///
/// Signed; a first price of zero yields zero rather than dividing.
pub fn price_change_pct(
    series: &[PricePoint],
    from: u64,
    to: u64,
) -> Result<i64, AnalyticsError> {
    let mut windowed = series
        .iter()
        .filter(|point| point.timestamp >= from && point.timestamp <= to);
    let first = windowed.next().ok_or(AnalyticsError::EmptySeries)?;
    let last = windowed.last().unwrap_or(first);
    if first.price == 0 {
        return Ok(0);
    }
    let delta = i128::from(last.price) - i128::from(first.price);
    Ok((delta * 100 / i128::from(first.price)) as i64)
}

/// Integer square root by Newton iteration.
///
/// Converges deterministically for every input: the iterate strictly
/// decreases until it crosses the true root.
pub fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    // n/2 + 1 >= sqrt(n) for all n >= 2, and unlike (n + 1) / 2 it cannot
    // overflow at u128::MAX.
    let mut x = n;
    let mut next = x / 2 + 1;
    while next < x {
        x = next;
        next = (x + n / x) / 2;
    }
    x
}

/// Population standard deviation as a percentage of the mean.
///
/// A constant series has volatility zero; so does a series whose mean is
/// zero (there is nothing to express the deviation against).
pub fn volatility_pct(series: &[PricePoint]) -> Result<u64, AnalyticsError> {
    let avg = mean(series)?;
    if avg == 0 {
        return Ok(0);
    }
    let avg_wide = u128::from(avg);
    let variance: u128 = series
        .iter()
        .map(|point| {
            let diff = u128::from(point.price).abs_diff(avg_wide);
            diff * diff
        })
        .sum::<u128>()
        / series.len() as u128;
    Ok((isqrt(variance) * 100 / avg_wide) as u64)
}

/// Desirability score for a marketplace listing, clamped to [0, 100].
///
/// Base 50, adjusted for listing age, price competitiveness against the
/// market average, seller reputation, and rarity.
pub fn listing_score(
    age_secs: u64,
    price: u64,
    market_avg_price: u64,
    seller_reputation: u8,
    rarity_tier: u8,
) -> u8 {
    const DAY: u64 = 86_400;
    let mut score: i32 = 50;

    // Fresh listings float up; stale ones sink.
    if age_secs < DAY {
        score += 10;
    } else if age_secs < 7 * DAY {
        score += 5;
    } else if age_secs > 30 * DAY {
        score -= 10;
    }

    // Price competitiveness, skipped when there is no market average.
    if market_avg_price > 0 {
        let price_pct = u128::from(price) * 100 / u128::from(market_avg_price);
        if price_pct <= 90 {
            score += 15;
        } else if price_pct <= 110 {
            score += 5;
        } else if price_pct >= 150 {
            score -= 15;
        }
    }

    if seller_reputation > 80 {
        score += 10;
    } else if seller_reputation > 50 {
        score += 5;
    } else if seller_reputation < 20 {
        score -= 10;
    }

    match rarity_tier {
        4 => score += 10,
        3 => score += 5,
        _ => {}
    }

    score.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn series(prices: &[u64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(index, &price)| PricePoint {
                price,
                timestamp: index as u64 * 60,
            })
            .collect()
    }

    #[test]
    fn test_fee_split_pinned() {
        // 5% of 600 = 30.
        assert_eq!(fees(600, 500, 0), Ok(FeeSplit { fee: 30, net: 570 }));
    }

    #[test]
    fn test_fee_floor_applies() {
        assert_eq!(fees(600, 500, 50), Ok(FeeSplit { fee: 50, net: 550 }));
    }

    #[test]
    fn test_fee_never_exceeds_price() {
        assert_eq!(fees(10, 500, 100), Ok(FeeSplit { fee: 10, net: 0 }));
        assert_eq!(fees(0, 500, 100), Ok(FeeSplit { fee: 0, net: 0 }));
    }

    #[test]
    fn test_fee_rate_cap() {
        assert!(fees(600, MAX_FEE_RATE_BPS, 0).is_ok());
        assert_eq!(
            fees(600, MAX_FEE_RATE_BPS + 1, 0),
            Err(AnalyticsError::FeeRateTooHigh { got: 2_001, max: 2_000 })
        );
    }

    #[test]
    fn test_volume_discount_steps() {
        assert_eq!(volume_fee_discount(0, 500), 500);
        assert_eq!(volume_fee_discount(9_999, 500), 500);
        assert_eq!(volume_fee_discount(10_000, 500), 450);
        assert_eq!(volume_fee_discount(50_000, 500), 400);
        assert_eq!(volume_fee_discount(100_000, 500), 350);
        assert_eq!(volume_fee_discount(500_000, 500), 300);
        assert_eq!(volume_fee_discount(1_000_000, 500), 250);
        assert_eq!(volume_fee_discount(u128::MAX, 500), 250);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&series(&[100, 200, 300])), Ok(200));
        assert_eq!(mean(&series(&[100, 101])), Ok(100)); // truncates
        assert_eq!(mean(&[]), Err(AnalyticsError::EmptySeries));
    }

    #[test]
    fn test_price_change_pct() {
        let s = series(&[100, 150, 120]);
        assert_eq!(price_change_pct(&s, 0, u64::MAX), Ok(20));
        // Window excluding the last sample: 100 -> 150.
        assert_eq!(price_change_pct(&s, 0, 60), Ok(50));
        // Single-sample window: no change.
        assert_eq!(price_change_pct(&s, 60, 60), Ok(0));
        // Empty window.
        assert_eq!(
            price_change_pct(&s, 1_000, 2_000),
            Err(AnalyticsError::EmptySeries)
        );
        // Downward move is negative.
        assert_eq!(price_change_pct(&series(&[200, 100]), 0, u64::MAX), Ok(-50));
        // Zero baseline yields zero, not a division error.
        assert_eq!(price_change_pct(&series(&[0, 100]), 0, u64::MAX), Ok(0));
    }

    #[test]
    fn test_isqrt_edges() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(2), 1);
        assert_eq!(isqrt(3), 1);
        assert_eq!(isqrt(4), 2);
        assert_eq!(isqrt(99), 9);
        assert_eq!(isqrt(100), 10);
        assert_eq!(isqrt(u128::from(u64::MAX)), 4_294_967_295);
        // Largest input: floor(sqrt(2^128 - 1)) = 2^64 - 1.
        assert_eq!(isqrt(u128::MAX), u128::from(u64::MAX));
    }

    #[test]
    fn test_volatility_of_constant_series_is_zero() {
        assert_eq!(volatility_pct(&series(&[500, 500, 500, 500])), Ok(0));
    }

    #[test]
    fn test_volatility_pinned() {
        // Prices [90, 110]: mean 100, deviations 10, variance 100, stddev 10,
        // 10% of mean.
        assert_eq!(volatility_pct(&series(&[90, 110])), Ok(10));
        // Prices [50, 150]: stddev 50, 50% of mean 100.
        assert_eq!(volatility_pct(&series(&[50, 150])), Ok(50));
    }

    #[test]
    fn test_volatility_zero_mean() {
        assert_eq!(volatility_pct(&series(&[0, 0, 0])), Ok(0));
        assert_eq!(volatility_pct(&[]), Err(AnalyticsError::EmptySeries));
    }

    #[test]
    fn test_listing_score_components() {
        const DAY: u64 = 86_400;
        // Neutral everything: base 50.
        assert_eq!(listing_score(10 * DAY, 100, 100, 40, 1), 55); // +5 price-close
        // Fresh, cheap, reputable, legendary: 50+10+15+10+10 = 95.
        assert_eq!(listing_score(0, 80, 100, 90, 4), 95);
        // Stale, overpriced, disreputable commons: 50-10-15-10 = 15.
        assert_eq!(listing_score(31 * DAY, 200, 100, 5, 1), 15);
        // No market average: price component skipped.
        assert_eq!(listing_score(10 * DAY, 100, 0, 40, 1), 50);
    }

    #[test]
    fn test_listing_score_clamps() {
        // Maximal positives would be 90; push over 100 is impossible, so
        // check the zero floor instead: 50-10-15-10 = 15 is above it, but a
        // tier-1 stale overpriced listing with zero rep can't go negative.
        let low = listing_score(40 * 86_400, 1_000, 100, 0, 1);
        assert_eq!(low, 15);
        let ceiling = listing_score(0, 1, 1_000_000, 100, 4);
        assert_eq!(ceiling, 95);
    }

    proptest! {
        #[test]
        fn prop_isqrt_is_floor_sqrt(n in 0u128..=u128::MAX) {
            let root = isqrt(n);
            prop_assert!(root.checked_mul(root).map_or(true, |sq| sq <= n));
            let next = root + 1;
            prop_assert!(next.checked_mul(next).map_or(true, |sq| sq > n));
        }

        #[test]
        fn prop_fees_conserve_value(
            price in 0u64..=u64::MAX / 10_000,
            rate in 0u64..=MAX_FEE_RATE_BPS,
            min_fee in 0u64..=1_000,
        ) {
            let split = fees(price, rate, min_fee).unwrap();
            prop_assert_eq!(split.fee + split.net, price);
            prop_assert!(split.fee <= price);
        }

        #[test]
        fn prop_listing_score_in_range(
            age in 0u64..=u64::MAX / 2,
            price in 0u64..=u64::MAX,
            avg in 0u64..=u64::MAX,
            rep in 0u8..=100,
            tier in 0u8..=8,
        ) {
            prop_assert!(listing_score(age, price, avg, rep, tier) <= 100);
        }
    }
}
