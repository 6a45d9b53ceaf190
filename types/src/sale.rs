//! Primary-sale phases, discount tiers, and purchase records.
//!
//! A [`SalePhase`] is a time-and-quantity-bounded stage of a primary sale.
//! Each phase owns an ordered list of [`SaleTier`]s; the current tier is
//! always the first declared tier that is inside its time window and not yet
//! exhausted. Prices are expressed in basis points off the phase base price.
//!
//! All timestamps are wall-clock seconds supplied by the host; `end_time == 0`
//! means unbounded.

use crate::account::AccountId;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Maximum length of phase and tier names.
pub const MAX_NAME_LENGTH: usize = 64;

/// Basis-point denominator; a discount of 10_000 bps is free.
pub const MAX_DISCOUNT_BPS: u16 = 10_000;

/// Invariant violations when constructing phases and tiers.
#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum SaleInvariantError {
    #[error("name too long (len={len}, max={max})")]
    NameTooLong { len: usize, max: usize },
    #[error("discount out of range (got={got} bps, max={MAX_DISCOUNT_BPS})")]
    InvalidBasisPoints { got: u16 },
    #[error("malformed time range (start={start}, end={end})")]
    MalformedRange { start: u64, end: u64 },
    #[error("quantity must be greater than zero")]
    EmptyQuantity,
}

fn validate_name(name: &str) -> Result<(), SaleInvariantError> {
    if name.len() > MAX_NAME_LENGTH {
        return Err(SaleInvariantError::NameTooLong {
            len: name.len(),
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(())
}

fn validate_range(start: u64, end: u64) -> Result<(), SaleInvariantError> {
    // end == 0 means unbounded.
    if end != 0 && end <= start {
        return Err(SaleInvariantError::MalformedRange { start, end });
    }
    Ok(())
}

/// Lifecycle status of a phase at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseStatus {
    /// Before `start_time`.
    Pending,
    /// Inside the time window with quantity remaining.
    Active,
    /// Past `end_time`.
    Ended,
    /// `sold_quantity == total_quantity`; terminal regardless of the
    /// administrative toggle.
    Exhausted,
    /// Administratively suppressed; counters are untouched.
    Inactive,
}

/// A discount tier within a phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleTier {
    pub name: String,
    /// Units sellable at this tier.
    pub max_quantity: u32,
    /// Units sold so far; monotonically increasing.
    pub sold_quantity: u32,
    /// Discount off the phase base price, in basis points.
    pub discount_bps: u16,
    pub start_time: u64,
    /// 0 = unbounded.
    pub end_time: u64,
}

impl SaleTier {
    /// Construct and validate a tier with no sales yet.
    pub fn new(
        name: impl Into<String>,
        max_quantity: u32,
        discount_bps: u16,
        start_time: u64,
        end_time: u64,
    ) -> Result<Self, SaleInvariantError> {
        let name = name.into();
        validate_name(&name)?;
        validate_range(start_time, end_time)?;
        if discount_bps > MAX_DISCOUNT_BPS {
            return Err(SaleInvariantError::InvalidBasisPoints { got: discount_bps });
        }
        if max_quantity == 0 {
            return Err(SaleInvariantError::EmptyQuantity);
        }
        Ok(Self {
            name,
            max_quantity,
            sold_quantity: 0,
            discount_bps,
            start_time,
            end_time,
        })
    }

    /// Whether `now` is inside this tier's time window.
    pub fn is_open_at(&self, now: u64) -> bool {
        now >= self.start_time && (self.end_time == 0 || now <= self.end_time)
    }

    /// Whether every unit of this tier has been sold.
    pub fn is_exhausted(&self) -> bool {
        self.sold_quantity >= self.max_quantity
    }

    /// Units remaining at this tier.
    pub fn remaining(&self) -> u32 {
        self.max_quantity.saturating_sub(self.sold_quantity)
    }

    /// Effective unit price given the phase base price.
    ///
    /// `base * (10_000 - discount_bps) / 10_000`, truncating.
    pub fn price(&self, base_price: u64) -> u64 {
        let keep_bps = u64::from(MAX_DISCOUNT_BPS - self.discount_bps);
        base_price.saturating_mul(keep_bps) / u64::from(MAX_DISCOUNT_BPS)
    }
}

/// A time-bounded sale phase with an ordered list of discount tiers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalePhase {
    pub id: u64,
    pub name: String,
    pub start_time: u64,
    /// 0 = unbounded.
    pub end_time: u64,
    /// Phase-wide sellable quantity, independent of tier boundaries.
    pub total_quantity: u32,
    /// Units sold across all tiers; monotonically increasing.
    pub sold_quantity: u32,
    /// Unit price before tier discounts.
    pub base_price: u64,
    /// Administrative toggle; `false` suppresses purchases without touching
    /// counters.
    pub is_active: bool,
    /// Tiers in declaration order.
    pub tiers: Vec<SaleTier>,
}

impl SalePhase {
    /// Construct and validate a phase with no tiers and no sales.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        start_time: u64,
        end_time: u64,
        total_quantity: u32,
        base_price: u64,
    ) -> Result<Self, SaleInvariantError> {
        let name = name.into();
        validate_name(&name)?;
        validate_range(start_time, end_time)?;
        if total_quantity == 0 {
            return Err(SaleInvariantError::EmptyQuantity);
        }
        Ok(Self {
            id,
            name,
            start_time,
            end_time,
            total_quantity,
            sold_quantity: 0,
            base_price,
            is_active: true,
            tiers: Vec::new(),
        })
    }

    /// Whether every unit of this phase has been sold.
    pub fn is_exhausted(&self) -> bool {
        self.sold_quantity >= self.total_quantity
    }

    /// Units remaining at the phase level.
    pub fn remaining(&self) -> u32 {
        self.total_quantity.saturating_sub(self.sold_quantity)
    }

    /// Resolve the lifecycle status at `now`.
    ///
    /// Exhaustion is terminal and takes precedence; the administrative toggle
    /// is checked before the time window so a disabled phase reports
    /// `Inactive` even inside its window.
    pub fn status(&self, now: u64) -> PhaseStatus {
        if self.is_exhausted() {
            return PhaseStatus::Exhausted;
        }
        if !self.is_active {
            return PhaseStatus::Inactive;
        }
        if now < self.start_time {
            return PhaseStatus::Pending;
        }
        if self.end_time != 0 && now > self.end_time {
            return PhaseStatus::Ended;
        }
        PhaseStatus::Active
    }
}

/// Append-only record of a completed purchase.
///
/// Created exactly once per successful purchase; never mutated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub phase_id: u64,
    pub tier_index: u32,
    pub buyer: AccountId,
    pub price_paid: u64,
    pub timestamp: u64,
}
