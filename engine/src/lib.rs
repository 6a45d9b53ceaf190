//! Prizeworks economic and probability engine.
//!
//! This crate contains the deterministic draw, pricing, and primary-sale
//! logic for the prizeworks platform: which prize a paid draw awards, what a
//! draw costs right now, how much reward currency a losing draw emits, and
//! how a multi-tier sale prices and rations its inventory over time.
//!
//! ## Determinism requirements
//! - Do not use wall-clock time inside the engine; hosts pass timestamps in.
//! - Do not use non-deterministic randomness; seeds are derived only from
//!   the entropy combiner and the host-supplied beacon.
//! - Integer arithmetic only; results must be bit-identical across
//!   platforms.
//!
//! ## Scope
//! Asset custody, ownership transfer, and role management are external
//! collaborators. The engine reads inventory snapshots and burn profiles,
//! and returns outcomes and notification events; it never moves assets.
//!
//! The primary entrypoint is [`Engine`].

pub mod analytics;
pub mod entropy;
pub mod odds;
pub mod pricing;
pub mod sale;
pub mod selector;

mod engine;


pub use engine::{DrawOutcome, DrawRequest, Engine, EngineConfig, EngineError};
pub use entropy::{EntropyCombiner, Seed, ZERO_SEED_SENTINEL};
pub use odds::{
    item_probability, odds_improvement, tier_base_weight, token_emission, OddsError, BURN_UNIT,
    TIER_BASE_WEIGHTS, TOTAL_WEIGHT,
};
pub use pricing::{play_cost, PricingError, PEAK_HOUR_END, PEAK_HOUR_START};
pub use sale::{PurchaseOutcome, SaleBook, SaleError, TierQuote};
pub use selector::{select_item, SelectError};
pub use analytics::{
    fees, isqrt, listing_score, mean, price_change_pct, volatility_pct, volume_fee_discount,
    AnalyticsError, FeeSplit, PricePoint, MAX_FEE_RATE_BPS,
};
