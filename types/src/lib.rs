//! Common types for the prizeworks platform.
//!
//! This crate holds the plain data model shared between the engine and its
//! hosts: prize inventory snapshots, player burn profiles, sale phases and
//! tiers, purchase records, and the notification events emitted by
//! state-changing engine operations.
//!
//! Everything here is serde-encodable so hosts can persist it however they
//! like; the engine itself never performs I/O.

pub mod account;
pub mod event;
pub mod prize;
pub mod sale;

pub use account::AccountId;
pub use event::EngineEvent;
pub use prize::{
    PlayerBurnProfile, PrizeInvariantError, PrizeItem, VenueStats, RARITY_TIER_MAX,
    RARITY_TIER_MIN,
};
pub use sale::{
    PhaseStatus, PurchaseRecord, SaleInvariantError, SalePhase, SaleTier, MAX_NAME_LENGTH,
    MAX_DISCOUNT_BPS,
};
