//! The engine facade: the operation contracts exposed to the hosting
//! platform.
//!
//! [`Engine`] wires the entropy combiner, the odds/pricing/selection math,
//! and the sale book behind one surface, and enforces the capability checks
//! the surrounding platform expects (seed consumers, sale administrators).
//! Full role management lives outside the core; the registries here are the
//! minimal stand-in the contracts require.
//!
//! Draws and purchases are all-or-nothing: every validation runs before any
//! state change, so a failed operation has no effect.

use crate::entropy::{EntropyCombiner, Seed};
use crate::odds::token_emission;
use crate::pricing::{play_cost, PricingError};
use crate::sale::{PurchaseOutcome, SaleBook, SaleError, TierQuote};
use crate::selector::{select_item, SelectError};
use prizeworks_types::{
    AccountId, EngineEvent, PhaseStatus, PlayerBurnProfile, PrizeItem, VenueStats,
};
use std::collections::BTreeSet;
use std::fmt;

/// Tunable engine parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Weight units granted per whole token burned (see [`crate::odds`]).
    pub base_improvement_factor: u64,
    /// Reward-currency emission rate for losing draws, in basis points of
    /// the play price.
    pub emission_rate_bps: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_improvement_factor: 100,
            emission_rate_bps: 500,
        }
    }
}

/// Error from an engine operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Caller does not hold the seed-consumer capability.
    NotConsumer(AccountId),
    /// Caller does not hold the administrator capability.
    NotAdmin(AccountId),
    /// Seed request id must be non-zero.
    InvalidRequestId,
    /// Draw payment below the quoted play cost.
    InsufficientPayment { required: u64, offered: u64 },
    /// Selection failure.
    Select(SelectError),
    /// Pricing failure.
    Pricing(PricingError),
    /// Sale failure.
    Sale(SaleError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConsumer(caller) => write!(f, "caller {caller:?} is not a seed consumer"),
            Self::NotAdmin(caller) => write!(f, "caller {caller:?} is not an administrator"),
            Self::InvalidRequestId => write!(f, "seed request id must be non-zero"),
            Self::InsufficientPayment { required, offered } => {
                write!(f, "insufficient payment (required={required}, offered={offered})")
            }
            Self::Select(err) => write!(f, "{err}"),
            Self::Pricing(err) => write!(f, "{err}"),
            Self::Sale(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<SelectError> for EngineError {
    fn from(err: SelectError) -> Self {
        Self::Select(err)
    }
}

impl From<PricingError> for EngineError {
    fn from(err: PricingError) -> Self {
        Self::Pricing(err)
    }
}

impl From<SaleError> for EngineError {
    fn from(err: SaleError) -> Self {
        Self::Sale(err)
    }
}

/// Result of a paid draw: a prize, or the reward-currency consolation when
/// no prize could be won.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// Index of the winning item in the caller's snapshot.
    Prize { item_index: usize },
    /// No eligible items; tokens emitted instead.
    Emission { amount: u64 },
}

/// Inputs for one paid draw.
#[derive(Clone, Copy, Debug)]
pub struct DrawRequest {
    pub player: AccountId,
    pub venue_id: u64,
    /// Externally sourced randomness beacon value.
    pub beacon: u64,
    /// Venue base price before dynamic adjustments.
    pub base_price: u64,
    pub time_of_day_secs: u32,
    /// Payment supplied with the draw.
    pub payment: u64,
    /// Player lifetime plays, for the emission loyalty bonus.
    pub loyalty: u64,
}

/// The economic and probability engine.
pub struct Engine {
    config: EngineConfig,
    entropy: EntropyCombiner,
    sale: SaleBook,
    consumers: BTreeSet<AccountId>,
    admins: BTreeSet<AccountId>,
}

impl Engine {
    /// Create an engine with a single root administrator.
    pub fn new(config: EngineConfig, root_admin: AccountId) -> Self {
        let mut admins = BTreeSet::new();
        admins.insert(root_admin);
        Self {
            config,
            entropy: EntropyCombiner::new(),
            sale: SaleBook::new(),
            consumers: BTreeSet::new(),
            admins,
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only access to the sale book.
    pub fn sale(&self) -> &SaleBook {
        &self.sale
    }

    fn require_admin(&self, caller: &AccountId) -> Result<(), EngineError> {
        if self.admins.contains(caller) {
            Ok(())
        } else {
            Err(EngineError::NotAdmin(*caller))
        }
    }

    fn require_consumer(&self, caller: &AccountId) -> Result<(), EngineError> {
        if self.consumers.contains(caller) {
            Ok(())
        } else {
            Err(EngineError::NotConsumer(*caller))
        }
    }

    /// Grant another account the administrator capability.
    pub fn add_admin(&mut self, caller: &AccountId, admin: AccountId) -> Result<(), EngineError> {
        self.require_admin(caller)?;
        self.admins.insert(admin);
        Ok(())
    }

    /// Register a seed consumer.
    pub fn register_consumer(
        &mut self,
        caller: &AccountId,
        consumer: AccountId,
    ) -> Result<(), EngineError> {
        self.require_admin(caller)?;
        self.consumers.insert(consumer);
        Ok(())
    }

    /// Derive a fresh draw seed for a registered consumer.
    pub fn generate_seed(
        &self,
        caller: &AccountId,
        request_id: u64,
        venue_id: u64,
        beacon: u64,
    ) -> Result<(Seed, EngineEvent), EngineError> {
        self.require_consumer(caller)?;
        if request_id == 0 {
            return Err(EngineError::InvalidRequestId);
        }
        let seed = self.entropy.combine(caller, venue_id, beacon);
        tracing::debug!(
            consumer = ?caller,
            request_id,
            venue_id,
            "seed generated"
        );
        Ok((
            seed,
            EngineEvent::SeedGenerated {
                consumer: *caller,
                request_id,
                venue_id,
            },
        ))
    }

    /// Select the winning prize for a pre-derived seed.
    pub fn select_prize(
        &self,
        items: &[PrizeItem],
        seed: Seed,
        burn_profile: &PlayerBurnProfile,
    ) -> Result<usize, EngineError> {
        Ok(select_item(
            items,
            seed,
            burn_profile,
            self.config.base_improvement_factor,
        )?)
    }

    /// Quote the current cost of one draw at a venue.
    pub fn quote_draw(
        &self,
        base_price: u64,
        venue: &VenueStats,
        time_of_day_secs: u32,
    ) -> Result<u64, EngineError> {
        let price = play_cost(
            base_price,
            venue.popularity,
            time_of_day_secs,
            venue.has_premium_items,
        )?;
        tracing::debug!(base_price, price, "draw quoted");
        Ok(price)
    }

    /// Quote the reward-currency emission a losing draw would yield.
    pub fn quote_emission(&self, play_price: u64, venue: &VenueStats, loyalty: u64) -> u64 {
        token_emission(
            play_price,
            venue.performance_score,
            loyalty,
            self.config.emission_rate_bps,
        )
    }

    /// Execute one paid draw end to end.
    ///
    /// Validates payment against the dynamic quote, derives a seed, and
    /// selects a prize. An empty or fully ineligible snapshot is the no-win
    /// path and yields a token emission rather than an error.
    pub fn draw(
        &self,
        caller: &AccountId,
        request: &DrawRequest,
        venue: &VenueStats,
        items: &[PrizeItem],
        burn_profile: &PlayerBurnProfile,
    ) -> Result<(DrawOutcome, EngineEvent), EngineError> {
        self.require_consumer(caller)?;

        let price = self.quote_draw(request.base_price, venue, request.time_of_day_secs)?;
        if request.payment < price {
            return Err(EngineError::InsufficientPayment {
                required: price,
                offered: request.payment,
            });
        }

        let seed = self
            .entropy
            .combine(&request.player, request.venue_id, request.beacon);
        match select_item(items, seed, burn_profile, self.config.base_improvement_factor) {
            Ok(item_index) => {
                tracing::info!(
                    player = ?request.player,
                    venue_id = request.venue_id,
                    item_index,
                    price,
                    "draw won a prize"
                );
                Ok((
                    DrawOutcome::Prize { item_index },
                    EngineEvent::PrizeAwarded {
                        player: request.player,
                        venue_id: request.venue_id,
                        item_index,
                        price_paid: price,
                    },
                ))
            }
            Err(SelectError::NoEligibleItems) => {
                let amount = self.quote_emission(price, venue, request.loyalty);
                tracing::info!(
                    player = ?request.player,
                    venue_id = request.venue_id,
                    amount,
                    price,
                    "draw lost, tokens emitted"
                );
                Ok((
                    DrawOutcome::Emission { amount },
                    EngineEvent::TokensEmitted {
                        player: request.player,
                        venue_id: request.venue_id,
                        amount,
                    },
                ))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Create a sale phase (administrator only); returns its id.
    pub fn create_phase(
        &mut self,
        caller: &AccountId,
        name: impl Into<String>,
        start_time: u64,
        end_time: u64,
        total_quantity: u32,
        base_price: u64,
    ) -> Result<u64, EngineError> {
        self.require_admin(caller)?;
        let phase_id = self
            .sale
            .create_phase(name, start_time, end_time, total_quantity, base_price)?;
        tracing::info!(phase_id, total_quantity, base_price, "sale phase created");
        Ok(phase_id)
    }

    /// Append a discount tier to a phase (administrator only).
    pub fn add_tier(
        &mut self,
        caller: &AccountId,
        phase_id: u64,
        name: impl Into<String>,
        max_quantity: u32,
        discount_bps: u16,
        start_time: u64,
        end_time: u64,
    ) -> Result<u32, EngineError> {
        self.require_admin(caller)?;
        Ok(self
            .sale
            .add_tier(phase_id, name, max_quantity, discount_bps, start_time, end_time)?)
    }

    /// Toggle a phase's administrative switch (administrator only).
    pub fn set_phase_active(
        &mut self,
        caller: &AccountId,
        phase_id: u64,
        active: bool,
    ) -> Result<(), EngineError> {
        self.require_admin(caller)?;
        self.sale.set_phase_active(phase_id, active)?;
        tracing::info!(phase_id, active, "sale phase toggled");
        Ok(())
    }

    /// Read-only view of the currently purchasable tier of a phase.
    pub fn current_tier(&self, phase_id: u64, now: u64) -> Result<TierQuote, EngineError> {
        Ok(self.sale.current_tier(phase_id, now)?)
    }

    /// Lifecycle status of a phase.
    pub fn phase_status(&self, phase_id: u64, now: u64) -> Result<PhaseStatus, EngineError> {
        Ok(self.sale.phase_status(phase_id, now)?)
    }

    /// Purchase one unit from a phase.
    pub fn purchase(
        &mut self,
        buyer: AccountId,
        phase_id: u64,
        payment: u64,
        now: u64,
    ) -> Result<(PurchaseOutcome, EngineEvent), EngineError> {
        let outcome = self.sale.purchase(phase_id, buyer, payment, now)?;
        tracing::info!(
            phase_id,
            tier_index = outcome.tier_index,
            buyer = ?buyer,
            price = outcome.price_paid,
            "sale purchase completed"
        );
        let event = EngineEvent::PurchaseCompleted {
            phase_id,
            tier_index: outcome.tier_index,
            buyer,
            price: outcome.price_paid,
        };
        Ok((outcome, event))
    }
}
