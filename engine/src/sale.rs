//! Tiered primary-sale state machine.
//!
//! A [`SaleBook`] owns every sale phase and the append-only purchase log.
//! Phases move Pending -> Active -> Exhausted on the host-supplied clock and
//! quantity counters, with an administrative toggle that can suppress
//! purchases at any point without resetting anything.
//!
//! ## Atomicity
//!
//! Every purchase validates completely before mutating anything, then
//! increments the phase counter and the tier counter together inside one
//! `&mut self` call and appends exactly one record. A failed purchase leaves
//! the book untouched. A host that shares the book across threads must wrap
//! it in its own lock; the two counters must never be incremented from
//! separate critical sections or a tier can oversell.

use prizeworks_types::{
    AccountId, PhaseStatus, PurchaseRecord, SaleInvariantError, SalePhase, SaleTier,
};
use std::fmt;

/// Error during sale operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaleError {
    /// No phase with the requested id.
    PhaseNotFound(u64),
    /// A phase with this name already exists. Defensive data-integrity
    /// check; duplicate names indicate a confused administrator pipeline.
    DuplicatePhase(String),
    /// Phase is pending, ended, or administratively disabled.
    PhaseNotActive { phase_id: u64, status: PhaseStatus },
    /// Phase quantity fully sold.
    PhaseLimitExceeded { phase_id: u64 },
    /// Phase is time-active but no tier is currently in window with stock.
    NoTierAvailable { phase_id: u64 },
    /// Payment below the current tier price.
    InsufficientPayment { required: u64, offered: u64 },
    /// Invalid phase or tier parameters.
    Invariant(SaleInvariantError),
}

impl fmt::Display for SaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PhaseNotFound(id) => write!(f, "phase {id} not found"),
            Self::DuplicatePhase(name) => write!(f, "phase named {name:?} already exists"),
            Self::PhaseNotActive { phase_id, status } => {
                write!(f, "phase {phase_id} not active (status: {status:?})")
            }
            Self::PhaseLimitExceeded { phase_id } => {
                write!(f, "phase {phase_id} quantity fully sold")
            }
            Self::NoTierAvailable { phase_id } => {
                write!(f, "no tier currently available in phase {phase_id}")
            }
            Self::InsufficientPayment { required, offered } => {
                write!(f, "insufficient payment (required={required}, offered={offered})")
            }
            Self::Invariant(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SaleError {}

impl From<SaleInvariantError> for SaleError {
    fn from(err: SaleInvariantError) -> Self {
        Self::Invariant(err)
    }
}

/// Read-only view of the currently purchasable tier of a phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TierQuote {
    pub tier_index: u32,
    pub name: String,
    /// Unit price after the tier discount.
    pub price: u64,
    pub discount_bps: u16,
    /// Units remaining at this tier.
    pub remaining: u32,
}

/// Result of a successful purchase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseOutcome {
    pub phase_id: u64,
    pub tier_index: u32,
    pub price_paid: u64,
    /// Overpayment to refund to the buyer; never kept.
    pub change_due: u64,
    /// Index of the appended record in the purchase log.
    pub record_index: u64,
}

/// Owner of all sale phases and the append-only purchase log.
#[derive(Clone, Debug, Default)]
pub struct SaleBook {
    phases: Vec<SalePhase>,
    purchases: Vec<PurchaseRecord>,
    next_phase_id: u64,
}

impl SaleBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a phase; returns its id.
    pub fn create_phase(
        &mut self,
        name: impl Into<String>,
        start_time: u64,
        end_time: u64,
        total_quantity: u32,
        base_price: u64,
    ) -> Result<u64, SaleError> {
        let name = name.into();
        if self.phases.iter().any(|phase| phase.name == name) {
            return Err(SaleError::DuplicatePhase(name));
        }
        let id = self.next_phase_id;
        let phase = SalePhase::new(id, name, start_time, end_time, total_quantity, base_price)?;
        self.phases.push(phase);
        self.next_phase_id += 1;
        Ok(id)
    }

    /// Append a tier to a phase; returns its index. Tiers are evaluated in
    /// declaration order and cannot be reordered afterwards.
    pub fn add_tier(
        &mut self,
        phase_id: u64,
        name: impl Into<String>,
        max_quantity: u32,
        discount_bps: u16,
        start_time: u64,
        end_time: u64,
    ) -> Result<u32, SaleError> {
        let tier = SaleTier::new(name, max_quantity, discount_bps, start_time, end_time)?;
        let phase = self.phase_mut(phase_id)?;
        phase.tiers.push(tier);
        Ok(phase.tiers.len() as u32 - 1)
    }

    /// Flip the administrative toggle. Counters are untouched; re-enabling a
    /// phase resumes exactly where it stopped.
    pub fn set_phase_active(&mut self, phase_id: u64, active: bool) -> Result<(), SaleError> {
        self.phase_mut(phase_id)?.is_active = active;
        Ok(())
    }

    /// Look up a phase.
    pub fn phase(&self, phase_id: u64) -> Result<&SalePhase, SaleError> {
        self.phases
            .iter()
            .find(|phase| phase.id == phase_id)
            .ok_or(SaleError::PhaseNotFound(phase_id))
    }

    fn phase_mut(&mut self, phase_id: u64) -> Result<&mut SalePhase, SaleError> {
        self.phases
            .iter_mut()
            .find(|phase| phase.id == phase_id)
            .ok_or(SaleError::PhaseNotFound(phase_id))
    }

    /// Lifecycle status of a phase at `now`.
    pub fn phase_status(&self, phase_id: u64, now: u64) -> Result<PhaseStatus, SaleError> {
        Ok(self.phase(phase_id)?.status(now))
    }

    /// Units remaining at the phase level.
    pub fn remaining_quantity(&self, phase_id: u64) -> Result<u32, SaleError> {
        Ok(self.phase(phase_id)?.remaining())
    }

    /// The full purchase log.
    pub fn purchases(&self) -> &[PurchaseRecord] {
        &self.purchases
    }

    /// Purchases belonging to one phase.
    pub fn purchases_for_phase(&self, phase_id: u64) -> Vec<&PurchaseRecord> {
        self.purchases
            .iter()
            .filter(|record| record.phase_id == phase_id)
            .collect()
    }

    /// Resolve the currently purchasable tier of a phase. Read-only: never
    /// mutates counters, so it can be polled freely.
    ///
    /// Distinguishes phase-level exhaustion (`PhaseLimitExceeded`) from all
    /// tiers being out of window or out of stock (`NoTierAvailable`) while a
    /// phase is otherwise sellable.
    pub fn current_tier(&self, phase_id: u64, now: u64) -> Result<TierQuote, SaleError> {
        let phase = self.phase(phase_id)?;
        if phase.is_exhausted() {
            return Err(SaleError::PhaseLimitExceeded { phase_id });
        }
        Self::resolve_tier(phase, now)
            .map(|(index, tier)| TierQuote {
                tier_index: index as u32,
                name: tier.name.clone(),
                price: tier.price(phase.base_price),
                discount_bps: tier.discount_bps,
                remaining: tier.remaining(),
            })
            .ok_or(SaleError::NoTierAvailable { phase_id })
    }

    /// First declared tier that is time-eligible and not exhausted.
    fn resolve_tier(phase: &SalePhase, now: u64) -> Option<(usize, &SaleTier)> {
        phase
            .tiers
            .iter()
            .enumerate()
            .find(|(_, tier)| tier.is_open_at(now) && !tier.is_exhausted())
    }

    /// Purchase one unit from a phase.
    ///
    /// Validates phase state, tier availability, and payment before touching
    /// any counter; on success increments the phase and tier counters
    /// together and appends exactly one [`PurchaseRecord`].
    pub fn purchase(
        &mut self,
        phase_id: u64,
        buyer: AccountId,
        payment: u64,
        now: u64,
    ) -> Result<PurchaseOutcome, SaleError> {
        // All validation happens against an immutable view first.
        let phase = self.phase(phase_id)?;
        match phase.status(now) {
            PhaseStatus::Active => {}
            PhaseStatus::Exhausted => {
                return Err(SaleError::PhaseLimitExceeded { phase_id });
            }
            status => {
                return Err(SaleError::PhaseNotActive { phase_id, status });
            }
        }

        let (tier_index, tier) =
            Self::resolve_tier(phase, now).ok_or(SaleError::NoTierAvailable { phase_id })?;
        let price = tier.price(phase.base_price);
        if payment < price {
            return Err(SaleError::InsufficientPayment {
                required: price,
                offered: payment,
            });
        }
        let change_due = payment - price;

        // Point of no return: both counters move together.
        let record_index = self.purchases.len() as u64;
        let phase = self
            .phases
            .iter_mut()
            .find(|phase| phase.id == phase_id)
            .ok_or(SaleError::PhaseNotFound(phase_id))?;
        phase.sold_quantity += 1;
        phase.tiers[tier_index].sold_quantity += 1;
        self.purchases.push(PurchaseRecord {
            phase_id,
            tier_index: tier_index as u32,
            buyer,
            price_paid: price,
            timestamp: now,
        });

        Ok(PurchaseOutcome {
            phase_id,
            tier_index: tier_index as u32,
            price_paid: price,
            change_due,
            record_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buyer() -> AccountId {
        AccountId::from_seed(0x42)
    }

    /// Phase from the launch playbook: 50 units at base price 20 with three
    /// progressively smaller discounts.
    fn launch_book() -> (SaleBook, u64) {
        let mut book = SaleBook::new();
        let phase_id = book.create_phase("launch", 0, 0, 50, 20).unwrap();
        book.add_tier(phase_id, "early", 5, 7_000, 0, 0).unwrap();
        book.add_tier(phase_id, "mid", 20, 2_000, 0, 0).unwrap();
        book.add_tier(phase_id, "full", 25, 0, 0, 0).unwrap();
        (book, phase_id)
    }

    #[test]
    fn test_create_phase_assigns_sequential_ids() {
        let mut book = SaleBook::new();
        assert_eq!(book.create_phase("a", 0, 0, 10, 5).unwrap(), 0);
        assert_eq!(book.create_phase("b", 0, 0, 10, 5).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_phase_name_rejected() {
        let mut book = SaleBook::new();
        book.create_phase("launch", 0, 0, 10, 5).unwrap();
        assert_eq!(
            book.create_phase("launch", 0, 0, 10, 5),
            Err(SaleError::DuplicatePhase("launch".into()))
        );
    }

    #[test]
    fn test_invalid_parameters_map_to_invariant_errors() {
        let mut book = SaleBook::new();
        assert!(matches!(
            book.create_phase("p", 0, 0, 0, 5),
            Err(SaleError::Invariant(SaleInvariantError::EmptyQuantity))
        ));
        let phase_id = book.create_phase("p", 0, 0, 10, 5).unwrap();
        assert!(matches!(
            book.add_tier(phase_id, "t", 5, 10_001, 0, 0),
            Err(SaleError::Invariant(SaleInvariantError::InvalidBasisPoints { got: 10_001 }))
        ));
        assert!(matches!(
            book.add_tier(phase_id, "t", 5, 0, 10, 5),
            Err(SaleError::Invariant(SaleInvariantError::MalformedRange { start: 10, end: 5 }))
        ));
    }

    #[test]
    fn test_tier_progression_with_pricing() {
        let (mut book, phase_id) = launch_book();

        // Tier 1: 70% off 20 = 6.
        let quote = book.current_tier(phase_id, 100).unwrap();
        assert_eq!((quote.tier_index, quote.price), (0, 6));

        for _ in 0..5 {
            let outcome = book.purchase(phase_id, buyer(), 6, 100).unwrap();
            assert_eq!(outcome.tier_index, 0);
            assert_eq!(outcome.price_paid, 6);
        }

        // After exactly 5 purchases: tier 2 at 16.
        let quote = book.current_tier(phase_id, 100).unwrap();
        assert_eq!((quote.tier_index, quote.price), (1, 16));

        for _ in 0..20 {
            book.purchase(phase_id, buyer(), 16, 100).unwrap();
        }

        // After 25 total: tier 3 at full price 20.
        let quote = book.current_tier(phase_id, 100).unwrap();
        assert_eq!((quote.tier_index, quote.price), (2, 20));

        for _ in 0..25 {
            book.purchase(phase_id, buyer(), 20, 100).unwrap();
        }

        // 51st purchase: phase sold out.
        assert_eq!(
            book.purchase(phase_id, buyer(), 20, 100),
            Err(SaleError::PhaseLimitExceeded { phase_id })
        );
        assert_eq!(
            book.current_tier(phase_id, 100),
            Err(SaleError::PhaseLimitExceeded { phase_id })
        );
        assert_eq!(book.purchases().len(), 50);
    }

    #[test]
    fn test_current_tier_is_idempotent() {
        let (book, phase_id) = launch_book();
        for _ in 0..10 {
            book.current_tier(phase_id, 100).unwrap();
        }
        let phase = book.phase(phase_id).unwrap();
        assert_eq!(phase.sold_quantity, 0);
        assert!(phase.tiers.iter().all(|tier| tier.sold_quantity == 0));
    }

    #[test]
    fn test_change_due_is_returned_never_kept() {
        let (mut book, phase_id) = launch_book();
        let outcome = book.purchase(phase_id, buyer(), 100, 50).unwrap();
        assert_eq!(outcome.price_paid, 6);
        assert_eq!(outcome.change_due, 94);
        // The record carries the price, not the payment.
        assert_eq!(book.purchases()[0].price_paid, 6);
    }

    #[test]
    fn test_insufficient_payment_leaves_book_untouched() {
        let (mut book, phase_id) = launch_book();
        assert_eq!(
            book.purchase(phase_id, buyer(), 5, 50),
            Err(SaleError::InsufficientPayment { required: 6, offered: 5 })
        );
        assert_eq!(book.phase(phase_id).unwrap().sold_quantity, 0);
        assert!(book.purchases().is_empty());
    }

    #[test]
    fn test_pending_and_ended_phases_reject_purchases() {
        let mut book = SaleBook::new();
        let phase_id = book.create_phase("timed", 100, 200, 10, 5).unwrap();
        book.add_tier(phase_id, "only", 10, 0, 0, 0).unwrap();

        assert_eq!(
            book.purchase(phase_id, buyer(), 5, 99),
            Err(SaleError::PhaseNotActive { phase_id, status: PhaseStatus::Pending })
        );
        assert_eq!(
            book.purchase(phase_id, buyer(), 5, 201),
            Err(SaleError::PhaseNotActive { phase_id, status: PhaseStatus::Ended })
        );
        // Inside the window it sells.
        assert!(book.purchase(phase_id, buyer(), 5, 150).is_ok());
    }

    #[test]
    fn test_admin_toggle_suppresses_and_resumes() {
        let (mut book, phase_id) = launch_book();
        book.purchase(phase_id, buyer(), 6, 50).unwrap();

        book.set_phase_active(phase_id, false).unwrap();
        assert_eq!(
            book.purchase(phase_id, buyer(), 6, 50),
            Err(SaleError::PhaseNotActive { phase_id, status: PhaseStatus::Inactive })
        );

        // Toggling back does not reset counters: still tier 1, 4 left.
        book.set_phase_active(phase_id, true).unwrap();
        let quote = book.current_tier(phase_id, 50).unwrap();
        assert_eq!((quote.tier_index, quote.remaining), (0, 4));
    }

    #[test]
    fn test_all_tiers_out_of_window_is_no_tier_available() {
        let mut book = SaleBook::new();
        // Phase active all day, but its only tier closes at t=100.
        let phase_id = book.create_phase("gap", 0, 0, 10, 5).unwrap();
        book.add_tier(phase_id, "early", 10, 0, 0, 100).unwrap();

        assert_eq!(
            book.purchase(phase_id, buyer(), 5, 200),
            Err(SaleError::NoTierAvailable { phase_id })
        );
        assert_eq!(
            book.current_tier(phase_id, 200),
            Err(SaleError::NoTierAvailable { phase_id })
        );
        // Distinct from exhaustion: phase still has quantity.
        assert_eq!(book.remaining_quantity(phase_id).unwrap(), 10);
    }

    #[test]
    fn test_exhausted_tier_skipped_even_inside_window() {
        let mut book = SaleBook::new();
        let phase_id = book.create_phase("skip", 0, 0, 10, 100).unwrap();
        book.add_tier(phase_id, "tiny", 1, 5_000, 0, 0).unwrap();
        book.add_tier(phase_id, "rest", 9, 0, 0, 0).unwrap();

        book.purchase(phase_id, buyer(), 50, 10).unwrap();
        let quote = book.current_tier(phase_id, 10).unwrap();
        assert_eq!((quote.tier_index, quote.price), (1, 100));
    }

    #[test]
    fn test_tier_windows_can_leave_gaps_then_reopen() {
        let mut book = SaleBook::new();
        let phase_id = book.create_phase("windows", 0, 0, 10, 100).unwrap();
        book.add_tier(phase_id, "morning", 5, 1_000, 0, 100).unwrap();
        book.add_tier(phase_id, "evening", 5, 0, 500, 0).unwrap();

        assert_eq!(book.current_tier(phase_id, 50).unwrap().tier_index, 0);
        assert_eq!(
            book.current_tier(phase_id, 200),
            Err(SaleError::NoTierAvailable { phase_id })
        );
        assert_eq!(book.current_tier(phase_id, 600).unwrap().tier_index, 1);
    }

    #[test]
    fn test_phase_counter_and_tier_counter_move_together() {
        let (mut book, phase_id) = launch_book();
        for expected in 1..=7u32 {
            book.purchase(phase_id, buyer(), 20, 50).unwrap();
            let phase = book.phase(phase_id).unwrap();
            let tier_total: u32 = phase.tiers.iter().map(|tier| tier.sold_quantity).sum();
            assert_eq!(phase.sold_quantity, expected);
            assert_eq!(tier_total, expected);
        }
    }

    #[test]
    fn test_purchase_records_are_append_only_and_complete() {
        let (mut book, phase_id) = launch_book();
        let first = book.purchase(phase_id, AccountId::from_seed(1), 6, 11).unwrap();
        let second = book.purchase(phase_id, AccountId::from_seed(2), 7, 12).unwrap();
        assert_eq!(first.record_index, 0);
        assert_eq!(second.record_index, 1);

        let records = book.purchases_for_phase(phase_id);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].buyer, AccountId::from_seed(1));
        assert_eq!(records[0].timestamp, 11);
        assert_eq!(records[1].price_paid, 6);
    }

    #[test]
    fn test_unknown_phase() {
        let mut book = SaleBook::new();
        assert_eq!(
            book.purchase(99, buyer(), 5, 0),
            Err(SaleError::PhaseNotFound(99))
        );
        assert_eq!(book.current_tier(99, 0), Err(SaleError::PhaseNotFound(99)));
        assert!(matches!(
            book.add_tier(99, "t", 1, 0, 0, 0),
            Err(SaleError::PhaseNotFound(99))
        ));
    }
}
