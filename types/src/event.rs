//! Notification events emitted by state-changing engine operations.
//!
//! Hosts forward these to whatever transport they use (ledger events,
//! websockets, logs). The engine returns them from the operations that
//! produce them; it never buffers or republishes.

use crate::account::AccountId;
use serde::{Deserialize, Serialize};

/// A notification describing a completed engine operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// A consumer requested a draw seed.
    SeedGenerated {
        consumer: AccountId,
        request_id: u64,
        venue_id: u64,
    },
    /// A draw resolved to a winning item.
    PrizeAwarded {
        player: AccountId,
        venue_id: u64,
        item_index: usize,
        price_paid: u64,
    },
    /// A losing draw emitted reward currency instead of a prize.
    TokensEmitted {
        player: AccountId,
        venue_id: u64,
        amount: u64,
    },
    /// A primary-sale purchase completed.
    PurchaseCompleted {
        phase_id: u64,
        tier_index: u32,
        buyer: AccountId,
        price: u64,
    },
}
