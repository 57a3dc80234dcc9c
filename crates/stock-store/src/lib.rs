//! # Stock Store
//!
//! 狀態存儲、期間流程與交易層

pub mod ledger;
pub mod periods;
pub mod rollover;
pub mod snapshots;
pub mod stocktakes;
pub mod store;

// Re-export 主要類型
pub use ledger::MovementLedger;
pub use periods::PeriodManager;
pub use rollover::{RolloverCalculator, RolloverOutcome};
pub use snapshots::SnapshotStore;
pub use stocktakes::StocktakeRepository;
pub use store::{ApprovalOutcome, ReopenAudit, SharedStore, StockStore};
