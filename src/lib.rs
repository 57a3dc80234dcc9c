//! # Stocktake
//!
//! 飯店庫存期間對帳與估價引擎：
//! 異動帳本、期間管理、盤點對帳、期末快照與期間滾轉

// Re-export 主要類型
pub use stock_core::{
    Category, HotelConfig, Item, ItemCatalog, Movement, MovementId, MovementTotals, MovementType,
    Period, PeriodId, PeriodType, Result, Snapshot, StockError, Stocktake, StocktakeId,
    StocktakeLine, StocktakeStatus, Subcategory,
};

pub use stock_calc::{
    CategoryRollup, CountRule, LineComputation, NormalizedCount, ReconciliationCalculator,
    StockWarning, StocktakeEngine, StocktakeReport, UomCatalog, UomRule, ValuationCalculator,
    ValuationMode, WarningSeverity,
};

pub use stock_store::{
    ApprovalOutcome, MovementLedger, PeriodManager, ReopenAudit, RolloverCalculator,
    RolloverOutcome, SharedStore, SnapshotStore, StockStore, StocktakeRepository,
};
