//! # Stock Core
//!
//! 核心資料模型與類型定義

pub mod config;
pub mod item;
pub mod movement;
pub mod period;
pub mod snapshot;
pub mod stocktake;

// Re-export 主要類型
pub use config::HotelConfig;
pub use item::{Category, Item, ItemCatalog, Subcategory};
pub use movement::{Movement, MovementId, MovementTotals, MovementType};
pub use period::{Period, PeriodId, PeriodType};
pub use snapshot::Snapshot;
pub use stocktake::{Stocktake, StocktakeId, StocktakeLine, StocktakeStatus};

/// 庫存引擎錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum StockError {
    /// 計量配置無效（未知的類別/子類別組合、非法換算係數）
    /// 此類錯誤一律中止操作，絕不以零或 1 作為預設係數
    #[error("計量配置無效: 品項 {sku}, 原因: {reason}")]
    Configuration { sku: String, reason: String },

    #[error("會計期間重疊: 飯店 {hotel_id}, {start_date} ~ {end_date}")]
    DuplicatePeriod {
        hotel_id: String,
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
    },

    #[error("無效的期間範圍: {start_date} ~ {end_date}")]
    InvalidPeriodRange {
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
    },

    #[error("無效的狀態轉換: {0}")]
    InvalidStateTransition(String),

    /// 滾轉找不到前期結存快照。滾轉流程本身以警告物件回報此狀況，
    /// 僅在呼叫端明確要求前期快照時才作為錯誤拋出
    #[error("找不到前期結存快照: 品項 {sku}, 期間 {start_date} ~ {end_date}")]
    MissingPriorSnapshot {
        sku: String,
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
    },

    #[error("找不到品項: {0}")]
    ItemNotFound(String),

    #[error("找不到會計期間: {0}")]
    PeriodNotFound(String),

    #[error("找不到盤點單: {0}")]
    StocktakeNotFound(String),

    /// 盤點核准整批中止，逐一列出配置無效的品項與原因
    #[error("盤點核准中止，{} 個品項無法計算: {failures:?}", .failures.len())]
    ApprovalAborted { failures: Vec<(String, String)> },
}

pub type Result<T> = std::result::Result<T, StockError>;
