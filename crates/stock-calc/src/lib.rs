//! # Stock Calculation Engine
//!
//! 盤點對帳與估價計算引擎

pub mod engine;
pub mod reconcile;
pub mod uom;
pub mod valuation;

// Re-export 主要類型
pub use engine::StocktakeEngine;
pub use reconcile::{LineComputation, ReconciliationCalculator};
pub use uom::{CountRule, NormalizedCount, UomCatalog, UomRule, ValuationMode};
pub use valuation::ValuationCalculator;

use rust_decimal::Decimal;
use stock_core::Category;

/// 盤點計算結果
#[derive(Debug, Clone)]
pub struct StocktakeReport {
    /// 逐行計算結果
    pub lines: Vec<LineComputation>,

    /// 類別彙總
    pub rollups: Vec<CategoryRollup>,

    /// 警告信息
    pub warnings: Vec<StockWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl StocktakeReport {
    /// 創建空的計算結果
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            rollups: Vec::new(),
            warnings: Vec::new(),
            calculation_time_ms: None,
        }
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: StockWarning) {
        self.warnings.push(warning);
    }

    /// 全盤差異金額
    pub fn total_variance_value(&self) -> Decimal {
        self.lines.iter().map(|l| l.variance_value).sum()
    }

    /// 全盤盤點金額
    pub fn total_counted_value(&self) -> Decimal {
        self.lines.iter().map(|l| l.counted_value).sum()
    }
}

/// 類別彙總（報表輸出）
#[derive(Debug, Clone)]
pub struct CategoryRollup {
    pub category: Category,
    pub opening_qty: Decimal,
    pub expected_qty: Decimal,
    pub counted_qty: Decimal,
    pub variance_qty: Decimal,
    pub expected_value: Decimal,
    pub counted_value: Decimal,
    pub variance_value: Decimal,
}

impl CategoryRollup {
    /// 創建零值彙總
    pub fn empty(category: Category) -> Self {
        Self {
            category,
            opening_qty: Decimal::ZERO,
            expected_qty: Decimal::ZERO,
            counted_qty: Decimal::ZERO,
            variance_qty: Decimal::ZERO,
            expected_value: Decimal::ZERO,
            counted_value: Decimal::ZERO,
            variance_value: Decimal::ZERO,
        }
    }

    /// 累加一行計算結果
    pub fn accumulate(&mut self, line: &LineComputation) {
        self.opening_qty += line.opening_qty;
        self.expected_qty += line.expected_qty;
        self.counted_qty += line.counted_qty;
        self.variance_qty += line.variance_qty;
        self.expected_value += line.expected_value;
        self.counted_value += line.counted_value;
        self.variance_value += line.variance_value;
    }
}

/// 盤點警告
#[derive(Debug, Clone)]
pub struct StockWarning {
    pub sku: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl StockWarning {
    pub fn new(sku: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            sku,
            message,
            severity,
        }
    }

    pub fn info(sku: String, message: String) -> Self {
        Self::new(sku, message, WarningSeverity::Info)
    }

    pub fn warning(sku: String, message: String) -> Self {
        Self::new(sku, message, WarningSeverity::Warning)
    }

    pub fn error(sku: String, message: String) -> Self {
        Self::new(sku, message, WarningSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}
