//! 盤點單模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{MovementTotals, Period};

/// 盤點識別碼
///
/// 與 [`crate::PeriodId`] 是不同型別，無法互相指派。
/// 盤點單一律以（飯店, 期間起日, 期間迄日）定位
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StocktakeId(pub Uuid);

impl StocktakeId {
    /// 產生新的識別碼
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl core::fmt::Display for StocktakeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// 盤點狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StocktakeStatus {
    /// 草稿（可編輯，期望量與差異隨需重算）
    Draft,
    /// 已核准（唯讀，快照已具體化；僅能經重新開帳回到草稿）
    Approved,
}

/// 盤點單
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stocktake {
    /// 盤點識別碼
    pub id: StocktakeId,

    /// 飯店
    pub hotel_id: String,

    /// 期間起日
    pub start_date: NaiveDate,

    /// 期間迄日
    pub end_date: NaiveDate,

    /// 狀態
    pub status: StocktakeStatus,
}

impl Stocktake {
    /// 創建新的盤點單（草稿狀態）
    pub fn new(
        hotel_id: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: StocktakeId::generate(),
            hotel_id,
            start_date,
            end_date,
            status: StocktakeStatus::Draft,
        }
    }

    /// 檢查是否對應給定期間（飯店與日期範圍完全一致）
    pub fn matches_period(&self, period: &Period) -> bool {
        self.hotel_id == period.hotel_id
            && period.date_range_matches(self.start_date, self.end_date)
    }

    pub fn is_draft(&self) -> bool {
        self.status == StocktakeStatus::Draft
    }

    pub fn is_approved(&self) -> bool {
        self.status == StocktakeStatus::Approved
    }
}

/// 盤點明細行（每品項一行）
///
/// 數量欄位一律為品項的標準化份數單位；實際盤點輸入
/// （`counted_full_units` / `counted_partial_units`）保留員工登錄的原始實體計數
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StocktakeLine {
    /// 品項編號
    pub sku: String,

    /// 期初量（前期快照滾轉而來）
    pub opening_qty: Decimal,

    /// 進貨
    pub purchases: Decimal,

    /// 銷售
    pub sales: Decimal,

    /// 耗損
    pub waste: Decimal,

    /// 調入
    pub transfers_in: Decimal,

    /// 調出
    pub transfers_out: Decimal,

    /// 調整
    pub adjustments: Decimal,

    /// 盤點整容器數（員工輸入）
    pub counted_full_units: Decimal,

    /// 盤點零散數（員工輸入）
    pub counted_partial_units: Decimal,

    /// 每標準化單位的估價成本
    pub valuation_cost: Decimal,

    /// 彙總欄位是否經人工覆寫（無自動餵入時的手動登錄）
    /// 覆寫的行在核准時凍結人工數字，不再讀取帳本彙總
    pub totals_overridden: bool,
}

impl StocktakeLine {
    /// 創建新的明細行（異動與計數皆為零）
    pub fn new(sku: String, opening_qty: Decimal) -> Self {
        Self {
            sku,
            opening_qty,
            purchases: Decimal::ZERO,
            sales: Decimal::ZERO,
            waste: Decimal::ZERO,
            transfers_in: Decimal::ZERO,
            transfers_out: Decimal::ZERO,
            adjustments: Decimal::ZERO,
            counted_full_units: Decimal::ZERO,
            counted_partial_units: Decimal::ZERO,
            valuation_cost: Decimal::ZERO,
            totals_overridden: false,
        }
    }

    /// 建構器模式：設置盤點計數
    pub fn with_counted(mut self, full_units: Decimal, partial_units: Decimal) -> Self {
        self.counted_full_units = full_units;
        self.counted_partial_units = partial_units;
        self
    }

    /// 寫入帳本彙總（覆寫行不受影響）
    pub fn apply_totals(&mut self, totals: &MovementTotals) {
        if self.totals_overridden {
            return;
        }
        self.purchases = totals.purchases;
        self.sales = totals.sales;
        self.waste = totals.waste;
        self.transfers_in = totals.transfers_in;
        self.transfers_out = totals.transfers_out;
        self.adjustments = totals.adjustments;
    }

    /// 人工覆寫彙總欄位
    pub fn override_totals(&mut self, totals: &MovementTotals) {
        self.purchases = totals.purchases;
        self.sales = totals.sales;
        self.waste = totals.waste;
        self.transfers_in = totals.transfers_in;
        self.transfers_out = totals.transfers_out;
        self.adjustments = totals.adjustments;
        self.totals_overridden = true;
    }

    /// 取出彙總欄位
    pub fn totals(&self) -> MovementTotals {
        MovementTotals {
            purchases: self.purchases,
            sales: self.sales,
            waste: self.waste,
            transfers_in: self.transfers_in,
            transfers_out: self.transfers_out,
            adjustments: self.adjustments,
        }
    }

    /// 期望庫存 = 期初 + 進貨 + 調入 - 銷售 - 耗損 - 調出 + 調整
    pub fn expected_qty(&self) -> Decimal {
        self.opening_qty + self.totals().net_change()
    }
}
