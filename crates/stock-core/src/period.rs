//! 會計期間模型

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 期間識別碼
///
/// 與 [`crate::StocktakeId`] 是不同型別：期間與盤點單各有身分，
/// 只能透過（飯店, 日期範圍）對應，絕不能互換識別碼
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodId(pub Uuid);

impl PeriodId {
    /// 產生新的識別碼
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl core::fmt::Display for PeriodId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// 期間類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodType {
    /// 月結
    Monthly,
    /// 週結
    Weekly,
}

/// 會計期間
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Period {
    /// 期間識別碼
    pub id: PeriodId,

    /// 飯店
    pub hotel_id: String,

    /// 起日
    pub start_date: NaiveDate,

    /// 迄日（當日整天計入期間）
    pub end_date: NaiveDate,

    /// 期間類別
    pub period_type: PeriodType,

    /// 是否已關帳
    pub is_closed: bool,
}

impl Period {
    /// 創建新的期間（開帳狀態）
    pub fn new(
        hotel_id: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        period_type: PeriodType,
    ) -> Self {
        Self {
            id: PeriodId::generate(),
            hotel_id,
            start_date,
            end_date,
            period_type,
            is_closed: false,
        }
    }

    /// 檢查日期是否落在期間內（迄日整天計入）
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// 檢查與另一期間是否重疊（僅比較同一飯店）
    pub fn overlaps(&self, other: &Period) -> bool {
        self.hotel_id == other.hotel_id
            && self.start_date <= other.end_date
            && other.start_date <= self.end_date
    }

    /// 期間所屬的（年, 月）鍵，取起日所在月份
    pub fn month_key(&self) -> (i32, u32) {
        (self.start_date.year(), self.start_date.month())
    }

    /// 檢查日期範圍是否完全一致
    pub fn date_range_matches(&self, start_date: NaiveDate, end_date: NaiveDate) -> bool {
        self.start_date == start_date && self.end_date == end_date
    }
}
