//! 期末結存快照模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::PeriodId;

/// 期末結存快照
///
/// 每（品項, 期間）一筆，是下一期間期初量的唯一來源。
/// 期間關帳後快照不可變，僅能經由明確的重新開帳路徑重算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// 品項編號
    pub sku: String,

    /// 所屬期間
    pub period_id: PeriodId,

    /// 期末整容器數（桶/箱/瓶/盒）
    pub closing_full_units: Decimal,

    /// 期末零散數（散瓶或容器比例）
    pub closing_partial_units: Decimal,

    /// 期末結存金額
    pub closing_value: Decimal,
}

impl Snapshot {
    /// 創建新的快照
    pub fn new(
        sku: String,
        period_id: PeriodId,
        closing_full_units: Decimal,
        closing_partial_units: Decimal,
        closing_value: Decimal,
    ) -> Self {
        Self {
            sku,
            period_id,
            closing_full_units,
            closing_partial_units,
            closing_value,
        }
    }

    /// 檢查計數與金額是否與給定值一致（核准冪等判斷用）
    pub fn matches_count(
        &self,
        full_units: Decimal,
        partial_units: Decimal,
        value: Decimal,
    ) -> bool {
        self.closing_full_units == full_units
            && self.closing_partial_units == partial_units
            && self.closing_value == value
    }
}
