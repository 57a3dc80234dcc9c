//! 期間滾轉
//!
//! 以前期的期末快照為新期間盤點行的期初量。
//! 找不到前期快照時期初以 0 計，並且必須產生呼叫端看得到的警告物件，
//! 不允許只寫日誌就默默放行：無聲的零期初曾在這個領域
//! 連鎖污染整個月的差異與銷貨成本

use rust_decimal::Decimal;

use stock_calc::{StockWarning, UomCatalog};
use stock_core::{HotelConfig, Item, Period, Result, Snapshot, StocktakeId};

/// 滾轉結果
#[derive(Debug)]
pub struct RolloverOutcome {
    /// 新建立的盤點單
    pub stocktake_id: StocktakeId,

    /// 滾轉過程的警告（缺前期快照等）
    pub warnings: Vec<StockWarning>,
}

impl RolloverOutcome {
    /// 檢查是否有警告以上等級的訊息
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// 滾轉計算器
pub struct RolloverCalculator;

impl RolloverCalculator {
    /// 由前期快照換算期初份數
    ///
    /// 回傳（期初份數, 警告）。快照存在時以標準化換算取份數；
    /// 不存在時期初為 0 並附帶警告
    pub fn opening_from_snapshot(
        item: &Item,
        config: &HotelConfig,
        snapshot: Option<&Snapshot>,
        prior_period: &Period,
    ) -> Result<(Decimal, Option<StockWarning>)> {
        match snapshot {
            Some(snapshot) => {
                let count = UomCatalog::normalize(
                    item,
                    config,
                    snapshot.closing_full_units,
                    snapshot.closing_partial_units,
                )?;
                Ok((count.servings, None))
            }
            None => {
                let warning = StockWarning::warning(
                    item.sku.clone(),
                    format!(
                        "找不到前期結存快照（{} ~ {}），期初量以 0 計，請查核",
                        prior_period.start_date, prior_period.end_date
                    ),
                );
                Ok((Decimal::ZERO, Some(warning)))
            }
        }
    }
}
