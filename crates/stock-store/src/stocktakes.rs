//! 盤點單存儲
//!
//! 盤點單一律以（飯店, 期間起日, 期間迄日）定位，
//! 與期間識別碼是兩個身分，絕不互換

use rust_decimal::Decimal;
use std::collections::HashMap;

use stock_core::{
    MovementTotals, Period, Result, StockError, Stocktake, StocktakeId, StocktakeLine,
    StocktakeStatus,
};

/// 盤點單存儲
#[derive(Debug, Clone, Default)]
pub struct StocktakeRepository {
    stocktakes: HashMap<StocktakeId, Stocktake>,
    lines: HashMap<StocktakeId, Vec<StocktakeLine>>,
}

impl StocktakeRepository {
    /// 創建空存儲
    pub fn new() -> Self {
        Self {
            stocktakes: HashMap::new(),
            lines: HashMap::new(),
        }
    }

    /// 寫入盤點單與明細行
    pub fn insert(&mut self, stocktake: Stocktake, lines: Vec<StocktakeLine>) -> StocktakeId {
        let id = stocktake.id;
        self.stocktakes.insert(id, stocktake);
        self.lines.insert(id, lines);
        id
    }

    /// 查詢盤點單
    pub fn get(&self, id: StocktakeId) -> Result<&Stocktake> {
        self.stocktakes
            .get(&id)
            .ok_or_else(|| StockError::StocktakeNotFound(id.to_string()))
    }

    /// 依期間定位盤點單（標準查詢路徑：飯店 + 日期範圍）
    pub fn find_for_period(&self, period: &Period) -> Result<&Stocktake> {
        self.stocktakes
            .values()
            .find(|s| s.matches_period(period))
            .ok_or_else(|| {
                StockError::StocktakeNotFound(format!(
                    "飯店 {}, 期間 {} ~ {}",
                    period.hotel_id, period.start_date, period.end_date
                ))
            })
    }

    /// 盤點明細行
    pub fn lines(&self, id: StocktakeId) -> Result<&[StocktakeLine]> {
        self.lines
            .get(&id)
            .map(|v| v.as_slice())
            .ok_or_else(|| StockError::StocktakeNotFound(id.to_string()))
    }

    /// 登錄盤點計數（僅限草稿）
    pub fn set_counted(
        &mut self,
        id: StocktakeId,
        sku: &str,
        full_units: Decimal,
        partial_units: Decimal,
    ) -> Result<()> {
        self.ensure_draft(id)?;
        let line = self.line_mut(id, sku)?;
        line.counted_full_units = full_units;
        line.counted_partial_units = partial_units;
        Ok(())
    }

    /// 人工覆寫彙總欄位（僅限草稿，無自動餵入時使用）
    pub fn override_totals(
        &mut self,
        id: StocktakeId,
        sku: &str,
        totals: &MovementTotals,
    ) -> Result<()> {
        self.ensure_draft(id)?;
        let line = self.line_mut(id, sku)?;
        line.override_totals(totals);
        Ok(())
    }

    /// 設置狀態（僅限盤點流程內部呼叫）
    pub(crate) fn set_status(&mut self, id: StocktakeId, status: StocktakeStatus) -> Result<()> {
        let stocktake = self
            .stocktakes
            .get_mut(&id)
            .ok_or_else(|| StockError::StocktakeNotFound(id.to_string()))?;
        stocktake.status = status;
        Ok(())
    }

    /// 覆寫明細行（核准時凍結彙總用）
    pub(crate) fn replace_lines(&mut self, id: StocktakeId, lines: Vec<StocktakeLine>) {
        self.lines.insert(id, lines);
    }

    fn ensure_draft(&self, id: StocktakeId) -> Result<()> {
        let stocktake = self.get(id)?;
        if !stocktake.is_draft() {
            return Err(StockError::InvalidStateTransition(format!(
                "盤點單 {} 已核准，明細唯讀；修改前須先重新開帳",
                id
            )));
        }
        Ok(())
    }

    fn line_mut(&mut self, id: StocktakeId, sku: &str) -> Result<&mut StocktakeLine> {
        self.lines
            .get_mut(&id)
            .and_then(|lines| lines.iter_mut().find(|l| l.sku == sku))
            .ok_or_else(|| StockError::ItemNotFound(sku.to_string()))
    }

    pub fn len(&self) -> usize {
        self.stocktakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocktakes.is_empty()
    }
}
