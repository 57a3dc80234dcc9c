//! 庫存總存儲與流程交易
//!
//! 核准與重新開帳都是先驗證後提交：驗證階段任何錯誤直接返回、
//! 不留半套狀態；提交階段只做不會失敗的寫入。
//! 跨執行緒的序列化由 [`SharedStore`] 提供，等同資料列鎖

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

use stock_calc::{StocktakeEngine, StocktakeReport, StockWarning};
use stock_core::{
    HotelConfig, Item, ItemCatalog, Movement, MovementTotals, Period, PeriodId, PeriodType,
    Result, Snapshot, StockError, Stocktake, StocktakeId, StocktakeLine,
};
use rust_decimal::Decimal;

use crate::ledger::MovementLedger;
use crate::periods::PeriodManager;
use crate::rollover::{RolloverCalculator, RolloverOutcome};
use crate::snapshots::SnapshotStore;
use crate::stocktakes::StocktakeRepository;

/// 核准結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// 本次核准生效，寫入給定筆數的快照
    Approved { snapshot_count: usize },
    /// 已核准且計數未變，冪等不動作
    AlreadyApproved,
}

/// 重新開帳審計記錄
#[derive(Debug, Clone)]
pub struct ReopenAudit {
    /// 重新開帳的期間
    pub period_id: PeriodId,

    /// 操作人
    pub actor: String,

    /// 操作時間
    pub reopened_at: DateTime<Utc>,
}

/// 庫存總存儲
///
/// 持有品項目錄、異動帳本、期間、快照與盤點單，
/// 並提供跨實體的交易操作（滾轉、核准、重新開帳、批次重算）
pub struct StockStore {
    engine: StocktakeEngine,
    ledger: MovementLedger,
    periods: PeriodManager,
    snapshots: SnapshotStore,
    stocktakes: StocktakeRepository,
    reopen_audits: Vec<ReopenAudit>,
}

impl StockStore {
    /// 創建新的存儲
    pub fn new(catalog: ItemCatalog, config: HotelConfig) -> Self {
        Self {
            engine: StocktakeEngine::new(catalog, config),
            ledger: MovementLedger::new(),
            periods: PeriodManager::new(),
            snapshots: SnapshotStore::new(),
            stocktakes: StocktakeRepository::new(),
            reopen_audits: Vec::new(),
        }
    }

    /// 登錄品項（型錄管理同步）
    pub fn add_item(&mut self, item: Item) {
        self.engine.catalog_mut().insert(item);
    }

    /// 記錄一筆異動（品項必須已登錄）
    pub fn record_movement(&mut self, movement: Movement) -> Result<()> {
        self.engine.catalog().require(&movement.sku)?;
        self.ledger.record(movement);
        Ok(())
    }

    /// 建立會計期間（飯店取自配置）
    pub fn create_period(
        &mut self,
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
        period_type: PeriodType,
    ) -> Result<PeriodId> {
        let hotel_id = self.engine.config().hotel_id.clone();
        self.periods
            .create_period(&hotel_id, start_date, end_date, period_type)
    }

    /// 初始化期間的盤點單（滾轉）
    ///
    /// 每個目錄品項一行，期初量取前期快照；缺快照的品項期初以 0 計
    /// 並在結果中附帶警告物件
    pub fn initialize_stocktake(&mut self, period_id: PeriodId) -> Result<RolloverOutcome> {
        let period = self.periods.get(period_id)?.clone();

        if period.is_closed {
            return Err(StockError::InvalidStateTransition(format!(
                "期間 {} 已關帳，無法建立盤點單",
                period_id
            )));
        }
        if self.stocktakes.find_for_period(&period).is_ok() {
            return Err(StockError::InvalidStateTransition(format!(
                "期間 {} ~ {} 已有盤點單",
                period.start_date, period.end_date
            )));
        }

        let prior = self.periods.prior_period(&period).cloned();
        let config = self.engine.config().clone();
        let mut warnings: Vec<StockWarning> = Vec::new();
        let mut lines: Vec<StocktakeLine> = Vec::new();

        for sku in self.engine.catalog().skus() {
            let item = self.engine.catalog().require(&sku)?;
            let opening = match &prior {
                Some(prior_period) => {
                    let snapshot = self.snapshots.get(&sku, prior_period.id);
                    let (opening, warning) = RolloverCalculator::opening_from_snapshot(
                        item,
                        &config,
                        snapshot,
                        prior_period,
                    )?;
                    if let Some(warning) = warning {
                        warnings.push(warning);
                    }
                    opening
                }
                None => Decimal::ZERO,
            };
            lines.push(StocktakeLine::new(sku, opening));
        }

        if prior.is_none() {
            // "*" 表整張盤點單，首期沒有前期可滾轉
            warnings.push(StockWarning::info(
                "*".to_string(),
                "無前期期間，全部品項期初量以 0 計".to_string(),
            ));
        }

        let stocktake = Stocktake::new(
            period.hotel_id.clone(),
            period.start_date,
            period.end_date,
        );
        let stocktake_id = self.stocktakes.insert(stocktake, lines);

        tracing::info!(
            "初始化盤點單: 期間 {} ~ {}, {} 行, {} 則警告",
            period.start_date,
            period.end_date,
            self.engine.catalog().len(),
            warnings.len()
        );

        Ok(RolloverOutcome {
            stocktake_id,
            warnings,
        })
    }

    /// 登錄盤點計數（僅限草稿）
    pub fn set_counted(
        &mut self,
        stocktake_id: StocktakeId,
        sku: &str,
        full_units: Decimal,
        partial_units: Decimal,
    ) -> Result<()> {
        self.stocktakes
            .set_counted(stocktake_id, sku, full_units, partial_units)
    }

    /// 人工覆寫明細行彙總（僅限草稿）
    pub fn override_line_totals(
        &mut self,
        stocktake_id: StocktakeId,
        sku: &str,
        totals: &MovementTotals,
    ) -> Result<()> {
        self.stocktakes.override_totals(stocktake_id, sku, totals)
    }

    /// 草稿盤點的即時計算（讀取即時帳本彙總，不改變任何狀態）
    pub fn compute_stocktake(&self, stocktake_id: StocktakeId) -> Result<StocktakeReport> {
        let stocktake = self.stocktakes.get(stocktake_id)?.clone();
        let period = self.period_for_stocktake(&stocktake)?;
        let lines = self.working_lines(stocktake_id, &period)?;
        self.engine.compute(&stocktake, &lines)
    }

    /// 批次重算（管理員觸發，全行平行計算；僅限草稿期間）
    pub fn recalculate_stocktake(&self, stocktake_id: StocktakeId) -> Result<StocktakeReport> {
        let stocktake = self.stocktakes.get(stocktake_id)?.clone();
        if !stocktake.is_draft() {
            return Err(StockError::InvalidStateTransition(format!(
                "盤點單 {} 已核准，重算前須先重新開帳",
                stocktake_id
            )));
        }
        let period = self.period_for_stocktake(&stocktake)?;
        let lines = self.working_lines(stocktake_id, &period)?;
        self.engine.compute_parallel(&stocktake, &lines)
    }

    /// 核准盤點單
    ///
    /// 單一交易：凍結帳本彙總進明細行、每行寫入期末快照、
    /// 盤點單轉已核准、期間關帳。任何一行配置無效即整批中止，
    /// 不留部分寫入。對已核准且計數未變的盤點單冪等不動作
    pub fn approve_stocktake(&mut self, stocktake_id: StocktakeId) -> Result<ApprovalOutcome> {
        let stocktake = self.stocktakes.get(stocktake_id)?.clone();
        let period = self.period_for_stocktake(&stocktake)?;

        if stocktake.is_approved() {
            return self.verify_idempotent_approval(&stocktake, &period);
        }

        // 驗證階段：凍結彙總並完整計算，任何錯誤在這裡返回
        let frozen_lines = self.working_lines(stocktake_id, &period)?;
        let report = self.engine.compute(&stocktake, &frozen_lines)?;

        // 提交階段：以下寫入不會失敗
        let snapshot_count = report.lines.len();
        for (line, computed) in frozen_lines.iter().zip(report.lines.iter()) {
            self.snapshots.upsert(Snapshot::new(
                line.sku.clone(),
                period.id,
                line.counted_full_units,
                line.counted_partial_units,
                computed.counted_value,
            ));
        }
        self.stocktakes.replace_lines(stocktake_id, frozen_lines);
        self.stocktakes
            .set_status(stocktake_id, stock_core::StocktakeStatus::Approved)?;
        self.periods.set_closed(period.id, true)?;

        tracing::info!(
            "核准盤點單: 期間 {} ~ {}, 寫入 {} 筆快照，期間關帳",
            period.start_date,
            period.end_date,
            snapshot_count
        );

        Ok(ApprovalOutcome::Approved { snapshot_count })
    }

    /// 關閉期間（僅在對應盤點單已核准時允許；重複關帳為冪等）
    pub fn close_period(&mut self, period_id: PeriodId) -> Result<()> {
        let period = self.periods.get(period_id)?.clone();
        if period.is_closed {
            return Ok(());
        }

        let stocktake = self.stocktakes.find_for_period(&period)?;
        if !stocktake.is_approved() {
            return Err(StockError::InvalidStateTransition(format!(
                "期間 {} ~ {} 的盤點單尚未核准，不可關帳",
                period.start_date, period.end_date
            )));
        }

        self.periods.set_closed(period_id, true)
    }

    /// 重新開帳
    ///
    /// 單一交易：期間開帳、盤點單退回草稿、清除該期間全部快照、
    /// 寫入審計記錄。中間狀態不可被觀察到
    pub fn reopen_period(&mut self, period_id: PeriodId, actor: &str) -> Result<()> {
        let period = self.periods.get(period_id)?.clone();
        if !period.is_closed {
            return Err(StockError::InvalidStateTransition(format!(
                "期間 {} ~ {} 尚未關帳，無可重新開帳",
                period.start_date, period.end_date
            )));
        }

        let stocktake = self.stocktakes.find_for_period(&period)?.clone();
        if !stocktake.is_approved() {
            return Err(StockError::InvalidStateTransition(format!(
                "期間 {} ~ {} 已關帳但盤點單不在已核准狀態，資料不一致",
                period.start_date, period.end_date
            )));
        }

        // 驗證完成，以下為不會失敗的提交
        self.periods.set_closed(period_id, false)?;
        self.stocktakes
            .set_status(stocktake.id, stock_core::StocktakeStatus::Draft)?;
        let removed = self.snapshots.remove_period(period_id);
        self.reopen_audits.push(ReopenAudit {
            period_id,
            actor: actor.to_string(),
            reopened_at: Utc::now(),
        });

        tracing::info!(
            "重新開帳: 期間 {} ~ {}, 清除 {} 筆快照, 操作人 {}",
            period.start_date,
            period.end_date,
            removed,
            actor
        );

        Ok(())
    }

    /// 已核准盤點單的冪等檢查：計數與既有快照一致即不動作，
    /// 不一致代表有人繞過重新開帳改值，直接拒絕
    fn verify_idempotent_approval(
        &self,
        stocktake: &Stocktake,
        period: &Period,
    ) -> Result<ApprovalOutcome> {
        let lines = self.stocktakes.lines(stocktake.id)?;
        let report = self.engine.compute(stocktake, lines)?;

        for (line, computed) in lines.iter().zip(report.lines.iter()) {
            let matches = self
                .snapshots
                .get(&line.sku, period.id)
                .map(|snapshot| {
                    snapshot.matches_count(
                        line.counted_full_units,
                        line.counted_partial_units,
                        computed.counted_value,
                    )
                })
                .unwrap_or(false);

            if !matches {
                return Err(StockError::InvalidStateTransition(format!(
                    "盤點單 {} 已核准且品項 {} 的計數與快照不符，覆寫前須先重新開帳",
                    stocktake.id, line.sku
                )));
            }
        }

        Ok(ApprovalOutcome::AlreadyApproved)
    }

    /// 取用中的明細行：未覆寫的行套上即時帳本彙總
    fn working_lines(
        &self,
        stocktake_id: StocktakeId,
        period: &Period,
    ) -> Result<Vec<StocktakeLine>> {
        let mut lines = self.stocktakes.lines(stocktake_id)?.to_vec();
        for line in &mut lines {
            if !line.totals_overridden {
                line.apply_totals(&self.ledger.aggregate(&line.sku, period));
            }
        }
        Ok(lines)
    }

    /// 依（飯店, 日期範圍）反查盤點單所屬期間
    fn period_for_stocktake(&self, stocktake: &Stocktake) -> Result<Period> {
        self.periods
            .find_by_range(
                &stocktake.hotel_id,
                stocktake.start_date,
                stocktake.end_date,
            )
            .cloned()
            .ok_or_else(|| {
                StockError::PeriodNotFound(format!(
                    "飯店 {}, {} ~ {}",
                    stocktake.hotel_id, stocktake.start_date, stocktake.end_date
                ))
            })
    }

    /// 取得品項在指定期間的期末快照，不存在即錯誤
    ///
    /// 歷史比對工具等明確要求前期結存的呼叫端使用；
    /// 滾轉流程本身以警告物件回報缺快照，不走這條路徑
    pub fn closing_snapshot(&self, sku: &str, period_id: PeriodId) -> Result<&Snapshot> {
        let period = self.periods.get(period_id)?;
        self.snapshots
            .get(sku, period_id)
            .ok_or_else(|| StockError::MissingPriorSnapshot {
                sku: sku.to_string(),
                start_date: period.start_date,
                end_date: period.end_date,
            })
    }

    /// 依期間定位盤點單（標準查詢路徑）
    pub fn find_stocktake_for_period(&self, period_id: PeriodId) -> Result<&Stocktake> {
        let period = self.periods.get(period_id)?;
        self.stocktakes.find_for_period(period)
    }

    pub fn period(&self, id: PeriodId) -> Result<&Period> {
        self.periods.get(id)
    }

    pub fn stocktake(&self, id: StocktakeId) -> Result<&Stocktake> {
        self.stocktakes.get(id)
    }

    pub fn stocktake_lines(&self, id: StocktakeId) -> Result<&[StocktakeLine]> {
        self.stocktakes.lines(id)
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    pub fn ledger(&self) -> &MovementLedger {
        &self.ledger
    }

    pub fn reopen_audits(&self) -> &[ReopenAudit] {
        &self.reopen_audits
    }

    pub fn config(&self) -> &HotelConfig {
        self.engine.config()
    }

    pub fn catalog(&self) -> &ItemCatalog {
        self.engine.catalog()
    }
}

/// 跨執行緒共享的存儲
///
/// 同一時刻僅一個交易持有鎖，併發核准因此序列化：
/// 至多一個核准生效，其餘觀察到冪等不動作或明確錯誤
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<StockStore>>,
}

impl SharedStore {
    /// 包裝存儲為共享存儲
    pub fn new(store: StockStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// 鎖定後執行操作
    pub fn with<R>(&self, f: impl FnOnce(&mut StockStore) -> R) -> R {
        let mut guard = self.inner.lock().expect("共享存儲鎖已毒化");
        f(&mut guard)
    }

    /// 核准盤點單（序列化）
    pub fn approve_stocktake(&self, stocktake_id: StocktakeId) -> Result<ApprovalOutcome> {
        self.with(|store| store.approve_stocktake(stocktake_id))
    }

    /// 重新開帳（序列化）
    pub fn reopen_period(&self, period_id: PeriodId, actor: &str) -> Result<()> {
        self.with(|store| store.reopen_period(period_id, actor))
    }
}
