//! 盤點引擎
//!
//! 整張盤點單的計算入口：配置檢核、逐行對帳、類別彙總與警示

use rayon::prelude::*;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use stock_core::{
    Category, HotelConfig, ItemCatalog, Result, StockError, Stocktake, StocktakeLine,
};

use crate::reconcile::{LineComputation, ReconciliationCalculator};
use crate::uom::UomCatalog;
use crate::{CategoryRollup, StockWarning, StocktakeReport};

/// 盤點引擎
pub struct StocktakeEngine {
    /// 品項目錄
    catalog: ItemCatalog,

    /// 飯店配置
    config: HotelConfig,
}

impl StocktakeEngine {
    /// 創建新的盤點引擎
    pub fn new(catalog: ItemCatalog, config: HotelConfig) -> Self {
        Self { catalog, config }
    }

    /// 計算整張盤點單
    ///
    /// 任何一行的計量配置無效即整批中止，並列出全部無效品項
    pub fn compute(&self, stocktake: &Stocktake, lines: &[StocktakeLine]) -> Result<StocktakeReport> {
        tracing::info!(
            "開始盤點計算: 飯店 {}, 期間 {} ~ {}, {} 行",
            stocktake.hotel_id,
            stocktake.start_date,
            stocktake.end_date,
            lines.len()
        );

        let start_time = std::time::Instant::now();

        // Step 1: 全行配置檢核（全有或全無）
        tracing::debug!("Step 1: 配置檢核");
        self.validate_lines(lines)?;

        // Step 2: 逐行對帳
        tracing::debug!("Step 2: 逐行對帳");
        let computed = lines
            .iter()
            .map(|line| self.compute_line(line))
            .collect::<Result<Vec<_>>>()?;

        // Step 3: 類別彙總
        tracing::debug!("Step 3: 類別彙總");
        let rollups = Self::rollup(&computed);

        // Step 4: 警示收集
        tracing::debug!("Step 4: 警示收集");
        let warnings = self.collect_warnings(&computed);

        let mut report = StocktakeReport::empty();
        report.lines = computed;
        report.rollups = rollups;
        report.warnings = warnings;
        report.calculation_time_ms = Some(start_time.elapsed().as_millis());

        tracing::info!(
            "盤點計算完成，耗時 {:?}，差異金額 {}",
            start_time.elapsed(),
            report.total_variance_value()
        );

        Ok(report)
    }

    /// 平行計算整張盤點單（管理員批次重算用，結果與逐行版一致）
    pub fn compute_parallel(
        &self,
        stocktake: &Stocktake,
        lines: &[StocktakeLine],
    ) -> Result<StocktakeReport> {
        tracing::info!(
            "開始批次重算: 飯店 {}, 期間 {} ~ {}, {} 行",
            stocktake.hotel_id,
            stocktake.start_date,
            stocktake.end_date,
            lines.len()
        );

        let start_time = std::time::Instant::now();

        self.validate_lines(lines)?;

        let computed = lines
            .par_iter()
            .map(|line| self.compute_line(line))
            .collect::<Result<Vec<_>>>()?;

        let rollups = Self::rollup(&computed);
        let warnings = self.collect_warnings(&computed);

        let mut report = StocktakeReport::empty();
        report.lines = computed;
        report.rollups = rollups;
        report.warnings = warnings;
        report.calculation_time_ms = Some(start_time.elapsed().as_millis());

        Ok(report)
    }

    /// 檢核全部行的品項與計量配置，收集全部失敗再回報
    fn validate_lines(&self, lines: &[StocktakeLine]) -> Result<()> {
        let mut failures: Vec<(String, String)> = Vec::new();

        for line in lines {
            match self.catalog.get(&line.sku) {
                None => failures.push((line.sku.clone(), "品項未登錄".to_string())),
                Some(item) => {
                    if let Err(err) = UomCatalog::normalize(
                        item,
                        &self.config,
                        line.counted_full_units,
                        line.counted_partial_units,
                    ) {
                        failures.push((line.sku.clone(), err.to_string()));
                    }
                }
            }
        }

        if !failures.is_empty() {
            tracing::warn!("盤點計算中止，{} 個品項配置無效", failures.len());
            return Err(StockError::ApprovalAborted { failures });
        }

        Ok(())
    }

    /// 單行計算（檢核已通過）
    fn compute_line(&self, line: &StocktakeLine) -> Result<LineComputation> {
        let item = self.catalog.require(&line.sku)?;
        ReconciliationCalculator::compute_line(item, &self.config, line)
    }

    /// 類別彙總（依類別順序輸出）
    fn rollup(lines: &[LineComputation]) -> Vec<CategoryRollup> {
        let mut by_category: BTreeMap<Category, CategoryRollup> = BTreeMap::new();

        for line in lines {
            by_category
                .entry(line.category)
                .or_insert_with(|| CategoryRollup::empty(line.category))
                .accumulate(line);
        }

        by_category.into_values().collect()
    }

    /// 低庫存與差異警示
    fn collect_warnings(&self, lines: &[LineComputation]) -> Vec<StockWarning> {
        let mut warnings = Vec::new();

        for line in lines {
            if line.counted_physical_units < self.config.low_stock_threshold {
                warnings.push(StockWarning::info(
                    line.sku.clone(),
                    format!(
                        "低庫存: 實體 {} 容器，低於門檻 {}",
                        line.counted_physical_units, self.config.low_stock_threshold
                    ),
                ));
            }

            let alert_limit =
                line.expected_value.abs() * self.config.variance_alert_pct / Decimal::from(100);
            if line.variance_value.abs() > alert_limit && !line.expected_value.is_zero() {
                warnings.push(StockWarning::warning(
                    line.sku.clone(),
                    format!(
                        "差異金額 {} 超出期望價值 {} 的 {}%",
                        line.variance_value, line.expected_value, self.config.variance_alert_pct
                    ),
                ));
            }
        }

        warnings
    }

    /// 獲取品項目錄引用
    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    /// 獲取品項目錄可變引用（型錄管理同步新品項用）
    pub fn catalog_mut(&mut self) -> &mut ItemCatalog {
        &mut self.catalog
    }

    /// 獲取配置引用
    pub fn config(&self) -> &HotelConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stock_core::{Item, MovementTotals, Subcategory};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn catalog() -> ItemCatalog {
        let mut catalog = ItemCatalog::new();
        catalog.insert(Item::new(
            "KEG-GUIN".to_string(),
            "Guinness 50L".to_string(),
            Category::Draught,
            Decimal::from(176),
            Decimal::from(88),
        ));
        catalog.insert(Item::new(
            "BTL-HEIN".to_string(),
            "Heineken 330ml".to_string(),
            Category::Bottled,
            Decimal::from(24),
            Decimal::from(12),
        ));
        catalog.insert(
            Item::new(
                "SYR-COLA".to_string(),
                "Cola Syrup 5L".to_string(),
                Category::Minerals,
                Decimal::new(1215, 2),
                Decimal::from(5000),
            )
            .with_subcategory(Subcategory::Syrups),
        );
        catalog
    }

    fn engine() -> StocktakeEngine {
        StocktakeEngine::new(catalog(), HotelConfig::new("HOTEL-01".to_string()))
    }

    fn stocktake() -> Stocktake {
        Stocktake::new("HOTEL-01".to_string(), date(2025, 10, 1), date(2025, 10, 31))
    }

    fn sample_lines() -> Vec<StocktakeLine> {
        let mut keg = StocktakeLine::new("KEG-GUIN".to_string(), Decimal::from(88));
        keg.apply_totals(&MovementTotals {
            purchases: Decimal::from(88),
            sales: Decimal::from(38),
            ..MovementTotals::zero()
        });
        keg.counted_full_units = Decimal::from(1);
        keg.counted_partial_units = Decimal::from(50);

        let mut syrup = StocktakeLine::new("SYR-COLA".to_string(), Decimal::from(100));
        syrup.counted_full_units = Decimal::from(1);

        vec![keg, syrup]
    }

    #[test]
    fn test_compute_full_report() {
        let report = engine().compute(&stocktake(), &sample_lines()).unwrap();

        assert_eq!(report.lines.len(), 2);
        assert!(report.calculation_time_ms.is_some());

        // 桶裝: 期望 88 + 88 - 38 = 138，盤點 138，無差異
        let keg = report.lines.iter().find(|l| l.sku == "KEG-GUIN").unwrap();
        assert_eq!(keg.variance_qty, Decimal::ZERO);

        // 糖漿整容器估價: 1 容器 × €12.15
        let syrup = report.lines.iter().find(|l| l.sku == "SYR-COLA").unwrap();
        assert_eq!(syrup.counted_value, Decimal::new(1215, 2));
    }

    #[test]
    fn test_rollup_per_category() {
        let report = engine().compute(&stocktake(), &sample_lines()).unwrap();

        assert_eq!(report.rollups.len(), 2);
        let draught = report
            .rollups
            .iter()
            .find(|r| r.category == Category::Draught)
            .unwrap();
        assert_eq!(draught.counted_qty, Decimal::from(138));

        // 彙總必須等於逐行加總
        let total: Decimal = report.lines.iter().map(|l| l.counted_value).sum();
        let rolled: Decimal = report.rollups.iter().map(|r| r.counted_value).sum();
        assert_eq!(total, rolled);
    }

    #[test]
    fn test_abort_lists_every_failing_sku() {
        let mut lines = sample_lines();
        lines.push(StocktakeLine::new("NO-SUCH-1".to_string(), Decimal::ZERO));
        lines.push(StocktakeLine::new("NO-SUCH-2".to_string(), Decimal::ZERO));

        let err = engine().compute(&stocktake(), &lines).unwrap_err();
        match err {
            StockError::ApprovalAborted { failures } => {
                // 整批中止，兩個無效品項都要列出
                assert_eq!(failures.len(), 2);
                assert!(failures.iter().any(|(sku, _)| sku == "NO-SUCH-1"));
                assert!(failures.iter().any(|(sku, _)| sku == "NO-SUCH-2"));
            }
            other => panic!("預期 ApprovalAborted，得到 {other:?}"),
        }
    }

    #[test]
    fn test_low_stock_warning() {
        let config = HotelConfig::new("HOTEL-01".to_string()).with_low_stock_threshold(Decimal::from(2));
        let engine = StocktakeEngine::new(catalog(), config);

        // 只剩 1 容器糖漿，低於門檻 2
        let mut syrup = StocktakeLine::new("SYR-COLA".to_string(), Decimal::from(100));
        syrup.counted_full_units = Decimal::from(1);

        let report = engine.compute(&stocktake(), &[syrup]).unwrap();
        assert!(report
            .warnings
            .iter()
            .any(|w| w.sku == "SYR-COLA" && w.message.contains("低庫存")));
    }

    #[test]
    fn test_variance_alert_warning() {
        // 期望 48 瓶但只盤到 2 箱 24 瓶，差異遠超 10%
        let mut line = StocktakeLine::new("BTL-HEIN".to_string(), Decimal::from(48));
        line.counted_full_units = Decimal::from(2);

        let report = engine().compute(&stocktake(), &[line]).unwrap();
        assert!(report
            .warnings
            .iter()
            .any(|w| w.sku == "BTL-HEIN" && w.message.contains("差異金額")));
    }

    #[test]
    fn test_parallel_matches_serial() {
        let engine = engine();
        let lines = sample_lines();

        let serial = engine.compute(&stocktake(), &lines).unwrap();
        let parallel = engine.compute_parallel(&stocktake(), &lines).unwrap();

        assert_eq!(serial.lines.len(), parallel.lines.len());
        assert_eq!(
            serial.total_counted_value(),
            parallel.total_counted_value()
        );
        assert_eq!(
            serial.total_variance_value(),
            parallel.total_variance_value()
        );
    }
}
