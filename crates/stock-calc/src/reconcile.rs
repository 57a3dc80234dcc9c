//! 對帳計算
//!
//! 期望量、盤點量與差異的逐行計算

use rust_decimal::Decimal;
use stock_core::{Category, HotelConfig, Item, MovementTotals, Result, StocktakeLine};

use crate::uom::{NormalizedCount, UomCatalog};
use crate::valuation::ValuationCalculator;

/// 單行對帳結果
#[derive(Debug, Clone)]
pub struct LineComputation {
    /// 品項編號
    pub sku: String,
    /// 品項類別
    pub category: Category,
    /// 期初量（標準化份數）
    pub opening_qty: Decimal,
    /// 期望量
    pub expected_qty: Decimal,
    /// 盤點量（標準化份數）
    pub counted_qty: Decimal,
    /// 盤點實體容器數
    pub counted_physical_units: Decimal,
    /// 差異量 = 盤點 - 期望
    pub variance_qty: Decimal,
    /// 每標準化單位的估價成本
    pub valuation_cost: Decimal,
    /// 期望金額
    pub expected_value: Decimal,
    /// 盤點金額
    pub counted_value: Decimal,
    /// 差異金額
    pub variance_value: Decimal,
}

/// 對帳計算器
pub struct ReconciliationCalculator;

impl ReconciliationCalculator {
    /// 期望庫存 = 期初 + 進貨 + 調入 - 銷售 - 耗損 - 調出 + 調整
    pub fn expected_qty(opening_qty: Decimal, totals: &MovementTotals) -> Decimal {
        opening_qty + totals.net_change()
    }

    /// 計算單行的期望/盤點/差異數量與金額
    pub fn compute_line(
        item: &Item,
        config: &HotelConfig,
        line: &StocktakeLine,
    ) -> Result<LineComputation> {
        let counted: NormalizedCount = UomCatalog::normalize(
            item,
            config,
            line.counted_full_units,
            line.counted_partial_units,
        )?;

        let expected_qty = Self::expected_qty(line.opening_qty, &line.totals());
        let variance_qty = counted.servings - expected_qty;

        let valuation_cost = ValuationCalculator::valuation_cost(item)?;
        let expected_value = ValuationCalculator::value_of_expected(item, config, expected_qty)?;
        let counted_value = ValuationCalculator::value_of_count(item, &counted)?;

        Ok(LineComputation {
            sku: line.sku.clone(),
            category: item.category,
            opening_qty: line.opening_qty,
            expected_qty,
            counted_qty: counted.servings,
            counted_physical_units: counted.physical_units,
            variance_qty,
            valuation_cost,
            expected_value,
            counted_value,
            variance_value: counted_value - expected_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stock_core::{Category, MovementTotals};

    #[test]
    fn test_expected_qty_formula() {
        let totals = MovementTotals {
            purchases: Decimal::from(176),
            sales: Decimal::from(140),
            waste: Decimal::from(6),
            transfers_in: Decimal::from(10),
            transfers_out: Decimal::from(4),
            adjustments: Decimal::from(-2),
        };

        // 120 + 176 + 10 - 140 - 6 - 4 + (-2) = 154（十進位精確相等）
        assert_eq!(
            ReconciliationCalculator::expected_qty(Decimal::from(120), &totals),
            Decimal::from(154)
        );
    }

    #[test]
    fn test_compute_line_variance() {
        let item = Item::new(
            "KEG-GUIN".to_string(),
            "Guinness 50L".to_string(),
            Category::Draught,
            Decimal::from(176),
            Decimal::from(88),
        );
        let config = HotelConfig::new("HOTEL-01".to_string());

        let mut line = StocktakeLine::new("KEG-GUIN".to_string(), Decimal::from(100));
        line.apply_totals(&MovementTotals {
            purchases: Decimal::from(88),
            sales: Decimal::from(50),
            ..MovementTotals::zero()
        });
        // 盤點 1 桶 + 50 品脫 = 138 品脫
        line.counted_full_units = Decimal::from(1);
        line.counted_partial_units = Decimal::from(50);

        let result = ReconciliationCalculator::compute_line(&item, &config, &line).unwrap();

        assert_eq!(result.expected_qty, Decimal::from(138));
        assert_eq!(result.counted_qty, Decimal::from(138));
        assert_eq!(result.variance_qty, Decimal::ZERO);
        // 每品脫 €2
        assert_eq!(result.valuation_cost, Decimal::from(2));
        assert_eq!(result.expected_value, Decimal::from(276));
        assert_eq!(result.counted_value, Decimal::from(276));
        assert_eq!(result.variance_value, Decimal::ZERO);
    }

    #[test]
    fn test_compute_line_shortage() {
        let item = Item::new(
            "BTL-HEIN".to_string(),
            "Heineken 330ml".to_string(),
            Category::Bottled,
            Decimal::from(24),
            Decimal::from(12),
        );
        let config = HotelConfig::new("HOTEL-01".to_string());

        let mut line = StocktakeLine::new("BTL-HEIN".to_string(), Decimal::from(48));
        line.apply_totals(&MovementTotals {
            sales: Decimal::from(10),
            ..MovementTotals::zero()
        });
        // 期望 38 瓶，實際盤到 3 箱 = 36 瓶，短少 2 瓶
        line.counted_full_units = Decimal::from(3);

        let result = ReconciliationCalculator::compute_line(&item, &config, &line).unwrap();

        assert_eq!(result.expected_qty, Decimal::from(38));
        assert_eq!(result.counted_qty, Decimal::from(36));
        assert_eq!(result.variance_qty, Decimal::from(-2));
        // 每瓶 €2，短少 €4
        assert_eq!(result.variance_value, Decimal::from(-4));
    }
}
