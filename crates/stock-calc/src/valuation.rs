//! 估價計算
//!
//! 份數估價類別以每份成本計算；整容器估價類別（糖漿/盒裝/散裝果汁）
//! 一律以實體容器數 × 容器成本，兩種算法絕不混用

use rust_decimal::Decimal;
use stock_core::{HotelConfig, Item, Result};

use crate::uom::{NormalizedCount, UomCatalog, ValuationMode};

/// 估價計算器
pub struct ValuationCalculator;

impl ValuationCalculator {
    /// 每標準化單位的估價成本
    ///
    /// 份數估價: 容器成本 / 每容器份數；整容器估價: 容器成本本身
    pub fn valuation_cost(item: &Item) -> Result<Decimal> {
        let rule = UomCatalog::resolve(item)?;

        match rule.valuation_mode {
            ValuationMode::PerServing => {
                let factor = UomCatalog::checked_factor(item)?;
                Ok(item.unit_cost / factor)
            }
            ValuationMode::PerContainer => Ok(item.unit_cost),
        }
    }

    /// 期望量（標準化份數）的金額
    pub fn value_of_expected(
        item: &Item,
        config: &HotelConfig,
        expected_qty: Decimal,
    ) -> Result<Decimal> {
        let rule = UomCatalog::resolve(item)?;

        match rule.valuation_mode {
            ValuationMode::PerServing => Ok(expected_qty * Self::valuation_cost(item)?),
            ValuationMode::PerContainer => {
                // 先換回容器數再乘容器成本
                let per_container = UomCatalog::servings_per_container(item, config)?;
                Ok(expected_qty / per_container * item.unit_cost)
            }
        }
    }

    /// 實際盤點計數的金額
    pub fn value_of_count(item: &Item, count: &NormalizedCount) -> Result<Decimal> {
        let rule = UomCatalog::resolve(item)?;

        match rule.valuation_mode {
            ValuationMode::PerServing => Ok(count.servings * Self::valuation_cost(item)?),
            // 整容器估價：實體容器數 × 容器成本，不經過每份成本
            ValuationMode::PerContainer => Ok(count.physical_units * item.unit_cost),
        }
    }
}
