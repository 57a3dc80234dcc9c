//! 計量單位換算
//!
//! 以（類別, 子類別）解析一次換算規則，所有呼叫端共用同一張策略表，
//! 不在各計算點重複以字串比對分派

use rust_decimal::Decimal;
use stock_core::{Category, HotelConfig, Item, Result, StockError, Subcategory};

/// 計數規則
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountRule {
    /// 整容器計數 + 零散份數（桶/箱裝：full = 容器數, partial = 散份數）
    ServingsPerContainer,
    /// 瓶計數 + 瓶比例（烈酒/葡萄酒：partial 是瓶的比例，半瓶 = 0.5 瓶）
    BottleFraction,
    /// 直接以容器計數（糖漿/盒裝/散裝果汁：full + partial 即容器數）
    ContainerDirect,
}

/// 估價模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuationMode {
    /// 以標準化份數估價
    PerServing,
    /// 以整容器估價（份數僅供消耗報表，絕不參與估價）
    PerContainer,
}

/// 換算規則（計數規則 + 估價模式）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UomRule {
    pub count_rule: CountRule,
    pub valuation_mode: ValuationMode,
}

/// 標準化後的計數
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedCount {
    /// 標準化份數（消耗與差異計算用）
    pub servings: Decimal,

    /// 實體容器數（低庫存警示與整容器估價用）
    pub physical_units: Decimal,
}

/// 計量單位目錄
pub struct UomCatalog;

impl UomCatalog {
    /// 解析品項的換算規則
    ///
    /// 未知的（類別, 子類別）組合一律回報錯誤，不以零或 1 代替
    pub fn resolve(item: &Item) -> Result<UomRule> {
        let rule = match (item.category, item.subcategory) {
            (Category::Draught, _) | (Category::Bottled, _) => UomRule {
                count_rule: CountRule::ServingsPerContainer,
                valuation_mode: ValuationMode::PerServing,
            },
            (Category::Spirits, _) | (Category::Wine, _) => UomRule {
                count_rule: CountRule::BottleFraction,
                valuation_mode: ValuationMode::PerServing,
            },
            (
                Category::Minerals,
                Some(Subcategory::SoftDrinks | Subcategory::Juices | Subcategory::Cordials),
            ) => UomRule {
                count_rule: CountRule::ServingsPerContainer,
                valuation_mode: ValuationMode::PerServing,
            },
            (
                Category::Minerals,
                Some(Subcategory::Syrups | Subcategory::BagInBox | Subcategory::BulkJuices),
            ) => UomRule {
                count_rule: CountRule::ContainerDirect,
                valuation_mode: ValuationMode::PerContainer,
            },
            (Category::Minerals, None) => {
                return Err(StockError::Configuration {
                    sku: item.sku.clone(),
                    reason: "礦泉飲品缺少子類別".to_string(),
                })
            }
        };

        Ok(rule)
    }

    /// 標準化實體盤點計數
    ///
    /// 輸入員工登錄的（整容器數, 零散數），產出標準化份數與實體容器數
    pub fn normalize(
        item: &Item,
        config: &HotelConfig,
        full_units: Decimal,
        partial_units: Decimal,
    ) -> Result<NormalizedCount> {
        let rule = Self::resolve(item)?;
        let factor = Self::checked_factor(item)?;

        if full_units < Decimal::ZERO || partial_units < Decimal::ZERO {
            return Err(StockError::Configuration {
                sku: item.sku.clone(),
                reason: format!("計數不可為負: {} / {}", full_units, partial_units),
            });
        }

        let count = match rule.count_rule {
            CountRule::ServingsPerContainer => NormalizedCount {
                servings: full_units * factor + partial_units,
                physical_units: full_units + partial_units / factor,
            },
            CountRule::BottleFraction => {
                // 半開的瓶是 0.5 瓶，不是 0.5 × 每瓶份數
                let bottles = full_units + partial_units;
                NormalizedCount {
                    servings: bottles * factor,
                    physical_units: bottles,
                }
            }
            CountRule::ContainerDirect => {
                let containers = full_units + partial_units;
                NormalizedCount {
                    servings: containers * Self::servings_per_container(item, config)?,
                    physical_units: containers,
                }
            }
        };

        Ok(count)
    }

    /// 反標準化：由標準化計數還原（整容器數, 零散數）
    ///
    /// 與 [`Self::normalize`] 互逆，容許一個零散單位內的進位誤差
    pub fn denormalize(item: &Item, count: &NormalizedCount) -> Result<(Decimal, Decimal)> {
        let rule = Self::resolve(item)?;
        let factor = Self::checked_factor(item)?;

        let units = match rule.count_rule {
            CountRule::ServingsPerContainer => {
                let full = (count.servings / factor).floor();
                let partial = count.servings - full * factor;
                (full, partial)
            }
            CountRule::BottleFraction | CountRule::ContainerDirect => {
                let full = count.physical_units.floor();
                let partial = count.physical_units - full;
                (full, partial)
            }
        };

        Ok(units)
    }

    /// 每容器的標準化份數
    ///
    /// 份數估價類別即 `uom_factor`；整容器估價類別為
    /// 容器毫升數 / 每份毫升數（僅供消耗報表換算）
    pub fn servings_per_container(item: &Item, config: &HotelConfig) -> Result<Decimal> {
        let rule = Self::resolve(item)?;
        let factor = Self::checked_factor(item)?;

        match rule.valuation_mode {
            ValuationMode::PerServing => Ok(factor),
            ValuationMode::PerContainer => {
                if config.mineral_serving_ml <= Decimal::ZERO {
                    return Err(StockError::Configuration {
                        sku: item.sku.clone(),
                        reason: format!(
                            "每份毫升數必須為正值: {}",
                            config.mineral_serving_ml
                        ),
                    });
                }
                Ok(factor / config.mineral_serving_ml)
            }
        }
    }

    /// 驗證換算係數為正值
    pub(crate) fn checked_factor(item: &Item) -> Result<Decimal> {
        if item.uom_factor <= Decimal::ZERO {
            return Err(StockError::Configuration {
                sku: item.sku.clone(),
                reason: format!("換算係數必須為正值: {}", item.uom_factor),
            });
        }
        Ok(item.uom_factor)
    }
}
