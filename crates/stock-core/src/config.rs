//! 飯店配置模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::PeriodType;

/// 每飯店的計算配置
///
/// 所有計算都以明確傳入的配置物件為準，不在呼叫點寫死門檻值。
/// 各欄位在建構子內給定文件化的預設值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelConfig {
    /// 飯店
    pub hotel_id: String,

    /// 礦泉飲品每份毫升數（糖漿/盒裝容器換算消耗報表份數用，預設 50ml）
    /// 僅影響報表性質的份數換算，估價一律以整容器計
    pub mineral_serving_ml: Decimal,

    /// 低庫存警示門檻（實體容器數，預設 2）
    pub low_stock_threshold: Decimal,

    /// 差異金額警示比例（佔期望價值的百分比，預設 10）
    pub variance_alert_pct: Decimal,

    /// 預設期間類別（預設月結）
    pub default_period_type: PeriodType,
}

impl HotelConfig {
    /// 創建新的配置（帶預設值）
    pub fn new(hotel_id: String) -> Self {
        Self {
            hotel_id,
            mineral_serving_ml: Decimal::from(50),
            low_stock_threshold: Decimal::from(2),
            variance_alert_pct: Decimal::from(10),
            default_period_type: PeriodType::Monthly,
        }
    }

    /// 建構器模式：設置每份毫升數
    pub fn with_mineral_serving_ml(mut self, ml: Decimal) -> Self {
        self.mineral_serving_ml = ml;
        self
    }

    /// 建構器模式：設置低庫存門檻
    pub fn with_low_stock_threshold(mut self, threshold: Decimal) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    /// 建構器模式：設置差異警示比例
    pub fn with_variance_alert_pct(mut self, pct: Decimal) -> Self {
        self.variance_alert_pct = pct;
        self
    }

    /// 建構器模式：設置預設期間類別
    pub fn with_default_period_type(mut self, period_type: PeriodType) -> Self {
        self.default_period_type = period_type;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = HotelConfig::new("HOTEL-01".to_string());

        assert_eq!(config.mineral_serving_ml, Decimal::from(50));
        assert_eq!(config.low_stock_threshold, Decimal::from(2));
        assert_eq!(config.variance_alert_pct, Decimal::from(10));
        assert_eq!(config.default_period_type, PeriodType::Monthly);
    }

    #[test]
    fn test_config_builder() {
        let config = HotelConfig::new("HOTEL-02".to_string())
            .with_mineral_serving_ml(Decimal::from(25))
            .with_low_stock_threshold(Decimal::from(5))
            .with_variance_alert_pct(Decimal::from(15))
            .with_default_period_type(PeriodType::Weekly);

        assert_eq!(config.mineral_serving_ml, Decimal::from(25));
        assert_eq!(config.low_stock_threshold, Decimal::from(5));
        assert_eq!(config.variance_alert_pct, Decimal::from(15));
        assert_eq!(config.default_period_type, PeriodType::Weekly);
    }
}
