//! 異動帳本
//!
//! 記錄離散的庫存異動並依（品項, 期間）彙總。
//! 彙總是即時讀取；核准時由盤點流程把彙總凍結進明細行，
//! 之後補登的異動不再影響已核准的期間

use std::collections::HashMap;

use stock_core::{Movement, MovementTotals, Period};

/// 異動帳本（依飯店持有全部異動）
#[derive(Debug, Clone, Default)]
pub struct MovementLedger {
    movements: Vec<Movement>,
}

impl MovementLedger {
    /// 創建空帳本
    pub fn new() -> Self {
        Self {
            movements: Vec::new(),
        }
    }

    /// 記錄一筆異動
    pub fn record(&mut self, movement: Movement) {
        tracing::debug!(
            "記錄異動: {} {:?} {} @ {}",
            movement.sku,
            movement.movement_type,
            movement.quantity,
            movement.occurred_at
        );
        self.movements.push(movement);
    }

    /// 彙總單一品項在期間內的異動（迄日整天計入）
    pub fn aggregate(&self, sku: &str, period: &Period) -> MovementTotals {
        let mut totals = MovementTotals::zero();

        for movement in &self.movements {
            if movement.hotel_id == period.hotel_id
                && movement.sku == sku
                && period.contains(movement.occurred_at.date_naive())
            {
                totals.add(movement.movement_type, movement.quantity);
            }
        }

        totals
    }

    /// 彙總期間內全部品項的異動
    pub fn aggregate_period(&self, period: &Period) -> HashMap<String, MovementTotals> {
        let mut grouped: HashMap<String, MovementTotals> = HashMap::new();

        for movement in &self.movements {
            if movement.hotel_id == period.hotel_id
                && period.contains(movement.occurred_at.date_naive())
            {
                grouped
                    .entry(movement.sku.clone())
                    .or_default()
                    .add(movement.movement_type, movement.quantity);
            }
        }

        grouped
    }

    pub fn len(&self) -> usize {
        self.movements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use stock_core::{MovementType, PeriodType};

    fn period() -> Period {
        Period::new(
            "HOTEL-01".to_string(),
            chrono::NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2025, 10, 31).unwrap(),
            PeriodType::Monthly,
        )
    }

    fn movement(
        sku: &str,
        movement_type: MovementType,
        qty: i64,
        y: i32,
        m: u32,
        d: u32,
    ) -> Movement {
        Movement::new(
            "HOTEL-01".to_string(),
            sku.to_string(),
            movement_type,
            Decimal::from(qty),
            Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_aggregate_sums_by_type() {
        let mut ledger = MovementLedger::new();
        ledger.record(movement("KEG-GUIN", MovementType::Purchase, 88, 2025, 10, 3));
        ledger.record(movement("KEG-GUIN", MovementType::Sale, 40, 2025, 10, 10));
        ledger.record(movement("KEG-GUIN", MovementType::Waste, 3, 2025, 10, 15));
        // 其他品項不計入
        ledger.record(movement("BTL-HEIN", MovementType::Sale, 10, 2025, 10, 10));

        let totals = ledger.aggregate("KEG-GUIN", &period());
        assert_eq!(totals.purchases, Decimal::from(88));
        assert_eq!(totals.sales, Decimal::from(40));
        assert_eq!(totals.waste, Decimal::from(3));
    }

    #[test]
    fn test_aggregate_end_date_inclusive() {
        let mut ledger = MovementLedger::new();
        // 迄日當天深夜的異動仍計入
        ledger.record(Movement::new(
            "HOTEL-01".to_string(),
            "KEG-GUIN".to_string(),
            MovementType::Sale,
            Decimal::from(5),
            Utc.with_ymd_and_hms(2025, 10, 31, 23, 59, 0).unwrap(),
        ));
        // 次日凌晨不計入
        ledger.record(Movement::new(
            "HOTEL-01".to_string(),
            "KEG-GUIN".to_string(),
            MovementType::Sale,
            Decimal::from(7),
            Utc.with_ymd_and_hms(2025, 11, 1, 0, 1, 0).unwrap(),
        ));

        let totals = ledger.aggregate("KEG-GUIN", &period());
        assert_eq!(totals.sales, Decimal::from(5));
    }

    #[test]
    fn test_aggregate_ignores_other_hotel() {
        let mut ledger = MovementLedger::new();
        ledger.record(Movement::new(
            "HOTEL-02".to_string(),
            "KEG-GUIN".to_string(),
            MovementType::Sale,
            Decimal::from(5),
            Utc.with_ymd_and_hms(2025, 10, 10, 12, 0, 0).unwrap(),
        ));

        let totals = ledger.aggregate("KEG-GUIN", &period());
        assert!(totals.is_zero());
    }

    #[test]
    fn test_aggregate_period_groups_by_sku() {
        let mut ledger = MovementLedger::new();
        ledger.record(movement("KEG-GUIN", MovementType::Sale, 40, 2025, 10, 5));
        ledger.record(movement("BTL-HEIN", MovementType::Purchase, 24, 2025, 10, 6));

        let grouped = ledger.aggregate_period(&period());
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["KEG-GUIN"].sales, Decimal::from(40));
        assert_eq!(grouped["BTL-HEIN"].purchases, Decimal::from(24));
    }
}
