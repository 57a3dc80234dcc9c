//! 會計期間管理
//!
//! 同一飯店同一（年, 月, 期間類別）至多一個期間；
//! 日期重疊的期間一律拒絕建立

use chrono::NaiveDate;
use std::collections::HashMap;

use stock_core::{Period, PeriodId, PeriodType, Result, StockError};

/// 期間管理器
#[derive(Debug, Clone, Default)]
pub struct PeriodManager {
    periods: HashMap<PeriodId, Period>,
}

impl PeriodManager {
    /// 創建空管理器
    pub fn new() -> Self {
        Self {
            periods: HashMap::new(),
        }
    }

    /// 建立新期間（開帳狀態）
    ///
    /// 與既有期間重疊，或同（年, 月, 類別）已存在期間，
    /// 都以 [`StockError::DuplicatePeriod`] 拒絕
    pub fn create_period(
        &mut self,
        hotel_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        period_type: PeriodType,
    ) -> Result<PeriodId> {
        if start_date > end_date {
            return Err(StockError::InvalidPeriodRange {
                start_date,
                end_date,
            });
        }

        let candidate = Period::new(hotel_id.to_string(), start_date, end_date, period_type);

        for existing in self.periods.values() {
            if existing.overlaps(&candidate) {
                return Err(StockError::DuplicatePeriod {
                    hotel_id: hotel_id.to_string(),
                    start_date,
                    end_date,
                });
            }
            if existing.hotel_id == candidate.hotel_id
                && existing.period_type == candidate.period_type
                && existing.month_key() == candidate.month_key()
            {
                return Err(StockError::DuplicatePeriod {
                    hotel_id: hotel_id.to_string(),
                    start_date,
                    end_date,
                });
            }
        }

        let id = candidate.id;
        tracing::info!(
            "建立會計期間: 飯店 {}, {} ~ {}",
            hotel_id,
            start_date,
            end_date
        );
        self.periods.insert(id, candidate);
        Ok(id)
    }

    /// 查詢期間
    pub fn get(&self, id: PeriodId) -> Result<&Period> {
        self.periods
            .get(&id)
            .ok_or_else(|| StockError::PeriodNotFound(id.to_string()))
    }

    /// 依日期查詢期間（日期落在範圍內）
    pub fn find_by_date(&self, hotel_id: &str, date: NaiveDate) -> Option<&Period> {
        self.periods
            .values()
            .find(|p| p.hotel_id == hotel_id && p.contains(date))
    }

    /// 依（飯店, 日期範圍）精確查詢期間
    pub fn find_by_range(
        &self,
        hotel_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Option<&Period> {
        self.periods
            .values()
            .find(|p| p.hotel_id == hotel_id && p.date_range_matches(start_date, end_date))
    }

    /// 前一期間：同飯店同類別、迄日早於給定期間起日者取最近的
    pub fn prior_period(&self, period: &Period) -> Option<&Period> {
        self.periods
            .values()
            .filter(|p| {
                p.hotel_id == period.hotel_id
                    && p.period_type == period.period_type
                    && p.end_date < period.start_date
            })
            .max_by_key(|p| p.end_date)
    }

    /// 設置關帳旗標（僅限盤點流程內部呼叫）
    pub(crate) fn set_closed(&mut self, id: PeriodId, closed: bool) -> Result<()> {
        let period = self
            .periods
            .get_mut(&id)
            .ok_or_else(|| StockError::PeriodNotFound(id.to_string()))?;
        period.is_closed = closed;
        Ok(())
    }

    /// 走訪全部期間
    pub fn iter(&self) -> impl Iterator<Item = &Period> {
        self.periods.values()
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_create_and_lookup() {
        let mut manager = PeriodManager::new();
        let id = manager
            .create_period(
                "HOTEL-01",
                date(2025, 10, 1),
                date(2025, 10, 31),
                PeriodType::Monthly,
            )
            .unwrap();

        let period = manager.get(id).unwrap();
        assert_eq!(period.hotel_id, "HOTEL-01");
        assert!(!period.is_closed);

        assert!(manager.find_by_date("HOTEL-01", date(2025, 10, 15)).is_some());
        assert!(manager.find_by_date("HOTEL-01", date(2025, 11, 1)).is_none());
    }

    #[test]
    fn test_overlapping_period_rejected() {
        let mut manager = PeriodManager::new();
        manager
            .create_period(
                "HOTEL-01",
                date(2025, 10, 1),
                date(2025, 10, 31),
                PeriodType::Monthly,
            )
            .unwrap();

        let err = manager
            .create_period(
                "HOTEL-01",
                date(2025, 10, 15),
                date(2025, 11, 14),
                PeriodType::Monthly,
            )
            .unwrap_err();
        assert!(matches!(err, StockError::DuplicatePeriod { .. }));

        // 不同飯店允許同日期範圍
        assert!(manager
            .create_period(
                "HOTEL-02",
                date(2025, 10, 1),
                date(2025, 10, 31),
                PeriodType::Monthly,
            )
            .is_ok());
    }

    #[test]
    fn test_same_month_same_type_rejected() {
        let mut manager = PeriodManager::new();
        manager
            .create_period(
                "HOTEL-01",
                date(2025, 10, 1),
                date(2025, 10, 15),
                PeriodType::Monthly,
            )
            .unwrap();

        // 不重疊但同（年, 月, 類別）仍拒絕
        let err = manager
            .create_period(
                "HOTEL-01",
                date(2025, 10, 16),
                date(2025, 10, 31),
                PeriodType::Monthly,
            )
            .unwrap_err();
        assert!(matches!(err, StockError::DuplicatePeriod { .. }));
    }

    #[test]
    fn test_invalid_range_rejected() {
        let mut manager = PeriodManager::new();
        let err = manager
            .create_period(
                "HOTEL-01",
                date(2025, 10, 31),
                date(2025, 10, 1),
                PeriodType::Monthly,
            )
            .unwrap_err();
        assert!(matches!(err, StockError::InvalidPeriodRange { .. }));
    }

    #[test]
    fn test_prior_period() {
        let mut manager = PeriodManager::new();
        let september = manager
            .create_period(
                "HOTEL-01",
                date(2025, 9, 1),
                date(2025, 9, 30),
                PeriodType::Monthly,
            )
            .unwrap();
        manager
            .create_period(
                "HOTEL-01",
                date(2025, 8, 1),
                date(2025, 8, 31),
                PeriodType::Monthly,
            )
            .unwrap();
        let october = manager
            .create_period(
                "HOTEL-01",
                date(2025, 10, 1),
                date(2025, 10, 31),
                PeriodType::Monthly,
            )
            .unwrap();

        let october = manager.get(october).unwrap().clone();
        let prior = manager.prior_period(&october).unwrap();
        // 取最近的一期（九月，不是八月）
        assert_eq!(prior.id, september);
    }

    #[test]
    fn test_first_period_has_no_prior() {
        let mut manager = PeriodManager::new();
        let id = manager
            .create_period(
                "HOTEL-01",
                date(2025, 10, 1),
                date(2025, 10, 31),
                PeriodType::Monthly,
            )
            .unwrap();

        let period = manager.get(id).unwrap().clone();
        assert!(manager.prior_period(&period).is_none());
    }
}
