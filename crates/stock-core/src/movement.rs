//! 庫存異動模型

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 異動識別碼
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovementId(pub Uuid);

impl MovementId {
    /// 產生新的識別碼
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl core::fmt::Display for MovementId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// 異動類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementType {
    /// 進貨
    Purchase,
    /// 銷售
    Sale,
    /// 耗損
    Waste,
    /// 調入
    TransferIn,
    /// 調出
    TransferOut,
    /// 調整（可為負數）
    Adjustment,
}

/// 庫存異動
///
/// 數量一律以品項的標準化份數單位記錄（POS 整合、人工登錄、
/// 耗損登記等來源都在寫入前換算完成）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    /// 異動識別碼
    pub id: MovementId,

    /// 飯店
    pub hotel_id: String,

    /// 品項編號
    pub sku: String,

    /// 異動類型
    pub movement_type: MovementType,

    /// 數量（標準化份數）
    pub quantity: Decimal,

    /// 發生時間
    pub occurred_at: DateTime<Utc>,

    /// 來源單據（如 POS 單號、叫貨單號）
    pub source_ref: Option<String>,
}

impl Movement {
    /// 創建新的異動
    pub fn new(
        hotel_id: String,
        sku: String,
        movement_type: MovementType,
        quantity: Decimal,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MovementId::generate(),
            hotel_id,
            sku,
            movement_type,
            quantity,
            occurred_at,
            source_ref: None,
        }
    }

    /// 建構器模式：設置來源單據
    pub fn with_source_ref(mut self, source_ref: String) -> Self {
        self.source_ref = Some(source_ref);
        self
    }
}

/// 單一品項在某期間的異動彙總
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementTotals {
    /// 進貨
    pub purchases: Decimal,
    /// 銷售
    pub sales: Decimal,
    /// 耗損
    pub waste: Decimal,
    /// 調入
    pub transfers_in: Decimal,
    /// 調出
    pub transfers_out: Decimal,
    /// 調整
    pub adjustments: Decimal,
}

impl MovementTotals {
    /// 創建零值彙總
    pub fn zero() -> Self {
        Self::default()
    }

    /// 累加一筆異動
    pub fn add(&mut self, movement_type: MovementType, quantity: Decimal) {
        match movement_type {
            MovementType::Purchase => self.purchases += quantity,
            MovementType::Sale => self.sales += quantity,
            MovementType::Waste => self.waste += quantity,
            MovementType::TransferIn => self.transfers_in += quantity,
            MovementType::TransferOut => self.transfers_out += quantity,
            MovementType::Adjustment => self.adjustments += quantity,
        }
    }

    /// 異動淨值 = 進貨 + 調入 - 銷售 - 耗損 - 調出 + 調整
    pub fn net_change(&self) -> Decimal {
        self.purchases + self.transfers_in - self.sales - self.waste - self.transfers_out
            + self.adjustments
    }

    /// 檢查是否全為零
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_create_movement() {
        let at = Utc.with_ymd_and_hms(2025, 10, 5, 14, 30, 0).unwrap();
        let movement = Movement::new(
            "HOTEL-01".to_string(),
            "KEG-GUIN".to_string(),
            MovementType::Purchase,
            Decimal::from(176),
            at,
        )
        .with_source_ref("PO-1001".to_string());

        assert_eq!(movement.sku, "KEG-GUIN");
        assert_eq!(movement.quantity, Decimal::from(176));
        assert_eq!(movement.source_ref, Some("PO-1001".to_string()));
    }

    #[test]
    fn test_totals_accumulation() {
        let mut totals = MovementTotals::zero();
        totals.add(MovementType::Purchase, Decimal::from(100));
        totals.add(MovementType::Sale, Decimal::from(40));
        totals.add(MovementType::Waste, Decimal::from(3));
        totals.add(MovementType::TransferIn, Decimal::from(10));
        totals.add(MovementType::TransferOut, Decimal::from(5));
        totals.add(MovementType::Adjustment, Decimal::from(-2));

        assert_eq!(totals.purchases, Decimal::from(100));
        assert_eq!(totals.sales, Decimal::from(40));
        // 淨值 = 100 + 10 - 40 - 3 - 5 + (-2) = 60
        assert_eq!(totals.net_change(), Decimal::from(60));
    }

    #[test]
    fn test_totals_is_zero() {
        let mut totals = MovementTotals::zero();
        assert!(totals.is_zero());

        totals.add(MovementType::Sale, Decimal::from(1));
        assert!(!totals.is_zero());
    }
}
