//! 期末結存快照存儲
//!
//! 每（品項, 期間）唯一一筆；期間關帳後僅能經重新開帳路徑清除

use std::collections::HashMap;

use stock_core::{PeriodId, Snapshot};

/// 快照存儲
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    snapshots: HashMap<(String, PeriodId), Snapshot>,
}

impl SnapshotStore {
    /// 創建空存儲
    pub fn new() -> Self {
        Self {
            snapshots: HashMap::new(),
        }
    }

    /// 寫入快照（同鍵覆蓋，維持唯一性）
    pub fn upsert(&mut self, snapshot: Snapshot) {
        self.snapshots
            .insert((snapshot.sku.clone(), snapshot.period_id), snapshot);
    }

    /// 查詢單一品項的期末快照
    pub fn get(&self, sku: &str, period_id: PeriodId) -> Option<&Snapshot> {
        self.snapshots.get(&(sku.to_string(), period_id))
    }

    /// 期間內全部快照
    pub fn period_snapshots(&self, period_id: PeriodId) -> Vec<&Snapshot> {
        self.snapshots
            .values()
            .filter(|s| s.period_id == period_id)
            .collect()
    }

    /// 清除期間的全部快照（重新開帳路徑），回傳清除筆數
    pub(crate) fn remove_period(&mut self, period_id: PeriodId) -> usize {
        let before = self.snapshots.len();
        self.snapshots.retain(|_, s| s.period_id != period_id);
        before - self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
