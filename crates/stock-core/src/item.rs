//! 品項目錄模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{Result, StockError};

/// 品項類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// 生啤（桶裝）
    Draught,
    /// 瓶裝啤酒（箱裝）
    Bottled,
    /// 烈酒
    Spirits,
    /// 葡萄酒
    Wine,
    /// 礦泉飲品
    Minerals,
}

impl Category {
    /// 類別顯示名稱（報表用）
    pub fn label(&self) -> &'static str {
        match self {
            Category::Draught => "生啤",
            Category::Bottled => "瓶裝啤酒",
            Category::Spirits => "烈酒",
            Category::Wine => "葡萄酒",
            Category::Minerals => "礦泉飲品",
        }
    }
}

/// 礦泉飲品子類別（僅 Minerals 類別有意義）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subcategory {
    /// 軟性飲料（箱裝計數）
    SoftDrinks,
    /// 糖漿（整容器估價）
    Syrups,
    /// 果汁（箱裝計數）
    Juices,
    /// 濃縮果汁（箱裝計數）
    Cordials,
    /// 盒裝飲品 BIB（整容器估價）
    BagInBox,
    /// 散裝果汁（整容器估價）
    BulkJuices,
}

/// 庫存品項
///
/// `uom_factor` 的意義依類別而定：
/// - 生啤: 每桶份數（品脫）
/// - 瓶裝啤酒與箱裝礦泉飲品: 每箱瓶數
/// - 烈酒/葡萄酒: 每瓶份數
/// - 糖漿/盒裝/散裝果汁: 每容器毫升數
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// 品項編號
    pub sku: String,

    /// 品項名稱
    pub name: String,

    /// 類別
    pub category: Category,

    /// 子類別（僅礦泉飲品需要）
    pub subcategory: Option<Subcategory>,

    /// 單一容器成本（桶/箱/瓶/盒，貨幣計）
    pub unit_cost: Decimal,

    /// 換算係數（意義依類別而定）
    pub uom_factor: Decimal,
}

impl Item {
    /// 創建新的品項
    pub fn new(
        sku: String,
        name: String,
        category: Category,
        unit_cost: Decimal,
        uom_factor: Decimal,
    ) -> Self {
        Self {
            sku,
            name,
            category,
            subcategory: None,
            unit_cost,
            uom_factor,
        }
    }

    /// 建構器模式：設置子類別
    pub fn with_subcategory(mut self, subcategory: Subcategory) -> Self {
        self.subcategory = Some(subcategory);
        self
    }

    /// 檢查是否為礦泉飲品
    pub fn is_mineral(&self) -> bool {
        self.category == Category::Minerals
    }
}

/// 品項目錄（唯讀查詢服務）
///
/// 目錄由外部的型錄管理維護，引擎只讀取
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemCatalog {
    items: HashMap<String, Item>,
}

impl ItemCatalog {
    /// 創建空目錄
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    /// 登錄品項（同編號覆蓋）
    pub fn insert(&mut self, item: Item) {
        self.items.insert(item.sku.clone(), item);
    }

    /// 查詢品項
    pub fn get(&self, sku: &str) -> Option<&Item> {
        self.items.get(sku)
    }

    /// 查詢品項，不存在即錯誤
    pub fn require(&self, sku: &str) -> Result<&Item> {
        self.items
            .get(sku)
            .ok_or_else(|| StockError::ItemNotFound(sku.to_string()))
    }

    /// 全部品項編號（排序後，確保走訪順序穩定）
    pub fn skus(&self) -> Vec<String> {
        let mut skus: Vec<String> = self.items.keys().cloned().collect();
        skus.sort();
        skus
    }

    /// 走訪全部品項
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
