//! 物料需求與庫存查詢介面
//!
//! BOM 計算與庫存服務屬於外部系統，這裡只定義排程報表需要的介面。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::order::Order;

/// 單位用量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRequirement {
    /// 物料ID
    pub material_id: String,

    /// 每個成品用量
    pub qty_per_unit: Decimal,

    /// 計量單位（如 kg、m）
    pub unit: String,
}

impl MaterialRequirement {
    pub fn new(material_id: impl Into<String>, qty_per_unit: Decimal, unit: impl Into<String>) -> Self {
        Self {
            material_id: material_id.into(),
            qty_per_unit,
            unit: unit.into(),
        }
    }
}

/// BOM 計算器
pub trait MaterialCalculator {
    /// 依訂單規格計算單位物料需求
    fn material_requirements(&self, order: &Order) -> Vec<MaterialRequirement>;
}

/// 庫存查詢
pub trait InventoryLookup {
    /// 查詢現有庫存
    fn stock(&self, material_id: &str) -> Result<Decimal, String>;
}

/// 記憶體內庫存表（離線報表與測試使用）
#[derive(Debug, Clone, Default)]
pub struct StaticInventory {
    stock: HashMap<String, Decimal>,
}

impl StaticInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置庫存
    pub fn with_stock(mut self, material_id: impl Into<String>, qty: Decimal) -> Self {
        self.stock.insert(material_id.into(), qty);
        self
    }
}

impl InventoryLookup for StaticInventory {
    fn stock(&self, material_id: &str) -> Result<Decimal, String> {
        self.stock
            .get(material_id)
            .copied()
            .ok_or_else(|| format!("找不到物料庫存: {}", material_id))
    }
}
