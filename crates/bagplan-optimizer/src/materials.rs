//! 物料可行性檢查
//!
//! 彙總已排入訂單的物料需求並與庫存比對。排程本身不依賴此檢查。

use bagplan_core::{InventoryLookup, MaterialCalculator, Order, ScheduleEntry};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// 單一物料的需求與庫存
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialLine {
    pub material_id: String,
    pub unit: String,
    pub required: Decimal,
    pub available: Decimal,

    /// 缺料數量（足夠時為 0）
    pub shortage: Decimal,
}

/// 物料檢查報告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialReport {
    /// 依物料ID排序
    pub lines: Vec<MaterialLine>,
}

impl MaterialReport {
    /// 缺料項目
    pub fn shortages(&self) -> impl Iterator<Item = &MaterialLine> {
        self.lines.iter().filter(|l| l.shortage > Decimal::ZERO)
    }

    /// 是否全部物料充足
    pub fn is_feasible(&self) -> bool {
        self.shortages().next().is_none()
    }
}

/// 物料檢查器
pub struct MaterialChecker;

impl MaterialChecker {
    /// 檢查已排入訂單的物料需求
    ///
    /// 庫存查詢失敗時以 0 計。訂單ID重複時以第一筆為準，與排程器保留的訂單一致。
    pub fn check(
        orders: &[Order],
        entries: &[ScheduleEntry],
        calculator: &dyn MaterialCalculator,
        inventory: &dyn InventoryLookup,
    ) -> MaterialReport {
        let mut by_id: HashMap<&str, &Order> = HashMap::with_capacity(orders.len());
        for order in orders {
            by_id.entry(order.id.as_str()).or_insert(order);
        }

        let mut demand: BTreeMap<String, (String, Decimal)> = BTreeMap::new();

        for entry in entries {
            let Some(order) = by_id.get(entry.order_id.as_str()) else {
                tracing::debug!("排程項目 {} 找不到對應訂單，略過物料計算", entry.order_id);
                continue;
            };

            for requirement in calculator.material_requirements(order) {
                let qty = requirement.qty_per_unit * Decimal::from(entry.quantity);
                demand
                    .entry(requirement.material_id)
                    .or_insert_with(|| (requirement.unit, Decimal::ZERO))
                    .1 += qty;
            }
        }

        let lines = demand
            .into_iter()
            .map(|(material_id, (unit, required))| {
                let available = inventory.stock(&material_id).unwrap_or_else(|err| {
                    tracing::warn!("庫存查詢失敗，以 0 計: {}", err);
                    Decimal::ZERO
                });
                let shortage = (required - available).max(Decimal::ZERO);
                MaterialLine {
                    material_id,
                    unit,
                    required,
                    available,
                    shortage,
                }
            })
            .collect();

        MaterialReport { lines }
    }
}
