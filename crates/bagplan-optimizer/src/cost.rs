//! 生產成本估算

use bagplan_core::{MachineSpec, ScheduleEntry};
use rust_decimal::Decimal;
use serde::Serialize;

/// 單機成本
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineCost {
    pub machine_id: String,

    /// 已排工時
    pub hours: Decimal,

    /// 生產數量
    pub units: u64,

    /// 運轉成本（人工 + 能源）
    pub operating_cost: Decimal,

    /// 保養成本（有排程才計入）
    pub maintenance_cost: Decimal,

    pub total_cost: Decimal,
}

/// 成本報告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostReport {
    pub machines: Vec<MachineCost>,
    pub total_cost: Decimal,
    pub total_units: u64,

    /// 單位成本（無產出時為 None）
    pub cost_per_unit: Option<Decimal>,
}

/// 成本估算器
pub struct CostEstimator;

impl CostEstimator {
    /// 依排程結果估算各機台成本
    pub fn estimate(machines: &[MachineSpec], entries: &[ScheduleEntry]) -> CostReport {
        let machine_costs: Vec<MachineCost> = machines
            .iter()
            .map(|machine| Self::machine_cost(machine, entries))
            .collect();

        let total_cost: Decimal = machine_costs.iter().map(|c| c.total_cost).sum();
        let total_units: u64 = machine_costs.iter().map(|c| c.units).sum();
        let cost_per_unit = if total_units > 0 {
            Some((total_cost / Decimal::from(total_units)).round_dp(4))
        } else {
            None
        };

        CostReport {
            machines: machine_costs,
            total_cost,
            total_units,
            cost_per_unit,
        }
    }

    fn machine_cost(machine: &MachineSpec, entries: &[ScheduleEntry]) -> MachineCost {
        let (hours, units) = entries
            .iter()
            .filter(|e| e.machine_id == machine.id)
            .fold((0.0_f64, 0_u64), |(hours, units), e| {
                (hours + e.total_hours, units + e.quantity)
            });

        let hours = match Decimal::try_from(hours) {
            Ok(hours) => hours.round_dp(4),
            Err(err) => {
                tracing::warn!("機台 {} 工時 {} 無法換算，成本以 0 工時計: {}", machine.id, hours, err);
                Decimal::ZERO
            }
        };
        let operating_cost =
            (hours * (machine.operator_cost_per_hour + machine.energy_cost_per_hour)).round_dp(2);
        let maintenance_cost = if units > 0 {
            machine.maintenance_cost_per_day
        } else {
            Decimal::ZERO
        };

        MachineCost {
            machine_id: machine.id.clone(),
            hours,
            units,
            operating_cost,
            maintenance_cost,
            total_cost: operating_cost + maintenance_cost,
        }
    }
}
