//! 瓶頸與負載分析
//!
//! 只讀取排程結果，不會失敗：沒有資料時回傳空的建議清單。

use bagplan_core::{AnalysisThresholds, HandleType, MachineSpec, ScheduleEntry};
use serde::Serialize;

/// 機台利用率
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineUtilization {
    pub machine_id: String,
    pub machine_name: String,

    /// 已排工時
    pub scheduled_hours: f64,

    /// 利用率（百分比）
    pub utilization_pct: f64,

    /// 已排訂單數
    pub order_count: usize,
}

/// 負載轉移建議
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadBalancingSuggestion {
    /// 瓶頸機台
    pub from_machine: String,

    /// 建議承接的閒置機台
    pub to_machine: String,

    /// 兩台共用的提把類型
    pub shared_handles: Vec<HandleType>,

    /// 利用率差（百分點）
    pub utilization_delta: f64,

    pub message: String,
}

/// 換線合併建議
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupOptimization {
    pub machine_id: String,
    pub order_count: usize,

    /// 目前換線總時間（分鐘）
    pub current_setup_minutes: f64,

    /// 合併批次後估計（分鐘）
    pub batched_setup_minutes: f64,

    /// 可節省（分鐘）
    pub potential_savings_minutes: f64,

    pub message: String,
}

/// 優化潛力
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OptimizationPotential {
    High,
    Medium,
    Low,
}

/// 分析摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub total_machines: usize,
    pub bottleneck_count: usize,
    pub underutilized_count: usize,

    /// 平均利用率（百分比，無機台時為 0）
    pub average_utilization_pct: f64,

    pub optimization_potential: OptimizationPotential,
}

/// 瓶頸分析報告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BottleneckReport {
    /// 全部機台利用率（目錄順序）
    pub utilization: Vec<MachineUtilization>,
    pub bottlenecks: Vec<MachineUtilization>,
    pub underutilized: Vec<MachineUtilization>,
    pub load_balancing_suggestions: Vec<LoadBalancingSuggestion>,
    pub setup_optimizations: Vec<SetupOptimization>,
    pub summary: AnalysisSummary,
}

/// 瓶頸分析器
pub struct BottleneckAnalyzer;

impl BottleneckAnalyzer {
    /// 分析排程結果
    pub fn analyze(
        machines: &[MachineSpec],
        entries: &[ScheduleEntry],
        thresholds: &AnalysisThresholds,
    ) -> BottleneckReport {
        let utilization: Vec<MachineUtilization> = machines
            .iter()
            .map(|machine| Self::machine_utilization(machine, entries))
            .collect();

        let bottlenecks: Vec<MachineUtilization> = utilization
            .iter()
            .filter(|u| u.utilization_pct > thresholds.bottleneck_pct)
            .cloned()
            .collect();
        let underutilized: Vec<MachineUtilization> = utilization
            .iter()
            .filter(|u| u.utilization_pct < thresholds.underutilized_pct)
            .cloned()
            .collect();

        let load_balancing_suggestions =
            Self::load_balancing_suggestions(machines, &bottlenecks, &underutilized);
        let setup_optimizations = Self::setup_optimizations(machines, &utilization);

        let average_utilization_pct = if utilization.is_empty() {
            0.0
        } else {
            utilization.iter().map(|u| u.utilization_pct).sum::<f64>() / utilization.len() as f64
        };

        let optimization_potential = if !load_balancing_suggestions.is_empty() {
            OptimizationPotential::High
        } else if !setup_optimizations.is_empty() || !bottlenecks.is_empty() {
            OptimizationPotential::Medium
        } else {
            OptimizationPotential::Low
        };

        let summary = AnalysisSummary {
            total_machines: machines.len(),
            bottleneck_count: bottlenecks.len(),
            underutilized_count: underutilized.len(),
            average_utilization_pct,
            optimization_potential,
        };

        tracing::debug!(
            "瓶頸分析：瓶頸 {} 台，閒置 {} 台，平均利用率 {:.1}%",
            summary.bottleneck_count,
            summary.underutilized_count,
            summary.average_utilization_pct
        );

        BottleneckReport {
            utilization,
            bottlenecks,
            underutilized,
            load_balancing_suggestions,
            setup_optimizations,
            summary,
        }
    }

    fn machine_utilization(machine: &MachineSpec, entries: &[ScheduleEntry]) -> MachineUtilization {
        let (scheduled_hours, order_count) = entries
            .iter()
            .filter(|e| e.machine_id == machine.id)
            .fold((0.0, 0), |(hours, count), e| (hours + e.total_hours, count + 1));

        MachineUtilization {
            machine_id: machine.id.clone(),
            machine_name: machine.name.clone(),
            scheduled_hours,
            utilization_pct: scheduled_hours / machine.working_hours_per_day * 100.0,
            order_count,
        }
    }

    /// 為每台瓶頸機台尋找共用提把、利用率最低的閒置機台
    fn load_balancing_suggestions(
        machines: &[MachineSpec],
        bottlenecks: &[MachineUtilization],
        underutilized: &[MachineUtilization],
    ) -> Vec<LoadBalancingSuggestion> {
        let spec_of = |id: &str| machines.iter().find(|m| m.id == id);
        let mut suggestions = Vec::new();

        for hot in bottlenecks {
            let Some(hot_spec) = spec_of(&hot.machine_id) else {
                continue;
            };

            let target = underutilized
                .iter()
                .filter_map(|cold| {
                    let cold_spec = spec_of(&cold.machine_id)?;
                    let shared: Vec<HandleType> = hot_spec
                        .supported_handles
                        .iter()
                        .copied()
                        .filter(|h| cold_spec.supports_handle(*h))
                        .collect();
                    (!shared.is_empty()).then_some((cold, shared))
                })
                .min_by(|(a, _), (b, _)| a.utilization_pct.total_cmp(&b.utilization_pct));

            if let Some((cold, shared_handles)) = target {
                let utilization_delta = hot.utilization_pct - cold.utilization_pct;
                suggestions.push(LoadBalancingSuggestion {
                    message: format!(
                        "將部分訂單從 {}（{:.1}%）移至 {}（{:.1}%），利用率差 {:.1} 個百分點",
                        hot.machine_name,
                        hot.utilization_pct,
                        cold.machine_name,
                        cold.utilization_pct,
                        utilization_delta
                    ),
                    from_machine: hot.machine_id.clone(),
                    to_machine: cold.machine_id.clone(),
                    shared_handles,
                    utilization_delta,
                });
            }
        }

        suggestions
    }

    /// 一台機台排了多筆訂單時，估算合併相近規格可省下的換線時間
    fn setup_optimizations(
        machines: &[MachineSpec],
        utilization: &[MachineUtilization],
    ) -> Vec<SetupOptimization> {
        machines
            .iter()
            .zip(utilization)
            .filter(|(_, u)| u.order_count > 1)
            .map(|(machine, u)| {
                let current = u.order_count as f64 * machine.setup_time_minutes;
                let batched = u.order_count.div_ceil(2) as f64 * machine.setup_time_minutes;
                SetupOptimization {
                    machine_id: machine.id.clone(),
                    order_count: u.order_count,
                    current_setup_minutes: current,
                    batched_setup_minutes: batched,
                    potential_savings_minutes: current - batched,
                    message: format!(
                        "{} 共 {} 筆訂單，合併相近規格可將換線由 {:.0} 分鐘降至 {:.0} 分鐘",
                        machine.name, u.order_count, current, batched
                    ),
                }
            })
            .collect()
    }
}
