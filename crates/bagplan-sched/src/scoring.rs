//! 機台評分
//!
//! 僅對已通過相容性篩選的機台評分，分數越高越適合。

use bagplan_core::{MachineCategory, MachineState, Order, ScoringWeights};

/// 機台評分器
pub struct MachineScorer;

impl MachineScorer {
    /// 計算機台對訂單的適合度
    pub fn score(machine: &MachineState, order: &Order, weights: &ScoringWeights) -> f64 {
        let spec = &machine.spec;

        let balance = (1.0 - machine.utilization()) * weights.utilization_weight;

        let fit = if machine.remaining_capacity == 0 {
            0.0
        } else {
            Self::capacity_fit(
                order.quantity as f64 / machine.remaining_capacity as f64,
                weights,
            )
        };

        let efficiency = spec.efficiency * weights.efficiency_weight;

        let specialization = match (order.handle_type.is_specialized(), spec.category) {
            (true, MachineCategory::HandleSpecialist) => weights.specialist_bonus,
            (false, MachineCategory::Standard) => weights.standard_bonus,
            _ => 0.0,
        };

        let setup_penalty = spec.setup_hours() * weights.setup_penalty_per_hour;

        balance + fit + efficiency + specialization - setup_penalty
    }

    /// 產能使用比例得分
    ///
    /// 過滿與過零碎都不加分，落在最佳區間得分最高。
    pub fn capacity_fit(usage: f64, weights: &ScoringWeights) -> f64 {
        let (optimal_low, optimal_high) = weights.optimal_fit_range;
        if (optimal_low..=optimal_high).contains(&usage) {
            weights.optimal_fit_points
        } else if (weights.good_fit_lower..optimal_low).contains(&usage) {
            weights.good_fit_points
        } else if usage < weights.good_fit_lower {
            weights.small_fit_points
        } else {
            0.0
        }
    }

    /// 從候選機台中挑選最高分者，同分時取機台ID較小者
    ///
    /// `candidates` 為 (機台索引, 分數)。
    pub fn select_best(machines: &[MachineState], candidates: &[(usize, f64)]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;

        for &(index, score) in candidates {
            best = match best {
                None => Some((index, score)),
                Some((best_index, best_score)) => {
                    let better = score > best_score
                        || (score == best_score
                            && machines[index].id() < machines[best_index].id());
                    if better {
                        Some((index, score))
                    } else {
                        Some((best_index, best_score))
                    }
                }
            };
        }

        best.map(|(index, _)| index)
    }
}
