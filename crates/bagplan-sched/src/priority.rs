//! 訂單優先級排序

use bagplan_core::{Order, PriorityWeights};

/// 已評分的訂單
#[derive(Debug, Clone)]
pub struct RankedOrder {
    /// 原始輸入位置
    pub sequence: usize,

    /// 優先級分數
    pub priority: f64,

    pub order: Order,
}

/// 訂單排序器
pub struct OrderPrioritizer;

impl OrderPrioritizer {
    /// 依優先級由高至低排序，分數相同時維持輸入順序
    pub fn prioritize(orders: &[Order], weights: &PriorityWeights) -> Vec<RankedOrder> {
        Self::rank(orders.iter().cloned().enumerate(), weights)
    }

    /// 以指定的原始位置排序（部分訂單已在驗證時剔除）
    pub fn rank(
        orders: impl IntoIterator<Item = (usize, Order)>,
        weights: &PriorityWeights,
    ) -> Vec<RankedOrder> {
        let mut ranked: Vec<RankedOrder> = orders
            .into_iter()
            .map(|(sequence, order)| RankedOrder {
                priority: Self::score(&order, sequence, weights),
                sequence,
                order,
            })
            .collect();

        // sort_by 為穩定排序
        ranked.sort_by(|a, b| b.priority.total_cmp(&a.priority));
        ranked
    }

    /// 計算單筆訂單的優先級分數
    ///
    /// 分數 = 交期緊急度 + 批量 + 特殊提把 + 輸入順序，各項皆有上限。
    pub fn score(order: &Order, sequence: usize, weights: &PriorityWeights) -> f64 {
        let delivery_days = order.delivery_days_or(weights.default_delivery_days);

        let urgency = ((f64::from(weights.urgency_horizon_days) - f64::from(delivery_days))
            * weights.urgency_points_per_day)
            .clamp(0.0, weights.urgency_cap);

        let size = (order.quantity as f64 / weights.size_divisor).min(weights.size_cap);

        let handle = if order.handle_type.is_specialized() {
            weights.specialized_handle_bonus
        } else {
            0.0
        };

        let sequence_bonus = ((weights.sequence_horizon - sequence as f64) * weights.sequence_step)
            .clamp(0.0, weights.sequence_cap);

        urgency + size + handle + sequence_bonus
    }
}
