//! 貪婪排程器

use bagplan_core::{
    hours_to_duration, MachineCatalog, MachineState, MalformedOrder, MalformedReason, Order,
    RawOrder, ScheduleEntry, SchedulerConfig,
};
use chrono::NaiveDateTime;
use std::collections::HashSet;

use crate::compatibility::{CompatibilityFilter, CompatibilityResult};
use crate::priority::{OrderPrioritizer, RankedOrder};
use crate::scoring::MachineScorer;
use crate::{
    MachineRejection, ScheduleResult, ScheduleWarning, UnscheduledOrder, UnscheduledReason,
};

/// 貪婪排程器
///
/// 依優先級逐筆指派訂單，每次指派都會更新該機台的運行狀態，
/// 因此後面訂單的選擇取決於前面所有的指派結果。單次掃描，不保證全域最佳。
pub struct GreedyScheduler {
    config: SchedulerConfig,
}

impl GreedyScheduler {
    /// 創建新的排程器
    pub fn new(config: SchedulerConfig) -> bagplan_core::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// 獲取排程配置引用
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// 排程已驗證的訂單
    ///
    /// 訂單ID重複時保留第一筆，其餘列為不合格。
    pub fn schedule(
        &self,
        catalog: &MachineCatalog,
        orders: &[Order],
        run_start: NaiveDateTime,
    ) -> ScheduleResult {
        let indexed = orders.iter().cloned().enumerate().collect();
        self.schedule_indexed(catalog, indexed, Vec::new(), run_start)
    }

    /// 排程原始訂單：先驗證，不合格者另行回報，其餘照常排程
    pub fn schedule_raw(
        &self,
        catalog: &MachineCatalog,
        raw_orders: &[RawOrder],
        run_start: NaiveDateTime,
    ) -> ScheduleResult {
        let mut valid = Vec::with_capacity(raw_orders.len());
        let mut rejected = Vec::new();

        for (sequence, raw) in raw_orders.iter().enumerate() {
            match raw.validate(self.config.units_per_pack) {
                Ok(order) => valid.push((sequence, order)),
                Err(malformed) => {
                    tracing::warn!("訂單不合格，略過: {}", malformed);
                    rejected.push(malformed);
                }
            }
        }

        self.schedule_indexed(catalog, valid, rejected, run_start)
    }

    fn schedule_indexed(
        &self,
        catalog: &MachineCatalog,
        orders: Vec<(usize, Order)>,
        mut rejected: Vec<MalformedOrder>,
        run_start: NaiveDateTime,
    ) -> ScheduleResult {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(orders.len());
        for (sequence, order) in orders {
            if seen.insert(order.id.clone()) {
                unique.push((sequence, order));
            } else {
                let malformed = MalformedOrder {
                    order_id: order.id,
                    reason: MalformedReason::DuplicateId,
                };
                tracing::warn!("訂單不合格，略過: {}", malformed);
                rejected.push(malformed);
            }
        }

        let ranked = OrderPrioritizer::rank(unique, &self.config.priority);
        let mut result = self.run(catalog, ranked, run_start);

        for malformed in &rejected {
            result.add_warning(ScheduleWarning::error(
                malformed.order_id.clone(),
                malformed.reason.to_string(),
            ));
        }
        result.rejected = rejected;
        result
    }

    fn run(
        &self,
        catalog: &MachineCatalog,
        ranked: Vec<RankedOrder>,
        run_start: NaiveDateTime,
    ) -> ScheduleResult {
        tracing::info!(
            "開始排程：訂單 {} 筆，機台 {} 台，起點 {}",
            ranked.len(),
            catalog.len(),
            run_start
        );
        let start_time = std::time::Instant::now();

        let mut result = ScheduleResult::empty(run_start);

        // Step 1: 複製機台運行狀態（僅屬於本次排程）
        let mut machines = catalog.snapshot(run_start);

        // Step 2: 依優先級逐筆指派
        for (processed, ranked_order) in ranked.into_iter().enumerate() {
            let RankedOrder {
                priority, order, ..
            } = ranked_order;

            if let Some(max) = self.config.max_assignments {
                if processed >= max {
                    tracing::warn!("訂單 {} 超過處理上限 {}，未排入", order.id, max);
                    result.add_warning(ScheduleWarning::warning(
                        order.id.clone(),
                        format!("超過處理上限 {}", max),
                    ));
                    result.unscheduled.push(UnscheduledOrder {
                        order_id: order.id,
                        quantity: order.quantity,
                        priority,
                        reason: UnscheduledReason::BudgetExhausted,
                    });
                    continue;
                }
            }

            let mut candidates = Vec::new();
            let mut rejections = Vec::new();
            for (index, machine) in machines.iter().enumerate() {
                match CompatibilityFilter::check(machine, &order, &self.config.envelope) {
                    CompatibilityResult::Compatible => {
                        let score = MachineScorer::score(machine, &order, &self.config.scoring);
                        tracing::debug!("訂單 {} → 機台 {} 得分 {:.2}", order.id, machine.id(), score);
                        candidates.push((index, score));
                    }
                    CompatibilityResult::Incompatible(reasons) => {
                        rejections.push(MachineRejection {
                            machine_id: machine.id().to_string(),
                            reasons,
                        });
                    }
                }
            }

            let Some(best) = MachineScorer::select_best(&machines, &candidates) else {
                tracing::warn!("訂單 {} 沒有相容的機台，未排入", order.id);
                result.add_warning(ScheduleWarning::warning(
                    order.id.clone(),
                    "沒有相容的機台".to_string(),
                ));
                result.unscheduled.push(UnscheduledOrder {
                    order_id: order.id,
                    quantity: order.quantity,
                    priority,
                    reason: UnscheduledReason::NoCompatibleMachine(rejections),
                });
                continue;
            };

            let machine = &mut machines[best];
            let entry = match Self::build_entry(machine, &order, priority) {
                Ok(entry) => entry,
                Err(reason) => {
                    tracing::warn!("訂單 {} 完工時間超出範圍，未排入", order.id);
                    result.add_warning(ScheduleWarning::warning(
                        order.id.clone(),
                        "完工時間超出範圍".to_string(),
                    ));
                    result.unscheduled.push(UnscheduledOrder {
                        order_id: order.id,
                        quantity: order.quantity,
                        priority,
                        reason,
                    });
                    continue;
                }
            };
            machine.assign(entry.quantity, entry.total_hours, entry.end);

            tracing::debug!(
                "指派: {} → {} ({} 個, {} ~ {})",
                entry.order_id,
                entry.machine_id,
                entry.quantity,
                entry.start,
                entry.end
            );
            result.entries.push(entry);
        }

        // Step 3: 負載平衡分數
        result.load_balance_score = load_balance_score(&machines);
        result.machine_states = machines;
        result.calculation_time_ms = Some(start_time.elapsed().as_millis());

        tracing::info!(
            "排程完成，耗時 {:?}：排入 {} 筆，未排入 {} 筆，負載平衡 {:.1}",
            start_time.elapsed(),
            result.entries.len(),
            result.unscheduled.len(),
            result.load_balance_score
        );

        result
    }

    /// 依機台當下狀態計算排程項目
    ///
    /// 完工時間無法表示時不修改機台狀態，回傳 `DurationOverflow`。
    fn build_entry(
        machine: &MachineState,
        order: &Order,
        priority: f64,
    ) -> Result<ScheduleEntry, UnscheduledReason> {
        let spec = &machine.spec;
        let setup_hours = spec.setup_hours();
        let base_production_hours = order.quantity as f64 / spec.hourly_capacity;
        let production_hours = base_production_hours / spec.efficiency;
        let total_hours = setup_hours + production_hours;

        let start = machine.next_available;
        let end = hours_to_duration(total_hours)
            .and_then(|duration| start.checked_add_signed(duration))
            .ok_or_else(|| UnscheduledReason::DurationOverflow {
                machine_id: spec.id.clone(),
                total_hours,
            })?;

        Ok(ScheduleEntry {
            order_id: order.id.clone(),
            machine_id: spec.id.clone(),
            quantity: order.quantity,
            start,
            end,
            setup_hours,
            production_hours,
            total_hours,
            priority,
        })
    }
}

/// 負載平衡分數
///
/// 以各機台工時利用率的變異數衡量：`max(0, 100 - variance * 1000)`。
/// 無機台或沒有任何排程時回傳 0。
pub fn load_balance_score(machines: &[MachineState]) -> f64 {
    if machines.is_empty() || machines.iter().all(|m| m.scheduled_hours == 0.0) {
        return 0.0;
    }

    let utilizations: Vec<f64> = machines.iter().map(MachineState::utilization).collect();
    let n = utilizations.len() as f64;
    let mean = utilizations.iter().sum::<f64>() / n;
    let variance = utilizations.iter().map(|u| (u - mean).powi(2)).sum::<f64>() / n;

    let score = 100.0 - variance * 1000.0;
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}
