//! # BagPlan Scheduling Engine
//!
//! 製袋產線排程引擎：訂單排序、機台相容性篩選、評分與貪婪指派、時間軸展開

pub mod compatibility;
pub mod priority;
pub mod scheduler;
pub mod scoring;
pub mod timeline;

// Re-export 主要類型
pub use compatibility::{CompatibilityFilter, CompatibilityResult, IncompatibilityReason};
pub use priority::{OrderPrioritizer, RankedOrder};
pub use scheduler::{load_balance_score, GreedyScheduler};
pub use scoring::MachineScorer;
pub use timeline::TimelineBuilder;

use bagplan_core::{MachineState, MalformedOrder, ScheduleEntry};
use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

/// 排程結果
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResult {
    /// 排程批次ID
    pub run_id: Uuid,

    /// 排程起點
    pub run_start: NaiveDateTime,

    /// 排程項目（依指派順序）
    pub entries: Vec<ScheduleEntry>,

    /// 負載平衡分數（0-100）
    pub load_balance_score: f64,

    /// 排程結束時各機台狀態
    pub machine_states: Vec<MachineState>,

    /// 無法排入的訂單
    pub unscheduled: Vec<UnscheduledOrder>,

    /// 驗證失敗、未進入排程的訂單
    pub rejected: Vec<MalformedOrder>,

    /// 警告信息
    pub warnings: Vec<ScheduleWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl ScheduleResult {
    /// 創建空的排程結果
    pub fn empty(run_start: NaiveDateTime) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            run_start,
            entries: Vec::new(),
            load_balance_score: 0.0,
            machine_states: Vec::new(),
            unscheduled: Vec::new(),
            rejected: Vec::new(),
            warnings: Vec::new(),
            calculation_time_ms: None,
        }
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: ScheduleWarning) {
        self.warnings.push(warning);
    }

    /// 指定機台的排程項目（依開始時間）
    pub fn entries_for(&self, machine_id: &str) -> Vec<&ScheduleEntry> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .filter(|e| e.machine_id == machine_id)
            .collect();
        entries.sort_by_key(|e| e.start);
        entries
    }

    /// 訂單是否已排入
    pub fn is_scheduled(&self, order_id: &str) -> bool {
        self.entries.iter().any(|e| e.order_id == order_id)
    }

    /// 已排入總數量
    pub fn scheduled_units(&self) -> u64 {
        self.entries.iter().map(|e| e.quantity).sum()
    }
}

/// 無法排入的訂單
#[derive(Debug, Clone, Serialize)]
pub struct UnscheduledOrder {
    pub order_id: String,
    pub quantity: u64,
    pub priority: f64,
    pub reason: UnscheduledReason,
}

/// 無法排入原因
#[derive(Debug, Clone, Serialize)]
pub enum UnscheduledReason {
    /// 沒有相容的機台（附各機台的不相容原因）
    NoCompatibleMachine(Vec<MachineRejection>),
    /// 超過處理上限
    BudgetExhausted,
    /// 選中機台的完工時間超出可表示的時間範圍
    DurationOverflow { machine_id: String, total_hours: f64 },
}

/// 單一機台的拒絕原因
#[derive(Debug, Clone, Serialize)]
pub struct MachineRejection {
    pub machine_id: String,
    pub reasons: Vec<IncompatibilityReason>,
}

/// 排程警告
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleWarning {
    pub order_id: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl ScheduleWarning {
    pub fn new(order_id: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            order_id,
            message,
            severity,
        }
    }

    pub fn warning(order_id: String, message: String) -> Self {
        Self::new(order_id, message, WarningSeverity::Warning)
    }

    pub fn error(order_id: String, message: String) -> Self {
        Self::new(order_id, message, WarningSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningSeverity {
    Warning,
    Error,
}
