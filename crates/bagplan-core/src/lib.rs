//! # BagPlan Core
//!
//! 製袋產線排程的核心資料模型與類型定義

pub mod calendar;
pub mod config;
pub mod machine;
pub mod material;
pub mod order;
pub mod schedule;

// Re-export 主要類型
pub use calendar::WorkingDay;
pub use config::{
    AnalysisThresholds, EnvelopeDefaults, PriorityWeights, SchedulerConfig, ScoringWeights,
};
pub use machine::{MachineCatalog, MachineCategory, MachineSpec, MachineState, MachineStatus};
pub use material::{InventoryLookup, MaterialCalculator, MaterialRequirement, StaticInventory};
pub use order::{HandleType, MalformedOrder, MalformedReason, Order, QuantityUnit, RawOrder};
pub use schedule::{
    hours_to_duration, DisplayPriority, ScheduleEntry, TimelineEvent, TimelineEventKind,
};

/// 排程錯誤類型
///
/// 僅用於呼叫端的程式錯誤（目錄或參數不合法）。
/// 訂單無法排入屬於正常業務結果，不在此列。
#[derive(Debug, thiserror::Error)]
pub enum BagPlanError {
    #[error("機台 {machine_id} 參數無效: {reason}")]
    InvalidMachine { machine_id: String, reason: String },

    #[error("機台編號重複: {0}")]
    DuplicateMachine(String),

    #[error("排程參數無效: {0}")]
    InvalidConfig(String),

    #[error("無效的時間: {0}")]
    InvalidTime(String),

    #[error("JSON 解析錯誤: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BagPlanError>;
