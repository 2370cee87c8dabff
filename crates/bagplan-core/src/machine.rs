//! 機台模型
//!
//! `MachineSpec` 是程式啟動時載入的靜態能力描述；`MachineState` 則是
//! 每次排程由 [`MachineCatalog::snapshot`] 複製出的運行狀態，只屬於該次排程。

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::order::HandleType;
use crate::{BagPlanError, Result};

/// 機台運轉狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MachineStatus {
    /// 可用
    #[default]
    Available,
    /// 忙碌（其他產線佔用）
    Busy,
    /// 保養中
    Maintenance,
}

/// 機台分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineCategory {
    /// 標準製袋機
    Standard,
    /// 扭繩提把專用機
    HandleSpecialist,
}

/// 機台靜態規格
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineSpec {
    /// 機台ID
    pub id: String,

    /// 顯示名稱
    pub name: String,

    /// 分類
    pub category: MachineCategory,

    /// 說明
    #[serde(default)]
    pub description: String,

    /// 支援的提把類型
    pub supported_handles: Vec<HandleType>,

    /// 最大印刷色數
    pub max_colors: u8,

    /// 最小袋寬（mm），未指定則不限
    #[serde(default)]
    pub min_width: Option<f64>,

    /// 最大袋寬（mm）
    pub max_width: f64,

    /// 最大袋高（mm），未指定時使用全域預設
    #[serde(default)]
    pub max_height: Option<f64>,

    /// 最大側摺（mm），未指定時使用全域預設
    #[serde(default)]
    pub max_gusset: Option<f64>,

    /// 最小克重
    pub min_gsm: f64,

    /// 最大克重
    pub max_gsm: f64,

    /// 是否支援補強貼片
    #[serde(default)]
    pub patch_support: bool,

    /// 日產能（個/天）
    pub daily_capacity: u64,

    /// 時產能（個/小時）
    pub hourly_capacity: f64,

    /// 每日工作時數
    pub working_hours_per_day: f64,

    /// 換線時間（分鐘）
    pub setup_time_minutes: f64,

    /// 效率係數（0-1）
    pub efficiency: f64,

    /// 人工成本（每小時）
    #[serde(default)]
    pub operator_cost_per_hour: Decimal,

    /// 能源成本（每小時）
    #[serde(default)]
    pub energy_cost_per_hour: Decimal,

    /// 保養成本（每天）
    #[serde(default)]
    pub maintenance_cost_per_day: Decimal,

    /// 運轉狀態
    #[serde(default)]
    pub status: MachineStatus,
}

impl MachineSpec {
    /// 創建新的機台規格（其他參數採預設值）
    pub fn new(
        id: impl Into<String>,
        category: MachineCategory,
        daily_capacity: u64,
        hourly_capacity: f64,
    ) -> Self {
        let id = id.into();
        let supported_handles = match category {
            MachineCategory::Standard => vec![HandleType::Flat],
            MachineCategory::HandleSpecialist => vec![HandleType::Flat, HandleType::Twisted],
        };
        Self {
            name: id.clone(),
            id,
            category,
            description: String::new(),
            supported_handles,
            max_colors: 4,
            min_width: None,
            max_width: 600.0,
            max_height: None,
            max_gusset: None,
            min_gsm: 60.0,
            max_gsm: 150.0,
            patch_support: false,
            daily_capacity,
            hourly_capacity,
            working_hours_per_day: 16.0,
            setup_time_minutes: 30.0,
            efficiency: 1.0,
            operator_cost_per_hour: Decimal::ZERO,
            energy_cost_per_hour: Decimal::ZERO,
            maintenance_cost_per_day: Decimal::ZERO,
            status: MachineStatus::Available,
        }
    }

    /// 建構器模式：設置名稱與說明
    pub fn with_name(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.name = name.into();
        self.description = description.into();
        self
    }

    /// 建構器模式：設置支援的提把
    pub fn with_handles(mut self, handles: Vec<HandleType>) -> Self {
        self.supported_handles = handles;
        self
    }

    /// 建構器模式：設置最大色數
    pub fn with_max_colors(mut self, colors: u8) -> Self {
        self.max_colors = colors;
        self
    }

    /// 建構器模式：設置袋寬範圍
    pub fn with_width_range(mut self, min_width: Option<f64>, max_width: f64) -> Self {
        self.min_width = min_width;
        self.max_width = max_width;
        self
    }

    /// 建構器模式：設置專屬高度/側摺上限
    pub fn with_envelope(mut self, max_height: Option<f64>, max_gusset: Option<f64>) -> Self {
        self.max_height = max_height;
        self.max_gusset = max_gusset;
        self
    }

    /// 建構器模式：設置克重範圍
    pub fn with_gsm_range(mut self, min_gsm: f64, max_gsm: f64) -> Self {
        self.min_gsm = min_gsm;
        self.max_gsm = max_gsm;
        self
    }

    /// 建構器模式：設置補強貼片支援
    pub fn with_patch_support(mut self, supported: bool) -> Self {
        self.patch_support = supported;
        self
    }

    /// 建構器模式：設置每日工作時數
    pub fn with_working_hours(mut self, hours: f64) -> Self {
        self.working_hours_per_day = hours;
        self
    }

    /// 建構器模式：設置換線時間（分鐘）
    pub fn with_setup_time(mut self, minutes: f64) -> Self {
        self.setup_time_minutes = minutes;
        self
    }

    /// 建構器模式：設置效率係數
    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = efficiency;
        self
    }

    /// 建構器模式：設置成本參數
    pub fn with_costs(mut self, operator: Decimal, energy: Decimal, maintenance: Decimal) -> Self {
        self.operator_cost_per_hour = operator;
        self.energy_cost_per_hour = energy;
        self.maintenance_cost_per_day = maintenance;
        self
    }

    /// 建構器模式：設置運轉狀態
    pub fn with_status(mut self, status: MachineStatus) -> Self {
        self.status = status;
        self
    }

    /// 是否可排程
    pub fn is_available(&self) -> bool {
        self.status == MachineStatus::Available
    }

    /// 是否支援指定提把
    pub fn supports_handle(&self, handle: HandleType) -> bool {
        self.supported_handles.contains(&handle)
    }

    /// 兩台機台是否至少共用一種提把
    pub fn shares_handle_with(&self, other: &MachineSpec) -> bool {
        self.supported_handles
            .iter()
            .any(|h| other.supports_handle(*h))
    }

    /// 換線時間（小時）
    pub fn setup_hours(&self) -> f64 {
        self.setup_time_minutes / 60.0
    }

    /// 檢查參數是否合法
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| {
            Err(BagPlanError::InvalidMachine {
                machine_id: self.id.clone(),
                reason: reason.to_string(),
            })
        };

        if self.id.trim().is_empty() {
            return invalid("機台ID不可為空");
        }
        if !(self.hourly_capacity.is_finite() && self.hourly_capacity > 0.0) {
            return invalid("時產能必須為正數");
        }
        if !(self.working_hours_per_day.is_finite() && self.working_hours_per_day > 0.0) {
            return invalid("每日工作時數必須為正數");
        }
        if !(self.efficiency > 0.0 && self.efficiency <= 1.0) {
            return invalid("效率係數必須介於 (0, 1]");
        }
        if !(self.setup_time_minutes.is_finite() && self.setup_time_minutes >= 0.0) {
            return invalid("換線時間不可為負數");
        }
        if self.min_gsm > self.max_gsm {
            return invalid("克重範圍下限大於上限");
        }
        if let Some(min_width) = self.min_width {
            if min_width > self.max_width {
                return invalid("袋寬範圍下限大於上限");
            }
        }
        Ok(())
    }
}

/// 機台目錄（不可變配置）
#[derive(Debug, Clone, Default, Serialize)]
pub struct MachineCatalog {
    machines: Vec<MachineSpec>,
}

impl MachineCatalog {
    /// 創建機台目錄，逐台檢查參數
    pub fn new(machines: Vec<MachineSpec>) -> Result<Self> {
        let mut seen = HashSet::new();
        for machine in &machines {
            machine.validate()?;
            if !seen.insert(machine.id.as_str()) {
                return Err(BagPlanError::DuplicateMachine(machine.id.clone()));
            }
        }
        Ok(Self { machines })
    }

    /// 從 JSON 陣列載入
    pub fn from_json(json: &str) -> Result<Self> {
        let machines: Vec<MachineSpec> = serde_json::from_str(json)?;
        Self::new(machines)
    }

    /// 所有機台規格
    pub fn machines(&self) -> &[MachineSpec] {
        &self.machines
    }

    /// 依ID查詢
    pub fn get(&self, machine_id: &str) -> Option<&MachineSpec> {
        self.machines.iter().find(|m| m.id == machine_id)
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    /// 為單次排程複製出全新的運行狀態
    pub fn snapshot(&self, run_start: NaiveDateTime) -> Vec<MachineState> {
        self.machines
            .iter()
            .map(|spec| MachineState::new(spec.clone(), run_start))
            .collect()
    }
}

/// 機台運行狀態（單次排程內可變）
#[derive(Debug, Clone, Serialize)]
pub struct MachineState {
    /// 靜態規格
    pub spec: MachineSpec,

    /// 已排數量
    pub scheduled_units: u64,

    /// 已排工時（含換線）
    pub scheduled_hours: f64,

    /// 剩餘日產能，恆等於 `max(0, daily_capacity - scheduled_units)`
    pub remaining_capacity: u64,

    /// 下次可用時間（只增不減）
    pub next_available: NaiveDateTime,
}

impl MachineState {
    /// 創建新的運行狀態
    pub fn new(spec: MachineSpec, run_start: NaiveDateTime) -> Self {
        Self {
            remaining_capacity: spec.daily_capacity,
            spec,
            scheduled_units: 0,
            scheduled_hours: 0.0,
            next_available: run_start,
        }
    }

    pub fn id(&self) -> &str {
        &self.spec.id
    }

    /// 工時利用率（0.0 起，可能超過 1.0）
    pub fn utilization(&self) -> f64 {
        self.scheduled_hours / self.spec.working_hours_per_day
    }

    /// 記錄一筆指派
    pub fn assign(&mut self, quantity: u64, hours: f64, end: NaiveDateTime) {
        self.scheduled_units += quantity;
        self.scheduled_hours += hours;
        self.remaining_capacity = self.spec.daily_capacity.saturating_sub(self.scheduled_units);
        if end > self.next_available {
            self.next_available = end;
        }
    }
}
