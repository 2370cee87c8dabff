//! 排程參數配置
//!
//! 評分權重與門檻皆為經驗值，集中於此以便調整。

use serde::{Deserialize, Serialize};

use crate::calendar::WorkingDay;
use crate::{BagPlanError, Result};

/// 訂單優先級權重
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityWeights {
    /// 交期緊急度的計算視界（天），超過此值不加分
    pub urgency_horizon_days: u32,

    /// 每提前一天的加分
    pub urgency_points_per_day: f64,

    /// 交期緊急度上限
    pub urgency_cap: f64,

    /// 批量分數除數（每多少個加一分）
    pub size_divisor: f64,

    /// 批量分數上限
    pub size_cap: f64,

    /// 特殊提把加分
    pub specialized_handle_bonus: f64,

    /// 輸入順序視界
    pub sequence_horizon: f64,

    /// 輸入順序每位加分
    pub sequence_step: f64,

    /// 輸入順序加分上限
    pub sequence_cap: f64,

    /// 未指定交期時的預設天數
    pub default_delivery_days: u32,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            urgency_horizon_days: 21,
            urgency_points_per_day: 5.0,
            urgency_cap: 100.0,
            size_divisor: 1000.0,
            size_cap: 50.0,
            specialized_handle_bonus: 20.0,
            sequence_horizon: 100.0,
            sequence_step: 0.1,
            sequence_cap: 10.0,
            default_delivery_days: 14,
        }
    }
}

/// 機台評分權重
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// 負載平衡權重（乘以閒置比例）
    pub utilization_weight: f64,

    /// 最佳產能使用區間 [下限, 上限]
    pub optimal_fit_range: (f64, f64),

    /// 最佳區間得分
    pub optimal_fit_points: f64,

    /// 次佳區間下限（上限為最佳區間下限）
    pub good_fit_lower: f64,

    /// 次佳區間得分
    pub good_fit_points: f64,

    /// 小批量得分（低於次佳區間下限）
    pub small_fit_points: f64,

    /// 效率權重
    pub efficiency_weight: f64,

    /// 特殊提把訂單指派給專用機的加分
    pub specialist_bonus: f64,

    /// 標準提把訂單指派給標準機的加分
    pub standard_bonus: f64,

    /// 每小時換線時間的扣分
    pub setup_penalty_per_hour: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            utilization_weight: 40.0,
            optimal_fit_range: (0.6, 0.8),
            optimal_fit_points: 30.0,
            good_fit_lower: 0.4,
            good_fit_points: 20.0,
            small_fit_points: 10.0,
            efficiency_weight: 15.0,
            specialist_bonus: 10.0,
            standard_bonus: 5.0,
            setup_penalty_per_hour: 2.0,
        }
    }
}

/// 機台未指定時的尺寸上限
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeDefaults {
    /// 最大袋高（mm）
    pub max_height: f64,

    /// 最大側摺（mm）
    pub max_gusset: f64,
}

impl Default for EnvelopeDefaults {
    fn default() -> Self {
        Self {
            max_height: 600.0,
            max_gusset: 200.0,
        }
    }
}

/// 瓶頸分析門檻（百分比）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisThresholds {
    /// 利用率高於此值視為瓶頸
    pub bottleneck_pct: f64,

    /// 利用率低於此值視為閒置
    pub underutilized_pct: f64,
}

impl Default for AnalysisThresholds {
    fn default() -> Self {
        Self {
            bottleneck_pct: 90.0,
            underutilized_pct: 50.0,
        }
    }
}

/// 排程配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// 訂單優先級權重
    pub priority: PriorityWeights,

    /// 機台評分權重
    pub scoring: ScoringWeights,

    /// 尺寸預設上限
    pub envelope: EnvelopeDefaults,

    /// 時間軸工作時段
    pub working_day: WorkingDay,

    /// 瓶頸分析門檻
    pub analysis: AnalysisThresholds,

    /// 包裝單位換算（每包個數）
    pub units_per_pack: u32,

    /// 最多處理的訂單數，超出者視為無法排入
    pub max_assignments: Option<usize>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            priority: PriorityWeights::default(),
            scoring: ScoringWeights::default(),
            envelope: EnvelopeDefaults::default(),
            working_day: WorkingDay::default(),
            analysis: AnalysisThresholds::default(),
            units_per_pack: 1000,
            max_assignments: None,
        }
    }
}

impl SchedulerConfig {
    /// 從 JSON 載入（缺少的欄位使用預設值）
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置優先級權重
    pub fn with_priority(mut self, priority: PriorityWeights) -> Self {
        self.priority = priority;
        self
    }

    /// 建構器模式：設置評分權重
    pub fn with_scoring(mut self, scoring: ScoringWeights) -> Self {
        self.scoring = scoring;
        self
    }

    /// 建構器模式：設置尺寸預設上限
    pub fn with_envelope(mut self, envelope: EnvelopeDefaults) -> Self {
        self.envelope = envelope;
        self
    }

    /// 建構器模式：設置工作時段
    pub fn with_working_day(mut self, working_day: WorkingDay) -> Self {
        self.working_day = working_day;
        self
    }

    /// 建構器模式：設置瓶頸分析門檻
    pub fn with_analysis(mut self, analysis: AnalysisThresholds) -> Self {
        self.analysis = analysis;
        self
    }

    /// 建構器模式：設置包裝單位換算
    pub fn with_units_per_pack(mut self, units: u32) -> Self {
        self.units_per_pack = units;
        self
    }

    /// 建構器模式：設置處理上限
    pub fn with_max_assignments(mut self, max: usize) -> Self {
        self.max_assignments = Some(max);
        self
    }

    /// 檢查參數一致性
    pub fn validate(&self) -> Result<()> {
        let (fit_low, fit_high) = self.scoring.optimal_fit_range;
        if !(0.0 < self.scoring.good_fit_lower
            && self.scoring.good_fit_lower <= fit_low
            && fit_low <= fit_high
            && fit_high <= 1.0)
        {
            return Err(BagPlanError::InvalidConfig(format!(
                "產能使用區間不合法: 次佳下限 {}, 最佳 [{}, {}]",
                self.scoring.good_fit_lower, fit_low, fit_high
            )));
        }

        let caps = [
            self.priority.urgency_cap,
            self.priority.size_cap,
            self.priority.sequence_cap,
        ];
        if caps.iter().any(|cap| !(*cap >= 0.0)) {
            return Err(BagPlanError::InvalidConfig(format!(
                "優先級分數上限不可為負: {:?}",
                caps
            )));
        }

        if self.priority.size_divisor <= 0.0 {
            return Err(BagPlanError::InvalidConfig(
                "批量分數除數必須為正數".to_string(),
            ));
        }

        if self.analysis.underutilized_pct > self.analysis.bottleneck_pct {
            return Err(BagPlanError::InvalidConfig(format!(
                "閒置門檻 {}% 高於瓶頸門檻 {}%",
                self.analysis.underutilized_pct, self.analysis.bottleneck_pct
            )));
        }

        if self.units_per_pack == 0 {
            return Err(BagPlanError::InvalidConfig(
                "包裝單位換算不可為 0".to_string(),
            ));
        }

        self.working_day.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();

        assert_eq!(config.priority.default_delivery_days, 14);
        assert_eq!(config.scoring.utilization_weight, 40.0);
        assert_eq!(config.scoring.optimal_fit_range, (0.6, 0.8));
        assert_eq!(config.envelope.max_height, 600.0);
        assert_eq!(config.working_day, WorkingDay::default());
        assert_eq!(config.units_per_pack, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = SchedulerConfig::default()
            .with_units_per_pack(500)
            .with_max_assignments(20)
            .with_analysis(AnalysisThresholds {
                bottleneck_pct: 85.0,
                underutilized_pct: 40.0,
            });

        assert_eq!(config.units_per_pack, 500);
        assert_eq!(config.max_assignments, Some(20));
        assert_eq!(config.analysis.bottleneck_pct, 85.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SchedulerConfig::from_json(
            r#"{ "scoring": { "utilization_weight": 50.0 }, "units_per_pack": 250 }"#,
        )
        .unwrap();

        assert_eq!(config.scoring.utilization_weight, 50.0);
        assert_eq!(config.scoring.efficiency_weight, 15.0);
        assert_eq!(config.units_per_pack, 250);
        assert_eq!(config.priority, PriorityWeights::default());
    }

    #[test]
    fn test_invalid_fit_range() {
        let config = SchedulerConfig::default().with_scoring(ScoringWeights {
            optimal_fit_range: (0.8, 0.6),
            ..ScoringWeights::default()
        });

        assert!(matches!(
            config.validate(),
            Err(BagPlanError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_invalid_thresholds() {
        let config = SchedulerConfig::default().with_analysis(AnalysisThresholds {
            bottleneck_pct: 40.0,
            underutilized_pct: 60.0,
        });

        assert!(config.validate().is_err());
    }
}
