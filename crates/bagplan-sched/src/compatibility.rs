//! 機台相容性篩選
//!
//! 依機台「當下」的運行狀態判斷，因此剩餘產能會隨排程推進而收緊。
//! 所有不符合的條件都會收集，不會在第一項失敗時停止。

use bagplan_core::{EnvelopeDefaults, HandleType, MachineState, MachineStatus, Order};
use serde::Serialize;

/// 相容性判斷結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CompatibilityResult {
    Compatible,
    Incompatible(Vec<IncompatibilityReason>),
}

impl CompatibilityResult {
    pub fn is_compatible(&self) -> bool {
        matches!(self, CompatibilityResult::Compatible)
    }

    /// 不相容原因（相容時為空）
    pub fn reasons(&self) -> &[IncompatibilityReason] {
        match self {
            CompatibilityResult::Compatible => &[],
            CompatibilityResult::Incompatible(reasons) => reasons,
        }
    }
}

/// 不相容原因
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
pub enum IncompatibilityReason {
    #[error("機台不可用（{0:?}）")]
    Unavailable(MachineStatus),

    #[error("袋寬 {width}mm 超過上限 {max}mm")]
    WidthAboveMax { width: f64, max: f64 },

    #[error("袋寬 {width}mm 低於下限 {min}mm")]
    WidthBelowMin { width: f64, min: f64 },

    #[error("袋高 {height}mm 超過上限 {max}mm")]
    HeightAboveMax { height: f64, max: f64 },

    #[error("側摺 {gusset}mm 超過上限 {max}mm")]
    GussetAboveMax { gusset: f64, max: f64 },

    #[error("克重 {gsm} 不在 {min}-{max} 範圍內")]
    GsmOutOfRange { gsm: f64, min: f64, max: f64 },

    #[error("不支援 {0} 提把")]
    UnsupportedHandle(HandleType),

    #[error("色數 {colors} 超過上限 {max}")]
    TooManyColors { colors: u8, max: u8 },

    #[error("不支援補強貼片")]
    PatchUnsupported,

    #[error("剩餘產能 {remaining} 不足，需要 {required}")]
    InsufficientCapacity { required: u64, remaining: u64 },
}

/// 相容性篩選器
pub struct CompatibilityFilter;

impl CompatibilityFilter {
    /// 檢查訂單能否在機台上生產
    pub fn check(
        machine: &MachineState,
        order: &Order,
        envelope: &EnvelopeDefaults,
    ) -> CompatibilityResult {
        let spec = &machine.spec;
        let mut reasons = Vec::new();

        if !spec.is_available() {
            reasons.push(IncompatibilityReason::Unavailable(spec.status));
        }

        if order.width > spec.max_width {
            reasons.push(IncompatibilityReason::WidthAboveMax {
                width: order.width,
                max: spec.max_width,
            });
        }
        if let Some(min) = spec.min_width {
            if order.width < min {
                reasons.push(IncompatibilityReason::WidthBelowMin {
                    width: order.width,
                    min,
                });
            }
        }

        let max_height = spec.max_height.unwrap_or(envelope.max_height);
        if order.height > max_height {
            reasons.push(IncompatibilityReason::HeightAboveMax {
                height: order.height,
                max: max_height,
            });
        }

        if let Some(gusset) = order.gusset {
            let max_gusset = spec.max_gusset.unwrap_or(envelope.max_gusset);
            if gusset > max_gusset {
                reasons.push(IncompatibilityReason::GussetAboveMax {
                    gusset,
                    max: max_gusset,
                });
            }
        }

        if order.gsm < spec.min_gsm || order.gsm > spec.max_gsm {
            reasons.push(IncompatibilityReason::GsmOutOfRange {
                gsm: order.gsm,
                min: spec.min_gsm,
                max: spec.max_gsm,
            });
        }

        if !spec.supports_handle(order.handle_type) {
            reasons.push(IncompatibilityReason::UnsupportedHandle(order.handle_type));
        }

        if order.colors > spec.max_colors {
            reasons.push(IncompatibilityReason::TooManyColors {
                colors: order.colors,
                max: spec.max_colors,
            });
        }

        if order.needs_patch && !spec.patch_support {
            reasons.push(IncompatibilityReason::PatchUnsupported);
        }

        if machine.remaining_capacity < order.quantity {
            reasons.push(IncompatibilityReason::InsufficientCapacity {
                required: order.quantity,
                remaining: machine.remaining_capacity,
            });
        }

        if reasons.is_empty() {
            CompatibilityResult::Compatible
        } else {
            CompatibilityResult::Incompatible(reasons)
        }
    }
}
