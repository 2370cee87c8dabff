//! # BagPlan Optimizer
//!
//! 排程後分析：瓶頸與負載平衡建議、成本估算、物料可行性

pub mod bottleneck;
pub mod cost;
pub mod materials;

// Re-export 主要類型
pub use bottleneck::{BottleneckAnalyzer, BottleneckReport, OptimizationPotential};
pub use cost::{CostEstimator, CostReport};
pub use materials::{MaterialChecker, MaterialReport};
