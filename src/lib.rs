//! # BagPlan
//!
//! 製袋產線生產排程：訂單排序、機台指派、時間軸與瓶頸分析
//!
//! ```
//! use bagplan::{HandleType, MachineCatalog, MachineCategory, MachineSpec, Order, ProductionPlanner, SchedulerConfig};
//! use chrono::NaiveDate;
//!
//! let catalog = MachineCatalog::new(vec![
//!     MachineSpec::new("M-01", MachineCategory::Standard, 10_000, 800.0),
//! ])
//! .unwrap();
//! let planner = ProductionPlanner::new(catalog, SchedulerConfig::default()).unwrap();
//!
//! let orders = vec![Order::new("ORD-001", 4_000, HandleType::Flat).with_delivery_days(5)];
//! let run_start = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap().and_hms_opt(6, 0, 0).unwrap();
//!
//! let plan = planner.plan_orders(&orders, run_start);
//! assert_eq!(plan.schedule.entries.len(), 1);
//! ```

pub mod logging;

pub use bagplan_core::{
    AnalysisThresholds, BagPlanError, EnvelopeDefaults, HandleType, InventoryLookup,
    MachineCatalog, MachineCategory, MachineSpec, MachineState, MachineStatus,
    MalformedOrder, MalformedReason, MaterialCalculator, MaterialRequirement, Order,
    PriorityWeights, QuantityUnit, RawOrder, Result, ScheduleEntry, SchedulerConfig,
    ScoringWeights, StaticInventory, TimelineEvent, TimelineEventKind, WorkingDay,
};
pub use bagplan_optimizer::{
    BottleneckAnalyzer, BottleneckReport, CostEstimator, CostReport, MaterialChecker,
    MaterialReport, OptimizationPotential,
};
pub use bagplan_sched::{
    GreedyScheduler, IncompatibilityReason, OrderPrioritizer, ScheduleResult, TimelineBuilder,
    UnscheduledReason,
};

use chrono::NaiveDateTime;
use serde::Serialize;

/// 完整生產計劃
#[derive(Debug, Clone, Serialize)]
pub struct ProductionPlan {
    /// 排程結果
    pub schedule: ScheduleResult,

    /// 機台時間軸
    pub timeline: Vec<TimelineEvent>,

    /// 瓶頸分析
    pub bottlenecks: BottleneckReport,

    /// 成本估算
    pub costs: CostReport,
}

impl ProductionPlan {
    /// 序列化為 JSON（供報表或 API 回應）
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// 生產計劃器
///
/// 機台目錄於建立時載入且不可變，每次 `plan` 都從目錄複製新的運行狀態，
/// 多次呼叫之間不共用任何可變資料。
pub struct ProductionPlanner {
    catalog: MachineCatalog,
    scheduler: GreedyScheduler,
}

impl ProductionPlanner {
    /// 創建新的計劃器
    pub fn new(catalog: MachineCatalog, config: SchedulerConfig) -> Result<Self> {
        Ok(Self {
            catalog,
            scheduler: GreedyScheduler::new(config)?,
        })
    }

    /// 從 JSON 載入機台目錄與（可選的）排程配置
    pub fn from_json(catalog_json: &str, config_json: Option<&str>) -> Result<Self> {
        let catalog = MachineCatalog::from_json(catalog_json)?;
        let config = match config_json {
            Some(json) => SchedulerConfig::from_json(json)?,
            None => SchedulerConfig::default(),
        };
        Self::new(catalog, config)
    }

    /// 獲取機台目錄引用
    pub fn catalog(&self) -> &MachineCatalog {
        &self.catalog
    }

    /// 獲取排程配置引用
    pub fn config(&self) -> &SchedulerConfig {
        self.scheduler.config()
    }

    /// 排程原始訂單並產出完整計劃
    pub fn plan(&self, raw_orders: &[RawOrder], run_start: NaiveDateTime) -> ProductionPlan {
        let schedule = self
            .scheduler
            .schedule_raw(&self.catalog, raw_orders, run_start);
        self.build_plan(schedule)
    }

    /// 排程已驗證的訂單並產出完整計劃
    pub fn plan_orders(&self, orders: &[Order], run_start: NaiveDateTime) -> ProductionPlan {
        let schedule = self.scheduler.schedule(&self.catalog, orders, run_start);
        self.build_plan(schedule)
    }

    /// 檢查計劃的物料需求
    pub fn check_materials(
        &self,
        plan: &ProductionPlan,
        orders: &[Order],
        calculator: &dyn MaterialCalculator,
        inventory: &dyn InventoryLookup,
    ) -> MaterialReport {
        MaterialChecker::check(orders, &plan.schedule.entries, calculator, inventory)
    }

    fn build_plan(&self, schedule: ScheduleResult) -> ProductionPlan {
        let config = self.scheduler.config();
        let machines = self.catalog.machines();

        let timeline = TimelineBuilder::build(
            machines,
            &schedule.entries,
            schedule.run_start.date(),
            &config.working_day,
        );
        let bottlenecks = BottleneckAnalyzer::analyze(machines, &schedule.entries, &config.analysis);
        let costs = CostEstimator::estimate(machines, &schedule.entries);

        tracing::info!(
            "生產計劃完成：時間軸事件 {} 筆，瓶頸 {} 台，優化潛力 {:?}，估計成本 {}",
            timeline.len(),
            bottlenecks.summary.bottleneck_count,
            bottlenecks.summary.optimization_potential,
            costs.total_cost
        );

        ProductionPlan {
            schedule,
            timeline,
            bottlenecks,
            costs,
        }
    }
}
