//! 集成測試

use bagplan::*;
use chrono::{NaiveDate, NaiveDateTime};
use rstest::{fixture, rstest};
use rust_decimal::Decimal;

fn run_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, 3)
        .unwrap()
        .and_hms_opt(6, 0, 0)
        .unwrap()
}

fn planner(machines: Vec<MachineSpec>) -> ProductionPlanner {
    ProductionPlanner::new(
        MachineCatalog::new(machines).unwrap(),
        SchedulerConfig::default(),
    )
    .unwrap()
}

/// 兩台平提把標準機、一台扭繩專用機
#[fixture]
fn bag_line() -> ProductionPlanner {
    planner(vec![
        MachineSpec::new("M-01", MachineCategory::Standard, 12_000, 900.0)
            .with_name("平提把一號機", "寬幅 180-450mm")
            .with_width_range(Some(180.0), 450.0)
            .with_setup_time(45.0)
            .with_efficiency(0.9)
            .with_costs(Decimal::from(320), Decimal::from(110), Decimal::from(600)),
        MachineSpec::new("M-02", MachineCategory::Standard, 10_000, 800.0)
            .with_name("平提把二號機", "")
            .with_max_colors(2)
            .with_efficiency(0.85)
            .with_costs(Decimal::from(300), Decimal::from(100), Decimal::from(500)),
        MachineSpec::new("M-TW", MachineCategory::HandleSpecialist, 8_000, 500.0)
            .with_name("扭繩提把機", "")
            .with_patch_support(true)
            .with_setup_time(60.0)
            .with_costs(Decimal::from(350), Decimal::from(140), Decimal::from(800)),
    ])
}

fn raw(id: &str, quantity: Option<f64>, handle: &str, delivery_days: Option<u32>) -> RawOrder {
    RawOrder {
        id: id.to_string(),
        width: 320.0,
        height: 420.0,
        gusset: Some(120.0),
        gsm: 100.0,
        handle_type: handle.to_string(),
        colors: 2,
        needs_patch: false,
        quantity,
        quantity_unit: QuantityUnit::Pieces,
        delivery_days,
    }
}

#[test]
fn test_oversized_order_is_not_split() {
    // 兩台產能 1000 的機台，1500 個的訂單不會拆分
    let planner = planner(vec![
        MachineSpec::new("M-01", MachineCategory::Standard, 1_000, 100.0),
        MachineSpec::new("M-02", MachineCategory::Standard, 1_000, 100.0),
    ]);
    let orders = vec![Order::new("ORD-BIG", 1_500, HandleType::Flat)];

    let plan = planner.plan_orders(&orders, run_start());

    assert!(plan.schedule.entries_for("M-01").is_empty());
    assert!(plan.schedule.entries_for("M-02").is_empty());
    assert_eq!(plan.schedule.unscheduled.len(), 1);
    assert_eq!(plan.schedule.unscheduled[0].order_id, "ORD-BIG");

    let UnscheduledReason::NoCompatibleMachine(rejections) = &plan.schedule.unscheduled[0].reason
    else {
        panic!("expected NoCompatibleMachine");
    };
    assert_eq!(rejections.len(), 2);
}

#[test]
fn test_second_order_starts_when_first_ends() {
    let planner = planner(vec![MachineSpec::new(
        "M-01",
        MachineCategory::Standard,
        1_000,
        100.0,
    )
    .with_setup_time(30.0)
    .with_efficiency(1.0)]);
    let orders = vec![
        Order::new("ORD-001", 400, HandleType::Flat),
        Order::new("ORD-002", 400, HandleType::Flat),
    ];

    let plan = planner.plan_orders(&orders, run_start());
    let entries = &plan.schedule.entries;

    assert_eq!(entries.len(), 2);
    // 0.5h 換線 + 4h 生產
    assert_eq!(entries[0].end, run_start() + chrono::Duration::minutes(270));
    assert_eq!(entries[1].start, entries[0].end);
    assert_eq!(entries[1].end, run_start() + chrono::Duration::minutes(540));
}

#[test]
fn test_identical_fleet_is_balanced() {
    let machines = (1..=8)
        .map(|i| MachineSpec::new(format!("M-{i:02}"), MachineCategory::Standard, 10_000, 1_000.0))
        .collect();
    let planner = planner(machines);
    let orders: Vec<_> = (1..=8)
        .map(|i| Order::new(format!("ORD-{i:03}"), 2_000, HandleType::Flat))
        .collect();

    let plan = planner.plan_orders(&orders, run_start());

    assert_eq!(plan.schedule.entries.len(), 8);
    assert!(plan.schedule.load_balance_score > 95.0);
    for state in &plan.schedule.machine_states {
        assert_eq!(state.scheduled_units, 2_000);
    }
}

#[test]
fn test_empty_order_list() {
    let planner = planner(vec![MachineSpec::new(
        "M-01",
        MachineCategory::Standard,
        1_000,
        100.0,
    )]);

    let plan = planner.plan_orders(&[], run_start());

    assert!(plan.schedule.entries.is_empty());
    assert_eq!(plan.schedule.load_balance_score, 0.0);
    assert_eq!(plan.timeline.len(), 1);
    assert_eq!(plan.timeline[0].kind, TimelineEventKind::Idle);
    assert_eq!(plan.costs.cost_per_unit, None);
}

#[rstest]
fn test_full_plan(bag_line: ProductionPlanner) {
    bagplan::logging::init_test();

    let orders = vec![
        raw("ORD-001", Some(6_000.0), "flat", Some(5)),
        raw("ORD-002", Some(3_000.0), "twisted", Some(10)),
        raw("ORD-003", None, "flat", Some(3)),
        raw("ORD-004", Some(4_000.0), "flat", None),
        raw("ORD-005", Some(20_000.0), "flat", Some(2)),
        raw("ORD-006", Some(500.0), "rope", Some(2)),
    ];

    let plan = bag_line.plan(&orders, run_start());
    let schedule = &plan.schedule;

    // 不合格訂單另行回報，不影響其他訂單
    let rejected: Vec<_> = schedule.rejected.iter().map(|r| r.order_id.as_str()).collect();
    assert_eq!(rejected, vec!["ORD-003", "ORD-006"]);

    // 超過所有機台日產能的訂單無法排入
    assert_eq!(schedule.unscheduled.len(), 1);
    assert_eq!(schedule.unscheduled[0].order_id, "ORD-005");

    assert_eq!(schedule.entries.len(), 3);
    assert_eq!(
        schedule.entries.len() + schedule.unscheduled.len() + schedule.rejected.len(),
        orders.len()
    );

    // 扭繩訂單只能由專用機生產
    let twisted = schedule
        .entries
        .iter()
        .find(|e| e.order_id == "ORD-002")
        .unwrap();
    assert_eq!(twisted.machine_id, "M-TW");

    // 優先級較高者先排
    assert_eq!(schedule.entries[0].order_id, "ORD-001");
    assert!(schedule.entries[0].priority >= schedule.entries[1].priority);

    // 時間軸依開始時間排序，且每台機台都有事件
    assert!(plan.timeline.windows(2).all(|w| w[0].start <= w[1].start));
    for machine in bag_line.catalog().machines() {
        assert!(plan.timeline.iter().any(|e| e.machine_id == machine.id));
    }

    assert_eq!(plan.bottlenecks.summary.total_machines, 3);
    assert!(plan.costs.total_cost > Decimal::ZERO);
    assert_eq!(plan.costs.total_units, schedule.scheduled_units());
}

#[rstest]
fn test_runs_do_not_share_state(bag_line: ProductionPlanner) {
    let orders = vec![
        Order::new("ORD-001", 7_000, HandleType::Flat),
        Order::new("ORD-002", 7_000, HandleType::Flat),
    ];

    let first = bag_line.plan_orders(&orders, run_start());
    let second = bag_line.plan_orders(&orders, run_start());

    assert_eq!(first.schedule.entries, second.schedule.entries);
    assert_eq!(
        first.schedule.load_balance_score,
        second.schedule.load_balance_score
    );
    assert_ne!(first.schedule.run_id, second.schedule.run_id);
}

#[test]
fn test_bottleneck_suggestions_from_plan() {
    let planner = planner(vec![
        MachineSpec::new("M-01", MachineCategory::Standard, 20_000, 1_000.0).with_setup_time(0.0),
        MachineSpec::new("M-02", MachineCategory::Standard, 20_000, 1_000.0)
            .with_status(MachineStatus::Maintenance),
    ]);
    let orders = vec![
        Order::new("ORD-001", 8_000, HandleType::Flat),
        Order::new("ORD-002", 7_000, HandleType::Flat),
    ];

    let plan = planner.plan_orders(&orders, run_start());
    let report = &plan.bottlenecks;

    // M-01: 15/16 = 93.75%，M-02 保養中未排程
    assert_eq!(report.bottlenecks.len(), 1);
    assert_eq!(report.underutilized.len(), 1);
    assert_eq!(report.load_balancing_suggestions.len(), 1);
    assert_eq!(report.load_balancing_suggestions[0].to_machine, "M-02");
    assert_eq!(report.setup_optimizations.len(), 1);
    assert_eq!(report.summary.optimization_potential, OptimizationPotential::High);
}

#[test]
fn test_planner_from_json() {
    let catalog = r#"[
        {
            "id": "M-01",
            "name": "Flat handle line",
            "category": "Standard",
            "supported_handles": ["flat"],
            "max_colors": 4,
            "max_width": 450,
            "min_gsm": 70,
            "max_gsm": 140,
            "daily_capacity": 12000,
            "hourly_capacity": 900,
            "working_hours_per_day": 16,
            "setup_time_minutes": 45,
            "efficiency": 0.9
        }
    ]"#;
    let config = r#"{ "units_per_pack": 500, "working_day": { "start_hour": 7, "end_hour": 19 } }"#;
    let orders: Vec<RawOrder> = serde_json::from_str(
        r#"[{ "id": "ORD-001", "width": 300, "height": 400, "gsm": 100,
              "handle_type": "flat", "quantity": 4, "quantity_unit": "packs" }]"#,
    )
    .unwrap();

    let planner = ProductionPlanner::from_json(catalog, Some(config)).unwrap();
    let plan = planner.plan(&orders, run_start());

    assert_eq!(plan.schedule.entries.len(), 1);
    assert_eq!(plan.schedule.entries[0].quantity, 2_000);
    // 07:00 前的排程不產生前置閒置；19:00 收工
    let last = plan.timeline.last().unwrap();
    assert_eq!(last.kind, TimelineEventKind::Idle);
    assert_eq!(last.end, run_start() + chrono::Duration::hours(13));

    let json = plan.to_json().unwrap();
    assert!(json.contains("\"order_id\": \"ORD-001\""));
}

#[test]
fn test_invalid_catalog_json() {
    let catalog = r#"[{ "id": "M-01" }]"#;
    assert!(matches!(
        ProductionPlanner::from_json(catalog, None),
        Err(BagPlanError::Json(_))
    ));
}

#[rstest]
fn test_duplicate_ids_rejected_before_ranking(bag_line: ProductionPlanner) {
    let orders = vec![
        raw("ORD-001", Some(2_000.0), "flat", Some(5)),
        raw("ORD-001", Some(3_000.0), "twisted", Some(1)),
        raw("ORD-002", Some(1_000.0), "flat", Some(7)),
    ];

    let plan = bag_line.plan(&orders, run_start());
    let schedule = &plan.schedule;

    assert_eq!(schedule.entries.len(), 2);
    assert_eq!(schedule.rejected.len(), 1);
    assert_eq!(schedule.rejected[0].reason, MalformedReason::DuplicateId);
    let kept = schedule
        .entries
        .iter()
        .find(|e| e.order_id == "ORD-001")
        .unwrap();
    assert_eq!(kept.quantity, 2_000);
}

#[test]
fn test_overflowing_machine_does_not_abort_run() {
    let planner = planner(vec![
        MachineSpec::new("M-01", MachineCategory::Standard, 10_000, 800.0).with_efficiency(1e-300),
        MachineSpec::new("M-TW", MachineCategory::HandleSpecialist, 10_000, 800.0)
            .with_handles(vec![HandleType::Twisted]),
    ]);
    let orders = vec![
        Order::new("ORD-001", 1_000, HandleType::Flat),
        Order::new("ORD-002", 1_000, HandleType::Twisted),
    ];

    let plan = planner.plan_orders(&orders, run_start());

    assert_eq!(plan.schedule.entries.len(), 1);
    assert_eq!(plan.schedule.entries[0].order_id, "ORD-002");
    assert!(matches!(
        plan.schedule.unscheduled[0].reason,
        UnscheduledReason::DurationOverflow { .. }
    ));
    assert!(plan.to_json().is_ok());
}

#[test]
fn test_material_check_through_planner() {
    struct FixedBom;

    impl MaterialCalculator for FixedBom {
        fn material_requirements(&self, _order: &Order) -> Vec<MaterialRequirement> {
            vec![MaterialRequirement::new("KRAFT-100", Decimal::new(6, 3), "kg")]
        }
    }

    let planner = planner(vec![MachineSpec::new(
        "M-01",
        MachineCategory::Standard,
        10_000,
        800.0,
    )]);
    let orders = vec![
        Order::new("ORD-001", 5_000, HandleType::Flat),
        Order::new("ORD-002", 20_000, HandleType::Flat),
    ];
    let plan = planner.plan_orders(&orders, run_start());
    let inventory = StaticInventory::new().with_stock("KRAFT-100", Decimal::from(25));

    let report = planner.check_materials(&plan, &orders, &FixedBom, &inventory);

    // 只計算已排入的 ORD-001：5000 × 0.006 = 30kg
    assert_eq!(report.lines.len(), 1);
    assert_eq!(report.lines[0].required, Decimal::from(30));
    assert_eq!(report.lines[0].shortage, Decimal::from(5));
    assert!(!report.is_feasible());
}
