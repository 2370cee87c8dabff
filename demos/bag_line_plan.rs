//! # 製袋產線排程範例
//!
//! 三台機台（兩台平提把、一台扭繩提把專用機）排一天的訂單，
//! 印出指派結果、時間軸、瓶頸建議、成本與物料檢查。
//!
//! 執行：`RUST_LOG=bagplan_sched=debug cargo run --example bag_line_plan`

use anyhow::Context;
use bagplan::*;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// 依袋面積估算牛皮紙用量，扭繩提把另計繩材
struct KraftBagBom;

impl MaterialCalculator for KraftBagBom {
    fn material_requirements(&self, order: &Order) -> Vec<MaterialRequirement> {
        // 前後兩片 + 側摺，單位 m²
        let area = (order.width * order.height * 2.0
            + order.gusset.unwrap_or(0.0) * order.height * 2.0)
            / 1_000_000.0;
        let kg_per_bag = area * order.gsm / 1_000.0;

        let mut requirements = vec![MaterialRequirement::new(
            format!("KRAFT-{:.0}", order.gsm),
            Decimal::try_from(kg_per_bag).unwrap_or_default().round_dp(5),
            "kg",
        )];
        if order.handle_type == HandleType::Twisted {
            requirements.push(MaterialRequirement::new("PAPER-ROPE", Decimal::new(9, 1), "m"));
        }
        if order.needs_patch {
            requirements.push(MaterialRequirement::new("PATCH", Decimal::ONE, "pcs"));
        }
        requirements
    }
}

fn main() -> anyhow::Result<()> {
    bagplan::logging::init();

    println!("===== 製袋產線排程範例 =====\n");

    // [1] 機台目錄
    println!("[1] 載入機台目錄");
    let catalog = MachineCatalog::new(vec![
        MachineSpec::new("M-01", MachineCategory::Standard, 12_000, 900.0)
            .with_name("平提把一號機", "寬幅 180-450mm")
            .with_width_range(Some(180.0), 450.0)
            .with_setup_time(45.0)
            .with_efficiency(0.9)
            .with_costs(Decimal::from(320), Decimal::from(110), Decimal::from(600)),
        MachineSpec::new("M-02", MachineCategory::Standard, 10_000, 800.0)
            .with_name("平提把二號機", "雙色印刷")
            .with_max_colors(2)
            .with_efficiency(0.85)
            .with_costs(Decimal::from(300), Decimal::from(100), Decimal::from(500)),
        MachineSpec::new("M-TW", MachineCategory::HandleSpecialist, 8_000, 500.0)
            .with_name("扭繩提把機", "含補強貼片")
            .with_patch_support(true)
            .with_setup_time(60.0)
            .with_costs(Decimal::from(350), Decimal::from(140), Decimal::from(800)),
    ])
    .context("機台目錄不合法")?;
    for machine in catalog.machines() {
        println!(
            "    {} {}：日產能 {}，時產能 {}",
            machine.id, machine.name, machine.daily_capacity, machine.hourly_capacity
        );
    }

    // [2] 訂單（外部輸入格式）
    println!("\n[2] 讀取訂單");
    let raw_orders: Vec<RawOrder> = serde_json::from_str(
        r#"[
            { "id": "SO-1001", "width": 320, "height": 420, "gusset": 120, "gsm": 100,
              "handle_type": "flat", "colors": 2, "quantity": 6000, "delivery_days": 5 },
            { "id": "SO-1002", "width": 260, "height": 350, "gusset": 100, "gsm": 120,
              "handle_type": "twisted", "colors": 3, "needs_patch": true,
              "quantity": 3, "quantity_unit": "packs", "delivery_days": 10 },
            { "id": "SO-1003", "width": 400, "height": 480, "gsm": 90,
              "handle_type": "flat", "colors": 1, "quantity": 4000 },
            { "id": "SO-1004", "width": 300, "height": 400, "gsm": 100,
              "handle_type": "flat", "colors": 4, "delivery_days": 2 },
            { "id": "SO-1005", "width": 300, "height": 400, "gsm": 100,
              "handle_type": "flat", "colors": 1, "quantity": 30000, "delivery_days": 1 }
        ]"#,
    )
    .context("訂單格式錯誤")?;
    println!("    共 {} 筆", raw_orders.len());

    // [3] 排程
    println!("\n[3] 執行排程");
    let planner = ProductionPlanner::new(catalog, SchedulerConfig::default())?;
    let run_start = NaiveDate::from_ymd_opt(2025, 11, 3)
        .and_then(|d| d.and_hms_opt(6, 0, 0))
        .context("無效的排程起點")?;
    let plan = planner.plan(&raw_orders, run_start);
    let schedule = &plan.schedule;

    for entry in &schedule.entries {
        println!(
            "    {} → {}：{} 個，{} ~ {}（換線 {:.2}h，生產 {:.2}h，優先級 {:.1}）",
            entry.order_id,
            entry.machine_id,
            entry.quantity,
            entry.start.format("%H:%M"),
            entry.end.format("%H:%M"),
            entry.setup_hours,
            entry.production_hours,
            entry.priority
        );
    }
    for unscheduled in &schedule.unscheduled {
        println!("    ✗ {} 未排入：{:?}", unscheduled.order_id, unscheduled.reason);
    }
    for rejected in &schedule.rejected {
        println!("    ✗ {}", rejected);
    }
    println!("    負載平衡分數：{:.1}", schedule.load_balance_score);

    // [4] 時間軸
    println!("\n[4] 機台時間軸");
    for event in &plan.timeline {
        println!(
            "    {:<5} {} ~ {} {:?} {}",
            event.machine_id,
            event.start.format("%H:%M"),
            event.end.format("%H:%M"),
            event.kind,
            event.order_id.as_deref().unwrap_or("-")
        );
    }

    // [5] 瓶頸分析
    println!("\n[5] 瓶頸分析（優化潛力 {:?}）", plan.bottlenecks.summary.optimization_potential);
    for utilization in &plan.bottlenecks.utilization {
        println!(
            "    {}：{:.1}%（{} 筆）",
            utilization.machine_name, utilization.utilization_pct, utilization.order_count
        );
    }
    for suggestion in &plan.bottlenecks.load_balancing_suggestions {
        println!("    建議：{}", suggestion.message);
    }
    for setup in &plan.bottlenecks.setup_optimizations {
        println!("    建議：{}", setup.message);
    }

    // [6] 成本
    println!("\n[6] 成本估算");
    for cost in &plan.costs.machines {
        println!("    {}：{}", cost.machine_id, cost.total_cost);
    }
    match plan.costs.cost_per_unit {
        Some(per_unit) => println!("    合計 {}，單位成本 {}", plan.costs.total_cost, per_unit),
        None => println!("    無產出"),
    }

    // [7] 物料檢查
    println!("\n[7] 物料檢查");
    let orders: Vec<Order> = raw_orders
        .iter()
        .filter_map(|raw| raw.validate(planner.config().units_per_pack).ok())
        .collect();
    let inventory = StaticInventory::new()
        .with_stock("KRAFT-100", Decimal::from(80))
        .with_stock("KRAFT-120", Decimal::from(40))
        .with_stock("PAPER-ROPE", Decimal::from(2_000))
        .with_stock("PATCH", Decimal::from(5_000));
    let materials = planner.check_materials(&plan, &orders, &KraftBagBom, &inventory);
    for line in &materials.lines {
        println!(
            "    {}：需求 {} {}，庫存 {}，缺 {}",
            line.material_id, line.required, line.unit, line.available, line.shortage
        );
    }
    println!("    物料{}", if materials.is_feasible() { "充足" } else { "不足" });

    println!("\n===== JSON 輸出 =====");
    println!("{}", plan.to_json()?);

    Ok(())
}
