//! 排程性質測試

use bagplan::*;
use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use std::collections::HashMap;

fn run_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, 3)
        .unwrap()
        .and_hms_opt(6, 0, 0)
        .unwrap()
}

prop_compose! {
    fn machine_spec()(
        specialist in any::<bool>(),
        daily_capacity in 500u64..20_000,
        hourly_capacity in 100.0f64..2_000.0,
        setup_minutes in 0.0f64..90.0,
        efficiency in 0.5f64..=1.0,
        max_colors in 1u8..=6,
    ) -> MachineSpec {
        let category = if specialist {
            MachineCategory::HandleSpecialist
        } else {
            MachineCategory::Standard
        };
        MachineSpec::new("M", category, daily_capacity, hourly_capacity)
            .with_setup_time(setup_minutes)
            .with_efficiency(efficiency)
            .with_max_colors(max_colors)
    }
}

prop_compose! {
    fn order()(
        quantity in 100u64..8_000,
        twisted in any::<bool>(),
        width in 150.0f64..500.0,
        colors in 1u8..=6,
        delivery_days in proptest::option::of(0u32..30),
    ) -> Order {
        let handle = if twisted { HandleType::Twisted } else { HandleType::Flat };
        let order = Order::new("ORD", quantity, handle)
            .with_dimensions(width, 420.0)
            .with_colors(colors);
        match delivery_days {
            Some(days) => order.with_delivery_days(days),
            None => order,
        }
    }
}

fn fleet() -> impl Strategy<Value = MachineCatalog> {
    prop::collection::vec(machine_spec(), 1..6).prop_map(|specs| {
        let specs = specs
            .into_iter()
            .enumerate()
            .map(|(i, mut spec)| {
                spec.id = format!("M-{i:02}");
                spec
            })
            .collect();
        MachineCatalog::new(specs).unwrap()
    })
}

fn orders() -> impl Strategy<Value = Vec<Order>> {
    prop::collection::vec(order(), 0..30).prop_map(|orders| {
        orders
            .into_iter()
            .enumerate()
            .map(|(i, mut order)| {
                order.id = format!("ORD-{i:03}");
                order
            })
            .collect()
    })
}

fn scheduler() -> GreedyScheduler {
    GreedyScheduler::new(SchedulerConfig::default()).unwrap()
}

proptest! {
    #[test]
    fn prop_capacity_never_exceeded(catalog in fleet(), orders in orders()) {
        let result = scheduler().schedule(&catalog, &orders, run_start());

        let mut per_machine: HashMap<&str, u64> = HashMap::new();
        for entry in &result.entries {
            *per_machine.entry(entry.machine_id.as_str()).or_default() += entry.quantity;
        }

        for state in &result.machine_states {
            let units = per_machine.get(state.id()).copied().unwrap_or(0);
            prop_assert_eq!(state.scheduled_units, units);
            prop_assert!(state.scheduled_units <= state.spec.daily_capacity);
            prop_assert_eq!(
                state.remaining_capacity,
                state.spec.daily_capacity - state.scheduled_units
            );
        }
    }

    #[test]
    fn prop_entries_are_back_to_back(catalog in fleet(), orders in orders()) {
        let result = scheduler().schedule(&catalog, &orders, run_start());

        let mut cursor: HashMap<&str, NaiveDateTime> = HashMap::new();
        for entry in &result.entries {
            let expected = cursor.get(entry.machine_id.as_str()).copied().unwrap_or(run_start());
            prop_assert_eq!(entry.start, expected);
            prop_assert!(entry.end >= entry.start);
            cursor.insert(entry.machine_id.as_str(), entry.end);
        }

        for state in &result.machine_states {
            let last = cursor.get(state.id()).copied().unwrap_or(run_start());
            prop_assert_eq!(state.next_available, last);
        }
    }

    #[test]
    fn prop_every_order_accounted_once(catalog in fleet(), orders in orders()) {
        let result = scheduler().schedule(&catalog, &orders, run_start());

        prop_assert_eq!(result.entries.len() + result.unscheduled.len(), orders.len());
        for order in &orders {
            let scheduled = result.entries.iter().filter(|e| e.order_id == order.id).count();
            let unscheduled = result.unscheduled.iter().filter(|u| u.order_id == order.id).count();
            prop_assert_eq!(scheduled + unscheduled, 1);
        }
    }

    #[test]
    fn prop_assignments_follow_priority(catalog in fleet(), orders in orders()) {
        let result = scheduler().schedule(&catalog, &orders, run_start());

        prop_assert!(result.entries.windows(2).all(|w| w[0].priority >= w[1].priority));
    }

    #[test]
    fn prop_deterministic(catalog in fleet(), orders in orders()) {
        let first = scheduler().schedule(&catalog, &orders, run_start());
        let second = scheduler().schedule(&catalog, &orders, run_start());

        prop_assert_eq!(&first.entries, &second.entries);
        prop_assert_eq!(first.load_balance_score, second.load_balance_score);
    }

    #[test]
    fn prop_load_balance_in_bounds(catalog in fleet(), orders in orders()) {
        let result = scheduler().schedule(&catalog, &orders, run_start());

        prop_assert!((0.0..=100.0).contains(&result.load_balance_score));
    }

    #[test]
    fn prop_sooner_delivery_never_ranks_lower(
        days in 0u32..40,
        quantity in 100u64..50_000,
        sequence in 0usize..200,
    ) {
        let weights = PriorityWeights::default();
        let sooner = Order::new("A", quantity, HandleType::Flat).with_delivery_days(days);
        let later = Order::new("A", quantity, HandleType::Flat).with_delivery_days(days + 1);

        prop_assert!(
            OrderPrioritizer::score(&sooner, sequence, &weights)
                >= OrderPrioritizer::score(&later, sequence, &weights)
        );
    }
}
