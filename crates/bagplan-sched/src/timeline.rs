//! 時間軸展開
//!
//! 將排程項目展開為各機台的換線/生產/閒置區段，不修改任何來源資料。

use bagplan_core::{MachineSpec, ScheduleEntry, TimelineEvent, WorkingDay};
use chrono::NaiveDate;

/// 時間軸建構器
pub struct TimelineBuilder;

impl TimelineBuilder {
    /// 建立全體機台的時間軸（依開始時間排序）
    pub fn build(
        machines: &[MachineSpec],
        entries: &[ScheduleEntry],
        day: NaiveDate,
        window: &WorkingDay,
    ) -> Vec<TimelineEvent> {
        let mut events: Vec<TimelineEvent> = machines
            .iter()
            .flat_map(|machine| Self::build_for_machine(&machine.id, entries, day, window))
            .collect();

        // 穩定排序：同一時間點維持機台目錄順序
        events.sort_by_key(|e| e.start);
        events
    }

    /// 建立單一機台的時間軸
    pub fn build_for_machine(
        machine_id: &str,
        entries: &[ScheduleEntry],
        day: NaiveDate,
        window: &WorkingDay,
    ) -> Vec<TimelineEvent> {
        let mut machine_entries: Vec<&ScheduleEntry> = entries
            .iter()
            .filter(|e| e.machine_id == machine_id)
            .collect();
        machine_entries.sort_by_key(|e| e.start);

        let mut events = Vec::with_capacity(machine_entries.len() * 3 + 1);
        let mut cursor = window.start_on(day);

        for entry in machine_entries {
            if entry.start > cursor {
                events.push(TimelineEvent::idle(machine_id, cursor, entry.start));
            }

            if entry.setup_end() > entry.start {
                events.push(TimelineEvent::setup(entry));
            }
            if entry.end > entry.setup_end() {
                events.push(TimelineEvent::production(entry));
            }

            cursor = cursor.max(entry.end);
        }

        let day_end = window.end_on(day);
        if cursor < day_end {
            events.push(TimelineEvent::idle(machine_id, cursor, day_end));
        }

        events
    }
}
