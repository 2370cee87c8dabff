//! 排程結果模型

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 排程項目（指派完成後不可變）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// 訂單ID
    pub order_id: String,

    /// 機台ID
    pub machine_id: String,

    /// 數量（個）
    pub quantity: u64,

    /// 開始時間
    pub start: NaiveDateTime,

    /// 結束時間
    pub end: NaiveDateTime,

    /// 換線時數
    pub setup_hours: f64,

    /// 生產時數（已按效率調整）
    pub production_hours: f64,

    /// 總時數
    pub total_hours: f64,

    /// 排序時使用的優先級分數
    pub priority: f64,
}

impl ScheduleEntry {
    /// 換線結束時間（不超過項目結束時間）
    pub fn setup_end(&self) -> NaiveDateTime {
        hours_to_duration(self.setup_hours)
            .and_then(|setup| self.start.checked_add_signed(setup))
            .map_or(self.end, |end| end.min(self.end))
    }
}

/// 時間軸事件類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelineEventKind {
    /// 換線
    Setup,
    /// 生產
    Production,
    /// 閒置
    Idle,
}

impl TimelineEventKind {
    /// 顯示優先級
    pub fn display_priority(&self) -> DisplayPriority {
        match self {
            TimelineEventKind::Idle => DisplayPriority::Low,
            TimelineEventKind::Setup => DisplayPriority::Medium,
            TimelineEventKind::Production => DisplayPriority::High,
        }
    }
}

/// 顯示優先級（僅供呈現排序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DisplayPriority {
    Low,
    Medium,
    High,
}

/// 時間軸事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// 機台ID
    pub machine_id: String,

    /// 事件類型
    pub kind: TimelineEventKind,

    /// 開始時間
    pub start: NaiveDateTime,

    /// 結束時間
    pub end: NaiveDateTime,

    /// 關聯訂單（閒置事件為 None）
    pub order_id: Option<String>,

    /// 生產數量（僅生產事件）
    pub quantity: Option<u64>,

    /// 顯示優先級
    pub display_priority: DisplayPriority,
}

impl TimelineEvent {
    /// 創建閒置事件
    pub fn idle(machine_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self::new(machine_id, TimelineEventKind::Idle, start, end)
    }

    /// 創建換線事件
    pub fn setup(entry: &ScheduleEntry) -> Self {
        let mut event = Self::new(
            &entry.machine_id,
            TimelineEventKind::Setup,
            entry.start,
            entry.setup_end(),
        );
        event.order_id = Some(entry.order_id.clone());
        event
    }

    /// 創建生產事件
    pub fn production(entry: &ScheduleEntry) -> Self {
        let mut event = Self::new(
            &entry.machine_id,
            TimelineEventKind::Production,
            entry.setup_end(),
            entry.end,
        );
        event.order_id = Some(entry.order_id.clone());
        event.quantity = Some(entry.quantity);
        event
    }

    fn new(
        machine_id: &str,
        kind: TimelineEventKind,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            machine_id: machine_id.to_string(),
            kind,
            start,
            end,
            order_id: None,
            quantity: None,
            display_priority: kind.display_priority(),
        }
    }

    /// 持續分鐘數
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// 小時數轉為時間長度（毫秒精度）
///
/// 非有限值或超出 `chrono::Duration` 範圍時回傳 `None`。
pub fn hours_to_duration(hours: f64) -> Option<chrono::Duration> {
    let millis = (hours * 3_600_000.0).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    chrono::Duration::try_milliseconds(millis as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry() -> ScheduleEntry {
        let start = NaiveDate::from_ymd_opt(2025, 11, 3)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        ScheduleEntry {
            order_id: "ORD-001".to_string(),
            machine_id: "M-01".to_string(),
            quantity: 400,
            start,
            end: start + chrono::Duration::minutes(270),
            setup_hours: 0.5,
            production_hours: 4.0,
            total_hours: 4.5,
            priority: 80.0,
        }
    }

    #[test]
    fn test_hours_to_duration() {
        assert_eq!(hours_to_duration(4.5), Some(chrono::Duration::minutes(270)));
        assert_eq!(hours_to_duration(0.0), Some(chrono::Duration::zero()));
    }

    #[test]
    fn test_hours_to_duration_out_of_range() {
        assert_eq!(hours_to_duration(f64::INFINITY), None);
        assert_eq!(hours_to_duration(f64::NAN), None);
        assert_eq!(hours_to_duration(1e300), None);
    }

    #[test]
    fn test_setup_end_clamped_to_entry_end() {
        let mut entry = entry();
        entry.setup_hours = f64::INFINITY;
        assert_eq!(entry.setup_end(), entry.end);

        entry.setup_hours = 10.0;
        assert_eq!(entry.setup_end(), entry.end);
    }

    #[test]
    fn test_setup_and_production_events() {
        let entry = entry();

        let setup = TimelineEvent::setup(&entry);
        let production = TimelineEvent::production(&entry);

        assert_eq!(setup.kind, TimelineEventKind::Setup);
        assert_eq!(setup.duration_minutes(), 30);
        assert_eq!(setup.display_priority, DisplayPriority::Medium);
        assert_eq!(setup.quantity, None);

        assert_eq!(production.start, setup.end);
        assert_eq!(production.end, entry.end);
        assert_eq!(production.quantity, Some(400));
        assert_eq!(production.display_priority, DisplayPriority::High);
    }

    #[test]
    fn test_display_priority_order() {
        assert!(DisplayPriority::High > DisplayPriority::Medium);
        assert!(DisplayPriority::Medium > DisplayPriority::Low);
        assert_eq!(
            TimelineEventKind::Idle.display_priority(),
            DisplayPriority::Low
        );
    }
}
