//! 工作日時段模型

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{BagPlanError, Result};

/// 單日工作時段（時間軸的固定視窗）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingDay {
    /// 開工時刻（小時，0-23）
    pub start_hour: u32,

    /// 收工時刻（小時，1-24）
    pub end_hour: u32,
}

impl WorkingDay {
    /// 創建新的工作時段
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self> {
        let day = Self {
            start_hour,
            end_hour,
        };
        day.validate()?;
        Ok(day)
    }

    /// 檢查時段是否合法
    pub fn validate(&self) -> Result<()> {
        if self.start_hour >= self.end_hour || self.end_hour > 24 {
            return Err(BagPlanError::InvalidTime(format!(
                "工作時段 {:02}:00-{:02}:00 不合法",
                self.start_hour, self.end_hour
            )));
        }
        Ok(())
    }

    /// 指定日期的開工時間
    pub fn start_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN) + chrono::Duration::hours(i64::from(self.start_hour))
    }

    /// 指定日期的收工時間
    ///
    /// `end_hour = 24` 時落在隔日零點。
    pub fn end_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN) + chrono::Duration::hours(i64::from(self.end_hour))
    }

    /// 工作時數
    pub fn hours(&self) -> f64 {
        f64::from(self.end_hour - self.start_hour)
    }
}

impl Default for WorkingDay {
    /// 06:00 - 22:00 兩班制
    fn default() -> Self {
        Self {
            start_hour: 6,
            end_hour: 22,
        }
    }
}
