//! Five-field cron schedules.
//!
//! Users write one schedule string; the remote stores each field in its own
//! `run_*` column.

use std::str::FromStr;

use crate::errors::{PanelError, PanelResult};

/// A parsed `"minute hour day-of-month month day-of-week"` schedule.
///
/// Field contents are not interpreted; the remote validates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronSchedule {
    pub minute: String,
    pub hour: String,
    pub day_of_month: String,
    pub month: String,
    pub day_of_week: String,
}

impl CronSchedule {
    /// Splits `schedule` on whitespace. Exactly five fields are accepted.
    pub fn parse(schedule: &str) -> PanelResult<Self> {
        let fields: Vec<&str> = schedule.split_whitespace().collect();
        match fields.as_slice() {
            [minute, hour, day_of_month, month, day_of_week] => Ok(Self {
                minute: minute.to_string(),
                hour: hour.to_string(),
                day_of_month: day_of_month.to_string(),
                month: month.to_string(),
                day_of_week: day_of_week.to_string(),
            }),
            _ => Err(PanelError::validation(format!(
                "cron schedule {schedule:?} must have 5 fields (minute hour day-of-month month day-of-week), found {}",
                fields.len()
            ))),
        }
    }

    /// Rebuilds a schedule from the stored `run_*` columns.
    pub fn from_fields(
        minute: &str,
        hour: &str,
        day_of_month: &str,
        month: &str,
        day_of_week: &str,
    ) -> Self {
        Self {
            minute: minute.to_string(),
            hour: hour.to_string(),
            day_of_month: day_of_month.to_string(),
            month: month.to_string(),
            day_of_week: day_of_week.to_string(),
        }
    }
}

impl std::fmt::Display for CronSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.minute, self.hour, self.day_of_month, self.month, self.day_of_week
        )
    }
}

impl FromStr for CronSchedule {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
