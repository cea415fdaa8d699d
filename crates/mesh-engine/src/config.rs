//! Immutable run configuration: grid boundary, granularity, meeting length and
//! selection policy.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};

/// How the selector turns candidate windows into meetings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Every pair with any overlap gets exactly one meeting at its earliest
    /// window. A participant may be booked into simultaneous meetings.
    #[default]
    Exhaustive,
    /// Greedy earliest-first selection that never books a participant into two
    /// overlapping meetings. Every tiled window of a shared run is considered,
    /// whatever `placement` says.
    ConflictFree,
}

/// How many candidate windows a contiguous run of shared slots produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowPlacement {
    /// One candidate per run, at the run's first slot.
    #[default]
    FirstFit,
    /// Every back-to-back meeting-sized sub-window the run can host.
    Tiled,
}

/// Configuration for a single scheduling run.
///
/// Defaults describe the standard Mesh Meeting week: Monday 09:00 through
/// Friday 12:00, working hours 09:00-17:00, 15-minute slots, one-slot meetings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    pub first_day: Weekday,
    pub last_day: Weekday,
    /// Daily opening time.
    pub day_start: NaiveTime,
    /// Daily closing time.
    pub day_end: NaiveTime,
    /// Closing time of `last_day`.
    pub last_day_end: NaiveTime,
    pub slot_minutes: u32,
    /// Meeting length, in slots.
    pub meeting_slots: u32,
    pub policy: SelectionPolicy,
    pub placement: WindowPlacement,
    pub max_meetings_per_person: Option<usize>,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            first_day: Weekday::Mon,
            last_day: Weekday::Fri,
            day_start: hm(9, 0),
            day_end: hm(17, 0),
            last_day_end: hm(12, 0),
            slot_minutes: 15,
            meeting_slots: 1,
            policy: SelectionPolicy::default(),
            placement: WindowPlacement::default(),
            max_meetings_per_person: None,
        }
    }
}

impl MeshConfig {
    /// Check every invariant the grid and selector rely on.
    ///
    /// # Errors
    /// Returns `MeshError::InvalidConfiguration` describing the first violated
    /// constraint.
    pub fn validate(&self) -> Result<()> {
        if self.slot_minutes == 0 {
            return Err(invalid("slot_minutes must be greater than 0"));
        }
        if self.meeting_slots == 0 {
            return Err(invalid("meeting_slots must be greater than 0"));
        }
        if self.max_meetings_per_person == Some(0) {
            return Err(invalid("max_meetings_per_person must be greater than 0"));
        }
        if self.last_day.num_days_from_monday() < self.first_day.num_days_from_monday() {
            return Err(invalid(format!(
                "last_day {} precedes first_day {}",
                self.last_day, self.first_day
            )));
        }
        if self.day_end <= self.day_start {
            return Err(invalid(format!(
                "day_end {} must be after day_start {}",
                self.day_end, self.day_start
            )));
        }
        if self.last_day_end <= self.day_start || self.last_day_end > self.day_end {
            return Err(invalid(format!(
                "last_day_end {} must fall in ({}, {}]",
                self.last_day_end, self.day_start, self.day_end
            )));
        }

        let slot_secs = i64::from(self.slot_minutes) * 60;
        for (label, end) in [("day_end", self.day_end), ("last_day_end", self.last_day_end)] {
            let span = (end - self.day_start).num_seconds();
            if span % slot_secs != 0 {
                return Err(invalid(format!(
                    "{} - day_start is not a whole number of {}-minute slots",
                    label, self.slot_minutes
                )));
            }
        }

        Ok(())
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

fn invalid(message: impl Into<String>) -> MeshError {
    MeshError::InvalidConfiguration(message.into())
}
