//! The business week as a fixed sequence of discrete slots.
//!
//! Every grid day contributes the slots between `day_start` and `day_end`; the
//! last day closes at `last_day_end`. Slot indices run contiguously across days,
//! so index `i` always maps to the same weekday and wall-clock time. All other
//! components work on indices and never on raw times.

use std::ops::Range;

use chrono::{Duration, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::config::MeshConfig;
use crate::error::{MeshError, Result};

/// Wall-clock position of a single slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTime {
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeGrid {
    first_day: Weekday,
    day_count: usize,
    day_start: NaiveTime,
    slot_secs: i64,
    /// Slots on every day except the last.
    slots_per_day: usize,
    slots_last_day: usize,
}

impl TimeGrid {
    /// Build the grid described by `config`.
    ///
    /// # Errors
    /// Returns `MeshError::InvalidConfiguration` if the config fails validation.
    pub fn new(config: &MeshConfig) -> Result<Self> {
        config.validate()?;

        let slot_secs = i64::from(config.slot_minutes) * 60;
        let slots_in = |end: NaiveTime| ((end - config.day_start).num_seconds() / slot_secs) as usize;
        let day_count = (config.last_day.num_days_from_monday()
            - config.first_day.num_days_from_monday()) as usize
            + 1;

        Ok(Self {
            first_day: config.first_day,
            day_count,
            day_start: config.day_start,
            slot_secs,
            slots_per_day: slots_in(config.day_end),
            slots_last_day: slots_in(config.last_day_end),
        })
    }

    /// Total number of slots in the week.
    pub fn slot_count(&self) -> usize {
        (self.day_count - 1) * self.slots_per_day + self.slots_last_day
    }

    /// Index of the slot containing `time` on `day`.
    ///
    /// `time` is floored to the enclosing slot boundary.
    ///
    /// # Errors
    /// Returns `MeshError::OutOfRange` if `day` is not a grid day, or `time` is
    /// before the day opens or at/after it closes.
    pub fn slot_index_of(&self, day: Weekday, time: NaiveTime) -> Result<usize> {
        let position = self.day_position(day)?;
        let offset = self.seconds_into_day(day, time)? / self.slot_secs;
        let offset = offset as usize;
        if offset >= self.slots_on(position) {
            return Err(MeshError::OutOfRange(format!(
                "{} {} is at or after the close of the grid day",
                day,
                time.format("%H:%M")
            )));
        }
        Ok(self.day_offset(position) + offset)
    }

    /// Half-open slot range covering `start..end` on `day`.
    ///
    /// `start` is floored and `end` is ceiled to slot boundaries, so a sliver
    /// declared available is never dropped. The range may end exactly at the
    /// day's close.
    ///
    /// # Errors
    /// Returns `MeshError::OutOfRange` if any part of the range lies outside the
    /// grid day.
    pub fn span_of(&self, day: Weekday, start: NaiveTime, end: NaiveTime) -> Result<Range<usize>> {
        let first = self.slot_index_of(day, start)?;

        let position = self.day_position(day)?;
        let end_secs = self.seconds_into_day(day, end)?;
        let end_offset = ((end_secs + self.slot_secs - 1) / self.slot_secs) as usize;
        if end_offset > self.slots_on(position) {
            return Err(MeshError::OutOfRange(format!(
                "{} {} is after the close of the grid day",
                day,
                end.format("%H:%M")
            )));
        }

        Ok(first..self.day_offset(position) + end_offset)
    }

    /// Weekday and wall-clock bounds of slot `index`.
    ///
    /// # Errors
    /// Returns `MeshError::OutOfRange` if `index >= slot_count()`.
    pub fn time_range_of(&self, index: usize) -> Result<SlotTime> {
        if index >= self.slot_count() {
            return Err(MeshError::OutOfRange(format!(
                "slot {} (grid has {} slots)",
                index,
                self.slot_count()
            )));
        }

        let position = index / self.slots_per_day;
        let offset = (index % self.slots_per_day) as i64;
        let start = self.day_start + Duration::seconds(offset * self.slot_secs);

        Ok(SlotTime {
            day: self.nth_day(position),
            start,
            end: start + Duration::seconds(self.slot_secs),
        })
    }

    /// Zero-based position (within the grid week) of the day holding `index`.
    pub fn day_position_of(&self, index: usize) -> usize {
        index / self.slots_per_day
    }

    fn day_position(&self, day: Weekday) -> Result<usize> {
        let first = self.first_day.num_days_from_monday();
        let wanted = day.num_days_from_monday();
        match wanted.checked_sub(first) {
            Some(position) if (position as usize) < self.day_count => Ok(position as usize),
            _ => Err(MeshError::OutOfRange(format!(
                "{} is not a grid day ({} to {})",
                day,
                self.first_day,
                self.nth_day(self.day_count - 1)
            ))),
        }
    }

    fn seconds_into_day(&self, day: Weekday, time: NaiveTime) -> Result<i64> {
        if time < self.day_start {
            return Err(MeshError::OutOfRange(format!(
                "{} {} is before the grid day opens at {}",
                day,
                time.format("%H:%M"),
                self.day_start.format("%H:%M")
            )));
        }
        Ok((time - self.day_start).num_seconds())
    }

    fn slots_on(&self, position: usize) -> usize {
        if position + 1 == self.day_count {
            self.slots_last_day
        } else {
            self.slots_per_day
        }
    }

    fn day_offset(&self, position: usize) -> usize {
        position * self.slots_per_day
    }

    fn nth_day(&self, position: usize) -> Weekday {
        let mut day = self.first_day;
        for _ in 0..position {
            day = day.succ();
        }
        day
    }
}
