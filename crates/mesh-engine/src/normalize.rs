//! Availability declarations → per-participant occupied slot sets.
//!
//! Declarations are strings of the form `"Monday 9:00am-11:00am"`. Each one is
//! parsed strictly, rounded outward onto the grid, and unioned into the
//! participant's slot set. The first bad declaration aborts the whole run.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MeshError, Result};
use crate::grid::TimeGrid;

/// One participant's raw input, as read from the declaration file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    #[serde(default)]
    pub availability: Vec<String>,
}

/// A participant after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Unique email identity (the natural key).
    pub identity: String,
    pub name: String,
    /// Grid slot indices the participant is available for.
    pub slots: BTreeSet<usize>,
}

/// A parsed `<Weekday> <h>:<mm><am|pm>-<h>:<mm><am|pm>` declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityRange {
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl FromStr for AvailabilityRange {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let (day, times) = match (parts.next(), parts.next(), parts.next()) {
            (Some(day), Some(times), None) => (day, times),
            _ => {
                return Err(malformed(format!(
                    "expected '<Weekday> <h:mm><am|pm>-<h:mm><am|pm>', got '{}'",
                    s
                )))
            }
        };

        let day: Weekday = day
            .parse()
            .map_err(|_| malformed(format!("unknown weekday '{}'", day)))?;
        let (start, end) = times
            .split_once('-')
            .ok_or_else(|| malformed(format!("missing '-' between times in '{}'", times)))?;
        let start = parse_clock(start)?;
        let end = parse_clock(end)?;

        if start >= end {
            return Err(malformed(format!(
                "start {} is not before end {}",
                start.format("%H:%M"),
                end.format("%H:%M")
            )));
        }

        Ok(Self { day, start, end })
    }
}

impl fmt::Display for AvailabilityRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.day,
            self.start.format("%-I:%M%P"),
            self.end.format("%-I:%M%P")
        )
    }
}

/// Parse a 12-hour clock time such as `9:00am` or `12:30PM`.
fn parse_clock(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(&s.to_ascii_uppercase(), "%I:%M%p")
        .map_err(|e| malformed(format!("invalid time '{}': {}", s, e)))
}

fn malformed(message: String) -> MeshError {
    MeshError::MalformedRange(message)
}

/// Normalize a single participant's declarations.
///
/// # Errors
/// Returns `MeshError::Declaration` wrapping `MalformedRange` or `OutOfRange`
/// for the first declaration that fails.
pub fn normalize_participant(
    grid: &TimeGrid,
    identity: &str,
    declaration: &Declaration,
) -> Result<Participant> {
    let mut slots = BTreeSet::new();

    for raw in &declaration.availability {
        let span = raw
            .parse::<AvailabilityRange>()
            .and_then(|range| grid.span_of(range.day, range.start, range.end))
            .map_err(|source| MeshError::Declaration {
                participant: identity.to_string(),
                range: raw.clone(),
                source: Box::new(source),
            })?;
        slots.extend(span);
    }

    debug!(
        participant = identity,
        declarations = declaration.availability.len(),
        slots = slots.len(),
        "normalized availability"
    );

    Ok(Participant {
        identity: identity.to_string(),
        name: declaration.name.clone(),
        slots,
    })
}

/// Normalize every participant. Output is sorted by identity.
///
/// # Errors
/// Aborts on the first declaration that fails to parse or falls outside the
/// grid. No partial participant list is returned.
pub fn normalize(
    grid: &TimeGrid,
    declarations: &BTreeMap<String, Declaration>,
) -> Result<Vec<Participant>> {
    declarations
        .iter()
        .map(|(identity, declaration)| normalize_participant(grid, identity, declaration))
        .collect()
}
