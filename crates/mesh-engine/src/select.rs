//! Candidate windows → the final, deterministically ordered meeting list.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{MeshConfig, SelectionPolicy};
use crate::error::{MeshError, Result};
use crate::grid::TimeGrid;
use crate::intersect::CandidateWindow;
use crate::normalize::Participant;

/// Identity and display name of a meeting attendee.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Attendee {
    pub identity: String,
    pub name: String,
}

/// A finalized pair meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMeeting {
    /// Attendee with the smaller identity.
    pub a: Attendee,
    pub b: Attendee,
    /// Half-open grid slot range.
    pub slots: Range<usize>,
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ScheduledMeeting {
    fn from_window(grid: &TimeGrid, a: &Participant, b: &Participant, slots: Range<usize>) -> Result<Self> {
        if slots.is_empty() {
            return Err(MeshError::OutOfRange(format!("empty slot range {:?}", slots)));
        }
        let first = grid.time_range_of(slots.start)?;
        let last = grid.time_range_of(slots.end - 1)?;
        Ok(Self {
            a: Attendee {
                identity: a.identity.clone(),
                name: a.name.clone(),
            },
            b: Attendee {
                identity: b.identity.clone(),
                name: b.name.clone(),
            },
            slots,
            day: first.day,
            start: first.start,
            end: last.end,
        })
    }
}

/// Tracks what has been booked so far during selection.
#[derive(Default)]
struct Bookings<'a> {
    pairs: BTreeSet<(&'a str, &'a str)>,
    per_person: BTreeMap<&'a str, Vec<Range<usize>>>,
}

impl<'a> Bookings<'a> {
    fn count(&self, identity: &str) -> usize {
        self.per_person.get(identity).map_or(0, Vec::len)
    }

    fn overlaps(&self, identity: &str, slots: &Range<usize>) -> bool {
        self.per_person.get(identity).is_some_and(|booked| {
            booked
                .iter()
                .any(|b| b.start < slots.end && slots.start < b.end)
        })
    }

    fn book(&mut self, a: &'a str, b: &'a str, slots: &Range<usize>) {
        self.pairs.insert((a, b));
        self.per_person.entry(a).or_default().push(slots.clone());
        self.per_person.entry(b).or_default().push(slots.clone());
    }
}

/// Select the final meetings from `candidates` under `config.policy`.
///
/// Candidates are visited in (start slot, a, b) order, so each pair gets its
/// earliest eligible window and the output is sorted by the same key. Under
/// [`SelectionPolicy::Exhaustive`] every pair with a candidate gets one
/// meeting; [`SelectionPolicy::ConflictFree`] additionally skips candidates
/// that would double-book either participant. `max_meetings_per_person`, when
/// set, caps both policies.
///
/// # Errors
/// Returns `MeshError::UnknownParticipant` if a candidate names an identity
/// that is not in `participants`.
pub fn select_meetings(
    grid: &TimeGrid,
    participants: &[Participant],
    candidates: &[CandidateWindow],
    config: &MeshConfig,
) -> Result<Vec<ScheduledMeeting>> {
    let by_identity: BTreeMap<&str, &Participant> = participants
        .iter()
        .map(|p| (p.identity.as_str(), p))
        .collect();
    let lookup = |identity: &str| {
        by_identity
            .get(identity)
            .copied()
            .ok_or_else(|| MeshError::UnknownParticipant(identity.to_string()))
    };

    // Pairs are unordered: key every candidate by (smaller, larger) identity.
    let mut ordered: Vec<(usize, &str, &str, &CandidateWindow)> = candidates
        .iter()
        .map(|c| {
            let (a, b) = if c.a <= c.b { (&c.a, &c.b) } else { (&c.b, &c.a) };
            (c.slots.start, a.as_str(), b.as_str(), c)
        })
        .collect();
    ordered.sort_by(|x, y| (x.0, x.1, x.2).cmp(&(y.0, y.1, y.2)));

    let mut bookings = Bookings::default();
    let mut meetings = Vec::new();

    for (_, a, b, candidate) in ordered {
        let a = lookup(a)?;
        let b = lookup(b)?;
        let (a_id, b_id) = (a.identity.as_str(), b.identity.as_str());

        if bookings.pairs.contains(&(a_id, b_id)) {
            continue;
        }
        if let Some(cap) = config.max_meetings_per_person {
            if bookings.count(a_id) >= cap || bookings.count(b_id) >= cap {
                continue;
            }
        }
        if config.policy == SelectionPolicy::ConflictFree
            && (bookings.overlaps(a_id, &candidate.slots) || bookings.overlaps(b_id, &candidate.slots))
        {
            continue;
        }

        bookings.book(a_id, b_id, &candidate.slots);
        meetings.push(ScheduledMeeting::from_window(grid, a, b, candidate.slots.clone())?);
    }

    debug!(
        candidates = candidates.len(),
        meetings = meetings.len(),
        policy = ?config.policy,
        "selected meetings"
    );

    Ok(meetings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> TimeGrid {
        TimeGrid::new(&MeshConfig::default()).unwrap()
    }

    fn participant(identity: &str) -> Participant {
        Participant {
            identity: identity.to_string(),
            name: identity.to_uppercase(),
            slots: BTreeSet::new(),
        }
    }

    fn window(a: &str, b: &str, slots: Range<usize>) -> CandidateWindow {
        CandidateWindow {
            a: a.to_string(),
            b: b.to_string(),
            slots,
        }
    }

    #[test]
    fn exhaustive_takes_earliest_window_per_pair() {
        let people = vec![participant("a"), participant("b")];
        let candidates = vec![window("a", "b", 8..9), window("a", "b", 2..3)];
        let meetings = select_meetings(&grid(), &people, &candidates, &MeshConfig::default()).unwrap();
        assert_eq!(meetings.len(), 1);
        assert_eq!(meetings[0].slots, 2..3);
        assert_eq!(meetings[0].a.name, "A");
    }

    #[test]
    fn exhaustive_allows_double_booking() {
        let people = vec![participant("a"), participant("b"), participant("c")];
        let candidates = vec![window("a", "b", 0..1), window("a", "c", 0..1)];
        let meetings = select_meetings(&grid(), &people, &candidates, &MeshConfig::default()).unwrap();
        assert_eq!(meetings.len(), 2);
    }

    #[test]
    fn conflict_free_skips_overlap_and_uses_later_window() {
        let people = vec![participant("a"), participant("b"), participant("c")];
        let candidates = vec![
            window("a", "b", 0..1),
            window("a", "c", 0..1),
            window("a", "c", 4..5),
        ];
        let config = MeshConfig {
            policy: SelectionPolicy::ConflictFree,
            ..MeshConfig::default()
        };
        let meetings = select_meetings(&grid(), &people, &candidates, &config).unwrap();
        assert_eq!(meetings.len(), 2);
        assert_eq!(meetings[1].b.identity, "c");
        assert_eq!(meetings[1].slots, 4..5);
    }

    #[test]
    fn cap_limits_meetings_per_person() {
        let people = vec![participant("a"), participant("b"), participant("c")];
        let candidates = vec![window("a", "b", 0..1), window("a", "c", 1..2), window("b", "c", 2..3)];
        let config = MeshConfig {
            max_meetings_per_person: Some(1),
            ..MeshConfig::default()
        };
        let meetings = select_meetings(&grid(), &people, &candidates, &config).unwrap();
        assert_eq!(meetings.len(), 1);
        assert_eq!(meetings[0].b.identity, "b");
    }

    #[test]
    fn output_sorted_by_start_then_identities() {
        let people = vec![participant("a"), participant("b"), participant("c")];
        let candidates = vec![window("b", "c", 0..1), window("a", "c", 0..1), window("a", "b", 3..4)];
        let meetings = select_meetings(&grid(), &people, &candidates, &MeshConfig::default()).unwrap();
        let keys: Vec<(usize, &str, &str)> = meetings
            .iter()
            .map(|m| (m.slots.start, m.a.identity.as_str(), m.b.identity.as_str()))
            .collect();
        assert_eq!(keys, vec![(0, "a", "c"), (0, "b", "c"), (3, "a", "b")]);
    }

    #[test]
    fn reversed_candidates_book_the_pair_once() {
        let people = vec![participant("a"), participant("b")];
        let candidates = vec![window("b", "a", 0..1), window("a", "b", 3..4)];
        let meetings = select_meetings(&grid(), &people, &candidates, &MeshConfig::default()).unwrap();
        assert_eq!(meetings.len(), 1);
        assert_eq!(meetings[0].slots, 0..1);
        assert_eq!(meetings[0].a.identity, "a");
        assert_eq!(meetings[0].b.identity, "b");
    }

    #[test]
    fn unknown_identity_is_reported() {
        let people = vec![participant("a")];
        let candidates = vec![window("a", "ghost", 0..1)];
        let err = select_meetings(&grid(), &people, &candidates, &MeshConfig::default()).unwrap_err();
        assert_eq!(err, MeshError::UnknownParticipant("ghost".to_string()));
    }

    #[test]
    fn meeting_times_follow_the_grid() {
        let people = vec![participant("a"), participant("b")];
        // Slot 36 is Tuesday 10:00.
        let candidates = vec![window("a", "b", 36..38)];
        let meetings = select_meetings(&grid(), &people, &candidates, &MeshConfig::default()).unwrap();
        assert_eq!(meetings[0].day, Weekday::Tue);
        assert_eq!(meetings[0].start, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(meetings[0].end, NaiveTime::from_hms_opt(10, 30, 0).unwrap());
    }
}
