//! Pairwise intersection of participant slot sets.
//!
//! For every unordered pair the common slots are split into maximal contiguous
//! runs, and each run long enough to host a meeting yields candidate windows.
//! Runs also break at grid-day boundaries: Monday's last slot and Tuesday's
//! first slot have adjacent indices but are not adjacent in time.

use std::collections::BTreeSet;
use std::ops::Range;

use tracing::debug;

use crate::config::WindowPlacement;
use crate::grid::TimeGrid;
use crate::normalize::Participant;

/// A meeting-sized slot range both members of a pair are available for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateWindow {
    /// Lexicographically smaller identity of the pair.
    pub a: String,
    /// Lexicographically larger identity of the pair.
    pub b: String,
    pub slots: Range<usize>,
}

/// Slots common to both participants.
pub fn intersect(a: &Participant, b: &Participant) -> BTreeSet<usize> {
    a.slots.intersection(&b.slots).copied().collect()
}

/// Split `slots` into maximal runs of consecutive indices on the same grid day.
pub fn contiguous_runs(grid: &TimeGrid, slots: &BTreeSet<usize>) -> Vec<Range<usize>> {
    let mut runs: Vec<Range<usize>> = Vec::new();

    for &slot in slots {
        if let Some(last) = runs.last_mut() {
            if slot == last.end && grid.day_position_of(slot) == grid.day_position_of(last.start) {
                last.end = slot + 1;
                continue;
            }
        }
        runs.push(slot..slot + 1);
    }

    runs
}

/// Meeting-sized windows a single run can host under `placement`.
fn windows_in(run: &Range<usize>, meeting_slots: usize, placement: WindowPlacement) -> Vec<Range<usize>> {
    if run.len() < meeting_slots {
        return Vec::new();
    }
    match placement {
        WindowPlacement::FirstFit => vec![run.start..run.start + meeting_slots],
        WindowPlacement::Tiled => (0..run.len() / meeting_slots)
            .map(|i| {
                let start = run.start + i * meeting_slots;
                start..start + meeting_slots
            })
            .collect(),
    }
}

/// Candidate windows for one pair, in start order.
pub fn pair_candidates(
    grid: &TimeGrid,
    a: &Participant,
    b: &Participant,
    meeting_slots: usize,
    placement: WindowPlacement,
) -> Vec<CandidateWindow> {
    let (first, second) = if a.identity <= b.identity { (a, b) } else { (b, a) };
    let common = intersect(first, second);

    contiguous_runs(grid, &common)
        .iter()
        .flat_map(|run| windows_in(run, meeting_slots, placement))
        .map(|slots| CandidateWindow {
            a: first.identity.clone(),
            b: second.identity.clone(),
            slots,
        })
        .collect()
}

/// Candidate windows for all n·(n−1)/2 unordered pairs of `participants`.
///
/// Self-pairs are never produced. Output is ordered by pair (in participant
/// order) and then by start slot.
pub fn candidate_windows(
    grid: &TimeGrid,
    participants: &[Participant],
    meeting_slots: usize,
    placement: WindowPlacement,
) -> Vec<CandidateWindow> {
    let mut candidates = Vec::new();

    for (i, a) in participants.iter().enumerate() {
        for b in &participants[i + 1..] {
            let found = pair_candidates(grid, a, b, meeting_slots, placement);
            if !found.is_empty() {
                debug!(
                    a = %a.identity,
                    b = %b.identity,
                    candidates = found.len(),
                    "pair overlaps"
                );
            }
            candidates.extend(found);
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MeshConfig;

    fn grid() -> TimeGrid {
        TimeGrid::new(&MeshConfig::default()).unwrap()
    }

    fn participant(identity: &str, slots: impl IntoIterator<Item = usize>) -> Participant {
        Participant {
            identity: identity.to_string(),
            name: identity.to_string(),
            slots: slots.into_iter().collect(),
        }
    }

    #[test]
    fn runs_split_on_gaps() {
        let slots: BTreeSet<usize> = [0, 1, 2, 5, 6, 9].into_iter().collect();
        assert_eq!(contiguous_runs(&grid(), &slots), vec![0..3, 5..7, 9..10]);
    }

    #[test]
    fn runs_split_at_day_boundary() {
        // 30, 31 are Monday 16:30/16:45; 32, 33 are Tuesday 09:00/09:15.
        let slots: BTreeSet<usize> = (30..34).collect();
        assert_eq!(contiguous_runs(&grid(), &slots), vec![30..32, 32..34]);
    }

    #[test]
    fn first_fit_emits_one_window_per_run() {
        let a = participant("a@x", 0..8);
        let b = participant("b@x", 4..12);
        let found = pair_candidates(&grid(), &a, &b, 2, WindowPlacement::FirstFit);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].slots, 4..6);
    }

    #[test]
    fn tiled_emits_back_to_back_windows() {
        let a = participant("a@x", 0..8);
        let b = participant("b@x", 3..12);
        let found = pair_candidates(&grid(), &a, &b, 2, WindowPlacement::Tiled);
        let starts: Vec<usize> = found.iter().map(|c| c.slots.start).collect();
        assert_eq!(starts, vec![3, 5]);
    }

    #[test]
    fn short_run_yields_nothing() {
        let a = participant("a@x", [0, 1, 2]);
        let b = participant("b@x", [2, 3]);
        assert!(pair_candidates(&grid(), &a, &b, 2, WindowPlacement::FirstFit).is_empty());
    }

    #[test]
    fn pair_is_ordered_by_identity() {
        let a = participant("zed@x", 0..4);
        let b = participant("amy@x", 0..4);
        let found = pair_candidates(&grid(), &a, &b, 1, WindowPlacement::FirstFit);
        assert_eq!(found[0].a, "amy@x");
        assert_eq!(found[0].b, "zed@x");
    }

    #[test]
    fn all_pairs_enumerated_without_self_pairs() {
        let people: Vec<Participant> = ["a@x", "b@x", "c@x", "d@x"]
            .iter()
            .map(|id| participant(id, 0..4))
            .collect();
        let found = candidate_windows(&grid(), &people, 1, WindowPlacement::FirstFit);
        assert_eq!(found.len(), 6);
        assert!(found.iter().all(|c| c.a != c.b));
    }
}
