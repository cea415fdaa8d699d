//! # mesh-engine
//!
//! Deterministic availability intersection and pair scheduling for Mesh
//! Meetings: short pairwise meetings matched from declared weekly availability.
//!
//! The engine is pure. It reads no files and writes none; callers hand it
//! parsed declarations and receive [`InviteRecord`]s to serialize however they
//! like. Identical input always produces the same meetings, in the same order,
//! with the same identifiers.
//!
//! ## Modules
//!
//! - [`config`] — Immutable run configuration and selection policies
//! - [`grid`] — Weekday/time ↔ slot index mapping over the business week
//! - [`normalize`] — Availability strings → per-participant slot sets
//! - [`intersect`] — Pairwise common slots → candidate windows
//! - [`select`] — Candidate windows → final ordered meetings
//! - [`invite`] — Meetings → invite records with stable uids
//! - [`week`] — Anchoring the grid week to calendar dates
//! - [`error`] — Error types
//!
//! ## Quick start
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use mesh_engine::{plan_meetings, Declaration, MeshConfig};
//!
//! let mut declarations = BTreeMap::new();
//! for id in ["a@example.com", "b@example.com"] {
//!     declarations.insert(
//!         id.to_string(),
//!         Declaration {
//!             name: id.to_string(),
//!             availability: vec!["Monday 9:00am-10:00am".to_string()],
//!         },
//!     );
//! }
//!
//! let meetings = plan_meetings(&MeshConfig::default(), &declarations).unwrap();
//! assert_eq!(meetings.len(), 1);
//! assert_eq!(meetings[0].start.to_string(), "09:00:00");
//! assert_eq!(meetings[0].end.to_string(), "09:15:00");
//! ```

use std::collections::BTreeMap;

use tracing::debug;

pub mod config;
pub mod error;
pub mod grid;
pub mod intersect;
pub mod invite;
pub mod normalize;
pub mod select;
pub mod week;

pub use config::{MeshConfig, SelectionPolicy, WindowPlacement};
pub use error::MeshError;
pub use grid::{SlotTime, TimeGrid};
pub use intersect::{candidate_windows, CandidateWindow};
pub use invite::{build_invite, build_invites, InviteRecord};
pub use normalize::{normalize, AvailabilityRange, Declaration, Participant};
pub use select::{select_meetings, Attendee, ScheduledMeeting};

/// Run the whole engine: build the grid, normalize declarations, intersect
/// every pair, and select meetings.
///
/// Under [`SelectionPolicy::ConflictFree`] candidates are always tiled, so a
/// pair blocked at the start of a shared run can still meet later in it.
///
/// # Errors
/// Returns `MeshError::InvalidConfiguration` for a bad `config`, and the first
/// normalization failure (wrapped in `MeshError::Declaration`) for bad input.
pub fn plan_meetings(
    config: &MeshConfig,
    declarations: &BTreeMap<String, Declaration>,
) -> error::Result<Vec<ScheduledMeeting>> {
    let grid = TimeGrid::new(config)?;
    let participants = normalize(&grid, declarations)?;
    let placement = match config.policy {
        SelectionPolicy::ConflictFree => WindowPlacement::Tiled,
        SelectionPolicy::Exhaustive => config.placement,
    };
    let candidates = candidate_windows(
        &grid,
        &participants,
        config.meeting_slots as usize,
        placement,
    );
    debug!(
        participants = participants.len(),
        slots = grid.slot_count(),
        candidates = candidates.len(),
        "intersected availability"
    );
    select_meetings(&grid, &participants, &candidates, config)
}
