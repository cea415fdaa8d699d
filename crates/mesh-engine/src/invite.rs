//! Scheduled meetings → invite records for the calendar-file writer.
//!
//! The record carries everything an external writer needs: attendees, an
//! organizer, absolute wall-clock timestamps, and a stable identifier. The
//! identifier is a SHA-256 digest of the sorted attendee identities and the
//! start timestamp, so regenerating the same week yields the same uids.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::select::{Attendee, ScheduledMeeting};
use crate::week::{date_in_week, monday_of};

/// Domain suffix appended to every invite uid.
pub const UID_DOMAIN: &str = "mesh-meeting";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteRecord {
    pub uid: String,
    pub summary: String,
    pub organizer: Attendee,
    pub attendees: [Attendee; 2],
    /// Floating local time, in the organization's single calendar.
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Build the invite for `meeting` in the calendar week containing `week`.
///
/// `week` may be any date in the target week; it is moved back to its Monday.
pub fn build_invite(meeting: &ScheduledMeeting, week: NaiveDate) -> InviteRecord {
    let date = date_in_week(monday_of(week), meeting.day);
    let start = date.and_time(meeting.start);
    let end = date.and_time(meeting.end);

    let mut attendees = [meeting.a.clone(), meeting.b.clone()];
    attendees.sort();

    InviteRecord {
        uid: invite_uid(&attendees[0].identity, &attendees[1].identity, start),
        summary: format!("Mesh Meeting™ {}/{}", attendees[0].name, attendees[1].name),
        organizer: attendees[0].clone(),
        attendees,
        start,
        end,
    }
}

/// Build invites for every meeting, preserving order.
pub fn build_invites(meetings: &[ScheduledMeeting], week: NaiveDate) -> Vec<InviteRecord> {
    meetings.iter().map(|m| build_invite(m, week)).collect()
}

fn invite_uid(a: &str, b: &str, start: NaiveDateTime) -> String {
    let mut hasher = Sha256::new();
    hasher.update(a.as_bytes());
    hasher.update(b"\n");
    hasher.update(b.as_bytes());
    hasher.update(b"\n");
    hasher.update(start.format("%Y%m%dT%H%M%S").to_string().as_bytes());
    format!("{}@{}", hex::encode(hasher.finalize()), UID_DOMAIN)
}
