//! Invite records → `.ics` files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use icalendar::{Calendar, Component, EventLike, Property};
use mesh_engine::{Attendee, InviteRecord};

/// Render one invite as a single-event calendar.
///
/// `DTSTAMP` is pinned to the meeting start so regenerating the same week
/// produces byte-identical files.
pub fn render_invite(record: &InviteRecord) -> String {
    let mut event = icalendar::Event::new();
    event.uid(&record.uid);
    event.summary(&record.summary);
    event.starts(record.start);
    event.ends(record.end);
    // DTSTAMP must be UTC. The floating start is reused as-is, so the stamp
    // carries the local wall-clock digits, not a real creation instant.
    event.timestamp(record.start.and_utc());
    event.append_property(person_property("ORGANIZER", &record.organizer));
    for attendee in &record.attendees {
        event.append_multi_property(person_property("ATTENDEE", attendee));
    }

    let mut cal = Calendar::new();
    cal.push(event.done());
    cal.done().to_string()
}

fn person_property(key: &str, person: &Attendee) -> Property {
    Property::new(key, &format!("mailto:{}", person.identity))
        .add_parameter("CN", &person.name)
        .done()
}

/// File name for an invite: `2026-10-12T0900__ann-lee_bob-ray_65906ec1.ics`.
///
/// Display names need not be unique, so the uid prefix keeps names distinct.
pub fn file_name(record: &InviteRecord) -> String {
    format!(
        "{}__{}_{}_{}.ics",
        record.start.format("%Y-%m-%dT%H%M"),
        slugify(&record.attendees[0].name),
        slugify(&record.attendees[1].name),
        short_id(&record.uid)
    )
}

fn short_id(uid: &str) -> String {
    uid.chars().take(8).collect()
}

/// Convert a display name to a filename-safe slug.
fn slugify(s: &str) -> String {
    s.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Write one file per invite into `dir`, creating it if needed.
///
/// Everything is rendered before the first write. Two records that map to the
/// same file name fail the whole batch instead of overwriting each other.
pub fn write_invites(dir: &Path, records: &[InviteRecord]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut rendered: Vec<(PathBuf, String)> = Vec::with_capacity(records.len());
    for record in records {
        let name = file_name(record);
        if !seen.insert(name.clone()) {
            bail!("Two invites map to the same file name: {}", name);
        }
        rendered.push((dir.join(name), render_invite(record)));
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let mut written = Vec::with_capacity(rendered.len());
    for (path, content) in rendered {
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn attendee(identity: &str, name: &str) -> Attendee {
        Attendee {
            identity: identity.to_string(),
            name: name.to_string(),
        }
    }

    fn record() -> InviteRecord {
        record_with_uid("abc12345ff@mesh-meeting")
    }

    fn record_with_uid(uid: &str) -> InviteRecord {
        let date = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        let ann = attendee("ann@example.com", "Ann Lee");
        let bob = attendee("bob@example.com", "Bob O'Ray");
        InviteRecord {
            uid: uid.to_string(),
            summary: "Mesh Meeting™ Ann Lee/Bob O'Ray".to_string(),
            organizer: ann.clone(),
            attendees: [ann, bob],
            start: date.and_hms_opt(9, 0, 0).unwrap(),
            end: date.and_hms_opt(9, 15, 0).unwrap(),
        }
    }

    #[test]
    fn renders_required_fields() {
        let ics = render_invite(&record());
        assert!(ics.contains("BEGIN:VEVENT"));
        assert!(ics.contains("UID:abc12345ff@mesh-meeting"));
        assert!(ics.contains("DTSTART:20261012T090000"));
        assert!(ics.contains("DTEND:20261012T091500"));
        assert!(ics.contains("mailto:ann@example.com"));
        assert!(ics.contains("mailto:bob@example.com"));
        assert!(ics.contains("ORGANIZER"));
    }

    #[test]
    fn rendering_is_deterministic() {
        assert_eq!(render_invite(&record()), render_invite(&record()));
    }

    #[test]
    fn file_name_uses_start_slugs_and_uid_prefix() {
        assert_eq!(
            file_name(&record()),
            "2026-10-12T0900__ann-lee_bob-o-ray_abc12345.ics"
        );
    }

    #[test]
    fn same_names_and_start_get_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let records = [
            record_with_uid("11111111aa@mesh-meeting"),
            record_with_uid("22222222bb@mesh-meeting"),
        ];
        let written = write_invites(dir.path(), &records).unwrap();
        assert_eq!(written.len(), 2);
        assert_ne!(written[0], written[1]);
    }

    #[test]
    fn colliding_file_names_fail_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let err = write_invites(&out, &[record(), record()]).unwrap_err();
        assert!(err.to_string().contains("same file name"));
        assert!(!out.exists());
    }

    #[test]
    fn writes_one_file_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let written = write_invites(&out, &[record()]).unwrap();
        assert_eq!(written.len(), 1);
        let content = std::fs::read_to_string(&written[0]).unwrap();
        assert!(content.contains("UID:abc12345ff@mesh-meeting"));
    }
}
