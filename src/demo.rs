//! Demo content for `permidrive seed`

use crate::session::Session;
use crate::share::ShareOptions;
use crate::store::{FileId, FileRecord};
use chrono::{DateTime, Duration, TimeZone, Utc};

struct DemoFile {
    id: &'static str,
    name: &'static str,
    size: u64,
    mime_type: &'static str,
    thumbnail: Option<&'static str>,
    created: (i32, u32, u32),
    shared: bool,
    trashed: bool,
}

const DEMO_FILES: &[DemoFile] = &[
    DemoFile {
        id: "1",
        name: "Project Proposal.pdf",
        size: 2_621_440,
        mime_type: "application/pdf",
        thumbnail: Some("https://images.pexels.com/photos/267669/pexels-photo-267669.jpeg?auto=compress&cs=tinysrgb&w=300"),
        created: (2024, 1, 15),
        shared: false,
        trashed: false,
    },
    DemoFile {
        id: "2",
        name: "Team Photo.jpg",
        size: 5_452_595,
        mime_type: "image/jpeg",
        thumbnail: Some("https://images.pexels.com/photos/1181533/pexels-photo-1181533.jpeg?auto=compress&cs=tinysrgb&w=300"),
        created: (2024, 1, 10),
        shared: true,
        trashed: false,
    },
    DemoFile {
        id: "3",
        name: "Budget Spreadsheet.xlsx",
        size: 1_887_437,
        mime_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        thumbnail: None,
        created: (2024, 1, 12),
        shared: false,
        trashed: false,
    },
    DemoFile {
        id: "4",
        name: "Presentation.pptx",
        size: 12_897_485,
        mime_type: "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        thumbnail: None,
        created: (2024, 1, 8),
        shared: false,
        trashed: false,
    },
    DemoFile {
        id: "5",
        name: "Meeting Recording.mp4",
        size: 47_919_923,
        mime_type: "video/mp4",
        thumbnail: Some("https://images.pexels.com/photos/3153201/pexels-photo-3153201.jpeg?auto=compress&cs=tinysrgb&w=300"),
        created: (2024, 1, 5),
        shared: false,
        trashed: false,
    },
    DemoFile {
        id: "6",
        name: "Deleted Document.docx",
        size: 819_200,
        mime_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        thumbnail: None,
        created: (2024, 1, 1),
        shared: false,
        trashed: true,
    },
];

/// Days before `now` that the demo trash entry was deleted
const TRASHED_DAYS_AGO: i64 = 10;

/// What `seed` added
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub added: usize,
    pub skipped: usize,
    pub shared: usize,
}

fn date((year, month, day): (i32, u32, u32)) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single()
}

/// Demo records owned by `user_id`
///
/// The trashed record is stamped as deleted a few days before `now` so it
/// shows up with most of its retention window left.
#[must_use]
pub fn files(user_id: &str, now: DateTime<Utc>) -> Vec<FileRecord> {
    DEMO_FILES
        .iter()
        .filter_map(|demo| {
            let created = date(demo.created)?;
            let mut record = FileRecord::new(FileId::new(demo.id), demo.name, demo.size, demo.mime_type, user_id, created);
            if let Some(url) = demo.thumbnail {
                record = record.with_thumbnail(url);
            }
            if demo.trashed {
                let deleted = (now - Duration::days(TRASHED_DAYS_AGO)).max(created);
                record = record.with_updated_at(deleted);
                record.is_deleted = true;
                record.deleted_at = Some(deleted);
            }
            Some(record)
        })
        .collect()
}

/// Add the demo records to a session, sharing the ones the demo marks public
///
/// Records whose id is already present are left alone.
pub fn seed(session: &mut Session, now: DateTime<Utc>) -> SeedReport {
    let mut report = SeedReport::default();
    for record in files(&session.user.id, now) {
        let id = record.id.clone();
        if session.files.insert(record).is_err() {
            report.skipped += 1;
            continue;
        }
        report.added += 1;

        let shared = DEMO_FILES.iter().any(|d| d.shared && d.id == id.as_str());
        if shared && session.share_file(&id, ShareOptions::default(), now).is_ok() {
            report.shared += 1;
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::ShareRegistry;
    use crate::store::FileStore;
    use crate::testing::{at, user};

    fn empty_session() -> Session {
        Session {
            user: user("u1", "u1@example.com"),
            files: FileStore::new(),
            shares: ShareRegistry::new(),
        }
    }

    #[test]
    fn test_files_are_valid() {
        let records = files("u1", at(2024, 6, 1));
        assert_eq!(records.len(), 6);
        for record in &records {
            assert!(record.validate().is_ok(), "{} is inconsistent", record.name);
            assert_eq!(record.user_id, "u1");
        }
        assert_eq!(records.iter().filter(|r| r.is_deleted).count(), 1);
    }

    #[test]
    fn test_trashed_file_has_retention_left() {
        let now = at(2024, 6, 1);
        let records = files("u1", now);
        let trashed = records.iter().find(|r| r.is_deleted).unwrap();
        let days = crate::trash::days_remaining(trashed.deleted_at.unwrap(), 30, now);
        assert_eq!(days, 20);
    }

    #[test]
    fn test_seed_shares_team_photo() {
        let mut session = empty_session();
        let report = seed(&mut session, at(2024, 6, 1));

        assert_eq!(report, SeedReport { added: 6, skipped: 0, shared: 1 });
        let photo = session.files.get(&FileId::new("2")).unwrap();
        assert!(photo.is_public);
        assert_eq!(session.shares.len(), 1);
    }

    #[test]
    fn test_seed_twice_skips_existing() {
        let mut session = empty_session();
        seed(&mut session, at(2024, 6, 1));
        let report = seed(&mut session, at(2024, 6, 2));

        assert_eq!(report.added, 0);
        assert_eq!(report.skipped, 6);
        assert_eq!(session.files.len(), 6);
        assert_eq!(session.shares.len(), 1);
    }
}
