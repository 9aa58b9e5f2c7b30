//! File commands - upload, rename, delete, restore and demo seeding

use super::{Context, count};
use crate::DriveError;
use crate::demo;
use crate::output;
use crate::session::Session;
use crate::store::FileId;
use crate::upload::UploadPolicy;
use std::path::PathBuf;
use tracing::info;

type Result<T> = std::result::Result<T, DriveError>;

/// Upload local files into the drive
///
/// Files that fail validation are reported and skipped; the rest are added.
/// Uploads that would push usage past the quota are refused as a whole.
///
/// # Errors
/// Returns an error if not signed in, too many files are given, the quota
/// would be exceeded, or the session cannot be saved
pub fn upload(ctx: &Context, paths: &[PathBuf]) -> Result<()> {
    let mut session = Session::require(ctx.db)?;
    let policy = UploadPolicy::from(&ctx.config.storage);
    let batch = policy.ingest_batch(paths, &session.user.id, ctx.now)?;

    let usage = session.storage_usage();
    if !usage.fits(batch.total_size()) {
        return Err(DriveError::InvalidInput(format!(
            "Not enough storage: {} needed, {} available",
            output::human_size(batch.total_size()),
            output::human_size(usage.remaining())
        )));
    }

    for progress in &batch.progress {
        if ctx.quiet {
            if let Some(id) = &progress.file_id {
                println!("{id}");
            }
        } else {
            println!("{}", output::upload_line(progress));
        }
    }

    let added = batch.records.len();
    for record in batch.records {
        session.files.insert(record)?;
    }
    session.save(ctx.db)?;
    info!(added, failed = batch.progress.len() - added, "upload finished");

    ctx.info(format!("Uploaded {} of {}", count(added, "file"), paths.len()));
    Ok(())
}

/// # Errors
/// Returns an error if not signed in, the file is unknown, or the name is blank
pub fn rename(ctx: &Context, id: &str, name: &str) -> Result<()> {
    let mut session = Session::require(ctx.db)?;
    let record = session.files.rename(&FileId::new(id), name, ctx.now)?;
    let message = format!("Renamed {id} to {}", record.name);
    session.save(ctx.db)?;
    ctx.info(message);
    Ok(())
}

/// Move files to the trash, or delete them outright with `permanent`
///
/// Every id is attempted; the first failure is returned after the rest
/// have been processed.
///
/// # Errors
/// Returns an error if not signed in, an id is unknown or already trashed,
/// or the session cannot be saved
pub fn delete(ctx: &Context, ids: &[String], permanent: bool) -> Result<()> {
    let mut session = Session::require(ctx.db)?;
    if permanent {
        let prompt = format!("Permanently delete {}? This cannot be undone", count(ids.len(), "file"));
        if !ctx.confirm(&prompt)? {
            ctx.info("Cancelled.");
            return Ok(());
        }
    }

    let mut first_error: Option<DriveError> = None;
    let mut done = 0;
    for id in ids {
        let id = FileId::new(id.as_str());
        let result = if permanent {
            session.permanent_delete(&id).map(|_| ()).map_err(DriveError::from)
        } else {
            session
                .files
                .soft_delete_at(&id, ctx.now)
                .map(|_| ())
                .map_err(DriveError::from)
        };
        match result {
            Ok(()) => done += 1,
            Err(e) => {
                if !ctx.quiet {
                    eprintln!("{id}: {e}");
                }
                first_error.get_or_insert(e);
            }
        }
    }

    session.save(ctx.db)?;
    if permanent {
        ctx.info(format!("Permanently deleted {}", count(done, "file")));
    } else {
        ctx.info(format!(
            "Moved {} to the trash (kept for {} days)",
            count(done, "file"),
            ctx.config.storage.trash_retention_days
        ));
    }
    first_error.map_or(Ok(()), Err)
}

/// # Errors
/// Returns an error if not signed in, an id is unknown or not in the trash,
/// or the session cannot be saved
pub fn restore(ctx: &Context, ids: &[String]) -> Result<()> {
    let mut session = Session::require(ctx.db)?;
    let mut first_error: Option<DriveError> = None;
    let mut done = 0;
    for id in ids {
        let id = FileId::new(id.as_str());
        match session.files.restore(&id) {
            Ok(_) => done += 1,
            Err(e) => {
                if !ctx.quiet {
                    eprintln!("{id}: {e}");
                }
                first_error.get_or_insert(e.into());
            }
        }
    }
    session.save(ctx.db)?;
    ctx.info(format!("Restored {}", count(done, "file")));
    first_error.map_or(Ok(()), Err)
}

/// Add the demo files to the signed-in drive
///
/// # Errors
/// Returns an error if not signed in or the session cannot be saved
pub fn seed(ctx: &Context) -> Result<()> {
    let mut session = Session::require(ctx.db)?;
    let report = demo::seed(&mut session, ctx.now);
    session.save(ctx.db)?;
    ctx.info(format!(
        "Added {} ({} already present, {} shared)",
        count(report.added, "demo file"),
        report.skipped,
        report.shared
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DriveConfig;
    use crate::session::User;
    use crate::store::StoreError;
    use crate::testing::{TestDb, at, write_file};

    fn signed_in(test_db: &TestDb) -> Session {
        Session::sign_in(test_db.db(), User::new("Jane", "jane@example.com", at(2024, 1, 1))).unwrap()
    }

    #[test]
    fn test_upload_adds_accepted_files() {
        let test_db = TestDb::new();
        signed_in(&test_db);
        let config = DriveConfig::default();
        let ctx = Context::new(test_db.db(), &config, true, false, at(2024, 2, 1));

        let dir = tempfile::tempdir().unwrap();
        let ok = write_file(dir.path(), "notes.txt", b"hello");
        let bad = write_file(dir.path(), "run.sh", b"echo");
        upload(&ctx, &[ok, bad]).unwrap();

        let session = Session::require(ctx.db).unwrap();
        assert_eq!(session.files.len(), 1);
        let record = session.files.iter().next().unwrap();
        assert_eq!(record.name, "notes.txt");
        assert_eq!(record.user_id, session.user.id);
    }

    #[test]
    fn test_upload_refused_over_quota() {
        let test_db = TestDb::new();
        let mut session = signed_in(&test_db);
        session.user.storage_limit = 3;
        session.save(test_db.db()).unwrap();

        let config = DriveConfig::default();
        let ctx = Context::new(test_db.db(), &config, true, false, at(2024, 2, 1));
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "notes.txt", b"hello");

        assert!(matches!(upload(&ctx, &[path]), Err(DriveError::InvalidInput(_))));
        assert!(Session::require(ctx.db).unwrap().files.is_empty());
    }

    #[test]
    fn test_delete_restore_cycle() {
        let test_db = TestDb::new();
        signed_in(&test_db);
        let config = DriveConfig::default();
        let ctx = Context::new(test_db.db(), &config, true, false, at(2024, 2, 1));
        seed(&ctx).unwrap();

        delete(&ctx, &["1".into(), "3".into()], false).unwrap();
        let session = Session::require(ctx.db).unwrap();
        assert_eq!(session.files.list_trashed().count(), 3);
        let trashed = session.files.get(&FileId::new("1")).unwrap();
        assert_eq!(trashed.deleted_at, Some(at(2024, 2, 1)));

        restore(&ctx, &["1".into()]).unwrap();
        let session = Session::require(ctx.db).unwrap();
        assert!(!session.files.get(&FileId::new("1")).unwrap().is_deleted);
        assert!(session.files.get(&FileId::new("3")).unwrap().is_deleted);
    }

    #[test]
    fn test_delete_reports_unknown_id_but_processes_rest() {
        let test_db = TestDb::new();
        signed_in(&test_db);
        let config = DriveConfig::default();
        let ctx = Context::new(test_db.db(), &config, true, false, at(2024, 2, 1));
        seed(&ctx).unwrap();

        let result = delete(&ctx, &["nope".into(), "1".into()], false);
        assert!(matches!(result, Err(DriveError::Store(StoreError::NotFound(_)))));
        let session = Session::require(ctx.db).unwrap();
        assert!(session.files.get(&FileId::new("1")).unwrap().is_deleted);
    }

    #[test]
    fn test_permanent_delete_needs_confirmation() {
        let test_db = TestDb::new();
        signed_in(&test_db);
        let config = DriveConfig::default();
        let quiet = Context::new(test_db.db(), &config, true, false, at(2024, 2, 1));
        seed(&quiet).unwrap();

        delete(&quiet, &["2".into()], true).unwrap();
        assert!(Session::require(quiet.db).unwrap().files.contains(&FileId::new("2")));

        let yes = Context { yes: true, ..quiet };
        delete(&yes, &["2".into()], true).unwrap();
        let session = Session::require(yes.db).unwrap();
        assert!(!session.files.contains(&FileId::new("2")));
        assert!(session.shares.is_empty());
    }

    #[test]
    fn test_rename_saves() {
        let test_db = TestDb::new();
        signed_in(&test_db);
        let config = DriveConfig::default();
        let ctx = Context::new(test_db.db(), &config, true, false, at(2024, 2, 1));
        seed(&ctx).unwrap();

        rename(&ctx, "1", "Final Proposal.pdf").unwrap();
        let session = Session::require(ctx.db).unwrap();
        let record = session.files.get(&FileId::new("1")).unwrap();
        assert_eq!(record.name, "Final Proposal.pdf");
        assert_eq!(record.updated_at, at(2024, 2, 1));
        assert!(matches!(rename(&ctx, "1", "  "), Err(DriveError::Store(StoreError::InvalidName(_)))));
    }
}
