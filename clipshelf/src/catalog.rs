use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, Row};
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::{CatalogRecord, NewClip};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS clips (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    title           TEXT NOT NULL,
    media_path      TEXT,
    transcript_path TEXT,
    transcript      TEXT,
    platform        TEXT NOT NULL,
    category        TEXT NOT NULL
)";

/// The durable record set describing acquired artifacts.
///
/// Access is connection-per-call: each public operation opens and closes its
/// own SQLite connection and is independently atomic for the row-level change
/// it makes. `AUTOINCREMENT` guarantees an id, once issued, is never reused,
/// even after deletion.
#[derive(Clone)]
pub struct Catalog {
    db_path: PathBuf,
}

impl Catalog {
    /// Open (and if necessary bootstrap) the catalog at the given path.
    /// Invoked once at process start; the handle is then threaded through
    /// the application state.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&db_path)?;
        conn.execute(SCHEMA, [])?;

        Ok(Self { db_path })
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.db_path)?)
    }

    /// Insert one record, returning the store-assigned id.
    pub fn insert(&self, clip: &NewClip) -> Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO clips (title, media_path, transcript_path, transcript, platform, category)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                clip.title,
                clip.media_path,
                clip.transcript_path,
                clip.transcript,
                clip.platform,
                clip.category
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// All records in insertion order.
    pub fn list_all(&self) -> Result<Vec<CatalogRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, media_path, transcript_path, transcript, platform, category
             FROM clips ORDER BY id",
        )?;
        let rows = stmt.query_map([], record_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Records whose category equals the given label exactly (no case folding).
    pub fn list_by_category(&self, category: &str) -> Result<Vec<CatalogRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, media_path, transcript_path, transcript, platform, category
             FROM clips WHERE category = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![category], record_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Fetch one record by id.
    pub fn get(&self, id: i64) -> Result<Option<CatalogRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, media_path, transcript_path, transcript, platform, category
             FROM clips WHERE id = ?1",
        )?;
        match stmt.query_row(params![id], record_from_row) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete one record and its artifact files.
    ///
    /// Compound operation: look up the row's paths, remove the files that
    /// still exist (missing files are not an error, removal failures are
    /// logged and do not abort), then remove the row. Deleting a nonexistent
    /// id is a no-op.
    pub fn delete(&self, id: i64) -> Result<()> {
        let Some(record) = self.get(id)? else {
            debug!(id, "delete: no such record");
            return Ok(());
        };

        for path in [&record.media_path, &record.transcript_path]
            .into_iter()
            .flatten()
        {
            let path = Path::new(path);
            if path.exists() {
                if let Err(e) = std::fs::remove_file(path) {
                    warn!(path = %path.display(), error = %e, "failed to remove artifact file");
                }
            }
        }

        let conn = self.connect()?;
        conn.execute("DELETE FROM clips WHERE id = ?1", params![id])?;
        debug!(id, "record deleted");
        Ok(())
    }
}

fn record_from_row(row: &Row) -> rusqlite::Result<CatalogRecord> {
    Ok(CatalogRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        media_path: row.get(2)?,
        transcript_path: row.get(3)?,
        transcript: row.get(4)?,
        platform: row.get(5)?,
        category: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio_clip(title: &str, category: &str, media_path: Option<String>) -> NewClip {
        NewClip {
            title: title.to_string(),
            media_path,
            transcript_path: None,
            transcript: None,
            platform: "youtube".to_string(),
            category: category.to_string(),
        }
    }

    fn open_temp() -> (tempfile::TempDir, Catalog) {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::open(dir.path().join("videos.db")).unwrap();
        (dir, catalog)
    }

    #[test]
    fn test_open_is_repeat_safe() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("videos.db");
        Catalog::open(&path).unwrap();
        Catalog::open(&path).unwrap();
    }

    #[test]
    fn test_insert_and_list_all_in_insertion_order() {
        let (_dir, catalog) = open_temp();
        let a = catalog.insert(&audio_clip("first", "music", None)).unwrap();
        let b = catalog.insert(&audio_clip("second", "talks", None)).unwrap();
        assert!(b > a);

        let all = catalog.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "first");
        assert_eq!(all[1].title, "second");
    }

    #[test]
    fn test_list_by_category_exact_match() {
        let (_dir, catalog) = open_temp();
        catalog.insert(&audio_clip("a", "music", None)).unwrap();
        catalog.insert(&audio_clip("b", "Music", None)).unwrap();
        catalog.insert(&audio_clip("c", "music", None)).unwrap();

        let music = catalog.list_by_category("music").unwrap();
        assert_eq!(music.len(), 2);
        assert!(music.iter().all(|r| r.category == "music"));

        let all = catalog.list_all().unwrap();
        let subset: Vec<_> = all.iter().filter(|r| r.category == "music").collect();
        assert_eq!(subset.len(), music.len());
    }

    #[test]
    fn test_get_missing_is_none() {
        let (_dir, catalog) = open_temp();
        assert!(catalog.get(42).unwrap().is_none());
    }

    #[test]
    fn test_delete_removes_row_and_files() {
        let (dir, catalog) = open_temp();

        let media = dir.path().join("clip.mp3");
        let sidecar = dir.path().join("clip.txt");
        std::fs::write(&media, b"audio").unwrap();
        std::fs::write(&sidecar, b"transcript").unwrap();

        let id = catalog
            .insert(&NewClip {
                title: "clip".to_string(),
                media_path: Some(media.to_string_lossy().into_owned()),
                transcript_path: Some(sidecar.to_string_lossy().into_owned()),
                transcript: Some("transcript".to_string()),
                platform: "youtube".to_string(),
                category: "music".to_string(),
            })
            .unwrap();

        catalog.delete(id).unwrap();

        assert!(catalog.list_all().unwrap().is_empty());
        assert!(!media.exists());
        assert!(!sidecar.exists());
    }

    #[test]
    fn test_delete_with_missing_files_is_ok() {
        let (dir, catalog) = open_temp();
        let gone = dir.path().join("already-gone.mp4");
        let id = catalog
            .insert(&audio_clip("x", "misc", Some(gone.to_string_lossy().into_owned())))
            .unwrap();

        catalog.delete(id).unwrap();
        assert!(catalog.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_delete_nonexistent_is_noop() {
        let (_dir, catalog) = open_temp();
        catalog.delete(999).unwrap();
    }

    #[test]
    fn test_ids_never_reused_after_deletion() {
        let (_dir, catalog) = open_temp();
        let first = catalog.insert(&audio_clip("a", "misc", None)).unwrap();
        catalog.delete(first).unwrap();
        let second = catalog.insert(&audio_clip("b", "misc", None)).unwrap();
        assert!(second > first);
    }
}
