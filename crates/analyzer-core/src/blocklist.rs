//! Exact-match lookup against the known-malicious URL store.
//!
//! The store is a SQLite database curated offline; this pipeline only ever
//! reads it. Each lookup opens its own connection, so concurrent requests
//! share no mutable handle and need no locking.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};

const LOOKUP_SQL: &str = "SELECT COUNT(*) FROM processed_urls WHERE url = ?1";

/// Read-only handle on the blocklist database.
#[derive(Debug, Clone)]
pub struct BlocklistStore {
    db_path: PathBuf,
}

impl BlocklistStore {
    /// Validate and wrap the database at `db_path`.
    ///
    /// Opens a probe connection so a missing or unreadable database fails
    /// at startup instead of on the first request.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        Self::connect(&db_path)
            .with_context(|| format!("cannot open blocklist database {}", db_path.display()))?;
        Ok(Self { db_path })
    }

    fn connect(path: &Path) -> rusqlite::Result<Connection> {
        Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
    }

    /// Exact-match membership test.
    ///
    /// A hit is authoritative. A miss does not imply safety; it only means
    /// the URL proceeds to model scoring.
    pub fn contains(&self, url: &str) -> Result<bool> {
        let conn = Self::connect(&self.db_path)?;
        let count: i64 = conn.query_row(LOOKUP_SQL, [url], |row| row.get(0))?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_store(urls: &[&str]) -> (BlocklistStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blocklist.db");

        let conn = Connection::open(&path).unwrap();
        conn.execute("CREATE TABLE processed_urls (url TEXT NOT NULL, label INTEGER)", [])
            .unwrap();
        for url in urls {
            conn.execute("INSERT INTO processed_urls (url, label) VALUES (?1, 1)", [url])
                .unwrap();
        }

        (BlocklistStore::open(&path).unwrap(), dir)
    }

    #[test]
    fn known_url_is_a_hit() {
        let (store, _dir) = seeded_store(&["http://malware.example/payload"]);
        assert!(store.contains("http://malware.example/payload").unwrap());
    }

    #[test]
    fn unknown_url_is_a_miss() {
        let (store, _dir) = seeded_store(&["http://malware.example/payload"]);
        assert!(!store.contains("http://benign.example/").unwrap());
    }

    #[test]
    fn lookup_is_exact_not_normalized() {
        let (store, _dir) = seeded_store(&["http://malware.example/payload"]);
        assert!(!store.contains("http://malware.example/payload/").unwrap());
        assert!(!store.contains("HTTP://MALWARE.EXAMPLE/payload").unwrap());
    }

    #[test]
    fn open_fails_on_missing_database() {
        assert!(BlocklistStore::open("/nonexistent/blocklist.db").is_err());
    }
}
