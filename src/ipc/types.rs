use std::path::PathBuf;
use std::time::{Duration, Instant};

use rusqlite::Connection;
use serde::Deserialize;

use crate::db;
use crate::session::Session;

/// Matches the original's 30-second localStorage autosave timer.
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<Connection>,
    pub session: Session,
    pub dirty: bool,
    pub last_save: Instant,
}

impl AppState {
    pub fn new() -> AppState {
        AppState {
            workspace: None,
            db: None,
            session: Session::default(),
            dirty: false,
            last_save: Instant::now(),
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Flushes the in-memory roster to the workspace database. No-op when no
    /// workspace is selected.
    pub fn flush_snapshot(&mut self) -> anyhow::Result<usize> {
        let Some(conn) = self.db.as_mut() else {
            return Ok(0);
        };
        let count = db::save_roster(conn, self.session.students())?;
        self.dirty = false;
        self.last_save = Instant::now();
        Ok(count)
    }

    /// Deadline-based autosave, run from the request loop between requests.
    /// Failures are swallowed: the next due save retries.
    pub fn autosave_if_due(&mut self) {
        if self.dirty && self.db.is_some() && self.last_save.elapsed() >= AUTOSAVE_INTERVAL {
            let _ = self.flush_snapshot();
        }
    }
}
