//! Session history sources.
//!
//! The evaluators take plain slices; a [`SessionStore`] is where those slices
//! come from. Records are returned in no particular order.

use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::session::SessionRecord;

/// Read access to persisted session records.
pub trait SessionStore {
    /// Every stored session.
    fn all_sessions(&self) -> Result<Vec<SessionRecord>, StoreError>;

    /// Sessions recorded on `track_id`.
    fn sessions_for_track(&self, track_id: &str) -> Result<Vec<SessionRecord>, StoreError> {
        Ok(self
            .all_sessions()?
            .into_iter()
            .filter(|s| s.track_id() == track_id)
            .collect())
    }
}

/// Store backed by a vector.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Vec<SessionRecord>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: SessionRecord) {
        self.sessions.push(record);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl FromIterator<SessionRecord> for InMemorySessionStore {
    fn from_iter<I: IntoIterator<Item = SessionRecord>>(iter: I) -> Self {
        Self {
            sessions: iter.into_iter().collect(),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn all_sessions(&self) -> Result<Vec<SessionRecord>, StoreError> {
        Ok(self.sessions.clone())
    }
}

/// Store backed by a JSON array of session records on disk.
#[derive(Debug, Clone)]
pub struct JsonSessionFile {
    path: PathBuf,
}

impl JsonSessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the file contents with `sessions`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save_all(&self, sessions: &[SessionRecord]) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(sessions).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, content).map_err(|source| StoreError::Access {
            path: self.path.clone(),
            source,
        })
    }

    /// Add one record to the end of the file.
    ///
    /// # Errors
    /// Returns an error if the existing file cannot be read or the result
    /// cannot be written.
    pub fn append(&self, record: SessionRecord) -> Result<(), StoreError> {
        let mut sessions = self.all_sessions()?;
        sessions.push(record);
        self.save_all(&sessions)
    }
}

impl SessionStore for JsonSessionFile {
    /// A missing file is an empty history. Every record is checked against
    /// its timestamps before it is returned.
    fn all_sessions(&self) -> Result<Vec<SessionRecord>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Access {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let sessions: Vec<SessionRecord> =
            serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        for session in &sessions {
            session.check()?;
        }
        Ok(sessions)
    }
}
