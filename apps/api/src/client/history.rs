//! Local history of completed applications.
//!
//! One JSON file holds the whole log, newest first. The file is read once
//! when the store is opened and rewritten in full after every append
//! (temp file + rename, so a crash leaves either the old or the new log).
//! A missing or corrupt file is an empty log, never a fatal error.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::application::Application;

/// How many applications a list view shows.
pub const DISPLAY_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("history serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to replace history file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    applications: Vec<Application>,
}

impl HistoryStore {
    /// Opens the log at `path`. Never fails: unreadable state is an empty log.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let applications = read_log(&path);
        debug!(
            "Loaded {} applications from {}",
            applications.len(),
            path.display()
        );
        Self { path, applications }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored application, newest first.
    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    /// The newest applications, at most [`DISPLAY_LIMIT`].
    pub fn recent(&self) -> &[Application] {
        let end = self.applications.len().min(DISPLAY_LIMIT);
        &self.applications[..end]
    }

    pub fn get(&self, id: &str) -> Option<&Application> {
        self.applications.iter().find(|a| a.id == id)
    }

    /// Puts `application` at the head of the log and rewrites the file.
    ///
    /// The in-memory log keeps the record even when the write fails; the next
    /// successful append persists it.
    pub fn append(&mut self, application: Application) -> Result<(), HistoryError> {
        info!("Recording application {}", application.id);
        self.applications.insert(0, application);
        self.persist()
    }

    fn persist(&self) -> Result<(), HistoryError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, &self.applications)?;
        file.flush()?;
        file.as_file().sync_all()?;
        file.persist(&self.path)?;
        Ok(())
    }
}

fn read_log(path: &Path) -> Vec<Application> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!("History at {} is unreadable, starting empty: {e}", path.display());
            return Vec::new();
        }
    };

    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        warn!("History at {} is corrupt, starting empty: {e}", path.display());
        Vec::new()
    })
}
