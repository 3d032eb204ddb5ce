// ABOUTME: Durable JSON outbox for finished activities whose workout entry failed to save
// ABOUTME: One file per session, written atomically and removed after a successful save
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Stride Tracking

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use stride_core::constants::persistence::OUTBOX_EXTENSION;
use stride_core::errors::PersistenceError;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use super::PendingSave;

/// Directory of pending saves, keyed by session id
#[derive(Debug, Clone)]
pub struct Outbox {
    dir: PathBuf,
}

fn storage(error: io::Error) -> PersistenceError {
    PersistenceError::Storage(error.to_string())
}

impl Outbox {
    /// Open (creating if needed) an outbox directory
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await.map_err(storage)?;
        Ok(Self { dir })
    }

    /// Directory backing the outbox
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, session_id: Uuid) -> PathBuf {
        self.dir.join(format!("{session_id}.{OUTBOX_EXTENSION}"))
    }

    /// Write (or overwrite) the entry for a pending save
    ///
    /// The entry is written to a temporary file and renamed into place, so
    /// readers never observe a partial entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be encoded or written
    pub async fn enqueue(&self, pending: &PendingSave) -> Result<PathBuf, PersistenceError> {
        let path = self.entry_path(pending.activity.session_id);
        let staging = path.with_extension("tmp");
        let body = serde_json::to_vec_pretty(pending)?;

        fs::write(&staging, body).await.map_err(storage)?;
        fs::rename(&staging, &path).await.map_err(storage)?;

        debug!(path = %path.display(), "activity parked in outbox");
        Ok(path)
    }

    /// Delete the entry for `session_id`; `false` if there was none
    ///
    /// # Errors
    ///
    /// Returns an error if an existing entry cannot be deleted
    pub async fn remove(&self, session_id: Uuid) -> Result<bool, PersistenceError> {
        match fs::remove_file(self.entry_path(session_id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(storage(e)),
        }
    }

    /// Read every entry, oldest finish first
    ///
    /// Unreadable entries are skipped and left on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed or an entry cannot be read
    pub async fn pending(&self) -> Result<Vec<PendingSave>, PersistenceError> {
        let mut entries = fs::read_dir(&self.dir).await.map_err(storage)?;
        let mut pending = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(storage)? {
            let path = entry.path();
            if path.extension().and_then(OsStr::to_str) != Some(OUTBOX_EXTENSION) {
                continue;
            }
            let bytes = fs::read(&path).await.map_err(storage)?;
            match serde_json::from_slice::<PendingSave>(&bytes) {
                Ok(save) => pending.push(save),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable outbox entry");
                }
            }
        }

        pending.sort_by_key(|save| save.activity.finished_at);
        Ok(pending)
    }

    /// Read and delete every entry, oldest finish first
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read or an entry cannot be deleted
    pub async fn drain(&self) -> Result<Vec<PendingSave>, PersistenceError> {
        let pending = self.pending().await?;
        for save in &pending {
            self.remove(save.activity.session_id).await?;
        }
        Ok(pending)
    }
}
