//! Ephemeral file management.
//!
//! Every file lives under one directory and gets a unique name. Deletion is
//! best-effort and never fails a request: it either happens immediately
//! (`delete_now`) or in a detached deferred task with a single retry
//! (`schedule_cleanup`).

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use tokio::{fs, io::AsyncWriteExt, task::JoinHandle, time::sleep};
use tracing::{debug, warn};

use crate::{config::Config, Result};

/// Manager for short-lived files under one directory.
pub struct TempStore {
    dir: PathBuf,
    initial_delay: Duration,
    retry_delay: Duration,
    seq: AtomicU64,
}

impl TempStore {
    /// Creates the backing directory if missing.
    pub fn new(
        dir: impl Into<PathBuf>,
        initial_delay: Duration,
        retry_delay: Duration,
    ) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            initial_delay,
            retry_delay,
            seq: AtomicU64::new(1),
        })
    }

    /// Store rooted at `cfg.temp_dir` with the configured delays.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(
            cfg.temp_dir.clone(),
            cfg.cleanup_initial_delay,
            cfg.cleanup_retry_delay,
        )
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Opens a fresh file for writing. The name embeds a millisecond
    /// timestamp plus a sequence number, so no two live handles from this
    /// store share a path.
    pub async fn create(&self, suffix: &str) -> Result<TempFile> {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let n = self.seq.fetch_add(1, Ordering::SeqCst);
        let path = self.dir.join(format!("qr_{ts}_{n}{suffix}"));
        let file = fs::File::create(&path).await?;
        Ok(TempFile { path, file })
    }

    /// Immediate best-effort delete. A missing file counts as deleted; any
    /// other failure is logged and swallowed.
    pub async fn delete_now(&self, path: &Path) {
        match fs::remove_file(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, path = %path.display(), "failed to delete temp file"),
        }
    }

    /// Deferred delete for a file whose path was handed to a sink that may
    /// still be reading it: wait `initial_delay`, try once, and on failure
    /// retry exactly once after `retry_delay`. A second failure leaves the
    /// file behind with a warning.
    ///
    /// The task is detached; it runs to completion even after the handle is
    /// dropped and the request that scheduled it is gone.
    pub fn schedule_cleanup(&self, path: PathBuf) -> JoinHandle<()> {
        let initial = self.initial_delay;
        let retry = self.retry_delay;
        tokio::spawn(async move {
            sleep(initial).await;
            match fs::remove_file(&path).await {
                Ok(()) => return,
                Err(e) if e.kind() == ErrorKind::NotFound => return,
                Err(e) => {
                    debug!(error = %e, path = %path.display(), "temp file delete failed, retrying")
                }
            }

            sleep(retry).await;
            match fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!(error = %e, path = %path.display(), "temp file leaked after retry"),
            }
        })
    }
}

/// An open, not-yet-written ephemeral file.
pub struct TempFile {
    path: PathBuf,
    file: fs::File,
}

impl TempFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the full contents and closes the handle before returning, so
    /// the file is immediately readable by path.
    pub async fn write(self, bytes: &[u8]) -> Result<PathBuf> {
        let TempFile { path, mut file } = self;
        file.write_all(bytes).await?;
        file.flush().await?;
        // Synchronous close; dropping the async handle alone may defer it.
        drop(file.into_std().await);
        Ok(path)
    }
}
