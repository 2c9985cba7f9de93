//! File-based locking for single-process access to a snapshot.
//!
//! Cross-platform (fs2) advisory locks:
//! - Exclusive: one process owns the snapshot (the bot, or one admin command).
//! - The holder's PID is written into the lock file for diagnostics.
//!
//! Lock file path: <snapshot>.lock
//! Lock is released on Drop.

use anyhow::{Context, Result};
use fs2::FileExt;
use log::warn;
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub struct LockGuard {
    file: File,
    path: PathBuf,
}

impl LockGuard {
    fn new(file: File, path: PathBuf) -> Self {
        Self { file, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// <snapshot>.lock
pub fn lock_file_path(snapshot: &Path) -> PathBuf {
    let mut s = snapshot.as_os_str().to_owned();
    s.push(".lock");
    PathBuf::from(s)
}

fn open_lock_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
    }
    OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(path)
        .with_context(|| format!("open lock file {}", path.display()))
}

fn stamp_pid(file: &mut File) {
    // best-effort: the lock itself is what matters
    let _ = file.set_len(0);
    let _ = file.seek(SeekFrom::Start(0));
    let _ = writeln!(file, "{}", std::process::id());
    let _ = file.flush();
}

/// Acquire the exclusive lock for `snapshot`. Blocks until acquired.
pub fn acquire_exclusive_lock(snapshot: &Path) -> Result<LockGuard> {
    let path = lock_file_path(snapshot);
    let mut file = open_lock_file(&path)?;
    file.lock_exclusive()
        .with_context(|| format!("lock_exclusive {}", path.display()))?;
    stamp_pid(&mut file);
    Ok(LockGuard::new(file, path))
}

/// Try to acquire the exclusive lock for `snapshot`. Returns Err if another
/// process (or another guard in this one) holds it.
pub fn try_acquire_exclusive_lock(snapshot: &Path) -> Result<LockGuard> {
    let path = lock_file_path(snapshot);
    let mut file = open_lock_file(&path)?;
    if let Err(e) = file.try_lock_exclusive() {
        let holder = std::fs::read_to_string(&path).unwrap_or_default();
        warn!(
            "lock: {} is held (pid {})",
            path.display(),
            holder.trim()
        );
        return Err(e).with_context(|| format!("try_lock_exclusive failed: {}", path.display()));
    }
    stamp_pid(&mut file);
    Ok(LockGuard::new(file, path))
}
