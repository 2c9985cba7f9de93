//! codec — snapshot load/save of the whole store state.
//!
//! Файл снапшота (JSON, pretty) хранит всё состояние одним документом
//! (см. wire.rs). Политика записи:
//! - Atomic write: <path>.tmp, fsync (optional), rename, fsync parent dir
//!   (best-effort, unix). A reader never sees a half-written snapshot.
//! - Load: missing file => Ok(None); unreadable/unparseable => Err (never
//!   silently swallowed, never followed by a write from here).
//!
//! Callers must serialize `save` calls; the store does this under its lock.

pub mod wire;

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::fs::File;

use crate::activity::RecentActivity;
use crate::endpoints::EndpointPool;
use crate::inventory::{AddressInventory, LocationToggles};
use crate::ledger::CodeLedger;
use crate::metrics::{record_snapshot_load, record_snapshot_save, record_snapshot_save_failure};
use crate::registry::SubscriberRegistry;

pub use wire::{CodeRecord, CountryRecord, SnapshotDoc, SubscriberRecord, SNAPSHOT_VERSION};

/// Full in-memory state of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    pub ledger: CodeLedger,
    pub registry: SubscriberRegistry,
    pub inventory: AddressInventory,
    pub endpoints: EndpointPool,
    pub activity: RecentActivity,
}

impl StoreState {
    pub fn with_activity_capacity(capacity: usize) -> Self {
        Self {
            activity: RecentActivity::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Domain -> wire.
    pub fn to_doc(&self) -> SnapshotDoc {
        SnapshotDoc {
            version: SNAPSHOT_VERSION,
            codes: self
                .ledger
                .iter()
                .map(|c| (c.code.clone(), CodeRecord::from(c)))
                .collect(),
            subscribers: self
                .registry
                .iter()
                .map(|s| (s.id, SubscriberRecord::from(s)))
                .collect(),
            disabled: self.registry.disabled_ids().collect(),
            countries: self
                .inventory
                .all_countries()
                .iter()
                .map(CountryRecord::from)
                .collect(),
            location_toggles: self.inventory.toggles().as_map().clone(),
            endpoints: self.endpoints.hosts().to_vec(),
            recent_activity: self.activity.iter().cloned().collect(),
        }
    }

    /// Wire -> domain. Fails on records that cannot be interpreted
    /// (unknown code/plan type, newer snapshot version).
    pub fn from_doc(doc: SnapshotDoc, activity_capacity: usize) -> Result<Self> {
        if doc.version > SNAPSHOT_VERSION {
            return Err(anyhow!(
                "unsupported snapshot version {} (max {})",
                doc.version,
                SNAPSHOT_VERSION
            ));
        }

        let codes = doc
            .codes
            .into_iter()
            .map(|(code, r)| r.into_code(code))
            .collect::<Result<Vec<_>>>()?;

        let subscribers = doc
            .subscribers
            .into_iter()
            .map(|(id, r)| r.into_subscriber(id))
            .collect::<Result<Vec<_>>>()?;
        let (registry, orphans) = SubscriberRegistry::from_parts(subscribers, doc.disabled);
        if !orphans.is_empty() {
            warn!(
                "snapshot: dropped {} disabled id(s) without a subscriber record: {:?}",
                orphans.len(),
                orphans
            );
        }

        let entries = doc.countries.into_iter().map(|r| r.into_entry()).collect();
        let inventory = AddressInventory::from_parts(
            entries,
            LocationToggles::from_map(doc.location_toggles),
        );

        Ok(Self {
            ledger: CodeLedger::from_codes(codes),
            registry,
            inventory,
            endpoints: EndpointPool::from_hosts(doc.endpoints),
            activity: RecentActivity::from_events(activity_capacity, doc.recent_activity),
        })
    }
}

/// Reads and writes the snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotCodec {
    path: PathBuf,
    fsync: bool,
    activity_capacity: usize,
}

impl SnapshotCodec {
    pub fn new(path: impl Into<PathBuf>, fsync: bool, activity_capacity: usize) -> Self {
        Self {
            path: path.into(),
            fsync,
            activity_capacity,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ok(None) if there is no snapshot yet.
    pub fn load(&self) -> Result<Option<StoreState>> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("read snapshot {}", self.path.display()))
            }
        };
        let doc: SnapshotDoc = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse snapshot {}", self.path.display()))?;
        let state = StoreState::from_doc(doc, self.activity_capacity)
            .with_context(|| format!("decode snapshot {}", self.path.display()))?;
        record_snapshot_load();
        debug!(
            "snapshot: loaded {} B from {}",
            bytes.len(),
            self.path.display()
        );
        Ok(Some(state))
    }

    /// Write the whole state as one unit. Returns bytes written.
    pub fn save(&self, state: &StoreState) -> Result<usize> {
        let res = serde_json::to_vec_pretty(&state.to_doc())
            .context("serialize snapshot")
            .and_then(|data| write_atomic(&self.path, &data, self.fsync).map(|_| data.len()));
        match res {
            Ok(n) => {
                record_snapshot_save(n);
                Ok(n)
            }
            Err(e) => {
                record_snapshot_save_failure();
                Err(e)
            }
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(".tmp");
    PathBuf::from(s)
}

#[cfg(unix)]
fn fsync_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let dir = File::open(parent)?;
            dir.sync_all()?;
        }
    }
    Ok(())
}
#[cfg(not(unix))]
fn fsync_dir(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// tmp + rename (+ fsync) write shared by the snapshot and the toggle document.
pub(crate) fn write_atomic(path: &Path, data: &[u8], fsync: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
    }

    let tmp = tmp_path(path);
    {
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)
            .with_context(|| format!("open tmp {}", tmp.display()))?;
        f.write_all(data)
            .with_context(|| format!("write {}", tmp.display()))?;
        f.flush()?;
        if fsync {
            f.sync_all()
                .with_context(|| format!("fsync {}", tmp.display()))?;
        }
    }

    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    if fsync {
        let _ = fsync_dir(path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("/x/bot_database.json")),
            PathBuf::from("/x/bot_database.json.tmp")
        );
        assert_eq!(tmp_path(Path::new("db")), PathBuf::from("db.tmp"));
    }

    #[test]
    fn newer_version_rejected() {
        let doc = SnapshotDoc {
            version: SNAPSHOT_VERSION + 1,
            ..SnapshotDoc::default()
        };
        assert!(StoreState::from_doc(doc, 20).is_err());
    }

    #[test]
    fn empty_document_is_empty_state() {
        let doc: SnapshotDoc = serde_json::from_str("{}").unwrap();
        assert_eq!(doc.version, 1);
        let st = StoreState::from_doc(doc, 20).unwrap();
        assert_eq!(st, StoreState::default());
    }
}
