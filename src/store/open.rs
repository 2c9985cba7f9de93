//! store/open — load-or-initialize.
//!
//! Порядок открытия:
//! 1) load snapshot
//!    - missing  => fresh state, initial snapshot written
//!    - unusable => error!, file copied aside to <path>.corrupt-<secs>,
//!                  empty state, nothing written
//! 2) startup reconcile over the whole inventory (save only if it changed)
//! 3) UI toggle document (unreadable => warn!, all enabled)
//! 4) optional seeding of the stock vouchers

use anyhow::{Context, Result};
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::codec::{SnapshotCodec, StoreState};
use crate::config::StoreConfig;
use crate::inventory::Reconciled;
use crate::metrics::{record_buckets_merged, record_snapshot_load_failure};
use crate::ui_toggles::UiToggles;
use crate::util::now_secs;

use super::core::{Inner, Store};

fn corrupt_path(path: &Path, secs: u64) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(format!(".corrupt-{}", secs));
    PathBuf::from(s)
}

impl Store {
    /// Open with configuration from the environment.
    pub fn open_default() -> Result<Self> {
        Self::open(StoreConfig::from_env())
    }

    pub fn open(cfg: StoreConfig) -> Result<Self> {
        let codec = SnapshotCodec::new(&cfg.snapshot_path, cfg.fsync, cfg.activity_capacity);

        let (state, fresh, degraded) = match codec.load() {
            Ok(Some(st)) => (st, false, false),
            Ok(None) => (
                StoreState::with_activity_capacity(cfg.activity_capacity),
                true,
                false,
            ),
            Err(e) => {
                record_snapshot_load_failure();
                error!(
                    "store: cannot load snapshot {}; starting EMPTY: {:#}",
                    cfg.snapshot_path.display(),
                    e
                );
                quarantine(&cfg.snapshot_path);
                (
                    StoreState::with_activity_capacity(cfg.activity_capacity),
                    false,
                    true,
                )
            }
        };

        let ui = match UiToggles::load(&cfg.ui_toggles_path) {
            Ok(t) => t,
            Err(e) => {
                warn!(
                    "store: toggle document {} unusable, all affordances enabled: {:#}",
                    cfg.ui_toggles_path.display(),
                    e
                );
                UiToggles::default()
            }
        };

        let seed = cfg.seed_default_codes;
        let store = Store {
            inner: Mutex::new(Inner { state, ui }),
            codec,
            cfg,
            degraded,
        };

        if fresh {
            let g = store.lock();
            store
                .persist("open", &g.state)
                .context("write initial snapshot")?;
            info!(
                "store: initialized new snapshot at {}",
                store.codec.path().display()
            );
        }

        if !degraded {
            store.startup_reconcile()?;
        }

        if seed {
            if degraded {
                warn!("store: snapshot unusable, skipping default code seeding");
            } else {
                store.seed_default_codes()?;
            }
        }

        Ok(store)
    }

    fn startup_reconcile(&self) -> Result<()> {
        let r = self.reconcile_inventory()?;
        if r.changed() {
            info!(
                "store: startup reconcile folded {} duplicate country bucket(s), moved {} toggle(s), renamed {}",
                r.buckets, r.toggles, r.renamed
            );
        }
        Ok(())
    }

    /// Fold every pair of buckets denoting the same country, carrying their
    /// toggles along. Saves only if something changed.
    pub fn reconcile_inventory(&self) -> Result<Reconciled> {
        self.mutate("reconcile_inventory", |inner| {
            let r = inner.state.inventory.reconcile();
            record_buckets_merged(r.buckets);
            Ok((r, r.changed()))
        })
    }
}

/// Copy an unreadable snapshot aside; the original stays in place.
fn quarantine(path: &Path) {
    if !path.exists() {
        return;
    }
    let dst = corrupt_path(path, now_secs());
    match fs::copy(path, &dst) {
        Ok(_) => warn!(
            "store: unreadable snapshot copied to {}",
            dst.display()
        ),
        Err(e) => warn!(
            "store: could not copy unreadable snapshot to {}: {}",
            dst.display(),
            e
        ),
    }
}
