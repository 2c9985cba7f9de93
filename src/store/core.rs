//! store/core — Store struct and the critical-section helpers.

use anyhow::Result;
use log::error;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::codec::{SnapshotCodec, StoreState};
use crate::config::{StoreBuilder, StoreConfig};
use crate::ui_toggles::UiToggles;

pub(crate) struct Inner {
    pub(crate) state: StoreState,
    pub(crate) ui: UiToggles,
}

/// Process-wide store. Share it as `Arc<Store>`; all methods take `&self`.
pub struct Store {
    pub(crate) inner: Mutex<Inner>,
    pub(crate) codec: SnapshotCodec,
    pub(crate) cfg: StoreConfig,
    /// Opened on top of an unreadable snapshot (started empty).
    pub(crate) degraded: bool,
}

impl Store {
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.cfg
    }

    pub fn snapshot_path(&self) -> &Path {
        self.codec.path()
    }

    /// True if the snapshot could not be loaded at open and the store
    /// started from an empty state instead.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Copy of the whole in-memory state.
    pub fn state(&self) -> StoreState {
        self.lock().state.clone()
    }

    /// Write the current state unconditionally.
    pub fn flush(&self) -> Result<()> {
        let g = self.lock();
        self.persist("flush", &g.state)
    }

    /// Poisoned lock is taken over as is.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn read<T>(&self, f: impl FnOnce(&Inner) -> T) -> T {
        let g = self.lock();
        f(&*g)
    }

    /// Run `f` under the lock and save if it reports a change.
    /// `f` returns (result, changed); an Err from `f` means nothing was touched.
    pub(crate) fn mutate<T>(
        &self,
        op: &str,
        f: impl FnOnce(&mut Inner) -> Result<(T, bool)>,
    ) -> Result<T> {
        let mut g = self.lock();
        let (out, changed) = f(&mut *g)?;
        if changed {
            self.persist(op, &g.state)?;
        }
        Ok(out)
    }

    pub(crate) fn persist(&self, op: &str, state: &StoreState) -> Result<()> {
        match self.codec.save(state) {
            Ok(_) => Ok(()),
            Err(e) => {
                error!(
                    "store: {}: snapshot save to {} failed (in-memory change kept): {:#}",
                    op,
                    self.codec.path().display(),
                    e
                );
                Err(e)
            }
        }
    }
}
