//! store/misc — endpoint pool, recent activity, UI toggles, stats.

use anyhow::Result;
use log::error;
use serde::Serialize;
use std::fmt;

use crate::activity::ActivityEvent;
use crate::ui_toggles::{Affordance, UiToggles};

use super::core::Store;

/// Counts for the admin overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub subscribers: usize,
    pub disabled_subscribers: usize,
    pub codes: usize,
    pub countries: usize,
    pub addresses: usize,
    pub endpoints: usize,
}

impl fmt::Display for StoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "subscribers={} (disabled={}) codes={} countries={} addresses={} endpoints={}",
            self.subscribers,
            self.disabled_subscribers,
            self.codes,
            self.countries,
            self.addresses,
            self.endpoints
        )
    }
}

impl Store {
    // ---------- endpoints ----------

    /// Duplicates are ignored (false). Empty host => StoreError::EmptyEndpoint.
    pub fn add_endpoint(&self, host: &str) -> Result<bool> {
        self.mutate("add_endpoint", |inner| {
            let added = inner.state.endpoints.add(host)?;
            Ok((added, added))
        })
    }

    pub fn remove_endpoint(&self, host: &str) -> Result<bool> {
        self.mutate("remove_endpoint", |inner| {
            let removed = inner.state.endpoints.remove(host);
            Ok((removed, removed))
        })
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.read(|inner| inner.state.endpoints.hosts().to_vec())
    }

    // ---------- recent activity ----------

    pub fn record_activity(&self, message: &str) -> Result<()> {
        self.mutate("record_activity", |inner| {
            inner.state.activity.push(ActivityEvent::now(message));
            Ok(((), true))
        })
    }

    /// Newest first.
    pub fn recent_activity(&self) -> Vec<ActivityEvent> {
        self.read(|inner| inner.state.activity.iter().cloned().collect())
    }

    // ---------- UI toggles ----------

    pub fn ui_toggles(&self) -> UiToggles {
        self.read(|inner| inner.ui)
    }

    pub fn is_ui_disabled(&self, affordance: Affordance) -> bool {
        self.read(|inner| inner.ui.is_disabled(affordance))
    }

    /// Flip one affordance and rewrite the toggle document.
    pub fn set_ui_toggle(&self, affordance: Affordance, disabled: bool) -> Result<bool> {
        let mut g = self.lock();
        if !g.ui.set(affordance, disabled) {
            return Ok(false);
        }
        if let Err(e) = g.ui.save(&self.cfg.ui_toggles_path, self.cfg.fsync) {
            error!(
                "store: toggle document save to {} failed: {:#}",
                self.cfg.ui_toggles_path.display(),
                e
            );
            return Err(e);
        }
        Ok(true)
    }

    // ---------- stats ----------

    pub fn stats(&self) -> StoreStats {
        self.read(|inner| {
            let st = &inner.state;
            StoreStats {
                subscribers: st.registry.len(),
                disabled_subscribers: st.registry.disabled_len(),
                codes: st.ledger.len(),
                countries: st.inventory.all_countries().len(),
                addresses: st.inventory.total_addresses(),
                endpoints: st.endpoints.len(),
            }
        })
    }
}
