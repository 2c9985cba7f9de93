//! store/inventory — address inventory and per-location toggles.

use anyhow::Result;
use log::info;

use crate::activity::ActivityEvent;
use crate::inventory::{AddOutcome, AddressFamily, CountryEntry, LocationToggle};
use crate::metrics::{record_address_added, record_buckets_merged};

use super::core::Store;

/// Display line pushed to recent activity for a new address.
fn added_message(o: &AddOutcome, address: &str) -> String {
    if o.glyph.is_empty() {
        format!("{}: {}", o.display_name, address)
    } else {
        format!("{} {}: {}", o.glyph, o.display_name, address)
    }
}

impl Store {
    /// Store `address` under the country `name` resolves to.
    ///
    /// Malformed names and empty addresses are rejected before anything
    /// changes (`StoreError` inside the error). A new address also lands in
    /// recent activity; a repeated one changes nothing.
    pub fn add_address(&self, name: &str, glyph: &str, address: &str) -> Result<AddOutcome> {
        let out = self.mutate("add_address", |inner| {
            let o = inner.state.inventory.add_address(name, glyph, address)?;
            if o.added {
                inner
                    .state
                    .activity
                    .push(ActivityEvent::now(added_message(&o, address.trim())));
            }
            let changed = o.changed();
            Ok((o, changed))
        })?;

        if out.added {
            record_address_added();
        }
        if out.merged > 0 {
            record_buckets_merged(out.merged);
            info!(
                "store: folded {} duplicate bucket(s) into '{}'",
                out.merged, out.key
            );
        }
        Ok(out)
    }

    pub fn remove_address(&self, key: &str, address: &str) -> Result<bool> {
        self.mutate("remove_address", |inner| {
            let done = inner.state.inventory.remove_address(key, address);
            Ok((done, done))
        })
    }

    pub fn remove_country(&self, key: &str) -> Result<bool> {
        self.mutate("remove_country", |inner| {
            let done = inner.state.inventory.remove_country(key);
            Ok((done, done))
        })
    }

    /// Addresses of one country; empty for an unknown key.
    pub fn addresses(&self, key: &str) -> Vec<String> {
        self.read(|inner| inner.state.inventory.list_by_country(key).to_vec())
    }

    /// All buckets in creation order.
    pub fn countries(&self) -> Vec<CountryEntry> {
        self.read(|inner| inner.state.inventory.all_countries().to_vec())
    }

    pub fn country(&self, key: &str) -> Option<CountryEntry> {
        self.read(|inner| inner.state.inventory.country(key).cloned())
    }

    pub fn set_location_disabled(&self, key: &str, family: AddressFamily, disabled: bool) -> Result<bool> {
        self.mutate("set_location_disabled", |inner| {
            let changed = inner.state.inventory.set_disabled(key, family, disabled);
            Ok((changed, changed))
        })
    }

    /// Never fails for unknown keys: a default (enabled) toggle is created
    /// in memory and written out with the next save.
    pub fn is_location_disabled(&self, key: &str, family: AddressFamily) -> bool {
        self.lock().state.inventory.is_disabled(key, family)
    }

    /// Read-only peek, no toggle is created. Keys resolve as in
    /// `is_location_disabled`.
    pub fn location_toggle(&self, key: &str) -> Option<LocationToggle> {
        self.read(|inner| inner.state.inventory.toggle(key))
    }
}
