//! inventory — country-keyed address inventory.
//!
//! Разделение по подмодулям:
//! - entry.rs  — CountryEntry (ключ, имя, флаг, список адресов)
//! - toggle.rs — LocationToggles (per-key v4/v6 disable flags)
//!
//! Buckets are kept in creation order; an earlier bucket is "longer-lived"
//! and survives when two buckets turn out to hold the same logical country.
//! Merging happens on every insert (for the buckets that insert touches) and
//! in `reconcile()` over the whole table (run once at store startup). A merge
//! carries the folded-away buckets' location toggles over to the survivor.

pub mod entry;
pub mod toggle;

pub use entry::CountryEntry;
pub use toggle::{AddressFamily, LocationToggle, LocationToggles};

use crate::error::StoreError;
use crate::normalize;

/// What `add_address` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    /// Key of the bucket that now holds the address.
    pub key: String,
    pub display_name: String,
    pub glyph: String,
    /// Address was new to the bucket.
    pub added: bool,
    /// Bucket was created by this call.
    pub created: bool,
    /// Number of sibling buckets folded into the survivor.
    pub merged: usize,
    /// Survivor took the display name the alias table dictates.
    pub renamed: bool,
    /// Stray location toggles moved onto the bucket's key.
    pub toggles_moved: usize,
}

impl AddOutcome {
    pub fn changed(&self) -> bool {
        self.added || self.created || self.merged > 0 || self.renamed || self.toggles_moved > 0
    }
}

/// What `reconcile` did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// Buckets folded into an older one.
    pub buckets: usize,
    /// Toggles moved onto their bucket's key.
    pub toggles: usize,
    /// Buckets that took their alias display name.
    pub renamed: usize,
}

impl Reconciled {
    pub fn changed(&self) -> bool {
        self.buckets > 0 || self.toggles > 0 || self.renamed > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressInventory {
    entries: Vec<CountryEntry>,
    toggles: LocationToggles,
}

impl AddressInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(entries: Vec<CountryEntry>, toggles: LocationToggles) -> Self {
        Self { entries, toggles }
    }

    pub fn toggles(&self) -> &LocationToggles {
        &self.toggles
    }

    /// Canonicalize `name`, find (or create) its bucket, merging any
    /// near-duplicate buckets into the oldest one, then append `address`
    /// if it is new.
    pub fn add_address(&mut self, name: &str, glyph: &str, address: &str) -> Result<AddOutcome, StoreError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(StoreError::EmptyAddress);
        }
        let canon = normalize::canonicalize(name)?;

        let siblings: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| normalize::same_country(e.key(), &canon.key))
            .map(|(i, _)| i)
            .collect();

        let (idx, created, merged, renamed) = match siblings.split_first() {
            Some((&survivor, rest)) => {
                let merged = self.merge_into(survivor, rest);
                let renamed = match canon.display_name {
                    Some(forced) => self.entries[survivor].set_display_name(forced),
                    None => false,
                };
                (survivor, false, merged, renamed)
            }
            None => {
                let display: &str = match canon.display_name {
                    Some(forced) => forced,
                    None => name.trim(),
                };
                self.entries
                    .push(CountryEntry::new(canon.key.clone(), display, glyph.trim()));
                (self.entries.len() - 1, true, 0, false)
            }
        };
        let toggles_moved = self.adopt_toggles(idx);

        let entry = &mut self.entries[idx];
        let added = entry.push_address(address);
        Ok(AddOutcome {
            key: entry.key().to_string(),
            display_name: entry.display_name().to_string(),
            glyph: entry.glyph().to_string(),
            added,
            created,
            merged,
            renamed,
            toggles_moved,
        })
    }

    pub fn remove_address(&mut self, key: &str, address: &str) -> bool {
        match self.position(key) {
            Some(i) => self.entries[i].remove_address(address.trim()),
            None => false,
        }
    }

    pub fn remove_country(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    /// Addresses of one bucket; empty for an unknown key.
    pub fn list_by_country(&self, key: &str) -> &[String] {
        self.position(key)
            .map(|i| self.entries[i].addresses())
            .unwrap_or(&[])
    }

    pub fn country(&self, key: &str) -> Option<&CountryEntry> {
        self.position(key).map(|i| &self.entries[i])
    }

    pub fn all_countries(&self) -> &[CountryEntry] {
        &self.entries
    }

    pub fn total_addresses(&self) -> usize {
        self.entries.iter().map(CountryEntry::len).sum()
    }

    pub fn set_disabled(&mut self, key: &str, family: AddressFamily, disabled: bool) -> bool {
        let key = self.toggle_key(key);
        self.toggles.set_disabled(&key, family, disabled)
    }

    /// Lazily materializes a default toggle for unknown keys.
    pub fn is_disabled(&mut self, key: &str, family: AddressFamily) -> bool {
        let key = self.toggle_key(key);
        self.toggles.is_disabled(&key, family)
    }

    /// Side-effect free toggle lookup, resolved like `is_disabled`.
    pub fn toggle(&self, key: &str) -> Option<LocationToggle> {
        self.toggles.peek(&self.toggle_key(key))
    }

    /// Full-table pass: fold every bucket whose key denotes the same logical
    /// country as an older bucket into that older bucket, move stray toggles
    /// onto bucket keys and apply alias display names.
    pub fn reconcile(&mut self) -> Reconciled {
        let mut r = Reconciled::default();
        let mut i = 0;
        while i < self.entries.len() {
            let key = self.entries[i].key().to_string();
            let dups: Vec<usize> = (i + 1..self.entries.len())
                .filter(|&j| normalize::same_country(&key, self.entries[j].key()))
                .collect();
            r.buckets += self.merge_into(i, &dups);
            r.toggles += self.adopt_toggles(i);
            if let Ok(canon) = normalize::canonicalize(&key) {
                if let Some(forced) = canon.display_name {
                    if self.entries[i].set_display_name(forced) {
                        r.renamed += 1;
                    }
                }
            }
            i += 1;
        }
        r
    }

    /// Exact key first, then a case/underscore-insensitive match, then any
    /// bucket denoting the same logical country.
    fn position(&self, key: &str) -> Option<usize> {
        let key = key.trim();
        self.entries
            .iter()
            .position(|e| e.key() == key)
            .or_else(|| {
                let f = normalize::fold(key);
                self.entries.iter().position(|e| normalize::fold(e.key()) == f)
            })
            .or_else(|| {
                self.entries
                    .iter()
                    .position(|e| normalize::same_country(e.key(), key))
            })
    }

    /// Bucket key if a bucket matches, else an existing toggle key, else `key`.
    fn toggle_key(&self, key: &str) -> String {
        let key = key.trim();
        match self.position(key) {
            Some(i) => self.entries[i].key().to_string(),
            None => self.toggles.resolve(key).unwrap_or(key).to_string(),
        }
    }

    /// Move every toggle stored under another spelling of bucket `idx`'s
    /// country onto the bucket key.
    fn adopt_toggles(&mut self, idx: usize) -> usize {
        let key = self.entries[idx].key().to_string();
        let strays: Vec<String> = self
            .toggles
            .as_map()
            .keys()
            .filter(|k| k.as_str() != key && normalize::same_country(k, &key))
            .cloned()
            .collect();
        strays
            .iter()
            .filter(|k| self.toggles.absorb(k, &key))
            .count()
    }

    /// Fold `others` (all > survivor, ascending) into `survivor`, oldest first.
    fn merge_into(&mut self, survivor: usize, others: &[usize]) -> usize {
        if others.is_empty() {
            return 0;
        }
        // Удаляем с конца, чтобы индексы не съезжали, затем вливаем в порядке создания.
        let mut taken: Vec<CountryEntry> = others
            .iter()
            .rev()
            .map(|&i| self.entries.remove(i))
            .collect();
        taken.reverse();
        let n = taken.len();
        for e in taken {
            self.entries[survivor].absorb(e);
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy(entries: Vec<(&str, &str, Vec<&str>)>) -> AddressInventory {
        legacy_with_toggles(entries, LocationToggles::default())
    }

    fn legacy_with_toggles(
        entries: Vec<(&str, &str, Vec<&str>)>,
        toggles: LocationToggles,
    ) -> AddressInventory {
        let entries = entries
            .into_iter()
            .map(|(k, n, ips)| {
                CountryEntry::from_parts(
                    k.to_string(),
                    n.to_string(),
                    String::new(),
                    ips.into_iter().map(String::from).collect(),
                )
            })
            .collect();
        AddressInventory::from_parts(entries, toggles)
    }

    #[test]
    fn same_address_twice_is_stored_once() {
        let mut inv = AddressInventory::new();
        let a = inv.add_address("Germany", "🇩🇪", "5.5.5.5").unwrap();
        assert!(a.created && a.added);
        let b = inv.add_address("germany", "🇩🇪", " 5.5.5.5 ").unwrap();
        assert!(!b.changed());
        assert_eq!(inv.list_by_country("germany"), ["5.5.5.5"]);
        assert_eq!(inv.all_countries().len(), 1);
    }

    #[test]
    fn alias_forces_display_name() {
        let mut inv = AddressInventory::new();
        let o = inv.add_address("ksa", "🇸🇦", "1.1.1.1").unwrap();
        assert_eq!(o.key, "SA");
        assert_eq!(o.display_name, "Saudi Arabia");
    }

    #[test]
    fn insert_merges_pre_alias_buckets_into_oldest() {
        let mut inv = legacy(vec![
            ("germany", "Germany", vec!["9.9.9.9"]),
            ("saudi_arabia", "saudi arabia", vec!["1.0.0.1", "1.0.0.2"]),
            ("ksa", "KSA", vec!["1.0.0.2", "1.0.0.3"]),
        ]);
        let o = inv.add_address("Saudi Arabia", "🇸🇦", "1.0.0.4").unwrap();
        assert_eq!(o.key, "saudi_arabia");
        assert_eq!(o.merged, 1);
        assert!(!o.created);
        assert_eq!(inv.all_countries().len(), 2);
        assert_eq!(
            inv.list_by_country("saudi_arabia"),
            ["1.0.0.1", "1.0.0.2", "1.0.0.3", "1.0.0.4"]
        );
    }

    #[test]
    fn reconcile_collapses_collisions_once() {
        let mut inv = legacy(vec![
            ("New_Zealand", "New Zealand", vec!["a"]),
            ("sa", "SA", vec!["x"]),
            ("new_zealand", "new zealand", vec!["b", "a"]),
            ("saudi", "Saudi", vec!["y"]),
            ("SaudiArabia", "SaudiArabia", vec!["x", "z"]),
        ]);
        let r = inv.reconcile();
        assert_eq!(r.buckets, 3);
        assert_eq!(r.renamed, 1);
        let keys: Vec<&str> = inv.all_countries().iter().map(|e| e.key()).collect();
        assert_eq!(keys, ["New_Zealand", "sa"]);
        assert_eq!(inv.list_by_country("New_Zealand"), ["a", "b"]);
        assert_eq!(inv.list_by_country("sa"), ["x", "y", "z"]);
        assert_eq!(inv.country("sa").unwrap().display_name(), "Saudi Arabia");
        assert!(!inv.reconcile().changed());
    }

    #[test]
    fn pre_alias_survivor_answers_to_canonical_key() {
        let mut inv = legacy(vec![
            ("saudi_arabia", "saudi arabia", vec!["1.0.0.1", "1.0.0.2"]),
            ("ksa", "KSA", vec!["1.0.0.3"]),
        ]);
        let o = inv.add_address("KSA", "🇸🇦", "1.0.0.3").unwrap();
        assert_eq!(o.key, "saudi_arabia");
        assert!(o.renamed && o.changed());
        assert_eq!(o.display_name, "Saudi Arabia");
        assert_eq!(inv.list_by_country("SA"), ["1.0.0.1", "1.0.0.2", "1.0.0.3"]);
        assert_eq!(inv.list_by_country("Saudi Arabia").len(), 3);
        assert!(inv.remove_address("SA", "1.0.0.2"));
        assert!(inv.remove_country("SA"));
        assert!(inv.all_countries().is_empty());
    }

    #[test]
    fn disabled_legacy_key_stays_disabled_after_reconcile() {
        let mut toggles = LocationToggles::default();
        toggles.set_disabled("ksa", AddressFamily::V4, true);
        toggles.set_disabled("narnia", AddressFamily::V6, true);
        let mut inv = legacy_with_toggles(
            vec![
                ("saudi_arabia", "saudi arabia", vec!["1.0.0.1"]),
                ("ksa", "KSA", vec!["1.0.0.2"]),
            ],
            toggles,
        );
        let r = inv.reconcile();
        assert_eq!(r.buckets, 1);
        assert_eq!(r.toggles, 1);
        assert!(inv.toggles().peek("ksa").is_none());
        assert_eq!(
            inv.toggles().peek("saudi_arabia"),
            Some(LocationToggle { v4_disabled: true, v6_disabled: false })
        );
        assert!(inv.is_disabled("SA", AddressFamily::V4));
        assert!(inv.is_disabled("ksa", AddressFamily::V4));
        // unrelated toggle untouched
        assert!(inv.toggles().peek("narnia").is_some());
        assert_eq!(inv.toggles().len(), 2);
    }

    #[test]
    fn toggles_resolve_like_buckets() {
        let mut inv = AddressInventory::new();
        assert!(inv.set_disabled("ksa", AddressFamily::V4, true));
        assert!(inv.is_disabled("KSA", AddressFamily::V4));
        assert!(inv.is_disabled("Saudi Arabia", AddressFamily::V4));
        assert!(!inv.set_disabled("sa", AddressFamily::V4, true));
        assert_eq!(inv.toggles().len(), 1);

        // a new bucket adopts the toggle stored under another spelling
        let o = inv.add_address("Saudi Arabia", "🇸🇦", "1.1.1.1").unwrap();
        assert_eq!(o.key, "SA");
        assert_eq!(o.toggles_moved, 1);
        assert!(inv.toggles().peek("ksa").is_none());
        assert_eq!(inv.toggle("ksa"), Some(LocationToggle { v4_disabled: true, v6_disabled: false }));
        let o = inv.add_address("KSA", "🇸🇦", "1.1.1.2").unwrap();
        assert_eq!(o.toggles_moved, 0);
        assert_eq!(inv.toggles().len(), 1);
    }

    #[test]
    fn lookups_tolerate_case_and_underscores() {
        let mut inv = AddressInventory::new();
        inv.add_address("New Zealand", "", "7.7.7.7").unwrap();
        assert_eq!(inv.list_by_country("NewZealand"), ["7.7.7.7"]);
        assert!(inv.remove_address("new_zealand", "7.7.7.7"));
        assert!(!inv.remove_address("new_zealand", "7.7.7.7"));
        assert!(inv.remove_country("NEW_ZEALAND"));
        assert!(!inv.remove_country("new_zealand"));
        assert!(inv.list_by_country("new_zealand").is_empty());
    }

    #[test]
    fn rejections_happen_before_mutation() {
        let mut inv = AddressInventory::new();
        assert_eq!(
            inv.add_address("  ", "", "1.1.1.1"),
            Err(StoreError::MalformedCountryName("  ".into()))
        );
        assert_eq!(inv.add_address("Iran", "", "   "), Err(StoreError::EmptyAddress));
        assert!(inv.all_countries().is_empty());
    }

    #[test]
    fn address_mutations_keep_display_fields() {
        let mut inv = AddressInventory::new();
        inv.add_address("Turkey", "🇹🇷", "3.3.3.3").unwrap();
        inv.add_address("TURKEY", "??", "3.3.3.4").unwrap();
        inv.remove_address("turkey", "3.3.3.3");
        let e = inv.country("turkey").unwrap();
        assert_eq!(e.display_name(), "Turkey");
        assert_eq!(e.glyph(), "🇹🇷");
    }
}
