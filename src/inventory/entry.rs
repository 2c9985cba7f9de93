//! inventory/entry — one country bucket.
//!
//! Key and glyph are fixed at creation. The display name only changes when
//! the alias table dictates one; address mutations only ever touch the
//! address list (updated in place, no record rebuild).

/// Country bucket: canonical key, display name, glyph and an ordered,
/// duplicate-free address list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryEntry {
    key: String,
    display_name: String,
    glyph: String,
    addresses: Vec<String>,
}

impl CountryEntry {
    pub fn new(key: impl Into<String>, display_name: impl Into<String>, glyph: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            glyph: glyph.into(),
            addresses: Vec::new(),
        }
    }

    /// Rebuild from persisted parts. Duplicate addresses are dropped
    /// (first occurrence wins), so a hand-edited snapshot cannot break the
    /// uniqueness invariant.
    pub(crate) fn from_parts(
        key: String,
        display_name: String,
        glyph: String,
        addresses: Vec<String>,
    ) -> Self {
        let mut e = Self::new(key, display_name, glyph);
        for a in addresses {
            e.push_address(&a);
        }
        e
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.addresses.iter().any(|a| a == address)
    }

    /// Append if not present. Returns true if the list changed.
    pub(crate) fn push_address(&mut self, address: &str) -> bool {
        if self.contains(address) {
            return false;
        }
        self.addresses.push(address.to_string());
        true
    }

    pub(crate) fn remove_address(&mut self, address: &str) -> bool {
        match self.addresses.iter().position(|a| a == address) {
            Some(i) => {
                self.addresses.remove(i);
                true
            }
            None => false,
        }
    }

    /// Returns true if the name changed.
    pub(crate) fn set_display_name(&mut self, name: &str) -> bool {
        if self.display_name == name {
            return false;
        }
        self.display_name = name.to_string();
        true
    }

    /// Union `other`'s addresses into self (first-seen order kept).
    /// Returns the number of addresses that were new to self.
    pub(crate) fn absorb(&mut self, other: CountryEntry) -> usize {
        let mut n = 0;
        for a in other.addresses {
            if self.push_address(&a) {
                n += 1;
            }
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_is_idempotent_and_ordered() {
        let mut e = CountryEntry::new("germany", "Germany", "🇩🇪");
        assert!(e.push_address("1.1.1.1"));
        assert!(e.push_address("2.2.2.2"));
        assert!(!e.push_address("1.1.1.1"));
        assert_eq!(e.addresses(), ["1.1.1.1", "2.2.2.2"]);
    }

    #[test]
    fn absorb_keeps_identity_fields() {
        let mut a = CountryEntry::from_parts(
            "saudi_arabia".into(),
            "saudi arabia".into(),
            "🇸🇦".into(),
            vec!["1.0.0.1".into(), "1.0.0.2".into()],
        );
        let b = CountryEntry::from_parts(
            "SA".into(),
            "Saudi Arabia".into(),
            "X".into(),
            vec!["1.0.0.2".into(), "1.0.0.3".into()],
        );
        assert_eq!(a.absorb(b), 1);
        assert_eq!(a.key(), "saudi_arabia");
        assert_eq!(a.display_name(), "saudi arabia");
        assert_eq!(a.glyph(), "🇸🇦");
        assert_eq!(a.addresses(), ["1.0.0.1", "1.0.0.2", "1.0.0.3"]);
    }

    #[test]
    fn from_parts_drops_duplicates() {
        let e = CountryEntry::from_parts(
            "x".into(),
            "X".into(),
            "".into(),
            vec!["a".into(), "b".into(), "a".into()],
        );
        assert_eq!(e.addresses(), ["a", "b"]);
    }
}
