//! inventory/toggle — per-location, per-family disable flags.
//!
//! Toggles are keyed independently of country buckets: a toggle may exist for
//! a key with no bucket and survives bucket removal. Callers resolve a
//! free-form key to a stored one first (`resolve`), with the same rules the
//! bucket lookup uses.
//!
//! `is_disabled` creates a default (enabled) toggle for an unknown key. The
//! front-end relies on every key it has asked about showing up in the toggle
//! table afterwards; the side effect stays inside this type.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => f.write_str("ipv4"),
            AddressFamily::V6 => f.write_str("ipv6"),
        }
    }
}

impl FromStr for AddressFamily {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "4" | "v4" | "ipv4" => Ok(AddressFamily::V4),
            "6" | "v6" | "ipv6" => Ok(AddressFamily::V6),
            other => Err(anyhow!("unknown address family '{}' (expected v4|v6)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationToggle {
    #[serde(default)]
    pub v4_disabled: bool,
    #[serde(default)]
    pub v6_disabled: bool,
}

impl LocationToggle {
    pub fn get(&self, family: AddressFamily) -> bool {
        match family {
            AddressFamily::V4 => self.v4_disabled,
            AddressFamily::V6 => self.v6_disabled,
        }
    }

    fn set(&mut self, family: AddressFamily, disabled: bool) {
        match family {
            AddressFamily::V4 => self.v4_disabled = disabled,
            AddressFamily::V6 => self.v6_disabled = disabled,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationToggles {
    map: BTreeMap<String, LocationToggle>,
}

impl LocationToggles {
    pub(crate) fn from_map(map: BTreeMap<String, LocationToggle>) -> Self {
        Self { map }
    }

    pub fn as_map(&self) -> &BTreeMap<String, LocationToggle> {
        &self.map
    }

    /// Returns true if the stored flag changed (a fresh entry counts as a change).
    pub fn set_disabled(&mut self, key: &str, family: AddressFamily, disabled: bool) -> bool {
        let fresh = !self.map.contains_key(key);
        let t = self.map.entry(key.to_string()).or_default();
        let before = t.get(family);
        t.set(family, disabled);
        fresh || before != disabled
    }

    /// Never fails for an unknown key; see module docs for the lazy insert.
    pub fn is_disabled(&mut self, key: &str, family: AddressFamily) -> bool {
        self.map.entry(key.to_string()).or_default().get(family)
    }

    /// Side-effect free lookup.
    pub fn peek(&self, key: &str) -> Option<LocationToggle> {
        self.map.get(key).copied()
    }

    /// Stored key for the same location as `key`: exact match, then
    /// case/underscore-insensitive, then same logical country.
    pub fn resolve(&self, key: &str) -> Option<&str> {
        let key = key.trim();
        if let Some((k, _)) = self.map.get_key_value(key) {
            return Some(k.as_str());
        }
        let f = normalize::fold(key);
        self.map
            .keys()
            .find(|k| normalize::fold(k) == f)
            .or_else(|| self.map.keys().find(|k| normalize::same_country(k, key)))
            .map(String::as_str)
    }

    /// Move the toggle stored under `from` onto `into`. Flags are OR-ed, so a
    /// location disabled under either key stays disabled.
    pub(crate) fn absorb(&mut self, from: &str, into: &str) -> bool {
        if from == into {
            return false;
        }
        let t = match self.map.remove(from) {
            Some(t) => t,
            None => return false,
        };
        let dst = self.map.entry(into.to_string()).or_default();
        dst.v4_disabled |= t.v4_disabled;
        dst.v6_disabled |= t.v6_disabled;
        true
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_key_is_enabled_and_materialized() {
        let mut t = LocationToggles::default();
        assert!(t.peek("germany").is_none());
        assert!(!t.is_disabled("germany", AddressFamily::V4));
        assert_eq!(t.peek("germany"), Some(LocationToggle::default()));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn families_are_independent() {
        let mut t = LocationToggles::default();
        assert!(t.set_disabled("SA", AddressFamily::V6, true));
        assert!(t.is_disabled("SA", AddressFamily::V6));
        assert!(!t.is_disabled("SA", AddressFamily::V4));
        assert!(!t.set_disabled("SA", AddressFamily::V6, true));
        assert!(t.set_disabled("SA", AddressFamily::V6, false));
    }

    #[test]
    fn resolve_follows_bucket_rules() {
        let mut t = LocationToggles::default();
        t.set_disabled("New_Zealand", AddressFamily::V4, true);
        t.set_disabled("SA", AddressFamily::V6, true);
        assert_eq!(t.resolve(" New_Zealand "), Some("New_Zealand"));
        assert_eq!(t.resolve("new zealand"), Some("New_Zealand"));
        assert_eq!(t.resolve("sa"), Some("SA"));
        assert_eq!(t.resolve("Saudi Arabia"), Some("SA"));
        assert_eq!(t.resolve("germany"), None);
    }

    #[test]
    fn absorb_ors_flags() {
        let mut t = LocationToggles::default();
        t.set_disabled("ksa", AddressFamily::V4, true);
        t.set_disabled("saudi_arabia", AddressFamily::V6, true);
        assert!(t.absorb("ksa", "saudi_arabia"));
        assert!(t.peek("ksa").is_none());
        assert_eq!(
            t.peek("saudi_arabia"),
            Some(LocationToggle { v4_disabled: true, v6_disabled: true })
        );
        assert!(!t.absorb("ksa", "saudi_arabia"));
        assert!(!t.absorb("saudi_arabia", "saudi_arabia"));
    }

    #[test]
    fn family_parse() {
        assert_eq!("v4".parse::<AddressFamily>().unwrap(), AddressFamily::V4);
        assert_eq!("IPv6".parse::<AddressFamily>().unwrap(), AddressFamily::V6);
        assert!("v5".parse::<AddressFamily>().is_err());
    }
}
