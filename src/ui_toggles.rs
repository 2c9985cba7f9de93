//! UI toggle document: a fixed set of named front-end affordances, each with
//! a "disabled" flag, kept in its own small JSON file next to the snapshot.
//!
//! Формат (pretty JSON):
//! {
//!   "generate_ipv6": false,
//!   "get_ipv4": true,
//!   ...
//! }
//! Missing names default to false (enabled); unknown names are ignored.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::codec::write_atomic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affordance {
    GenerateIpv6,
    GetIpv4,
    Wireguard,
    UserAccount,
    Activate,
    Support,
}

impl Affordance {
    pub const ALL: [Affordance; 6] = [
        Affordance::GenerateIpv6,
        Affordance::GetIpv4,
        Affordance::Wireguard,
        Affordance::UserAccount,
        Affordance::Activate,
        Affordance::Support,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Affordance::GenerateIpv6 => "generate_ipv6",
            Affordance::GetIpv4 => "get_ipv4",
            Affordance::Wireguard => "wireguard",
            Affordance::UserAccount => "user_account",
            Affordance::Activate => "activate",
            Affordance::Support => "support",
        }
    }
}

impl fmt::Display for Affordance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Affordance {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        Affordance::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| anyhow!("unknown toggle '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiToggles {
    generate_ipv6: bool,
    get_ipv4: bool,
    wireguard: bool,
    user_account: bool,
    activate: bool,
    support: bool,
}

impl UiToggles {
    fn slot(&mut self, a: Affordance) -> &mut bool {
        match a {
            Affordance::GenerateIpv6 => &mut self.generate_ipv6,
            Affordance::GetIpv4 => &mut self.get_ipv4,
            Affordance::Wireguard => &mut self.wireguard,
            Affordance::UserAccount => &mut self.user_account,
            Affordance::Activate => &mut self.activate,
            Affordance::Support => &mut self.support,
        }
    }

    pub fn is_disabled(&self, a: Affordance) -> bool {
        match a {
            Affordance::GenerateIpv6 => self.generate_ipv6,
            Affordance::GetIpv4 => self.get_ipv4,
            Affordance::Wireguard => self.wireguard,
            Affordance::UserAccount => self.user_account,
            Affordance::Activate => self.activate,
            Affordance::Support => self.support,
        }
    }

    /// Returns true if the flag changed.
    pub fn set(&mut self, a: Affordance, disabled: bool) -> bool {
        let slot = self.slot(a);
        let changed = *slot != disabled;
        *slot = disabled;
        changed
    }

    /// (affordance, disabled) for the whole fixed set.
    pub fn entries(&self) -> Vec<(Affordance, bool)> {
        Affordance::ALL
            .into_iter()
            .map(|a| (a, self.is_disabled(a)))
            .collect()
    }

    /// Missing file => all enabled.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parse toggle document {}", path.display()))
    }

    pub fn save(&self, path: &Path, fsync: bool) -> Result<()> {
        let data = serde_json::to_vec_pretty(self).context("serialize toggle document")?;
        write_atomic(path, &data, fsync)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for a in Affordance::ALL {
            assert_eq!(a.name().parse::<Affordance>().unwrap(), a);
        }
        assert!("admin_panel".parse::<Affordance>().is_err());
    }

    #[test]
    fn partial_document_defaults_to_enabled() {
        let t: UiToggles = serde_json::from_str(r#"{"get_ipv4": true, "legacy": true}"#).unwrap();
        assert!(t.is_disabled(Affordance::GetIpv4));
        assert!(!t.is_disabled(Affordance::Support));
    }

    #[test]
    fn set_reports_change() {
        let mut t = UiToggles::default();
        assert!(t.set(Affordance::Wireguard, true));
        assert!(!t.set(Affordance::Wireguard, true));
        assert!(t.entries().contains(&(Affordance::Wireguard, true)));
    }
}
