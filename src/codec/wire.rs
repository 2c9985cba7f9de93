//! codec/wire — on-disk records of the snapshot (serde, JSON).
//!
//! Совместимость:
//! - Every section and every "newer" field carries a serde default, so
//!   snapshots written by older versions load without failing:
//!     code:       used_count=0, created_at=<now>, redeemers=[]
//!     subscriber: joined_at="unknown", origin_code="unknown"
//! - Legacy field names are accepted via aliases (`used_by`, `joined_date`).
//! - A missing `version` means 1.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::activity::ActivityEvent;
use crate::inventory::{CountryEntry, LocationToggle};
use crate::ledger::{ActivationCode, CodeKind};
use crate::registry::{Plan, Subscriber};
use crate::util::{now_stamp, UNKNOWN};

pub const SNAPSHOT_VERSION: u32 = 2;

const KIND_UNLIMITED: &str = "unlimited";
const KIND_TOKEN: &str = "token";

fn default_version() -> u32 {
    1
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// Whole snapshot document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotDoc {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub codes: BTreeMap<String, CodeRecord>,
    #[serde(default)]
    pub subscribers: BTreeMap<i64, SubscriberRecord>,
    #[serde(default)]
    pub disabled: Vec<i64>,
    /// Creation order.
    #[serde(default)]
    pub countries: Vec<CountryRecord>,
    #[serde(default)]
    pub location_toggles: BTreeMap<String, LocationToggle>,
    #[serde(default)]
    pub endpoints: Vec<String>,
    /// Newest first.
    #[serde(default)]
    pub recent_activity: Vec<ActivityEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub tokens: u64,
    #[serde(default)]
    pub used_count: u64,
    #[serde(default = "now_stamp")]
    pub created_at: String,
    #[serde(default, alias = "used_by")]
    pub redeemers: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberRecord {
    #[serde(rename = "type")]
    pub plan: String,
    #[serde(default)]
    pub tokens: u64,
    #[serde(default = "unknown", alias = "joined_date")]
    pub joined_at: String,
    #[serde(default = "unknown")]
    pub origin_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub key: String,
    /// Empty/missing => the key is displayed.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub flag: String,
    #[serde(default)]
    pub ips: Vec<String>,
}

// ---------- domain -> wire ----------

impl From<&ActivationCode> for CodeRecord {
    fn from(c: &ActivationCode) -> Self {
        let (kind, tokens) = match c.kind {
            CodeKind::Unlimited => (KIND_UNLIMITED, 0),
            CodeKind::TokenGrant(n) => (KIND_TOKEN, n),
        };
        Self {
            kind: kind.to_string(),
            tokens,
            used_count: c.used_count,
            created_at: c.created_at.clone(),
            redeemers: c.redeemers.clone(),
        }
    }
}

impl From<&Subscriber> for SubscriberRecord {
    fn from(s: &Subscriber) -> Self {
        let (plan, tokens) = match s.plan {
            Plan::Unlimited => (KIND_UNLIMITED, 0),
            Plan::TokenBalance(n) => (KIND_TOKEN, n),
        };
        Self {
            plan: plan.to_string(),
            tokens,
            joined_at: s.joined_at.clone(),
            origin_code: s.origin_code.clone(),
        }
    }
}

impl From<&CountryEntry> for CountryRecord {
    fn from(e: &CountryEntry) -> Self {
        Self {
            key: e.key().to_string(),
            name: e.display_name().to_string(),
            flag: e.glyph().to_string(),
            ips: e.addresses().to_vec(),
        }
    }
}

// ---------- wire -> domain ----------

fn parse_kind(kind: &str, tokens: u64, what: &str, id: &str) -> Result<bool> {
    match kind.trim().to_ascii_lowercase().as_str() {
        KIND_UNLIMITED => Ok(true),
        KIND_TOKEN => Ok(false),
        other => Err(anyhow!(
            "{} '{}': unknown type '{}' (tokens={})",
            what,
            id,
            other,
            tokens
        )),
    }
}

impl CodeRecord {
    pub fn into_code(self, code: String) -> Result<ActivationCode> {
        let unlimited = parse_kind(&self.kind, self.tokens, "code", &code)?;
        Ok(ActivationCode {
            code,
            kind: if unlimited {
                CodeKind::Unlimited
            } else {
                CodeKind::TokenGrant(self.tokens)
            },
            used_count: self.used_count,
            created_at: self.created_at,
            redeemers: self.redeemers,
        })
    }
}

impl SubscriberRecord {
    pub fn into_subscriber(self, id: i64) -> Result<Subscriber> {
        let unlimited = parse_kind(&self.plan, self.tokens, "subscriber", &id.to_string())?;
        Ok(Subscriber {
            id,
            plan: if unlimited {
                Plan::Unlimited
            } else {
                Plan::TokenBalance(self.tokens)
            },
            joined_at: self.joined_at,
            origin_code: self.origin_code,
        })
    }
}

impl CountryRecord {
    pub fn into_entry(self) -> CountryEntry {
        let name = if self.name.trim().is_empty() {
            self.key.clone()
        } else {
            self.name
        };
        CountryEntry::from_parts(self.key, name, self.flag, self.ips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_code_record_backfills() {
        let r: CodeRecord = serde_json::from_str(r#"{"type":"token","tokens":500}"#).unwrap();
        assert_eq!(r.used_count, 0);
        assert!(r.redeemers.is_empty());
        assert!(!r.created_at.is_empty());
        let c = r.into_code("TOKEN500".into()).unwrap();
        assert_eq!(c.kind, CodeKind::TokenGrant(500));
    }

    #[test]
    fn legacy_aliases_accepted() {
        let r: CodeRecord =
            serde_json::from_str(r#"{"type":"unlimited","used_by":[3,4]}"#).unwrap();
        assert_eq!(r.redeemers, vec![3, 4]);
        let s: SubscriberRecord =
            serde_json::from_str(r#"{"type":"unlimited","joined_date":"2024-01-01"}"#).unwrap();
        assert_eq!(s.joined_at, "2024-01-01");
        assert_eq!(s.origin_code, "unknown");
    }

    #[test]
    fn unknown_type_is_an_error() {
        let r: CodeRecord = serde_json::from_str(r#"{"type":"lifetime"}"#).unwrap();
        assert!(r.into_code("X".into()).is_err());
    }

    #[test]
    fn missing_country_name_shows_key() {
        let r: CountryRecord = serde_json::from_str(r#"{"key":"germany","ips":["1.1.1.1"]}"#).unwrap();
        let e = r.into_entry();
        assert_eq!(e.display_name(), "germany");
        assert_eq!(e.addresses(), ["1.1.1.1"]);
    }
}
