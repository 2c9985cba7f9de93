//! Activation code ledger.
//!
//! Codes are reusable vouchers: redemption bumps `used_count` and records the
//! redeemer but never deletes the code. `used_count` only grows.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::StoreError;
use crate::util::now_stamp;

/// What a code grants on redemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Unlimited,
    /// Fixed amount granted to every redeemer; never drawn down.
    TokenGrant(u64),
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeKind::Unlimited => f.write_str("unlimited"),
            CodeKind::TokenGrant(n) => write!(f, "token({n})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationCode {
    pub code: String,
    pub kind: CodeKind,
    pub used_count: u64,
    pub created_at: String,
    /// Subscriber ids in redemption order.
    pub redeemers: Vec<i64>,
}

impl ActivationCode {
    pub fn new(code: impl Into<String>, kind: CodeKind) -> Self {
        Self {
            code: code.into(),
            kind,
            used_count: 0,
            created_at: now_stamp(),
            redeemers: Vec::new(),
        }
    }

    pub fn redeemed_by(&self, id: i64) -> bool {
        self.redeemers.contains(&id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeLedger {
    codes: BTreeMap<String, ActivationCode>,
}

impl CodeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_codes(codes: impl IntoIterator<Item = ActivationCode>) -> Self {
        Self {
            codes: codes.into_iter().map(|c| (c.code.clone(), c)).collect(),
        }
    }

    /// Define a code. An existing code keeps its history (counters,
    /// redeemers, created_at) and only takes the new kind.
    /// Returns true if the code was new.
    pub fn define(&mut self, code: &str, kind: CodeKind) -> Result<bool, StoreError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(StoreError::EmptyCode);
        }
        if let Some(c) = self.codes.get_mut(code) {
            c.kind = kind;
            return Ok(false);
        }
        self.codes
            .insert(code.to_string(), ActivationCode::new(code, kind));
        Ok(true)
    }

    /// Count one redemption and return a copy of the record.
    /// Unknown code => None, nothing changes.
    pub fn redeem(&mut self, code: &str) -> Option<ActivationCode> {
        let c = self.codes.get_mut(code.trim())?;
        c.used_count = c.used_count.saturating_add(1);
        Some(c.clone())
    }

    pub fn remove(&mut self, code: &str) -> bool {
        self.codes.remove(code.trim()).is_some()
    }

    /// Change the kind only.
    pub fn update(&mut self, code: &str, kind: CodeKind) -> bool {
        match self.codes.get_mut(code.trim()) {
            Some(c) => {
                c.kind = kind;
                true
            }
            None => false,
        }
    }

    /// Append `id` to the redeemer list (once). False for unknown codes or
    /// repeated ids.
    pub fn record_redeemer(&mut self, code: &str, id: i64) -> bool {
        match self.codes.get_mut(code.trim()) {
            Some(c) if !c.redeemed_by(id) => {
                c.redeemers.push(id);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, code: &str) -> Option<&ActivationCode> {
        self.codes.get(code.trim())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivationCode> {
        self.codes.values()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
