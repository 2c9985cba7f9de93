//! store/codes — activation codes and redemption.

use anyhow::Result;
use log::{debug, info};

use crate::ledger::{ActivationCode, CodeKind};
use crate::metrics::{record_redemption, record_redemption_rejected};
use crate::registry::{GrantEffect, Plan};

use super::core::Store;

/// Stock vouchers defined by `seed_default_codes`.
pub const DEFAULT_CODES: [(&str, CodeKind); 5] = [
    ("UNLIMITED2024", CodeKind::Unlimited),
    ("VIP2024", CodeKind::Unlimited),
    ("PREMIUM2024", CodeKind::Unlimited),
    ("TOKEN500", CodeKind::TokenGrant(500)),
    ("TOKEN1000", CodeKind::TokenGrant(1000)),
];

/// Outcome of `Store::redeem_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redemption {
    /// First redemption for this subscriber; record created with `Plan`.
    Activated(Plan),
    /// Existing subscriber; plan after the grant (topped up, upgraded or
    /// already unlimited).
    ToppedUp(Plan),
    UnknownCode,
    /// TokenGrant(0).
    ZeroGrant,
    /// This subscriber already redeemed this code.
    AlreadyRedeemed,
    SubscriberDisabled,
}

impl Redemption {
    pub fn is_success(&self) -> bool {
        matches!(self, Redemption::Activated(_) | Redemption::ToppedUp(_))
    }
}

impl Store {
    /// Define (or redefine) a code. Returns true if it was new.
    pub fn define_code(&self, code: &str, kind: CodeKind) -> Result<bool> {
        self.mutate("define_code", |inner| {
            let existed = inner.state.ledger.get(code).map(|c| c.kind);
            let created = inner.state.ledger.define(code, kind)?;
            let changed = created || existed != Some(kind);
            Ok((created, changed))
        })
    }

    /// Redeem `code` for subscriber `id`.
    ///
    /// On success the code's used_count grows by one, `id` is appended to its
    /// redeemers, and the subscriber receives exactly what the code grants.
    /// Rejections touch nothing.
    pub fn redeem_code(&self, code: &str, id: i64) -> Result<Redemption> {
        let out = self.mutate("redeem_code", |inner| {
            let st = &mut inner.state;

            let kind = match st.ledger.get(code) {
                None => return Ok((Redemption::UnknownCode, false)),
                Some(c) if c.redeemed_by(id) => return Ok((Redemption::AlreadyRedeemed, false)),
                Some(c) => c.kind,
            };
            if kind == CodeKind::TokenGrant(0) {
                return Ok((Redemption::ZeroGrant, false));
            }
            if st.registry.is_disabled(id) {
                return Ok((Redemption::SubscriberDisabled, false));
            }

            let snapshot = match st.ledger.redeem(code) {
                Some(c) => c,
                None => return Ok((Redemption::UnknownCode, false)),
            };
            st.ledger.record_redeemer(&snapshot.code, id);
            let (effect, plan) = st.registry.apply_grant(id, snapshot.kind, &snapshot.code);
            debug!(
                "store: code {} ({}) redeemed by {} -> {:?}",
                snapshot.code, snapshot.kind, id, effect
            );
            let r = match effect {
                GrantEffect::Created => Redemption::Activated(plan),
                GrantEffect::Upgraded | GrantEffect::ToppedUp | GrantEffect::Unchanged => {
                    Redemption::ToppedUp(plan)
                }
            };
            Ok((r, true))
        })?;

        if out.is_success() {
            record_redemption();
        } else {
            record_redemption_rejected();
        }
        Ok(out)
    }

    pub fn remove_code(&self, code: &str) -> Result<bool> {
        self.mutate("remove_code", |inner| {
            let removed = inner.state.ledger.remove(code);
            Ok((removed, removed))
        })
    }

    /// Change the kind of an existing code. False for unknown codes.
    pub fn update_code(&self, code: &str, kind: CodeKind) -> Result<bool> {
        self.mutate("update_code", |inner| {
            let found = inner.state.ledger.update(code, kind);
            Ok((found, found))
        })
    }

    pub fn code(&self, code: &str) -> Option<ActivationCode> {
        self.read(|inner| inner.state.ledger.get(code).cloned())
    }

    pub fn codes(&self) -> Vec<ActivationCode> {
        self.read(|inner| inner.state.ledger.iter().cloned().collect())
    }

    /// Define the stock vouchers that are missing. Existing codes are left
    /// alone. Returns how many were added.
    pub fn seed_default_codes(&self) -> Result<usize> {
        let added = self.mutate("seed_default_codes", |inner| {
            let mut added = 0;
            for (code, kind) in DEFAULT_CODES {
                if inner.state.ledger.get(code).is_none() && inner.state.ledger.define(code, kind)? {
                    added += 1;
                }
            }
            Ok((added, added > 0))
        })?;
        if added > 0 {
            info!("store: {} default code(s) defined", added);
        }
        Ok(added)
    }
}
