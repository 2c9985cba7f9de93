//! Subscriber registry.
//!
//! Состояния подписчика:
//!   Unregistered --redeem--> Active(plan) <--disable/enable--> Disabled(plan)
//!
//! The disabled set is orthogonal to the plan: disabling never touches the
//! plan or the balance, so enable restores exactly what was there.
//! Records are never deleted.

use std::collections::{BTreeMap, BTreeSet};

use crate::ledger::CodeKind;
use crate::util::now_stamp;

/// Balance reported for unlimited plans.
pub const UNLIMITED_BALANCE: u64 = 999_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    Unlimited,
    TokenBalance(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub id: i64,
    pub plan: Plan,
    pub joined_at: String,
    pub origin_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberStatus {
    Unregistered,
    Active(Plan),
    Disabled(Plan),
}

/// Effect of applying a code grant to a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantEffect {
    /// New record created.
    Created,
    /// Token plan switched to unlimited.
    Upgraded,
    /// Tokens added to an existing token plan.
    ToppedUp,
    /// Already unlimited; nothing to add.
    Unchanged,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriberRegistry {
    subscribers: BTreeMap<i64, Subscriber>,
    disabled: BTreeSet<i64>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted parts. Disabled ids without a record are
    /// dropped and returned so the caller can report them.
    pub(crate) fn from_parts(
        subscribers: impl IntoIterator<Item = Subscriber>,
        disabled: impl IntoIterator<Item = i64>,
    ) -> (Self, Vec<i64>) {
        let subscribers: BTreeMap<i64, Subscriber> =
            subscribers.into_iter().map(|s| (s.id, s)).collect();
        let (kept, orphans): (Vec<i64>, Vec<i64>) = disabled
            .into_iter()
            .partition(|id| subscribers.contains_key(id));
        (
            Self {
                subscribers,
                disabled: kept.into_iter().collect(),
            },
            orphans,
        )
    }

    /// Apply what a redeemed code grants. A TokenGrant(n) always grants
    /// exactly n to this subscriber, independent of other redeemers.
    /// Returns the effect and the resulting plan.
    pub fn apply_grant(&mut self, id: i64, kind: CodeKind, origin_code: &str) -> (GrantEffect, Plan) {
        let effect = self.grant(id, kind, origin_code);
        let plan = self
            .subscribers
            .get(&id)
            .map(|s| s.plan)
            .unwrap_or(Plan::TokenBalance(0));
        (effect, plan)
    }

    fn grant(&mut self, id: i64, kind: CodeKind, origin_code: &str) -> GrantEffect {
        match self.subscribers.get_mut(&id) {
            None => {
                let plan = match kind {
                    CodeKind::Unlimited => Plan::Unlimited,
                    CodeKind::TokenGrant(n) => Plan::TokenBalance(n),
                };
                self.subscribers.insert(
                    id,
                    Subscriber {
                        id,
                        plan,
                        joined_at: now_stamp(),
                        origin_code: origin_code.to_string(),
                    },
                );
                GrantEffect::Created
            }
            Some(s) => match (s.plan, kind) {
                (Plan::Unlimited, _) => GrantEffect::Unchanged,
                (Plan::TokenBalance(_), CodeKind::Unlimited) => {
                    s.plan = Plan::Unlimited;
                    GrantEffect::Upgraded
                }
                (Plan::TokenBalance(b), CodeKind::TokenGrant(n)) => {
                    s.plan = Plan::TokenBalance(b.saturating_add(n));
                    GrantEffect::ToppedUp
                }
            },
        }
    }

    /// Active -> Disabled. False if unregistered or already disabled.
    pub fn disable(&mut self, id: i64) -> bool {
        if !self.subscribers.contains_key(&id) {
            return false;
        }
        self.disabled.insert(id)
    }

    /// Disabled -> Active. False if unregistered or not disabled.
    pub fn enable(&mut self, id: i64) -> bool {
        self.disabled.remove(&id)
    }

    /// Add tokens to a token plan. No-op (false) for unregistered ids and
    /// unlimited plans.
    pub fn grant_tokens(&mut self, id: i64, amount: u64) -> bool {
        match self.subscribers.get_mut(&id) {
            Some(Subscriber {
                plan: Plan::TokenBalance(b),
                ..
            }) => {
                *b = b.saturating_add(amount);
                true
            }
            _ => false,
        }
    }

    /// Spend `amount` tokens.
    /// - Disabled/Unregistered: false.
    /// - Unlimited: true, nothing stored changes.
    /// - balance < amount: false, balance untouched.
    pub fn consume_tokens(&mut self, id: i64, amount: u64) -> bool {
        if self.disabled.contains(&id) {
            return false;
        }
        match self.subscribers.get_mut(&id) {
            None => false,
            Some(s) => match &mut s.plan {
                Plan::Unlimited => true,
                Plan::TokenBalance(b) if *b >= amount => {
                    *b -= amount;
                    true
                }
                Plan::TokenBalance(_) => false,
            },
        }
    }

    /// 0 unless Active; UNLIMITED_BALANCE for unlimited plans.
    pub fn token_balance(&self, id: i64) -> u64 {
        match self.status(id) {
            SubscriberStatus::Active(Plan::Unlimited) => UNLIMITED_BALANCE,
            SubscriberStatus::Active(Plan::TokenBalance(b)) => b,
            _ => 0,
        }
    }

    pub fn status(&self, id: i64) -> SubscriberStatus {
        match self.subscribers.get(&id) {
            None => SubscriberStatus::Unregistered,
            Some(s) if self.disabled.contains(&id) => SubscriberStatus::Disabled(s.plan),
            Some(s) => SubscriberStatus::Active(s.plan),
        }
    }

    pub fn get(&self, id: i64) -> Option<&Subscriber> {
        self.subscribers.get(&id)
    }

    pub fn is_registered(&self, id: i64) -> bool {
        self.subscribers.contains_key(&id)
    }

    pub fn is_active(&self, id: i64) -> bool {
        matches!(self.status(id), SubscriberStatus::Active(_))
    }

    pub fn is_disabled(&self, id: i64) -> bool {
        self.disabled.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subscriber> {
        self.subscribers.values()
    }

    pub fn disabled_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.disabled.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn disabled_len(&self) -> usize {
        self.disabled.len()
    }
}
