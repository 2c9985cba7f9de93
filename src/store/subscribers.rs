//! store/subscribers — subscriber status and token accounting.

use anyhow::Result;
use log::info;

use crate::metrics::record_tokens_consumed;
use crate::registry::{Plan, Subscriber, SubscriberStatus};

use super::core::Store;

impl Store {
    pub fn subscriber(&self, id: i64) -> Option<Subscriber> {
        self.read(|inner| inner.state.registry.get(id).cloned())
    }

    pub fn subscribers(&self) -> Vec<Subscriber> {
        self.read(|inner| inner.state.registry.iter().cloned().collect())
    }

    pub fn status(&self, id: i64) -> SubscriberStatus {
        self.read(|inner| inner.state.registry.status(id))
    }

    pub fn is_active(&self, id: i64) -> bool {
        self.read(|inner| inner.state.registry.is_active(id))
    }

    pub fn is_disabled(&self, id: i64) -> bool {
        self.read(|inner| inner.state.registry.is_disabled(id))
    }

    /// Suspend a registered subscriber. False if unregistered or already
    /// disabled; no record is ever created here.
    pub fn disable_subscriber(&self, id: i64) -> Result<bool> {
        let done = self.mutate("disable_subscriber", |inner| {
            let done = inner.state.registry.disable(id);
            Ok((done, done))
        })?;
        if done {
            info!("store: subscriber {} disabled", id);
        }
        Ok(done)
    }

    pub fn enable_subscriber(&self, id: i64) -> Result<bool> {
        let done = self.mutate("enable_subscriber", |inner| {
            let done = inner.state.registry.enable(id);
            Ok((done, done))
        })?;
        if done {
            info!("store: subscriber {} enabled", id);
        }
        Ok(done)
    }

    /// Add tokens to a token plan. False for unregistered ids and unlimited
    /// plans.
    pub fn grant_tokens(&self, id: i64, amount: u64) -> Result<bool> {
        self.mutate("grant_tokens", |inner| {
            let done = inner.state.registry.grant_tokens(id, amount);
            Ok((done, done && amount > 0))
        })
    }

    /// Spend `amount` tokens (see `SubscriberRegistry::consume_tokens`).
    /// Unlimited plans succeed without touching the snapshot.
    pub fn consume_tokens(&self, id: i64, amount: u64) -> Result<bool> {
        let ok = self.mutate("consume_tokens", |inner| {
            let reg = &mut inner.state.registry;
            let metered = matches!(reg.status(id), SubscriberStatus::Active(Plan::TokenBalance(_)));
            let ok = reg.consume_tokens(id, amount);
            Ok((ok, ok && metered && amount > 0))
        })?;
        if ok {
            record_tokens_consumed(amount);
        }
        Ok(ok)
    }

    /// 0 unless active; `UNLIMITED_BALANCE` for unlimited plans.
    pub fn token_balance(&self, id: i64) -> u64 {
        self.read(|inner| inner.state.registry.token_balance(id))
    }
}
