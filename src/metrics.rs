//! Lightweight global metrics for TokenGateDB.
//!
//! Потокобезопасные атомарные счётчики для подсистем:
//! - Snapshot (load/save)
//! - Codes / redemption
//! - Subscribers (token consumption)
//! - Inventory (addresses, bucket merges)

use std::sync::atomic::{AtomicU64, Ordering};

// ----- Snapshot -----
static SNAPSHOT_LOADS: AtomicU64 = AtomicU64::new(0);
static SNAPSHOT_LOAD_FAILURES: AtomicU64 = AtomicU64::new(0);
static SNAPSHOT_SAVES: AtomicU64 = AtomicU64::new(0);
static SNAPSHOT_SAVE_FAILURES: AtomicU64 = AtomicU64::new(0);
static SNAPSHOT_BYTES_WRITTEN: AtomicU64 = AtomicU64::new(0);

// ----- Codes -----
static REDEMPTIONS: AtomicU64 = AtomicU64::new(0);
static REDEMPTIONS_REJECTED: AtomicU64 = AtomicU64::new(0);

// ----- Subscribers -----
static TOKENS_CONSUMED: AtomicU64 = AtomicU64::new(0);

// ----- Inventory -----
static ADDRESSES_ADDED: AtomicU64 = AtomicU64::new(0);
static BUCKETS_MERGED: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    // Snapshot
    pub snapshot_loads: u64,
    pub snapshot_load_failures: u64,
    pub snapshot_saves: u64,
    pub snapshot_save_failures: u64,
    pub snapshot_bytes_written: u64,

    // Codes
    pub redemptions: u64,
    pub redemptions_rejected: u64,

    // Subscribers
    pub tokens_consumed: u64,

    // Inventory
    pub addresses_added: u64,
    pub buckets_merged: u64,
}

impl MetricsSnapshot {
    pub fn avg_snapshot_bytes(&self) -> f64 {
        if self.snapshot_saves == 0 {
            0.0
        } else {
            self.snapshot_bytes_written as f64 / self.snapshot_saves as f64
        }
    }
}

// ----- Recorders (Snapshot) -----
pub fn record_snapshot_load() {
    SNAPSHOT_LOADS.fetch_add(1, Ordering::Relaxed);
}
pub fn record_snapshot_load_failure() {
    SNAPSHOT_LOAD_FAILURES.fetch_add(1, Ordering::Relaxed);
}
pub fn record_snapshot_save(bytes: usize) {
    SNAPSHOT_SAVES.fetch_add(1, Ordering::Relaxed);
    SNAPSHOT_BYTES_WRITTEN.fetch_add(bytes as u64, Ordering::Relaxed);
}
pub fn record_snapshot_save_failure() {
    SNAPSHOT_SAVE_FAILURES.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Codes) -----
pub fn record_redemption() {
    REDEMPTIONS.fetch_add(1, Ordering::Relaxed);
}
pub fn record_redemption_rejected() {
    REDEMPTIONS_REJECTED.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Subscribers) -----
pub fn record_tokens_consumed(n: u64) {
    TOKENS_CONSUMED.fetch_add(n, Ordering::Relaxed);
}

// ----- Recorders (Inventory) -----
pub fn record_address_added() {
    ADDRESSES_ADDED.fetch_add(1, Ordering::Relaxed);
}
pub fn record_buckets_merged(n: usize) {
    BUCKETS_MERGED.fetch_add(n as u64, Ordering::Relaxed);
}

/// Снимок всех счётчиков.
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        snapshot_loads: SNAPSHOT_LOADS.load(Ordering::Relaxed),
        snapshot_load_failures: SNAPSHOT_LOAD_FAILURES.load(Ordering::Relaxed),
        snapshot_saves: SNAPSHOT_SAVES.load(Ordering::Relaxed),
        snapshot_save_failures: SNAPSHOT_SAVE_FAILURES.load(Ordering::Relaxed),
        snapshot_bytes_written: SNAPSHOT_BYTES_WRITTEN.load(Ordering::Relaxed),
        redemptions: REDEMPTIONS.load(Ordering::Relaxed),
        redemptions_rejected: REDEMPTIONS_REJECTED.load(Ordering::Relaxed),
        tokens_consumed: TOKENS_CONSUMED.load(Ordering::Relaxed),
        addresses_added: ADDRESSES_ADDED.load(Ordering::Relaxed),
        buckets_merged: BUCKETS_MERGED.load(Ordering::Relaxed),
    }
}
