//! store — the public façade over all store components.
//!
//! Разделение по подмодулям:
//! - core.rs        — Store, Inner, lock/mutate/persist helpers
//! - open.rs        — open (load-or-initialize, quarantine, startup reconcile, seeding)
//! - codes.rs       — activation codes and redemption
//! - subscribers.rs — subscriber status and token accounting
//! - inventory.rs   — address inventory and location toggles
//! - misc.rs        — endpoints, recent activity, UI toggles, stats
//!
//! Every mutating call is one critical section: lock, mutate in memory,
//! save the whole snapshot, unlock. A failed save is returned to the caller;
//! the in-memory change stays.

pub mod codes;
pub mod core;
pub mod inventory;
pub mod misc;
pub mod open;
pub mod subscribers;

pub use self::codes::{Redemption, DEFAULT_CODES};
pub use self::core::Store;
pub use self::misc::StoreStats;
