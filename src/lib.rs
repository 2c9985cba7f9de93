#![allow(non_snake_case)]

// Базовые модули
pub mod config;
pub mod error;
pub mod lock;
pub mod metrics;
pub mod util; // src/util/mod.rs

// Компоненты состояния
pub mod activity;
pub mod endpoints;
pub mod inventory; // src/inventory/{mod,entry,toggle}.rs
pub mod ledger;
pub mod normalize;
pub mod registry;
pub mod ui_toggles;

// Снапшот и фасад
pub mod codec; // src/codec/{mod,wire}.rs
pub mod store; // src/store/{mod,core,open,codes,subscribers,inventory,misc}.rs

// Удобные реэкспорты
pub use activity::{ActivityEvent, RecentActivity};
pub use codec::{SnapshotCodec, StoreState};
pub use config::{StoreBuilder, StoreConfig};
pub use error::StoreError;
pub use inventory::{
    AddOutcome, AddressFamily, AddressInventory, CountryEntry, LocationToggle, Reconciled,
};
pub use ledger::{ActivationCode, CodeKind, CodeLedger};
pub use registry::{Plan, Subscriber, SubscriberRegistry, SubscriberStatus, UNLIMITED_BALANCE};
pub use store::{Redemption, Store, StoreStats};
pub use ui_toggles::{Affordance, UiToggles};
