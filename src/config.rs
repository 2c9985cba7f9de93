//! Centralized configuration and builder for TokenGateDB.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - StoreConfig::from_env() reads the TG_* env vars on top of defaults.
//! - StoreBuilder returns a StoreConfig (or opens the Store directly).
//!
//! Defaults:
//! - snapshot_path = bot_database.json
//! - ui_toggles_path = ui_toggles.json
//! - fsync = true (every save is durable before the mutating call returns)
//! - activity_capacity = 20
//! - seed_default_codes = false

use anyhow::Result;
use std::fmt;
use std::path::PathBuf;

use crate::activity::DEFAULT_ACTIVITY_CAPACITY;
use crate::store::Store;
use crate::util::parse_bool_flag;

pub const DEFAULT_SNAPSHOT_FILE: &str = "bot_database.json";
pub const DEFAULT_UI_TOGGLES_FILE: &str = "ui_toggles.json";

/// Top-level configuration for the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Snapshot file.
    /// Env: TG_SNAPSHOT_PATH
    pub snapshot_path: PathBuf,

    /// Front-end toggle document.
    /// Env: TG_UI_TOGGLES_PATH
    pub ui_toggles_path: PathBuf,

    /// fsync tmp file and parent directory on every save.
    /// Env: TG_FSYNC (default true; "1|true|on|yes" => true)
    pub fsync: bool,

    /// Recent-activity queue length (min 1).
    /// Env: TG_ACTIVITY_CAPACITY (default 20)
    pub activity_capacity: usize,

    /// Define the stock vouchers at open if they are missing.
    /// Env: TG_SEED_CODES (default false)
    pub seed_default_codes: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_FILE),
            ui_toggles_path: PathBuf::from(DEFAULT_UI_TOGGLES_FILE),
            fsync: true,
            activity_capacity: DEFAULT_ACTIVITY_CAPACITY,
            seed_default_codes: false,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as from_env, with an injectable lookup (tests).
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(get: F) -> Self {
        let mut cfg = Self::default();

        if let Some(v) = get("TG_SNAPSHOT_PATH") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.snapshot_path = PathBuf::from(s);
            }
        }

        if let Some(v) = get("TG_UI_TOGGLES_PATH") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.ui_toggles_path = PathBuf::from(s);
            }
        }

        if let Some(v) = get("TG_FSYNC") {
            cfg.fsync = parse_bool_flag(&v);
        }

        if let Some(v) = get("TG_ACTIVITY_CAPACITY") {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.activity_capacity = n.max(1);
            }
        }

        if let Some(v) = get("TG_SEED_CODES") {
            cfg.seed_default_codes = parse_bool_flag(&v);
        }

        cfg
    }

    /// Put both files into `dir` under their default names.
    pub fn in_dir<P: Into<PathBuf>>(dir: P) -> Self {
        let dir = dir.into();
        Self {
            snapshot_path: dir.join(DEFAULT_SNAPSHOT_FILE),
            ui_toggles_path: dir.join(DEFAULT_UI_TOGGLES_FILE),
            ..Self::default()
        }
    }

    // Fluent setters (builder-style) to override specific fields.

    pub fn with_snapshot_path<P: Into<PathBuf>>(mut self, p: P) -> Self {
        self.snapshot_path = p.into();
        self
    }

    pub fn with_ui_toggles_path<P: Into<PathBuf>>(mut self, p: P) -> Self {
        self.ui_toggles_path = p.into();
        self
    }

    pub fn with_fsync(mut self, on: bool) -> Self {
        self.fsync = on;
        self
    }

    pub fn with_activity_capacity(mut self, n: usize) -> Self {
        self.activity_capacity = n.max(1);
        self
    }

    pub fn with_seed_default_codes(mut self, on: bool) -> Self {
        self.seed_default_codes = on;
        self
    }

    /// Lock file guarding single-process access: <snapshot>.lock
    pub fn lock_path(&self) -> PathBuf {
        crate::lock::lock_file_path(&self.snapshot_path)
    }
}

impl fmt::Display for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StoreConfig {{ \
             snapshot_path: {}, \
             ui_toggles_path: {}, \
             fsync: {}, \
             activity_capacity: {}, \
             seed_default_codes: {} \
             }}",
            self.snapshot_path.display(),
            self.ui_toggles_path.display(),
            self.fsync,
            self.activity_capacity,
            self.seed_default_codes,
        )
    }
}

/// Lightweight builder that produces a StoreConfig.
/// Store exposes `Store::builder()` returning this builder.
#[derive(Clone, Debug)]
pub struct StoreBuilder {
    cfg: StoreConfig,
}

impl Default for StoreBuilder {
    fn default() -> Self {
        // Start from env, then allow overrides.
        Self {
            cfg: StoreConfig::from_env(),
        }
    }
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a clean default (without reading env).
    pub fn from_default() -> Self {
        Self {
            cfg: StoreConfig::default(),
        }
    }

    pub fn snapshot_path<P: Into<PathBuf>>(mut self, p: P) -> Self {
        self.cfg.snapshot_path = p.into();
        self
    }

    pub fn ui_toggles_path<P: Into<PathBuf>>(mut self, p: P) -> Self {
        self.cfg.ui_toggles_path = p.into();
        self
    }

    pub fn fsync(mut self, on: bool) -> Self {
        self.cfg.fsync = on;
        self
    }

    pub fn activity_capacity(mut self, n: usize) -> Self {
        self.cfg.activity_capacity = n.max(1);
        self
    }

    pub fn seed_default_codes(mut self, on: bool) -> Self {
        self.cfg.seed_default_codes = on;
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> StoreConfig {
        self.cfg
    }

    /// Finish the builder and open the store.
    pub fn open(self) -> Result<Store> {
        Store::open(self.cfg)
    }
}
