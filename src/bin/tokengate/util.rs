use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use TokenGateDB::lock::{acquire_exclusive_lock, try_acquire_exclusive_lock, LockGuard};
use TokenGateDB::{CodeKind, Plan, Store, StoreConfig, UNLIMITED_BALANCE};

use crate::cli::KindArgs;

/// File overrides from the command line.
pub struct Files {
    pub path: Option<PathBuf>,
    pub toggles: Option<PathBuf>,
    /// Block on the lock instead of failing fast.
    pub wait: bool,
}

impl Files {
    pub fn config(&self) -> StoreConfig {
        let mut cfg = StoreConfig::from_env();
        if let Some(p) = &self.path {
            cfg = cfg.with_snapshot_path(p);
        }
        if let Some(p) = &self.toggles {
            cfg = cfg.with_ui_toggles_path(p);
        }
        cfg
    }
}

/// Take the single-instance lock, then open the store. The guard must
/// outlive every use of the store.
pub fn open_locked(files: &Files) -> Result<(LockGuard, Store)> {
    let cfg = files.config();
    let guard = if files.wait {
        acquire_exclusive_lock(&cfg.snapshot_path)?
    } else {
        try_acquire_exclusive_lock(&cfg.snapshot_path)
            .context("snapshot is in use by another process (use --wait to block)")?
    };
    let store = Store::open(cfg)?;
    Ok((guard, store))
}

/// clap enforces exactly one of the two flags; anything else is refused here too.
pub fn kind_of(k: KindArgs) -> Result<CodeKind> {
    match (k.unlimited, k.tokens) {
        (true, None) => Ok(CodeKind::Unlimited),
        (false, Some(n)) => Ok(CodeKind::TokenGrant(n)),
        _ => bail!("exactly one of --unlimited or --tokens N is required"),
    }
}

pub fn plan_text(p: Plan) -> String {
    match p {
        Plan::Unlimited => format!("unlimited (balance {})", UNLIMITED_BALANCE),
        Plan::TokenBalance(n) => format!("tokens {}", n),
    }
}

pub fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}
