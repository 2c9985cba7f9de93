use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use TokenGateDB::{CodeKind, Store, StoreConfig};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let base = std::env::temp_dir();
    base.join(format!("tgtest-conc-{prefix}-{pid}-{t}-{id}"))
}

/// Handlers from a small worker pool hit one shared store; every mutation is
/// serialized and the final snapshot matches memory.
#[test]
fn shared_store_serializes_mutations() -> Result<()> {
    let root = unique_root("pool");
    fs::create_dir_all(&root)?;
    let cfg = StoreConfig::in_dir(&root).with_fsync(false);
    let store = Arc::new(Store::open(cfg.clone())?);

    store.define_code("TOKEN100", CodeKind::TokenGrant(100))?;
    store.redeem_code("TOKEN100", 1)?;

    const THREADS: usize = 8;
    const PER_THREAD: usize = 10;

    let mut handles = Vec::new();
    for t in 0..THREADS {
        let s = store.clone();
        handles.push(thread::spawn(move || -> Result<usize> {
            let mut consumed = 0;
            for i in 0..PER_THREAD {
                // same country under different spellings from every thread
                let name = if i % 2 == 0 { "Saudi Arabia" } else { "KSA" };
                s.add_address(name, "🇸🇦", &format!("10.{t}.0.{i}"))?;
                s.add_address("Germany", "🇩🇪", "5.5.5.5")?;
                if s.consume_tokens(1, 1)? {
                    consumed += 1;
                }
            }
            Ok(consumed)
        }));
    }

    let mut consumed = 0;
    for h in handles {
        consumed += h.join().expect("worker panicked")?;
    }

    assert_eq!(consumed, THREADS * PER_THREAD);
    assert_eq!(store.token_balance(1), 100 - (THREADS * PER_THREAD) as u64);
    assert_eq!(store.countries().len(), 2);
    assert_eq!(store.addresses("SA").len(), THREADS * PER_THREAD);
    assert_eq!(store.addresses("germany"), vec!["5.5.5.5".to_string()]);
    assert_eq!(store.recent_activity().len(), 20);

    let in_memory = store.state();
    drop(store);
    let reopened = Store::open(cfg)?;
    assert_eq!(reopened.state(), in_memory);
    Ok(())
}

#[test]
fn concurrent_consumers_never_overdraw() -> Result<()> {
    let root = unique_root("overdraw");
    fs::create_dir_all(&root)?;
    let store = Arc::new(Store::open(StoreConfig::in_dir(&root).with_fsync(false))?);

    store.define_code("T25", CodeKind::TokenGrant(25))?;
    store.redeem_code("T25", 3)?;

    let mut handles = Vec::new();
    for _ in 0..6 {
        let s = store.clone();
        handles.push(thread::spawn(move || -> Result<u64> {
            let mut ok = 0;
            for _ in 0..10 {
                if s.consume_tokens(3, 1)? {
                    ok += 1;
                }
            }
            Ok(ok)
        }));
    }
    let mut total = 0;
    for h in handles {
        total += h.join().expect("worker panicked")?;
    }

    assert_eq!(total, 25, "exactly the granted amount is spendable");
    assert_eq!(store.token_balance(3), 0);
    Ok(())
}
