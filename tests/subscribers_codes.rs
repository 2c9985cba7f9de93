use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use TokenGateDB::{
    CodeKind, Plan, Redemption, Store, StoreConfig, SubscriberStatus, UNLIMITED_BALANCE,
};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let base = std::env::temp_dir();
    base.join(format!("tgtest-subs-{prefix}-{pid}-{t}-{id}"))
}

fn open_in(root: &PathBuf) -> Result<Store> {
    Store::open(StoreConfig::in_dir(root).with_fsync(false))
}

/// define TOKEN500 -> redeem for 42 -> consume 3 -> disable -> refused ->
/// enable -> consume 1 -> 496.
#[test]
fn token_lifecycle_end_to_end() -> Result<()> {
    let root = unique_root("e2e");
    fs::create_dir_all(&root)?;
    let store = open_in(&root)?;

    assert!(store.define_code("TOKEN500", CodeKind::TokenGrant(500))?);
    assert_eq!(
        store.redeem_code("TOKEN500", 42)?,
        Redemption::Activated(Plan::TokenBalance(500))
    );
    assert_eq!(store.token_balance(42), 500);

    assert!(store.consume_tokens(42, 3)?);
    assert_eq!(store.token_balance(42), 497);

    assert!(store.disable_subscriber(42)?);
    assert!(!store.consume_tokens(42, 1)?);
    assert_eq!(store.token_balance(42), 0, "disabled subscribers report 0");

    assert!(store.enable_subscriber(42)?);
    assert!(store.consume_tokens(42, 1)?);
    assert_eq!(store.token_balance(42), 496);

    // survives reopen
    drop(store);
    let store = open_in(&root)?;
    assert_eq!(store.token_balance(42), 496);
    assert_eq!(store.status(42), SubscriberStatus::Active(Plan::TokenBalance(496)));
    let code = store.code("TOKEN500").expect("code kept after redemption");
    assert_eq!(code.used_count, 1);
    assert_eq!(code.redeemers, vec![42]);
    Ok(())
}

#[test]
fn token_grant_is_fixed_per_redeemer() -> Result<()> {
    let root = unique_root("grant");
    fs::create_dir_all(&root)?;
    let store = open_in(&root)?;

    store.define_code("TOKEN500", CodeKind::TokenGrant(500))?;
    assert!(store.redeem_code("TOKEN500", 1)?.is_success());
    assert!(store.redeem_code("TOKEN500", 2)?.is_success());

    assert_eq!(store.token_balance(1), 500);
    assert_eq!(store.token_balance(2), 500);
    let code = store.code("TOKEN500").expect("code");
    assert_eq!(code.kind, CodeKind::TokenGrant(500), "code budget is never drawn down");
    assert_eq!(code.used_count, 2);
    assert_eq!(code.redeemers, vec![1, 2]);
    Ok(())
}

#[test]
fn balance_never_goes_negative() -> Result<()> {
    let root = unique_root("nonneg");
    fs::create_dir_all(&root)?;
    let store = open_in(&root)?;

    store.define_code("T3", CodeKind::TokenGrant(3))?;
    store.redeem_code("T3", 9)?;
    assert!(!store.consume_tokens(9, 4)?, "more than the balance is refused");
    assert_eq!(store.token_balance(9), 3);
    for _ in 0..3 {
        assert!(store.consume_tokens(9, 1)?);
    }
    assert_eq!(store.token_balance(9), 0);
    assert!(!store.consume_tokens(9, 1)?);
    assert_eq!(store.token_balance(9), 0);

    // top-up brings it back
    assert!(store.grant_tokens(9, 2)?);
    assert_eq!(store.token_balance(9), 2);
    Ok(())
}

#[test]
fn disable_unregistered_creates_nothing() -> Result<()> {
    let root = unique_root("unreg");
    fs::create_dir_all(&root)?;
    let store = open_in(&root)?;

    assert!(!store.disable_subscriber(77)?);
    assert!(!store.enable_subscriber(77)?);
    assert!(!store.grant_tokens(77, 10)?);
    assert!(!store.consume_tokens(77, 1)?);
    assert_eq!(store.status(77), SubscriberStatus::Unregistered);
    assert!(store.subscriber(77).is_none());
    assert_eq!(store.stats().subscribers, 0);
    assert_eq!(store.stats().disabled_subscribers, 0);
    Ok(())
}

#[test]
fn disable_enable_keeps_plan() -> Result<()> {
    let root = unique_root("roundtrip");
    fs::create_dir_all(&root)?;
    let store = open_in(&root)?;

    store.define_code("VIP", CodeKind::Unlimited)?;
    store.redeem_code("VIP", 5)?;
    let before = store.status(5);
    assert_eq!(before, SubscriberStatus::Active(Plan::Unlimited));

    assert!(store.disable_subscriber(5)?);
    assert!(!store.disable_subscriber(5)?, "already disabled");
    assert_eq!(store.status(5), SubscriberStatus::Disabled(Plan::Unlimited));
    assert!(store.is_disabled(5));
    assert!(!store.is_active(5));
    assert!(!store.consume_tokens(5, 1)?);

    assert!(store.enable_subscriber(5)?);
    assert_eq!(store.status(5), before);
    assert!(store.consume_tokens(5, 1_000)?);
    assert_eq!(store.token_balance(5), UNLIMITED_BALANCE);
    Ok(())
}

#[test]
fn redemption_outcomes() -> Result<()> {
    let root = unique_root("redeem");
    fs::create_dir_all(&root)?;
    let store = open_in(&root)?;

    assert_eq!(store.redeem_code("NOPE", 1)?, Redemption::UnknownCode);
    assert!(store.subscriber(1).is_none());

    store.define_code("ZERO", CodeKind::TokenGrant(0))?;
    assert_eq!(store.redeem_code("ZERO", 1)?, Redemption::ZeroGrant);
    assert_eq!(store.code("ZERO").map(|c| c.used_count), Some(0));
    assert!(store.subscriber(1).is_none());

    store.define_code("T10", CodeKind::TokenGrant(10))?;
    store.define_code("T5", CodeKind::TokenGrant(5))?;
    store.define_code("VIP", CodeKind::Unlimited)?;

    assert_eq!(
        store.redeem_code(" T10 ", 1)?,
        Redemption::Activated(Plan::TokenBalance(10))
    );
    assert_eq!(store.redeem_code("T10", 1)?, Redemption::AlreadyRedeemed);
    assert_eq!(
        store.redeem_code("T5", 1)?,
        Redemption::ToppedUp(Plan::TokenBalance(15))
    );
    assert_eq!(store.redeem_code("VIP", 1)?, Redemption::ToppedUp(Plan::Unlimited));
    assert_eq!(store.code("T10").map(|c| c.used_count), Some(1));

    // origin stays with the first code
    assert_eq!(store.subscriber(1).map(|s| s.origin_code), Some("T10".to_string()));

    store.redeem_code("T5", 2)?;
    store.disable_subscriber(2)?;
    assert_eq!(store.redeem_code("VIP", 2)?, Redemption::SubscriberDisabled);
    assert_eq!(store.status(2), SubscriberStatus::Disabled(Plan::TokenBalance(5)));
    assert_eq!(store.code("VIP").map(|c| c.redeemers), Some(vec![1]));
    Ok(())
}

#[test]
fn code_admin_operations() -> Result<()> {
    let root = unique_root("codes");
    fs::create_dir_all(&root)?;
    let store = open_in(&root)?;

    assert!(store.define_code("PROMO", CodeKind::TokenGrant(50))?);
    assert!(!store.define_code("PROMO", CodeKind::TokenGrant(70))?);
    assert_eq!(store.code("PROMO").map(|c| c.kind), Some(CodeKind::TokenGrant(70)));

    assert!(store.update_code("PROMO", CodeKind::Unlimited)?);
    assert!(!store.update_code("MISSING", CodeKind::Unlimited)?);
    assert_eq!(store.code("PROMO").map(|c| c.kind), Some(CodeKind::Unlimited));

    assert!(store.remove_code("PROMO")?);
    assert!(!store.remove_code("PROMO")?);
    assert!(store.codes().is_empty());

    let err = store
        .define_code("   ", CodeKind::Unlimited)
        .expect_err("empty code must be rejected");
    assert_eq!(
        err.downcast_ref::<TokenGateDB::StoreError>(),
        Some(&TokenGateDB::StoreError::EmptyCode)
    );
    Ok(())
}

#[test]
fn seeding_adds_only_missing_codes() -> Result<()> {
    let root = unique_root("seed");
    fs::create_dir_all(&root)?;
    let store = open_in(&root)?;

    store.define_code("TOKEN500", CodeKind::TokenGrant(1))?;
    assert_eq!(store.seed_default_codes()?, 4);
    assert_eq!(store.seed_default_codes()?, 0);
    assert_eq!(store.code("TOKEN500").map(|c| c.kind), Some(CodeKind::TokenGrant(1)));
    assert_eq!(store.code("VIP2024").map(|c| c.kind), Some(CodeKind::Unlimited));
    assert_eq!(store.stats().codes, 5);

    // seeding at open
    let root2 = unique_root("seed-open");
    fs::create_dir_all(&root2)?;
    let s2 = Store::open(
        StoreConfig::in_dir(&root2)
            .with_fsync(false)
            .with_seed_default_codes(true),
    )?;
    assert_eq!(s2.codes().len(), 5);
    assert_eq!(s2.code("TOKEN1000").map(|c| c.kind), Some(CodeKind::TokenGrant(1000)));
    Ok(())
}
