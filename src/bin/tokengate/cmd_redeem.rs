use anyhow::Result;

use TokenGateDB::Redemption;

use crate::util::{open_locked, plan_text, Files};

pub fn exec(files: &Files, code: &str, id: i64) -> Result<()> {
    let (_lock, store) = open_locked(files)?;
    match store.redeem_code(code, id)? {
        Redemption::Activated(p) => println!("Subscriber {} activated: {}", id, plan_text(p)),
        Redemption::ToppedUp(p) => println!("Subscriber {} now has {}", id, plan_text(p)),
        Redemption::UnknownCode => println!("Unknown code: {}", code.trim()),
        Redemption::ZeroGrant => println!("Code {} grants nothing", code.trim()),
        Redemption::AlreadyRedeemed => {
            println!("Subscriber {} already redeemed {}", id, code.trim())
        }
        Redemption::SubscriberDisabled => println!("Subscriber {} is disabled", id),
    }
    Ok(())
}
