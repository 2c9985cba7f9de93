use anyhow::Result;

use TokenGateDB::SubscriberStatus;

use crate::cli::SubCmd;
use crate::util::{open_locked, plan_text, Files};

pub fn exec(files: &Files, cmd: SubCmd) -> Result<()> {
    let (_lock, store) = open_locked(files)?;
    match cmd {
        SubCmd::Show { id } => match store.subscriber(id) {
            None => println!("Subscriber {} is not registered", id),
            Some(s) => {
                let state = match store.status(id) {
                    SubscriberStatus::Disabled(_) => "disabled",
                    _ => "active",
                };
                println!("subscriber  = {}", s.id);
                println!("state       = {}", state);
                println!("plan        = {}", plan_text(s.plan));
                println!("balance     = {}", store.token_balance(id));
                println!("joined_at   = {}", s.joined_at);
                println!("origin_code = {}", s.origin_code);
            }
        },
        SubCmd::Grant { id, amount } => {
            if store.grant_tokens(id, amount)? {
                println!("Granted {} token(s); balance {}", amount, store.token_balance(id));
            } else {
                println!("Nothing granted (unregistered or unlimited)");
            }
        }
        SubCmd::Consume { id, amount } => {
            if store.consume_tokens(id, amount)? {
                println!("Consumed {}; balance {}", amount, store.token_balance(id));
            } else {
                println!("Refused (disabled, unregistered or insufficient balance)");
            }
        }
        SubCmd::Disable { id } => {
            if store.disable_subscriber(id)? {
                println!("Subscriber {} disabled", id);
            } else {
                println!("No change (unregistered or already disabled)");
            }
        }
        SubCmd::Enable { id } => {
            if store.enable_subscriber(id)? {
                println!("Subscriber {} enabled", id);
            } else {
                println!("No change (unregistered or not disabled)");
            }
        }
    }
    Ok(())
}
