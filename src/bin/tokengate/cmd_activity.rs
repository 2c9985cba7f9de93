use anyhow::Result;

use crate::util::{open_locked, Files};

pub fn exec(files: &Files, json: bool) -> Result<()> {
    let (_lock, store) = open_locked(files)?;
    let events = store.recent_activity();
    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }
    if events.is_empty() {
        println!("(no activity)");
    }
    for ev in events {
        println!("{:>10}  {}", ev.at, ev.message);
    }
    Ok(())
}
