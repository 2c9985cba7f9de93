use anyhow::Result;

use TokenGateDB::AddressFamily;

use crate::cli::LocationCmd;
use crate::util::{open_locked, yes_no, Files};

pub fn exec(files: &Files, cmd: LocationCmd) -> Result<()> {
    let (_lock, store) = open_locked(files)?;
    match cmd {
        LocationCmd::Disable { key, family } => {
            store.set_location_disabled(&key, family, true)?;
            println!("{} {} disabled", key, family);
        }
        LocationCmd::Enable { key, family } => {
            store.set_location_disabled(&key, family, false)?;
            println!("{} {} enabled", key, family);
        }
        LocationCmd::Show { key } => match store.location_toggle(&key) {
            None => println!("{}: no toggle (both families enabled)", key),
            Some(t) => {
                println!("{} disabled = {}", AddressFamily::V4, yes_no(t.v4_disabled));
                println!("{} disabled = {}", AddressFamily::V6, yes_no(t.v6_disabled));
            }
        },
    }
    Ok(())
}
