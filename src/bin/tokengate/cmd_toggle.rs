use anyhow::Result;

use crate::cli::ToggleCmd;
use crate::util::{open_locked, Files};

pub fn exec(files: &Files, cmd: ToggleCmd) -> Result<()> {
    let (_lock, store) = open_locked(files)?;
    match cmd {
        ToggleCmd::List => {
            for (a, disabled) in store.ui_toggles().entries() {
                println!("{:<14} {}", a.name(), if disabled { "disabled" } else { "enabled" });
            }
        }
        ToggleCmd::Set { name, disabled } => {
            if store.set_ui_toggle(name, disabled)? {
                println!("{} -> {}", name, if disabled { "disabled" } else { "enabled" });
            } else {
                println!("{} unchanged", name);
            }
        }
    }
    Ok(())
}
