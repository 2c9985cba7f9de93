use anyhow::Result;

use crate::cli::EndpointCmd;
use crate::util::{open_locked, Files};

pub fn exec(files: &Files, cmd: EndpointCmd) -> Result<()> {
    let (_lock, store) = open_locked(files)?;
    match cmd {
        EndpointCmd::Add { host } => {
            if store.add_endpoint(&host)? {
                println!("Added {}", host.trim());
            } else {
                println!("{} already in pool", host.trim());
            }
        }
        EndpointCmd::Remove { host } => {
            if store.remove_endpoint(&host)? {
                println!("Removed {}", host.trim());
            } else {
                println!("{} not in pool", host.trim());
            }
        }
        EndpointCmd::List => {
            let hosts = store.endpoints();
            if hosts.is_empty() {
                println!("(empty pool)");
            }
            for h in hosts {
                println!("{}", h);
            }
        }
    }
    Ok(())
}
