use anyhow::Result;

use TokenGateDB::codec::CountryRecord;

use crate::cli::AddrCmd;
use crate::util::{open_locked, Files};

pub fn exec(files: &Files, cmd: AddrCmd) -> Result<()> {
    let (_lock, store) = open_locked(files)?;
    match cmd {
        AddrCmd::Add { country, address, flag } => {
            let o = store.add_address(&country, &flag, &address)?;
            if o.merged > 0 {
                println!("Folded {} duplicate bucket(s) into {}", o.merged, o.key);
            }
            if o.added {
                println!("Added {} to {} ({})", address.trim(), o.display_name, o.key);
            } else {
                println!("{} already listed under {}", address.trim(), o.key);
            }
        }
        AddrCmd::Remove { key, address } => {
            if store.remove_address(&key, &address)? {
                println!("Removed {} from {}", address.trim(), key);
            } else {
                println!("Not found");
            }
        }
        AddrCmd::List { key } => {
            let list = store.addresses(&key);
            if list.is_empty() {
                println!("(no addresses)");
            }
            for a in list {
                println!("{}", a);
            }
        }
        AddrCmd::Countries { json } => {
            let countries = store.countries();
            if json {
                let recs: Vec<CountryRecord> = countries.iter().map(CountryRecord::from).collect();
                println!("{}", serde_json::to_string_pretty(&recs)?);
            } else if countries.is_empty() {
                println!("(no countries)");
            } else {
                for c in &countries {
                    println!("{:<24} {} {} ({} address(es))", c.key(), c.glyph(), c.display_name(), c.len());
                }
            }
        }
        AddrCmd::RemoveCountry { key } => {
            if store.remove_country(&key)? {
                println!("Removed country {}", key);
            } else {
                println!("Not found");
            }
        }
    }
    Ok(())
}
