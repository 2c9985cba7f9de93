use anyhow::Result;

use TokenGateDB::codec::CodeRecord;

use crate::cli::CodeCmd;
use crate::util::{kind_of, open_locked, Files};

pub fn exec(files: &Files, cmd: CodeCmd) -> Result<()> {
    let (_lock, store) = open_locked(files)?;
    match cmd {
        CodeCmd::Define { code, kind } => {
            let kind = kind_of(kind)?;
            if store.define_code(&code, kind)? {
                println!("Defined {} as {}", code.trim(), kind);
            } else {
                println!("Redefined {} as {} (history kept)", code.trim(), kind);
            }
        }
        CodeCmd::Remove { code } => {
            if store.remove_code(&code)? {
                println!("Removed {}", code.trim());
            } else {
                println!("No such code: {}", code.trim());
            }
        }
        CodeCmd::Update { code, kind } => {
            let kind = kind_of(kind)?;
            if store.update_code(&code, kind)? {
                println!("Updated {} to {}", code.trim(), kind);
            } else {
                println!("No such code: {}", code.trim());
            }
        }
        CodeCmd::List { json } => {
            let codes = store.codes();
            if json {
                let map: std::collections::BTreeMap<&str, CodeRecord> = codes
                    .iter()
                    .map(|c| (c.code.as_str(), CodeRecord::from(c)))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else if codes.is_empty() {
                println!("(no codes)");
            } else {
                for c in &codes {
                    println!(
                        "{:<16} {:<12} used={:<5} redeemers={:<5} created={}",
                        c.code,
                        c.kind.to_string(),
                        c.used_count,
                        c.redeemers.len(),
                        c.created_at
                    );
                }
            }
        }
        CodeCmd::Seed => {
            let n = store.seed_default_codes()?;
            println!("Seeded {} default code(s)", n);
        }
    }
    Ok(())
}
