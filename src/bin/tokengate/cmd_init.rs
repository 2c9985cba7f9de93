use anyhow::Result;

use crate::util::{open_locked, Files};

pub fn exec(files: &Files, seed: bool) -> Result<()> {
    let existed = files.config().snapshot_path.exists();
    let (_lock, store) = open_locked(files)?;
    if store.is_degraded() {
        eprintln!(
            "warning: snapshot {} could not be loaded; store is empty (a .corrupt copy was kept)",
            store.snapshot_path().display()
        );
    } else if existed {
        println!("Snapshot already initialized at {}", store.snapshot_path().display());
    } else {
        println!("Initialized snapshot at {}", store.snapshot_path().display());
    }
    if seed {
        let n = store.seed_default_codes()?;
        println!("Seeded {} default code(s)", n);
    }
    Ok(())
}
