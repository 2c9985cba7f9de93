use anyhow::Result;

use crate::util::{open_locked, Files};

pub fn exec(files: &Files) -> Result<()> {
    let (_lock, store) = open_locked(files)?;
    // open already ran the startup pass; this reports what is left
    let r = store.reconcile_inventory()?;
    println!(
        "Folded {} bucket(s), moved {} toggle(s), renamed {}; {} countries remain",
        r.buckets,
        r.toggles,
        r.renamed,
        store.countries().len()
    );
    Ok(())
}
