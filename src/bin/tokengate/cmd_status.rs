use anyhow::Result;
use serde_json::json;

use TokenGateDB::metrics;

use crate::util::{open_locked, yes_no, Files};

pub fn exec(files: &Files, json: bool) -> Result<()> {
    let (_lock, store) = open_locked(files)?;
    let stats = store.stats();
    let ms = metrics::snapshot();

    if json {
        let v = json!({
            "snapshot": store.snapshot_path().display().to_string(),
            "degraded": store.is_degraded(),
            "stats": stats,
            "recent_activity": store.recent_activity().len(),
            "metrics": {
                "snapshot_loads": ms.snapshot_loads,
                "snapshot_load_failures": ms.snapshot_load_failures,
                "snapshot_saves": ms.snapshot_saves,
                "snapshot_save_failures": ms.snapshot_save_failures,
                "snapshot_bytes_written": ms.snapshot_bytes_written,
                "buckets_merged": ms.buckets_merged,
            },
        });
        println!("{}", serde_json::to_string_pretty(&v)?);
        return Ok(());
    }

    println!("TokenGateDB status:");
    println!("  snapshot        = {}", store.snapshot_path().display());
    println!("  degraded        = {}", yes_no(store.is_degraded()));
    println!("  subscribers     = {} (disabled {})", stats.subscribers, stats.disabled_subscribers);
    println!("  codes           = {}", stats.codes);
    println!("  countries       = {}", stats.countries);
    println!("  addresses       = {}", stats.addresses);
    println!("  endpoints       = {}", stats.endpoints);
    println!("  recent activity = {}", store.recent_activity().len());
    println!(
        "  snapshot io     = loads {} (failed {}), saves {} (failed {}), avg {:.0} B",
        ms.snapshot_loads,
        ms.snapshot_load_failures,
        ms.snapshot_saves,
        ms.snapshot_save_failures,
        ms.avg_snapshot_bytes()
    );
    Ok(())
}
