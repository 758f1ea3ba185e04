//! Plain-text console report for `--view report`.

use std::io::{self, Write};

use alert_core::formatting::{format_change, format_count};
use alert_data::AggregationEngine;

const REGION_WIDTH: usize = 28;

/// Write the top-`top` regions, the status tally and the change alerts.
pub fn write_report<W: Write>(out: &mut W, engine: &AggregationEngine, top: usize) -> io::Result<()> {
    let ranked = engine.top_regions(top);
    writeln!(out, "Top {} regions by total updates", ranked.len())?;
    writeln!(out, "{:>3}  {:<REGION_WIDTH$}  {:>14}", "#", "Region", "Total Updates")?;
    for (i, r) in ranked.iter().enumerate() {
        writeln!(
            out,
            "{:>3}  {:<REGION_WIDTH$}  {:>14}",
            i + 1,
            r.region,
            format_count(r.total_updates)
        )?;
    }

    let stats = engine.stats();
    writeln!(out)?;
    writeln!(
        out,
        "Rows: {}  critical: {}  warning: {}  stable: {}",
        format_count(stats.total as i64),
        format_count(stats.critical as i64),
        format_count(stats.warning as i64),
        format_count(stats.stable as i64),
    )?;

    let alerts = engine.change_alerts();
    writeln!(out)?;
    if alerts.is_empty() {
        writeln!(out, "No change alerts")?;
        return Ok(());
    }
    writeln!(out, "Change alerts")?;
    writeln!(out, "{:<REGION_WIDTH$}  {:>10}  {}", "Region", "Change", "Status")?;
    for a in &alerts {
        writeln!(
            out,
            "{:<REGION_WIDTH$}  {:>10}  {}",
            a.region,
            format_change(a.change),
            a.status
        )?;
    }
    Ok(())
}
