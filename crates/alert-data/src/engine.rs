//! Aggregation and classification over a loaded [`Table`].
//!
//! Every query is recomputed from the full table on each call; nothing is
//! cached and the table is never mutated, so an engine can be cloned into
//! any number of request handlers.

use std::sync::Arc;

use alert_core::classification::{
    classify_change, classify_count, percent_change, round_to, CHANGE_DECIMALS,
};
use alert_core::models::{
    ChangeAlert, PreviewRow, RegionSummary, RegionTotal, RegionUpdates, StatusTally, Table,
};
use tracing::trace;

use crate::aggregator::RegionAggregator;

/// Rows returned by the preview when no limit is given.
pub const DEFAULT_PREVIEW_LIMIT: usize = 10;

/// Regions listed by the top-N report when no limit is given.
pub const DEFAULT_TOP_REGIONS: usize = 5;

// ── AggregationEngine ─────────────────────────────────────────────────────────

/// Read-only query engine over a shared, immutable table.
#[derive(Debug, Clone)]
pub struct AggregationEngine {
    table: Arc<Table>,
}

impl AggregationEngine {
    pub fn new(table: Table) -> Self {
        Self::from_shared(Arc::new(table))
    }

    pub fn from_shared(table: Arc<Table>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The first `limit` rows, each tagged with the status of its
    /// young-bracket count.
    pub fn preview(&self, limit: usize) -> Vec<PreviewRow> {
        self.table
            .head(limit)
            .iter()
            .map(|row| PreviewRow {
                status: classify_count(row.young_bracket_count),
                row: row.clone(),
            })
            .collect()
    }

    /// Young-bracket sum per region, ordered by region name.
    pub fn region_totals(&self) -> Vec<RegionTotal> {
        let mut totals: Vec<RegionTotal> = RegionAggregator::group_by_region(&self.table)
            .iter()
            .map(|g| RegionTotal {
                region: g.region.to_string(),
                sum: g.young_sum(),
            })
            .collect();
        totals.sort_by(|a, b| a.region.cmp(&b.region));
        totals
    }

    /// Percentage change between the last two observations of each region,
    /// in first-seen region order.
    ///
    /// Regions with a single observation, or whose previous observation is
    /// zero, are left out.
    pub fn change_alerts(&self) -> Vec<ChangeAlert> {
        RegionAggregator::group_by_region(&self.table)
            .iter()
            .filter_map(|group| {
                let Some((prev, last)) = group.last_two() else {
                    trace!(region = group.region, "single observation; no alert");
                    return None;
                };
                let Some(raw) =
                    percent_change(prev.young_bracket_count, last.young_bracket_count)
                else {
                    trace!(region = group.region, "previous observation is zero; no alert");
                    return None;
                };
                let change = round_to(raw, CHANGE_DECIMALS);
                Some(ChangeAlert {
                    region: group.region.to_string(),
                    change,
                    status: classify_change(change),
                })
            })
            .collect()
    }

    /// Row counts per status over every row of the table.
    pub fn stats(&self) -> StatusTally {
        let mut tally = StatusTally::default();
        for row in self.table.rows() {
            tally.record(classify_count(row.young_bracket_count));
        }
        tally
    }

    /// Regions with the most combined (young + older) updates, descending.
    /// Ties are broken by region name.
    pub fn top_regions(&self, limit: usize) -> Vec<RegionUpdates> {
        let mut ranked: Vec<RegionUpdates> = RegionAggregator::group_by_region(&self.table)
            .iter()
            .map(|g| RegionUpdates {
                region: g.region.to_string(),
                total_updates: g.total_updates(),
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.total_updates
                .cmp(&a.total_updates)
                .then_with(|| a.region.cmp(&b.region))
        });
        ranked.truncate(limit);
        ranked
    }

    /// Sorted distinct region names.
    pub fn regions(&self) -> Vec<String> {
        RegionAggregator::regions(&self.table)
    }

    /// Totals for a single region, or `None` if it never appears.
    pub fn region_summary(&self, region: &str) -> Option<RegionSummary> {
        RegionAggregator::group_by_region(&self.table)
            .into_iter()
            .find(|g| g.region == region)
            .map(|g| RegionSummary {
                region: g.region.to_string(),
                observations: g.rows.len(),
                young_sum: g.young_sum(),
                older_sum: g.older_sum(),
                total_updates: g.total_updates(),
            })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
