use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Qualitative severity tier assigned by the fixed classification thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Below the lowest threshold; needs attention.
    Critical,
    /// Between the critical and stable thresholds.
    Warning,
    /// At or above the stable threshold.
    Stable,
}

impl Status {
    /// The lowercase identifier used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Critical => "critical",
            Status::Warning => "warning",
            Status::Stable => "stable",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observation for a region, as read from the dataset.
///
/// Count cells that were empty in the source are already normalised to `0`.
/// Columns other than the three known ones are kept in `extra` so that
/// previews echo the complete record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    /// Zero-based position in the source; the time axis for change detection.
    #[serde(skip)]
    pub ordinal: usize,
    /// Region (state) the observation belongs to.
    pub region: String,
    /// Update count for the young age bracket.
    pub young_bracket_count: i64,
    /// Update count for the older age bracket.
    pub older_bracket_count: i64,
    /// Remaining source columns keyed by header name.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Row {
    /// Build a row with no extra columns. The ordinal is assigned by [`Table::new`].
    pub fn new(region: impl Into<String>, young_bracket_count: i64, older_bracket_count: i64) -> Self {
        Self {
            ordinal: 0,
            region: region.into(),
            young_bracket_count,
            older_bracket_count,
            extra: BTreeMap::new(),
        }
    }

    /// Both brackets combined, clamped at the `i64` bounds.
    pub fn total_updates(&self) -> i64 {
        self.young_bracket_count.saturating_add(self.older_bracket_count)
    }
}

/// Source header names for the three columns every dataset must carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub region: String,
    pub young: String,
    pub older: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            region: "state".to_string(),
            young: "demo_age_5_17".to_string(),
            older: "demo_age_17_".to_string(),
        }
    }
}

/// Immutable, ordered set of rows loaded once at startup.
#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<Row>,
    source: Option<PathBuf>,
}

impl Table {
    /// Wrap `rows`, renumbering ordinals so they follow the given order.
    pub fn new(rows: Vec<Row>) -> Self {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(ordinal, mut row)| {
                row.ordinal = ordinal;
                row
            })
            .collect();
        Self { rows, source: None }
    }

    /// Empty table, mostly useful in tests.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Record where the rows came from.
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The first `limit` rows (all rows when `limit` exceeds the length).
    pub fn head(&self, limit: usize) -> &[Row] {
        &self.rows[..limit.min(self.rows.len())]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// A row together with the status derived from its young-bracket count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewRow {
    #[serde(flatten)]
    pub row: Row,
    pub status: Status,
}

/// Sum of young-bracket counts for one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionTotal {
    pub region: String,
    pub sum: i64,
}

/// Percentage change between the last two observations of a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeAlert {
    pub region: String,
    /// Rounded to two decimal places.
    pub change: f64,
    pub status: Status,
}

/// Row counts per status tier over the whole table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTally {
    pub total: u64,
    pub critical: u64,
    pub warning: u64,
    pub stable: u64,
}

impl StatusTally {
    /// Count one more row in `status`.
    pub fn record(&mut self, status: Status) {
        match status {
            Status::Critical => self.critical += 1,
            Status::Warning => self.warning += 1,
            Status::Stable => self.stable += 1,
        }
        self.total += 1;
    }

    pub fn count(&self, status: Status) -> u64 {
        match status {
            Status::Critical => self.critical,
            Status::Warning => self.warning,
            Status::Stable => self.stable,
        }
    }
}

/// Combined (young + older) updates for a region, used by the top-N report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionUpdates {
    pub region: String,
    pub total_updates: i64,
}

/// Everything the dashboard shows for a single selected region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub region: String,
    pub observations: usize,
    pub young_sum: i64,
    pub older_sum: i64,
    pub total_updates: i64,
}
