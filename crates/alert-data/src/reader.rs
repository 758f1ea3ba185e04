//! CSV dataset discovery and loading.
//!
//! Reads the regional update table once at startup and converts it into an
//! immutable [`Table`]. Any problem with the file is a [`LoadError`]; the
//! caller is expected to abort rather than serve a partial table.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use alert_core::error::LoadError;
use alert_core::models::{ColumnMapping, Row, Table};
use tracing::{debug, info};

/// File name looked up when no dataset path is configured.
pub const DEFAULT_FILE_NAME: &str = "aadhaar_data.csv";

/// Output keys a source column must not shadow when echoed in previews.
const RESERVED_KEYS: [&str; 4] = [
    "region",
    "young_bracket_count",
    "older_bracket_count",
    "status",
];

// ── Public API ────────────────────────────────────────────────────────────────

/// Locations searched, in order, when no dataset path is given.
///
/// 1. `<cwd>/aadhaar_data.csv`
/// 2. `<cwd>/data/aadhaar_data.csv`
/// 3. `<home>/.alertindia/aadhaar_data.csv`
pub fn candidate_paths(cwd: &Path, home: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = vec![
        cwd.join(DEFAULT_FILE_NAME),
        cwd.join("data").join(DEFAULT_FILE_NAME),
    ];
    if let Some(home) = home {
        candidates.push(home.join(".alertindia").join(DEFAULT_FILE_NAME));
    }
    candidates
}

/// Resolve the dataset path: `explicit` when given, otherwise the first
/// existing [`candidate_paths`] entry.
pub fn resolve_data_path(explicit: Option<&Path>) -> Result<PathBuf, LoadError> {
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(LoadError::NotFound(path.to_path_buf()))
        };
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let home = dirs::home_dir();
    candidate_paths(&cwd, home.as_deref())
        .into_iter()
        .find(|p| p.is_file())
        .ok_or_else(|| LoadError::NotFound(cwd.join(DEFAULT_FILE_NAME)))
}

/// Load the dataset at `path` using `columns` to locate the required fields.
pub fn load_table(path: &Path, columns: &ColumnMapping) -> Result<Table, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let table = read_table(file, columns, path)?.with_source(path);
    info!(
        rows = table.len(),
        path = %path.display(),
        "dataset loaded"
    );
    Ok(table)
}

/// Parse CSV from any reader. `origin` is only used in error messages.
pub fn read_table<R: Read>(
    reader: R,
    columns: &ColumnMapping,
    origin: &Path,
) -> Result<Table, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| csv_error(origin, e))?
        .clone();

    let region_idx = column_index(&headers, &columns.region, origin)?;
    let young_idx = column_index(&headers, &columns.young, origin)?;
    let older_idx = column_index(&headers, &columns.older, origin)?;

    let extra_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(idx, name)| {
            ![region_idx, young_idx, older_idx].contains(idx) && !RESERVED_KEYS.contains(name)
        })
        .map(|(idx, name)| (idx, name.to_string()))
        .collect();

    let mut rows: Vec<Row> = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|e| csv_error(origin, e))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let region = record.get(region_idx).unwrap_or_default();
        if region.is_empty() {
            return Err(LoadError::InvalidValue {
                path: origin.to_path_buf(),
                line,
                column: columns.region.clone(),
                value: String::new(),
            });
        }

        let young = parse_count(record.get(young_idx).unwrap_or_default()).ok_or_else(|| {
            invalid_value(origin, line, &columns.young, record.get(young_idx))
        })?;
        let older = parse_count(record.get(older_idx).unwrap_or_default()).ok_or_else(|| {
            invalid_value(origin, line, &columns.older, record.get(older_idx))
        })?;

        let extra: BTreeMap<String, serde_json::Value> = extra_columns
            .iter()
            .map(|(idx, name)| {
                (
                    name.clone(),
                    parse_extra(record.get(*idx).unwrap_or_default()),
                )
            })
            .collect();

        let mut row = Row::new(region, young, older);
        row.extra = extra;
        rows.push(row);
    }

    debug!(
        rows = rows.len(),
        extra_columns = extra_columns.len(),
        "parsed dataset records"
    );

    Ok(Table::new(rows))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn column_index(headers: &csv::StringRecord, name: &str, origin: &Path) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| LoadError::MissingColumn {
            path: origin.to_path_buf(),
            column: name.to_string(),
        })
}

/// I/O failures while reading are `Read`; everything else is `Malformed`.
fn csv_error(origin: &Path, err: csv::Error) -> LoadError {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => LoadError::Read {
            path: origin.to_path_buf(),
            source,
        },
        _ => LoadError::Malformed {
            path: origin.to_path_buf(),
            message,
        },
    }
}

fn invalid_value(origin: &Path, line: u64, column: &str, value: Option<&str>) -> LoadError {
    LoadError::InvalidValue {
        path: origin.to_path_buf(),
        line,
        column: column.to_string(),
        value: value.unwrap_or_default().to_string(),
    }
}

/// Parse a count cell. Empty cells are `0`; integral floats such as `"12.0"`
/// are accepted. Returns `None` for anything else.
fn parse_count(raw: &str) -> Option<i64> {
    if raw.is_empty() {
        return Some(0);
    }
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v);
    }
    let v = raw.parse::<f64>().ok()?;
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

/// Type a pass-through cell: empty → null, numbers → JSON numbers, else string.
fn parse_extra(raw: &str) -> serde_json::Value {
    if raw.is_empty() {
        return serde_json::Value::Null;
    }
    if let Ok(v) = raw.parse::<i64>() {
        return serde_json::Value::from(v);
    }
    if let Ok(v) = raw.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(v) {
            return serde_json::Value::Number(n);
        }
    }
    serde_json::Value::String(raw.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &str = "date,state,district,pincode,demo_age_5_17,demo_age_17_";

    fn parse(csv_text: &str) -> Result<Table, LoadError> {
        read_table(
            csv_text.as_bytes(),
            &ColumnMapping::default(),
            Path::new("test.csv"),
        )
    }

    fn write_csv(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    // ── read_table ────────────────────────────────────────────────────────────

    #[test]
    fn test_read_table_basic() {
        let text = format!(
            "{HEADER}\n01-03-2025,Bihar,Patna,800001,12,30\n01-03-2025,Goa,North Goa,403001,55,8\n"
        );
        let table = parse(&text).unwrap();

        assert_eq!(table.len(), 2);
        let first = &table.rows()[0];
        assert_eq!(first.region, "Bihar");
        assert_eq!(first.young_bracket_count, 12);
        assert_eq!(first.older_bracket_count, 30);
        assert_eq!(first.ordinal, 0);
        assert_eq!(table.rows()[1].ordinal, 1);
    }

    #[test]
    fn test_read_table_keeps_extra_columns_typed() {
        let text = format!("{HEADER}\n01-03-2025,Bihar,Patna,800001,12,30\n");
        let table = parse(&text).unwrap();
        let extra = &table.rows()[0].extra;

        assert_eq!(extra["date"], serde_json::json!("01-03-2025"));
        assert_eq!(extra["district"], serde_json::json!("Patna"));
        assert_eq!(extra["pincode"], serde_json::json!(800001));
        assert!(!extra.contains_key("state"));
        assert!(!extra.contains_key("demo_age_5_17"));
    }

    #[test]
    fn test_read_table_preserves_file_order() {
        let text = "state,demo_age_5_17,demo_age_17_\nB,1,0\nA,2,0\nB,3,0\n";
        let table = parse(text).unwrap();
        let regions: Vec<&str> = table.rows().iter().map(|r| r.region.as_str()).collect();
        assert_eq!(regions, vec!["B", "A", "B"]);
    }

    #[test]
    fn test_read_table_empty_count_defaults_to_zero() {
        let text = "state,demo_age_5_17,demo_age_17_\nKerala,,\n";
        let table = parse(text).unwrap();
        assert_eq!(table.rows()[0].young_bracket_count, 0);
        assert_eq!(table.rows()[0].older_bracket_count, 0);
    }

    #[test]
    fn test_read_table_accepts_integral_floats_and_negatives() {
        let text = "state,demo_age_5_17,demo_age_17_\nKerala,12.0,-3\n";
        let table = parse(text).unwrap();
        assert_eq!(table.rows()[0].young_bracket_count, 12);
        assert_eq!(table.rows()[0].older_bracket_count, -3);
    }

    #[test]
    fn test_read_table_rejects_non_numeric_count() {
        let text = "state,demo_age_5_17,demo_age_17_\nKerala,10,0\nGoa,many,0\n";
        match parse(text) {
            Err(LoadError::InvalidValue {
                line,
                column,
                value,
                ..
            }) => {
                assert_eq!(line, 3);
                assert_eq!(column, "demo_age_5_17");
                assert_eq!(value, "many");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_read_table_rejects_fractional_count() {
        let text = "state,demo_age_5_17,demo_age_17_\nKerala,1.5,0\n";
        assert!(matches!(parse(text), Err(LoadError::InvalidValue { .. })));
    }

    #[test]
    fn test_read_table_rejects_empty_region() {
        let text = "state,demo_age_5_17,demo_age_17_\n,10,0\n";
        assert!(matches!(parse(text), Err(LoadError::InvalidValue { .. })));
    }

    #[test]
    fn test_read_table_missing_required_column() {
        let text = "state,demo_age_5_17\nKerala,10\n";
        match parse(text) {
            Err(LoadError::MissingColumn { column, .. }) => assert_eq!(column, "demo_age_17_"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_read_table_ragged_record_is_malformed() {
        let text = "state,demo_age_5_17,demo_age_17_\nKerala,10\n";
        assert!(matches!(parse(text), Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn test_read_table_invalid_utf8_is_malformed() {
        let bytes: &[u8] = b"state,demo_age_5_17,demo_age_17_\n\xff\xfe,10,5\n";
        let result = read_table(bytes, &ColumnMapping::default(), Path::new("test.csv"));
        assert!(matches!(result, Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn test_read_table_io_failure_is_read_error() {
        struct Unreadable;

        impl Read for Unreadable {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("device went away"))
            }
        }

        match read_table(Unreadable, &ColumnMapping::default(), Path::new("test.csv")) {
            Err(LoadError::Read { path, source }) => {
                assert_eq!(path, Path::new("test.csv"));
                assert_eq!(source.to_string(), "device went away");
            }
            other => panic!("expected Read error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_table_header_only_is_empty_table() {
        let table = parse("state,demo_age_5_17,demo_age_17_\n").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_read_table_custom_columns() {
        let columns = ColumnMapping {
            region: "region".to_string(),
            young: "young".to_string(),
            older: "older".to_string(),
        };
        let text = "region,young,older\nA,10,5\n";
        let table = read_table(text.as_bytes(), &columns, Path::new("x.csv")).unwrap();
        assert_eq!(table.rows()[0].region, "A");
        assert_eq!(table.rows()[0].young_bracket_count, 10);
    }

    #[test]
    fn test_read_table_reserved_extra_column_is_dropped() {
        let text = "state,demo_age_5_17,demo_age_17_,status\nA,10,5,old\n";
        let table = parse(text).unwrap();
        assert!(table.rows()[0].extra.is_empty());
    }

    // ── load_table ────────────────────────────────────────────────────────────

    #[test]
    fn test_load_table_from_file_records_source() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "aadhaar_data.csv",
            "state,demo_age_5_17,demo_age_17_\nA,10,5\n",
        );

        let table = load_table(&path, &ColumnMapping::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.source(), Some(path.as_path()));
    }

    #[test]
    fn test_load_table_directory_is_read_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_table(dir.path(), &ColumnMapping::default()),
            Err(LoadError::Read { .. })
        ));
    }

    #[test]
    fn test_load_table_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.csv");
        assert!(matches!(
            load_table(&path, &ColumnMapping::default()),
            Err(LoadError::NotFound(_))
        ));
    }

    // ── discovery ─────────────────────────────────────────────────────────────

    #[test]
    fn test_candidate_paths_order() {
        let candidates = candidate_paths(Path::new("/work"), Some(Path::new("/home/u")));
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/work/aadhaar_data.csv"),
                PathBuf::from("/work/data/aadhaar_data.csv"),
                PathBuf::from("/home/u/.alertindia/aadhaar_data.csv"),
            ]
        );
    }

    #[test]
    fn test_candidate_paths_without_home() {
        assert_eq!(candidate_paths(Path::new("/work"), None).len(), 2);
    }

    #[test]
    fn test_resolve_data_path_explicit_existing() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "d.csv", "state,demo_age_5_17,demo_age_17_\n");
        assert_eq!(resolve_data_path(Some(&path)).unwrap(), path);
    }

    #[test]
    fn test_resolve_data_path_explicit_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.csv");
        assert!(matches!(
            resolve_data_path(Some(&path)),
            Err(LoadError::NotFound(p)) if p == path
        ));
    }
}
