use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AlertError;
use crate::models::ColumnMapping;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Regional update alerts: query API, terminal dashboard and console report
#[derive(Parser, Debug, Clone)]
#[command(
    name = "alertindia",
    about = "Regional update alerts: query API, terminal dashboard and console report",
    version
)]
pub struct Settings {
    /// Dataset CSV file (discovered when not specified)
    #[arg(long, env = "ALERTINDIA_DATA")]
    pub data: Option<PathBuf>,

    /// What to run
    #[arg(long, default_value = "serve", value_parser = ["serve", "dashboard", "report"])]
    pub view: String,

    /// Listen address for the query API
    #[arg(long, env = "ALERTINDIA_BIND", default_value = "127.0.0.1:8000")]
    pub bind: String,

    /// Origin allowed to call the API from a browser (repeatable, "*" for any)
    #[arg(long = "cors-origin", default_value = "*")]
    pub cors_origins: Vec<String>,

    /// Header of the region column
    #[arg(long, default_value = "state")]
    pub region_column: String,

    /// Header of the young-bracket count column
    #[arg(long, default_value = "demo_age_5_17")]
    pub young_column: String,

    /// Header of the older-bracket count column
    #[arg(long, default_value = "demo_age_17_")]
    pub older_column: String,

    /// Number of regions listed by the report view (1-1000)
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub top: u32,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.alertindia/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".alertindia").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!(error = %e, "could not clear saved configuration");
            }
            return Self::resolve_overrides(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins over persisted values.
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "data") && settings.data.is_none() {
            settings.data = last.data;
        }

        settings = Self::resolve_overrides(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            tracing::debug!(error = %e, "could not persist last-used parameters");
        }

        settings
    }

    /// Header names to read from the dataset.
    pub fn columns(&self) -> ColumnMapping {
        ColumnMapping {
            region: self.region_column.clone(),
            young: self.young_column.clone(),
            older: self.older_column.clone(),
        }
    }

    /// The `--bind` value as a socket address.
    pub fn bind_addr(&self) -> crate::error::Result<SocketAddr> {
        self.bind
            .parse()
            .map_err(|e| AlertError::Config(format!("invalid --bind address '{}': {e}", self.bind)))
    }

    /// `--debug` overrides the log level.
    fn resolve_overrides(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            view: Some(s.view.clone()),
            data: s.data.clone(),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    // ── LastUsedParams ────────────────────────────────────────────────────────

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            theme: Some("dark".to_string()),
            view: Some("dashboard".to_string()),
            data: Some(PathBuf::from("/srv/aadhaar_data.csv")),
        };

        params.save_to(&path).expect("save");
        let loaded = LastUsedParams::load_from(&path);

        assert_eq!(loaded.theme, Some("dark".to_string()));
        assert_eq!(loaded.view, Some("dashboard".to_string()));
        assert_eq!(loaded.data, Some(PathBuf::from("/srv/aadhaar_data.csv")));
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);

        let params = LastUsedParams {
            theme: Some("light".to_string()),
            ..Default::default()
        };
        params.save_to(&path).expect("save");
        assert!(path.exists(), "file must exist after save");

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists(), "file must be gone after clear");
    }

    #[test]
    fn test_last_used_params_default_when_missing_or_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        assert!(LastUsedParams::load_from(&path).theme.is_none());

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        let loaded = LastUsedParams::load_from(&path);
        assert!(loaded.view.is_none());
        assert!(loaded.data.is_none());
    }

    // ── CLI parsing ───────────────────────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["alertindia"]);

        assert_eq!(settings.view, "serve");
        assert_eq!(settings.bind, "127.0.0.1:8000");
        assert_eq!(settings.cors_origins, vec!["*".to_string()]);
        assert_eq!(settings.columns(), ColumnMapping::default());
        assert_eq!(settings.top, 5);
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
        assert!(!settings.clear);
    }

    #[test]
    fn test_settings_cli_columns() {
        let settings = Settings::parse_from([
            "alertindia",
            "--region-column",
            "region",
            "--young-column",
            "young",
            "--older-column",
            "older",
        ]);
        let columns = settings.columns();
        assert_eq!(columns.region, "region");
        assert_eq!(columns.young, "young");
        assert_eq!(columns.older, "older");
    }

    #[test]
    fn test_settings_cli_repeated_cors_origins() {
        let settings = Settings::parse_from([
            "alertindia",
            "--cors-origin",
            "http://localhost:3000",
            "--cors-origin",
            "http://localhost:5173",
        ]);
        assert_eq!(
            settings.cors_origins,
            vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string()
            ]
        );
    }

    #[test]
    fn test_settings_cli_rejects_unknown_view() {
        assert!(Settings::try_parse_from(["alertindia", "--view", "realtime"]).is_err());
    }

    #[test]
    fn test_settings_bind_addr() {
        let settings = Settings::parse_from(["alertindia", "--bind", "0.0.0.0:9000"]);
        assert_eq!(settings.bind_addr().unwrap().port(), 9000);
    }

    #[test]
    fn test_settings_bind_addr_invalid_is_config_error() {
        let settings = Settings::parse_from(["alertindia", "--bind", "localhost"]);
        let err = settings.bind_addr().unwrap_err();
        assert!(matches!(err, AlertError::Config(_)));
        assert!(err.to_string().contains("invalid --bind address 'localhost'"));
    }

    #[test]
    fn test_settings_cli_rejects_zero_top() {
        assert!(Settings::try_parse_from(["alertindia", "--top", "0"]).is_err());
    }

    // ── load_with_last_used ───────────────────────────────────────────────────

    #[test]
    fn test_load_with_last_used_merges_persisted_theme_and_view() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        LastUsedParams {
            theme: Some("dark".to_string()),
            view: Some("dashboard".to_string()),
            data: None,
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(vec!["alertindia".into()], &config_path);
        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.view, "dashboard");
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        LastUsedParams {
            theme: Some("dark".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["alertindia".into(), "--theme".into(), "light".into()],
            &config_path,
        );
        assert_eq!(settings.theme, "light");
    }

    #[test]
    fn test_load_with_last_used_restores_data_path() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        LastUsedParams {
            data: Some(PathBuf::from("/srv/aadhaar_data.csv")),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(vec!["alertindia".into()], &config_path);
        assert_eq!(settings.data, Some(PathBuf::from("/srv/aadhaar_data.csv")));
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        LastUsedParams {
            theme: Some("classic".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["alertindia".into(), "--clear".into()],
            &config_path,
        );

        assert!(!config_path.exists(), "file must be gone after --clear");
        assert_eq!(settings.theme, "auto");
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let settings = Settings::load_with_last_used_impl(
            vec!["alertindia".into(), "--debug".into()],
            &config_path,
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_persists_after_run() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec!["alertindia".into(), "--view".into(), "report".into()],
            &config_path,
        );

        assert!(config_path.exists(), "config file must be persisted after run");
        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.view, Some("report".to_string()));
    }
}
