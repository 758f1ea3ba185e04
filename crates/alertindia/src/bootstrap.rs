use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use alert_core::settings::Settings;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Name of the per-user state directory under `$HOME`.
pub const APP_DIR: &str = ".alertindia";

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.alertindia/` and `~/.alertindia/logs/` exist.
pub fn ensure_directories() -> anyhow::Result<()> {
    ensure_directories_in(&home())
}

pub fn ensure_directories_in(base: &Path) -> anyhow::Result<()> {
    let app_dir = base.join(APP_DIR);
    std::fs::create_dir_all(&app_dir)?;
    std::fs::create_dir_all(app_dir.join("logs"))?;
    Ok(())
}

/// `~/.alertindia/logs/alertindia.log`
pub fn default_log_path() -> PathBuf {
    home().join(APP_DIR).join("logs").join("alertindia.log")
}

/// Where log output goes: an explicit `--log-file`, the default log file
/// while the dashboard owns the terminal, otherwise stderr (`None`).
pub fn log_destination(settings: &Settings) -> Option<PathBuf> {
    match (&settings.log_file, settings.view.as_str()) {
        (Some(path), _) => Some(path.clone()),
        (None, "dashboard") => Some(default_log_path()),
        (None, _) => None,
    }
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a CLI level name onto an [`EnvFilter`] directive.
pub fn filter_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" | "WARN" => "warn",
        "ERROR" | "CRITICAL" => "error",
        "TRACE" => "trace",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `log_level` when set. With a `log_file`
/// the output is appended there without ANSI colours; otherwise it goes to
/// stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(log_level)));

    let (file_layer, stderr_layer) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), None)
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            (None, Some(layer))
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn settings(args: &[&str]) -> Settings {
        let mut argv = vec!["alertindia"];
        argv.extend_from_slice(args);
        Settings::parse_from(argv)
    }

    #[test]
    fn test_ensure_directories_in() {
        let tmp = TempDir::new().expect("tempdir");
        ensure_directories_in(tmp.path()).expect("ensure_directories_in should succeed");

        let app_dir = tmp.path().join(APP_DIR);
        assert!(app_dir.is_dir(), ".alertindia dir must exist");
        assert!(app_dir.join("logs").is_dir(), "logs subdir must exist");
    }

    #[test]
    fn test_ensure_directories_is_idempotent() {
        let tmp = TempDir::new().expect("tempdir");
        ensure_directories_in(tmp.path()).expect("first");
        ensure_directories_in(tmp.path()).expect("second");
    }

    #[test]
    fn test_default_log_path_shape() {
        let path = default_log_path();
        assert!(path.ends_with(".alertindia/logs/alertindia.log"));
    }

    #[test]
    fn test_filter_directive_mapping() {
        assert_eq!(filter_directive("DEBUG"), "debug");
        assert_eq!(filter_directive("INFO"), "info");
        assert_eq!(filter_directive("WARNING"), "warn");
        assert_eq!(filter_directive("ERROR"), "error");
        assert_eq!(filter_directive("CRITICAL"), "error");
        assert_eq!(filter_directive("bogus"), "info");
    }

    #[test]
    fn test_log_destination_serve_uses_stderr() {
        assert_eq!(log_destination(&settings(&["--view", "serve"])), None);
    }

    #[test]
    fn test_log_destination_dashboard_uses_file() {
        assert_eq!(
            log_destination(&settings(&["--view", "dashboard"])),
            Some(default_log_path())
        );
    }

    #[test]
    fn test_log_destination_explicit_file_wins() {
        let s = settings(&["--view", "report", "--log-file", "/tmp/a.log"]);
        assert_eq!(log_destination(&s), Some(PathBuf::from("/tmp/a.log")));
    }
}
