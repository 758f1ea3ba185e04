mod bootstrap;
mod report;

use anyhow::{bail, Result};
use alert_core::settings::Settings;
use alert_data::reader::{load_table, resolve_data_path};
use alert_data::AggregationEngine;
use alert_server::AppState;
use alert_ui::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    let log_file = bootstrap::log_destination(&settings);
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("AlertIndia v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(view = %settings.view, theme = %settings.theme, "settings resolved");

    // A missing or malformed dataset is fatal before any view starts.
    let path = resolve_data_path(settings.data.as_deref())?;
    let table = load_table(&path, &settings.columns())?;
    let engine = AggregationEngine::new(table);

    match settings.view.as_str() {
        "serve" => {
            let addr = settings.bind_addr()?;
            let state = AppState::with_cors(engine, settings.cors_origins.clone());
            alert_server::serve(addr, state).await?;
        }
        "dashboard" => {
            App::new(engine, &settings.theme).run()?;
        }
        "report" => {
            let stdout = std::io::stdout();
            report::write_report(&mut stdout.lock(), &engine, settings.top as usize)?;
        }
        unknown => bail!("Unknown view: {unknown}"),
    }

    Ok(())
}
