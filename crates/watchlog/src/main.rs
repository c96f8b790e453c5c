mod bootstrap;
mod summary;

use anyhow::Result;
use watchlog_core::settings::{OutputFormat, Settings};
use watchlog_runtime::{Dataset, DatasetOptions};
use watchlog_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();
    settings.validate()?;

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("watchlog v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Metric: {:?}, Series: {}, Timezone: {}, Theme: {}",
        settings.metric,
        settings.series,
        settings.timezone,
        settings.theme
    );

    match settings.format {
        OutputFormat::Json => {
            // validate() guarantees a file in json mode.
            let Some(path) = settings.file.as_deref() else {
                anyhow::bail!("--format json needs a CSV file argument");
            };
            let summary = summary::from_settings(&settings, path)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        OutputFormat::Tui => {
            let dataset = Dataset::new(DatasetOptions {
                metric_mode: settings.metric,
                title_rule: settings.title_rule(),
                timezone: settings.timezone.clone(),
            });
            let app = App::new(
                &settings.theme,
                dataset,
                settings.page_size as usize,
                settings.top_limit(),
            );

            // The loop exits on 'q' / Ctrl+C inside the TUI. We also listen
            // for Ctrl+C at the OS level for signals delivered outside raw mode.
            tokio::select! {
                result = app.run(settings.file.clone()) => {
                    result?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down");
                }
            }
        }
    }

    Ok(())
}
