use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use gcode_toolpath::config::{Config, View};
use gcode_toolpath::scan::{Scan, ScanStatus};

fn main() -> Result<()> {
    let config = Config::from_args_and_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    if let Some(path) = &config.config_file {
        log::debug!("Using settings file {}", path.display());
    }

    let text = fs::read_to_string(&config.input)
        .with_context(|| format!("Failed to read {}", config.input.display()))?;

    let mut scan = Scan::new(&text, config.parse_options());
    while let ScanStatus::InProgress { processed, total } = scan.step(config.batch_size) {
        log::debug!("{}/{} lines", processed, total);
    }
    let output = scan.finish();
    let summary = output.summary();

    log::info!(
        "{}: {} records, {} segments ({} printing, {} travel)",
        config.input.display(),
        summary.records,
        summary.segments,
        summary.printing_segments,
        summary.travel_segments
    );

    let mut document = Map::new();
    if matches!(config.view, View::All | View::Toolpath) {
        document.insert(
            "segments".to_string(),
            serde_json::to_value(&output.toolpath.segments)?,
        );
    }
    if matches!(config.view, View::All | View::Commands) {
        document.insert("records".to_string(), serde_json::to_value(&output.records)?);
    }
    document.insert("summary".to_string(), serde_json::to_value(&summary)?);
    let document = Value::Object(document);

    let mut stdout = io::stdout().lock();
    if config.pretty {
        serde_json::to_writer_pretty(&mut stdout, &document)?;
    } else {
        serde_json::to_writer(&mut stdout, &document)?;
    }
    writeln!(stdout).context("Failed to write output")?;

    Ok(())
}
