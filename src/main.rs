use anyhow::Result;
use clap::Parser;

use crossmapgen::cli::Cli;
use crossmapgen::config::RunConfig;
use crossmapgen::{driver, logging, runtime};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = RunConfig::from_cli(&cli);

    logging::init(&config.log_path)?;
    runtime::configure_thread_pool();

    let summary = driver::run(&config)?;
    eprintln!(
        "wrote {} translations to {} ({} missing of {} reference entries{})",
        summary.output_lines,
        config.output_path.display(),
        summary.missing_count,
        summary.reference_size,
        summary
            .wrong_count
            .map(|w| format!(", {w} wrong vs. verification crossmap"))
            .unwrap_or_default(),
    );
    Ok(())
}
