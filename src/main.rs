mod cli;

use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use log::info;

use speedup_graph::{chart, process_file};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = cli::Args::parse();

    let report = process_file(&args.input, args.trials)
        .with_context(|| format!("failed to aggregate {}", args.input.display()))?;
    info!(
        "{} sizes plotted, {} groups skipped",
        report.sizes().len(),
        report.skipped().len()
    );

    let mut stdout = io::stdout().lock();
    report.write(&mut stdout)?;
    stdout.flush()?;

    chart::render(&report, &args.output)
        .with_context(|| format!("failed to write chart {}", args.output.display()))?;
    Ok(())
}
