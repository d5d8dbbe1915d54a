use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use numstat::{
    config::DemoConfig,
    demo::{Summary, run_demo},
    greet::greeting,
    stats::{average, moving_average, stddev},
};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

/// Values used by `stats` when no file is given.
const FALLBACK_DATA: [f64; 10] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute simple statistics over a list of numbers
    Stats {
        /// Path to a JSON array of numbers
        #[arg(long)]
        file: Option<PathBuf>,

        /// Window size for the moving average
        #[arg(long, default_value_t = 3)]
        window: usize,
    },

    /// Run the synthetic data-processing demo
    Demo {
        /// Path to a TOML demo configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the per-item processing log after the summary
        #[arg(long)]
        show_log: bool,
    },

    /// Print a timestamped greeting
    Greet {
        #[arg(long, default_value = "numstat")]
        name: String,
    },
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::debug!("{args:#?}");

    match args.command {
        Command::Stats { file, window } => run_stats(file, window)?,
        Command::Demo { config, show_log } => {
            let cfg = match config {
                Some(file) => DemoConfig::from_file(&file)
                    .with_context(|| format!("failed to load {file:?}"))?,
                None => DemoConfig::default(),
            };
            log::info!("{cfg:#?}");

            let report = run_demo(&cfg).context("failed to run demo")?;
            print_summary(&report.summary);
            if show_log {
                for entry in &report.log {
                    println!("{entry}");
                }
            }
        }
        Command::Greet { name } => println!("{}", greeting(&name, Local::now())),
    }

    Ok(())
}

fn run_stats(file: Option<PathBuf>, window: usize) -> Result<()> {
    let data = match file {
        Some(file) => read_numbers(&file).with_context(|| format!("failed to read {file:?}"))?,
        None => FALLBACK_DATA.to_vec(),
    };
    log::info!("loaded {} values", data.len());

    let avg = average(&data).context("failed to compute average")?;
    let mov = moving_average(&data, window).context("failed to compute moving average")?;
    let std = stddev(&data).context("failed to compute standard deviation")?;

    println!("avg: {avg}");
    println!("mov: {mov:?}");
    println!("std: {std}");

    Ok(())
}

fn read_numbers(file: &Path) -> Result<Vec<f64>> {
    let file = File::open(file).with_context(|| format!("failed to open {file:?}"))?;
    let reader = BufReader::new(file);
    let data = serde_json::from_reader(reader).context("expected a JSON array of numbers")?;
    Ok(data)
}

fn print_summary(summary: &Summary) {
    println!(
        "processor '{}' processed {} items ({} rejected, {} warnings)",
        summary.processor_name,
        summary.processed_count,
        summary.invalid_count,
        summary.warning_count
    );
    if let Some(value_stats) = summary.value_stats {
        println!(
            "values: mean {} std {}",
            value_stats.mean, value_stats.std_dev
        );
    }
    for issue in &summary.issues {
        println!("  - {issue}");
    }
}
