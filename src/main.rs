use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use ue_histos::{BookingConfig, UEAnalysisHandler, UEError, UEEventRecord};

#[derive(Parser)]
#[command(name = "ue-histos")]
#[command(about = "Fill underlying-event histograms and migration matrices")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Book axes and empty histograms from a YAML booking
    Book {
        /// Booking configuration (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Persisted analysis to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Fill a booked analysis from an event file
    Fill {
        /// Booking configuration (YAML) the analysis was booked from
        #[arg(short, long)]
        config: PathBuf,

        /// Persisted analysis written by `book`
        #[arg(short, long)]
        analysis: PathBuf,

        /// Events, one JSON record after another
        #[arg(short, long)]
        events: PathBuf,

        /// Filled analysis to write
        #[arg(short, long)]
        output: PathBuf,

        /// Worker threads (0 = auto)
        #[arg(long, default_value = "0")]
        threads: usize,
    },
}

fn main() -> ExitCode {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), UEError> {
    match cli.command {
        Commands::Book { config, output } => {
            let config = BookingConfig::from_yaml_file(&config)?;
            config.book()?.save(&output)
        }
        Commands::Fill {
            config,
            analysis,
            events,
            output,
            threads,
        } => {
            let config = BookingConfig::from_yaml_file(&config)?;
            let mut handler = UEAnalysisHandler::open(&analysis)?;
            fill(&config, &mut handler, &events, threads)?;
            handler.save(&output)
        }
    }
}

fn fill(
    config: &BookingConfig,
    handler: &mut UEAnalysisHandler,
    events: &Path,
    threads: usize,
) -> Result<(), UEError> {
    let events = UEEventRecord::stream(events)?;
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;

    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {pos} events ({per_sec})") {
        progress.set_style(style);
    }

    let empty = handler.zeroed();
    let filled = pool.install(|| {
        events
            .par_bridge()
            .try_fold(
                || empty.clone(),
                |mut worker, ue| -> Result<UEAnalysisHandler, UEError> {
                    config.fill_event(&mut worker, &ue?)?;
                    progress.inc(1);
                    Ok(worker)
                },
            )
            .try_reduce(
                || empty.clone(),
                |mut merged, part| {
                    merged.merge(&part)?;
                    Ok(merged)
                },
            )
    })?;
    let count = progress.position();
    progress.finish_and_clear();

    handler.merge(&filled)?;
    log::info!(
        "Filled {} histograms from {count} events on {} threads",
        handler.histos.len(),
        pool.current_num_threads()
    );
    Ok(())
}
