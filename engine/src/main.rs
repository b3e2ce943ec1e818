// Screener command-line entry point
use anyhow::Context;
use clap::Parser;
use engine::config::ScreenerSettings;
use engine::data::{FileMarketData, StaticUniverse, Universe};
use engine::report::{criteria_legend, ConsoleSink};
use engine::screening::{IndicatorEngine, RunState, ScreeningController};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "screener", about = "Screen an equity universe against technical and fundamental thresholds")]
struct Args {
    /// Universe to screen
    #[arg(value_enum)]
    universe: Universe,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding prices/, fundamentals.json and sp500.csv
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Delay between tickers, in milliseconds
    #[arg(long)]
    pacing_ms: Option<u64>,

    /// Print how to read each indicator before screening
    #[arg(long)]
    criteria: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut settings = ScreenerSettings::load(args.config.as_deref())?;
    if let Some(dir) = &args.data_dir {
        settings = settings.with_data_dir(dir);
    }
    if let Some(ms) = args.pacing_ms {
        settings.pacing_delay_ms = ms;
    }
    info!(?settings, "Starting screener");

    if args.criteria {
        let engine = IndicatorEngine::new(settings.thresholds);
        println!("{}\n", criteria_legend(&engine, &settings.thresholds));
    }

    let universe_source = Arc::new(StaticUniverse::new(&settings.sp500_file));
    let market = Arc::new(FileMarketData::open(&settings.price_data_dir, &settings.fundamentals_file)?);
    let mut controller = ScreeningController::new(universe_source, market, &settings);
    let mut sink = ConsoleSink::new(std::io::stdout(), settings.thresholds);

    let handle = controller
        .start(args.universe)
        .await
        .with_context(|| format!("Could not start screening the {} universe", args.universe))?;

    // Ctrl-C pauses between tickers instead of killing the process.
    let pause_handle = handle.clone();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            pause_handle.pause();
        }
    });

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match controller.run(&mut sink).await {
            RunState::Paused => {
                println!("Type 'r' to resume or 'q' to quit:");
                let answer = stdin.next_line().await?.unwrap_or_default();
                if answer.trim().eq_ignore_ascii_case("r") {
                    controller.resume();
                    continue;
                }
                sink.print_results(controller.current_results());
                break;
            }
            RunState::Completed | RunState::Idle | RunState::Running => break,
        }
    }

    info!(
        run_id = %handle.run_id(),
        processed = handle.processed(),
        total = handle.total(),
        "Screener finished"
    );
    Ok(())
}
