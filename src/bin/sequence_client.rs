//! Sequence client entry point.
//!
//! One invocation runs exactly one federated round for the windowed
//! transaction classifier and exits. `train` fits and persists artifacts;
//! `eval` replays the frozen ones. A failed remote report does not fail
//! the process; a failed round does.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use fedsim::constants;
use fedsim::round::{run_sequence_round, RoundMode};
use fedsim::ClientConfig;

#[derive(Parser, Debug)]
#[command(
    name = "sequence-client",
    version = constants::APP_VERSION,
    about = "Federated sequence client: windowed transaction classifier"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fit one round on local data and persist the round artifacts
    Train(RoundArgs),
    /// Evaluate the persisted model without refitting anything
    Eval(RoundArgs),
}

#[derive(clap::Args, Debug)]
struct RoundArgs {
    /// Input transaction table (CSV with named columns)
    data: PathBuf,

    /// Model weight artifact; schema and scaler live beside it
    model: PathBuf,

    /// Metrics snapshot file, overwritten each round
    metrics: PathBuf,

    /// Aggregator endpoint for the metrics report
    #[arg(default_value_t = constants::get_server_url())]
    endpoint: String,

    /// Append-only metric history (default: accuracy_log.csv beside the snapshot)
    history: Option<PathBuf>,

    /// Sliding window size in samples
    window: Option<usize>,

    /// Include account identifier columns in the categorical set (0/1)
    include_accounts: Option<u8>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let (mode, args) = match cli.command {
        Commands::Train(args) => (RoundMode::Train, args),
        Commands::Eval(args) => (RoundMode::Eval, args),
    };

    let cfg = ClientConfig::sequence(
        args.data,
        args.model,
        args.metrics,
        args.endpoint,
        args.history,
        args.window,
        args.include_accounts.map(|v| v != 0).unwrap_or(false),
    );

    match run_sequence_round(&cfg, mode) {
        Ok(summary) => {
            log::info!(
                "Round {} complete: accuracy {:.4}, report delivered: {}",
                summary.record.round,
                summary.record.accuracy,
                summary.report.delivered
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Round failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
