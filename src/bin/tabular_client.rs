//! Tabular client entry point.
//!
//! One invocation runs one federated round for the least-squares
//! regressor. The primary metric is MSE, reported under the shared
//! `accuracy` key so both clients speak the same snapshot and wire format.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use fedsim::constants;
use fedsim::round::{run_tabular_round, RoundMode};
use fedsim::ClientConfig;

#[derive(Parser, Debug)]
#[command(
    name = "tabular-client",
    version = constants::APP_VERSION,
    about = "Federated tabular client: single-feature least-squares regressor"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fit one round on local data and persist the weight artifact
    Train(RoundArgs),
    /// Evaluate the persisted model without refitting
    Eval(RoundArgs),
}

#[derive(clap::Args, Debug)]
struct RoundArgs {
    /// Input table with X and y columns (CSV)
    data: PathBuf,

    /// Model weight artifact
    model: PathBuf,

    /// Metrics snapshot file, overwritten each round
    metrics: PathBuf,

    /// Aggregator endpoint for the metrics report
    #[arg(default_value_t = constants::get_server_url())]
    endpoint: String,

    /// Append-only metric history (default: accuracy_log.csv beside the snapshot)
    history: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let (mode, args) = match cli.command {
        Commands::Train(args) => (RoundMode::Train, args),
        Commands::Eval(args) => (RoundMode::Eval, args),
    };

    let cfg = ClientConfig::tabular(args.data, args.model, args.metrics, args.endpoint, args.history);

    match run_tabular_round(&cfg, mode) {
        Ok(summary) => {
            log::info!(
                "Round {} complete: MSE {:.6}, report delivered: {}",
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
