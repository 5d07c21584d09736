//! votedraw daemon: entry point for running a voting session.

mod config;
mod replay;
mod shutdown;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use votedraw_ledger::LedgerExport;
use votedraw_resolution::ResolutionCoordinator;
use votedraw_rpc::{RpcServer, RpcState};
use votedraw_types::{Seed, SessionPhase, VoteError};
use votedraw_utils::{init_logging, LogFormat};
use votedraw_vrf::{OsEntropy, RandomnessSource, SeedCommitment, SessionSeed};

use crate::config::DaemonConfig;
use crate::shutdown::ShutdownController;

#[derive(Parser)]
#[command(
    name = "votedraw-daemon",
    about = "Run a vote and draw a prize winner from the backers of the top choice"
)]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Defaults to the config file value, then "info".
    #[arg(long, global = true, env = "VOTEDRAW_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "VOTEDRAW_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Serve a voting session over HTTP until SIGINT/SIGTERM.
    Serve {
        /// Path to a TOML configuration file. If provided, file settings
        /// are used as the base; CLI flags and env vars override them.
        #[arg(long, env = "VOTEDRAW_CONFIG")]
        config: Option<PathBuf>,

        /// Address to bind the RPC server to.
        #[arg(long, env = "VOTEDRAW_RPC_HOST")]
        host: Option<String>,

        /// RPC server port.
        #[arg(long, env = "VOTEDRAW_RPC_PORT")]
        port: Option<u16>,

        /// Hex draw seed (64 chars). Generated from OS entropy when absent.
        #[arg(long, env = "VOTEDRAW_SEED", hide_env_values = true)]
        seed: Option<String>,

        /// Choice label; repeat for each choice, or comma-separate.
        #[arg(long = "choice", env = "VOTEDRAW_CHOICES", value_delimiter = ',')]
        choices: Vec<String>,

        /// Token required on admin routes.
        #[arg(long, env = "VOTEDRAW_ADMIN_TOKEN", hide_env_values = true)]
        admin_token: Option<String>,

        /// Start with voting closed until `POST /admin/open`.
        #[arg(long)]
        no_open: bool,
    },

    /// Print a fresh seed and its commitment.
    Seed,

    /// Recompute a closed session's winner and draw from its export.
    Replay {
        /// Ledger export JSON (as served by `GET /ledger/export`).
        #[arg(long)]
        export: PathBuf,

        /// Revealed hex seed.
        #[arg(long)]
        seed: String,

        /// Commitment published while voting was open.
        #[arg(long)]
        commitment: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            seed,
            choices,
            admin_token,
            no_open,
        } => {
            let file_config = match config {
                Some(path) => DaemonConfig::from_toml_file(&path)?,
                None => DaemonConfig::default(),
            };
            let config = DaemonConfig {
                choices: if choices.is_empty() {
                    file_config.choices
                } else {
                    choices
                },
                seed: seed.or(file_config.seed),
                rpc_host: host.unwrap_or(file_config.rpc_host),
                rpc_port: port.unwrap_or(file_config.rpc_port),
                admin_token: admin_token.or(file_config.admin_token),
                open_on_start: file_config.open_on_start && !no_open,
                log_format: cli.log_format.unwrap_or(file_config.log_format),
                log_level: cli.log_level.unwrap_or(file_config.log_level),
            };
            config.validate()?;
            init_logging(config.log_format, &config.log_level);
            serve(config).await?;
        }
        Command::Seed => {
            init_logging(cli.log_format.unwrap_or_default(), &log_level(cli.log_level));
            let seed = OsEntropy::fresh_seed()?;
            println!("seed:       {}", seed.to_hex());
            println!("commitment: {}", SeedCommitment::commit(&seed));
        }
        Command::Replay {
            export,
            seed,
            commitment,
        } => {
            init_logging(cli.log_format.unwrap_or_default(), &log_level(cli.log_level));
            let content = std::fs::read_to_string(&export)
                .with_context(|| format!("reading {}", export.display()))?;
            let export: LedgerExport =
                serde_json::from_str(&content).context("parsing ledger export")?;
            let seed: Seed = seed.parse().context("parsing seed")?;
            let report = replay::replay(export, seed, commitment.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn log_level(cli: Option<String>) -> String {
    cli.unwrap_or_else(|| "info".to_string())
}

async fn serve(config: DaemonConfig) -> anyhow::Result<()> {
    let source = match config.parsed_seed()? {
        Some(seed) => SessionSeed::new(seed),
        None => {
            info!("no seed configured, generating one from OS entropy");
            SessionSeed::generate()?
        }
    };
    if let Some(commitment) = source.commitment() {
        info!(%commitment, "draw seed committed");
    }

    let coordinator = Arc::new(ResolutionCoordinator::from_labels(
        config.choices.iter().cloned(),
        Box::new(source),
    )?);
    info!(
        choices = %config.choices.join(", "),
        "starting votedraw session on {}:{}",
        config.rpc_host,
        config.rpc_port
    );
    if config.open_on_start {
        coordinator.open()?;
        info!("voting open");
    }

    let mut state = RpcState::new(coordinator.clone());
    if let Some(token) = &config.admin_token {
        state = state.with_admin_token(token.clone());
    }
    let server = RpcServer::new(config.rpc_host.clone(), config.rpc_port, Arc::new(state));

    let shutdown = Arc::new(ShutdownController::new());
    let signalled = shutdown.signalled();
    let signals = shutdown.clone();
    tokio::spawn(async move { signals.wait_for_signal().await });

    server.start(signalled).await?;

    finish(&coordinator);
    info!("votedraw daemon exited cleanly");
    Ok(())
}

/// Close voting, reveal the seed and log the final draw.
fn finish(coordinator: &ResolutionCoordinator) {
    if coordinator.phase() == SessionPhase::Uninitialized {
        info!("voting was never opened; no result");
        return;
    }
    if let Err(e) = coordinator.close() {
        warn!("failed to close voting: {e}");
        return;
    }
    info!(votes = coordinator.vote_count(), "voting closed");

    match coordinator.revealed_seed() {
        Ok(Some(seed)) => info!(seed = %seed.to_hex(), "draw seed revealed"),
        Ok(None) => {}
        Err(e) => warn!("seed not revealed: {e}"),
    }

    match coordinator.draw() {
        Ok(outcome) => info!(
            voter = %outcome.voter,
            eligible = outcome.eligible,
            "final draw"
        ),
        Err(VoteError::NoVotesCast) => info!("no votes cast; no winner"),
        Err(e) => warn!("final draw failed: {e}"),
    }
}
