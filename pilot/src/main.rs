//! CLI entry point for the driver.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};

use pilot::core::conversation::{ConversationState, TrimPolicy};
use pilot::core::types::{Exchange, InputToken};
use pilot::episode::{EpisodeConfig, EpisodeStop, run_episode};
use pilot::exit_codes;
use pilot::io::config::{PilotConfig, load_config, write_config};
use pilot::io::decision::{CommandDecisionMaker, DEFAULT_PERSONA};
use pilot::io::few_shots::load_few_shots;
use pilot::io::session_log::{RunSummary, SessionLog, write_summary};
use pilot::io::transport::ChildTransport;

#[derive(Parser)]
#[command(
    name = "pilot",
    version,
    about = "LLM-guided driver for an interactive search program"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default `pilot.toml`.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// Drive one episode against the configured program.
    Run {
        /// Path to the configuration file.
        #[arg(short, long, default_value = "pilot.toml")]
        config: PathBuf,
    },
}

fn main() {
    pilot::logging::init();
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => cmd_init(force),
        Command::Run { config } => cmd_run(&config),
    }
}

fn cmd_init(force: bool) -> Result<i32> {
    let path = Path::new("pilot.toml");
    if path.exists() && !force {
        bail!("pilot.toml already exists (use --force to overwrite)");
    }
    write_config(path, &PilotConfig::default())?;
    Ok(exit_codes::OK)
}

fn cmd_run(config_path: &Path) -> Result<i32> {
    let cfg = load_config(config_path)?;

    let persona = match &cfg.persona_path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("read persona {}", path.display()))?
        }
        None => DEFAULT_PERSONA.to_string(),
    };
    let base: Vec<Exchange> = match &cfg.few_shots_path {
        Some(path) => load_few_shots(path)?,
        None => Vec::new(),
    };
    let advance_token = InputToken::parse(&cfg.advance_token)
        .ok_or_else(|| anyhow!("advance_token {:?} is not a legal input", cfg.advance_token))?;

    let mut transport = ChildTransport::spawn(&cfg.program.command)?;
    let mut decision_maker = CommandDecisionMaker::new(
        cfg.decision.command.clone(),
        persona,
        Duration::from_secs(cfg.decision.timeout_secs),
        cfg.decision.output_limit_bytes,
    );
    let mut log = SessionLog::create(&cfg.log_path)?;
    let conversation = ConversationState::new(base, TrimPolicy::default());
    let episode_config = EpisodeConfig {
        max_iterations: cfg.max_iterations,
        advance_token,
    };

    let outcome = run_episode(
        &mut transport,
        &mut decision_maker,
        &mut log,
        conversation,
        &episode_config,
    )?;

    write_summary(
        &cfg.summary_path,
        &RunSummary {
            iterations: outcome.iterations,
            stop: outcome.stop,
            steps: outcome.steps.clone(),
        },
    )?;
    println!("steps taken: {:?}", outcome.steps);

    Ok(match outcome.stop {
        EpisodeStop::Terminal => exit_codes::OK,
        EpisodeStop::IterationLimit => exit_codes::LIMIT,
    })
}
