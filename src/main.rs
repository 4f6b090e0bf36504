use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use grid_snake::config::AppConfig;
use grid_snake::game::{
    TailPolicy,
    config::{MAX_GRID_SIZE, MIN_GRID_SIZE},
};
use grid_snake::logging;
use grid_snake::modes::HumanMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake on a square grid, in the terminal")]
struct Cli {
    /// Game mode
    #[arg(long, default_value = "human")]
    mode: Mode,

    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width and height
    #[arg(long, value_parser = clap::value_parser!(u16).range(MIN_GRID_SIZE as i64..=MAX_GRID_SIZE as i64))]
    grid_size: Option<u16>,

    /// Milliseconds between game ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Whether the cell the tail leaves counts as an obstacle
    #[arg(long)]
    tail_policy: Option<TailPolicyArg>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write the effective config to this file and exit
    #[arg(long)]
    save_config: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard and mouse controls
    Human,
}

#[derive(Clone, Copy, ValueEnum)]
enum TailPolicyArg {
    /// The head may move onto the cell the tail is leaving
    Vacating,
    /// The whole body, tail included, is an obstacle
    Strict,
}

impl From<TailPolicyArg> for TailPolicy {
    fn from(arg: TailPolicyArg) -> Self {
        match arg {
            TailPolicyArg::Vacating => TailPolicy::Vacating,
            TailPolicyArg::Strict => TailPolicy::Strict,
        }
    }
}

impl Cli {
    /// Defaults, then the config file, then flags
    fn app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        if let Some(size) = self.grid_size {
            config.game = config.game.with_grid_size(usize::from(size));
        }
        if let Some(tick_ms) = self.tick_ms {
            config.game.tick_interval_ms = tick_ms;
        }
        if let Some(policy) = self.tail_policy {
            config.game.tail_policy = policy.into();
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = Some(log_file.clone());
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.app_config()?;

    if let Some(path) = &cli.save_config {
        config.save(path)?;
        println!("Config written to {}", path.display());
        return Ok(());
    }

    logging::init(config.log_file.as_deref())?;
    tracing::info!(config = ?config.game, "configuration loaded");

    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(&config, cli.seed);
            human_mode.run().await?;
        }
    }

    Ok(())
}
