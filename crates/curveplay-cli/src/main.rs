use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use curveplay_core::{AppConfig, CurveKind, CurveMode};

mod commands;

#[derive(Parser)]
#[command(name = "curveplay")]
#[command(author, version, about = "An interactive scrolling curve playground for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (defaults to ~/.config/curveplay/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the curve playground (default)
    Run(RunArgs),
    /// Show the resolved configuration
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Control point behaviour: scrolling or fixed
    #[arg(short, long)]
    mode: Option<CurveMode>,
    /// Initial curve kind: linear, smooth-step or hermite
    #[arg(short, long)]
    curve: Option<CurveKind>,
    /// Seed for reproducible control points
    #[arg(long)]
    seed: Option<u64>,
}

impl RunArgs {
    /// Command line flags take precedence over the configuration file
    fn apply(&self, config: &mut AppConfig) {
        if let Some(mode) = self.mode {
            config.curve.mode = mode;
        }
        if let Some(kind) = self.curve {
            config.curve.kind = Some(kind);
        }
        if let Some(seed) = self.seed {
            config.general.seed = Some(seed);
        }
    }
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let log_file = config.log_file();
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    // The terminal is in raw mode while running, so logs go to a file
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let mut config = AppConfig::load_from(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    match cli.command {
        Some(Commands::Config { init }) => commands::config::run(&config, &config_path, init),
        Some(Commands::Run(args)) => {
            args.apply(&mut config);
            init_logging(&config)?;
            commands::run::run(config)
        }
        None => {
            cli.run.apply(&mut config);
            init_logging(&config)?;
            commands::run::run(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_without_subcommand() {
        let cli = Cli::try_parse_from(["curveplay", "--mode", "fixed", "--seed", "9"]).unwrap();
        assert!(cli.command.is_none());
        let mut config = AppConfig::default();
        cli.run.apply(&mut config);
        assert_eq!(config.curve.mode, CurveMode::Fixed);
        assert_eq!(config.general.seed, Some(9));
    }

    #[test]
    fn test_run_subcommand_overrides_curve() {
        let cli = Cli::try_parse_from(["curveplay", "run", "--curve", "smooth-step"]).unwrap();
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run subcommand");
        };
        let mut config = AppConfig::default();
        args.apply(&mut config);
        assert_eq!(config.curve.kind, Some(CurveKind::SmoothStep));
        assert_eq!(config.curve.mode, CurveMode::Scrolling);
    }

    #[test]
    fn test_bad_curve_rejected() {
        assert!(Cli::try_parse_from(["curveplay", "--curve", "bezier"]).is_err());
    }

    #[test]
    fn test_config_init_flag() {
        let cli = Cli::try_parse_from(["curveplay", "config", "--init"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config { init: true })));
    }
}
