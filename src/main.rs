use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

use stateflow::config::Config;
use stateflow::logging::init_tracing;
use stateflow::runner;

#[derive(Parser, Debug)]
#[command(name = "stateflow")]
#[command(about = "Walk through shared, owned-once and nested state ownership demos", long_about = None)]
struct Cli {
    #[command(subcommand)]
    demo: Demo,

    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the simulated load delay, in milliseconds
    #[arg(long, global = true)]
    delay_ms: Option<u64>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Demo {
    /// Parent state shared with a rebuilt child and an owned-once child
    Counter,

    /// Keyed list whose cells go stale when items change in place
    Catalog {
        /// Overlay the live item data on each cell
        #[arg(long)]
        debug: bool,
    },

    /// Child container nested in a parent field, optionally bridged
    Nested {
        /// Forward child changes to the parent
        #[arg(long)]
        bridged: bool,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load().with_context(|| {
            format!("loading config from {}", Config::config_path().display())
        })?,
    };
    if let Some(delay_ms) = cli.delay_ms {
        config.load.delay_ms = delay_ms;
        config.validate()?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config.logging);

    let delay: Duration = config.load.delay();
    tracing::debug!(demo = ?cli.demo, delay_ms = config.load.delay_ms, "Running demo");

    let mut stdout = std::io::stdout().lock();
    match cli.demo {
        Demo::Counter => runner::run_counter(&mut stdout)?,
        Demo::Catalog { debug } => runner::run_catalog(&mut stdout, delay, debug).await?,
        Demo::Nested { bridged } => runner::run_nested(&mut stdout, delay, bridged).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_nested_bridged() {
        let cli = Cli::try_parse_from(["stateflow", "nested", "--bridged"]).unwrap();
        assert_eq!(cli.demo, Demo::Nested { bridged: true });
        assert!(cli.config.is_none());
    }

    #[test]
    fn parse_global_delay_after_subcommand() {
        let cli = Cli::try_parse_from(["stateflow", "catalog", "--delay-ms", "5"]).unwrap();
        assert_eq!(cli.delay_ms, Some(5));
        assert_eq!(cli.demo, Demo::Catalog { debug: false });
    }

    #[test]
    fn parse_requires_demo() {
        assert!(Cli::try_parse_from(["stateflow"]).is_err());
    }

    #[test]
    fn delay_override_is_validated() {
        let cli = Cli::try_parse_from([
            "stateflow",
            "--config",
            "/nonexistent/stateflow.toml",
            "--delay-ms",
            "120000",
            "counter",
        ])
        .unwrap();
        assert!(load_config(&cli).is_err());
    }
}
