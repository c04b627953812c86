//! CLI binary for factchain.

use std::path::PathBuf;

use clap::Parser;
use factchain::{FactChecker, FactchainConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEMO_TEXT: &str = "Einstein published the special theory of relativity in 1905, \
changing how time and space were understood. According to the theory, the speed of light is \
the same in every inertial frame, and time is not absolute but depends on the observer. \
In 1915 he went on to show, through general relativity, that gravity can be explained as the \
curvature of spacetime.";

/// Extract claims from text, collect web evidence and score their credibility.
#[derive(Parser)]
#[command(name = "factchain", version, about)]
struct Cli {
    /// Text to verify. Defaults to a built-in demo passage.
    #[arg(long)]
    text: Option<String>,

    /// Language model to use.
    #[arg(long)]
    model: Option<String>,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the JSON report.
    #[arg(short, long, default_value = "output.json")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("factchain=info,factchain_search=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = FactchainConfig::load(cli.config.as_deref())?;
    if let Some(model) = cli.model {
        config = config.with_model(model);
    }

    let checker = FactChecker::from_config(config)?;
    let text = cli.text.as_deref().unwrap_or(DEMO_TEXT);
    let report = checker.run(text).await;

    report.write_json(&cli.output)?;
    info!(path = %cli.output.display(), "report written");

    print!("{}", report.render_summary());
    println!("\nFull JSON report: {}", cli.output.display());
    Ok(())
}
