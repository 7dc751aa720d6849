use anyhow::Result;
use clap::Parser;
use shuffly_cli::cli::Cli;
use shuffly_cli::commands;
use shuffly_cli::config::ShufflyConfig;
use tracing::debug;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ShufflyConfig::load(cli.config.as_deref())?.with_overrides(cli.state, cli.seed);
    debug!(
        state = %config.state_path.display(),
        seed = ?config.seed,
        "Configuration loaded"
    );

    let output = commands::run(&cli.command, &config)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
