//! NovaForge client entry point.

use anyhow::Context;
use clap::Parser;
use cli::{App, Cli, Config, LogFormat};
use client::HttpStorefrontApi;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let json = config.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Configuration: environment, then flags
    let config = Config::from_env().with_overrides(cli.backend_url, cli.data_dir);

    // 2. Tracing to stderr so stdout stays clean
    init_tracing(&config);
    tracing::debug!(?config, "starting");

    // 3. Backend client
    let api = HttpStorefrontApi::new(&config.backend_url, config.http_timeout)
        .context("failed to build HTTP client")?;

    // 4. Run
    let app = App::new(api, &config.data_dir);
    let mut stdout = std::io::stdout().lock();
    app.run(cli.command, &mut stdout).await?;

    Ok(())
}
