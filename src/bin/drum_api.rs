use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use drum_analyzer::http::{run_http_server, AppState};
use drum_analyzer::{init_logging, AppConfig, SampleAnalyzer};

#[derive(Parser, Debug)]
#[command(name = "drum_api", about = "HTTP service for drum sample analysis")]
struct Cli {
    /// Interface to bind (overrides server.host)
    #[arg(long)]
    host: Option<String>,
    /// Port to bind (overrides server.port)
    #[arg(long)]
    port: Option<u16>,
    /// Root that ?path= and ?folder= lookups are resolved against
    #[arg(long)]
    project_root: Option<PathBuf>,
    /// Analyzer configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(root) = cli.project_root {
        config.server.project_root = root;
    }

    let server = config.server.clone();
    let analyzer = SampleAnalyzer::new(config).context("invalid analyzer configuration")?;
    let addr = tokio::net::lookup_host((server.host.as_str(), server.port))
        .await
        .with_context(|| format!("resolving {}:{}", server.host, server.port))?
        .next()
        .with_context(|| format!("no address for {}:{}", server.host, server.port))?;

    let state = AppState::new(analyzer, server.project_root);
    run_http_server(state, addr, server.max_upload_bytes).await?;
    Ok(ExitCode::SUCCESS)
}
