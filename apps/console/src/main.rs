use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use s1_console::api_client::ApiClient;
use s1_console::config::Config;
use s1_console::desk::RecruiterDesk;
use s1_console::repl;

#[derive(Parser)]
#[command(name = "s1-console", version, about = "S1NGULARITY recruiting assistant console")]
struct Cli {
    #[arg(long, help = "Backend base URL (overrides S1_API_URL)")]
    api_url: Option<String>,

    #[arg(long, help = "Resume PDF to upload at startup")]
    resume: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?.with_api_url(cli.api_url);

    // Logs go to stderr so they never interleave with the transcript on stdout
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("s1_console={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting S1NGULARITY console v{}", env!("CARGO_PKG_VERSION"));

    let client = ApiClient::new(&config)?;
    info!("API client initialized (base url: {})", client.base_url());

    let desk = RecruiterDesk::new(Arc::new(client));

    // The startup health probe and any --resume upload run beside the prompt
    repl::run(desk, cli.resume).await
}
