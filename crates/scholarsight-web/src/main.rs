use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scholarsight_core::{Config, GeminiClient, Overrides, PaperAssistant};

/// ScholarSight web server: serves the browser UI and its JSON API.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(long, short, default_value_t = 5001)]
    port: u16,

    /// Gemini API key (overrides GEMINI_API_KEY / API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Model used for paper analysis
    #[arg(long)]
    explain_model: Option<String>,

    /// Model used to simplify selected text
    #[arg(long)]
    rephrase_model: Option<String>,

    /// Path to a config file (default: <config dir>/scholarsight/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,tower_http=debug")
        }))
        .with_writer(std::io::stderr)
        .init();

    let overrides = Overrides {
        api_key: args.api_key,
        explain_model: args.explain_model,
        rephrase_model: args.rephrase_model,
        endpoint: None,
    };
    let config = Config::load(overrides, args.config.as_deref())?;
    let client = GeminiClient::new(&config)?;
    let assistant = Arc::new(PaperAssistant::new(client, &config));

    let app = scholarsight_web::router(assistant);

    let addr = SocketAddr::new(args.host, args.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        explain_model = %config.explain_model,
        rephrase_model = %config.rephrase_model,
        "listening on http://{addr}"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutting down");
    }
}
