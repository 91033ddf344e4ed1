use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use ehs_llm::{GenerationProvider, GeminiProvider};
use ehs_server::logging::init_logging;
use ehs_server::{AppState, Config};

#[derive(Parser, Debug, Clone)]
#[command(name = "ehs-server")]
#[command(about = "Vision EHS rule builder and video analysis server")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(long, env = "PORT", default_value = "9562")]
    port: u16,

    /// Path to a TOML config file (defaults to ./config.toml when present)
    #[arg(long, env = "EHS_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (overrides debug flag)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,
}

fn build_provider(config: &Config) -> anyhow::Result<GeminiProvider> {
    let mut builder = reqwest::Client::builder();
    if !config.https_proxy.is_empty() {
        let proxy = reqwest::Proxy::https(&config.https_proxy)
            .with_context(|| format!("invalid HTTPS_PROXY {:?}", config.https_proxy))?;
        builder = builder.proxy(proxy);
    }
    let client = builder.build().context("failed to build HTTP client")?;

    Ok(GeminiProvider::new(config.api_key.clone().unwrap_or_default())
        .with_base_url(&config.api_base)
        .with_model(&config.model)
        .with_http_client(client))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug, cli.log_level.as_deref());

    let config = Config::load(cli.config.as_deref())?;
    if !config.has_api_key() {
        log::warn!("No GEMINI_API_KEY or GOOGLE_API_KEY configured; model calls will fail");
    }

    log::info!("Model: {} at {}", config.model, config.api_base);
    log::debug!("Upload limit: {} bytes", config.max_upload_bytes);

    let provider: Arc<dyn GenerationProvider> = Arc::new(build_provider(&config)?);
    let state = AppState::new(provider).with_max_upload_bytes(config.max_upload_bytes);

    ehs_server::run(&cli.host, cli.port, state)
        .await
        .context("server terminated with an error")
}
