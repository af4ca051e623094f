//! report-proxy: server-side relay in front of the Gemini API
//!
//! Hides the server-held API key from clients: accepts `{"contents": [...]}`,
//! attaches the fixed report prompt and a JSON-output generation config,
//! forwards to Google's generateContent endpoint, and relays the result.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use report_proxy::{config::AppConfig, run_server};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Parser)]
#[command(name = "report-proxy")]
#[command(version = "0.1.0")]
#[command(about = "Server-side relay that fronts the Gemini API for report generation")]
#[command(long_about = "
report-proxy sits between a report-builder client and Google's Gemini API:
  - attaches a fixed system instruction describing the report JSON schema
  - requests JSON-formatted model output
  - keeps the API key server-side (read from the environment per request)

Example usage:
  GEMINI_API_KEY=... report-proxy run
  report-proxy run --config config.yaml --port 9000
  report-proxy check-config
")]
struct Cli {
    /// Path to config file (defaults probe config.yaml, then built-in defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Set logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the relay server
    Run {
        /// Override listen port
        #[arg(short, long)]
        port: Option<u16>,
        /// Override upstream base URL
        #[arg(long)]
        upstream_url: Option<String>,
    },

    /// Validate configuration and show the effective settings
    CheckConfig,

    /// Test connection to the upstream Gemini API
    TestUpstream,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level_filter = if let Some(level) = cli.log_level {
        level.to_string()
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            .to_string()
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&level_filter))
        .init();

    match cli.command {
        Commands::Run { port, upstream_url } => {
            run_relay(cli.config, port, upstream_url).await?;
        }
        Commands::CheckConfig => {
            check_config(cli.config)?;
        }
        Commands::TestUpstream => {
            test_upstream(cli.config).await?;
        }
    }

    Ok(())
}

/// Run the relay server
async fn run_relay(
    config_path: Option<PathBuf>,
    port_override: Option<u16>,
    upstream_url_override: Option<String>,
) -> anyhow::Result<()> {
    let mut config = load_config_or_exit(config_path.as_deref());

    if let Some(port) = port_override {
        config.server.port = port;
    }
    if let Some(url) = upstream_url_override {
        config.upstream.url = url;
    }

    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {e}");
        std::process::exit(1);
    }

    if config.upstream.api_key().is_none() {
        tracing::warn!(
            env = %config.upstream.api_key_env,
            "Credential environment variable is not set; requests will fail until it is"
        );
    }

    run_server(config).await
}

/// Validate configuration and print the effective settings.
/// The credential itself is never printed, only whether it is present.
fn check_config(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config_or_exit(config_path.as_deref());

    match config.validate() {
        Ok(()) => {
            println!("✓ Configuration is valid\n");
            println!("Server:");
            println!("  Listen: {}:{}", config.server.host, config.server.port);
            println!("\nUpstream:");
            println!("  URL: {}", config.upstream.base_url());
            println!("  Model: {}", config.upstream.model);
            println!("  Endpoint: {}", config.upstream.generate_url());
            println!(
                "  Credential: ${} ({})",
                config.upstream.api_key_env,
                if config.upstream.api_key().is_some() {
                    "set"
                } else {
                    "NOT SET"
                }
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration error: {e}");
            std::process::exit(1);
        }
    }
}

/// Probe the upstream model-listing endpoint with the configured credential
async fn test_upstream(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config_or_exit(config_path.as_deref());

    let Some(api_key) = config.upstream.api_key() else {
        eprintln!(
            "✗ Credential environment variable {} is not set",
            config.upstream.api_key_env
        );
        std::process::exit(1);
    };

    let models_url = config.upstream.models_url();
    println!("Testing upstream: {models_url}");

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()?;

    // The key travels only in this probe URL; print the key-free form.
    match client
        .get(format!("{models_url}?key={api_key}"))
        .send()
        .await
    {
        Ok(resp) => {
            if resp.status().is_success() {
                println!("✓ Upstream is reachable");
                println!("  Status: {}", resp.status());

                if let Ok(json) = resp.json::<serde_json::Value>().await {
                    if let Some(models) = json.get("models").and_then(|m| m.as_array()) {
                        println!("  Available models: {}", models.len());
                        for model in models.iter().take(5) {
                            if let Some(name) = model.get("name").and_then(|n| n.as_str()) {
                                println!("    - {name}");
                            }
                        }
                    }
                }
            } else {
                println!("✗ Upstream returned error status: {}", resp.status());
            }
        }
        Err(e) => {
            // without_url: the probe URL carries the key as a query parameter
            println!("✗ Failed to connect to upstream: {}", e.without_url());
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Load configuration or exit with error
fn load_config_or_exit(config_path: Option<&std::path::Path>) -> AppConfig {
    match AppConfig::load_or_default(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            eprintln!("\nSee config.yaml.default for the expected format.");
            std::process::exit(1);
        }
    }
}
