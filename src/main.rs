use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weather_gateway::api::server::{ApiServer, ApiServerConfig};
use weather_gateway::GatewayConfig;

#[derive(Parser)]
#[command(name = "weather-gateway")]
#[command(about = "Cache-aside weather gateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Allowed CORS origin (overrides ALLOWED_ORIGIN)
        #[arg(long)]
        allowed_origin: Option<String>,
    },

    /// Print the effective configuration with secrets redacted
    Config,
}

fn redact(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "set"
    } else {
        "missing"
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "weather_gateway=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut gateway = GatewayConfig::from_env();

    match cli.command {
        Commands::Serve {
            host,
            port,
            allowed_origin,
        } => {
            if let Some(origin) = allowed_origin {
                gateway.allowed_origin = origin;
            }

            let config = ApiServerConfig {
                host,
                port,
                gateway,
            };

            ApiServer::new(config).start().await?;
        }

        Commands::Config => {
            println!("weather api key:   {}", redact(&gateway.weather_api_key));
            println!("weather base url:  {}", gateway.weather_base_url);
            println!("gemini api key:    {}", redact(&gateway.gemini_api_key));
            println!("gemini model:      {}", gateway.gemini_model);
            println!(
                "cache backend:     {}",
                if gateway.redis_rest.is_some() { "upstash" } else { "memory" }
            );
            println!("cache capacity:    {}", gateway.cache_max_entries);
            println!("maps api key:      {}", redact(&gateway.maps_api_key));
            println!("news feed url:     {}", gateway.news_base_url);
            println!("allowed origin:    {}", gateway.allowed_origin);
        }
    }

    Ok(())
}
