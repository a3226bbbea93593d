use std::path::PathBuf;

use askrag::config::AppConfig;
use askrag::models::SessionId;
use askrag::rag::QuestionService;
use askrag::telemetry::TelemetryGuard;
use askrag::Result;
use clap::Parser;
use clap::Subcommand;
use tracing::info;
use tracing::warn;

#[derive(Parser)]
#[command(name = "askrag")]
#[command(about = "Answer questions from a vector store with a local chat model")]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable CORS
        #[arg(long)]
        cors: bool,
    },
    /// Ask a single question from the terminal
    Ask {
        /// The question to answer
        question: String,
        /// Session to continue (a fresh one by default)
        #[arg(short, long)]
        session: Option<String>,
    },
    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(Some(path.as_path()))?,
        None => AppConfig::load()?,
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    match cli.command {
        Commands::Serve { host, port, cors } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.server.cors |= cors;
            handle_serve(&config).await
        }
        Commands::Ask { question, session } => {
            askrag::logging::init_simple_logging()?;
            let service = QuestionService::from_config(&config).await?;
            let session = session.map_or_else(SessionId::random, |s| SessionId::from(s.as_str()));
            let answer = service.ask(&session, &question).await?;
            println!("{answer}");
            Ok(())
        }
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

async fn handle_serve(config: &AppConfig) -> Result<()> {
    let telemetry = if config.telemetry.enabled {
        Some(askrag::telemetry::init_telemetry(&config.telemetry)?)
    } else {
        None
    };

    let _log_guard =
        askrag::logging::init_logging(&config.logging, telemetry.as_ref().map(TelemetryGuard::tracer))?;
    match &telemetry {
        Some(guard) => info!(
            "Telemetry enabled: OTLP/HTTP -> {} (console mirror: {})",
            guard.endpoint(),
            guard.console()
        ),
        None => info!("Telemetry disabled"),
    }

    let service = QuestionService::from_config(config).await?;
    let result = askrag::api::serve_api(config, service).await;

    if let Some(mut guard) = telemetry {
        let flushed = tokio::task::spawn_blocking(move || guard.shutdown()).await;
        match flushed {
            Ok(Ok(())) => info!("Telemetry flushed"),
            Ok(Err(e)) => warn!("{}", e),
            Err(e) => warn!("Telemetry shutdown task failed: {}", e),
        }
    }

    result
}
