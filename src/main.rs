//! Cooking Agent - Main Entry Point
//!
//! Wires configuration, the instruction processor, the request handler and
//! the HTTP server together. The processor is constructed here and injected
//! down; nothing in the request path holds process-global state.

use clap::{Parser, Subcommand};
use cooking_agent::config::AgentConfig;
use cooking_agent::observability::init_default_logging;
use cooking_agent::processor::{GroqConfig, GroqProcessor, InstructionProcessor};
use cooking_agent::server::AgentServer;
use cooking_agent::RequestHandler;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

/// HTTP front end for a hosted recipe-expert LLM
#[derive(Parser)]
#[command(name = "cooking-agent")]
#[command(about = "HTTP service that answers cooking questions through a hosted LLM")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the agent service
    Run,
    /// Validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();

    info!("Starting cooking-agent v{}", env!("CARGO_PKG_VERSION"));

    let config = match load_configuration(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Run => run_agent(config).await,
        Commands::Config { show } => handle_config_command(config, show),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }

    info!("Application shutdown complete");
}

fn load_configuration(
    config_path: &Option<PathBuf>,
) -> Result<AgentConfig, Box<dyn std::error::Error>> {
    match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Ok(AgentConfig::load_from_file(path)?)
        }
        None => {
            // Try default locations
            let default_paths = vec!["agent.toml", "config/agent.toml"];

            for path_str in default_paths {
                let path = PathBuf::from(path_str);
                if path.exists() {
                    info!("Loading configuration from: {}", path.display());
                    return Ok(AgentConfig::load_from_file(&path)?);
                }
            }

            error!(
                "No configuration file found. Please provide one with -c/--config or create agent.toml"
            );
            process::exit(1);
        }
    }
}

async fn run_agent(config: AgentConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Application starting with agent ID: {}", config.agent.id);

    // Bootstrap: build the processor and inject it into the handler
    let processor = ProcessorFactory::create_processor(&config)?;
    let handler = Arc::new(RequestHandler::new(processor.clone()));

    let port = std::env::var("AGENT_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(config.server.port);

    let server = Arc::new(AgentServer::new(
        config.agent.id.clone(),
        port,
        handler,
        processor,
    ));

    let server_task = server.clone();
    tokio::spawn(async move {
        if let Err(e) = server_task.start().await {
            error!("Agent server error: {}", e);
        }
    });

    // Graceful shutdown on SIGINT/SIGTERM
    let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())?;
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;

    info!("Agent is running and waiting for instructions on port {port}...");

    tokio::select! {
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("Application shutdown initiated");
    Ok(())
}

/// Processor factory for creating instruction processors from configuration
struct ProcessorFactory;

impl ProcessorFactory {
    fn create_processor(
        config: &AgentConfig,
    ) -> Result<Arc<dyn InstructionProcessor>, Box<dyn std::error::Error>> {
        match config.llm.provider.as_str() {
            "groq" => {
                let api_key = config.get_llm_api_key()?;
                let mut groq_config = GroqConfig {
                    api_key,
                    model: config.llm.model.clone(),
                    system_prompt: config.llm.system_prompt.clone(),
                    temperature: config.llm.temperature,
                    max_tokens: config.llm.max_tokens,
                    timeout: Duration::from_secs(config.llm.timeout_secs),
                    ..Default::default()
                };
                if let Some(base_url) = &config.llm.base_url {
                    groq_config.base_url = base_url.clone();
                }
                let processor = GroqProcessor::new(groq_config)?;
                Ok(Arc::new(processor))
            }
            provider => Err(format!("Unsupported LLM provider: {provider}").into()),
        }
    }
}

fn handle_config_command(
    config: AgentConfig,
    show: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if show {
        println!("Current configuration:");
        println!("{}", toml::to_string_pretty(&config)?);
    }

    info!("Configuration validation complete");
    Ok(())
}
