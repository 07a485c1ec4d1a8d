//! rejestr-mcp
//!
//! MCP server for rejestr.io, plus a few commands for checking the setup.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rejestr_mcp::config::{load_config_with, validate_config, LogConfig, LogFormat};
use rejestr_mcp::mcp::McpServer;
use rejestr_mcp::tools::{ToolCall, ToolRegistry};
use rejestr_mcp::{Config, VERSION};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rejestr-mcp",
    version = VERSION,
    about = "MCP server for the rejestr.io Polish business registry API",
    long_about = None
)]
struct Cli {
    /// Settings file (TOML or JSON5)
    #[arg(long, short, global = true, env = "REJESTR_MCP_CONFIG")]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server on stdin/stdout (default)
    Serve,

    /// List the tools this server exposes
    Tools {
        /// Print the tools/list payload as JSON
        #[arg(long)]
        json: bool,
    },

    /// Call one tool and print the result (paid tools are billed)
    Call {
        /// Tool name, e.g. get_company_info_using_krs
        tool: String,
        /// Arguments as a JSON object
        #[arg(long, short, default_value = "{}")]
        args: String,
    },

    /// Load and validate the configuration
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before clap, so `.env` can also supply REJESTR_MCP_CONFIG
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = load_config_with(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(url) = cli.base_url {
        config.api.base_url = url;
    }

    init_tracing(&config.log);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Tools { json } => list_tools(&config, json),
        Commands::Call { tool, args } => call_tool(&config, &tool, &args).await,
        Commands::CheckConfig => check_config(&config),
    }
}

/// Logs go to stderr: stdout carries the protocol
fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_new(&log.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);

    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Starting rejestr-mcp v{}", VERSION);

    let report = validate_config(&config);
    for issue in &report.warnings {
        warn!("{}", issue);
    }
    config.validate()?;

    let server = Arc::new(McpServer::from_config(&config)?);
    info!(
        base_url = %config.api.base_url,
        tools = server.registry().count(),
        "serving rejestr.io tools"
    );
    server.serve_stdio().await?;
    Ok(())
}

fn list_tools(config: &Config, json: bool) -> anyhow::Result<()> {
    // Listing needs no credential, so fall back to a placeholder key
    let mut listing = config.clone();
    if !listing.api.has_api_key() {
        listing = Config::with_api_key("unset");
        listing.api.base_url = config.api.base_url.clone();
    }
    let server = McpServer::from_config(&listing)?;
    let definitions = server.registry().definitions();

    if json {
        let payload = serde_json::json!({ "tools": definitions });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    for tool in definitions {
        let args = if tool.input_schema.required.is_empty() {
            "-".to_string()
        } else {
            tool.input_schema.required.join(", ")
        };
        println!("{:<34} {}", tool.name, args);
    }
    Ok(())
}

async fn call_tool(config: &Config, tool: &str, args: &str) -> anyhow::Result<()> {
    config.validate()?;

    let arguments: serde_json::Value =
        serde_json::from_str(args).context("--args must be a JSON object")?;
    let client = Arc::new(rejestr_mcp::rejestr::RejestrClient::new(&config.api)?);
    let registry = ToolRegistry::with_rejestr_tools(client);

    let result = registry.execute(&ToolCall::new(tool, arguments)).await?;
    if !result.success {
        bail!("{}", result.to_text());
    }

    match result.content {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => println!(),
    }
    Ok(())
}

fn check_config(config: &Config) -> anyhow::Result<()> {
    let report = validate_config(config);

    println!("Base URL:        {}", config.api.base_url);
    println!("Timeout:         {:?}", config.api.timeout);
    println!("Connect timeout: {:?}", config.api.connect_timeout);
    println!(
        "API key:         {}",
        if config.api.has_api_key() { "set" } else { "missing" }
    );

    for issue in &report.warnings {
        println!("warning: {}", issue);
    }
    for issue in &report.errors {
        println!("error:   {}", issue);
    }

    if !report.valid {
        bail!("configuration has {} error(s)", report.errors.len());
    }
    println!("Configuration OK");
    Ok(())
}
