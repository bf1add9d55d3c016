//! Swarm agent CLI - inspect capabilities, tools and the persona document

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use swarm_agent_core::capabilities::{BUILTIN_CAPABILITIES, assemble, required_credentials};
use swarm_agent_core::character::Character;
use swarm_agent_core::config::AgentConfig;
use swarm_agent_core::credentials::{CredentialSet, StaticFlags};
use swarm_agent_core::tools::{
    ApprovedCall, CandidateArguments, DispatchOutcome, GatedDispatcher, ToolCatalog,
    ToolDispatcher,
};
use tracing::{debug, info};

/// Exit status for a refused tool call
const EXIT_REJECTED: i32 = 2;

#[derive(Parser)]
#[command(name = "swarm-agent")]
#[command(about = "Swarm storage agent CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (overrides discovery)
    #[arg(long, global = true, env = "SWARM_AGENT_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// MCP `tools/list` result to use instead of the built-in catalog
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the capabilities the current environment activates
    Capabilities {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List storage-network tools and their parameters
    Tools,
    /// Run a tool call through the validation gate
    Validate {
        /// Tool name
        tool: String,

        /// Arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },
    /// Print the persona document for the hosting runtime
    Character {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Version information
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

/// Channel that reports what would be sent instead of sending it
struct DryRunDispatcher;

#[async_trait]
impl ToolDispatcher for DryRunDispatcher {
    async fn dispatch(&self, call: &ApprovedCall) -> swarm_agent_core::error::Result<Value> {
        debug!(tool = %call.tool, "Dry run, not contacting the MCP server");
        Ok(json!({
            "tool": call.tool,
            "arguments": call.arguments,
            "dryRun": true,
        }))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!("swarm-agent {}", env!("CARGO_PKG_VERSION"));
            println!("swarm-agent-core {}", swarm_agent_core::VERSION);
        }
        Commands::Capabilities { json } => {
            let config = AgentConfig::load(cli.config.as_deref())?;
            let credentials = CredentialSet::from_env();
            let flags = StaticFlags::from_env().union(&config.static_flags());
            let capabilities = assemble(&credentials, &flags);

            let unset: Vec<&str> = required_credentials(BUILTIN_CAPABILITIES)
                .into_iter()
                .filter(|name| !credentials.is_present(name))
                .collect();
            if !unset.is_empty() {
                info!(credentials = ?unset, "Credentials not configured");
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&capabilities)?);
            } else {
                for capability in capabilities.iter() {
                    println!(
                        "{:<14} {:<16} {}",
                        capability.id,
                        capability.category.as_str(),
                        capability.plugin
                    );
                }
            }
        }
        Commands::Tools => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            for tool in catalog.iter() {
                println!("{}  {}", tool.name, tool.description);
                for param in &tool.required {
                    println!("    {:<18} required  {}", param.name, param.format);
                }
                for param in &tool.optional {
                    println!("    {:<18} optional  {}", param.name, param.format);
                }
            }
        }
        Commands::Validate { tool, args } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            let parsed: Value =
                serde_json::from_str(&args).context("--args is not valid JSON")?;
            let candidate = CandidateArguments::from_json(&parsed)
                .context("--args must be a JSON object")?;

            let gated = GatedDispatcher::new(catalog, DryRunDispatcher);
            match gated.invoke(&tool, &candidate).await? {
                DispatchOutcome::Completed { result, provenance } => {
                    info!(attempt_id = %provenance.attempt_id, args_hash = %provenance.args_hash, "Approved");
                    println!("{}", serde_json::to_string_pretty(&result["arguments"])?);
                }
                DispatchOutcome::Refused(rejection) => {
                    eprintln!("{}", rejection);
                    std::process::exit(EXIT_REJECTED);
                }
            }
        }
        Commands::Character { format } => {
            let config = AgentConfig::load(cli.config.as_deref())?;
            let flags = StaticFlags::from_env().union(&config.static_flags());
            let capabilities = assemble(&CredentialSet::from_env(), &flags);
            let catalog = load_catalog(cli.catalog.as_deref())?;

            let character = Character::build(&config, &capabilities, &catalog);
            let rendered = match format {
                OutputFormat::Json => character.to_json()?,
                OutputFormat::Yaml => character.to_yaml()?,
            };
            println!("{}", rendered);
        }
    }

    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<ToolCatalog> {
    let Some(path) = path else {
        return Ok(ToolCatalog::swarm());
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tool listing {}", path.display()))?;
    let listing: Value = serde_json::from_str(&contents)
        .with_context(|| format!("Tool listing {} is not valid JSON", path.display()))?;
    Ok(ToolCatalog::from_mcp_listing(&listing)?)
}
