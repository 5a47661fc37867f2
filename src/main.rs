//! mcp-conductor operator CLI.
//!
//! - `status`: load a settings file, register capability tools, print statuses
//! - `route`: show which backend a tool call resolves to
//! - `lint`: check settings files for common mistakes

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use mcp_conductor::loader;
use mcp_conductor::{Arguments, Config, Orchestrator};

#[derive(Debug, Parser)]
#[command(name = "mcp-conductor", version, about)]
struct Cli {
    /// Orchestrator settings (JSON). Defaults apply when omitted.
    #[arg(long, env = "MCP_CONDUCTOR_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print backend statuses and the number of routed tools.
    Status {
        /// MCP settings file with an `mcpServers` object.
        servers: PathBuf,
    },
    /// Resolve a tool to its backend.
    Route {
        servers: PathBuf,
        tool: String,
        /// Tool arguments as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,
    },
    /// Report configuration issues.
    Lint {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    mcp_conductor::observability::init_tracing_with(&config.observability);

    match cli.command {
        Command::Status { servers } => {
            let mut orchestrator = build(&config, &servers)?;
            let tools = orchestrator.register_capabilities();
            let output = serde_json::json!({
                "servers": orchestrator.statuses(),
                "tools_registered": tools,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Route { servers, tool, args } => {
            let orchestrator = build(&config, &servers)?;
            let arguments: Arguments = serde_json::from_str(&args)?;
            let call = orchestrator.route(&tool, arguments)?;
            println!("{}", serde_json::to_string_pretty(&call)?);
        }
        Command::Lint { files } => {
            let mut clean = true;
            for file in files {
                let issues = loader::lint_servers(&file);
                println!("{}:", file.display());
                if issues.is_empty() {
                    println!("  all servers configured correctly");
                }
                for (server, issue) in issues {
                    clean = false;
                    println!("  [{}] {}", server, issue);
                }
            }
            if !clean {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn build(config: &Config, servers: &Path) -> mcp_conductor::Result<Orchestrator> {
    let mut orchestrator = Orchestrator::new(config);
    let count = orchestrator.load(loader::load_servers(servers)?);
    tracing::info!(count, "servers loaded");
    Ok(orchestrator)
}
