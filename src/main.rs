//! Toolsmith - Persistent Inventory of Agent-Crafted Tools
//!
//! Main entry point for the toolsmith MCP server, which lets agents craft,
//! find, and promote reusable tools across sessions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use toolsmith_core::{
    error::{Result, ToolsmithError},
    mcp::{HttpServer, HttpServerConfig, McpServer, ToolHandler},
    InventoryStore, MemoryLevel, ToolRecord,
};
use tracing::{debug, info, Level};
use tracing_subscriber::{self, EnvFilter};

/// Get the default inventory path using the platform data directory
fn default_inventory_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolsmith")
        .join("inventory.json")
}

/// Get the inventory path from CLI arg/env var, project dir, or default
fn resolve_inventory_path(cli_path: Option<PathBuf>) -> PathBuf {
    cli_path
        .or_else(|| {
            // Check for a project-local inventory in .toolsmith/
            let project_dir = PathBuf::from(".toolsmith");
            if project_dir.is_dir() {
                Some(project_dir.join("inventory.json"))
            } else {
                None
            }
        })
        .unwrap_or_else(default_inventory_path)
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Parse a memory level from string with support for short aliases
fn parse_memory_level(level: &str) -> Result<MemoryLevel> {
    match level.to_lowercase().as_str() {
        "short_term" | "short" => Ok(MemoryLevel::ShortTerm),
        "medium_term" | "medium" => Ok(MemoryLevel::MediumTerm),
        "long_term" | "long" => Ok(MemoryLevel::LongTerm),
        "archived" => Ok(MemoryLevel::Archived),
        other => Err(ToolsmithError::Validation(format!(
            "unknown memory level '{other}' (expected short_term, medium_term, long_term, or archived)"
        ))),
    }
}

fn print_tool_line(tool: &ToolRecord) {
    let mut line = format!(
        "- {} | {} [{}] uses={}",
        tool.id, tool.name, tool.memory_level, tool.usage_count
    );
    if let Some(description) = &tool.description {
        line.push_str(" | ");
        line.push_str(description);
    }
    println!("{}", line);
}

/// Start MCP server in stdio mode
async fn start_mcp_server(inventory_path: PathBuf) -> Result<()> {
    debug!("Starting MCP server...");
    debug!("Using inventory: {}", inventory_path.display());

    let store = Arc::new(InventoryStore::new(inventory_path));
    let server = McpServer::new(ToolHandler::new(store));

    // Run server with graceful shutdown on signals
    tokio::select! {
        result = server.run() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, stopping MCP server gracefully...");
        }
    }

    info!("MCP server shut down complete");
    Ok(())
}

/// Start the HTTP transport instead of stdio
async fn start_http_server(inventory_path: PathBuf, addr: &str) -> Result<()> {
    use std::net::SocketAddr;

    debug!("Starting HTTP JSON-RPC server...");

    let socket_addr: SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address '{}': {}", addr, e))?;

    println!();
    println!("🔨 Toolsmith HTTP server");
    println!();
    println!("   Address:   http://{}", socket_addr);
    println!("   Inventory: {}", inventory_path.display());
    println!();
    println!("   Endpoints:");
    println!("   • POST /rpc - JSON-RPC 2.0 (initialize, tools/list, tools/call)");
    println!("   • GET  /health - Health check");
    println!();

    let store = Arc::new(InventoryStore::new(inventory_path));
    let server = Arc::new(McpServer::new(ToolHandler::new(store.clone())));
    let http = HttpServer::new(HttpServerConfig { addr: socket_addr }, server, store);

    tokio::select! {
        result = http.serve() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, stopping HTTP server gracefully...");
        }
    }

    info!("HTTP server shut down complete");
    Ok(())
}

#[derive(Parser)]
#[command(name = "toolsmith")]
#[command(about = "Persistent inventory of agent-crafted tools, served over MCP", long_about = None)]
#[command(version)]
struct Cli {
    /// Runs the stdio MCP server when no subcommand is given
    #[command(subcommand)]
    command: Option<Commands>,

    /// Set log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Inventory file path (overrides TOOLSMITH_INVENTORY env var and default)
    #[arg(long, env = "TOOLSMITH_INVENTORY")]
    inventory: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server (stdio mode)
    Serve {
        /// Serve JSON-RPC over HTTP at this address instead of stdio
        #[arg(long, value_name = "ADDR")]
        http: Option<String>,
    },

    /// Initialize the inventory file at the resolved path
    Init,

    /// Show inventory status
    Status,

    /// Inspect the inventory
    Inventory {
        #[command(subcommand)]
        command: InventoryCommands,
    },
}

#[derive(Subcommand)]
enum InventoryCommands {
    /// List tools in the inventory
    List {
        /// Filter by memory level (short_term|medium_term|long_term|archived)
        #[arg(short = 'e', long)]
        level: Option<String>,

        /// Output format (text/json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Search tools in the inventory
    Search {
        /// Search query
        query: String,

        /// Maximum results
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Inspect a single tool by ID
    Inspect {
        /// Tool ID
        id: String,
    },

    /// Delete a tool by ID
    Delete {
        /// Tool ID
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::new(format!(
        "toolsmith={0},toolsmith_core={0},tower_http=warn",
        level.as_str().to_lowercase()
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Write logs to stderr, not stdout
        .init();

    debug!("Toolsmith v{} starting...", env!("CARGO_PKG_VERSION"));

    let inventory_path = resolve_inventory_path(cli.inventory.clone());

    match cli.command {
        Some(Commands::Serve { http: Some(addr) }) => {
            start_http_server(inventory_path, &addr).await
        }
        Some(Commands::Serve { http: None }) | None => start_mcp_server(inventory_path).await,
        Some(Commands::Init) => {
            debug!("Initializing inventory...");

            let store = InventoryStore::new(&inventory_path);
            let count = store.count().await?;

            println!(
                "✓ Inventory initialized: {} ({} tools)",
                inventory_path.display(),
                count
            );
            Ok(())
        }
        Some(Commands::Status) => {
            println!("Toolsmith v{}", env!("CARGO_PKG_VERSION"));
            println!();

            let exists = inventory_path.exists();

            println!("📦 Inventory");
            println!("   Path:   {}", inventory_path.display());
            println!(
                "   Status: {}",
                if exists { "✓ exists" } else { "✗ not initialized" }
            );
            if exists {
                if let Ok(meta) = std::fs::metadata(&inventory_path) {
                    println!("   Size:   {}", format_size(meta.len()));
                }

                let store = InventoryStore::new(&inventory_path);
                match store.count().await {
                    Ok(count) => println!("   Tools:  {}", count),
                    Err(e) => println!("   Health: ✗ {}", e),
                }
            }
            println!();

            if !exists {
                println!("💡 Next steps:");
                println!("   Initialize inventory: toolsmith init");
                println!();
            }

            Ok(())
        }
        Some(Commands::Inventory { command }) => {
            let store = InventoryStore::new(&inventory_path);

            match command {
                InventoryCommands::List { level, format } => {
                    let mut tools = store.list().await?;
                    if let Some(level_str) = level {
                        let level = parse_memory_level(&level_str)?;
                        tools.retain(|t| t.memory_level == level);
                    }

                    if format == "json" {
                        println!("{}", serde_json::to_string_pretty(&tools)?);
                    } else if tools.is_empty() {
                        println!("No tools in inventory yet.");
                    } else {
                        println!("Tools in inventory ({}):", tools.len());
                        for tool in &tools {
                            print_tool_line(tool);
                        }
                    }
                    Ok(())
                }
                InventoryCommands::Search { query, limit } => {
                    let tools = store.search(&query, Some(limit)).await?;

                    if tools.is_empty() {
                        println!("No matching tools found.");
                    } else {
                        println!("Matching tools ({}):", tools.len());
                        for tool in &tools {
                            print_tool_line(tool);
                        }
                    }
                    Ok(())
                }
                InventoryCommands::Inspect { id } => {
                    let tool = store.get(&id).await?;
                    println!("{}", serde_json::to_string_pretty(&tool)?);
                    Ok(())
                }
                InventoryCommands::Delete { id } => {
                    let deleted = store.delete(&id).await?;

                    if deleted {
                        println!("Deleted tool: {}", id);
                    } else {
                        eprintln!("Tool not found or already deleted: {}", id);
                        std::process::exit(1);
                    }
                    Ok(())
                }
            }
        }
    }
}
