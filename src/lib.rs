//! Toolsmith - Persistent Inventory of Agent-Crafted Tools
//!
//! Agents that solve a problem once can craft a tool for it and find it
//! again later. Toolsmith keeps those tools in a single JSON document and
//! serves them over MCP:
//! - Write-through persistence: every mutation rewrites the backing file
//! - Usage-driven memory promotion (short_term -> medium_term -> long_term)
//! - Substring ranking search over names, descriptions, tags, and problems
//! - JSON-RPC 2.0 facade over stdio or HTTP
//!
//! Stored tool code is reference material only; nothing in this crate
//! executes it.
//!
//! # Example
//!
//! ```ignore
//! use toolsmith_core::{InventoryStore, NewTool};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = InventoryStore::new(".toolsmith/inventory.json");
//!
//!     let tool = store.create(NewTool {
//!         name: "csv-parser".to_string(),
//!         description: Some("Parse CSV files into records".to_string()),
//!         code: None,
//!         metadata: None,
//!     }).await?;
//!
//!     let hits = store.search("csv", None).await?;
//!     assert_eq!(hits[0].id, tool.id);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod inventory;
pub mod mcp;
pub mod types;

// Re-export commonly used types
pub use error::{Result, ToolsmithError};
pub use inventory::{InventoryStore, NewTool};
pub use types::{InventoryDocument, MemoryLevel, ToolId, ToolMetadata, ToolRecord};
