//! MCP tool implementations
//!
//! Exposes the inventory as seven tools: craft, delete, list, get, search,
//! record_usage, and set_memory_level. Usage recording only updates counters
//! and promotion state; stored code is reference material and is never
//! executed here.

use crate::error::{Result, ToolsmithError};
use crate::inventory::{InventoryStore, NewTool};
use crate::types::MemoryLevel;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Tool schema advertised through tools/list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescription {
    /// Tool name (e.g., "toolsmith.craft")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Tool handler that dispatches to the inventory store
pub struct ToolHandler {
    store: Arc<InventoryStore>,
}

fn parse_args<T: DeserializeOwned>(tool: &str, params: Value) -> Result<T> {
    serde_json::from_value(params)
        .map_err(|e| ToolsmithError::Validation(format!("{tool}: invalid arguments: {e}")))
}

impl ToolHandler {
    /// Create a new tool handler
    pub fn new(store: Arc<InventoryStore>) -> Self {
        Self { store }
    }

    /// Get list of all available tools
    pub fn list_tools(&self) -> Vec<ToolDescription> {
        vec![
            ToolDescription {
                name: "toolsmith.craft".to_string(),
                description: "Craft a new tool and store it in the inventory. Use this to save a reusable capability for similar problems in the future.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "name": {
                            "type": "string",
                            "description": "Short name for the tool"
                        },
                        "description": {
                            "type": "string",
                            "description": "What the tool does"
                        },
                        "code": {
                            "type": "string",
                            "description": "Optional implementation source, stored verbatim and never executed"
                        },
                        "metadata": {
                            "type": "object",
                            "properties": {
                                "tags": {
                                    "type": "array",
                                    "items": {"type": "string"},
                                    "description": "Tags describing the tool (domains, actions)"
                                },
                                "problem": {
                                    "type": "string",
                                    "description": "The problem this tool solves"
                                },
                                "createdByAgent": {
                                    "type": "string",
                                    "description": "Agent ID or name that crafted this tool"
                                }
                            }
                        }
                    },
                    "required": ["name"]
                }),
            },
            ToolDescription {
                name: "toolsmith.delete".to_string(),
                description: "Delete a crafted tool from the inventory by ID.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "id": {
                            "type": "string",
                            "description": "Tool ID returned from toolsmith.craft or toolsmith.list"
                        }
                    },
                    "required": ["id"]
                }),
            },
            ToolDescription {
                name: "toolsmith.list".to_string(),
                description: "List tools in the inventory, optionally filtered by memory level or a search query.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "memory_level": {
                            "type": "string",
                            "enum": ["short_term", "medium_term", "long_term", "archived"],
                            "description": "Optional memory level filter"
                        },
                        "query": {
                            "type": "string",
                            "description": "Optional search query over names, descriptions, and tags"
                        }
                    }
                }),
            },
            ToolDescription {
                name: "toolsmith.get".to_string(),
                description: "Fetch a single tool record by ID.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "id": {
                            "type": "string",
                            "description": "Tool ID to fetch"
                        }
                    },
                    "required": ["id"]
                }),
            },
            ToolDescription {
                name: "toolsmith.search".to_string(),
                description: "Search tools by ranking names, descriptions, tags, and problem statements against a query.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "Search phrase describing the needed tool"
                        },
                        "limit": {
                            "type": "integer",
                            "description": "Maximum number of tools to return",
                            "default": 10
                        }
                    },
                    "required": ["query"]
                }),
            },
            ToolDescription {
                name: "toolsmith.record_usage".to_string(),
                description: "Record an invocation of a crafted tool. Updates usage statistics and memory promotion; does not execute the tool's code.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "id": {
                            "type": "string",
                            "description": "Tool ID being used"
                        },
                        "context": {
                            "type": "string",
                            "description": "Optional note on why/where the tool is being used"
                        }
                    },
                    "required": ["id"]
                }),
            },
            ToolDescription {
                name: "toolsmith.set_memory_level".to_string(),
                description: "Override a tool's memory level directly, including demotion or archival.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "id": {
                            "type": "string",
                            "description": "Tool ID to update"
                        },
                        "level": {
                            "type": "string",
                            "enum": ["short_term", "medium_term", "long_term", "archived"],
                            "description": "Level to assign"
                        }
                    },
                    "required": ["id", "level"]
                }),
            },
        ]
    }

    /// Execute a tool call
    pub async fn execute(&self, tool_name: &str, params: Value) -> Result<Value> {
        debug!("Executing tool: {}", tool_name);

        match tool_name {
            "toolsmith.craft" => self.craft(params).await,
            "toolsmith.delete" => self.delete(params).await,
            "toolsmith.list" => self.list(params).await,
            "toolsmith.get" => self.get(params).await,
            "toolsmith.search" => self.search(params).await,
            "toolsmith.record_usage" => self.record_usage(params).await,
            "toolsmith.set_memory_level" => self.set_memory_level(params).await,
            _ => Err(ToolsmithError::Validation(format!(
                "Unknown tool: {tool_name}"
            ))),
        }
    }

    async fn craft(&self, params: Value) -> Result<Value> {
        let params: NewTool = parse_args("toolsmith.craft", params)?;
        let tool = self.store.create(params).await?;

        Ok(serde_json::json!({ "tool": tool }))
    }

    async fn delete(&self, params: Value) -> Result<Value> {
        #[derive(Deserialize)]
        struct DeleteParams {
            id: String,
        }

        let params: DeleteParams = parse_args("toolsmith.delete", params)?;
        let deleted = self.store.delete(&params.id).await?;

        Ok(serde_json::json!({
            "id": params.id,
            "deleted": deleted
        }))
    }

    async fn list(&self, params: Value) -> Result<Value> {
        #[derive(Deserialize)]
        struct ListParams {
            memory_level: Option<MemoryLevel>,
            query: Option<String>,
        }

        let params: ListParams = parse_args("toolsmith.list", params)?;

        // A query narrows by relevance first, then the level filter applies
        let mut tools = match &params.query {
            Some(query) => self.store.search(query, Some(100)).await?,
            None => self.store.list().await?,
        };
        if let Some(level) = params.memory_level {
            tools.retain(|t| t.memory_level == level);
        }

        Ok(serde_json::json!({
            "tools": tools,
            "count": tools.len()
        }))
    }

    async fn get(&self, params: Value) -> Result<Value> {
        #[derive(Deserialize)]
        struct GetParams {
            id: String,
        }

        let params: GetParams = parse_args("toolsmith.get", params)?;
        let tool = self.store.get(&params.id).await?;

        Ok(serde_json::json!({ "tool": tool }))
    }

    async fn search(&self, params: Value) -> Result<Value> {
        #[derive(Deserialize)]
        struct SearchParams {
            query: String,
            limit: Option<usize>,
        }

        let params: SearchParams = parse_args("toolsmith.search", params)?;
        let tools = self.store.search(&params.query, params.limit).await?;

        Ok(serde_json::json!({
            "tools": tools,
            "count": tools.len()
        }))
    }

    async fn record_usage(&self, params: Value) -> Result<Value> {
        #[derive(Deserialize)]
        struct RecordUsageParams {
            id: String,
            context: Option<String>,
        }

        let params: RecordUsageParams = parse_args("toolsmith.record_usage", params)?;
        if let Some(context) = &params.context {
            debug!("Usage context for {}: {}", params.id, context);
        }

        let tool = self.store.record_usage(&params.id).await?;

        Ok(serde_json::json!({
            "tool": tool,
            "message": "Usage recorded. Stored code is reference material and is never executed."
        }))
    }

    async fn set_memory_level(&self, params: Value) -> Result<Value> {
        #[derive(Deserialize)]
        struct SetMemoryLevelParams {
            id: String,
            level: MemoryLevel,
        }

        let params: SetMemoryLevelParams = parse_args("toolsmith.set_memory_level", params)?;
        let tool = self.store.set_memory_level(&params.id, params.level).await?;

        Ok(serde_json::json!({ "tool": tool }))
    }
}
