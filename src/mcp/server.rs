//! MCP server with stdio transport
//!
//! Newline-delimited JSON-RPC 2.0 over stdin/stdout. One request per line,
//! one response per line; notifications are consumed silently. Logging goes
//! to stderr so stdout carries nothing but protocol frames.

use super::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use super::tools::ToolHandler;
use crate::error::Result;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

/// MCP server that handles JSON-RPC requests over stdio
pub struct McpServer {
    tools: ToolHandler,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(tools: ToolHandler) -> Self {
        Self { tools }
    }

    /// Run the server (blocking, processes stdin/stdout)
    pub async fn run(&self) -> Result<()> {
        info!("MCP server started, listening on stdin...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    // EOF
                    debug!("Received EOF, shutting down");
                    break;
                }
                Ok(_) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    debug!("Received request: {}", line);

                    let response = match self.process_request(line).await {
                        Some(response) => response,
                        None => continue,
                    };

                    let response_json = serde_json::to_string(&response).unwrap_or_else(|e| {
                        error!("Failed to serialize response: {}", e);
                        r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Internal error"},"id":null}"#
                            .to_string()
                    });

                    debug!("Sending response: {}", response_json);

                    if let Err(e) = stdout.write_all(response_json.as_bytes()).await {
                        error!("Failed to write response: {}", e);
                        break;
                    }

                    if let Err(e) = stdout.write_all(b"\n").await {
                        error!("Failed to write newline: {}", e);
                        break;
                    }

                    if let Err(e) = stdout.flush().await {
                        error!("Failed to flush stdout: {}", e);
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        info!("MCP server shutting down");
        Ok(())
    }

    /// Process a single JSON-RPC line; `None` means nothing is written back
    pub(crate) async fn process_request(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::parse_error(format!("Invalid JSON: {}", e)),
                ));
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id.clone(),
                JsonRpcError::invalid_request("jsonrpc must be '2.0'"),
            ));
        }

        if request.is_notification() {
            debug!("Ignoring notification: {}", request.method);
            return None;
        }

        Some(self.dispatch(request).await)
    }

    /// Route a validated request to its handler
    pub(crate) async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,

            _ => {
                JsonRpcResponse::error(request.id, JsonRpcError::method_not_found(&request.method))
            }
        }
    }

    /// Handle initialize request
    fn handle_initialize(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!("Handling initialize");

        JsonRpcResponse::success(
            request.id,
            serde_json::json!({
                "protocolVersion": "2024-11-05",
                "serverInfo": {
                    "name": "toolsmith",
                    "version": env!("CARGO_PKG_VERSION")
                },
                "capabilities": {
                    "tools": {}
                }
            }),
        )
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!("Handling tools/list");

        let tools = self.tools.list_tools();

        JsonRpcResponse::success(
            request.id,
            serde_json::json!({
                "tools": tools
            }),
        )
    }

    /// Handle tools/call request
    async fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!("Handling tools/call");

        let params = match request.params.as_object() {
            Some(obj) => obj,
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("params must be an object"),
                );
            }
        };

        let tool_name = match params.get("name").and_then(|v| v.as_str()) {
            Some(name) => name,
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("missing 'name' field"),
                );
            }
        };

        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or(Value::Object(serde_json::Map::new()));

        match self.tools.execute(tool_name, arguments).await {
            Ok(result) => JsonRpcResponse::success(
                request.id,
                serde_json::json!({
                    "content": [
                        {
                            "type": "text",
                            "text": serde_json::to_string_pretty(&result)
                                .unwrap_or_else(|_| result.to_string())
                        }
                    ]
                }),
            ),
            Err(e) => JsonRpcResponse::error(request.id, JsonRpcError::from(&e)),
        }
    }
}
