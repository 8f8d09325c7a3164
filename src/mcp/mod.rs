//! Model Context Protocol (MCP) server implementation
//!
//! JSON-RPC 2.0 facade over the inventory, served either as newline-delimited
//! frames on stdio or as HTTP POST requests.

pub mod http;
pub mod protocol;
pub mod server;
pub mod tools;

pub use http::{HttpServer, HttpServerConfig};
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use server::McpServer;
pub use tools::{ToolDescription, ToolHandler};
