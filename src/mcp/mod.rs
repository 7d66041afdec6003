//! MCP (Model Context Protocol) server exposing the transcript pipeline as
//! tools over stdio JSON-RPC.

mod protocol;
mod server;
mod tools;

pub use server::McpServer;
