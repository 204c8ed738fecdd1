//! Civic MCP tool surface: request schemas and the tool router.

mod schemas;
mod service;

pub use service::CivicService;
