//! MCP server for browsing the sources of Android projects.
//!
//! Exposes five tools: list the registered projects, validate a project,
//! list its Kotlin/Gradle/TOML/Markdown files and manifests grouped by
//! directory, and read one or several of those files. Everything under
//! `.gradle`, `.git` and `build` directories is hidden.

use rmcp::{
    ServerHandler,
    handler::server::router::tool::ToolRouter,
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool_handler,
};
use std::sync::Arc;

pub mod config;
pub mod error;
pub mod filter;
pub mod project;
pub mod read;
pub mod scan;
pub mod tools;

pub use error::{Error, ErrorKind};
pub use project::Projects;

/// MCP server exposing read-only access to Android project sources.
#[derive(Debug, Clone)]
pub struct AndroidServer {
    pub(crate) projects: Arc<Projects>,
    pub(crate) tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for AndroidServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "wmcp-android".into(),
                title: Some("Walrus MCP Android Source Server".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Read-only browser for Android project sources. Lists and reads .kt, .kts, \
                 .toml and .md files plus AndroidManifest.xml; .gradle, .git and build \
                 directories are never exposed."
                    .into(),
            ),
        }
    }
}
