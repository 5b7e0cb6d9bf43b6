//! Binary entry point for the wmcp-android MCP server.

use clap::Parser;
use rmcp::ServiceExt;
use std::path::PathBuf;
use wmcp_android::{
    AndroidServer,
    config::{Config, ConfigError, Mode, ProjectEntry},
};

/// Walrus MCP Android Source Server: browse and read Android project sources.
#[derive(Parser)]
#[command(name = "wmcp-android", version, about)]
struct Cli {
    /// TOML config file. Defaults to `<config dir>/wmcp-android/config.toml`
    /// when that file exists.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Register a project (repeatable).
    #[arg(long = "project", value_name = "NAME=PATH")]
    projects: Vec<String>,

    /// Accept any project directory path instead of registered names.
    #[arg(long)]
    any_path: bool,

    /// Require settings.gradle* and build.gradle* at the project root.
    #[arg(long)]
    strict: bool,
}

impl Cli {
    fn into_config(self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_default()?,
        };
        for arg in &self.projects {
            config.projects.push(ProjectEntry::parse_arg(arg)?);
        }
        if self.any_path {
            config.mode = Mode::Path;
        }
        if self.strict {
            config.strict = true;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }
    let cli = Cli::parse();
    let projects = match cli.into_config().and_then(Config::into_projects) {
        Ok(projects) => projects,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        projects = projects.names().len(),
        strict = projects.is_strict(),
        "starting wmcp-android"
    );
    let server = AndroidServer::new(projects);
    let transport = rmcp::transport::stdio();
    server
        .serve(transport)
        .await
        .expect("failed to start server")
        .waiting()
        .await
        .expect("server error");
}
