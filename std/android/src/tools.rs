//! Tool implementations for the Android source MCP server.

use crate::AndroidServer;
use crate::error::Error;
use crate::project::Projects;
use crate::{read, scan};
use rmcp::{
    handler::server::wrapper::Parameters,
    schemars::{self, JsonSchema},
    tool, tool_router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Parameters naming a project.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ProjectParams {
    /// Registered project name, or the project directory path when the
    /// server runs in path mode.
    pub project: String,
}

/// Parameters for reading a single project file.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadFileParams {
    /// Registered project name, or the project directory path when the
    /// server runs in path mode.
    pub project: String,
    /// File path relative to the project root.
    pub file_path: String,
}

/// Parameters for reading several project files.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadFilesParams {
    /// Registered project name, or the project directory path when the
    /// server runs in path mode.
    pub project: String,
    /// File paths relative to the project root, in output order.
    pub file_paths: Vec<String>,
}

#[tool_router]
impl AndroidServer {
    /// Create a new server resolving projects through `projects`.
    pub fn new(projects: Projects) -> Self {
        Self {
            projects: Arc::new(projects),
            tool_router: Self::tool_router(),
        }
    }

    /// List the registered project names.
    #[tool(description = "Get list of available project names")]
    async fn get_all_projects(&self) -> Result<String, String> {
        serde_json::to_string_pretty(&self.projects.names()).map_err(|e| e.to_string())
    }

    /// Report whether a project reference points at a Gradle project.
    #[tool(
        description = "Check whether a project exists and is a Gradle project \
                       (has settings.gradle* and build.gradle* at its root)"
    )]
    async fn validate_project(
        &self,
        Parameters(params): Parameters<ProjectParams>,
    ) -> Result<String, String> {
        self.run("validate_project", params.project, |projects, reference| {
            Ok(projects.validate(reference))
        })
        .await
    }

    /// List the browsable files of a project grouped by directory.
    #[tool(
        description = "Get list of available files in an android project. Returns kotlin \
                       files, kts files, toml files, markdown files and AndroidManifest.xml. \
                       Output shows the project root and files grouped by relative directory"
    )]
    async fn get_all_project_files(
        &self,
        Parameters(params): Parameters<ProjectParams>,
    ) -> Result<String, String> {
        self.run("get_all_project_files", params.project, |projects, reference| {
            let root = projects.open(reference)?;
            Ok(scan::scan_project(&root).to_string())
        })
        .await
    }

    /// Read one project file.
    #[tool(
        description = "Read the contents of a file from an android project. Returns raw file \
                       content. Only .kt, .kts, .toml, .md files and AndroidManifest.xml are allowed"
    )]
    async fn read_project_file(
        &self,
        Parameters(params): Parameters<ReadFileParams>,
    ) -> Result<String, String> {
        let ReadFileParams { project, file_path } = params;
        self.run("read_project_file", project, move |projects, reference| {
            let root = projects.open(reference)?;
            read::read_file(&root, &file_path)
        })
        .await
    }

    /// Read several project files at once.
    #[tool(
        description = "Read the contents of multiple files from an android project. Returns the \
                       files concatenated in request order, each preceded by a `// <path>` header. \
                       Fails without partial output if any file cannot be read"
    )]
    async fn read_multiple_project_files(
        &self,
        Parameters(params): Parameters<ReadFilesParams>,
    ) -> Result<String, String> {
        let ReadFilesParams {
            project,
            file_paths,
        } = params;
        self.run(
            "read_multiple_project_files",
            project,
            move |projects, reference| {
                let root = projects.open(reference)?;
                read::read_files(&root, &file_paths)
            },
        )
        .await
    }
}

impl AndroidServer {
    /// Run filesystem work for `tool` on the blocking pool and flatten its
    /// errors into kind-prefixed tool error messages.
    async fn run<F>(&self, tool: &'static str, project: String, f: F) -> Result<String, String>
    where
        F: FnOnce(&Projects, &str) -> Result<String, Error> + Send + 'static,
    {
        debug!(tool, project = %project, "tool call");
        let projects = Arc::clone(&self.projects);
        let reference = project.clone();
        let task = tokio::task::spawn_blocking(move || f(projects.as_ref(), reference.as_str()));
        let result = match task.await {
            Ok(result) => result.map_err(|e| e.tool_message()),
            Err(e) => Err(e.to_string()),
        };
        if let Err(e) = &result {
            warn!(tool, project = %project, error = %e, "tool call failed");
        }
        result
    }
}
