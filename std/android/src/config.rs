//! Server configuration loaded from TOML.
//!
//! ```toml
//! mode = "registry"   # or "path"
//! strict = false
//!
//! [[project]]
//! name = "palau"
//! path = "~/work/palau-android"
//! ```

use crate::project::{ProjectSource, Projects, Registry};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The config file is not valid TOML for [`Config`].
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Two registry entries share a name.
    #[error("duplicate project name: {0}")]
    DuplicateProject(String),
    /// A registry entry has an empty name.
    #[error("project name must not be empty")]
    EmptyProjectName,
    /// A `NAME=PATH` argument is malformed.
    #[error("invalid project argument (expected NAME=PATH): {0}")]
    InvalidProjectArg(String),
}

/// How project references are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Names looked up in the `[[project]]` registry.
    #[default]
    Registry,
    /// Arbitrary filesystem paths.
    Path,
}

/// A registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub path: PathBuf,
}

impl ProjectEntry {
    /// Parse a `NAME=PATH` command-line argument.
    pub fn parse_arg(arg: &str) -> Result<Self, ConfigError> {
        let (name, path) = arg
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidProjectArg(arg.to_string()))?;
        if path.is_empty() {
            return Err(ConfigError::InvalidProjectArg(arg.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            path: path.into(),
        })
    }
}

/// Top-level config structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub mode: Mode,
    /// Require Gradle marker files for list and read operations.
    #[serde(default)]
    pub strict: bool,
    #[serde(default, rename = "project")]
    pub projects: Vec<ProjectEntry>,
}

impl Config {
    /// Load an explicitly requested config file. Missing or malformed
    /// files are errors.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config from file");
        Ok(config)
    }

    /// Load the default config file if present, otherwise an empty config.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            Some(path) => {
                debug!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// `<config dir>/wmcp-android/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wmcp-android").join("config.toml"))
    }

    /// Build the resolver this config describes.
    pub fn into_projects(self) -> Result<Projects, ConfigError> {
        let source = match self.mode {
            Mode::Registry => ProjectSource::Registry(Registry::from_entries(
                self.projects.into_iter().map(|e| (e.name, e.path)),
            )?),
            Mode::Path => {
                if !self.projects.is_empty() {
                    warn!(
                        count = self.projects.len(),
                        "path mode: ignoring registered projects"
                    );
                }
                ProjectSource::Path
            }
        };
        Ok(Projects::new(source, self.strict))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{Config, ConfigError, Mode, ProjectEntry};
    use crate::project::ProjectSource;
    use std::path::PathBuf;

    #[test]
    fn parses_registry_config() {
        let toml = r#"
strict = true

[[project]]
name = "palau"
path = "~/work/palau-android"

[[project]]
name = "atlas"
path = "/src/atlas"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.mode, Mode::Registry);
        assert!(config.strict);
        assert_eq!(
            config.projects,
            vec![
                ProjectEntry {
                    name: "palau".into(),
                    path: "~/work/palau-android".into(),
                },
                ProjectEntry {
                    name: "atlas".into(),
                    path: "/src/atlas".into(),
                },
            ]
        );
        let projects = config.into_projects().unwrap();
        assert!(projects.is_strict());
        assert_eq!(projects.names(), vec!["palau", "atlas"]);
    }

    #[test]
    fn parses_path_mode() {
        let config: Config = toml::from_str("mode = \"path\"").unwrap();
        assert_eq!(config.mode, Mode::Path);
        let projects = config.into_projects().unwrap();
        assert!(matches!(projects.source(), ProjectSource::Path));
        assert!(!projects.is_strict());
    }

    #[test]
    fn parses_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.into_projects().unwrap().names().is_empty());
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(toml::from_str::<Config>("strcit = true").is_err());
    }

    #[test]
    fn duplicate_names_fail() {
        let toml = r#"
[[project]]
name = "a"
path = "/x"

[[project]]
name = "a"
path = "/y"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(matches!(
            config.into_projects(),
            Err(ConfigError::DuplicateProject(_))
        ));
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Config::load(&missing),
            Err(ConfigError::Read { .. })
        ));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "mode = 3").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));

        let good = dir.path().join("good.toml");
        std::fs::write(&good, "mode = \"path\"\nstrict = true").unwrap();
        let config = Config::load(&good).unwrap();
        assert_eq!(config.mode, Mode::Path);
        assert!(config.strict);
    }

    #[test]
    fn parses_project_args() {
        let entry = ProjectEntry::parse_arg("palau=/work/palau=x").unwrap();
        assert_eq!(entry.name, "palau");
        assert_eq!(entry.path, PathBuf::from("/work/palau=x"));
        assert!(ProjectEntry::parse_arg("palau").is_err());
        assert!(ProjectEntry::parse_arg("palau=").is_err());
    }
}
