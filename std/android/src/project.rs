//! Project resolution and validation.
//!
//! Every tool call passes its project reference through [`Projects::open`]
//! before touching the filesystem. A reference is either a name looked up
//! in a fixed [`Registry`] or, in path mode, a filesystem path. Either way
//! the resulting root is normalized:
//! 1. A leading `~` expands to the home directory
//! 2. The path is made absolute against the current directory
//! 3. Symlinks are resolved when the path exists

use crate::config::ConfigError;
use crate::error::Error;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Marker globs that identify a Gradle project root.
const GRADLE_MARKERS: [&str; 2] = ["settings.gradle*", "build.gradle*"];

/// Immutable, ordered mapping from project names to root directories.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<(String, PathBuf)>,
}

impl Registry {
    /// Build a registry, keeping the given order.
    ///
    /// Names must be non-empty and unique.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, PathBuf)>,
    ) -> Result<Self, ConfigError> {
        let mut registry = Self::default();
        for (name, path) in entries {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyProjectName);
            }
            if registry.get(&name).is_some() {
                return Err(ConfigError::DuplicateProject(name));
            }
            registry.entries.push((name, path));
        }
        Ok(registry)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    /// The configured (not yet normalized) path of `name`.
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p.as_path())
    }
}

/// How project references are interpreted.
#[derive(Debug, Clone)]
pub enum ProjectSource {
    /// References are names in a static registry.
    Registry(Registry),
    /// References are arbitrary filesystem paths.
    Path,
}

impl ProjectSource {
    /// Turn a reference into a normalized absolute path.
    ///
    /// Existence is not checked here.
    pub fn resolve(&self, reference: &str) -> Result<PathBuf, Error> {
        match self {
            ProjectSource::Registry(registry) => registry
                .get(reference)
                .map(|path| normalize(&path.to_string_lossy()))
                .ok_or_else(|| Error::UnknownProject {
                    name: reference.to_string(),
                    available: registry.names(),
                }),
            ProjectSource::Path => {
                if reference.trim().is_empty() {
                    return Err(Error::EmptyReference);
                }
                Ok(normalize(reference))
            }
        }
    }
}

/// Project resolver shared by all tools.
#[derive(Debug, Clone)]
pub struct Projects {
    source: ProjectSource,
    strict: bool,
}

impl Projects {
    /// Create a resolver. With `strict`, list and read operations require
    /// the Gradle marker files at the project root.
    pub fn new(source: ProjectSource, strict: bool) -> Self {
        Self { source, strict }
    }

    pub fn source(&self) -> &ProjectSource {
        &self.source
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Registered project names; empty in path mode.
    pub fn names(&self) -> Vec<String> {
        match &self.source {
            ProjectSource::Registry(registry) => registry.names(),
            ProjectSource::Path => Vec::new(),
        }
    }

    /// Resolve `reference` and check the root is usable.
    pub fn open(&self, reference: &str) -> Result<PathBuf, Error> {
        let root = self.source.resolve(reference)?;
        check_dir(&root)?;
        if self.strict && !is_gradle_project(&root)? {
            return Err(Error::NotGradleProject(root));
        }
        debug!(reference, root = %root.display(), "opened project");
        Ok(root)
    }

    /// Describe whether `reference` names a valid Gradle project.
    ///
    /// Every failure is reported in the returned text; this never errors.
    pub fn validate(&self, reference: &str) -> String {
        let root = match self.source.resolve(reference) {
            Ok(root) => root,
            Err(e) => return format!("Error: {e}"),
        };
        match check_dir(&root) {
            Ok(()) => {}
            Err(Error::MissingRoot(_)) => {
                return format!("Error: directory does not exist: {}", root.display());
            }
            Err(e) => return format!("Error: {e}"),
        }
        match is_gradle_project(&root) {
            Ok(true) => format!("Valid Android project: {}", root.display()),
            Ok(false) => format!(
                "Directory exists but is not a Gradle project \
                 (missing settings.gradle* or build.gradle*): {}",
                root.display()
            ),
            Err(e) => format!("Error: {e}"),
        }
    }
}

/// Whether `root` directly contains both a `settings.gradle*` and a
/// `build.gradle*` file.
pub fn is_gradle_project(root: &Path) -> Result<bool, Error> {
    let escaped = PathBuf::from(glob::Pattern::escape(&root.to_string_lossy()));
    for marker in GRADLE_MARKERS {
        let pattern = escaped.join(marker);
        let mut matches = glob::glob(&pattern.to_string_lossy())?
            .filter_map(Result::ok)
            .filter(|path| path.is_file());
        if matches.next().is_none() {
            debug!(root = %root.display(), marker, "gradle marker missing");
            return Ok(false);
        }
    }
    Ok(true)
}

/// Normalize a user-supplied path: expand `~`, make absolute, resolve
/// symlinks if the path exists.
pub fn normalize(reference: &str) -> PathBuf {
    let expanded = expand_tilde(reference);
    let absolute = std::path::absolute(&expanded).unwrap_or(expanded);
    absolute.canonicalize().unwrap_or(absolute)
}

fn expand_tilde(raw: &str) -> PathBuf {
    if (raw == "~" || raw.starts_with("~/"))
        && let Some(home) = dirs::home_dir()
    {
        if raw == "~" {
            return home;
        }
        return home.join(raw.trim_start_matches("~/"));
    }
    PathBuf::from(raw)
}

fn check_dir(root: &Path) -> Result<(), Error> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::NotADirectory(root.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(Error::MissingRoot(root.to_path_buf()))
        }
        Err(e) => Err(Error::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ConfigError;
    use crate::error::{Error, ErrorKind};
    use crate::project::{ProjectSource, Projects, Registry, is_gradle_project, normalize};
    use std::fs;
    use std::path::PathBuf;

    fn gradle_fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.gradle.kts"), "").unwrap();
        fs::write(dir.path().join("build.gradle"), "").unwrap();
        dir
    }

    fn registry(entries: &[(&str, PathBuf)]) -> Registry {
        Registry::from_entries(entries.iter().map(|(n, p)| (n.to_string(), p.clone()))).unwrap()
    }

    #[test]
    fn names_keep_registration_order() {
        let projects = Projects::new(
            ProjectSource::Registry(registry(&[
                ("zeta", "/z".into()),
                ("alpha", "/a".into()),
                ("mid", "/m".into()),
            ])),
            false,
        );
        assert_eq!(projects.names(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn path_mode_has_no_names() {
        let projects = Projects::new(ProjectSource::Path, false);
        assert!(projects.names().is_empty());
    }

    #[test]
    fn rejects_duplicate_and_empty_names() {
        let dup = Registry::from_entries([
            ("a".to_string(), PathBuf::from("/x")),
            ("a".to_string(), PathBuf::from("/y")),
        ]);
        assert!(matches!(dup, Err(ConfigError::DuplicateProject(n)) if n == "a"));
        let empty = Registry::from_entries([(" ".to_string(), PathBuf::from("/x"))]);
        assert!(matches!(empty, Err(ConfigError::EmptyProjectName)));
    }

    #[test]
    fn unknown_name_is_not_found() {
        let projects = Projects::new(
            ProjectSource::Registry(registry(&[("palau", "/p".into())])),
            false,
        );
        let err = projects.open("atlas").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("Available projects: palau"));
    }

    #[test]
    fn opens_registered_project() {
        let dir = gradle_fixture();
        let projects = Projects::new(
            ProjectSource::Registry(registry(&[("app", dir.path().to_path_buf())])),
            true,
        );
        let root = projects.open("app").unwrap();
        assert_eq!(root, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn missing_root_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        let projects = Projects::new(ProjectSource::Path, false);
        let err = projects.open(missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Error::MissingRoot(_)));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn file_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Main.kt");
        fs::write(&file, "").unwrap();
        let projects = Projects::new(ProjectSource::Path, false);
        let err = projects.open(file.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Error::NotADirectory(_)));
    }

    #[test]
    fn empty_path_reference_is_rejected() {
        let projects = Projects::new(ProjectSource::Path, false);
        assert!(matches!(projects.open("  "), Err(Error::EmptyReference)));
    }

    #[test]
    fn strict_mode_requires_markers() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("build.gradle.kts"), "").unwrap();
        let path = dir.path().to_str().unwrap();

        let lenient = Projects::new(ProjectSource::Path, false);
        assert!(lenient.open(path).is_ok());

        let strict = Projects::new(ProjectSource::Path, true);
        let err = strict.open(path).unwrap_err();
        assert!(matches!(err, Error::NotGradleProject(_)));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn markers_are_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("app")).unwrap();
        fs::write(dir.path().join("app/settings.gradle"), "").unwrap();
        fs::write(dir.path().join("build.gradle"), "").unwrap();
        assert!(!is_gradle_project(dir.path()).unwrap());
    }

    #[test]
    fn marker_directories_do_not_count() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.gradle"), "").unwrap();
        fs::create_dir(dir.path().join("build.gradle")).unwrap();
        assert!(!is_gradle_project(dir.path()).unwrap());

        fs::write(dir.path().join("build.gradle.kts"), "").unwrap();
        assert!(is_gradle_project(dir.path()).unwrap());
    }

    #[test]
    fn whitespace_in_paths_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let spaced = dir.path().join(" spaced ");
        fs::create_dir(&spaced).unwrap();
        let projects = Projects::new(ProjectSource::Path, false);
        let root = projects.open(spaced.to_str().unwrap()).unwrap();
        assert_eq!(root, spaced.canonicalize().unwrap());
        assert!(root.ends_with(" spaced "));
    }

    #[test]
    fn markers_match_literally_under_glob_metacharacters() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("odd[name]");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("settings.gradle"), "").unwrap();
        fs::write(root.join("build.gradle.kts"), "").unwrap();
        assert!(is_gradle_project(&root).unwrap());
    }

    #[test]
    fn validate_reports_every_outcome() {
        let valid = gradle_fixture();
        let plain = tempfile::tempdir().unwrap();
        let projects = Projects::new(ProjectSource::Path, false);

        let status = projects.validate(valid.path().to_str().unwrap());
        assert!(status.starts_with("Valid Android project: "), "{status}");

        let status = projects.validate(plain.path().to_str().unwrap());
        assert!(status.contains("is not a Gradle project"), "{status}");

        let missing = plain.path().join("gone");
        let status = projects.validate(missing.to_str().unwrap());
        assert!(
            status.starts_with("Error: directory does not exist: "),
            "{status}"
        );

        let file = plain.path().join("Main.kt");
        fs::write(&file, "").unwrap();
        let status = projects.validate(file.to_str().unwrap());
        assert_eq!(
            status,
            format!("Error: not a directory: {}", file.canonicalize().unwrap().display())
        );

        let registry = Projects::new(ProjectSource::Registry(Registry::default()), false);
        let status = registry.validate("palau");
        assert!(status.starts_with("Error: Project palau not found"), "{status}");
    }

    #[test]
    fn normalize_makes_absolute_and_resolves_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let canonical = dir.path().canonicalize().unwrap();
        let dotted = dir.path().join(".");
        assert_eq!(normalize(dotted.to_str().unwrap()), canonical);

        let relative = normalize("some/relative/dir");
        assert!(relative.is_absolute());
        assert!(relative.ends_with("some/relative/dir"));
    }

    #[cfg(unix)]
    #[test]
    fn normalize_follows_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("real");
        fs::create_dir(&target).unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();
        assert_eq!(
            normalize(link.to_str().unwrap()),
            target.canonicalize().unwrap()
        );
    }

    #[test]
    fn normalize_expands_home() {
        if let Some(home) = dirs::home_dir() {
            let home = std::path::absolute(&home).unwrap();
            let expected = home.canonicalize().unwrap_or(home.clone());
            assert_eq!(normalize("~"), expected);
            let nested = normalize("~/wmcp-android-missing/app");
            assert!(nested.is_absolute());
            assert!(nested.ends_with("wmcp-android-missing/app"));
        }
    }
}
