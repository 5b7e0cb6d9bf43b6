//! Recursive enumeration of the allow-listed files in a project.

use crate::filter::{Target, has_denied_segment, is_allowed_file, is_denied_dir, resolve_target};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Key used for files that live directly in the project root.
pub const ROOT_DIR_KEY: &str = ".";

/// Allow-listed files of a project, grouped by parent directory.
///
/// Keys are directories relative to the root and file names are sorted,
/// so rendering is deterministic regardless of walk order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectListing {
    pub root: PathBuf,
    pub dirs: BTreeMap<String, Vec<String>>,
}

impl ProjectListing {
    /// Total number of listed files.
    pub fn file_count(&self) -> usize {
        self.dirs.values().map(Vec::len).sum()
    }
}

impl fmt::Display for ProjectListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Project root: {}", self.root.display())?;
        for (dir, files) in &self.dirs {
            write!(f, "\n\ndir: {dir}\nfiles: {}", files.join(", "))?;
        }
        Ok(())
    }
}

/// Walk `root` and collect every allow-listed file outside deny-listed
/// directories.
///
/// Directory symlinks are not followed. File symlinks are listed only when
/// their target resolves under the root and outside deny-listed
/// directories, the same rule the reader applies. Entries that cannot be
/// read are skipped.
pub fn scan_project(root: &Path) -> ProjectListing {
    let mut dirs: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let canonical_root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !e.file_type().is_dir()
                || !e.file_name().to_str().is_some_and(is_denied_dir)
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Ok(rel) = path.strip_prefix(root) else {
            continue;
        };
        if has_denied_segment(rel) || !is_allowed_file(rel) {
            continue;
        }
        if entry.path_is_symlink() {
            match resolve_target(&canonical_root, path) {
                Ok(Target::Inside(_)) => {}
                Ok(target) => {
                    debug!(path = %rel.display(), ?target, "skipping symlink");
                    continue;
                }
                Err(e) => {
                    debug!(path = %rel.display(), error = %e, "skipping broken symlink");
                    continue;
                }
            }
        }

        let dir = match rel.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                parent.to_string_lossy().into_owned()
            }
            _ => ROOT_DIR_KEY.to_string(),
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        dirs.entry(dir).or_default().push(name);
    }

    for files in dirs.values_mut() {
        files.sort();
    }

    let listing = ProjectListing {
        root: root.to_path_buf(),
        dirs,
    };
    debug!(
        root = %root.display(),
        dirs = listing.dirs.len(),
        files = listing.file_count(),
        "scanned project"
    );
    listing
}
