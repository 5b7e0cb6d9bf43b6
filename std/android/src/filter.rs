//! Allow-list and deny-list applied to every enumerated or read file.
//!
//! The enumerator and the reader share the same lists, so every listed
//! file can be read back.

use std::path::{Component, Path, PathBuf};

/// Extensions of files exposed to the agent.
pub const ALLOWED_EXTENSIONS: &[&str] = &["kt", "kts", "toml", "md"];

/// Exact file names exposed regardless of extension.
pub const ALLOWED_NAMES: &[&str] = &["AndroidManifest.xml"];

/// Directory names that hide everything beneath them.
pub const DENIED_DIRS: &[&str] = &[".gradle", ".git", "build"];

/// Whether `name` is a deny-listed directory name.
pub fn is_denied_dir(name: &str) -> bool {
    DENIED_DIRS.contains(&name)
}

/// Whether any normal segment of `rel` is a deny-listed directory name.
///
/// `rel` is expected to be relative to the project root; the segments of
/// the root itself are never checked.
pub fn has_denied_segment(rel: &Path) -> bool {
    rel.components().any(|c| match c {
        Component::Normal(part) => part.to_str().is_some_and(is_denied_dir),
        _ => false,
    })
}

/// Whether the final component of `path` is an allow-listed file name.
///
/// Extensions compare case-sensitively against the last extension only.
pub fn is_allowed_file(path: &Path) -> bool {
    let by_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| ALLOWED_NAMES.contains(&n));
    let by_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| ALLOWED_EXTENSIONS.contains(&e));
    by_name || by_ext
}

/// Where a path really lives once symlinks and `..` are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Under the root and outside deny-listed directories.
    Inside(PathBuf),
    /// Under the root, but inside a deny-listed directory.
    Denied,
    /// Outside the root.
    Outside,
}

/// Resolve `path` and classify it against `canonical_root`, which must
/// already be canonical.
pub fn resolve_target(canonical_root: &Path, path: &Path) -> std::io::Result<Target> {
    let canonical = path.canonicalize()?;
    let target = match canonical.strip_prefix(canonical_root) {
        Ok(rel) if has_denied_segment(rel) => Target::Denied,
        Ok(_) => Target::Inside(canonical),
        Err(_) => Target::Outside,
    };
    Ok(target)
}
