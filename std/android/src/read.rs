//! Reading allow-listed files from a project.

use crate::error::Error;
use crate::filter::{Target, has_denied_segment, is_allowed_file, resolve_target};
use std::path::{Path, PathBuf};

/// Read one file, given relative to `root`, as UTF-8 text.
///
/// Checks, in order:
/// 1. No segment of `rel` is a deny-listed directory
/// 2. The file name is allow-listed
/// 3. The target is an existing regular file
/// 4. The target, with symlinks and `..` resolved, stays under `root` and
///    outside deny-listed directories
///
/// The content is returned byte for byte; line endings are untouched.
pub fn read_file(root: &Path, rel: &str) -> Result<String, Error> {
    let path = checked_path(root, rel)?;
    let bytes = std::fs::read(&path)?;
    String::from_utf8(bytes).map_err(|_| Error::NotUtf8(rel.to_string()))
}

/// Read several files and concatenate them, each prefixed by a
/// `// <rel>` header line, separated by blank lines.
///
/// Fails on the first path that fails any [`read_file`] check; no partial
/// output is returned.
pub fn read_files<S: AsRef<str>>(root: &Path, rels: &[S]) -> Result<String, Error> {
    let mut sections = Vec::with_capacity(rels.len());
    for rel in rels {
        let rel = rel.as_ref();
        let content = read_file(root, rel)?;
        sections.push(format!("// {rel}\n{content}"));
    }
    Ok(sections.join("\n\n"))
}

fn checked_path(root: &Path, rel: &str) -> Result<PathBuf, Error> {
    let rel_path = Path::new(rel);
    if has_denied_segment(rel_path) {
        return Err(Error::RestrictedPath(rel.to_string()));
    }
    if !is_allowed_file(rel_path) {
        return Err(Error::FileTypeNotAllowed(rel.to_string()));
    }

    let path = root.join(rel_path);
    if !path.is_file() {
        return Err(Error::FileNotFound(rel.to_string()));
    }

    let canonical_root = root.canonicalize()?;
    match resolve_target(&canonical_root, &path)? {
        Target::Inside(canonical) => Ok(canonical),
        Target::Denied => Err(Error::RestrictedPath(rel.to_string())),
        Target::Outside => Err(Error::OutsideRoot(rel.to_string())),
    }
}
