//! Filesystem helpers: corpus enumeration, reading, atomic writes

use crate::error::{BuildError, Result};
use glob::{MatchOptions, Pattern};
use log::debug;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A document found under the content root
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResolvedFile {
    /// Forward-slash path relative to the root, the sort key
    pub relative: String,
    pub path: PathBuf,
}

/// Include/ignore matching for corpus paths
#[derive(Debug, Clone)]
pub struct FileResolver {
    include: Pattern,
    ignore: Vec<Pattern>,
}

impl FileResolver {
    /// Compile the include glob and the ignore globs
    pub fn new<S: AsRef<str>>(include: &str, ignore: &[S]) -> Result<Self> {
        let include = compile(include)?;
        let ignore = ignore
            .iter()
            .map(|p| compile(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { include, ignore })
    }

    /// Whether a root-relative path is part of the corpus
    pub fn matches(&self, relative: &str) -> bool {
        self.include.matches_with(relative, MATCH_OPTIONS)
            && !self
                .ignore
                .iter()
                .any(|p| p.matches_with(relative, MATCH_OPTIONS))
    }

    /// All matching files under `root`, sorted by relative path
    pub fn resolve(&self, root: &Path) -> Result<Vec<ResolvedFile>> {
        if !root.is_dir() {
            return Err(BuildError::FileNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry.map_err(|source| BuildError::Walk {
                root: root.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(relative) = relative_key(root, entry.path()) else {
                continue;
            };
            if self.matches(&relative) {
                files.push(ResolvedFile {
                    relative,
                    path: entry.into_path(),
                });
            } else {
                debug!("not in corpus: {}", relative);
            }
        }

        files.sort();
        Ok(files)
    }
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| BuildError::invalid_glob(pattern, e))
}

/// Root-relative path with `/` separators
fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Mode given to a new artifact when no target exists to take one from
pub const DEFAULT_MODE: u32 = 0o644;

/// Read a UTF-8 file, naming the path in the error
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| BuildError::io(path, e))
}

/// Write through a temp file in the target directory, then rename over the target
///
/// The target keeps its current permissions, or gets [`DEFAULT_MODE`] when it
/// does not exist yet.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    write_atomic_with(path, content, None)
}

/// [`write_atomic`] with explicit permissions for the written file
pub fn write_atomic_with(
    path: &Path,
    content: &[u8],
    permissions: Option<fs::Permissions>,
) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir).map_err(|e| BuildError::io(parent_dir, e))?;

    let mut temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| BuildError::io(parent_dir, e))?;
    temp_file
        .write_all(content)
        .map_err(|e| BuildError::io(temp_file.path(), e))?;
    temp_file
        .flush()
        .map_err(|e| BuildError::io(temp_file.path(), e))?;

    // NamedTempFile creates 0600 and persist keeps it
    if let Some(permissions) = permissions.or_else(|| target_permissions(path)) {
        temp_file
            .as_file()
            .set_permissions(permissions)
            .map_err(|e| BuildError::io(temp_file.path(), e))?;
    }

    temp_file
        .persist(path)
        .map_err(|e| BuildError::io(path, e.error))?;
    Ok(())
}

/// Permissions of an existing file, or the default for a new one
fn target_permissions(path: &Path) -> Option<fs::Permissions> {
    match fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(_) => default_permissions(),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(DEFAULT_MODE))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}
