//! Artifact writing
//!
//! The JSON index, the mirrored package descriptor and the copied files all go
//! through [`write_atomic_with`], so a failed run never leaves a half-written
//! artifact behind.

use crate::config::BuildConfig;
use crate::core::OutputTree;
use crate::error::{BuildError, Result};
use crate::io::datasets::load_json;
use crate::io::fs::write_atomic_with;
use log::{debug, info};
use serde_json::{Map, Value as JsonValue};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of one write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    /// Whether the file content changed
    pub modified: bool,
    pub output_path: PathBuf,
}

/// Writes everything that lands in the artifact directory
pub struct OutputWriter<'a> {
    config: &'a BuildConfig,
}

impl<'a> OutputWriter<'a> {
    /// A writer for the paths in `config`
    pub fn new(config: &'a BuildConfig) -> Self {
        Self { config }
    }

    /// Serialize the tree as compact JSON to the artifact path
    pub fn write_tree(&self, tree: &OutputTree) -> Result<WriteResult> {
        let content = tree.to_json_string()?;
        self.write_if_changed(&self.config.artifact_path(), content.as_bytes(), None)
    }

    /// Copy the mirrored fields of the build's descriptor into the artifact's
    pub fn mirror_descriptor(&self) -> Result<WriteResult> {
        let source_path = self.config.resolve(&self.config.package_descriptor);
        let target_path = self
            .config
            .artifact_dir()
            .join(&self.config.package_descriptor);

        let source = load_object(&source_path)?;
        let mut target = if target_path.exists() {
            load_object(&target_path)?
        } else {
            debug!("{} does not exist yet, starting empty", target_path.display());
            Map::new()
        };

        merge_fields(&mut target, &source, &self.config.mirrored_fields);

        let mut content = serde_json::to_string_pretty(&JsonValue::Object(target))?;
        content.push('\n');
        self.write_if_changed(&target_path, content.as_bytes(), None)
    }

    /// Copy ancillary files verbatim, permissions included, into the artifact directory
    pub fn copy_files(&self) -> Result<Vec<WriteResult>> {
        let artifact_dir = self.config.artifact_dir();
        let mut results = Vec::with_capacity(self.config.copied_files.len());
        for file in &self.config.copied_files {
            let source = self.config.resolve(file);
            let Some(name) = file.file_name() else {
                return Err(BuildError::unexpected_shape(file, "not a file name"));
            };
            let content = fs::read(&source).map_err(|e| BuildError::io(&source, e))?;
            let permissions = fs::metadata(&source)
                .map_err(|e| BuildError::io(&source, e))?
                .permissions();
            results.push(self.write_if_changed(
                &artifact_dir.join(name),
                &content,
                Some(permissions),
            )?);
        }
        Ok(results)
    }

    /// Write unless the bytes on disk already match
    ///
    /// `permissions` of `None` keeps the target's current mode. Explicit
    /// permissions are applied even when the content is unchanged.
    fn write_if_changed(
        &self,
        path: &Path,
        content: &[u8],
        permissions: Option<fs::Permissions>,
    ) -> Result<WriteResult> {
        let unchanged = fs::read(path).map(|old| old == content).unwrap_or(false);
        if unchanged {
            debug!("{} unchanged", path.display());
            if let Some(permissions) = permissions {
                let current = fs::metadata(path)
                    .map_err(|e| BuildError::io(path, e))?
                    .permissions();
                if current != permissions {
                    fs::set_permissions(path, permissions).map_err(|e| BuildError::io(path, e))?;
                }
            }
        } else {
            write_atomic_with(path, content, permissions)?;
            info!("wrote {}", path.display());
        }
        Ok(WriteResult {
            modified: !unchanged,
            output_path: path.to_path_buf(),
        })
    }
}

fn load_object(path: &Path) -> Result<Map<String, JsonValue>> {
    match load_json::<JsonValue>(path)? {
        JsonValue::Object(map) => Ok(map),
        _ => Err(BuildError::unexpected_shape(path, "expected a JSON object")),
    }
}

/// Overwrite `fields` in `target` with their values from `source`
///
/// Fields missing from `source` are left as they are in `target`.
pub fn merge_fields(
    target: &mut Map<String, JsonValue>,
    source: &Map<String, JsonValue>,
    fields: &[String],
) {
    for field in fields {
        if let Some(value) = source.get(field) {
            target.insert(field.clone(), value.clone());
        }
    }
}
