use std::path::{Path, PathBuf};

use schemadoc_core::{Error, Result, SchemaSnapshot, validate_snapshot};

use crate::adapter::SchemaProvider;
use crate::options::ProviderOptions;

/// Provider reading snapshot JSON documents exported by a metadata tool.
///
/// The reference is a file path. Relative paths are resolved against the
/// configured search roots in order, then against the working directory.
#[derive(Debug, Clone, Default)]
pub struct JsonFileProvider {
    options: ProviderOptions,
}

impl JsonFileProvider {
    pub fn new(options: ProviderOptions) -> Self {
        Self { options }
    }

    /// Locate the snapshot file for `reference`.
    pub fn resolve(&self, reference: &str) -> Result<PathBuf> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(Error::SchemaLoad("empty schema reference".to_string()));
        }

        let path = Path::new(reference);
        if path.is_absolute() {
            return if path.is_file() {
                Ok(path.to_path_buf())
            } else {
                Err(Error::SchemaLoad(format!(
                    "schema source not found: {}",
                    path.display()
                )))
            };
        }

        let roots = self.options.search_roots();
        for root in &roots {
            let candidate = root.join(path);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }

        if path.is_file() {
            return Ok(path.to_path_buf());
        }

        let searched: Vec<String> = roots.iter().map(|root| root.display().to_string()).collect();
        Err(Error::SchemaLoad(format!(
            "schema source '{}' not found (searched: [{}])",
            reference,
            searched.join(", ")
        )))
    }
}

impl SchemaProvider for JsonFileProvider {
    fn kind(&self) -> &'static str {
        "json"
    }

    fn load(&self, reference: &str) -> Result<SchemaSnapshot> {
        let path = self.resolve(reference)?;
        let contents = std::fs::read_to_string(&path).map_err(|err| {
            Error::SchemaLoad(format!("failed to read {}: {}", path.display(), err))
        })?;

        let value: serde_json::Value = serde_json::from_str(&contents).map_err(|err| {
            Error::SchemaLoad(format!("invalid json in {}: {}", path.display(), err))
        })?;
        if value.get("tables").is_none() {
            return Err(Error::SchemaLoad(format!(
                "{} does not expose a table registry",
                path.display()
            )));
        }

        let snapshot: SchemaSnapshot = serde_json::from_value(value).map_err(|err| {
            Error::SchemaLoad(format!("invalid snapshot in {}: {}", path.display(), err))
        })?;
        validate_snapshot(&snapshot)
            .map_err(|err| Error::SchemaLoad(format!("{}: {}", path.display(), err)))?;

        tracing::info!(
            event = "snapshot_loaded",
            path = %path.display(),
            tables = snapshot.len()
        );
        Ok(snapshot)
    }
}
