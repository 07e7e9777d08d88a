use std::collections::BTreeMap;

use schemadoc_core::{Error, Result, SchemaSnapshot, validate_snapshot};

use crate::adapter::SchemaProvider;

/// In-memory provider returning pre-built snapshots by reference.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    snapshots: BTreeMap<String, SchemaSnapshot>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `snapshot` under `reference`, replacing any previous entry.
    pub fn with(mut self, reference: impl Into<String>, snapshot: SchemaSnapshot) -> Self {
        self.snapshots.insert(reference.into(), snapshot);
        self
    }
}

impl SchemaProvider for StaticProvider {
    fn kind(&self) -> &'static str {
        "static"
    }

    fn load(&self, reference: &str) -> Result<SchemaSnapshot> {
        let snapshot = self
            .snapshots
            .get(reference)
            .cloned()
            .ok_or_else(|| Error::SchemaLoad(format!("unknown schema reference: {reference}")))?;
        validate_snapshot(&snapshot).map_err(|err| Error::SchemaLoad(err.to_string()))?;
        Ok(snapshot)
    }
}
