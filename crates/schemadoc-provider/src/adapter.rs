use schemadoc_core::{Result, SchemaSnapshot};

/// Trait implemented by metadata providers that can produce schema snapshots.
pub trait SchemaProvider {
    /// Returns the provider identifier (e.g. `json`).
    fn kind(&self) -> &'static str;

    /// Resolve `reference` and return its tables in registry order.
    fn load(&self, reference: &str) -> Result<SchemaSnapshot>;
}

impl<P: SchemaProvider + ?Sized> SchemaProvider for &P {
    fn kind(&self) -> &'static str {
        (**self).kind()
    }

    fn load(&self, reference: &str) -> Result<SchemaSnapshot> {
        (**self).load(reference)
    }
}
