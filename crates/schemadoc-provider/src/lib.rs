//! Schema snapshot providers.

pub mod adapter;
pub mod cache;
pub mod fixture;
pub mod json;
pub mod options;

pub use adapter::SchemaProvider;
pub use cache::CachedProvider;
pub use fixture::StaticProvider;
pub use json::JsonFileProvider;
pub use options::ProviderOptions;

pub use schemadoc_core::SchemaSnapshot;
