//! Wire-level request model for the control API
//!
//! These types mirror the request fields produced by the marshaling
//! layer. Cache configuration appears in two generations: the deprecated
//! scalar/list registry refs and the structured entry lists that
//! replaced them. [`crate::control`] folds the former into the latter
//! before anything downstream reads the lists.

use crate::error::KilnResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known cache entry types
pub mod cache_type {
    /// Cache held in a registry-hosted image
    pub const REGISTRY: &str = "registry";
    /// Cache held in a local directory
    pub const LOCAL: &str = "local";
}

/// Well-known cache entry attr keys
pub mod attr {
    /// Registry reference of the cache target
    pub const REF: &str = "ref";
    /// Destination directory of a local cache export
    pub const DEST: &str = "dest";
    /// Whether export failures should be tolerated ("true"/"false")
    pub const IGNORE_ERROR: &str = "ignore-error";
}

/// One cache export or import directive
///
/// Attrs are compared as a set of key/value pairs; insertion order never
/// matters, so the derived equality is exactly entry equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheOptionsEntry {
    /// Entry type (e.g. "registry", "local")
    #[serde(rename = "type")]
    pub kind: String,

    /// Type-specific configuration (registry ref, local dest, ...)
    #[serde(default)]
    pub attrs: HashMap<String, String>,
}

impl CacheOptionsEntry {
    /// Create an entry of the given type with no attrs
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attrs: HashMap::new(),
        }
    }

    /// Create a registry entry pointing at the given ref
    pub fn registry(reference: impl Into<String>) -> Self {
        let mut entry = Self::new(cache_type::REGISTRY);
        entry.attrs.insert(attr::REF.to_string(), reference.into());
        entry
    }

    /// Canonical grouping key: the entry type followed by its attrs as
    /// key-sorted `key=value` pairs.
    ///
    /// Equal entries always produce the same key, so keys can stand in
    /// for entries when grouping.
    pub fn dedup_key(&self) -> String {
        let mut attrs: Vec<(&str, &str)> = self
            .attrs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        attrs.sort_unstable();

        let mut key = self.kind.clone();
        for (k, v) in attrs {
            key.push(';');
            key.push_str(k);
            key.push('=');
            key.push_str(v);
        }
        key
    }
}

/// Cache configuration attached to a solve request
///
/// The deprecated fields predate the structured lists and are still
/// accepted from older clients. They are read during normalization but
/// never cleared, so telemetry can observe original caller intent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheOptions {
    /// Structured cache export directives
    pub exports: Vec<CacheOptionsEntry>,

    /// Structured cache import directives
    pub imports: Vec<CacheOptionsEntry>,

    /// Deprecated single registry ref to export cache to (empty = unset)
    #[serde(
        rename = "export_ref_deprecated",
        skip_serializing_if = "String::is_empty"
    )]
    pub legacy_export_ref: String,

    /// Deprecated registry refs to import cache from (may repeat)
    #[serde(
        rename = "import_refs_deprecated",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub legacy_import_refs: Vec<String>,
}

/// An inbound solve request as decoded by the marshaling layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveRequest {
    /// Client-chosen build identifier
    pub id: String,

    /// Frontend that interprets the build definition
    pub frontend: String,

    /// Frontend-specific options
    pub frontend_attrs: HashMap<String, String>,

    /// Cache configuration, both generations
    pub cache: CacheOptions,
}

impl SolveRequest {
    /// Decode a request from the marshaling layer's JSON form
    pub fn from_json(data: &str) -> KilnResult<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Encode a request back to the marshaling layer's JSON form
    pub fn to_json(&self) -> KilnResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
