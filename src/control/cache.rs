//! Cache-option normalization
//!
//! Solve requests carry cache configuration in two generations: the
//! deprecated scalar/list registry refs and the structured entry lists
//! that replaced them. The helpers here fold the former into the latter,
//! detect entries that collide under attr-set equality, and interpret
//! the tri-state `ignore-error` attr.

use crate::api::{attr, CacheOptions, CacheOptionsEntry};
use crate::error::KilnResult;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Find entries that occur more than once under attr-set equality.
///
/// Returns one representative per group of mutually equal entries, in
/// first-occurrence order; entries that occur exactly once are not
/// reported. The input is never mutated.
///
/// Always succeeds today; the error channel is reserved for attr
/// validation.
pub fn duplicate_cache_options(
    entries: &[CacheOptionsEntry],
) -> KilnResult<Vec<CacheOptionsEntry>> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for entry in entries {
        *counts.entry(entry.dedup_key()).or_insert(0) += 1;
    }

    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();
    for entry in entries {
        let key = entry.dedup_key();
        if counts[&key] > 1 && reported.insert(key) {
            duplicates.push(entry.clone());
        }
    }
    Ok(duplicates)
}

/// Parse the tri-state `ignore-error` flag value.
///
/// Matches exactly "true" and "false", case-insensitive, with no
/// trimming. Anything else returns `None` so callers can tell an
/// explicit "false" apart from an absent or unusable value.
pub fn parse_export_ignore_error(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Whether export failures for this entry should be tolerated.
///
/// Reads the `ignore-error` attr off a cache export entry. An absent
/// attr means the system default (fail the build on export errors); an
/// unrecognized value falls back to the same default with a warning.
pub fn export_ignore_error(entry: &CacheOptionsEntry) -> bool {
    match entry.attrs.get(attr::IGNORE_ERROR) {
        None => false,
        Some(value) => match parse_export_ignore_error(value) {
            Some(ignore) => ignore,
            None => {
                warn!("Unrecognized cache export ignore-error value: {:?}", value);
                false
            }
        },
    }
}

/// Fold the deprecated scalar/list cache refs into the structured lists.
///
/// Runs once per request, before anything downstream reads
/// `exports`/`imports`. Pre-existing entries are never removed or
/// reordered; a synthesized entry is appended only when no equal entry
/// exists yet, so repeated refs in the deprecated import list collapse
/// to one entry. The deprecated fields themselves are left in place for
/// diagnostics.
pub fn merge_legacy_cache_options(cache: &mut CacheOptions) {
    if !cache.legacy_export_ref.is_empty() {
        let entry = CacheOptionsEntry::registry(cache.legacy_export_ref.clone());
        if !cache.exports.contains(&entry) {
            debug!(
                "Adding cache export for deprecated ref: {}",
                cache.legacy_export_ref
            );
            cache.exports.push(entry);
        }
    }

    for i in 0..cache.legacy_import_refs.len() {
        let entry = CacheOptionsEntry::registry(cache.legacy_import_refs[i].clone());
        if !cache.imports.contains(&entry) {
            debug!(
                "Adding cache import for deprecated ref: {}",
                cache.legacy_import_refs[i]
            );
            cache.imports.push(entry);
        }
    }
}
