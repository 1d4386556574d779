//! Control API request handling
//!
//! Every inbound solve request passes through [`prepare_solve_request`]
//! exactly once before the solver or any cache exporter reads it. The
//! cache submodule holds the normalization primitives it is built from.

pub mod cache;

pub use cache::{
    duplicate_cache_options, export_ignore_error, merge_legacy_cache_options,
    parse_export_ignore_error,
};

use crate::api::SolveRequest;
use crate::error::KilnResult;
use tracing::warn;

/// Prepare an inbound solve request for the solver.
///
/// Folds the deprecated cache fields into the structured lists, then
/// scans the export list for entries that still collide under attr-set
/// equality (the folding step never introduces any, but a client can
/// send them directly). Duplicate exports are tolerated with a warning;
/// the error return is reserved for a future strict mode.
pub fn prepare_solve_request(req: &mut SolveRequest) -> KilnResult<()> {
    merge_legacy_cache_options(&mut req.cache);

    let duplicates = duplicate_cache_options(&req.cache.exports)?;
    if !duplicates.is_empty() {
        let kinds: Vec<&str> = duplicates.iter().map(|e| e.kind.as_str()).collect();
        warn!("Duplicate cache exports: {:?}", kinds);
    }

    Ok(())
}
