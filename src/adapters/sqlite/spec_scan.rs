//! Bounded in-memory fallback for specifications without a native clause.
//!
//! The scan walks the aggregate's table in small pages and applies the
//! specification predicate to each hydrated aggregate. A page ceiling caps
//! the total rows examined; when the ceiling is hit with data remaining the
//! result is flagged truncated so the caller can tell a partial answer from
//! a complete one.

use std::future::Future;

use tracing::warn;

use crate::domain::errors::StoreResult;
use crate::domain::models::ScanSettings;
use crate::domain::ports::specification::{Specification, SpecificationMatches};

/// Page through the store with `fetch_page(page) -> aggregates`, keeping the
/// ones the specification accepts. A short page means the table is
/// exhausted and the result is complete.
pub async fn paginated_scan<A, F, Fut>(
    settings: ScanSettings,
    aggregate: &'static str,
    spec: &dyn Specification<A>,
    mut fetch_page: F,
) -> StoreResult<SpecificationMatches<A>>
where
    F: FnMut(i64) -> Fut,
    Fut: Future<Output = StoreResult<Vec<A>>>,
{
    let page_size = settings.page_size.max(1);
    let max_pages = i64::from(settings.max_pages.max(1));
    let mut matches = Vec::new();

    for page in 0..max_pages {
        let candidates = fetch_page(page).await?;
        let exhausted = (candidates.len() as i64) < page_size;
        matches.extend(candidates.into_iter().filter(|c| spec.is_satisfied_by(c)));
        if exhausted {
            return Ok(SpecificationMatches::complete(matches));
        }
    }

    warn!(
        aggregate,
        scanned = max_pages * page_size,
        matched = matches.len(),
        "Specification scan hit its page ceiling, returning truncated result"
    );
    Ok(SpecificationMatches::truncated(matches))
}
