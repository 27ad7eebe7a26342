//! Query specifications.
//!
//! A specification is a predicate over an aggregate, optionally paired with
//! a native filter clause. Repositories execute native-renderable
//! specifications as a single store query; anything else falls back to a
//! bounded, paginated in-memory scan.

/// A backing-store filter expression with positional parameters.
///
/// `where_sql` is a fragment for the aggregate's table (no `WHERE` keyword),
/// with one `?` per entry in `params`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeClause {
    pub where_sql: String,
    pub params: Vec<String>,
}

impl NativeClause {
    pub fn new(where_sql: impl Into<String>, params: Vec<String>) -> Self {
        Self { where_sql: where_sql.into(), params }
    }
}

/// Composable predicate over aggregates of type `A`.
pub trait Specification<A>: Send + Sync {
    /// In-memory evaluation, used by the fallback scan. Must agree with
    /// [`Specification::native_clause`] when one is declared.
    fn is_satisfied_by(&self, candidate: &A) -> bool;

    /// Native filter rendering, when this specification can be expressed as
    /// a store-side clause. Defaults to none (fallback scan).
    fn native_clause(&self) -> Option<NativeClause> {
        None
    }
}

/// Result of a specification query.
///
/// `truncated` is set when the fallback scan hit its page ceiling with data
/// remaining; callers decide whether partial results are acceptable. Native
/// queries are never truncated.
#[derive(Debug, Clone, Default)]
pub struct SpecificationMatches<A> {
    pub items: Vec<A>,
    pub truncated: bool,
}

impl<A> SpecificationMatches<A> {
    pub fn complete(items: Vec<A>) -> Self {
        Self { items, truncated: false }
    }

    pub fn truncated(items: Vec<A>) -> Self {
        Self { items, truncated: true }
    }
}
