//! Operation resolution and query normalization.

use crate::domain::entities::{LoadOperation, Query};

const LOAD_CHILD_HINT: &str = "loadchild";

/// Pick the sub-protocol for a query.
///
/// An explicit `loadchild` hint wins over everything else; otherwise any
/// non-structural criterion makes the request a search.
pub fn resolve_operation<I>(query: &Query<I>) -> LoadOperation {
    let hinted = query
        .operation
        .as_deref()
        .map(|op| op.trim().eq_ignore_ascii_case(LOAD_CHILD_HINT))
        .unwrap_or(false);

    if hinted {
        LoadOperation::LoadChild
    } else if query.is_search() {
        LoadOperation::Search
    } else {
        LoadOperation::FirstLoad
    }
}

impl LoadOperation {
    pub fn resolve<I>(query: &Query<I>) -> Self {
        resolve_operation(query)
    }
}

/// Derive the effective query for `operation`.
///
/// - empty `order` falls back to `default_order`
/// - `path` is always cleared; the orchestrator re-derives it
/// - `parent_id` survives only for `LoadChild`
pub fn normalize_query<I>(
    query: Query<I>,
    operation: LoadOperation,
    default_order: &str,
) -> Query<I> {
    let order = if query.order.trim().is_empty() {
        default_order.to_string()
    } else {
        query.order
    };

    let parent_id = match operation {
        LoadOperation::LoadChild => query.parent_id,
        LoadOperation::FirstLoad | LoadOperation::Search => None,
    };

    Query {
        order,
        path: None,
        parent_id,
        ..query
    }
}
