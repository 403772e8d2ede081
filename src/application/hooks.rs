//! Customization points of the load protocol.

use crate::domain::{LoadOperation, Node, Query, TreeId};

/// Hooks injected into [`TreeLoadService`](crate::application::services::TreeLoadService).
///
/// Every method defaults to a pass-through, so implementors override only
/// what they need.
pub trait LoadHooks<I: TreeId>: Send + Sync {
    /// Adjust the normalized query before dispatch.
    fn query_before(&self, query: Query<I>, _operation: LoadOperation) -> Query<I> {
        query
    }

    /// Adjust the query used to fetch one level of children in async mode.
    fn async_load_children_query(&self, query: Query<I>) -> Query<I> {
        query
    }

    /// Post-process loaded nodes before they are converted to items.
    fn process_data(&self, nodes: Vec<Node<I>>, _operation: LoadOperation) -> Vec<Node<I>> {
        nodes
    }
}

/// Pass-through hooks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl<I: TreeId> LoadHooks<I> for NoHooks {}
