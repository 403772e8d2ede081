//! I/O boundary traits for testability
//!
//! The tree storage is consumed through [`TreeDataSource`], allowing the
//! load service to be tested with mock implementations.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Node, Page, Query, TreeId};

/// Failure inside a data source (storage, network, query translation).
#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("data source failed: {message}")]
    Backend {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("data source rejected query: {0}")]
    InvalidQuery(String),
}

impl DataSourceError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            source: None,
        }
    }
}

pub type DataSourceResult<T> = Result<T, DataSourceError>;

/// Read access to stored tree nodes.
///
/// Implementations interpret the structural fields of [`Query`] as:
/// - `parent_id`: immediate children of that node
/// - `path`: every node in the subtree sharing that path prefix
/// - `level`: nodes at that depth, roots being level 1
#[async_trait]
pub trait TreeDataSource<I: TreeId>: Send + Sync {
    /// All nodes matching `query`, ignoring paging.
    async fn query_flat(&self, query: &Query<I>) -> DataSourceResult<Vec<Node<I>>>;

    /// One page of nodes matching `query`.
    async fn query_paged(&self, query: &Query<I>) -> DataSourceResult<Page<Node<I>>>;

    /// Single node lookup. `None` if absent.
    async fn get_by_id(&self, id: &I) -> DataSourceResult<Option<Node<I>>>;

    /// Bulk lookup. Absent ids are omitted from the result.
    async fn get_by_ids(&self, ids: &[I]) -> DataSourceResult<Vec<Node<I>>>;
}
