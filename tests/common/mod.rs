//! Shared fixtures for tree load tests

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;

use treeload::domain::{Node, Page, PathCodec, Query};
use treeload::infrastructure::traits::{DataSourceError, DataSourceResult, TreeDataSource};
use treeload::infrastructure::InMemoryDataSource;

/// One recorded data-source call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    QueryFlat(Query<String>),
    QueryPaged(Query<String>),
    GetById(String),
    GetByIds(Vec<String>),
}

/// Data source that records every call and delegates to an in-memory store.
pub struct RecordingSource {
    inner: InMemoryDataSource<String>,
    calls: Mutex<Vec<Call>>,
    /// Extra nodes appended to every `query_flat` answer
    extra_flat: Vec<Node<String>>,
    fail: bool,
}

impl RecordingSource {
    pub fn new(nodes: Vec<Node<String>>) -> Self {
        Self {
            inner: InMemoryDataSource::new(nodes, PathCodec::default()),
            calls: Mutex::new(Vec::new()),
            extra_flat: Vec::new(),
            fail: false,
        }
    }

    /// Simulate a prefix query that is inclusive of the subtree root.
    pub fn with_extra_flat(mut self, nodes: Vec<Node<String>>) -> Self {
        self.extra_flat = nodes;
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> DataSourceResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(DataSourceError::backend("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl TreeDataSource<String> for RecordingSource {
    async fn query_flat(&self, query: &Query<String>) -> DataSourceResult<Vec<Node<String>>> {
        self.record(Call::QueryFlat(query.clone()))?;
        let mut nodes = self.inner.query_flat(query).await?;
        nodes.extend(self.extra_flat.iter().cloned());
        Ok(nodes)
    }

    async fn query_paged(&self, query: &Query<String>) -> DataSourceResult<Page<Node<String>>> {
        self.record(Call::QueryPaged(query.clone()))?;
        self.inner.query_paged(query).await
    }

    async fn get_by_id(&self, id: &String) -> DataSourceResult<Option<Node<String>>> {
        self.record(Call::GetById(id.clone()))?;
        self.inner.get_by_id(id).await
    }

    async fn get_by_ids(&self, ids: &[String]) -> DataSourceResult<Vec<Node<String>>> {
        self.record(Call::GetByIds(ids.to_vec()))?;
        self.inner.get_by_ids(ids).await
    }
}

/// Organization chart used across tests:
///
/// ```text
/// R (root)
/// ├── X (sales)
/// │   ├── Y (emea)
/// │   └── Z (apac)
/// └── W (finance)
/// S (root, archive)
/// ```
pub fn org_chart() -> Vec<Node<String>> {
    let codec = PathCodec::default();
    let r = Node::root("R".to_string(), "Company").with_sort(1);
    let s = Node::root("S".to_string(), "Archive").with_sort(2);
    let x = Node::child("X".to_string(), "Sales", &r, &codec)
        .with_sort(1)
        .with_field("kind", "department");
    let w = Node::child("W".to_string(), "Finance", &r, &codec)
        .with_sort(2)
        .with_field("kind", "department");
    let y = Node::child("Y".to_string(), "EMEA Sales", &x, &codec)
        .with_sort(1)
        .with_field("kind", "region");
    let z = Node::child("Z".to_string(), "APAC Sales", &x, &codec)
        .with_sort(2)
        .with_field("kind", "region");
    vec![r, s, x, w, y, z]
}

pub fn ids<I: Clone>(items: &[treeload::TreeItem<I>]) -> Vec<I> {
    items.iter().map(|i| i.node.id.clone()).collect()
}
