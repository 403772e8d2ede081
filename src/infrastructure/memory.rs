//! In-memory tree data source, optionally loaded from a JSON file.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use itertools::Itertools;
use tracing::debug;

use crate::domain::{DomainError, Node, Order, Page, PathCodec, Query, TreeId};
use crate::infrastructure::traits::{DataSourceResult, TreeDataSource};
use crate::infrastructure::{InfraError, InfraResult};

/// Data source over a fixed set of nodes.
#[derive(Debug, Clone)]
pub struct InMemoryDataSource<I: TreeId> {
    nodes: Vec<Node<I>>,
    index: HashMap<I, usize>,
    codec: PathCodec,
}

impl<I: TreeId> InMemoryDataSource<I> {
    pub fn new(nodes: Vec<Node<I>>, codec: PathCodec) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        Self {
            nodes,
            index,
            codec,
        }
    }

    pub fn nodes(&self) -> &[Node<I>] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check the materialized-path invariant for every node.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(dup) = self.nodes.iter().map(|n| &n.id).duplicates().next() {
            return Err(DomainError::validation(format!("duplicate node id: {dup}")));
        }

        for node in &self.nodes {
            match &node.parent_id {
                None => {
                    if !node.path_str().is_empty() {
                        return Err(DomainError::MalformedPath {
                            path: node.path_str().to_string(),
                            reason: format!("root node {} must not carry a path", node.id),
                        });
                    }
                }
                Some(parent_id) => {
                    let parent = self
                        .lookup(parent_id)
                        .ok_or_else(|| DomainError::node_not_found(parent_id))?;
                    let expected = self.codec.subtree_prefix(parent);
                    if node.path_str() != expected {
                        return Err(DomainError::MalformedPath {
                            path: node.path_str().to_string(),
                            reason: format!("node {} expected path '{expected}'", node.id),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn lookup(&self, id: &I) -> Option<&Node<I>> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    fn matches(&self, node: &Node<I>, query: &Query<I>) -> bool {
        if let Some(parent_id) = &query.parent_id {
            if node.parent_id.as_ref() != Some(parent_id) {
                return false;
            }
        }
        if let Some(prefix) = query.path.as_deref().filter(|p| !p.is_empty()) {
            if !self.codec.is_within(node.path_str(), prefix) {
                return false;
            }
        }
        if let Some(level) = query.level {
            if self.codec.depth(node.path_str()) + 1 != level as usize {
                return false;
            }
        }
        if let Some(keyword) = query.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            if !matches_keyword(node, keyword) {
                return false;
            }
        }
        query
            .filters
            .iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .all(|(k, v)| payload_text(node, k).as_deref() == Some(v.as_str()))
    }

    fn select(&self, query: &Query<I>) -> Vec<Node<I>> {
        let mut selected: Vec<Node<I>> = self
            .nodes
            .iter()
            .filter(|n| self.matches(n, query))
            .cloned()
            .collect();
        Order::parse(&query.order).sort(&mut selected);
        selected
    }
}

impl InMemoryDataSource<String> {
    /// Parse a JSON array of nodes.
    pub fn from_json_str(content: &str, codec: PathCodec) -> InfraResult<Self> {
        let nodes: Vec<Node<String>> =
            serde_json::from_str(content).map_err(|e| InfraError::parse("node list", e))?;
        Ok(Self::new(nodes, codec))
    }

    /// Load a JSON array of nodes from `path`.
    pub fn from_json_file(path: &Path, codec: PathCodec) -> InfraResult<Self> {
        debug!("from_json_file: path={}", path.display());
        let content = std::fs::read_to_string(path)
            .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
        let nodes: Vec<Node<String>> = serde_json::from_str(&content)
            .map_err(|e| InfraError::parse(path.display().to_string(), e))?;
        Ok(Self::new(nodes, codec))
    }
}

fn matches_keyword<I>(node: &Node<I>, keyword: &str) -> bool {
    let needle = keyword.to_lowercase();
    if node.name.to_lowercase().contains(&needle) {
        return true;
    }
    node.payload.values().any(|v| match v {
        serde_json::Value::String(s) => s.to_lowercase().contains(&needle),
        _ => false,
    })
}

fn payload_text<I>(node: &Node<I>, key: &str) -> Option<String> {
    match key {
        "name" => Some(node.name.clone()),
        _ => node.payload.get(key).map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }),
    }
}

#[async_trait]
impl<I: TreeId> TreeDataSource<I> for InMemoryDataSource<I> {
    async fn query_flat(&self, query: &Query<I>) -> DataSourceResult<Vec<Node<I>>> {
        Ok(self.select(query))
    }

    async fn query_paged(&self, query: &Query<I>) -> DataSourceResult<Page<Node<I>>> {
        let selected = self.select(query);
        let total = selected.len();
        if query.page_size == 0 {
            return Ok(Page::from_all(selected));
        }
        let page_index = query.page_index.max(1);
        let data = selected
            .into_iter()
            .skip((page_index - 1).saturating_mul(query.page_size))
            .take(query.page_size)
            .collect();
        Ok(Page {
            data,
            total,
            page_index,
            page_size: query.page_size,
        })
    }

    async fn get_by_id(&self, id: &I) -> DataSourceResult<Option<Node<I>>> {
        Ok(self.lookup(id).cloned())
    }

    async fn get_by_ids(&self, ids: &[I]) -> DataSourceResult<Vec<Node<I>>> {
        Ok(ids.iter().filter_map(|id| self.lookup(id)).cloned().collect())
    }
}
