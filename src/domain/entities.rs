//! Domain entities: nodes, queries, pages and the per-request enums

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::path::PathCodec;

/// Identifier type of a tree node.
///
/// Ids must print and parse losslessly, since ancestor chains are stored
/// as their textual form inside a node's materialized path.
pub trait TreeId:
    Clone + Eq + Ord + Hash + Display + FromStr + Debug + Send + Sync + 'static
{
}

impl<T> TreeId for T where
    T: Clone + Eq + Ord + Hash + Display + FromStr + Debug + Send + Sync + 'static
{
}

/// Tree element as stored by the data source and returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "I: Deserialize<'de>"))]
pub struct Node<I> {
    pub id: I,
    /// `None` for root nodes
    #[serde(default)]
    pub parent_id: Option<I>,
    /// Ancestor ids, root first, excluding the node itself. `None` for roots.
    #[serde(default)]
    pub path: Option<String>,
    /// Stable sort key among siblings
    #[serde(default)]
    pub sort: i64,
    #[serde(default)]
    pub name: String,
    /// Application-defined fields
    #[serde(flatten)]
    pub payload: BTreeMap<String, serde_json::Value>,
}

impl<I: TreeId> Node<I> {
    /// Create a root node.
    pub fn root(id: I, name: impl Into<String>) -> Self {
        Self {
            id,
            parent_id: None,
            path: None,
            sort: 0,
            name: name.into(),
            payload: BTreeMap::new(),
        }
    }

    /// Create a node below `parent`, deriving its materialized path.
    pub fn child(id: I, name: impl Into<String>, parent: &Node<I>, codec: &PathCodec) -> Self {
        Self {
            id,
            parent_id: Some(parent.id.clone()),
            path: Some(codec.subtree_prefix(parent)),
            sort: 0,
            name: name.into(),
            payload: BTreeMap::new(),
        }
    }

    pub fn with_sort(mut self, sort: i64) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Path string with `None` and `""` treated alike.
    pub fn path_str(&self) -> &str {
        self.path.as_deref().unwrap_or("")
    }
}

/// Page size used when neither the request nor the settings name one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Inbound search/filter parameters of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Query<I> {
    pub parent_id: Option<I>,
    pub path: Option<String>,
    pub level: Option<u32>,
    pub order: String,
    /// Explicit operation hint, e.g. `loadchild`
    pub operation: Option<String>,
    pub keyword: Option<String>,
    /// Payload equality filters
    pub filters: BTreeMap<String, String>,
    /// 1-based
    pub page_index: usize,
    pub page_size: usize,
}

impl<I> Default for Query<I> {
    fn default() -> Self {
        Self {
            parent_id: None,
            path: None,
            level: None,
            order: String::new(),
            operation: None,
            keyword: None,
            filters: BTreeMap::new(),
            page_index: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl<I> Query<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff a non-structural criterion is set.
    ///
    /// `parent_id`, `path` and `level` only navigate the tree and never
    /// turn a request into a search.
    pub fn is_search(&self) -> bool {
        let has_keyword = self
            .keyword
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false);
        has_keyword || self.filters.values().any(|v| !v.trim().is_empty())
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn with_parent(mut self, parent_id: I) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = order.into();
        self
    }

    pub fn with_page(mut self, page_index: usize, page_size: usize) -> Self {
        self.page_index = page_index;
        self.page_size = page_size;
        self
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page_index: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    /// Wrap a complete, unpaged result as a single page.
    pub fn from_all(data: Vec<T>) -> Self {
        let total = data.len();
        Self {
            data,
            total,
            page_index: 1,
            page_size: total,
        }
    }

    pub fn empty(page_index: usize, page_size: usize) -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page_index,
            page_size,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page_index: self.page_index,
            page_size: self.page_size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Client-facing shape of a returned node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeItem<I> {
    #[serde(flatten)]
    pub node: Node<I>,
    /// Children are fetched lazily with a follow-up `loadchild` request.
    pub lazy: bool,
}

impl<I> TreeItem<I> {
    pub fn new(node: Node<I>, lazy: bool) -> Self {
        Self { node, lazy }
    }
}

/// Sub-protocol selected for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadOperation {
    FirstLoad,
    LoadChild,
    Search,
}

impl Display for LoadOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoadOperation::FirstLoad => "firstload",
            LoadOperation::LoadChild => "loadchild",
            LoadOperation::Search => "search",
        };
        f.write_str(s)
    }
}

impl FromStr for LoadOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firstload" => Ok(LoadOperation::FirstLoad),
            "loadchild" => Ok(LoadOperation::LoadChild),
            "search" => Ok(LoadOperation::Search),
            other => Err(format!("unknown operation: {other}")),
        }
    }
}

/// Whether a request delivers whole subtrees or one level at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// Entire subtree per response, matched by path prefix
    #[default]
    Sync,
    /// Immediate next level only
    Async,
}

impl LoadMode {
    pub fn is_async(self) -> bool {
        matches!(self, LoadMode::Async)
    }
}

impl Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadMode::Sync => f.write_str("sync"),
            LoadMode::Async => f.write_str("async"),
        }
    }
}

impl FromStr for LoadMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sync" => Ok(LoadMode::Sync),
            "async" => Ok(LoadMode::Async),
            other => Err(format!("unknown load mode: {other} (expected sync|async)")),
        }
    }
}

/// Parsed `order` clause: comma-separated `<field> [asc|desc]` keys.
///
/// Known fields are `sort`, `name` and `id`; anything else is looked up in
/// the node payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Order {
    keys: Vec<OrderKey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
    pub field: String,
    pub descending: bool,
}

impl Order {
    pub fn parse(order: &str) -> Self {
        let keys = order
            .split(',')
            .filter_map(|clause| {
                let mut parts = clause.split_whitespace();
                let field = parts.next()?.to_string();
                let descending = parts
                    .next()
                    .map(|d| d.eq_ignore_ascii_case("desc"))
                    .unwrap_or(false);
                Some(OrderKey { field, descending })
            })
            .collect();
        Self { keys }
    }

    pub fn keys(&self) -> &[OrderKey] {
        &self.keys
    }

    /// Compare two nodes; ties fall back to id.
    pub fn compare<I: TreeId>(&self, a: &Node<I>, b: &Node<I>) -> Ordering {
        for key in &self.keys {
            let ord = match key.field.to_ascii_lowercase().as_str() {
                "sort" => a.sort.cmp(&b.sort),
                "name" => a.name.cmp(&b.name),
                "id" => a.id.cmp(&b.id),
                _ => compare_payload(a.payload.get(&key.field), b.payload.get(&key.field)),
            };
            let ord = if key.descending { ord.reverse() } else { ord };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        a.id.cmp(&b.id)
    }

    pub fn sort<I: TreeId>(&self, nodes: &mut [Node<I>]) {
        nodes.sort_by(|a, b| self.compare(a, b));
    }
}

fn compare_payload(a: Option<&serde_json::Value>, b: Option<&serde_json::Value>) -> Ordering {
    use serde_json::Value;

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            }
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}
