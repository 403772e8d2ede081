//! Tree load service
//!
//! Dispatches one tree-table request to first load, child load or search,
//! and reassembles the data source's answer into a renderable page.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::application::hooks::{LoadHooks, NoHooks};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    normalize_query, resolve_operation, AncestorReconciler, DomainError, LoadMode, LoadOperation,
    Node, Order, Page, PathCodec, Query, TreeId, TreeItem,
};
use crate::infrastructure::traits::{DataSourceResult, TreeDataSource};

pub const DEFAULT_ORDER: &str = "sort";

/// What a sub-protocol produced, before hooks and conversion.
enum Loaded<I> {
    /// Complete result, delivered as one page
    Whole(Vec<Node<I>>),
    Paged(Page<Node<I>>),
}

/// Service answering tree-table queries against a [`TreeDataSource`].
pub struct TreeLoadService<I: TreeId> {
    source: Arc<dyn TreeDataSource<I>>,
    hooks: Arc<dyn LoadHooks<I>>,
    codec: PathCodec,
    reconciler: AncestorReconciler,
    default_order: String,
}

impl<I: TreeId> TreeLoadService<I> {
    /// Create a new tree load service.
    pub fn new(source: Arc<dyn TreeDataSource<I>>, codec: PathCodec) -> Self {
        Self {
            source,
            hooks: Arc::new(NoHooks),
            codec,
            reconciler: AncestorReconciler::new(codec),
            default_order: DEFAULT_ORDER.to_string(),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn LoadHooks<I>>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_default_order(mut self, order: impl Into<String>) -> Self {
        self.default_order = order.into();
        self
    }

    pub fn codec(&self) -> PathCodec {
        self.codec
    }

    /// Answer one request.
    pub async fn handle_query(
        &self,
        query: Query<I>,
        mode: LoadMode,
    ) -> ApplicationResult<Page<TreeItem<I>>> {
        self.handle_query_with_cancel(query, mode, &CancellationToken::new())
            .await
    }

    /// Answer one request, aborting in-flight data-source calls once
    /// `cancel` fires.
    #[instrument(skip_all, fields(mode = %mode))]
    pub async fn handle_query_with_cancel(
        &self,
        query: Query<I>,
        mode: LoadMode,
        cancel: &CancellationToken,
    ) -> ApplicationResult<Page<TreeItem<I>>> {
        let operation = resolve_operation(&query);
        let query = normalize_query(query, operation, &self.default_order);
        let query = self.hooks.query_before(query, operation);
        debug!("handle_query: operation={operation}");

        let (loaded, lazy) = match (operation, mode) {
            (LoadOperation::FirstLoad, LoadMode::Sync) => {
                (self.sync_first_load(query, cancel).await?, false)
            }
            (LoadOperation::FirstLoad, LoadMode::Async) => {
                (self.async_first_load(query, cancel).await?, true)
            }
            (LoadOperation::LoadChild, LoadMode::Sync) => {
                (self.sync_load_children(query, cancel).await?, false)
            }
            (LoadOperation::LoadChild, LoadMode::Async) => {
                (self.async_load_children(query, cancel).await?, true)
            }
            (LoadOperation::Search, _) => (self.search(query, cancel).await?, mode.is_async()),
        };

        let page = match loaded {
            Loaded::Whole(nodes) => Page::from_all(self.hooks.process_data(nodes, operation)),
            Loaded::Paged(page) => Page {
                data: self.hooks.process_data(page.data, operation),
                total: page.total,
                page_index: page.page_index,
                page_size: page.page_size,
            },
        };
        debug!(
            "handle_query: returning {} of {} nodes, lazy={lazy}",
            page.data.len(),
            page.total
        );
        Ok(page.map(|node| TreeItem::new(node, lazy)))
    }

    async fn sync_first_load(
        &self,
        query: Query<I>,
        cancel: &CancellationToken,
    ) -> ApplicationResult<Loaded<I>> {
        let nodes = guarded(cancel, self.source.query_flat(&query)).await?;
        Ok(Loaded::Whole(nodes))
    }

    async fn async_first_load(
        &self,
        query: Query<I>,
        cancel: &CancellationToken,
    ) -> ApplicationResult<Loaded<I>> {
        let query = Query {
            level: Some(1),
            ..query
        };
        let page = guarded(cancel, self.source.query_paged(&query)).await?;
        Ok(Loaded::Paged(page))
    }

    async fn async_load_children(
        &self,
        query: Query<I>,
        cancel: &CancellationToken,
    ) -> ApplicationResult<Loaded<I>> {
        require_parent(&query)?;
        let query = self.hooks.async_load_children_query(Query {
            level: None,
            path: None,
            ..query
        });
        let nodes = guarded(cancel, self.source.query_flat(&query)).await?;
        Ok(Loaded::Whole(nodes))
    }

    async fn sync_load_children(
        &self,
        query: Query<I>,
        cancel: &CancellationToken,
    ) -> ApplicationResult<Loaded<I>> {
        let parent_id = require_parent(&query)?.clone();
        let parent = guarded(cancel, self.source.get_by_id(&parent_id))
            .await?
            .ok_or_else(|| DomainError::node_not_found(&parent_id))?;

        let prefix = self.codec.subtree_prefix(&parent);
        debug!("sync_load_children: parent={parent_id} prefix={prefix}");
        let query = Query {
            path: Some(prefix),
            level: None,
            parent_id: None,
            ..query
        };
        let mut nodes = guarded(cancel, self.source.query_flat(&query)).await?;

        let before = nodes.len();
        nodes.retain(|n| n.id != parent.id);
        if nodes.len() != before {
            warn!("sync_load_children: subtree query returned parent {parent_id}, removed");
        }
        Ok(Loaded::Whole(nodes))
    }

    async fn search(
        &self,
        query: Query<I>,
        cancel: &CancellationToken,
    ) -> ApplicationResult<Loaded<I>> {
        // matches may sit at any depth
        let query = Query {
            level: None,
            path: None,
            parent_id: None,
            ..query
        };
        let matches = guarded(cancel, self.source.query_flat(&query)).await?;
        let missing = self.reconciler.missing_ancestors(&matches)?;
        debug!(
            "search: {} matches, {} missing ancestors",
            matches.len(),
            missing.len()
        );
        if missing.is_empty() {
            return Ok(Loaded::Whole(matches));
        }

        let ids: Vec<I> = missing.iter().cloned().collect();
        let ancestors = guarded(cancel, self.source.get_by_ids(&ids)).await?;

        let fetched: HashSet<&I> = ancestors.iter().map(|n| &n.id).collect();
        if let Some(absent) = ids.iter().find(|id| !fetched.contains(id)) {
            return Err(DomainError::NotFound {
                entity: "ancestor",
                id: absent.to_string(),
            }
            .into());
        }

        let mut merged = self.reconciler.merge(matches, ancestors);
        Order::parse(&query.order).sort(&mut merged);
        Ok(Loaded::Whole(merged))
    }
}

fn require_parent<I>(query: &Query<I>) -> ApplicationResult<&I> {
    query
        .parent_id
        .as_ref()
        .ok_or_else(|| DomainError::validation("parent id required").into())
}

/// Await a data-source call unless `cancel` fires first.
async fn guarded<T>(
    cancel: &CancellationToken,
    call: impl Future<Output = DataSourceResult<T>>,
) -> ApplicationResult<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ApplicationError::Cancelled),
        result = call => result.map_err(ApplicationError::from),
    }
}
