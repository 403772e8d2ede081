//! Service container for dependency injection
//!
//! Wires the tree load service with its data source and hooks.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::TreeLoadService;
use crate::application::{ApplicationError, LoadHooks, NoHooks};
use crate::config::Settings;
use crate::infrastructure::memory::InMemoryDataSource;
use crate::infrastructure::traits::TreeDataSource;
use crate::infrastructure::InfraResult;

/// Container holding the application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    pub tree_load: TreeLoadService<String>,
}

impl ServiceContainer {
    /// Create a container backed by the configured JSON data file.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let data_file = settings
            .data_file
            .clone()
            .ok_or_else(|| ApplicationError::Config {
                message: "no data_file configured (use --data or TREELOAD_DATA_FILE)".to_string(),
            })?;
        debug!("ServiceContainer::new: data_file={}", data_file.display());
        let source = InMemoryDataSource::from_json_file(&data_file, settings.codec())?;
        Ok(Self::with_deps(settings, Arc::new(source), Arc::new(NoHooks)))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        source: Arc<dyn TreeDataSource<String>>,
        hooks: Arc<dyn LoadHooks<String>>,
    ) -> Self {
        let settings = Arc::new(settings);
        let tree_load = TreeLoadService::new(source, settings.codec())
            .with_default_order(settings.default_order.clone())
            .with_hooks(hooks);

        Self {
            settings,
            tree_load,
        }
    }
}
