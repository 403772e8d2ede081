//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (TreeDataSource)
//! but are themselves concrete structs, not traits.

mod tree_load;

pub use tree_load::{TreeLoadService, DEFAULT_ORDER};
