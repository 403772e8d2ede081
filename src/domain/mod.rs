//! Domain layer: tree entities and the pure parts of the loading protocol
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod operation;
pub mod path;
pub mod reconciler;

pub use entities::*;
pub use error::DomainError;
pub use operation::{normalize_query, resolve_operation};
pub use path::{PathCodec, DEFAULT_DELIMITER};
pub use reconciler::AncestorReconciler;
