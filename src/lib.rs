//! Server-side loading protocol for lazily expandable tree tables.
//!
//! A request is resolved to one of three operations (first load, child
//! load, search), its query is normalized, and the matching sub-protocol
//! runs against a [`TreeDataSource`](infrastructure::traits::TreeDataSource).
//! Search results are completed with their missing ancestors so the client
//! can always render a connected tree.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::services::TreeLoadService;
pub use application::{ApplicationError, ApplicationResult, LoadHooks, NoHooks};
pub use domain::{
    DomainError, LoadMode, LoadOperation, Node, Page, PathCodec, Query, TreeId, TreeItem,
};
