//! Materialized path encoding.
//!
//! A node's path is the ordered chain of its ancestor ids, root first,
//! joined by a single delimiter character. The node's own id is not part
//! of its path, so roots carry an empty path.

use crate::domain::entities::{Node, TreeId};
use crate::domain::error::DomainError;

pub const DEFAULT_DELIMITER: char = '/';

/// Encodes and decodes materialized ancestor paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathCodec {
    delimiter: char,
}

impl Default for PathCodec {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl PathCodec {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Join ids into a path string.
    pub fn encode<T: ToString>(&self, ids: &[T]) -> String {
        let mut out = String::new();
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                out.push(self.delimiter);
            }
            out.push_str(&id.to_string());
        }
        out
    }

    /// Split a path string into its ids. Empty input yields no ids.
    pub fn decode(&self, path: &str) -> Vec<String> {
        if path.is_empty() {
            return Vec::new();
        }
        path.split(self.delimiter).map(str::to_string).collect()
    }

    /// Decode a path and parse every segment as a typed id.
    pub fn decode_ids<I: TreeId>(&self, path: &str) -> Result<Vec<I>, DomainError> {
        self.decode(path)
            .into_iter()
            .map(|segment| {
                segment.parse::<I>().map_err(|_| DomainError::MalformedPath {
                    path: path.to_string(),
                    reason: format!("segment '{segment}' is not a valid id"),
                })
            })
            .collect()
    }

    /// Number of ancestors encoded in `path`.
    pub fn depth(&self, path: &str) -> usize {
        if path.is_empty() {
            0
        } else {
            path.matches(self.delimiter).count() + 1
        }
    }

    /// Path shared by every descendant of `parent`: its own path plus its id.
    pub fn subtree_prefix<I: TreeId>(&self, parent: &Node<I>) -> String {
        let id = parent.id.to_string();
        match parent.path.as_deref() {
            Some(p) if !p.is_empty() => format!("{p}{}{id}", self.delimiter),
            _ => id,
        }
    }

    /// True iff a node carrying `path` belongs to the subtree whose
    /// descendants share `prefix`.
    ///
    /// Matches whole segments only, so prefix `A/B` does not match `A/BC`.
    pub fn is_within(&self, path: &str, prefix: &str) -> bool {
        if prefix.is_empty() {
            return true;
        }
        match path.strip_prefix(prefix) {
            Some("") => true,
            Some(rest) => rest.starts_with(self.delimiter),
            None => false,
        }
    }
}
