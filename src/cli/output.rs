//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::collections::{BTreeMap, HashSet};

use colored::Colorize;
use termtree::Tree;

use crate::domain::{Page, TreeItem};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

fn label(item: &TreeItem<String>) -> String {
    let mut s = format!("{} [{}]", item.node.name, item.node.id);
    if item.lazy {
        s.push_str(" …");
    }
    s
}

/// Arrange a page of items as trees.
///
/// Items whose parent is not part of the page become roots, so partial
/// pages (a lazily loaded level, a search hit set) still render.
pub fn build_trees(items: &[TreeItem<String>]) -> Vec<Tree<String>> {
    let ids: HashSet<&str> = items.iter().map(|i| i.node.id.as_str()).collect();
    let mut children: BTreeMap<&str, Vec<&TreeItem<String>>> = BTreeMap::new();
    let mut roots = Vec::new();

    for item in items {
        match item.node.parent_id.as_deref() {
            Some(parent) if ids.contains(parent) => {
                children.entry(parent).or_default().push(item)
            }
            _ => roots.push(item),
        }
    }

    fn grow<'a>(
        item: &'a TreeItem<String>,
        children: &BTreeMap<&str, Vec<&'a TreeItem<String>>>,
    ) -> Tree<String> {
        let leaves = children
            .get(item.node.id.as_str())
            .map(|kids| kids.iter().map(|k| grow(k, children)).collect::<Vec<_>>())
            .unwrap_or_default();
        Tree::new(label(item)).with_leaves(leaves)
    }

    roots.into_iter().map(|r| grow(r, &children)).collect()
}

/// Print a page as trees with a summary header.
pub fn tree_page(page: &Page<TreeItem<String>>) {
    header(&format!(
        "{} of {} nodes (page {}, size {})",
        page.data.len(),
        page.total,
        page.page_index,
        page.page_size
    ));
    for tree in build_trees(&page.data) {
        print!("{}", tree);
    }
}
