//! Bookmark tree traversal.
//!
//! Host bookmark trees are user-controlled in depth, so nothing here recurses:
//! every query runs on [`PreOrder`], an explicit-stack pre-order walk that
//! keeps host sibling order.

use crate::BookmarkNode;
use std::collections::HashSet;

/// Pre-order iterator over a bookmark forest.
#[derive(Debug, Clone)]
pub struct PreOrder<'t> {
    stack: Vec<&'t BookmarkNode>,
}

impl<'t> PreOrder<'t> {
    pub fn new(forest: &'t [BookmarkNode]) -> Self {
        PreOrder { stack: forest.iter().rev().collect() }
    }
}

impl<'t> Iterator for PreOrder<'t> {
    type Item = &'t BookmarkNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Every bookmark that carries a URL, in pre-order. Folders are descended
/// into but not yielded; separators are skipped.
pub fn flatten_bookmark_tree(tree: &[BookmarkNode]) -> Vec<&BookmarkNode> {
    PreOrder::new(tree).filter(|node| node.is_link()).collect()
}

/// First node with `id`, in pre-order.
pub fn find_node<'t>(tree: &'t [BookmarkNode], id: &str) -> Option<&'t BookmarkNode> {
    PreOrder::new(tree).find(|node| node.id == id)
}

/// Ids of all bookmarks below folder `folder_id`. Unknown ids and ids that
/// name a non-folder node give an empty list.
pub fn get_bookmark_ids_in_folder<'t>(tree: &'t [BookmarkNode], folder_id: &str) -> Vec<&'t str> {
    match find_node(tree, folder_id) {
        Some(folder) if folder.is_folder() => {
            flatten_bookmark_tree(&folder.children).into_iter().map(|node| node.id.as_str()).collect()
        }
        _ => Vec::new(),
    }
}

/// Union of [`get_bookmark_ids_in_folder`] over `folder_ids`, each id once,
/// at the position it was first seen.
pub fn get_bookmark_ids_in_folders<'t, S: AsRef<str>>(tree: &'t [BookmarkNode], folder_ids: &[S]) -> Vec<&'t str> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for folder_id in folder_ids {
        for id in get_bookmark_ids_in_folder(tree, folder_id.as_ref()) {
            if seen.insert(id) {
                ids.push(id);
            }
        }
    }
    ids
}

/// Ids of every folder, in pre-order.
pub fn get_folder_ids(tree: &[BookmarkNode]) -> Vec<&str> {
    PreOrder::new(tree).filter(|node| node.is_folder()).map(|node| node.id.as_str()).collect()
}
