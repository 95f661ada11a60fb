//! Combined bookmark view.
//!
//! Merges the host forest with this tool's metadata overlays and the rule
//! set into a tree of [`BookmarkView`]s. The view is rebuilt on every call;
//! nothing is cached and nothing is written back.
//!
//! Per node:
//!
//! ```text
//! bookmark ─┬─ own BookmarkMetadata?        -> container, tags, notes, ...
//!           └─ else nearest ancestor folder
//!              with inheritSettings = true  -> its default container + tags
//! folder   ──  own FolderMetadata?          -> defaults + inheritSettings
//! any url  ──  CompiledRules::resolve       -> matchedContainer
//! any node ──  ancestor titles              -> folderPath
//! ```
//!
//! The build is iterative: a stack of frames mirrors the current root-to-node
//! path, and a node's view is assembled once all of its children are done.
//! The same stack doubles as the ancestor chain for inheritance and folder
//! paths.

use super::compiled_rules::CompiledRules;
use crate::store::MetadataStore;
use crate::{BookmarkMetadata, BookmarkNode, BookmarkView, FolderMetadata, NodeType, RuleType};

bitflags::bitflags! {
    /// Computed fields to fill in the combined view.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ViewFields: u8 {
        const MATCHED_CONTAINER = 1 << 0;
        const FOLDER_PATH       = 1 << 1;
        const INHERITANCE       = 1 << 2;
    }
}

impl Default for ViewFields {
    fn default() -> Self {
        ViewFields::all()
    }
}

struct Frame<'t> {
    node: &'t BookmarkNode,
    next_child: usize,
    built: Vec<BookmarkView>,
}

impl<'t> Frame<'t> {
    fn new(node: &'t BookmarkNode) -> Self {
        Frame { node, next_child: 0, built: Vec::with_capacity(node.children.len()) }
    }
}

struct Reconciler<'s, B: ?Sized, F: ?Sized> {
    bookmarks: &'s B,
    folders: &'s F,
    rules: &'s CompiledRules<'s>,
    fields: ViewFields,
}

/// Build the combined view of `tree`.
pub fn combine_view<B, F>(
    tree: &[BookmarkNode],
    bookmarks: &B,
    folders: &F,
    rules: &CompiledRules<'_>,
    fields: ViewFields,
) -> Vec<BookmarkView>
where
    B: MetadataStore<BookmarkMetadata> + ?Sized,
    F: MetadataStore<FolderMetadata> + ?Sized,
{
    let reconciler = Reconciler { bookmarks, folders, rules, fields };
    let mut roots = Vec::with_capacity(tree.len());
    let mut stack: Vec<Frame<'_>> = Vec::new();

    for root in tree {
        stack.push(Frame::new(root));
        while let Some(top) = stack.last_mut() {
            let node = top.node;
            if let Some(child) = node.children.get(top.next_child) {
                top.next_child += 1;
                stack.push(Frame::new(child));
                continue;
            }

            let Some(done) = stack.pop() else { break };
            let view = reconciler.view(done.node, &stack, done.built);
            match stack.last_mut() {
                Some(parent) => parent.built.push(view),
                None => roots.push(view),
            }
        }
    }

    roots
}

impl<'s, B, F> Reconciler<'s, B, F>
where
    B: MetadataStore<BookmarkMetadata> + ?Sized,
    F: MetadataStore<FolderMetadata> + ?Sized,
{
    fn view(&self, node: &BookmarkNode, ancestors: &[Frame<'_>], children: Vec<BookmarkView>) -> BookmarkView {
        let mut view = BookmarkView {
            id: node.id.clone(),
            title: node.title.clone(),
            url: node.url.clone(),
            parent_id: node.parent_id.clone(),
            index: node.index,
            date_added: node.date_added,
            node_type: node.node_type,
            children,
            container_id: None,
            tags: Vec::new(),
            auto_open: None,
            description: None,
            last_accessed: None,
            access_count: None,
            notes: None,
            inherit_settings: None,
            matched_container: None,
            folder_path: None,
            inherited_from: None,
        };

        match node.node_type {
            NodeType::Bookmark => self.apply_bookmark_metadata(&mut view, ancestors),
            NodeType::Folder => self.apply_folder_metadata(&mut view),
            NodeType::Separator => {}
        }

        if self.fields.contains(ViewFields::MATCHED_CONTAINER) {
            view.matched_container = node.url.as_deref().and_then(|url| self.matched_container(url));
        }
        if self.fields.contains(ViewFields::FOLDER_PATH) {
            view.folder_path = Some(ancestors.iter().map(|frame| frame.node.title.clone()).collect());
        }

        view
    }

    fn apply_bookmark_metadata(&self, view: &mut BookmarkView, ancestors: &[Frame<'_>]) {
        if let Some(meta) = self.bookmarks.get(&view.id) {
            view.container_id = meta.container_id.clone();
            view.tags = meta.tags.clone();
            view.auto_open = Some(meta.auto_open);
            view.description = meta.metadata.description.clone();
            view.last_accessed = meta.metadata.last_accessed;
            view.access_count = meta.metadata.access_count;
            view.notes = meta.metadata.notes.clone();
            return;
        }

        if !self.fields.contains(ViewFields::INHERITANCE) {
            return;
        }

        // Nearest inheriting folder wins; levels are never merged.
        for frame in ancestors.iter().rev() {
            if let Some(defaults) = self.folders.get(&frame.node.id).filter(|m| m.inherit_settings) {
                view.container_id = defaults.container_id.clone();
                view.tags = defaults.tags.clone();
                view.inherited_from = Some(defaults.folder_id.clone());
                return;
            }
        }
    }

    fn apply_folder_metadata(&self, view: &mut BookmarkView) {
        if let Some(meta) = self.folders.get(&view.id) {
            view.container_id = meta.container_id.clone();
            view.tags = meta.tags.clone();
            view.inherit_settings = Some(meta.inherit_settings);
            view.description = meta.metadata.description.clone();
            view.notes = meta.metadata.notes.clone();
        }
    }

    /// Container an open of `url` would land in; exclude rules route to none.
    fn matched_container(&self, url: &str) -> Option<String> {
        let rule = self.rules.resolve(url)?;
        match rule.rule_type {
            RuleType::Exclude => None,
            RuleType::Include | RuleType::Restrict => rule.container_id.clone(),
        }
    }
}
