//! Ordered tree of translation keys
//!
//! Provides [`KeyTree`], the structural view over all keys of a resource
//! set. Nodes live in an arena and refer to each other by [`NodeId`]; the
//! parent link is only used for pruning and for rebuilding a node's path.
//!
//! # Invariants
//!
//! 1. The root represents the empty path and is never a leaf.
//! 2. Every non-root node is a leaf, has children, or both. Nodes that are
//!    neither are pruned as soon as a mutation leaves them that way.
//! 3. A node's path is always derived from its ancestors, never stored.
//! 4. Children keep first-insertion order across mutations.

use indexmap::IndexMap;
use std::collections::BTreeSet;

use crate::conflict::{Conflict, ConflictResolver};
use crate::error::KeyError;
use crate::path::KeyPath;

/// Index of a node in the tree arena
///
/// Ids are reused after a node is pruned; do not hold them across mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

const ROOT: NodeId = NodeId(0);

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    children: IndexMap<String, NodeId>,
    leaf: bool,
}

impl Node {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            parent,
            children: IndexMap::new(),
            leaf: false,
        }
    }
}

/// Leaf relocation produced by a rename or duplicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafMove {
    /// Leaf path before the operation
    pub from: KeyPath,
    /// Leaf path after the operation
    pub to: KeyPath,
}

/// Tree of translation keys
#[derive(Debug, Clone)]
pub struct KeyTree {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    expanded: BTreeSet<KeyPath>,
    selected: Option<KeyPath>,
}

/// Borrowed view of one node
#[derive(Debug, Clone, Copy)]
pub struct KeyNode<'a> {
    tree: &'a KeyTree,
    id: NodeId,
}

impl<'a> KeyNode<'a> {
    /// Arena id
    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Segment name (empty for the root)
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.tree.node_ref(self.id).name
    }

    /// Whether translations are attached at this exact path
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.tree.node_ref(self.id).leaf
    }

    /// Whether this is the root node
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.id == ROOT
    }

    /// Full key path, `None` for the root
    #[must_use]
    pub fn path(&self) -> Option<KeyPath> {
        self.tree.path_of(self.id)
    }

    /// Full key string, empty for the root
    #[must_use]
    pub fn key(&self) -> String {
        self.path().map(|p| p.to_string()).unwrap_or_default()
    }

    /// Parent node, `None` for the root
    #[must_use]
    pub fn parent(&self) -> Option<KeyNode<'a>> {
        self.tree
            .node_ref(self.id)
            .parent
            .map(|id| KeyNode { tree: self.tree, id })
    }

    /// Children in insertion order
    pub fn children(&self) -> impl Iterator<Item = KeyNode<'a>> + 'a {
        let tree = self.tree;
        tree.node_ref(self.id)
            .children
            .values()
            .map(move |&id| KeyNode { tree, id })
    }

    /// Whether the node has children
    #[inline]
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.tree.node_ref(self.id).children.is_empty()
    }
}

impl KeyTree {
    /// Create a tree holding only the root
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node::new(String::new(), None))],
            free: Vec::new(),
            expanded: BTreeSet::new(),
            selected: None,
        }
    }

    /// Build a tree from a set of leaf keys
    ///
    /// Keys are inserted in iteration order, which becomes the child order.
    #[must_use]
    pub fn from_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = KeyPath>,
    {
        let mut tree = Self::new();
        for key in keys {
            tree.insert(&key);
        }
        tree
    }

    /// Root node view
    #[inline]
    #[must_use]
    pub fn root(&self) -> KeyNode<'_> {
        KeyNode { tree: self, id: ROOT }
    }

    /// View of a node by id, `None` if the id is stale
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<KeyNode<'_>> {
        self.nodes
            .get(id.0)
            .and_then(Option::as_ref)
            .map(|_| KeyNode { tree: self, id })
    }

    /// Resolve a path to a node id. O(depth).
    #[must_use]
    pub fn find(&self, path: &KeyPath) -> Option<NodeId> {
        let mut current = ROOT;
        for segment in path.iter() {
            current = *self.node_ref(current).children.get(segment)?;
        }
        Some(current)
    }

    /// Resolve a path to a node view
    #[inline]
    #[must_use]
    pub fn get(&self, path: &KeyPath) -> Option<KeyNode<'_>> {
        self.find(path).map(|id| KeyNode { tree: self, id })
    }

    /// Whether `path` exists as a leaf
    #[inline]
    #[must_use]
    pub fn contains_leaf(&self, path: &KeyPath) -> bool {
        self.get(path).is_some_and(|n| n.is_leaf())
    }

    /// Number of leaves
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().flatten().filter(|n| n.leaf).count()
    }

    /// Whether the tree has no keys at all
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_ref(ROOT).children.is_empty()
    }

    /// Insert a leaf, creating missing ancestors as structural nodes
    ///
    /// Inserting an existing leaf returns it unchanged. Inserting below an
    /// existing leaf is allowed: that node becomes a leaf and an ancestor.
    pub fn insert(&mut self, path: &KeyPath) -> NodeId {
        let mut current = ROOT;
        for segment in path.iter() {
            current = match self.node_ref(current).children.get(segment) {
                Some(&child) => child,
                None => {
                    let child = self.alloc(Node::new(segment.to_string(), Some(current)));
                    self.node_mut(current).children.insert(segment.to_string(), child);
                    child
                }
            };
        }
        self.node_mut(current).leaf = true;
        current
    }

    /// Remove the key at `path`
    ///
    /// A leaf stops being a leaf; its descendants, if any, are kept. A
    /// structural node takes its whole subtree with it. Empty structural
    /// ancestors are then pruned up to the first one that still has
    /// children or is a leaf itself. Returns the leaf paths that were
    /// removed, in traversal order. A missing path is a no-op.
    pub fn remove(&mut self, path: &KeyPath) -> Vec<KeyPath> {
        let Some(id) = self.find(path) else {
            return Vec::new();
        };
        if !self.node_ref(id).leaf {
            return self.remove_subtree(path);
        }

        self.node_mut(id).leaf = false;
        self.prune_from(id);
        self.forget_removed(path);
        vec![path.clone()]
    }

    /// Drop the node at `path` together with every descendant
    fn remove_subtree(&mut self, path: &KeyPath) -> Vec<KeyPath> {
        let Some(id) = self.find(path) else {
            return Vec::new();
        };
        let removed = self.leaves_under(id);

        let parent = self.node_ref(id).parent;
        self.free_subtree(id);
        if let Some(parent) = parent {
            self.node_mut(parent).children.shift_remove(path.name());
            self.prune_from(parent);
        }

        self.forget_removed(path);
        removed
    }

    /// Move the subtree at `from` to `to`
    ///
    /// `resolution` must match what [`ConflictResolver::inspect`] reports for
    /// the pair; a replace drops the destination subtree first, a merge
    /// unions both subtrees. Expanded and selected entries under `from`
    /// follow the move. Renaming a key onto itself is a no-op.
    ///
    /// # Errors
    /// Returns [`KeyError`] before anything is touched if the source is
    /// missing, the paths overlap, or `resolution` does not match.
    pub fn rename(&mut self, from: &KeyPath, to: &KeyPath, resolution: Conflict) -> Result<Vec<LeafMove>, KeyError> {
        let moves = self.plan(from, to, resolution)?;
        if moves.is_empty() {
            return Ok(moves);
        }

        let expanded: BTreeSet<KeyPath> = self
            .expanded
            .iter()
            .map(|p| p.rebase(from, to).unwrap_or_else(|| p.clone()))
            .collect();
        let selected = self
            .selected
            .as_ref()
            .map(|p| p.rebase(from, to).unwrap_or_else(|| p.clone()));

        if resolution == Conflict::Replace {
            self.remove_subtree(to);
        }
        self.remove_subtree(from);
        for mv in &moves {
            self.insert(&mv.to);
        }

        self.expanded = expanded.into_iter().filter(|p| self.find(p).is_some()).collect();
        self.selected = selected.filter(|p| self.find(p).is_some());

        tracing::debug!(%from, %to, %resolution, leaves = moves.len(), "renamed key subtree");
        Ok(moves)
    }

    /// Copy the subtree at `from` to `to`, keeping the source
    ///
    /// Same conflict handling as [`KeyTree::rename`].
    ///
    /// # Errors
    /// Same as [`KeyTree::rename`].
    pub fn duplicate(&mut self, from: &KeyPath, to: &KeyPath, resolution: Conflict) -> Result<Vec<LeafMove>, KeyError> {
        let moves = self.plan(from, to, resolution)?;
        if moves.is_empty() {
            return Ok(moves);
        }

        if resolution == Conflict::Replace {
            self.remove_subtree(to);
        }
        for mv in &moves {
            self.insert(&mv.to);
        }

        tracing::debug!(%from, %to, %resolution, leaves = moves.len(), "duplicated key subtree");
        Ok(moves)
    }

    /// All leaf paths, depth-first with lexicographic order at each level
    #[must_use]
    pub fn leaf_paths(&self) -> Vec<KeyPath> {
        self.leaves_under(ROOT)
    }

    /// Leaf paths at or below `path`, in the same order as [`KeyTree::leaf_paths`]
    #[must_use]
    pub fn leaf_paths_under(&self, path: &KeyPath) -> Vec<KeyPath> {
        self.find(path).map(|id| self.leaves_under(id)).unwrap_or_default()
    }

    /// Drop every key and all presentation state
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Mark existing paths as expanded, returning how many were accepted
    pub fn expand<'p, I>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = &'p KeyPath>,
    {
        let mut accepted = 0;
        for path in paths {
            if self.find(path).is_some() {
                self.expanded.insert(path.clone());
                accepted += 1;
            }
        }
        accepted
    }

    /// Collapse a path
    pub fn collapse(&mut self, path: &KeyPath) -> bool {
        self.expanded.remove(path)
    }

    /// Whether a path is expanded
    #[inline]
    #[must_use]
    pub fn is_expanded(&self, path: &KeyPath) -> bool {
        self.expanded.contains(path)
    }

    /// Expanded paths in sorted order
    pub fn expanded(&self) -> impl Iterator<Item = &KeyPath> {
        self.expanded.iter()
    }

    /// Select an existing path; returns `false` and keeps the old selection otherwise
    pub fn select(&mut self, path: &KeyPath) -> bool {
        if self.find(path).is_some() {
            self.selected = Some(path.clone());
            true
        } else {
            false
        }
    }

    /// Clear the selection
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Currently selected path
    #[inline]
    #[must_use]
    pub fn selected(&self) -> Option<&KeyPath> {
        self.selected.as_ref()
    }

    fn plan(&self, from: &KeyPath, to: &KeyPath, resolution: Conflict) -> Result<Vec<LeafMove>, KeyError> {
        let expected = ConflictResolver::inspect(self, from, to)?;
        if from == to {
            return Ok(Vec::new());
        }
        if expected != resolution {
            return Err(KeyError::UnresolvedConflict {
                destination: to.to_string(),
                expected,
                given: resolution,
            });
        }

        let source = self
            .find(from)
            .ok_or_else(|| KeyError::SourceNotFound(from.to_string()))?;
        Ok(self
            .leaves_under(source)
            .into_iter()
            .filter_map(|leaf| {
                let moved = leaf.rebase(from, to)?;
                Some(LeafMove { from: leaf, to: moved })
            })
            .collect())
    }

    fn leaves_under(&self, id: NodeId) -> Vec<KeyPath> {
        let mut out = Vec::new();
        let mut prefix: Vec<String> = self.path_of(id).map(|p| p.segments().to_vec()).unwrap_or_default();
        self.collect_leaves(id, &mut prefix, &mut out);
        out
    }

    fn collect_leaves(&self, id: NodeId, prefix: &mut Vec<String>, out: &mut Vec<KeyPath>) {
        let node = self.node_ref(id);
        if node.leaf {
            if let Ok(path) = KeyPath::from_segments(prefix.iter().cloned()) {
                out.push(path);
            }
        }
        let mut names: Vec<&String> = node.children.keys().collect();
        names.sort();
        for name in names {
            prefix.push(name.clone());
            self.collect_leaves(node.children[name], prefix, out);
            prefix.pop();
        }
    }

    fn path_of(&self, id: NodeId) -> Option<KeyPath> {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(cid) = current {
            let node = self.node_ref(cid);
            if node.parent.is_some() {
                segments.push(node.name.clone());
            }
            current = node.parent;
        }
        segments.reverse();
        KeyPath::from_segments(segments).ok()
    }

    fn prune_from(&mut self, mut id: NodeId) {
        while id != ROOT {
            let node = self.node_ref(id);
            if node.leaf || !node.children.is_empty() {
                break;
            }
            let Some(parent) = node.parent else { break };
            let name = node.name.clone();
            self.node_mut(parent).children.shift_remove(&name);
            self.release(id);
            id = parent;
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            stack.extend(self.node_ref(current).children.values().copied());
            self.release(current);
        }
    }

    fn forget_removed(&mut self, path: &KeyPath) {
        let before = self.expanded.len();
        let stale: Vec<KeyPath> = self
            .expanded
            .iter()
            .filter(|p| self.find(p).is_none())
            .cloned()
            .collect();
        for p in stale {
            self.expanded.remove(&p);
        }

        if let Some(selected) = self.selected.take() {
            let mut candidate = Some(selected);
            while let Some(p) = candidate {
                if self.find(&p).is_some() {
                    self.selected = Some(p);
                    break;
                }
                candidate = p.parent();
            }
        }

        if before != self.expanded.len() {
            tracing::trace!(%path, dropped = before - self.expanded.len(), "collapsed removed keys");
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(slot) = self.free.pop() {
            self.nodes[slot] = Some(node);
            NodeId(slot)
        } else {
            self.nodes.push(Some(node));
            NodeId(self.nodes.len() - 1)
        }
    }

    fn release(&mut self, id: NodeId) {
        debug_assert_ne!(id, ROOT, "root is never released");
        if self.nodes[id.0].take().is_some() {
            self.free.push(id.0);
        }
    }

    fn node_ref(&self, id: NodeId) -> &Node {
        self.nodes[id.0]
            .as_ref()
            .unwrap_or_else(|| unreachable!("stale node id {}", id.0))
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.0]
            .as_mut()
            .unwrap_or_else(|| unreachable!("stale node id {}", id.0))
    }
}

impl Default for KeyTree {
    fn default() -> Self {
        Self::new()
    }
}
