use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::LocationRecord;

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Location record for this node
    pub data: LocationRecord,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in input order
    pub children: Vec<Index>,
}

/// Arena-based tree of location records.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Each tree holds one materialized subtree of the location hierarchy.
#[derive(Debug)]
pub struct LocationTree {
    arena: Arena<TreeNode>,
    root: Option<Index>,
}

impl Default for LocationTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    #[instrument(level = "trace", skip(self, data), fields(id = %data.id))]
    pub fn insert_node(&mut self, data: LocationRecord, parent: Option<Index>) -> Index {
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn root_record(&self) -> Option<&LocationRecord> {
        self.root.and_then(|idx| self.get_node(idx)).map(|n| &n.data)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order, left to right.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn to_tree_string(&self) -> Tree<String> {
        if let Some(root_idx) = self.root {
            let label = self
                .get_node(root_idx)
                .map(|n| n.data.label())
                .unwrap_or_default();
            let mut tree = Tree::new(label);

            fn build_tree(arena: &LocationTree, node_idx: Index, parent_tree: &mut Tree<String>) {
                if let Some(node) = arena.get_node(node_idx) {
                    for &child_idx in &node.children {
                        if let Some(child) = arena.get_node(child_idx) {
                            let mut child_tree = Tree::new(child.data.label());
                            build_tree(arena, child_idx, &mut child_tree);
                            parent_tree.push(child_tree);
                        }
                    }
                }
            }

            build_tree(self, root_idx, &mut tree);
            tree
        } else {
            Tree::new("Empty tree".to_string())
        }
    }
}

pub struct TreeIterator<'a> {
    tree: &'a LocationTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a LocationTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.tree.get_node(current_idx)?;
        // Push children in reverse order for left-to-right traversal
        for &child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some((current_idx, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> LocationTree {
        let mut tree = LocationTree::new();
        let root = tree.insert_node(LocationRecord::new("root").with_name("Country"), None);
        let a = tree.insert_node(LocationRecord::new("a").with_parent("root"), Some(root));
        tree.insert_node(LocationRecord::new("a1").with_parent("a"), Some(a));
        tree.insert_node(LocationRecord::new("b").with_parent("root"), Some(root));
        tree
    }

    #[test]
    fn given_tree_when_iterating_then_preorder_left_to_right() {
        let tree = chain();

        let pre: Vec<_> = tree.iter().map(|(_, n)| n.data.id.to_string()).collect();
        assert_eq!(pre, vec!["root", "a", "a1", "b"]);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.root_record().map(|r| r.id.as_str()), Some("root"));
    }

    #[test]
    fn given_inserted_child_when_reading_node_then_linked_to_parent() {
        let tree = chain();
        let root = tree.root().unwrap();

        let children = &tree.get_node(root).unwrap().children;
        let first = tree.get_node(children[0]).unwrap();

        assert_eq!(children.len(), 2);
        assert_eq!(first.data.id.as_str(), "a");
        assert_eq!(first.parent, Some(root));
    }

    #[test]
    fn given_empty_tree_when_querying_then_nothing() {
        let tree = LocationTree::new();

        assert!(tree.is_empty());
        assert!(tree.root_record().is_none());
        assert_eq!(tree.iter().count(), 0);
        assert_eq!(tree.to_tree_string().to_string().trim(), "Empty tree");
    }

    #[test]
    fn given_tree_when_rendering_then_shows_labels() {
        let rendered = chain().to_tree_string().to_string();

        assert!(rendered.starts_with("root (Country)"));
        assert!(rendered.contains("a1"));
    }
}
