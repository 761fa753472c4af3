//! Tree builder materializing location hierarchies from an index.

use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use crate::domain::arena::LocationTree;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::index::LocationIndex;

/// Constructs arena trees from a [`LocationIndex`].
#[derive(Debug, Default)]
pub struct TreeBuilder {
    visited: HashSet<String>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize the subtree rooted at `root`, `None` if the root is unknown.
    ///
    /// Nodes already placed are not placed again, which cuts cycles.
    #[instrument(level = "debug", skip(self, index))]
    pub fn build_tree(&mut self, index: &LocationIndex<'_>, root: &str) -> Option<LocationTree> {
        let root_record = index.get(root)?;
        self.visited.clear();

        let mut tree = LocationTree::new();
        let mut stack = vec![(root_record, None)];

        while let Some((record, parent_idx)) = stack.pop() {
            if !self.visited.insert(record.id.to_string()) {
                debug!("location {} already in tree, skipping", record.id);
                continue;
            }
            let current_idx = tree.insert_node(record.clone(), parent_idx);

            // Reverse so children are inserted left to right
            let children: Vec<_> = index.children_of(record.id.as_str()).collect();
            for child in children.into_iter().rev() {
                stack.push((child, Some(current_idx)));
            }
        }

        debug!("tree under {} holds {} locations", root, tree.len());
        Some(tree)
    }

    /// One tree per root record, in input order.
    ///
    /// Records unreachable from every root sit on or below a cycle.
    #[instrument(level = "debug", skip_all, fields(records = index.len()))]
    pub fn build_forest(&mut self, index: &LocationIndex<'_>) -> DomainResult<Vec<LocationTree>> {
        let mut placed: HashSet<String> = HashSet::new();
        let mut trees = Vec::new();

        for root in index.roots() {
            if placed.contains(root.id.as_str()) {
                // duplicate id of an already placed root
                continue;
            }
            if let Some(tree) = self.build_tree(index, root.id.as_str()) {
                placed.extend(tree.iter().map(|(_, node)| node.data.id.to_string()));
                trees.push(tree);
            }
        }

        if let Some(stray) = index
            .records()
            .iter()
            .find(|r| !placed.contains(r.id.as_str()))
        {
            warn!("location {} is not reachable from any root", stray.id);
            return Err(DomainError::CycleDetected(stray.id.to_string()));
        }

        debug!("built {} trees", trees.len());
        Ok(trees)
    }
}
