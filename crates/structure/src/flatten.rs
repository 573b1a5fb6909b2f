use crate::error::Result;
use crate::graph::WalkEvent;
use crate::types::SectionGraph;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

/// Linear reading order of a story's section forest with next/previous
/// adjacency for every section in it.
///
/// Built once by [`flatten`] and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatStructure {
    order: Vec<NodeIndex>,
    next: HashMap<NodeIndex, Option<NodeIndex>>,
    previous: HashMap<NodeIndex, Option<NodeIndex>>,
}

/// Flatten the forest rooted at the graph's root sections.
///
/// Every section's predecessor is the section emitted just before it: the
/// parent for a first child, the last section of the previous sibling's
/// subtree otherwise, and the last section of the previous root subtree for
/// a root. Sections unreachable from a root are left out.
pub fn flatten(graph: &SectionGraph, max_depth: usize) -> Result<FlatStructure> {
    let mut flat = FlatStructure::default();
    let mut last: Option<NodeIndex> = None;

    graph.walk(max_depth, |event| {
        if let WalkEvent::Enter { node, .. } = event {
            flat.previous.insert(node, last);
            if let Some(prev) = last {
                flat.next.insert(prev, Some(node));
            }
            // Overwritten when another section follows
            flat.next.insert(node, None);
            flat.order.push(node);
            last = Some(node);
        }
    })?;

    log::debug!("Flattened {} sections", flat.order.len());
    Ok(flat)
}

impl FlatStructure {
    /// Sections in reading order
    pub fn order(&self) -> &[NodeIndex] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        self.previous.contains_key(&node)
    }

    pub fn first(&self) -> Option<NodeIndex> {
        self.order.first().copied()
    }

    pub fn last(&self) -> Option<NodeIndex> {
        self.order.last().copied()
    }

    /// Successor of `node`; the outer `None` means `node` is not part of
    /// the flattened structure.
    pub fn next(&self, node: NodeIndex) -> Option<Option<NodeIndex>> {
        self.next.get(&node).copied()
    }

    /// Predecessor of `node`; the outer `None` means `node` is not part of
    /// the flattened structure.
    pub fn previous(&self, node: NodeIndex) -> Option<Option<NodeIndex>> {
        self.previous.get(&node).copied()
    }
}
