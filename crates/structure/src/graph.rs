use crate::error::{Result, StructureError};
use crate::types::SectionGraph;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use std::collections::HashSet;

/// Event emitted by [`SectionGraph::walk`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEvent {
    /// Section visited for the first time (pre-order). Roots have depth 0.
    Enter { node: NodeIndex, depth: usize },

    /// All descendants of the section have been visited
    Leave { node: NodeIndex },
}

struct Frame {
    node: NodeIndex,
    children: Vec<NodeIndex>,
    next: usize,
}

impl SectionGraph {
    /// Root sections ordered by weight; ties keep insertion order
    pub fn root_nodes(&self) -> Vec<NodeIndex> {
        let mut roots: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&idx| self.graph[idx].root)
            .collect();
        roots.sort_by_key(|&idx| (self.graph[idx].weight, idx.index()));
        roots
    }

    /// Direct children ordered by relation weight; ties keep insertion order
    pub fn children(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges(node)
            .map(|e| (e.weight().weight, e.id().index(), e.target()))
            .collect();
        edges.sort_unstable_by_key(|&(weight, id, _)| (weight, id));
        edges.into_iter().map(|(_, _, target)| target).collect()
    }

    pub fn has_children(&self, node: NodeIndex) -> bool {
        self.graph.neighbors(node).next().is_some()
    }

    /// Depth-first pre-order walk over every root subtree, roots in weight
    /// order and children in relation weight order.
    ///
    /// Uses an explicit stack. Fails on a cycle, on a section reachable
    /// twice, or when a branch is deeper than `max_depth` sections.
    pub fn walk<F>(&self, max_depth: usize, mut visit: F) -> Result<()>
    where
        F: FnMut(WalkEvent),
    {
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut on_path: HashSet<NodeIndex> = HashSet::new();
        let mut stack: Vec<Frame> = Vec::new();

        for root in self.root_nodes() {
            self.enter(root, max_depth, &mut visited, &mut on_path, &mut stack, &mut visit)?;

            while let Some(frame) = stack.last_mut() {
                if let Some(&child) = frame.children.get(frame.next) {
                    frame.next += 1;
                    self.enter(child, max_depth, &mut visited, &mut on_path, &mut stack, &mut visit)?;
                } else {
                    let node = frame.node;
                    stack.pop();
                    on_path.remove(&node);
                    visit(WalkEvent::Leave { node });
                }
            }
        }

        Ok(())
    }

    fn enter<F>(
        &self,
        node: NodeIndex,
        max_depth: usize,
        visited: &mut HashSet<NodeIndex>,
        on_path: &mut HashSet<NodeIndex>,
        stack: &mut Vec<Frame>,
        visit: &mut F,
    ) -> Result<()>
    where
        F: FnMut(WalkEvent),
    {
        let section_id = || self.graph[node].section_id.clone();

        if on_path.contains(&node) {
            return Err(StructureError::CycleDetected(section_id()));
        }
        if !visited.insert(node) {
            return Err(StructureError::SharedSection(section_id()));
        }
        let depth = stack.len();
        if depth >= max_depth {
            return Err(StructureError::DepthExceeded {
                section_id: section_id(),
                max_depth,
            });
        }

        on_path.insert(node);
        visit(WalkEvent::Enter { node, depth });
        stack.push(Frame {
            node,
            children: self.children(node),
            next: 0,
        });
        Ok(())
    }

    /// Nodes not reachable from any root, in insertion order.
    ///
    /// Only follows edges, so it terminates on graphs `walk` would reject.
    pub fn unreachable_nodes(&self) -> Vec<NodeIndex> {
        let mut reachable: HashSet<NodeIndex> = HashSet::new();
        let mut queue = self.root_nodes();

        while let Some(current) = queue.pop() {
            if !reachable.insert(current) {
                continue;
            }
            for edge in self.graph.edges(current) {
                if !reachable.contains(&edge.target()) {
                    queue.push(edge.target());
                }
            }
        }

        self.graph
            .node_indices()
            .filter(|idx| !reachable.contains(idx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Section;

    fn graph_with(sections: &[(&str, bool, i32)], relations: &[(&str, &str, i32)]) -> SectionGraph {
        let mut graph = SectionGraph::new();
        for &(id, root, weight) in sections {
            graph
                .add_section(Section::new(id, id.to_uppercase()).root(root).weight(weight))
                .unwrap();
        }
        for &(parent, child, weight) in relations {
            let p = graph.find_node(parent).unwrap();
            let c = graph.find_node(child).unwrap();
            graph.add_relation(p, c, weight);
        }
        graph
    }

    fn entered(graph: &SectionGraph) -> Vec<(String, usize)> {
        let mut out = Vec::new();
        graph
            .walk(64, |event| {
                if let WalkEvent::Enter { node, depth } = event {
                    out.push((graph.graph[node].section_id.clone(), depth));
                }
            })
            .unwrap();
        out
    }

    #[test]
    fn children_follow_relation_weight_then_insertion() {
        let graph = graph_with(
            &[("r", true, 0), ("a", false, 0), ("b", false, 0), ("c", false, 0)],
            &[("r", "c", 1), ("r", "a", 0), ("r", "b", 1)],
        );
        let r = graph.find_node("r").unwrap();
        let ids: Vec<&str> = graph
            .children(r)
            .into_iter()
            .map(|idx| graph.graph[idx].section_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn walk_reports_depths() {
        let graph = graph_with(
            &[("r", true, 0), ("a", false, 0), ("b", false, 0)],
            &[("r", "a", 0), ("a", "b", 0)],
        );
        assert_eq!(
            entered(&graph),
            vec![("r".into(), 0), ("a".into(), 1), ("b".into(), 2)]
        );
    }

    #[test]
    fn walk_leaves_in_post_order() {
        let graph = graph_with(
            &[("r", true, 0), ("a", false, 0), ("b", false, 0)],
            &[("r", "a", 0), ("r", "b", 1)],
        );
        let mut left = Vec::new();
        graph
            .walk(8, |event| {
                if let WalkEvent::Leave { node } = event {
                    left.push(graph.graph[node].section_id.clone());
                }
            })
            .unwrap();
        assert_eq!(left, vec!["a", "b", "r"]);
    }

    #[test]
    fn walk_detects_cycle() {
        let graph = graph_with(
            &[("r", true, 0), ("a", false, 0), ("b", false, 0)],
            &[("r", "a", 0), ("a", "b", 0), ("b", "a", 0)],
        );
        let err = graph.walk(64, |_| {}).unwrap_err();
        assert!(matches!(err, StructureError::CycleDetected(id) if id == "a"));
    }

    #[test]
    fn walk_rejects_shared_child() {
        let graph = graph_with(
            &[("r", true, 0), ("a", false, 0), ("b", false, 0)],
            &[("r", "a", 0), ("r", "b", 1), ("a", "b", 0)],
        );
        let err = graph.walk(64, |_| {}).unwrap_err();
        assert!(matches!(err, StructureError::SharedSection(id) if id == "b"));
    }

    #[test]
    fn walk_enforces_depth_bound() {
        let graph = graph_with(
            &[("r", true, 0), ("a", false, 0), ("b", false, 0)],
            &[("r", "a", 0), ("a", "b", 0)],
        );
        assert!(graph.walk(3, |_| {}).is_ok());
        let err = graph.walk(2, |_| {}).unwrap_err();
        assert!(matches!(err, StructureError::DepthExceeded { max_depth: 2, .. }));
    }

    #[test]
    fn unreachable_nodes_include_detached_cycles() {
        let graph = graph_with(
            &[("r", true, 0), ("x", false, 0), ("y", false, 0)],
            &[("x", "y", 0), ("y", "x", 0)],
        );
        let ids: Vec<&str> = graph
            .unreachable_nodes()
            .into_iter()
            .map(|idx| graph.graph[idx].section_id.as_str())
            .collect();
        assert_eq!(ids, vec!["x", "y"]);
    }
}
