use crate::error::{Result, StructureError};
use crate::types::{SectionGraph, SectionRelation, Story};
use petgraph::graph::NodeIndex;

/// Build a section graph from a story's sections and relations
pub struct GraphBuilder;

impl GraphBuilder {
    /// Build graph from story data.
    ///
    /// Stories deserialized from documents never went through
    /// `Story::add_relation`, so every relation is checked again here
    /// against the section index built in phase 1.
    pub fn build(story: &Story) -> Result<SectionGraph> {
        let mut graph = SectionGraph::new();

        // Phase 1: one node per section, in story order
        for section in &story.sections {
            graph.add_section(section.clone())?;
        }

        // Phase 2: relations
        for relation in &story.relations {
            if relation.parent == relation.child {
                return Err(StructureError::invalid_relation(
                    &relation.parent,
                    &relation.child,
                    "a section cannot be its own child",
                ));
            }
            let parent = Self::endpoint(&graph, relation, &relation.parent)?;
            let child = Self::endpoint(&graph, relation, &relation.child)?;
            graph.add_relation(parent, child, relation.weight);
        }

        log::debug!(
            "Built section graph: {} sections, {} relations",
            graph.section_count(),
            graph.relation_count()
        );

        Ok(graph)
    }

    fn endpoint(graph: &SectionGraph, relation: &SectionRelation, id: &str) -> Result<NodeIndex> {
        graph.find_node(id).ok_or_else(|| {
            StructureError::invalid_relation(
                &relation.parent,
                &relation.child,
                format!("section {id} is not part of the story"),
            )
        })
    }
}
