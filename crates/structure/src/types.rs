use crate::error::{Result, StructureError};
use crate::strategy::StructureType;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Section identifier (an opaque string token)
pub type SectionId = String;

/// One addressable unit of a story's narrative content
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Section {
    /// Unique id within the story
    pub section_id: SectionId,

    /// Display title
    #[serde(default)]
    pub title: String,

    /// Ordering among root sections (ascending)
    #[serde(default)]
    pub weight: i32,

    /// Entry point of the story structure
    #[serde(default)]
    pub root: bool,
}

impl Section {
    pub fn new(section_id: impl Into<SectionId>, title: impl Into<String>) -> Self {
        Self {
            section_id: section_id.into(),
            title: title.into(),
            weight: 0,
            root: false,
        }
    }

    /// Builder: set weight
    #[must_use]
    pub const fn weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Builder: mark as root section
    #[must_use]
    pub const fn root(mut self, root: bool) -> Self {
        self.root = root;
        self
    }

    pub const fn is_root(&self) -> bool {
        self.root
    }
}

/// Directed parent -> child edge between two sections of a story
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRelation {
    pub parent: SectionId,
    pub child: SectionId,

    /// Ordering among the parent's children (ascending)
    #[serde(default)]
    pub weight: i32,
}

impl SectionRelation {
    pub fn new(parent: impl Into<SectionId>, child: impl Into<SectionId>, weight: i32) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
            weight,
        }
    }
}

/// A story: its sections, the relations between them and the structure
/// type used to interpret that graph.
///
/// Sections keep the order in which they were added; that order breaks
/// weight ties when sorting roots and is the order `orphans()` reports in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Story {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_id: Option<String>,

    #[serde(default)]
    pub title: String,

    #[serde(default, alias = "structure")]
    pub structure_type: StructureType,

    #[serde(default)]
    pub sections: Vec<Section>,

    #[serde(default)]
    pub relations: Vec<SectionRelation>,
}

impl Story {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Builder: set structure type
    #[must_use]
    pub const fn with_structure_type(mut self, structure_type: StructureType) -> Self {
        self.structure_type = structure_type;
        self
    }

    /// Change how the relation graph is interpreted. The graph is untouched.
    pub fn set_structure_type(&mut self, structure_type: StructureType) {
        self.structure_type = structure_type;
    }

    /// Add a section to the story
    pub fn add_section(&mut self, section: Section) -> Result<()> {
        if self.section(&section.section_id).is_some() {
            return Err(StructureError::DuplicateSection(section.section_id));
        }
        self.sections.push(section);
        Ok(())
    }

    /// Relate two sections already in the story
    pub fn add_relation(
        &mut self,
        parent: impl Into<SectionId>,
        child: impl Into<SectionId>,
        weight: i32,
    ) -> Result<()> {
        let relation = SectionRelation::new(parent, child, weight);
        self.check_relation(&relation)?;
        self.relations.push(relation);
        Ok(())
    }

    /// Remove a section and every relation touching it.
    ///
    /// Children of the removed section are not removed; unless they have
    /// another path to a root they become orphans.
    pub fn remove_section(&mut self, section_id: &str) -> Option<Section> {
        let pos = self
            .sections
            .iter()
            .position(|s| s.section_id == section_id)?;
        self.relations
            .retain(|r| r.parent != section_id && r.child != section_id);
        Some(self.sections.remove(pos))
    }

    /// Find a section by id
    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.section_id == section_id)
    }

    fn check_relation(&self, relation: &SectionRelation) -> Result<()> {
        if relation.parent == relation.child {
            return Err(StructureError::invalid_relation(
                &relation.parent,
                &relation.child,
                "a section cannot be its own child",
            ));
        }
        for endpoint in [&relation.parent, &relation.child] {
            if self.section(endpoint).is_none() {
                return Err(StructureError::invalid_relation(
                    &relation.parent,
                    &relation.child,
                    format!("section {endpoint} is not part of the story"),
                ));
            }
        }
        Ok(())
    }
}

/// Edge in the section graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEdge {
    /// Sibling ordering weight
    pub weight: i32,
}

/// Section relation graph of a single story
#[derive(Debug, Clone)]
pub struct SectionGraph {
    /// Directed graph (parent section -> child section)
    pub graph: DiGraph<Section, RelationEdge>,

    /// Section id -> NodeIndex mapping for fast lookup
    pub section_index: HashMap<SectionId, NodeIndex>,
}

impl SectionGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            section_index: HashMap::new(),
        }
    }

    /// Add node to graph
    pub fn add_section(&mut self, section: Section) -> Result<NodeIndex> {
        if self.section_index.contains_key(&section.section_id) {
            return Err(StructureError::DuplicateSection(section.section_id));
        }
        let section_id = section.section_id.clone();
        let idx = self.graph.add_node(section);
        self.section_index.insert(section_id, idx);
        Ok(idx)
    }

    /// Add edge between nodes
    pub fn add_relation(&mut self, parent: NodeIndex, child: NodeIndex, weight: i32) {
        self.graph.add_edge(parent, child, RelationEdge { weight });
    }

    /// Find node by section id
    pub fn find_node(&self, section_id: &str) -> Option<NodeIndex> {
        self.section_index.get(section_id).copied()
    }

    /// Get section data
    pub fn section(&self, idx: NodeIndex) -> Option<&Section> {
        self.graph.node_weight(idx)
    }

    pub fn section_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn relation_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for SectionGraph {
    fn default() -> Self {
        Self::new()
    }
}
