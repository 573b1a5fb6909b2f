use crate::builder::GraphBuilder;
use crate::config::StructureConfig;
use crate::error::{Result, StructureError};
use crate::flatten::{flatten, FlatStructure};
use crate::types::{Section, SectionGraph, Story};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a story's section graph is read and outlined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureType {
    /// Read top-to-bottom; the outline mirrors the whole tree
    #[default]
    Linear,

    /// Drill down from a central concept; the outline shows roots and
    /// their direct children only
    Spider,
}

impl StructureType {
    pub const ALL: [StructureType; 2] = [StructureType::Linear, StructureType::Spider];

    /// Machine name
    pub const fn id(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Spider => "spider",
        }
    }

    /// Human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::Spider => "Spider",
        }
    }

    /// Look up a structure type by machine name
    pub fn from_id(id: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == id)
            .ok_or_else(|| StructureError::UnknownStructure(id.to_string()))
    }

    /// Interpret `story` with this structure type
    pub fn construct(self, story: &Story) -> Result<Structure> {
        Structure::new(self, story)
    }
}

impl FromStr for StructureType {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_id(s)
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// `(id, name)` pairs of every structure type, for selection widgets
pub fn structure_options() -> Vec<(&'static str, &'static str)> {
    StructureType::ALL
        .iter()
        .map(|kind| (kind.id(), kind.name()))
        .collect()
}

/// A story interpreted through one structure type.
///
/// The flattened order is computed when the value is built; later changes
/// to the story are not seen, build a new `Structure` instead.
#[derive(Debug, Clone)]
pub struct Structure {
    pub(crate) kind: StructureType,
    pub(crate) graph: SectionGraph,
    pub(crate) flat: FlatStructure,
    pub(crate) config: StructureConfig,
}

impl Structure {
    pub fn new(kind: StructureType, story: &Story) -> Result<Self> {
        Self::with_config(kind, story, StructureConfig::default())
    }

    /// Interpret `story` with the structure type it selects
    pub fn for_story(story: &Story) -> Result<Self> {
        Self::new(story.structure_type, story)
    }

    pub fn with_config(kind: StructureType, story: &Story, config: StructureConfig) -> Result<Self> {
        config.validate()?;

        let graph = GraphBuilder::build(story)?;
        let flat = flatten(&graph, config.max_depth)?;

        let orphaned = graph.section_count() - flat.len();
        if orphaned > 0 {
            log::warn!(
                "Story '{}': {} section(s) not reachable from a root section were left out",
                story.title,
                orphaned
            );
        }

        log::info!(
            "Built {} structure for story '{}': {} sections in reading order",
            kind,
            story.title,
            flat.len()
        );

        Ok(Self {
            kind,
            graph,
            flat,
            config,
        })
    }

    pub fn kind(&self) -> StructureType {
        self.kind
    }

    pub fn config(&self) -> &StructureConfig {
        &self.config
    }

    pub fn graph(&self) -> &SectionGraph {
        &self.graph
    }

    /// Sections in reading order
    pub fn sections_flat(&self) -> Vec<&Section> {
        self.flat
            .order()
            .iter()
            .map(|&idx| &self.graph.graph[idx])
            .collect()
    }

    /// Section read after `section_id`, `None` at the end of the story
    pub fn get_next_section(&self, section_id: &str) -> Result<Option<&Section>> {
        let node = self.lookup(section_id)?;
        Ok(self
            .flat
            .next(node)
            .flatten()
            .map(|idx| &self.graph.graph[idx]))
    }

    /// Section read before `section_id`, `None` at the start of the story
    pub fn get_previous_section(&self, section_id: &str) -> Result<Option<&Section>> {
        let node = self.lookup(section_id)?;
        Ok(self
            .flat
            .previous(node)
            .flatten()
            .map(|idx| &self.graph.graph[idx]))
    }

    /// Sections of the story left out of the reading order, in story order
    pub fn orphans(&self) -> Vec<&Section> {
        self.graph
            .unreachable_nodes()
            .into_iter()
            .map(|idx| &self.graph.graph[idx])
            .collect()
    }

    pub(crate) fn lookup(&self, section_id: &str) -> Result<NodeIndex> {
        self.graph
            .find_node(section_id)
            .filter(|&idx| self.flat.contains(idx))
            .ok_or_else(|| StructureError::section_not_found(section_id))
    }

    pub(crate) fn section_id(&self, idx: NodeIndex) -> &str {
        &self.graph.graph[idx].section_id
    }
}
