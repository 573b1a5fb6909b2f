//! JSON payloads describing a story's structure for client-side rendering.
//!
//! Every node carries `previous_section_id` / `next_section_id` from the
//! flattened reading order, so the same payload drives both a tree view and
//! linear navigation. The optional `summary` and `call-to-action`
//! pseudo-sections open and close that reading order.

use crate::error::Result;
use crate::graph::WalkEvent;
use crate::strategy::Structure;
use crate::types::SectionId;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// Id of the synthetic section placed before the first section
pub const SUMMARY_SECTION_ID: &str = "summary";

/// Id of the synthetic section placed after the last section
pub const CALL_TO_ACTION_SECTION_ID: &str = "call-to-action";

/// Section with its children nested inline, mirroring the relation graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionNode {
    pub section_id: SectionId,
    pub title: String,
    pub children: Vec<SectionNode>,
    pub previous_section_id: Option<SectionId>,
    pub next_section_id: Option<SectionId>,
}

/// Section in reading order with its children referenced by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatSectionNode {
    pub section_id: SectionId,
    pub title: String,
    pub children: Vec<SectionId>,
    pub previous_section_id: Option<SectionId>,
    pub next_section_id: Option<SectionId>,
}

/// Which pseudo-sections bracket the reading order
#[derive(Debug, Clone, Copy)]
struct Endpoints {
    summary: bool,
    call_to_action: bool,
}

impl Structure {
    /// Nested section tree. Top-level entries are the root sections in
    /// weight order, bracketed by the requested pseudo-sections.
    pub fn sections_json(
        &self,
        include_summary: bool,
        include_call_to_action: bool,
    ) -> Result<Vec<SectionNode>> {
        let ends = Endpoints {
            summary: include_summary,
            call_to_action: include_call_to_action,
        };

        let mut roots: Vec<SectionNode> = Vec::new();
        let mut open: Vec<SectionNode> = Vec::new();

        self.graph.walk(self.config.max_depth, |event| match event {
            WalkEvent::Enter { node, .. } => {
                let section = &self.graph.graph[node];
                open.push(SectionNode {
                    section_id: section.section_id.clone(),
                    title: section.title.clone(),
                    children: Vec::new(),
                    previous_section_id: self.previous_id(node, ends),
                    next_section_id: self.next_id(node, ends),
                });
            }
            WalkEvent::Leave { .. } => {
                if let Some(done) = open.pop() {
                    match open.last_mut() {
                        Some(parent) => parent.children.push(done),
                        None => roots.push(done),
                    }
                }
            }
        })?;

        let mut document = Vec::with_capacity(roots.len() + 2);
        if ends.summary {
            document.push(self.summary_node(ends));
        }
        document.extend(roots);
        if ends.call_to_action {
            document.push(self.call_to_action_node(ends));
        }
        Ok(document)
    }

    /// [`Structure::sections_json`] serialized to a string
    pub fn sections_json_string(
        &self,
        include_summary: bool,
        include_call_to_action: bool,
    ) -> Result<String> {
        let document = self.sections_json(include_summary, include_call_to_action)?;
        Ok(serde_json::to_string(&document)?)
    }

    /// Sections in reading order with child ids, bracketed by the requested
    /// pseudo-sections
    pub fn sections_json_flat(
        &self,
        include_summary: bool,
        include_call_to_action: bool,
    ) -> Vec<FlatSectionNode> {
        let ends = Endpoints {
            summary: include_summary,
            call_to_action: include_call_to_action,
        };

        let mut document = Vec::with_capacity(self.flat.len() + 2);
        if ends.summary {
            document.push(flat_node(self.summary_node(ends)));
        }
        for &node in self.flat.order() {
            let section = &self.graph.graph[node];
            document.push(FlatSectionNode {
                section_id: section.section_id.clone(),
                title: section.title.clone(),
                children: self
                    .graph
                    .children(node)
                    .into_iter()
                    .map(|child| self.section_id(child).to_string())
                    .collect(),
                previous_section_id: self.previous_id(node, ends),
                next_section_id: self.next_id(node, ends),
            });
        }
        if ends.call_to_action {
            document.push(flat_node(self.call_to_action_node(ends)));
        }
        document
    }

    fn previous_id(&self, node: NodeIndex, ends: Endpoints) -> Option<SectionId> {
        match self.flat.previous(node).flatten() {
            Some(prev) => Some(self.section_id(prev).to_string()),
            None if ends.summary => Some(SUMMARY_SECTION_ID.to_string()),
            None => None,
        }
    }

    fn next_id(&self, node: NodeIndex, ends: Endpoints) -> Option<SectionId> {
        match self.flat.next(node).flatten() {
            Some(next) => Some(self.section_id(next).to_string()),
            None if ends.call_to_action => Some(CALL_TO_ACTION_SECTION_ID.to_string()),
            None => None,
        }
    }

    fn summary_node(&self, ends: Endpoints) -> SectionNode {
        let next = match self.flat.first() {
            Some(first) => Some(self.section_id(first).to_string()),
            None if ends.call_to_action => Some(CALL_TO_ACTION_SECTION_ID.to_string()),
            None => None,
        };
        SectionNode {
            section_id: SUMMARY_SECTION_ID.to_string(),
            title: self.config.summary_title.clone(),
            children: Vec::new(),
            previous_section_id: None,
            next_section_id: next,
        }
    }

    fn call_to_action_node(&self, ends: Endpoints) -> SectionNode {
        let previous = match self.flat.last() {
            Some(last) => Some(self.section_id(last).to_string()),
            None if ends.summary => Some(SUMMARY_SECTION_ID.to_string()),
            None => None,
        };
        SectionNode {
            section_id: CALL_TO_ACTION_SECTION_ID.to_string(),
            title: self.config.call_to_action_title.clone(),
            children: Vec::new(),
            previous_section_id: previous,
            next_section_id: None,
        }
    }
}

fn flat_node(node: SectionNode) -> FlatSectionNode {
    FlatSectionNode {
        section_id: node.section_id,
        title: node.title,
        children: Vec::new(),
        previous_section_id: node.previous_section_id,
        next_section_id: node.next_section_id,
    }
}
