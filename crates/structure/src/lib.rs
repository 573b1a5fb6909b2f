//! # Storybase Structure
//!
//! Interpret a story's section graph and render its structure.
//!
//! ## Features
//!
//! - **Reading order** - depth-first flattening of the section forest
//! - **Navigation** - previous/next section for every section in the story
//! - **Structure types** - linear and spider interpretations of one graph
//! - **Client payloads** - nested JSON tree and HTML table of contents
//!
//! ## Architecture
//!
//! ```text
//! Story (sections + weighted relations)
//!     │
//!     ├──> Graph Builder
//!     │      └─ Section Graph (petgraph): nodes = sections, edges = relations
//!     │
//!     ├──> Flattening (explicit-stack walk)
//!     │      ├─ Roots by weight, children by relation weight
//!     │      ├─ Reading order + next/previous maps
//!     │      └─ Fails on cycles, shared sections, depth overflow
//!     │
//!     └──> Structure (Linear | Spider)
//!            ├─ sections_flat / get_next_section / get_previous_section
//!            ├─ sections_json (nested tree, summary / call-to-action)
//!            └─ render_toc (per-structure outline policy)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use storybase_structure::{Section, Story, Structure};
//!
//! let mut story = Story::new("Transportation Challenges");
//! story.add_section(Section::new("intro", "Introduction").root(true)).unwrap();
//! story.add_section(Section::new("schools", "School Quality")).unwrap();
//! story.add_relation("intro", "schools", 0).unwrap();
//!
//! let structure = Structure::for_story(&story).unwrap();
//! let next = structure.get_next_section("intro").unwrap();
//! assert_eq!(next.map(|s| s.section_id.as_str()), Some("schools"));
//! ```

mod builder;
mod config;
mod error;
mod flatten;
mod graph;
mod json;
mod strategy;
mod toc;
mod types;

pub use builder::GraphBuilder;
pub use config::{StructureConfig, MAX_DEPTH_LIMIT};
pub use error::{Result, StructureError};
pub use flatten::{flatten, FlatStructure};
pub use graph::WalkEvent;
pub use json::{FlatSectionNode, SectionNode, CALL_TO_ACTION_SECTION_ID, SUMMARY_SECTION_ID};
pub use strategy::{structure_options, Structure, StructureType};
pub use toc::{TocFormat, TocOptions};
pub use types::{RelationEdge, Section, SectionGraph, SectionId, SectionRelation, Story};
