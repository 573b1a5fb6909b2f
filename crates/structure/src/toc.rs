use crate::error::{Result, StructureError};
use crate::graph::WalkEvent;
use crate::json::{CALL_TO_ACTION_SECTION_ID, SUMMARY_SECTION_ID};
use crate::strategy::{Structure, StructureType};
use petgraph::graph::NodeIndex;
use std::str::FromStr;

/// Output format of a table of contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TocFormat {
    #[default]
    Html,
}

impl FromStr for TocFormat {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "html" => Ok(Self::Html),
            other => Err(StructureError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Table of contents rendering options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TocOptions {
    /// Class attribute of the outer list
    pub html_class: Option<String>,

    /// Open the outline with an entry for the summary pseudo-section
    pub include_summary: bool,

    /// Close the outline with an entry for the call-to-action pseudo-section
    pub include_call_to_action: bool,
}

impl TocOptions {
    #[must_use]
    pub fn html_class(mut self, class: impl Into<String>) -> Self {
        self.html_class = Some(class.into());
        self
    }

    #[must_use]
    pub const fn include_summary(mut self, include: bool) -> Self {
        self.include_summary = include;
        self
    }

    #[must_use]
    pub const fn include_call_to_action(mut self, include: bool) -> Self {
        self.include_call_to_action = include;
        self
    }
}

impl Structure {
    /// Render a navigable outline of the story.
    ///
    /// Linear outlines nest every section under its parent. Spider outlines
    /// list each root, marked expandable, with its direct children only.
    pub fn render_toc(&self, format: TocFormat, options: &TocOptions) -> Result<String> {
        match format {
            TocFormat::Html => self.render_toc_html(options),
        }
    }

    fn render_toc_html(&self, options: &TocOptions) -> Result<String> {
        let mut out = String::new();
        match &options.html_class {
            Some(class) => out.push_str(&format!("<ul class='{}'>\n", xml_escape(class))),
            None => out.push_str("<ul>\n"),
        }

        if options.include_summary {
            out.push_str(&format!(
                "<li>{}</li>\n",
                self.link(SUMMARY_SECTION_ID, &self.config.summary_title)
            ));
        }

        match self.kind {
            StructureType::Linear => self.linear_entries(&mut out)?,
            StructureType::Spider => self.spider_entries(&mut out),
        }

        if options.include_call_to_action {
            out.push_str(&format!(
                "<li>{}</li>\n",
                self.link(CALL_TO_ACTION_SECTION_ID, &self.config.call_to_action_title)
            ));
        }

        out.push_str("</ul>");
        Ok(out)
    }

    fn linear_entries(&self, out: &mut String) -> Result<()> {
        self.graph.walk(self.config.max_depth, |event| match event {
            WalkEvent::Enter { node, .. } => {
                out.push_str("<li>");
                out.push_str(&self.section_link(node));
                if self.graph.has_children(node) {
                    out.push_str("\n<ul>\n");
                }
            }
            WalkEvent::Leave { node } => {
                if self.graph.has_children(node) {
                    out.push_str("</ul>\n");
                }
                out.push_str("</li>\n");
            }
        })
    }

    fn spider_entries(&self, out: &mut String) {
        for root in self.graph.root_nodes() {
            out.push_str(&format!("<li class='expandable'>{}", self.section_link(root)));
            let children = self.graph.children(root);
            if !children.is_empty() {
                out.push_str("\n<ul>\n");
                for child in children {
                    out.push_str(&format!("<li>{}</li>\n", self.section_link(child)));
                }
                out.push_str("</ul>\n");
            }
            out.push_str("</li>\n");
        }
    }

    fn section_link(&self, node: NodeIndex) -> String {
        let section = &self.graph.graph[node];
        self.link(&section.section_id, &section.title)
    }

    fn link(&self, section_id: &str, title: &str) -> String {
        format!(
            "<a href='{}{}'>{}</a>",
            xml_escape(&self.config.link_prefix),
            xml_escape(section_id),
            xml_escape(title)
        )
    }
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
