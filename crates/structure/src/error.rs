use thiserror::Error;

pub type Result<T> = std::result::Result<T, StructureError>;

#[derive(Error, Debug)]
pub enum StructureError {
    #[error("Unknown structure type: {0}")]
    UnknownStructure(String),

    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Cycle detected at section: {0}")]
    CycleDetected(String),

    /// A section reached twice during traversal: either through two parents
    /// or as a root that is also another section's child.
    #[error("Section {0} is reachable through more than one parent")]
    SharedSection(String),

    #[error("Duplicate section id: {0}")]
    DuplicateSection(String),

    #[error("Invalid relation {parent} -> {child}: {reason}")]
    InvalidRelation {
        parent: String,
        child: String,
        reason: String,
    },

    #[error("Section tree deeper than {max_depth} levels at section: {section_id}")]
    DepthExceeded { section_id: String, max_depth: usize },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl StructureError {
    pub fn section_not_found(section_id: impl Into<String>) -> Self {
        Self::SectionNotFound(section_id.into())
    }

    pub fn invalid_relation(
        parent: impl Into<String>,
        child: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidRelation {
            parent: parent.into(),
            child: child.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// True for data-integrity failures in the relation graph itself
    pub fn is_integrity_error(&self) -> bool {
        matches!(
            self,
            Self::CycleDetected(_)
                | Self::SharedSection(_)
                | Self::DuplicateSection(_)
                | Self::InvalidRelation { .. }
        )
    }
}
