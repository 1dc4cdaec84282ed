//! Error taxonomy for the compilation pipeline

use crate::types::{Category, ClarificationRequest};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Registry construction failures; fatal at startup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate document id '{0}'")]
    DuplicateId(String),

    #[error("document '{from}' {field} unknown document '{missing}'")]
    DanglingReference {
        from: String,
        field: &'static str,
        missing: String,
    },

    #[error("document '{0}' declares a conflict with itself")]
    SelfConflict(String),

    #[error("cyclic dependency: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    #[error("invalid document id '{0}': must be non-empty without whitespace or '>'")]
    InvalidId(String),

    #[error("document '{id}' content line {line} begins with a section marker")]
    MarkerInContent { id: String, line: usize },

    #[error("tier-0 document '{id}' requires '{requires}' at tier {tier}")]
    TierInversion {
        id: String,
        requires: String,
        tier: u8,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictingDocument {
    pub id: String,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("documents '{}' and '{}' are mutually exclusive", .0.id, .1.id)]
    Conflict(ConflictingDocument, ConflictingDocument),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    #[error("needs clarification: {}", .0.reason)]
    NeedsClarification(ClarificationRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("packed document '{0}' is not in the registry")]
    UnknownDocument(String),

    #[error("malformed section marker: {0}")]
    MalformedMarker(String),

    #[error("bundle text does not start with a section marker")]
    MissingLeadingMarker,
}

/// Terminal outcome of a request that produced no bundle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}

/// Failures while reading a corpus source
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest {path}: {source}")]
    Manifest {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("manifest entry '{0}' has neither content nor path")]
    MissingContent(String),

    #[error("unknown category '{category}' for document '{id}'")]
    UnknownCategory { id: String, category: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
