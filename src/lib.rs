//! norns-context - context compiler for a norns scripting assistant
//!
//! Decides which prompt documents to load for a request, in what order,
//! within a size budget:
//! - Signal extraction from request text and explicit flags
//! - Rule-table classification into a task plan
//! - Dependency-closed, conflict-checked resolution against the corpus
//! - Tiered budget packing and bundle assembly

pub mod types;
pub mod error;
pub mod registry;
pub mod catalog;
pub mod corpus;
pub mod http_corpus;
pub mod signals;
pub mod classifier;
pub mod resolver;
pub mod packing;
pub mod assembler;
pub mod context_engine;
pub mod config;
pub mod server;

pub use types::*;
pub use error::{AssemblyError, ClassificationError, CorpusError, PipelineError, RegistryError, ResolutionError};
pub use registry::{DocumentRegistry, SharedRegistry};
pub use corpus::{load_registry, BuiltinCorpus, CorpusSource, FsCorpus};
pub use http_corpus::HttpCorpus;
pub use signals::extract;
pub use classifier::classify;
pub use resolver::resolve;
pub use packing::pack;
pub use assembler::{assemble, split_bundle};
pub use context_engine::{ContextEngine, SharedContextEngine};
pub use config::ServiceConfig;
