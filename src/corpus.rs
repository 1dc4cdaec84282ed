//! Corpus sources feeding the document registry
//!
//! Loading is the only I/O in the crate. It runs once at startup; the
//! resulting registry is immutable and shared by every request.

use crate::catalog;
use crate::error::CorpusError;
use crate::registry::{DocumentRegistry, SharedRegistry};
use crate::types::{Category, Document};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Trait for pluggable corpus sources
#[async_trait]
pub trait CorpusSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn load(&self) -> Result<Vec<Document>, CorpusError>;
}

/// JSON manifest shared by the filesystem and HTTP sources
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub version: Option<String>,
    pub documents: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    pub category: String,
    pub priority_tier: u8,
    #[serde(default)]
    pub size_estimate: Option<usize>,
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default)]
    pub conflicts: Vec<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ManifestEntry {
    /// Build a document once its content is known
    pub fn into_document(self, content: String) -> Result<Document, CorpusError> {
        let category = Category::parse(&self.category).ok_or_else(|| CorpusError::UnknownCategory {
            id: self.id.clone(),
            category: self.category.clone(),
        })?;
        let size_estimate = self
            .size_estimate
            .unwrap_or_else(|| estimate_size(&content));

        Ok(Document {
            id: self.id,
            category,
            size_estimate,
            requires: self.requires,
            conflicts: self.conflicts,
            priority_tier: self.priority_tier,
            content,
        })
    }
}

/// Rough token estimate for undeclared sizes
pub fn estimate_size(content: &str) -> usize {
    (content.len() / 4).max(1)
}

pub fn parse_manifest(raw: &str, origin: &str) -> Result<Manifest, CorpusError> {
    serde_json::from_str(raw).map_err(|source| CorpusError::Manifest {
        path: origin.to_string(),
        source,
    })
}

/// The compiled-in corpus
pub struct BuiltinCorpus;

#[async_trait]
impl CorpusSource for BuiltinCorpus {
    fn name(&self) -> &'static str {
        "builtin"
    }

    async fn load(&self) -> Result<Vec<Document>, CorpusError> {
        Ok(catalog::builtin_documents())
    }
}

/// Corpus on disk: `manifest.json` plus markdown files relative to it
pub struct FsCorpus {
    root: PathBuf,
}

impl FsCorpus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("manifest.json")
    }

    async fn read(path: &Path) -> Result<String, CorpusError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CorpusError::Io {
                path: path.display().to_string(),
                source,
            })
    }
}

#[async_trait]
impl CorpusSource for FsCorpus {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    async fn load(&self) -> Result<Vec<Document>, CorpusError> {
        let manifest_path = self.manifest_path();
        let raw = Self::read(&manifest_path).await?;
        let manifest = parse_manifest(&raw, &manifest_path.display().to_string())?;

        if let Some(ref version) = manifest.version {
            info!("Loading corpus {} from {}", version, self.root.display());
        }

        // Read document bodies concurrently
        let reads = manifest.documents.into_iter().map(|entry| async move {
            let content = match (&entry.content, &entry.path) {
                (Some(inline), _) => inline.clone(),
                (None, Some(rel)) => Self::read(&self.root.join(rel)).await?,
                (None, None) => return Err(CorpusError::MissingContent(entry.id.clone())),
            };
            entry.into_document(content)
        });

        futures::future::join_all(reads).await.into_iter().collect()
    }
}

/// Load every source concurrently and build one validated registry.
///
/// Sources are concatenated in the given order; an id present in two
/// sources is a duplicate and fails construction.
pub async fn load_registry(sources: &[Box<dyn CorpusSource>]) -> Result<SharedRegistry, CorpusError> {
    let loads = sources.iter().map(|source| async move {
        let docs = source.load().await;
        (source.name(), docs)
    });

    let mut documents = Vec::new();
    for (name, result) in futures::future::join_all(loads).await {
        let docs = result?;
        if docs.is_empty() {
            warn!("Corpus source '{}' returned no documents", name);
        }
        info!("Corpus source '{}' provided {} documents", name, docs.len());
        documents.extend(docs);
    }

    let registry = DocumentRegistry::new(documents)?;
    Ok(registry.shared())
}
