//! HTTP corpus source: fetches a manifest with inline content from a corpus service

use crate::corpus::{parse_manifest, CorpusSource};
use crate::error::CorpusError;
use crate::types::Document;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

/// Corpus served as a single JSON manifest whose entries carry `content`
pub struct HttpCorpus {
    manifest_url: String,
    client: reqwest::Client,
}

impl HttpCorpus {
    /// Create new HTTP corpus source
    pub fn new(manifest_url: String) -> Result<Self, CorpusError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| io_error(&manifest_url, e))?;
        Ok(Self {
            manifest_url,
            client,
        })
    }

    fn io_error(&self, err: reqwest::Error) -> CorpusError {
        io_error(&self.manifest_url, err)
    }
}

#[async_trait]
impl CorpusSource for HttpCorpus {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn load(&self) -> Result<Vec<Document>, CorpusError> {
        debug!("Fetching corpus manifest from {}", self.manifest_url);

        let response = self
            .client
            .get(&self.manifest_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.io_error(e))?;
        let body = response.text().await.map_err(|e| self.io_error(e))?;

        let manifest = parse_manifest(&body, &self.manifest_url)?;
        info!(
            "Fetched corpus {} ({} documents)",
            manifest.version.as_deref().unwrap_or("unversioned"),
            manifest.documents.len()
        );

        // Remote manifests cannot point at local files
        manifest
            .documents
            .into_iter()
            .map(|entry| match entry.content.clone() {
                Some(content) => entry.into_document(content),
                None => Err(CorpusError::MissingContent(entry.id)),
            })
            .collect()
    }
}

fn io_error(url: &str, err: reqwest::Error) -> CorpusError {
    CorpusError::Io {
        path: url.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::Other, err),
    }
}
