//! norns-context HTTP server binary

use anyhow::Context;
use norns_context::{load_registry, BuiltinCorpus, ContextEngine, CorpusSource, FsCorpus, HttpCorpus, ServiceConfig};

mod server {
    pub use norns_context::server::*;
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    println!("norns-context compiler");
    println!("   Version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    let config = ServiceConfig::from_env().context("invalid configuration")?;

    let mut sources: Vec<Box<dyn CorpusSource>> = Vec::new();
    if let Some(ref dir) = config.corpus_dir {
        println!("✓ Corpus directory: {}", dir.display());
        sources.push(Box::new(FsCorpus::new(dir.clone())));
    }
    if let Some(ref url) = config.corpus_url {
        println!("✓ Corpus manifest URL: {}", url);
        sources.push(Box::new(
            HttpCorpus::new(url.clone()).context("failed to build corpus HTTP client")?,
        ));
    }
    if sources.is_empty() {
        println!("✓ Corpus: built-in ({})", norns_context::catalog::CORPUS_VERSION);
        println!("   (set NORNS_CONTEXT_CORPUS_DIR or NORNS_CONTEXT_CORPUS_URL to override)");
        sources.push(Box::new(BuiltinCorpus));
    }

    // A registry that fails validation must keep the service from starting
    let registry = load_registry(&sources)
        .await
        .context("failed to load document registry")?;
    println!("✓ Registry loaded: {} documents", registry.len());

    let engine = ContextEngine::new(registry);
    println!("✓ Starting HTTP server on {}...", config.addr());
    println!();

    server::run_server(engine, &config.addr(), config.default_budget).await?;

    Ok(())
}
