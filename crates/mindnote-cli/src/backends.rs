//! Backend construction from configuration and environment.

use anyhow::Context;
use mindnote_advice::{AdviceEngine, DiaryAdvisor};
use mindnote_core::config::{Config, StoreBackend, StoreConfig};
use mindnote_core::env::{self, vars};
use mindnote_core::paths;
use mindnote_memory::{
    AstraVectorStore, EmbeddingProvider, FileVectorStore, MemoryVectorStore, OpenAIEmbeddings,
    VectorStore,
};
use mindnote_providers::{LanguageModelClient, OpenAIChatClient};
use std::sync::Arc;
use tracing::debug;

/// Build the reference store selected by `store.backend`.
pub fn build_store(store: &StoreConfig) -> anyhow::Result<Arc<dyn VectorStore>> {
    match store.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryVectorStore::new())),
        StoreBackend::File => {
            let path = match &store.path {
                Some(path) => path.clone(),
                None => paths::reference_store_file()?,
            };
            debug!(path = %path.display(), "opening reference file");
            let store = FileVectorStore::new(path.clone())
                .with_context(|| format!("Failed to open reference file {}", path.display()))?;
            Ok(Arc::new(store))
        }
        StoreBackend::Astra => {
            let endpoint = match &store.endpoint {
                Some(endpoint) => endpoint.clone(),
                None => env::require_var(vars::ASTRA_DB_ENDPOINT)?,
            };
            let token = env::require_var(vars::ASTRA_DB_APPLICATION_TOKEN)?;
            let keyspace = env::get_var_or(vars::ASTRA_DB_KEYSPACE, &store.keyspace);
            debug!(%endpoint, %keyspace, collection = %store.collection, "connecting to Astra");
            let store = AstraVectorStore::new(endpoint, token, keyspace, store.collection.clone())?;
            Ok(Arc::new(store))
        }
    }
}

/// Build the embedding provider.
pub fn build_embeddings(config: &Config, api_key: &str) -> anyhow::Result<Arc<dyn EmbeddingProvider>> {
    let mut embeddings = OpenAIEmbeddings::new(api_key)?
        .with_model(config.embeddings.model.clone())
        .with_dimensions(config.embeddings.dimensions);
    if let Some(url) = &config.embeddings.base_url {
        embeddings = embeddings.with_base_url(url.clone());
    }
    Ok(Arc::new(embeddings))
}

/// Build the language model client.
pub fn build_llm(config: &Config, api_key: &str) -> anyhow::Result<Arc<dyn LanguageModelClient>> {
    let mut llm = OpenAIChatClient::new(api_key)?
        .with_model(config.llm.model.clone())
        .with_max_completion_tokens(config.llm.max_completion_tokens);
    if let Some(url) = &config.llm.base_url {
        llm = llm.with_base_url(url.clone());
    }
    Ok(Arc::new(llm))
}

/// Build a [`DiaryAdvisor`] wired to the configured backends.
pub fn build_advisor(config: &Config) -> anyhow::Result<DiaryAdvisor> {
    let api_key = env::require_var(vars::OPENAI_API_KEY)?;

    let store = build_store(&config.store)?;
    let embeddings = build_embeddings(config, &api_key)?;
    let llm = build_llm(config, &api_key)?;

    let engine = AdviceEngine::new(store, embeddings, llm, config.advice.clone());
    Ok(DiaryAdvisor::new(engine, config.gate.clone()))
}
