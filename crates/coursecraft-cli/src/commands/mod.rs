pub mod assist;
pub mod catalog;
pub mod generate;
pub mod init;
pub mod learn;
pub mod list_models;
pub mod play;
pub mod validate;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use coursecraft_catalog::HttpCatalog;
use coursecraft_core::tutor::Tutor;
use coursecraft_providers::{create_provider, CoursecraftConfig};

/// Build a tutor for the named (or default) provider.
pub fn build_tutor(
    config: &CoursecraftConfig,
    provider: Option<&str>,
    model: Option<&str>,
) -> Result<Tutor> {
    let (name, provider_config) = config.provider(provider)?;
    let provider = create_provider(&name, provider_config)?;
    Ok(Tutor::new(Arc::from(provider), config.tutor_config(model)))
}

pub fn build_catalog(config: &CoursecraftConfig) -> Result<HttpCatalog> {
    HttpCatalog::new(
        &config.catalog.base_url,
        Duration::from_secs(config.catalog.timeout_secs),
    )
}

/// Source text from `--input` or `--text`, if either was given.
pub fn read_source(input: Option<&Path>, text: Option<String>) -> Result<Option<String>> {
    match (input, text) {
        (Some(path), _) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))
            .map(Some),
        (None, text) => Ok(text),
    }
}

pub fn write_json(path: &Path, value: &impl serde::Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
