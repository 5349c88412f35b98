//! The `coursecraft list-models` command.

use std::path::PathBuf;

use anyhow::Result;

use coursecraft_providers::ollama::OllamaProvider;
use coursecraft_providers::{create_provider, load_config_from, ProviderConfig};

use crate::render;

pub async fn execute(provider_filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut names: Vec<&String> = config.providers.keys().collect();
    names.sort();

    let mut found_any = false;
    for name in names {
        if provider_filter.as_ref().is_some_and(|filter| filter != name) {
            continue;
        }
        let provider_config = &config.providers[name];

        // Ollama knows its models only at runtime.
        let models = match provider_config {
            ProviderConfig::Ollama { base_url } => {
                match OllamaProvider::new(base_url)?.list_models_async().await {
                    Ok(models) => models,
                    Err(e) => {
                        eprintln!("{name}: {e:#}");
                        continue;
                    }
                }
            }
            _ => create_provider(name, provider_config)?.available_models(),
        };

        if !models.is_empty() {
            found_any = true;
            println!("{}", render::models_table(name, &models));
            println!();
        }
    }

    if !found_any {
        println!("No providers configured. Run `coursecraft init` to create a config file.");
    }

    Ok(())
}
