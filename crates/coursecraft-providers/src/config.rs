//! Configuration loading and the provider factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use coursecraft_core::traits::LlmProvider;
use coursecraft_core::tutor::TutorConfig;

use crate::anthropic::AnthropicProvider;
use crate::gemini::GeminiProvider;
use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;

/// Catalog backend used when nothing else is configured.
pub const DEFAULT_CATALOG_URL: &str = "https://cora-backend-l4df.onrender.com";

/// Configuration for a single provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
    Anthropic {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
            ProviderConfig::Anthropic {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Anthropic")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Ollama { base_url } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .finish(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

/// Where the university catalog lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_url")]
    pub base_url: String,
    /// Per-request timeout.
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}
fn default_catalog_timeout() -> u64 {
    30
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_url(),
            timeout_secs: default_catalog_timeout(),
        }
    }
}

/// Top-level coursecraft configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoursecraftConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Default provider to use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Default model to use.
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,
    /// Max tokens per generation request.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_tokens() -> u32 {
    8192
}

impl Default for CoursecraftConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl CoursecraftConfig {
    /// Look up a provider by name, falling back to the default provider.
    pub fn provider(&self, name: Option<&str>) -> Result<(String, &ProviderConfig)> {
        let name = name.unwrap_or(&self.default_provider);
        match self.providers.get(name) {
            Some(config) => Ok((name.to_string(), config)),
            None => anyhow::bail!(
                "provider '{name}' is not configured. Add it to coursecraft.toml or set COURSECRAFT_{}_KEY",
                name.to_uppercase()
            ),
        }
    }

    /// Generation settings, with an optional model override.
    pub fn tutor_config(&self, model: Option<&str>) -> TutorConfig {
        TutorConfig {
            model: model.unwrap_or(&self.default_model).to_string(),
            temperature: self.default_temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are inserted verbatim and never expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    let resolve_opt = |v: &Option<String>| v.as_deref().map(resolve_env_vars);
    match config {
        ProviderConfig::Gemini { api_key, base_url } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: resolve_opt(base_url),
        },
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: resolve_opt(base_url),
            org_id: resolve_opt(org_id),
        },
        ProviderConfig::Anthropic { api_key, base_url } => ProviderConfig::Anthropic {
            api_key: resolve_env_vars(api_key),
            base_url: resolve_opt(base_url),
        },
        ProviderConfig::Ollama { base_url } => ProviderConfig::Ollama {
            base_url: resolve_env_vars(base_url),
        },
    }
}

/// Set the API key of the provider called `name`, creating the entry with
/// `blank` if it is missing.
fn override_key(config: &mut CoursecraftConfig, name: &str, key: String, blank: ProviderConfig) {
    let entry = config.providers.entry(name.to_string()).or_insert(blank);
    match entry {
        ProviderConfig::Gemini { api_key, .. }
        | ProviderConfig::OpenAI { api_key, .. }
        | ProviderConfig::Anthropic { api_key, .. } => *api_key = key,
        ProviderConfig::Ollama { .. } => {
            tracing::warn!(provider = name, "ignoring API key override for an Ollama provider");
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `coursecraft.toml` in the current directory
/// 2. `~/.config/coursecraft/config.toml`
///
/// Environment variable overrides: `COURSECRAFT_GEMINI_KEY`,
/// `COURSECRAFT_OPENAI_KEY`, `COURSECRAFT_ANTHROPIC_KEY`,
/// `COURSECRAFT_CATALOG_URL`.
pub fn load_config() -> Result<CoursecraftConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<CoursecraftConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("coursecraft.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<CoursecraftConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => CoursecraftConfig::default(),
    };
    tracing::debug!(path = ?config_path, "configuration loaded");

    if let Ok(key) = std::env::var("COURSECRAFT_GEMINI_KEY") {
        override_key(
            &mut config,
            "gemini",
            key,
            ProviderConfig::Gemini {
                api_key: String::new(),
                base_url: None,
            },
        );
    }
    if let Ok(key) = std::env::var("COURSECRAFT_OPENAI_KEY") {
        override_key(
            &mut config,
            "openai",
            key,
            ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
            },
        );
    }
    if let Ok(key) = std::env::var("COURSECRAFT_ANTHROPIC_KEY") {
        override_key(
            &mut config,
            "anthropic",
            key,
            ProviderConfig::Anthropic {
                api_key: String::new(),
                base_url: None,
            },
        );
    }
    if let Ok(url) = std::env::var("COURSECRAFT_CATALOG_URL") {
        config.catalog.base_url = url;
    }

    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();
    config.catalog.base_url = resolve_env_vars(&config.catalog.base_url);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("coursecraft"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    let provider: Box<dyn LlmProvider> = match config {
        ProviderConfig::Gemini { api_key, base_url } => {
            Box::new(GeminiProvider::new(api_key, base_url.clone())?)
        }
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => Box::new(OpenAiProvider::new(
            api_key,
            base_url.clone(),
            org_id.clone(),
        )?),
        ProviderConfig::Anthropic { api_key, base_url } => {
            Box::new(AnthropicProvider::new(api_key, base_url.clone())?)
        }
        ProviderConfig::Ollama { base_url } => Box::new(OllamaProvider::new(base_url)?),
    };
    tracing::debug!(name, provider = provider.name(), "provider created");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_COURSECRAFT_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_COURSECRAFT_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_COURSECRAFT_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_COURSECRAFT_TEST_VAR");
    }

    #[test]
    fn substituted_values_are_not_expanded_again() {
        std::env::set_var("_COURSECRAFT_SELF_REF", "${_COURSECRAFT_SELF_REF}");
        std::env::set_var("_COURSECRAFT_OTHER", "x");
        assert_eq!(
            resolve_env_vars("a${_COURSECRAFT_SELF_REF}b${_COURSECRAFT_OTHER}"),
            "a${_COURSECRAFT_SELF_REF}bx"
        );
        assert_eq!(resolve_env_vars("open ${never closed"), "open ${never closed");
        std::env::remove_var("_COURSECRAFT_SELF_REF");
        std::env::remove_var("_COURSECRAFT_OTHER");
    }

    #[test]
    fn default_config() {
        let config = CoursecraftConfig::default();
        assert_eq!(config.default_provider, "gemini");
        assert_eq!(config.default_model, "gemini-2.5-flash");
        assert_eq!(config.catalog.base_url, DEFAULT_CATALOG_URL);
        assert_eq!(config.max_tokens, 8192);
    }

    #[test]
    fn parse_provider_config() {
        let toml_str = r#"
default_provider = "gemini"
default_model = "gemini-2.5-flash"

[providers.gemini]
type = "gemini"
api_key = "g-test"

[providers.openai]
type = "openai"
api_key = "sk-openai"

[providers.local]
type = "ollama"
base_url = "http://localhost:11434"

[catalog]
base_url = "http://catalog.test"
"#;
        let config: CoursecraftConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 3);
        assert!(matches!(
            config.providers.get("gemini"),
            Some(ProviderConfig::Gemini { .. })
        ));
        assert!(matches!(
            config.providers.get("local"),
            Some(ProviderConfig::Ollama { .. })
        ));
        assert_eq!(config.catalog.base_url, "http://catalog.test");
        assert_eq!(config.catalog.timeout_secs, 30);
    }

    #[test]
    fn debug_masks_keys() {
        let config = ProviderConfig::Gemini {
            api_key: "super-secret".into(),
            base_url: None,
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coursecraft.toml");
        std::fs::write(
            &path,
            "default_model = \"gemini-2.5-pro\"\n\n[providers.gemini]\ntype = \"gemini\"\napi_key = \"k\"\n",
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_model, "gemini-2.5-pro");
        let (name, provider) = config.provider(None).unwrap();
        assert_eq!(name, "gemini");
        assert!(matches!(provider, ProviderConfig::Gemini { .. }));
        assert_eq!(config.tutor_config(Some("x")).model, "x");
    }

    #[test]
    fn missing_path_is_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/coursecraft.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn unconfigured_provider_names_the_env_var() {
        let err = CoursecraftConfig::default().provider(Some("openai")).unwrap_err();
        assert!(err.to_string().contains("COURSECRAFT_OPENAI_KEY"));
    }

    #[test]
    fn create_each_provider_kind() {
        let configs = [
            ProviderConfig::Gemini {
                api_key: "k".into(),
                base_url: None,
            },
            ProviderConfig::OpenAI {
                api_key: "k".into(),
                base_url: None,
                org_id: None,
            },
            ProviderConfig::Anthropic {
                api_key: "k".into(),
                base_url: None,
            },
            ProviderConfig::Ollama {
                base_url: default_ollama_url(),
            },
        ];
        let names: Vec<String> = configs
            .iter()
            .map(|c| create_provider("p", c).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["gemini", "openai", "anthropic", "ollama"]);
    }
}
