//! Quiz configuration and provider factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use algequiz_core::traits::TutorProvider;

use crate::ollama::OllamaTutor;
use crate::openai::OpenAiTutor;

/// Configuration for a single tutor endpoint.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        api_key: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAI { base_url, api_key } => f
                .debug_struct("OpenAI")
                .field("base_url", base_url)
                .field("api_key", &api_key.as_ref().map(|_| "***"))
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

/// Top-level algequiz configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Tutor endpoint configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Default provider to use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Default model to use.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Sampling temperature for feedback requests.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Output-length cap for feedback requests.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Number of questions drawn per session.
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    /// Path to the question bank file.
    #[serde(default = "default_question_file")]
    pub question_file: PathBuf,
}

fn default_provider() -> String {
    "lmstudio".to_string()
}
fn default_model() -> String {
    "qwen3-30b-a3b".to_string()
}
fn default_temperature() -> f64 {
    0.5
}
fn default_max_tokens() -> u32 {
    768
}
fn default_timeout() -> u64 {
    60
}
fn default_question_count() -> usize {
    2
}
fn default_question_file() -> PathBuf {
    PathBuf::from("questions.json")
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout(),
            question_count: default_question_count(),
            question_file: default_question_file(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAI { base_url, api_key } => ProviderConfig::OpenAI {
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            api_key: api_key.as_ref().map(|k| resolve_env_vars(k)),
        },
        ProviderConfig::Ollama { base_url } => ProviderConfig::Ollama {
            base_url: resolve_env_vars(base_url),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quiz.toml` in the current directory
/// 2. `~/.config/algequiz/config.toml`
///
/// Environment variable override: `ALGEQUIZ_API_KEY`.
pub fn load_config() -> Result<QuizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quiz.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizConfig::default(),
    };

    // Apply env var override for the default OpenAI-compatible endpoint
    if let Ok(key) = std::env::var("ALGEQUIZ_API_KEY") {
        let name = config.default_provider.clone();
        config
            .providers
            .entry(name.clone())
            .or_insert(ProviderConfig::OpenAI {
                base_url: None,
                api_key: None,
            });
        if let Some(ProviderConfig::OpenAI { api_key, .. }) = config.providers.get_mut(&name) {
            *api_key = Some(key);
        }
    }

    // Resolve env vars in all provider configs
    let resolved: HashMap<String, ProviderConfig> = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();
    config.providers = resolved;

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("algequiz"))
}

/// Create a tutor provider instance from its configuration.
pub fn create_provider(
    config: &ProviderConfig,
    timeout: Duration,
) -> Result<Box<dyn TutorProvider>> {
    match config {
        ProviderConfig::OpenAI { base_url, api_key } => Ok(Box::new(OpenAiTutor::with_timeout(
            base_url.clone(),
            api_key.clone(),
            timeout,
        ))),
        ProviderConfig::Ollama { base_url } => {
            Ok(Box::new(OllamaTutor::with_timeout(base_url, timeout)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_ALGEQUIZ_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_ALGEQUIZ_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_ALGEQUIZ_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_ALGEQUIZ_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = QuizConfig::default();
        assert_eq!(config.default_provider, "lmstudio");
        assert_eq!(config.default_model, "qwen3-30b-a3b");
        assert_eq!(config.temperature, 0.5);
        assert_eq!(config.max_tokens, 768);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.question_count, 2);
    }

    #[test]
    fn parse_provider_config() {
        let toml_str = r#"
default_provider = "lmstudio"
default_model = "qwen3-30b-a3b"
question_count = 2

[providers.lmstudio]
type = "openai"
base_url = "http://localhost:1234"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"
"#;
        let config: QuizConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 2);
        assert!(matches!(
            config.providers.get("lmstudio"),
            Some(ProviderConfig::OpenAI { .. })
        ));
        assert!(matches!(
            config.providers.get("ollama"),
            Some(ProviderConfig::Ollama { .. })
        ));
    }

    #[test]
    fn load_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiz.toml");
        std::fs::write(
            &path,
            r#"
default_model = "custom-model"
question_count = 4

[providers.lmstudio]
type = "openai"
base_url = "http://localhost:9999"
"#,
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_model, "custom-model");
        assert_eq!(config.question_count, 4);
    }

    #[test]
    fn load_missing_explicit_config_fails() {
        let result = load_config_from(Some(Path::new("no-such-config.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn api_key_is_masked_in_debug() {
        let config = ProviderConfig::OpenAI {
            base_url: None,
            api_key: Some("sk-secret".into()),
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("***"));
    }
}
