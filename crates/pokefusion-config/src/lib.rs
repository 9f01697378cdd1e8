//! Configuration model for the pokefusion service
//!
//! Settings come from an optional `pokefusion.toml` in the working
//! directory with environment variables taking precedence. The two
//! logical model identifiers are required; everything else has a default.
//! The OpenRouter API key itself is never stored here, only the name of
//! the environment variable that holds it.

use pokefusion_utils::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// Default catalog service base URL.
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Default OpenRouter chat-completions endpoint.
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default environment variable holding the OpenRouter API key.
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Default HTTP listen port.
pub const DEFAULT_PORT: u16 = 3001;

/// Effective configuration after file parsing and env overrides.
#[derive(Debug, Clone)]
pub struct Config {
    pub models: ModelsConfig,
    pub catalog: CatalogConfig,
    pub openrouter: OpenRouterConfig,
    pub server: ServerConfig,
}

/// The two logical generative models. Distinct identifiers; the pipeline
/// never interchanges them.
#[derive(Debug, Clone)]
pub struct ModelsConfig {
    /// Model used to synthesize fusion children.
    pub generator: String,
    /// Model used to judge battles.
    pub judge: String,
}

/// Catalog service addressing.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
}

/// Generative service addressing and credential lookup.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

/// HTTP surface settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// On-disk shape of `pokefusion.toml`. Everything optional; the merge in
/// [`Config::load`] fills defaults and applies env overrides.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    models: FileModels,
    #[serde(default)]
    catalog: FileCatalog,
    #[serde(default)]
    openrouter: FileOpenRouter,
    #[serde(default)]
    server: FileServer,
}

#[derive(Debug, Default, Deserialize)]
struct FileModels {
    generator: Option<String>,
    judge: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileCatalog {
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileOpenRouter {
    base_url: Option<String>,
    api_key_env: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileServer {
    port: Option<u16>,
}

impl Config {
    /// Load configuration: `pokefusion.toml` in the working directory if
    /// present, then environment overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the file is malformed, a value does not
    /// parse, or a required model identifier is missing.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match std::fs::read_to_string("pokefusion.toml") {
            Ok(contents) => parse_file(&contents)?,
            Err(_) => FileConfig::default(),
        };
        Self::from_parts(file)
    }

    /// Load configuration from an explicit file path plus env overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` as [`Config::load`] does, plus when the file
    /// cannot be read.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::InvalidFile(format!("{}: {e}", path.display())))?;
        Self::from_parts(parse_file(&contents)?)
    }

    fn from_parts(file: FileConfig) -> Result<Self, ConfigError> {
        let generator = env_or("GENERATOR_MODEL", file.models.generator)
            .ok_or_else(|| ConfigError::MissingRequired("GENERATOR_MODEL".to_string()))?;
        let judge = env_or("JUDGE_MODEL", file.models.judge)
            .ok_or_else(|| ConfigError::MissingRequired("JUDGE_MODEL".to_string()))?;

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                value: raw,
            })?,
            Err(_) => file.server.port.unwrap_or(DEFAULT_PORT),
        };

        Ok(Self {
            models: ModelsConfig { generator, judge },
            catalog: CatalogConfig {
                base_url: env_or("POKEAPI_BASE_URL", file.catalog.base_url)
                    .unwrap_or_else(|| DEFAULT_CATALOG_BASE_URL.to_string()),
            },
            openrouter: OpenRouterConfig {
                base_url: env_or("OPENROUTER_BASE_URL", file.openrouter.base_url)
                    .unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.to_string()),
                api_key_env: file
                    .openrouter
                    .api_key_env
                    .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string()),
            },
            server: ServerConfig { port },
        })
    }

    /// Fixed configuration for tests; no file or environment access.
    #[must_use]
    pub fn minimal_for_testing() -> Self {
        Self {
            models: ModelsConfig {
                generator: "test/generator-model".to_string(),
                judge: "test/judge-model".to_string(),
            },
            catalog: CatalogConfig {
                base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            },
            openrouter: OpenRouterConfig {
                base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
                api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            },
            server: ServerConfig { port: DEFAULT_PORT },
        }
    }
}

fn parse_file(contents: &str) -> Result<FileConfig, ConfigError> {
    toml::from_str(contents).map_err(|e| ConfigError::InvalidFile(e.to_string()))
}

fn env_or(key: &str, fallback: Option<String>) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty()).or(fallback)
}
