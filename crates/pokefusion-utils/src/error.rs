//! Error taxonomy for the fusion battle pipeline
//!
//! One enum per concern, all convertible into the library-level
//! [`FusionError`]. Catalog failures are fatal immediately; generative
//! failures are retried inside the generative client and only the
//! exhausted error crosses into the orchestrator, stage-tagged as a
//! [`BattleError`].

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// A single field violation found during schema validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path to the offending field, e.g. `stats.specialAttack`.
    pub path: String,
    /// Human-readable reason.
    pub reason: String,
}

impl Violation {
    #[must_use]
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// Aggregated schema validation failure.
///
/// Carries every violation found, formatted as `<path>: <reason>` and
/// joined by `", "` so one message names every problem field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct SchemaError {
    pub violations: Vec<Violation>,
}

impl SchemaError {
    #[must_use]
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// All violations joined as `path: reason, path: reason`.
    #[must_use]
    pub fn joined(&self) -> String {
        self.violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: {}", self.joined())
    }
}

/// Catalog service failures. All fatal for the fetch that raised them.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Non-2xx response from the catalog.
    #[error("failed to fetch {resource}: {status}")]
    Status { resource: String, status: String },

    /// The fetch exceeded its timeout and was aborted.
    #[error("fetch of {resource} timed out after {duration:?}")]
    Timeout { resource: String, duration: Duration },

    /// Network-level failure.
    #[error("catalog transport error for {resource}: {message}")]
    Transport { resource: String, message: String },

    /// The response body was not the expected JSON shape.
    #[error("failed to decode {resource}: {message}")]
    Decode { resource: String, message: String },
}

/// Generative service failures.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network-level failure or unexpected response envelope.
    #[error("generative transport error: {0}")]
    Transport(String),

    /// The call exceeded its timeout.
    #[error("generative call timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// The reply carried no textual content.
    #[error("no content in generative reply")]
    NoContent,

    /// The reply text did not parse as JSON.
    #[error("generative reply is not valid JSON: {0}")]
    MalformedJson(String),

    /// The reply parsed but violated the expected schema.
    #[error("generative reply failed validation: {0}")]
    InvalidResponse(#[from] SchemaError),

    /// Missing API key, bad endpoint, or other setup problem.
    #[error("generative client misconfigured: {0}")]
    Misconfiguration(String),
}

/// Configuration errors raised at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    MissingRequired(String),

    #[error("invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("invalid configuration file: {0}")]
    InvalidFile(String),
}

/// Library-level error covering every pipeline concern.
#[derive(Debug, Error)]
pub enum FusionError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("generative error: {0}")]
    Llm(#[from] LlmError),

    #[error("validation error: {0}")]
    Schema(#[from] SchemaError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// The pipeline stage a battle failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleStage {
    FetchParents,
    Generation,
    Judgment,
}

impl fmt::Display for BattleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleStage::FetchParents => f.write_str("parent fetch"),
            BattleStage::Generation => f.write_str("child generation"),
            BattleStage::Judgment => f.write_str("battle judgment"),
        }
    }
}

/// Single orchestration-level failure identifying which stage failed.
///
/// Retry counts and per-attempt errors stay inside the generative client;
/// only the final error reaches this wrapper.
#[derive(Debug, Error)]
#[error("battle pipeline failed during {stage}: {source}")]
pub struct BattleError {
    pub stage: BattleStage,
    #[source]
    pub source: FusionError,
}

impl BattleError {
    #[must_use]
    pub fn new(stage: BattleStage, source: impl Into<FusionError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}
