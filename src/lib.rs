//! pokefusion - Pokemon fusion battle service
//!
//! Fetches parent Pokemon from the PokeAPI catalog, asks a generative
//! model to breed a fusion child per parent pair, and asks a second model
//! to judge a hypothetical battle between the two children. The library
//! crates carry the pipeline; this crate adds the HTTP surface and
//! process startup.
//!
//! # Layout
//!
//! - `pokefusion-utils` - shared types, error taxonomy, retry executor
//! - `pokefusion-config` - file plus environment configuration
//! - `pokefusion-schema` - declarative validation of generative output
//! - `pokefusion-catalog` - PokeAPI client and raw-to-domain transforms
//! - `pokefusion-matchups` - type-effectiveness engine
//! - `pokefusion-llm` - OpenRouter backend and typed clients
//! - `pokefusion-engine` - the three-stage battle orchestrator
//! - [`api`] - axum routes over the assembled pipeline

pub mod api;

pub use api::{router, AppState};
