//! Foundation utilities for the pokefusion battle service
//!
//! This crate holds the pieces every other crate depends on: the error
//! taxonomy, the generic retry executor, tracing initialization, and the
//! shared domain types (type tags, parent records, fusion children,
//! battle judgments, and the request/response wrappers).

pub mod error;
pub mod logging;
pub mod retry;
pub mod types;
