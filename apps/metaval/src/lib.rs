//! # metaval
//!
//! Application layer of the Metaval dashboard: CLI, interactive shell,
//! configuration, logging-backed notifications and the random assistant.
//!
//! All dashboard state and transitions live in `metaval-core`.

pub mod assistant;
pub mod cli;
pub mod config;
pub mod notify;
