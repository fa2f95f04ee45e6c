#![deny(missing_docs)]

//! Core library for the Ragdesk document client.

/// Document service contract and HTTP client.
pub mod backend;
/// Command-line interface.
pub mod cli;
/// Environment-driven configuration management.
pub mod config;
/// Selection-driven controller for uploads, summaries, chat, and deletion.
pub mod controller;
/// Structured logging and tracing setup.
pub mod logging;
/// Session activity counters.
pub mod metrics;
