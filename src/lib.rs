//! Txt Dashboard - Message History Analytics
//!
//! A Rust dashboard over a fixed export of text-message history between two
//! people. The export is loaded once at startup into an immutable table;
//! every aggregate (volume over time, word frequency, emoji frequency,
//! n-grams, length distributions) is a pure re-derivation over that table,
//! served to a single web page with a few interactive controls.
//!
//! # Features
//!
//! - CSV ingestion with timestamp parsing and quoted-reply stripping
//! - Daily/hourly volume aggregation with exponential smoothing
//! - Word, emoji and n-gram frequency tables with stop-word filtering
//! - Periodic random-message and random-photo panels

/// Configuration management
pub mod config;
/// Emoji frequency aggregation
pub mod emoji;
/// Error types
pub mod error;
/// Message export ingestion and normalization
pub mod ingest;
/// Word frequency and message-length aggregation
pub mod lexical;
/// Logging setup and utilities
pub mod logging;
/// Data models and API row types
pub mod models;
/// N-gram frequency aggregation
pub mod ngram;
/// Random sampling for the periodic panels
pub mod sampler;
/// The web surface
pub mod server;
/// Scalar statistics
pub mod stats;
/// Volume-over-time aggregation
pub mod volume;

// Re-export key components for easier access
pub use error::{DashboardError, Result};
pub use ingest::MessageTable;
pub use models::{Message, Party};
