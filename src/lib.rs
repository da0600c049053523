//! hacfg: transactional HAProxy configuration editing
//!
//! A library for parsing HAProxy configuration files into typed,
//! round-trip-safe documents and editing them through version-checked
//! transactions with automatic backups.

pub mod client;
pub mod config;
pub mod directive;
pub mod document;
pub mod tokenizer;
pub mod transaction;
