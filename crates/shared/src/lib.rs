//! Shared types and configuration for Procura.
//!
//! This crate provides common types used across all other crates:
//! - Money rounding and currency labels with decimal precision
//! - Typed IDs for type-safe entity references
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
