//! Core types, configuration, and error handling for treesim.
//!
//! This crate provides the shared foundation used by the other treesim crates:
//! - [`TreesimError`] — unified error type using `thiserror` and `miette`
//! - [`TreesimConfig`] — configuration loaded from `.treesim.toml`
//! - Shared types: [`Language`], [`Method`], [`OutputFormat`],
//!   [`ComparisonResult`], [`FileStatus`], [`Notice`]

mod config;
mod error;
mod types;

pub use config::{FilterConfig, TreesimConfig, WalkConfig};
pub use error::TreesimError;
pub use types::{ComparisonResult, FileStatus, Language, Method, Notice, OutputFormat};

/// A convenience `Result` type for treesim operations.
pub type Result<T> = std::result::Result<T, TreesimError>;
