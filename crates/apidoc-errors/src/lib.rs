//! Error response injection for generated API description documents.
//!
//! Annotation-driven generators (swagger-php and friends) rarely document the
//! error responses an endpoint can return. This crate fills the gap: it merges
//! a per-method list of expected error codes with the codes the generator
//! discovered (`x-errors`), adds the missing responses and registers one
//! `Error<code>` schema per code.
//!
//! # Example
//!
//! ```ignore
//! use apidoc_errors::{ApiConfig, DocumentFormat};
//!
//! let config = ApiConfig::new("public", ["src/Controller"], "src/OpenApi.php", "openapi.json")
//!     .with_error_codes("get", [404])
//!     .with_error_codes("post", [400, 422]);
//!
//! let document = DocumentFormat::OpenApiV3.inject(document, &config)?;
//! ```
//!
//! To run the external generator as well, see [`Generator`].

mod catalog;
mod config;
mod error;
mod format;
mod generate;
mod project;

pub use catalog::{description_for, response_schema_for};
pub use config::ApiConfig;
pub use error::Error;
pub use format::{DISCOVERED_ERRORS_KEY, DocumentFormat, schema_name};
pub use generate::{Generator, read_document, write_document};
pub use project::ProjectConfig;

/// Result type for apidoc-errors operations.
pub type Result<T> = std::result::Result<T, Error>;
