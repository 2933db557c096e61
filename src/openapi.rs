//! API documentation module.
//!
//! This module provides the documentation options and the OpenAPI generator.
//!
//! # Examples
//!
//! ```rust,no_run
//! use reinhardt_hypermedia::openapi::{DocumentationGenerator, Options};
//! ```

#[cfg(feature = "openapi")]
pub use reinhardt_openapi::*;
