//! # Reinhardt Hypermedia
//!
//! HAL hypermedia serialization and API documentation for Reinhardt.
//!
//! ## Features
//!
//! - **HAL Normalization**: resources rendered as `_links` / `_embedded` / state
//!   documents, with a shared relation cache and circular reference detection
//! - **API Documentation**: immutable documentation options and an OpenAPI 3
//!   document generator with OAuth 2.0 and API key security schemes
//!
//! ## Feature Flags
//!
//! - `hal` - HAL normalizer (`reinhardt-hal`)
//! - `openapi` - documentation options and generator (`reinhardt-openapi`)
//! - `full` (default) - both of the above
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use reinhardt_hypermedia::openapi::{DocumentationGenerator, Options};
//!
//! let options = Options::builder().title("Library API").version("1.0.0").build();
//! let json = DocumentationGenerator::new(Arc::new(options)).to_json().unwrap();
//! println!("{}", json);
//! ```

#[cfg(feature = "hal")]
pub mod hal;
#[cfg(feature = "openapi")]
pub mod openapi;

// Re-export the entry points
#[cfg(feature = "hal")]
pub use reinhardt_hal::{
	HalError, HalResult, HalSerializer, HalSettings, InMemoryResourceRegistry, ItemNormalizer,
	NormalizationContext, ResourceDefinition,
};

#[cfg(feature = "openapi")]
pub use reinhardt_openapi::{DocumentationGenerator, OpenApiError, OpenApiResult, Options};
