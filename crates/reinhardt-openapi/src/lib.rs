//! # reinhardt-openapi
//!
//! API documentation options and OpenAPI 3 document generation for Reinhardt
//! hypermedia APIs.
//!
//! ## Features
//!
//! - **Options**: immutable documentation settings (title, OAuth, API keys,
//!   contact, license), built in code or loaded from TOML
//! - **Security Schemes**: OAuth 2.0 flows and API keys rendered as OpenAPI
//!   security schemes with global requirements
//! - **Default Responses**: per operation kind, merged with declared ones
//! - **Swagger UI**: authorization settings for the UI
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use reinhardt_openapi::{DocumentationGenerator, OAuthFlow, Options};
//!
//! let options = Options::builder()
//!     .title("Library API")
//!     .version("1.0.0")
//!     .oauth_enabled(true)
//!     .oauth_flow(OAuthFlow::Password)
//!     .build();
//!
//! let document = DocumentationGenerator::new(Arc::new(options)).generate().unwrap();
//! assert_eq!(document.info.title, "Library API");
//! assert!(document.components.unwrap().security_schemes.contains_key("oauth"));
//! ```

pub mod error;
pub mod generator;
pub mod options;

// Re-export commonly used types
pub use error::{OpenApiError, OpenApiResult};
pub use generator::{DocumentationGenerator, OAUTH_SCHEME, OperationKind};
pub use options::{ApiKeyDefinition, ApiKeyLocation, OAuthFlow, Options, OptionsBuilder};
