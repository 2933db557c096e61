//! # reinhardt-hal
//!
//! HAL (Hypertext Application Language) normalization for Reinhardt resource
//! graphs.
//!
//! Resources are turned into documents carrying a `_links` section (a self
//! link plus one entry per relation), an optional `_embedded` section holding
//! the nested documents of relations declared as readable links, and the
//! plain attributes of the resource.
//!
//! ## Features
//!
//! - **Relation Classification**: union-aware detection of to-one and
//!   to-many relations from declared attribute types
//! - **Component Cache**: per class and context memo of the states, links
//!   and embedded groupings, shared across threads
//! - **Recursion Guards**: circular reference detection with a pluggable
//!   handler, and per-attribute maximum depth
//! - **In-memory Registry**: ready-made resource collaborators for
//!   applications and tests
//!
//! ## Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use reinhardt_hal::{ItemNormalizer, NormalizationContext};
//! use reinhardt_hal::metadata::PropertyMetadata;
//! use reinhardt_hal::registry::{InMemoryResourceRegistry, ResourceDefinition};
//! use reinhardt_hal::resource::{AttributeValue, ResourceObject};
//! use reinhardt_hal::types::{Type, TypeDescriptor};
//! use serde_json::json;
//!
//! let registry = Arc::new(
//!     InMemoryResourceRegistry::new()
//!         .register(
//!             ResourceDefinition::new("Book", "/books/{id}")
//!                 .with_property("title", PropertyMetadata::default())
//!                 .with_property(
//!                     "author",
//!                     PropertyMetadata::new(TypeDescriptor::nullable(Type::object("Author")))
//!                         .with_readable_link(true),
//!                 ),
//!         )
//!         .register(ResourceDefinition::new("Author", "/authors/{id}")),
//! );
//! let normalizer = ItemNormalizer::builder().with_registry(registry).build().unwrap();
//!
//! let author = ResourceObject::new("Author")
//!     .with_attribute("id", AttributeValue::scalar(7))
//!     .with_attribute("name", AttributeValue::scalar("Frank Herbert"))
//!     .into_ref();
//! let book = ResourceObject::new("Book")
//!     .with_attribute("id", AttributeValue::scalar(1))
//!     .with_attribute("title", AttributeValue::scalar("Dune"))
//!     .with_attribute("author", AttributeValue::resource(author));
//!
//! let document = normalizer
//!     .normalize(&book, Some("jsonhal"), &NormalizationContext::new())
//!     .unwrap();
//!
//! assert_eq!(
//!     document,
//!     json!({
//!         "_links": {"self": {"href": "/books/1"}, "author": {"href": "/authors/7"}},
//!         "_embedded": {
//!             "author": {
//!                 "_links": {"self": {"href": "/authors/7"}},
//!                 "id": 7,
//!                 "name": "Frank Herbert",
//!             }
//!         },
//!         "title": "Dune",
//!     })
//! );
//! ```

pub mod classifier;
pub mod components;
pub mod config;
pub mod context;
pub mod error;
pub mod iri;
pub mod metadata;
pub mod name_converter;
pub mod normalizer;
pub mod recursive;
pub mod registry;
pub mod resource;
pub mod serializer;
pub mod state;
pub mod types;

// Re-export commonly used types
pub use classifier::{Classification, classify};
pub use components::{Cardinality, ComponentAssembler, Components, ComponentsCache, RelationDescriptor};
pub use config::{FORMAT, HalSettings};
pub use context::NormalizationContext;
pub use error::{HalError, HalResult};
pub use iri::{IriConverter, Operation, OperationResolver, ResourceClassResolver, UrlReferenceType};
pub use metadata::{
	AttributeDepthMetadata, AttributeEnumerator, MetadataOptions, ObjectAttributeEnumerator,
	PropertyMetadata, PropertyMetadataFactory, StaticDepthMetadata,
};
pub use name_converter::{CamelCaseToSnakeCaseNameConverter, NameConverter};
pub use normalizer::{ItemNormalizer, ItemNormalizerBuilder, relation_iri};
pub use recursive::{CircularReferenceHandler, DEFAULT_CIRCULAR_REFERENCE_LIMIT, SelfLinkHandler};
pub use registry::{InMemoryResourceRegistry, ResourceDefinition};
pub use resource::{AttributeValue, ObjectId, Resource, ResourceObject, ResourceRef};
pub use serializer::{HalSerializer, Serializer};
pub use state::{AttributeStateNormalizer, StateNormalizer};
pub use types::{BuiltinType, Type, TypeDescriptor};
