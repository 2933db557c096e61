//! Facade Integration Tests
//!
//! Tests the `reinhardt_hypermedia` re-exports end to end:
//! - HAL serialization through the `hal` module
//! - Documentation generation through the `openapi` module

use reinhardt_hypermedia::hal::metadata::PropertyMetadata;
use reinhardt_hypermedia::hal::resource::{AttributeValue, ResourceObject};
use reinhardt_hypermedia::hal::types::{Type, TypeDescriptor};
use reinhardt_hypermedia::hal::{HalSerializer, Serializer};
use reinhardt_hypermedia::openapi::{ApiKeyLocation, DocumentationGenerator, Options};
use reinhardt_hypermedia::{HalSettings, InMemoryResourceRegistry, ItemNormalizer, ResourceDefinition};
use rstest::*;
use serde_json::{Value, json};
use std::sync::Arc;

// =============================================================================
// Fixtures
// =============================================================================

#[fixture]
fn normalizer() -> Arc<ItemNormalizer> {
	let registry = Arc::new(
		InMemoryResourceRegistry::new()
			.register(
				ResourceDefinition::new("Book", "/books/{id}")
					.with_property("title", PropertyMetadata::default())
					.with_property(
						"author",
						PropertyMetadata::new(TypeDescriptor::nullable(Type::object("Author"))),
					),
			)
			.register(ResourceDefinition::new("Author", "/authors/{id}")),
	);

	Arc::new(
		ItemNormalizer::builder()
			.with_settings(HalSettings::new())
			.with_registry(registry)
			.build()
			.unwrap(),
	)
}

// =============================================================================
// Tests
// =============================================================================

#[rstest]
fn test_hal_serializer_through_facade(normalizer: Arc<ItemNormalizer>) {
	let author = ResourceObject::new("Author")
		.with_attribute("id", AttributeValue::scalar(3))
		.into_ref();
	let book = ResourceObject::new("Book")
		.with_attribute("id", AttributeValue::scalar(1))
		.with_attribute("title", AttributeValue::scalar("Dune"))
		.with_attribute("author", AttributeValue::resource(author))
		.into_ref();

	let json = HalSerializer::new(normalizer).serialize(&book).unwrap();
	let document: Value = serde_json::from_str(&json).unwrap();

	assert_eq!(
		document,
		json!({
			"_links": {"self": {"href": "/books/1"}, "author": {"href": "/authors/3"}},
			"title": "Dune",
		})
	);
}

#[rstest]
fn test_documentation_through_facade() {
	let options = Options::builder()
		.title("Library API")
		.version("1.0.0")
		.api_key("apiKey", "X-API-KEY", ApiKeyLocation::Header)
		.build();

	let json = DocumentationGenerator::new(Arc::new(options)).to_json().unwrap();
	let document: Value = serde_json::from_str(&json).unwrap();

	assert_eq!(document["info"]["title"], "Library API");
	assert_eq!(document["security"], json!([{"apiKey": []}]));
}
