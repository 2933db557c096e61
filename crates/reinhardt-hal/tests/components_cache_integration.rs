//! Components Cache Integration Tests
//!
//! Tests the memoization of attribute classification across calls:
//! - Cache keys derived from the format and the serialization groups
//! - Reuse of entries, invalidation per class, sharing between normalizers
//! - Objects whose relation IRIs depend on the instance
//! - Concurrent normalization through one normalizer

use reinhardt_hal::components::ComponentAssembler;
use reinhardt_hal::metadata::{ObjectAttributeEnumerator, PropertyMetadata};
use reinhardt_hal::registry::{InMemoryResourceRegistry, ResourceDefinition};
use reinhardt_hal::resource::{AttributeValue, ResourceObject, ResourceRef};
use reinhardt_hal::types::{Type, TypeDescriptor};
use reinhardt_hal::{Cardinality, ComponentsCache, ItemNormalizer, NormalizationContext};
use rstest::*;
use serde_json::json;
use std::sync::Arc;

// =============================================================================
// Fixtures
// =============================================================================

#[fixture]
fn registry() -> Arc<InMemoryResourceRegistry> {
	Arc::new(
		InMemoryResourceRegistry::new()
			.register(
				ResourceDefinition::new("Book", "/books/{id}")
					.with_property("title", PropertyMetadata::default())
					.with_property(
						"isbn",
						PropertyMetadata::default().with_groups(["book:admin"]),
					)
					.with_property(
						"author",
						PropertyMetadata::new(TypeDescriptor::nullable(Type::object("Author")))
							.with_readable_link(true),
					),
			)
			.register(ResourceDefinition::new("Author", "/authors/{id}")),
	)
}

fn dune() -> ResourceRef {
	let author = ResourceObject::new("Author")
		.with_attribute("id", AttributeValue::scalar(7))
		.with_attribute("name", AttributeValue::scalar("Frank Herbert"))
		.into_ref();
	ResourceObject::new("Book")
		.with_attribute("id", AttributeValue::scalar(1))
		.with_attribute("title", AttributeValue::scalar("Dune"))
		.with_attribute("isbn", AttributeValue::scalar("978-0441013593"))
		.with_attribute("author", AttributeValue::resource(author))
		.into_ref()
}

fn book_key(context: &NormalizationContext) -> String {
	context.compute_cache_key(Some("jsonhal"))
}

// =============================================================================
// Tests
// =============================================================================

#[rstest]
fn test_second_call_reuses_components(registry: Arc<InMemoryResourceRegistry>) {
	let normalizer = ItemNormalizer::builder().with_registry(registry).build().unwrap();
	let book = dune();
	let context = NormalizationContext::new();

	let first = normalizer.normalize(book.as_ref(), Some("jsonhal"), &context).unwrap();
	assert!(normalizer.cache().contains("Book", &book_key(&context)));
	// Book and its embedded author
	assert_eq!(normalizer.cache().len(), 2);

	let cached = normalizer.cache().get("Book", &book_key(&context)).unwrap();
	let second = normalizer.normalize(book.as_ref(), Some("jsonhal"), &context).unwrap();

	assert_eq!(first, second);
	assert_eq!(normalizer.cache().len(), 2);
	assert!(Arc::ptr_eq(
		&cached,
		&normalizer.cache().get("Book", &book_key(&context)).unwrap()
	));
}

#[rstest]
fn test_cached_grouping(registry: Arc<InMemoryResourceRegistry>) {
	let normalizer = ItemNormalizer::builder().with_registry(registry).build().unwrap();
	let context = NormalizationContext::new();
	normalizer.normalize(dune().as_ref(), Some("jsonhal"), &context).unwrap();

	let components = normalizer.cache().get("Book", &book_key(&context)).unwrap();

	assert_eq!(components.states(), ["title", "isbn"]);
	assert_eq!(components.links().len(), 1);
	assert_eq!(components.links()[0].name(), "author");
	assert_eq!(components.links()[0].cardinality(), Cardinality::One);
	assert_eq!(components.links()[0].target_class(), "Author");
	assert_eq!(components.embedded(), components.links());
	assert!(components.is_cacheable());
}

#[rstest]
fn test_groups_select_distinct_entries(registry: Arc<InMemoryResourceRegistry>) {
	let normalizer = ItemNormalizer::builder().with_registry(registry).build().unwrap();
	let book = dune();
	let everything = NormalizationContext::new();
	let admin = NormalizationContext::new().with_groups(["book:admin"]);
	let reader = NormalizationContext::new().with_groups(["book:read"]);

	let full = normalizer.normalize(book.as_ref(), Some("jsonhal"), &everything).unwrap();
	let restricted = normalizer.normalize(book.as_ref(), Some("jsonhal"), &reader).unwrap();
	normalizer.normalize(book.as_ref(), Some("jsonhal"), &admin).unwrap();

	assert_eq!(full["isbn"], json!("978-0441013593"));
	assert!(restricted.get("isbn").is_none());
	assert_ne!(book_key(&everything), book_key(&reader));
	assert!(normalizer.cache().contains("Book", &book_key(&reader)));
	assert!(normalizer.cache().contains("Book", &book_key(&admin)));
	assert_eq!(normalizer.cache().len(), 6);
}

#[rstest]
fn test_explicit_cache_key_is_used(registry: Arc<InMemoryResourceRegistry>) {
	let normalizer = ItemNormalizer::builder().with_registry(registry).build().unwrap();

	normalizer
		.normalize(
			dune().as_ref(),
			Some("jsonhal"),
			&NormalizationContext::new().with_cache_key("books"),
		)
		.unwrap();

	assert!(normalizer.cache().contains("Book", "books"));
	assert!(normalizer.cache().contains("Author", "books-author"));
}

#[rstest]
fn test_invalidate_class_forces_reclassification(registry: Arc<InMemoryResourceRegistry>) {
	let normalizer = ItemNormalizer::builder().with_registry(registry).build().unwrap();
	let book = dune();
	let context = NormalizationContext::new();
	normalizer.normalize(book.as_ref(), Some("jsonhal"), &context).unwrap();
	let before = normalizer.cache().get("Book", &book_key(&context)).unwrap();

	assert_eq!(normalizer.cache().invalidate_class("Book"), 1);
	assert_eq!(normalizer.cache().len(), 1);

	normalizer.normalize(book.as_ref(), Some("jsonhal"), &context).unwrap();
	let after = normalizer.cache().get("Book", &book_key(&context)).unwrap();

	assert!(!Arc::ptr_eq(&before, &after));
	assert_eq!(*before, *after);
}

#[rstest]
fn test_shared_cache_between_normalizers(registry: Arc<InMemoryResourceRegistry>) {
	let cache = ComponentsCache::new();
	let first = ItemNormalizer::builder()
		.with_registry(registry.clone())
		.with_cache(cache.clone())
		.build()
		.unwrap();
	let second = ItemNormalizer::builder()
		.with_registry(registry)
		.with_cache(cache.clone())
		.build()
		.unwrap();
	let context = NormalizationContext::new();

	first.normalize(dune().as_ref(), Some("jsonhal"), &context).unwrap();

	assert!(second.cache().contains("Book", &book_key(&context)));
	cache.clear();
	assert!(first.cache().is_empty());
}

#[rstest]
fn test_instance_dependent_iri_disables_caching() {
	let registry = Arc::new(
		InMemoryResourceRegistry::new()
			.register(
				ResourceDefinition::new("Book", "/books/{id}")
					.with_property("title", PropertyMetadata::default())
					.with_property(
						"reviews",
						PropertyMetadata::new(Type::collection_of(Type::object("Review")))
							.with_uri_template("book_reviews"),
					),
			)
			.register(
				ResourceDefinition::new("Review", "/reviews/{id}")
					.with_operation("book_reviews", "/books/{id}/reviews"),
			),
	);
	let normalizer = ItemNormalizer::builder().with_registry(registry).build().unwrap();
	let book = |id: i64| {
		ResourceObject::new("Book")
			.with_attribute("id", AttributeValue::scalar(id))
			.with_attribute("title", AttributeValue::scalar("Dune"))
	};

	let first = normalizer
		.normalize(&book(1), Some("jsonhal"), &NormalizationContext::new())
		.unwrap();
	let second = normalizer
		.normalize(&book(2), Some("jsonhal"), &NormalizationContext::new())
		.unwrap();

	assert_eq!(first["_links"]["reviews"], json!({"href": "/books/1/reviews"}));
	assert_eq!(second["_links"]["reviews"], json!({"href": "/books/2/reviews"}));
	assert!(normalizer.cache().is_empty());
}

#[rstest]
fn test_assembler_without_cache_key_does_not_store(registry: Arc<InMemoryResourceRegistry>) {
	let assembler = ComponentAssembler::new(
		registry.clone(),
		registry.clone(),
		Arc::new(ObjectAttributeEnumerator),
		registry,
	);
	let book = dune();

	let components = assembler
		.assemble(book.as_ref(), Some("jsonhal"), &NormalizationContext::new())
		.unwrap();

	// Undeclared attribute names come from the object itself
	assert_eq!(components.states(), ["id", "title", "isbn"]);
	assert_eq!(components.links()[0].name(), "author");
	assert!(assembler.cache().is_empty());
}

#[rstest]
fn test_concurrent_normalization_agrees(registry: Arc<InMemoryResourceRegistry>) {
	let normalizer = ItemNormalizer::builder().with_registry(registry).build().unwrap();
	let book = dune();
	let expected = normalizer
		.normalize(book.as_ref(), Some("jsonhal"), &NormalizationContext::new())
		.unwrap();
	normalizer.cache().clear();

	let documents: Vec<_> = std::thread::scope(|scope| {
		let handles: Vec<_> = (0..8)
			.map(|_| {
				scope.spawn(|| {
					normalizer
						.normalize(book.as_ref(), Some("jsonhal"), &NormalizationContext::new())
						.unwrap()
				})
			})
			.collect();
		handles.into_iter().map(|handle| handle.join().unwrap()).collect()
	});

	assert!(documents.iter().all(|document| *document == expected));
	assert_eq!(normalizer.cache().len(), 2);
}
