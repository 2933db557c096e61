//! Component assembly
//!
//! Groups the attributes of an object into plain states, link candidates and
//! embeddable candidates, and memoizes the grouping per
//! `(object class, cache key)` pair.

use crate::classifier::{Classification, classify};
use crate::context::NormalizationContext;
use crate::error::{HalError, HalResult};
use crate::iri::{IriConverter, Operation, OperationResolver, ResourceClassResolver, UrlReferenceType};
use crate::metadata::{AttributeEnumerator, MetadataOptions, PropertyMetadataFactory};
use crate::resource::Resource;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Number of resources a relation points to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
	One,
	Many,
}

/// A classified relation attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDescriptor {
	name: String,
	cardinality: Cardinality,
	target_class: String,
	readable_link: bool,
	iri: Option<String>,
	operation: Option<Operation>,
}

impl RelationDescriptor {
	pub fn new(
		name: impl Into<String>,
		cardinality: Cardinality,
		target_class: impl Into<String>,
		readable_link: bool,
	) -> Self {
		Self {
			name: name.into(),
			cardinality,
			target_class: target_class.into(),
			readable_link,
			iri: None,
			operation: None,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn cardinality(&self) -> Cardinality {
		self.cardinality
	}

	/// Resource class the relation points to
	pub fn target_class(&self) -> &str {
		&self.target_class
	}

	/// Whether the related resource is embedded
	pub fn is_readable_link(&self) -> bool {
		self.readable_link
	}

	/// IRI resolved eagerly from a custom URI template
	pub fn iri(&self) -> Option<&str> {
		self.iri.as_deref()
	}

	pub fn operation(&self) -> Option<&Operation> {
		self.operation.as_ref()
	}
}

/// Attributes of one object class, grouped for document building
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Components {
	states: Vec<String>,
	links: Vec<RelationDescriptor>,
	embedded: Vec<RelationDescriptor>,
	cacheable: bool,
}

impl Default for Components {
	fn default() -> Self {
		Self {
			states: Vec::new(),
			links: Vec::new(),
			embedded: Vec::new(),
			cacheable: true,
		}
	}
}

impl Components {
	/// Plain attributes, in enumeration order
	pub fn states(&self) -> &[String] {
		&self.states
	}

	/// Every relation
	pub fn links(&self) -> &[RelationDescriptor] {
		&self.links
	}

	/// Relations whose target is embedded
	pub fn embedded(&self) -> &[RelationDescriptor] {
		&self.embedded
	}

	/// `false` when a relation IRI was resolved for one specific object
	pub fn is_cacheable(&self) -> bool {
		self.cacheable
	}
}

/// Process-wide memo of [`Components`]
///
/// Shared between threads; entries are never replaced once stored.
///
/// # Examples
///
/// ```
/// use reinhardt_hal::components::{Components, ComponentsCache};
///
/// let cache = ComponentsCache::new();
/// cache.insert("Book", "abc", Components::default());
///
/// assert!(cache.contains("Book", "abc"));
/// assert_eq!(cache.invalidate_class("Book"), 1);
/// assert!(cache.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ComponentsCache {
	// (resource class, context cache key)
	entries: Arc<RwLock<HashMap<(String, String), Arc<Components>>>>,
}

impl ComponentsCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, class: &str, cache_key: &str) -> Option<Arc<Components>> {
		self.entries
			.read()
			.get(&(class.to_string(), cache_key.to_string()))
			.cloned()
	}

	/// Store `components` unless another caller stored the entry first
	///
	/// Returns the entry held by the cache.
	pub fn insert(
		&self,
		class: impl Into<String>,
		cache_key: impl Into<String>,
		components: Components,
	) -> Arc<Components> {
		self.entries
			.write()
			.entry((class.into(), cache_key.into()))
			.or_insert_with(|| Arc::new(components))
			.clone()
	}

	pub fn contains(&self, class: &str, cache_key: &str) -> bool {
		self.entries
			.read()
			.contains_key(&(class.to_string(), cache_key.to_string()))
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}

	/// Drop every entry of `class`, returning how many were removed
	pub fn invalidate_class(&self, class: &str) -> usize {
		let mut entries = self.entries.write();
		let before = entries.len();
		entries.retain(|(entry_class, _), _| entry_class != class);
		before - entries.len()
	}

	pub fn clear(&self) {
		self.entries.write().clear();
	}
}

/// Builds [`Components`] for objects, consulting the cache first
pub struct ComponentAssembler {
	resource_class_resolver: Arc<dyn ResourceClassResolver>,
	property_metadata_factory: Arc<dyn PropertyMetadataFactory>,
	attribute_enumerator: Arc<dyn AttributeEnumerator>,
	iri_converter: Arc<dyn IriConverter>,
	operation_resolver: Option<Arc<dyn OperationResolver>>,
	cache: ComponentsCache,
}

impl ComponentAssembler {
	pub fn new(
		resource_class_resolver: Arc<dyn ResourceClassResolver>,
		property_metadata_factory: Arc<dyn PropertyMetadataFactory>,
		attribute_enumerator: Arc<dyn AttributeEnumerator>,
		iri_converter: Arc<dyn IriConverter>,
	) -> Self {
		Self {
			resource_class_resolver,
			property_metadata_factory,
			attribute_enumerator,
			iri_converter,
			operation_resolver: None,
			cache: ComponentsCache::new(),
		}
	}

	/// Resolver used for relations addressed by a custom URI template
	pub fn with_operation_resolver(mut self, operation_resolver: Arc<dyn OperationResolver>) -> Self {
		self.operation_resolver = Some(operation_resolver);
		self
	}

	/// Share an existing cache
	pub fn with_cache(mut self, cache: ComponentsCache) -> Self {
		self.cache = cache;
		self
	}

	pub fn cache(&self) -> &ComponentsCache {
		&self.cache
	}

	/// Components of `object` for the given context
	///
	/// Cached per class and context cache key. A context without cache key, or
	/// a relation whose IRI had to be resolved for this very object, leaves
	/// the result out of the cache.
	pub fn assemble(
		&self,
		object: &dyn Resource,
		format: Option<&str>,
		context: &NormalizationContext,
	) -> HalResult<Arc<Components>> {
		let class = object.class_name();
		let mut cache_key = context.cache_key();

		if let Some(key) = cache_key {
			if let Some(components) = self.cache.get(class, key) {
				tracing::trace!(class, key = %key, "components cache hit");
				return Ok(components);
			}
		}

		let resource_class = context.resource_class().unwrap_or(class);
		let options = MetadataOptions::from_context(context);
		let mut components = Components::default();

		for attribute in self.attribute_enumerator.attributes(object, format, context)? {
			let metadata =
				self.property_metadata_factory
					.create(resource_class, &attribute, &options)?;

			let (cardinality, target) =
				match classify(metadata.types(), self.resource_class_resolver.as_ref()) {
					Classification::Attribute => {
						components.states.push(attribute);
						continue;
					}
					Classification::SingleRelation { target } => (Cardinality::One, target),
					Classification::CollectionRelation { target } => (Cardinality::Many, target),
				};

			let mut relation =
				RelationDescriptor::new(attribute, cardinality, target, metadata.is_readable_link());

			if let Some(uri_template) = metadata.uri_template() {
				let operation = self
					.operation_resolver
					.as_ref()
					.ok_or_else(|| {
						HalError::Configuration(format!(
							"attribute \"{}\" of \"{}\" declares a URI template but no operation resolver is configured",
							relation.name, resource_class
						))
					})?
					.operation(&relation.target_class, uri_template, true)?;

				let mut child_context = context.child(&relation.name);
				child_context.set_resource_class(None);
				let iri = self.iri_converter.iri_from_resource(
					object,
					UrlReferenceType::AbsPath,
					Some(&operation),
					&child_context,
				)?;

				relation.iri = Some(iri);
				relation.operation = Some(operation);
				components.cacheable = false;
				cache_key = None;
			}

			if relation.readable_link {
				components.embedded.push(relation.clone());
			}
			components.links.push(relation);
		}

		match cache_key {
			Some(key) => {
				tracing::debug!(class, key = %key, "components cache miss, storing");
				Ok(self.cache.insert(class, key, components))
			}
			None => {
				tracing::debug!(class, "components not cacheable");
				Ok(Arc::new(components))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_cache_keeps_first_entry() {
		let cache = ComponentsCache::new();
		let first = Components {
			states: vec!["title".to_string()],
			..Components::default()
		};
		let second = Components::default();

		cache.insert("Book", "k", first.clone());
		let stored = cache.insert("Book", "k", second);

		assert_eq!(*stored, first);
		assert_eq!(cache.len(), 1);
	}

	#[rstest]
	fn test_invalidate_class_only_touches_that_class() {
		let cache = ComponentsCache::new();
		cache.insert("Book", "a", Components::default());
		cache.insert("Book", "b", Components::default());
		cache.insert("BookReview", "a", Components::default());

		assert_eq!(cache.invalidate_class("Book"), 2);
		assert!(cache.contains("BookReview", "a"));
		assert!(!cache.contains("Book", "a"));
	}

	#[rstest]
	fn test_invalidate_class_keeps_hyphenated_class_names() {
		let cache = ComponentsCache::new();
		cache.insert("Book", "k", Components::default());
		cache.insert("Book-Review", "k", Components::default());
		cache.insert("Book", "Review-k", Components::default());

		assert_eq!(cache.invalidate_class("Book"), 2);
		assert_eq!(cache.len(), 1);
		assert!(cache.contains("Book-Review", "k"));
	}

	#[rstest]
	fn test_cache_clones_share_entries() {
		let cache = ComponentsCache::new();
		let shared = cache.clone();
		cache.insert("Author", "k", Components::default());
		assert!(shared.contains("Author", "k"));

		shared.clear();
		assert!(cache.is_empty());
	}

	#[rstest]
	fn test_relation_descriptor_accessors() {
		let relation = RelationDescriptor::new("tags", Cardinality::Many, "Tag", true);
		assert_eq!(relation.name(), "tags");
		assert_eq!(relation.cardinality(), Cardinality::Many);
		assert_eq!(relation.target_class(), "Tag");
		assert!(relation.is_readable_link());
		assert!(relation.iri().is_none());
		assert!(relation.operation().is_none());
	}
}
