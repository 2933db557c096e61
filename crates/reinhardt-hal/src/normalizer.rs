//! HAL item normalizer
//!
//! Turns a resource into a HAL document:
//!
//! ```text
//! {
//!   "_links": {"self": {"href": ...}, "<relation>": {"href": ...} | [{"href": ...}]},
//!   "_embedded": {"<relation>": <document> | [<document>]},
//!   "<state>": ...
//! }
//! ```
//!
//! The links section only resolves IRIs. Nested documents are produced for
//! the embedded section, by normalizing the related resource with a child
//! context, so recursion is bounded by the circular reference and depth
//! guards of [`crate::recursive`].

use crate::components::{Cardinality, ComponentAssembler, ComponentsCache, RelationDescriptor};
use crate::config::HalSettings;
use crate::context::NormalizationContext;
use crate::error::{HalError, HalResult};
use crate::iri::{IriConverter, OperationResolver, ResourceClassResolver, UrlReferenceType};
use crate::metadata::{AttributeDepthMetadata, AttributeEnumerator, PropertyMetadataFactory};
use crate::name_converter::NameConverter;
use crate::recursive::{CircularReferenceHandler, SelfLinkHandler, circular, depth};
use crate::registry::InMemoryResourceRegistry;
use crate::resource::{AttributeValue, ObjectId, Resource, ResourceRef};
use crate::state::{AttributeStateNormalizer, StateNormalizer};
use serde_json::{Map, Value, json};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
	Links,
	Embedded,
}

/// IRI carried by a relation value
///
/// The value is either the IRI itself or an already normalized document
/// holding `_links.self.href`.
///
/// # Examples
///
/// ```
/// use reinhardt_hal::normalizer::relation_iri;
/// use serde_json::json;
///
/// assert_eq!(relation_iri(&json!("/authors/7")).unwrap(), "/authors/7");
/// assert_eq!(
///     relation_iri(&json!({"_links": {"self": {"href": "/authors/7"}}, "name": "Frank"})).unwrap(),
///     "/authors/7",
/// );
/// assert!(relation_iri(&json!(7)).is_err());
/// ```
pub fn relation_iri(value: &Value) -> HalResult<String> {
	match value {
		Value::String(iri) => Ok(iri.clone()),
		Value::Object(document) => document
			.get("_links")
			.and_then(|links| links.get("self"))
			.and_then(|link| link.get("href"))
			.and_then(Value::as_str)
			.map(str::to_string)
			.ok_or_else(|| HalError::unexpected_shape("relation document has no \"_links.self.href\"")),
		other => Err(HalError::unexpected_shape(format!(
			"expected an IRI or a document with a self link, got {}",
			other
		))),
	}
}

/// Normalizes resources into HAL documents
///
/// Build one with [`ItemNormalizer::builder`]. The normalizer is `Send +
/// Sync`; its components cache is shared by every call.
pub struct ItemNormalizer {
	settings: HalSettings,
	resource_class_resolver: Arc<dyn ResourceClassResolver>,
	iri_converter: Arc<dyn IriConverter>,
	assembler: ComponentAssembler,
	state_normalizer: Arc<dyn StateNormalizer>,
	name_converter: Option<Arc<dyn NameConverter>>,
	depth_metadata: Option<Arc<dyn AttributeDepthMetadata>>,
	circular_reference_handler: Option<Arc<dyn CircularReferenceHandler>>,
}

impl ItemNormalizer {
	pub fn builder() -> ItemNormalizerBuilder {
		ItemNormalizerBuilder::new()
	}

	pub fn settings(&self) -> &HalSettings {
		&self.settings
	}

	/// Format this normalizer produces
	pub fn format(&self) -> &str {
		&self.settings.format
	}

	pub fn cache(&self) -> &ComponentsCache {
		self.assembler.cache()
	}

	/// Whether `object` can be normalized to `format`
	pub fn supports_normalization(&self, object: &dyn Resource, format: Option<&str>) -> bool {
		format == Some(self.format()) && self.resource_class_resolver.is_resource_class(object.class_name())
	}

	/// Always `false`: the format is output only
	pub fn supports_denormalization(&self, _data: &Value, _class: &str, _format: Option<&str>) -> bool {
		false
	}

	/// Always fails with [`HalError::UnsupportedOperation`]
	pub fn denormalize(
		&self,
		_data: &Value,
		_class: &str,
		_format: Option<&str>,
		_context: &NormalizationContext,
	) -> HalResult<ResourceRef> {
		Err(HalError::UnsupportedOperation {
			format: self.settings.format.clone(),
		})
	}

	/// Normalize `object` into a HAL document
	///
	/// The context is copied; the caller's value is left untouched. When the
	/// states projection is not a JSON object it is returned unchanged.
	pub fn normalize(
		&self,
		object: &dyn Resource,
		format: Option<&str>,
		context: &NormalizationContext,
	) -> HalResult<Value> {
		let mut context = context.clone();
		if context.cache_key().is_none() {
			let cache_key = context.compute_cache_key(format);
			context.set_cache_key(cache_key);
		}

		let resource_class = self
			.resource_class_resolver
			.resource_class(object, context.resource_class())?;
		context.set_resource_class(Some(resource_class.clone()));

		// A relation operation addresses the relation, not the related object
		let self_operation = if context.is_sub_level() {
			None
		} else {
			context.operation()
		};
		let iri = self.iri_converter.iri_from_resource(
			object,
			UrlReferenceType::AbsPath,
			self_operation,
			&context,
		)?;
		context.set_iri(iri.clone());

		let components = self.assembler.assemble(object, format, &context)?;

		let limit = context
			.circular_reference_limit()
			.unwrap_or(self.settings.circular_reference_limit);
		if circular::is_circular_reference(&mut context, object, limit) {
			tracing::debug!(
				class = %resource_class,
				object = %ObjectId::of(object),
				limit,
				"circular reference detected"
			);
			return match &self.circular_reference_handler {
				Some(handler) => handler.handle(object, format, &context),
				None => Err(HalError::CircularReference {
					class: resource_class,
					limit,
				}),
			};
		}

		let data = self
			.state_normalizer
			.normalize_states(object, components.states(), format, &context)?;
		let Value::Object(states) = data else {
			return Ok(data);
		};

		let mut links = Map::new();
		links.insert("self".to_string(), json!({ "href": iri }));
		links.extend(self.populate_relations(object, format, &context, components.links(), Section::Links)?);

		let embedded =
			self.populate_relations(object, format, &context, components.embedded(), Section::Embedded)?;

		let mut document = Map::new();
		document.insert("_links".to_string(), Value::Object(links));
		if !embedded.is_empty() {
			document.insert("_embedded".to_string(), Value::Object(embedded));
		}
		for (key, value) in states {
			if !document.contains_key(&key) {
				document.insert(key, value);
			}
		}

		Ok(Value::Object(document))
	}

	fn populate_relations(
		&self,
		object: &dyn Resource,
		format: Option<&str>,
		context: &NormalizationContext,
		relations: &[RelationDescriptor],
		section: Section,
	) -> HalResult<Map<String, Value>> {
		// Depth counters recorded here stay local to this section
		let mut context = context.clone();
		let class = context
			.resource_class()
			.unwrap_or(object.class_name())
			.to_string();
		let max_depth_enabled = context
			.max_depth_enabled()
			.unwrap_or(self.settings.enable_max_depth);

		let mut populated = Map::new();

		for relation in relations {
			if max_depth_enabled {
				if let Some(metadata) = &self.depth_metadata {
					if depth::is_max_depth_reached(metadata.as_ref(), &class, relation.name(), &mut context) {
						tracing::debug!(class = %class, attribute = relation.name(), "max depth reached");
						continue;
					}
				}
			}

			let key = match &self.name_converter {
				Some(converter) => converter.normalize(relation.name(), &class, format, &context),
				None => relation.name().to_string(),
			};

			if section == Section::Links {
				if let Some(iri) = relation.iri() {
					populated.insert(key, json!({ "href": iri }));
					continue;
				}
			}

			let value = object.attribute(relation.name()).unwrap_or(AttributeValue::Null);
			if value.is_empty() {
				tracing::trace!(class = %class, attribute = relation.name(), "skipping empty relation");
				continue;
			}

			let mut child = context.child(relation.name());
			child.set_resource_class(Some(relation.target_class().to_string()));
			child.set_operation(relation.operation().cloned());

			let rendered = match (relation.cardinality(), value) {
				(Cardinality::Many, AttributeValue::Collection(items)) => Value::Array(
					items
						.into_iter()
						.map(|item| self.render_relation(item, relation, format, &child, section))
						.collect::<HalResult<Vec<_>>>()?,
				),
				// Pre-built IRIs or documents
				(Cardinality::Many, AttributeValue::Scalar(Value::Array(items))) => Value::Array(
					items
						.into_iter()
						.map(|item| {
							self.render_relation(AttributeValue::Scalar(item), relation, format, &child, section)
						})
						.collect::<HalResult<Vec<_>>>()?,
				),
				(Cardinality::Many, other) => {
					return Err(HalError::unexpected_shape(format!(
						"to-many relation \"{}\" of \"{}\" holds a single value: {:?}",
						relation.name(),
						class,
						other
					)));
				}
				(Cardinality::One, value) => self.render_relation(value, relation, format, &child, section)?,
			};

			populated.insert(key, rendered);
		}

		Ok(populated)
	}

	fn render_relation(
		&self,
		value: AttributeValue,
		relation: &RelationDescriptor,
		format: Option<&str>,
		context: &NormalizationContext,
		section: Section,
	) -> HalResult<Value> {
		let value = self.attribute_value(value, relation, format, context, section)?;
		match section {
			Section::Links => Ok(json!({ "href": relation_iri(&value)? })),
			Section::Embedded => Ok(value),
		}
	}

	/// Value of one related element for a section
	///
	/// Embedded readable links are normalized; every other resource is
	/// reduced to its IRI. Scalars are taken as pre-built IRIs or documents.
	fn attribute_value(
		&self,
		value: AttributeValue,
		relation: &RelationDescriptor,
		format: Option<&str>,
		context: &NormalizationContext,
		section: Section,
	) -> HalResult<Value> {
		match value {
			AttributeValue::Resource(resource) => {
				if section == Section::Embedded && relation.is_readable_link() {
					self.normalize(resource.as_ref(), format, context)
				} else {
					self.iri_converter
						.iri_from_resource(resource.as_ref(), UrlReferenceType::AbsPath, None, context)
						.map(Value::String)
				}
			}
			AttributeValue::Scalar(value) => Ok(value),
			AttributeValue::Null => Ok(Value::Null),
			AttributeValue::Collection(_) => Err(HalError::unexpected_shape(format!(
				"relation \"{}\" holds a nested collection",
				relation.name()
			))),
		}
	}
}

/// Builder for [`ItemNormalizer`]
///
/// The resource class resolver, property metadata factory, attribute
/// enumerator and IRI converter are required; [`with_registry`] sets all of
/// them at once.
///
/// [`with_registry`]: ItemNormalizerBuilder::with_registry
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use reinhardt_hal::normalizer::ItemNormalizer;
/// use reinhardt_hal::registry::{InMemoryResourceRegistry, ResourceDefinition};
/// use reinhardt_hal::resource::{AttributeValue, ResourceObject};
/// use reinhardt_hal::context::NormalizationContext;
/// use serde_json::json;
///
/// let registry = Arc::new(
///     InMemoryResourceRegistry::new().register(ResourceDefinition::new("Book", "/books/{id}")),
/// );
/// let normalizer = ItemNormalizer::builder().with_registry(registry).build().unwrap();
///
/// let book = ResourceObject::new("Book")
///     .with_attribute("id", AttributeValue::scalar(1))
///     .with_attribute("title", AttributeValue::scalar("Dune"));
///
/// let document = normalizer
///     .normalize(&book, Some("jsonhal"), &NormalizationContext::new())
///     .unwrap();
/// assert_eq!(
///     document,
///     json!({"_links": {"self": {"href": "/books/1"}}, "id": 1, "title": "Dune"}),
/// );
/// ```
#[derive(Default)]
pub struct ItemNormalizerBuilder {
	settings: HalSettings,
	resource_class_resolver: Option<Arc<dyn ResourceClassResolver>>,
	property_metadata_factory: Option<Arc<dyn PropertyMetadataFactory>>,
	attribute_enumerator: Option<Arc<dyn AttributeEnumerator>>,
	iri_converter: Option<Arc<dyn IriConverter>>,
	operation_resolver: Option<Arc<dyn OperationResolver>>,
	state_normalizer: Option<Arc<dyn StateNormalizer>>,
	name_converter: Option<Arc<dyn NameConverter>>,
	depth_metadata: Option<Arc<dyn AttributeDepthMetadata>>,
	circular_reference_handler: Option<Arc<dyn CircularReferenceHandler>>,
	without_circular_reference_handler: bool,
	cache: Option<ComponentsCache>,
}

impl ItemNormalizerBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_settings(mut self, settings: HalSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Use one registry for every resource collaborator
	pub fn with_registry(mut self, registry: Arc<InMemoryResourceRegistry>) -> Self {
		self.resource_class_resolver = Some(registry.clone());
		self.property_metadata_factory = Some(registry.clone());
		self.attribute_enumerator = Some(registry.clone());
		self.iri_converter = Some(registry.clone());
		self.operation_resolver = Some(registry);
		self
	}

	pub fn with_resource_class_resolver(mut self, resolver: Arc<dyn ResourceClassResolver>) -> Self {
		self.resource_class_resolver = Some(resolver);
		self
	}

	pub fn with_property_metadata_factory(mut self, factory: Arc<dyn PropertyMetadataFactory>) -> Self {
		self.property_metadata_factory = Some(factory);
		self
	}

	pub fn with_attribute_enumerator(mut self, enumerator: Arc<dyn AttributeEnumerator>) -> Self {
		self.attribute_enumerator = Some(enumerator);
		self
	}

	pub fn with_iri_converter(mut self, iri_converter: Arc<dyn IriConverter>) -> Self {
		self.iri_converter = Some(iri_converter);
		self
	}

	pub fn with_operation_resolver(mut self, operation_resolver: Arc<dyn OperationResolver>) -> Self {
		self.operation_resolver = Some(operation_resolver);
		self
	}

	/// Replace the default [`AttributeStateNormalizer`]
	pub fn with_state_normalizer(mut self, state_normalizer: Arc<dyn StateNormalizer>) -> Self {
		self.state_normalizer = Some(state_normalizer);
		self
	}

	pub fn with_name_converter(mut self, name_converter: Arc<dyn NameConverter>) -> Self {
		self.name_converter = Some(name_converter);
		self
	}

	pub fn with_depth_metadata(mut self, depth_metadata: Arc<dyn AttributeDepthMetadata>) -> Self {
		self.depth_metadata = Some(depth_metadata);
		self
	}

	/// Replace the default [`SelfLinkHandler`]
	pub fn with_circular_reference_handler(mut self, handler: Arc<dyn CircularReferenceHandler>) -> Self {
		self.circular_reference_handler = Some(handler);
		self.without_circular_reference_handler = false;
		self
	}

	/// Make circular references fail with [`HalError::CircularReference`]
	pub fn without_circular_reference_handler(mut self) -> Self {
		self.circular_reference_handler = None;
		self.without_circular_reference_handler = true;
		self
	}

	/// Share a components cache between normalizers
	pub fn with_cache(mut self, cache: ComponentsCache) -> Self {
		self.cache = Some(cache);
		self
	}

	pub fn build(self) -> HalResult<ItemNormalizer> {
		let missing =
			|collaborator: &str| HalError::Configuration(format!("no {} configured", collaborator));

		let resource_class_resolver = self
			.resource_class_resolver
			.ok_or_else(|| missing("resource class resolver"))?;
		let property_metadata_factory = self
			.property_metadata_factory
			.ok_or_else(|| missing("property metadata factory"))?;
		let attribute_enumerator = self
			.attribute_enumerator
			.ok_or_else(|| missing("attribute enumerator"))?;
		let iri_converter = self.iri_converter.ok_or_else(|| missing("IRI converter"))?;

		let mut assembler = ComponentAssembler::new(
			resource_class_resolver.clone(),
			property_metadata_factory,
			attribute_enumerator,
			iri_converter.clone(),
		);
		if let Some(operation_resolver) = self.operation_resolver {
			assembler = assembler.with_operation_resolver(operation_resolver);
		}
		if let Some(cache) = self.cache {
			assembler = assembler.with_cache(cache);
		}

		let state_normalizer = self.state_normalizer.unwrap_or_else(|| {
			let mut states = AttributeStateNormalizer::new().with_skip_null_values(self.settings.skip_null_values);
			if let Some(converter) = &self.name_converter {
				states = states.with_name_converter(converter.clone());
			}
			Arc::new(states)
		});

		let circular_reference_handler = match self.circular_reference_handler {
			Some(handler) => Some(handler),
			None if self.without_circular_reference_handler => None,
			None => Some(Arc::new(SelfLinkHandler::new(iri_converter.clone())) as Arc<dyn CircularReferenceHandler>),
		};

		tracing::debug!(format = %self.settings.format, "HAL item normalizer built");

		Ok(ItemNormalizer {
			settings: self.settings,
			resource_class_resolver,
			iri_converter,
			assembler,
			state_normalizer,
			name_converter: self.name_converter,
			depth_metadata: self.depth_metadata,
			circular_reference_handler,
		})
	}
}
