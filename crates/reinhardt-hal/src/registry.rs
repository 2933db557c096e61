//! In-memory resource registry
//!
//! Implements every collaborator the normalizer consumes from a set of
//! [`ResourceDefinition`]s: which classes are resources, how their IRIs are
//! built, the metadata of their properties and their named operations.

use crate::context::NormalizationContext;
use crate::error::{HalError, HalResult};
use crate::iri::{IriConverter, Operation, OperationResolver, ResourceClassResolver, UrlReferenceType};
use crate::metadata::{AttributeEnumerator, MetadataOptions, PropertyMetadata, PropertyMetadataFactory};
use crate::resource::{AttributeValue, Resource};
use indexmap::IndexMap;
use serde_json::Value;

/// Declaration of one resource class
///
/// # Examples
///
/// ```
/// use reinhardt_hal::metadata::PropertyMetadata;
/// use reinhardt_hal::registry::ResourceDefinition;
/// use reinhardt_hal::types::{Type, TypeDescriptor};
///
/// let book = ResourceDefinition::new("Book", "/books/{id}")
///     .with_property("title", PropertyMetadata::default())
///     .with_property(
///         "author",
///         PropertyMetadata::new(TypeDescriptor::nullable(Type::object("Author")))
///             .with_readable_link(true),
///     )
///     .with_operation("book_reviews", "/books/{id}/reviews");
///
/// assert_eq!(book.class(), "Book");
/// assert_eq!(book.properties().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ResourceDefinition {
	class: String,
	iri_template: String,
	parent: Option<String>,
	properties: IndexMap<String, PropertyMetadata>,
	operations: IndexMap<String, Operation>,
}

impl ResourceDefinition {
	pub fn new(class: impl Into<String>, iri_template: impl Into<String>) -> Self {
		Self {
			class: class.into(),
			iri_template: iri_template.into(),
			parent: None,
			properties: IndexMap::new(),
			operations: IndexMap::new(),
		}
	}

	/// Declare the class this resource specializes
	pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
		self.parent = Some(parent.into());
		self
	}

	pub fn with_property(mut self, name: impl Into<String>, metadata: PropertyMetadata) -> Self {
		self.properties.insert(name.into(), metadata);
		self
	}

	/// Declare an HTTP operation addressed by `uri_template`
	pub fn with_operation(mut self, name: impl Into<String>, uri_template: impl Into<String>) -> Self {
		let name = name.into();
		let operation = Operation::new(name.clone(), self.class.clone()).with_uri_template(uri_template);
		self.operations.insert(name, operation);
		self
	}

	/// Declare an operation that is not reachable over HTTP
	pub fn with_internal_operation(mut self, name: impl Into<String>) -> Self {
		let name = name.into();
		let operation = Operation::new(name.clone(), self.class.clone());
		self.operations.insert(name, operation);
		self
	}

	pub fn class(&self) -> &str {
		&self.class
	}

	pub fn iri_template(&self) -> &str {
		&self.iri_template
	}

	pub fn parent(&self) -> Option<&str> {
		self.parent.as_deref()
	}

	pub fn properties(&self) -> &IndexMap<String, PropertyMetadata> {
		&self.properties
	}

	pub fn operations(&self) -> &IndexMap<String, Operation> {
		&self.operations
	}
}

/// Registry of resource definitions
///
/// Registration happens while building; share the finished registry behind
/// an `Arc`.
///
/// # Examples
///
/// ```
/// use reinhardt_hal::iri::ResourceClassResolver;
/// use reinhardt_hal::registry::{InMemoryResourceRegistry, ResourceDefinition};
///
/// let registry = InMemoryResourceRegistry::new()
///     .with_base_url("https://api.example.com")
///     .register(ResourceDefinition::new("Book", "/books/{id}"))
///     .register(ResourceDefinition::new("Author", "/authors/{id}"));
///
/// assert!(registry.is_resource_class("Book"));
/// assert!(!registry.is_resource_class("Money"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryResourceRegistry {
	definitions: IndexMap<String, ResourceDefinition>,
	base_url: Option<String>,
}

impl InMemoryResourceRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Base used for absolute URLs and network paths
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
		self
	}

	/// Add a definition, replacing any previous one for the same class
	pub fn register(mut self, definition: ResourceDefinition) -> Self {
		self.definitions.insert(definition.class.clone(), definition);
		self
	}

	pub fn definition(&self, class: &str) -> Option<&ResourceDefinition> {
		self.definitions.get(class)
	}

	/// Whether `class` is `ancestor` or declares it up its parent chain
	pub fn is_subclass_of(&self, class: &str, ancestor: &str) -> bool {
		self.lineage(class).iter().any(|definition| definition.class == ancestor)
	}

	/// The definition of `class` followed by its ancestors
	fn lineage(&self, class: &str) -> Vec<&ResourceDefinition> {
		let mut chain = Vec::new();
		let mut current = self.definitions.get(class);
		while let Some(definition) = current {
			// A malformed parent cycle must not loop forever
			if chain.len() > self.definitions.len() {
				break;
			}
			chain.push(definition);
			current = definition.parent.as_deref().and_then(|p| self.definitions.get(p));
		}
		chain
	}

	/// Properties of `class` including inherited ones, ancestors first
	fn declared_properties(&self, class: &str) -> IndexMap<String, PropertyMetadata> {
		let mut properties = IndexMap::new();
		for definition in self.lineage(class).into_iter().rev() {
			for (name, metadata) in &definition.properties {
				properties.insert(name.clone(), metadata.clone());
			}
		}
		properties
	}

	fn require(&self, class: &str) -> HalResult<&ResourceDefinition> {
		self.definitions
			.get(class)
			.ok_or_else(|| HalError::ResourceClassNotFound(class.to_string()))
	}

	fn expand_template(&self, template: &str, object: &dyn Resource) -> HalResult<String> {
		let mut expanded = String::with_capacity(template.len());
		let mut rest = template;

		while let Some(start) = rest.find('{') {
			expanded.push_str(&rest[..start]);
			let after = &rest[start + 1..];
			let end = after.find('}').ok_or_else(|| HalError::InvalidIri {
				class: object.class_name().to_string(),
				message: format!("unterminated placeholder in template \"{}\"", template),
			})?;
			let variable = &after[..end];
			expanded.push_str(&self.template_value(variable, object)?);
			rest = &after[end + 1..];
		}
		expanded.push_str(rest);
		Ok(expanded)
	}

	fn template_value(&self, variable: &str, object: &dyn Resource) -> HalResult<String> {
		let missing = || HalError::InvalidIri {
			class: object.class_name().to_string(),
			message: format!("no usable value for identifier \"{}\"", variable),
		};

		match object.attribute(variable) {
			Some(AttributeValue::Scalar(Value::String(s))) if !s.is_empty() => Ok(s),
			Some(AttributeValue::Scalar(Value::Number(n))) => Ok(n.to_string()),
			Some(AttributeValue::Scalar(Value::Bool(b))) => Ok(b.to_string()),
			_ => Err(missing()),
		}
	}

	fn apply_reference_type(&self, path: String, reference_type: UrlReferenceType) -> HalResult<String> {
		if reference_type == UrlReferenceType::AbsPath {
			return Ok(path);
		}

		let base_url = self.base_url.as_deref().ok_or_else(|| {
			HalError::Configuration(format!(
				"a base URL is required to generate {:?} references",
				reference_type
			))
		})?;

		match reference_type {
			UrlReferenceType::AbsUrl => Ok(format!("{}{}", base_url, path)),
			_ => {
				let authority = base_url
					.split_once("://")
					.map(|(_, authority)| authority)
					.unwrap_or(base_url);
				Ok(format!("//{}{}", authority, path))
			}
		}
	}
}

impl ResourceClassResolver for InMemoryResourceRegistry {
	fn is_resource_class(&self, class: &str) -> bool {
		self.definitions.contains_key(class)
	}

	fn resource_class(&self, object: &dyn Resource, previous_class: Option<&str>) -> HalResult<String> {
		let actual = object.class_name();
		self.require(actual)?;

		match previous_class {
			Some(previous)
				if previous != actual
					&& self.is_resource_class(previous)
					&& self.is_subclass_of(previous, actual) =>
			{
				Ok(previous.to_string())
			}
			_ => Ok(actual.to_string()),
		}
	}
}

impl PropertyMetadataFactory for InMemoryResourceRegistry {
	fn create(
		&self,
		resource_class: &str,
		attribute: &str,
		_options: &MetadataOptions,
	) -> HalResult<PropertyMetadata> {
		self.require(resource_class)?;
		Ok(self
			.declared_properties(resource_class)
			.shift_remove(attribute)
			.unwrap_or_default())
	}
}

impl AttributeEnumerator for InMemoryResourceRegistry {
	fn attributes(
		&self,
		object: &dyn Resource,
		_format: Option<&str>,
		context: &NormalizationContext,
	) -> HalResult<Vec<String>> {
		let class = context.resource_class().unwrap_or(object.class_name());
		let declared = self.declared_properties(class);

		if declared.is_empty() {
			return Ok(object.attribute_names());
		}

		Ok(declared
			.into_iter()
			.filter(|(_, metadata)| metadata.is_readable() && metadata.in_groups(context.groups()))
			.map(|(name, _)| name)
			.collect())
	}
}

impl IriConverter for InMemoryResourceRegistry {
	fn iri_from_resource(
		&self,
		object: &dyn Resource,
		reference_type: UrlReferenceType,
		operation: Option<&Operation>,
		_context: &NormalizationContext,
	) -> HalResult<String> {
		let template = match operation.and_then(Operation::uri_template) {
			Some(template) => template,
			None => self.require(object.class_name())?.iri_template.as_str(),
		};

		let path = self.expand_template(template, object)?;
		self.apply_reference_type(path, reference_type)
	}
}

impl OperationResolver for InMemoryResourceRegistry {
	fn operation(&self, resource_class: &str, name: &str, http_operation: bool) -> HalResult<Operation> {
		let not_found = || HalError::OperationNotFound {
			class: resource_class.to_string(),
			operation: name.to_string(),
		};

		self.lineage(resource_class)
			.into_iter()
			.flat_map(|definition| definition.operations.values())
			.find(|operation| operation.name() == name || operation.uri_template() == Some(name))
			.filter(|operation| !http_operation || operation.uri_template().is_some())
			.cloned()
			.ok_or_else(not_found)
	}
}
