//! Property metadata collaborators
//!
//! The normalizer does not discover metadata itself. It asks a
//! [`PropertyMetadataFactory`] for the declared type and link options of each
//! attribute, an [`AttributeEnumerator`] for the attribute list, and
//! optionally an [`AttributeDepthMetadata`] for per-attribute depth limits.

use crate::context::NormalizationContext;
use crate::error::HalResult;
use crate::resource::Resource;
use crate::types::TypeDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata describing one attribute of a resource class
///
/// # Examples
///
/// ```
/// use reinhardt_hal::metadata::PropertyMetadata;
/// use reinhardt_hal::types::{Type, TypeDescriptor};
///
/// let author = PropertyMetadata::new(TypeDescriptor::nullable(Type::object("Author")))
///     .with_readable_link(true);
/// assert!(author.is_readable_link());
/// assert!(author.is_readable());
/// assert!(author.uri_template().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMetadata {
	#[serde(default)]
	types: TypeDescriptor,
	#[serde(default = "default_readable")]
	readable: bool,
	#[serde(default)]
	readable_link: bool,
	#[serde(default)]
	uri_template: Option<String>,
	#[serde(default)]
	groups: Vec<String>,
}

fn default_readable() -> bool {
	true
}

impl PropertyMetadata {
	pub fn new(types: impl Into<TypeDescriptor>) -> Self {
		Self {
			types: types.into(),
			readable: true,
			readable_link: false,
			uri_template: None,
			groups: Vec::new(),
		}
	}

	/// Whether the related resource is embedded instead of only linked
	pub fn with_readable_link(mut self, readable_link: bool) -> Self {
		self.readable_link = readable_link;
		self
	}

	/// Whether the attribute is exposed at all
	pub fn with_readable(mut self, readable: bool) -> Self {
		self.readable = readable;
		self
	}

	/// Name of the operation whose URI template addresses the relation
	pub fn with_uri_template(mut self, operation_name: impl Into<String>) -> Self {
		self.uri_template = Some(operation_name.into());
		self
	}

	/// Serialization groups the attribute belongs to
	pub fn with_groups<I, S>(mut self, groups: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.groups = groups.into_iter().map(Into::into).collect();
		self
	}

	pub fn types(&self) -> &TypeDescriptor {
		&self.types
	}

	pub fn is_readable(&self) -> bool {
		self.readable
	}

	pub fn is_readable_link(&self) -> bool {
		self.readable_link
	}

	pub fn uri_template(&self) -> Option<&str> {
		self.uri_template.as_deref()
	}

	pub fn groups(&self) -> &[String] {
		&self.groups
	}

	/// Whether the attribute is selected by the given serialization groups
	///
	/// Attributes without groups are always selected, as is every attribute
	/// when no groups are requested.
	pub fn in_groups(&self, requested: Option<&[String]>) -> bool {
		match requested {
			None => true,
			Some(_) if self.groups.is_empty() => true,
			Some(requested) => self.groups.iter().any(|g| requested.contains(g)),
		}
	}
}

impl Default for PropertyMetadata {
	fn default() -> Self {
		Self::new(TypeDescriptor::untyped())
	}
}

/// Options forwarded to the metadata factory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataOptions {
	pub serializer_groups: Option<Vec<String>>,
}

impl MetadataOptions {
	/// Options derived from a normalization context
	pub fn from_context(context: &NormalizationContext) -> Self {
		Self {
			serializer_groups: context.groups().map(<[String]>::to_vec),
		}
	}
}

/// Resolves metadata for one attribute of a resource class
pub trait PropertyMetadataFactory: Send + Sync {
	fn create(
		&self,
		resource_class: &str,
		attribute: &str,
		options: &MetadataOptions,
	) -> HalResult<PropertyMetadata>;
}

/// Lists the attributes to serialize for an object
pub trait AttributeEnumerator: Send + Sync {
	fn attributes(
		&self,
		object: &dyn Resource,
		format: Option<&str>,
		context: &NormalizationContext,
	) -> HalResult<Vec<String>>;
}

/// Enumerates whatever attributes the object itself reports
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectAttributeEnumerator;

impl AttributeEnumerator for ObjectAttributeEnumerator {
	fn attributes(
		&self,
		object: &dyn Resource,
		_format: Option<&str>,
		_context: &NormalizationContext,
	) -> HalResult<Vec<String>> {
		Ok(object.attribute_names())
	}
}

/// Per-class maximum depth of attributes
pub trait AttributeDepthMetadata: Send + Sync {
	/// Maximum depth for `attribute` of `class`, `None` when unlimited
	fn max_depth(&self, class: &str, attribute: &str) -> Option<usize>;
}

/// Depth limits held in memory
///
/// # Examples
///
/// ```
/// use reinhardt_hal::metadata::{AttributeDepthMetadata, StaticDepthMetadata};
///
/// let depths = StaticDepthMetadata::new().with_max_depth("Category", "parent", 2);
/// assert_eq!(depths.max_depth("Category", "parent"), Some(2));
/// assert_eq!(depths.max_depth("Category", "name"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticDepthMetadata {
	depths: HashMap<String, HashMap<String, usize>>,
}

impl StaticDepthMetadata {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_max_depth(
		mut self,
		class: impl Into<String>,
		attribute: impl Into<String>,
		max_depth: usize,
	) -> Self {
		self.depths
			.entry(class.into())
			.or_default()
			.insert(attribute.into(), max_depth);
		self
	}
}

impl AttributeDepthMetadata for StaticDepthMetadata {
	fn max_depth(&self, class: &str, attribute: &str) -> Option<usize> {
		self.depths
			.get(class)
			.and_then(|attributes| attributes.get(attribute))
			.copied()
	}
}
