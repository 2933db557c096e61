//! Resource objects handed to the normalizer
//!
//! The normalizer never mutates a resource; it only reads its class name and
//! attribute values. Identity for circular reference detection is the
//! address of the resource, like [`crate::recursive`] tracks it.

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a resource
pub type ResourceRef = Arc<dyn Resource>;

/// A domain entity with a class identity and named attributes
pub trait Resource: Send + Sync + fmt::Debug {
	/// Runtime class name of the object
	fn class_name(&self) -> &str;

	/// Names of the attributes the object exposes, in order
	fn attribute_names(&self) -> Vec<String>;

	/// Value of an attribute, `None` when the object has no such attribute
	fn attribute(&self, name: &str) -> Option<AttributeValue>;
}

/// Raw attribute value read from a resource
#[derive(Debug, Clone)]
pub enum AttributeValue {
	Null,
	/// A plain JSON value (numbers, strings, pre-built documents, ...)
	Scalar(Value),
	/// Another resource
	Resource(ResourceRef),
	/// An ordered collection of values
	Collection(Vec<AttributeValue>),
}

impl AttributeValue {
	/// Wrap anything convertible into a JSON value
	pub fn scalar(value: impl Into<Value>) -> Self {
		AttributeValue::Scalar(value.into())
	}

	/// Wrap a resource handle
	pub fn resource(resource: ResourceRef) -> Self {
		AttributeValue::Resource(resource)
	}

	/// Collection of resources
	pub fn resources(resources: impl IntoIterator<Item = ResourceRef>) -> Self {
		AttributeValue::Collection(resources.into_iter().map(AttributeValue::Resource).collect())
	}

	/// Whether the value counts as empty when populating a relation
	///
	/// Null, empty collections, `false`, `0`, `""` and `"0"` are empty.
	pub fn is_empty(&self) -> bool {
		match self {
			AttributeValue::Null => true,
			AttributeValue::Resource(_) => false,
			AttributeValue::Collection(items) => items.is_empty(),
			AttributeValue::Scalar(value) => is_falsy(value),
		}
	}
}

pub(crate) fn is_falsy(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(b) => !b,
		Value::Number(n) => n.as_f64() == Some(0.0),
		Value::String(s) => s.is_empty() || s == "0",
		Value::Array(items) => items.is_empty(),
		Value::Object(map) => map.is_empty(),
	}
}

/// Identity of a live resource, derived from its address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl ObjectId {
	/// Identity of the given resource
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal::resource::{ObjectId, ResourceObject, ResourceRef};
	/// use std::sync::Arc;
	///
	/// let book: ResourceRef = Arc::new(ResourceObject::new("Book"));
	/// let alias = book.clone();
	/// let other: ResourceRef = Arc::new(ResourceObject::new("Book"));
	///
	/// assert_eq!(ObjectId::of(book.as_ref()), ObjectId::of(alias.as_ref()));
	/// assert_ne!(ObjectId::of(book.as_ref()), ObjectId::of(other.as_ref()));
	/// ```
	pub fn of(resource: &dyn Resource) -> Self {
		Self(resource as *const dyn Resource as *const () as usize)
	}
}

impl fmt::Display for ObjectId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{:x}", self.0)
	}
}

/// A dynamic resource with ordered attributes
///
/// Attributes can be replaced after construction, which makes it possible to
/// build cyclic graphs (a cycle of `Arc`s is never freed, so keep them to
/// short-lived graphs).
///
/// # Examples
///
/// ```
/// use reinhardt_hal::resource::{AttributeValue, Resource, ResourceObject};
///
/// let book = ResourceObject::new("Book")
///     .with_attribute("id", AttributeValue::scalar(1))
///     .with_attribute("title", AttributeValue::scalar("Dune"));
///
/// assert_eq!(book.class_name(), "Book");
/// assert_eq!(book.attribute_names(), vec!["id", "title"]);
/// ```
#[derive(Debug)]
pub struct ResourceObject {
	class: String,
	attributes: RwLock<IndexMap<String, AttributeValue>>,
}

impl ResourceObject {
	pub fn new(class: impl Into<String>) -> Self {
		Self {
			class: class.into(),
			attributes: RwLock::new(IndexMap::new()),
		}
	}

	/// Add an attribute while building the object
	pub fn with_attribute(self, name: impl Into<String>, value: AttributeValue) -> Self {
		self.attributes.write().insert(name.into(), value);
		self
	}

	/// Set or replace an attribute on a shared object
	pub fn set_attribute(&self, name: impl Into<String>, value: AttributeValue) {
		self.attributes.write().insert(name.into(), value);
	}

	/// Finish building and share the object
	pub fn into_ref(self) -> ResourceRef {
		Arc::new(self)
	}
}

impl Resource for ResourceObject {
	fn class_name(&self) -> &str {
		&self.class
	}

	fn attribute_names(&self) -> Vec<String> {
		self.attributes.read().keys().cloned().collect()
	}

	fn attribute(&self, name: &str) -> Option<AttributeValue> {
		self.attributes.read().get(name).cloned()
	}
}
