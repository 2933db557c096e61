//! Identifier collaborators
//!
//! These traits connect the normalizer to whatever maps objects to IRIs and
//! classes to resource metadata. They mirror the URL reversal abstraction of
//! hyperlinked serializers: the engine only consumes them.

use crate::context::NormalizationContext;
use crate::error::HalResult;
use crate::resource::Resource;
use serde::{Deserialize, Serialize};

/// Shape of a generated IRI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlReferenceType {
	/// `/books/1`
	#[default]
	AbsPath,
	/// `https://example.com/books/1`
	AbsUrl,
	/// `//example.com/books/1`
	NetPath,
}

/// Opaque handle to a resource operation
///
/// Carries the operation name and, when it defines one, the URI template
/// used to address it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operation {
	name: String,
	resource_class: String,
	uri_template: Option<String>,
}

impl Operation {
	pub fn new(name: impl Into<String>, resource_class: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			resource_class: resource_class.into(),
			uri_template: None,
		}
	}

	pub fn with_uri_template(mut self, uri_template: impl Into<String>) -> Self {
		self.uri_template = Some(uri_template.into());
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn resource_class(&self) -> &str {
		&self.resource_class
	}

	pub fn uri_template(&self) -> Option<&str> {
		self.uri_template.as_deref()
	}
}

/// Decides which classes are addressable resources
pub trait ResourceClassResolver: Send + Sync {
	/// Whether `class` is a resource class
	fn is_resource_class(&self, class: &str) -> bool;

	/// Effective resource class of `object`
	///
	/// `previous_class` is the class the caller expects, typically taken from
	/// the parent context. Implementations may return it instead of the
	/// object's runtime class when it is a more specific resource class.
	fn resource_class(&self, object: &dyn Resource, previous_class: Option<&str>) -> HalResult<String>;
}

/// Generates the IRI of a resource
pub trait IriConverter: Send + Sync {
	fn iri_from_resource(
		&self,
		object: &dyn Resource,
		reference_type: UrlReferenceType,
		operation: Option<&Operation>,
		context: &NormalizationContext,
	) -> HalResult<String>;
}

/// Looks up operations declared on a resource class
pub trait OperationResolver: Send + Sync {
	/// Operation `name` of `resource_class`
	///
	/// When `http_operation` is set only operations reachable over HTTP
	/// (those carrying a URI template) qualify.
	fn operation(&self, resource_class: &str, name: &str, http_operation: bool) -> HalResult<Operation>;
}
