//! Serializer facade
//!
//! Provides the `Serializer` trait and [`HalSerializer`], which renders a
//! resource to a HAL JSON string through an [`ItemNormalizer`].

use crate::context::NormalizationContext;
use crate::error::{HalError, HalResult};
use crate::normalizer::ItemNormalizer;
use crate::resource::ResourceRef;
use std::sync::Arc;

/// Converts between an input and its serialized representation
///
/// # Type Parameters
///
/// - `Input`: The source type to serialize
/// - `Output`: The target serialized representation
pub trait Serializer {
	type Input;
	type Output;

	fn serialize(&self, input: &Self::Input) -> HalResult<Self::Output>;
	fn deserialize(&self, output: &Self::Output) -> HalResult<Self::Input>;
}

/// Renders resources as HAL JSON strings
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use reinhardt_hal::normalizer::ItemNormalizer;
/// use reinhardt_hal::registry::{InMemoryResourceRegistry, ResourceDefinition};
/// use reinhardt_hal::resource::{AttributeValue, ResourceObject, ResourceRef};
/// use reinhardt_hal::serializer::{HalSerializer, Serializer};
///
/// let registry = Arc::new(
///     InMemoryResourceRegistry::new().register(ResourceDefinition::new("Book", "/books/{id}")),
/// );
/// let normalizer = Arc::new(ItemNormalizer::builder().with_registry(registry).build().unwrap());
/// let serializer = HalSerializer::new(normalizer);
///
/// let book: ResourceRef = Arc::new(ResourceObject::new("Book").with_attribute("id", AttributeValue::scalar(1)));
/// let json = serializer.serialize(&book).unwrap();
/// assert_eq!(json, r#"{"_links":{"self":{"href":"/books/1"}},"id":1}"#);
/// assert!(serializer.deserialize(&json).is_err());
/// ```
#[derive(Clone)]
pub struct HalSerializer {
	normalizer: Arc<ItemNormalizer>,
	context: NormalizationContext,
	pretty: bool,
}

impl HalSerializer {
	pub fn new(normalizer: Arc<ItemNormalizer>) -> Self {
		Self {
			normalizer,
			context: NormalizationContext::new(),
			pretty: false,
		}
	}

	/// Context each serialization starts from
	pub fn with_context(mut self, context: NormalizationContext) -> Self {
		self.context = context;
		self
	}

	/// Indent the output
	pub fn pretty(mut self) -> Self {
		self.pretty = true;
		self
	}
}

impl Serializer for HalSerializer {
	type Input = ResourceRef;
	type Output = String;

	fn serialize(&self, input: &Self::Input) -> HalResult<Self::Output> {
		let document = self.normalizer.normalize(
			input.as_ref(),
			Some(self.normalizer.format()),
			&self.context,
		)?;

		let rendered = if self.pretty {
			serde_json::to_string_pretty(&document)?
		} else {
			serde_json::to_string(&document)?
		};
		Ok(rendered)
	}

	fn deserialize(&self, _output: &Self::Output) -> HalResult<Self::Input> {
		Err(HalError::UnsupportedOperation {
			format: self.normalizer.format().to_string(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::registry::{InMemoryResourceRegistry, ResourceDefinition};
	use crate::resource::{AttributeValue, ResourceObject};
	use rstest::{fixture, rstest};

	#[fixture]
	fn serializer() -> HalSerializer {
		let registry = Arc::new(
			InMemoryResourceRegistry::new().register(ResourceDefinition::new("Author", "/authors/{id}")),
		);
		let normalizer = ItemNormalizer::builder()
			.with_registry(registry)
			.build()
			.unwrap();
		HalSerializer::new(Arc::new(normalizer))
	}

	fn author() -> ResourceRef {
		Arc::new(
			ResourceObject::new("Author")
				.with_attribute("id", AttributeValue::scalar(7))
				.with_attribute("name", AttributeValue::scalar("Frank Herbert")),
		)
	}

	#[rstest]
	fn test_serialize_keeps_key_order(serializer: HalSerializer) {
		assert_eq!(
			serializer.serialize(&author()).unwrap(),
			r#"{"_links":{"self":{"href":"/authors/7"}},"id":7,"name":"Frank Herbert"}"#
		);
	}

	#[rstest]
	fn test_pretty_output(serializer: HalSerializer) {
		let rendered = serializer.pretty().serialize(&author()).unwrap();
		assert!(rendered.starts_with("{\n"));
		assert!(rendered.contains("\"href\": \"/authors/7\""));
	}

	#[rstest]
	fn test_context_is_applied(serializer: HalSerializer) {
		let author: ResourceRef = Arc::new(
			ResourceObject::new("Author")
				.with_attribute("id", AttributeValue::scalar(7))
				.with_attribute("bio", AttributeValue::Null),
		);
		let rendered = serializer
			.with_context(NormalizationContext::new().with_skip_null_values(true))
			.serialize(&author)
			.unwrap();
		assert!(!rendered.contains("bio"));
	}

	#[rstest]
	fn test_deserialize_is_unsupported(serializer: HalSerializer) {
		let err = serializer.deserialize(&"{}".to_string()).unwrap_err();
		assert!(matches!(err, HalError::UnsupportedOperation { .. }));
	}
}
