//! States projection
//!
//! The item normalizer delegates the plain attributes of an object to a
//! [`StateNormalizer`] and wraps its result into the HAL envelope.

use crate::context::NormalizationContext;
use crate::error::{HalError, HalResult};
use crate::name_converter::NameConverter;
use crate::resource::{AttributeValue, Resource};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Produces the payload of the plain attributes of an object
///
/// A result that is not a JSON object is returned by the item normalizer
/// as-is, without links.
pub trait StateNormalizer: Send + Sync {
	fn normalize_states(
		&self,
		object: &dyn Resource,
		states: &[String],
		format: Option<&str>,
		context: &NormalizationContext,
	) -> HalResult<Value>;
}

/// Reads each state attribute from the object into a JSON object
///
/// # Examples
///
/// ```
/// use reinhardt_hal::context::NormalizationContext;
/// use reinhardt_hal::resource::{AttributeValue, ResourceObject};
/// use reinhardt_hal::state::{AttributeStateNormalizer, StateNormalizer};
/// use serde_json::json;
///
/// let book = ResourceObject::new("Book")
///     .with_attribute("title", AttributeValue::scalar("Dune"))
///     .with_attribute("subtitle", AttributeValue::Null);
///
/// let normalizer = AttributeStateNormalizer::new().with_skip_null_values(true);
/// let states = ["title".to_string(), "subtitle".to_string()];
/// let payload = normalizer
///     .normalize_states(&book, &states, None, &NormalizationContext::new())
///     .unwrap();
///
/// assert_eq!(payload, json!({"title": "Dune"}));
/// ```
#[derive(Clone, Default)]
pub struct AttributeStateNormalizer {
	name_converter: Option<Arc<dyn NameConverter>>,
	skip_null_values: bool,
}

impl AttributeStateNormalizer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_name_converter(mut self, name_converter: Arc<dyn NameConverter>) -> Self {
		self.name_converter = Some(name_converter);
		self
	}

	/// Default used when the context does not say otherwise
	pub fn with_skip_null_values(mut self, skip: bool) -> Self {
		self.skip_null_values = skip;
		self
	}

	fn to_json(class: &str, attribute: &str, value: AttributeValue) -> HalResult<Value> {
		match value {
			AttributeValue::Null => Ok(Value::Null),
			AttributeValue::Scalar(value) => Ok(value),
			AttributeValue::Collection(items) => items
				.into_iter()
				.map(|item| Self::to_json(class, attribute, item))
				.collect::<HalResult<Vec<_>>>()
				.map(Value::Array),
			AttributeValue::Resource(resource) => Err(HalError::unexpected_shape(format!(
				"state \"{}\" of \"{}\" holds a \"{}\" resource",
				attribute,
				class,
				resource.class_name()
			))),
		}
	}
}

impl StateNormalizer for AttributeStateNormalizer {
	fn normalize_states(
		&self,
		object: &dyn Resource,
		states: &[String],
		format: Option<&str>,
		context: &NormalizationContext,
	) -> HalResult<Value> {
		let class = context.resource_class().unwrap_or(object.class_name());
		let skip_null_values = context.skip_null_values().unwrap_or(self.skip_null_values);
		let mut payload = Map::new();

		for attribute in states {
			let value = Self::to_json(
				class,
				attribute,
				object.attribute(attribute).unwrap_or(AttributeValue::Null),
			)?;

			if skip_null_values && value.is_null() {
				continue;
			}

			let key = match &self.name_converter {
				Some(converter) => converter.normalize(attribute, class, format, context),
				None => attribute.clone(),
			};
			payload.insert(key, value);
		}

		Ok(Value::Object(payload))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::name_converter::CamelCaseToSnakeCaseNameConverter;
	use crate::resource::ResourceObject;
	use rstest::rstest;
	use serde_json::json;

	fn states(names: &[&str]) -> Vec<String> {
		names.iter().map(|n| n.to_string()).collect()
	}

	#[rstest]
	fn test_states_keep_order_and_skip_unlisted() {
		let book = ResourceObject::new("Book")
			.with_attribute("isbn", AttributeValue::scalar("978-0441013593"))
			.with_attribute("title", AttributeValue::scalar("Dune"))
			.with_attribute("pages", AttributeValue::scalar(412));

		let payload = AttributeStateNormalizer::new()
			.normalize_states(&book, &states(&["title", "isbn"]), None, &NormalizationContext::new())
			.unwrap();

		assert_eq!(
			serde_json::to_string(&payload).unwrap(),
			r#"{"title":"Dune","isbn":"978-0441013593"}"#
		);
	}

	#[rstest]
	fn test_missing_attribute_is_null() {
		let book = ResourceObject::new("Book");
		let payload = AttributeStateNormalizer::new()
			.normalize_states(&book, &states(&["title"]), None, &NormalizationContext::new())
			.unwrap();
		assert_eq!(payload, json!({"title": null}));
	}

	#[rstest]
	#[case(None, true)]
	#[case(Some(false), false)]
	fn test_context_overrides_skip_null_values(#[case] context_value: Option<bool>, #[case] skipped: bool) {
		let book = ResourceObject::new("Book").with_attribute("subtitle", AttributeValue::Null);
		let mut context = NormalizationContext::new();
		if let Some(skip) = context_value {
			context = context.with_skip_null_values(skip);
		}

		let payload = AttributeStateNormalizer::new()
			.with_skip_null_values(true)
			.normalize_states(&book, &states(&["subtitle"]), None, &context)
			.unwrap();

		assert_eq!(payload.get("subtitle").is_none(), skipped);
	}

	#[rstest]
	fn test_name_converter_applies_to_states() {
		let author = ResourceObject::new("Author").with_attribute("firstName", AttributeValue::scalar("Frank"));
		let payload = AttributeStateNormalizer::new()
			.with_name_converter(Arc::new(CamelCaseToSnakeCaseNameConverter::new()))
			.normalize_states(&author, &states(&["firstName"]), None, &NormalizationContext::new())
			.unwrap();
		assert_eq!(payload, json!({"first_name": "Frank"}));
	}

	#[rstest]
	fn test_scalar_collections_are_arrays() {
		let book = ResourceObject::new("Book").with_attribute(
			"keywords",
			AttributeValue::Collection(vec![AttributeValue::scalar("spice"), AttributeValue::scalar("desert")]),
		);
		let payload = AttributeStateNormalizer::new()
			.normalize_states(&book, &states(&["keywords"]), None, &NormalizationContext::new())
			.unwrap();
		assert_eq!(payload, json!({"keywords": ["spice", "desert"]}));
	}

	#[rstest]
	fn test_resource_state_is_rejected() {
		let author = ResourceObject::new("Author").into_ref();
		let book = ResourceObject::new("Book").with_attribute("author", AttributeValue::resource(author));

		let err = AttributeStateNormalizer::new()
			.normalize_states(&book, &states(&["author"]), None, &NormalizationContext::new())
			.unwrap_err();
		assert!(matches!(err, HalError::UnexpectedShape { .. }));
	}
}
