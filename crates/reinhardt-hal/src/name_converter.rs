//! Attribute name conversion

use crate::context::NormalizationContext;

/// Converts attribute names to their public form
pub trait NameConverter: Send + Sync {
	fn normalize(
		&self,
		name: &str,
		class: &str,
		format: Option<&str>,
		context: &NormalizationContext,
	) -> String;
}

/// `firstName` becomes `first_name`
///
/// # Examples
///
/// ```
/// use reinhardt_hal::context::NormalizationContext;
/// use reinhardt_hal::name_converter::{CamelCaseToSnakeCaseNameConverter, NameConverter};
///
/// let converter = CamelCaseToSnakeCaseNameConverter::new();
/// let context = NormalizationContext::new();
/// assert_eq!(converter.normalize("relatedBooks", "Author", None, &context), "related_books");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CamelCaseToSnakeCaseNameConverter {
	attributes: Option<Vec<String>>,
}

impl CamelCaseToSnakeCaseNameConverter {
	/// Convert every attribute
	pub fn new() -> Self {
		Self { attributes: None }
	}

	/// Convert only the listed attributes
	pub fn only<I, S>(attributes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			attributes: Some(attributes.into_iter().map(Into::into).collect()),
		}
	}

	fn to_snake_case(name: &str) -> String {
		let mut converted = String::with_capacity(name.len() + 4);
		for (i, ch) in name.chars().enumerate() {
			if ch.is_uppercase() {
				if i > 0 {
					converted.push('_');
				}
				converted.extend(ch.to_lowercase());
			} else {
				converted.push(ch);
			}
		}
		converted
	}
}

impl NameConverter for CamelCaseToSnakeCaseNameConverter {
	fn normalize(
		&self,
		name: &str,
		_class: &str,
		_format: Option<&str>,
		_context: &NormalizationContext,
	) -> String {
		match &self.attributes {
			Some(attributes) if !attributes.iter().any(|a| a == name) => name.to_string(),
			_ => Self::to_snake_case(name),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("title", "title")]
	#[case("firstName", "first_name")]
	#[case("ISBN", "i_s_b_n")]
	#[case("Author", "author")]
	#[case("already_snake", "already_snake")]
	fn test_to_snake_case(#[case] input: &str, #[case] expected: &str) {
		let converter = CamelCaseToSnakeCaseNameConverter::new();
		assert_eq!(
			converter.normalize(input, "Book", None, &NormalizationContext::new()),
			expected
		);
	}

	#[rstest]
	fn test_only_listed_attributes_are_converted() {
		let converter = CamelCaseToSnakeCaseNameConverter::only(["firstName"]);
		let context = NormalizationContext::new();
		assert_eq!(converter.normalize("firstName", "Author", None, &context), "first_name");
		assert_eq!(converter.normalize("lastName", "Author", None, &context), "lastName");
	}
}
