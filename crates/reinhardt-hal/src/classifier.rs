//! Relation classification
//!
//! Decides whether an attribute is a plain state, a to-one relation or a
//! to-many relation by walking its declared type alternatives in order.
//! A scalar alternative never settles the question: a later alternative of
//! the union may still be a resource (`null | Author`).

use crate::iri::ResourceClassResolver;
use crate::types::{Type, TypeDescriptor};

/// Outcome of classifying one attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
	/// Serialized as a plain state
	Attribute,
	/// Points to one resource of `target`
	SingleRelation { target: String },
	/// Points to a collection of resources of `target`
	CollectionRelation { target: String },
}

/// Classify an attribute from its declared types
///
/// The first alternative that qualifies as a relation wins; when none does
/// (including when no type is declared) the attribute is a plain state.
///
/// # Examples
///
/// ```
/// use reinhardt_hal::classifier::{classify, Classification};
/// use reinhardt_hal::iri::ResourceClassResolver;
/// use reinhardt_hal::resource::Resource;
/// use reinhardt_hal::types::{Type, TypeDescriptor};
/// use reinhardt_hal::HalResult;
///
/// struct Authors;
///
/// impl ResourceClassResolver for Authors {
///     fn is_resource_class(&self, class: &str) -> bool {
///         class == "Author"
///     }
///
///     fn resource_class(&self, object: &dyn Resource, _: Option<&str>) -> HalResult<String> {
///         Ok(object.class_name().to_string())
///     }
/// }
///
/// let author = TypeDescriptor::nullable(Type::object("Author"));
/// assert_eq!(
///     classify(&author, &Authors),
///     Classification::SingleRelation { target: "Author".to_string() },
/// );
/// ```
pub fn classify(types: &TypeDescriptor, resolver: &dyn ResourceClassResolver) -> Classification {
	for ty in types.types() {
		match ty {
			Type::CollectionOf(value_type) => {
				if let Some(target) = resource_target(value_type, resolver) {
					return Classification::CollectionRelation { target };
				}
			}
			other => {
				if let Some(target) = resource_target(other, resolver) {
					return Classification::SingleRelation { target };
				}
			}
		}
	}
	Classification::Attribute
}

fn resource_target(ty: &Type, resolver: &dyn ResourceClassResolver) -> Option<String> {
	ty.class_name()
		.filter(|class| resolver.is_resource_class(class))
		.map(str::to_string)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::HalResult;
	use crate::resource::Resource;
	use crate::types::BuiltinType;
	use rstest::rstest;

	struct KnownClasses(&'static [&'static str]);

	impl ResourceClassResolver for KnownClasses {
		fn is_resource_class(&self, class: &str) -> bool {
			self.0.iter().any(|known| *known == class)
		}

		fn resource_class(&self, object: &dyn Resource, _previous: Option<&str>) -> HalResult<String> {
			Ok(object.class_name().to_string())
		}
	}

	const RESOURCES: KnownClasses = KnownClasses(&["Author", "Tag"]);

	fn single(target: &str) -> Classification {
		Classification::SingleRelation {
			target: target.to_string(),
		}
	}

	fn many(target: &str) -> Classification {
		Classification::CollectionRelation {
			target: target.to_string(),
		}
	}

	#[rstest]
	#[case::untyped(TypeDescriptor::untyped(), Classification::Attribute)]
	#[case::scalar(TypeDescriptor::of(Type::scalar(BuiltinType::String)), Classification::Attribute)]
	#[case::non_resource_object(TypeDescriptor::of(Type::object("Money")), Classification::Attribute)]
	#[case::resource(TypeDescriptor::of(Type::object("Author")), single("Author"))]
	#[case::nullable_resource(TypeDescriptor::nullable(Type::object("Author")), single("Author"))]
	#[case::null_first(
		TypeDescriptor::union([Type::scalar(BuiltinType::Null), Type::object("Author")]),
		single("Author")
	)]
	#[case::collection(TypeDescriptor::of(Type::collection_of(Type::object("Tag"))), many("Tag"))]
	#[case::collection_of_scalars(
		TypeDescriptor::of(Type::collection_of(Type::scalar(BuiltinType::Int))),
		Classification::Attribute
	)]
	#[case::nested_collection(
		TypeDescriptor::of(Type::collection_of(Type::collection_of(Type::object("Tag")))),
		Classification::Attribute
	)]
	#[case::scalar_then_collection(
		TypeDescriptor::union([
			Type::scalar(BuiltinType::String),
			Type::collection_of(Type::object("Tag")),
		]),
		many("Tag")
	)]
	fn test_classify(#[case] types: TypeDescriptor, #[case] expected: Classification) {
		assert_eq!(classify(&types, &RESOURCES), expected);
	}

	#[rstest]
	fn test_first_relation_wins() {
		let types = TypeDescriptor::union([
			Type::object("Author"),
			Type::collection_of(Type::object("Tag")),
		]);
		assert_eq!(classify(&types, &RESOURCES), single("Author"));

		let reversed = TypeDescriptor::union([
			Type::collection_of(Type::object("Tag")),
			Type::object("Author"),
		]);
		assert_eq!(classify(&reversed, &RESOURCES), many("Tag"));
	}
}
