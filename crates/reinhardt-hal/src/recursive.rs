//! Recursion guards
//!
//! Circular reference detection counts visits of each object along the
//! current branch of the call tree; depth enforcement counts how deep an
//! attribute of a class has been followed. Both keep their counters in the
//! [`NormalizationContext`].

use crate::context::NormalizationContext;
use crate::error::HalResult;
use crate::iri::{IriConverter, UrlReferenceType};
use crate::resource::Resource;
use serde_json::{Value, json};
use std::sync::Arc;

/// Visit limit used when neither the context nor the settings provide one
pub const DEFAULT_CIRCULAR_REFERENCE_LIMIT: usize = 1;

/// Decides what to emit instead of an object seen too many times
pub trait CircularReferenceHandler: Send + Sync {
	fn handle(
		&self,
		object: &dyn Resource,
		format: Option<&str>,
		context: &NormalizationContext,
	) -> HalResult<Value>;
}

/// Replaces the object by a document holding only its self link
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use reinhardt_hal::context::NormalizationContext;
/// use reinhardt_hal::recursive::{CircularReferenceHandler, SelfLinkHandler};
/// use reinhardt_hal::registry::{InMemoryResourceRegistry, ResourceDefinition};
/// use reinhardt_hal::resource::{AttributeValue, ResourceObject};
/// use serde_json::json;
///
/// let registry = Arc::new(
///     InMemoryResourceRegistry::new().register(ResourceDefinition::new("Book", "/books/{id}")),
/// );
/// let handler = SelfLinkHandler::new(registry);
///
/// let book = ResourceObject::new("Book")
///     .with_attribute("id", AttributeValue::scalar(1))
///     .with_attribute("title", AttributeValue::scalar("Dune"));
/// let stub = handler
///     .handle(&book, Some("jsonhal"), &NormalizationContext::new())
///     .unwrap();
///
/// assert_eq!(stub, json!({"_links": {"self": {"href": "/books/1"}}}));
/// ```
pub struct SelfLinkHandler {
	iri_converter: Arc<dyn IriConverter>,
}

impl SelfLinkHandler {
	pub fn new(iri_converter: Arc<dyn IriConverter>) -> Self {
		Self { iri_converter }
	}
}

impl CircularReferenceHandler for SelfLinkHandler {
	fn handle(
		&self,
		object: &dyn Resource,
		_format: Option<&str>,
		context: &NormalizationContext,
	) -> HalResult<Value> {
		let iri = self.iri_converter.iri_from_resource(
			object,
			UrlReferenceType::AbsPath,
			None,
			context,
		)?;
		Ok(json!({ "_links": { "self": { "href": iri } } }))
	}
}

/// Helper functions for circular reference detection
pub mod circular {
	use super::*;
	use crate::resource::ObjectId;

	/// Record a visit of `object` and report whether the limit is exceeded
	///
	/// The first visit records 1; later visits increment the counter while it
	/// is below `limit`. Once the counter has reached `limit` the entry is
	/// removed and `true` is returned.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal::context::NormalizationContext;
	/// use reinhardt_hal::recursive::circular;
	/// use reinhardt_hal::resource::ResourceObject;
	///
	/// let book = ResourceObject::new("Book");
	/// let mut context = NormalizationContext::new();
	///
	/// assert!(!circular::is_circular_reference(&mut context, &book, 2));
	/// assert!(!circular::is_circular_reference(&mut context, &book, 2));
	/// assert!(circular::is_circular_reference(&mut context, &book, 2));
	/// // The counter starts over afterwards
	/// assert!(!circular::is_circular_reference(&mut context, &book, 2));
	/// ```
	pub fn is_circular_reference(
		context: &mut NormalizationContext,
		object: &dyn Resource,
		limit: usize,
	) -> bool {
		let id = ObjectId::of(object);
		let counters = context.circular_reference_counters_mut();

		match counters.get(&id).copied() {
			Some(count) if count >= limit => {
				counters.remove(&id);
				true
			}
			Some(count) => {
				counters.insert(id, count + 1);
				false
			}
			None => {
				counters.insert(id, 1);
				false
			}
		}
	}
}

/// Helper functions for depth management
pub mod depth {
	use super::*;
	use crate::metadata::AttributeDepthMetadata;

	/// Whether `attribute` of `class` has reached its maximum depth
	///
	/// Attributes without a declared maximum are never limited. The first
	/// visit records depth 1; a recorded depth equal to the maximum denies,
	/// anything below is incremented and allowed.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal::context::NormalizationContext;
	/// use reinhardt_hal::metadata::StaticDepthMetadata;
	/// use reinhardt_hal::recursive::depth;
	///
	/// let metadata = StaticDepthMetadata::new().with_max_depth("Category", "parent", 2);
	/// let mut context = NormalizationContext::new();
	///
	/// assert!(!depth::is_max_depth_reached(&metadata, "Category", "parent", &mut context));
	/// assert!(!depth::is_max_depth_reached(&metadata, "Category", "parent", &mut context));
	/// assert!(depth::is_max_depth_reached(&metadata, "Category", "parent", &mut context));
	/// ```
	pub fn is_max_depth_reached(
		metadata: &dyn AttributeDepthMetadata,
		class: &str,
		attribute: &str,
		context: &mut NormalizationContext,
	) -> bool {
		let Some(max_depth) = metadata.max_depth(class, attribute) else {
			return false;
		};

		let counters = context.depth_counters_mut();
		let key = (class.to_string(), attribute.to_string());

		match counters.get(&key).copied() {
			None => {
				counters.insert(key, 1);
				false
			}
			Some(depth) if depth == max_depth => true,
			Some(depth) => {
				counters.insert(key, depth + 1);
				false
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::circular::*;
	use super::depth::*;
	use super::*;
	use crate::metadata::StaticDepthMetadata;
	use crate::resource::{ObjectId, ResourceObject};
	use rstest::rstest;

	#[rstest]
	fn test_limit_one_trips_on_second_visit() {
		let book = ResourceObject::new("Book");
		let mut context = NormalizationContext::new();

		assert!(!is_circular_reference(&mut context, &book, 1));
		assert_eq!(context.circular_reference_count(ObjectId::of(&book)), Some(1));

		assert!(is_circular_reference(&mut context, &book, 1));
		assert_eq!(context.circular_reference_count(ObjectId::of(&book)), None);
	}

	#[rstest]
	fn test_distinct_objects_have_distinct_counters() {
		let first = ResourceObject::new("Book");
		let second = ResourceObject::new("Book");
		let mut context = NormalizationContext::new();

		assert!(!is_circular_reference(&mut context, &first, 1));
		assert!(!is_circular_reference(&mut context, &second, 1));
	}

	#[rstest]
	fn test_counters_follow_child_contexts_only() {
		let book = ResourceObject::new("Book");
		let mut parent = NormalizationContext::new();
		assert!(!is_circular_reference(&mut parent, &book, 1));

		let mut child = parent.child("related");
		assert!(is_circular_reference(&mut child, &book, 1));

		// The sibling branch still sees the parent's single visit
		let mut sibling = parent.child("other");
		assert!(is_circular_reference(&mut sibling, &book, 1));
	}

	#[rstest]
	fn test_unlimited_attribute_is_never_reached() {
		let metadata = StaticDepthMetadata::new();
		let mut context = NormalizationContext::new();
		for _ in 0..10 {
			assert!(!is_max_depth_reached(&metadata, "Category", "parent", &mut context));
		}
		assert_eq!(context.depth("Category", "parent"), None);
	}

	#[rstest]
	fn test_max_depth_one() {
		let metadata = StaticDepthMetadata::new().with_max_depth("Category", "parent", 1);
		let mut context = NormalizationContext::new();

		assert!(!is_max_depth_reached(&metadata, "Category", "parent", &mut context));
		assert_eq!(context.depth("Category", "parent"), Some(1));

		let mut child = context.child("parent");
		assert!(is_max_depth_reached(&metadata, "Category", "parent", &mut child));
		// Denial leaves the counter where it was
		assert_eq!(child.depth("Category", "parent"), Some(1));
	}

	#[rstest]
	fn test_depth_is_tracked_per_class_and_attribute() {
		let metadata = StaticDepthMetadata::new()
			.with_max_depth("Category", "parent", 1)
			.with_max_depth("Category", "children", 1);
		let mut context = NormalizationContext::new();

		assert!(!is_max_depth_reached(&metadata, "Category", "parent", &mut context));
		assert!(!is_max_depth_reached(&metadata, "Category", "children", &mut context));
		assert!(is_max_depth_reached(&metadata, "Category", "parent", &mut context));
	}
}
