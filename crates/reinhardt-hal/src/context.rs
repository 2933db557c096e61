//! Per-call normalization context
//!
//! A context is created by the caller for one top-level `normalize` call and
//! threaded through the whole call tree. Child contexts are copies, so the
//! circular reference and depth counters recorded along one branch are seen
//! by its descendants but never by siblings or by later, independent calls.

use crate::iri::Operation;
use crate::resource::ObjectId;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Context for one normalization pass
///
/// # Examples
///
/// ```
/// use reinhardt_hal::context::NormalizationContext;
///
/// let context = NormalizationContext::new()
///     .with_groups(["book:read"])
///     .with_circular_reference_limit(2);
///
/// let child = context.child("author");
/// assert!(child.is_sub_level());
/// assert_eq!(child.attribute(), Some("author"));
/// assert_eq!(child.circular_reference_limit(), Some(2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NormalizationContext {
	cache_key: Option<String>,
	resource_class: Option<String>,
	groups: Option<Vec<String>>,
	circular_reference_limit: Option<usize>,
	enable_max_depth: Option<bool>,
	skip_null_values: Option<bool>,
	iri: Option<String>,
	operation: Option<Operation>,
	attribute: Option<String>,
	sub_level: bool,
	circular_reference_counters: HashMap<ObjectId, usize>,
	depth_counters: HashMap<(String, String), usize>,
}

impl NormalizationContext {
	pub fn new() -> Self {
		Self::default()
	}

	/// Use an explicit cache key instead of the derived one
	pub fn with_cache_key(mut self, cache_key: impl Into<String>) -> Self {
		self.cache_key = Some(cache_key.into());
		self
	}

	/// Class the caller expects the object to be normalized as
	pub fn with_resource_class(mut self, resource_class: impl Into<String>) -> Self {
		self.resource_class = Some(resource_class.into());
		self
	}

	/// Restrict serialization to the given groups
	pub fn with_groups<I, S>(mut self, groups: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.groups = Some(groups.into_iter().map(Into::into).collect());
		self
	}

	/// Override the configured circular reference limit for this call
	pub fn with_circular_reference_limit(mut self, limit: usize) -> Self {
		self.circular_reference_limit = Some(limit);
		self
	}

	/// Enable or disable max-depth enforcement for this call
	pub fn with_max_depth(mut self, enabled: bool) -> Self {
		self.enable_max_depth = Some(enabled);
		self
	}

	/// Drop null states from the output
	pub fn with_skip_null_values(mut self, skip: bool) -> Self {
		self.skip_null_values = Some(skip);
		self
	}

	/// Operation the object is normalized for
	pub fn with_operation(mut self, operation: Operation) -> Self {
		self.operation = Some(operation);
		self
	}

	pub fn cache_key(&self) -> Option<&str> {
		self.cache_key.as_deref()
	}

	pub fn resource_class(&self) -> Option<&str> {
		self.resource_class.as_deref()
	}

	pub fn groups(&self) -> Option<&[String]> {
		self.groups.as_deref()
	}

	pub fn circular_reference_limit(&self) -> Option<usize> {
		self.circular_reference_limit
	}

	pub fn max_depth_enabled(&self) -> Option<bool> {
		self.enable_max_depth
	}

	pub fn skip_null_values(&self) -> Option<bool> {
		self.skip_null_values
	}

	/// IRI of the object currently being normalized
	pub fn iri(&self) -> Option<&str> {
		self.iri.as_deref()
	}

	pub fn operation(&self) -> Option<&Operation> {
		self.operation.as_ref()
	}

	/// Attribute of the parent object this context was created for
	pub fn attribute(&self) -> Option<&str> {
		self.attribute.as_deref()
	}

	/// Whether this context belongs to a nested object
	pub fn is_sub_level(&self) -> bool {
		self.sub_level
	}

	/// Visits recorded for `object` along the current branch
	pub fn circular_reference_count(&self, object: ObjectId) -> Option<usize> {
		self.circular_reference_counters.get(&object).copied()
	}

	/// Depth recorded for `attribute` of `class` along the current branch
	pub fn depth(&self, class: &str, attribute: &str) -> Option<usize> {
		self.depth_counters
			.get(&(class.to_string(), attribute.to_string()))
			.copied()
	}

	/// Context for normalizing the value of `attribute`
	///
	/// Counters are copied, the cache key is suffixed with the attribute name
	/// and the IRI and operation of the parent are cleared.
	pub fn child(&self, attribute: &str) -> Self {
		let mut child = self.clone();
		child.cache_key = self
			.cache_key
			.as_ref()
			.map(|key| format!("{}-{}", key, attribute));
		child.iri = None;
		child.operation = None;
		child.attribute = Some(attribute.to_string());
		child.sub_level = true;
		child
	}

	/// Cache key derived from the format and the options that affect how
	/// attributes are classified
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal::context::NormalizationContext;
	///
	/// let read = NormalizationContext::new().with_groups(["read"]);
	/// let admin = NormalizationContext::new().with_groups(["admin"]);
	///
	/// assert_eq!(
	///     read.compute_cache_key(Some("jsonhal")),
	///     read.clone().compute_cache_key(Some("jsonhal")),
	/// );
	/// assert_ne!(
	///     read.compute_cache_key(Some("jsonhal")),
	///     admin.compute_cache_key(Some("jsonhal")),
	/// );
	/// ```
	pub fn compute_cache_key(&self, format: Option<&str>) -> String {
		let mut hasher = Sha256::new();
		hasher.update(format.unwrap_or_default().as_bytes());
		hasher.update(b"\0");
		hasher.update(self.resource_class.as_deref().unwrap_or_default().as_bytes());
		hasher.update(b"\0");
		match &self.groups {
			Some(groups) => {
				let mut sorted: Vec<&str> = groups.iter().map(String::as_str).collect();
				sorted.sort_unstable();
				for group in sorted {
					hasher.update(group.as_bytes());
					hasher.update(b",");
				}
			}
			None => hasher.update(b"*"),
		}
		hasher.update(b"\0");
		hasher.update([u8::from(self.enable_max_depth.unwrap_or(false))]);
		format!("{:x}", hasher.finalize())
	}

	pub(crate) fn set_cache_key(&mut self, cache_key: String) {
		self.cache_key = Some(cache_key);
	}

	pub(crate) fn set_resource_class(&mut self, resource_class: Option<String>) {
		self.resource_class = resource_class;
	}

	pub(crate) fn set_iri(&mut self, iri: String) {
		self.iri = Some(iri);
	}

	pub(crate) fn set_operation(&mut self, operation: Option<Operation>) {
		self.operation = operation;
	}

	pub(crate) fn circular_reference_counters_mut(&mut self) -> &mut HashMap<ObjectId, usize> {
		&mut self.circular_reference_counters
	}

	pub(crate) fn depth_counters_mut(&mut self) -> &mut HashMap<(String, String), usize> {
		&mut self.depth_counters
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_child_suffixes_cache_key() {
		let context = NormalizationContext::new().with_cache_key("abc");
		let child = context.child("author").child("books");
		assert_eq!(child.cache_key(), Some("abc-author-books"));
	}

	#[rstest]
	fn test_child_without_cache_key_stays_without() {
		let child = NormalizationContext::new().child("author");
		assert_eq!(child.cache_key(), None);
	}

	#[rstest]
	fn test_child_clears_iri_and_operation() {
		let mut context =
			NormalizationContext::new().with_operation(Operation::new("get", "Book"));
		context.set_iri("/books/1".to_string());

		let child = context.child("author");
		assert!(child.iri().is_none());
		assert!(child.operation().is_none());
		assert_eq!(context.iri(), Some("/books/1"));
	}

	#[rstest]
	fn test_child_copies_counters_without_sharing() {
		let mut context = NormalizationContext::new();
		context.depth_counters_mut().insert(("Book".into(), "author".into()), 1);

		let mut child = context.child("author");
		child.depth_counters_mut().insert(("Book".into(), "author".into()), 2);

		assert_eq!(context.depth("Book", "author"), Some(1));
		assert_eq!(child.depth("Book", "author"), Some(2));
	}

	#[rstest]
	fn test_cache_key_ignores_group_order() {
		let a = NormalizationContext::new().with_groups(["read", "admin"]);
		let b = NormalizationContext::new().with_groups(["admin", "read"]);
		assert_eq!(a.compute_cache_key(None), b.compute_cache_key(None));
	}

	#[rstest]
	fn test_cache_key_depends_on_format() {
		let context = NormalizationContext::new();
		assert_ne!(
			context.compute_cache_key(Some("jsonhal")),
			context.compute_cache_key(Some("json"))
		);
		assert_eq!(context.compute_cache_key(None).len(), 64);
	}
}
