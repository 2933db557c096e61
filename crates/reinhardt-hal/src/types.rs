//! Declared attribute types
//!
//! An attribute declares one or more alternative types (a union such as
//! `Author | null`). Each alternative is a builtin scalar, a reference to an
//! object class, or a collection of another type.

use serde::{Deserialize, Serialize};

/// Builtin, non-object types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinType {
	Null,
	Bool,
	Int,
	Float,
	String,
	Mixed,
}

/// One alternative of a declared attribute type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
	/// A builtin scalar
	Scalar(BuiltinType),
	/// An object of the named class
	ObjectRef(String),
	/// A collection whose values have the inner type
	CollectionOf(Box<Type>),
}

impl Type {
	/// Shorthand for [`Type::Scalar`]
	pub fn scalar(builtin: BuiltinType) -> Self {
		Type::Scalar(builtin)
	}

	/// Shorthand for [`Type::ObjectRef`]
	pub fn object(class: impl Into<String>) -> Self {
		Type::ObjectRef(class.into())
	}

	/// Shorthand for [`Type::CollectionOf`]
	pub fn collection_of(value_type: Type) -> Self {
		Type::CollectionOf(Box::new(value_type))
	}

	/// Class name when this is an object reference
	pub fn class_name(&self) -> Option<&str> {
		match self {
			Type::ObjectRef(class) => Some(class),
			_ => None,
		}
	}
}

/// Ordered list of the alternatives an attribute may hold
///
/// # Examples
///
/// ```
/// use reinhardt_hal::types::{BuiltinType, Type, TypeDescriptor};
///
/// let author = TypeDescriptor::nullable(Type::object("Author"));
/// assert_eq!(author.types().len(), 2);
/// assert_eq!(author.types()[1], Type::scalar(BuiltinType::Null));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
	types: Vec<Type>,
}

impl TypeDescriptor {
	/// Descriptor with no declared type
	pub fn untyped() -> Self {
		Self { types: Vec::new() }
	}

	/// Descriptor with a single alternative
	pub fn of(ty: Type) -> Self {
		Self { types: vec![ty] }
	}

	/// Descriptor for a union, alternatives kept in declaration order
	pub fn union(types: impl IntoIterator<Item = Type>) -> Self {
		Self {
			types: types.into_iter().collect(),
		}
	}

	/// `ty | null`
	pub fn nullable(ty: Type) -> Self {
		Self::union([ty, Type::scalar(BuiltinType::Null)])
	}

	pub fn types(&self) -> &[Type] {
		&self.types
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}
}

impl From<Type> for TypeDescriptor {
	fn from(ty: Type) -> Self {
		Self::of(ty)
	}
}
