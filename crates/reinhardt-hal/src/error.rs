//! HAL normalization error types.

use thiserror::Error;

/// Result type for HAL normalization.
pub type HalResult<T> = Result<T, HalError>;

/// Errors raised while normalizing a resource graph.
///
/// Collaborator failures (resource class resolution, metadata lookup, IRI
/// generation) use the dedicated variants and travel through the engine
/// unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
	/// Denormalization was requested on an output-only format.
	#[error("denormalization is not supported by the \"{format}\" format")]
	UnsupportedOperation {
		/// Format that refused the operation.
		format: String,
	},

	/// The circular reference limit was exceeded and no handler is configured.
	#[error(
		"a circular reference has been detected when serializing an object of class \"{class}\" (configured limit: {limit})"
	)]
	CircularReference {
		/// Class of the object seen too many times.
		class: String,
		/// Configured visit limit.
		limit: usize,
	},

	/// A relation value is neither an IRI nor a document carrying a self link.
	#[error("unexpected value shape: {message}")]
	UnexpectedShape {
		/// Description of the offending value.
		message: String,
	},

	/// The class is not a registered resource class.
	#[error("resource class not found: {0}")]
	ResourceClassNotFound(String),

	/// The named operation does not exist on the resource class.
	#[error("operation \"{operation}\" not found for resource class \"{class}\"")]
	OperationNotFound {
		/// Resource class.
		class: String,
		/// Operation name.
		operation: String,
	},

	/// No IRI can be generated for the object.
	#[error("unable to generate an IRI for an object of class \"{class}\": {message}")]
	InvalidIri {
		/// Class of the object.
		class: String,
		/// Reason.
		message: String,
	},

	/// The normalizer was assembled with missing or inconsistent parts.
	#[error("invalid configuration: {0}")]
	Configuration(String),

	/// Settings could not be parsed.
	#[error("settings error: {0}")]
	Settings(#[from] toml::de::Error),

	/// A document could not be rendered.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl HalError {
	/// Create an [`HalError::UnexpectedShape`] error.
	pub fn unexpected_shape(message: impl Into<String>) -> Self {
		HalError::UnexpectedShape {
			message: message.into(),
		}
	}

	/// Check if this is a circular reference error
	pub fn is_circular_reference(&self) -> bool {
		matches!(self, HalError::CircularReference { .. })
	}
}
