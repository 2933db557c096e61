//! Documentation error types.

use thiserror::Error;

/// Result type for documentation options and generation.
pub type OpenApiResult<T> = Result<T, OpenApiError>;

/// Errors raised while loading options or generating documentation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OpenApiError {
	/// The configured OAuth flow is not one of the supported grant types.
	#[error("invalid OAuth flow \"{0}\" (expected implicit, password, clientCredentials or authorizationCode)")]
	InvalidOAuthFlow(String),

	/// The configured API key location is not query, header or cookie.
	#[error("invalid API key location \"{0}\" (expected query, header or cookie)")]
	InvalidApiKeyLocation(String),

	/// Options could not be parsed.
	#[error("settings error: {0}")]
	Settings(#[from] toml::de::Error),

	/// The document could not be rendered.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_invalid_oauth_flow_display() {
		let err = OpenApiError::InvalidOAuthFlow("magic".to_string());
		assert!(err.to_string().starts_with("invalid OAuth flow \"magic\""));
	}

	#[rstest]
	fn test_json_error_conversion() {
		let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
		let err: OpenApiError = json_err.into();
		assert!(matches!(err, OpenApiError::Json(_)));
	}
}
