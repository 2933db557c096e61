//! Normalizer settings
//!
//! Settings can be built in code or loaded from a TOML table. Values given in
//! the per-call [`NormalizationContext`](crate::context::NormalizationContext)
//! take precedence over these.

use crate::error::HalResult;
use crate::recursive::DEFAULT_CIRCULAR_REFERENCE_LIMIT;
use serde::{Deserialize, Serialize};

/// Format identifier of the HAL normalizer
pub const FORMAT: &str = "jsonhal";

/// HAL normalizer settings
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalSettings {
	/// Format the normalizer answers to
	#[serde(default = "default_format")]
	pub format: String,

	/// How many times one object may be visited along a branch
	#[serde(default = "default_circular_reference_limit")]
	pub circular_reference_limit: usize,

	/// Enforce per-attribute maximum depths
	#[serde(default)]
	pub enable_max_depth: bool,

	/// Drop null states from documents
	#[serde(default)]
	pub skip_null_values: bool,
}

fn default_format() -> String {
	FORMAT.to_string()
}

fn default_circular_reference_limit() -> usize {
	DEFAULT_CIRCULAR_REFERENCE_LIMIT
}

impl Default for HalSettings {
	fn default() -> Self {
		Self {
			format: default_format(),
			circular_reference_limit: default_circular_reference_limit(),
			enable_max_depth: false,
			skip_null_values: false,
		}
	}
}

impl HalSettings {
	/// Create new settings with defaults
	pub fn new() -> Self {
		Self::default()
	}

	/// Load settings from a TOML document; missing keys keep their defaults
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_hal::config::HalSettings;
	///
	/// let settings = HalSettings::from_toml_str("circular_reference_limit = 3").unwrap();
	/// assert_eq!(settings.circular_reference_limit, 3);
	/// assert_eq!(settings.format, "jsonhal");
	/// assert!(!settings.enable_max_depth);
	/// ```
	pub fn from_toml_str(source: &str) -> HalResult<Self> {
		let settings = toml::from_str(source)?;
		tracing::debug!(?settings, "loaded HAL settings");
		Ok(settings)
	}

	pub fn with_circular_reference_limit(mut self, limit: usize) -> Self {
		self.circular_reference_limit = limit;
		self
	}

	pub fn with_max_depth(mut self, enabled: bool) -> Self {
		self.enable_max_depth = enabled;
		self
	}

	pub fn with_skip_null_values(mut self, skip: bool) -> Self {
		self.skip_null_values = skip;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::HalError;
	use rstest::rstest;

	#[rstest]
	fn test_defaults() {
		let settings = HalSettings::default();
		assert_eq!(settings.format, "jsonhal");
		assert_eq!(settings.circular_reference_limit, 1);
		assert!(!settings.enable_max_depth);
		assert!(!settings.skip_null_values);
	}

	#[rstest]
	fn test_empty_toml_gives_defaults() {
		assert_eq!(HalSettings::from_toml_str("").unwrap(), HalSettings::default());
	}

	#[rstest]
	fn test_full_toml() {
		let settings = HalSettings::from_toml_str(
			r#"
			format = "hal"
			circular_reference_limit = 2
			enable_max_depth = true
			skip_null_values = true
			"#,
		)
		.unwrap();

		assert_eq!(
			settings,
			HalSettings {
				format: "hal".to_string(),
				circular_reference_limit: 2,
				enable_max_depth: true,
				skip_null_values: true,
			}
		);
	}

	#[rstest]
	fn test_invalid_toml() {
		let err = HalSettings::from_toml_str("circular_reference_limit = \"many\"").unwrap_err();
		assert!(matches!(err, HalError::Settings(_)));
	}
}
