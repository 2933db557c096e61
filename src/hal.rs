//! HAL normalization module.
//!
//! This module provides the HAL item normalizer and its collaborators.
//!
//! # Examples
//!
//! ```rust,no_run
//! use reinhardt_hypermedia::hal::{ItemNormalizer, NormalizationContext};
//! ```

#[cfg(feature = "hal")]
pub use reinhardt_hal::*;
