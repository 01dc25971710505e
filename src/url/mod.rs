//! URL handling module for Sumi-Sift
//!
//! URLs arrive from the provider as loose strings, often without a scheme.
//! This module turns them into something the HTTP client can request.

mod normalize;

// Re-export main functions
pub use normalize::{has_recognized_scheme, normalize_scheme, DEFAULT_SCHEME_PREFIX};
