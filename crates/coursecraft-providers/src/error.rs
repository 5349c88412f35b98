//! Provider error types.
//!
//! The enum itself lives in `coursecraft-core` so callers holding only an
//! `anyhow::Error` from the provider trait can downcast it.

pub use coursecraft_core::error::ProviderError;
