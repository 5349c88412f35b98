//! coursecraft-catalog: REST client for the university course catalog.
//!
//! Implements `CatalogSource` over three read-only resources: the subject
//! list, the courses of a subject, and a single course record.

pub mod client;

pub use client::HttpCatalog;
