//! coursecraft-core: Course model, answer evaluation, and session state.
//!
//! This crate defines the data model, traits, and the pure state machines
//! (lesson session and catalog navigation) that the rest of coursecraft
//! builds on.

pub mod catalog;
pub mod error;
pub mod evaluator;
pub mod exercise;
pub mod model;
pub mod navigator;
pub mod parser;
pub mod session;
pub mod traits;
pub mod tutor;
