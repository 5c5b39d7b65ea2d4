//! docs-enricher: enriches parsed documents with additional properties.
//!
//! - [`selector`] - path expressions addressing values in a property tree
//! - [`document`] - the property tree and the target-priority merge
//! - [`finder`] - lookups turning key/value pairs into additional properties
//! - [`enricher`] - static and selector-driven enrichers
//! - [`stage`] - one processing contract over blocking and non-blocking enrichers

pub mod config;
pub mod document;
pub mod enricher;
pub mod file;
pub mod finder;
pub mod selector;
pub mod stage;
