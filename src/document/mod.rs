//! Document model: property trees, parsed documents and tree merging.

pub mod merge;
pub mod node;
pub mod parsed;

pub use merge::TreeMerge;
pub use node::{PropertyMap, PropertyNumber, PropertyValue, ValueKind};
pub use parsed::{Document, ParsedDocument};
