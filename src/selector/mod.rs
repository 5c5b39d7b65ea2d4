//! Property selectors: a small path language for addressing values in a
//! property tree.
//!
//! # Syntax
//!
//! ```text
//! selector := segment ('.' segment)*
//! segment  := name ('[' (digit+ | '*') ']')?
//! ```
//!
//! - `name` - the value under a key of a mapping (any characters except `.`, `[` and `]`)
//! - `name[2]` - the element at an index of the sequence under `name`
//! - `name[*]` - every element of the sequence under `name`
//!
//! # Examples
//!
//! ```text
//! id                 - the `id` property of the root
//! authors[0]         - the first author
//! authors[*].id      - the id of every author
//! document.meta.type - a nested property
//! ```
//!
//! Selection is permissive: a path that does not exist in the tree selects
//! nothing rather than failing. Only compiling a malformed expression is an
//! error.

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use ast::{Segment, Selector};
pub use error::SelectorError;
pub use evaluator::{select_all, Evaluator, Resolved};
pub use parser::Parser;
