//! Compiled selector types.

use super::error::SelectorError;
use super::parser::Parser;
use std::fmt;
use std::str::FromStr;

/// A single step of a selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Named child of a mapping (`name`)
    Field(String),
    /// Element of a sequence (`[3]`)
    Index(usize),
    /// Every element of a sequence (`[*]`)
    Wildcard,
}

/// A compiled selector expression.
///
/// The canonical string form is computed once on construction; it doubles as
/// the key of lookup-key maps, so `Display` and `as_str` are free.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    segments: Vec<Segment>,
    expression: String,
}

impl Selector {
    /// Compiles a selector expression.
    ///
    /// # Example
    ///
    /// ```
    /// use docs_enricher::selector::{Segment, Selector};
    ///
    /// let selector = Selector::parse("authors[*].id").unwrap();
    /// assert_eq!(selector.segments()[1], Segment::Wildcard);
    /// assert_eq!(selector.to_string(), "authors[*].id");
    ///
    /// assert!(Selector::parse("authors[").is_err());
    /// ```
    pub fn parse(expression: &str) -> Result<Self, SelectorError> {
        Parser::parse(expression)
    }

    /// Builds a selector from already validated segments.
    pub(crate) fn from_segments(segments: Vec<Segment>) -> Self {
        let expression = render(&segments);
        Self {
            segments,
            expression,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the canonical expression.
    pub fn as_str(&self) -> &str {
        &self.expression
    }

    /// Returns true if any step is a `[*]` wildcard.
    pub fn has_wildcard(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Wildcard))
    }
}

fn render(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Field(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            Segment::Index(idx) => {
                out.push('[');
                out.push_str(&idx.to_string());
                out.push(']');
            }
            Segment::Wildcard => out.push_str("[*]"),
        }
    }
    out
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser::parse(s)
    }
}

impl AsRef<str> for Selector {
    fn as_ref(&self) -> &str {
        &self.expression
    }
}
