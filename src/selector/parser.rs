//! Selector expression parser.

use super::ast::{Segment, Selector};
use super::error::SelectorError;

/// Parser for selector expressions.
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given expression.
    pub fn new(expression: &'a str) -> Self {
        Self {
            input: expression,
            position: 0,
        }
    }

    /// Parses the expression into a `Selector`.
    pub fn parse(expression: &str) -> Result<Selector, SelectorError> {
        let mut parser = Parser::new(expression);
        parser.parse_selector()
    }

    fn parse_selector(&mut self) -> Result<Selector, SelectorError> {
        if self.input.is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut segments = Vec::new();
        loop {
            let name = self.parse_name()?;
            segments.push(Segment::Field(name));

            if self.peek() == Some('[') {
                segments.push(self.parse_bracket()?);
            }

            match self.peek() {
                None => break,
                Some('.') => {
                    self.next();
                }
                Some(ch) => return Err(self.unexpected(ch, "'.' or end of selector")),
            }
        }

        Ok(Selector::from_segments(segments))
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Returns the next character and advances position.
    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    /// Expects a specific character and advances, or returns an error.
    fn expect(&mut self, expected: char) -> Result<(), SelectorError> {
        let expected_desc = format!("'{}'", expected);
        match self.peek() {
            Some(ch) if ch == expected => {
                self.next();
                Ok(())
            }
            Some(ch) => Err(self.unexpected(ch, &expected_desc)),
            None => Err(self.unexpected_end(&expected_desc)),
        }
    }

    /// Parses a property name: everything up to the next `.`, `[` or `]`.
    fn parse_name(&mut self) -> Result<String, SelectorError> {
        let start = self.position;
        while let Some(ch) = self.peek() {
            if matches!(ch, '.' | '[' | ']') {
                break;
            }
            self.next();
        }

        if self.position > start {
            return Ok(self.input[start..self.position].to_string());
        }
        match self.peek() {
            Some(ch) => Err(self.unexpected(ch, "property name")),
            None => Err(self.unexpected_end("property name")),
        }
    }

    /// Parses `[index]` or `[*]`.
    fn parse_bracket(&mut self) -> Result<Segment, SelectorError> {
        self.expect('[')?;

        if self.peek() == Some('*') {
            self.next();
            self.expect(']')?;
            return Ok(Segment::Wildcard);
        }

        let start = self.position;
        while matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
            self.next();
        }
        if self.position == start {
            return match self.peek() {
                Some(ch) => Err(self.unexpected(ch, "index or '*'")),
                None => Err(self.unexpected_end("index or '*'")),
            };
        }

        let digits = &self.input[start..self.position];
        let index = digits
            .parse::<usize>()
            .map_err(|_| SelectorError::InvalidIndex {
                expression: self.input.to_string(),
                position: start,
                index: digits.to_string(),
            })?;

        self.expect(']')?;
        Ok(Segment::Index(index))
    }

    fn unexpected(&self, found: char, expected: &str) -> SelectorError {
        SelectorError::UnexpectedToken {
            expression: self.input.to_string(),
            position: self.position,
            found,
            expected: expected.to_string(),
        }
    }

    fn unexpected_end(&self, expected: &str) -> SelectorError {
        SelectorError::UnexpectedEnd {
            expression: self.input.to_string(),
            expected: expected.to_string(),
        }
    }
}
