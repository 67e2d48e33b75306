//! Element selectors.
//!
//! A small subset of CSS selector syntax, enough to address fold headers and
//! contents inside a container: type, `#id`, `.class`, `[attr]`, `[attr=value]`,
//! the universal `*`, descendant (whitespace) and child (`>`) combinators, and
//! comma-separated alternatives.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while parsing a selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("Selector is empty")]
    Empty,

    #[error("Unexpected end of selector at byte {position}")]
    UnexpectedEnd { position: usize },

    #[error("Unexpected character '{ch}' at byte {position}")]
    Unexpected { ch: char, position: usize },

    #[error("Expected a name at byte {position}")]
    ExpectedName { position: usize },

    #[error("Unterminated string starting at byte {position}")]
    UnterminatedString { position: usize },
}

/// Attribute condition inside a compound selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMatch {
    pub name: String,
    /// `None` matches presence only.
    pub value: Option<String>,
}

/// A sequence of simple selectors that all apply to one element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Compound {
    /// `None` matches any element type.
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttributeMatch>,
}

/// Relationship between two compounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
}

/// Compounds joined by combinators, read left to right.
///
/// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complex {
    pub compounds: Vec<Compound>,
    pub combinators: Vec<Combinator>,
}

impl Complex {
    /// The compound the matched element itself must satisfy.
    pub fn subject(&self) -> &Compound {
        // parser never produces an empty complex selector
        &self.compounds[self.compounds.len() - 1]
    }
}

/// Parsed selector: one or more alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut parser = Parser::new(source);
        let mut alternatives = Vec::new();
        loop {
            parser.skip_whitespace();
            alternatives.push(parser.complex()?);
            parser.skip_whitespace();
            match parser.bump() {
                None => break,
                Some(',') => continue,
                Some(ch) => {
                    return Err(SelectorError::Unexpected {
                        ch,
                        position: parser.pos - ch.len_utf8(),
                    })
                }
            }
        }

        Ok(Self {
            source: trimmed.to_string(),
            alternatives,
        })
    }

    /// Selector matching a single class, built without parsing.
    pub fn class(name: &str) -> Self {
        let subject = Compound {
            classes: vec![name.to_string()],
            ..Compound::default()
        };
        Self {
            source: format!(".{name}"),
            alternatives: vec![Complex {
                compounds: vec![subject],
                combinators: Vec::new(),
            }],
        }
    }

    pub fn alternatives(&self) -> &[Complex] {
        &self.alternatives
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Returns whether any whitespace was consumed.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos != start
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.bump();
                    self.skip_whitespace();
                    combinators.push(Combinator::Child);
                    compounds.push(self.compound()?);
                }
                Some(_) if had_whitespace => {
                    combinators.push(Combinator::Descendant);
                    compounds.push(self.compound()?);
                }
                Some(ch) => {
                    return Err(SelectorError::Unexpected {
                        ch,
                        position: self.pos,
                    })
                }
            }
        }

        Ok(Complex {
            compounds,
            combinators,
        })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let start = self.pos;
        let mut compound = Compound::default();
        let mut universal = false;

        match self.peek() {
            Some('*') => {
                self.bump();
                universal = true;
            }
            Some(ch) if is_name_char(ch) => {
                compound.tag = Some(self.name()?.to_ascii_lowercase());
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('.') => {
                    self.bump();
                    compound.classes.push(self.name()?);
                }
                Some('#') => {
                    self.bump();
                    compound.id = Some(self.name()?);
                }
                Some('[') => {
                    self.bump();
                    compound.attributes.push(self.attribute()?);
                }
                _ => break,
            }
        }

        if self.pos == start && !universal {
            return match self.peek() {
                None => Err(SelectorError::UnexpectedEnd { position: self.pos }),
                Some(ch) => Err(SelectorError::Unexpected {
                    ch,
                    position: self.pos,
                }),
            };
        }

        Ok(compound)
    }

    fn name(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_name_char) {
            self.bump();
        }
        if self.pos == start {
            return Err(SelectorError::ExpectedName { position: start });
        }
        Ok(self.src[start..self.pos].to_string())
    }

    fn attribute(&mut self) -> Result<AttributeMatch, SelectorError> {
        self.skip_whitespace();
        let name = self.name()?.to_ascii_lowercase();
        self.skip_whitespace();

        let value = match self.peek() {
            Some('=') => {
                self.bump();
                self.skip_whitespace();
                let value = match self.peek() {
                    Some(quote @ ('"' | '\'')) => self.quoted(quote)?,
                    _ => self.name()?,
                };
                self.skip_whitespace();
                Some(value)
            }
            _ => None,
        };

        match self.bump() {
            Some(']') => Ok(AttributeMatch { name, value }),
            Some(ch) => Err(SelectorError::Unexpected {
                ch,
                position: self.pos - ch.len_utf8(),
            }),
            None => Err(SelectorError::UnexpectedEnd { position: self.pos }),
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String, SelectorError> {
        let open = self.pos;
        self.bump();
        let start = self.pos;
        while let Some(ch) = self.bump() {
            if ch == quote {
                return Ok(self.src[start..self.pos - ch.len_utf8()].to_string());
            }
        }
        Err(SelectorError::UnterminatedString { position: open })
    }
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}
