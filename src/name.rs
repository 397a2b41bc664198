// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::pattern_type_mismatch)]

//! Hierarchical identifiers.
//!
//! A [`Name`] is an ordered, non-empty list of parts such as `schema.table.column`.
//! The last part is the simple (unqualified) name. Parts are compared under a
//! [`Collation`] chosen by the owning schema.

use crate::*;
use core::iter::Peekable;
use core::str::{CharIndices, FromStr};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

type String = Rc<str>;

/// Separates the parts of a qualified name in its textual form.
pub const SEPARATOR: char = '.';

const QUOTE: char = '"';

/// Errors produced while constructing or parsing a [`Name`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// The name has no parts.
    #[error("name is empty")]
    Empty,
    /// One of the parts is empty (for example `a..b`).
    #[error("name part {index} is empty")]
    EmptyPart { index: usize },
    /// A quoted identifier is missing its closing quote.
    #[error("unterminated quoted identifier starting at offset {offset}")]
    UnterminatedQuote { offset: usize },
    /// A character that cannot appear at this position.
    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedCharacter { found: char, offset: usize },
}

/// Controls how name parts are compared during field resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collation {
    /// Parts must be identical.
    #[default]
    CaseSensitive,
    /// Parts are compared after Unicode lowercase folding.
    CaseInsensitive,
}

impl Collation {
    /// Returns true if two name parts are equal under this collation.
    pub fn matches(self, a: &str, b: &str) -> bool {
        match self {
            Collation::CaseSensitive => a == b,
            Collation::CaseInsensitive => a
                .chars()
                .flat_map(char::to_lowercase)
                .eq(b.chars().flat_map(char::to_lowercase)),
        }
    }
}

/// A possibly qualified identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name {
    parts: Rc<[String]>,
}

impl Name {
    /// Creates a name from its parts, outermost qualifier first.
    ///
    /// Parts are taken verbatim; no quoting or splitting is applied.
    pub fn new<I, S>(parts: I) -> Result<Self, NameError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut collected: Vec<String> = Vec::new();
        for (index, part) in parts.into_iter().enumerate() {
            let part = part.as_ref();
            if part.is_empty() {
                return Err(NameError::EmptyPart { index });
            }
            collected.push(String::from(part));
        }
        if collected.is_empty() {
            return Err(NameError::Empty);
        }
        Ok(Self {
            parts: Rc::from(collected),
        })
    }

    /// Creates a single-part name without interpreting separators or quotes.
    pub fn unqualified(name: &str) -> Result<Self, NameError> {
        Self::new([name])
    }

    /// Parses the textual form `a.b."c.d"`.
    ///
    /// Unquoted parts are trimmed. Quoted parts are kept verbatim, with `""`
    /// standing for a literal quote.
    pub fn parse(text: &str) -> Result<Self, NameError> {
        if text.trim().is_empty() {
            return Err(NameError::Empty);
        }

        let mut chars = text.char_indices().peekable();
        let mut parts: Vec<String> = Vec::new();
        loop {
            let index = parts.len();
            skip_whitespace(&mut chars);
            let part = match chars.peek() {
                Some(&(offset, QUOTE)) => {
                    chars.next();
                    parse_quoted(&mut chars, offset)?
                }
                _ => parse_unquoted(&mut chars)?,
            };
            if part.is_empty() {
                return Err(NameError::EmptyPart { index });
            }
            parts.push(String::from(part.as_str()));

            skip_whitespace(&mut chars);
            match chars.next() {
                None => break,
                Some((_, SEPARATOR)) => continue,
                Some((offset, found)) => {
                    return Err(NameError::UnexpectedCharacter { found, offset })
                }
            }
        }

        Ok(Self {
            parts: Rc::from(parts),
        })
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Always false; names have at least one part.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// True when the name carries at least one qualifier.
    pub fn is_qualified(&self) -> bool {
        self.parts.len() > 1
    }

    /// The parts, outermost qualifier first.
    pub fn parts(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.parts.iter().map(|p| p.as_ref())
    }

    /// The simple (last) part.
    pub fn simple_name(&self) -> &str {
        self.parts.last().map(|p| p.as_ref()).unwrap_or("")
    }

    /// The name without its last part, if it has a qualifier.
    pub fn qualifier(&self) -> Option<Name> {
        match self.parts.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(Self {
                parts: Rc::from(rest.to_vec()),
            }),
            _ => None,
        }
    }

    /// Returns this name extended by one more part.
    pub fn append(&self, part: &str) -> Result<Name, NameError> {
        if part.is_empty() {
            return Err(NameError::EmptyPart {
                index: self.parts.len(),
            });
        }
        let mut parts = self.parts.to_vec();
        parts.push(String::from(part));
        Ok(Self {
            parts: Rc::from(parts),
        })
    }

    /// Element-wise equality under `collation`.
    pub fn matches(&self, other: &Name, collation: Collation) -> bool {
        self.len() == other.len()
            && self
                .parts()
                .zip(other.parts())
                .all(|(a, b)| collation.matches(a, b))
    }

    /// True if the shorter of the two names equals the trailing parts of the
    /// longer one, compared from the right.
    ///
    /// `orders.id` matches `public.orders.id` but `id.orders` does not.
    pub fn matches_suffix(&self, other: &Name, collation: Collation) -> bool {
        self.parts()
            .rev()
            .zip(other.parts().rev())
            .all(|(a, b)| collation.matches(a, b))
    }
}

fn skip_whitespace(chars: &mut Peekable<CharIndices<'_>>) {
    while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
}

fn parse_quoted(
    chars: &mut Peekable<CharIndices<'_>>,
    offset: usize,
) -> Result<StdString, NameError> {
    let mut part = StdString::new();
    loop {
        match chars.next() {
            Some((_, QUOTE)) => {
                if chars.next_if(|(_, c)| *c == QUOTE).is_some() {
                    part.push(QUOTE);
                } else {
                    return Ok(part);
                }
            }
            Some((_, c)) => part.push(c),
            None => return Err(NameError::UnterminatedQuote { offset }),
        }
    }
}

fn parse_unquoted(chars: &mut Peekable<CharIndices<'_>>) -> Result<StdString, NameError> {
    let mut part = StdString::new();
    while let Some(&(offset, c)) = chars.peek() {
        match c {
            SEPARATOR => break,
            QUOTE => return Err(NameError::UnexpectedCharacter { found: c, offset }),
            _ => {
                part.push(c);
                chars.next();
            }
        }
    }
    Ok(StdString::from(part.trim()))
}

fn needs_quoting(part: &str) -> bool {
    part.contains([SEPARATOR, QUOTE])
        || part.starts_with(char::is_whitespace)
        || part.ends_with(char::is_whitespace)
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, part) in self.parts().enumerate() {
            if idx > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            if needs_quoting(part) {
                write!(f, "{QUOTE}{}{QUOTE}", part.replace(QUOTE, "\"\""))?;
            } else {
                f.write_str(part)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Name {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Name::parse(s)
    }
}

impl Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.parts())
    }
}

impl<'de> Deserialize<'de> for Name {
    /// Accepts either the textual form (`"public.orders.id"`) or an array of
    /// parts (`["public", "orders", "id"]`).
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(StdString),
            Parts(Vec<StdString>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(text) => Name::parse(&text),
            Repr::Parts(parts) => Name::new(parts),
        }
        .map_err(serde::de::Error::custom)
    }
}
