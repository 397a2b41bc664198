// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::pattern_type_mismatch)]

//! Field resolution.
//!
//! A lookup walks through the following tiers and stops at the first one
//! that finds something:
//!
//! 1. identity: the key is a field whose id occurs in the schema;
//! 2. exact: the key's qualified name equals a field's name part by part;
//! 3. partial: the shorter of the two names equals the trailing parts of the
//!    longer one (`orders.id` finds `public.orders.id`);
//! 4. simple: the simple names are equal.
//!
//! Which tiers run depends on the shape of the key, see [`LookupKey`]. Tiers 3
//! and 4 return the first candidate in schema order; if there are several the
//! schema's ambiguity policy is notified.

use super::Schema;
use crate::ambiguity::AmbiguousMatch;
use crate::field::Field;
use crate::name::Name;
use crate::types::{DataType, TypeMismatch, ValueType};
use crate::*;

/// Addresses a field of a schema.
#[derive(Debug, Clone, Copy)]
pub enum LookupKey<'a> {
    /// A field handle. Tries identity, then exact, partial and simple name
    /// matching with the handle's name.
    Identity(&'a Field),
    /// A qualified name. Tries exact, partial and simple name matching.
    QualifiedName(&'a Name),
    /// A bare string. If it parses into several parts it is matched
    /// partially, then by simple name; otherwise by simple name only. Strings
    /// that do not parse as a name are used verbatim as a simple name.
    SimpleName(&'a str),
    /// A position. No name matching takes place.
    Index(usize),
}

impl<'a> From<&'a Field> for LookupKey<'a> {
    fn from(field: &'a Field) -> Self {
        LookupKey::Identity(field)
    }
}

impl<'a> From<&'a Name> for LookupKey<'a> {
    fn from(name: &'a Name) -> Self {
        LookupKey::QualifiedName(name)
    }
}

impl<'a> From<&'a str> for LookupKey<'a> {
    fn from(name: &'a str) -> Self {
        LookupKey::SimpleName(name)
    }
}

impl<'a> From<&'a StdString> for LookupKey<'a> {
    fn from(name: &'a StdString) -> Self {
        LookupKey::SimpleName(name.as_str())
    }
}

impl From<usize> for LookupKey<'_> {
    fn from(index: usize) -> Self {
        LookupKey::Index(index)
    }
}

impl fmt::Display for LookupKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKey::Identity(field) => write!(f, "{}", field.name()),
            LookupKey::QualifiedName(name) => write!(f, "{name}"),
            LookupKey::SimpleName(name) => f.write_str(name),
            LookupKey::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// The tier that resolved a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchTier {
    Identity,
    Exact,
    Partial,
    Simple,
    Position,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchTier::Identity => "identity",
            MatchTier::Exact => "exact",
            MatchTier::Partial => "partial",
            MatchTier::Simple => "simple",
            MatchTier::Position => "position",
        })
    }
}

/// A successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Position of the field in schema order.
    pub index: usize,
    pub tier: MatchTier,
}

impl Schema {
    /// Resolves `key` to a position, reporting which tier matched.
    pub fn resolve<'k>(&self, key: impl Into<LookupKey<'k>>) -> Option<Match> {
        let key = key.into();
        match key {
            LookupKey::Index(index) => (index < self.degree()).then_some(Match {
                index,
                tier: MatchTier::Position,
            }),
            LookupKey::Identity(field) => self
                .match_identity(field)
                .or_else(|| self.match_name(&key, field.name(), true)),
            LookupKey::QualifiedName(name) => self.match_name(&key, name, true),
            LookupKey::SimpleName(text) => match Name::parse(text) {
                Ok(name) if name.is_qualified() => self.match_name(&key, &name, false),
                Ok(name) => self.match_simple(&key, name.simple_name()),
                Err(_) => self.match_simple(&key, text),
            },
        }
    }

    /// The field `key` resolves to, if any.
    pub fn field<'k>(&self, key: impl Into<LookupKey<'k>>) -> Option<&Field> {
        self.resolve(key).and_then(|m| self.fields.get(m.index))
    }

    /// Resolves `key` and exposes the field as `value_type`.
    ///
    /// Returns `Ok(None)` if nothing matches and `Err` if the field's declared
    /// type cannot be coerced.
    pub fn field_as<'k>(
        &self,
        key: impl Into<LookupKey<'k>>,
        value_type: &ValueType,
    ) -> Result<Option<Field>, TypeMismatch> {
        self.field(key).map(|f| f.coerce_to(value_type)).transpose()
    }

    /// Resolves `key` and exposes the field as `data_type`.
    pub fn field_as_data_type<'k>(
        &self,
        key: impl Into<LookupKey<'k>>,
        data_type: &DataType,
    ) -> Result<Option<Field>, TypeMismatch> {
        self.field(key)
            .map(|f| f.coerce_to_data_type(data_type))
            .transpose()
    }

    /// Resolves every key independently, in the order given.
    ///
    /// Keys that do not resolve are dropped, so the result can be shorter
    /// than `keys`. Positions in the result do not line up with positions in
    /// `keys` unless every key resolves.
    pub fn fields_of<'k, I, K>(&self, keys: I) -> Vec<&Field>
    where
        I: IntoIterator<Item = K>,
        K: Into<LookupKey<'k>>,
    {
        keys.into_iter().filter_map(|key| self.field(key)).collect()
    }

    /// Position of the field `key` resolves to.
    pub fn index_of<'k>(&self, key: impl Into<LookupKey<'k>>) -> Option<usize> {
        self.resolve(key).map(|m| m.index)
    }

    /// Declared types of all fields, in schema order.
    pub fn types(&self) -> Vec<&ValueType> {
        self.fields.iter().map(Field::value_type).collect()
    }

    /// Data types of all fields, in schema order.
    pub fn data_types(&self) -> Vec<&DataType> {
        self.fields.iter().map(Field::data_type).collect()
    }

    pub fn type_of<'k>(&self, key: impl Into<LookupKey<'k>>) -> Option<&ValueType> {
        self.field(key).map(Field::value_type)
    }

    pub fn data_type_of<'k>(&self, key: impl Into<LookupKey<'k>>) -> Option<&DataType> {
        self.field(key).map(Field::data_type)
    }

    fn match_identity(&self, field: &Field) -> Option<Match> {
        self.fields
            .iter()
            .position(|f| f.is_same(field))
            .map(|index| Match {
                index,
                tier: MatchTier::Identity,
            })
    }

    fn match_name(&self, key: &LookupKey<'_>, name: &Name, exact: bool) -> Option<Match> {
        let collation = self.collation;
        if exact {
            if let Some(index) = self
                .fields
                .iter()
                .position(|f| f.name().matches(name, collation))
            {
                return Some(Match {
                    index,
                    tier: MatchTier::Exact,
                });
            }
        }

        // A single part carries no qualifier to align; it falls through to
        // simple name matching.
        if name.is_qualified() {
            let partial = self.first_match(key, MatchTier::Partial, |f| {
                f.name().matches_suffix(name, collation)
            });
            if partial.is_some() {
                return partial;
            }
        }

        self.match_simple(key, name.simple_name())
    }

    fn match_simple(&self, key: &LookupKey<'_>, simple_name: &str) -> Option<Match> {
        let collation = self.collation;
        self.first_match(key, MatchTier::Simple, |f| {
            collation.matches(f.simple_name(), simple_name)
        })
    }

    fn first_match<P>(&self, key: &LookupKey<'_>, tier: MatchTier, predicate: P) -> Option<Match>
    where
        P: Fn(&Field) -> bool,
    {
        let mut candidates = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| predicate(f))
            .map(|(index, _)| index);

        let chosen = candidates.next()?;
        let others: Vec<usize> = candidates.collect();
        if !others.is_empty() {
            let mut all = Vec::with_capacity(others.len() + 1);
            all.push(chosen);
            all.extend(others);
            self.policy.on_ambiguous(&AmbiguousMatch {
                key: key.to_string(),
                tier,
                chosen,
                candidates: all,
            });
        }

        Some(Match {
            index: chosen,
            tier,
        })
    }
}
