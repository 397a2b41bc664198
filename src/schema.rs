// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::pattern_type_mismatch)]

//! A record type is the ordered, named, typed shape of a row: the columns of a
//! table, of a query result or of a cursor. [`Schema`] holds that shape and
//! answers lookups against it.
//!
//! Schemas are built once through [`SchemaBuilder`] (or from a JSON
//! definition, see [`SchemaDefinition`]) and never change afterwards. The field
//! list is reference counted, so clones are cheap and every clone sees the
//! same fields. With the `arc` feature a schema can be shared between threads
//! and queried concurrently without locking.
//!
//! Field lookups go through a [`LookupKey`]:
//!
//! ```rust
//! use recordtype::*;
//!
//! let schema = Schema::builder()
//!     .column(Name::parse("public.orders.id").unwrap(), ValueType::Long, "BIGINT".parse().unwrap())
//!     .column(Name::parse("public.customers.id").unwrap(), ValueType::Long, "BIGINT".parse().unwrap())
//!     .build();
//!
//! // Qualified lookups match the trailing parts of column names.
//! assert_eq!(schema.index_of("orders.id"), Some(0));
//!
//! // Simple names resolve to the first match; the ambiguity is reported to
//! // the schema's AmbiguityPolicy.
//! assert_eq!(schema.index_of("id"), Some(0));
//!
//! // Positional lookups bypass matching.
//! assert_eq!(schema.field(1usize).map(|f| f.name().to_string()),
//!            Some("public.customers.id".to_string()));
//! ```

use crate::ambiguity::{AmbiguityPolicy, WarnOnAmbiguity};
use crate::field::Field;
use crate::name::{Collation, Name};
use crate::types::{DataType, ValueType};
use crate::*;

mod definition;
pub mod error;
mod resolve;

pub use definition::{ColumnDefinition, SchemaDefinition};
pub use resolve::{LookupKey, Match, MatchTier};

use error::SchemaError;

/// An immutable, ordered collection of fields.
#[derive(Clone)]
pub struct Schema {
    fields: Rc<[Field]>,
    collation: Collation,
    policy: Rc<dyn AmbiguityPolicy>,
}

impl Schema {
    /// Starts building a schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// A schema of degree zero.
    pub fn empty() -> Self {
        SchemaBuilder::new().build()
    }

    /// Builds a schema from `(name parts, declared type, data type)` tuples.
    ///
    /// Each column receives a fresh [`FieldId`](crate::FieldId). Fails if a
    /// name has no parts or an empty part.
    pub fn from_columns<I, P, S>(columns: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (P, ValueType, DataType)>,
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = SchemaBuilder::new();
        for (index, (parts, value_type, data_type)) in columns.into_iter().enumerate() {
            let name =
                Name::new(parts).map_err(|source| SchemaError::InvalidName { index, source })?;
            builder = builder.column(name, value_type, data_type);
        }
        Ok(builder.build())
    }

    /// Number of fields.
    pub fn degree(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The field at `index`, or `None` if `index >= degree()`.
    pub fn field_at(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// All fields in schema order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn collation(&self) -> Collation {
        self.collation
    }

    pub fn ambiguity_policy(&self) -> &dyn AmbiguityPolicy {
        self.policy.as_ref()
    }

    /// Returns a schema with the same fields that reports ambiguous matches
    /// to `policy` instead.
    pub fn with_ambiguity_policy(&self, policy: impl AmbiguityPolicy + 'static) -> Schema {
        Schema {
            fields: Rc::clone(&self.fields),
            collation: self.collation,
            policy: Rc::new(policy),
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("fields", &self.fields)
            .field("collation", &self.collation)
            .field("policy", &self.policy)
            .finish()
    }
}

/// Schemas are equal when they have the same shape: the same collation and,
/// position by position, fields with equal names and types. Field ids and the
/// ambiguity policy are not compared, so two schemas built from the same
/// definition are equal. Use [`Field::is_same`] to compare identities.
impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.collation == other.collation
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(other.fields.iter())
                .all(|(a, b)| {
                    a.name() == b.name()
                        && a.value_type() == b.value_type()
                        && a.data_type() == b.data_type()
                })
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (idx, field) in self.fields.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}")?;
        }
        f.write_str(")")
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::empty()
    }
}

/// Collects fields before a [`Schema`] is published.
///
/// The builder is consumed by [`SchemaBuilder::build`]; the resulting schema
/// has no mutating API.
#[derive(Debug)]
pub struct SchemaBuilder {
    fields: Vec<Field>,
    collation: Collation,
    policy: Option<Rc<dyn AmbiguityPolicy>>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            collation: Collation::default(),
            policy: None,
        }
    }

    /// Sets how name parts are compared. Defaults to case-sensitive.
    pub fn collation(mut self, collation: Collation) -> Self {
        self.collation = collation;
        self
    }

    /// Sets the policy notified of ambiguous matches. Defaults to
    /// [`WarnOnAmbiguity`].
    pub fn ambiguity_policy(mut self, policy: impl AmbiguityPolicy + 'static) -> Self {
        self.policy = Some(Rc::new(policy));
        self
    }

    pub(crate) fn shared_ambiguity_policy(mut self, policy: Rc<dyn AmbiguityPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Appends an existing field, keeping its id.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends existing fields, keeping their ids.
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Appends a new column with a fresh id.
    pub fn column(self, name: Name, value_type: ValueType, data_type: DataType) -> Self {
        self.field(Field::new(name, value_type, data_type))
    }

    pub fn build(self) -> Schema {
        tracing::debug!(
            degree = self.fields.len(),
            collation = ?self.collation,
            "built schema"
        );
        Schema {
            fields: Rc::from(self.fields),
            collation: self.collation,
            policy: self.policy.unwrap_or_else(|| Rc::new(WarnOnAmbiguity)),
        }
    }
}
