// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::name::Name;
use crate::types::{DataType, TypeMismatch, ValueType};
use crate::*;
use core::sync::atomic::{AtomicUsize, Ordering};

static NEXT_FIELD_ID: AtomicUsize = AtomicUsize::new(0);

/// Stable identity of a field.
///
/// Ids are handed out when a field is created and survive cloning and
/// coercion, so the same column appearing in several schemas is still
/// recognised as itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(usize);

impl FieldId {
    fn next() -> Self {
        FieldId(NEXT_FIELD_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One named, typed slot of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    id: FieldId,
    name: Name,
    value_type: ValueType,
    data_type: DataType,
}

impl Field {
    /// Creates a field with a fresh id.
    pub fn new(name: Name, value_type: ValueType, data_type: DataType) -> Self {
        Self {
            id: FieldId::next(),
            name,
            value_type,
            data_type,
        }
    }

    /// Creates a field whose value type is derived from `data_type`.
    pub fn of(name: Name, data_type: DataType) -> Self {
        let value_type = data_type.value_type();
        Self::new(name, value_type, data_type)
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn simple_name(&self) -> &str {
        self.name.simple_name()
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// True if both handles denote the same field, regardless of the types
    /// they are currently exposed as.
    pub fn is_same(&self, other: &Field) -> bool {
        self.id == other.id
    }

    /// Exposes this field as `value_type`.
    ///
    /// The SQL type becomes the tag's default while nullability is kept. A
    /// field already declared as `value_type` is returned unchanged.
    pub fn coerce_to(&self, value_type: &ValueType) -> Result<Field, TypeMismatch> {
        if &self.value_type == value_type {
            return Ok(self.clone());
        }
        self.check_coercion(value_type)?;
        Ok(Self {
            id: self.id,
            name: self.name.clone(),
            value_type: value_type.clone(),
            data_type: DataType::new(value_type.default_sql_type())
                .with_nullable(self.data_type.nullable()),
        })
    }

    /// Exposes this field as `data_type`, taking its value type along.
    pub fn coerce_to_data_type(&self, data_type: &DataType) -> Result<Field, TypeMismatch> {
        let value_type = data_type.value_type();
        self.check_coercion(&value_type)?;
        Ok(Self {
            id: self.id,
            name: self.name.clone(),
            value_type,
            data_type: data_type.clone(),
        })
    }

    fn check_coercion(&self, requested: &ValueType) -> Result<(), TypeMismatch> {
        if self.value_type.can_coerce_to(requested) {
            return Ok(());
        }
        tracing::debug!(
            field = %self.name,
            declared = %self.value_type,
            requested = %requested,
            "rejected field coercion"
        );
        Err(TypeMismatch {
            field: self.name.clone(),
            declared: self.value_type.clone(),
            requested: requested.clone(),
        })
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)
    }
}
