// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Serializable schema definitions.
//!
//! A definition describes a schema as data:
//!
//! ```json
//! {
//!   "collation": "caseInsensitive",
//!   "ambiguity": "warn",
//!   "columns": [
//!     { "name": "public.orders.id", "type": "BIGINT", "nullable": false },
//!     { "name": ["public", "orders", "total"], "type": "DECIMAL(10, 2)" },
//!     { "name": "note", "type": "TEXT", "declaredType": "string" }
//!   ]
//! }
//! ```
//!
//! `name` accepts the dotted textual form or an array of parts. `type` uses the
//! [`DataType`] syntax; `nullable` overrides any `NULL`/`NOT NULL` suffix.
//! `declaredType` defaults to the value type implied by `type`.

use super::{Schema, SchemaBuilder};
use crate::ambiguity::AmbiguityMode;
use crate::field::Field;
use crate::name::{Collation, Name};
use crate::schema::error::SchemaError;
use crate::types::{DataType, ValueType};
use crate::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDefinition {
    #[serde(default)]
    pub collation: Collation,
    #[serde(default)]
    pub ambiguity: AmbiguityMode,
    #[serde(default)]
    pub columns: Vec<ColumnDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    pub name: Name,
    #[serde(rename = "type")]
    pub data_type: DataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<ValueType>,
}

impl ColumnDefinition {
    /// Creates a new field (with a fresh id) from this definition.
    pub fn to_field(&self) -> Field {
        let data_type = match self.nullable {
            Some(nullable) => self.data_type.clone().with_nullable(nullable),
            None => self.data_type.clone(),
        };
        let value_type = self
            .declared_type
            .clone()
            .unwrap_or_else(|| data_type.value_type());
        Field::new(self.name.clone(), value_type, data_type)
    }
}

impl SchemaDefinition {
    pub fn build(&self) -> Schema {
        SchemaBuilder::new()
            .collation(self.collation)
            .shared_ambiguity_policy(self.ambiguity.policy())
            .fields(self.columns.iter().map(ColumnDefinition::to_field))
            .build()
    }
}

impl Schema {
    /// Builds a schema from a JSON definition document.
    pub fn from_serde_json_value(definition: serde_json::Value) -> Result<Self, SchemaError> {
        let definition: SchemaDefinition = serde_json::from_value(definition)?;
        Ok(definition.build())
    }

    /// Builds a schema from the text of a JSON definition document.
    pub fn from_json_str(s: &str) -> Result<Self, SchemaError> {
        let definition: SchemaDefinition = serde_json::from_str(s)?;
        Ok(definition.build())
    }
}
