// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::name::NameError;
use crate::*;

type String = Rc<str>;

/// Errors that can occur while building a schema from raw column metadata or
/// from a definition document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A column name has no parts or contains an empty part.
    #[error("column {index}: invalid name: {source}")]
    InvalidName { index: usize, source: NameError },
    /// The definition document could not be parsed.
    #[error("failed to parse schema definition: {0}")]
    Definition(String),
}

impl From<serde_json::Error> for SchemaError {
    fn from(error: serde_json::Error) -> Self {
        SchemaError::Definition(format!("{error}").into())
    }
}
