// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use anyhow::{anyhow, Result};
use recordtype::*;

/// Builds a schema from a definition and resolves a few columns.
pub fn resolve_columns() -> Result<Vec<usize>> {
    let schema = Schema::from_json_str(
        r#"{
            "columns": [
                { "name": "public.orders.id", "type": "BIGINT NOT NULL" },
                { "name": "public.orders.total", "type": "DECIMAL(10, 2)" }
            ]
        }"#,
    )?;

    let total = schema
        .field_as("total", &ValueType::Double)?
        .ok_or_else(|| anyhow!("total not found"))?;

    Ok([
        schema.index_of("orders.id"),
        schema.index_of(&total),
        schema.index_of(1usize),
    ]
    .into_iter()
    .flatten()
    .collect())
}
