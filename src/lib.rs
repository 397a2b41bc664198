// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]
#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod ambiguity;
mod field;
mod name;
pub mod schema;
mod types;

pub use ambiguity::{
    AmbiguityMode, AmbiguityPolicy, AmbiguousMatch, IgnoreAmbiguity, RecordAmbiguity,
    WarnOnAmbiguity,
};
pub use field::{Field, FieldId};
pub use name::{Collation, Name, NameError, SEPARATOR};
pub use schema::{
    error::SchemaError, ColumnDefinition, LookupKey, Match, MatchTier, Schema, SchemaBuilder,
    SchemaDefinition,
};
pub use types::{DataType, DataTypeError, SqlType, TypeFamily, TypeMismatch, ValueType};

// Shared storage is atomically reference counted when schemas cross threads.
#[cfg(feature = "arc")]
pub(crate) use alloc::sync::Arc as Rc;

#[cfg(not(feature = "arc"))]
pub(crate) use alloc::rc::Rc;

pub(crate) use alloc::{
    format,
    string::{String as StdString, ToString},
    vec::Vec,
};
pub(crate) use core::fmt;
