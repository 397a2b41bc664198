// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::pattern_type_mismatch)]

//! Column type metadata.
//!
//! Every field carries two views of its type:
//!
//! - a [`ValueType`], the class-level tag describing what kind of value a
//!   reader materializes (`int`, `bigDecimal`, `string`, ...);
//! - a [`DataType`], the declared SQL type ([`SqlType`]) together with
//!   precision, scale, length and nullability.
//!
//! Only metadata is handled here. Coercion decides whether a column declared
//! with one type may be exposed under another; it never touches values.

use crate::name::Name;
use crate::*;
use core::convert::Infallible;
use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

type String = Rc<str>;

/// Broad grouping used to decide coercion compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    Boolean,
    Numeric,
    Character,
    Binary,
    Temporal,
    Uuid,
    Json,
    Other,
}

/// Class-level type tag of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    BigInteger,
    Float,
    Double,
    BigDecimal,
    String,
    Bytes,
    Date,
    Time,
    Timestamp,
    OffsetTimestamp,
    Uuid,
    Json,
    /// A type this crate has no dedicated tag for, identified by name.
    Other(String),
}

impl ValueType {
    pub fn name(&self) -> &str {
        match self {
            ValueType::Boolean => "boolean",
            ValueType::Byte => "byte",
            ValueType::Short => "short",
            ValueType::Int => "int",
            ValueType::Long => "long",
            ValueType::BigInteger => "bigInteger",
            ValueType::Float => "float",
            ValueType::Double => "double",
            ValueType::BigDecimal => "bigDecimal",
            ValueType::String => "string",
            ValueType::Bytes => "bytes",
            ValueType::Date => "date",
            ValueType::Time => "time",
            ValueType::Timestamp => "timestamp",
            ValueType::OffsetTimestamp => "offsetTimestamp",
            ValueType::Uuid => "uuid",
            ValueType::Json => "json",
            ValueType::Other(name) => name,
        }
    }

    pub fn family(&self) -> TypeFamily {
        match self {
            ValueType::Boolean => TypeFamily::Boolean,
            ValueType::Byte
            | ValueType::Short
            | ValueType::Int
            | ValueType::Long
            | ValueType::BigInteger
            | ValueType::Float
            | ValueType::Double
            | ValueType::BigDecimal => TypeFamily::Numeric,
            ValueType::String => TypeFamily::Character,
            ValueType::Bytes => TypeFamily::Binary,
            ValueType::Date | ValueType::Time | ValueType::Timestamp | ValueType::OffsetTimestamp => {
                TypeFamily::Temporal
            }
            ValueType::Uuid => TypeFamily::Uuid,
            ValueType::Json => TypeFamily::Json,
            ValueType::Other(_) => TypeFamily::Other,
        }
    }

    /// Returns true if a field declared as `self` may be exposed as `target`.
    ///
    /// - identical tags are always compatible;
    /// - any numeric tag coerces to any other numeric tag, narrowing included;
    /// - dates and times coerce to and from timestamps, but not to each other;
    /// - strings coerce to and from `uuid` and `json`;
    /// - `Other` tags match only when their names are equal ignoring ASCII case.
    pub fn can_coerce_to(&self, target: &ValueType) -> bool {
        if self == target {
            return true;
        }
        match (self.family(), target.family()) {
            (TypeFamily::Numeric, TypeFamily::Numeric)
            | (TypeFamily::Character, TypeFamily::Character)
            | (TypeFamily::Binary, TypeFamily::Binary)
            | (TypeFamily::Boolean, TypeFamily::Boolean) => true,
            (TypeFamily::Temporal, TypeFamily::Temporal) => !matches!(
                (self, target),
                (ValueType::Date, ValueType::Time) | (ValueType::Time, ValueType::Date)
            ),
            (TypeFamily::Character, TypeFamily::Uuid | TypeFamily::Json)
            | (TypeFamily::Uuid | TypeFamily::Json, TypeFamily::Character) => true,
            (TypeFamily::Other, TypeFamily::Other) => match (self, target) {
                (ValueType::Other(a), ValueType::Other(b)) => a.eq_ignore_ascii_case(b),
                _ => false,
            },
            _ => false,
        }
    }

    /// The SQL type a field gets when it is coerced to this tag without an
    /// explicit data type.
    pub fn default_sql_type(&self) -> SqlType {
        match self {
            ValueType::Boolean => SqlType::Boolean,
            ValueType::Byte => SqlType::TinyInt,
            ValueType::Short => SqlType::SmallInt,
            ValueType::Int => SqlType::Integer,
            ValueType::Long => SqlType::BigInt,
            ValueType::BigInteger => SqlType::Numeric,
            ValueType::Float => SqlType::Real,
            ValueType::Double => SqlType::Double,
            ValueType::BigDecimal => SqlType::Decimal,
            ValueType::String => SqlType::Varchar,
            ValueType::Bytes => SqlType::Varbinary,
            ValueType::Date => SqlType::Date,
            ValueType::Time => SqlType::Time,
            ValueType::Timestamp => SqlType::Timestamp,
            ValueType::OffsetTimestamp => SqlType::TimestampWithTimeZone,
            ValueType::Uuid => SqlType::Uuid,
            ValueType::Json => SqlType::Json,
            ValueType::Other(name) => SqlType::Other(name.clone()),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueType {
    type Err = Infallible;

    /// Known tags are matched ignoring ASCII case; anything else is `Other`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const KNOWN: [ValueType; 17] = [
            ValueType::Boolean,
            ValueType::Byte,
            ValueType::Short,
            ValueType::Int,
            ValueType::Long,
            ValueType::BigInteger,
            ValueType::Float,
            ValueType::Double,
            ValueType::BigDecimal,
            ValueType::String,
            ValueType::Bytes,
            ValueType::Date,
            ValueType::Time,
            ValueType::Timestamp,
            ValueType::OffsetTimestamp,
            ValueType::Uuid,
            ValueType::Json,
        ];
        let s = s.trim();
        Ok(KNOWN
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .unwrap_or_else(|| ValueType::Other(String::from(s))))
    }
}

impl Serialize for ValueType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ValueType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = StdString::deserialize(deserializer)?;
        match ValueType::from_str(&s) {
            Ok(t) => Ok(t),
            Err(never) => match never {},
        }
    }
}

/// Declared SQL type tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SqlType {
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Decimal,
    Numeric,
    Real,
    Float,
    Double,
    Char,
    Varchar,
    Clob,
    Binary,
    Varbinary,
    Blob,
    Date,
    Time,
    Timestamp,
    TimestampWithTimeZone,
    Uuid,
    Json,
    /// A vendor specific type kept by name.
    Other(String),
}

impl SqlType {
    /// Canonical spelling used by `Display`.
    pub fn name(&self) -> &str {
        match self {
            SqlType::Boolean => "BOOLEAN",
            SqlType::TinyInt => "TINYINT",
            SqlType::SmallInt => "SMALLINT",
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Decimal => "DECIMAL",
            SqlType::Numeric => "NUMERIC",
            SqlType::Real => "REAL",
            SqlType::Float => "FLOAT",
            SqlType::Double => "DOUBLE",
            SqlType::Char => "CHAR",
            SqlType::Varchar => "VARCHAR",
            SqlType::Clob => "CLOB",
            SqlType::Binary => "BINARY",
            SqlType::Varbinary => "VARBINARY",
            SqlType::Blob => "BLOB",
            SqlType::Date => "DATE",
            SqlType::Time => "TIME",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::TimestampWithTimeZone => "TIMESTAMP WITH TIME ZONE",
            SqlType::Uuid => "UUID",
            SqlType::Json => "JSON",
            SqlType::Other(name) => name,
        }
    }

    /// Looks up a type by name, accepting common vendor aliases.
    /// Whitespace runs are collapsed and case is ignored. Unknown names are
    /// kept as `Other`.
    pub fn from_name(name: &str) -> SqlType {
        let normalized = name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        match normalized.as_str() {
            "BOOLEAN" | "BOOL" => SqlType::Boolean,
            "TINYINT" | "INT1" => SqlType::TinyInt,
            "SMALLINT" | "INT2" => SqlType::SmallInt,
            "INTEGER" | "INT" | "INT4" => SqlType::Integer,
            "BIGINT" | "INT8" => SqlType::BigInt,
            "DECIMAL" | "DEC" => SqlType::Decimal,
            "NUMERIC" => SqlType::Numeric,
            "REAL" | "FLOAT4" => SqlType::Real,
            "FLOAT" => SqlType::Float,
            "DOUBLE" | "DOUBLE PRECISION" | "FLOAT8" => SqlType::Double,
            "CHAR" | "CHARACTER" | "NCHAR" => SqlType::Char,
            "VARCHAR" | "CHARACTER VARYING" | "NVARCHAR" | "VARCHAR2" => SqlType::Varchar,
            "CLOB" | "TEXT" | "NCLOB" => SqlType::Clob,
            "BINARY" => SqlType::Binary,
            "VARBINARY" | "BINARY VARYING" => SqlType::Varbinary,
            "BLOB" | "BYTEA" => SqlType::Blob,
            "DATE" => SqlType::Date,
            "TIME" => SqlType::Time,
            "TIMESTAMP" | "DATETIME" => SqlType::Timestamp,
            "TIMESTAMP WITH TIME ZONE" | "TIMESTAMPTZ" => SqlType::TimestampWithTimeZone,
            "UUID" => SqlType::Uuid,
            "JSON" | "JSONB" => SqlType::Json,
            _ => SqlType::Other(String::from(name.trim())),
        }
    }

    /// The value type readers materialize for this SQL type.
    pub fn value_type(&self) -> ValueType {
        match self {
            SqlType::Boolean => ValueType::Boolean,
            SqlType::TinyInt => ValueType::Byte,
            SqlType::SmallInt => ValueType::Short,
            SqlType::Integer => ValueType::Int,
            SqlType::BigInt => ValueType::Long,
            SqlType::Decimal | SqlType::Numeric => ValueType::BigDecimal,
            SqlType::Real => ValueType::Float,
            SqlType::Float | SqlType::Double => ValueType::Double,
            SqlType::Char | SqlType::Varchar | SqlType::Clob => ValueType::String,
            SqlType::Binary | SqlType::Varbinary | SqlType::Blob => ValueType::Bytes,
            SqlType::Date => ValueType::Date,
            SqlType::Time => ValueType::Time,
            SqlType::Timestamp => ValueType::Timestamp,
            SqlType::TimestampWithTimeZone => ValueType::OffsetTimestamp,
            SqlType::Uuid => ValueType::Uuid,
            SqlType::Json => ValueType::Json,
            SqlType::Other(name) => ValueType::Other(name.clone()),
        }
    }

    fn has_length(&self) -> bool {
        matches!(
            self,
            SqlType::Char | SqlType::Varchar | SqlType::Binary | SqlType::Varbinary
        )
    }

    fn has_scale(&self) -> bool {
        matches!(self, SqlType::Decimal | SqlType::Numeric)
    }

    // Vendor types are not validated.
    fn accepts_scale(&self) -> bool {
        self.has_scale() || matches!(self, SqlType::Other(_))
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors produced while parsing a [`DataType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataTypeError {
    #[error("data type is empty")]
    Empty,
    #[error("malformed type arguments in '{0}'")]
    MalformedArguments(String),
    #[error("invalid type argument '{0}'")]
    InvalidArgument(String),
    #[error("{0} does not take a scale")]
    ScaleNotAllowed(SqlType),
    /// `NOT` without a following `NULL`.
    #[error("NOT must be followed by NULL")]
    DanglingNot,
    #[error("scale {scale} exceeds precision {precision}")]
    ScaleExceedsPrecision { precision: u32, scale: u32 },
}

/// Rich type descriptor of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataType {
    sql_type: SqlType,
    precision: Option<u32>,
    scale: Option<u32>,
    length: Option<u32>,
    nullable: bool,
}

impl DataType {
    /// A nullable type without precision, scale or length.
    pub fn new(sql_type: SqlType) -> Self {
        Self {
            sql_type,
            precision: None,
            scale: None,
            length: None,
            nullable: true,
        }
    }

    pub fn varchar(length: u32) -> Self {
        Self::new(SqlType::Varchar).with_length(length)
    }

    pub fn decimal(precision: u32, scale: u32) -> Self {
        Self::new(SqlType::Decimal).with_precision(precision, Some(scale))
    }

    pub fn with_precision(mut self, precision: u32, scale: Option<u32>) -> Self {
        self.precision = Some(precision);
        self.scale = scale;
        self
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn not_null(self) -> Self {
        self.with_nullable(false)
    }

    pub fn sql_type(&self) -> &SqlType {
        &self.sql_type
    }

    pub fn precision(&self) -> Option<u32> {
        self.precision
    }

    pub fn scale(&self) -> Option<u32> {
        self.scale
    }

    pub fn length(&self) -> Option<u32> {
        self.length
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn value_type(&self) -> ValueType {
        self.sql_type.value_type()
    }

    pub fn family(&self) -> TypeFamily {
        self.value_type().family()
    }

    /// Coercion between rich types follows their value types.
    pub fn can_coerce_to(&self, target: &DataType) -> bool {
        self.value_type().can_coerce_to(&target.value_type())
    }
}

impl From<SqlType> for DataType {
    fn from(sql_type: SqlType) -> Self {
        DataType::new(sql_type)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql_type)?;
        match (self.length, self.precision, self.scale) {
            (Some(length), _, _) => write!(f, "({length})")?,
            (None, Some(precision), Some(scale)) => write!(f, "({precision}, {scale})")?,
            (None, Some(precision), None) => write!(f, "({precision})")?,
            _ => (),
        }
        if !self.nullable {
            f.write_str(" NOT NULL")?;
        }
        Ok(())
    }
}

impl FromStr for DataType {
    type Err = DataTypeError;

    /// Parses `NAME`, `NAME(n)` or `NAME(p, s)`, optionally followed by
    /// `NULL` or `NOT NULL`. Runs of whitespace count as a single space.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens: Vec<&str> = s.split_whitespace().collect();
        let mut nullable = true;
        if tokens
            .last()
            .is_some_and(|t| t.eq_ignore_ascii_case("NULL"))
        {
            tokens.pop();
            if tokens.last().is_some_and(|t| t.eq_ignore_ascii_case("NOT")) {
                tokens.pop();
                nullable = false;
            }
        }
        if tokens.last().is_some_and(|t| t.eq_ignore_ascii_case("NOT")) {
            return Err(DataTypeError::DanglingNot);
        }
        if tokens.is_empty() {
            return Err(DataTypeError::Empty);
        }
        let text = tokens.join(" ");
        let text = text.as_str();

        let (name, args) = match text.find('(') {
            Some(open) => {
                let rest = &text[open + 1..];
                let args = rest
                    .strip_suffix(')')
                    .ok_or_else(|| DataTypeError::MalformedArguments(String::from(text)))?;
                (&text[..open], Some(args))
            }
            None => (text, None),
        };
        if name.trim().is_empty() {
            return Err(DataTypeError::Empty);
        }

        let mut data_type = DataType::new(SqlType::from_name(name)).with_nullable(nullable);
        let Some(args) = args else {
            return Ok(data_type);
        };

        let args = args
            .split(',')
            .map(|a| {
                let a = a.trim();
                a.parse::<u32>()
                    .map_err(|_| DataTypeError::InvalidArgument(String::from(a)))
            })
            .collect::<Result<Vec<u32>, _>>()?;

        match args.as_slice() {
            [n] if data_type.sql_type.has_length() => data_type = data_type.with_length(*n),
            [precision] => data_type = data_type.with_precision(*precision, None),
            [precision, scale] => {
                if !data_type.sql_type.accepts_scale() {
                    return Err(DataTypeError::ScaleNotAllowed(data_type.sql_type));
                }
                if scale > precision {
                    return Err(DataTypeError::ScaleExceedsPrecision {
                        precision: *precision,
                        scale: *scale,
                    });
                }
                data_type = data_type.with_precision(*precision, Some(*scale));
            }
            _ => return Err(DataTypeError::MalformedArguments(String::from(text))),
        }
        Ok(data_type)
    }
}

impl Serialize for DataType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DataType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = StdString::deserialize(deserializer)?;
        DataType::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// A coercion request named a type the resolved field cannot be exposed as.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field '{field}' of type {declared} cannot be coerced to {requested}")]
pub struct TypeMismatch {
    pub field: Name,
    pub declared: ValueType,
    pub requested: ValueType,
}
