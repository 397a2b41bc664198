// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::Result;
use recordtype::*;

const DEFINITION: &str = r#"
{
  "ambiguity": "ignore",
  "columns": [
    { "name": "public.orders.id", "type": "BIGINT NOT NULL" },
    { "name": "public.orders.customer_id", "type": "BIGINT" },
    { "name": "public.orders.total", "type": "DECIMAL(10, 2)" },
    { "name": "public.orders.placed_at", "type": "TIMESTAMP" },
    { "name": "public.customers.id", "type": "BIGINT NOT NULL" },
    { "name": "public.customers.name", "type": "VARCHAR(100)" },
    { "name": "note", "type": "TEXT" }
  ]
}
"#;

fn schema() -> Result<Schema> {
    Ok(Schema::from_json_str(DEFINITION)?)
}

fn text_keys() -> Vec<&'static str> {
    vec![
        "id",
        "total",
        "note",
        "orders.id",
        "customers.id",
        "public.orders.total",
        "db.public.orders.placed_at",
        "customers.total",
        "missing",
        "a..b",
        "\"orders.id\"",
    ]
}

#[test]
fn field_at_is_total_below_degree() -> Result<()> {
    let schema = schema()?;
    assert_eq!(schema.degree(), 7);
    for index in 0..schema.degree() + 3 {
        assert_eq!(schema.field_at(index).is_some(), index < schema.degree());
        assert_eq!(schema.field_at(index), schema.fields().get(index));
    }
    Ok(())
}

#[test]
fn every_field_resolves_to_itself() -> Result<()> {
    let schema = schema()?;
    for (index, field) in schema.fields().iter().enumerate() {
        assert_eq!(schema.index_of(field), Some(index));
        assert_eq!(schema.field(field), Some(field));
        assert_eq!(schema.index_of(index), Some(index));
    }
    Ok(())
}

#[test]
fn index_of_agrees_with_field() -> Result<()> {
    let schema = schema()?;
    for key in text_keys() {
        let by_field = schema.field(key);
        let by_index = schema.index_of(key).and_then(|i| schema.field_at(i));
        assert_eq!(by_field, by_index, "key {key}");
    }
    for field in schema.fields() {
        let name = field.name();
        assert_eq!(
            schema.field(name),
            schema.index_of(name).and_then(|i| schema.field_at(i))
        );
    }
    Ok(())
}

#[test]
fn lookups_are_deterministic() -> Result<()> {
    let schema = schema()?;
    let clone = schema.clone();
    for key in text_keys() {
        let first = schema.resolve(key);
        for _ in 0..5 {
            assert_eq!(schema.resolve(key), first);
            assert_eq!(clone.resolve(key), first);
        }
    }
    Ok(())
}

#[test]
fn projections_follow_key_order() -> Result<()> {
    let schema = schema()?;
    let keys = text_keys();
    let expected: Vec<&Field> = keys.iter().filter_map(|k| schema.field(*k)).collect();
    assert_eq!(schema.fields_of(keys.iter().copied()), expected);

    // A full projection by identity reproduces the schema.
    let all: Vec<&Field> = schema.fields().iter().collect();
    assert_eq!(schema.fields_of(schema.fields()), all);

    assert_eq!(schema.types().len(), schema.degree());
    assert_eq!(schema.data_types().len(), schema.degree());
    for (index, field) in schema.fields().iter().enumerate() {
        assert_eq!(schema.types()[index], field.value_type());
        assert_eq!(schema.data_types()[index], field.data_type());
    }
    Ok(())
}

#[test]
fn coercion_keeps_identity() -> Result<()> {
    let schema = schema()?;
    let requests = [
        ValueType::Double,
        ValueType::String,
        ValueType::Timestamp,
        ValueType::Long,
    ];
    for field in schema.fields() {
        for requested in &requests {
            match schema.field_as(field, requested) {
                Ok(Some(coerced)) => {
                    assert!(coerced.is_same(field));
                    assert_eq!(coerced.value_type(), requested);
                    assert_eq!(coerced.name(), field.name());
                    assert_eq!(schema.index_of(&coerced), schema.index_of(field));
                }
                Ok(None) => panic!("{} did not resolve", field.name()),
                Err(mismatch) => {
                    assert!(!field.value_type().can_coerce_to(requested));
                    assert_eq!(&mismatch.field, field.name());
                    assert_eq!(&mismatch.declared, field.value_type());
                    assert_eq!(&mismatch.requested, requested);
                }
            }
        }
    }
    Ok(())
}

#[test]
fn misses_are_not_errors() -> Result<()> {
    let schema = schema()?;
    assert_eq!(schema.field_as("missing", &ValueType::Int)?, None);
    assert_eq!(
        schema.field_as_data_type(99usize, &DataType::new(SqlType::Integer))?,
        None
    );
    assert_eq!(schema.type_of("missing"), None);
    assert_eq!(schema.data_type_of("missing"), None);
    Ok(())
}

#[test]
fn coercion_failures_are_reported() -> Result<()> {
    let schema = schema()?;
    let err = schema
        .field_as("placed_at", &ValueType::Boolean)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "field 'public.orders.placed_at' of type timestamp cannot be coerced to boolean"
    );
    Ok(())
}

#[test]
fn projection_length() -> Result<()> {
    let schema = schema()?;
    let keys = text_keys();
    let resolved = keys.iter().filter(|k| schema.index_of(**k).is_some()).count();
    let projected = schema.fields_of(keys.iter().copied());
    assert!(projected.len() <= keys.len());
    assert_eq!(projected.len(), resolved);
    assert!(resolved < keys.len());

    let hits = ["orders.id", "note", "total"];
    assert_eq!(schema.fields_of(hits).len(), hits.len());
    Ok(())
}

#[test]
fn unique_names_resolve_exactly() -> Result<()> {
    let schema = schema()?;
    for field in schema.fields() {
        let by_name = schema.resolve(field.name()).expect("qualified names are unique");
        assert_eq!(by_name.tier, MatchTier::Exact);
        assert_eq!(schema.field_at(by_name.index), Some(field));
    }
    Ok(())
}

#[test]
fn warn_policy_does_not_change_results() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    let schema = schema()?.with_ambiguity_policy(WarnOnAmbiguity);
    let quiet = schema.with_ambiguity_policy(IgnoreAmbiguity);
    for key in text_keys() {
        assert_eq!(schema.resolve(key), quiet.resolve(key), "key {key}");
    }
    assert_eq!(schema.index_of("id"), Some(0));
    Ok(())
}
