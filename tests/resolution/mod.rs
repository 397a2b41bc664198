// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::{anyhow, bail, Result};
use recordtype::*;
use test_generator::test_resources;

macro_rules! my_assert_eq {
    ($left:expr, $right:expr, $($arg:tt)+) => {
	match (&($left), &($right)) {
            (left_val, right_val) => {
                if !(*left_val == *right_val) {
		    return Err(anyhow!("mismatch:\nleft  = {:?}\nright = {:?}\n{}",
		     		       left_val, right_val, format_args!($($arg)+)));
                }
            }
	}
    }
}

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct Lookup {
    // Exactly one of the following selects the key.
    text: Option<String>,
    name: Option<Vec<String>>,
    index: Option<usize>,
    column: Option<usize>,

    expect: Option<usize>,
    tier: Option<String>,
    ambiguous: Option<Vec<usize>>,
}

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct TestCase {
    note: String,
    schema: SchemaDefinition,
    lookups: Vec<Lookup>,
    skip: Option<bool>,
}

#[derive(serde::Deserialize)]
struct YamlTest {
    cases: Vec<TestCase>,
}

fn check_lookup(schema: &Schema, recorder: &RecordAmbiguity, lookup: &Lookup) -> Result<()> {
    let name = lookup.name.as_ref().map(Name::new).transpose()?;
    let key: LookupKey = match (&lookup.text, &name, lookup.index, lookup.column) {
        (Some(text), None, None, None) => text.into(),
        (None, Some(name), None, None) => name.into(),
        (None, None, Some(index), None) => index.into(),
        (None, None, None, Some(column)) => schema
            .field_at(column)
            .ok_or_else(|| anyhow!("no column {column}"))?
            .into(),
        _ => bail!("a lookup needs exactly one of text, name, index or column"),
    };

    let resolved = schema.resolve(key);
    my_assert_eq!(resolved.map(|m| m.index), lookup.expect, "lookup {key}");
    if let Some(tier) = &lookup.tier {
        my_assert_eq!(
            resolved.map(|m| m.tier.to_string()),
            Some(tier.clone()),
            "tier of lookup {key}"
        );
    }

    // Field and position projections agree with resolve.
    my_assert_eq!(
        schema.field(key),
        lookup.expect.and_then(|i| schema.field_at(i)),
        "field of lookup {key}"
    );

    let events = recorder.take();
    match &lookup.ambiguous {
        // Resolved twice above.
        Some(candidates) => {
            my_assert_eq!(events.len(), 2, "notices for lookup {key}");
            my_assert_eq!(&events[0].candidates, candidates, "candidates of {key}");
            my_assert_eq!(Some(events[0].chosen), lookup.expect, "choice for {key}");
        }
        None => my_assert_eq!(events.len(), 0, "notices for lookup {key}"),
    }
    Ok(())
}

fn yaml_test_impl(file: &str) -> Result<()> {
    let yaml_str = std::fs::read_to_string(file)?;
    let test: YamlTest = serde_yaml::from_str(&yaml_str)?;

    println!("running {file}");

    for case in test.cases.into_iter() {
        print!("case {} ", case.note);
        if case.skip == Some(true) {
            println!("skipped");
            continue;
        }

        let recorder = RecordAmbiguity::new();
        let schema = Schema::builder()
            .collation(case.schema.collation)
            .ambiguity_policy(recorder.clone())
            .fields(case.schema.columns.iter().map(ColumnDefinition::to_field))
            .build();

        for lookup in &case.lookups {
            check_lookup(&schema, &recorder, lookup)?;
        }

        println!("passed");
    }

    Ok(())
}

fn yaml_test(file: &str) -> Result<()> {
    match yaml_test_impl(file) {
        Ok(_) => Ok(()),
        Err(e) => {
            // If Err is returned, it doesn't always get printed by cargo test.
            // Therefore, panic with the error.
            panic!("{}", e);
        }
    }
}

#[test_resources("tests/resolution/cases/*.yaml")]
fn run(path: &str) {
    yaml_test(path).unwrap()
}
