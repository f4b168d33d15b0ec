// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use shapecheck::*;
use test_generator::test_resources;

// Interpret special encodings in values read from yaml.
fn process_value(v: &Value) -> Result<Value> {
    match v {
        // Undefined is encoded as the string "#undefined".
        Value::String(s) if s.as_ref() == "#undefined" => Ok(Value::Undefined),

        Value::Array(items) => {
            let mut array_value = Value::new_array();
            let array = array_value.as_array_mut()?;
            for item in items.iter() {
                array.push(process_value(item)?);
            }
            Ok(array_value)
        }

        Value::Object(fields) => {
            let mut object_value = Value::new_object();
            let object = object_value.as_object_mut()?;
            for (key, value) in fields.iter() {
                object.insert(key.clone(), process_value(value)?);
            }
            Ok(object_value)
        }

        _ => Ok(v.clone()),
    }
}

#[derive(Serialize, Deserialize, Debug)]
struct TestCase {
    note: String,
    // Registers the shape under this name before checking.
    define: Option<String>,
    shape: serde_json::Value,
    #[serde(default)]
    accept: Vec<Value>,
    #[serde(default)]
    reject: Vec<Value>,
    want_error: Option<String>,
    skip: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug)]
struct YamlTest {
    #[serde(default)]
    definitions: BTreeMap<String, Descriptor>,
    cases: Vec<TestCase>,
}

fn match_error(actual: DescriptorError, want_error: &Option<String>) -> Result<()> {
    match want_error {
        Some(expected) => {
            let actual = actual.to_string();
            if !actual.contains(expected.as_str()) {
                bail!("Error message\n`{actual}\n`\ndoes not contain `{expected}`");
            }
            Ok(())
        }
        None => Err(actual.into()),
    }
}

fn run_case(case: &TestCase, registry: &ShapeRegistry) -> Result<()> {
    let descriptor = match Descriptor::from_serde_json_value(&case.shape) {
        Ok(descriptor) => descriptor,
        Err(actual) => return match_error(actual, &case.want_error),
    };

    if let Some(name) = &case.define {
        if let Err(actual) = registry.define(name.as_str(), &descriptor) {
            return match_error(actual, &case.want_error);
        }
    }

    if let Some(expected) = &case.want_error {
        bail!("succeeded, expected error `{expected}`");
    }

    let unresolved = registry.unresolved(&descriptor);
    if !unresolved.is_empty() {
        bail!("unresolved references {unresolved:?}");
    }

    let checker = descriptor.compile(registry);
    for value in &case.accept {
        let value = process_value(value)?;
        if !checker.check(&value) {
            bail!("rejected {value:?}");
        }
    }
    for value in &case.reject {
        let value = process_value(value)?;
        if checker.check(&value) {
            bail!("accepted {value:?}");
        }
    }
    Ok(())
}

fn yaml_test_impl(file: &str) -> Result<()> {
    let yaml_str = std::fs::read_to_string(file)?;
    let test: YamlTest = serde_yaml::from_str(&yaml_str)?;

    std::eprintln!("running {file}");

    let registry = ShapeRegistry::new();
    for (name, descriptor) in &test.definitions {
        registry.define(name.as_str(), descriptor)?;
    }

    for case in &test.cases {
        std::print!("case {} ", case.note);
        if case.skip == Some(true) {
            std::println!("skipped");
            continue;
        }

        if case.accept.is_empty() && case.reject.is_empty() && case.want_error.is_none() {
            bail!("case {} checks nothing", case.note);
        }

        if let Err(e) = run_case(case, &registry) {
            bail!("case {} failed: {e}", case.note);
        }
        std::println!("passed");
    }

    Ok(())
}

fn yaml_test(file: &str) -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    match yaml_test_impl(file) {
        Ok(_) => Ok(()),
        Err(e) => {
            // If Err is returned, it doesn't always get printed by cargo test.
            // Therefore, panic with the error.
            panic!("{e}");
        }
    }
}

#[test_resources("tests/cases/**/*.yaml")]
fn run(path: &str) {
    yaml_test(path).unwrap()
}
