// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use anyhow::Result;
use shapecheck::*;

#[test]
fn serialize_undefined() -> Result<()> {
    let mut obj = Value::new_object();
    obj.as_object_mut()?.insert("a".into(), Value::Undefined);
    obj.as_object_mut()?.insert("b".into(), Value::Null);

    let json = serde_json::to_string_pretty(&obj)?;
    let expected = r#"{
  "a": "<undefined>",
  "b": null
}"#;
    assert_eq!(json, expected);
    Ok(())
}

#[test]
fn serialize_number() -> Result<()> {
    // Check that integer values are serialized without fractional part
    assert_eq!(serde_json::to_string_pretty(&Value::from(1.0))?, "1");
    assert_eq!(serde_json::to_string_pretty(&Value::from(-1.0))?, "-1");

    // Ensure that fractional parts are also serialized.
    assert_eq!(serde_json::to_string_pretty(&Value::from(1.1))?, "1.1");
    assert_eq!(serde_json::to_string_pretty(&Value::from(-1.1))?, "-1.1");

    Ok(())
}

#[test]
fn serialize_string() -> Result<()> {
    assert_eq!(
        Value::from("Hello, World\n").to_json_str()?,
        "\"Hello, World\\n\""
    );
    Ok(())
}

#[test]
fn constructors() -> Result<()> {
    assert_eq!(Value::new_object(), Value::from_json_str("{}")?);
    assert_eq!(Value::new_array(), Value::from_json_str("[]")?);
    assert!(Value::new_array().as_array()?.is_empty());
    Ok(())
}

#[test]
fn usize_as_index() -> Result<()> {
    let arr = Value::from_json_str("[1, 2, [3, 4, 5]]")?;
    assert_eq!(&arr[2][0], &Value::from(3));
    assert_eq!(&arr[3], &Value::Undefined);

    // Check case of non indexable item.
    assert_eq!(&Value::Undefined[0], &Value::Undefined);
    assert_eq!(&Value::Null[0], &Value::Undefined);
    assert_eq!(&Value::from("Hello")[0], &Value::Undefined);
    Ok(())
}

#[test]
fn string_as_index() -> Result<()> {
    let obj = Value::from_json_str(r#"{ "a" : 5, "b" : 6 }"#)?;
    assert_eq!(&obj["a"], &Value::from(5.0));
    assert_eq!(&obj["b"], &Value::from(6.0));
    assert_eq!(&obj["c"], &Value::Undefined);
    assert_eq!(&Value::from_json_str("[5]")?["0"], &Value::Undefined);
    Ok(())
}

#[test]
fn accessors() -> Result<()> {
    let v = Value::from_json_str(r#"{"s": "x", "n": 2, "b": false}"#)?;
    assert_eq!(v["s"].as_string()?.as_ref(), "x");
    assert_eq!(v["n"].as_number()?.as_u64(), Some(2));
    assert!(!*v["b"].as_bool()?);
    assert!(v["s"].as_number().is_err());
    assert!(v.as_string().is_err());
    Ok(())
}

#[cfg(feature = "yaml")]
#[test]
fn from_yaml() -> Result<()> {
    let v = Value::from_yaml_str("a: [.nan, .inf, ~]\n")?;
    assert!(v["a"][0].as_number()?.is_nan());
    assert!(v["a"][1].as_number()?.is_infinite());
    assert!(v["a"][2].is_null());
    Ok(())
}
