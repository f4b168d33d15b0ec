// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::Result;
use shapecheck::registry::global;
use shapecheck::*;

#[test]
fn shapes_defined_from_yaml_style_data() -> Result<()> {
    let registry = ShapeRegistry::new();
    let definitions = serde_json::json!({
        "Comment": {"object": {
            "author": {"ref": "User"},
            "body": "string",
            "replies?": {"array": {"ref": "Comment"}}
        }},
        "User": {"object": {"name": "string"}}
    });

    for (name, data) in definitions.as_object().expect("definitions") {
        registry.define(name.as_str(), &Descriptor::from_serde_json_value(data)?)?;
    }
    assert_eq!(registry.len(), 2);

    let comment = registry.reference("Comment");
    let value = Value::from_json_str(
        r#"{
            "author": {"name": "a"},
            "body": "hello",
            "replies": [{"author": {"name": "b"}, "body": "hi", "replies": []}]
        }"#,
    )?;
    assert!(comment.check(&value));

    let value = Value::from_json_str(
        r#"{"author": {"name": "a"}, "body": "hello", "replies": [{"author": {}, "body": "hi"}]}"#,
    )?;
    assert!(!comment.check(&value));
    Ok(())
}

#[test]
fn global_registry_round_trip() -> Result<()> {
    let name = "tests::registry::global_registry_round_trip";
    global::register(name, j::array(j::number))?;
    assert!(matches!(
        global::register(name, j::string),
        Err(RegistryError::AlreadyExists(_))
    ));

    let shape = j::object(Shape::new().entry("values", global::deferred(name)));
    assert!(shape.check(&Value::from_json_str(r#"{"values": [1, 2]}"#)?));

    global::remove(name);
    assert!(!shape.check(&Value::from_json_str(r#"{"values": [1, 2]}"#)?));
    Ok(())
}
