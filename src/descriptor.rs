// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shapes written as data.
//!
//! A descriptor is either a kind name or a map with exactly one combinator key:
//!
//! ```yaml
//! object:
//!   id: number
//!   name: string
//!   "nickname?": { nullable: string }
//!   role: { any: [ { literal: admin }, { literal: user } ] }
//!   tags: { array: string }
//!   "parent?": { ref: Node }
//! ```
//!
//! Kind names are `string`, `number`, `boolean`, `null` and `unknown`.
//! Combinators are `literal`, `any`, `nullable`, `array`, `object` and `ref`.
//! Object keys use the escaping grammar of [`crate::property`]. A `ref` names a
//! checker in a [`ShapeRegistry`] and is resolved when values are checked, so
//! descriptors may be recursive and may refer to shapes defined later.

use std::collections::BTreeSet;

use log::trace;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map};

use crate::checker::{
    any, array, literal, nullable, BooleanChecker, NilChecker, NumberChecker, StringChecker,
    UnknownChecker,
};
use crate::object::{object, PropertyChecker, Shape};
use crate::registry::{RegistryError, ShapeRegistry};
use crate::{Check, Checker, Value};

/// Errors produced while reading or defining descriptors.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("failed to parse descriptor: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "yaml")]
    #[error("failed to parse descriptor: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unknown kind `{kind}` at {path}")]
    UnknownKind { kind: String, path: String },
    #[error("invalid descriptor at {path}: {message}")]
    Invalid { path: String, message: String },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

fn invalid(path: &str, message: impl Into<String>) -> DescriptorError {
    DescriptorError::Invalid {
        path: path.to_string(),
        message: message.into(),
    }
}

/// A parsed shape description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    String,
    Number,
    Boolean,
    Null,
    Unknown,
    Literal(String),
    Any(Vec<Descriptor>),
    Nullable(Box<Descriptor>),
    Array(Box<Descriptor>),
    /// Declared keys, in document order.
    Object(Vec<(String, Descriptor)>),
    Ref(String),
}

impl Descriptor {
    pub fn from_serde_json_value(value: &serde_json::Value) -> Result<Self, DescriptorError> {
        Self::parse(value, "$")
    }

    pub fn from_json_str(s: &str) -> Result<Self, DescriptorError> {
        let value: serde_json::Value = serde_json::from_str(s)?;
        Self::from_serde_json_value(&value)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(s: &str) -> Result<Self, DescriptorError> {
        let value: serde_json::Value = serde_yaml::from_str(s)?;
        Self::from_serde_json_value(&value)
    }

    fn parse(value: &serde_json::Value, path: &str) -> Result<Self, DescriptorError> {
        match value {
            serde_json::Value::String(kind) => match kind.as_str() {
                "string" => Ok(Descriptor::String),
                "number" => Ok(Descriptor::Number),
                "boolean" => Ok(Descriptor::Boolean),
                "null" => Ok(Descriptor::Null),
                "unknown" => Ok(Descriptor::Unknown),
                _ => Err(DescriptorError::UnknownKind {
                    kind: kind.clone(),
                    path: path.to_string(),
                }),
            },
            serde_json::Value::Object(map) => {
                let mut entries = map.iter();
                let (Some((key, inner)), None) = (entries.next(), entries.next()) else {
                    return Err(invalid(
                        path,
                        "expected exactly one of literal, any, nullable, array, object, ref",
                    ));
                };
                let path = format!("{path}.{key}");
                match key.as_str() {
                    "literal" => match inner {
                        serde_json::Value::String(s) => Ok(Descriptor::Literal(s.clone())),
                        _ => Err(invalid(&path, "literal expects a string")),
                    },
                    "any" => match inner {
                        serde_json::Value::Array(items) => items
                            .iter()
                            .enumerate()
                            .map(|(idx, item)| Self::parse(item, &format!("{path}[{idx}]")))
                            .collect::<Result<Vec<_>, _>>()
                            .map(Descriptor::Any),
                        _ => Err(invalid(&path, "any expects a list of descriptors")),
                    },
                    "nullable" => Ok(Descriptor::Nullable(Box::new(Self::parse(inner, &path)?))),
                    "array" => Ok(Descriptor::Array(Box::new(Self::parse(inner, &path)?))),
                    "object" => match inner {
                        serde_json::Value::Object(properties) => properties
                            .iter()
                            .map(|(name, d)| {
                                Ok((name.clone(), Self::parse(d, &format!("{path}.{name}"))?))
                            })
                            .collect::<Result<Vec<_>, DescriptorError>>()
                            .map(Descriptor::Object),
                        _ => Err(invalid(&path, "object expects a map of properties")),
                    },
                    "ref" => match inner {
                        serde_json::Value::String(name) if !name.trim().is_empty() => {
                            Ok(Descriptor::Ref(name.clone()))
                        }
                        _ => Err(invalid(&path, "ref expects a non-empty name")),
                    },
                    other => Err(invalid(&path, format!("unknown combinator `{other}`"))),
                }
            }
            other => Err(invalid(
                path,
                format!("expected a kind name or a combinator, found `{other}`"),
            )),
        }
    }

    pub fn to_serde_json_value(&self) -> serde_json::Value {
        match self {
            Descriptor::String => json!("string"),
            Descriptor::Number => json!("number"),
            Descriptor::Boolean => json!("boolean"),
            Descriptor::Null => json!("null"),
            Descriptor::Unknown => json!("unknown"),
            Descriptor::Literal(s) => json!({ "literal": s }),
            Descriptor::Any(items) => json!({
                "any": items.iter().map(Self::to_serde_json_value).collect::<Vec<_>>()
            }),
            Descriptor::Nullable(inner) => json!({ "nullable": inner.to_serde_json_value() }),
            Descriptor::Array(inner) => json!({ "array": inner.to_serde_json_value() }),
            Descriptor::Object(properties) => {
                let properties: Map<String, serde_json::Value> = properties
                    .iter()
                    .map(|(name, d)| (name.clone(), d.to_serde_json_value()))
                    .collect();
                json!({ "object": properties })
            }
            Descriptor::Ref(name) => json!({ "ref": name }),
        }
    }

    /// Names of all registry entries this descriptor refers to.
    pub fn references(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_references(&mut names);
        names
    }

    /// References reached without passing through an object property or an
    /// array element, that is, references checked against the same value.
    fn unguarded_references(&self) -> BTreeSet<String> {
        match self {
            Descriptor::Ref(name) => BTreeSet::from([name.clone()]),
            Descriptor::Any(items) => items
                .iter()
                .flat_map(Descriptor::unguarded_references)
                .collect(),
            Descriptor::Nullable(inner) => inner.unguarded_references(),
            _ => BTreeSet::new(),
        }
    }

    fn collect_references(&self, names: &mut BTreeSet<String>) {
        match self {
            Descriptor::Ref(name) => {
                names.insert(name.clone());
            }
            Descriptor::Any(items) => items.iter().for_each(|d| d.collect_references(names)),
            Descriptor::Nullable(inner) | Descriptor::Array(inner) => {
                inner.collect_references(names)
            }
            Descriptor::Object(properties) => properties
                .iter()
                .for_each(|(_, d)| d.collect_references(names)),
            _ => (),
        }
    }

    /// Builds the checker this descriptor describes.
    ///
    /// `ref` entries are looked up in `registry` when values are checked.
    pub fn compile(&self, registry: &ShapeRegistry) -> Checker<Value> {
        trace!("compiling descriptor {}", self.to_serde_json_value());
        match self {
            Descriptor::String => StringChecker.erase(),
            Descriptor::Number => NumberChecker.erase(),
            Descriptor::Boolean => BooleanChecker.erase(),
            Descriptor::Null => NilChecker.erase(),
            Descriptor::Unknown => UnknownChecker.boxed(),
            Descriptor::Literal(s) => literal(s.as_str()).erase(),
            Descriptor::Any(items) => {
                any(items.iter().map(|d| d.compile(registry)).collect::<Vec<_>>()).boxed()
            }
            Descriptor::Nullable(inner) => nullable(inner.compile(registry)).boxed(),
            Descriptor::Array(inner) => array(inner.compile(registry)).erase(),
            Descriptor::Object(properties) => object(
                properties
                    .iter()
                    .map(|(name, d)| {
                        let checker = match d {
                            Descriptor::Ref(target) => registry.deferred(target.as_str()),
                            _ => PropertyChecker::Direct(d.compile(registry)),
                        };
                        (name.as_str(), checker)
                    })
                    .collect::<Shape>(),
            )
            .erase(),
            Descriptor::Ref(name) => registry.reference(name.as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for Descriptor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v: serde_json::Value = Deserialize::deserialize(deserializer)?;
        Descriptor::from_serde_json_value(&v).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Descriptor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_serde_json_value().serialize(serializer)
    }
}

impl ShapeRegistry {
    /// Compiles `descriptor` and registers it under `name`.
    ///
    /// Fails if `name` would reach itself through references that never
    /// descend into an object property or an array element, since checking
    /// such a shape could not terminate.
    pub fn define(
        &self,
        name: impl Into<String>,
        descriptor: &Descriptor,
    ) -> Result<(), DescriptorError> {
        let name = name.into();
        let mut path = vec![name.clone()];
        if self.find_cycle(&name, descriptor, &mut path, &mut BTreeSet::new()) {
            return Err(invalid(
                "$",
                format!(
                    "reference cycle `{}` does not pass through an object property or array element",
                    path.join(" -> ")
                ),
            ));
        }

        let checker = descriptor.compile(self);
        self.register(name.as_str(), checker)?;
        trace!("defined shape '{name}'");
        self.descriptors.insert(name, descriptor.clone());
        Ok(())
    }

    // Depth-first walk over unguarded references of defined shapes. On
    // success `path` holds the cycle, ending in `target`.
    fn find_cycle(
        &self,
        target: &str,
        descriptor: &Descriptor,
        path: &mut Vec<String>,
        visited: &mut BTreeSet<String>,
    ) -> bool {
        for next in descriptor.unguarded_references() {
            if next == target {
                path.push(next);
                return true;
            }
            if !visited.insert(next.clone()) {
                continue;
            }
            let Some(defined) = self.descriptors.get(&next).map(|d| d.value().clone()) else {
                continue;
            };
            path.push(next);
            if self.find_cycle(target, &defined, path, visited) {
                return true;
            }
            path.pop();
        }
        false
    }

    /// References in `descriptor` that are not registered yet.
    pub fn unresolved(&self, descriptor: &Descriptor) -> Vec<String> {
        descriptor
            .references()
            .into_iter()
            .filter(|name| !self.contains(name))
            .collect()
    }
}
