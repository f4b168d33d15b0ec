// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;
use std::sync::Arc;

use crate::property::DeclaredProperty;
use crate::types::Record;
use crate::{Check, Checker, Value};

type Producer = Arc<dyn Fn() -> Option<Checker<Value>> + Send + Sync>;

/// The checker attached to one declared property.
#[derive(Clone)]
pub enum PropertyChecker {
    /// Used as is.
    Direct(Checker<Value>),
    /// Produced on demand, once per visit of the property. Lets a shape refer
    /// to checkers that do not exist yet, including itself. A producer that
    /// yields `None` rejects the property.
    Deferred(Producer),
}

impl PropertyChecker {
    pub fn direct<C>(checker: C) -> Self
    where
        C: Check + Send + Sync + 'static,
    {
        PropertyChecker::Direct(checker.erase())
    }

    pub fn deferred<F, C>(producer: F) -> Self
    where
        F: Fn() -> C + Send + Sync + 'static,
        C: Check + Send + Sync + 'static,
    {
        PropertyChecker::Deferred(Arc::new(move || Some(producer().erase())))
    }

    pub fn try_deferred<F, C>(producer: F) -> Self
    where
        F: Fn() -> Option<C> + Send + Sync + 'static,
        C: Check + Send + Sync + 'static,
    {
        PropertyChecker::Deferred(Arc::new(move || producer().map(Check::erase)))
    }

    fn check(&self, value: &Value) -> bool {
        match self {
            PropertyChecker::Direct(checker) => checker.check(value),
            PropertyChecker::Deferred(producer) => match producer() {
                Some(checker) => checker.check(value),
                None => false,
            },
        }
    }
}

impl fmt::Debug for PropertyChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyChecker::Direct(_) => f.write_str("Direct"),
            PropertyChecker::Deferred(_) => f.write_str("Deferred"),
        }
    }
}

/// Declared properties of an object and the checkers for their values.
///
/// Keys use the escaping grammar described in [`crate::property`]. Declaring
/// the same key twice keeps its first position and the last checker.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    properties: Vec<(DeclaredProperty, PropertyChecker)>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field<C>(self, key: impl Into<String>, checker: C) -> Self
    where
        C: Check + Send + Sync + 'static,
    {
        self.entry(key, PropertyChecker::direct(checker))
    }

    pub fn lazy<F, C>(self, key: impl Into<String>, producer: F) -> Self
    where
        F: Fn() -> C + Send + Sync + 'static,
        C: Check + Send + Sync + 'static,
    {
        self.entry(key, PropertyChecker::deferred(producer))
    }

    pub fn try_lazy<F, C>(self, key: impl Into<String>, producer: F) -> Self
    where
        F: Fn() -> Option<C> + Send + Sync + 'static,
        C: Check + Send + Sync + 'static,
    {
        self.entry(key, PropertyChecker::try_deferred(producer))
    }

    pub fn entry(mut self, key: impl Into<String>, checker: PropertyChecker) -> Self {
        self.insert(key, checker);
        self
    }

    /// Declares `key`, returning the checker it replaced, if any.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        checker: PropertyChecker,
    ) -> Option<PropertyChecker> {
        let property = DeclaredProperty::parse(key);
        match self
            .properties
            .iter_mut()
            .find(|(existing, _)| existing.declared() == property.declared())
        {
            Some((_, slot)) => Some(core::mem::replace(slot, checker)),
            None => {
                self.properties.push((property, checker));
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn properties(&self) -> impl Iterator<Item = &DeclaredProperty> {
        self.properties.iter().map(|(property, _)| property)
    }
}

impl<K: Into<String>> FromIterator<(K, PropertyChecker)> for Shape {
    fn from_iter<I: IntoIterator<Item = (K, PropertyChecker)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Shape::new(), |shape, (key, checker)| shape.entry(key, checker))
    }
}

/// Accepts objects whose declared properties all pass.
///
/// A present property must satisfy its checker. An absent property is
/// accepted only if it is optional, and its checker is not consulted.
/// Properties that are not declared are ignored. Arrays and every other
/// non-object value are rejected.
#[derive(Debug, Clone)]
pub struct ObjectChecker {
    shape: Shape,
}

impl ObjectChecker {
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Real property names of the accepted record, with their optionality.
    pub fn fields(&self) -> impl Iterator<Item = (&str, bool)> {
        self.shape
            .properties()
            .map(|property| (property.name(), property.is_optional()))
    }
}

impl Check for ObjectChecker {
    type Output = Record;

    fn check(&self, value: &Value) -> bool {
        let Value::Object(fields) = value else {
            return false;
        };
        self.shape
            .properties
            .iter()
            .all(|(property, checker)| match fields.get(property.name()) {
                Some(field) => checker.check(field),
                None => property.is_optional(),
            })
    }
}

pub fn object(shape: Shape) -> ObjectChecker {
    ObjectChecker { shape }
}
