// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Named checkers.
//!
//! A registry lets shapes refer to each other by name. References are
//! resolved when a value is checked, so a shape may refer to itself or to a
//! shape that is registered later.

use std::cell::RefCell;
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use log::{debug, warn};

use crate::{Check, Checker, Descriptor, PropertyChecker, Value};

/// Errors that can occur when interacting with a [`ShapeRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("shape registration failed: a shape named '{0}' is already registered")]
    AlreadyExists(String),
    #[error("shape registration failed: the name '{0}' is invalid (empty or whitespace-only names are not allowed)")]
    InvalidName(String),
}

/// Validates that a shape name is not empty or whitespace-only.
fn validate_name(name: &str) -> Result<(), RegistryError> {
    if name.trim().is_empty() {
        Err(RegistryError::InvalidName(String::from(name)))
    } else {
        Ok(())
    }
}

type Entries = DashMap<String, Checker<Value>>;

/// Thread-safe registry of named checkers.
///
/// Clones share the same entries.
#[derive(Clone, Default)]
pub struct ShapeRegistry {
    inner: Arc<Entries>,
    // Descriptors of shapes added through `define`, used to detect reference
    // cycles that never descend into the value.
    pub(crate) descriptors: Arc<DashMap<String, Descriptor>>,
}

lazy_static::lazy_static! {
    /// Process-wide registry used by the helpers in [`global`].
    pub static ref SHAPE_REGISTRY: ShapeRegistry = ShapeRegistry::new();
}

impl ShapeRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a checker with a given name. Returns Err if name already exists.
    pub fn register<C>(&self, name: impl Into<String>, checker: C) -> Result<(), RegistryError>
    where
        C: Check + Send + Sync + 'static,
    {
        let name = name.into();
        validate_name(&name)?;

        use dashmap::mapref::entry::Entry;
        match self.inner.entry(name) {
            Entry::Occupied(e) => Err(RegistryError::AlreadyExists(e.key().clone())),
            Entry::Vacant(e) => {
                debug!("registered shape '{}'", e.key());
                e.insert(checker.erase());
                Ok(())
            }
        }
    }

    /// Retrieve a checker by name, if it exists.
    pub fn get(&self, name: &str) -> Option<Checker<Value>> {
        self.inner.get(name).map(|entry| entry.value().clone())
    }

    /// Remove a checker by name. Returns the removed checker if it existed.
    pub fn remove(&self, name: &str) -> Option<Checker<Value>> {
        self.descriptors.remove(name);
        let removed = self.inner.remove(name).map(|(_, checker)| checker);
        if removed.is_some() {
            debug!("removed shape '{name}'");
        }
        removed
    }

    /// List all registered names.
    pub fn list_names(&self) -> Vec<String> {
        self.inner.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&self) {
        self.descriptors.clear();
        self.inner.clear();
    }

    /// A checker that looks `name` up on every check.
    ///
    /// Rejects while `name` is unregistered or after the registry is dropped.
    pub fn reference(&self, name: impl Into<String>) -> Checker<Value> {
        Checker::new(self.lookup(name))
    }

    /// Same lookup as [`ShapeRegistry::reference`], as a deferred property.
    pub fn deferred(&self, name: impl Into<String>) -> PropertyChecker {
        let lookup = self.lookup(name);
        PropertyChecker::Deferred(Arc::new(move || lookup.resolve()))
    }

    fn lookup(&self, name: impl Into<String>) -> Lookup {
        Lookup {
            name: name.into(),
            entries: Arc::downgrade(&self.inner),
        }
    }
}

impl core::fmt::Debug for ShapeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShapeRegistry")
            .field("names", &self.list_names())
            .finish()
    }
}

// Holds the entries weakly so that a registered shape referring to its own
// registry does not keep the registry alive.
struct Lookup {
    name: String,
    entries: Weak<Entries>,
}

impl Lookup {
    fn resolve(&self) -> Option<Checker<Value>> {
        let Some(entries) = self.entries.upgrade() else {
            warn!("shape '{}' referenced after its registry was dropped", self.name);
            return None;
        };
        // The entry guard is released before the checker runs, so recursive
        // shapes can look themselves up again.
        let checker = entries.get(&self.name).map(|entry| entry.value().clone());
        if checker.is_none() {
            warn!("unresolved shape reference '{}'", self.name);
        }
        checker
    }
}

thread_local! {
    // (lookup, value) pairs currently being checked on this thread.
    static ACTIVE: RefCell<Vec<(usize, usize)>> = const { RefCell::new(Vec::new()) };
}

// Pops the active entry when the check finishes, including on unwind.
struct ActiveGuard;

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        ACTIVE.with(|active| {
            active.borrow_mut().pop();
        });
    }
}

impl Check for Lookup {
    type Output = Value;

    fn check(&self, value: &Value) -> bool {
        let key = (
            self as *const Lookup as usize,
            value as *const Value as usize,
        );
        // Reaching the same lookup again with the same value means the
        // reference cycle never descended into a property or element.
        let reentered = ACTIVE.with(|active| {
            let mut active = active.borrow_mut();
            if active.contains(&key) {
                true
            } else {
                active.push(key);
                false
            }
        });
        if reentered {
            warn!("shape '{}' refers to itself without consuming the value", self.name);
            return false;
        }
        let _guard = ActiveGuard;

        match self.resolve() {
            Some(checker) => checker.check(value),
            None => false,
        }
    }
}

/// Helper functions for the process-wide [`SHAPE_REGISTRY`].
pub mod global {
    use super::*;

    pub fn register<C>(name: impl Into<String>, checker: C) -> Result<(), RegistryError>
    where
        C: Check + Send + Sync + 'static,
    {
        SHAPE_REGISTRY.register(name, checker)
    }

    pub fn get(name: &str) -> Option<Checker<Value>> {
        SHAPE_REGISTRY.get(name)
    }

    pub fn remove(name: &str) -> Option<Checker<Value>> {
        SHAPE_REGISTRY.remove(name)
    }

    pub fn contains(name: &str) -> bool {
        SHAPE_REGISTRY.contains(name)
    }

    pub fn list_names() -> Vec<String> {
        SHAPE_REGISTRY.list_names()
    }

    pub fn reference(name: impl Into<String>) -> Checker<Value> {
        SHAPE_REGISTRY.reference(name)
    }

    pub fn deferred(name: impl Into<String>) -> PropertyChecker {
        SHAPE_REGISTRY.deferred(name)
    }
}
