// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Instrumented checkers for observing evaluation order.

use core::sync::atomic::{AtomicUsize, Ordering};
use std::collections::BTreeMap;

use crate::*;

/// Returns a fixed result and counts how often it was asked.
#[derive(Debug)]
pub struct TestChecker {
    result: bool,
    calls: AtomicUsize,
}

impl TestChecker {
    pub fn new(result: bool) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn is_called(&self) -> bool {
        self.calls() > 0
    }
}

impl Check for TestChecker {
    type Output = Value;

    fn check(&self, _value: &Value) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
    }
}

/// Returns the scripted results in order, then `false`.
#[derive(Debug)]
pub struct TestSequenceChecker {
    results: Vec<bool>,
    calls: AtomicUsize,
}

impl TestSequenceChecker {
    pub fn new(results: &[bool]) -> Self {
        Self {
            results: results.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Check for TestSequenceChecker {
    type Output = Value;

    fn check(&self, _value: &Value) -> bool {
        let idx = self.calls.fetch_add(1, Ordering::SeqCst);
        self.results.get(idx).copied().unwrap_or(false)
    }
}

/// Compiles only if `C` validates `T`.
pub fn assert_output<T, C: Check<Output = T>>(_checker: &C) {}

/// Builds an object value from `(key, value)` pairs.
pub fn obj<const N: usize>(fields: [(&str, Value); N]) -> Value {
    Value::from(
        fields
            .into_iter()
            .map(|(k, v)| (Rc::from(k), v))
            .collect::<BTreeMap<_, _>>(),
    )
}

/// A representative value of every kind, including numeric edge cases.
pub fn samples() -> Vec<Value> {
    vec![
        Value::from("foo"),
        Value::from(""),
        Value::from(123),
        Value::from(-1.5),
        Value::from(f64::INFINITY),
        Value::from(f64::NEG_INFINITY),
        Value::from(f64::NAN),
        Value::Bool(true),
        Value::Bool(false),
        Value::Null,
        Value::Undefined,
        Value::new_array(),
        Value::from(vec![Value::Null]),
        Value::new_object(),
        obj([("a", Value::from(1))]),
    ]
}
