// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;
use core::marker::PhantomData;
use core::ops::Deref;
use std::sync::Arc;

use crate::types::{Null, OrNull};
use crate::Value;

/// A predicate over untyped values.
///
/// `check` is total: it returns `false` for anything it does not accept and
/// never panics. A checker holds no mutable state, so one instance can be
/// shared freely and invoked from several threads at once.
///
/// `Output` is the type a successful check implies. See [`crate::JsonOf`].
pub trait Check {
    type Output;

    fn check(&self, value: &Value) -> bool;

    /// Checks `value` and, on success, returns it tagged with `Output`.
    fn narrow<'a>(&self, value: &'a Value) -> Option<Checked<'a, Self::Output>> {
        if self.check(value) {
            Some(Checked::new(value))
        } else {
            None
        }
    }

    /// Moves the checker behind a shared, type-erased handle.
    fn boxed(self) -> Checker<Self::Output>
    where
        Self: Sized + Send + Sync + 'static,
    {
        Checker::new(self)
    }

    /// Like [`Check::boxed`], but widens `Output` to the top type.
    ///
    /// Used to put checkers of different output types side by side, for
    /// example in [`any`] or a [`Shape`](crate::Shape).
    fn erase(self) -> Checker<Value>
    where
        Self: Sized + Send + Sync + 'static,
    {
        Checker::new(Erased(self))
    }
}

impl<C: Check + ?Sized> Check for &C {
    type Output = C::Output;

    fn check(&self, value: &Value) -> bool {
        (**self).check(value)
    }
}

impl<C: Check + ?Sized> Check for Box<C> {
    type Output = C::Output;

    fn check(&self, value: &Value) -> bool {
        (**self).check(value)
    }
}

impl<C: Check + ?Sized> Check for Arc<C> {
    type Output = C::Output;

    fn check(&self, value: &Value) -> bool {
        (**self).check(value)
    }
}

/// A value that passed a check, tagged with the type the check implies.
///
/// This is a borrowed view; the value itself is never copied or converted.
pub struct Checked<'a, T> {
    value: &'a Value,
    _type: PhantomData<fn() -> T>,
}

impl<'a, T> Checked<'a, T> {
    pub(crate) fn new(value: &'a Value) -> Self {
        Self {
            value,
            _type: PhantomData,
        }
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }
}

impl<T> Clone for Checked<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Checked<'_, T> {}

impl<T> Deref for Checked<'_, T> {
    type Target = Value;

    fn deref(&self) -> &Value {
        self.value
    }
}

impl<T> fmt::Debug for Checked<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Checked").field(self.value).finish()
    }
}

/// A shared, type-erased checker.
///
/// Cloning is cheap and clones share the underlying checker.
pub struct Checker<T = Value> {
    inner: Arc<dyn Check<Output = T> + Send + Sync>,
}

impl<T> Checker<T> {
    pub fn new<C>(checker: C) -> Self
    where
        C: Check<Output = T> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(checker),
        }
    }
}

impl<T> Clone for Checker<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Checker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Checker")
    }
}

impl<T> Check for Checker<T> {
    type Output = T;

    fn check(&self, value: &Value) -> bool {
        self.inner.check(value)
    }
}

struct Erased<C>(C);

impl<C: Check> Check for Erased<C> {
    type Output = Value;

    fn check(&self, value: &Value) -> bool {
        self.0.check(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StringChecker;

impl Check for StringChecker {
    type Output = String;

    fn check(&self, value: &Value) -> bool {
        matches!(value, Value::String(_))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NumberChecker;

impl Check for NumberChecker {
    type Output = f64;

    fn check(&self, value: &Value) -> bool {
        matches!(value, Value::Number(_))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanChecker;

impl Check for BooleanChecker {
    type Output = bool;

    fn check(&self, value: &Value) -> bool {
        matches!(value, Value::Bool(_))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NilChecker;

impl Check for NilChecker {
    type Output = Null;

    fn check(&self, value: &Value) -> bool {
        matches!(value, Value::Null)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownChecker;

impl Check for UnknownChecker {
    type Output = Value;

    fn check(&self, _value: &Value) -> bool {
        true
    }
}

/// Accepts exactly one string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    expected: Box<str>,
}

impl Literal {
    pub fn as_str(&self) -> &str {
        &self.expected
    }
}

impl Check for Literal {
    type Output = String;

    fn check(&self, value: &Value) -> bool {
        matches!(value, Value::String(s) if s.as_ref() == self.as_str())
    }
}

pub fn literal(expected: impl Into<String>) -> Literal {
    Literal {
        expected: expected.into().into_boxed_str(),
    }
}

/// Accepts a value if any of its checkers does.
///
/// Checkers run in order and evaluation stops at the first one that accepts.
/// With no checkers nothing is accepted.
#[derive(Debug, Clone)]
pub struct AnyOf<C> {
    checkers: Vec<C>,
}

impl<C> AnyOf<C> {
    pub fn checkers(&self) -> &[C] {
        &self.checkers
    }
}

impl<C: Check> Check for AnyOf<C> {
    type Output = C::Output;

    fn check(&self, value: &Value) -> bool {
        self.checkers.iter().any(|checker| checker.check(value))
    }
}

pub fn any<I>(checkers: I) -> AnyOf<I::Item>
where
    I: IntoIterator,
    I::Item: Check,
{
    AnyOf {
        checkers: checkers.into_iter().collect(),
    }
}

/// Accepts `null` without consulting the wrapped checker.
#[derive(Debug, Clone)]
pub struct Nullable<C> {
    inner: C,
}

impl<C> Nullable<C> {
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C> Check for Nullable<C>
where
    C: Check,
    C::Output: OrNull,
{
    type Output = <C::Output as OrNull>::Output;

    fn check(&self, value: &Value) -> bool {
        value.is_null() || self.inner.check(value)
    }
}

pub fn nullable<C>(checker: C) -> Nullable<C>
where
    C: Check,
    C::Output: OrNull,
{
    Nullable { inner: checker }
}

/// Accepts arrays whose every element passes the element checker.
///
/// Elements are checked in order; the first rejected element ends the check.
#[derive(Debug, Clone)]
pub struct ArrayOf<C> {
    element: C,
}

impl<C> ArrayOf<C> {
    pub fn element(&self) -> &C {
        &self.element
    }
}

impl<C: Check> Check for ArrayOf<C> {
    type Output = Vec<C::Output>;

    fn check(&self, value: &Value) -> bool {
        match value {
            Value::Array(items) => items.iter().all(|item| self.element.check(item)),
            _ => false,
        }
    }
}

pub fn array<C: Check>(element: C) -> ArrayOf<C> {
    ArrayOf { element }
}
