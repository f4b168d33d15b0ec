// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Static types produced by checkers.
//!
//! Every checker names, through [`Check::Output`](crate::Check::Output), the
//! type that a successful check guarantees. The mapping is:
//!
//! | checker            | `Output`                                  |
//! |--------------------|-------------------------------------------|
//! | `string`           | `String`                                  |
//! | `number`           | `f64`                                     |
//! | `boolean`          | `bool`                                    |
//! | `nil`              | [`Null`]                                  |
//! | `unknown`          | [`Value`] (the top type)                  |
//! | `literal(s)`       | `String`                                  |
//! | `any([c, ..])`     | `JsonOf<c>`                               |
//! | `nullable(c)`      | `<JsonOf<c> as OrNull>::Output`           |
//! | `array(c)`         | `Vec<JsonOf<c>>`                          |
//! | `object(shape)`    | [`Record`]                                |
//!
//! Rust has neither string singleton types nor records keyed by arbitrary
//! strings, so `literal` and `object` map to the nearest nominal types.

use crate::{Check, Value};

/// Extracts the type validated by a checker.
pub type JsonOf<C> = <C as Check>::Output;

/// The type of the `null` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Null;

/// The type of an object accepted by [`object`](crate::object).
///
/// The field names and their optionality are available at run time through
/// [`ObjectChecker::fields`](crate::ObjectChecker::fields).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Record;

/// Union of a type with `null`.
///
/// The top type and `Null` absorb `null`; an optional type stays optional.
pub trait OrNull {
    type Output;
}

impl OrNull for Value {
    type Output = Value;
}

impl OrNull for Null {
    type Output = Null;
}

impl<T> OrNull for Option<T> {
    type Output = Option<T>;
}

macro_rules! or_null_is_option {
    ($($t:ty),* $(,)?) => {
        $(
            impl OrNull for $t {
                type Output = Option<$t>;
            }
        )*
    };
}

or_null_is_option!(String, f64, bool, Record);

impl<T> OrNull for Vec<T> {
    type Output = Option<Vec<T>>;
}
