// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Composable runtime checkers for dynamically-typed values.
//!
//! A checker answers one question: does an untyped [`Value`] have the shape it
//! describes? Checkers are built bottom-up from primitives ([`j::string`],
//! [`j::number`], ...) and combinators ([`j::any`], [`j::array`],
//! [`j::object`], ...), and every checker carries the static type a successful
//! check implies as [`Check::Output`].
//!
//! ```rust
//! use shapecheck::{j, Check, Shape, Value};
//!
//! let user = j::object(
//!     Shape::new()
//!         .field("name", j::string)
//!         .field("email?", j::nullable(j::string))
//!         .field("tags", j::array(j::string)),
//! );
//!
//! let value = Value::from_json_str(r#"{"name": "ada", "tags": []}"#).unwrap();
//! assert!(user.check(&value));
//! ```

mod checker;
pub mod descriptor;
mod number;
mod object;
pub mod property;
pub mod registry;
mod types;
mod validator;
mod value;

pub use checker::{
    any, array, literal, nullable, AnyOf, ArrayOf, BooleanChecker, Check, Checked, Checker,
    Literal, NilChecker, Nullable, NumberChecker, StringChecker, UnknownChecker,
};
pub use descriptor::{Descriptor, DescriptorError};
pub use number::Number;
pub use object::{object, ObjectChecker, PropertyChecker, Shape};
pub use property::{is_optional_property, unescape_property_name, DeclaredProperty};
pub use registry::{RegistryError, ShapeRegistry};
pub use types::{JsonOf, Null, OrNull, Record};
pub use validator::Validate;
pub use value::Value;

#[cfg(feature = "arc")]
pub(crate) use std::sync::Arc as Rc;

#[cfg(not(feature = "arc"))]
pub(crate) use std::rc::Rc;

/// The checker namespace.
///
/// Primitive checkers are exposed as constants and combinators as functions,
/// so shapes read the same way they are written in data:
/// `j::object(Shape::new().field("id", j::number))`.
#[allow(non_upper_case_globals)]
pub mod j {
    pub use crate::checker::{any, array, literal, nullable};
    pub use crate::object::object;
    pub use crate::{Check, Checker, JsonOf, Shape};

    use crate::checker::{
        BooleanChecker, NilChecker, NumberChecker, StringChecker, UnknownChecker,
    };

    /// Accepts string values.
    pub const string: StringChecker = StringChecker;
    /// Accepts numbers, including NaN and both infinities.
    pub const number: NumberChecker = NumberChecker;
    /// Accepts `true` and `false`.
    pub const boolean: BooleanChecker = BooleanChecker;
    /// Accepts only `null`.
    pub const nil: NilChecker = NilChecker;
    /// Accepts every value.
    pub const unknown: UnknownChecker = UnknownChecker;
}

#[cfg(test)]
mod tests;
