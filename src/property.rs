// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Declared property names.
//!
//! A key in a [`Shape`](crate::Shape) is the real property name followed by a
//! run of trailing `?` characters. The run is read in pairs: every `??` stands
//! for one literal `?` in the real name, and a leftover single `?` marks the
//! property as optional.
//!
//! | declared      | real name    | optional |
//! |---------------|--------------|----------|
//! | `"foo"`       | `"foo"`      | no       |
//! | `"foo?"`      | `"foo"`      | yes      |
//! | `"foo??"`     | `"foo?"`     | no       |
//! | `"foo???"`    | `"foo?"`     | yes      |
//! | `"foo?bar??"` | `"foo?bar?"` | no       |
//!
//! `?` characters before the trailing run are part of the name.

/// Splits `name` into the part before its trailing `?` run and the run length.
fn split_trailing_run(name: &str) -> (&str, usize) {
    let head = name.trim_end_matches('?');
    (head, name.len() - head.len())
}

/// Whether the declared name marks an optional property (odd trailing `?` run).
pub fn is_optional_property(name: &str) -> bool {
    let (_, run) = split_trailing_run(name);
    run % 2 == 1
}

/// The real property name a declared name refers to.
pub fn unescape_property_name(name: &str) -> String {
    let (head, run) = split_trailing_run(name);
    let mut unescaped = String::with_capacity(head.len() + run / 2);
    unescaped.push_str(head);
    unescaped.extend(core::iter::repeat('?').take(run / 2));
    unescaped
}

/// A declared property name, decoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclaredProperty {
    declared: String,
    name: String,
    optional: bool,
}

impl DeclaredProperty {
    pub fn parse(declared: impl Into<String>) -> Self {
        let declared = declared.into();
        let name = unescape_property_name(&declared);
        let optional = is_optional_property(&declared);
        Self {
            declared,
            name,
            optional,
        }
    }

    /// The key as written in the shape.
    pub fn declared(&self) -> &str {
        &self.declared
    }

    /// The property name looked up on checked values.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}
