// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::{Check, Value};

/// The `validate` spelling of [`Check::check`], kept for callers written
/// against the older validator interface.
pub trait Validate {
    fn validate(&self, value: &Value) -> bool;
}

impl<C: Check + ?Sized> Validate for C {
    fn validate(&self, value: &Value) -> bool {
        self.check(value)
    }
}
