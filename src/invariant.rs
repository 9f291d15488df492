// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Reporting of broken engine invariants. These are geometry bugs, never bad input: a violation panics in debug
//! builds and is logged at error level in release builds.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invariant violation: {0}")]
pub struct InvariantViolation(pub String);

#[doc(hidden)]
pub fn report(violation: InvariantViolation) {
    if cfg!(debug_assertions) {
        panic!("{}", violation);
    }

    tracing::error!("{}", violation);
}

/// Asserts that `$cond` holds, reporting an `InvariantViolation` with the formatted message if it does not.
macro_rules! invariant {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::invariant::report($crate::invariant::InvariantViolation(format!($($arg)+)));
        }
    };
}

pub(crate) use invariant;
