// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Static evaluation of a `Game`. Each side scores the relative values of its pieces plus a set of weighted aspects,
//! and the game's value is White's total minus Black's.

pub mod analysis;
pub mod aspect;
#[allow(clippy::module_inception)]
mod eval;
mod piece;
mod score;
mod value;
pub mod weights;

pub use aspect::{standard_aspects, Aspect, AspectKind, Context};
pub use eval::{evaluate, AspectRow, Breakdown};
pub use piece::{base_value, relative_value, table_value};
pub use score::Score;
pub use value::{Draw, Value};
pub use weights::Weights;
