// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `warden` decides which chess moves are legal and how good a position is.
//!
//! A `Game` keeps a board and one `Side` per color. After every move it runs a legality pass that recomputes, for
//! every piece, the squares it controls and the moves it may make, taking checks and pins against its own king into
//! account. On top of that, `eval` scores each side as the sum of its pieces' relative values and a set of weighted
//! positional aspects.

pub mod board;
pub mod core;
pub mod eval;
pub mod game;
mod invariant;
pub mod movegen;
pub mod side;
pub mod tracing;
pub mod tracker;
