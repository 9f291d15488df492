// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tracing constants that are used elsewhere in warden.
//!
//! The code in `warden::tracing` operates by creating spans and messages with known string values, so that they can be
//! interpreted by `tracing` Layers that are operating upon them. This module collects them all in one place.

/// The name of a span covering one recomputation of both sides' legal moves.
pub const LEGALITY_PASS: &str = "legality_pass";

/// The name of a span covering the evaluation of a whole game.
pub const EVALUATE: &str = "evaluate";

/// A king was found in check. Carries `king`, `attacker` and `piece`.
pub const CHECK: &str = "check";

/// A piece was found pinned to its king. Carries `pinned` and `pinner`.
pub const PIN: &str = "pin";

/// A move was played on the board. Carries `mov` and `side`.
pub const MOVE_APPLIED: &str = "move applied";

/// One weighted aspect term was computed. Carries `side`, `aspect`, `value` and `weighted`.
pub const ASPECT_TERM: &str = "aspect term";
