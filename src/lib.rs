// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An emulator for the LS-8, an 8-bit machine with eight registers, 256 bytes
//! of memory, and a stack that grows down from the top of memory.

extern crate chrono;
#[macro_use]
extern crate enum_primitive;
extern crate num;
extern crate rustyline;

pub mod debugger;
pub mod io;
pub mod ls8;

pub use ls8::ls8::{LS8, LS8RuntimeOptions};
