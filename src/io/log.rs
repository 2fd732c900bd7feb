// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::{DateTime, Local};
use ls8::ls8::LS8RuntimeOptions;

/// Logs a message to stderr with a given prefix if the emulator was started
/// with the verbose flag set. Stdout is reserved for program output.
pub fn log<P, T>(prefix: P, text: T, runtime_options: &LS8RuntimeOptions) where P: Into<String>, T: Into<String> {
    if runtime_options.verbose {
        eprintln!("{}", format_line(Local::now(), prefix, text));
    }
}

fn format_line<P, T>(time: DateTime<Local>, prefix: P, text: T) -> String where P: Into<String>, T: Into<String> {
    format!("[{}] -- [{}] {}", time, prefix.into(), text.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_carries_prefix_and_text() {
        let line = format_line(Local::now(), "cpu", "halted");
        assert!(line.starts_with("["));
        assert!(line.ends_with("] -- [cpu] halted"));
    }
}
