// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

extern crate getopts;
extern crate ls8;

use getopts::Options;
use ls8::debugger::debugger::Debugger;
use ls8::io::binutils;
use ls8::io::errors::{EXIT_SUCCESS, EXIT_USAGE};
use ls8::io::log;
use ls8::{LS8, LS8RuntimeOptions};
use std::env;
use std::io::{self, Write};

fn usage(program: &str, opts: &Options) -> String {
    opts.usage(&format!("Usage: {} [options] FILE", program))
}

/// Initializes and starts the emulator. Returns an exit code after which the
/// program unwinds and stops executing. Once the emulator starts executing, the
/// application should only stop due to a HLT instruction or a fatal error.
fn init() -> i32 {
    let args: Vec<String> = env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| String::from("ls8"));

    let mut opts = Options::new();
    opts.optflag("v", "verbose", "log what the emulator is doing to stderr");
    opts.optflag("t", "trace", "print a trace line to stderr before every instruction");
    opts.optflag("d", "debug", "start the interactive debugger");
    opts.optflag("h", "help", "print this help menu");

    let matches = match opts.parse(args.iter().skip(1)) {
        Ok(matches) => matches,
        Err(e) => {
            eprintln!("ls8: {}", e);
            eprint!("{}", usage(&program, &opts));
            return EXIT_USAGE;
        }
    };

    if matches.opt_present("h") {
        print!("{}", usage(&program, &opts));
        return EXIT_SUCCESS;
    }

    // Exactly one load image is accepted.
    if matches.free.len() != 1 {
        eprint!("{}", usage(&program, &opts));
        return EXIT_USAGE;
    }

    let runtime_options = LS8RuntimeOptions {
        verbose: matches.opt_present("v"),
        trace: matches.opt_present("t"),
    };
    let path = &matches.free[0];

    log::log("ls8", format!("loading {}", path), &runtime_options);
    let mut ls8 = LS8::new(runtime_options);
    let loaded = binutils::read_image(path).and_then(|image| ls8.load(&image));
    if let Err(e) = loaded {
        eprintln!("ls8: {}", e);
        return e.exit_code();
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = if matches.opt_present("d") {
        Debugger::new().run(&mut ls8, &mut out)
    } else {
        ls8.run(&mut out)
    };

    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            // The machine error decides the exit code; a failed flush is
            // only reported.
            if let Err(flush_err) = out.flush() {
                eprintln!("ls8: {}", flush_err);
            }
            eprintln!("ls8: {}", e);
            if runtime_options.verbose {
                eprintln!("{}", ls8.cpu);
            }
            e.exit_code()
        }
    }
}

/// Entry point of the program and wrapper of init. Takes the exit code returned
/// from init and exits with it.
fn main() {
    let exit_code = init();
    std::process::exit(exit_code); // Unwinding done, safe to exit.
}
