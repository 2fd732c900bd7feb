// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

// Exit codes used throughout the application. These exit codes has specific
// meanings and are used when no OS error codes are available.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_USAGE: i32 = 1; // Wrong argument count or unknown option.
pub const EXIT_FILE_NOT_FOUND: i32 = 2;
pub const EXIT_UNKNOWN_INSTRUCTION: i32 = 3;
pub const EXIT_INVALID_LITERAL: i32 = 4;
pub const EXIT_IMAGE_TOO_LARGE: i32 = 5;
pub const EXIT_INVALID_REGISTER: i32 = 6;
pub const EXIT_RUNTIME_FAILURE: i32 = 101;

/// Failures that happen while reading a load image, before the machine starts
/// executing.
#[derive(Debug)]
pub enum LoadError {
    FileNotFound(PathBuf),
    // Line numbers are 1-based so they match what an editor shows.
    InvalidLiteral { line: usize, token: String },
    ImageTooLarge { size: usize },
    Io(io::Error),
}

impl LoadError {
    pub fn exit_code(&self) -> i32 {
        match *self {
            LoadError::FileNotFound(_) => EXIT_FILE_NOT_FOUND,
            LoadError::InvalidLiteral { .. } => EXIT_INVALID_LITERAL,
            LoadError::ImageTooLarge { .. } => EXIT_IMAGE_TOO_LARGE,
            LoadError::Io(_) => EXIT_RUNTIME_FAILURE,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            LoadError::FileNotFound(ref path) => {
                write!(f, "file not found: {}", path.display())
            }
            LoadError::InvalidLiteral { line, ref token } => {
                write!(f, "invalid number '{}' on line {}", token, line)
            }
            LoadError::ImageTooLarge { size } => {
                write!(f, "image is {} bytes but memory only holds 256", size)
            }
            LoadError::Io(ref e) => write!(f, "unable to read image: {}", e),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            LoadError::Io(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> LoadError {
        LoadError::Io(e)
    }
}

/// Fatal conditions raised while the machine is executing. None of these are
/// recoverable; the dispatch loop stops at the first one.
#[derive(Debug)]
pub enum MachineError {
    UnknownInstruction { opcode: u8, pc: u8 },
    InvalidRegister { register: u8 },
    Output(io::Error),
}

impl MachineError {
    pub fn exit_code(&self) -> i32 {
        match *self {
            MachineError::UnknownInstruction { .. } => EXIT_UNKNOWN_INSTRUCTION,
            MachineError::InvalidRegister { .. } => EXIT_INVALID_REGISTER,
            MachineError::Output(_) => EXIT_RUNTIME_FAILURE,
        }
    }
}

impl fmt::Display for MachineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MachineError::UnknownInstruction { opcode, pc } => {
                write!(f, "unknown instruction {:#010b} at {:#04X}", opcode, pc)
            }
            MachineError::InvalidRegister { register } => {
                write!(f, "register R{} does not exist", register)
            }
            MachineError::Output(ref e) => write!(f, "unable to write output: {}", e),
        }
    }
}

impl Error for MachineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            MachineError::Output(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MachineError {
    fn from(e: io::Error) -> MachineError {
        MachineError::Output(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_USAGE,
            EXIT_FILE_NOT_FOUND,
            EXIT_UNKNOWN_INSTRUCTION,
            EXIT_INVALID_LITERAL,
            EXIT_IMAGE_TOO_LARGE,
            EXIT_INVALID_REGISTER,
            EXIT_RUNTIME_FAILURE,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in codes.iter().skip(i + 1) {
                assert!(a != b);
            }
        }
    }

    #[test]
    fn load_errors_map_to_exit_codes() {
        let missing = LoadError::FileNotFound(PathBuf::from("nope.ls8"));
        let literal = LoadError::InvalidLiteral { line: 3, token: String::from("1012") };
        assert_eq!(missing.exit_code(), EXIT_FILE_NOT_FOUND);
        assert_eq!(literal.exit_code(), EXIT_INVALID_LITERAL);
        assert_eq!(format!("{}", literal), "invalid number '1012' on line 3");
    }

    #[test]
    fn unknown_instruction_message() {
        let e = MachineError::UnknownInstruction { opcode: 0b11111111, pc: 0x1A };
        assert_eq!(e.exit_code(), EXIT_UNKNOWN_INSTRUCTION);
        assert_eq!(format!("{}", e), "unknown instruction 0b11111111 at 0x1A");
    }
}
