// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use io::errors::LoadError;
use ls8::memory::MEMORY_SIZE;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::result::Result;

// Everything after this character on a line is ignored.
const COMMENT_MARKER: char = '#';

/// Reads a load image at a given path and parses it into the bytes that will
/// be copied into memory starting at address 0.
pub fn read_image<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, LoadError> {
    let path = path.as_ref();
    let mut source = String::new();
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(LoadError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(LoadError::Io(e)),
    };
    file.read_to_string(&mut source)?;
    parse_image(&source)
}

/// Parses the text of a load image. Each non-blank line holds one base-2
/// literal, optionally followed by a comment. Blank and comment-only lines do
/// not take up an address.
pub fn parse_image(source: &str) -> Result<Vec<u8>, LoadError> {
    let mut image: Vec<u8> = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let token = strip_comment(line);
        if token.is_empty() {
            continue;
        }

        match u8::from_str_radix(token, 2) {
            Ok(byte) => image.push(byte),
            Err(_) => {
                return Err(LoadError::InvalidLiteral {
                    line: index + 1,
                    token: String::from(token),
                })
            }
        }
    }

    if image.len() > MEMORY_SIZE {
        return Err(LoadError::ImageTooLarge { size: image.len() });
    }

    Ok(image)
}

/// Returns the instruction part of a line with any comment and surrounding
/// whitespace removed.
fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_MARKER) {
        Some(idx) => line[..idx].trim(),
        None => line.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn trailing_comment_is_ignored() {
        let image = parse_image("10000010 # load immediate\n").unwrap();
        assert_eq!(image, vec![0b10000010]);
    }

    #[test]
    fn blank_and_comment_lines_take_no_address() {
        let source = "# print8.ls8\n\n10000010\n   \n00000000 # R0\n# done\n00001000\n";
        let image = parse_image(source).unwrap();
        assert_eq!(image, vec![0b10000010, 0, 8]);
    }

    #[test]
    fn bad_literal_reports_line_and_token() {
        match parse_image("00000001\n\n10000012 # oops\n") {
            Err(LoadError::InvalidLiteral { line, token }) => {
                assert_eq!(line, 3);
                assert_eq!(token, "10000012");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn literal_wider_than_a_byte_is_rejected() {
        match parse_image("100000000\n") {
            Err(LoadError::InvalidLiteral { line: 1, .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn image_must_fit_in_memory() {
        let source = "00000000\n".repeat(MEMORY_SIZE + 1);
        match parse_image(&source) {
            Err(LoadError::ImageTooLarge { size }) => assert_eq!(size, MEMORY_SIZE + 1),
            other => panic!("unexpected result: {:?}", other),
        }

        let source = "00000000\n".repeat(MEMORY_SIZE);
        assert_eq!(parse_image(&source).unwrap().len(), MEMORY_SIZE);
    }

    #[test]
    fn missing_file_is_distinct_from_parse_errors() {
        let path = env::temp_dir().join("ls8-binutils-definitely-missing.ls8");
        match read_image(&path) {
            Err(LoadError::FileNotFound(p)) => assert_eq!(p, path),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn reads_image_from_disk() {
        let path = env::temp_dir().join("ls8-binutils-reads-image.ls8");
        fs::write(&path, "00000001 # HLT\n").unwrap();
        let image = read_image(&path);
        fs::remove_file(&path).unwrap();
        assert_eq!(image.unwrap(), vec![0b00000001]);
    }
}
