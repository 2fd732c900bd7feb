// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

enum ParseState {
    ScanningForArguments,
    ScanningArgument,
    ScanningQuotedArgument,
}

/// Returns true if the character passed is a whitespace character. Both spaces
/// and tabs are considered whitespace characters.
fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Returns true if the character passed is a quote.
fn is_quote(c: char) -> bool {
    c == '"'
}

/// Returns true if the character escapes the one after it.
fn is_escape(c: char) -> bool {
    c == '\\'
}

/// Parses raw debugger input into a list of separate arguments. Arguments are
/// separated by whitespace, can be quoted, and can have escaped characters
/// inside of them.
pub fn input_to_arguments(input: &str) -> Result<Vec<String>, &'static str> {
    let mut state = ParseState::ScanningForArguments;
    let mut args: Vec<String> = Vec::new();
    let mut arg = String::new();
    let mut chars = input.trim_end_matches(|c: char| c == '\n' || c == '\r').chars();

    while let Some(c) = chars.next() {
        match state {
            ParseState::ScanningForArguments => {
                // Determine a scanning state depending on the first
                // non-whitespace character.
                if is_quote(c) {
                    state = ParseState::ScanningQuotedArgument;
                } else if is_escape(c) {
                    arg.push(chars.next().ok_or("escape at end of input")?);
                    state = ParseState::ScanningArgument;
                } else if !is_whitespace(c) {
                    arg.push(c);
                    state = ParseState::ScanningArgument;
                }
            },
            ParseState::ScanningArgument => {
                // Switch back to scanning if whitespace is encountered and push
                // the argument currently being parsed to the argument list.
                if is_whitespace(c) {
                    args.push(arg.split_off(0));
                    state = ParseState::ScanningForArguments;
                } else if is_quote(c) {
                    state = ParseState::ScanningQuotedArgument;
                } else if is_escape(c) {
                    arg.push(chars.next().ok_or("escape at end of input")?);
                } else {
                    arg.push(c);
                }
            },
            ParseState::ScanningQuotedArgument => {
                // Whitespace is kept verbatim until the closing quote.
                if is_quote(c) {
                    state = ParseState::ScanningArgument;
                } else if is_escape(c) {
                    arg.push(chars.next().ok_or("escape at end of input")?);
                } else {
                    arg.push(c);
                }
            },
        }
    }

    match state {
        ParseState::ScanningQuotedArgument => Err("quoted arg does not close"),
        ParseState::ScanningArgument => {
            args.push(arg);
            Ok(args)
        },
        ParseState::ScanningForArguments => Ok(args),
    }
}

/// Parses a number typed at the debugger prompt. Accepts `0x` hex, `0b`
/// binary, or plain decimal.
pub fn parse_number(text: &str) -> Result<usize, String> {
    let lower = text.to_lowercase();
    let parsed = if lower.starts_with("0x") {
        usize::from_str_radix(&lower[2..], 16)
    } else if lower.starts_with("0b") {
        usize::from_str_radix(&lower[2..], 2)
    } else {
        lower.parse::<usize>()
    };

    parsed.map_err(|_| format!("invalid number '{}'", text))
}

/// Parses a number that has to fit in a memory address.
pub fn parse_address(text: &str) -> Result<u8, String> {
    let value = parse_number(text)?;
    if value > u8::max_value() as usize {
        return Err(format!("address '{}' is past the end of memory", text));
    }
    Ok(value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(input_to_arguments("dump  0x10\t4\n").unwrap(), vec!["dump", "0x10", "4"]);
        assert_eq!(input_to_arguments("   ").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn quotes_keep_whitespace() {
        assert_eq!(input_to_arguments("b \"1 2\" x").unwrap(), vec!["b", "1 2", "x"]);
        assert_eq!(input_to_arguments("a\"b c\"d").unwrap(), vec!["ab cd"]);
        assert_eq!(input_to_arguments("\"\"").unwrap(), vec![""]);
    }

    #[test]
    fn escapes_take_next_character() {
        assert_eq!(input_to_arguments("a\\ b \\\"c").unwrap(), vec!["a b", "\"c"]);
        assert!(input_to_arguments("abc\\").is_err());
    }

    #[test]
    fn unclosed_quote_is_an_error() {
        assert_eq!(input_to_arguments("step \"3"), Err("quoted arg does not close"));
    }

    #[test]
    fn numbers_in_three_bases() {
        assert_eq!(parse_number("0x1F").unwrap(), 31);
        assert_eq!(parse_number("0b101").unwrap(), 5);
        assert_eq!(parse_number("42").unwrap(), 42);
        assert!(parse_number("0xZZ").is_err());
        assert!(parse_number("").is_err());
    }

    #[test]
    fn addresses_fit_in_memory() {
        assert_eq!(parse_address("0xFF").unwrap(), 0xFF);
        assert!(parse_address("256").is_err());
    }
}
