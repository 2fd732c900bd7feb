// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use num::FromPrimitive;

// The two high bits of every opcode hold the number of operands that follow
// it. Nothing decodes this generically, it's only used to check the table.
const OPERAND_COUNT_SHIFT: u8 = 6;

enum_from_primitive! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Opcode {
        HLT  = 0b00000001,
        LDI  = 0b10000010,
        PRN  = 0b01000111,

        ADD  = 0b10100000,
        MUL  = 0b10100010,
        CMP  = 0b10100111,

        PUSH = 0b01000101,
        POP  = 0b01000110,

        CALL = 0b01010000,
        RET  = 0b00010001,

        JMP  = 0b01010100,
        JEQ  = 0b01010101,
        JNE  = 0b01010110,
    }
}

/// Every opcode the machine understands, in table order.
pub const ALL_OPCODES: [Opcode; 13] = [
    Opcode::HLT, Opcode::LDI, Opcode::PRN,
    Opcode::ADD, Opcode::MUL, Opcode::CMP,
    Opcode::PUSH, Opcode::POP,
    Opcode::CALL, Opcode::RET,
    Opcode::JMP, Opcode::JEQ, Opcode::JNE,
];

/// Decodes an opcode by converting an opcode number to an enum value. Returns
/// None for bytes that have no handler.
pub fn decode_opcode(opcode: u8) -> Option<Opcode> {
    Opcode::from_u8(opcode)
}

/// Determine the length of an instruction with the given opcode.
pub fn opcode_len(opcode: &Opcode) -> u8 {
    use self::Opcode::*;

    match *opcode {
        HLT  => 1,
        LDI  => 3,
        PRN  => 2,

        ADD  => 3,
        MUL  => 3,
        CMP  => 3,

        PUSH => 2,
        POP  => 2,

        CALL => 2,
        RET  => 1,

        JMP  => 2,
        JEQ  => 2,
        JNE  => 2,
    }
}

/// Number of operand bytes encoded in the opcode's two high bits.
pub fn operand_count(opcode: &Opcode) -> u8 {
    (*opcode as u8) >> OPERAND_COUNT_SHIFT
}

/// Returns the assembler mnemonic for an opcode.
pub fn mnemonic(opcode: &Opcode) -> &'static str {
    use self::Opcode::*;

    match *opcode {
        HLT  => "HLT",
        LDI  => "LDI",
        PRN  => "PRN",
        ADD  => "ADD",
        MUL  => "MUL",
        CMP  => "CMP",
        PUSH => "PUSH",
        POP  => "POP",
        CALL => "CALL",
        RET  => "RET",
        JMP  => "JMP",
        JEQ  => "JEQ",
        JNE  => "JNE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_every_opcode() {
        for opcode in ALL_OPCODES.iter() {
            assert_eq!(decode_opcode(*opcode as u8), Some(*opcode));
        }
    }

    #[test]
    fn unknown_bytes_do_not_decode() {
        assert_eq!(decode_opcode(0b00000000), None);
        assert_eq!(decode_opcode(0b11111111), None);
        assert_eq!(decode_opcode(0b10100001), None);
    }

    #[test]
    fn length_matches_operand_count_bits() {
        for opcode in ALL_OPCODES.iter() {
            assert_eq!(opcode_len(opcode), operand_count(opcode) + 1, "{}", mnemonic(opcode));
        }
    }
}
