// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use io::errors::MachineError;
use ls8::cpu::CPU;
use ls8::memory::Memory;
use ls8::opcode::{decode_opcode, mnemonic, opcode_len, operand_count, Opcode};
use std::io::Write;

/// What an instruction did to the flow of control. The dispatcher never moves
/// the program counter on its own; it only applies one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Move past the instruction by its own width.
    Advance(u8),
    /// Continue at an absolute address.
    Jump(u8),
    /// Stop the dispatch loop, leaving the program counter where it is.
    Halt,
}

/// All LS-8 instructions are a maximum size of 3 bytes. The first byte is the
/// opcode which determines the action of the instruction. The following 2
/// bytes are the operands and are present depending on the opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction(pub u8, pub u8, pub u8);

impl Instruction {
    /// The fetcher will store all bytes in the instruction regardless if they
    /// are needed or not. Operand addresses wrap at the top of memory.
    pub fn fetch(pc: u8, memory: &Memory) -> Instruction {
        Instruction(
            memory.read_u8(pc),
            memory.read_u8(pc.wrapping_add(1)),
            memory.read_u8(pc.wrapping_add(2)))
    }

    #[inline(always)]
    pub fn opcode(&self) -> Option<Opcode> {
        decode_opcode(self.0)
    }

    /// Runs the handler for this instruction against the CPU and memory. PRN
    /// writes to `out`. Returns how the program counter should move.
    pub fn execute<W: Write>(&self, cpu: &mut CPU, memory: &mut Memory, out: &mut W) -> Result<Control, MachineError> {
        let opcode = match self.opcode() {
            Some(opcode) => opcode,
            None => return Err(MachineError::UnknownInstruction { opcode: self.0, pc: cpu.pc }),
        };
        let next = Control::Advance(opcode_len(&opcode));

        match opcode {
            Opcode::HLT => Ok(Control::Halt),
            Opcode::LDI => {
                cpu.set_reg(self.1, self.2)?;
                Ok(next)
            }
            Opcode::PRN => {
                writeln!(out, "{}", cpu.reg(self.1)?)?;
                Ok(next)
            }
            Opcode::ADD | Opcode::MUL | Opcode::CMP => {
                cpu.alu(opcode, self.1, self.2)?;
                Ok(next)
            }
            Opcode::PUSH => {
                let value = cpu.reg(self.1)?;
                memory.stack_push_u8(cpu, value);
                Ok(next)
            }
            Opcode::POP => {
                // Validate the destination before touching the stack so a bad
                // operand leaves the stack pointer alone.
                cpu.reg(self.1)?;
                let value = memory.stack_pop_u8(cpu);
                cpu.set_reg(self.1, value)?;
                Ok(next)
            }
            Opcode::CALL => {
                // The target is read after the push, so CALL R7 jumps to the
                // new stack pointer. A bad register still leaves SP alone.
                cpu.reg(self.1)?;
                let return_addr = cpu.pc.wrapping_add(opcode_len(&opcode));
                memory.stack_push_u8(cpu, return_addr);
                Ok(Control::Jump(cpu.reg(self.1)?))
            }
            Opcode::RET => Ok(Control::Jump(memory.stack_pop_u8(cpu))),
            Opcode::JMP => Ok(Control::Jump(cpu.reg(self.1)?)),
            Opcode::JEQ => {
                if cpu.equal_flag_set() {
                    Ok(Control::Jump(cpu.reg(self.1)?))
                } else {
                    Ok(next)
                }
            }
            Opcode::JNE => {
                if !cpu.equal_flag_set() {
                    Ok(Control::Jump(cpu.reg(self.1)?))
                } else {
                    Ok(next)
                }
            }
        }
    }

    /// Disassembles the instruction, e.g. `LDI R0,0x08`. Bytes that aren't an
    /// opcode come out as a raw data byte.
    pub fn disassemble(&self) -> String {
        let opcode = match self.opcode() {
            Some(opcode) => opcode,
            None => return format!(".byte {:#04X}", self.0),
        };
        let name = mnemonic(&opcode);

        match opcode {
            Opcode::LDI => format!("{} R{},{:#04X}", name, self.1, self.2),
            _ => match operand_count(&opcode) {
                0 => String::from(name),
                1 => format!("{} R{}", name, self.1),
                _ => format!("{} R{},R{}", name, self.1, self.2),
            },
        }
    }

    /// Formats a trace line: the program counter, the three bytes starting at
    /// it, and every register, all as two digit hex.
    pub fn log(&self, cpu: &CPU) -> String {
        let mut line = format!("TRACE: {:02X} | {:02X} {:02X} {:02X} |", cpu.pc, self.0, self.1, self.2);
        for value in cpu.registers().iter() {
            line.push_str(&format!(" {:02X}", value));
        }
        line
    }
}
