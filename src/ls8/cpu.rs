// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use io::errors::MachineError;
use io::log;
use ls8::instruction::{Control, Instruction};
use ls8::ls8::LS8RuntimeOptions;
use ls8::memory::Memory;
use std::fmt;
use std::io::Write;

// Flag constants that allow easy bitwise getting and setting of flag values.
pub const EQUAL_FLAG: u8 = 0x1;

pub const REGISTER_COUNT: usize = 8;

// R7 is reserved by convention as the stack pointer.
pub const STACK_POINTER: u8 = 7;

// The stack starts just below the top of memory, leaving 0xF4..0xFF free.
pub const STACK_POINTER_INIT: u8 = 0xF4;

/// The LS-8 processor: eight byte-sized general purpose registers, a program
/// counter, and a flags register. Memory lives outside the CPU and is handed
/// to it on every step.
pub struct CPU {
    // The program counter points to the next instruction to be executed. Every
    // instruction moves it explicitly, either by its own width or by jumping.
    pub pc: u8,

    // A copy of the opcode currently being executed.
    pub ir: u8,

    // R0 through R7. R7 doubles as the stack pointer and holds the address of
    // the most recently pushed value. The stack grows downwards.
    registers: [u8; REGISTER_COUNT],

    // The flags register. Only the equal flag (bit 0) is used; it's written by
    // CMP and read by the conditional jumps. Arithmetic leaves it alone.
    pub fl: u8,

    // True between a call to run and the HLT instruction.
    pub running: bool,

    // Options passed from the command-line that may influence how the CPU
    // behaves.
    runtime_options: LS8RuntimeOptions,
}

impl CPU {
    pub fn new(runtime_options: LS8RuntimeOptions) -> CPU {
        let mut registers = [0; REGISTER_COUNT];
        registers[STACK_POINTER as usize] = STACK_POINTER_INIT;

        CPU {
            pc: 0,
            ir: 0,
            registers: registers,
            fl: 0,
            running: false,
            runtime_options: runtime_options,
        }
    }

    /// Reads a register. Register operands come straight out of memory, so an
    /// index past R7 is reported rather than trusted.
    #[inline(always)]
    pub fn reg(&self, index: u8) -> Result<u8, MachineError> {
        match self.registers.get(index as usize) {
            Some(&value) => Ok(value),
            None => Err(MachineError::InvalidRegister { register: index }),
        }
    }

    /// Writes a register.
    #[inline(always)]
    pub fn set_reg(&mut self, index: u8, value: u8) -> Result<(), MachineError> {
        match self.registers.get_mut(index as usize) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(MachineError::InvalidRegister { register: index }),
        }
    }

    /// All eight registers, R0 first.
    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.registers
    }

    #[inline(always)]
    pub fn sp(&self) -> u8 {
        self.registers[STACK_POINTER as usize]
    }

    #[inline(always)]
    pub fn set_sp(&mut self, sp: u8) {
        self.registers[STACK_POINTER as usize] = sp;
    }

    /// Sets the equal flag in the status register.
    #[inline(always)]
    pub fn set_equal_flag(&mut self) {
        self.fl |= EQUAL_FLAG;
    }

    /// Unsets the equal flag in the status register.
    #[inline(always)]
    pub fn unset_equal_flag(&mut self) {
        self.fl &= !EQUAL_FLAG;
    }

    /// Checks if the equal flag in the status register is set.
    #[inline(always)]
    pub fn equal_flag_set(&self) -> bool {
        self.fl & EQUAL_FLAG == EQUAL_FLAG
    }

    /// Sets the equal flag if the passed comparison is true, otherwise the
    /// flag is unset.
    #[inline(always)]
    pub fn toggle_equal_flag(&mut self, equal: bool) {
        if equal {
            self.set_equal_flag();
        } else {
            self.unset_equal_flag();
        }
    }

    /// Fetch the instruction at the program counter, execute it, and apply
    /// whatever it did to the program counter. All instruction logic is in
    /// instruction.rs.
    pub fn execute<W: Write>(&mut self, memory: &mut Memory, out: &mut W) -> Result<(), MachineError> {
        let instr = Instruction::fetch(self.pc, memory);
        self.ir = instr.0;

        if self.runtime_options.trace {
            eprintln!("{}", instr.log(self));
        }

        match instr.execute(self, memory, out) {
            Ok(control) => {
                self.apply(control);
                Ok(())
            }
            Err(e) => {
                log::log("cpu", format!("fatal: {}", e), &self.runtime_options);
                Err(e)
            }
        }
    }

    fn apply(&mut self, control: Control) {
        match control {
            Control::Advance(len) => self.pc = self.pc.wrapping_add(len),
            Control::Jump(addr) => self.pc = addr,
            Control::Halt => self.running = false,
        }
    }

    /// Returns "SET" if the passed boolean is true, otherwise "UNSET". This
    /// function is used to display flags when the CPU crashes.
    fn fmt_flag(flag: bool) -> &'static str {
        if flag { "SET" } else { "UNSET" }
    }
}

impl fmt::Display for CPU {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "CPU State:")?;
        writeln!(f, "    Program Counter:      {:#04X}", self.pc)?;
        writeln!(f, "    Instruction Register: {:#04X}", self.ir)?;
        for (i, value) in self.registers.iter().enumerate() {
            if i == STACK_POINTER as usize {
                writeln!(f, "    R{} (SP):              {:#04X}", i, value)?;
            } else {
                writeln!(f, "    R{}:                   {:#04X}", i, value)?;
            }
        }
        writeln!(f, "")?;
        writeln!(f, "Flags Register: {:#04X}", self.fl)?;
        write!(f, "    Equal Flag: {}", CPU::fmt_flag(self.equal_flag_set()))
    }
}
