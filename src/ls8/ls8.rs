// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use io::errors::{LoadError, MachineError};
use io::log;
use ls8::cpu::CPU;
use ls8::memory::{Memory, MEMORY_SIZE};
use std::io::Write;

/// Options passed from the command-line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LS8RuntimeOptions {
    pub verbose: bool,
    pub trace: bool,
}

/// A whole machine: the CPU and the memory it runs against. Each instance owns
/// all of its state, so any number of them can run side by side.
pub struct LS8 {
    pub cpu: CPU,
    pub memory: Memory,
    pub runtime_options: LS8RuntimeOptions,
}

impl LS8 {
    pub fn new(runtime_options: LS8RuntimeOptions) -> LS8 {
        LS8 {
            cpu: CPU::new(runtime_options),
            memory: Memory::new(),
            runtime_options: runtime_options,
        }
    }

    /// Copies a load image into memory starting at address 0.
    pub fn load(&mut self, image: &[u8]) -> Result<(), LoadError> {
        if image.len() > MEMORY_SIZE {
            return Err(LoadError::ImageTooLarge { size: image.len() });
        }

        self.memory.memdump(0, image);
        log::log("load", format!("{} bytes loaded", image.len()), &self.runtime_options);
        Ok(())
    }

    /// Executes a single instruction.
    pub fn step<W: Write>(&mut self, out: &mut W) -> Result<(), MachineError> {
        self.cpu.execute(&mut self.memory, out)
    }

    /// Runs the fetch-decode-execute loop until a HLT instruction or a fatal
    /// error. Program output goes to `out`.
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<(), MachineError> {
        log::log("cpu", format!("running from {:#04X}", self.cpu.pc), &self.runtime_options);
        self.cpu.running = true;

        while self.cpu.running {
            if let Err(e) = self.step(out) {
                self.cpu.running = false;
                return Err(e);
            }
        }

        log::log("cpu", format!("halted at {:#04X}", self.cpu.pc), &self.runtime_options);
        out.flush()?;
        Ok(())
    }

    pub fn running(&self) -> bool {
        self.cpu.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ls8::opcode::Opcode::*;

    fn run_program(program: &[u8]) -> (LS8, String) {
        let mut machine = LS8::new(LS8RuntimeOptions::default());
        machine.load(program).unwrap();
        let mut out = Vec::new();
        machine.run(&mut out).unwrap();
        (machine, String::from_utf8(out).unwrap())
    }

    #[test]
    fn adds_and_prints() {
        let (machine, out) = run_program(&[
            LDI as u8, 0, 8,
            LDI as u8, 1, 9,
            ADD as u8, 0, 1,
            PRN as u8, 0,
            HLT as u8,
        ]);
        assert_eq!(out, "17\n");
        assert!(!machine.running());
        assert_eq!(machine.cpu.pc, 11);
    }

    #[test]
    fn jeq_not_taken_when_unequal() {
        let (machine, out) = run_program(&[
            LDI as u8, 0, 5,
            LDI as u8, 1, 0,
            LDI as u8, 2, 17,
            CMP as u8, 0, 1,
            JEQ as u8, 2,
            PRN as u8, 0,
            HLT as u8,
            PRN as u8, 1, // only reached if the jump is taken
            HLT as u8,
        ]);
        assert_eq!(out, "5\n");
        assert_eq!(machine.cpu.fl, 0);
    }

    #[test]
    fn call_returns_past_the_call() {
        let (machine, out) = run_program(&[
            LDI as u8, 1, 11,
            LDI as u8, 0, 3,
            CALL as u8, 1,
            PRN as u8, 0,
            HLT as u8,
            // 11: double R0
            ADD as u8, 0, 0,
            RET as u8,
        ]);
        assert_eq!(out, "6\n");
        assert_eq!(machine.cpu.sp(), 0xF4);
    }

    #[test]
    fn stops_on_unknown_instruction() {
        let mut machine = LS8::new(LS8RuntimeOptions::default());
        machine.load(&[LDI as u8, 0, 1, 0b11111111]).unwrap();
        let mut out = Vec::new();
        match machine.run(&mut out) {
            Err(MachineError::UnknownInstruction { opcode: 0b11111111, pc: 3 }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!machine.running());
    }

    #[test]
    fn step_executes_one_instruction() {
        let mut machine = LS8::new(LS8RuntimeOptions::default());
        machine.load(&[LDI as u8, 0, 1, LDI as u8, 1, 2, HLT as u8]).unwrap();
        let mut out = Vec::new();
        machine.step(&mut out).unwrap();
        assert_eq!(machine.cpu.pc, 3);
        assert_eq!(machine.cpu.reg(0).unwrap(), 1);
        assert_eq!(machine.cpu.reg(1).unwrap(), 0);
    }

    #[test]
    fn load_rejects_oversized_image() {
        let mut machine = LS8::new(LS8RuntimeOptions::default());
        assert!(machine.load(&[0; MEMORY_SIZE + 1]).is_err());
    }
}
