// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use io::errors::MachineError;
use ls8::cpu::CPU;
use ls8::opcode::Opcode;

impl CPU {
    /// Arithmetic and comparison on two registers. Results are 8 bits wide and
    /// wrap on overflow, the same as the registers holding them.
    ///
    /// Only ADD, MUL, and CMP belong here. Handing the ALU anything else is a
    /// bug in the handler table, not in the program being run.
    pub fn alu(&mut self, op: Opcode, reg_a: u8, reg_b: u8) -> Result<(), MachineError> {
        let a = self.reg(reg_a)?;
        let b = self.reg(reg_b)?;

        match op {
            Opcode::ADD => self.set_reg(reg_a, a.wrapping_add(b)),
            Opcode::MUL => self.set_reg(reg_a, a.wrapping_mul(b)),
            Opcode::CMP => {
                self.fl = 0;
                self.toggle_equal_flag(a == b);
                Ok(())
            }
            _ => panic!("Unsupported ALU operation: {:?}", op),
        }
    }
}

#[cfg(test)]
mod tests {
    use ls8::cpu::CPU;
    use ls8::ls8::LS8RuntimeOptions;
    use ls8::opcode::Opcode;

    fn cpu_with(a: u8, b: u8) -> CPU {
        let mut cpu = CPU::new(LS8RuntimeOptions::default());
        cpu.set_reg(0, a).unwrap();
        cpu.set_reg(1, b).unwrap();
        cpu
    }

    #[test]
    fn add_and_mul_wrap_at_eight_bits() {
        let samples = [(0u8, 0u8), (8, 9), (200, 100), (255, 1), (16, 16), (3, 171)];
        for &(a, b) in samples.iter() {
            let mut cpu = cpu_with(a, b);
            cpu.alu(Opcode::ADD, 0, 1).unwrap();
            assert_eq!(cpu.reg(0).unwrap(), ((a as u32 + b as u32) % 256) as u8);
            assert_eq!(cpu.reg(1).unwrap(), b);

            let mut cpu = cpu_with(a, b);
            cpu.alu(Opcode::MUL, 0, 1).unwrap();
            assert_eq!(cpu.reg(0).unwrap(), ((a as u32 * b as u32) % 256) as u8);
            assert_eq!(cpu.reg(1).unwrap(), b);
        }
    }

    #[test]
    fn arithmetic_leaves_flags_alone() {
        let mut cpu = cpu_with(4, 4);
        cpu.alu(Opcode::CMP, 0, 1).unwrap();
        cpu.alu(Opcode::ADD, 0, 1).unwrap();
        cpu.alu(Opcode::MUL, 0, 1).unwrap();
        assert!(cpu.equal_flag_set());
    }

    #[test]
    fn cmp_sets_equal_flag_only_when_equal() {
        let mut cpu = cpu_with(5, 5);
        cpu.alu(Opcode::CMP, 0, 1).unwrap();
        assert_eq!(cpu.fl, 1);
        assert_eq!((cpu.reg(0).unwrap(), cpu.reg(1).unwrap()), (5, 5));

        let mut cpu = cpu_with(5, 0);
        cpu.fl = 1;
        cpu.alu(Opcode::CMP, 0, 1).unwrap();
        assert_eq!(cpu.fl, 0);
        assert_eq!((cpu.reg(0).unwrap(), cpu.reg(1).unwrap()), (5, 0));
    }

    #[test]
    fn add_to_itself_doubles() {
        let mut cpu = cpu_with(21, 0);
        cpu.alu(Opcode::ADD, 0, 0).unwrap();
        assert_eq!(cpu.reg(0).unwrap(), 42);
    }

    #[test]
    fn bad_register_operand_is_reported() {
        let mut cpu = cpu_with(1, 2);
        assert!(cpu.alu(Opcode::ADD, 0, 9).is_err());
        assert_eq!(cpu.reg(0).unwrap(), 1);
    }

    #[test]
    #[should_panic(expected = "Unsupported ALU operation")]
    fn non_alu_opcode_panics() {
        let mut cpu = cpu_with(1, 2);
        let _ = cpu.alu(Opcode::JMP, 0, 1);
    }
}
