// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use ls8::cpu::CPU;

/// Size of the whole address space. Addresses are 8-bit so any address a
/// program can form lands inside memory.
pub const MEMORY_SIZE: usize = 0x100;

/// Flat memory shared by the program, its data, and the stack. The stack sits
/// at the top and grows downwards from the initial stack pointer.
pub struct Memory {
    ram: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Memory {
        Memory {
            ram: [0; MEMORY_SIZE],
        }
    }

    /// Reads an unsigned 8-bit byte value located at the given address.
    #[inline(always)]
    pub fn read_u8(&self, addr: u8) -> u8 {
        self.ram[addr as usize]
    }

    /// Writes an unsigned 8-bit byte value to the given address.
    #[inline(always)]
    pub fn write_u8(&mut self, addr: u8, val: u8) {
        self.ram[addr as usize] = val;
    }

    /// Dumps the contents of a slice starting at a given address. Writes past
    /// the top of memory wrap around to address 0.
    pub fn memdump(&mut self, addr: u8, buf: &[u8]) {
        let mut dest = addr;
        for &byte in buf {
            self.write_u8(dest, byte);
            dest = dest.wrapping_add(1);
        }
    }

    /// Copies `len` bytes out of memory starting at `addr`, wrapping at the top
    /// of memory.
    pub fn slice(&self, addr: u8, len: usize) -> Vec<u8> {
        (0..len).map(|i| self.read_u8(addr.wrapping_add(i as u8))).collect()
    }

    // Utility functions for managing the stack.

    /// Pushes an 8-bit number onto the stack. The stack pointer is decremented
    /// first so it always points at the most recently pushed value.
    pub fn stack_push_u8(&mut self, cpu: &mut CPU, value: u8) {
        let sp = cpu.sp().wrapping_sub(1);
        cpu.set_sp(sp);
        self.write_u8(sp, value);
    }

    /// Pops an 8-bit number off the stack.
    pub fn stack_pop_u8(&mut self, cpu: &mut CPU) -> u8 {
        let sp = cpu.sp();
        let value = self.read_u8(sp);
        cpu.set_sp(sp.wrapping_add(1));
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ls8::cpu::STACK_POINTER_INIT;
    use ls8::ls8::LS8RuntimeOptions;

    fn cpu() -> CPU {
        CPU::new(LS8RuntimeOptions::default())
    }

    #[test]
    fn starts_zeroed() {
        let memory = Memory::new();
        assert!(memory.slice(0, MEMORY_SIZE).iter().all(|&b| b == 0));
    }

    #[test]
    fn memdump_wraps_past_the_top() {
        let mut memory = Memory::new();
        memory.memdump(0xFE, &[1, 2, 3]);
        assert_eq!(memory.read_u8(0xFE), 1);
        assert_eq!(memory.read_u8(0xFF), 2);
        assert_eq!(memory.read_u8(0x00), 3);
        assert_eq!(memory.slice(0xFE, 3), vec![1, 2, 3]);
    }

    #[test]
    fn push_then_pop_restores_stack_pointer() {
        let mut memory = Memory::new();
        let mut cpu = cpu();

        memory.stack_push_u8(&mut cpu, 0x2A);
        assert_eq!(cpu.sp(), STACK_POINTER_INIT - 1);
        assert_eq!(memory.read_u8(STACK_POINTER_INIT - 1), 0x2A);

        assert_eq!(memory.stack_pop_u8(&mut cpu), 0x2A);
        assert_eq!(cpu.sp(), STACK_POINTER_INIT);
    }

    #[test]
    fn stack_pointer_wraps_at_zero() {
        let mut memory = Memory::new();
        let mut cpu = cpu();
        cpu.set_sp(0);

        memory.stack_push_u8(&mut cpu, 7);
        assert_eq!(cpu.sp(), 0xFF);
        assert_eq!(memory.read_u8(0xFF), 7);

        assert_eq!(memory.stack_pop_u8(&mut cpu), 7);
        assert_eq!(cpu.sp(), 0);
    }
}
