// Copyright 2016 Walter Kuppens.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use debugger::parser;
use io::errors::MachineError;
use io::log;
use ls8::instruction::Instruction;
use ls8::ls8::LS8;
use ls8::memory::MEMORY_SIZE;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::collections::BTreeSet;
use std::io::{self, Write};

const PROMPT: &'static str = "(ls8) ";
const DUMP_ROW_WIDTH: usize = 16;

#[derive(Debug, PartialEq)]
enum Command {
    Step,
    Continue,
    Break,
    Regs,
    Dump,
    Help,
    Quit,
}

#[derive(Debug)]
struct CommandWithArguments {
    command: Command,
    args: Vec<String>,
}

/// Whether the prompt loop keeps going after a command.
#[derive(Debug, PartialEq)]
enum Flow {
    Prompt,
    Quit,
}

/// Interactive monitor that drives a machine one instruction at a time. It
/// runs on the same thread as the machine, in between steps.
pub struct Debugger {
    breakpoints: BTreeSet<u8>,

    // The first fatal error the machine hit. Once set the machine can still be
    // inspected but not stepped.
    fault: Option<MachineError>,
}

impl Debugger {
    pub fn new() -> Self {
        Debugger {
            breakpoints: BTreeSet::new(),
            fault: None,
        }
    }

    /// Reads commands until the user quits or input ends. Program output and
    /// debugger output both go to `out`. A fatal machine error is handed back
    /// once the session is over.
    pub fn run<W: Write>(mut self, ls8: &mut LS8, out: &mut W) -> Result<(), MachineError> {
        let mut editor = DefaultEditor::new().map_err(terminal_error)?;
        ls8.cpu.running = true;
        log::log("debugger", "Stopped at entry, type 'help' for commands", &ls8.runtime_options);

        loop {
            let input = match editor.readline(PROMPT) {
                Ok(input) => input,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => return Err(terminal_error(e)),
            };
            if input.trim().is_empty() {
                continue;
            }
            editor.add_history_entry(input.as_str()).map_err(terminal_error)?;

            let flow = match self.interpret(&input) {
                Ok(command) => self.execute_command(command, ls8, out)?,
                Err(message) => {
                    writeln!(out, "ls8: {}", message)?;
                    Flow::Prompt
                }
            };
            out.flush()?;

            if flow == Flow::Quit {
                break;
            }
        }

        match self.fault {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Parse a raw input string into a list of arguments and a command. This
    /// function also maps command names to their respective enums.
    fn interpret(&self, input: &str) -> Result<CommandWithArguments, String> {
        let args = parser::input_to_arguments(input)?;

        let command = {
            let raw_command = match args.first() {
                Some(raw_command) => raw_command,
                None => return Err(String::from("no command specified")),
            };

            // Map command strings to the command enum type.
            match raw_command.to_lowercase().as_str() {
                // Full commands.
                "step"     => Command::Step,
                "continue" => Command::Continue,
                "break"    => Command::Break,
                "regs"     => Command::Regs,
                "dump"     => Command::Dump,
                "help"     => Command::Help,
                "quit"     => Command::Quit,
                // Aliases.
                "s" => Command::Step,
                "c" => Command::Continue,
                "b" => Command::Break,
                "r" => Command::Regs,
                "d" => Command::Dump,
                "h" => Command::Help,
                "q" => Command::Quit,
                // Unknown command.
                other => return Err(format!("unknown command '{}'", other)),
            }
        };

        Ok(CommandWithArguments {
            command: command,
            args: args,
        })
    }

    /// Executes the correct debugger command based on the enum passed. Only
    /// failures writing to `out` are returned; machine faults are recorded.
    fn execute_command<W: Write>(&mut self, command: CommandWithArguments, ls8: &mut LS8, out: &mut W) -> Result<Flow, MachineError> {
        let result = match command.command {
            Command::Step => self.execute_step(ls8, &command.args, out),
            Command::Continue => self.execute_continue(ls8, out),
            Command::Break => self.execute_break(&command.args, out),
            Command::Regs => self.execute_regs(ls8, out),
            Command::Dump => self.execute_dump(ls8, &command.args, out),
            Command::Help => self.execute_help(out),
            Command::Quit => return Ok(Flow::Quit),
        };

        match result {
            Ok(()) => Ok(Flow::Prompt),
            Err(CommandError::Usage(message)) => {
                writeln!(out, "ls8: {}", message)?;
                Ok(Flow::Prompt)
            }
            Err(CommandError::Io(e)) => Err(MachineError::Output(e)),
        }
    }

    /// Executes a number of instructions (one by default), printing a trace
    /// line before each.
    fn execute_step<W: Write>(&mut self, ls8: &mut LS8, args: &[String], out: &mut W) -> Result<(), CommandError> {
        let count = match args.get(1) {
            Some(arg) => parser::parse_number(arg)?,
            None => 1,
        };

        for _ in 0..count {
            if !self.can_execute(ls8, out)? {
                break;
            }
            let instr = Instruction::fetch(ls8.cpu.pc, &ls8.memory);
            writeln!(out, "{}  {}", instr.log(&ls8.cpu), instr.disassemble())?;
            self.execute_one(ls8, out)?;
        }
        Ok(())
    }

    /// Runs until the machine halts, faults, or reaches a breakpoint. The
    /// instruction under the program counter always runs, so continuing from
    /// a breakpoint moves past it.
    fn execute_continue<W: Write>(&mut self, ls8: &mut LS8, out: &mut W) -> Result<(), CommandError> {
        log::log("debugger", "Starting execution now...", &ls8.runtime_options);

        let mut first = true;
        while self.can_execute(ls8, out)? {
            if !first && self.breakpoints.contains(&ls8.cpu.pc) {
                writeln!(out, "Breakpoint at {:#04X}", ls8.cpu.pc)?;
                return Ok(());
            }
            first = false;
            self.execute_one(ls8, out)?;
        }
        Ok(())
    }

    /// Toggles a breakpoint at the given address.
    fn execute_break<W: Write>(&mut self, args: &[String], out: &mut W) -> Result<(), CommandError> {
        let addr = match args.get(1) {
            Some(arg) => parser::parse_address(arg)?,
            None => {
                if self.breakpoints.is_empty() {
                    writeln!(out, "No breakpoints")?;
                }
                for addr in self.breakpoints.iter() {
                    writeln!(out, "Breakpoint at {:#04X}", addr)?;
                }
                return Ok(());
            }
        };

        if self.breakpoints.remove(&addr) {
            writeln!(out, "Removed breakpoint at {:#04X}", addr)?;
        } else {
            self.breakpoints.insert(addr);
            writeln!(out, "Added breakpoint at {:#04X}", addr)?;
        }
        Ok(())
    }

    fn execute_regs<W: Write>(&mut self, ls8: &mut LS8, out: &mut W) -> Result<(), CommandError> {
        writeln!(out, "{}", ls8.cpu)?;
        Ok(())
    }

    /// Allows dumping memory at a specified memory address.
    fn execute_dump<W: Write>(&mut self, ls8: &mut LS8, args: &[String], out: &mut W) -> Result<(), CommandError> {
        let addr = match args.get(1) {
            Some(arg) => parser::parse_address(arg)?,
            None => 0,
        };
        let len = match args.get(2) {
            Some(arg) => parser::parse_number(arg)?,
            None => MEMORY_SIZE - addr as usize,
        };
        if len > MEMORY_SIZE {
            return Err(CommandError::Usage(format!("cannot dump more than {} bytes", MEMORY_SIZE)));
        }

        let bytes = ls8.memory.slice(addr, len);
        for (row, chunk) in bytes.chunks(DUMP_ROW_WIDTH).enumerate() {
            let row_addr = addr.wrapping_add((row * DUMP_ROW_WIDTH) as u8);
            let hex: Vec<String> = chunk.iter().map(|b| format!("{:02X}", b)).collect();
            writeln!(out, "{:02X}: {}", row_addr, hex.join(" "))?;
        }
        Ok(())
    }

    fn execute_help<W: Write>(&mut self, out: &mut W) -> Result<(), CommandError> {
        writeln!(out, "step [n]          (s)  execute n instructions, default 1")?;
        writeln!(out, "continue          (c)  run until HLT or a breakpoint")?;
        writeln!(out, "break [addr]      (b)  toggle a breakpoint, or list them")?;
        writeln!(out, "regs              (r)  show registers and flags")?;
        writeln!(out, "dump [addr] [len] (d)  hex dump memory")?;
        writeln!(out, "quit              (q)  leave the debugger")?;
        Ok(())
    }

    /// Checks whether the machine can run another instruction, telling the
    /// user why not if it can't.
    fn can_execute<W: Write>(&self, ls8: &LS8, out: &mut W) -> Result<bool, CommandError> {
        if let Some(ref e) = self.fault {
            writeln!(out, "Machine faulted: {}", e)?;
            return Ok(false);
        }
        if !ls8.running() {
            writeln!(out, "Machine halted at {:#04X}", ls8.cpu.pc)?;
            return Ok(false);
        }
        Ok(true)
    }

    fn execute_one<W: Write>(&mut self, ls8: &mut LS8, out: &mut W) -> Result<(), CommandError> {
        match ls8.step(out) {
            Ok(()) => Ok(()),
            Err(MachineError::Output(e)) => Err(CommandError::Io(e)),
            Err(e) => {
                writeln!(out, "Machine faulted: {}", e)?;
                writeln!(out, "{}", ls8.cpu)?;
                ls8.cpu.running = false;
                self.fault = Some(e);
                Ok(())
            }
        }
    }
}

/// Failures of a single debugger command. Usage problems are shown at the
/// prompt; I/O failures end the session.
#[derive(Debug)]
enum CommandError {
    Usage(String),
    Io(io::Error),
}

impl From<String> for CommandError {
    fn from(message: String) -> CommandError {
        CommandError::Usage(message)
    }
}

impl From<io::Error> for CommandError {
    fn from(e: io::Error) -> CommandError {
        CommandError::Io(e)
    }
}

fn terminal_error(e: ReadlineError) -> MachineError {
    match e {
        ReadlineError::Io(e) => MachineError::Output(e),
        other => MachineError::Output(io::Error::new(io::ErrorKind::Other, other.to_string())),
    }
}
