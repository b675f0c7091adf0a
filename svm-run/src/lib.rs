//! Drives a loaded program to completion: fetch a step, log it, stop on
//! the first trap.

use std::io::{self, BufRead, Write};
use std::path::Path;

use log::{trace, warn};
use svm::{Interpreter, Opcode, Program, ProgramTooLarge, State};

#[derive(Debug)]
pub enum Error {
    File(svm_file::Error),
    Program(ProgramTooLarge),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::File(err) => write!(f, "{}", err),
            Error::Program(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<svm_file::Error> for Error {
    fn from(err: svm_file::Error) -> Error {
        Error::File(err)
    }
}

impl From<ProgramTooLarge> for Error {
    fn from(err: ProgramTooLarge) -> Error {
        Error::Program(err)
    }
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<Program, Error> {
    let instructions = svm_file::read_file(path)?;
    Ok(Program::new(instructions)?)
}

/// Runs `vm` until it stops being `Running`, honoring `limit` (negative is
/// unbounded, matching [`Interpreter::run`]). When `debug` is set, waits for
/// a line on stdin before each step. Logs every executed instruction at
/// `trace` and any trap at `warn`.
pub fn run(vm: &mut Interpreter, limit: i64, debug: bool) -> State {
    let stdin = io::stdin();
    let mut remaining = limit;
    let mut state = vm.state();

    while matches!(state, State::Running) {
        if limit >= 0 {
            if remaining <= 0 {
                break;
            }
            remaining -= 1;
        }

        if debug {
            print!("-- ip={} --\n> ", vm.ip());
            let _ = io::stdout().flush();
            let mut line = String::new();
            let _ = stdin.lock().read_line(&mut line);
        }

        let ip_before = vm.ip();
        let inst = vm.program().get(ip_before);
        let mnemonic = inst.and_then(|i| i.decode()).map(Opcode::mnemonic);
        let operand = inst.map(|i| i.operand.i64()).unwrap_or(0);

        state = vm.step();

        trace!(
            "ip={} {} operand={} -> ip={} state={:?}",
            ip_before,
            mnemonic.unwrap_or("<illegal>"),
            operand,
            vm.ip(),
            state
        );

        if let State::Trapped(trap) = state {
            warn!("trapped at ip={}: {}", ip_before, trap);
        }
    }

    state
}
