use std::io::{self, Write};

use super::{Interpreter, State};
use crate::error::TrapKind;
use crate::opcode::Opcode;
use crate::word::Word;

type StepResult = Result<(), TrapKind>;

/// Fetches, decodes and executes exactly one instruction, returning the
/// interpreter's resulting state.
pub(super) fn step<W: Write>(vm: &mut Interpreter, sink: &mut W) -> State {
    let inst = match vm.program.get(vm.ip) {
        Some(inst) => *inst,
        None => return State::Trapped(TrapKind::IllegalInstructionAccess),
    };

    let opcode = match inst.decode() {
        Some(op) => op,
        None => return State::Trapped(TrapKind::IllegalInstruction),
    };

    let result = match opcode {
        Opcode::NOP => advance(vm),
        Opcode::PUSH => push_literal(vm, inst.operand),
        Opcode::DUP_REL => dup_rel(vm, inst.operand),
        Opcode::SWAP => swap(vm, inst.operand),
        Opcode::ADDI => binary_int(vm, |a, b| a.wrapping_add(b)),
        Opcode::SUBI => binary_int(vm, |a, b| a.wrapping_sub(b)),
        Opcode::MULI => binary_int(vm, |a, b| a.wrapping_mul(b)),
        Opcode::DIVI => div_int(vm),
        Opcode::ADDF => binary_float(vm, |a, b| a + b),
        Opcode::SUBF => binary_float(vm, |a, b| a - b),
        Opcode::MULF => binary_float(vm, |a, b| a * b),
        Opcode::DIVF => binary_float(vm, |a, b| a / b),
        Opcode::JMP => jump(vm, inst.operand),
        Opcode::JMP_NZ => jump_nz(vm, inst.operand),
        Opcode::EQ => compare_eq(vm),
        Opcode::NOT => logical_not(vm),
        Opcode::GEQ => compare_geq(vm),
        Opcode::HALT => {
            return State::Halted;
        }
        Opcode::PRINT_DEBUG => print_debug(vm, sink),
    };

    match result {
        Ok(()) => State::Running,
        Err(trap) => State::Trapped(trap),
    }
}

fn advance(vm: &mut Interpreter) -> StepResult {
    vm.ip += 1;
    Ok(())
}

fn push_word(vm: &mut Interpreter, w: Word) -> StepResult {
    if vm.stack_size >= vm.stack.len() {
        return Err(TrapKind::StackOverflow);
    }
    vm.stack[vm.stack_size] = w;
    vm.stack_size += 1;
    Ok(())
}

fn push_literal(vm: &mut Interpreter, operand: Word) -> StepResult {
    push_word(vm, operand)?;
    vm.ip += 1;
    Ok(())
}

/// Interprets an operand as a non-negative relative stack index, per the
/// `rdup`/`swap` contract: negative traps `ILLEGAL_OPERAND`, in-range but
/// at-or-past the stack top traps `STACK_UNDERFLOW`.
fn relative_index(vm: &Interpreter, operand: Word) -> Result<usize, TrapKind> {
    let n = operand.i64();
    if n < 0 {
        return Err(TrapKind::IllegalOperand);
    }
    let n = n as usize;
    if n >= vm.stack_size {
        return Err(TrapKind::StackUnderflow);
    }
    Ok(n)
}

fn dup_rel(vm: &mut Interpreter, operand: Word) -> StepResult {
    let n = relative_index(vm, operand)?;
    let w = vm.stack[vm.stack_size - 1 - n];
    push_word(vm, w)?;
    vm.ip += 1;
    Ok(())
}

fn swap(vm: &mut Interpreter, operand: Word) -> StepResult {
    let n = relative_index(vm, operand)?;
    let top = vm.stack_size - 1;
    vm.stack.swap(top, top - n);
    vm.ip += 1;
    Ok(())
}

fn binary_int(vm: &mut Interpreter, f: impl Fn(u64, u64) -> u64) -> StepResult {
    if vm.stack_size < 2 {
        return Err(TrapKind::StackUnderflow);
    }
    let b = vm.stack[vm.stack_size - 1].u64();
    let a = vm.stack[vm.stack_size - 2].u64();
    vm.stack[vm.stack_size - 2] = Word::from_u64(f(a, b));
    vm.stack_size -= 1;
    vm.ip += 1;
    Ok(())
}

fn div_int(vm: &mut Interpreter) -> StepResult {
    if vm.stack_size < 2 {
        return Err(TrapKind::StackUnderflow);
    }
    let b = vm.stack[vm.stack_size - 1].u64();
    let a = vm.stack[vm.stack_size - 2].u64();
    if b == 0 {
        return Err(TrapKind::DivByZero);
    }
    vm.stack[vm.stack_size - 2] = Word::from_u64(a / b);
    vm.stack_size -= 1;
    vm.ip += 1;
    Ok(())
}

fn binary_float(vm: &mut Interpreter, f: impl Fn(f64, f64) -> f64) -> StepResult {
    if vm.stack_size < 2 {
        return Err(TrapKind::StackUnderflow);
    }
    let b = vm.stack[vm.stack_size - 1].f64();
    let a = vm.stack[vm.stack_size - 2].f64();
    vm.stack[vm.stack_size - 2] = Word::from_f64(f(a, b));
    vm.stack_size -= 1;
    vm.ip += 1;
    Ok(())
}

fn jump(vm: &mut Interpreter, operand: Word) -> StepResult {
    vm.ip = operand.u64() as usize;
    Ok(())
}

fn jump_nz(vm: &mut Interpreter, operand: Word) -> StepResult {
    if vm.stack_size < 1 {
        return Err(TrapKind::StackUnderflow);
    }
    let top = vm.stack[vm.stack_size - 1].u64();
    vm.stack_size -= 1;
    if top != 0 {
        vm.ip = operand.u64() as usize;
    } else {
        vm.ip += 1;
    }
    Ok(())
}

fn compare_eq(vm: &mut Interpreter) -> StepResult {
    if vm.stack_size < 2 {
        return Err(TrapKind::StackUnderflow);
    }
    let b = vm.stack[vm.stack_size - 1].u64();
    let a = vm.stack[vm.stack_size - 2].u64();
    vm.stack[vm.stack_size - 2] = Word::from_u64((a == b) as u64);
    vm.stack_size -= 1;
    vm.ip += 1;
    Ok(())
}

/// `NOT`/`GEQ` trap `STACK_UNDERFLOW` on a short stack, not `STACK_OVERFLOW`.
fn logical_not(vm: &mut Interpreter) -> StepResult {
    if vm.stack_size < 1 {
        return Err(TrapKind::StackUnderflow);
    }
    let top = vm.stack[vm.stack_size - 1].u64();
    vm.stack[vm.stack_size - 1] = Word::from_u64((top == 0) as u64);
    vm.ip += 1;
    Ok(())
}

/// Asymmetric by contract: compares the top of stack against the element
/// below it, not the other way around.
fn compare_geq(vm: &mut Interpreter) -> StepResult {
    if vm.stack_size < 2 {
        return Err(TrapKind::StackUnderflow);
    }
    let top = vm.stack[vm.stack_size - 1].f64();
    let below = vm.stack[vm.stack_size - 2].f64();
    vm.stack[vm.stack_size - 2] = Word::from_u64((top >= below) as u64);
    vm.stack_size -= 1;
    vm.ip += 1;
    Ok(())
}

/// Prints the stack to `sink`: a `"Stack:\n"` header, then one value per
/// line (top first) indented two spaces as a signed decimal, or a single
/// `"  [Empty]\n"` line when the stack is empty.
fn print_debug<W: Write>(vm: &mut Interpreter, sink: &mut W) -> StepResult {
    let write_result: io::Result<()> = (|| {
        writeln!(sink, "Stack:")?;
        if vm.stack_size == 0 {
            writeln!(sink, "  [Empty]")?;
        } else {
            for i in (0..vm.stack_size).rev() {
                writeln!(sink, "  {}", vm.stack[i].i64())?;
            }
        }
        Ok(())
    })();
    // A failure to write the debug dump is not part of the trap contract; best-effort only.
    let _ = write_result;
    vm.ip += 1;
    Ok(())
}
