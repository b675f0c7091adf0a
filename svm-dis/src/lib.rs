//! Reproduces textual source from a loaded program. Depends only on
//! opcode metadata (`has_operand`, `mnemonic`) and the binary codec,
//! never the interpreter.
//!
//! One line per instruction: the mnemonic, then, only if the opcode
//! carries one, a space and the operand's signed-64-bit decimal form.
//! Labels are never reconstructed; jump targets print as raw addresses.

use std::fmt::Write as _;

use svm::Instruction;

pub fn disassemble_one(inst: &Instruction) -> String {
    let mut line = String::new();
    match inst.decode() {
        Some(opcode) => {
            line.push_str(opcode.mnemonic());
            if opcode.has_operand() {
                let _ = write!(line, " {}", inst.operand.i64());
            }
        }
        None => {
            let _ = write!(line, "<illegal opcode {}>", inst.opcode_index());
        }
    }
    line
}

pub fn disassemble(instructions: &[Instruction]) -> String {
    instructions
        .iter()
        .map(disassemble_one)
        .collect::<Vec<_>>()
        .join("\n")
}
