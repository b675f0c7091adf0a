//! Two-pass assembler for the stack-based virtual machine's source
//! language.
//!
//! Source is line-oriented: split on `\n`, each line trimmed, `#` starts a
//! comment. The first pass emits one [`Instruction`] per non-empty,
//! non-comment line and records labels as it sees them; forward references
//! in `jmp`/`jnz` operands are queued as deferred patches and resolved in
//! a second pass once every label has been seen.

pub mod error;
pub mod labels;

pub use error::Error;

use labels::LabelTable;
use svm::constants::DEFERRED_CAPACITY;
use svm::{Instruction, Opcode, Word};

/// Assembles `source` into a flat instruction sequence. Fails fatally (no
/// partial result) on the first unknown mnemonic, unparsable literal or
/// undefined label.
pub fn assemble(source: &str) -> Result<Vec<Instruction>, Error> {
    let mut labels = LabelTable::new();
    let mut deferred: Vec<(usize, String)> = Vec::new();
    let mut instructions: Vec<Instruction> = Vec::new();

    for raw_line in source.split('\n') {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (mut head, mut rest) = split_first_space(line);

        if let Some(label_name) = head.strip_suffix(':') {
            labels.register(label_name, instructions.len())?;
            let (next_head, next_rest) = split_first_space(rest.trim_start());
            head = next_head;
            rest = next_rest;
        }

        if head.is_empty() {
            continue;
        }

        let operand_text = operand_text(rest);
        let upper = head.to_uppercase();
        let opcode = Opcode::from_mnemonic(&upper)
            .map_err(|_| Error::UnknownInstruction(head.to_string()))?;

        let instruction = emit(opcode, operand_text, &mut instructions, &mut deferred)?;
        instructions.push(instruction);
    }

    for (index, label_name) in deferred {
        let address = labels
            .resolve(&label_name)
            .ok_or_else(|| Error::UndefinedLabel(label_name.clone()))?;
        log::debug!(
            "patching instruction {} operand to label \"{}\" -> {}",
            index,
            label_name,
            address
        );
        instructions[index].operand = Word::from_u64(address as u64);
    }

    if instructions.len() > svm::constants::PROGRAM_CAPACITY {
        return Err(Error::ProgramTooLarge(svm::ProgramTooLarge {
            len: instructions.len(),
        }));
    }
    Ok(instructions)
}

fn operand_text(rest: &str) -> &str {
    let rest = rest.trim();
    match rest.find('#') {
        Some(idx) => rest[..idx].trim(),
        None => rest,
    }
}

fn split_first_space(s: &str) -> (&str, &str) {
    match s.find(' ') {
        Some(idx) => (&s[..idx], &s[idx + 1..]),
        None => (s, ""),
    }
}

fn emit(
    opcode: Opcode,
    operand_text: &str,
    instructions: &mut [Instruction],
    deferred: &mut Vec<(usize, String)>,
) -> Result<Instruction, Error> {
    match opcode {
        Opcode::PUSH => Ok(Instruction::new(opcode, parse_push_operand(operand_text)?)),
        Opcode::DUP_REL | Opcode::SWAP => {
            let n: i64 = operand_text
                .parse()
                .map_err(|_| Error::UnparsableLiteral(operand_text.to_string()))?;
            Ok(Instruction::new(opcode, Word::from_i64(n)))
        }
        Opcode::JMP | Opcode::JMP_NZ => {
            if operand_text
                .as_bytes()
                .first()
                .map_or(false, u8::is_ascii_digit)
            {
                let address: u64 = operand_text
                    .parse()
                    .map_err(|_| Error::UnparsableLiteral(operand_text.to_string()))?;
                Ok(Instruction::new(opcode, Word::from_u64(address)))
            } else {
                if deferred.len() >= DEFERRED_CAPACITY {
                    return Err(Error::TooManyDeferred);
                }
                log::debug!(
                    "deferring instruction {} to label \"{}\"",
                    instructions.len(),
                    operand_text
                );
                deferred.push((instructions.len(), operand_text.to_string()));
                Ok(Instruction::new(opcode, Word::from_u64(0)))
            }
        }
        _ => Ok(Instruction::bare(opcode)),
    }
}

/// `push`'s operand: an unsigned base-10 integer first, a double on
/// failure, fatal if neither fully consumes the text.
fn parse_push_operand(text: &str) -> Result<Word, Error> {
    if let Ok(u) = text.parse::<u64>() {
        return Ok(Word::from_u64(u));
    }
    if let Ok(f) = text.parse::<f64>() {
        return Ok(Word::from_f64(f));
    }
    Err(Error::UnparsableLiteral(text.to_string()))
}

#[cfg(test)]
mod test {
    use super::*;

    fn words(instructions: &[Instruction]) -> Vec<(Opcode, u64)> {
        instructions
            .iter()
            .map(|i| (i.decode().unwrap(), i.operand.bits()))
            .collect()
    }

    #[test]
    fn assembles_no_operand_mnemonics() {
        let instructions = assemble("nop\nhalt\n").unwrap();
        assert_eq!(
            words(&instructions),
            vec![(Opcode::NOP, 0), (Opcode::HALT, 0)]
        );
    }

    #[test]
    fn push_tries_unsigned_then_double() {
        let instructions = assemble("push 42\npush 1.5\n").unwrap();
        assert_eq!(instructions[0].operand.u64(), 42);
        assert_eq!(instructions[1].operand.f64(), 1.5);
    }

    #[test]
    fn forward_label_reference_resolves_in_second_pass() {
        let instructions = assemble("jmp end\npush 1\nend: halt\n").unwrap();
        assert_eq!(instructions.len(), 3);
        assert_eq!(instructions[0].decode().unwrap(), Opcode::JMP);
        assert_eq!(instructions[0].operand.u64(), 2);
    }

    #[test]
    fn backward_label_reference_resolves_without_deferral() {
        let instructions = assemble("start: nop\njmp start\n").unwrap();
        assert_eq!(instructions[1].operand.u64(), 0);
    }

    #[test]
    fn unknown_mnemonic_is_a_fatal_error() {
        let err = assemble("foo 3\n").unwrap_err();
        assert!(matches!(err, Error::UnknownInstruction(ref s) if s == "foo"));
    }

    #[test]
    fn undefined_label_is_a_fatal_error() {
        let err = assemble("jmp nowhere\n").unwrap_err();
        assert!(matches!(err, Error::UndefinedLabel(ref s) if s == "nowhere"));
    }

    #[test]
    fn full_line_and_trailing_comments_are_ignored() {
        let instructions = assemble("# a comment\nnop # trailing\n").unwrap();
        assert_eq!(instructions.len(), 1);
    }

    #[test]
    fn label_only_line_contributes_no_instruction() {
        let instructions = assemble("start:\nhalt\n").unwrap();
        assert_eq!(instructions.len(), 1);
    }

    #[test]
    fn rdup_and_swap_take_decimal_operands() {
        let instructions = assemble("rdup 2\nswap 1\n").unwrap();
        assert_eq!(instructions[0].operand.i64(), 2);
        assert_eq!(instructions[1].operand.i64(), 1);
    }
}
