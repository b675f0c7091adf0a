use num_traits::{FromPrimitive, ToPrimitive};

use crate::opcode::Opcode;
use crate::word::Word;

/// An `(opcode, operand)` pair, exactly as stored on disk: the opcode is
/// kept as its raw `u64` index rather than a decoded `Opcode`, so that an
/// out-of-range index surfaces as the interpreter's `ILLEGAL_INSTRUCTION`
/// trap when the instruction is fetched, not as a load-time failure. The
/// operand is only meaningful when the decoded opcode's `has_operand()` is
/// true; otherwise its bits are unspecified and must never be read.
#[derive(Clone, Copy)]
pub struct Instruction {
    opcode: u64,
    pub operand: Word,
}

impl Instruction {
    pub fn new(opcode: Opcode, operand: Word) -> Instruction {
        Instruction {
            opcode: opcode.to_u64().expect("Opcode always fits in a u64"),
            operand,
        }
    }

    /// An instruction with no operand, for mnemonics that don't carry one.
    pub fn bare(opcode: Opcode) -> Instruction {
        Instruction::new(opcode, Word::default())
    }

    /// Builds an instruction straight from its on-disk fields, without
    /// validating that `opcode` names a known opcode.
    pub fn from_raw(opcode: u64, operand: Word) -> Instruction {
        Instruction { opcode, operand }
    }

    /// The raw opcode index, as stored on disk.
    pub fn opcode_index(&self) -> u64 {
        self.opcode
    }

    /// Decodes the raw opcode index. `None` means the index doesn't name a
    /// known opcode; the interpreter traps `ILLEGAL_INSTRUCTION` in that
    /// case.
    pub fn decode(&self) -> Option<Opcode> {
        Opcode::from_u64(self.opcode)
    }
}

impl std::fmt::Debug for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.decode() {
            Some(op) => f
                .debug_struct("Instruction")
                .field("opcode", &op)
                .field("operand", &self.operand)
                .finish(),
            None => f
                .debug_struct("Instruction")
                .field("opcode_index", &self.opcode)
                .field("operand", &self.operand)
                .finish(),
        }
    }
}
