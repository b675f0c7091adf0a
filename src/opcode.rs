use num_derive::{FromPrimitive, ToPrimitive};
use util::{EnumFromStr, ParseEnumError};
use util_derive::EnumFromStr;

/// The closed opcode enumeration. Stable ordering: this is also the
/// `u64` index used by [`crate::file`](../svm-file)'s on-disk records.
///
/// `EnumFromStr` drives mnemonic parsing in the assembler; two opcodes
/// have a mnemonic that doesn't match their own name uppercased (`rdup`
/// for `DUP_REL`, `jnz` for `JMP_NZ`) and are given an explicit alias.
#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive, ToPrimitive, EnumFromStr)]
pub enum Opcode {
    NOP,
    PUSH,
    #[from_str(alias = "RDUP")]
    DUP_REL,
    SWAP,
    ADDI,
    SUBI,
    MULI,
    DIVI,
    ADDF,
    SUBF,
    MULF,
    DIVF,
    JMP,
    #[from_str(alias = "JNZ")]
    JMP_NZ,
    EQ,
    NOT,
    GEQ,
    HALT,
    PRINT_DEBUG,
}

impl Opcode {
    /// Whether this opcode's operand word is meaningful. Drives both the
    /// assembler's operand-parsing step and the disassembler's output.
    pub fn has_operand(&self) -> bool {
        matches!(
            self,
            Opcode::PUSH | Opcode::DUP_REL | Opcode::SWAP | Opcode::JMP | Opcode::JMP_NZ
        )
    }

    /// The assembler keyword for this opcode, as it appears in source text
    /// and in disassembler output. Distinct from the derive above: that one
    /// parses source text into an opcode, this one formats an opcode back
    /// into its lowercase source keyword.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::NOP => "nop",
            Opcode::PUSH => "push",
            Opcode::DUP_REL => "rdup",
            Opcode::SWAP => "swap",
            Opcode::ADDI => "addi",
            Opcode::SUBI => "subi",
            Opcode::MULI => "muli",
            Opcode::DIVI => "divi",
            Opcode::ADDF => "addf",
            Opcode::SUBF => "subf",
            Opcode::MULF => "mulf",
            Opcode::DIVF => "divf",
            Opcode::JMP => "jmp",
            Opcode::JMP_NZ => "jnz",
            Opcode::EQ => "eq",
            Opcode::NOT => "not",
            Opcode::GEQ => "geq",
            Opcode::HALT => "halt",
            Opcode::PRINT_DEBUG => "print_debug",
        }
    }

    /// Parses an uppercased mnemonic (the assembler uppercases source text
    /// before calling this).
    pub fn from_mnemonic(upper: &str) -> Result<Opcode, ParseEnumError> {
        <Opcode as EnumFromStr>::from_str(upper)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mnemonic_round_trips_through_uppercasing() {
        for op in &[
            Opcode::NOP,
            Opcode::PUSH,
            Opcode::DUP_REL,
            Opcode::SWAP,
            Opcode::ADDI,
            Opcode::JMP,
            Opcode::JMP_NZ,
            Opcode::HALT,
            Opcode::PRINT_DEBUG,
        ] {
            let upper = op.mnemonic().to_uppercase();
            let parsed = Opcode::from_mnemonic(&upper).unwrap();
            assert_eq!(parsed, *op);
        }
    }

    #[test]
    fn unknown_mnemonic_is_rejected() {
        assert!(Opcode::from_mnemonic("FOO").is_err());
    }

    #[test]
    fn has_operand_matches_the_opcode_table() {
        assert!(Opcode::PUSH.has_operand());
        assert!(Opcode::DUP_REL.has_operand());
        assert!(!Opcode::ADDI.has_operand());
        assert!(!Opcode::HALT.has_operand());
        assert!(!Opcode::PRINT_DEBUG.has_operand());
    }
}
