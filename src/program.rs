use crate::constants::PROGRAM_CAPACITY;
use crate::instruction::Instruction;

/// An immutable, ordered sequence of instructions, addressed by 0-based
/// instruction pointer. Once loaded a `Program` never changes; execution
/// mutates only the interpreter state around it.
#[derive(Debug)]
pub struct Program {
    instructions: Vec<Instruction>,
}

/// Returned when a caller tries to build a `Program` past its capacity.
#[derive(Debug)]
pub struct ProgramTooLarge {
    pub len: usize,
}

impl std::fmt::Display for ProgramTooLarge {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "program has {} instructions, capacity is {}",
            self.len, PROGRAM_CAPACITY
        )
    }
}

impl std::error::Error for ProgramTooLarge {}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Result<Program, ProgramTooLarge> {
        if instructions.len() > PROGRAM_CAPACITY {
            return Err(ProgramTooLarge {
                len: instructions.len(),
            });
        }
        Ok(Program { instructions })
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, ip: usize) -> Option<&Instruction> {
        self.instructions.get(ip)
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}
