use std::fmt;

use svm::constants::{DEFERRED_CAPACITY, LABEL_CAPACITY};
use svm::ProgramTooLarge;

/// Every fatal condition the assembler can hit. A single enum, composed
/// via `From` impls, per the workspace's error-handling convention — the
/// library never panics or exits, it returns this and the CLI formats it.
#[derive(Debug)]
pub enum Error {
    UnknownInstruction(String),
    UnparsableLiteral(String),
    UndefinedLabel(String),
    DuplicateLabel(String),
    TooManyLabels,
    TooManyDeferred,
    ProgramTooLarge(ProgramTooLarge),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnknownInstruction(head) => write!(f, "Unknown Instruction \"{}\"", head),
            Error::UnparsableLiteral(text) => {
                write!(f, "could not parse \"{}\" as a numeric literal", text)
            }
            Error::UndefinedLabel(name) => write!(f, "label \"{}\" does not exist", name),
            Error::DuplicateLabel(name) => write!(f, "label \"{}\" is already defined", name),
            Error::TooManyLabels => write!(f, "too many labels, capacity is {}", LABEL_CAPACITY),
            Error::TooManyDeferred => write!(
                f,
                "too many unresolved jump targets, capacity is {}",
                DEFERRED_CAPACITY
            ),
            Error::ProgramTooLarge(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<ProgramTooLarge> for Error {
    fn from(e: ProgramTooLarge) -> Error {
        Error::ProgramTooLarge(e)
    }
}
