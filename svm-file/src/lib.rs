//! The binary program format: a raw concatenation of fixed-size records,
//! one per instruction, no header and no footer. Each record is
//! `<u64 little-endian opcode index><8 raw bytes operand>`, 16 bytes total.

use std::fmt;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use svm::constants::{PROGRAM_CAPACITY, RECORD_SIZE};
use svm::{Instruction, Word};

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// File length isn't a whole number of 16-byte records.
    Misaligned(u64),
    /// The file holds more records than a program can ever execute.
    TooManyRecords(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "{}", e),
            Error::Misaligned(len) => write!(
                f,
                "file length {} is not a multiple of the {}-byte record size",
                len, RECORD_SIZE
            ),
            Error::TooManyRecords(n) => write!(
                f,
                "file holds {} instructions, capacity is {}",
                n, PROGRAM_CAPACITY
            ),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

/// Reads every instruction record out of `reader`, in order.
pub fn read<R: Read>(reader: &mut R) -> Result<Vec<Instruction>, Error> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    if bytes.len() % RECORD_SIZE != 0 {
        return Err(Error::Misaligned(bytes.len() as u64));
    }
    let count = bytes.len() / RECORD_SIZE;
    if count > PROGRAM_CAPACITY {
        return Err(Error::TooManyRecords(count));
    }

    let mut instructions = Vec::with_capacity(count);
    let mut cursor: &[u8] = &bytes;
    for _ in 0..count {
        let opcode = cursor.read_u64::<LittleEndian>()?;
        let bits = cursor.read_u64::<LittleEndian>()?;
        instructions.push(Instruction::from_raw(opcode, Word::from_u64(bits)));
    }
    Ok(instructions)
}

/// Writes every instruction as one 16-byte record, in order, no header.
pub fn write<W: Write>(writer: &mut W, instructions: &[Instruction]) -> Result<(), Error> {
    for inst in instructions {
        writer.write_u64::<LittleEndian>(inst.opcode_index())?;
        writer.write_u64::<LittleEndian>(inst.operand.bits())?;
    }
    Ok(())
}

pub trait ReadSvmExt: Read + Sized {
    fn read_svm(&mut self) -> Result<Vec<Instruction>, Error> {
        read(self)
    }
}

impl<R: Read + Sized> ReadSvmExt for R {}

pub trait WriteSvmExt: Write + Sized {
    fn write_svm(&mut self, instructions: &[Instruction]) -> Result<(), Error> {
        write(self, instructions)
    }
}

impl<W: Write + Sized> WriteSvmExt for W {}

pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<Instruction>, Error> {
    BufReader::new(File::open(path)?).read_svm()
}

pub fn write_file<P: AsRef<Path>>(path: P, instructions: &[Instruction]) -> Result<(), Error> {
    BufWriter::new(File::create(path)?).write_svm(instructions)
}
