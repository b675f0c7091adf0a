#[macro_use]
extern crate clap;

use clap::Arg;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::exit;

#[derive(Debug)]
enum IOErrorContext {
    ReadInput,
    WriteOutput,
}

#[derive(Debug)]
enum Error {
    Asm(svm_asm::Error),
    Io(std::io::Error, IOErrorContext, PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err, context, path) => write!(
                f,
                "{} file \"{}\" failed: {}",
                match context {
                    IOErrorContext::ReadInput => "Reading input",
                    IOErrorContext::WriteOutput => "Writing output",
                },
                path.display(),
                err
            ),
            Error::Asm(err) => write!(f, "{}", err),
        }
    }
}

fn main() {
    env_logger::init();

    let matches = app_from_crate!()
        .arg(
            Arg::with_name("INPUT")
                .help("Source file to assemble")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("OUTPUT")
                .help("Binary program file to write")
                .required(true)
                .index(2),
        )
        .get_matches();

    let input = matches.value_of("INPUT").unwrap();
    let output = matches.value_of("OUTPUT").unwrap();

    if let Err(err) = run(input, output) {
        eprintln!("[ERROR]: {}", err);
        exit(1);
    }
}

fn run(input: &str, output: &str) -> Result<(), Error> {
    let input_path = Path::new(input);
    let output_path = Path::new(output);

    let input_file = File::open(input_path)
        .map_err(|err| Error::Io(err, IOErrorContext::ReadInput, input_path.to_owned()))?;
    let mut source = String::new();
    BufReader::new(input_file)
        .read_to_string(&mut source)
        .map_err(|err| Error::Io(err, IOErrorContext::ReadInput, input_path.to_owned()))?;

    let instructions = svm_asm::assemble(&source).map_err(Error::Asm)?;
    log::debug!("assembled {} instructions", instructions.len());

    svm_file::write_file(output_path, &instructions)
        .map_err(|err| match err {
            svm_file::Error::Io(io_err) => {
                Error::Io(io_err, IOErrorContext::WriteOutput, output_path.to_owned())
            }
            other => Error::Io(
                std::io::Error::new(std::io::ErrorKind::Other, other.to_string()),
                IOErrorContext::WriteOutput,
                output_path.to_owned(),
            ),
        })?;

    Ok(())
}
