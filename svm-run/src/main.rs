#[macro_use]
extern crate clap;

use clap::Arg;
use std::process::exit;

#[derive(Debug)]
enum Error {
    Run(svm_run::Error),
    Trap(svm::TrapKind),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Run(err) => write!(f, "{}", err),
            Error::Trap(trap) => write!(f, "{}", trap),
        }
    }
}

fn main() {
    env_logger::init();

    let matches = app_from_crate!()
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .takes_value(true)
                .value_name("PROGRAM")
                .required(true)
                .help("Binary program file to run"),
        )
        .arg(
            Arg::with_name("limit")
                .short("l")
                .long("limit")
                .takes_value(true)
                .value_name("LIMIT")
                .default_value("-1")
                .help("Step budget; negative means unbounded"),
        )
        .arg(
            Arg::with_name("debug")
                .short("d")
                .long("debug")
                .help("Wait for a line on stdin before each step"),
        )
        .get_matches();

    let input = matches.value_of("input").unwrap();
    let debug = matches.is_present("debug");
    let limit = match value_t!(matches.value_of("limit"), i64) {
        Ok(limit) => limit,
        Err(err) => err.exit(),
    };

    if let Err(err) = run(input, limit, debug) {
        eprintln!("[ERROR]: {}", err);
        exit(1);
    }
}

fn run(input: &str, limit: i64, debug: bool) -> Result<(), Error> {
    let program = svm_run::load(input).map_err(Error::Run)?;
    log::debug!("loaded {} instructions from {}", program.len(), input);

    let mut vm = svm::Interpreter::new(program);
    let state = svm_run::run(&mut vm, limit, debug);

    match state {
        svm::State::Trapped(trap) => Err(Error::Trap(trap)),
        _ => Ok(()),
    }
}
