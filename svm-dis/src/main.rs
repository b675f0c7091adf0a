#[macro_use]
extern crate clap;

use clap::Arg;
use std::process::exit;

fn main() {
    env_logger::init();

    let matches = app_from_crate!()
        .arg(
            Arg::with_name("INPUT")
                .help("Binary program file to disassemble")
                .required(true)
                .index(1),
        )
        .get_matches();

    let input = matches.value_of("INPUT").unwrap();

    if let Err(err) = run(input) {
        eprintln!("[ERROR]: {}", err);
        exit(1);
    }
}

fn run(input: &str) -> Result<(), svm_file::Error> {
    let instructions = svm_file::read_file(input)?;
    log::debug!("loaded {} instructions from {}", instructions.len(), input);
    println!("{}", svm_dis::disassemble(&instructions));
    Ok(())
}
