use clap::Parser;
use gedq::run::{self, CliOptions, OsFacade};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

/// The process's real stdin, filesystem, stdout and stderr.
struct Console;

impl OsFacade for Console {
    fn read_stdin(&self) -> io::Result<String> {
        io::read_to_string(io::stdin().lock())
    }

    fn read_file(&self, path: &str) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn stdout(&mut self) -> impl Write {
        BufWriter::new(io::stdout().lock())
    }

    fn write_error(&mut self, err: run::Error) {
        eprint!("{err}")
    }
}

fn main() -> ExitCode {
    let options: run::RunOptions = CliOptions::parse().into();
    match run::run(&options, &mut Console) {
        true => ExitCode::SUCCESS,
        false => ExitCode::FAILURE,
    }
}
