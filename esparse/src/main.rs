use clap::Parser;
use esparse::{diagnostics, logging, print_parsed, run, Cli};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(&cli) {
        Ok(parsed) => match print_parsed(&cli, &parsed, &mut io::stdout().lock()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: {}", err);
                ExitCode::from(2)
            }
        },
        Err(err) => {
            diagnostics::report(&err);
            ExitCode::from(err.exit_code())
        }
    }
}
