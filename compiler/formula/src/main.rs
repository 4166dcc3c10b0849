//! Formula CLI
//!
//! `formula "<expr>" [name=value ...]` evaluates one formula and prints
//! the result.

use std::process::ExitCode;

use formula::{parse_host_value, Formula};

fn main() -> ExitCode {
    formula::init_tracing();

    let mut args = std::env::args().skip(1);
    let Some(source) = args.next() else {
        print_usage();
        return ExitCode::FAILURE;
    };
    if source == "-h" || source == "--help" {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let mut formula = match Formula::new(&source) {
        Ok(formula) => formula,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    for binding in args {
        let Some((name, value)) = binding.split_once('=') else {
            eprintln!("error: expected name=value, got \"{binding}\"");
            return ExitCode::FAILURE;
        };
        formula.set_variable(name.trim(), parse_host_value(value.trim()));
    }

    match formula.calculate() {
        Ok(value) => {
            println!("{}", formula.render(&value));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    eprintln!("Usage: formula \"<expr>\" [name=value ...]");
    eprintln!();
    eprintln!("Values are integers, floats, true, false, null, dates (2020-01-15),");
    eprintln!("durations (P1M) or strings.");
    eprintln!();
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=fml_eval=trace) for pipeline tracing.");
}
