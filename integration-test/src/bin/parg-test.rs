// Scanner driver for the smoke tests.
//
// Reorders its arguments, then prints one line per scanner outcome. With
// POSIXLY_CORRECT set nothing is reordered and scanning stops at the first
// operand. An argument that is not valid UTF-8 is rejected with status 2.

use std::cell::Cell;
use std::ffi::OsString;
use std::process::ExitCode;

use parg::{ArgKind, LongOpt, Outcome, State};
use tracing_subscriber::{fmt, EnvFilter};

const OPTSTRING: &str = ":no::r:";

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let argv = std::env::args_os()
        .map(OsString::into_string)
        .collect::<Result<Vec<_>, _>>();
    match argv {
        Ok(argv) => run(argv),
        Err(bad) => {
            eprintln!("parg-test: argument is not valid UTF-8: {:?}", bad);
            ExitCode::from(2)
        }
    }
}

fn run(mut argv: Vec<String>) -> ExitCode {
    tracing::debug!(count = argv.len(), "scanning arguments");
    let posixly_correct = std::env::var_os("POSIXLY_CORRECT").is_some();

    let verbose = Cell::new(0);
    let long = [
        LongOpt::new("noarg", ArgKind::None, 'n' as i32),
        LongOpt::new("optarg", ArgKind::Optional, 'o' as i32),
        LongOpt::new("reqarg", ArgKind::Required, 'r' as i32),
        LongOpt::new("foo", ArgKind::None, 'f' as i32),
        LongOpt::new("foobar", ArgKind::None, 'b' as i32),
        LongOpt::new("verbose", ArgKind::None, 1).flag(&verbose),
    ];

    if !posixly_correct {
        let boundary = parg::reorder(&mut argv, OPTSTRING, Some(&long[..]));
        println!("boundary {}", boundary);
    }

    let mut state = State::new();
    let mut failed = false;
    let operands_from = loop {
        match state.scan_long(&argv, OPTSTRING, &long) {
            Outcome::Done => break state.index(),
            Outcome::Operand(_) if posixly_correct => break state.index() - 1,
            Outcome::Operand(text) => println!("operand {}", text),
            Outcome::Matched {
                code: parg::FLAG_SET,
                long_index: Some(i),
                ..
            } => println!("flag {}", long[i].name),
            Outcome::Matched { code, arg, .. } => match arg {
                Some(arg) => println!("option {} {}", code_name(code), arg),
                None => println!("option {}", code_name(code)),
            },
            other => {
                failed = true;
                if let Err(e) = other.into_result() {
                    eprintln!("parg-test: {}", e);
                }
            }
        }
    };

    for operand in &argv[operands_from..] {
        println!("operand {}", operand);
    }
    if verbose.get() != 0 {
        println!("verbose {}", verbose.get());
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn code_name(code: i32) -> String {
    u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .map_or_else(|| code.to_string(), String::from)
}
