use rustyline::{error::ReadlineError, DefaultEditor};
use std::{fs::File, io::{self, BufReader, IsTerminal, Read}};
use step_reduce::{
    display::{format_expression, FormatOptions, Spacing},
    ReduceError,
    Reducer,
    Trace,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Formats each step of the trace on its own numbered line.
fn fmt_trace(trace: &Trace) -> String {
    let options = Spacing::Always.inside(FormatOptions::default());
    if trace.is_empty() {
        return format!("= {}", format_expression(trace.result(), options));
    }

    trace.states()
        .enumerate()
        .map(|(i, state)| format!("{:>3}. {}", i + 1, format_expression(state, options)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reduces the given expression, returning the formatted steps.
fn reduce_fmt(input: &str, reducer: &Reducer) -> Result<String, ReduceError> {
    let trace = reducer.reduce(input)?;
    Ok(fmt_trace(&trace))
}

/// Reduces a single line and prints the steps or the error.
fn read_eval(input: &str, reducer: &Reducer) {
    match reduce_fmt(input, reducer) {
        Ok(steps) => println!("{}", steps),
        Err(err) => err.report_to_stderr(),
    }
}

/// Reduces every non-empty line of the input.
fn execute(input: &str, reducer: &Reducer) {
    for line in input.lines().filter(|line| !line.trim().is_empty()) {
        read_eval(line, reducer);
    }
}

fn read_source(filename: Option<String>) -> io::Result<String> {
    let mut input = String::new();
    match filename {
        Some(filename) => BufReader::new(File::open(filename)?).read_to_string(&mut input)?,
        None => io::stdin().read_to_string(&mut input)?,
    };
    Ok(input)
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let reducer = Reducer::default();
    let mut args = std::env::args();
    args.next();

    let filename = args.next();
    if filename.is_some() || !io::stdin().is_terminal() {
        // run source file, or read source from stdin
        match read_source(filename) {
            Ok(input) => execute(&input, &reducer),
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(1);
            },
        }
    } else {
        // run the repl / interactive mode
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(1);
            },
        };

        fn process_line(rl: &mut DefaultEditor, reducer: &Reducer) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;

            read_eval(&input, reducer);
            Ok(())
        }

        loop {
            if let Err(err) = process_line(&mut rl, &reducer) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
    }
}
