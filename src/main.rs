use std::{
    env,
    fs::read_to_string,
    io::{self, BufRead, Write},
    process::ExitCode,
};

use pry::{
    errors::errors::{Error, ErrorImpl, ErrorTip},
    get_line_at_position, interpret_string, Function, Package, Scope, Value,
};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    // RUST_LOG=pry=debug shows every binding and call
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let scope = Scope::with_builtins();
    bind_host_packages(&scope);

    let args: Vec<String> = env::args().collect();

    if let Some(path) = args.get(1) {
        let contents = match read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                eprintln!("Failed to read {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        };

        info!(path = %path, "running script");
        // One fragment, so function literals may span lines
        if let Err(error) = evaluate_line(&scope, &contents) {
            display_error(&error, &contents);
            return ExitCode::FAILURE;
        }
    }

    repl(&scope)
}

fn repl(scope: &Scope) -> ExitCode {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("pry> ");
        if stdout.flush().is_err() {
            return ExitCode::FAILURE;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => return ExitCode::SUCCESS,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Failed to read input: {}", e);
                return ExitCode::FAILURE;
            }
        }

        let line = line.trim_end();
        if line == "exit" {
            return ExitCode::SUCCESS;
        }

        if let Err(error) = evaluate_line(scope, line) {
            display_error(&error, line);
        }
    }
}

fn evaluate_line(scope: &Scope, line: &str) -> Result<(), Error> {
    if line.trim().is_empty() {
        return Ok(());
    }

    let value = interpret_string(scope, line)?;
    debug!(value_type = %value.type_of(), "evaluated");
    println!("{}", value);
    Ok(())
}

/// A couple of host packages so the shell has something to call into.
fn bind_host_packages(scope: &Scope) {
    let strings = Package::new("strings")
        .with_function(
            "ToUpper",
            Function::native("ToUpper", |args| match args.as_slice() {
                [Value::String(s)] => Ok(vec![Value::from(s.to_uppercase())]),
                _ => Err(ErrorImpl::InvalidArgument {
                    message: String::from("ToUpper expects a single string"),
                }),
            }),
        )
        .with_function(
            "Contains",
            Function::native("Contains", |args| match args.as_slice() {
                [Value::String(s), Value::String(sub)] => Ok(vec![Value::Bool(s.contains(sub.as_str()))]),
                _ => Err(ErrorImpl::InvalidArgument {
                    message: String::from("Contains expects two strings"),
                }),
            }),
        );

    let strconv = Package::new("strconv").with_function(
        "Atoi",
        Function::native("Atoi", |args| match args.as_slice() {
            [Value::String(s)] => Ok(match s.parse::<i64>() {
                Ok(n) => vec![Value::Int(n), Value::Nil],
                Err(e) => vec![
                    Value::Int(0),
                    Value::Error(format!("strconv.Atoi: parsing {:?}: {}", s, e)),
                ],
            }),
            _ => Err(ErrorImpl::InvalidArgument {
                message: String::from("Atoi expects a single string"),
            }),
        }),
    );

    scope.declare("strings", Value::from(strings));
    scope.declare("strconv", Value::from(strconv));
}

fn display_error(error: &Error, source: &str) {
    /*
        Error: TypeMismatch (Expected type `int`, received `string`)
        -> shell
           |
         1 | x := 1 + "a"
           | -----^
    */

    if let ErrorTip::None = error.get_tip() {
        println!("Error: {} ({})", error.get_error_name(), error);
    } else {
        println!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }

    let position = error.get_position();
    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) else {
        return;
    };

    let line_str = line.to_string();
    let padding = line_str.len() + 2;

    println!("-> {}", position.1);
    println!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    println!("{} | {}", line_str, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    println!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.len() - string.trim_start_matches(' ').len();
    (String::from(&string[start..]), start)
}
