//! CLI wrapper for the attribute resolution engine.
//!
//! Usage:
//!   attr-resolve <file.attr>        # Run a declaration script
//!   attr-resolve -e "code"          # Evaluate inline code
//!   attr-resolve                    # Start REPL (interactive mode)

use attr_resolve::init_tracing;
use attr_resolve::runner::eval::Interpreter;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::process;

fn main() {
    init_tracing();
    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => {
            // No arguments: start REPL
            run_repl();
        }
        2 => {
            let arg = &args[1];
            if arg == "-h" || arg == "--help" {
                print_usage();
                process::exit(0);
            }
            run_file(arg);
        }
        3 if args[1] == "-e" || args[1] == "--eval" => {
            run_source(&args[2]);
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("attr-resolve - Attribute Resolution Engine");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  attr-resolve <file.attr>        Run a declaration script");
    eprintln!("  attr-resolve -e \"code\"          Evaluate inline code");
    eprintln!("  attr-resolve --eval \"code\"      Evaluate inline code");
    eprintln!("  attr-resolve                    Start REPL (interactive mode)");
}

fn run_file(filename: &str) {
    let source = match fs::read_to_string(filename) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", filename, e);
            process::exit(1);
        }
    };
    run_source(&source);
}

fn run_source(source: &str) {
    let mut interpreter = Interpreter::new();
    let result = interpreter.run_source(source);
    // Output printed before a failure is still shown.
    for line in interpreter.take_output() {
        println!("{}", line);
    }
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_repl() {
    println!("attr-resolve v{}", env!("CARGO_PKG_VERSION"));
    println!("Type declarations or statements and press Enter. Type .exit to quit.");
    println!();

    let mut interpreter = Interpreter::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        if let Err(e) = stdout.flush() {
            eprintln!("Error writing prompt: {}", e);
            break;
        }

        let mut input = String::new();
        match stdin.read_line(&mut input) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }

        let input = input.trim();
        if input == ".exit" || input == ".quit" {
            break;
        }
        if input.is_empty() {
            continue;
        }

        let result = interpreter.run_source(input);
        for line in interpreter.take_output() {
            println!("{}", line);
        }
        if let Err(e) = result {
            eprintln!("Error: {}", e);
        }
    }

    println!("Goodbye!");
}
