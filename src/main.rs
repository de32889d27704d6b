use crossover::errors::CrossoverError;
use crossover::frontend::Lexer;
use crossover::interpreter::{FsResolver, Interpreter};

use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::{fs, io, process};

/// Runs crossover scripts, or an interactive prompt when no script is given.
#[derive(Parser, Debug)]
#[clap(version, about)]
struct Cli {
    /// Script to execute.
    script: Option<PathBuf>,

    /// Print the token stream instead of executing.
    #[clap(long)]
    tokens: bool,
}

fn main() {
    let cli = Cli::parse();

    match cli.script {
        Some(script) => run_file(&script, cli.tokens),
        None => run_prompt(cli.tokens),
    }
}

fn run_prompt(print_tokens: bool) {
    let mut interpreter = Interpreter::new(FsResolver::default());

    loop {
        let mut input = String::new();

        print!("> ");
        if io::stdout().flush().is_err() {
            return;
        }
        match io::stdin().read_line(&mut input) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }

        let result = if print_tokens {
            dump_tokens(&input)
        } else {
            interpreter.run(&input)
        };
        if let Err(e) = result {
            report_error(&e);
        }
    }
}

fn run_file(path: &Path, print_tokens: bool) {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Could not read {}: {}", path.display(), e);
            process::exit(66);
        }
    };

    let result = if print_tokens {
        dump_tokens(&contents)
    } else {
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Interpreter::new(FsResolver::new(base_dir)).run(&contents)
    };

    if let Err(e) = result {
        report_error(&e);
        process::exit(65);
    }
}

fn dump_tokens(source: &str) -> Result<(), CrossoverError> {
    for token in Lexer::new(source).iter() {
        println!("{}", token?);
    }
    Ok(())
}

fn report_error(error: &CrossoverError) {
    eprintln!("{}", error);
}
