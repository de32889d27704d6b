use crossover::interpreter::{FsResolver, Interpreter};

use regex::Regex;
use std::path::Path;
use test_generator::test_resources;

#[derive(Debug, PartialEq)]
struct Outcome {
    output: Vec<String>,
    error: Option<String>,
}

#[test_resources("tests/scripts/cases/**/*.cx")]
fn test_script(file: &str) {
    let source = std::fs::read_to_string(file).unwrap();

    let expected = get_expected_outcome(&source);
    let outcome = run_script(file, &source);

    assert_eq!(expected, outcome);
}

fn run_script(file: &str, source: &str) -> Outcome {
    let base_dir = Path::new(file).parent().unwrap();
    let mut interpreter = Interpreter::new_with_output(FsResolver::new(base_dir), vec![]);

    let result = interpreter.run(source);

    let output = String::from_utf8(interpreter.into_output())
        .unwrap()
        .lines()
        .map(|l| l.to_owned())
        .collect();

    Outcome {
        output,
        error: result.err().map(|e| e.kind.to_string()),
    }
}

fn get_expected_outcome(source: &str) -> Outcome {
    let output_regexer = Regex::new(r"// expect: ([^;]*);").unwrap();
    let error_regexer = Regex::new(r"// expect error: ([^;]*);").unwrap();

    let mut expected = Outcome {
        output: vec![],
        error: None,
    };

    for line in source.lines() {
        if let Some(r) = output_regexer.captures(line) {
            expected.output.push(r.get(1).unwrap().as_str().to_owned());
        }
        if let Some(r) = error_regexer.captures(line) {
            expected.error.replace(r.get(1).unwrap().as_str().to_owned());
        }
    }

    expected
}
