//! Matches parenthesized token lists against function parameters, both where
//! a function is declared and where it is called.

use super::environment::Variable;
use super::function::Function;
use super::value::Value;
use crate::errors::{ErrorKind, EvalResult, RuntimeResult};
use crate::frontend::{SpannedToken, Token};

use std::collections::HashMap;

/// Definition mode: the list must repeat `var <name>` separated by commas.
pub fn parse_parameters(function: &str, tokens: &[SpannedToken]) -> EvalResult<Vec<String>> {
    let malformed = || ErrorKind::MalformedParameters(function.to_owned());

    let mut params: Vec<String> = vec![];
    let mut iter = tokens.iter().map(|t| &t.token);

    loop {
        match (iter.next(), iter.next()) {
            (None, _) if params.is_empty() => return Ok(params),
            (Some(Token::Var), Some(Token::Identifier(name))) => {
                if params.contains(name) {
                    return Err(ErrorKind::DuplicateParameter {
                        function: function.to_owned(),
                        parameter: name.clone(),
                    });
                }
                params.push(name.clone());
            }
            _ => return Err(malformed()),
        }

        match iter.next() {
            None => return Ok(params),
            Some(Token::Comma) => continue,
            Some(_) => return Err(malformed()),
        }
    }
}

/// Call mode: splits the argument list on top-level commas. Commas inside
/// nested parens belong to the enclosing argument.
pub fn split_arguments<'a>(
    function: &str,
    tokens: &'a [SpannedToken],
) -> EvalResult<Vec<&'a [SpannedToken]>> {
    if tokens.is_empty() {
        return Ok(vec![]);
    }

    let mut args = vec![];
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, spanned) in tokens.iter().enumerate() {
        match spanned.token {
            Token::LeftParen => depth += 1,
            Token::RightParen => depth = depth.saturating_sub(1),
            Token::Comma if depth == 0 => {
                args.push(&tokens[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    args.push(&tokens[start..]);

    if args.iter().any(|arg| arg.is_empty()) {
        return Err(ErrorKind::MalformedArguments(function.to_owned()));
    }

    Ok(args)
}

/// Evaluates every argument and binds it to a fresh parameter owned by this
/// call, so recursive calls never share bindings.
pub fn bind_arguments<F>(
    function: &Function,
    args: &[&[SpannedToken]],
    line: usize,
    mut evaluate: F,
) -> RuntimeResult<HashMap<String, Variable>>
where
    F: FnMut(&[SpannedToken]) -> RuntimeResult<Value>,
{
    if args.len() != function.arity() {
        return Err(ErrorKind::ArityMismatch {
            function: function.name.clone(),
            expected: function.arity(),
            got: args.len(),
        }
        .at(line));
    }

    let mut params = HashMap::with_capacity(args.len());
    for (name, arg) in function.params.iter().zip(args.iter()) {
        let value = evaluate(arg)?;
        params.insert(name.clone(), Variable::parameter(name, value));
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::Lexer;

    fn lex(source: &str) -> Vec<SpannedToken> {
        Lexer::new(source).tokenize().unwrap()
    }

    #[test]
    fn test_parse_parameters() {
        let tokens = lex("var a, var b, var c");
        assert_eq!(
            parse_parameters("f", &tokens),
            Ok(vec!["a".to_owned(), "b".to_owned(), "c".to_owned()])
        );
        assert_eq!(parse_parameters("f", &[]), Ok(vec![]));
    }

    #[test]
    fn test_malformed_parameters() {
        for source in ["a, b", "var a var b", "var a,", "var 1", "var a, b"] {
            let tokens = lex(source);
            assert_eq!(
                parse_parameters("f", &tokens),
                Err(ErrorKind::MalformedParameters("f".to_owned())),
                "{}",
                source
            );
        }

        let tokens = lex("var a, var a");
        assert_eq!(
            parse_parameters("f", &tokens),
            Err(ErrorKind::DuplicateParameter {
                function: "f".to_owned(),
                parameter: "a".to_owned()
            })
        );
    }

    #[test]
    fn test_split_arguments() {
        let tokens = lex("1, (2, 3) + x, 'a'");
        let args = split_arguments("f", &tokens).unwrap();

        let lengths: Vec<usize> = args.iter().map(|a| a.len()).collect();
        assert_eq!(lengths, vec![1, 7, 1]);
        assert!(split_arguments("f", &[]).unwrap().is_empty());

        let tokens = lex("1,,2");
        assert_eq!(
            split_arguments("f", &tokens),
            Err(ErrorKind::MalformedArguments("f".to_owned()))
        );
    }

    #[test]
    fn test_bind_arguments() {
        let function = Function::new("add", vec!["a".to_owned(), "b".to_owned()], &[], false);
        let tokens = lex("1, 2");
        let args = split_arguments("add", &tokens).unwrap();

        let params = bind_arguments(&function, &args, 3, |arg| match arg[0].token {
            Token::Int(n) => Ok(Value::Int(n * 10)),
            _ => unreachable!(),
        })
        .unwrap();

        assert_eq!(params["a"].value, Some(Value::Int(10)));
        assert_eq!(params["b"].value, Some(Value::Int(20)));
        assert_eq!(params["b"].depth, 1);
    }

    #[test]
    fn test_arity_mismatch() {
        let function = Function::new("one", vec!["a".to_owned()], &[], false);
        let tokens = lex("1, 2");
        let args = split_arguments("one", &tokens).unwrap();

        let mut evaluated = 0;
        let err = bind_arguments(&function, &args, 7, |_| {
            evaluated += 1;
            Ok(Value::Int(0))
        })
        .unwrap_err();

        assert_eq!(evaluated, 0);
        assert_eq!(err.line, 7);
        assert_eq!(
            err.kind.to_string(),
            "function one takes 1 parameters, got 2"
        );
    }
}
