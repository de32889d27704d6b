use super::binder::{bind_arguments, parse_parameters, split_arguments};
use super::environment::{Frame, ImportTable, Owner, Scope, Variable};
use super::evaluator::{evaluate_comparison, evaluate_value, Term};
use super::function::Function;
use super::import::ImportResolver;
use super::stream::TokenStream;
use super::value::Value;
use crate::errors::{ErrorKind, EvalResult, RuntimeResult, MAX_CALL_DEPTH};
use crate::frontend::{Lexer, SpannedToken, Token};

use std::io::{self, Write};
use std::rc::Rc;

/// Walks token streams directly. Top-level declarations of the main script
/// live in `globals` and persist across `run` calls.
pub struct Interpreter<R: ImportResolver, W: Write> {
    resolver: R,
    output: W,
    globals: Scope,
    imports: ImportTable,
    call_depth: usize,
}

impl<R: ImportResolver> Interpreter<R, io::Stdout> {
    pub fn new(resolver: R) -> Self {
        Interpreter::new_with_output(resolver, io::stdout())
    }
}

impl<R: ImportResolver, W: Write> Interpreter<R, W> {
    pub fn new_with_output(resolver: R, output: W) -> Self {
        Interpreter {
            resolver,
            output,
            globals: Scope::new(),
            imports: ImportTable::new(),
            call_depth: 0,
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Lexes and executes a whole program.
    pub fn run(&mut self, source: &str) -> RuntimeResult<()> {
        let tokens = Lexer::new(source).tokenize()?;

        #[cfg(feature = "print-tokens")]
        for token in tokens.iter() {
            eprintln!("{}", token);
        }

        self.run_tokens(&tokens)
    }

    pub fn run_tokens(&mut self, tokens: &[SpannedToken]) -> RuntimeResult<()> {
        let mut frame = Frame::script();
        self.execute(tokens, &mut frame)
    }

    fn execute(&mut self, tokens: &[SpannedToken], frame: &mut Frame) -> RuntimeResult<()> {
        let mut stream = TokenStream::new(tokens);
        while let Some(spanned) = stream.next() {
            self.execute_statement(spanned, &mut stream, frame)?;
        }
        Ok(())
    }

    fn execute_statement(
        &mut self,
        spanned: &SpannedToken,
        stream: &mut TokenStream,
        frame: &mut Frame,
    ) -> RuntimeResult<()> {
        #[cfg(feature = "trace-execution")]
        eprintln!(
            "[trace] line {} depth {} {}",
            spanned.line,
            frame.depth(),
            spanned.token
        );

        let line = spanned.line;
        match &spanned.token {
            Token::Comment(_) | Token::Semicolon => Ok(()),
            Token::Exclusive => {
                if stream.take_if(&Token::Var) {
                    self.declare_variable(stream, frame, true, line)
                } else if stream.take_if(&Token::Function) {
                    self.declare_function(stream, frame, true, line)
                } else {
                    Err(ErrorKind::ExclusiveWithoutDeclaration.at(line))
                }
            }
            Token::Var => self.declare_variable(stream, frame, false, line),
            Token::Function => self.declare_function(stream, frame, false, line),
            Token::If => self.execute_if(stream, frame, line),
            Token::Print => self.execute_print(stream, frame, line),
            Token::Use => self.execute_use(stream, frame, line),
            Token::As => Err(match nesting_violation("as", frame) {
                Some(kind) => kind,
                None => ErrorKind::AsWithoutUse,
            }
            .at(line)),
            Token::External => self.execute_external(stream, frame, line),
            Token::Identifier(name) => self.execute_identifier(name, stream, frame, line),
            Token::Equals => Err(ErrorKind::AssignToNonVariable.at(line)),
            Token::LeftBrace => Err(ErrorKind::UnexpectedBlock.at(line)),
            Token::RightBrace => Err(ErrorKind::UnmatchedBrace.at(line)),
            Token::For => Err(ErrorKind::ReservedKeyword("for").at(line)),
            Token::Return => Err(ErrorKind::ReservedKeyword("return").at(line)),
            Token::LeftBracket => Err(ErrorKind::ReservedKeyword("[").at(line)),
            Token::RightBracket => Err(ErrorKind::ReservedKeyword("]").at(line)),
            token if token.is_literal() && stream.peek() == Some(&Token::Equals) => {
                Err(ErrorKind::AssignToNonVariable.at(line))
            }
            token => Err(ErrorKind::UnexpectedToken(token.to_string()).at(line)),
        }
    }

    fn declare_variable(
        &mut self,
        stream: &mut TokenStream,
        frame: &mut Frame,
        exclusive: bool,
        line: usize,
    ) -> RuntimeResult<()> {
        let name = match stream.next().map(|t| &t.token) {
            Some(Token::Identifier(name)) => name,
            _ => return Err(ErrorKind::MissingVariableName.at(line)),
        };

        let variable = Variable::new(name, frame.depth(), exclusive);
        self.declaration_scope(frame).declare_variable(variable);

        if stream.take_if(&Token::Equals) {
            self.execute_assignment(name, stream, frame, line)
        } else {
            stream.expect_semicolon()
        }
    }

    fn declare_function(
        &mut self,
        stream: &mut TokenStream,
        frame: &mut Frame,
        exclusive: bool,
        line: usize,
    ) -> RuntimeResult<()> {
        let name = match stream.next().map(|t| &t.token) {
            Some(Token::Identifier(name)) => name,
            _ => return Err(ErrorKind::MissingFunctionName.at(line)),
        };

        if stream.peek() != Some(&Token::LeftParen) {
            return Err(ErrorKind::MissingParameterList(name.clone()).at(line));
        }
        let params = parse_parameters(name, stream.take_parenthesized()?)
            .map_err(|kind| kind.at(line))?;

        if stream.peek() != Some(&Token::LeftBrace) {
            return Err(ErrorKind::MissingFunctionBody(name.clone()).at(line));
        }
        let body = stream.take_block()?;

        let function = Function::new(name, params, body, exclusive);
        self.declaration_scope(frame).declare_function(function);
        Ok(())
    }

    fn execute_if(
        &mut self,
        stream: &mut TokenStream,
        frame: &mut Frame,
        line: usize,
    ) -> RuntimeResult<()> {
        let condition = stream.take_until_block()?;
        let body = stream.take_block()?;

        if frame.declarations_only {
            return Ok(());
        }

        let terms = self
            .collect_terms(condition, frame)
            .map_err(|kind| kind.at(line))?;
        if !evaluate_comparison(&terms).map_err(|kind| kind.at(line))? {
            return Ok(());
        }

        frame.push_scope();
        let result = self.execute(body, frame);
        frame.pop_scope();
        result
    }

    fn execute_print(
        &mut self,
        stream: &mut TokenStream,
        frame: &mut Frame,
        line: usize,
    ) -> RuntimeResult<()> {
        let expression = stream.take_statement()?;
        if frame.declarations_only {
            return Ok(());
        }

        let value = self
            .evaluate_expression(expression, frame)
            .map_err(|kind| kind.at(line))?;

        writeln!(self.output, "{}", value)
            .map_err(|e| ErrorKind::Output(e.to_string()).at(line))
    }

    fn execute_use(
        &mut self,
        stream: &mut TokenStream,
        frame: &mut Frame,
        line: usize,
    ) -> RuntimeResult<()> {
        if let Some(kind) = nesting_violation("use", frame) {
            return Err(kind.at(line));
        }

        let path = match stream.next().map(|t| &t.token) {
            Some(Token::String(path)) => path,
            _ => return Err(ErrorKind::UseWithoutPath.at(line)),
        };

        let alias = if stream.take_if(&Token::As) {
            match stream.next().map(|t| &t.token) {
                Some(Token::Identifier(alias)) => Some(alias),
                _ => return Err(ErrorKind::AliasWithoutName.at(line)),
            }
        } else {
            None
        };
        stream.expect_semicolon()?;

        self.import(path, line)?;
        if let Some(alias) = alias {
            self.imports.rename(path, alias);
        }
        Ok(())
    }

    /// Runs the declarations-only pass over an imported script.
    fn import(&mut self, path: &str, line: usize) -> RuntimeResult<()> {
        let source = self
            .resolver
            .resolve(path)
            .map_err(|_| ErrorKind::UnresolvedImport(path.to_owned()).at(line))?;
        let tokens = Lexer::new(&source).tokenize()?;

        let index = self.imports.add(path);
        let mut frame = Frame::import(index);
        self.execute(&tokens, &mut frame)
    }

    fn execute_external(
        &mut self,
        stream: &mut TokenStream,
        frame: &mut Frame,
        line: usize,
    ) -> RuntimeResult<()> {
        let (index, member) = self
            .resolve_external(stream, frame)
            .map_err(|kind| kind.at(line))?;

        if stream.peek() == Some(&Token::Equals) {
            return Err(ErrorKind::AssignToExternal(member.to_owned()).at(line));
        }

        let script = self.imports.script(index);
        if let Some(function) = script.globals.function(member) {
            if function.exclusive {
                return Err(ErrorKind::ExclusiveAccess {
                    script: script.tag.clone(),
                    member: member.to_owned(),
                }
                .at(line));
            }
            let function = Rc::clone(function);
            return self.call_function(function, Owner::Import(index), stream, frame, line);
        }

        self.external_value(index, member)
            .map_err(|kind| kind.at(line))?;
        stream.expect_semicolon()
    }

    /// Assignment, call or bare reference.
    fn execute_identifier(
        &mut self,
        name: &str,
        stream: &mut TokenStream,
        frame: &mut Frame,
        line: usize,
    ) -> RuntimeResult<()> {
        if stream.take_if(&Token::Equals) {
            return self.execute_assignment(name, stream, frame, line);
        }

        if frame.declarations_only {
            return stream.skip_statement();
        }

        if frame.params.contains_key(name) {
            return finish_reference(name, stream, line);
        }

        if let Some(function) = self.lookup_function(frame, name) {
            let function = Rc::clone(function);
            let owner = frame.owner;
            return self.call_function(function, owner, stream, frame, line);
        }

        if self.lookup_variable(frame, name).is_some() {
            return finish_reference(name, stream, line);
        }

        Err(ErrorKind::UndefinedIdentifier(name.to_owned()).at(line))
    }

    /// Everything after the `=` up to the `;` is the right-hand side.
    fn execute_assignment(
        &mut self,
        name: &str,
        stream: &mut TokenStream,
        frame: &mut Frame,
        line: usize,
    ) -> RuntimeResult<()> {
        let rhs = stream.take_statement()?;
        if rhs.is_empty() {
            return Err(ErrorKind::MissingValue.at(line));
        }

        let value = self
            .evaluate_expression(rhs, frame)
            .map_err(|kind| kind.at(line))?;
        self.assign(frame, name, value)
            .map_err(|kind| kind.at(line))
    }

    fn call_function(
        &mut self,
        function: Rc<Function>,
        owner: Owner,
        stream: &mut TokenStream,
        caller: &mut Frame,
        line: usize,
    ) -> RuntimeResult<()> {
        let arg_tokens: &[SpannedToken] = if stream.peek() == Some(&Token::LeftParen) {
            stream.take_parenthesized()?
        } else {
            &[]
        };
        stream.expect_semicolon()?;

        let args = split_arguments(&function.name, arg_tokens).map_err(|kind| kind.at(line))?;
        let params = bind_arguments(&function, &args, line, |arg| {
            self.evaluate_expression(arg, caller)
                .map_err(|kind| kind.at(line))
        })?;

        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(ErrorKind::CallDepthExceeded.at(line));
        }

        let mut frame = Frame::call(owner, Rc::clone(&function), params);
        self.call_depth += 1;
        let result = self.execute(&function.body, &mut frame);
        self.call_depth -= 1;
        result
    }

    fn evaluate_expression(&self, tokens: &[SpannedToken], frame: &Frame) -> EvalResult<Value> {
        let terms = self.collect_terms(tokens, frame)?;
        evaluate_value(&terms)
    }

    /// Replaces identifiers, external members and parenthesized groups with
    /// their values, leaving a flat operand/operator sequence.
    fn collect_terms(&self, tokens: &[SpannedToken], frame: &Frame) -> EvalResult<Vec<Term>> {
        let mut stream = TokenStream::new(tokens);
        let mut terms = vec![];

        while let Some(token) = stream.peek() {
            if *token == Token::LeftParen {
                let group = stream.take_parenthesized().map_err(|e| e.kind)?;
                terms.push(Term::Value(self.evaluate_expression(group, frame)?));
                continue;
            }
            stream.next();

            let term = match token {
                Token::Comment(_) => continue,
                Token::MathOp(op) => Term::Math(*op),
                Token::CompareOp(op) => Term::Compare(*op),
                Token::Identifier(name) => Term::Value(self.resolve_value(frame, name)?),
                Token::External => {
                    let (index, member) = self.resolve_external(&mut stream, frame)?;
                    Term::Value(self.external_value(index, member)?)
                }
                _ => match Value::from_literal(token) {
                    Some(value) => Term::Value(value),
                    None => return Err(ErrorKind::UnexpectedToken(token.to_string())),
                },
            };
            terms.push(term);
        }

        Ok(terms)
    }

    fn resolve_value(&self, frame: &Frame, name: &str) -> EvalResult<Value> {
        if let Some(variable) = self.lookup_variable(frame, name) {
            return variable
                .value
                .clone()
                .ok_or_else(|| ErrorKind::UnassignedVariable(name.to_owned()));
        }

        if self.lookup_function(frame, name).is_some() {
            return Err(ErrorKind::FunctionAsValue(name.to_owned()));
        }

        Err(ErrorKind::UndefinedVariable(name.to_owned()))
    }

    /// Parses `.alias.member` after an `external` keyword.
    fn resolve_external<'a>(
        &self,
        stream: &mut TokenStream<'a>,
        frame: &Frame,
    ) -> EvalResult<(usize, &'a str)> {
        if let Owner::Import(_) = frame.owner {
            return Err(ErrorKind::IllegalNesting {
                keyword: "external",
                place: "an imported script",
            });
        }

        let mut next = || stream.next().map(|t| &t.token);
        let (alias, member) = match (next(), next(), next(), next()) {
            (
                Some(Token::Period),
                Some(Token::Identifier(alias)),
                Some(Token::Period),
                Some(Token::Identifier(member)),
            ) => (alias, member),
            _ => return Err(ErrorKind::MalformedExternal),
        };

        let index = self
            .imports
            .find(alias)
            .ok_or_else(|| ErrorKind::ScriptNotFound(alias.clone()))?;
        Ok((index, member.as_str()))
    }

    fn external_value(&self, index: usize, member: &str) -> EvalResult<Value> {
        let script = self.imports.script(index);

        if let Some(variable) = script.globals.variable(member) {
            if variable.exclusive {
                return Err(ErrorKind::ExclusiveAccess {
                    script: script.tag.clone(),
                    member: member.to_owned(),
                });
            }
            return variable
                .value
                .clone()
                .ok_or_else(|| ErrorKind::UnassignedVariable(member.to_owned()));
        }

        if script.globals.function(member).is_some() {
            return Err(ErrorKind::FunctionAsValue(member.to_owned()));
        }

        Err(ErrorKind::MemberNotFound {
            script: script.tag.clone(),
            member: member.to_owned(),
        })
    }

    /// Parameters, then block scopes innermost first, then the owning script.
    fn lookup_variable<'a>(&'a self, frame: &'a Frame, name: &str) -> Option<&'a Variable> {
        frame
            .params
            .get(name)
            .or_else(|| frame.scopes.iter().rev().find_map(|s| s.variable(name)))
            .or_else(|| self.globals(frame.owner).variable(name))
    }

    fn lookup_function<'a>(&'a self, frame: &'a Frame, name: &str) -> Option<&'a Rc<Function>> {
        frame
            .scopes
            .iter()
            .rev()
            .find_map(|s| s.function(name))
            .or_else(|| self.globals(frame.owner).function(name))
    }

    fn assign(&mut self, frame: &mut Frame, name: &str, value: Value) -> EvalResult<()> {
        if let Some(param) = frame.params.get_mut(name) {
            param.value = Some(value);
            return Ok(());
        }

        if let Some(variable) = frame
            .scopes
            .iter_mut()
            .rev()
            .find_map(|s| s.variable_mut(name))
        {
            variable.value = Some(value);
            return Ok(());
        }

        if let Some(variable) = self.globals_mut(frame.owner).variable_mut(name) {
            variable.value = Some(value);
            return Ok(());
        }

        if self.lookup_function(frame, name).is_some() {
            return Err(ErrorKind::AssignToFunction(name.to_owned()));
        }

        Err(ErrorKind::UndefinedVariable(name.to_owned()))
    }

    /// Innermost open scope, or the script globals at top level.
    fn declaration_scope<'a>(&'a mut self, frame: &'a mut Frame) -> &'a mut Scope {
        match frame.scopes.last_mut() {
            Some(scope) => scope,
            None => self.globals_mut(frame.owner),
        }
    }

    fn globals(&self, owner: Owner) -> &Scope {
        match owner {
            Owner::Main => &self.globals,
            Owner::Import(index) => &self.imports.script(index).globals,
        }
    }

    fn globals_mut(&mut self, owner: Owner) -> &mut Scope {
        match owner {
            Owner::Main => &mut self.globals,
            Owner::Import(index) => &mut self.imports.script_mut(index).globals,
        }
    }
}

/// `use` and `as` are only legal at the top level of a script that is run
/// directly.
fn nesting_violation(keyword: &'static str, frame: &Frame) -> Option<ErrorKind> {
    let place = if frame.in_function() {
        "a function"
    } else if let Owner::Import(_) = frame.owner {
        "an imported script"
    } else {
        return None;
    };
    Some(ErrorKind::IllegalNesting { keyword, place })
}

fn finish_reference(name: &str, stream: &mut TokenStream, line: usize) -> RuntimeResult<()> {
    if stream.peek() == Some(&Token::LeftParen) {
        return Err(ErrorKind::NotAFunction(name.to_owned()).at(line));
    }
    stream.expect_semicolon()
}
