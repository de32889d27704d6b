use super::cursor::Cursor;
use super::operator::{CompareOperator, MathOperator};
use super::token::{SpannedToken, Token};
use crate::errors::{ErrorKind, EvalResult, LexerResult};

const KEYWORDS: [(&str, Token); 10] = [
    ("var", Token::Var),
    ("function", Token::Function),
    ("use", Token::Use),
    ("external", Token::External),
    ("as", Token::As),
    ("exclusive", Token::Exclusive),
    ("if", Token::If),
    ("for", Token::For),
    ("return", Token::Return),
    ("print", Token::Print),
];

fn is_digit_char(ch: char) -> bool {
    ch.is_ascii_digit()
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn is_opening_quote(ch: char) -> bool {
    matches!(ch, '\'' | '\u{2018}' | '\u{2019}')
}

fn is_closing_quote(ch: char) -> bool {
    matches!(ch, '\'' | '\u{2019}')
}

/// Keywords only count when a delimiter follows, so `variance` stays an identifier.
fn keyword_delimited(token: &Token, next: Option<char>) -> bool {
    match (token, next) {
        (Token::External, next) => next == Some('.'),
        (_, Some(ch)) => ch.is_whitespace() || ch == '.' || ch == '(',
        (_, None) => false,
    }
}

pub struct Lexer<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
    line: usize,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer from source code.
    pub fn new(source: &'src str) -> Self {
        Lexer {
            source,
            cursor: Cursor::new(source),
            line: 1,
        }
    }

    /// Lexes the whole source, stopping at the first error.
    pub fn tokenize(self) -> LexerResult<Vec<SpannedToken>> {
        self.iter().collect()
    }

    /// Returns the next token or None when the source is finished.
    fn scan_token(&mut self) -> Option<LexerResult<SpannedToken>> {
        loop {
            let (start_idx, ch) = self.cursor.peek()?;
            let line = self.line;

            match self.lex_token(start_idx, ch) {
                Ok(Some(token)) => return Some(Ok(SpannedToken::new(token, line))),
                Ok(None) => continue,
                Err(kind) => return Some(Err(kind.at(line))),
            }
        }
    }

    /// Tries each token class in priority order. Unrecognized characters are
    /// consumed and yield no token.
    fn lex_token(&mut self, start_idx: usize, ch: char) -> EvalResult<Option<Token>> {
        if self.cursor.rest().starts_with("//") {
            return Ok(Some(self.lex_comment(start_idx)));
        }

        if let Some(token) = self.lex_keyword() {
            return Ok(Some(token));
        }

        if is_opening_quote(ch) {
            return self.lex_string(start_idx, ch).map(Some);
        }

        if is_digit_char(ch) {
            return self.lex_number(start_idx).map(Some);
        }

        if is_identifier_start(ch) {
            return Ok(Some(self.lex_identifier(start_idx)));
        }

        self.cursor.take();

        if let Some(op) = MathOperator::from_char(ch) {
            return Ok(Some(Token::MathOp(op)));
        }

        let token = match ch {
            '>' => self.look_for_eq_sign(CompareOperator::GreaterThan, CompareOperator::GreaterEq),
            '<' => self.look_for_eq_sign(CompareOperator::LessThan, CompareOperator::LessEq),
            '!' => {
                if !self.cursor.take_if('=') {
                    return Err(ErrorKind::LoneExclamation);
                }
                Token::CompareOp(CompareOperator::NotEqualTo)
            }
            '=' => {
                if self.cursor.take_if('=') {
                    Token::CompareOp(CompareOperator::EqualTo)
                } else {
                    Token::Equals
                }
            }
            '&' => Token::CompareOp(CompareOperator::And),
            '|' => Token::CompareOp(CompareOperator::Or),
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '{' => Token::LeftBrace,
            '}' => Token::RightBrace,
            '[' => Token::LeftBracket,
            ']' => Token::RightBracket,
            '.' => Token::Period,
            ',' => Token::Comma,
            ';' => {
                self.line += 1;
                Token::Semicolon
            }
            _ => return Ok(None),
        };

        Ok(Some(token))
    }

    /// A comment runs up to the next statement terminator, which is left in place.
    fn lex_comment(&mut self, start_idx: usize) -> Token {
        self.cursor.take_until(|ch| ch == ';');
        let end_idx = self.cursor.offset();
        Token::Comment(self.source[start_idx + 2..end_idx].trim().to_owned())
    }

    fn lex_keyword(&mut self) -> Option<Token> {
        let rest = self.cursor.rest();

        let found = KEYWORDS.into_iter().find(|(word, token)| {
            rest.starts_with(word) && keyword_delimited(token, rest[word.len()..].chars().next())
        });
        if let Some((word, token)) = found {
            self.cursor.advance(word.len());
            return Some(token);
        }

        for (word, value) in [("true", true), ("false", false)] {
            if rest.starts_with(word)
                && !rest[word.len()..]
                    .chars()
                    .next()
                    .map_or(false, is_identifier_char)
            {
                self.cursor.advance(word.len());
                return Some(Token::Bool(value));
            }
        }

        None
    }

    /// Checks if next char is '='. If so, consume it and return the second operator.
    fn look_for_eq_sign(&mut self, op1: CompareOperator, op2: CompareOperator) -> Token {
        if self.cursor.take_if('=') {
            Token::CompareOp(op2)
        } else {
            Token::CompareOp(op1)
        }
    }

    /// Scans a string up to the closing quote. The quotes are not part of the value.
    fn lex_string(&mut self, start_idx: usize, quote: char) -> EvalResult<Token> {
        self.cursor.take();
        let content_start = start_idx + quote.len_utf8();

        self.cursor.take_until(is_closing_quote);

        let end_idx = match self.cursor.peek() {
            None => return Err(ErrorKind::UnterminatedString),
            Some((i, _)) => i,
        };

        // Consume closing quote.
        self.cursor.take();

        Ok(Token::String(self.source[content_start..end_idx].to_owned()))
    }

    /// Scans an int, or a float when a period is followed by another digit.
    fn lex_number(&mut self, start_idx: usize) -> EvalResult<Token> {
        self.cursor.take_while(is_digit_char);

        let mut is_float = false;
        if let Some((_, '.')) = self.cursor.peek() {
            if self
                .cursor
                .peek_next()
                .map_or(false, |(_, ch)| is_digit_char(ch))
            {
                is_float = true;
                self.cursor.take();
                self.cursor.take_while(is_digit_char);
            }
        }

        let end_idx = self.cursor.offset();
        let scanned_number = &self.source[start_idx..end_idx];

        if is_float {
            scanned_number
                .parse()
                .map(Token::Float)
                .map_err(|_| ErrorKind::UnexpectedToken(scanned_number.to_owned()))
        } else {
            scanned_number
                .parse()
                .map(Token::Int)
                .map_err(|_| ErrorKind::IntegerTooLarge(scanned_number.to_owned()))
        }
    }

    fn lex_identifier(&mut self, start_idx: usize) -> Token {
        self.cursor.take_while(is_identifier_char);
        let end_idx = self.cursor.offset();
        Token::Identifier(self.source[start_idx..end_idx].to_owned())
    }

    /// Returns an iterator version of lexer.
    pub fn iter(self) -> LexerIterator<'src> {
        LexerIterator { lexer: self }
    }
}

pub struct LexerIterator<'src> {
    lexer: Lexer<'src>,
}

impl<'src> Iterator for LexerIterator<'src> {
    type Item = LexerResult<SpannedToken>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lexer.scan_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::more_asserts::*;

    fn lex(source: &str) -> Vec<Token> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    fn ident(name: &str) -> Token {
        Token::Identifier(name.to_owned())
    }

    #[test]
    fn test_statements() {
        let tokens = lex("exclusive var total; total = 1.5 * (count + 2);");

        assert_eq!(
            tokens,
            vec![
                Token::Exclusive,
                Token::Var,
                ident("total"),
                Token::Semicolon,
                ident("total"),
                Token::Equals,
                Token::Float(1.5),
                Token::MathOp(MathOperator::Multiply),
                Token::LeftParen,
                ident("count"),
                Token::MathOp(MathOperator::Add),
                Token::Int(2),
                Token::RightParen,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_keywords_need_delimiter() {
        assert_eq!(lex("variance"), vec![ident("variance")]);
        assert_eq!(lex("functional"), vec![ident("functional")]);
        assert_eq!(lex("iffy"), vec![ident("iffy")]);
        assert_eq!(lex("truest"), vec![ident("truest")]);
        assert_eq!(lex("false_"), vec![ident("false_")]);
        assert_eq!(lex("external"), vec![ident("external")]);
        assert_eq!(lex("as"), vec![ident("as")]);

        assert_eq!(
            lex("print(true)"),
            vec![
                Token::Print,
                Token::LeftParen,
                Token::Bool(true),
                Token::RightParen
            ]
        );
        assert_eq!(
            lex("external.lib.value"),
            vec![
                Token::External,
                Token::Period,
                ident("lib"),
                Token::Period,
                ident("value")
            ]
        );
        assert_eq!(
            lex("use 'lib.cx' as lib;"),
            vec![
                Token::Use,
                Token::String("lib.cx".to_owned()),
                Token::As,
                ident("lib"),
                Token::Semicolon
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            lex("a >= b <= c > d < e == f != g & h | i = j"),
            vec![
                ident("a"),
                Token::CompareOp(CompareOperator::GreaterEq),
                ident("b"),
                Token::CompareOp(CompareOperator::LessEq),
                ident("c"),
                Token::CompareOp(CompareOperator::GreaterThan),
                ident("d"),
                Token::CompareOp(CompareOperator::LessThan),
                ident("e"),
                Token::CompareOp(CompareOperator::EqualTo),
                ident("f"),
                Token::CompareOp(CompareOperator::NotEqualTo),
                ident("g"),
                Token::CompareOp(CompareOperator::And),
                ident("h"),
                Token::CompareOp(CompareOperator::Or),
                ident("i"),
                Token::Equals,
                ident("j"),
            ]
        );
        assert_eq!(
            lex("[,]"),
            vec![Token::LeftBracket, Token::Comma, Token::RightBracket]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(lex("42"), vec![Token::Int(42)]);
        assert_eq!(lex("3.25"), vec![Token::Float(3.25)]);
        assert_eq!(lex("7."), vec![Token::Int(7), Token::Period]);
        assert_eq!(
            lex("1.2.3"),
            vec![Token::Float(1.2), Token::Period, Token::Int(3)]
        );

        let err = Lexer::new("99999999999999999999").tokenize().unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::IntegerTooLarge("99999999999999999999".to_owned())
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            lex("'hello world'"),
            vec![Token::String("hello world".to_owned())]
        );
        assert_eq!(
            lex("\u{2019}smart\u{2019}"),
            vec![Token::String("smart".to_owned())]
        );
        assert_eq!(lex("'a // b'"), vec![Token::String("a // b".to_owned())]);

        let err = Lexer::new("var s;\ns = 'open").tokenize().unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnterminatedString);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_comments_run_to_semicolon() {
        assert_eq!(
            lex("// note\nspanning lines; print x;"),
            vec![
                Token::Comment("note\nspanning lines".to_owned()),
                Token::Semicolon,
                Token::Print,
                ident("x"),
                Token::Semicolon,
            ]
        );
        assert_eq!(lex("// trailing"), vec![Token::Comment("trailing".to_owned())]);
    }

    #[test]
    fn test_lone_exclamation() {
        let err = Lexer::new("var a;\nif a ! b {}").tokenize().unwrap_err();
        assert_eq!(err.kind, ErrorKind::LoneExclamation);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_lines_count_statements() {
        let tokens = Lexer::new("var a;\n\n\nvar b; a = 1;\nprint a")
            .tokenize()
            .unwrap();

        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 3, 4, 4]);

        let last_line = tokens.last().map(|t| t.line).unwrap();
        assert_gt!(last_line, tokens[0].line);
        assert_le!(last_line, 4);
    }

    #[test]
    fn test_unknown_characters_are_skipped() {
        assert_eq!(lex("  @ # \t 5 $"), vec![Token::Int(5)]);
    }
}
