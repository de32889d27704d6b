use crate::errors::{ErrorKind, RuntimeResult};
use crate::frontend::{SpannedToken, Token};

/// Forward-only cursor over a token slice. Statement handlers consume as many
/// tokens as their construct needs, so the engine's step size varies.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    tokens: &'a [SpannedToken],
    position: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new(tokens: &'a [SpannedToken]) -> Self {
        TokenStream {
            tokens,
            position: 0,
        }
    }

    /// Peeks the next token without consuming it.
    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position).map(|t| &t.token)
    }

    /// Consumes the next token if it equals `expected`.
    pub fn take_if(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Line of the next token, falling back to the last one at the end.
    pub fn line(&self) -> usize {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    pub fn expect_semicolon(&mut self) -> RuntimeResult<()> {
        if self.take_if(&Token::Semicolon) {
            Ok(())
        } else {
            Err(ErrorKind::MissingSemicolon.at(self.line()))
        }
    }

    /// Tokens up to the next `;`, which is consumed but not returned.
    pub fn take_statement(&mut self) -> RuntimeResult<&'a [SpannedToken]> {
        let start = self.position;
        while let Some(token) = self.peek() {
            match token {
                Token::Semicolon => {
                    let statement = &self.tokens[start..self.position];
                    self.position += 1;
                    return Ok(statement);
                }
                Token::LeftBrace | Token::RightBrace => break,
                _ => self.position += 1,
            }
        }
        Err(ErrorKind::MissingSemicolon.at(self.line()))
    }

    /// Skips the rest of a statement, including its `;`.
    pub fn skip_statement(&mut self) -> RuntimeResult<()> {
        self.take_statement().map(|_| ())
    }

    /// Tokens up to the next `{`, which is left in place.
    pub fn take_until_block(&mut self) -> RuntimeResult<&'a [SpannedToken]> {
        let start = self.position;
        while let Some(token) = self.peek() {
            match token {
                Token::LeftBrace => return Ok(&self.tokens[start..self.position]),
                Token::Semicolon | Token::RightBrace => break,
                _ => self.position += 1,
            }
        }
        Err(ErrorKind::MissingBlock.at(self.line()))
    }

    /// Consumes a `{ ... }` block and returns the tokens between the braces.
    /// The caller has checked that the next token is `{`.
    pub fn take_block(&mut self) -> RuntimeResult<&'a [SpannedToken]> {
        self.take_delimited(
            &Token::LeftBrace,
            &Token::RightBrace,
            ErrorKind::UnterminatedBlock,
        )
    }

    /// Consumes a `( ... )` group and returns the tokens between the parens.
    /// Nested parens are kept as part of the group.
    pub fn take_parenthesized(&mut self) -> RuntimeResult<&'a [SpannedToken]> {
        self.take_delimited(
            &Token::LeftParen,
            &Token::RightParen,
            ErrorKind::UnterminatedParens,
        )
    }

    fn take_delimited(
        &mut self,
        open: &Token,
        close: &Token,
        unterminated: ErrorKind,
    ) -> RuntimeResult<&'a [SpannedToken]> {
        let line = self.line();
        if !self.take_if(open) {
            return Err(ErrorKind::UnexpectedToken(self.describe_next()).at(line));
        }

        let start = self.position;
        let mut depth = 1;
        while let Some(token) = self.peek() {
            if token == open {
                depth += 1;
            } else if token == close {
                depth -= 1;
                if depth == 0 {
                    let inner = &self.tokens[start..self.position];
                    self.position += 1;
                    return Ok(inner);
                }
            }
            self.position += 1;
        }

        Err(unterminated.at(line))
    }

    fn describe_next(&self) -> String {
        self.peek()
            .map_or_else(|| "end of input".to_owned(), |t| t.to_string())
    }
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = &'a SpannedToken;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::Lexer;

    fn lex(source: &str) -> Vec<SpannedToken> {
        Lexer::new(source).tokenize().unwrap()
    }

    #[test]
    fn test_take_statement() {
        let tokens = lex("x = 1 + 2; print x;");
        let mut stream = TokenStream::new(&tokens);

        let statement = stream.take_statement().unwrap();
        assert_eq!(statement.len(), 5);
        assert_eq!(stream.peek(), Some(&Token::Print));
    }

    #[test]
    fn test_missing_semicolon() {
        let tokens = lex("print x }");
        let mut stream = TokenStream::new(&tokens);

        let err = stream.take_statement().unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingSemicolon);
    }

    #[test]
    fn test_nested_block() {
        let tokens = lex("if a { if b { x; } } print y;");
        let mut stream = TokenStream::new(&tokens);
        stream.next();

        let condition = stream.take_until_block().unwrap();
        assert_eq!(condition.len(), 1);

        let block = stream.take_block().unwrap();
        assert_eq!(block.len(), 6);
        assert_eq!(stream.peek(), Some(&Token::Print));
    }

    #[test]
    fn test_parenthesized_keeps_inner_groups() {
        let tokens = lex("(a, (b + c) * 2);");
        let mut stream = TokenStream::new(&tokens);

        let group = stream.take_parenthesized().unwrap();
        assert_eq!(group.len(), 9);
        assert!(stream.expect_semicolon().is_ok());
        assert_eq!(stream.next(), None);
    }

    #[test]
    fn test_unterminated_groups() {
        let tokens = lex("{ print x;");
        let err = TokenStream::new(&tokens).take_block().unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnterminatedBlock);

        let tokens = lex("(a, b");
        let err = TokenStream::new(&tokens).take_parenthesized().unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnterminatedParens);
    }
}
