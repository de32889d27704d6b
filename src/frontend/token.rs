use super::operator::{CompareOperator, MathOperator};
use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Comment(String),

    // Keywords.
    Var,
    Function,
    Use,
    External,
    As,
    Exclusive,
    If,
    For,
    Return,
    Print,

    // Literals.
    Identifier(String),
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),

    // Operators.
    Equals,
    MathOp(MathOperator),
    CompareOp(CompareOperator),

    // Punctuation.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Period,
    Semicolon,
}

/// Coarse classification of a token, as printed by the `--tokens` front end.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    Comment,
    VariableDecl,
    FunctionDecl,
    UseKeyword,
    ExternalKeyword,
    AsKeyword,
    ExclusiveKeyword,
    IfKeyword,
    ForKeyword,
    ReturnKeyword,
    PrintKeyword,
    Identifier,
    StringLit,
    BoolLit,
    IntLit,
    FloatLit,
    Equals,
    MathOp,
    CompareOp,
    Paren,
    CurlyBrace,
    SquareBracket,
    Comma,
    Period,
    Semicolon,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Comment(_) => TokenKind::Comment,
            Token::Var => TokenKind::VariableDecl,
            Token::Function => TokenKind::FunctionDecl,
            Token::Use => TokenKind::UseKeyword,
            Token::External => TokenKind::ExternalKeyword,
            Token::As => TokenKind::AsKeyword,
            Token::Exclusive => TokenKind::ExclusiveKeyword,
            Token::If => TokenKind::IfKeyword,
            Token::For => TokenKind::ForKeyword,
            Token::Return => TokenKind::ReturnKeyword,
            Token::Print => TokenKind::PrintKeyword,
            Token::Identifier(_) => TokenKind::Identifier,
            Token::String(_) => TokenKind::StringLit,
            Token::Bool(_) => TokenKind::BoolLit,
            Token::Int(_) => TokenKind::IntLit,
            Token::Float(_) => TokenKind::FloatLit,
            Token::Equals => TokenKind::Equals,
            Token::MathOp(_) => TokenKind::MathOp,
            Token::CompareOp(_) => TokenKind::CompareOp,
            Token::LeftParen | Token::RightParen => TokenKind::Paren,
            Token::LeftBrace | Token::RightBrace => TokenKind::CurlyBrace,
            Token::LeftBracket | Token::RightBracket => TokenKind::SquareBracket,
            Token::Comma => TokenKind::Comma,
            Token::Period => TokenKind::Period,
            Token::Semicolon => TokenKind::Semicolon,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Token::String(_) | Token::Bool(_) | Token::Int(_) | Token::Float(_)
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Comment(text) => write!(f, "//{}", text),
            Token::Var => write!(f, "var"),
            Token::Function => write!(f, "function"),
            Token::Use => write!(f, "use"),
            Token::External => write!(f, "external"),
            Token::As => write!(f, "as"),
            Token::Exclusive => write!(f, "exclusive"),
            Token::If => write!(f, "if"),
            Token::For => write!(f, "for"),
            Token::Return => write!(f, "return"),
            Token::Print => write!(f, "print"),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::String(s) => write!(f, "{}", s),
            Token::Bool(b) => write!(f, "{}", b),
            Token::Int(n) => write!(f, "{}", n),
            Token::Float(n) => write!(f, "{}", n),
            Token::Equals => write!(f, "="),
            Token::MathOp(op) => write!(f, "{}", op),
            Token::CompareOp(op) => write!(f, "{}", op),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::Comma => write!(f, ","),
            Token::Period => write!(f, "."),
            Token::Semicolon => write!(f, ";"),
        }
    }
}

/// A token together with the statement line it was read on.
#[derive(Debug, PartialEq, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub line: usize,
}

impl SpannedToken {
    pub fn new(token: Token, line: usize) -> Self {
        SpannedToken { token, line }
    }
}

impl fmt::Display for SpannedToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}, {}", self.token.kind(), self.token)
    }
}
