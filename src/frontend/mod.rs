pub mod cursor;
pub mod lexer;
pub mod operator;
pub mod token;

pub use lexer::Lexer;
pub use token::{SpannedToken, Token, TokenKind};
