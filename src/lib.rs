pub mod errors;
pub mod frontend;
pub mod interpreter;

pub use errors::{CrossoverError, ErrorKind};
pub use interpreter::Interpreter;
