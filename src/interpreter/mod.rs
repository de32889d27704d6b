pub mod binder;
pub mod engine;
pub mod environment;
pub mod evaluator;
pub mod function;
pub mod import;
pub mod stream;
pub mod value;

pub use engine::Interpreter;
pub use import::{FsResolver, ImportResolver, MemoryResolver};
pub use value::Value;
