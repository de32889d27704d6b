use crate::frontend::SpannedToken;

use std::fmt;
use std::rc::Rc;

/// A declared function. The body is the token slice between its braces,
/// re-walked on every call and shared between calls.
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub body: Rc<[SpannedToken]>,
    pub exclusive: bool,
}

impl Function {
    pub fn new(name: &str, params: Vec<String>, body: &[SpannedToken], exclusive: bool) -> Self {
        Function {
            name: name.to_owned(),
            params,
            body: body.into(),
            exclusive,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<function {}({})>", self.name, self.params.join(", "))
    }
}
