use crate::frontend::Token;
use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl Value {
    /// Value of a literal token, or None for any other token.
    pub fn from_literal(token: &Token) -> Option<Value> {
        let value = match token {
            Token::String(s) => Value::String(s.clone()),
            Token::Bool(b) => Value::Bool(*b),
            Token::Int(n) => Value::Int(*n),
            Token::Float(n) => Value::Float(*n),
            _ => return None,
        };
        Some(value)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Float(4.0).to_string(), "4");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::from("text").to_string(), "text");
    }

    #[test]
    fn test_from_literal() {
        assert_eq!(Value::from_literal(&Token::Int(3)), Some(Value::Int(3)));
        assert_eq!(
            Value::from_literal(&Token::String("a".to_owned())),
            Some(Value::from("a"))
        );
        assert_eq!(Value::from_literal(&Token::Comma), None);
    }
}
