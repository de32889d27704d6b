use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MathOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CompareOperator {
    EqualTo,
    NotEqualTo,
    GreaterThan,
    GreaterEq,
    LessThan,
    LessEq,
    And,
    Or,
}

impl MathOperator {
    pub fn from_char(ch: char) -> Option<MathOperator> {
        let op = match ch {
            '+' => MathOperator::Add,
            '-' => MathOperator::Subtract,
            '*' => MathOperator::Multiply,
            '/' => MathOperator::Divide,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            MathOperator::Add => "+",
            MathOperator::Subtract => "-",
            MathOperator::Multiply => "*",
            MathOperator::Divide => "/",
        }
    }
}

impl CompareOperator {
    /// `&` and `|` join two boolean clauses; everything else relates two values.
    pub fn is_logical(&self) -> bool {
        matches!(self, CompareOperator::And | CompareOperator::Or)
    }

    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            CompareOperator::GreaterThan
                | CompareOperator::GreaterEq
                | CompareOperator::LessThan
                | CompareOperator::LessEq
        )
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOperator::EqualTo => "==",
            CompareOperator::NotEqualTo => "!=",
            CompareOperator::GreaterThan => ">",
            CompareOperator::GreaterEq => ">=",
            CompareOperator::LessThan => "<",
            CompareOperator::LessEq => "<=",
            CompareOperator::And => "&",
            CompareOperator::Or => "|",
        }
    }
}

impl fmt::Display for MathOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators() {
        assert_eq!(MathOperator::from_char('+'), Some(MathOperator::Add));
        assert_eq!(MathOperator::from_char('/'), Some(MathOperator::Divide));
        assert_eq!(MathOperator::from_char('='), None);

        assert!(CompareOperator::And.is_logical());
        assert!(!CompareOperator::EqualTo.is_logical());
        assert!(CompareOperator::LessEq.is_ordering());
        assert!(!CompareOperator::NotEqualTo.is_ordering());
        assert_eq!(CompareOperator::GreaterEq.to_string(), ">=");
    }
}
