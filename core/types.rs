// Core types shared by the message codec and the evaluator
use crate::error::EvalError;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::Zero;
use std::fmt;

// Fixed shift applied by the `<<^` combinator before the XOR
pub const SHIFT_BITS: usize = 13;

// Message kinds (second field of every line)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Hello,
    Eval,
    Status,
    Error,
    Bye,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Hello => "HELLO",
            MessageKind::Eval => "EVAL",
            MessageKind::Status => "STATUS",
            MessageKind::Error => "ERR",
            MessageKind::Bye => "BYE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "HELLO" => Some(MessageKind::Hello),
            "EVAL" => Some(MessageKind::Eval),
            "STATUS" => Some(MessageKind::Status),
            "ERR" => Some(MessageKind::Error),
            "BYE" => Some(MessageKind::Bye),
            _ => None,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Binary operators, applied as `left OP right`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    FloorDiv,
    ShiftXor,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::FloorDiv => "//",
            Operator::ShiftXor => "<<^",
        }
    }

    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Sub),
            "*" => Some(Operator::Mul),
            "//" => Some(Operator::FloorDiv),
            "<<^" => Some(Operator::ShiftXor),
            _ => None,
        }
    }

    /// Apply the operator. Floor division by zero is the only undefined case.
    pub fn apply(&self, left: &BigInt, right: &BigInt) -> Result<BigInt, EvalError> {
        match self {
            Operator::Add => Ok(left + right),
            Operator::Sub => Ok(left - right),
            Operator::Mul => Ok(left * right),
            Operator::FloorDiv => {
                if right.is_zero() {
                    Err(EvalError::ArithmeticUndefined)
                } else {
                    Ok(left.div_floor(right))
                }
            }
            Operator::ShiftXor => Ok((left << SHIFT_BITS) ^ right),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// One lexical unit of an expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Open,
    Close,
    Op(Operator),
    Int(BigInt),
}

impl Token {
    /// Classify a single whitespace-delimited field.
    ///
    /// Integer literals are ASCII digits with at most one leading `-`;
    /// anything else that is not a known symbol is rejected.
    pub fn parse(s: &str) -> Result<Self, EvalError> {
        match s {
            "(" => return Ok(Token::Open),
            ")" => return Ok(Token::Close),
            _ => {}
        }
        if let Some(op) = Operator::from_symbol(s) {
            return Ok(Token::Op(op));
        }

        let digits = s.strip_prefix('-').unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EvalError::MalformedToken(s.to_string()));
        }
        BigInt::parse_bytes(s.as_bytes(), 10)
            .map(Token::Int)
            .ok_or_else(|| EvalError::MalformedToken(s.to_string()))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Open => write!(f, "("),
            Token::Close => write!(f, ")"),
            Token::Op(op) => write!(f, "{}", op),
            Token::Int(value) => write!(f, "{}", value),
        }
    }
}

/// Tokenize the fields of an EVAL payload.
pub fn tokenize<'a, I>(fields: I) -> Result<Vec<Token>, EvalError>
where
    I: IntoIterator<Item = &'a str>,
{
    fields.into_iter().map(Token::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> BigInt {
        BigInt::from(v)
    }

    #[test]
    fn test_message_kind_round_trip() {
        for kind in [
            MessageKind::Hello,
            MessageKind::Eval,
            MessageKind::Status,
            MessageKind::Error,
            MessageKind::Bye,
        ] {
            assert_eq!(MessageKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(MessageKind::parse("eval"), None);
    }

    #[test]
    fn test_shift_xor() {
        let result = Operator::ShiftXor.apply(&int(5), &int(13)).unwrap();
        assert_eq!(result, int(40973));
    }

    #[test]
    fn test_shift_xor_negative_operands() {
        // (-5 << 13) ^ 3 in two's complement
        let result = Operator::ShiftXor.apply(&int(-5), &int(3)).unwrap();
        assert_eq!(result, int(-40957));
    }

    #[test]
    fn test_floor_division_rounds_down() {
        assert_eq!(Operator::FloorDiv.apply(&int(7), &int(2)).unwrap(), int(3));
        assert_eq!(Operator::FloorDiv.apply(&int(-7), &int(2)).unwrap(), int(-4));
        assert_eq!(Operator::FloorDiv.apply(&int(7), &int(-2)).unwrap(), int(-4));
    }

    #[test]
    fn test_floor_division_by_zero() {
        for left in [-3, 0, 10] {
            assert_eq!(
                Operator::FloorDiv.apply(&int(left), &int(0)),
                Err(EvalError::ArithmeticUndefined)
            );
        }
    }

    #[test]
    fn test_results_exceed_machine_words() {
        let big = int(i64::MAX);
        let result = Operator::Mul.apply(&big, &big).unwrap();
        assert_eq!(result.to_string(), "85070591730234615847396907784232501249");
    }

    #[test]
    fn test_token_parse() {
        assert_eq!(Token::parse("(").unwrap(), Token::Open);
        assert_eq!(Token::parse(")").unwrap(), Token::Close);
        assert_eq!(Token::parse("//").unwrap(), Token::Op(Operator::FloorDiv));
        assert_eq!(Token::parse("-").unwrap(), Token::Op(Operator::Sub));
        assert_eq!(Token::parse("-42").unwrap(), Token::Int(int(-42)));
        assert_eq!(Token::parse("007").unwrap(), Token::Int(int(7)));
    }

    #[test]
    fn test_token_parse_rejects_garbage() {
        for bad in ["x", "--5", "+5", "1.5", "/", "<<", ""] {
            assert_eq!(
                Token::parse(bad),
                Err(EvalError::MalformedToken(bad.to_string())),
                "{:?} should be rejected",
                bad
            );
        }
    }
}
