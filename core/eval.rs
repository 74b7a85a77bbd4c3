// Expression evaluator: operand stack + operator stack with grouping markers
//
// Accepts postfix (`3 4 +`) as well as the fully-parenthesized form the
// server emits (`( 3 + 4 )`). Grouping symbols never become operands.
use crate::error::EvalError;
use crate::types::{tokenize, Operator, Token};
use num_bigint::BigInt;

// Operator stack entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    // `(` together with the operand depth when it was opened
    Group { base: usize },
    Op(Operator),
}

/// Incremental evaluator; feed tokens with [`Evaluator::push`] then call
/// [`Evaluator::finish`].
///
/// An operator applies as soon as its group holds two operands. When it
/// arrives with fewer it waits for its right operand, which is how infix
/// input is handled. Operators are applied left to right, there is no
/// precedence.
#[derive(Debug, Default)]
pub struct Evaluator {
    operands: Vec<BigInt>,
    operators: Vec<Pending>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: &Token) -> Result<(), EvalError> {
        match token {
            Token::Open => {
                self.operators.push(Pending::Group {
                    base: self.operands.len(),
                });
            }
            Token::Op(op) => {
                if self.available() >= 2 {
                    self.apply(*op)?;
                } else {
                    self.operators.push(Pending::Op(*op));
                }
            }
            Token::Close => {
                while let Some(Pending::Op(op)) = self.operators.last().copied() {
                    self.operators.pop();
                    self.apply(op)?;
                }
                match self.operators.pop() {
                    Some(Pending::Group { .. }) => self.reduce()?,
                    _ => return Err(EvalError::UnbalancedGroup),
                }
            }
            Token::Int(value) => {
                self.operands.push(value.clone());
                self.reduce()?;
            }
        }
        Ok(())
    }

    /// Apply whatever is still pending and return the top operand.
    pub fn finish(mut self) -> Result<BigInt, EvalError> {
        while let Some(pending) = self.operators.pop() {
            match pending {
                Pending::Op(op) => self.apply(op)?,
                Pending::Group { .. } => return Err(EvalError::UnbalancedGroup),
            }
        }
        self.operands.pop().ok_or(EvalError::Empty)
    }

    // Operands pushed since the innermost open group
    fn available(&self) -> usize {
        let base = self
            .operators
            .iter()
            .rev()
            .find_map(|p| match p {
                Pending::Group { base } => Some(*base),
                Pending::Op(_) => None,
            })
            .unwrap_or(0);
        self.operands.len().saturating_sub(base)
    }

    // Apply waiting operators of the current group that now have both operands
    fn reduce(&mut self) -> Result<(), EvalError> {
        while let Some(Pending::Op(op)) = self.operators.last().copied() {
            if self.available() < 2 {
                break;
            }
            self.operators.pop();
            self.apply(op)?;
        }
        Ok(())
    }

    fn apply(&mut self, op: Operator) -> Result<(), EvalError> {
        if self.available() < 2 {
            return Err(EvalError::MissingOperand(op.symbol()));
        }
        // First popped is the right operand
        let (right, left) = match (self.operands.pop(), self.operands.pop()) {
            (Some(right), Some(left)) => (right, left),
            _ => return Err(EvalError::MissingOperand(op.symbol())),
        };
        let value = op.apply(&left, &right)?;
        self.operands.push(value);
        Ok(())
    }
}

/// Evaluate a token sequence.
pub fn evaluate(tokens: &[Token]) -> Result<BigInt, EvalError> {
    let mut evaluator = Evaluator::new();
    for token in tokens {
        evaluator.push(token)?;
    }
    evaluator.finish()
}

/// Tokenize and evaluate the fields of an EVAL payload.
pub fn evaluate_fields<'a, I>(fields: I) -> Result<BigInt, EvalError>
where
    I: IntoIterator<Item = &'a str>,
{
    let tokens = tokenize(fields)?;
    evaluate(&tokens)
}
