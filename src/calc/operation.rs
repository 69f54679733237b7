//! Calculator operations and cache keys.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// == Calc Error ==
/// Failure of an arithmetic loader.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("Division by zero is not allowed")]
    DivisionByZero,
}

// == Operation ==
/// Arithmetic operation served by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
        Operation::Power,
    ];

    /// Name used in responses, e.g. `"addition"`.
    pub fn label(self) -> &'static str {
        match self {
            Operation::Add => "addition",
            Operation::Subtract => "subtraction",
            Operation::Multiply => "multiplication",
            Operation::Divide => "division",
            Operation::Power => "power",
        }
    }

    /// Evaluates the operation.
    pub fn apply(self, a: f64, b: f64) -> Result<f64, CalcError> {
        match self {
            Operation::Add => Ok(a + b),
            Operation::Subtract => Ok(a - b),
            Operation::Multiply => Ok(a * b),
            Operation::Divide if b == 0.0 => Err(CalcError::DivisionByZero),
            Operation::Divide => Ok(a / b),
            Operation::Power => Ok(a.powf(b)),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
            Operation::Power => "power",
        };
        f.write_str(name)
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown operation '{}'", s))
    }
}

// == Calc Key ==
/// Cache key for one calculation.
///
/// Operands are stored as bit patterns so the key is `Eq + Hash`. Negative
/// zero is folded into positive zero so `-0.0` and `0.0` share an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalcKey {
    op: Operation,
    a: u64,
    b: u64,
}

impl CalcKey {
    pub fn new(op: Operation, a: f64, b: f64) -> Self {
        Self {
            op,
            a: operand_bits(a),
            b: operand_bits(b),
        }
    }

    pub fn op(&self) -> Operation {
        self.op
    }

    pub fn operands(&self) -> (f64, f64) {
        (f64::from_bits(self.a), f64::from_bits(self.b))
    }
}

fn operand_bits(x: f64) -> u64 {
    if x == 0.0 {
        0.0_f64.to_bits()
    } else {
        x.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        assert_eq!(Operation::Add.apply(10.0, 20.0), Ok(30.0));
        assert_eq!(Operation::Subtract.apply(30.0, 10.0), Ok(20.0));
        assert_eq!(Operation::Multiply.apply(5.0, 6.0), Ok(30.0));
        assert_eq!(Operation::Divide.apply(100.0, 5.0), Ok(20.0));
        assert_eq!(Operation::Power.apply(2.0, 10.0), Ok(1024.0));
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(
            Operation::Divide.apply(1.0, 0.0),
            Err(CalcError::DivisionByZero)
        );
        assert_eq!(
            Operation::Divide.apply(1.0, -0.0),
            Err(CalcError::DivisionByZero)
        );
    }

    #[test]
    fn test_parse_operation() {
        assert_eq!("add".parse::<Operation>(), Ok(Operation::Add));
        assert_eq!("DIVIDE".parse::<Operation>(), Ok(Operation::Divide));
        assert!("modulo".parse::<Operation>().is_err());
    }

    #[test]
    fn test_key_equality() {
        assert_eq!(
            CalcKey::new(Operation::Add, 10.0, 20.0),
            CalcKey::new(Operation::Add, 10.0, 20.0)
        );
        assert_ne!(
            CalcKey::new(Operation::Add, 10.0, 20.0),
            CalcKey::new(Operation::Add, 20.0, 10.0)
        );
        assert_ne!(
            CalcKey::new(Operation::Add, 10.0, 20.0),
            CalcKey::new(Operation::Subtract, 10.0, 20.0)
        );
    }

    #[test]
    fn test_key_folds_negative_zero() {
        assert_eq!(
            CalcKey::new(Operation::Multiply, -0.0, 3.0),
            CalcKey::new(Operation::Multiply, 0.0, 3.0)
        );
    }

    #[test]
    fn test_key_operands() {
        let key = CalcKey::new(Operation::Power, 2.0, 0.5);
        assert_eq!(key.op(), Operation::Power);
        assert_eq!(key.operands(), (2.0, 0.5));
    }
}
