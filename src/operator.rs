//! The fixed library of elementary operators.

use crate::{
    binary_fn::{self, BinaryFn},
    error::Result,
    unary_fn::{self, UnaryFn},
};

/// Handle to an elementary function, either unary or binary.
#[derive(Clone, Copy)]
pub enum Operator {
    Unary(&'static dyn UnaryFn),
    Binary(&'static dyn BinaryFn),
}

/// Local partial derivatives of an operator, one per operand.
/// `Unary` holds the partial with respect to the first operand only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Partials {
    Unary(f64),
    Binary(f64, f64),
}

impl Operator {
    pub const ADD: Operator = Operator::Binary(&binary_fn::ADD);
    pub const SUB: Operator = Operator::Binary(&binary_fn::SUB);
    pub const MUL: Operator = Operator::Binary(&binary_fn::MUL);
    pub const DIV: Operator = Operator::Binary(&binary_fn::DIV);
    pub const POW: Operator = Operator::Binary(&binary_fn::POW);
    pub const EXP: Operator = Operator::Unary(&unary_fn::EXP);
    pub const LOG: Operator = Operator::Unary(&unary_fn::LOG);
    pub const SIN: Operator = Operator::Unary(&unary_fn::SIN);
    pub const COS: Operator = Operator::Unary(&unary_fn::COS);

    /// Find the operator denoted by `symbol` in expressions.
    pub fn lookup(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => Self::ADD,
            "-" => Self::SUB,
            "*" => Self::MUL,
            "/" => Self::DIV,
            "^" => Self::POW,
            "exp" => Self::EXP,
            "log" => Self::LOG,
            "sin" => Self::SIN,
            "cos" => Self::COS,
            _ => return None,
        })
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Unary(op) => op.name(),
            Self::Binary(op) => op.name(),
        }
    }

    pub fn is_unary(&self) -> bool {
        matches!(self, Self::Unary(_))
    }

    pub fn arity(&self) -> usize {
        match self {
            Self::Unary(_) => 1,
            Self::Binary(_) => 2,
        }
    }

    /// Evaluate the operator. `b` is ignored by unary operators.
    pub fn f(&self, a: f64, b: Option<f64>) -> Result<f64> {
        match (self, b) {
            (Self::Unary(op), _) => op.f(a),
            (Self::Binary(op), Some(b)) => op.f(a, b),
            (Self::Binary(op), None) => Err(missing_rhs(op.name())),
        }
    }

    pub fn df(&self, a: f64, b: Option<f64>) -> Result<Partials> {
        match (self, b) {
            (Self::Unary(op), _) => Ok(Partials::Unary(op.grad(a)?)),
            (Self::Binary(op), Some(b)) => {
                let (da, db) = op.grad(a, b)?;
                Ok(Partials::Binary(da, db))
            }
            (Self::Binary(op), None) => Err(missing_rhs(op.name())),
        }
    }

    /// Partial derivative with respect to the first operand only.
    pub fn df_lhs(&self, a: f64, b: Option<f64>) -> Result<f64> {
        match (self, b) {
            (Self::Unary(op), _) => op.grad(a),
            (Self::Binary(op), Some(b)) => op.grad_lhs(a, b),
            (Self::Binary(op), None) => Err(missing_rhs(op.name())),
        }
    }
}

fn missing_rhs(name: &str) -> crate::Error {
    crate::Error::Construction(format!("binary operator `{name}` needs two operands"))
}

impl std::fmt::Debug for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Operator({})", self.symbol())
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl PartialEq for Operator {
    fn eq(&self, other: &Self) -> bool {
        self.arity() == other.arity() && self.symbol() == other.symbol()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn lookup_all_symbols() {
        for (symbol, arity) in [
            ("+", 2),
            ("-", 2),
            ("*", 2),
            ("/", 2),
            ("^", 2),
            ("exp", 1),
            ("log", 1),
            ("sin", 1),
            ("cos", 1),
        ] {
            let op = Operator::lookup(symbol).unwrap();
            assert_eq!(op.symbol(), symbol);
            assert_eq!(op.arity(), arity);
        }
        assert!(Operator::lookup("tan").is_none());
    }

    #[test]
    fn dispatch() {
        assert_eq!(Operator::MUL.f(2., Some(3.)).unwrap(), 6.);
        assert_eq!(
            Operator::MUL.df(2., Some(3.)).unwrap(),
            Partials::Binary(3., 2.)
        );
        assert_eq!(Operator::LOG.df(5., None).unwrap(), Partials::Unary(0.2));
        assert_eq!(Operator::POW.df_lhs(-3., Some(2.)).unwrap(), -6.);
        assert_eq!(
            Operator::POW.df(-3., Some(2.)),
            Err(Error::UnsupportedDerivative { base: -3. })
        );
        assert!(matches!(
            Operator::ADD.f(1., None),
            Err(Error::Construction(_))
        ));
    }
}
