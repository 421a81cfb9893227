use crate::error::{Error, Result};

/// A trait that represents a binary operation on scalars.
/// It needs to implement the transformation of the values and
/// the partial derivative with respect to each operand.
pub trait BinaryFn: Sync {
    fn name(&self) -> &'static str;
    fn f(&self, lhs: f64, rhs: f64) -> Result<f64>;
    fn grad_lhs(&self, lhs: f64, rhs: f64) -> Result<f64>;
    fn grad_rhs(&self, lhs: f64, rhs: f64) -> Result<f64>;
    fn grad(&self, lhs: f64, rhs: f64) -> Result<(f64, f64)> {
        Ok((self.grad_lhs(lhs, rhs)?, self.grad_rhs(lhs, rhs)?))
    }
}

pub(crate) struct PtrBinaryFn {
    pub name: &'static str,
    pub f: fn(f64, f64) -> Result<f64>,
    pub grad_lhs: fn(f64, f64) -> Result<f64>,
    pub grad_rhs: fn(f64, f64) -> Result<f64>,
}

impl BinaryFn for PtrBinaryFn {
    fn name(&self) -> &'static str {
        self.name
    }
    fn f(&self, lhs: f64, rhs: f64) -> Result<f64> {
        (self.f)(lhs, rhs)
    }
    fn grad_lhs(&self, lhs: f64, rhs: f64) -> Result<f64> {
        (self.grad_lhs)(lhs, rhs)
    }
    fn grad_rhs(&self, lhs: f64, rhs: f64) -> Result<f64> {
        (self.grad_rhs)(lhs, rhs)
    }
}

fn one(_: f64, _: f64) -> Result<f64> {
    Ok(1.)
}

fn minus_one(_: f64, _: f64) -> Result<f64> {
    Ok(-1.)
}

fn add(lhs: f64, rhs: f64) -> Result<f64> {
    Ok(lhs + rhs)
}

fn sub(lhs: f64, rhs: f64) -> Result<f64> {
    Ok(lhs - rhs)
}

fn mul(lhs: f64, rhs: f64) -> Result<f64> {
    Ok(lhs * rhs)
}

fn mul_lhs(_: f64, rhs: f64) -> Result<f64> {
    Ok(rhs)
}

fn mul_rhs(lhs: f64, _: f64) -> Result<f64> {
    Ok(lhs)
}

fn nonzero_denom(rhs: f64) -> Result<f64> {
    if rhs == 0. {
        Err(Error::DivisionByZero("/"))
    } else {
        Ok(rhs)
    }
}

fn div(lhs: f64, rhs: f64) -> Result<f64> {
    Ok(lhs / nonzero_denom(rhs)?)
}

fn div_lhs(_: f64, rhs: f64) -> Result<f64> {
    Ok(1. / nonzero_denom(rhs)?)
}

fn div_rhs(lhs: f64, rhs: f64) -> Result<f64> {
    let rhs = nonzero_denom(rhs)?;
    Ok(-lhs / (rhs * rhs))
}

/// Real-valued power. Negative bases only accept integral exponents.
fn pow(lhs: f64, rhs: f64) -> Result<f64> {
    if lhs == 0. && rhs < 0. {
        Err(Error::DivisionByZero("^"))
    } else if lhs < 0. && rhs.fract() != 0. {
        Err(Error::Domain {
            op: "^",
            value: lhs,
        })
    } else {
        Ok(lhs.powf(rhs))
    }
}

fn pow_lhs(lhs: f64, rhs: f64) -> Result<f64> {
    if rhs == 0. {
        return Ok(0.);
    }
    Ok(rhs * pow(lhs, rhs - 1.)?)
}

fn pow_rhs(lhs: f64, rhs: f64) -> Result<f64> {
    if lhs <= 0. {
        return Err(Error::UnsupportedDerivative { base: lhs });
    }
    Ok(lhs.powf(rhs) * lhs.ln())
}

pub(crate) const ADD: PtrBinaryFn = PtrBinaryFn {
    name: "+",
    f: add,
    grad_lhs: one,
    grad_rhs: one,
};

pub(crate) const SUB: PtrBinaryFn = PtrBinaryFn {
    name: "-",
    f: sub,
    grad_lhs: one,
    grad_rhs: minus_one,
};

pub(crate) const MUL: PtrBinaryFn = PtrBinaryFn {
    name: "*",
    f: mul,
    grad_lhs: mul_lhs,
    grad_rhs: mul_rhs,
};

pub(crate) const DIV: PtrBinaryFn = PtrBinaryFn {
    name: "/",
    f: div,
    grad_lhs: div_lhs,
    grad_rhs: div_rhs,
};

pub(crate) const POW: PtrBinaryFn = PtrBinaryFn {
    name: "^",
    f: pow,
    grad_lhs: pow_lhs,
    grad_rhs: pow_rhs,
};
