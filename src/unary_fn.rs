use crate::error::{Error, Result};

/// A trait that represents an unary operation on a scalar.
/// It needs to implement the transformation of the value and its derivative.
pub trait UnaryFn: Sync {
    fn name(&self) -> &'static str;
    fn f(&self, data: f64) -> Result<f64>;
    fn grad(&self, data: f64) -> Result<f64>;
}

pub(crate) struct PtrUnaryFn {
    pub name: &'static str,
    pub f: fn(f64) -> Result<f64>,
    pub grad: fn(f64) -> Result<f64>,
}

impl UnaryFn for PtrUnaryFn {
    fn name(&self) -> &'static str {
        self.name
    }
    fn f(&self, data: f64) -> Result<f64> {
        (self.f)(data)
    }
    fn grad(&self, data: f64) -> Result<f64> {
        (self.grad)(data)
    }
}

fn exp(x: f64) -> Result<f64> {
    Ok(x.exp())
}

fn check_log(x: f64) -> Result<f64> {
    if x <= 0. {
        Err(Error::Domain {
            op: "log",
            value: x,
        })
    } else {
        Ok(x)
    }
}

fn log(x: f64) -> Result<f64> {
    Ok(check_log(x)?.ln())
}

fn log_derive(x: f64) -> Result<f64> {
    Ok(1. / check_log(x)?)
}

fn sin(x: f64) -> Result<f64> {
    Ok(x.sin())
}

fn cos(x: f64) -> Result<f64> {
    Ok(x.cos())
}

fn cos_derive(x: f64) -> Result<f64> {
    Ok(-x.sin())
}

pub(crate) const EXP: PtrUnaryFn = PtrUnaryFn {
    name: "exp",
    f: exp,
    grad: exp,
};

pub(crate) const LOG: PtrUnaryFn = PtrUnaryFn {
    name: "log",
    f: log,
    grad: log_derive,
};

pub(crate) const SIN: PtrUnaryFn = PtrUnaryFn {
    name: "sin",
    f: sin,
    grad: cos,
};

pub(crate) const COS: PtrUnaryFn = PtrUnaryFn {
    name: "cos",
    f: cos,
    grad: cos_derive,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exp_and_log() {
        assert_eq!(EXP.f(3.).unwrap(), 3f64.exp());
        assert_eq!(EXP.grad(3.).unwrap(), 3f64.exp());
        assert!((LOG.f(2f64.exp()).unwrap() - 2.).abs() < 1e-12);
        assert_eq!(LOG.grad(5.).unwrap(), 0.2);
    }

    #[test]
    fn log_rejects_non_positive() {
        assert_eq!(
            LOG.f(0.),
            Err(Error::Domain {
                op: "log",
                value: 0.
            })
        );
        assert!(matches!(LOG.grad(-1.), Err(Error::Domain { .. })));
    }

    #[test]
    fn trigonometry() {
        let x = 0.7;
        assert_eq!(SIN.f(x).unwrap(), x.sin());
        assert_eq!(SIN.grad(x).unwrap(), x.cos());
        assert_eq!(COS.f(x).unwrap(), x.cos());
        assert_eq!(COS.grad(x).unwrap(), -x.sin());
    }
}
