/// Errors raised while building or running a computation graph.
///
/// All of them abort the operation in progress; nothing is retried.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed expression, or a node built with both or neither of a value and an operator.
    #[error("construction error: {0}")]
    Construction(String),

    #[error("variable `{0}` has no value. Call `initialize_variables()` before `forward()`.")]
    Name(String),

    /// An operand was read before the forward pass populated it.
    #[error("node {0} has no value from the forward pass")]
    State(usize),

    #[error("`{op}` is undefined for {value}")]
    Domain { op: &'static str, value: f64 },

    #[error("division by zero in `{0}`")]
    DivisionByZero(&'static str),

    #[error("derivative of `^` with respect to the exponent is undefined for base {base}")]
    UnsupportedDerivative { base: f64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
