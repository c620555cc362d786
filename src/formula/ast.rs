//! Expression tree for conductivity formulas.
//!
//! Only one free variable exists (`T`, the mean temperature in °C), so
//! evaluation needs no environment beyond that single value.

/// Whitelisted single-argument math functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Exp,
    Log,
    Log10,
    Sqrt,
    Abs,
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    Tanh,
}

impl Function {
    /// Resolves a function name, with or without the `math.` namespace.
    pub fn from_name(name: &str) -> Option<Self> {
        let bare = name.strip_prefix("math.").unwrap_or(name);
        match bare {
            "exp" => Some(Function::Exp),
            "log" | "ln" => Some(Function::Log),
            "log10" => Some(Function::Log10),
            "sqrt" => Some(Function::Sqrt),
            "abs" | "fabs" => Some(Function::Abs),
            "sin" => Some(Function::Sin),
            "cos" => Some(Function::Cos),
            "tan" => Some(Function::Tan),
            "sinh" => Some(Function::Sinh),
            "cosh" => Some(Function::Cosh),
            "tanh" => Some(Function::Tanh),
            _ => None,
        }
    }

    pub fn apply(self, x: f64) -> f64 {
        match self {
            Function::Exp => x.exp(),
            Function::Log => x.ln(),
            Function::Log10 => x.log10(),
            Function::Sqrt => x.sqrt(),
            Function::Abs => x.abs(),
            Function::Sin => x.sin(),
            Function::Cos => x.cos(),
            Function::Tan => x.tan(),
            Function::Sinh => x.sinh(),
            Function::Cosh => x.cosh(),
            Function::Tanh => x.tanh(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    /// Floored division, `//`.
    FloorDiv,
    /// Remainder taking the sign of the divisor, `%`.
    Rem,
    Pow,
}

impl BinaryOp {
    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            BinaryOp::FloorDiv => (lhs / rhs).floor(),
            BinaryOp::Rem => {
                let rem = lhs % rhs;
                if rem != 0.0 && (rem < 0.0) != (rhs < 0.0) {
                    rem + rhs
                } else {
                    rem
                }
            }
            BinaryOp::Pow => lhs.powf(rhs),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    /// The bound variable `T`.
    Temperature,
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        function: Function,
        arg: Box<Expr>,
    },
}

impl Expr {
    /// Evaluates the tree at mean temperature `t`.
    ///
    /// IEEE semantics apply, so a division by zero yields an infinity rather
    /// than a panic; the caller decides what a non-finite value means.
    pub fn eval(&self, t: f64) -> f64 {
        match self {
            Expr::Number(value) => *value,
            Expr::Temperature => t,
            Expr::Neg(inner) => -inner.eval(t),
            Expr::Binary { op, lhs, rhs } => op.apply(lhs.eval(t), rhs.eval(t)),
            Expr::Call { function, arg } => function.apply(arg.eval(t)),
        }
    }

    /// True when the tree never reads `T`.
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Number(_) => true,
            Expr::Temperature => false,
            Expr::Neg(inner) => inner.is_constant(),
            Expr::Binary { lhs, rhs, .. } => lhs.is_constant() && rhs.is_constant(),
            Expr::Call { arg, .. } => arg.is_constant(),
        }
    }
}
