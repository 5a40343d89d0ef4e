//! Symbolic operation expressions.
//!
//! An [`OpExpr`] names a gate and records, in order, every composition,
//! application and transform applied to it. Nothing is evaluated here: the
//! textual form is shipped to the execution service, which owns the matrices.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{IrError, IrResult};

/// What an expression accepts when invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    /// Complete as named; invoking it is an error.
    Fixed,
    /// Takes a numeric argument (an angle).
    Parameterized,
    /// Takes another operation (the controlled target).
    Control,
}

/// Argument to [`OpExpr::call`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpArg {
    /// Integer argument.
    Int(i64),
    /// Real argument.
    Real(f64),
    /// Complex argument.
    Complex(Complex64),
    /// Sub-operation argument for control expressions.
    Op(Box<OpExpr>),
}

impl OpArg {
    /// True for the numeric variants.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, OpArg::Op(_))
    }
}

impl fmt::Display for OpArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpArg::Int(v) => write!(f, "{v}"),
            OpArg::Real(v) => f.write_str(&format_real(*v)),
            OpArg::Complex(c) => f.write_str(&format_complex(*c)),
            OpArg::Op(op) => write!(f, "{op}"),
        }
    }
}

impl From<i64> for OpArg {
    fn from(v: i64) -> Self {
        OpArg::Int(v)
    }
}

impl From<i32> for OpArg {
    fn from(v: i32) -> Self {
        OpArg::Int(i64::from(v))
    }
}

impl From<f64> for OpArg {
    fn from(v: f64) -> Self {
        OpArg::Real(v)
    }
}

impl From<Complex64> for OpArg {
    fn from(v: Complex64) -> Self {
        OpArg::Complex(v)
    }
}

impl From<OpExpr> for OpArg {
    fn from(op: OpExpr) -> Self {
        OpArg::Op(Box::new(op))
    }
}

impl From<&OpExpr> for OpArg {
    fn from(op: &OpExpr) -> Self {
        OpArg::Op(Box::new(op.clone()))
    }
}

/// One recorded step of an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpStep {
    /// Sequential composition with another expression.
    Dot(OpExpr),
    /// Functional application.
    Apply(OpArg),
    /// Transpose marker.
    Transpose,
    /// Complex-conjugate marker.
    Conj,
}

/// A symbolic, composable gate descriptor.
///
/// Equality is representational: two expressions are equal exactly when
/// their textual forms are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpExpr {
    name: String,
    kind: OpKind,
    #[serde(default)]
    steps: Vec<OpStep>,
    /// Set on every derived expression, including one whose steps cancelled.
    #[serde(default)]
    saturated: bool,
}

impl OpExpr {
    /// Create a base expression.
    pub fn new(name: impl Into<String>, kind: OpKind) -> Self {
        Self {
            name: name.into(),
            kind,
            steps: vec![],
            saturated: false,
        }
    }

    /// A base expression that takes no argument.
    pub fn fixed(name: impl Into<String>) -> Self {
        Self::new(name, OpKind::Fixed)
    }

    /// A base expression that takes an angle.
    pub fn parameterized(name: impl Into<String>) -> Self {
        Self::new(name, OpKind::Parameterized)
    }

    /// A base expression that takes a target operation.
    pub fn control(name: impl Into<String>) -> Self {
        Self::new(name, OpKind::Control)
    }

    /// The base gate name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind of the base gate.
    pub fn kind(&self) -> OpKind {
        self.kind
    }

    /// Steps recorded after the base name.
    pub fn steps(&self) -> &[OpStep] {
        &self.steps
    }

    /// Whether [`call`](Self::call) would accept an argument.
    ///
    /// Only an untouched parameterized or control base is open; anything
    /// derived from it is saturated, even `Rx.T.T`.
    pub fn accepts_argument(&self) -> bool {
        self.kind != OpKind::Fixed && !self.saturated
    }

    /// Sequential composition with `other`.
    #[must_use]
    pub fn dot(&self, other: &OpExpr) -> OpExpr {
        self.with_step(OpStep::Dot(other.clone()))
    }

    /// Apply an angle (parameterized) or a target operation (control).
    pub fn call(&self, arg: impl Into<OpArg>) -> IrResult<OpExpr> {
        let arg = arg.into();
        if !self.accepts_argument() {
            return Err(IrError::NotCallable(self.to_string()));
        }
        match self.kind {
            OpKind::Parameterized if !arg.is_numeric() => Err(IrError::InvalidArgument(format!(
                "'{self}' expects a numeric argument, got operation '{arg}'"
            ))),
            OpKind::Control if arg.is_numeric() => Err(IrError::InvalidArgument(format!(
                "'{self}' expects an operation argument, got '{arg}'"
            ))),
            _ => Ok(self.with_step(OpStep::Apply(arg))),
        }
    }

    /// Transpose. A transpose directly following a transpose cancels it.
    #[must_use]
    pub fn transpose(&self) -> OpExpr {
        self.with_involution(OpStep::Transpose)
    }

    /// Complex conjugate. A conjugate directly following a conjugate cancels it.
    #[must_use]
    pub fn conj(&self) -> OpExpr {
        self.with_involution(OpStep::Conj)
    }

    /// Adjoint, always built as transpose followed by conjugate.
    #[must_use]
    pub fn adjoint(&self) -> OpExpr {
        self.transpose().conj()
    }

    fn with_step(&self, step: OpStep) -> OpExpr {
        let mut r = self.clone();
        r.steps.push(step);
        r.saturated = true;
        r
    }

    fn with_involution(&self, step: OpStep) -> OpExpr {
        let mut r = self.clone();
        r.saturated = true;
        if r.steps.last() == Some(&step) {
            r.steps.pop();
        } else {
            r.steps.push(step);
        }
        r
    }
}

impl fmt::Display for OpExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for step in &self.steps {
            match step {
                OpStep::Dot(other) => write!(f, ".dot({other})")?,
                OpStep::Apply(arg) => write!(f, "({arg})")?,
                OpStep::Transpose => f.write_str(".T")?,
                OpStep::Conj => f.write_str(".conj()")?,
            }
        }
        Ok(())
    }
}

impl PartialEq for OpExpr {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for OpExpr {}

impl Hash for OpExpr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

/// Render a real number the way the execution service parses it
/// (`1.0`, `0.25`, `1e-05`, `1e+16`).
pub fn format_real(v: f64) -> String {
    if v.is_nan() {
        return "nan".into();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.into();
    }
    let abs = v.abs();
    if abs != 0.0 && !(1e-4..1e16).contains(&abs) {
        let s = format!("{v:e}");
        return match s.split_once('e') {
            Some((mantissa, exp)) => {
                let exp: i32 = exp.parse().unwrap_or(0);
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.abs())
            }
            None => s,
        };
    }
    if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Render a complex number as `(1+2j)`, or `2j` for a zero real part.
pub fn format_complex(c: Complex64) -> String {
    let part = |v: f64| {
        if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
            format!("{v:.0}")
        } else {
            format_real(v)
        }
    };
    let im = part(c.im);
    if c.re == 0.0 && c.re.is_sign_positive() {
        return format!("{im}j");
    }
    let sign = if im.starts_with('-') { "" } else { "+" };
    format!("({}{sign}{im}j)", part(c.re))
}

/// The standard operation vocabulary understood by the execution service.
pub mod ops {
    use super::OpExpr;

    /// Pauli X.
    pub fn x() -> OpExpr {
        OpExpr::fixed("X")
    }

    /// Pauli Y.
    pub fn y() -> OpExpr {
        OpExpr::fixed("Y")
    }

    /// Pauli Z.
    pub fn z() -> OpExpr {
        OpExpr::fixed("Z")
    }

    /// Hadamard.
    pub fn h() -> OpExpr {
        OpExpr::fixed("H")
    }

    /// Phase gate S.
    pub fn s() -> OpExpr {
        OpExpr::fixed("S")
    }

    /// T gate.
    pub fn t() -> OpExpr {
        OpExpr::fixed("T")
    }

    /// Half X rotation.
    pub fn xh() -> OpExpr {
        OpExpr::fixed("Xh")
    }

    /// Half Y rotation.
    pub fn yh() -> OpExpr {
        OpExpr::fixed("Yh")
    }

    /// Generic rotation, takes an angle.
    pub fn r() -> OpExpr {
        OpExpr::parameterized("R")
    }

    /// Generic rotation, takes an angle.
    pub fn rotation() -> OpExpr {
        OpExpr::parameterized("ROTATION")
    }

    /// X rotation, takes an angle.
    pub fn rx() -> OpExpr {
        OpExpr::parameterized("Rx")
    }

    /// Y rotation, takes an angle.
    pub fn ry() -> OpExpr {
        OpExpr::parameterized("Ry")
    }

    /// Z rotation, takes an angle.
    pub fn rz() -> OpExpr {
        OpExpr::parameterized("Rz")
    }

    /// Controlled Z.
    pub fn cz() -> OpExpr {
        OpExpr::fixed("CZ")
    }

    /// Controlled NOT.
    pub fn cnot() -> OpExpr {
        OpExpr::fixed("CNOT")
    }

    /// SWAP.
    pub fn swap() -> OpExpr {
        OpExpr::fixed("SWAP")
    }

    /// Toffoli.
    pub fn toffoli() -> OpExpr {
        OpExpr::fixed("TOFFOLI")
    }

    /// Single control, takes the target operation.
    pub fn control() -> OpExpr {
        OpExpr::control("CONTROL")
    }

    /// Double control, takes the target operation.
    pub fn controlcontrol() -> OpExpr {
        OpExpr::control("CONTROLCONTROL")
    }

    /// Look up a standard operation by its wire name.
    pub fn by_name(name: &str) -> Option<OpExpr> {
        let op = match name {
            "X" => x(),
            "Y" => y(),
            "Z" => z(),
            "H" => h(),
            "S" => s(),
            "T" => t(),
            "Xh" => xh(),
            "Yh" => yh(),
            "R" => r(),
            "ROTATION" => rotation(),
            "Rx" => rx(),
            "Ry" => ry(),
            "Rz" => rz(),
            "CZ" => cz(),
            "CNOT" => cnot(),
            "SWAP" => swap(),
            "TOFFOLI" => toffoli(),
            "CONTROL" => control(),
            "CONTROLCONTROL" => controlcontrol(),
            _ => return None,
        };
        Some(op)
    }
}

#[cfg(test)]
mod tests {
    use super::ops::*;
    use super::*;

    #[test]
    fn test_base_display() {
        assert_eq!(x().to_string(), "X");
        assert_eq!(cnot().to_string(), "CNOT");
    }

    #[test]
    fn test_transforms_render() {
        assert_eq!(x().transpose().to_string(), "X.T");
        assert_eq!(x().conj().to_string(), "X.conj()");
        assert_eq!(x().adjoint().to_string(), "X.T.conj()");
        assert_eq!(x().dot(&y()).to_string(), "X.dot(Y)");
    }

    #[test]
    fn test_adjoint_is_transpose_then_conj() {
        for op in [x(), rx().call(0.5).unwrap(), x().dot(&h()), s().conj()] {
            assert_eq!(op.adjoint(), op.transpose().conj());
        }
    }

    #[test]
    fn test_involutions_cancel() {
        assert_eq!(x().transpose().transpose(), x());
        assert_eq!(x().conj().conj(), x());
        assert!(x().transpose().transpose().steps().is_empty());
        // Not adjacent: kept.
        assert_eq!(x().transpose().conj().transpose().to_string(), "X.T.conj().T");
    }

    #[test]
    fn test_call_parameterized() {
        assert_eq!(rx().call(0.5).unwrap().to_string(), "Rx(0.5)");
        assert_eq!(rz().call(1.0).unwrap().to_string(), "Rz(1.0)");
        assert_eq!(r().call(90).unwrap().to_string(), "R(90)");
        assert_eq!(
            ry().call(Complex64::new(1.0, 2.0)).unwrap().to_string(),
            "Ry((1+2j))"
        );
    }

    #[test]
    fn test_call_fixed_is_not_callable() {
        let err = x().call(0.5).unwrap_err();
        assert!(matches!(err, IrError::NotCallable(name) if name == "X"));
    }

    #[test]
    fn test_call_saturates() {
        let rx = rx().call(0.5).unwrap();
        assert!(!rx.accepts_argument());
        assert!(matches!(rx.call(0.5), Err(IrError::NotCallable(_))));
        assert!(matches!(
            ops::rx().transpose().call(0.5),
            Err(IrError::NotCallable(_))
        ));
    }

    #[test]
    fn test_cancelled_transforms_stay_saturated() {
        let rx_tt = rx().transpose().transpose();
        assert_eq!(rx_tt, rx());
        assert!(rx_tt.steps().is_empty());
        assert!(!rx_tt.accepts_argument());
        assert!(matches!(rx_tt.call(0.5), Err(IrError::NotCallable(_))));

        let ctrl = control().conj().conj();
        assert!(matches!(ctrl.call(x()), Err(IrError::NotCallable(_))));
        assert!(rx().accepts_argument());
    }

    #[test]
    fn test_call_parameterized_rejects_operation() {
        assert!(matches!(rx().call(x()), Err(IrError::InvalidArgument(_))));
    }

    #[test]
    fn test_control_requires_operation() {
        assert_eq!(control().call(x()).unwrap().to_string(), "CONTROL(X)");
        assert_eq!(
            controlcontrol().call(&rx().call(0.25).unwrap()).unwrap().to_string(),
            "CONTROLCONTROL(Rx(0.25))"
        );
        assert!(matches!(
            control().call(0.5),
            Err(IrError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_dot_does_not_mutate() {
        let a = x();
        let b = y();
        let _ = a.dot(&b);
        assert_eq!(a.to_string(), "X");
        assert_eq!(b.to_string(), "Y");
    }

    #[test]
    fn test_equality_is_representational() {
        assert_eq!(OpExpr::fixed("Rx"), rx());
        assert_ne!(x(), y());
    }

    #[test]
    fn test_format_real() {
        assert_eq!(format_real(1.0), "1.0");
        assert_eq!(format_real(-2.0), "-2.0");
        assert_eq!(format_real(0.125), "0.125");
        assert_eq!(format_real(1e-5), "1e-05");
        assert_eq!(format_real(2.5e16), "2.5e+16");
    }

    #[test]
    fn test_format_complex() {
        assert_eq!(format_complex(Complex64::new(1.0, 2.0)), "(1+2j)");
        assert_eq!(format_complex(Complex64::new(1.5, -2.0)), "(1.5-2j)");
        assert_eq!(format_complex(Complex64::new(0.0, 2.0)), "2j");
    }

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("CNOT"), Some(cnot()));
        assert_eq!(by_name("Rx").map(|o| o.kind()), Some(OpKind::Parameterized));
        assert!(by_name("nope").is_none());
    }
}
