//! Closed-form definite integration of the urgency blend.
//!
//! The integrand family is fixed, so no computer-algebra system is needed.
//! The ramp `e^{r(t)}` is monotone in `t` with rate `c = −k/Tmax`. The blend
//! is expanded around the window endpoint where the ramp peaks, in a local
//! time `u ∈ [0, Δ]` that runs away from that endpoint. The local rate
//! `c_u = −|c|` is then never positive, and the expansion is exactly
//!
//! ```text
//! urgency(u) = C0 + C1·u + (a + b·u)·(e^{c_u·u} − 1)
//! ```
//!
//! The linear×exponential shape has the antiderivative from integration by
//! parts, `e^{c·u}·[(a + b·u)/c − b/c²]`. Evaluating `F(Δ) − F(0)` directly
//! divides by `c` and `c²`, which cancels catastrophically as `k → 0`. The same
//! difference is rewritten as `a·Δ·φ1(cΔ) + b·Δ²·ψ(cΔ)` with
//!
//! ```text
//! φ1(x) = (e^x − 1)/x            ψ(x) = (x·e^x − e^x + 1)/x²
//! ```
//!
//! and the `(e^{cu} − 1)` shape subtracts the polynomial part analytically,
//! leaving `φ1(x) − 1` and `ψ(x) − ½`, which are taken from their Taylor
//! series near zero.

use serde::{Deserialize, Serialize};

use crate::blend::UrgencyBlend;
use crate::error::EngineError;
use crate::params::TaskWindowParameters;

/// Below this `|x|` the φ/ψ helpers switch to their Taylor series.
const TAYLOR_CUTOFF: f64 = 0.5;
const TAYLOR_MAX_TERMS: usize = 40;

/// `(a + b·u)·(e^{c·u} − 1)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearExpm1 {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl LinearExpm1 {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// `∫_0^Δ (a + b·u)·(e^{c·u} − 1) du`
    pub fn definite(&self, delta: f64) -> f64 {
        let x = self.c * delta;
        self.a * delta * phi1_minus_one(x) + self.b * delta * delta * psi_minus_half(x)
    }
}

/// One shape of the expanded integrand, in local time `u`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Term {
    /// `a`
    Constant { a: f64 },
    /// `b·u`
    Linear { b: f64 },
    /// `(a + b·u)·(e^{c·u} − 1)`
    LinearExpm1(LinearExpm1),
}

impl Term {
    /// `∫_0^Δ term(u) du`
    pub fn definite(&self, delta: f64) -> f64 {
        match self {
            Term::Constant { a } => a * delta,
            Term::Linear { b } => 0.5 * b * delta * delta,
            Term::LinearExpm1(f) => f.definite(delta),
        }
    }
}

/// `(x·e^x − e^x + 1)/x²`
fn psi(x: f64) -> f64 {
    if x.abs() < TAYLOR_CUTOFF {
        0.5 + psi_minus_half(x)
    } else {
        let em1 = x.exp_m1();
        (x * em1 + x - em1) / (x * x)
    }
}

/// `φ1(x) − 1 = Σ_{n≥1} xⁿ/(n+1)!`
fn phi1_minus_one(x: f64) -> f64 {
    if x.abs() >= TAYLOR_CUTOFF {
        return (x.exp_m1() - x) / x;
    }
    let mut term = 0.5 * x;
    let mut sum = 0.0;
    for n in 1..=TAYLOR_MAX_TERMS {
        sum += term;
        if term.abs() <= f64::EPSILON * sum.abs() {
            break;
        }
        term *= x / (n + 2) as f64;
    }
    sum
}

/// `ψ(x) − ½ = Σ_{n≥1} (n+1)·xⁿ/(n+2)!`
fn psi_minus_half(x: f64) -> f64 {
    if x.abs() >= TAYLOR_CUTOFF {
        return psi(x) - 0.5;
    }
    // r = xⁿ/(n+2)!
    let mut r = x / 6.0;
    let mut sum = 0.0;
    for n in 1..=TAYLOR_MAX_TERMS {
        let term = (n + 1) as f64 * r;
        sum += term;
        if term.abs() <= f64::EPSILON * sum.abs() {
            break;
        }
        r *= x / (n + 3) as f64;
    }
    sum
}

/// The urgency blend expanded into closed-form shapes over one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgencyExpansion {
    /// Endpoint the local time starts from: `t0` when `k > 0`, else `t1`
    pub anchor: f64,
    /// `t = anchor + direction·u`, `direction = ±1`
    pub direction: f64,
    /// Window length, hours
    pub delta: f64,
    pub terms: Vec<Term>,
}

impl UrgencyExpansion {
    /// Expand the blend around the endpoint where the ramp peaks.
    ///
    /// With `p`, `q` the intercept and slope of the due z-score in `u`, `L`
    /// the logged z-score, `WA` the weights and `rA` the ramp exponent at the
    /// anchor:
    ///
    /// ```text
    /// C0 = WA.due·p + WA.logged·L
    /// C1 = WA.due·q
    /// a  = s·(p − L),  b = s·q,  s = ½·e^{rA}/(e^{−k} − 1)
    /// ```
    pub fn from_blend(blend: &UrgencyBlend) -> Self {
        let params = blend.params();
        let c = -params.k / params.tmax;
        let (anchor, direction) = if c > 0.0 {
            (params.t1, -1.0)
        } else {
            (params.t0, 1.0)
        };

        let p = blend.due_z(anchor);
        let q = -direction / params.sigma_due_times;
        let l = blend.logged_z();
        let wa = blend.weights(anchor);
        let s = 0.5 * blend.ramp_ratio(blend.ramp_exponent(anchor));

        let terms = vec![
            Term::Constant {
                a: wa.due * p + wa.logged * l,
            },
            Term::Linear { b: wa.due * q },
            Term::LinearExpm1(LinearExpm1::new(s * (p - l), s * q, direction * c)),
        ];

        tracing::debug!(?terms, anchor, delta = params.delta_t(), "expanded urgency integrand");

        Self {
            anchor,
            direction,
            delta: params.delta_t(),
            terms,
        }
    }

    /// `∫_0^Δ` of every term, summed.
    pub fn definite(&self) -> f64 {
        self.terms.iter().map(|term| term.definite(self.delta)).sum()
    }
}

fn finite(quantity: &'static str, value: f64) -> Result<f64, EngineError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::NonFinite { quantity, value })
    }
}

/// `∫_{t0}^{t1} urgency(t) dt`, hours.
///
/// # Errors
///
/// [`EngineError::DegenerateIntegrand`] when `k == 0`;
/// [`EngineError::NonFinite`] when the integral itself exceeds `f64` range.
pub fn integrate_urgency(params: &TaskWindowParameters) -> Result<f64, EngineError> {
    let blend = UrgencyBlend::new(params)?;
    let expansion = UrgencyExpansion::from_blend(&blend);
    let numerator = finite("numerator", expansion.definite())?;
    tracing::debug!(numerator, "integrated urgency");
    Ok(numerator)
}

/// `∫_{t0}^{t1} 1 dt`, hours. The reference function is the constant one.
pub fn integrate_reference(params: &TaskWindowParameters) -> f64 {
    Term::Constant { a: 1.0 }.definite(params.delta_t())
}
