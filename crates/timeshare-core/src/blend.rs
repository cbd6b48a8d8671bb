//! Urgency blend function.
//!
//! Urgency at an instant is a convex combination of two z-scores: how much
//! time remains until the due date, and how much work has been logged. An
//! exponential transition weight shifts the mix from the logged-time signal
//! to the due-date signal as the remaining time shrinks below `Tmax`.
//!
//! ```text
//! remaining(t) = D − t
//! w(t)         = (1 − e^{−k·(Tmax − remaining(t))/Tmax}) / (1 − e^{−k})
//! urgency(t)   = (½ + ½w)·(remaining(t) − μ_due)/σ_due
//!              + (½ − ½w)·(logged − μ_logged)/σ_logged
//! ```

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::params::TaskWindowParameters;

/// Mixing weights at one instant. `due + logged == 1` up to rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    pub due: f64,
    pub logged: f64,
}

/// Every intermediate of the blend at one instant, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgencySample {
    pub t: f64,
    pub remaining: f64,
    pub transition_weight: f64,
    pub due_weight: f64,
    pub logged_weight: f64,
    pub due_component: f64,
    pub logged_component: f64,
    pub urgency: f64,
}

/// The blended urgency function for one task window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UrgencyBlend {
    params: TaskWindowParameters,
    /// `e^{−k} − 1`, the (negated) normalizer of the transition weight
    norm_expm1: f64,
    /// `ln|e^{−k} − 1|`
    norm_ln: f64,
    logged_z: f64,
}

impl UrgencyBlend {
    /// Build the blend for normalized parameters.
    ///
    /// # Errors
    ///
    /// [`EngineError::DegenerateIntegrand`] when `k == 0`, and
    /// [`EngineError::NonFinite`] when `k` is so negative that `e^{−k}`
    /// overflows.
    pub fn new(params: &TaskWindowParameters) -> Result<Self, EngineError> {
        if params.k == 0.0 {
            return Err(EngineError::DegenerateIntegrand { k: params.k });
        }
        let norm_expm1 = (-params.k).exp_m1();
        if !norm_expm1.is_finite() {
            return Err(EngineError::NonFinite {
                quantity: "transition weight normalizer",
                value: norm_expm1,
            });
        }
        let logged_z = (params.logged_time - params.mu_logged_times) / params.sigma_logged_times;
        Ok(Self {
            params: *params,
            norm_expm1,
            norm_ln: norm_expm1.abs().ln(),
            logged_z,
        })
    }

    pub fn params(&self) -> &TaskWindowParameters {
        &self.params
    }

    pub(crate) fn norm_expm1(&self) -> f64 {
        self.norm_expm1
    }

    /// Exponent of the transition ramp at `t`: `−k·(Tmax − remaining(t))/Tmax`.
    pub(crate) fn ramp_exponent(&self, t: f64) -> f64 {
        let p = &self.params;
        -p.k * (p.tmax - self.remaining(t)) / p.tmax
    }

    /// `e^r / (e^{−k} − 1)`, formed in log space so a large `r` does not
    /// overflow before the division.
    pub(crate) fn ramp_ratio(&self, r: f64) -> f64 {
        self.norm_expm1.signum() * (r - self.norm_ln).exp()
    }

    /// Hours until due at `t`.
    pub fn remaining(&self, t: f64) -> f64 {
        self.params.due_date - t
    }

    /// Normalized exponential ramp. Zero when `remaining(t) == Tmax`, one when
    /// the due date is reached.
    pub fn transition_weight(&self, t: f64) -> f64 {
        let r = self.ramp_exponent(t);
        if r > 1.0 {
            self.ramp_ratio(r) - 1.0 / self.norm_expm1
        } else {
            r.exp_m1() / self.norm_expm1
        }
    }

    pub fn weights(&self, t: f64) -> BlendWeights {
        let half_w = 0.5 * self.transition_weight(t);
        BlendWeights {
            due: 0.5 + half_w,
            logged: 0.5 - half_w,
        }
    }

    /// z-score of the time remaining at `t`.
    pub fn due_z(&self, t: f64) -> f64 {
        (self.remaining(t) - self.params.mu_due_times) / self.params.sigma_due_times
    }

    /// z-score of the logged time; constant over the window.
    pub fn logged_z(&self) -> f64 {
        self.logged_z
    }

    pub fn due_component(&self, t: f64) -> f64 {
        self.weights(t).due * self.due_z(t)
    }

    pub fn logged_component(&self, t: f64) -> f64 {
        self.weights(t).logged * self.logged_z
    }

    pub fn urgency(&self, t: f64) -> f64 {
        let w = self.weights(t);
        w.due * self.due_z(t) + w.logged * self.logged_z
    }

    pub fn sample(&self, t: f64) -> UrgencySample {
        let transition_weight = self.transition_weight(t);
        let weights = self.weights(t);
        let due_component = weights.due * self.due_z(t);
        let logged_component = weights.logged * self.logged_z;
        UrgencySample {
            t,
            remaining: self.remaining(t),
            transition_weight,
            due_weight: weights.due,
            logged_weight: weights.logged,
            due_component,
            logged_component,
            urgency: due_component + logged_component,
        }
    }

    /// Samples at `steps + 1` evenly spaced instants across the window.
    pub fn samples(&self, steps: usize) -> Vec<UrgencySample> {
        let steps = steps.max(1);
        let dt = self.params.delta_t() / steps as f64;
        (0..=steps)
            .map(|i| {
                let t = if i == steps {
                    self.params.t1
                } else {
                    self.params.t0 + dt * i as f64
                };
                self.sample(t)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(k: f64) -> TaskWindowParameters {
        TaskWindowParameters {
            t0: 0.0,
            t1: 1.0,
            due_date: 2.0,
            tmax: 4.0,
            k,
            mu_due_times: 1.0,
            sigma_due_times: 0.5,
            mu_logged_times: 0.5,
            sigma_logged_times: 0.25,
            logged_time: 0.75,
        }
    }

    #[test]
    fn rejects_zero_shape_factor() {
        assert_eq!(
            UrgencyBlend::new(&params(0.0)),
            Err(EngineError::DegenerateIntegrand { k: 0.0 })
        );
    }

    #[test]
    fn rejects_overflowing_normalizer() {
        assert!(matches!(
            UrgencyBlend::new(&params(-1000.0)),
            Err(EngineError::NonFinite { .. })
        ));
    }

    #[test]
    fn transition_weight_anchors() {
        let blend = UrgencyBlend::new(&params(2.0)).unwrap();
        // remaining == Tmax at t = D − Tmax
        assert!(blend.transition_weight(-2.0).abs() < 1e-15);
        // remaining == 0 at t = D
        assert!((blend.transition_weight(2.0) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn transition_weight_matches_direct_formula() {
        let blend = UrgencyBlend::new(&params(2.0)).unwrap();
        let t: f64 = 0.3;
        let direct = (1.0 - (-2.0 * (4.0 - (2.0 - t)) / 4.0).exp()) / (1.0 - (-2.0f64).exp());
        assert!((blend.transition_weight(t) - direct).abs() < 1e-14);
    }

    #[test]
    fn transition_weight_is_linear_ramp_for_tiny_k() {
        let blend = UrgencyBlend::new(&params(1e-9)).unwrap();
        // k → 0 limit: (Tmax − remaining)/Tmax
        let t = 0.5;
        let limit = (4.0 - 1.5) / 4.0;
        assert!((blend.transition_weight(t) - limit).abs() < 1e-8);
    }

    #[test]
    fn transition_weight_survives_exponent_past_f64_range() {
        let mut params = params(-30.0);
        // r(t1) = 30·(4 + 92)/4 = 720, beyond what e^r alone can hold
        params.due_date = -91.0;
        let blend = UrgencyBlend::new(&params).unwrap();
        let r = blend.ramp_exponent(1.0);
        assert_eq!(r, 720.0);
        let expected = (r - 30.0).exp() / (1.0 - (-30.0f64).exp()) - 1.0 / 30.0f64.exp_m1();
        let w = blend.transition_weight(1.0);
        assert!(w.is_finite());
        assert!((w - expected).abs() <= 1e-11 * expected);
    }

    #[test]
    fn ramp_ratio_matches_direct_quotient() {
        for k in [-3.0, -0.5, 0.7, 2.0] {
            let blend = UrgencyBlend::new(&params(k)).unwrap();
            for r in [-20.0, -1.0, 0.0, 0.5, 3.0] {
                let direct = f64::exp(r) / (-k).exp_m1();
                let ratio = blend.ramp_ratio(r);
                assert!((ratio - direct).abs() <= 1e-13 * direct.abs(), "k={k} r={r}");
            }
        }
    }

    #[test]
    fn weights_sum_to_one() {
        for k in [-3.0, -0.5, 1e-6, 0.7, 2.0, 9.0] {
            let blend = UrgencyBlend::new(&params(k)).unwrap();
            for i in 0..=20 {
                let t = i as f64 / 20.0;
                let w = blend.weights(t);
                let tol = f64::EPSILON * w.due.abs().max(1.0);
                assert!((w.due + w.logged - 1.0).abs() <= tol, "k={k} t={t} {w:?}");
            }
        }
    }

    #[test]
    fn urgency_is_sum_of_components() {
        let blend = UrgencyBlend::new(&params(2.0)).unwrap();
        let s = blend.sample(0.25);
        assert_eq!(s.urgency, s.due_component + s.logged_component);
        assert_eq!(s.urgency, blend.urgency(0.25));
        assert_eq!(s.remaining, 1.75);
        assert_eq!(blend.logged_z(), 1.0);
    }

    #[test]
    fn samples_cover_window_endpoints() {
        let blend = UrgencyBlend::new(&params(2.0)).unwrap();
        let samples = blend.samples(4);
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0].t, 0.0);
        assert_eq!(samples[4].t, 1.0);
        assert_eq!(samples[2].t, 0.5);
    }
}
