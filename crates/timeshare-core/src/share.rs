//! Proportion and time-share calculation.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::integrate::{integrate_reference, integrate_urgency};
use crate::params::{RawParameters, TaskWindowParameters};

/// Result of integrating one task window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationResult {
    /// `∫ urgency(t) dt` over the window
    pub numerator: f64,
    /// `∫ 1 dt` over the window, hours
    pub denominator: f64,
    /// Average urgency weight over the window
    pub proportion: f64,
    /// Credited time, hours
    pub time_share: f64,
}

impl IntegrationResult {
    /// Combine the two integrals with the window's elapsed wall-clock time.
    ///
    /// # Errors
    ///
    /// [`EngineError::ZeroDenominator`] when `denominator == 0`.
    pub fn from_integrals(
        numerator: f64,
        denominator: f64,
        params: &TaskWindowParameters,
    ) -> Result<Self, EngineError> {
        ensure_denominator(denominator, params)?;
        let proportion = numerator / denominator;
        Ok(Self {
            numerator,
            denominator,
            proportion,
            time_share: proportion * params.delta_t(),
        })
    }
}

fn ensure_denominator(denominator: f64, params: &TaskWindowParameters) -> Result<(), EngineError> {
    if denominator == 0.0 {
        return Err(EngineError::ZeroDenominator {
            t0: params.t0,
            t1: params.t1,
        });
    }
    Ok(())
}

/// Integrate normalized parameters and combine into a result.
///
/// The empty window `t1 == t0` is rejected rather than credited zero time.
pub fn compute_share(params: &TaskWindowParameters) -> Result<IntegrationResult, EngineError> {
    let denominator = integrate_reference(params);
    ensure_denominator(denominator, params)?;
    let numerator = integrate_urgency(params)?;
    let result = IntegrationResult::from_integrals(numerator, denominator, params)?;
    tracing::debug!(
        numerator = result.numerator,
        denominator = result.denominator,
        proportion = result.proportion,
        time_share = result.time_share,
        "computed time share"
    );
    Ok(result)
}

/// Full pipeline: normalize, integrate and combine.
///
/// # Errors
///
/// Any [`EngineError`] raised along the way; no partial result is returned.
pub fn compute_time_share(raw: &RawParameters) -> Result<IntegrationResult, EngineError> {
    let params = raw.normalize().inspect_err(|err| {
        tracing::warn!(%err, "rejected parameter record");
    })?;
    compute_share(&params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(t0: f64, t1: f64) -> TaskWindowParameters {
        TaskWindowParameters {
            t0,
            t1,
            due_date: 10.0,
            tmax: 4.0,
            k: 1.0,
            mu_due_times: 1.0,
            sigma_due_times: 1.0,
            mu_logged_times: 1.0,
            sigma_logged_times: 1.0,
            logged_time: 1.0,
        }
    }

    #[test]
    fn proportion_times_elapsed_is_share() {
        let result = IntegrationResult::from_integrals(3.0, 2.0, &window(1.0, 3.0)).unwrap();
        assert_eq!(result.proportion, 1.5);
        assert_eq!(result.time_share, 3.0);
    }

    #[test]
    fn zero_denominator_is_rejected() {
        assert_eq!(
            IntegrationResult::from_integrals(1.0, 0.0, &window(2.0, 2.0)),
            Err(EngineError::ZeroDenominator { t0: 2.0, t1: 2.0 })
        );
    }

    #[test]
    fn serializes_camel_case() {
        let result = IntegrationResult::from_integrals(1.0, 1.0, &window(0.0, 1.0)).unwrap();
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["timeShare"], 1.0);
        assert_eq!(json["proportion"], 1.0);
    }

    #[test]
    fn empty_window_is_rejected_before_integration() {
        let mut params = window(5.0, 5.0);
        // would otherwise be DegenerateIntegrand
        params.k = 0.0;
        assert_eq!(
            compute_share(&params),
            Err(EngineError::ZeroDenominator { t0: 5.0, t1: 5.0 })
        );
    }
}
