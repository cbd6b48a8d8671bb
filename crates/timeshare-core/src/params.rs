//! Parameter normalization.
//!
//! Requests arrive with timestamps and time statistics in seconds. Everything
//! downstream works in hours, so the conversion happens here and nowhere else.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Seconds in one hour.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Parameter record as received on the wire.
///
/// Every field is optional so that an absent key can be reported by name
/// instead of surfacing as a generic deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawParameters {
    /// Window start, Unix seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t0: Option<f64>,
    /// Window end, Unix seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t1: Option<f64>,
    /// Due date, Unix seconds
    #[serde(rename = "D", default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<f64>,
    /// Maximum expected task duration, hours
    #[serde(rename = "Tmax", default, skip_serializing_if = "Option::is_none")]
    pub tmax: Option<f64>,
    /// Exponential shape factor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<f64>,
    #[serde(rename = "muDueTimes", default, skip_serializing_if = "Option::is_none")]
    pub mu_due_times: Option<f64>,
    #[serde(rename = "sigmaDueTimes", default, skip_serializing_if = "Option::is_none")]
    pub sigma_due_times: Option<f64>,
    #[serde(rename = "muLoggedTimes", default, skip_serializing_if = "Option::is_none")]
    pub mu_logged_times: Option<f64>,
    #[serde(rename = "sigmaLoggedTimes", default, skip_serializing_if = "Option::is_none")]
    pub sigma_logged_times: Option<f64>,
    /// Work already logged for the task, seconds
    #[serde(rename = "loggedTime", default, skip_serializing_if = "Option::is_none")]
    pub logged_time: Option<f64>,
}

/// Validated parameters, every time quantity expressed in hours.
///
/// Build through [`RawParameters::normalize`] so the invariants hold:
/// `tmax`, `sigma_due_times` and `sigma_logged_times` are strictly positive,
/// `t0 <= t1`, and all values are finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskWindowParameters {
    pub t0: f64,
    pub t1: f64,
    pub due_date: f64,
    pub tmax: f64,
    pub k: f64,
    pub mu_due_times: f64,
    pub sigma_due_times: f64,
    pub mu_logged_times: f64,
    pub sigma_logged_times: f64,
    pub logged_time: f64,
}

impl TaskWindowParameters {
    /// Elapsed time of the window, hours.
    pub fn delta_t(&self) -> f64 {
        self.t1 - self.t0
    }
}

fn required(field: &'static str, value: Option<f64>) -> Result<f64, EngineError> {
    let value = value.ok_or(EngineError::MissingField { field })?;
    if !value.is_finite() {
        return Err(EngineError::InvalidRange {
            field,
            message: format!("must be a finite number (got {value})"),
        });
    }
    Ok(value)
}

fn positive(field: &'static str, value: f64) -> Result<f64, EngineError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(EngineError::InvalidRange {
            field,
            message: format!("must be greater than 0 (got {value})"),
        })
    }
}

impl RawParameters {
    /// Parse a JSON parameter record.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validate and convert to hours.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingField`] for the first absent key (wire
    /// order), or [`EngineError::InvalidRange`] when a value is outside its
    /// domain.
    pub fn normalize(&self) -> Result<TaskWindowParameters, EngineError> {
        let t0 = required("t0", self.t0)?;
        let t1 = required("t1", self.t1)?;
        let due_date = required("D", self.due_date)?;
        let tmax = required("Tmax", self.tmax)?;
        let k = required("k", self.k)?;
        let mu_due = required("muDueTimes", self.mu_due_times)?;
        let sigma_due = required("sigmaDueTimes", self.sigma_due_times)?;
        let mu_logged = required("muLoggedTimes", self.mu_logged_times)?;
        let sigma_logged = required("sigmaLoggedTimes", self.sigma_logged_times)?;
        let logged_time = required("loggedTime", self.logged_time)?;

        let tmax = positive("Tmax", tmax)?;
        let sigma_due = positive("sigmaDueTimes", sigma_due)?;
        let sigma_logged = positive("sigmaLoggedTimes", sigma_logged)?;
        if t1 < t0 {
            return Err(EngineError::InvalidRange {
                field: "t1",
                message: format!("must not precede t0 (t0 = {t0}, t1 = {t1})"),
            });
        }

        let params = TaskWindowParameters {
            t0: t0 / SECONDS_PER_HOUR,
            t1: t1 / SECONDS_PER_HOUR,
            due_date: due_date / SECONDS_PER_HOUR,
            tmax,
            k,
            mu_due_times: mu_due / SECONDS_PER_HOUR,
            sigma_due_times: sigma_due / SECONDS_PER_HOUR,
            mu_logged_times: mu_logged / SECONDS_PER_HOUR,
            sigma_logged_times: sigma_logged / SECONDS_PER_HOUR,
            logged_time: logged_time / SECONDS_PER_HOUR,
        };

        tracing::debug!(
            t0 = params.t0,
            t1 = params.t1,
            due_date = params.due_date,
            tmax = params.tmax,
            k = params.k,
            "scaled parameters to hours"
        );
        tracing::debug!(
            mu_due = params.mu_due_times,
            sigma_due = params.sigma_due_times,
            mu_logged = params.mu_logged_times,
            sigma_logged = params.sigma_logged_times,
            logged_time = params.logged_time,
            "scaled reference statistics to hours"
        );

        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawParameters {
        RawParameters {
            t0: Some(0.0),
            t1: Some(3600.0),
            due_date: Some(7200.0),
            tmax: Some(4.0),
            k: Some(2.0),
            mu_due_times: Some(3600.0),
            sigma_due_times: Some(1800.0),
            mu_logged_times: Some(1800.0),
            sigma_logged_times: Some(900.0),
            logged_time: Some(1800.0),
        }
    }

    #[test]
    fn converts_seconds_to_hours_once() {
        let params = sample().normalize().unwrap();
        assert_eq!(params.t0, 0.0);
        assert_eq!(params.t1, 1.0);
        assert_eq!(params.due_date, 2.0);
        assert_eq!(params.mu_due_times, 1.0);
        assert_eq!(params.sigma_due_times, 0.5);
        assert_eq!(params.mu_logged_times, 0.5);
        assert_eq!(params.sigma_logged_times, 0.25);
        assert_eq!(params.logged_time, 0.5);
        assert_eq!(params.delta_t(), 1.0);
    }

    #[test]
    fn tmax_and_k_pass_through_unscaled() {
        let params = sample().normalize().unwrap();
        assert_eq!(params.tmax, 4.0);
        assert_eq!(params.k, 2.0);
    }

    #[test]
    fn reports_first_missing_key_by_wire_name() {
        let mut raw = sample();
        raw.due_date = None;
        raw.logged_time = None;
        assert_eq!(
            raw.normalize(),
            Err(EngineError::MissingField { field: "D" })
        );
    }

    #[test]
    fn parses_wire_names_from_json() {
        let raw = RawParameters::from_json(
            r#"{"t0": 0, "t1": 3600, "D": 7200, "Tmax": 4, "k": 2,
                "muDueTimes": 3600, "sigmaDueTimes": 1800,
                "muLoggedTimes": 1800, "sigmaLoggedTimes": 900,
                "loggedTime": 1800, "unrelated": "ignored"}"#,
        )
        .unwrap();
        assert_eq!(raw, sample());
    }

    #[test]
    fn empty_object_is_missing_t0() {
        let raw = RawParameters::from_json("{}").unwrap();
        assert_eq!(
            raw.normalize(),
            Err(EngineError::MissingField { field: "t0" })
        );
    }

    fn invalid_field(raw: RawParameters) -> &'static str {
        match raw.normalize() {
            Err(EngineError::InvalidRange { field, .. }) => field,
            other => panic!("expected InvalidRange, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_positive_sigmas_and_tmax() {
        let mut raw = sample();
        raw.sigma_due_times = Some(0.0);
        assert_eq!(invalid_field(raw), "sigmaDueTimes");

        let mut raw = sample();
        raw.sigma_logged_times = Some(-900.0);
        assert_eq!(invalid_field(raw), "sigmaLoggedTimes");

        let mut raw = sample();
        raw.tmax = Some(0.0);
        assert_eq!(invalid_field(raw), "Tmax");
    }

    #[test]
    fn rejects_inverted_window() {
        let mut raw = sample();
        raw.t1 = Some(-1.0);
        assert!(matches!(
            raw.normalize(),
            Err(EngineError::InvalidRange { field: "t1", .. })
        ));
    }

    #[test]
    fn accepts_empty_window() {
        let mut raw = sample();
        raw.t1 = raw.t0;
        assert!(raw.normalize().is_ok());
    }

    #[test]
    fn rejects_non_finite_values() {
        let mut raw = sample();
        raw.k = Some(f64::NAN);
        assert!(matches!(
            raw.normalize(),
            Err(EngineError::InvalidRange { field: "k", .. })
        ));
    }
}
