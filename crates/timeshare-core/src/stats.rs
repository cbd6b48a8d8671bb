//! Reference statistics and batch computation.
//!
//! The z-scores in the blend compare one task against the population of
//! open assignments. This module derives `μ`/`σ` for time-until-due and
//! logged work from that population (population standard deviation, all in
//! seconds), then runs the engine for every assignment in one window.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::params::RawParameters;
use crate::share::{compute_time_share, IntegrationResult};

/// One open assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Due date, Unix seconds
    pub due_date: f64,
    /// Work logged so far, seconds
    pub worked_seconds: f64,
}

/// Population statistics over a set of assignments, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceStats {
    pub mu_due_times: f64,
    pub sigma_due_times: f64,
    pub mu_logged_times: f64,
    pub sigma_logged_times: f64,
}

fn mean_and_std(values: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let n = values.clone().count() as f64;
    let mean = values.clone().sum::<f64>() / n;
    let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

impl ReferenceStats {
    /// Statistics of seconds-until-due (relative to `reference_time`) and of
    /// worked seconds.
    ///
    /// A zero standard deviation is returned as-is; the normalizer rejects it
    /// when the statistics are used.
    pub fn from_assignments(
        assignments: &[Assignment],
        reference_time: f64,
    ) -> Result<Self, EngineError> {
        if assignments.is_empty() {
            return Err(EngineError::EmptyAssignments);
        }
        let (mu_due_times, sigma_due_times) =
            mean_and_std(assignments.iter().map(|a| a.due_date - reference_time));
        let (mu_logged_times, sigma_logged_times) =
            mean_and_std(assignments.iter().map(|a| a.worked_seconds));

        let stats = Self {
            mu_due_times,
            sigma_due_times,
            mu_logged_times,
            sigma_logged_times,
        };
        tracing::debug!(?stats, count = assignments.len(), "derived reference statistics");
        Ok(stats)
    }
}

/// A window shared by a set of assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Window start, Unix seconds
    pub t0: f64,
    /// Window end, Unix seconds; also the reference time for the statistics
    pub t1: f64,
    #[serde(rename = "Tmax")]
    pub tmax: f64,
    pub k: f64,
    pub assignments: Vec<Assignment>,
}

/// Engine result for one assignment of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentShare {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub result: IntegrationResult,
}

impl BatchRequest {
    /// Parameter record for one assignment under the batch statistics.
    pub fn parameters_for(&self, assignment: &Assignment, stats: &ReferenceStats) -> RawParameters {
        RawParameters {
            t0: Some(self.t0),
            t1: Some(self.t1),
            due_date: Some(assignment.due_date),
            tmax: Some(self.tmax),
            k: Some(self.k),
            mu_due_times: Some(stats.mu_due_times),
            sigma_due_times: Some(stats.sigma_due_times),
            mu_logged_times: Some(stats.mu_logged_times),
            sigma_logged_times: Some(stats.sigma_logged_times),
            logged_time: Some(assignment.worked_seconds),
        }
    }
}

/// Run the engine for every assignment. The first failure aborts the batch.
pub fn compute_batch(request: &BatchRequest) -> Result<Vec<AssignmentShare>, EngineError> {
    let stats = ReferenceStats::from_assignments(&request.assignments, request.t1)?;
    let mut shares = Vec::with_capacity(request.assignments.len());
    for assignment in &request.assignments {
        let raw = request.parameters_for(assignment, &stats);
        let result = compute_time_share(&raw).inspect_err(|err| {
            tracing::warn!(id = %assignment.id, %err, "assignment failed");
        })?;
        shares.push(AssignmentShare {
            id: assignment.id.clone(),
            name: assignment.name.clone(),
            result,
        });
    }
    Ok(shares)
}
