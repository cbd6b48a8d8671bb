//! # timeshare Core Library
//!
//! This library computes how much of an elapsed time window should be
//! credited to a task. It weighs closeness to the due date against logged
//! work with a blended urgency function and integrates that function over the
//! window in closed form.
//!
//! ## Architecture
//!
//! Data flows strictly forward, and every step is a pure function:
//!
//! - **Normalizer**: raw seconds-based request → validated hour-scaled parameters
//! - **Blend**: the urgency function `urgency(t)` over the window
//! - **Integrator**: closed-form definite integrals, no computer algebra
//! - **Share**: proportion and credited time
//!
//! ## Key Components
//!
//! - [`compute_time_share`]: the whole pipeline for one request
//! - [`UrgencyBlend`]: pointwise evaluation and diagnostics
//! - [`ReferenceStats`]: `μ`/`σ` inputs derived from a set of assignments
//! - [`Config`]: engine defaults and logging configuration

pub mod blend;
pub mod config;
pub mod error;
pub mod integrate;
pub mod params;
pub mod share;
pub mod stats;

pub use blend::{BlendWeights, UrgencyBlend, UrgencySample};
pub use config::{data_dir, Config, EngineConfig, LoggingConfig};
pub use error::{ConfigError, CoreError, EngineError, Result};
pub use integrate::{integrate_reference, integrate_urgency, LinearExpm1, Term, UrgencyExpansion};
pub use params::{RawParameters, TaskWindowParameters, SECONDS_PER_HOUR};
pub use share::{compute_share, compute_time_share, IntegrationResult};
pub use stats::{compute_batch, Assignment, AssignmentShare, BatchRequest, ReferenceStats};
