//! The numeric half of the contract a collaborator supplies to a driver.
//!
//! `Settings` is the serializable snapshot embedded in a finished [`crate::run::Run`].
//! The likelihood/prior half of the contract is the [`crate::problem::Problem`]
//! trait object, passed alongside `Settings` to a driver's constructor —
//! it is not embedded here since it is not generally `Serialize`.

use crate::error::Error;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

/// Configuration shared by the standard and dynamic drivers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct Settings {
    /// Dimensionality of the full parameter space.
    pub n_dim: usize,
    /// How many coordinates of theta to materialize per sample.
    pub dims_to_sample: usize,
    /// Target live-point count for standard runs / sample-budget estimation.
    pub nlive_const: usize,
    /// Live-point count for the dynamic driver's initial exploratory run.
    pub ninit: usize,
    /// Live-evidence termination threshold for the standard driver.
    pub termination_fraction: f64,
    /// `None` => standard driver only. `Some(0.0)` => evidence-focused
    /// dynamic driver. `Some(1.0)` => parameter-focused. `Some(g)` for
    /// `0 < g < 1` blends the two goals.
    pub dynamic_goal: Option<f64>,
    /// Optional hard cap on dynamic-run sample count; estimated from
    /// `nlive_const` / `ninit` when unset.
    pub n_samples_max: Option<usize>,
    /// Threads added per dynamic-driver iteration.
    pub nbatch: usize,
    /// Importance threshold above which a sample falls in the insertion
    /// region for the dynamic driver.
    pub dynamic_fraction: f64,
    /// Enables the tuned ("theta1") parameter-importance weighting.
    pub tuned_dynamic_p: bool,
    /// Optional static log-volume termination for a single thread /
    /// the analytic reference integrator.
    pub logx_terminate: Option<f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            n_dim: 1,
            dims_to_sample: 1,
            nlive_const: 200,
            ninit: 20,
            termination_fraction: 1e-3,
            dynamic_goal: None,
            n_samples_max: None,
            nbatch: 1,
            dynamic_fraction: 0.9,
            tuned_dynamic_p: false,
            logx_terminate: None,
        }
    }
}

impl Settings {
    /// Create settings with the given dimensionality and live-point count,
    /// leaving the rest at their defaults.
    pub fn new(n_dim: usize, nlive_const: usize) -> Self {
        Self {
            n_dim,
            dims_to_sample: n_dim,
            nlive_const,
            ..Default::default()
        }
    }

    /// Builder-style setter for `dynamic_goal`.
    pub fn with_dynamic_goal(&self, dynamic_goal: f64) -> Self {
        Self {
            dynamic_goal: Some(dynamic_goal),
            ..self.clone()
        }
    }

    /// Builder-style setter for `termination_fraction`.
    pub fn with_termination_fraction(&self, termination_fraction: f64) -> Self {
        Self {
            termination_fraction,
            ..self.clone()
        }
    }

    /// Builder-style setter for `n_samples_max`.
    pub fn with_n_samples_max(&self, n_samples_max: usize) -> Self {
        Self {
            n_samples_max: Some(n_samples_max),
            ..self.clone()
        }
    }

    /// Builder-style setter for `nbatch`.
    pub fn with_nbatch(&self, nbatch: usize) -> Self {
        Self {
            nbatch,
            ..self.clone()
        }
    }

    /// Validate the ranges called out in the error-handling design:
    /// `dynamic_goal ∈ [0,1]`, `dynamic_fraction ∈ (0,1)`, `dims_to_sample
    /// <= n_dim`, and the various positive-count fields.
    pub fn validate(&self) -> Result<(), Error> {
        if self.n_dim == 0 {
            return Err(Error::InvalidSettings("n_dim must be at least 1".into()));
        }
        if self.dims_to_sample == 0 || self.dims_to_sample > self.n_dim {
            return Err(Error::InvalidSettings(format!(
                "dims_to_sample ({}) must be between 1 and n_dim ({})",
                self.dims_to_sample, self.n_dim
            )));
        }
        if self.nlive_const < 1 {
            return Err(Error::InvalidSettings("nlive_const must be at least 1".into()));
        }
        if self.ninit < 1 {
            return Err(Error::InvalidSettings("ninit must be at least 1".into()));
        }
        if !(self.termination_fraction > 0.0 && self.termination_fraction < 1.0) {
            return Err(Error::InvalidSettings(
                "termination_fraction must be in (0, 1)".into(),
            ));
        }
        if let Some(goal) = self.dynamic_goal {
            if !(0.0..=1.0).contains(&goal) {
                return Err(Error::InvalidSettings(format!(
                    "dynamic_goal ({}) must be in [0, 1]",
                    goal
                )));
            }
        }
        if self.nbatch < 1 {
            return Err(Error::InvalidSettings("nbatch must be at least 1".into()));
        }
        if !(self.dynamic_fraction > 0.0 && self.dynamic_fraction < 1.0) {
            return Err(Error::InvalidSettings(
                "dynamic_fraction must be in (0, 1)".into(),
            ));
        }
        Ok(())
    }
}

/// Validate a credible-interval probability, shared by the `RadialCred` and
/// `ParamCred` estimators.
pub fn validate_probability(p: f64) -> Result<(), Error> {
    if !(p > 0.0 && p < 1.0) {
        return Err(Error::InvalidSettings(format!(
            "credible interval probability ({}) must be in (0, 1)",
            p
        )));
    }
    Ok(())
}
