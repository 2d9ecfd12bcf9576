//! Perfect nested sampling: exact-likelihood nested sampling over
//! spherically symmetric likelihood/prior families, used to study the
//! statistical properties of nested sampling itself.
//!
//! A *perfect* nested-sampling run never approximates the likelihood call:
//! every sample's radius is drawn from the exact inverse-CDF map a
//! [`problem::Problem`] supplies, so the only randomness left in a run is
//! the nested-sampling algorithm's own shrinkage process. This makes the
//! crate useful for isolating nested sampling's *statistical* error from
//! the approximation error of an ordinary MCMC-based sampler, rather than
//! for sampling real posteriors (that is the job of the external
//! collaborator that builds a [`problem::Problem`] around a concrete
//! likelihood and prior).
//!
//! Two entry points produce a [`run::Run`]: [`driver::standard::StandardDriver`]
//! (fixed live-point count, live-evidence termination) and
//! [`driver::dynamic::DynamicDriver`] (an initial exploratory run followed by
//! importance-driven thread insertion, per [`settings::Settings::dynamic_goal`]).
//! A finished run is consumed by the [`estimators::Estimator`] family.

pub mod driver;
pub mod error;
pub mod estimators;
pub mod importance;
pub mod integrate;
pub mod math;
pub mod problem;
pub mod rng;
pub mod run;
pub mod samples;
pub mod settings;
pub mod thread;

pub use driver::{DynamicDriver, StandardDriver};
pub use error::{Error, Result};
pub use estimators::Estimator;
pub use problem::Problem;
pub use run::Run;
pub use settings::Settings;
