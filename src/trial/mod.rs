//! Trial handles
//!
//! A trial represents one attempt at drawing a hyperparameter configuration
//! from declared search spaces. The search algorithm behind a trial (random,
//! TPE, Bayesian, ...) is not this crate's concern; families only see the
//! suggestion operations below.
//!
//! Two backends are provided: [`RandomTrial`] for independent draws and
//! [`FixedTrial`] for pinning exact values in tests.

mod fixed;
mod random;

pub use fixed::FixedTrial;
pub use random::RandomTrial;

use crate::error::Result;
use crate::params::ParamValue;

/// One attempt at drawing a configuration from declared domains.
///
/// Implementations record every suggestion under its parameter name as
/// originally drawn; corrected values arrive separately through
/// [`set_user_attr`](Trial::set_user_attr), so both sides of a correction
/// remain auditable.
pub trait Trial {
    /// Draw one value from a finite ordered set of choices
    fn suggest_categorical(&mut self, name: &str, choices: &[&str]) -> Result<String>;

    /// Draw one value from the closed interval `[low, high]`,
    /// log-uniformly when `log` is set
    fn suggest_float(&mut self, name: &str, low: f64, high: f64, log: bool) -> Result<f64>;

    /// Draw one integer from the closed interval `[low, high]`,
    /// log-uniformly when `log` is set
    fn suggest_int(&mut self, name: &str, low: i64, high: i64, log: bool) -> Result<i64>;

    /// Draw one boolean
    fn suggest_bool(&mut self, name: &str) -> Result<bool>;

    /// Record an auxiliary, non-sampled value (e.g. the corrected side of a
    /// post-sampling substitution) for bookkeeping
    fn set_user_attr(&mut self, name: &str, value: ParamValue);
}
