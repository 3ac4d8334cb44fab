//! Search-space declarations
//!
//! A `SearchSpace` is an ordered collection of named hyperparameter domains.
//! It is declared once per estimator family and is immutable afterwards;
//! drawing values happens through an external [`Trial`](crate::trial::Trial)
//! handle, one suggestion per domain in declaration order.

use crate::error::{Result, TuneError};
use crate::params::{ParamSet, ParamValue};
use crate::trial::Trial;
use serde::{Deserialize, Serialize};

/// A named, bounded space of candidate values for one hyperparameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Domain {
    /// Finite ordered set of discrete string values
    Categorical(Vec<String>),
    /// Closed real interval, optionally sampled on a log scale
    Float { low: f64, high: f64, log: bool },
    /// Closed integer interval, optionally sampled on a log scale
    Int { low: i64, high: i64, log: bool },
    /// Boolean toggle
    Bool,
}

/// Ordered collection of named domains for one estimator family
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    domains: Vec<(String, Domain)>,
}

impl SearchSpace {
    /// Create an empty search space
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a categorical domain
    pub fn categorical(mut self, name: &str, choices: &[&str]) -> Self {
        let choices = choices.iter().map(|c| c.to_string()).collect();
        self.domains
            .push((name.to_string(), Domain::Categorical(choices)));
        self
    }

    /// Add a linear-scale float domain
    pub fn float(self, name: &str, low: f64, high: f64) -> Self {
        self.float_scaled(name, low, high, false)
    }

    /// Add a log-scale float domain
    pub fn log_float(self, name: &str, low: f64, high: f64) -> Self {
        self.float_scaled(name, low, high, true)
    }

    fn float_scaled(mut self, name: &str, low: f64, high: f64, log: bool) -> Self {
        self.domains
            .push((name.to_string(), Domain::Float { low, high, log }));
        self
    }

    /// Add a linear-scale integer domain
    pub fn int(mut self, name: &str, low: i64, high: i64) -> Self {
        self.domains
            .push((name.to_string(), Domain::Int { low, high, log: false }));
        self
    }

    /// Add a log-scale integer domain
    pub fn log_int(mut self, name: &str, low: i64, high: i64) -> Self {
        self.domains
            .push((name.to_string(), Domain::Int { low, high, log: true }));
        self
    }

    /// Add a boolean toggle domain
    pub fn boolean(mut self, name: &str) -> Self {
        self.domains.push((name.to_string(), Domain::Bool));
        self
    }

    /// Number of declared domains
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Whether no domains are declared
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Iterate domains in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Domain)> {
        self.domains.iter().map(|(n, d)| (n.as_str(), d))
    }

    /// Check every domain declaration for well-formedness
    pub fn validate(&self) -> Result<()> {
        for (name, domain) in self.iter() {
            match domain {
                Domain::Categorical(choices) => {
                    if choices.is_empty() {
                        return Err(TuneError::InvalidDomain(format!(
                            "{}: categorical domain has no choices",
                            name
                        )));
                    }
                }
                Domain::Float { low, high, log } => {
                    if !(low <= high) {
                        return Err(TuneError::InvalidDomain(format!(
                            "{}: low {} exceeds high {}",
                            name, low, high
                        )));
                    }
                    if *log && *low <= 0.0 {
                        return Err(TuneError::InvalidDomain(format!(
                            "{}: log-scale domain requires a positive lower bound, got {}",
                            name, low
                        )));
                    }
                }
                Domain::Int { low, high, log } => {
                    if low > high {
                        return Err(TuneError::InvalidDomain(format!(
                            "{}: low {} exceeds high {}",
                            name, low, high
                        )));
                    }
                    if *log && *low <= 0 {
                        return Err(TuneError::InvalidDomain(format!(
                            "{}: log-scale domain requires a positive lower bound, got {}",
                            name, low
                        )));
                    }
                }
                Domain::Bool => {}
            }
        }
        Ok(())
    }

    /// Draw one value per domain, in declaration order, through the trial
    /// handle. The order only affects the trial's internal bookkeeping.
    pub fn suggest_all(&self, trial: &mut dyn Trial) -> Result<ParamSet> {
        self.validate()?;

        let mut params = ParamSet::new();
        for (name, domain) in self.iter() {
            let value = match domain {
                Domain::Categorical(choices) => {
                    let refs: Vec<&str> = choices.iter().map(|c| c.as_str()).collect();
                    ParamValue::Str(trial.suggest_categorical(name, &refs)?)
                }
                Domain::Float { low, high, log } => {
                    ParamValue::Float(trial.suggest_float(name, *low, *high, *log)?)
                }
                Domain::Int { low, high, log } => {
                    ParamValue::Int(trial.suggest_int(name, *low, *high, *log)?)
                }
                Domain::Bool => ParamValue::Bool(trial.suggest_bool(name)?),
            };
            params.set(name, value);
        }
        Ok(params)
    }
}
