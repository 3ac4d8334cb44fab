//! Random trial backend

use crate::error::{Result, TuneError};
use crate::params::{ParamSet, ParamValue};
use crate::trial::Trial;
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Trial backend drawing every suggestion independently and uniformly
/// (log-uniformly for log-scale domains).
///
/// Each instance is a single trial: suggestions are recorded under their
/// parameter name, corrections land in the user-attribute map.
#[derive(Debug)]
pub struct RandomTrial {
    rng: Xoshiro256PlusPlus,
    params: ParamSet,
    user_attrs: ParamSet,
}

impl RandomTrial {
    /// Create a trial seeded from entropy
    pub fn new() -> Self {
        Self::from_rng(Xoshiro256PlusPlus::from_entropy())
    }

    /// Create a reproducible trial from a seed
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(Xoshiro256PlusPlus::seed_from_u64(seed))
    }

    fn from_rng(rng: Xoshiro256PlusPlus) -> Self {
        Self {
            rng,
            params: ParamSet::new(),
            user_attrs: ParamSet::new(),
        }
    }

    /// Values as originally suggested, in suggestion order
    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    /// Auxiliary values recorded through `set_user_attr`
    pub fn user_attrs(&self) -> &ParamSet {
        &self.user_attrs
    }

    fn check_bounds<T: PartialOrd + std::fmt::Display>(
        name: &str,
        low: T,
        high: T,
    ) -> Result<()> {
        if low > high {
            return Err(TuneError::InvalidDomain(format!(
                "{}: low {} exceeds high {}",
                name, low, high
            )));
        }
        Ok(())
    }
}

impl Default for RandomTrial {
    fn default() -> Self {
        Self::new()
    }
}

impl Trial for RandomTrial {
    fn suggest_categorical(&mut self, name: &str, choices: &[&str]) -> Result<String> {
        if choices.is_empty() {
            return Err(TuneError::InvalidDomain(format!(
                "{}: categorical domain has no choices",
                name
            )));
        }
        let idx = self.rng.gen_range(0..choices.len());
        let value = choices[idx].to_string();
        self.params.set(name, ParamValue::Str(value.clone()));
        Ok(value)
    }

    fn suggest_float(&mut self, name: &str, low: f64, high: f64, log: bool) -> Result<f64> {
        Self::check_bounds(name, low, high)?;
        let value = if log {
            if low <= 0.0 {
                return Err(TuneError::InvalidDomain(format!(
                    "{}: log-scale domain requires a positive lower bound",
                    name
                )));
            }
            self.rng
                .gen_range(low.ln()..=high.ln())
                .exp()
                .clamp(low, high)
        } else if low < high {
            self.rng.gen_range(low..=high)
        } else {
            low
        };
        self.params.set(name, ParamValue::Float(value));
        Ok(value)
    }

    fn suggest_int(&mut self, name: &str, low: i64, high: i64, log: bool) -> Result<i64> {
        Self::check_bounds(name, low, high)?;
        let value = if log {
            if low <= 0 {
                return Err(TuneError::InvalidDomain(format!(
                    "{}: log-scale domain requires a positive lower bound",
                    name
                )));
            }
            let drawn = self
                .rng
                .gen_range((low as f64).ln()..=(high as f64).ln())
                .exp()
                .round() as i64;
            drawn.clamp(low, high)
        } else if low < high {
            self.rng.gen_range(low..=high)
        } else {
            low
        };
        self.params.set(name, ParamValue::Int(value));
        Ok(value)
    }

    fn suggest_bool(&mut self, name: &str) -> Result<bool> {
        let value = self.rng.gen_bool(0.5);
        self.params.set(name, ParamValue::Bool(value));
        Ok(value)
    }

    fn set_user_attr(&mut self, name: &str, value: ParamValue) {
        self.user_attrs.set(name, value);
    }
}
