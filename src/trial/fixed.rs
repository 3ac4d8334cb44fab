//! Fixed trial backend

use crate::error::{Result, TuneError};
use crate::params::{ParamSet, ParamValue};
use crate::trial::Trial;

/// Trial backend that returns pre-specified values by parameter name.
///
/// Used to pin exact sampled combinations when testing correction rules.
/// Suggesting a name that was not pre-specified is an error; declared bounds
/// and choice sets are deliberately not enforced, so invalid combinations
/// can be forced through the correction path.
#[derive(Debug, Clone, Default)]
pub struct FixedTrial {
    values: ParamSet,
    user_attrs: ParamSet,
}

impl FixedTrial {
    /// Create an empty fixed trial
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-specify the value returned for `name`
    pub fn with(mut self, name: &str, value: ParamValue) -> Self {
        self.values.set(name, value);
        self
    }

    /// Auxiliary values recorded through `set_user_attr`
    pub fn user_attrs(&self) -> &ParamSet {
        &self.user_attrs
    }

    fn lookup(&self, name: &str) -> Result<&ParamValue> {
        self.values
            .get(name)
            .ok_or_else(|| TuneError::MissingParameter(format!("fixed trial has no value for {}", name)))
    }
}

impl Trial for FixedTrial {
    fn suggest_categorical(&mut self, name: &str, _choices: &[&str]) -> Result<String> {
        match self.lookup(name)? {
            ParamValue::Str(v) => Ok(v.clone()),
            other => Err(TuneError::InvalidParameter(format!(
                "fixed trial value for {} is not categorical: {:?}",
                name, other
            ))),
        }
    }

    fn suggest_float(&mut self, name: &str, _low: f64, _high: f64, _log: bool) -> Result<f64> {
        self.lookup(name)?.as_float().ok_or_else(|| {
            TuneError::InvalidParameter(format!("fixed trial value for {} is not a float", name))
        })
    }

    fn suggest_int(&mut self, name: &str, _low: i64, _high: i64, _log: bool) -> Result<i64> {
        self.lookup(name)?.as_int().ok_or_else(|| {
            TuneError::InvalidParameter(format!("fixed trial value for {} is not an integer", name))
        })
    }

    fn suggest_bool(&mut self, name: &str) -> Result<bool> {
        self.lookup(name)?.as_bool().ok_or_else(|| {
            TuneError::InvalidParameter(format!("fixed trial value for {} is not a boolean", name))
        })
    }

    fn set_user_attr(&mut self, name: &str, value: ParamValue) {
        self.user_attrs.set(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returns_preset_values() {
        let mut trial = FixedTrial::new()
            .with("kernel", "poly".into())
            .with("degree", ParamValue::Int(3))
            .with("c", ParamValue::Float(0.95))
            .with("shrinking", ParamValue::Bool(true));

        assert_eq!(
            trial.suggest_categorical("kernel", &["linear", "poly"]).unwrap(),
            "poly"
        );
        assert_eq!(trial.suggest_int("degree", 1, 5, false).unwrap(), 3);
        assert_eq!(trial.suggest_float("c", 0.9, 1.0, false).unwrap(), 0.95);
        assert!(trial.suggest_bool("shrinking").unwrap());
    }

    #[test]
    fn test_missing_name_is_an_error() {
        let mut trial = FixedTrial::new();
        assert!(matches!(
            trial.suggest_float("tol", 0.0, 1.0, false),
            Err(TuneError::MissingParameter(_))
        ));
    }

    #[test]
    fn test_type_mismatch_is_an_error() {
        let mut trial = FixedTrial::new().with("degree", "three".into());
        assert!(trial.suggest_int("degree", 1, 5, false).is_err());
    }
}
