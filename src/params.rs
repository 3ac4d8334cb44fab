//! Sampled parameter sets
//!
//! A `ParamSet` is produced once per sampling invocation, mutated in place by
//! correction rules, and handed to an estimator constructor. It preserves
//! insertion order so a finalized set reads in the family's declaration order.

use crate::error::{Result, TuneError};
use serde::{Deserialize, Serialize};

/// A single sampled hyperparameter value.
///
/// `None` represents a deactivated or intentionally absent hyperparameter
/// (e.g. `l1_ratio` when the penalty is not elastic-net).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Float(f64),
    Int(i64),
    Str(String),
    Bool(bool),
    None,
}

impl ParamValue {
    /// Get as float (ints widen)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether this is the deactivated value
    pub fn is_none(&self) -> bool {
        matches!(self, ParamValue::None)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

/// An insertion-ordered mapping from parameter name to sampled value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamSet {
    entries: Vec<(String, ParamValue)>,
}

impl ParamSet {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a value, keeping the original position on overwrite
    pub fn set(&mut self, name: &str, value: ParamValue) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// Look up a value by name
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Remove an entry entirely. Returns the removed value, if present.
    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        let idx = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Whether the set contains an entry under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Required lookup: error if absent
    pub fn require(&self, name: &str) -> Result<&ParamValue> {
        self.get(name)
            .ok_or_else(|| TuneError::MissingParameter(name.to_string()))
    }

    /// Required float (deactivated values are an error)
    pub fn require_float(&self, name: &str) -> Result<f64> {
        self.require(name)?.as_float().ok_or_else(|| {
            TuneError::InvalidParameter(format!("{} is not a float", name))
        })
    }

    /// Required integer
    pub fn require_int(&self, name: &str) -> Result<i64> {
        self.require(name)?.as_int().ok_or_else(|| {
            TuneError::InvalidParameter(format!("{} is not an integer", name))
        })
    }

    /// Required string
    pub fn require_str(&self, name: &str) -> Result<&str> {
        self.require(name)?.as_str().ok_or_else(|| {
            TuneError::InvalidParameter(format!("{} is not a string", name))
        })
    }

    /// Required bool
    pub fn require_bool(&self, name: &str) -> Result<bool> {
        self.require(name)?.as_bool().ok_or_else(|| {
            TuneError::InvalidParameter(format!("{} is not a boolean", name))
        })
    }

    /// Export as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
