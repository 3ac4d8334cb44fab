//! Table-driven post-sampling corrections
//!
//! A correction resolves an invalid or redundant combination of sampled
//! values before the parameter set reaches an estimator constructor. Rules
//! are plain data (`const` tables per family) applied in declaration order,
//! so a family's rule set can be inspected and unit-tested without any
//! sampling backend.
//!
//! Applying a correction is not an error path: the substitution is silent
//! except for a debug event and a user-attribute echo on the trial, which
//! together keep both the original and the corrected value auditable.

use crate::params::{ParamSet, ParamValue};
use crate::trial::Trial;
use rand::{Rng, RngCore};
use tracing::debug;

/// A const-constructible literal used inside rule tables
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleValue {
    Str(&'static str),
    Float(f64),
    Int(i64),
    Bool(bool),
    None,
}

impl RuleValue {
    /// Convert to an owned parameter value
    pub fn to_param(self) -> ParamValue {
        match self {
            RuleValue::Str(v) => ParamValue::Str(v.to_string()),
            RuleValue::Float(v) => ParamValue::Float(v),
            RuleValue::Int(v) => ParamValue::Int(v),
            RuleValue::Bool(v) => ParamValue::Bool(v),
            RuleValue::None => ParamValue::None,
        }
    }

    fn matches(self, value: &ParamValue) -> bool {
        match (self, value) {
            (RuleValue::Str(a), ParamValue::Str(b)) => a == b,
            (RuleValue::Float(a), ParamValue::Float(b)) => a == *b,
            (RuleValue::Int(a), ParamValue::Int(b)) => a == *b,
            (RuleValue::Bool(a), ParamValue::Bool(b)) => a == *b,
            (RuleValue::None, ParamValue::None) => true,
            _ => false,
        }
    }
}

/// Condition guarding a correction. A condition over an absent parameter
/// never holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cond {
    /// Unconditional
    Always,
    /// Parameter equals the given literal
    Eq(&'static str, RuleValue),
    /// Parameter is present and differs from the given literal
    Ne(&'static str, RuleValue),
    /// Parameter is present but deactivated
    IsNone(&'static str),
    /// Boolean parameter is present and false
    IsFalse(&'static str),
    /// Categorical parameter is present and outside the given set
    NotIn(&'static str, &'static [&'static str]),
}

impl Cond {
    /// Evaluate against a parameter set
    pub fn holds(&self, params: &ParamSet) -> bool {
        match self {
            Cond::Always => true,
            Cond::Eq(name, value) => params.get(name).is_some_and(|v| value.matches(v)),
            Cond::Ne(name, value) => params.get(name).is_some_and(|v| !value.matches(v)),
            Cond::IsNone(name) => params.get(name).is_some_and(|v| v.is_none()),
            Cond::IsFalse(name) => params.get(name).and_then(|v| v.as_bool()) == Some(false),
            Cond::NotIn(name, allowed) => params
                .get(name)
                .and_then(|v| v.as_str())
                .is_some_and(|v| !allowed.contains(&v)),
        }
    }
}

/// One deterministic post-sampling adjustment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correction {
    /// Overwrite `param` with `value` when `when` holds
    Force {
        param: &'static str,
        value: RuleValue,
        when: Cond,
    },
    /// Set `param` to the deactivated value when `when` holds
    Deactivate { param: &'static str, when: Cond },
    /// Drop `param` from the set entirely when `when` holds
    Remove { param: &'static str, when: Cond },
    /// Overwrite `param` with the value the current value of `key` maps to
    ForceByKey {
        param: &'static str,
        key: &'static str,
        table: &'static [(&'static str, RuleValue)],
    },
    /// If `param` is outside the set the current value of `key` maps to,
    /// substitute a member of that set chosen uniformly at random
    RestrictByKey {
        param: &'static str,
        key: &'static str,
        table: &'static [(&'static str, &'static [&'static str])],
    },
}

/// Apply an ordered rule list to a freshly sampled parameter set.
///
/// Every change is echoed onto the trial via `set_user_attr` under the
/// corrected parameter's name; the trial's own record keeps the original.
pub fn apply(
    rules: &[Correction],
    params: &mut ParamSet,
    trial: &mut dyn Trial,
    rng: &mut dyn RngCore,
) {
    for rule in rules {
        match rule {
            Correction::Force { param, value, when } => {
                if when.holds(params) {
                    correct(params, trial, param, value.to_param());
                }
            }
            Correction::Deactivate { param, when } => {
                if when.holds(params) && params.get(param).is_some_and(|v| !v.is_none()) {
                    correct(params, trial, param, ParamValue::None);
                }
            }
            Correction::Remove { param, when } => {
                if when.holds(params) && params.remove(param).is_some() {
                    debug!(param, "removed sampled parameter");
                    trial.set_user_attr(param, ParamValue::None);
                }
            }
            Correction::ForceByKey { param, key, table } => {
                let Some(key_value) = params.get(key).and_then(|v| v.as_str()) else {
                    continue;
                };
                if let Some((_, value)) = table.iter().find(|(k, _)| *k == key_value) {
                    correct(params, trial, param, value.to_param());
                }
            }
            Correction::RestrictByKey { param, key, table } => {
                let Some(key_value) = params.get(key).and_then(|v| v.as_str()) else {
                    continue;
                };
                let Some((_, valid)) = table.iter().find(|(k, _)| *k == key_value) else {
                    continue;
                };
                if valid.is_empty() {
                    continue;
                }
                let current = params.get(param).and_then(|v| v.as_str());
                if current.map_or(true, |v| !valid.contains(&v)) {
                    let substitute = valid[rng.gen_range(0..valid.len())];
                    correct(params, trial, param, ParamValue::Str(substitute.to_string()));
                }
            }
        }
    }
}

fn correct(params: &mut ParamSet, trial: &mut dyn Trial, param: &str, value: ParamValue) {
    if params.get(param) == Some(&value) {
        return;
    }
    debug!(param, from = ?params.get(param), to = ?value, "corrected sampled parameter");
    params.set(param, value.clone());
    trial.set_user_attr(param, value);
}
