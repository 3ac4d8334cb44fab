//! Linear model families
//!
//! Logistic regression carries the densest correction table in the
//! catalogue: its solver choice constrains the penalty, the penalty
//! constrains the dual formulation and the elastic-net mixing ratio, and a
//! disabled penalty pins the regularization strength.

use crate::error::{Result, TuneError};
use crate::families::{optional_float, Estimator, Family};
use crate::params::ParamSet;
use crate::rules::{Cond, Correction, RuleValue};
use crate::space::SearchSpace;
use serde::{Deserialize, Serialize};

/// Regularization penalty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Penalty {
    L1,
    L2,
    ElasticNet,
}

impl Penalty {
    /// Parse a sampled penalty; `"none"` is the disabled penalty
    pub fn parse(value: &str) -> Result<Option<Penalty>> {
        match value {
            "l1" => Ok(Some(Penalty::L1)),
            "l2" => Ok(Some(Penalty::L2)),
            "elasticnet" => Ok(Some(Penalty::ElasticNet)),
            "none" => Ok(None),
            other => Err(TuneError::InvalidParameter(format!(
                "unknown penalty: {}",
                other
            ))),
        }
    }
}

/// Logistic regression solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Solver {
    Lbfgs,
    Liblinear,
    NewtonCg,
    NewtonCholesky,
    Sag,
    Saga,
}

impl Solver {
    /// Parse a sampled solver name
    pub fn parse(value: &str) -> Result<Solver> {
        match value {
            "lbfgs" => Ok(Solver::Lbfgs),
            "liblinear" => Ok(Solver::Liblinear),
            "newton-cg" => Ok(Solver::NewtonCg),
            "newton-cholesky" => Ok(Solver::NewtonCholesky),
            "sag" => Ok(Solver::Sag),
            "saga" => Ok(Solver::Saga),
            other => Err(TuneError::InvalidParameter(format!(
                "unknown solver: {}",
                other
            ))),
        }
    }

    /// Whether this solver supports the given penalty
    pub fn supports(&self, penalty: Option<Penalty>) -> bool {
        match self {
            Solver::Liblinear => matches!(penalty, Some(Penalty::L1) | Some(Penalty::L2)),
            Solver::Saga => true,
            // The remaining solvers only handle l2 or no penalty at all
            _ => matches!(penalty, Some(Penalty::L2) | None),
        }
    }
}

/// Finalized logistic regression construction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegressionConfig {
    pub penalty: Option<Penalty>,
    pub dual: bool,
    pub tol: f64,
    pub c: f64,
    pub fit_intercept: bool,
    pub intercept_scaling: f64,
    pub class_weight: Option<String>,
    pub solver: Solver,
    pub max_iter: u32,
    pub multi_class: String,
    pub l1_ratio: Option<f64>,
}

impl LogisticRegressionConfig {
    /// Validating constructor. Rejects every solver/penalty/dual/l1_ratio
    /// combination the correction table is supposed to eliminate.
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        let penalty = Penalty::parse(params.require_str("penalty")?)?;
        let solver = Solver::parse(params.require_str("solver")?)?;
        let dual = params.require_bool("dual")?;
        let tol = params.require_float("tol")?;
        let c = params.require_float("c")?;
        let fit_intercept = params.require_bool("fit_intercept")?;
        let intercept_scaling = params.require_float("intercept_scaling")?;
        let class_weight = parse_class_weight(params.require_str("class_weight")?)?;
        let max_iter = params.require_int("max_iter")?;
        let multi_class = params.require_str("multi_class")?;
        let l1_ratio = optional_float(params, "l1_ratio")?;

        if !solver.supports(penalty) {
            return Err(TuneError::InvalidParameter(format!(
                "solver {:?} does not support penalty {:?}",
                solver, penalty
            )));
        }
        if dual && !(solver == Solver::Liblinear && penalty == Some(Penalty::L2)) {
            return Err(TuneError::InvalidParameter(
                "dual formulation requires the liblinear solver with an l2 penalty".into(),
            ));
        }
        match (penalty, l1_ratio) {
            (Some(Penalty::ElasticNet), Some(r)) if (0.0..=1.0).contains(&r) => {}
            (Some(Penalty::ElasticNet), Some(r)) => {
                return Err(TuneError::InvalidParameter(format!(
                    "l1_ratio must lie in [0, 1], got {}",
                    r
                )));
            }
            (Some(Penalty::ElasticNet), None) => {
                return Err(TuneError::InvalidParameter(
                    "elasticnet penalty requires l1_ratio".into(),
                ));
            }
            (_, Some(_)) => {
                return Err(TuneError::InvalidParameter(
                    "l1_ratio is only meaningful with the elasticnet penalty".into(),
                ));
            }
            (_, None) => {}
        }
        if penalty.is_none() && c != 1.0 {
            return Err(TuneError::InvalidParameter(format!(
                "regularization strength must be exactly 1.0 without a penalty, got {}",
                c
            )));
        }
        if tol <= 0.0 {
            return Err(TuneError::InvalidParameter(format!("tol must be positive, got {}", tol)));
        }
        if c <= 0.0 {
            return Err(TuneError::InvalidParameter(format!("C must be positive, got {}", c)));
        }
        if intercept_scaling <= 0.0 {
            return Err(TuneError::InvalidParameter(format!(
                "intercept_scaling must be positive, got {}",
                intercept_scaling
            )));
        }
        if max_iter < 1 {
            return Err(TuneError::InvalidParameter(format!(
                "max_iter must be at least 1, got {}",
                max_iter
            )));
        }
        if !matches!(multi_class, "auto" | "ovr" | "multinomial") {
            return Err(TuneError::InvalidParameter(format!(
                "unknown multi_class: {}",
                multi_class
            )));
        }

        Ok(Self {
            penalty,
            dual,
            tol,
            c,
            fit_intercept,
            intercept_scaling,
            class_weight,
            solver,
            max_iter: max_iter as u32,
            multi_class: multi_class.to_string(),
            l1_ratio,
        })
    }
}

fn parse_class_weight(value: &str) -> Result<Option<String>> {
    match value {
        "none" => Ok(None),
        "balanced" | "balanced_subsample" => Ok(Some(value.to_string())),
        other => Err(TuneError::InvalidParameter(format!(
            "unknown class_weight: {}",
            other
        ))),
    }
}

/// Supported dual formulation per solver
const SOLVER_DUAL: &[(&str, RuleValue)] = &[
    ("lbfgs", RuleValue::Bool(false)),
    ("liblinear", RuleValue::Bool(true)),
    ("newton-cg", RuleValue::Bool(false)),
    ("newton-cholesky", RuleValue::Bool(false)),
    ("sag", RuleValue::Bool(false)),
    ("saga", RuleValue::Bool(false)),
];

/// Valid penalties per solver
const SOLVER_PENALTIES: &[(&str, &[&str])] = &[
    ("lbfgs", &["l2", "none"]),
    ("liblinear", &["l1", "l2"]),
    ("newton-cg", &["l2", "none"]),
    ("newton-cholesky", &["l2", "none"]),
    ("sag", &["l2", "none"]),
    ("saga", &["elasticnet", "l1", "l2", "none"]),
];

const LOGISTIC_REGRESSION_RULES: &[Correction] = &[
    Correction::ForceByKey {
        param: "dual",
        key: "solver",
        table: SOLVER_DUAL,
    },
    Correction::RestrictByKey {
        param: "penalty",
        key: "solver",
        table: SOLVER_PENALTIES,
    },
    Correction::Deactivate {
        param: "l1_ratio",
        when: Cond::Ne("penalty", RuleValue::Str("elasticnet")),
    },
    Correction::Force {
        param: "c",
        value: RuleValue::Float(1.0),
        when: Cond::Eq("penalty", RuleValue::Str("none")),
    },
    // l1 is only reachable through liblinear or saga; neither supports dual there
    Correction::Force {
        param: "dual",
        value: RuleValue::Bool(false),
        when: Cond::Eq("penalty", RuleValue::Str("l1")),
    },
];

/// Space-to-estimator mapper for logistic regression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegressionFamily {
    pub penalty_space: Vec<String>,
    pub tol_space: (f64, f64),
    pub c_space: (f64, f64),
    pub intercept_scaling_space: (f64, f64),
    pub class_weight_space: Vec<String>,
    pub solver_space: Vec<String>,
    pub max_iter_space: (i64, i64),
    pub multi_class_space: Vec<String>,
    pub l1_ratio_space: (f64, f64),
}

impl Default for LogisticRegressionFamily {
    fn default() -> Self {
        Self {
            penalty_space: to_strings(&["l1", "l2", "elasticnet", "none"]),
            tol_space: (1e-6, 1e-3),
            c_space: (0.9, 1.0),
            intercept_scaling_space: (0.5, 1.0),
            class_weight_space: to_strings(&["balanced"]),
            solver_space: to_strings(&[
                "lbfgs",
                "liblinear",
                "newton-cg",
                "newton-cholesky",
                "sag",
                "saga",
            ]),
            max_iter_space: (100, 1000),
            multi_class_space: to_strings(&["auto"]),
            l1_ratio_space: (0.0, 1.0),
        }
    }
}

impl Family for LogisticRegressionFamily {
    fn name(&self) -> &'static str {
        "logistic_regression"
    }

    fn space(&self) -> SearchSpace {
        SearchSpace::new()
            .categorical("penalty", &as_strs(&self.penalty_space))
            .boolean("dual")
            .float("tol", self.tol_space.0, self.tol_space.1)
            .float("c", self.c_space.0, self.c_space.1)
            .boolean("fit_intercept")
            .float(
                "intercept_scaling",
                self.intercept_scaling_space.0,
                self.intercept_scaling_space.1,
            )
            .categorical("class_weight", &as_strs(&self.class_weight_space))
            .categorical("solver", &as_strs(&self.solver_space))
            .int("max_iter", self.max_iter_space.0, self.max_iter_space.1)
            .categorical("multi_class", &as_strs(&self.multi_class_space))
            .float("l1_ratio", self.l1_ratio_space.0, self.l1_ratio_space.1)
    }

    fn corrections(&self) -> &'static [Correction] {
        LOGISTIC_REGRESSION_RULES
    }

    fn construct(&self, params: &ParamSet) -> Result<Estimator> {
        Ok(Estimator::LogisticRegression(
            LogisticRegressionConfig::from_params(params)?,
        ))
    }
}

/// Finalized perceptron construction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerceptronConfig {
    pub penalty: Option<Penalty>,
    pub alpha: f64,
    pub l1_ratio: Option<f64>,
    pub fit_intercept: bool,
    pub max_iter: u32,
    pub tol: f64,
    pub eta0: f64,
    pub shuffle: bool,
}

impl PerceptronConfig {
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        let penalty = Penalty::parse(params.require_str("penalty")?)?;
        let alpha = params.require_float("alpha")?;
        let l1_ratio = optional_float(params, "l1_ratio")?;
        let fit_intercept = params.require_bool("fit_intercept")?;
        let max_iter = params.require_int("max_iter")?;
        let tol = params.require_float("tol")?;
        let eta0 = params.require_float("eta0")?;
        let shuffle = params.require_bool("shuffle")?;

        if alpha <= 0.0 {
            return Err(TuneError::InvalidParameter(format!(
                "alpha must be positive, got {}",
                alpha
            )));
        }
        match (penalty, l1_ratio) {
            (Some(Penalty::ElasticNet), Some(r)) if (0.0..=1.0).contains(&r) => {}
            (Some(Penalty::ElasticNet), _) => {
                return Err(TuneError::InvalidParameter(
                    "elasticnet penalty requires l1_ratio in [0, 1]".into(),
                ));
            }
            (_, Some(_)) => {
                return Err(TuneError::InvalidParameter(
                    "l1_ratio is only meaningful with the elasticnet penalty".into(),
                ));
            }
            (_, None) => {}
        }
        if tol <= 0.0 {
            return Err(TuneError::InvalidParameter(format!("tol must be positive, got {}", tol)));
        }
        if eta0 <= 0.0 {
            return Err(TuneError::InvalidParameter(format!(
                "eta0 must be positive, got {}",
                eta0
            )));
        }
        if max_iter < 1 {
            return Err(TuneError::InvalidParameter(format!(
                "max_iter must be at least 1, got {}",
                max_iter
            )));
        }

        Ok(Self {
            penalty,
            alpha,
            l1_ratio,
            fit_intercept,
            max_iter: max_iter as u32,
            tol,
            eta0,
            shuffle,
        })
    }
}

const PERCEPTRON_RULES: &[Correction] = &[Correction::Deactivate {
    param: "l1_ratio",
    when: Cond::Ne("penalty", RuleValue::Str("elasticnet")),
}];

/// Space-to-estimator mapper for the perceptron
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerceptronFamily {
    pub penalty_space: Vec<String>,
    pub alpha_space: (f64, f64),
    pub l1_ratio_space: (f64, f64),
    pub max_iter_space: (i64, i64),
    pub tol_space: (f64, f64),
    pub eta0_space: (f64, f64),
}

impl Default for PerceptronFamily {
    fn default() -> Self {
        Self {
            penalty_space: to_strings(&["l1", "l2", "elasticnet", "none"]),
            alpha_space: (1e-5, 1e-1),
            l1_ratio_space: (0.0, 1.0),
            max_iter_space: (500, 2000),
            tol_space: (1e-5, 1e-2),
            eta0_space: (0.5, 1.5),
        }
    }
}

impl Family for PerceptronFamily {
    fn name(&self) -> &'static str {
        "perceptron"
    }

    fn space(&self) -> SearchSpace {
        SearchSpace::new()
            .categorical("penalty", &as_strs(&self.penalty_space))
            .log_float("alpha", self.alpha_space.0, self.alpha_space.1)
            .float("l1_ratio", self.l1_ratio_space.0, self.l1_ratio_space.1)
            .boolean("fit_intercept")
            .int("max_iter", self.max_iter_space.0, self.max_iter_space.1)
            .float("tol", self.tol_space.0, self.tol_space.1)
            .float("eta0", self.eta0_space.0, self.eta0_space.1)
            .boolean("shuffle")
    }

    fn corrections(&self) -> &'static [Correction] {
        PERCEPTRON_RULES
    }

    fn construct(&self, params: &ParamSet) -> Result<Estimator> {
        Ok(Estimator::Perceptron(PerceptronConfig::from_params(params)?))
    }
}

pub(crate) fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub(crate) fn as_strs(values: &[String]) -> Vec<&str> {
    values.iter().map(|v| v.as_str()).collect()
}
