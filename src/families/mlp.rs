//! Multilayer perceptron family

use crate::error::{Result, TuneError};
use crate::families::{optional_bool, optional_float, optional_str, Estimator, Family};
use crate::families::linear_model::{as_strs, to_strings};
use crate::params::ParamSet;
use crate::rules::{Cond, Correction, RuleValue};
use crate::space::SearchSpace;
use serde::{Deserialize, Serialize};

/// Hidden-layer activation function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Identity,
    Logistic,
    Tanh,
    Relu,
}

impl Activation {
    pub fn parse(value: &str) -> Result<Activation> {
        match value {
            "identity" => Ok(Activation::Identity),
            "logistic" => Ok(Activation::Logistic),
            "tanh" => Ok(Activation::Tanh),
            "relu" => Ok(Activation::Relu),
            other => Err(TuneError::InvalidParameter(format!(
                "unknown activation: {}",
                other
            ))),
        }
    }
}

/// Weight optimization backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MlpSolver {
    Lbfgs,
    Sgd,
    Adam,
}

impl MlpSolver {
    pub fn parse(value: &str) -> Result<MlpSolver> {
        match value {
            "lbfgs" => Ok(MlpSolver::Lbfgs),
            "sgd" => Ok(MlpSolver::Sgd),
            "adam" => Ok(MlpSolver::Adam),
            other => Err(TuneError::InvalidParameter(format!(
                "unknown solver: {}",
                other
            ))),
        }
    }
}

/// Finalized multilayer perceptron construction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlpConfig {
    pub hidden_layer_size: u32,
    pub activation: Activation,
    pub solver: MlpSolver,
    pub alpha: f64,
    /// Step-size schedule, only meaningful under stochastic gradient descent
    pub learning_rate: Option<String>,
    pub learning_rate_init: f64,
    pub momentum: Option<f64>,
    pub nesterovs_momentum: Option<bool>,
    pub early_stopping: bool,
    pub validation_fraction: Option<f64>,
    pub max_iter: u32,
}

impl MlpConfig {
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        let hidden_layer_size = params.require_int("hidden_layer_size")?;
        let activation = Activation::parse(params.require_str("activation")?)?;
        let solver = MlpSolver::parse(params.require_str("solver")?)?;
        let alpha = params.require_float("alpha")?;
        let learning_rate = optional_str(params, "learning_rate")?.map(str::to_string);
        let learning_rate_init = params.require_float("learning_rate_init")?;
        let momentum = optional_float(params, "momentum")?;
        let nesterovs_momentum = optional_bool(params, "nesterovs_momentum")?;
        let early_stopping = params.require_bool("early_stopping")?;
        let validation_fraction = optional_float(params, "validation_fraction")?;
        let max_iter = params.require_int("max_iter")?;

        if hidden_layer_size < 1 {
            return Err(TuneError::InvalidParameter(format!(
                "hidden_layer_size must be at least 1, got {}",
                hidden_layer_size
            )));
        }
        if alpha <= 0.0 {
            return Err(TuneError::InvalidParameter(format!(
                "alpha must be positive, got {}",
                alpha
            )));
        }
        if let Some(schedule) = &learning_rate {
            if !matches!(schedule.as_str(), "constant" | "invscaling" | "adaptive") {
                return Err(TuneError::InvalidParameter(format!(
                    "unknown learning_rate schedule: {}",
                    schedule
                )));
            }
        }
        if learning_rate_init <= 0.0 {
            return Err(TuneError::InvalidParameter(format!(
                "learning_rate_init must be positive, got {}",
                learning_rate_init
            )));
        }
        if solver != MlpSolver::Sgd {
            if learning_rate.is_some() || momentum.is_some() || nesterovs_momentum.is_some() {
                return Err(TuneError::InvalidParameter(format!(
                    "learning_rate, momentum and nesterovs_momentum only apply to the sgd solver, not {:?}",
                    solver
                )));
            }
        }
        if let Some(momentum) = momentum {
            if !(0.0 < momentum && momentum <= 1.0) {
                return Err(TuneError::InvalidParameter(format!(
                    "momentum must lie in (0, 1], got {}",
                    momentum
                )));
            }
        }
        if early_stopping != validation_fraction.is_some() {
            return Err(TuneError::InvalidParameter(
                "validation_fraction must be set exactly when early_stopping is enabled".into(),
            ));
        }
        if let Some(fraction) = validation_fraction {
            if !(0.0 < fraction && fraction < 1.0) {
                return Err(TuneError::InvalidParameter(format!(
                    "validation_fraction must lie in (0, 1), got {}",
                    fraction
                )));
            }
        }
        if max_iter < 1 {
            return Err(TuneError::InvalidParameter(format!(
                "max_iter must be at least 1, got {}",
                max_iter
            )));
        }

        Ok(Self {
            hidden_layer_size: hidden_layer_size as u32,
            activation,
            solver,
            alpha,
            learning_rate,
            learning_rate_init,
            momentum,
            nesterovs_momentum,
            early_stopping,
            validation_fraction,
            max_iter: max_iter as u32,
        })
    }
}

const MLP_RULES: &[Correction] = &[
    Correction::Deactivate {
        param: "learning_rate",
        when: Cond::Ne("solver", RuleValue::Str("sgd")),
    },
    Correction::Deactivate {
        param: "momentum",
        when: Cond::Ne("solver", RuleValue::Str("sgd")),
    },
    Correction::Deactivate {
        param: "nesterovs_momentum",
        when: Cond::Ne("solver", RuleValue::Str("sgd")),
    },
    Correction::Deactivate {
        param: "validation_fraction",
        when: Cond::IsFalse("early_stopping"),
    },
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpFamily {
    pub hidden_layer_size_space: (i64, i64),
    pub activation_space: Vec<String>,
    pub solver_space: Vec<String>,
    pub alpha_space: (f64, f64),
    pub learning_rate_space: Vec<String>,
    pub learning_rate_init_space: (f64, f64),
    pub momentum_space: (f64, f64),
    pub validation_fraction_space: (f64, f64),
    pub max_iter_space: (i64, i64),
}

impl Default for MlpFamily {
    fn default() -> Self {
        Self {
            hidden_layer_size_space: (16, 256),
            activation_space: to_strings(&["identity", "logistic", "tanh", "relu"]),
            solver_space: to_strings(&["lbfgs", "sgd", "adam"]),
            alpha_space: (1e-6, 1e-2),
            learning_rate_space: to_strings(&["constant", "invscaling", "adaptive"]),
            learning_rate_init_space: (1e-4, 1e-1),
            momentum_space: (0.5, 0.95),
            validation_fraction_space: (0.1, 0.3),
            max_iter_space: (200, 1000),
        }
    }
}

impl Family for MlpFamily {
    fn name(&self) -> &'static str {
        "mlp"
    }

    fn space(&self) -> SearchSpace {
        SearchSpace::new()
            .log_int(
                "hidden_layer_size",
                self.hidden_layer_size_space.0,
                self.hidden_layer_size_space.1,
            )
            .categorical("activation", &as_strs(&self.activation_space))
            .categorical("solver", &as_strs(&self.solver_space))
            .log_float("alpha", self.alpha_space.0, self.alpha_space.1)
            .categorical("learning_rate", &as_strs(&self.learning_rate_space))
            .log_float(
                "learning_rate_init",
                self.learning_rate_init_space.0,
                self.learning_rate_init_space.1,
            )
            .float("momentum", self.momentum_space.0, self.momentum_space.1)
            .boolean("nesterovs_momentum")
            .boolean("early_stopping")
            .float(
                "validation_fraction",
                self.validation_fraction_space.0,
                self.validation_fraction_space.1,
            )
            .int("max_iter", self.max_iter_space.0, self.max_iter_space.1)
    }

    fn corrections(&self) -> &'static [Correction] {
        MLP_RULES
    }

    fn construct(&self, params: &ParamSet) -> Result<Estimator> {
        Ok(Estimator::Mlp(MlpConfig::from_params(params)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;
    use crate::trial::{FixedTrial, RandomTrial};

    fn fixed_trial(solver: &str, early_stopping: bool) -> FixedTrial {
        FixedTrial::new()
            .with("hidden_layer_size", ParamValue::Int(64))
            .with("activation", "relu".into())
            .with("solver", solver.into())
            .with("alpha", ParamValue::Float(1e-4))
            .with("learning_rate", "adaptive".into())
            .with("learning_rate_init", ParamValue::Float(1e-3))
            .with("momentum", ParamValue::Float(0.9))
            .with("nesterovs_momentum", ParamValue::Bool(true))
            .with("early_stopping", ParamValue::Bool(early_stopping))
            .with("validation_fraction", ParamValue::Float(0.15))
            .with("max_iter", ParamValue::Int(400))
    }

    #[test]
    fn test_sgd_only_fields_deactivated_for_adam() {
        let family = MlpFamily::default();
        let mut trial = fixed_trial("adam", true);
        match family.sample_estimator(Some(&mut trial)).unwrap() {
            Estimator::Mlp(config) => {
                assert_eq!(config.learning_rate, None);
                assert_eq!(config.momentum, None);
                assert_eq!(config.nesterovs_momentum, None);
                assert_eq!(config.validation_fraction, Some(0.15));
            }
            other => panic!("unexpected estimator: {:?}", other),
        }
    }

    #[test]
    fn test_sgd_keeps_schedule_and_momentum() {
        let family = MlpFamily::default();
        let mut trial = fixed_trial("sgd", false);
        match family.sample_estimator(Some(&mut trial)).unwrap() {
            Estimator::Mlp(config) => {
                assert_eq!(config.learning_rate.as_deref(), Some("adaptive"));
                assert_eq!(config.momentum, Some(0.9));
                assert_eq!(config.nesterovs_momentum, Some(true));
                assert_eq!(config.validation_fraction, None);
            }
            other => panic!("unexpected estimator: {:?}", other),
        }
    }

    #[test]
    fn test_constructor_rejects_momentum_for_lbfgs() {
        let family = MlpFamily::default();
        let mut trial = fixed_trial("lbfgs", true);
        let params = family.space().suggest_all(&mut trial).unwrap();
        assert!(family.construct(&params).is_err());
    }

    #[test]
    fn test_random_sweep_always_constructs() {
        let family = MlpFamily::default();
        for seed in 0..200 {
            let mut trial = RandomTrial::seeded(seed);
            let result = family.sample_estimator(Some(&mut trial));
            assert!(result.is_ok(), "seed {}: {:?}", seed, result.err());
        }
    }
}
