//! Support-vector families

use crate::error::{Result, TuneError};
use crate::families::{optional_int, Estimator, Family};
use crate::families::linear_model::{as_strs, to_strings};
use crate::params::ParamSet;
use crate::rules::{Cond, Correction, RuleValue};
use crate::space::SearchSpace;
use serde::{Deserialize, Serialize};

/// Kernel function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kernel {
    Linear,
    Poly,
    Rbf,
    Sigmoid,
}

impl Kernel {
    pub fn parse(value: &str) -> Result<Kernel> {
        match value {
            "linear" => Ok(Kernel::Linear),
            "poly" => Ok(Kernel::Poly),
            "rbf" => Ok(Kernel::Rbf),
            "sigmoid" => Ok(Kernel::Sigmoid),
            other => Err(TuneError::InvalidParameter(format!(
                "unknown kernel: {}",
                other
            ))),
        }
    }
}

/// Kernel coefficient policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gamma {
    Scale,
    Auto,
}

impl Gamma {
    pub fn parse(value: &str) -> Result<Gamma> {
        match value {
            "scale" => Ok(Gamma::Scale),
            "auto" => Ok(Gamma::Auto),
            other => Err(TuneError::InvalidParameter(format!(
                "unknown gamma: {}",
                other
            ))),
        }
    }
}

/// Finalized C-support vector classifier construction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvcConfig {
    pub kernel: Kernel,
    pub degree: u32,
    pub gamma: Gamma,
    pub coef0: f64,
    pub tol: f64,
    pub c: f64,
    pub class_weight: Option<String>,
    pub shrinking: bool,
    pub probability: bool,
    /// Only present when probability estimation is enabled
    pub random_state: Option<u64>,
}

impl SvcConfig {
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        let kernel = Kernel::parse(params.require_str("kernel")?)?;
        let degree = params.require_int("degree")?;
        let gamma = Gamma::parse(params.require_str("gamma")?)?;
        let coef0 = params.require_float("coef0")?;
        let tol = params.require_float("tol")?;
        let c = params.require_float("c")?;
        let class_weight = match params.require_str("class_weight")? {
            "none" => None,
            "balanced" => Some("balanced".to_string()),
            other => {
                return Err(TuneError::InvalidParameter(format!(
                    "unknown class_weight: {}",
                    other
                )));
            }
        };
        let shrinking = params.require_bool("shrinking")?;
        let probability = params.require_bool("probability")?;
        let random_state = optional_int(params, "random_state")?;

        validate_common(c, tol, degree)?;
        if random_state.is_some() && !probability {
            return Err(TuneError::InvalidParameter(
                "random_state is only meaningful when probability estimation is enabled".into(),
            ));
        }
        if let Some(seed) = random_state {
            if seed < 0 {
                return Err(TuneError::InvalidParameter(format!(
                    "random_state must be non-negative, got {}",
                    seed
                )));
            }
        }

        Ok(Self {
            kernel,
            degree: degree as u32,
            gamma,
            coef0,
            tol,
            c,
            class_weight,
            shrinking,
            probability,
            random_state: random_state.map(|s| s as u64),
        })
    }
}

fn validate_common(c: f64, tol: f64, degree: i64) -> Result<()> {
    if c <= 0.0 {
        return Err(TuneError::InvalidParameter(format!("C must be positive, got {}", c)));
    }
    if tol <= 0.0 {
        return Err(TuneError::InvalidParameter(format!("tol must be positive, got {}", tol)));
    }
    if degree < 1 {
        return Err(TuneError::InvalidParameter(format!(
            "degree must be at least 1, got {}",
            degree
        )));
    }
    Ok(())
}

const SVC_RULES: &[Correction] = &[Correction::Remove {
    param: "random_state",
    when: Cond::IsFalse("probability"),
}];

/// Space-to-estimator mapper for the C-support vector classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvcFamily {
    pub kernel_space: Vec<String>,
    pub degree_space: (i64, i64),
    pub gamma_space: Vec<String>,
    pub coef0_space: (f64, f64),
    pub tol_space: (f64, f64),
    pub c_space: (f64, f64),
    pub class_weight_space: Vec<String>,
    pub random_state_space: (i64, i64),
}

impl Default for SvcFamily {
    fn default() -> Self {
        Self {
            kernel_space: to_strings(&["linear", "poly", "rbf", "sigmoid"]),
            degree_space: (1, 5),
            gamma_space: to_strings(&["scale", "auto"]),
            coef0_space: (0.0, 0.5),
            tol_space: (1e-6, 1e-3),
            c_space: (0.9, 1.0),
            class_weight_space: to_strings(&["balanced"]),
            random_state_space: (0, 10_000),
        }
    }
}

impl Family for SvcFamily {
    fn name(&self) -> &'static str {
        "svc"
    }

    fn space(&self) -> SearchSpace {
        SearchSpace::new()
            .categorical("kernel", &as_strs(&self.kernel_space))
            .int("degree", self.degree_space.0, self.degree_space.1)
            .categorical("gamma", &as_strs(&self.gamma_space))
            .float("coef0", self.coef0_space.0, self.coef0_space.1)
            .float("tol", self.tol_space.0, self.tol_space.1)
            .float("c", self.c_space.0, self.c_space.1)
            .categorical("class_weight", &as_strs(&self.class_weight_space))
            .boolean("shrinking")
            .boolean("probability")
            .int(
                "random_state",
                self.random_state_space.0,
                self.random_state_space.1,
            )
    }

    fn corrections(&self) -> &'static [Correction] {
        SVC_RULES
    }

    fn construct(&self, params: &ParamSet) -> Result<Estimator> {
        Ok(Estimator::Svc(SvcConfig::from_params(params)?))
    }
}

/// Finalized linear SVC construction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSvcConfig {
    pub penalty: String,
    pub loss: String,
    pub dual: bool,
    pub tol: f64,
    pub c: f64,
    pub fit_intercept: bool,
    pub intercept_scaling: f64,
    pub class_weight: Option<String>,
    pub max_iter: u32,
}

impl LinearSvcConfig {
    /// Validating constructor enforcing the penalty/loss/dual support matrix
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        let penalty = params.require_str("penalty")?;
        let loss = params.require_str("loss")?;
        let dual = params.require_bool("dual")?;
        let tol = params.require_float("tol")?;
        let c = params.require_float("c")?;
        let fit_intercept = params.require_bool("fit_intercept")?;
        let intercept_scaling = params.require_float("intercept_scaling")?;
        let class_weight = match params.require_str("class_weight")? {
            "none" => None,
            "balanced" => Some("balanced".to_string()),
            other => {
                return Err(TuneError::InvalidParameter(format!(
                    "unknown class_weight: {}",
                    other
                )));
            }
        };
        let max_iter = params.require_int("max_iter")?;

        if !matches!(penalty, "l1" | "l2") {
            return Err(TuneError::InvalidParameter(format!(
                "unknown penalty: {}",
                penalty
            )));
        }
        if !matches!(loss, "hinge" | "squared_hinge") {
            return Err(TuneError::InvalidParameter(format!("unknown loss: {}", loss)));
        }
        // Support matrix: l1 only combines with squared_hinge in the primal,
        // hinge only with l2 in the dual.
        if penalty == "l1" && loss == "hinge" {
            return Err(TuneError::InvalidParameter(
                "the combination of an l1 penalty with hinge loss is not supported".into(),
            ));
        }
        if penalty == "l1" && dual {
            return Err(TuneError::InvalidParameter(
                "the l1 penalty requires the primal formulation".into(),
            ));
        }
        if loss == "hinge" && !dual {
            return Err(TuneError::InvalidParameter(
                "hinge loss requires the dual formulation".into(),
            ));
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

        Ok(Self {
            penalty: penalty.to_string(),
            loss: loss.to_string(),
            dual,
            tol,
            c,
            fit_intercept,
            intercept_scaling,
            class_weight,
            max_iter: max_iter as u32,
        })
    }
}

const LINEAR_SVC_RULES: &[Correction] = &[
    Correction::Force {
        param: "loss",
        value: RuleValue::Str("squared_hinge"),
        when: Cond::Eq("penalty", RuleValue::Str("l1")),
    },
    Correction::Force {
        param: "dual",
        value: RuleValue::Bool(false),
        when: Cond::Eq("penalty", RuleValue::Str("l1")),
    },
    Correction::Force {
        param: "dual",
        value: RuleValue::Bool(true),
        when: Cond::Eq("loss", RuleValue::Str("hinge")),
    },
];

/// Space-to-estimator mapper for the linear SVC
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvcFamily {
    pub penalty_space: Vec<String>,
    pub loss_space: Vec<String>,
    pub tol_space: (f64, f64),
    pub c_space: (f64, f64),
    pub intercept_scaling_space: (f64, f64),
    pub class_weight_space: Vec<String>,
    pub max_iter_space: (i64, i64),
}

impl Default for LinearSvcFamily {
    fn default() -> Self {
        Self {
            penalty_space: to_strings(&["l1", "l2"]),
            loss_space: to_strings(&["hinge", "squared_hinge"]),
            tol_space: (1e-6, 1e-3),
            c_space: (0.9, 1.0),
            intercept_scaling_space: (0.5, 1.0),
            class_weight_space: to_strings(&["balanced"]),
            max_iter_space: (500, 2000),
        }
    }
}

impl Family for LinearSvcFamily {
    fn name(&self) -> &'static str {
        "linear_svc"
    }

    fn space(&self) -> SearchSpace {
        SearchSpace::new()
            .categorical("penalty", &as_strs(&self.penalty_space))
            .categorical("loss", &as_strs(&self.loss_space))
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
            .int("max_iter", self.max_iter_space.0, self.max_iter_space.1)
    }

    fn corrections(&self) -> &'static [Correction] {
        LINEAR_SVC_RULES
    }

    fn construct(&self, params: &ParamSet) -> Result<Estimator> {
        Ok(Estimator::LinearSvc(LinearSvcConfig::from_params(params)?))
    }
}

/// Finalized nu-support vector classifier construction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuSvcConfig {
    pub nu: f64,
    pub kernel: Kernel,
    pub degree: u32,
    pub gamma: Gamma,
    pub coef0: f64,
    pub tol: f64,
    pub class_weight: Option<String>,
    pub shrinking: bool,
    pub probability: bool,
    pub random_state: Option<u64>,
}

impl NuSvcConfig {
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        let nu = params.require_float("nu")?;
        let kernel = Kernel::parse(params.require_str("kernel")?)?;
        let degree = params.require_int("degree")?;
        let gamma = Gamma::parse(params.require_str("gamma")?)?;
        let coef0 = params.require_float("coef0")?;
        let tol = params.require_float("tol")?;
        let class_weight = match params.require_str("class_weight")? {
            "none" => None,
            "balanced" => Some("balanced".to_string()),
            other => {
                return Err(TuneError::InvalidParameter(format!(
                    "unknown class_weight: {}",
                    other
                )));
            }
        };
        let shrinking = params.require_bool("shrinking")?;
        let probability = params.require_bool("probability")?;
        let random_state = optional_int(params, "random_state")?;

        if !(0.0 < nu && nu <= 1.0) {
            return Err(TuneError::InvalidParameter(format!(
                "nu must lie in (0, 1], got {}",
                nu
            )));
        }
        if tol <= 0.0 {
            return Err(TuneError::InvalidParameter(format!("tol must be positive, got {}", tol)));
        }
        if degree < 1 {
            return Err(TuneError::InvalidParameter(format!(
                "degree must be at least 1, got {}",
                degree
            )));
        }
        if random_state.is_some() && !probability {
            return Err(TuneError::InvalidParameter(
                "random_state is only meaningful when probability estimation is enabled".into(),
            ));
        }

        Ok(Self {
            nu,
            kernel,
            degree: degree as u32,
            gamma,
            coef0,
            tol,
            class_weight,
            shrinking,
            probability,
            random_state: random_state.map(|s| s as u64),
        })
    }
}

/// Space-to-estimator mapper for the nu-support vector classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NuSvcFamily {
    pub nu_space: (f64, f64),
    pub kernel_space: Vec<String>,
    pub degree_space: (i64, i64),
    pub gamma_space: Vec<String>,
    pub coef0_space: (f64, f64),
    pub tol_space: (f64, f64),
    pub class_weight_space: Vec<String>,
    pub random_state_space: (i64, i64),
}

impl Default for NuSvcFamily {
    fn default() -> Self {
        Self {
            nu_space: (0.1, 0.9),
            kernel_space: to_strings(&["linear", "poly", "rbf", "sigmoid"]),
            degree_space: (1, 5),
            gamma_space: to_strings(&["scale", "auto"]),
            coef0_space: (0.0, 0.5),
            tol_space: (1e-6, 1e-3),
            class_weight_space: to_strings(&["balanced"]),
            random_state_space: (0, 10_000),
        }
    }
}

impl Family for NuSvcFamily {
    fn name(&self) -> &'static str {
        "nu_svc"
    }

    fn space(&self) -> SearchSpace {
        SearchSpace::new()
            .float("nu", self.nu_space.0, self.nu_space.1)
            .categorical("kernel", &as_strs(&self.kernel_space))
            .int("degree", self.degree_space.0, self.degree_space.1)
            .categorical("gamma", &as_strs(&self.gamma_space))
            .float("coef0", self.coef0_space.0, self.coef0_space.1)
            .float("tol", self.tol_space.0, self.tol_space.1)
            .categorical("class_weight", &as_strs(&self.class_weight_space))
            .boolean("shrinking")
            .boolean("probability")
            .int(
                "random_state",
                self.random_state_space.0,
                self.random_state_space.1,
            )
    }

    fn corrections(&self) -> &'static [Correction] {
        SVC_RULES
    }

    fn construct(&self, params: &ParamSet) -> Result<Estimator> {
        Ok(Estimator::NuSvc(NuSvcConfig::from_params(params)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;
    use crate::trial::{FixedTrial, RandomTrial};

    fn fixed_svc_trial(probability: bool) -> FixedTrial {
        FixedTrial::new()
            .with("kernel", "rbf".into())
            .with("degree", ParamValue::Int(3))
            .with("gamma", "scale".into())
            .with("coef0", ParamValue::Float(0.1))
            .with("tol", ParamValue::Float(1e-4))
            .with("c", ParamValue::Float(0.95))
            .with("class_weight", "balanced".into())
            .with("shrinking", ParamValue::Bool(true))
            .with("probability", ParamValue::Bool(probability))
            .with("random_state", ParamValue::Int(42))
    }

    #[test]
    fn test_seed_dropped_without_probability() {
        let family = SvcFamily::default();
        let mut trial = fixed_svc_trial(false);
        let params = family.sample_params(Some(&mut trial)).unwrap();
        assert!(!params.contains("random_state"));

        match family.construct(&params).unwrap() {
            Estimator::Svc(config) => assert_eq!(config.random_state, None),
            other => panic!("unexpected estimator: {:?}", other),
        }
    }

    #[test]
    fn test_seed_kept_with_probability() {
        let family = SvcFamily::default();
        let mut trial = fixed_svc_trial(true);
        let params = family.sample_params(Some(&mut trial)).unwrap();
        assert!(params.contains("random_state"));

        match family.construct(&params).unwrap() {
            Estimator::Svc(config) => assert_eq!(config.random_state, Some(42)),
            other => panic!("unexpected estimator: {:?}", other),
        }
    }

    #[test]
    fn test_constructor_rejects_seed_without_probability() {
        let mut trial = fixed_svc_trial(false);
        // Bypass the correction path entirely
        let family = SvcFamily::default();
        let params = family.space().suggest_all(&mut trial).unwrap();
        assert!(family.construct(&params).is_err());
    }

    #[test]
    fn test_linear_svc_l1_hinge_is_corrected() {
        let family = LinearSvcFamily::default();
        let mut trial = FixedTrial::new()
            .with("penalty", "l1".into())
            .with("loss", "hinge".into())
            .with("dual", ParamValue::Bool(true))
            .with("tol", ParamValue::Float(1e-4))
            .with("c", ParamValue::Float(0.95))
            .with("fit_intercept", ParamValue::Bool(true))
            .with("intercept_scaling", ParamValue::Float(1.0))
            .with("class_weight", "balanced".into())
            .with("max_iter", ParamValue::Int(1000));

        let params = family.sample_params(Some(&mut trial)).unwrap();
        assert_eq!(params.require_str("loss").unwrap(), "squared_hinge");
        assert_eq!(params.require_bool("dual").unwrap(), false);
        assert!(family.construct(&params).is_ok());
    }

    #[test]
    fn test_linear_svc_hinge_requires_dual() {
        let family = LinearSvcFamily::default();
        let mut trial = FixedTrial::new()
            .with("penalty", "l2".into())
            .with("loss", "hinge".into())
            .with("dual", ParamValue::Bool(false))
            .with("tol", ParamValue::Float(1e-4))
            .with("c", ParamValue::Float(0.95))
            .with("fit_intercept", ParamValue::Bool(true))
            .with("intercept_scaling", ParamValue::Float(1.0))
            .with("class_weight", "balanced".into())
            .with("max_iter", ParamValue::Int(1000));

        let params = family.sample_params(Some(&mut trial)).unwrap();
        assert_eq!(params.require_bool("dual").unwrap(), true);
        assert!(family.construct(&params).is_ok());
    }

    #[test]
    fn test_random_sweep_always_constructs() {
        let svc = SvcFamily::default();
        let linear = LinearSvcFamily::default();
        let nu = NuSvcFamily::default();
        for seed in 0..200 {
            let mut trial = RandomTrial::seeded(seed);
            assert!(svc.sample_estimator(Some(&mut trial)).is_ok());
            let mut trial = RandomTrial::seeded(seed);
            assert!(linear.sample_estimator(Some(&mut trial)).is_ok());
            let mut trial = RandomTrial::seeded(seed);
            assert!(nu.sample_estimator(Some(&mut trial)).is_ok());
        }
    }
}
