//! Ensemble families

use crate::error::{Result, TuneError};
use crate::families::tree::SplitCriterion;
use crate::families::{optional_float, optional_int, optional_str, Estimator, Family};
use crate::families::linear_model::{as_strs, to_strings};
use crate::params::ParamSet;
use crate::rules::{Cond, Correction, RuleValue};
use crate::space::SearchSpace;
use serde::{Deserialize, Serialize};

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

/// Finalized bagged-tree forest construction request, shared by the
/// bootstrap and the extremely randomized variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_estimators: u32,
    pub criterion: SplitCriterion,
    pub max_depth: u32,
    pub min_samples_split: u32,
    pub min_samples_leaf: u32,
    pub max_features: Option<String>,
    pub bootstrap: bool,
    pub oob_score: bool,
    pub class_weight: Option<String>,
}

impl ForestConfig {
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        let n_estimators = params.require_int("n_estimators")?;
        let criterion = SplitCriterion::parse(params.require_str("criterion")?)?;
        let max_depth = params.require_int("max_depth")?;
        let min_samples_split = params.require_int("min_samples_split")?;
        let min_samples_leaf = params.require_int("min_samples_leaf")?;
        let max_features = optional_str(params, "max_features")?
            .filter(|v| *v != "none")
            .map(str::to_string);
        let bootstrap = params.require_bool("bootstrap")?;
        let oob_score = params.require_bool("oob_score")?;
        let class_weight = parse_class_weight(params.require_str("class_weight")?)?;

        if n_estimators < 1 {
            return Err(TuneError::InvalidParameter(format!(
                "n_estimators must be at least 1, got {}",
                n_estimators
            )));
        }
        if max_depth < 1 {
            return Err(TuneError::InvalidParameter(format!(
                "max_depth must be at least 1, got {}",
                max_depth
            )));
        }
        if min_samples_split < 2 {
            return Err(TuneError::InvalidParameter(format!(
                "min_samples_split must be at least 2, got {}",
                min_samples_split
            )));
        }
        if min_samples_leaf < 1 {
            return Err(TuneError::InvalidParameter(format!(
                "min_samples_leaf must be at least 1, got {}",
                min_samples_leaf
            )));
        }
        // Out-of-bag estimation only exists when samples are drawn with
        // replacement.
        if oob_score && !bootstrap {
            return Err(TuneError::InvalidParameter(
                "oob_score requires bootstrap sampling".into(),
            ));
        }

        Ok(Self {
            n_estimators: n_estimators as u32,
            criterion,
            max_depth: max_depth as u32,
            min_samples_split: min_samples_split as u32,
            min_samples_leaf: min_samples_leaf as u32,
            max_features,
            bootstrap,
            oob_score,
            class_weight,
        })
    }
}

const FOREST_RULES: &[Correction] = &[Correction::Force {
    param: "oob_score",
    value: RuleValue::Bool(false),
    when: Cond::IsFalse("bootstrap"),
}];

macro_rules! forest_family {
    ($family:ident, $name:literal, $variant:ident) => {
        #[derive(Debug, Clone, Serialize, Deserialize)]
        pub struct $family {
            pub n_estimators_space: (i64, i64),
            pub criterion_space: Vec<String>,
            pub max_depth_space: (i64, i64),
            pub min_samples_split_space: (i64, i64),
            pub min_samples_leaf_space: (i64, i64),
            pub max_features_space: Vec<String>,
            pub class_weight_space: Vec<String>,
        }

        impl Default for $family {
            fn default() -> Self {
                Self {
                    n_estimators_space: (50, 500),
                    criterion_space: to_strings(&["gini", "entropy", "log_loss"]),
                    max_depth_space: (2, 32),
                    min_samples_split_space: (2, 10),
                    min_samples_leaf_space: (1, 10),
                    max_features_space: to_strings(&["sqrt", "log2", "none"]),
                    class_weight_space: to_strings(&[
                        "balanced",
                        "balanced_subsample",
                        "none",
                    ]),
                }
            }
        }

        impl Family for $family {
            fn name(&self) -> &'static str {
                $name
            }

            fn space(&self) -> SearchSpace {
                SearchSpace::new()
                    .int(
                        "n_estimators",
                        self.n_estimators_space.0,
                        self.n_estimators_space.1,
                    )
                    .categorical("criterion", &as_strs(&self.criterion_space))
                    .int("max_depth", self.max_depth_space.0, self.max_depth_space.1)
                    .int(
                        "min_samples_split",
                        self.min_samples_split_space.0,
                        self.min_samples_split_space.1,
                    )
                    .int(
                        "min_samples_leaf",
                        self.min_samples_leaf_space.0,
                        self.min_samples_leaf_space.1,
                    )
                    .categorical("max_features", &as_strs(&self.max_features_space))
                    .boolean("bootstrap")
                    .boolean("oob_score")
                    .categorical("class_weight", &as_strs(&self.class_weight_space))
            }

            fn corrections(&self) -> &'static [Correction] {
                FOREST_RULES
            }

            fn construct(&self, params: &ParamSet) -> Result<Estimator> {
                Ok(Estimator::$variant(ForestConfig::from_params(params)?))
            }
        }
    };
}

forest_family!(RandomForestFamily, "random_forest", RandomForest);
forest_family!(ExtraTreesFamily, "extra_trees", ExtraTrees);

/// Finalized gradient-boosted trees construction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingConfig {
    pub loss: String,
    pub learning_rate: f64,
    pub n_estimators: u32,
    pub subsample: f64,
    pub criterion: String,
    pub max_depth: u32,
    /// Rounds without improvement before stopping, when early stopping is on
    pub n_iter_no_change: Option<u32>,
    pub validation_fraction: Option<f64>,
}

impl GradientBoostingConfig {
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        let loss = params.require_str("loss")?;
        let learning_rate = params.require_float("learning_rate")?;
        let n_estimators = params.require_int("n_estimators")?;
        let subsample = params.require_float("subsample")?;
        let criterion = params.require_str("criterion")?;
        let max_depth = params.require_int("max_depth")?;
        let n_iter_no_change = optional_int(params, "n_iter_no_change")?;
        let validation_fraction = optional_float(params, "validation_fraction")?;

        if !matches!(loss, "log_loss" | "exponential") {
            return Err(TuneError::InvalidParameter(format!("unknown loss: {}", loss)));
        }
        if !matches!(criterion, "friedman_mse" | "squared_error") {
            return Err(TuneError::InvalidParameter(format!(
                "unknown criterion: {}",
                criterion
            )));
        }
        if learning_rate <= 0.0 {
            return Err(TuneError::InvalidParameter(format!(
                "learning_rate must be positive, got {}",
                learning_rate
            )));
        }
        if n_estimators < 1 {
            return Err(TuneError::InvalidParameter(format!(
                "n_estimators must be at least 1, got {}",
                n_estimators
            )));
        }
        if !(0.0 < subsample && subsample <= 1.0) {
            return Err(TuneError::InvalidParameter(format!(
                "subsample must lie in (0, 1], got {}",
                subsample
            )));
        }
        if max_depth < 1 {
            return Err(TuneError::InvalidParameter(format!(
                "max_depth must be at least 1, got {}",
                max_depth
            )));
        }
        if n_iter_no_change.is_some() != validation_fraction.is_some() {
            return Err(TuneError::InvalidParameter(
                "n_iter_no_change and validation_fraction must be set together".into(),
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

        Ok(Self {
            loss: loss.to_string(),
            learning_rate,
            n_estimators: n_estimators as u32,
            subsample,
            criterion: criterion.to_string(),
            max_depth: max_depth as u32,
            n_iter_no_change: n_iter_no_change.map(|n| n as u32),
            validation_fraction,
        })
    }
}

const GRADIENT_BOOSTING_RULES: &[Correction] = &[
    Correction::Deactivate {
        param: "n_iter_no_change",
        when: Cond::IsFalse("early_stopping"),
    },
    Correction::Deactivate {
        param: "validation_fraction",
        when: Cond::IsFalse("early_stopping"),
    },
    // The toggle itself is not a constructor argument
    Correction::Remove {
        param: "early_stopping",
        when: Cond::Always,
    },
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingFamily {
    pub loss_space: Vec<String>,
    pub learning_rate_space: (f64, f64),
    pub n_estimators_space: (i64, i64),
    pub subsample_space: (f64, f64),
    pub criterion_space: Vec<String>,
    pub max_depth_space: (i64, i64),
    pub n_iter_no_change_space: (i64, i64),
    pub validation_fraction_space: (f64, f64),
}

impl Default for GradientBoostingFamily {
    fn default() -> Self {
        Self {
            loss_space: to_strings(&["log_loss", "exponential"]),
            learning_rate_space: (1e-3, 1.0),
            n_estimators_space: (50, 500),
            subsample_space: (0.5, 1.0),
            criterion_space: to_strings(&["friedman_mse", "squared_error"]),
            max_depth_space: (2, 8),
            n_iter_no_change_space: (5, 20),
            validation_fraction_space: (0.1, 0.3),
        }
    }
}

impl Family for GradientBoostingFamily {
    fn name(&self) -> &'static str {
        "gradient_boosting"
    }

    fn space(&self) -> SearchSpace {
        SearchSpace::new()
            .categorical("loss", &as_strs(&self.loss_space))
            .log_float(
                "learning_rate",
                self.learning_rate_space.0,
                self.learning_rate_space.1,
            )
            .int(
                "n_estimators",
                self.n_estimators_space.0,
                self.n_estimators_space.1,
            )
            .float("subsample", self.subsample_space.0, self.subsample_space.1)
            .categorical("criterion", &as_strs(&self.criterion_space))
            .int("max_depth", self.max_depth_space.0, self.max_depth_space.1)
            .boolean("early_stopping")
            .int(
                "n_iter_no_change",
                self.n_iter_no_change_space.0,
                self.n_iter_no_change_space.1,
            )
            .float(
                "validation_fraction",
                self.validation_fraction_space.0,
                self.validation_fraction_space.1,
            )
    }

    fn corrections(&self) -> &'static [Correction] {
        GRADIENT_BOOSTING_RULES
    }

    fn construct(&self, params: &ParamSet) -> Result<Estimator> {
        Ok(Estimator::GradientBoosting(GradientBoostingConfig::from_params(params)?))
    }
}

/// Finalized adaptive boosting construction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaBoostConfig {
    pub n_estimators: u32,
    pub learning_rate: f64,
    pub algorithm: String,
}

impl AdaBoostConfig {
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        let n_estimators = params.require_int("n_estimators")?;
        let learning_rate = params.require_float("learning_rate")?;
        let algorithm = params.require_str("algorithm")?;

        if n_estimators < 1 {
            return Err(TuneError::InvalidParameter(format!(
                "n_estimators must be at least 1, got {}",
                n_estimators
            )));
        }
        if learning_rate <= 0.0 {
            return Err(TuneError::InvalidParameter(format!(
                "learning_rate must be positive, got {}",
                learning_rate
            )));
        }
        if algorithm != "SAMME" {
            return Err(TuneError::InvalidParameter(format!(
                "unknown algorithm: {}",
                algorithm
            )));
        }

        Ok(Self {
            n_estimators: n_estimators as u32,
            learning_rate,
            algorithm: algorithm.to_string(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaBoostFamily {
    pub n_estimators_space: (i64, i64),
    pub learning_rate_space: (f64, f64),
    pub algorithm_space: Vec<String>,
}

impl Default for AdaBoostFamily {
    fn default() -> Self {
        Self {
            n_estimators_space: (50, 500),
            learning_rate_space: (0.01, 2.0),
            algorithm_space: to_strings(&["SAMME"]),
        }
    }
}

impl Family for AdaBoostFamily {
    fn name(&self) -> &'static str {
        "ada_boost"
    }

    fn space(&self) -> SearchSpace {
        SearchSpace::new()
            .int(
                "n_estimators",
                self.n_estimators_space.0,
                self.n_estimators_space.1,
            )
            .log_float(
                "learning_rate",
                self.learning_rate_space.0,
                self.learning_rate_space.1,
            )
            .categorical("algorithm", &as_strs(&self.algorithm_space))
    }

    fn construct(&self, params: &ParamSet) -> Result<Estimator> {
        Ok(Estimator::AdaBoost(AdaBoostConfig::from_params(params)?))
    }
}

/// Finalized bagging ensemble construction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaggingConfig {
    pub n_estimators: u32,
    pub max_samples: f64,
    pub max_features: f64,
    pub bootstrap: bool,
    pub bootstrap_features: bool,
    pub oob_score: bool,
}

impl BaggingConfig {
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        let n_estimators = params.require_int("n_estimators")?;
        let max_samples = params.require_float("max_samples")?;
        let max_features = params.require_float("max_features")?;
        let bootstrap = params.require_bool("bootstrap")?;
        let bootstrap_features = params.require_bool("bootstrap_features")?;
        let oob_score = params.require_bool("oob_score")?;

        if n_estimators < 1 {
            return Err(TuneError::InvalidParameter(format!(
                "n_estimators must be at least 1, got {}",
                n_estimators
            )));
        }
        for (name, value) in [("max_samples", max_samples), ("max_features", max_features)] {
            if !(0.0 < value && value <= 1.0) {
                return Err(TuneError::InvalidParameter(format!(
                    "{} must lie in (0, 1], got {}",
                    name, value
                )));
            }
        }
        if oob_score && !bootstrap {
            return Err(TuneError::InvalidParameter(
                "oob_score requires bootstrap sampling".into(),
            ));
        }

        Ok(Self {
            n_estimators: n_estimators as u32,
            max_samples,
            max_features,
            bootstrap,
            bootstrap_features,
            oob_score,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaggingFamily {
    pub n_estimators_space: (i64, i64),
    pub max_samples_space: (f64, f64),
    pub max_features_space: (f64, f64),
}

impl Default for BaggingFamily {
    fn default() -> Self {
        Self {
            n_estimators_space: (10, 100),
            max_samples_space: (0.5, 1.0),
            max_features_space: (0.5, 1.0),
        }
    }
}

impl Family for BaggingFamily {
    fn name(&self) -> &'static str {
        "bagging"
    }

    fn space(&self) -> SearchSpace {
        SearchSpace::new()
            .int(
                "n_estimators",
                self.n_estimators_space.0,
                self.n_estimators_space.1,
            )
            .float(
                "max_samples",
                self.max_samples_space.0,
                self.max_samples_space.1,
            )
            .float(
                "max_features",
                self.max_features_space.0,
                self.max_features_space.1,
            )
            .boolean("bootstrap")
            .boolean("bootstrap_features")
            .boolean("oob_score")
    }

    fn corrections(&self) -> &'static [Correction] {
        FOREST_RULES
    }

    fn construct(&self, params: &ParamSet) -> Result<Estimator> {
        Ok(Estimator::Bagging(BaggingConfig::from_params(params)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;
    use crate::trial::{FixedTrial, RandomTrial};

    #[test]
    fn test_oob_forced_off_without_bootstrap() {
        let family = RandomForestFamily::default();
        let mut trial = FixedTrial::new()
            .with("n_estimators", ParamValue::Int(100))
            .with("criterion", "gini".into())
            .with("max_depth", ParamValue::Int(16))
            .with("min_samples_split", ParamValue::Int(2))
            .with("min_samples_leaf", ParamValue::Int(1))
            .with("max_features", "sqrt".into())
            .with("bootstrap", ParamValue::Bool(false))
            .with("oob_score", ParamValue::Bool(true))
            .with("class_weight", "balanced_subsample".into());

        match family.sample_estimator(Some(&mut trial)).unwrap() {
            Estimator::RandomForest(config) => {
                assert!(!config.oob_score);
                assert_eq!(config.class_weight.as_deref(), Some("balanced_subsample"));
            }
            other => panic!("unexpected estimator: {:?}", other),
        }
        assert_eq!(
            trial.user_attrs().get("oob_score"),
            Some(&ParamValue::Bool(false))
        );
    }

    #[test]
    fn test_constructor_rejects_oob_without_bootstrap() {
        let mut params = ParamSet::new();
        params.set("n_estimators", ParamValue::Int(100));
        params.set("criterion", "gini".into());
        params.set("max_depth", ParamValue::Int(16));
        params.set("min_samples_split", ParamValue::Int(2));
        params.set("min_samples_leaf", ParamValue::Int(1));
        params.set("max_features", "sqrt".into());
        params.set("bootstrap", ParamValue::Bool(false));
        params.set("oob_score", ParamValue::Bool(true));
        params.set("class_weight", "none".into());
        assert!(ForestConfig::from_params(&params).is_err());
    }

    #[test]
    fn test_early_stopping_fields_deactivated_when_off() {
        let family = GradientBoostingFamily::default();
        let mut trial = FixedTrial::new()
            .with("loss", "log_loss".into())
            .with("learning_rate", ParamValue::Float(0.1))
            .with("n_estimators", ParamValue::Int(200))
            .with("subsample", ParamValue::Float(0.8))
            .with("criterion", "friedman_mse".into())
            .with("max_depth", ParamValue::Int(3))
            .with("early_stopping", ParamValue::Bool(false))
            .with("n_iter_no_change", ParamValue::Int(10))
            .with("validation_fraction", ParamValue::Float(0.2));

        match family.sample_estimator(Some(&mut trial)).unwrap() {
            Estimator::GradientBoosting(config) => {
                assert_eq!(config.n_iter_no_change, None);
                assert_eq!(config.validation_fraction, None);
            }
            other => panic!("unexpected estimator: {:?}", other),
        }
    }

    #[test]
    fn test_early_stopping_fields_kept_when_on() {
        let family = GradientBoostingFamily::default();
        let mut trial = FixedTrial::new()
            .with("loss", "exponential".into())
            .with("learning_rate", ParamValue::Float(0.05))
            .with("n_estimators", ParamValue::Int(300))
            .with("subsample", ParamValue::Float(0.9))
            .with("criterion", "squared_error".into())
            .with("max_depth", ParamValue::Int(4))
            .with("early_stopping", ParamValue::Bool(true))
            .with("n_iter_no_change", ParamValue::Int(10))
            .with("validation_fraction", ParamValue::Float(0.2));

        let params = family.sample_params(Some(&mut trial)).unwrap();
        assert!(!params.contains("early_stopping"));
        match family.construct(&params).unwrap() {
            Estimator::GradientBoosting(config) => {
                assert_eq!(config.n_iter_no_change, Some(10));
                assert_eq!(config.validation_fraction, Some(0.2));
            }
            other => panic!("unexpected estimator: {:?}", other),
        }
    }

    #[test]
    fn test_random_sweep_always_constructs() {
        let families: Vec<Box<dyn Family>> = vec![
            Box::new(RandomForestFamily::default()),
            Box::new(ExtraTreesFamily::default()),
            Box::new(GradientBoostingFamily::default()),
            Box::new(AdaBoostFamily::default()),
            Box::new(BaggingFamily::default()),
        ];
        for family in &families {
            for seed in 0..100 {
                let mut trial = RandomTrial::seeded(seed);
                let result = family.sample_estimator(Some(&mut trial));
                assert!(
                    result.is_ok(),
                    "{} failed at seed {}: {:?}",
                    family.name(),
                    seed,
                    result.err()
                );
            }
        }
    }
}
