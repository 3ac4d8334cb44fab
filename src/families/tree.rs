//! Decision-tree families

use crate::error::{Result, TuneError};
use crate::families::{optional_str, Estimator, Family};
use crate::families::linear_model::{as_strs, to_strings};
use crate::params::ParamSet;
use crate::space::SearchSpace;
use serde::{Deserialize, Serialize};

/// Impurity measure used when evaluating a split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitCriterion {
    Gini,
    Entropy,
    LogLoss,
}

impl SplitCriterion {
    pub fn parse(value: &str) -> Result<SplitCriterion> {
        match value {
            "gini" => Ok(SplitCriterion::Gini),
            "entropy" => Ok(SplitCriterion::Entropy),
            "log_loss" => Ok(SplitCriterion::LogLoss),
            other => Err(TuneError::InvalidParameter(format!(
                "unknown criterion: {}",
                other
            ))),
        }
    }
}

/// Finalized single-tree construction request, shared by the exhaustive and
/// the fully randomized splitter variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    pub criterion: SplitCriterion,
    pub splitter: String,
    pub max_depth: u32,
    pub min_samples_split: u32,
    pub min_samples_leaf: u32,
    pub max_features: Option<String>,
    pub class_weight: Option<String>,
}

impl TreeConfig {
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        let criterion = SplitCriterion::parse(params.require_str("criterion")?)?;
        let splitter = params.require_str("splitter")?;
        let max_depth = params.require_int("max_depth")?;
        let min_samples_split = params.require_int("min_samples_split")?;
        let min_samples_leaf = params.require_int("min_samples_leaf")?;
        let max_features = optional_str(params, "max_features")?
            .filter(|v| *v != "none")
            .map(str::to_string);
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

        if !matches!(splitter, "best" | "random") {
            return Err(TuneError::InvalidParameter(format!(
                "unknown splitter: {}",
                splitter
            )));
        }
        if let Some(mf) = &max_features {
            if !matches!(mf.as_str(), "sqrt" | "log2") {
                return Err(TuneError::InvalidParameter(format!(
                    "unknown max_features: {}",
                    mf
                )));
            }
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

        Ok(Self {
            criterion,
            splitter: splitter.to_string(),
            max_depth: max_depth as u32,
            min_samples_split: min_samples_split as u32,
            min_samples_leaf: min_samples_leaf as u32,
            max_features,
            class_weight,
        })
    }
}

macro_rules! tree_family {
    ($family:ident, $name:literal, $variant:ident, $splitters:expr) => {
        #[derive(Debug, Clone, Serialize, Deserialize)]
        pub struct $family {
            pub criterion_space: Vec<String>,
            pub splitter_space: Vec<String>,
            pub max_depth_space: (i64, i64),
            pub min_samples_split_space: (i64, i64),
            pub min_samples_leaf_space: (i64, i64),
            pub max_features_space: Vec<String>,
            pub class_weight_space: Vec<String>,
        }

        impl Default for $family {
            fn default() -> Self {
                Self {
                    criterion_space: to_strings(&["gini", "entropy", "log_loss"]),
                    splitter_space: to_strings($splitters),
                    max_depth_space: (2, 32),
                    min_samples_split_space: (2, 10),
                    min_samples_leaf_space: (1, 10),
                    max_features_space: to_strings(&["sqrt", "log2", "none"]),
                    class_weight_space: to_strings(&["balanced", "none"]),
                }
            }
        }

        impl Family for $family {
            fn name(&self) -> &'static str {
                $name
            }

            fn space(&self) -> SearchSpace {
                SearchSpace::new()
                    .categorical("criterion", &as_strs(&self.criterion_space))
                    .categorical("splitter", &as_strs(&self.splitter_space))
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
                    .categorical("class_weight", &as_strs(&self.class_weight_space))
            }

            fn construct(&self, params: &ParamSet) -> Result<Estimator> {
                Ok(Estimator::$variant(TreeConfig::from_params(params)?))
            }
        }
    };
}

tree_family!(DecisionTreeFamily, "decision_tree", DecisionTree, &["best", "random"]);
// The extremely randomized variant always draws thresholds at random
tree_family!(ExtraTreeFamily, "extra_tree", ExtraTree, &["random"]);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;
    use crate::trial::{FixedTrial, RandomTrial};

    #[test]
    fn test_max_features_none_maps_to_all_features() {
        let family = DecisionTreeFamily::default();
        let mut trial = FixedTrial::new()
            .with("criterion", "gini".into())
            .with("splitter", "best".into())
            .with("max_depth", ParamValue::Int(8))
            .with("min_samples_split", ParamValue::Int(4))
            .with("min_samples_leaf", ParamValue::Int(2))
            .with("max_features", "none".into())
            .with("class_weight", "none".into());

        match family.sample_estimator(Some(&mut trial)).unwrap() {
            Estimator::DecisionTree(config) => {
                assert_eq!(config.max_features, None);
                assert_eq!(config.class_weight, None);
            }
            other => panic!("unexpected estimator: {:?}", other),
        }
    }

    #[test]
    fn test_constructor_rejects_degenerate_split() {
        let mut params = ParamSet::new();
        params.set("criterion", "entropy".into());
        params.set("splitter", "best".into());
        params.set("max_depth", ParamValue::Int(8));
        params.set("min_samples_split", ParamValue::Int(1));
        params.set("min_samples_leaf", ParamValue::Int(1));
        params.set("max_features", "sqrt".into());
        params.set("class_weight", "none".into());
        assert!(TreeConfig::from_params(&params).is_err());
    }

    #[test]
    fn test_extra_tree_always_splits_at_random() {
        let family = ExtraTreeFamily::default();
        for seed in 0..50 {
            let mut trial = RandomTrial::seeded(seed);
            match family.sample_estimator(Some(&mut trial)).unwrap() {
                Estimator::ExtraTree(config) => assert_eq!(config.splitter, "random"),
                other => panic!("unexpected estimator: {:?}", other),
            }
        }
    }

    #[test]
    fn test_random_sweep_always_constructs() {
        let family = DecisionTreeFamily::default();
        for seed in 0..100 {
            let mut trial = RandomTrial::seeded(seed);
            assert!(family.sample_estimator(Some(&mut trial)).is_ok());
        }
    }
}
