//! Nearest-neighbor family

use crate::error::{Result, TuneError};
use crate::families::{optional_int, Estimator, Family};
use crate::families::linear_model::{as_strs, to_strings};
use crate::params::ParamSet;
use crate::rules::{Cond, Correction, RuleValue};
use crate::space::SearchSpace;
use serde::{Deserialize, Serialize};

/// Finalized k-nearest-neighbors construction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KNeighborsConfig {
    pub n_neighbors: u32,
    pub weights: String,
    pub algorithm: String,
    pub leaf_size: u32,
    /// Minkowski power parameter, only meaningful for the minkowski metric
    pub p: Option<u32>,
    pub metric: String,
}

impl KNeighborsConfig {
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        let n_neighbors = params.require_int("n_neighbors")?;
        let weights = params.require_str("weights")?;
        let algorithm = params.require_str("algorithm")?;
        let leaf_size = params.require_int("leaf_size")?;
        let p = optional_int(params, "p")?;
        let metric = params.require_str("metric")?;

        if n_neighbors < 1 {
            return Err(TuneError::InvalidParameter(format!(
                "n_neighbors must be at least 1, got {}",
                n_neighbors
            )));
        }
        if !matches!(weights, "uniform" | "distance") {
            return Err(TuneError::InvalidParameter(format!(
                "unknown weights: {}",
                weights
            )));
        }
        if !matches!(algorithm, "auto" | "ball_tree" | "kd_tree" | "brute") {
            return Err(TuneError::InvalidParameter(format!(
                "unknown algorithm: {}",
                algorithm
            )));
        }
        if leaf_size < 1 {
            return Err(TuneError::InvalidParameter(format!(
                "leaf_size must be at least 1, got {}",
                leaf_size
            )));
        }
        if !matches!(metric, "minkowski" | "euclidean" | "manhattan" | "chebyshev") {
            return Err(TuneError::InvalidParameter(format!(
                "unknown metric: {}",
                metric
            )));
        }
        if p.is_some() && metric != "minkowski" {
            return Err(TuneError::InvalidParameter(format!(
                "p is only meaningful for the minkowski metric, not {}",
                metric
            )));
        }
        if let Some(p) = p {
            if p < 1 {
                return Err(TuneError::InvalidParameter(format!(
                    "p must be at least 1, got {}",
                    p
                )));
            }
        }

        Ok(Self {
            n_neighbors: n_neighbors as u32,
            weights: weights.to_string(),
            algorithm: algorithm.to_string(),
            leaf_size: leaf_size as u32,
            p: p.map(|p| p as u32),
            metric: metric.to_string(),
        })
    }
}

const K_NEIGHBORS_RULES: &[Correction] = &[Correction::Deactivate {
    param: "p",
    when: Cond::Ne("metric", RuleValue::Str("minkowski")),
}];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KNeighborsFamily {
    pub n_neighbors_space: (i64, i64),
    pub weights_space: Vec<String>,
    pub algorithm_space: Vec<String>,
    pub leaf_size_space: (i64, i64),
    pub p_space: (i64, i64),
    pub metric_space: Vec<String>,
}

impl Default for KNeighborsFamily {
    fn default() -> Self {
        Self {
            n_neighbors_space: (1, 50),
            weights_space: to_strings(&["uniform", "distance"]),
            algorithm_space: to_strings(&["auto", "ball_tree", "kd_tree", "brute"]),
            leaf_size_space: (10, 100),
            p_space: (1, 5),
            metric_space: to_strings(&["minkowski", "euclidean", "manhattan", "chebyshev"]),
        }
    }
}

impl Family for KNeighborsFamily {
    fn name(&self) -> &'static str {
        "k_neighbors"
    }

    fn space(&self) -> SearchSpace {
        SearchSpace::new()
            .int(
                "n_neighbors",
                self.n_neighbors_space.0,
                self.n_neighbors_space.1,
            )
            .categorical("weights", &as_strs(&self.weights_space))
            .categorical("algorithm", &as_strs(&self.algorithm_space))
            .int("leaf_size", self.leaf_size_space.0, self.leaf_size_space.1)
            .int("p", self.p_space.0, self.p_space.1)
            .categorical("metric", &as_strs(&self.metric_space))
    }

    fn corrections(&self) -> &'static [Correction] {
        K_NEIGHBORS_RULES
    }

    fn construct(&self, params: &ParamSet) -> Result<Estimator> {
        Ok(Estimator::KNeighbors(KNeighborsConfig::from_params(params)?))
    }
}
