//! Naive Bayes families
//!
//! None of these carry correction rules: their domains contain no mutually
//! exclusive combinations, so every sampled set is constructible as drawn.

use crate::error::{Result, TuneError};
use crate::families::{Estimator, Family};
use crate::params::ParamSet;
use crate::space::SearchSpace;
use serde::{Deserialize, Serialize};

/// Finalized Gaussian naive Bayes construction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianNbConfig {
    pub var_smoothing: f64,
}

impl GaussianNbConfig {
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        let var_smoothing = params.require_float("var_smoothing")?;
        if var_smoothing <= 0.0 {
            return Err(TuneError::InvalidParameter(format!(
                "var_smoothing must be positive, got {}",
                var_smoothing
            )));
        }
        Ok(Self { var_smoothing })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaussianNbFamily {
    pub var_smoothing_space: (f64, f64),
}

impl Default for GaussianNbFamily {
    fn default() -> Self {
        Self {
            var_smoothing_space: (1e-10, 1e-7),
        }
    }
}

impl Family for GaussianNbFamily {
    fn name(&self) -> &'static str {
        "gaussian_nb"
    }

    fn space(&self) -> SearchSpace {
        SearchSpace::new().log_float(
            "var_smoothing",
            self.var_smoothing_space.0,
            self.var_smoothing_space.1,
        )
    }

    fn construct(&self, params: &ParamSet) -> Result<Estimator> {
        Ok(Estimator::GaussianNb(GaussianNbConfig::from_params(params)?))
    }
}

/// Finalized multinomial naive Bayes construction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNbConfig {
    pub alpha: f64,
    pub fit_prior: bool,
}

impl MultinomialNbConfig {
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        let alpha = params.require_float("alpha")?;
        let fit_prior = params.require_bool("fit_prior")?;
        if alpha <= 0.0 {
            return Err(TuneError::InvalidParameter(format!(
                "alpha must be positive, got {}",
                alpha
            )));
        }
        Ok(Self { alpha, fit_prior })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNbFamily {
    pub alpha_space: (f64, f64),
}

impl Default for MultinomialNbFamily {
    fn default() -> Self {
        Self {
            alpha_space: (1e-3, 10.0),
        }
    }
}

impl Family for MultinomialNbFamily {
    fn name(&self) -> &'static str {
        "multinomial_nb"
    }

    fn space(&self) -> SearchSpace {
        SearchSpace::new()
            .log_float("alpha", self.alpha_space.0, self.alpha_space.1)
            .boolean("fit_prior")
    }

    fn construct(&self, params: &ParamSet) -> Result<Estimator> {
        Ok(Estimator::MultinomialNb(MultinomialNbConfig::from_params(params)?))
    }
}

/// Finalized Bernoulli naive Bayes construction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BernoulliNbConfig {
    pub alpha: f64,
    pub binarize: f64,
    pub fit_prior: bool,
}

impl BernoulliNbConfig {
    pub fn from_params(params: &ParamSet) -> Result<Self> {
        let alpha = params.require_float("alpha")?;
        let binarize = params.require_float("binarize")?;
        let fit_prior = params.require_bool("fit_prior")?;
        if alpha <= 0.0 {
            return Err(TuneError::InvalidParameter(format!(
                "alpha must be positive, got {}",
                alpha
            )));
        }
        if binarize < 0.0 {
            return Err(TuneError::InvalidParameter(format!(
                "binarize must be non-negative, got {}",
                binarize
            )));
        }
        Ok(Self {
            alpha,
            binarize,
            fit_prior,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BernoulliNbFamily {
    pub alpha_space: (f64, f64),
    pub binarize_space: (f64, f64),
}

impl Default for BernoulliNbFamily {
    fn default() -> Self {
        Self {
            alpha_space: (1e-3, 10.0),
            binarize_space: (0.0, 1.0),
        }
    }
}

impl Family for BernoulliNbFamily {
    fn name(&self) -> &'static str {
        "bernoulli_nb"
    }

    fn space(&self) -> SearchSpace {
        SearchSpace::new()
            .log_float("alpha", self.alpha_space.0, self.alpha_space.1)
            .float("binarize", self.binarize_space.0, self.binarize_space.1)
            .boolean("fit_prior")
    }

    fn construct(&self, params: &ParamSet) -> Result<Estimator> {
        Ok(Estimator::BernoulliNb(BernoulliNbConfig::from_params(params)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trial::RandomTrial;

    #[test]
    fn test_var_smoothing_respects_log_bounds() {
        let family = GaussianNbFamily::default();
        for seed in 0..100 {
            let mut trial = RandomTrial::seeded(seed);
            match family.sample_estimator(Some(&mut trial)).unwrap() {
                Estimator::GaussianNb(config) => {
                    assert!(config.var_smoothing >= 1e-10);
                    assert!(config.var_smoothing <= 1e-7);
                }
                other => panic!("unexpected estimator: {:?}", other),
            }
        }
    }

    #[test]
    fn test_random_sweep_always_constructs() {
        let families: Vec<Box<dyn Family>> = vec![
            Box::new(GaussianNbFamily::default()),
            Box::new(MultinomialNbFamily::default()),
            Box::new(BernoulliNbFamily::default()),
        ];
        for family in &families {
            for seed in 0..50 {
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
