//! Estimator families
//!
//! One module per supervised-learning family. Each family declares its
//! hyperparameter domains as public fields (so callers can narrow a space),
//! carries a `const` table of correction rules, and maps a finalized
//! parameter set into a typed estimator configuration through a validating
//! constructor.

pub mod ensemble;
pub mod linear_model;
pub mod mlp;
pub mod naive_bayes;
pub mod neighbors;
pub mod svm;
pub mod tree;

pub use ensemble::{
    AdaBoostConfig, AdaBoostFamily, BaggingConfig, BaggingFamily, ForestConfig,
    ExtraTreesFamily, GradientBoostingConfig, GradientBoostingFamily, RandomForestFamily,
};
pub use linear_model::{
    LogisticRegressionConfig, LogisticRegressionFamily, Penalty, PerceptronConfig,
    PerceptronFamily, Solver,
};
pub use mlp::{Activation, MlpConfig, MlpFamily, MlpSolver};
pub use naive_bayes::{
    BernoulliNbConfig, BernoulliNbFamily, GaussianNbConfig, GaussianNbFamily,
    MultinomialNbConfig, MultinomialNbFamily,
};
pub use neighbors::{KNeighborsConfig, KNeighborsFamily};
pub use svm::{Gamma, Kernel, LinearSvcConfig, LinearSvcFamily, NuSvcConfig, NuSvcFamily, SvcConfig, SvcFamily};
pub use tree::{DecisionTreeFamily, ExtraTreeFamily, SplitCriterion, TreeConfig};

use crate::error::{Result, TuneError};
use crate::params::ParamSet;
use crate::rules::{self, Correction};
use crate::space::SearchSpace;
use crate::trial::Trial;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A fully-parameterized estimator construction result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Estimator {
    LogisticRegression(LogisticRegressionConfig),
    Perceptron(PerceptronConfig),
    Svc(SvcConfig),
    LinearSvc(LinearSvcConfig),
    NuSvc(NuSvcConfig),
    DecisionTree(TreeConfig),
    ExtraTree(TreeConfig),
    RandomForest(ForestConfig),
    ExtraTrees(ForestConfig),
    GradientBoosting(GradientBoostingConfig),
    AdaBoost(AdaBoostConfig),
    Bagging(BaggingConfig),
    KNeighbors(KNeighborsConfig),
    GaussianNb(GaussianNbConfig),
    MultinomialNb(MultinomialNbConfig),
    BernoulliNb(BernoulliNbConfig),
    Mlp(MlpConfig),
}

impl Estimator {
    /// Name of the family that produced this estimator
    pub fn family_name(&self) -> &'static str {
        match self {
            Estimator::LogisticRegression(_) => "logistic_regression",
            Estimator::Perceptron(_) => "perceptron",
            Estimator::Svc(_) => "svc",
            Estimator::LinearSvc(_) => "linear_svc",
            Estimator::NuSvc(_) => "nu_svc",
            Estimator::DecisionTree(_) => "decision_tree",
            Estimator::ExtraTree(_) => "extra_tree",
            Estimator::RandomForest(_) => "random_forest",
            Estimator::ExtraTrees(_) => "extra_trees",
            Estimator::GradientBoosting(_) => "gradient_boosting",
            Estimator::AdaBoost(_) => "ada_boost",
            Estimator::Bagging(_) => "bagging",
            Estimator::KNeighbors(_) => "k_neighbors",
            Estimator::GaussianNb(_) => "gaussian_nb",
            Estimator::MultinomialNb(_) => "multinomial_nb",
            Estimator::BernoulliNb(_) => "bernoulli_nb",
            Estimator::Mlp(_) => "mlp",
        }
    }
}

/// Space-to-estimator mapper for one family.
///
/// `sample_estimator` is a pure function of the trial: nothing is retained
/// on the mapper between invocations.
pub trait Family {
    /// Registry name of this family
    fn name(&self) -> &'static str;

    /// The family's ordered domain declarations
    fn space(&self) -> SearchSpace;

    /// The family's ordered correction rules
    fn corrections(&self) -> &'static [Correction] {
        &[]
    }

    /// Map a finalized parameter set into a typed estimator configuration.
    /// Rejects any combination the correction rules are meant to eliminate.
    fn construct(&self, params: &ParamSet) -> Result<Estimator>;

    /// Draw one value per declared domain through the trial, then apply the
    /// family's corrections. Fails with [`TuneError::TrialRequired`] when no
    /// trial handle is supplied.
    ///
    /// Substituting corrections draw from an RNG seeded by the sampled
    /// values, so the whole invocation is a pure function of the trial.
    fn sample_params(&self, trial: Option<&mut dyn Trial>) -> Result<ParamSet> {
        let trial = trial.ok_or(TuneError::TrialRequired)?;
        let mut params = self.space().suggest_all(trial)?;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(draw_fingerprint(&params));
        rules::apply(self.corrections(), &mut params, trial, &mut rng);
        Ok(params)
    }

    /// Sample parameters and construct the estimator in one step
    fn sample_estimator(&self, trial: Option<&mut dyn Trial>) -> Result<Estimator> {
        let params = self.sample_params(trial)?;
        self.construct(&params)
    }
}

fn draw_fingerprint(params: &ParamSet) -> u64 {
    let mut hasher = DefaultHasher::new();
    for (name, value) in params.iter() {
        name.hash(&mut hasher);
        format!("{:?}", value).hash(&mut hasher);
    }
    hasher.finish()
}

/// A float that may have been deactivated by a correction (or removed)
pub(crate) fn optional_float(params: &ParamSet, name: &str) -> Result<Option<f64>> {
    match params.get(name) {
        None => Ok(None),
        Some(v) if v.is_none() => Ok(None),
        Some(v) => v.as_float().map(Some).ok_or_else(|| {
            TuneError::InvalidParameter(format!("{} is not a float", name))
        }),
    }
}

/// An integer that may have been deactivated by a correction (or removed)
pub(crate) fn optional_int(params: &ParamSet, name: &str) -> Result<Option<i64>> {
    match params.get(name) {
        None => Ok(None),
        Some(v) if v.is_none() => Ok(None),
        Some(v) => v.as_int().map(Some).ok_or_else(|| {
            TuneError::InvalidParameter(format!("{} is not an integer", name))
        }),
    }
}

/// A string that may have been deactivated by a correction (or removed)
pub(crate) fn optional_str<'a>(params: &'a ParamSet, name: &str) -> Result<Option<&'a str>> {
    match params.get(name) {
        None => Ok(None),
        Some(v) if v.is_none() => Ok(None),
        Some(v) => v.as_str().map(Some).ok_or_else(|| {
            TuneError::InvalidParameter(format!("{} is not a string", name))
        }),
    }
}

/// A boolean that may have been deactivated by a correction (or removed)
pub(crate) fn optional_bool(params: &ParamSet, name: &str) -> Result<Option<bool>> {
    match params.get(name) {
        None => Ok(None),
        Some(v) if v.is_none() => Ok(None),
        Some(v) => v.as_bool().map(Some).ok_or_else(|| {
            TuneError::InvalidParameter(format!("{} is not a boolean", name))
        }),
    }
}
