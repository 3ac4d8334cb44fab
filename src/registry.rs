//! Family registry
//!
//! Maps stable snake_case family names to constructors so callers can
//! instantiate a family from configuration or the command line without
//! referencing concrete types.

use crate::error::{Result, TuneError};
use crate::families::{
    AdaBoostFamily, BaggingFamily, BernoulliNbFamily, DecisionTreeFamily, ExtraTreeFamily,
    ExtraTreesFamily, Family, GaussianNbFamily, GradientBoostingFamily, KNeighborsFamily,
    LinearSvcFamily, LogisticRegressionFamily, MlpFamily, MultinomialNbFamily, NuSvcFamily,
    PerceptronFamily, RandomForestFamily, SvcFamily,
};
use serde::{Deserialize, Serialize};

/// Every registered estimator family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyKind {
    LogisticRegression,
    Perceptron,
    Svc,
    LinearSvc,
    NuSvc,
    DecisionTree,
    ExtraTree,
    RandomForest,
    ExtraTrees,
    GradientBoosting,
    AdaBoost,
    Bagging,
    KNeighbors,
    GaussianNb,
    MultinomialNb,
    BernoulliNb,
    Mlp,
}

impl FamilyKind {
    /// All registered kinds, in registry order
    pub fn all() -> &'static [FamilyKind] {
        use FamilyKind::*;
        &[
            LogisticRegression,
            Perceptron,
            Svc,
            LinearSvc,
            NuSvc,
            DecisionTree,
            ExtraTree,
            RandomForest,
            ExtraTrees,
            GradientBoosting,
            AdaBoost,
            Bagging,
            KNeighbors,
            GaussianNb,
            MultinomialNb,
            BernoulliNb,
            Mlp,
        ]
    }

    /// Stable registry name
    pub fn name(&self) -> &'static str {
        match self {
            FamilyKind::LogisticRegression => "logistic_regression",
            FamilyKind::Perceptron => "perceptron",
            FamilyKind::Svc => "svc",
            FamilyKind::LinearSvc => "linear_svc",
            FamilyKind::NuSvc => "nu_svc",
            FamilyKind::DecisionTree => "decision_tree",
            FamilyKind::ExtraTree => "extra_tree",
            FamilyKind::RandomForest => "random_forest",
            FamilyKind::ExtraTrees => "extra_trees",
            FamilyKind::GradientBoosting => "gradient_boosting",
            FamilyKind::AdaBoost => "ada_boost",
            FamilyKind::Bagging => "bagging",
            FamilyKind::KNeighbors => "k_neighbors",
            FamilyKind::GaussianNb => "gaussian_nb",
            FamilyKind::MultinomialNb => "multinomial_nb",
            FamilyKind::BernoulliNb => "bernoulli_nb",
            FamilyKind::Mlp => "mlp",
        }
    }

    /// Resolve a registry name
    pub fn from_name(name: &str) -> Option<FamilyKind> {
        FamilyKind::all().iter().copied().find(|k| k.name() == name)
    }

    /// Instantiate the family with its default search space
    pub fn create(&self) -> Box<dyn Family> {
        match self {
            FamilyKind::LogisticRegression => Box::new(LogisticRegressionFamily::default()),
            FamilyKind::Perceptron => Box::new(PerceptronFamily::default()),
            FamilyKind::Svc => Box::new(SvcFamily::default()),
            FamilyKind::LinearSvc => Box::new(LinearSvcFamily::default()),
            FamilyKind::NuSvc => Box::new(NuSvcFamily::default()),
            FamilyKind::DecisionTree => Box::new(DecisionTreeFamily::default()),
            FamilyKind::ExtraTree => Box::new(ExtraTreeFamily::default()),
            FamilyKind::RandomForest => Box::new(RandomForestFamily::default()),
            FamilyKind::ExtraTrees => Box::new(ExtraTreesFamily::default()),
            FamilyKind::GradientBoosting => Box::new(GradientBoostingFamily::default()),
            FamilyKind::AdaBoost => Box::new(AdaBoostFamily::default()),
            FamilyKind::Bagging => Box::new(BaggingFamily::default()),
            FamilyKind::KNeighbors => Box::new(KNeighborsFamily::default()),
            FamilyKind::GaussianNb => Box::new(GaussianNbFamily::default()),
            FamilyKind::MultinomialNb => Box::new(MultinomialNbFamily::default()),
            FamilyKind::BernoulliNb => Box::new(BernoulliNbFamily::default()),
            FamilyKind::Mlp => Box::new(MlpFamily::default()),
        }
    }
}

impl std::fmt::Display for FamilyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Instantiate a family by registry name
pub fn create_family_by_name(name: &str) -> Result<Box<dyn Family>> {
    FamilyKind::from_name(name)
        .map(|kind| kind.create())
        .ok_or_else(|| TuneError::UnknownFamily(name.to_string()))
}
