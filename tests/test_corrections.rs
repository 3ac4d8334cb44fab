//! Integration tests for post-sampling corrections
//!
//! Pins exact sampled combinations through fixed trials and checks that
//! every known-invalid combination is resolved before construction, with
//! the substitution recorded on the trial's user attributes.

use tune_classifier::families::{
    Estimator, Family, LinearSvcFamily, LogisticRegressionFamily, SvcFamily,
};
use tune_classifier::params::ParamValue;
use tune_classifier::trial::{FixedTrial, RandomTrial};

fn logistic_trial(solver: &str, penalty: &str) -> FixedTrial {
    FixedTrial::new()
        .with("penalty", penalty.into())
        .with("dual", ParamValue::Bool(true))
        .with("tol", ParamValue::Float(1e-4))
        .with("c", ParamValue::Float(0.93))
        .with("fit_intercept", ParamValue::Bool(true))
        .with("intercept_scaling", ParamValue::Float(1.0))
        .with("class_weight", "balanced".into())
        .with("solver", solver.into())
        .with("max_iter", ParamValue::Int(500))
        .with("multi_class", "auto".into())
        .with("l1_ratio", ParamValue::Float(0.4))
}

#[test]
fn test_lbfgs_never_keeps_an_l1_penalty() {
    let family = LogisticRegressionFamily::default();
    let mut trial = logistic_trial("lbfgs", "l1");
    let params = family.sample_params(Some(&mut trial)).unwrap();

    let penalty = params.require_str("penalty").unwrap();
    assert!(penalty == "l2" || penalty == "none", "got {}", penalty);
    assert!(!params.require_bool("dual").unwrap());
    assert!(params.require("l1_ratio").unwrap().is_none());
    assert!(family.construct(&params).is_ok());

    // both the original draw and the substitution stay auditable
    assert_eq!(trial.user_attrs().get("penalty").is_some(), true);
}

#[test]
fn test_saga_accepts_every_penalty() {
    let family = LogisticRegressionFamily::default();
    for penalty in ["l1", "l2", "elasticnet", "none"] {
        let mut trial = logistic_trial("saga", penalty);
        let params = family.sample_params(Some(&mut trial)).unwrap();
        assert_eq!(params.require_str("penalty").unwrap(), penalty);
        assert!(
            family.construct(&params).is_ok(),
            "saga rejected {}",
            penalty
        );
    }
}

#[test]
fn test_dropping_the_penalty_resets_regularization() {
    let family = LogisticRegressionFamily::default();
    let mut trial = logistic_trial("lbfgs", "none");
    let params = family.sample_params(Some(&mut trial)).unwrap();

    assert_eq!(params.require_float("c").unwrap(), 1.0);
    match family.construct(&params).unwrap() {
        Estimator::LogisticRegression(config) => assert_eq!(config.c, 1.0),
        other => panic!("unexpected estimator: {:?}", other),
    }
}

#[test]
fn test_probability_gates_the_randomization_seed() {
    let family = SvcFamily::default();
    let mut trial = FixedTrial::new()
        .with("kernel", "rbf".into())
        .with("degree", ParamValue::Int(3))
        .with("gamma", "scale".into())
        .with("coef0", ParamValue::Float(0.2))
        .with("tol", ParamValue::Float(1e-4))
        .with("c", ParamValue::Float(0.95))
        .with("class_weight", "balanced".into())
        .with("shrinking", ParamValue::Bool(true))
        .with("probability", ParamValue::Bool(false))
        .with("random_state", ParamValue::Int(1234));

    let params = family.sample_params(Some(&mut trial)).unwrap();
    assert!(!params.contains("random_state"));
    assert_eq!(
        trial.user_attrs().get("random_state"),
        Some(&ParamValue::None)
    );

    match family.construct(&params).unwrap() {
        Estimator::Svc(config) => assert_eq!(config.random_state, None),
        other => panic!("unexpected estimator: {:?}", other),
    }
}

#[test]
fn test_linear_svc_support_matrix_is_closed_under_correction() {
    let family = LinearSvcFamily::default();
    for penalty in ["l1", "l2"] {
        for loss in ["hinge", "squared_hinge"] {
            for dual in [false, true] {
                let mut trial = FixedTrial::new()
                    .with("penalty", penalty.into())
                    .with("loss", loss.into())
                    .with("dual", ParamValue::Bool(dual))
                    .with("tol", ParamValue::Float(1e-4))
                    .with("c", ParamValue::Float(0.95))
                    .with("fit_intercept", ParamValue::Bool(true))
                    .with("intercept_scaling", ParamValue::Float(0.8))
                    .with("class_weight", "balanced".into())
                    .with("max_iter", ParamValue::Int(1000));

                let result = family.sample_estimator(Some(&mut trial));
                assert!(
                    result.is_ok(),
                    "penalty={} loss={} dual={} failed: {:?}",
                    penalty,
                    loss,
                    dual,
                    result.err()
                );
            }
        }
    }
}

#[test]
fn test_untouched_parameters_leave_no_audit_trail() {
    let family = LogisticRegressionFamily::default();
    let mut trial = logistic_trial("saga", "elasticnet");
    let params = family.sample_params(Some(&mut trial)).unwrap();

    // elasticnet on saga is valid as drawn; only dual gets rewritten
    assert_eq!(params.require_float("l1_ratio").unwrap(), 0.4);
    assert!(!trial.user_attrs().contains("penalty"));
    assert!(!trial.user_attrs().contains("l1_ratio"));
}

#[test]
fn test_corrected_samples_survive_a_long_random_sweep() {
    let family = LogisticRegressionFamily::default();
    for seed in 0..500 {
        let mut trial = RandomTrial::seeded(seed);
        let result = family.sample_estimator(Some(&mut trial));
        assert!(result.is_ok(), "seed {}: {:?}", seed, result.err());
    }
}
