//! Integration tests for the family catalogue
//!
//! Every family is exercised through the registry the way a tuning loop
//! would use it: sample parameters through a trial, apply corrections,
//! construct the estimator.

use tune_classifier::prelude::*;
use tune_classifier::space::Domain;
use tune_classifier::trial::RandomTrial;

#[test]
fn test_every_family_samples_and_constructs() {
    for kind in FamilyKind::all() {
        let family = kind.create();
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

#[test]
fn test_every_family_space_is_well_formed() {
    for kind in FamilyKind::all() {
        let family = kind.create();
        let space = family.space();
        assert!(!space.is_empty(), "{} declares no domains", family.name());
        let result = space.validate();
        assert!(
            result.is_ok(),
            "{} has a malformed domain: {:?}",
            family.name(),
            result.err()
        );
    }
}

#[test]
fn test_sampled_values_respect_declared_domains() {
    for kind in FamilyKind::all() {
        let family = kind.create();
        let space = family.space();
        for seed in 0..20 {
            let mut trial = RandomTrial::seeded(seed);
            let params = space.suggest_all(&mut trial).unwrap();

            for (name, domain) in space.iter() {
                let value = params.require(name).unwrap();
                match domain {
                    Domain::Categorical(choices) => {
                        let v = value.as_str().unwrap();
                        assert!(
                            choices.iter().any(|c| c == v),
                            "{}.{}: {} not among choices",
                            family.name(),
                            name,
                            v
                        );
                    }
                    Domain::Float { low, high, .. } => {
                        let v = value.as_float().unwrap();
                        assert!(
                            (*low..=*high).contains(&v),
                            "{}.{}: {} outside [{}, {}]",
                            family.name(),
                            name,
                            v,
                            low,
                            high
                        );
                    }
                    Domain::Int { low, high, .. } => {
                        let v = value.as_int().unwrap();
                        assert!(
                            (*low..=*high).contains(&v),
                            "{}.{}: {} outside [{}, {}]",
                            family.name(),
                            name,
                            v,
                            low,
                            high
                        );
                    }
                    Domain::Bool => {
                        assert!(value.as_bool().is_some());
                    }
                }
            }
        }
    }
}

#[test]
fn test_seeded_sampling_is_reproducible() {
    for kind in FamilyKind::all() {
        let family = kind.create();
        let mut first = RandomTrial::seeded(99);
        let mut second = RandomTrial::seeded(99);
        let a = family.sample_estimator(Some(&mut first)).unwrap();
        let b = family.sample_estimator(Some(&mut second)).unwrap();
        assert_eq!(a, b, "{} diverged under the same seed", family.name());
    }
}

#[test]
fn test_missing_trial_is_rejected_uniformly() {
    for kind in FamilyKind::all() {
        let family = kind.create();
        assert!(matches!(
            family.sample_estimator(None),
            Err(TuneError::TrialRequired)
        ));
        assert!(matches!(
            family.sample_params(None),
            Err(TuneError::TrialRequired)
        ));
    }
}

#[test]
fn test_estimators_serialize_to_json() {
    for kind in FamilyKind::all() {
        let family = kind.create();
        let mut trial = RandomTrial::seeded(3);
        let estimator = family.sample_estimator(Some(&mut trial)).unwrap();
        let json = serde_json::to_string(&estimator).unwrap();
        let back: Estimator = serde_json::from_str(&json).unwrap();
        assert_eq!(estimator, back);
    }
}

#[test]
fn test_registry_lookup_by_name() {
    let family = create_family_by_name("random_forest").unwrap();
    assert_eq!(family.name(), "random_forest");

    let result = create_family_by_name("does_not_exist");
    assert!(matches!(result, Err(TuneError::UnknownFamily(_))));
}
