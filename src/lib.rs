//! tune-classifier - Declarative hyperparameter search spaces
//!
//! This crate turns per-family hyperparameter knowledge into data:
//! - Each classifier family declares its search space once
//! - Values are drawn through an opaque [`trial::Trial`] handle
//! - Invalid combinations are resolved by per-family correction tables
//! - A validating constructor maps the final parameters to a typed estimator
//!
//! # Modules
//!
//! - [`space`] - Ordered domain declarations per family
//! - [`trial`] - Suggestion backends (random, fixed)
//! - [`rules`] - Table-driven post-sampling corrections
//! - [`families`] - The estimator family catalogue
//! - [`registry`] - Name-based family lookup
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Sampling
pub mod params;
pub mod space;
pub mod trial;

// Correction rules and the family catalogue
pub mod rules;
pub mod families;
pub mod registry;

// Services
pub mod cli;

// Re-export commonly used types
pub use error::{Result, TuneError};
pub use families::{Estimator, Family};
pub use params::{ParamSet, ParamValue};
pub use registry::{create_family_by_name, FamilyKind};
pub use space::{Domain, SearchSpace};
pub use trial::{FixedTrial, RandomTrial, Trial};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Result, TuneError};
    pub use crate::families::{Estimator, Family};
    pub use crate::params::{ParamSet, ParamValue};
    pub use crate::registry::{create_family_by_name, FamilyKind};
    pub use crate::rules::{Cond, Correction, RuleValue};
    pub use crate::space::{Domain, SearchSpace};
    pub use crate::trial::{FixedTrial, RandomTrial, Trial};
}
