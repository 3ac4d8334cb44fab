//! Command-line interface
//!
//! Lists registered families, prints their search spaces, and draws sampled
//! estimator configurations as JSON.

use clap::{Parser, Subcommand};
use colored::*;

use crate::error::Result;
use crate::registry::{create_family_by_name, FamilyKind};
use crate::space::Domain;
use crate::trial::RandomTrial;

#[derive(Parser)]
#[command(name = "tune-classifier")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search-space declarations and trial-driven estimator construction")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every registered estimator family
    List,

    /// Print a family's declared domains and correction rule count
    Show {
        /// Registry name, e.g. logistic_regression
        family: String,
    },

    /// Sample estimator configurations from a family
    Sample {
        /// Registry name, e.g. svc
        family: String,

        /// Number of configurations to draw
        #[arg(short, long, default_value = "1")]
        count: u32,

        /// Seed for reproducible draws; omitted means entropy-seeded
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

pub fn cmd_list() {
    println!("{}", "registered families".bold());
    for kind in FamilyKind::all() {
        let family = kind.create();
        let rules = family.corrections().len();
        let domains = family.space().len();
        println!(
            "  {:<22} {} domains, {} corrections",
            kind.name().cyan(),
            domains,
            rules
        );
    }
}

pub fn cmd_show(name: &str) -> Result<()> {
    let family = create_family_by_name(name)?;
    let space = family.space();

    println!("{}", family.name().bold());
    for (param, domain) in space.iter() {
        let rendered = match domain {
            Domain::Categorical(choices) => format!("categorical {{{}}}", choices.join(", ")),
            Domain::Float { low, high, log: false } => format!("float [{}, {}]", low, high),
            Domain::Float { low, high, log: true } => format!("float [{}, {}] log", low, high),
            Domain::Int { low, high, log: false } => format!("int [{}, {}]", low, high),
            Domain::Int { low, high, log: true } => format!("int [{}, {}] log", low, high),
            Domain::Bool => "bool".to_string(),
        };
        println!("  {:<22} {}", param.cyan(), rendered);
    }
    let rules = family.corrections().len();
    if rules > 0 {
        println!("  {} correction rule(s) applied after sampling", rules);
    }
    Ok(())
}

pub fn cmd_sample(name: &str, count: u32, seed: Option<u64>) -> Result<()> {
    let family = create_family_by_name(name)?;
    let mut trial = match seed {
        Some(seed) => RandomTrial::seeded(seed),
        None => RandomTrial::new(),
    };

    for _ in 0..count {
        let estimator = family.sample_estimator(Some(&mut trial))?;
        println!("{}", serde_json::to_string_pretty(&estimator)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_show_rejects_unknown_family() {
        assert!(cmd_show("quantum_forest").is_err());
    }

    #[test]
    fn test_sample_draws_requested_count() {
        assert!(cmd_sample("gaussian_nb", 3, Some(7)).is_ok());
    }
}
