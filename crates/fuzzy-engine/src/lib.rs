//! Mamdani Fuzzy Inference Engine
//!
//! Provides triangular membership functions, linguistic variables, rule
//! antecedent trees and a min/max inference engine with centroid
//! defuzzification.

mod engine;
mod membership;
mod rule;
mod variable;

pub use engine::{EmptyOutputPolicy, EvaluationResult, FuzzyEngine, RuleActivation};
pub use membership::MembershipFunction;
pub use rule::{Antecedent, Literal, Rule};
pub use variable::{LinguisticVariable, Term};

use thiserror::Error;

/// Errors raised while building variables, rules or engines
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("Invalid membership parameters [{a}, {b}, {c}]: expected finite a <= b <= c")]
    InvalidMembership { a: f64, b: f64, c: f64 },
    #[error("Invalid domain [{min}, {max}] for variable {variable}")]
    InvalidDomain { variable: String, min: f64, max: f64 },
    #[error("Resolution {resolution} for variable {variable} is below the minimum of 2")]
    InvalidResolution { variable: String, resolution: usize },
    #[error("Term {term} of {variable} has support [{a}, {c}] outside the domain [{min}, {max}]")]
    SupportOutsideDomain {
        variable: String,
        term: String,
        a: f64,
        c: f64,
        min: f64,
        max: f64,
    },
    #[error("Duplicate term {term} in variable {variable}")]
    DuplicateTerm { variable: String, term: String },
    #[error("Duplicate variable {0}")]
    DuplicateVariable(String),
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),
    #[error("Unknown term {term} for variable {variable}")]
    UnknownTerm { variable: String, term: String },
    #[error("Rule {rule} consequent must reference output variable {expected}, got {actual}")]
    ConsequentNotOutput {
        rule: String,
        expected: String,
        actual: String,
    },
    #[error("Rule {0} has an empty AND/OR group")]
    EmptyAntecedent(String),
    #[error("Rule {rule} weight {weight} is outside [0, 1]")]
    InvalidWeight { rule: String, weight: f64 },
    #[error("Rule set is empty")]
    EmptyRuleSet,
}

/// Errors raised while evaluating crisp inputs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInputError {
    #[error("Input {variable} is not a finite number: {value}")]
    NonFinite { variable: String, value: f64 },
    #[error("Missing input for variable {0}")]
    Missing(String),
    #[error("Input supplied for unknown variable {0}")]
    UnknownVariable(String),
    #[error("Expected {expected} inputs, got {actual}")]
    WrongCount { expected: usize, actual: usize },
}

/// Either kind of failure, for operations that both resolve names and read inputs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FuzzyError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
}
