//! Fuzzy Rules and Antecedent Trees

use crate::variable::LinguisticVariable;
use crate::{ConfigurationError, FuzzyError, InvalidInputError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `variable IS term`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub variable: String,
    pub term: String,
}

/// Antecedent expression tree
///
/// `L` is the leaf type: [`Literal`] for rules declared by name, or a resolved
/// index pair once the engine has compiled the rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Antecedent<L = Literal> {
    Literal(L),
    /// Fuzzy AND (minimum t-norm)
    And(Vec<Antecedent<L>>),
    /// Fuzzy OR (maximum t-conorm)
    Or(Vec<Antecedent<L>>),
}

impl Antecedent<Literal> {
    /// Leaf `variable IS term`
    pub fn is(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Antecedent::Literal(Literal {
            variable: variable.into(),
            term: term.into(),
        })
    }

    /// Conjunction of several `(variable, term)` literals
    pub fn all<'a>(literals: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Antecedent::And(literals.into_iter().map(|(v, t)| Self::is(v, t)).collect())
    }
}

impl<L> Antecedent<L> {
    /// Conjoin with another expression, flattening nested ANDs
    pub fn and(self, other: Antecedent<L>) -> Self {
        match self {
            Antecedent::And(mut children) => {
                children.push(other);
                Antecedent::And(children)
            }
            first => Antecedent::And(vec![first, other]),
        }
    }

    /// Disjoin with another expression, flattening nested ORs
    pub fn or(self, other: Antecedent<L>) -> Self {
        match self {
            Antecedent::Or(mut children) => {
                children.push(other);
                Antecedent::Or(children)
            }
            first => Antecedent::Or(vec![first, other]),
        }
    }

    /// Degree to which the expression holds, given the degree of each leaf
    pub fn strength<F>(&self, degree: &F) -> f64
    where
        F: Fn(&L) -> f64,
    {
        match self {
            Antecedent::Literal(leaf) => degree(leaf),
            Antecedent::And(children) => children
                .iter()
                .map(|c| c.strength(degree))
                .fold(1.0, f64::min),
            Antecedent::Or(children) => children
                .iter()
                .map(|c| c.strength(degree))
                .fold(0.0, f64::max),
        }
    }

    /// Rebuild the tree with every leaf mapped through `f`
    pub fn try_map<M, E, F>(&self, f: &mut F) -> Result<Antecedent<M>, E>
    where
        F: FnMut(&L) -> Result<M, E>,
    {
        Ok(match self {
            Antecedent::Literal(leaf) => Antecedent::Literal(f(leaf)?),
            Antecedent::And(children) => Antecedent::And(
                children
                    .iter()
                    .map(|c| c.try_map(f))
                    .collect::<Result<_, _>>()?,
            ),
            Antecedent::Or(children) => Antecedent::Or(
                children
                    .iter()
                    .map(|c| c.try_map(f))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }

    /// True if some AND/OR node has no children
    pub fn has_empty_group(&self) -> bool {
        match self {
            Antecedent::Literal(_) => false,
            Antecedent::And(children) | Antecedent::Or(children) => {
                children.is_empty() || children.iter().any(Antecedent::has_empty_group)
            }
        }
    }
}

/// IF antecedent THEN consequent_variable IS consequent_term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub label: String,
    pub antecedent: Antecedent,
    pub consequent: Literal,
    /// Scales the firing strength, 1.0 unless set
    pub weight: f64,
}

impl Rule {
    /// Create a rule with weight 1.0
    pub fn new(
        label: impl Into<String>,
        antecedent: Antecedent,
        consequent_variable: impl Into<String>,
        consequent_term: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            antecedent,
            consequent: Literal {
                variable: consequent_variable.into(),
                term: consequent_term.into(),
            },
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Weight must be finite and within `[0, 1]`
    pub fn check_weight(&self) -> Result<(), ConfigurationError> {
        if !self.weight.is_finite() || !(0.0..=1.0).contains(&self.weight) {
            return Err(ConfigurationError::InvalidWeight {
                rule: self.label.clone(),
                weight: self.weight,
            });
        }
        Ok(())
    }

    /// Firing strength for crisp inputs, resolving names against `variables`
    ///
    /// Inputs are evaluated as given; clipping to the domain is the engine's job.
    pub fn fire(
        &self,
        crisp_inputs: &HashMap<String, f64>,
        variables: &[LinguisticVariable],
    ) -> Result<f64, FuzzyError> {
        self.check_weight()?;

        let degrees = self.antecedent.try_map(&mut |lit: &Literal| -> Result<f64, FuzzyError> {
            let variable = variables
                .iter()
                .find(|v| v.name() == lit.variable)
                .ok_or_else(|| ConfigurationError::UnknownVariable(lit.variable.clone()))?;
            let function = variable.term(&lit.term)?;
            let x = *crisp_inputs
                .get(&lit.variable)
                .ok_or_else(|| InvalidInputError::Missing(lit.variable.clone()))?;
            if !x.is_finite() {
                return Err(InvalidInputError::NonFinite {
                    variable: lit.variable.clone(),
                    value: x,
                }
                .into());
            }
            Ok(function.membership(x))
        })?;

        Ok(degrees.strength(&|mu: &f64| *mu) * self.weight)
    }
}
