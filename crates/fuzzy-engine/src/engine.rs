//! Mamdani Inference Engine

use crate::rule::{Antecedent, Literal, Rule};
use crate::variable::LinguisticVariable;
use crate::{ConfigurationError, InvalidInputError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, trace, warn};

/// What to report when no rule fires and the aggregated set is empty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyOutputPolicy {
    /// Lower bound of the output domain
    #[default]
    DomainMin,
    /// Centre of the output domain
    DomainMidpoint,
}

/// Firing strength of one rule for one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleActivation {
    pub label: String,
    pub consequent: String,
    pub strength: f64,
}

/// Outcome of a single evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Defuzzified output value
    pub crisp_value: f64,
    /// Output term with the highest membership at `crisp_value`
    pub label: String,
    /// Registration position of `label` in the output variable
    pub label_index: usize,
    /// Membership of `crisp_value` in every output term, in registration order
    pub membership_by_label: Vec<(String, f64)>,
    /// One entry per rule, in rule order
    pub activations: Vec<RuleActivation>,
    /// Set when no rule fired and the empty-output policy supplied the value
    pub fallback_applied: bool,
}

impl EvaluationResult {
    /// Membership of the crisp value in the named output term
    pub fn membership(&self, label: &str) -> Option<f64> {
        self.membership_by_label
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, mu)| *mu)
    }

    /// Rule with the highest firing strength, if any fired
    pub fn strongest_rule(&self) -> Option<&RuleActivation> {
        self.activations
            .iter()
            .filter(|a| a.strength > 0.0)
            .fold(None, |best: Option<&RuleActivation>, a| match best {
                Some(b) if b.strength >= a.strength => Some(b),
                _ => Some(a),
            })
    }
}

/// Resolved `(input variable, term)` position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TermRef {
    variable: usize,
    term: usize,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    label: String,
    antecedent: Antecedent<TermRef>,
    /// Term index in the output variable
    consequent: usize,
    weight: f64,
}

/// Single-output Mamdani fuzzy inference system
///
/// Immutable after construction; `evaluate` allocates its own scratch buffers,
/// so one engine can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct FuzzyEngine {
    inputs: Vec<LinguisticVariable>,
    output: LinguisticVariable,
    rules: Vec<CompiledRule>,
    /// Output term curves sampled over the output universe
    curves: Vec<Vec<f64>>,
    empty_output: EmptyOutputPolicy,
}

impl FuzzyEngine {
    /// Validate and compile a rule base over the given variables
    pub fn new(
        inputs: Vec<LinguisticVariable>,
        output: LinguisticVariable,
        rules: Vec<Rule>,
    ) -> Result<Self, ConfigurationError> {
        if rules.is_empty() {
            return Err(ConfigurationError::EmptyRuleSet);
        }

        let mut seen = HashSet::new();
        for name in inputs.iter().map(|v| v.name()).chain([output.name()]) {
            if !seen.insert(name) {
                return Err(ConfigurationError::DuplicateVariable(name.to_string()));
            }
        }

        let compiled = rules
            .iter()
            .map(|rule| Self::compile(rule, &inputs, &output))
            .collect::<Result<Vec<_>, _>>()?;

        let curves = output
            .terms()
            .iter()
            .map(|t| t.function().sample(output.universe()))
            .collect();

        info!(
            "Created fuzzy engine: {} inputs, output {} ({} points), {} rules",
            inputs.len(),
            output.name(),
            output.resolution(),
            compiled.len()
        );

        Ok(Self {
            inputs,
            output,
            rules: compiled,
            curves,
            empty_output: EmptyOutputPolicy::default(),
        })
    }

    /// Choose the value reported when no rule fires
    pub fn with_empty_output(mut self, policy: EmptyOutputPolicy) -> Self {
        self.empty_output = policy;
        self
    }

    fn compile(
        rule: &Rule,
        inputs: &[LinguisticVariable],
        output: &LinguisticVariable,
    ) -> Result<CompiledRule, ConfigurationError> {
        rule.check_weight()?;
        if rule.antecedent.has_empty_group() {
            return Err(ConfigurationError::EmptyAntecedent(rule.label.clone()));
        }

        let mut resolve = |lit: &Literal| -> Result<TermRef, ConfigurationError> {
            let variable = inputs
                .iter()
                .position(|v| v.name() == lit.variable)
                .ok_or_else(|| ConfigurationError::UnknownVariable(lit.variable.clone()))?;
            let term = inputs[variable].term_index(&lit.term).ok_or_else(|| {
                ConfigurationError::UnknownTerm {
                    variable: lit.variable.clone(),
                    term: lit.term.clone(),
                }
            })?;
            Ok(TermRef { variable, term })
        };
        let antecedent = rule.antecedent.try_map(&mut resolve)?;

        if rule.consequent.variable != output.name() {
            return Err(ConfigurationError::ConsequentNotOutput {
                rule: rule.label.clone(),
                expected: output.name().to_string(),
                actual: rule.consequent.variable.clone(),
            });
        }
        let consequent = output.term_index(&rule.consequent.term).ok_or_else(|| {
            ConfigurationError::UnknownTerm {
                variable: rule.consequent.variable.clone(),
                term: rule.consequent.term.clone(),
            }
        })?;

        Ok(CompiledRule {
            label: rule.label.clone(),
            antecedent,
            consequent,
            weight: rule.weight,
        })
    }

    /// Evaluate inputs given by variable name
    pub fn evaluate(
        &self,
        inputs: &HashMap<String, f64>,
    ) -> Result<EvaluationResult, InvalidInputError> {
        if let Some(unknown) = inputs
            .keys()
            .find(|k| !self.inputs.iter().any(|v| v.name() == k.as_str()))
        {
            return Err(InvalidInputError::UnknownVariable(unknown.clone()));
        }

        let ordered = self
            .inputs
            .iter()
            .map(|v| {
                inputs
                    .get(v.name())
                    .copied()
                    .ok_or_else(|| InvalidInputError::Missing(v.name().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.evaluate_ordered(&ordered)
    }

    /// Evaluate inputs given in input-variable registration order
    pub fn evaluate_ordered(&self, values: &[f64]) -> Result<EvaluationResult, InvalidInputError> {
        if values.len() != self.inputs.len() {
            return Err(InvalidInputError::WrongCount {
                expected: self.inputs.len(),
                actual: values.len(),
            });
        }

        // Fuzzify each clipped input once; rules share the degrees
        let mut degrees = Vec::with_capacity(values.len());
        for (variable, &value) in self.inputs.iter().zip(values) {
            if !value.is_finite() {
                return Err(InvalidInputError::NonFinite {
                    variable: variable.name().to_string(),
                    value,
                });
            }
            degrees.push(variable.fuzzify(variable.clip(value)));
        }

        let mut aggregated = vec![0.0f64; self.output.resolution()];
        let mut activations = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let strength = rule
                .antecedent
                .strength(&|r: &TermRef| degrees[r.variable][r.term])
                * rule.weight;
            trace!("Rule {} fired with strength {:.4}", rule.label, strength);

            if strength > 0.0 {
                // Implication clips the consequent; aggregation keeps the pointwise max
                for (agg, &mu) in aggregated.iter_mut().zip(&self.curves[rule.consequent]) {
                    *agg = agg.max(mu.min(strength));
                }
            }

            activations.push(RuleActivation {
                label: rule.label.clone(),
                consequent: self.output.terms()[rule.consequent].name().to_string(),
                strength,
            });
        }

        let (crisp_value, fallback_applied) = match self.centroid(&aggregated) {
            Some(value) => (value, false),
            None => {
                let value = self.fallback_value();
                warn!(
                    "No rule fired for inputs {:?}; using {:?} fallback {}",
                    values, self.empty_output, value
                );
                (value, true)
            }
        };

        let membership_by_label: Vec<(String, f64)> = self
            .output
            .terms()
            .iter()
            .map(|t| (t.name().to_string(), t.function().membership(crisp_value)))
            .collect();

        // Strict comparison keeps the earliest term on ties
        let mut label_index = 0;
        for (i, (_, mu)) in membership_by_label.iter().enumerate() {
            if *mu > membership_by_label[label_index].1 {
                label_index = i;
            }
        }
        let label = membership_by_label
            .get(label_index)
            .map(|(name, _)| name.clone())
            .unwrap_or_default();

        debug!(
            "Evaluated {:?} -> {} = {:.3} ({})",
            values,
            self.output.name(),
            crisp_value,
            label
        );

        Ok(EvaluationResult {
            crisp_value,
            label,
            label_index,
            membership_by_label,
            activations,
            fallback_applied,
        })
    }

    /// Center of gravity of the aggregated curve, `None` when it is identically zero
    fn centroid(&self, aggregated: &[f64]) -> Option<f64> {
        let (numerator, denominator) = self
            .output
            .universe()
            .iter()
            .zip(aggregated)
            .fold((0.0, 0.0), |(num, den), (&x, &mu)| (num + x * mu, den + mu));

        if denominator > 0.0 {
            Some(self.output.clip(numerator / denominator))
        } else {
            None
        }
    }

    fn fallback_value(&self) -> f64 {
        let (min, max) = self.output.domain();
        match self.empty_output {
            EmptyOutputPolicy::DomainMin => min,
            EmptyOutputPolicy::DomainMidpoint => min + (max - min) / 2.0,
        }
    }

    pub fn inputs(&self) -> &[LinguisticVariable] {
        &self.inputs
    }

    pub fn output(&self) -> &LinguisticVariable {
        &self.output
    }

    /// Number of compiled rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Rule labels in evaluation order
    pub fn rule_labels(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.label.as_str())
    }

    pub fn empty_output(&self) -> EmptyOutputPolicy {
        self.empty_output
    }
}
