//! Linguistic Variables

use crate::membership::MembershipFunction;
use crate::ConfigurationError;
use std::collections::HashMap;

/// Named qualitative value of a variable
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    name: String,
    function: MembershipFunction,
}

impl Term {
    /// Term name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Membership function of the term
    pub fn function(&self) -> &MembershipFunction {
        &self.function
    }
}

/// Named dimension over a bounded, discretized universe of discourse
#[derive(Debug, Clone)]
pub struct LinguisticVariable {
    name: String,
    min: f64,
    max: f64,
    /// Terms in registration order
    terms: Vec<Term>,
    /// Term name -> position in `terms`
    index: HashMap<String, usize>,
    /// Evenly spaced sample points, first = min, last = max
    universe: Vec<f64>,
}

impl LinguisticVariable {
    /// Create a variable with no terms
    pub fn new(
        name: impl Into<String>,
        min: f64,
        max: f64,
        resolution: usize,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(ConfigurationError::InvalidDomain { variable: name, min, max });
        }
        if resolution < 2 {
            return Err(ConfigurationError::InvalidResolution { variable: name, resolution });
        }

        let step = (max - min) / (resolution - 1) as f64;
        let mut universe: Vec<f64> = (0..resolution).map(|i| min + step * i as f64).collect();
        // Pin the last point so rounding never leaves it outside the domain
        universe[resolution - 1] = max;

        Ok(Self {
            name,
            min,
            max,
            terms: Vec::new(),
            index: HashMap::new(),
            universe,
        })
    }

    /// Register a triangular term
    pub fn add_term(
        &mut self,
        name: impl Into<String>,
        a: f64,
        b: f64,
        c: f64,
    ) -> Result<&mut Self, ConfigurationError> {
        let name = name.into();
        let function = MembershipFunction::triangular(a, b, c)?;

        if self.index.contains_key(&name) {
            return Err(ConfigurationError::DuplicateTerm {
                variable: self.name.clone(),
                term: name,
            });
        }
        if a < self.min || c > self.max {
            return Err(ConfigurationError::SupportOutsideDomain {
                variable: self.name.clone(),
                term: name,
                a,
                c,
                min: self.min,
                max: self.max,
            });
        }

        self.index.insert(name.clone(), self.terms.len());
        self.terms.push(Term { name, function });
        Ok(self)
    }

    /// Builder-style variant of [`add_term`](Self::add_term)
    pub fn with_term(
        mut self,
        name: impl Into<String>,
        a: f64,
        b: f64,
        c: f64,
    ) -> Result<Self, ConfigurationError> {
        self.add_term(name, a, b, c)?;
        Ok(self)
    }

    /// Look up a term's membership function by name
    pub fn term(&self, name: &str) -> Result<&MembershipFunction, ConfigurationError> {
        self.term_index(name)
            .map(|i| &self.terms[i].function)
            .ok_or_else(|| ConfigurationError::UnknownTerm {
                variable: self.name.clone(),
                term: name.to_string(),
            })
    }

    /// Registration position of a term
    pub fn term_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Domain bounds `(min, max)`
    pub fn domain(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn resolution(&self) -> usize {
        self.universe.len()
    }

    /// Cached sample points of the universe of discourse
    pub fn universe(&self) -> &[f64] {
        &self.universe
    }

    /// Clamp a crisp value into the domain
    pub fn clip(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    /// Membership degree of `x` in every term, in registration order
    pub fn fuzzify(&self, x: f64) -> Vec<f64> {
        self.terms.iter().map(|t| t.function.membership(x)).collect()
    }

    /// Membership curve of a term sampled over the universe
    pub fn curve(&self, term: &str) -> Result<Vec<f64>, ConfigurationError> {
        Ok(self.term(term)?.sample(&self.universe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_variable() -> LinguisticVariable {
        LinguisticVariable::new("forecast_error", 0.0, 1.0, 101)
            .unwrap()
            .with_term("low", 0.0, 0.0, 0.4)
            .unwrap()
            .with_term("medium", 0.2, 0.5, 0.8)
            .unwrap()
            .with_term("high", 0.6, 1.0, 1.0)
            .unwrap()
    }

    #[test]
    fn test_universe_is_evenly_spaced() {
        let var = LinguisticVariable::new("anomaly_level", 0.0, 10.0, 101).unwrap();
        let universe = var.universe();
        assert_eq!(universe.len(), 101);
        assert_eq!(universe[0], 0.0);
        assert_eq!(universe[100], 10.0);
        assert!((universe[50] - 5.0).abs() < 1e-12);
        assert!(universe.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_term_lookup() {
        let var = error_variable();
        assert_eq!(var.term("medium").unwrap().params(), (0.2, 0.5, 0.8));
        assert_eq!(var.term_index("high"), Some(2));

        let err = var.term("extreme").unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownTerm { .. }));
    }

    #[test]
    fn test_fuzzify_in_registration_order() {
        let var = error_variable();
        let degrees = var.fuzzify(0.3);
        assert_eq!(degrees.len(), 3);
        assert!((degrees[0] - 0.25).abs() < 1e-12);
        assert!((degrees[1] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(degrees[2], 0.0);
    }

    #[test]
    fn test_clip() {
        let var = error_variable();
        assert_eq!(var.clip(-1.0), 0.0);
        assert_eq!(var.clip(2.0), 1.0);
        assert_eq!(var.clip(0.42), 0.42);
    }

    #[test]
    fn test_rejects_bad_terms() {
        let mut var = LinguisticVariable::new("variance_change", 0.0, 1.0, 11).unwrap();
        assert!(matches!(
            var.add_term("low", 0.4, 0.0, 0.0),
            Err(ConfigurationError::InvalidMembership { .. })
        ));
        assert!(matches!(
            var.add_term("wide", -0.5, 0.5, 1.0),
            Err(ConfigurationError::SupportOutsideDomain { .. })
        ));
        var.add_term("low", 0.0, 0.0, 0.4).unwrap();
        assert!(matches!(
            var.add_term("low", 0.0, 0.1, 0.4),
            Err(ConfigurationError::DuplicateTerm { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_domain() {
        assert!(LinguisticVariable::new("x", 1.0, 1.0, 101).is_err());
        assert!(LinguisticVariable::new("x", 0.0, f64::NAN, 101).is_err());
        assert!(matches!(
            LinguisticVariable::new("x", 0.0, 1.0, 1),
            Err(ConfigurationError::InvalidResolution { resolution: 1, .. })
        ));
    }

    #[test]
    fn test_curve() {
        let var = LinguisticVariable::new("y", 0.0, 10.0, 11)
            .unwrap()
            .with_term("normal", 0.0, 0.0, 3.0)
            .unwrap();
        let curve = var.curve("normal").unwrap();
        assert_eq!(curve.len(), 11);
        assert_eq!(curve[0], 1.0);
        assert_eq!(curve[3], 0.0);
        assert!(curve[4..].iter().all(|&mu| mu == 0.0));
    }
}
