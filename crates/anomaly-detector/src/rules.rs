//! Variables and rule base of the anomaly detector

use crate::config::DetectorConfig;
use crate::level::AnomalyLevel;
use fuzzy_engine::{Antecedent, ConfigurationError, LinguisticVariable, Rule};

pub const FORECAST_ERROR: &str = "forecast_error";
pub const VARIANCE_CHANGE: &str = "variance_change";
pub const CORRELATION_CHANGE: &str = "correlation_change";
pub const ANOMALY_LEVEL: &str = "anomaly_level";

/// Input variables in evaluation order
pub const INPUT_NAMES: [&str; 3] = [FORECAST_ERROR, VARIANCE_CHANGE, CORRELATION_CHANGE];

const LOW: &str = "low";
const MEDIUM: &str = "medium";
const HIGH: &str = "high";

/// Reference domains the breakpoints below are written against
const INPUT_REFERENCE: (f64, f64) = (0.0, 1.0);
const OUTPUT_REFERENCE: (f64, f64) = (0.0, 10.0);

const INPUT_TERMS: [(&str, [f64; 3]); 3] = [
    (LOW, [0.0, 0.0, 0.4]),
    (MEDIUM, [0.2, 0.5, 0.8]),
    (HIGH, [0.6, 1.0, 1.0]),
];

const OUTPUT_TERMS: [(AnomalyLevel, [f64; 3]); 4] = [
    (AnomalyLevel::Normal, [0.0, 0.0, 3.0]),
    (AnomalyLevel::SlightlyAnomalous, [1.0, 3.0, 5.0]),
    (AnomalyLevel::ModeratelyAnomalous, [3.0, 5.0, 7.0]),
    (AnomalyLevel::StronglyAnomalous, [6.0, 10.0, 10.0]),
];

/// Map a breakpoint from the reference domain onto `domain`
fn rescale(point: f64, reference: (f64, f64), domain: (f64, f64)) -> f64 {
    let scale = (domain.1 - domain.0) / (reference.1 - reference.0);
    (domain.0 + (point - reference.0) * scale).clamp(domain.0, domain.1)
}

fn build_variable<'a>(
    name: &str,
    domain: (f64, f64),
    reference: (f64, f64),
    resolution: usize,
    terms: impl IntoIterator<Item = (&'a str, [f64; 3])>,
) -> Result<LinguisticVariable, ConfigurationError> {
    let mut variable = LinguisticVariable::new(name, domain.0, domain.1, resolution)?;
    for (term, [a, b, c]) in terms {
        variable.add_term(
            term,
            rescale(a, reference, domain),
            rescale(b, reference, domain),
            rescale(c, reference, domain),
        )?;
    }
    Ok(variable)
}

/// The three indicator variables with `low` / `medium` / `high` terms
pub(crate) fn input_variables(
    config: &DetectorConfig,
) -> Result<Vec<LinguisticVariable>, ConfigurationError> {
    INPUT_NAMES
        .iter()
        .map(|name| {
            build_variable(
                name,
                config.input_domain,
                INPUT_REFERENCE,
                config.resolution,
                INPUT_TERMS,
            )
        })
        .collect()
}

/// `anomaly_level`, with terms registered in `AnomalyLevel::ALL` order
pub(crate) fn output_variable(
    config: &DetectorConfig,
) -> Result<LinguisticVariable, ConfigurationError> {
    build_variable(
        ANOMALY_LEVEL,
        config.output_domain,
        OUTPUT_REFERENCE,
        config.resolution,
        OUTPUT_TERMS.iter().map(|(level, shape)| (level.as_str(), *shape)),
    )
}

fn rule(label: &str, literals: &[(&str, &str)], level: AnomalyLevel) -> Rule {
    Rule::new(
        label,
        Antecedent::all(literals.iter().copied()),
        ANOMALY_LEVEL,
        level.as_str(),
    )
}

/// The fixed 14-rule base
///
/// All low is normal, a single medium factor is slightly anomalous, two medium
/// factors are moderately anomalous, and two high factors (or one high with
/// another medium) are strongly anomalous.
pub fn default_rules() -> Vec<Rule> {
    use AnomalyLevel::*;

    let fe = FORECAST_ERROR;
    let vc = VARIANCE_CHANGE;
    let cc = CORRELATION_CHANGE;

    vec![
        rule("R1_normal_all_low", &[(fe, LOW), (vc, LOW), (cc, LOW)], Normal),
        rule("R2_slightly_anom_medium_fe", &[(fe, MEDIUM), (vc, LOW), (cc, LOW)], SlightlyAnomalous),
        rule("R3_slightly_anom_medium_vc", &[(fe, LOW), (vc, MEDIUM), (cc, LOW)], SlightlyAnomalous),
        rule("R4_slightly_anom_medium_cc", &[(fe, LOW), (vc, LOW), (cc, MEDIUM)], SlightlyAnomalous),
        rule("R5_moderate_fe_vc", &[(fe, MEDIUM), (vc, MEDIUM)], ModeratelyAnomalous),
        rule("R6_moderate_fe_cc", &[(fe, MEDIUM), (cc, MEDIUM)], ModeratelyAnomalous),
        rule("R7_moderate_vc_cc", &[(vc, MEDIUM), (cc, MEDIUM)], ModeratelyAnomalous),
        rule("R8_strong_fe_vc", &[(fe, HIGH), (vc, HIGH)], StronglyAnomalous),
        rule("R9_strong_fe_cc", &[(fe, HIGH), (cc, HIGH)], StronglyAnomalous),
        rule("R10_strong_vc_cc", &[(vc, HIGH), (cc, HIGH)], StronglyAnomalous),
        rule("R11_high_fe_medium_vc", &[(fe, HIGH), (vc, MEDIUM)], StronglyAnomalous),
        rule("R12_medium_fe_high_vc", &[(fe, MEDIUM), (vc, HIGH)], StronglyAnomalous),
        rule("R13_high_fe_medium_cc", &[(fe, HIGH), (cc, MEDIUM)], StronglyAnomalous),
        rule("R14_high_vc_medium_cc", &[(vc, HIGH), (cc, MEDIUM)], StronglyAnomalous),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_base_shape() {
        let rules = default_rules();
        assert_eq!(rules.len(), 14);
        assert!(rules.iter().all(|r| r.weight == 1.0));
        assert!(rules.iter().all(|r| r.consequent.variable == ANOMALY_LEVEL));

        let strong = rules
            .iter()
            .filter(|r| r.consequent.term == AnomalyLevel::StronglyAnomalous.as_str())
            .count();
        assert_eq!(strong, 7);
    }

    #[test]
    fn test_default_breakpoints_are_unchanged() {
        let config = DetectorConfig::default();
        let output = output_variable(&config).unwrap();
        assert_eq!(output.term("normal").unwrap().params(), (0.0, 0.0, 3.0));
        assert_eq!(output.term("strongly_anomalous").unwrap().params(), (6.0, 10.0, 10.0));

        let inputs = input_variables(&config).unwrap();
        assert_eq!(inputs.len(), 3);
        assert_eq!(inputs[1].name(), VARIANCE_CHANGE);
        assert_eq!(inputs[1].term("medium").unwrap().params(), (0.2, 0.5, 0.8));
    }

    #[test]
    fn test_breakpoints_follow_domain_override() {
        let config = DetectorConfig {
            input_domain: (0.0, 2.0),
            output_domain: (0.0, 100.0),
            ..Default::default()
        };
        let inputs = input_variables(&config).unwrap();
        assert_eq!(inputs[0].term("high").unwrap().params(), (1.2, 2.0, 2.0));

        let output = output_variable(&config).unwrap();
        assert_eq!(output.term("moderately_anomalous").unwrap().params(), (30.0, 50.0, 70.0));
    }

    #[test]
    fn test_output_terms_follow_level_order() {
        let output = output_variable(&DetectorConfig::default()).unwrap();
        for (i, level) in AnomalyLevel::ALL.iter().enumerate() {
            assert_eq!(output.term_index(level.as_str()), Some(i));
        }
    }
}
