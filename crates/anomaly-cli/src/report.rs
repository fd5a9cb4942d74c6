//! Text and JSON rendering of assessments

use anomaly_detector::{AnomalyAssessment, AnomalyLevel};
use indicator_engine::Indicators;
use serde::Serialize;

/// One scored window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowReport {
    pub title: String,
    pub indicators: Indicators,
    pub assessment: AnomalyAssessment,
}

/// Output of the `demo` command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoReport {
    pub seed: u64,
    pub windows: Vec<WindowReport>,
}

/// Indicator and label block for one window
pub fn render_window(report: &WindowReport) -> String {
    let indicators = &report.indicators;
    let assessment = &report.assessment;

    let mut lines = vec![
        format!("=== {} ===", report.title),
        format!("Forecast error:         {:.3}", indicators.forecast_error),
        format!("Variance change:        {:.3}", indicators.variance_change),
        format!("Correlation change:     {:.3}", indicators.correlation_change),
        format!("Anomaly level (crisp):  {:.3}", assessment.crisp_value),
        format!("Linguistic label:       {}", assessment.level),
    ];
    if assessment.fallback_applied {
        lines.push("Note:                   no rule fired, fallback value used".to_string());
    }
    block(lines)
}

/// Both demo windows separated by a blank line
pub fn render_demo(report: &DemoReport) -> String {
    let blocks: Vec<String> = report.windows.iter().map(render_window).collect();
    format!("Seed: {}\n\n{}", report.seed, blocks.join("\n"))
}

/// Label, crisp value and label memberships of a single evaluation
pub fn render_assessment(assessment: &AnomalyAssessment) -> String {
    let mut lines = vec![
        format!("Label:        {}", assessment.level),
        format!("Crisp value:  {:.3}", assessment.crisp_value),
        format!("Meaning:      {}", assessment.level.description()),
        "Memberships:".to_string(),
    ];
    for (label, degree) in &assessment.membership_by_label {
        let marker = if label.parse::<AnomalyLevel>().ok() == Some(assessment.level) {
            "*"
        } else {
            " "
        };
        lines.push(format!("  {} {:<22} {:.3}", marker, label, degree));
    }
    if let Some(strongest) = assessment
        .activations
        .iter()
        .filter(|a| a.strength > 0.0)
        .max_by(|a, b| a.strength.total_cmp(&b.strength))
    {
        lines.push(format!("Strongest rule: {} ({:.3})", strongest.label, strongest.strength));
    }
    block(lines)
}

/// Newline-terminated lines
fn block(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}
