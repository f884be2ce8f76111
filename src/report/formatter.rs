use crate::attempt::{AttemptResult, PASS_THRESHOLD};
use crate::engine::DecisionLog;
use crate::node::KpiScores;
use itertools::Itertools;

/// Formats attempt results and decision logs into human-readable text.
pub struct ReportFormatter;

impl ReportFormatter {
    /// Formats a final assessment, KPI lines sorted by name.
    pub fn format_result(result: &AttemptResult) -> String {
        let verdict = if result.passed { "PASSED" } else { "FAILED" };
        let mut lines = vec![
            format!(
                "Result: {} (score {} / threshold {})",
                verdict,
                Self::format_number(result.overall_score),
                Self::format_number(PASS_THRESHOLD)
            ),
            format!("Decisions: {}", result.decisions),
        ];

        if !result.kpi_averages.is_empty() {
            lines.push("KPIs:".to_string());
            lines.extend(
                result
                    .kpi_averages
                    .iter()
                    .sorted_by(|a, b| a.0.cmp(b.0))
                    .map(|(name, value)| format!("  {}: {}", name, Self::format_number(*value))),
            );
        }
        lines.join("\n")
    }

    /// Formats a decision log as one numbered line per decision.
    pub fn format_log(log: &DecisionLog) -> String {
        log.iter()
            .enumerate()
            .map(|(i, entry)| {
                let mut line = format!(
                    "{}. {} -> {} (score {}",
                    i + 1,
                    entry.node_key,
                    entry.choice_id,
                    Self::format_number(entry.score)
                );
                if !entry.kpi_scores.is_empty() {
                    line.push_str("; ");
                    line.push_str(&Self::format_kpis(&entry.kpi_scores));
                }
                line.push(')');
                line
            })
            .join("\n")
    }

    fn format_kpis(kpis: &KpiScores) -> String {
        kpis.iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(name, value)| format!("{} {}", name, Self::format_number(*value)))
            .join(", ")
    }

    /// Integral values print without a fractional part.
    fn format_number(n: f64) -> String {
        if n.fract() == 0.0 {
            format!("{}", n as i64)
        } else {
            format!("{:.1}", n)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DecisionLogEntry;

    #[test]
    fn result_lists_kpis_in_name_order() {
        let result = AttemptResult {
            overall_score: 82.5,
            kpi_averages: [("safety", 90.0), ("communication", 75.0)]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            passed: true,
            decisions: 2,
        };
        assert_eq!(
            ReportFormatter::format_result(&result),
            "Result: PASSED (score 82.5 / threshold 70)\nDecisions: 2\nKPIs:\n  communication: 75\n  safety: 90"
        );
    }

    #[test]
    fn log_lines_are_numbered() {
        let log: DecisionLog = vec![
            DecisionLogEntry {
                node_key: "gas_alarm".to_string(),
                choice_id: "evacuate".to_string(),
                score: 100.0,
                kpi_scores: [("safety".to_string(), 100.0)].into_iter().collect(),
            },
            DecisionLogEntry {
                node_key: "muster".to_string(),
                choice_id: "wait".to_string(),
                score: 40.0,
                kpi_scores: KpiScores::default(),
            },
        ]
        .into_iter()
        .collect();
        assert_eq!(
            ReportFormatter::format_log(&log),
            "1. gas_alarm -> evacuate (score 100; safety 100)\n2. muster -> wait (score 40)"
        );
    }
}
