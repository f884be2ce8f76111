use crate::engine::DecisionLog;
use crate::node::KpiScores;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Minimum overall score for an attempt to pass.
pub const PASS_THRESHOLD: f64 = 70.0;

/// The final assessment of an attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptResult {
    /// Unweighted mean of all decision scores; `0` when no decisions were made.
    pub overall_score: f64,
    pub kpi_averages: KpiScores,
    pub passed: bool,
    pub decisions: usize,
}

/// Computes attempt results from a decision log.
pub struct OutcomeAggregator;

impl OutcomeAggregator {
    /// Aggregates a decision log. Order-independent and free of side effects.
    ///
    /// Each KPI is averaged only over the entries that reported it, so a choice that
    /// does not touch a competency never drags that competency's average down.
    pub fn finalize(log: &DecisionLog) -> AttemptResult {
        if log.is_empty() {
            return AttemptResult {
                overall_score: 0.0,
                kpi_averages: KpiScores::default(),
                passed: false,
                decisions: 0,
            };
        }

        let total: f64 = log.iter().map(|e| e.score).sum();
        let overall_score = total / log.len() as f64;

        let mut sums: AHashMap<&str, (f64, usize)> = AHashMap::new();
        for entry in log.iter() {
            for (kpi, value) in &entry.kpi_scores {
                let slot = sums.entry(kpi.as_str()).or_insert((0.0, 0));
                slot.0 += value;
                slot.1 += 1;
            }
        }

        let kpi_averages = sums
            .into_iter()
            .map(|(kpi, (sum, count))| (kpi.to_string(), sum / count as f64))
            .collect();

        AttemptResult {
            overall_score,
            kpi_averages,
            passed: overall_score >= PASS_THRESHOLD,
            decisions: log.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DecisionLogEntry;

    fn entry(score: f64, kpis: &[(&str, f64)]) -> DecisionLogEntry {
        DecisionLogEntry {
            node_key: "d".to_string(),
            choice_id: "c".to_string(),
            score,
            kpi_scores: kpis.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn silent_entries_do_not_count_toward_kpi_average() {
        let log: DecisionLog = vec![entry(80.0, &[("comm", 90.0)]), entry(60.0, &[])]
            .into_iter()
            .collect();
        let result = OutcomeAggregator::finalize(&log);
        assert_eq!(result.overall_score, 70.0);
        assert_eq!(result.kpi_averages.get("comm"), Some(&90.0));
        assert_eq!(result.kpi_averages.len(), 1);
    }

    #[test]
    fn empty_log_scores_zero_and_fails() {
        let result = OutcomeAggregator::finalize(&DecisionLog::new());
        assert_eq!(result.overall_score, 0.0);
        assert!(!result.passed);
        assert!(result.kpi_averages.is_empty());
        assert_eq!(result.decisions, 0);
    }

    #[test]
    fn threshold_is_inclusive() {
        let exact: DecisionLog = vec![entry(80.0, &[]), entry(60.0, &[])].into_iter().collect();
        assert!(OutcomeAggregator::finalize(&exact).passed);

        let below: DecisionLog = vec![entry(69.9, &[])].into_iter().collect();
        let result = OutcomeAggregator::finalize(&below);
        assert!(!result.passed);
        assert!((result.overall_score - 69.9).abs() < 1e-9);
    }

    #[test]
    fn unknown_kpi_names_are_aggregated() {
        let log: DecisionLog = vec![
            entry(100.0, &[("ventilation", 40.0), ("teamwork", 100.0)]),
            entry(50.0, &[("ventilation", 80.0)]),
        ]
        .into_iter()
        .collect();
        let result = OutcomeAggregator::finalize(&log);
        assert_eq!(result.kpi_averages["ventilation"], 60.0);
        assert_eq!(result.kpi_averages["teamwork"], 100.0);
        assert_eq!(result.overall_score, 75.0);
        assert!(result.passed);
    }
}
