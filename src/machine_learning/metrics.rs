//! Threshold and ranking metrics for fidelity-based anomaly scores
//!
//! A sample is flagged anomalous iff its fidelity is below the threshold.
//! Label 1 is the positive (anomalous) class. Every ratio with a zero
//! denominator is reported as 0.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::machine_learning::dataset::ANOMALY;

/// Confusion counts at one threshold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
    pub tp: usize,
}

impl ConfusionMatrix {
    /// Count outcomes of the rule `fidelity < threshold ⇒ anomalous`
    pub fn from_fidelities(fidelities: &[f64], labels: &[u8], threshold: f64) -> Result<Self> {
        check_inputs(fidelities, labels)?;

        let mut matrix = ConfusionMatrix::default();
        for (&fidelity, &label) in fidelities.iter().zip(labels) {
            let flagged = fidelity < threshold;
            match (flagged, label == ANOMALY) {
                (true, true) => matrix.tp += 1,
                (true, false) => matrix.fp += 1,
                (false, true) => matrix.fn_ += 1,
                (false, false) => matrix.tn += 1,
            }
        }
        Ok(matrix)
    }

    pub fn total(&self) -> usize {
        self.tn + self.fp + self.fn_ + self.tp
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.tp + self.tn, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }

    pub fn specificity(&self) -> f64 {
        ratio(self.tn, self.tn + self.fp)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    /// Geometric mean of recall and specificity
    pub fn gmean(&self) -> f64 {
        (self.recall() * self.specificity()).sqrt()
    }
}

/// All metrics reported for one threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdMetrics {
    pub threshold: f64,
    pub confusion: ConfusionMatrix,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub specificity: f64,
    pub gmean: f64,
}

impl ThresholdMetrics {
    pub fn compute(fidelities: &[f64], labels: &[u8], threshold: f64) -> Result<Self> {
        let confusion = ConfusionMatrix::from_fidelities(fidelities, labels, threshold)?;
        Ok(ThresholdMetrics {
            threshold,
            confusion,
            accuracy: confusion.accuracy(),
            precision: confusion.precision(),
            recall: confusion.recall(),
            f1: confusion.f1(),
            specificity: confusion.specificity(),
            gmean: confusion.gmean(),
        })
    }
}

impl fmt::Display for ThresholdMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.confusion;
        write!(
            f,
            "T={:.2} TN={} FP={} FN={} TP={} acc={:.4} prec={:.4} rec={:.4} f1={:.4} specificity={:.4} gmean={:.4}",
            self.threshold, c.tn, c.fp, c.fn_, c.tp,
            self.accuracy, self.precision, self.recall, self.f1, self.specificity, self.gmean
        )
    }
}

/// Per-threshold metrics plus the threshold-free AUC-ROC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub thresholds: Vec<ThresholdMetrics>,
    pub auc_roc: f64,
}

impl EvaluationReport {
    /// Evaluate fidelity scores against labels at every threshold, in order
    pub fn evaluate(fidelities: &[f64], labels: &[u8], thresholds: &[f64]) -> Result<Self> {
        check_inputs(fidelities, labels)?;

        let per_threshold = thresholds
            .iter()
            .map(|&t| ThresholdMetrics::compute(fidelities, labels, t))
            .collect::<Result<Vec<_>>>()?;

        let ranking: Vec<f64> = fidelities.iter().map(|f| 1.0 - f).collect();
        let auc_roc = roc_auc(&ranking, labels)?;

        Ok(EvaluationReport {
            thresholds: per_threshold,
            auc_roc,
        })
    }

    /// The threshold with the highest F1; the earliest one wins ties
    pub fn best_by_f1(&self) -> Option<&ThresholdMetrics> {
        self.thresholds
            .iter()
            .fold(None, |best: Option<&ThresholdMetrics>, m| match best {
                Some(b) if b.f1 >= m.f1 => Some(b),
                _ => Some(m),
            })
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for metrics in &self.thresholds {
            writeln!(f, "{}", metrics)?;
        }
        write!(f, "AUC-ROC={:.4}", self.auc_roc)
    }
}

/// Area under the ROC curve for `scores` (higher = more anomalous).
///
/// Computed as the Mann-Whitney statistic with tied scores sharing their
/// average rank. Returns 0 when either class is absent.
pub fn roc_auc(scores: &[f64], labels: &[u8]) -> Result<f64> {
    check_inputs(scores, labels)?;

    let positives = labels.iter().filter(|&&l| l == ANOMALY).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        return Ok(0.0);
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut positive_rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        // Ranks are 1-based; a tie group shares the mean of its ranks
        let rank = (start + 1 + end) as f64 / 2.0;
        let tied_positives = order[start..end].iter().filter(|&&i| labels[i] == ANOMALY).count();
        positive_rank_sum += rank * tied_positives as f64;
        start = end;
    }

    let p = positives as f64;
    let n = negatives as f64;
    Ok((positive_rank_sum - p * (p + 1.0) / 2.0) / (p * n))
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn check_inputs(scores: &[f64], labels: &[u8]) -> Result<()> {
    if scores.is_empty() {
        return Err(Error::EmptyInput("no scores to evaluate".into()));
    }
    if scores.len() != labels.len() {
        return Err(Error::LabelMismatch {
            features: scores.len(),
            labels: labels.len(),
        });
    }
    if let Some((index, &value)) = labels.iter().enumerate().find(|(_, &l)| l > ANOMALY) {
        return Err(Error::InvalidLabel { index, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_zero_denominator() {
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(ratio(3, 4), 0.75);
    }

    #[test]
    fn test_ties_share_rank() {
        // One positive tied with one negative: half credit
        let auc = roc_auc(&[0.5, 0.5], &[0, 1]).unwrap();
        assert!((auc - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_missing_class_gives_zero_auc() {
        assert_eq!(roc_auc(&[0.1, 0.9], &[0, 0]).unwrap(), 0.0);
        assert_eq!(roc_auc(&[0.1, 0.9], &[1, 1]).unwrap(), 0.0);
    }

    #[test]
    fn test_best_by_f1_prefers_first_on_tie() {
        let fidelities = [0.9, 0.8, 0.2, 0.1];
        let labels = [0, 0, 1, 1];
        let report = EvaluationReport::evaluate(&fidelities, &labels, &[0.05, 0.5, 0.7]).unwrap();
        let best = report.best_by_f1().unwrap();
        assert_eq!(best.threshold, 0.5);
        assert_eq!(best.f1, 1.0);
    }
}
