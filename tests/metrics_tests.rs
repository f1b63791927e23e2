use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use qfraud::machine_learning::metrics::{roc_auc, ConfusionMatrix, EvaluationReport, ThresholdMetrics};
use qfraud::Error;

/// Helper function for comparing f64 with tolerance
fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

#[test]
fn test_confusion_counts_at_half() {
    let fidelities = [0.9, 0.8, 0.95, 0.2, 0.1];
    let labels = [0, 0, 0, 1, 1];

    let metrics = ThresholdMetrics::compute(&fidelities, &labels, 0.5).unwrap();
    let c = metrics.confusion;
    assert_eq!((c.tn, c.fp, c.fn_, c.tp), (3, 0, 0, 2));
    assert_eq!(metrics.accuracy, 1.0);
    assert_eq!(metrics.precision, 1.0);
    assert_eq!(metrics.recall, 1.0);
    assert_eq!(metrics.f1, 1.0);
    assert_eq!(metrics.specificity, 1.0);
    assert_eq!(metrics.gmean, 1.0);
}

#[test]
fn test_threshold_is_strict() {
    // fidelity == T is not flagged
    let c = ConfusionMatrix::from_fidelities(&[0.5, 0.4], &[1, 1], 0.5).unwrap();
    assert_eq!(c.tp, 1);
    assert_eq!(c.fn_, 1);
}

#[test]
fn test_mixed_confusion_ratios() {
    let fidelities = [0.9, 0.3, 0.7, 0.2, 0.6, 0.1];
    let labels = [0, 0, 0, 1, 1, 1];
    let m = ThresholdMetrics::compute(&fidelities, &labels, 0.5).unwrap();

    // TN=2 FP=1 FN=1 TP=2
    assert_eq!(m.confusion, ConfusionMatrix { tn: 2, fp: 1, fn_: 1, tp: 2 });
    assert!(approx_eq(m.accuracy, 4.0 / 6.0, 1e-12));
    assert!(approx_eq(m.precision, 2.0 / 3.0, 1e-12));
    assert!(approx_eq(m.recall, 2.0 / 3.0, 1e-12));
    assert!(approx_eq(m.f1, 2.0 / 3.0, 1e-12));
    assert!(approx_eq(m.specificity, 2.0 / 3.0, 1e-12));
    assert_eq!(m.gmean, (m.recall * m.specificity).sqrt());
}

#[test]
fn test_gmean_is_zero_when_a_factor_is_zero() {
    // Nothing flagged: recall 0, specificity 1
    let m = ThresholdMetrics::compute(&[0.9, 0.8, 0.7], &[0, 1, 1], 0.1).unwrap();
    assert_eq!(m.recall, 0.0);
    assert_eq!(m.specificity, 1.0);
    assert_eq!(m.gmean, 0.0);

    // Everything flagged: recall 1, specificity 0
    let m = ThresholdMetrics::compute(&[0.9, 0.8, 0.7], &[0, 1, 1], 1.0).unwrap();
    assert_eq!(m.recall, 1.0);
    assert_eq!(m.specificity, 0.0);
    assert_eq!(m.gmean, 0.0);
}

#[test]
fn test_zero_denominators_yield_zero() {
    // No positive samples and nothing flagged
    let m = ThresholdMetrics::compute(&[0.9, 0.8], &[0, 0], 0.5).unwrap();
    assert_eq!(m.precision, 0.0);
    assert_eq!(m.recall, 0.0);
    assert_eq!(m.f1, 0.0);
    assert_eq!(m.gmean, 0.0);
    assert_eq!(m.accuracy, 1.0);

    // No negative samples
    let m = ThresholdMetrics::compute(&[0.1, 0.2], &[1, 1], 0.5).unwrap();
    assert_eq!(m.specificity, 0.0);
    assert!(m.precision.is_finite());
}

#[test]
fn test_perfect_separation_gives_unit_auc() {
    let fidelities = [0.99, 0.93, 0.88, 0.97, 0.41, 0.12, 0.3];
    let labels = [0, 0, 0, 0, 1, 1, 1];
    let report = EvaluationReport::evaluate(&fidelities, &labels, &[0.5]).unwrap();
    assert_eq!(report.auc_roc, 1.0);

    // Inverted scores rank every anomaly last
    let scores: Vec<f64> = fidelities.to_vec();
    assert_eq!(roc_auc(&scores, &labels).unwrap(), 0.0);
}

#[test]
fn test_random_labels_average_to_half_auc() {
    let mut rng = StdRng::seed_from_u64(1234);
    let trials = 200;
    let mut total = 0.0;

    for _ in 0..trials {
        let fidelities: Vec<f64> = (0..100).map(|_| rng.gen::<f64>()).collect();
        let mut labels: Vec<u8> = (0..100).map(|i| u8::from(i < 20)).collect();
        labels.shuffle(&mut rng);

        let report = EvaluationReport::evaluate(&fidelities, &labels, &[]).unwrap();
        total += report.auc_roc;
    }

    assert!(approx_eq(total / trials as f64, 0.5, 0.03));
}

#[test]
fn test_auc_with_tied_scores() {
    // Two positives and two negatives tie at 0.5
    let scores = [0.2, 0.5, 0.5, 0.5, 0.5, 0.9];
    let labels = [0, 0, 1, 0, 1, 1];
    // pairs: P={0.5,0.5,0.9}, N={0.2,0.5,0.5}; wins = 3 + 2·(1 + 0.5 + 0.5) = 7 of 9
    let auc = roc_auc(&scores, &labels).unwrap();
    assert!(approx_eq(auc, 7.0 / 9.0, 1e-12));
}

#[test]
fn test_report_keeps_threshold_order() {
    let fidelities = [0.9, 0.65, 0.55, 0.3];
    let labels = [0, 0, 1, 1];
    let thresholds = [0.9, 0.5, 0.7, 0.6];
    let report = EvaluationReport::evaluate(&fidelities, &labels, &thresholds).unwrap();

    let order: Vec<f64> = report.thresholds.iter().map(|m| m.threshold).collect();
    assert_eq!(order, thresholds.to_vec());
    assert_eq!(report.best_by_f1().unwrap().threshold, 0.6);
    assert!(report.to_string().contains("AUC-ROC=1.0000"));
}

#[test]
fn test_invalid_inputs() {
    assert!(matches!(roc_auc(&[], &[]), Err(Error::EmptyInput(_))));
    assert!(matches!(
        ThresholdMetrics::compute(&[0.1, 0.2], &[0], 0.5),
        Err(Error::LabelMismatch { features: 2, labels: 1 })
    ));
    assert!(matches!(
        EvaluationReport::evaluate(&[0.1], &[3], &[0.5]),
        Err(Error::InvalidLabel { index: 0, value: 3 })
    ));
}
