//! Labelled feature matrices and mini-batch ordering
//!
//! Features are expected to be standardised and reduced to the register
//! width by the caller. Labels are 0 for normal rows and 1 for anomalies.

use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Error, Result};

/// Label of a normal (majority-class) row
pub const NORMAL: u8 = 0;

/// Label of an anomalous (minority-class) row
pub const ANOMALY: u8 = 1;

/// A feature matrix with a parallel binary label vector
#[derive(Debug, Clone, PartialEq)]
pub struct TabularDataset {
    features: Array2<f64>,
    labels: Vec<u8>,
}

impl TabularDataset {
    /// Create a new dataset from feature rows and binary labels
    pub fn new(features: Array2<f64>, labels: Array1<u8>) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(Error::LabelMismatch {
                features: features.nrows(),
                labels: labels.len(),
            });
        }

        if let Some((index, &value)) = labels.iter().enumerate().find(|(_, &l)| l > ANOMALY) {
            return Err(Error::InvalidLabel { index, value });
        }

        Ok(TabularDataset {
            features,
            labels: labels.to_vec(),
        })
    }

    /// A dataset whose rows are all labelled normal
    pub fn unlabeled(features: Array2<f64>) -> Self {
        let labels = vec![NORMAL; features.nrows()];
        TabularDataset { features, labels }
    }

    /// Get the number of samples in the dataset
    pub fn len(&self) -> usize {
        self.features.nrows()
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of feature columns
    pub fn feature_width(&self) -> usize {
        self.features.ncols()
    }

    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.features.view()
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    /// Get a single sample
    pub fn sample(&self, index: usize) -> Result<(ArrayView1<'_, f64>, u8)> {
        if index >= self.len() {
            return Err(Error::DimensionMismatch {
                context: "sample index".to_string(),
                expected: self.len(),
                found: index,
            });
        }

        Ok((self.features.row(index), self.labels[index]))
    }

    /// Number of rows labelled anomalous
    pub fn anomaly_count(&self) -> usize {
        self.labels.iter().filter(|&&l| l == ANOMALY).count()
    }

    /// Only the normal rows; the autoencoder is fitted on these
    pub fn normal_only(&self) -> Self {
        let keep: Vec<usize> = (0..self.len()).filter(|&i| self.labels[i] == NORMAL).collect();
        TabularDataset {
            features: self.features.select(Axis(0), &keep),
            labels: vec![NORMAL; keep.len()],
        }
    }

    /// The first `count` rows (fewer if the dataset is shorter)
    pub fn head(&self, count: usize) -> ArrayView2<'_, f64> {
        let end = count.min(self.len());
        self.features.slice(s![..end, ..])
    }

    /// Row indices of each mini-batch of `epoch`, in processing order
    pub fn batches(&self, batch_size: usize, epoch: usize, shuffle_seed: Option<u64>) -> Result<Vec<Vec<usize>>> {
        if batch_size == 0 {
            return Err(Error::InvalidConfig("batch size must be at least 1".into()));
        }
        Ok(batch_order(self.len(), epoch, shuffle_seed)
            .chunks(batch_size)
            .map(|chunk| chunk.to_vec())
            .collect())
    }
}

/// Sample order for one epoch.
///
/// Contiguous dataset order when `shuffle_seed` is `None`; otherwise a
/// permutation that depends only on the seed and the epoch, so runs are
/// reproducible.
pub fn batch_order(len: usize, epoch: usize, shuffle_seed: Option<u64>) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();

    if let Some(seed) = shuffle_seed {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(epoch as u64));
        indices.shuffle(&mut rng);
    }

    indices
}
