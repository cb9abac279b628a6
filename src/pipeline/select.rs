//! Class selection over model scores.

use std::fmt;

/// Number of digit classes produced by the model.
pub const NUM_CLASSES: usize = 10;

/// Index of the largest value, scanning left to right.
///
/// Ties resolve to the lowest index. Returns `None` for an empty slice.
#[must_use]
pub fn argmax(values: &[f32]) -> Option<usize> {
    let (first, rest) = values.split_first()?;

    let mut best = 0;
    let mut best_value = *first;
    for (offset, &value) in rest.iter().enumerate() {
        if value > best_value {
            best = offset + 1;
            best_value = value;
        }
    }

    Some(best)
}

/// Numerically stable softmax.
///
/// When the largest value is not finite (all `-inf`, or `+inf` present) the
/// shifted exponentials are undefined, so a uniform distribution is returned.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn softmax(values: &[f32]) -> Vec<f32> {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        return vec![1.0 / values.len() as f32; values.len()];
    }
    let exps: Vec<f32> = values.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();

    exps.into_iter().map(|e| e / sum).collect()
}

/// Raw per-class scores as produced by the model.
///
/// Values are unnormalized logits; they are not probabilities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scores(pub [f32; NUM_CLASSES]);

impl Scores {
    /// The predicted class: the index of the highest score, lowest index on ties.
    #[must_use]
    pub fn label(&self) -> usize {
        argmax(&self.0).unwrap_or_default()
    }

    /// Softmax view of the scores, for displaying confidence.
    #[must_use]
    pub fn softmax(&self) -> [f32; NUM_CLASSES] {
        let mut out = [0.0; NUM_CLASSES];
        out.copy_from_slice(&softmax(&self.0));
        out
    }

    /// Borrow the raw scores.
    #[must_use]
    pub const fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

/// Result of classifying one digit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted digit, 0 through 9.
    pub label: usize,

    /// Scores the label was selected from.
    pub scores: Scores,
}

impl Prediction {
    /// Select the label from a score vector.
    #[must_use]
    pub fn from_scores(scores: Scores) -> Self {
        Self {
            label: scores.label(),
            scores,
        }
    }

    /// Softmax confidence of the predicted label.
    #[must_use]
    pub fn confidence(&self) -> f32 {
        self.scores.softmax()[self.label]
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}
