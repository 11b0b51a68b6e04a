use std::collections::HashMap;

use ndarray::Array1;
use serde::Deserialize;

/// Target-statistic encoding for one categorical feature: each category seen
/// during training maps to a learned numeric statistic. Anything unseen
/// falls back to `default`, the training prior.
#[derive(Debug, Deserialize)]
pub struct TargetEncoder {
    pub values: HashMap<String, f64>,
    pub default: f64,
}

impl TargetEncoder {
    pub fn encode(&self, category: &str) -> f64 {
        self.values.get(category).copied().unwrap_or(self.default)
    }
}

/// Build the one-hot vector for a row: the concatenation of each feature's
/// vocabulary block, in `features` order. Categories outside the vocabulary
/// leave their block at zero, matching the encoder's handle-unknown=ignore
/// policy from training.
pub fn one_hot(
    features: &[String],
    vocabulary: &HashMap<String, Vec<String>>,
    row: &HashMap<&str, &str>,
) -> Array1<f64> {
    let width: usize = features
        .iter()
        .map(|name| vocabulary.get(name).map_or(0, Vec::len))
        .sum();
    let mut x = Array1::zeros(width);

    let mut offset = 0;
    for name in features {
        let vocab = match vocabulary.get(name) {
            Some(vocab) => vocab,
            None => continue, // presence checked at load time
        };
        if let Some(value) = row.get(name.as_str()) {
            if let Some(position) = vocab.iter().position(|known| known == value) {
                x[offset + position] = 1.0;
            }
        }
        offset += vocab.len();
    }

    x
}
