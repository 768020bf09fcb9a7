//! Emotion score mappings.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Mapping from emotion label to confidence.
///
/// Face++ reports confidences in `[0, 100]`, Azure in `[0, 1]`. Scores are
/// kept exactly as the provider reported them. Labels iterate in
/// lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionScores(BTreeMap<String, f64>);

impl EmotionScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, score: f64) -> Option<f64> {
        self.0.insert(label.into(), score)
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(label, score)| (label.as_str(), *score))
    }

    /// Label with the highest score.
    ///
    /// Equal maxima resolve to the lexicographically smallest label. NaN
    /// scores are never selected. Returns `None` for an empty mapping.
    pub fn dominant(&self) -> Option<&str> {
        self.iter()
            .filter(|(_, score)| !score.is_nan())
            .fold(None::<(&str, f64)>, |best, (label, score)| match best {
                Some((_, top)) if score <= top => best,
                _ => Some((label, score)),
            })
            .map(|(label, _)| label)
    }
}

impl FromIterator<(String, f64)> for EmotionScores {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, f64)> for EmotionScores {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(label, score)| (label.to_string(), score))
                .collect(),
        )
    }
}

impl fmt::Display for EmotionScores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        for (i, (label, score)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {:.2}", label, score)?;
        }
        Ok(())
    }
}
