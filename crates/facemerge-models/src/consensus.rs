//! Consensus across two providers' emotion scores.

use serde::{Deserialize, Serialize};

use crate::emotion::EmotionScores;

/// Averaged emotion scores and their dominant label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub dominant: Option<String>,
    pub scores: EmotionScores,
}

/// Merge two emotion mappings.
///
/// Only labels reported by both sides survive, each with the mean of the two
/// scores. The dominant label follows [`EmotionScores::dominant`], so ties go
/// to the lexicographically smallest label. Disjoint inputs give an empty
/// mapping and no dominant label.
pub fn merge(a: &EmotionScores, b: &EmotionScores) -> ConsensusResult {
    let scores: EmotionScores = a
        .iter()
        .filter_map(|(label, x)| b.get(label).map(|y| (label, (x + y) / 2.0)))
        .collect();
    let dominant = scores.dominant().map(str::to_string);

    ConsensusResult { dominant, scores }
}
