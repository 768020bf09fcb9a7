//! Canonical detection response.
//!
//! Every detection route answers with a [`DetectionReport`], either as
//! structured JSON or rendered into a [`SummaryResponse`]. Keys that have no
//! value for the request are left out of the JSON entirely.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::attributes::{AttributeBundle, EyeStatus, HeadPose};
use crate::consensus::merge;
use crate::emotion::EmotionScores;

/// Merged result of one detection request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_pose: Option<HeadPose>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye_status: Option<EyeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facepp_emotion: Option<EmotionScores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominant_facepp_emotion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_emotion: Option<EmotionScores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominant_azure_emotion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus_emotion: Option<EmotionScores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominant_consensus_emotion: Option<String>,
}

impl DetectionReport {
    /// Build the report from whatever each provider returned.
    ///
    /// Head pose and eye status are taken from Face++ only. The consensus is
    /// attached only when both sides reported emotions.
    pub fn assemble(facepp: Option<AttributeBundle>, azure: Option<AttributeBundle>) -> Self {
        let facepp = facepp.unwrap_or_default();
        let azure = azure.unwrap_or_default();

        let mut report = Self {
            head_pose: facepp.head_pose,
            eye_status: facepp.eye_status,
            ..Default::default()
        };

        if let (Some(a), Some(b)) = (facepp.emotion_scores(), azure.emotion_scores()) {
            let consensus = merge(a, b);
            report.consensus_emotion = Some(consensus.scores);
            report.dominant_consensus_emotion = consensus.dominant;
        }

        if let Some(scores) = facepp.emotion.filter(|s| !s.is_empty()) {
            report.dominant_facepp_emotion = scores.dominant().map(str::to_string);
            report.facepp_emotion = Some(scores);
        }
        if let Some(scores) = azure.emotion.filter(|s| !s.is_empty()) {
            report.dominant_azure_emotion = scores.dominant().map(str::to_string);
            report.azure_emotion = Some(scores);
        }

        report
    }

    /// Whether both providers contributed emotions.
    pub fn has_consensus(&self) -> bool {
        self.consensus_emotion.is_some()
    }

    /// Mood named in the summary: Face++ first, Azure when Face++ saw no face.
    pub fn mood(&self) -> Option<&str> {
        self.dominant_facepp_emotion
            .as_deref()
            .or(self.dominant_azure_emotion.as_deref())
    }

    /// Human-readable rendering of the report, one line per known part.
    pub fn summary(&self) -> String {
        let mut out = String::new();

        if let Some(mood) = self.mood() {
            let _ = writeln!(out, "You seem {}. How about something to lift your mood?", mood);
        }
        if let Some(pose) = &self.head_pose {
            let _ = writeln!(out, "Face++ Head Pose: {}", pose);
        }
        if let Some(eyes) = &self.eye_status {
            let _ = writeln!(out, "Face++ Eye Status: {}", eyes);
        }
        push_emotion_line(&mut out, "Face++", &self.facepp_emotion, &self.dominant_facepp_emotion);
        push_emotion_line(&mut out, "Azure", &self.azure_emotion, &self.dominant_azure_emotion);
        push_emotion_line(
            &mut out,
            "Consensus",
            &self.consensus_emotion,
            &self.dominant_consensus_emotion,
        );

        out.truncate(out.trim_end().len());
        out
    }
}

fn push_emotion_line(
    out: &mut String,
    source: &str,
    scores: &Option<EmotionScores>,
    dominant: &Option<String>,
) {
    if let Some(scores) = scores {
        let _ = writeln!(
            out,
            "{} Emotion: {} (Dominant: {})",
            source,
            scores,
            dominant.as_deref().unwrap_or("none")
        );
    }
}

/// Text-only response shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub result: String,
}

impl From<&DetectionReport> for SummaryResponse {
    fn from(report: &DetectionReport) -> Self {
        Self {
            result: report.summary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::EyeState;

    fn scores(pairs: &[(&str, f64)]) -> EmotionScores {
        pairs.iter().copied().collect()
    }

    fn facepp_bundle() -> AttributeBundle {
        AttributeBundle {
            head_pose: Some(HeadPose {
                pitch_angle: 1.0,
                roll_angle: 2.0,
                yaw_angle: 3.0,
            }),
            eye_status: Some(EyeStatus {
                left_eye_status: EyeState {
                    no_glass_eye_open: 99.0,
                    ..Default::default()
                },
                right_eye_status: EyeState {
                    no_glass_eye_close: 80.0,
                    ..Default::default()
                },
            }),
            emotion: Some(scores(&[("happiness", 80.0), ("sadness", 10.0)])),
        }
    }

    fn azure_bundle() -> AttributeBundle {
        AttributeBundle {
            emotion: Some(scores(&[("happiness", 60.0), ("anger", 5.0)])),
            ..Default::default()
        }
    }

    #[test]
    fn test_assemble_both_providers() {
        let report = DetectionReport::assemble(Some(facepp_bundle()), Some(azure_bundle()));

        assert!(report.has_consensus());
        assert_eq!(report.consensus_emotion, Some(scores(&[("happiness", 70.0)])));
        assert_eq!(report.dominant_consensus_emotion.as_deref(), Some("happiness"));
        assert_eq!(report.dominant_facepp_emotion.as_deref(), Some("happiness"));
        assert_eq!(report.dominant_azure_emotion.as_deref(), Some("happiness"));
        assert!(report.head_pose.is_some());
        assert!(report.eye_status.is_some());
    }

    #[test]
    fn test_assemble_single_provider_has_no_consensus() {
        let report = DetectionReport::assemble(None, Some(azure_bundle()));

        assert!(!report.has_consensus());
        assert_eq!(report.facepp_emotion, None);
        assert_eq!(report.azure_emotion, Some(scores(&[("anger", 5.0), ("happiness", 60.0)])));
        assert_eq!(report.mood(), Some("happiness"));
    }

    #[test]
    fn test_assemble_disjoint_emotions_keeps_empty_consensus() {
        let facepp = AttributeBundle {
            emotion: Some(scores(&[("sadness", 10.0)])),
            ..Default::default()
        };
        let report = DetectionReport::assemble(Some(facepp), Some(azure_bundle()));

        assert_eq!(report.consensus_emotion, Some(EmotionScores::new()));
        assert_eq!(report.dominant_consensus_emotion, None);
        assert_eq!(report.mood(), Some("sadness"));
    }

    #[test]
    fn test_mood_follows_facepp_over_consensus() {
        let facepp = AttributeBundle {
            emotion: Some(scores(&[("happiness", 20.0), ("sadness", 30.0)])),
            ..Default::default()
        };
        let azure = AttributeBundle {
            emotion: Some(scores(&[("happiness", 90.0), ("sadness", 1.0)])),
            ..Default::default()
        };
        let report = DetectionReport::assemble(Some(facepp), Some(azure));

        assert_eq!(report.dominant_consensus_emotion.as_deref(), Some("happiness"));
        assert_eq!(report.mood(), Some("sadness"));
        assert!(report.summary().starts_with("You seem sadness."));
    }

    #[test]
    fn test_pose_and_eyes_come_from_facepp_only() {
        let azure = AttributeBundle {
            head_pose: Some(HeadPose {
                pitch_angle: 5.0,
                roll_angle: 6.0,
                yaw_angle: 7.0,
            }),
            ..azure_bundle()
        };

        let report = DetectionReport::assemble(None, Some(azure.clone()));
        assert_eq!(report.head_pose, None);
        assert!(!report.summary().contains("Head Pose"));

        let report = DetectionReport::assemble(Some(facepp_bundle()), Some(azure));
        assert_eq!(report.head_pose.map(|p| p.yaw_angle), Some(3.0));
    }

    #[test]
    fn test_json_schema_is_camel_case_and_sparse() {
        let report = DetectionReport::assemble(Some(facepp_bundle()), None);
        let json = serde_json::to_value(&report).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();

        assert_eq!(
            keys,
            vec!["dominantFaceppEmotion", "eyeStatus", "faceppEmotion", "headPose"]
        );
        assert_eq!(json["headPose"]["yaw_angle"], 3.0);
    }

    #[test]
    fn test_summary() {
        let report = DetectionReport::assemble(Some(facepp_bundle()), Some(azure_bundle()));
        let summary = report.summary();
        let lines: Vec<_> = summary.lines().collect();

        assert_eq!(
            lines,
            vec![
                "You seem happiness. How about something to lift your mood?",
                "Face++ Head Pose: pitch 1.00, roll 2.00, yaw 3.00",
                "Face++ Eye Status: left no_glass_eye_open, right no_glass_eye_close",
                "Face++ Emotion: happiness 80.00, sadness 10.00 (Dominant: happiness)",
                "Azure Emotion: anger 5.00, happiness 60.00 (Dominant: happiness)",
                "Consensus Emotion: happiness 70.00 (Dominant: happiness)",
            ]
        );
        assert!(!summary.ends_with('\n'));
        assert_eq!(SummaryResponse::from(&report).result, summary);
    }
}
