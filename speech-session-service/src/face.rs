use serde::{Deserialize, Serialize};

/// Face mesh landmark indices used for the lip measurements.
pub mod landmarks {
    pub const LIP_TOP: usize = 13;
    pub const LIP_BOTTOM: usize = 14;
    pub const MOUTH_LEFT: usize = 61;
    pub const MOUTH_RIGHT: usize = 291;
    pub const NOSE_BRIDGE: usize = 6;
}

/// Normalized landmark position (0-1 in image coordinates).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
}

/// Mouth symmetry and opening observed by the face tracker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LipMetrics {
    /// 0-100, higher is more symmetric.
    pub symmetry_score: f64,
    pub opening_ratio: f64,
    /// Lips spread wide, as for an "이" vowel.
    pub is_stretched: bool,
    /// Horizontal drift from the facial midline; negative is left.
    pub deviation: f64,
}

impl Default for LipMetrics {
    fn default() -> Self {
        Self {
            symmetry_score: 100.0,
            opening_ratio: 0.0,
            is_stretched: false,
            deviation: 0.0,
        }
    }
}

impl LipMetrics {
    /// Derive metrics from a full face mesh; `None` when the mesh is too
    /// short to contain the mouth landmarks.
    pub fn from_landmarks(mesh: &[Landmark]) -> Option<Self> {
        use landmarks::*;

        let top = mesh.get(LIP_TOP)?;
        let bottom = mesh.get(LIP_BOTTOM)?;
        let left = mesh.get(MOUTH_LEFT)?;
        let right = mesh.get(MOUTH_RIGHT)?;
        let nose = mesh.get(NOSE_BRIDGE)?;

        let vertical_diff = (left.y - right.y).abs();
        let symmetry_score = (100.0 - vertical_diff * 2500.0).max(0.0).round();
        let opening_ratio = ((bottom.y - top.y).abs() * 500.0 * 10.0).round() / 10.0;

        let left_dist = (nose.x - left.x).abs();
        let right_dist = (right.x - nose.x).abs();
        let deviation = ((right_dist - left_dist) * 100.0 * 100.0).round() / 100.0;

        Some(Self {
            symmetry_score,
            opening_ratio,
            is_stretched: (right.x - left.x).abs() > 0.15,
            deviation,
        })
    }
}

/// Source of the most recent lip measurement. The tracker runs on its own
/// schedule; callers only sample it.
pub trait FaceTracker: Send + Sync {
    fn latest_metrics(&self) -> Option<LipMetrics>;
}
