//! Animated-sticker target profile checks.
//!
//! Findings never change the compression outcome; they end up as report warnings.

use std::fmt;

use crate::document::model::AnimationDocument;

/// Canvas edge expected by the sticker target, in pixels.
pub const STICKER_CANVAS: u32 = 512;

/// Frame rates the sticker target plays back.
pub const STICKER_FRAME_RATES: [f64; 2] = [30.0, 60.0];

/// Longest playable sticker, in seconds.
pub const STICKER_MAX_SECS: f64 = 3.0;

/// A deviation from the sticker target profile.
#[derive(Clone, Debug, PartialEq)]
pub enum PlatformIssue {
    /// Canvas is not 512x512.
    Canvas {
        /// Actual width.
        width: u32,
        /// Actual height.
        height: u32,
    },
    /// Frame rate other than 30 or 60.
    FrameRate(f64),
    /// Play range longer than three seconds.
    Duration(f64),
    /// Root `tgs` marker missing.
    MissingMarker,
}

impl fmt::Display for PlatformIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Canvas { width, height } => write!(
                f,
                "canvas is {width}x{height}, stickers must be {STICKER_CANVAS}x{STICKER_CANVAS}"
            ),
            Self::FrameRate(fr) => write!(f, "frame rate {fr} is not 30 or 60"),
            Self::Duration(secs) => write!(
                f,
                "duration {secs:.2}s exceeds the {STICKER_MAX_SECS}s sticker limit"
            ),
            Self::MissingMarker => f.write_str("root `tgs` marker is missing"),
        }
    }
}

/// Check `doc` against the sticker profile.
pub fn lint(doc: &AnimationDocument) -> Vec<PlatformIssue> {
    let mut issues = Vec::new();
    if doc.width != STICKER_CANVAS || doc.height != STICKER_CANVAS {
        issues.push(PlatformIssue::Canvas {
            width: doc.width,
            height: doc.height,
        });
    }
    if !STICKER_FRAME_RATES.contains(&doc.frame_rate) {
        issues.push(PlatformIssue::FrameRate(doc.frame_rate));
    }
    let secs = doc.duration_secs();
    if secs > STICKER_MAX_SECS {
        issues.push(PlatformIssue::Duration(secs));
    }
    if !doc.extra.contains_key("tgs") {
        issues.push(PlatformIssue::MissingMarker);
    }
    issues
}

#[cfg(test)]
#[path = "../tests/unit/platform.rs"]
mod tests;
