//! Selection of the inference variant from configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tracker::{Annotation, Frame, Size, TrackerConfig};

use super::{Detector, ObjectTracker};

/// Tracking strategy layered over the detector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerKind {
    /// Raw detections, no identities.
    None,
    /// Histogram back-projection tracking.
    #[default]
    FastInaccurate,
    Basic,
    HighQualitySlow,
}

/// Top-level configuration of an [`Inference`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectTrackingConfig {
    pub tracker: TrackerKind,
    pub engine: TrackerConfig,
}

impl ObjectTrackingConfig {
    /// Parse a JSON document; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A detector, optionally wrapped in a tracker, chosen once at construction.
pub enum Inference<D: Detector> {
    Detection(D),
    Tracking(ObjectTracker<D>),
}

impl<D: Detector> Inference<D> {
    /// Wrap `detector` according to `config.tracker`.
    pub fn new(detector: D, config: &ObjectTrackingConfig) -> Result<Self> {
        match config.tracker {
            TrackerKind::None => Ok(Self::Detection(detector)),
            TrackerKind::FastInaccurate => Ok(Self::Tracking(ObjectTracker::new(
                detector,
                config.engine.clone(),
            ))),
            kind @ (TrackerKind::Basic | TrackerKind::HighQualitySlow) => {
                Err(Error::UnsupportedTracker(kind))
            }
        }
    }

    /// Process one frame, appending results to `annotations`.
    pub fn run(
        &mut self,
        timestamp: f64,
        frame: &Frame<'_>,
        annotations: &mut Vec<Annotation>,
    ) -> std::result::Result<(), D::Error> {
        match self {
            Self::Detection(detector) => {
                annotations.extend(detector.run(timestamp, frame)?);
                Ok(())
            }
            Self::Tracking(tracker) => tracker.run(timestamp, frame, annotations),
        }
    }

    pub fn input_size(&self) -> Size {
        match self {
            Self::Detection(detector) => detector.input_size(),
            Self::Tracking(tracker) => tracker.input_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::NullDetector;

    #[test]
    fn test_default_config_tracks() {
        let inference = Inference::new(NullDetector, &ObjectTrackingConfig::default()).unwrap();
        assert!(matches!(inference, Inference::Tracking(_)));
        assert_eq!(inference.input_size(), Size::new(256, 256));
    }

    #[test]
    fn test_none_passes_detector_through() {
        let config = ObjectTrackingConfig::from_json(r#"{"tracker": "none"}"#).unwrap();
        let inference = Inference::new(NullDetector, &config).unwrap();
        assert!(matches!(inference, Inference::Detection(_)));
    }

    #[test]
    fn test_unimplemented_kinds_are_rejected() {
        for kind in [TrackerKind::Basic, TrackerKind::HighQualitySlow] {
            let config = ObjectTrackingConfig {
                tracker: kind,
                ..Default::default()
            };
            assert!(matches!(
                Inference::new(NullDetector, &config),
                Err(Error::UnsupportedTracker(k)) if k == kind
            ));
        }
    }

    #[test]
    fn test_from_json_nested_engine() {
        let config = ObjectTrackingConfig::from_json(
            r#"{"engine": {"initial_health": 5, "window_mode": "cam_shift"}}"#,
        )
        .unwrap();
        assert_eq!(config.tracker, TrackerKind::FastInaccurate);
        assert_eq!(config.engine.initial_health, 5);
        assert_eq!(config.engine.iou_threshold, 0.1);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            ObjectTrackingConfig::from_json("{tracker"),
            Err(Error::Config(_))
        ));
    }
}
