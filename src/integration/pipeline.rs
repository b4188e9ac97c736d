//! ObjectTracker for combining detection with tracking.

use tracing::warn;

use crate::tracker::{Annotation, Frame, HsvImage, Size, TrackerConfig, TrackingEngine};

use super::Detector;

/// A combined tracker that bundles a detector with a [`TrackingEngine`].
///
/// Each call predicts the existing tracks on the frame and then folds the
/// frame's detections in, so those detections show up from the next call on.
pub struct ObjectTracker<D: Detector> {
    detector: D,
    engine: TrackingEngine,
}

impl<D: Detector> ObjectTracker<D> {
    /// Create a new tracker with the given detector and engine config.
    pub fn new(detector: D, config: TrackerConfig) -> Self {
        Self {
            detector,
            engine: TrackingEngine::new(config),
        }
    }

    /// Create a new tracker with the default engine configuration.
    pub fn with_default_config(detector: D) -> Self {
        Self::new(detector, TrackerConfig::default())
    }

    /// Process a single frame, appending tracked annotations to `annotations`.
    ///
    /// If the detector fails its error is returned and the tracks are left
    /// exactly as they were.
    pub fn run(
        &mut self,
        timestamp: f64,
        frame: &Frame<'_>,
        annotations: &mut Vec<Annotation>,
    ) -> Result<(), D::Error> {
        let detections = self.detector.run(timestamp, frame).inspect_err(|_| {
            warn!(timestamp, "detector failed, tracks left untouched");
        })?;

        if self.engine.is_empty() && detections.is_empty() {
            return Ok(());
        }
        let hsv = HsvImage::from_frame(frame);
        self.engine.predict_hsv(&hsv, annotations);
        self.engine.correct_hsv(&detections, &hsv);
        Ok(())
    }

    /// Frame dimensions expected by the detector.
    pub fn input_size(&self) -> Size {
        self.detector.input_size()
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying engine.
    pub fn engine(&self) -> &TrackingEngine {
        &self.engine
    }

    /// Get a mutable reference to the underlying engine.
    pub fn engine_mut(&mut self) -> &mut TrackingEngine {
        &mut self.engine
    }
}
