//! Multi-object tracking on top of a per-frame detector.
//!
//! Detections are associated to tracks by overlap. Between detections every
//! track is re-localized by back-projecting its colour histogram onto the frame
//! and running a mean-shift window search.

mod error;
pub mod integration;
pub mod tracker;

pub use error::{Error, Result};
pub use integration::{
    AnnotationBuilder, Detector, Inference, NullDetector, ObjectTracker, ObjectTrackingConfig,
    TrackerKind,
};
pub use tracker::{
    Annotation, BoundingBox, Frame, PixelRect, Size, Track, TrackerConfig, TrackingEngine,
    WindowMode,
};
