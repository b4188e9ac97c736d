//! Integration module for putting a detection backend in front of the tracker.
//!
//! This module provides the detector contract, the combined detector +
//! tracker facade and the configuration-driven choice between the two.

mod builder;
mod detector;
mod loader;
mod pipeline;

pub use builder::AnnotationBuilder;
pub use detector::{Detector, NullDetector};
pub use loader::{Inference, ObjectTrackingConfig, TrackerKind};
pub use pipeline::ObjectTracker;
