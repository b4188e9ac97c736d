//! Trait for object detection backends.

use crate::error::Error;
use crate::tracker::{Annotation, Frame, Size};

/// Trait for object detection backends.
///
/// Implement this trait to put any detection model in front of the tracker.
/// Detections come back untracked (`track_id == None`) with boxes in
/// normalized coordinates.
///
/// # Example
///
/// ```ignore
/// use camshift_track::{Annotation, Detector, Frame, Size};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl Detector for MyDetector {
///     type Error = std::io::Error;
///
///     fn run(&mut self, timestamp: f64, frame: &Frame<'_>) -> Result<Vec<Annotation>, Self::Error> {
///         // Run inference and return detections
///         Ok(vec![])
///     }
///
///     fn input_size(&self) -> Size {
///         Size::new(300, 300)
///     }
/// }
/// ```
pub trait Detector {
    /// Error type for detection failures.
    type Error;

    /// Run inference on one frame.
    ///
    /// # Arguments
    /// * `timestamp` - Capture time of the frame
    /// * `frame` - RGB image
    fn run(&mut self, timestamp: f64, frame: &Frame<'_>) -> Result<Vec<Annotation>, Self::Error>;

    /// Frame dimensions the model expects.
    fn input_size(&self) -> Size;
}

/// Placeholder backend used when no model could be loaded.
///
/// Every call to [`run`](Detector::run) fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDetector;

impl Detector for NullDetector {
    type Error = Error;

    fn run(&mut self, _timestamp: f64, _frame: &Frame<'_>) -> Result<Vec<Annotation>, Error> {
        Err(Error::DetectorUnavailable)
    }

    fn input_size(&self) -> Size {
        Size::new(256, 256)
    }
}
