use serde::{Deserialize, Serialize};

use crate::tracker::rect::BoundingBox;

/// One labelled box, as produced by a detector or emitted by the tracker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Capture time of the frame the box was detected on.
    pub timestamp: f64,
    /// Track identity; `None` for raw detections.
    pub track_id: Option<u64>,
    pub class_id: i32,
    pub class_name: String,
    pub confidence_score: f32,
    pub bbox: BoundingBox,
}

impl Annotation {
    /// Whether a tracker has assigned an identity to this annotation.
    #[inline]
    pub fn is_tracked(&self) -> bool {
        self.track_id.is_some()
    }
}
