//! Builder for creating detector annotations from various box formats.

use crate::tracker::{Annotation, BoundingBox};

/// Builder for creating untracked [`Annotation`]s from various box formats.
///
/// All coordinates are normalized to the frame size.
#[derive(Debug, Clone, Default)]
pub struct AnnotationBuilder {
    bbox: BoundingBox,
    timestamp: f64,
    class_id: i32,
    class_name: String,
    score: f32,
}

impl AnnotationBuilder {
    /// Create a new annotation builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the box from its left, top, right and bottom edges.
    pub fn ltrb(mut self, left: f32, top: f32, right: f32, bottom: f32) -> Self {
        self.bbox = BoundingBox::new(left, top, right, bottom);
        self
    }

    /// Set the box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = BoundingBox::from_xywh(cx, cy, w, h);
        self
    }

    /// Set the box in TLWH format (top, left, width, height).
    pub fn tlwh(mut self, t: f32, l: f32, w: f32, h: f32) -> Self {
        self.bbox = BoundingBox::new(l, t, l + w, t + h);
        self
    }

    /// Set the class id and its human-readable name.
    pub fn class(mut self, id: i32, name: impl Into<String>) -> Self {
        self.class_id = id;
        self.class_name = name.into();
        self
    }

    /// Set the confidence score.
    pub fn score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    /// Set the capture time of the frame.
    pub fn timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Build the final `Annotation`.
    pub fn build(self) -> Annotation {
        Annotation {
            timestamp: self.timestamp,
            track_id: None,
            class_id: self.class_id,
            class_name: self.class_name,
            confidence_score: self.score,
            bbox: self.bbox,
        }
    }
}
