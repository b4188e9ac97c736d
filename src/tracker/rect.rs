//! Box representations and the overlap metric.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::tracker::frame::Size;

/// Axis-aligned box in normalized `[0, 1]` image coordinates.
///
/// `left < right` and `top < bottom` are expected but not enforced; an inverted
/// box simply never overlaps anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BoundingBox {
    /// Create a box from its left, top, right and bottom edges.
    #[inline]
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a box from center x, center y, width and height.
    #[inline]
    pub fn from_xywh(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(
            cx - width / 2.0,
            cy - height / 2.0,
            cx + width / 2.0,
            cy + height / 2.0,
        )
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Project the box onto a frame of the given size.
    ///
    /// Each edge is scaled, truncated and clamped to the frame, so the
    /// resulting window always lies inside the image and may be empty.
    pub fn to_pixels(&self, size: Size) -> PixelRect {
        let (w, h) = (size.width as f32, size.height as f32);
        let clamp_x = |v: f32| ((v * w) as i32).clamp(0, size.width as i32);
        let clamp_y = |v: f32| ((v * h) as i32).clamp(0, size.height as i32);

        let x1 = clamp_x(self.left);
        let y1 = clamp_y(self.top);
        let x2 = clamp_x(self.right);
        let y2 = clamp_y(self.bottom);

        PixelRect::new(x1, y1, (x2 - x1).max(0), (y2 - y1).max(0))
    }

    /// Intersection over Union with another box.
    #[inline]
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        iou(self, other)
    }
}

/// Calculate Intersection over Union (IoU) of two boxes.
///
/// Returns exactly `0.0` when the boxes do not intersect or when both have no
/// area.
///
/// # Panics
///
/// Panics if the ratio falls outside `[0, 1]`, which can only happen on a
/// geometry defect.
pub fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let x_left = a.left.max(b.left);
    let y_top = a.top.max(b.top);
    let x_right = a.right.min(b.right);
    let y_bottom = a.bottom.min(b.bottom);

    if x_right < x_left || y_bottom < y_top {
        return 0.0;
    }

    let inter_area = (x_right - x_left) * (y_bottom - y_top);
    let union_area = a.area() + b.area() - inter_area;
    if union_area <= 0.0 {
        return 0.0;
    }

    let ratio = inter_area / union_area;
    assert!(
        (0.0..=1.0).contains(&ratio),
        "IoU {ratio} out of range for {a:?} and {b:?}"
    );
    ratio
}

/// Calculate the IoU matrix between two sets of boxes.
///
/// Returns a matrix of shape (M, N) where M is the length of `boxes_a`
/// and N is the length of `boxes_b`.
pub fn iou_batch(boxes_a: &[BoundingBox], boxes_b: &[BoundingBox]) -> Array2<f32> {
    let mut ious = Array2::zeros((boxes_a.len(), boxes_b.len()));
    for (i, a) in boxes_a.iter().enumerate() {
        for (j, b) in boxes_b.iter().enumerate() {
            ious[[i, j]] = iou(a, b);
        }
    }
    ious
}

/// Integer search window in pixel coordinates (top-left corner and size).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    #[inline]
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Center of the window in pixels.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 * 0.5,
            self.y as f32 + self.height as f32 * 0.5,
        )
    }

    /// Intersect with the `[0, width) x [0, height)` image area.
    pub fn clip(&self, size: Size) -> PixelRect {
        let x1 = self.x.clamp(0, size.width as i32);
        let y1 = self.y.clamp(0, size.height as i32);
        let x2 = self.right().clamp(0, size.width as i32);
        let y2 = self.bottom().clamp(0, size.height as i32);
        PixelRect::new(x1, y1, (x2 - x1).max(0), (y2 - y1).max(0))
    }

    /// Convert back to normalized coordinates for a frame of the given size.
    pub fn to_normalized(&self, size: Size) -> BoundingBox {
        let (w, h) = (size.width as f32, size.height as f32);
        BoundingBox::new(
            self.x as f32 / w,
            self.y as f32 / h,
            self.right() as f32 / w,
            self.bottom() as f32 / h,
        )
    }
}
