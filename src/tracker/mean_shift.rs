//! Mean-shift and CamShift window search over a back-projection.

use ndarray::{Array2, s};
use serde::{Deserialize, Serialize};

use crate::tracker::frame::Size;
use crate::tracker::rect::PixelRect;

/// Extra margin, in pixels, around the converged window when CamShift
/// re-estimates the object size.
const CAMSHIFT_TOLERANCE: i32 = 10;

/// Stopping rule for the iterative window search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermCriteria {
    /// Upper bound on the number of iterations.
    pub max_iterations: u32,
    /// Stop once the window moves by less than this many pixels.
    pub epsilon: f64,
}

impl Default for TermCriteria {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            epsilon: 1.0,
        }
    }
}

/// Raw spatial moments of the weights inside a window, measured at pixel
/// centres relative to the window origin.
#[derive(Debug, Default)]
struct Moments {
    m00: f64,
    m10: f64,
    m01: f64,
    m20: f64,
    m02: f64,
}

fn window_moments(weights: &Array2<f32>, rect: PixelRect) -> Moments {
    let mut m = Moments::default();
    if rect.is_empty() {
        return m;
    }

    let (x, y) = (rect.x as usize, rect.y as usize);
    let view = weights.slice(s![y..y + rect.height as usize, x..x + rect.width as usize]);
    for ((row, col), &w) in view.indexed_iter() {
        if w == 0.0 {
            continue;
        }
        let w = f64::from(w);
        let fx = col as f64 + 0.5;
        let fy = row as f64 + 0.5;
        m.m00 += w;
        m.m10 += w * fx;
        m.m01 += w * fy;
        m.m20 += w * fx * fx;
        m.m02 += w * fy * fy;
    }
    m
}

#[inline]
fn weights_size(weights: &Array2<f32>) -> Size {
    let (rows, cols) = weights.dim();
    Size::new(cols, rows)
}

/// Move `window` towards the local mode of `weights`.
///
/// Each step re-centres the window on the weighted centroid of the pixels it
/// covers, keeping it inside the image. A window covering no weight does not
/// move. Returns the final window and the number of iterations run.
pub fn mean_shift(
    weights: &Array2<f32>,
    window: PixelRect,
    criteria: TermCriteria,
) -> (PixelRect, u32) {
    let size = weights_size(weights);
    let mut cur = window.clip(size);
    if cur.is_empty() {
        return (cur, 0);
    }

    let eps = (criteria.epsilon * criteria.epsilon).round() as i32;
    let mut iterations = 0;
    while iterations < criteria.max_iterations {
        iterations += 1;

        let m = window_moments(weights, cur);
        if m.m00 < f64::EPSILON {
            break;
        }

        let dx = (m.m10 / m.m00 - f64::from(cur.width) * 0.5).round() as i32;
        let dy = (m.m01 / m.m00 - f64::from(cur.height) * 0.5).round() as i32;

        let nx = (cur.x + dx).clamp(0, size.width as i32 - cur.width);
        let ny = (cur.y + dy).clamp(0, size.height as i32 - cur.height);
        let (dx, dy) = (nx - cur.x, ny - cur.y);
        cur.x = nx;
        cur.y = ny;

        if dx * dx + dy * dy < eps {
            break;
        }
    }

    (cur, iterations)
}

/// Mean-shift followed by a size estimate from the second order moments of
/// the weights around the converged window.
///
/// The returned window is the bounding box of the two-sigma ellipse of the
/// weights, clipped to the image.
pub fn cam_shift(
    weights: &Array2<f32>,
    window: PixelRect,
    criteria: TermCriteria,
) -> (PixelRect, u32) {
    let size = weights_size(weights);
    let (converged, iterations) = mean_shift(weights, window, criteria);
    if converged.is_empty() {
        return (converged, iterations);
    }

    let grown = PixelRect::new(
        converged.x - CAMSHIFT_TOLERANCE,
        converged.y - CAMSHIFT_TOLERANCE,
        converged.width + 2 * CAMSHIFT_TOLERANCE,
        converged.height + 2 * CAMSHIFT_TOLERANCE,
    )
    .clip(size);

    let m = window_moments(weights, grown);
    if m.m00 < f64::EPSILON {
        return (converged, iterations);
    }

    // Spatial covariance of the weights; the new window spans two standard
    // deviations on each side of the centroid.
    let inv_m00 = 1.0 / m.m00;
    let xc = m.m10 * inv_m00;
    let yc = m.m01 * inv_m00;
    let var_x = (m.m20 * inv_m00 - xc * xc).max(0.0);
    let var_y = (m.m02 * inv_m00 - yc * yc).max(0.0);

    let half_w = 2.0 * var_x.sqrt();
    let half_h = 2.0 * var_y.sqrt();
    let cx = f64::from(grown.x) + xc;
    let cy = f64::from(grown.y) + yc;

    let resized = PixelRect::new(
        (cx - half_w).round() as i32,
        (cy - half_h).round() as i32,
        (2.0 * half_w).round() as i32,
        (2.0 * half_h).round() as i32,
    )
    .clip(size);

    if resized.is_empty() {
        (converged, iterations)
    } else {
        (resized, iterations)
    }
}
