//! HSV conversion, hue/saturation histograms and back-projection.

use ndarray::{Array2, Array3, Axis, Zip, s};

use crate::tracker::frame::{Frame, Size};
use crate::tracker::rect::PixelRect;

/// Number of hue bins; hue is stored as degrees / 2.
pub const HUE_BINS: usize = 180;
/// Number of saturation bins.
pub const SAT_BINS: usize = 256;

/// Frame converted to 8-bit HSV, shape `(height, width, 3)`.
///
/// Hue lies in `[0, 180)`, saturation and value in `[0, 255]`.
#[derive(Debug, Clone)]
pub struct HsvImage {
    pixels: Array3<u8>,
}

impl HsvImage {
    pub fn from_frame(frame: &Frame<'_>) -> Self {
        let rgb = frame.pixels();
        let mut pixels = Array3::zeros(rgb.raw_dim());
        Zip::from(pixels.lanes_mut(Axis(2)))
            .and(rgb.lanes(Axis(2)))
            .for_each(|mut hsv, px| {
                let [h, s, v] = rgb_to_hsv(px[0], px[1], px[2]);
                hsv[0] = h;
                hsv[1] = s;
                hsv[2] = v;
            });
        Self { pixels }
    }

    #[inline]
    pub fn size(&self) -> Size {
        let (height, width, _) = self.pixels.dim();
        Size::new(width, height)
    }

    /// HSV triple at column `x`, row `y`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [u8; 3] {
        [
            self.pixels[[y, x, 0]],
            self.pixels[[y, x, 1]],
            self.pixels[[y, x, 2]],
        ]
    }
}

/// Convert one RGB pixel to 8-bit HSV.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> [u8; 3] {
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = f32::from(v - min);

    let s = if v == 0 {
        0
    } else {
        (255.0 * diff / f32::from(v)).round() as u8
    };

    if diff == 0.0 {
        return [0, s, v];
    }

    let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
    let mut h = if v as f32 == r {
        60.0 * (g - b) / diff
    } else if v as f32 == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }

    let h = ((h / 2.0).round() as usize).min(HUE_BINS - 1) as u8;
    [h, s, v]
}

/// Appearance model: hue x saturation histogram scaled to `[0, 255]`.
#[derive(Debug, Clone)]
pub struct ColorHistogram {
    bins: Array2<f32>,
}

impl Default for ColorHistogram {
    fn default() -> Self {
        Self {
            bins: Array2::zeros((HUE_BINS, SAT_BINS)),
        }
    }
}

impl ColorHistogram {
    /// Build the histogram of `window`, counting only pixels whose saturation
    /// and value reach the given floors.
    ///
    /// An empty window (after clipping to the image) gives an all-zero
    /// histogram.
    pub fn from_region(
        hsv: &HsvImage,
        window: PixelRect,
        saturation_floor: u8,
        value_floor: u8,
    ) -> Self {
        let mut hist = Self::default();
        let window = window.clip(hsv.size());
        if window.is_empty() {
            return hist;
        }

        let (x, y) = (window.x as usize, window.y as usize);
        let (w, h) = (window.width as usize, window.height as usize);
        let roi = hsv.pixels.slice(s![y..y + h, x..x + w, ..]);
        for px in roi.lanes(Axis(2)) {
            if px[1] >= saturation_floor && px[2] >= value_floor {
                hist.bins[[px[0] as usize, px[1] as usize]] += 1.0;
            }
        }

        hist.normalize();
        hist
    }

    /// Min-max scale the bins to `[0, 255]`.
    fn normalize(&mut self) {
        let max = self.bins.fold(f32::MIN, |acc, &v| acc.max(v));
        let min = self.bins.fold(f32::MAX, |acc, &v| acc.min(v));
        if max > min {
            let scale = 255.0 / (max - min);
            self.bins.mapv_inplace(|v| (v - min) * scale);
        } else {
            self.bins.fill(0.0);
        }
    }

    /// Weight assigned to a pixel with the given hue and saturation.
    #[inline]
    pub fn weight(&self, hue: u8, saturation: u8) -> f32 {
        self.bins[[(hue as usize).min(HUE_BINS - 1), saturation as usize]]
    }

    /// Whether no pixel contributed to the histogram.
    pub fn is_empty(&self) -> bool {
        self.bins.iter().all(|&v| v == 0.0)
    }

    /// Back-project the image: every pixel is replaced by its bin weight.
    ///
    /// Returns a `(height, width)` weight map.
    pub fn back_project(&self, hsv: &HsvImage) -> Array2<f32> {
        hsv.pixels.map_axis(Axis(2), |px| self.weight(px[0], px[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn painted(size: usize, rect: (usize, usize, usize, usize), rgb: [u8; 3]) -> Array3<u8> {
        let mut image = Array3::zeros((size, size, 3));
        let (x, y, w, h) = rect;
        for row in y..y + h {
            for col in x..x + w {
                for c in 0..3 {
                    image[[row, col, c]] = rgb[c];
                }
            }
        }
        image
    }

    #[test]
    fn test_rgb_to_hsv_primaries() {
        assert_eq!(rgb_to_hsv(255, 0, 0), [0, 255, 255]);
        assert_eq!(rgb_to_hsv(0, 255, 0), [60, 255, 255]);
        assert_eq!(rgb_to_hsv(0, 0, 255), [120, 255, 255]);
        assert_eq!(rgb_to_hsv(0, 0, 0), [0, 0, 0]);
        assert_eq!(rgb_to_hsv(128, 128, 128), [0, 0, 128]);
    }

    #[test]
    fn test_rgb_to_hsv_wraps_negative_hue() {
        // Magenta-ish red: hue slightly below 360 degrees.
        let [h, _, _] = rgb_to_hsv(255, 0, 10);
        assert!(h >= 170 && h < HUE_BINS as u8);
    }

    #[test]
    fn test_histogram_of_uniform_region() {
        let image = painted(20, (5, 5, 10, 10), [200, 40, 40]);
        let frame = Frame::new(image.view()).unwrap();
        let hsv = HsvImage::from_frame(&frame);
        assert_eq!(hsv.size(), Size::new(20, 20));
        assert_eq!(hsv.get(7, 7), rgb_to_hsv(200, 40, 40));

        let hist = ColorHistogram::from_region(&hsv, PixelRect::new(5, 5, 10, 10), 60, 32);
        let [h, s, _] = rgb_to_hsv(200, 40, 40);
        assert_eq!(hist.weight(h, s), 255.0);
        assert!(!hist.is_empty());

        let back = hist.back_project(&hsv);
        assert_eq!(back.dim(), (20, 20));
        assert_eq!(back[[10, 10]], 255.0);
        assert_eq!(back[[0, 0]], 0.0);
    }

    #[test]
    fn test_histogram_ignores_dark_and_grey_pixels() {
        let image = painted(20, (0, 0, 20, 20), [20, 20, 20]);
        let frame = Frame::new(image.view()).unwrap();
        let hsv = HsvImage::from_frame(&frame);

        let hist = ColorHistogram::from_region(&hsv, PixelRect::new(0, 0, 20, 20), 60, 32);
        assert!(hist.is_empty());
    }

    #[test]
    fn test_histogram_of_empty_window() {
        let image = painted(20, (0, 0, 20, 20), [200, 40, 40]);
        let frame = Frame::new(image.view()).unwrap();
        let hsv = HsvImage::from_frame(&frame);

        let hist = ColorHistogram::from_region(&hsv, PixelRect::new(20, 20, 0, 0), 60, 32);
        assert!(hist.is_empty());
        assert!(hist.back_project(&hsv).iter().all(|&w| w == 0.0));
    }
}
