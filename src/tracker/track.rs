//! Single tracked object.

use ndarray::{Array1, Array2};
use tracing::trace;

use crate::tracker::annotation::Annotation;
use crate::tracker::engine::{TrackerConfig, WindowMode};
use crate::tracker::frame::Size;
use crate::tracker::histogram::{ColorHistogram, HsvImage};
use crate::tracker::kalman_filter::KalmanFilter;
use crate::tracker::mean_shift::{cam_shift, mean_shift};
use crate::tracker::rect::{BoundingBox, PixelRect};

/// Single tracked object.
///
/// The window lives in pixel space of the most recent frame; the owned
/// annotation carries the same box in normalized coordinates.
#[derive(Debug, Clone)]
pub struct Track {
    id: u64,
    window: PixelRect,
    frame_size: Size,
    histogram: ColorHistogram,
    /// Motion filter state mean `(x, y, vx, vy)`
    mean: Array1<f64>,
    /// Motion filter state covariance (4x4)
    covariance: Array2<f64>,
    health: i32,
    age: u32,
    corrected: bool,
    annotation: Annotation,
}

impl Track {
    /// Start a track on `initial_box` and immediately correct it with the
    /// same box.
    pub fn new(
        initial_box: BoundingBox,
        hsv: &HsvImage,
        id: u64,
        mut annotation: Annotation,
        config: &TrackerConfig,
        kalman_filter: &KalmanFilter,
    ) -> Self {
        annotation.track_id = Some(id);

        let frame_size = hsv.size();
        let window = initial_box.to_pixels(frame_size);
        let (cx, cy) = window.center();
        let (mean, covariance) = kalman_filter.initiate([f64::from(cx), f64::from(cy)]);

        let mut track = Self {
            id,
            window,
            frame_size,
            // Filled in by the correction below.
            histogram: ColorHistogram::default(),
            mean,
            covariance,
            health: config.initial_health,
            age: 0,
            corrected: true,
            annotation,
        };
        track.correct(initial_box, hsv, config, kalman_filter);
        track
    }

    /// Re-localize the window on a new frame without detector evidence.
    ///
    /// Ages the track and costs one point of health.
    pub fn predict(&mut self, hsv: &HsvImage, config: &TrackerConfig) -> &Annotation {
        let size = hsv.size();
        if size != self.frame_size {
            self.window = self.window.to_normalized(self.frame_size).to_pixels(size);
            self.frame_size = size;
        }

        let weights = self.histogram.back_project(hsv);
        let (window, iterations) = match config.window_mode {
            WindowMode::MeanShift => mean_shift(&weights, self.window, config.criteria()),
            WindowMode::CamShift => cam_shift(&weights, self.window, config.criteria()),
        };
        trace!(track_id = self.id, iterations, ?window, "window search");

        self.window = window;
        self.annotation.bbox = window.to_normalized(self.frame_size);

        self.age = self.age.saturating_add(1);
        self.health -= 1;
        &self.annotation
    }

    /// Snap the track to a detected box and refresh its appearance model.
    pub fn correct(
        &mut self,
        new_box: BoundingBox,
        hsv: &HsvImage,
        config: &TrackerConfig,
        kalman_filter: &KalmanFilter,
    ) {
        self.frame_size = hsv.size();
        self.window = new_box.to_pixels(self.frame_size);
        self.histogram = ColorHistogram::from_region(
            hsv,
            self.window,
            config.saturation_floor,
            config.value_floor,
        );
        self.annotation.bbox = new_box;

        let (cx, cy) = self.window.center();
        (self.mean, self.covariance) =
            kalman_filter.update(&self.mean, &self.covariance, [f64::from(cx), f64::from(cy)]);

        self.health = config.initial_health;
    }

    /// Current window in normalized coordinates.
    pub fn current_box(&self) -> BoundingBox {
        self.window.to_normalized(self.frame_size)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_corrected(&self) -> bool {
        self.corrected
    }

    pub fn window(&self) -> PixelRect {
        self.window
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    /// Motion filter estimate `(x, y, vx, vy)` of the window centre in pixels.
    pub fn motion_state(&self) -> [f64; 4] {
        [self.mean[0], self.mean[1], self.mean[2], self.mean[3]]
    }

    pub(crate) fn set_corrected(&mut self, corrected: bool) {
        self.corrected = corrected;
    }

    /// Mark the track for removal at the end of the current prediction pass.
    pub(crate) fn suppress(&mut self) {
        self.health = -1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::frame::Frame;
    use approx::assert_relative_eq;
    use ndarray::{Array3, s};

    const RED: [u8; 3] = [200, 40, 40];

    fn frame_with_square(x: usize, y: usize, side: usize) -> Array3<u8> {
        scene(100, x, y, side)
    }

    fn scene(dim: usize, x: usize, y: usize, side: usize) -> Array3<u8> {
        let mut image = Array3::zeros((dim, dim, 3));
        for (c, value) in RED.iter().enumerate() {
            image.slice_mut(s![y..y + side, x..x + side, c]).fill(*value);
        }
        image
    }

    fn new_track(image: &Array3<u8>, bbox: BoundingBox) -> (Track, HsvImage, TrackerConfig) {
        let hsv = HsvImage::from_frame(&Frame::new(image.view()).unwrap());
        let config = TrackerConfig::default();
        let track = Track::new(
            bbox,
            &hsv,
            7,
            Annotation::default(),
            &config,
            &KalmanFilter::default(),
        );
        (track, hsv, config)
    }

    #[test]
    fn test_new_track() {
        let image = frame_with_square(10, 10, 20);
        let bbox = BoundingBox::new(0.1, 0.1, 0.3, 0.3);
        let (track, _, _) = new_track(&image, bbox);

        assert_eq!(track.id(), 7);
        assert_eq!(track.health(), 10);
        assert_eq!(track.age(), 0);
        assert!(track.is_corrected());
        assert_eq!(track.annotation().track_id, Some(7));
        assert_eq!(track.annotation().bbox, bbox);
        assert_eq!(track.window(), PixelRect::new(10, 10, 20, 20));

        let [x, y, vx, vy] = track.motion_state();
        assert_relative_eq!(x, 20.0);
        assert_relative_eq!(y, 20.0);
        assert_eq!((vx, vy), (0.0, 0.0));
    }

    #[test]
    fn test_predict_on_static_frame() {
        let image = frame_with_square(10, 10, 20);
        let bbox = BoundingBox::new(0.1, 0.1, 0.3, 0.3);
        let (mut track, hsv, config) = new_track(&image, bbox);

        for k in 1..=3 {
            let predicted = track.predict(&hsv, &config).bbox;
            assert_relative_eq!(predicted.left, 0.1);
            assert_relative_eq!(predicted.right, 0.3);
            assert_eq!(track.age(), k);
            assert_eq!(track.health(), 10 - k as i32);
        }
        assert!(track.is_corrected());
    }

    #[test]
    fn test_predict_follows_moving_object() {
        let image = frame_with_square(10, 10, 20);
        let (mut track, _, config) = new_track(&image, BoundingBox::new(0.1, 0.1, 0.3, 0.3));

        let moved = frame_with_square(16, 12, 20);
        let hsv = HsvImage::from_frame(&Frame::new(moved.view()).unwrap());
        track.predict(&hsv, &config);
        assert_eq!(track.window(), PixelRect::new(16, 12, 20, 20));
        assert_relative_eq!(track.current_box().left, 0.16);
    }

    #[test]
    fn test_correct_resets_health_but_not_age() {
        let image = frame_with_square(10, 10, 20);
        let (mut track, hsv, config) = new_track(&image, BoundingBox::new(0.1, 0.1, 0.3, 0.3));
        for _ in 0..4 {
            track.predict(&hsv, &config);
        }
        assert_eq!(track.health(), 6);

        let new_box = BoundingBox::new(0.12, 0.11, 0.29, 0.31);
        track.correct(new_box, &hsv, &config, &KalmanFilter::default());
        assert_eq!(track.health(), 10);
        assert_eq!(track.age(), 4);
        assert_eq!(track.annotation().bbox, new_box);
    }

    #[test]
    fn test_zero_area_box_is_inert() {
        let image = frame_with_square(10, 10, 20);
        let (mut track, hsv, config) = new_track(&image, BoundingBox::new(0.5, 0.5, 0.5, 0.5));
        assert!(track.window().is_empty());

        track.predict(&hsv, &config);
        assert_eq!(track.window(), PixelRect::new(50, 50, 0, 0));
        assert_eq!(track.health(), 9);
        assert_eq!(track.age(), 1);
    }

    #[test]
    fn test_box_outside_frame_is_clamped() {
        let image = frame_with_square(10, 10, 20);
        let (track, _, _) = new_track(&image, BoundingBox::new(1.2, 1.2, 1.5, 1.5));
        assert_eq!(track.window(), PixelRect::new(100, 100, 0, 0));
        assert_eq!(track.current_box(), BoundingBox::new(1.0, 1.0, 1.0, 1.0));
        // The annotation keeps the box exactly as it was supplied.
        assert_eq!(track.annotation().bbox, BoundingBox::new(1.2, 1.2, 1.5, 1.5));
    }

    #[test]
    fn test_predict_rescales_window_on_resolution_change() {
        let image = frame_with_square(10, 10, 20);
        let bbox = BoundingBox::new(0.1, 0.1, 0.3, 0.3);
        let (mut track, _, config) = new_track(&image, bbox);

        let larger = scene(200, 20, 20, 40);
        let hsv = HsvImage::from_frame(&Frame::new(larger.view()).unwrap());
        let predicted = track.predict(&hsv, &config).bbox;
        assert_relative_eq!(predicted.left, 0.1);
        assert_relative_eq!(predicted.top, 0.1);
        assert_relative_eq!(predicted.right, 0.3);
        assert_relative_eq!(predicted.bottom, 0.3);
        assert_eq!(track.window(), PixelRect::new(20, 20, 40, 40));
        assert_eq!(track.current_box(), predicted);
    }

    #[test]
    fn test_age_saturates() {
        let image = frame_with_square(10, 10, 20);
        let (mut track, hsv, config) = new_track(&image, BoundingBox::new(0.1, 0.1, 0.3, 0.3));
        track.age = u32::MAX;
        track.predict(&hsv, &config);
        assert_eq!(track.age(), u32::MAX);
    }
}
