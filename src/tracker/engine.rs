//! Tracking engine: per-frame prediction and correction over the live tracks.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::tracker::annotation::Annotation;
use crate::tracker::frame::Frame;
use crate::tracker::histogram::HsvImage;
use crate::tracker::kalman_filter::KalmanFilter;
use crate::tracker::matching::{associate, overlap_losers};
use crate::tracker::mean_shift::TermCriteria;
use crate::tracker::track::Track;

/// How a track's window is re-localized on each prediction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMode {
    /// Fixed-size mean-shift.
    #[default]
    MeanShift,
    /// Mean-shift followed by a window size estimate.
    CamShift,
}

/// Configuration for the tracking engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Overlap above which a detection matches a track, or two tracks conflict.
    pub iou_threshold: f32,
    /// Health of a new or freshly corrected track.
    pub initial_health: i32,
    /// Mean-shift iteration bound.
    pub max_iterations: u32,
    /// Mean-shift convergence distance in pixels.
    pub epsilon: f64,
    /// Process noise scale of the motion filter.
    pub process_noise: f64,
    /// Pixels below this saturation are left out of appearance histograms.
    pub saturation_floor: u8,
    /// Pixels below this value are left out of appearance histograms.
    pub value_floor: u8,
    pub window_mode: WindowMode,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            iou_threshold: 0.1,
            initial_health: 10,
            max_iterations: 10,
            epsilon: 1.0,
            process_noise: 0.03,
            saturation_floor: 60,
            value_floor: 32,
            window_mode: WindowMode::MeanShift,
        }
    }
}

impl TrackerConfig {
    /// Window search stopping rule.
    pub fn criteria(&self) -> TermCriteria {
        TermCriteria {
            max_iterations: self.max_iterations,
            epsilon: self.epsilon,
        }
    }
}

/// Owns the live tracks and assigns their ids.
///
/// Call [`predict`](Self::predict) then [`correct`](Self::correct) once per
/// frame. Detections handed to `correct` may be stale or missing; association
/// is purely geometric.
#[derive(Debug, Clone)]
pub struct TrackingEngine {
    tracks: Vec<Track>,
    next_id: u64,
    config: TrackerConfig,
    kalman_filter: KalmanFilter,
}

impl Default for TrackingEngine {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl TrackingEngine {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            tracks: Vec::new(),
            next_id: 0,
            kalman_filter: KalmanFilter::new(config.process_noise),
            config,
        }
    }

    /// Advance every live track on `frame` and append their annotations to
    /// `predictions`.
    ///
    /// Tracks that overlap an older track are then dropped, as are tracks
    /// whose health ran out.
    pub fn predict(&mut self, frame: &Frame<'_>, predictions: &mut Vec<Annotation>) {
        if self.tracks.is_empty() {
            return;
        }
        self.predict_hsv(&HsvImage::from_frame(frame), predictions);
    }

    /// [`predict`](Self::predict) on a frame already converted to HSV.
    pub(crate) fn predict_hsv(&mut self, hsv: &HsvImage, predictions: &mut Vec<Annotation>) {
        // Step 1: visual update
        for track in self.tracks.iter_mut() {
            if !track.is_alive() {
                continue;
            }
            predictions.push(track.predict(hsv, &self.config).clone());
        }

        // Step 2: overlap conflicts
        let boxes: Vec<_> = self.tracks.iter().map(Track::current_box).collect();
        let ages: Vec<_> = self.tracks.iter().map(Track::age).collect();
        for idx in overlap_losers(&boxes, &ages, self.config.iou_threshold) {
            let track = &mut self.tracks[idx];
            debug!(
                track_id = track.id(),
                age = track.age(),
                "track overlaps an older track, suppressing"
            );
            track.suppress();
        }

        // Step 3: drop dead tracks
        self.tracks.retain(|track| {
            if !track.is_alive() {
                debug!(track_id = track.id(), health = track.health(), "dropping track");
            }
            track.is_alive()
        });
        trace!(live = self.tracks.len(), "prediction pass done");
    }

    /// Fold detections into the tracks.
    ///
    /// Each detection corrects the first uncorrected track it overlaps;
    /// anything else starts a new track. A detection overlapping only tracks
    /// claimed earlier in the same call therefore starts a track too, and the
    /// next prediction pass resolves the overlap.
    pub fn correct(&mut self, detections: &[Annotation], frame: &Frame<'_>) {
        if detections.is_empty() {
            self.clear_corrected();
            return;
        }
        self.correct_hsv(detections, &HsvImage::from_frame(frame));
    }

    /// [`correct`](Self::correct) on a frame already converted to HSV.
    pub(crate) fn correct_hsv(&mut self, detections: &[Annotation], hsv: &HsvImage) {
        self.clear_corrected();
        for detection in detections {
            match associate(&self.tracks, &detection.bbox, self.config.iou_threshold) {
                Some(idx) => {
                    let track = &mut self.tracks[idx];
                    track.correct(detection.bbox, hsv, &self.config, &self.kalman_filter);
                    track.set_corrected(true);
                }
                None => {
                    let id = self.next_id;
                    self.next_id += 1;
                    debug!(track_id = id, class = %detection.class_name, "new track");
                    self.tracks.push(Track::new(
                        detection.bbox,
                        hsv,
                        id,
                        detection.clone(),
                        &self.config,
                        &self.kalman_filter,
                    ));
                }
            }
        }
    }

    fn clear_corrected(&mut self) {
        for track in self.tracks.iter_mut() {
            track.set_corrected(false);
        }
    }

    /// Live tracks in creation order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Drop every track. Ids are not reused afterwards.
    pub fn reset(&mut self) {
        self.tracks.clear();
    }
}
