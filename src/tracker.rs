mod annotation;
mod engine;
mod frame;
mod histogram;
mod kalman_filter;
mod matching;
mod mean_shift;
mod rect;
mod track;

pub use annotation::Annotation;
pub use engine::{TrackerConfig, TrackingEngine, WindowMode};
pub use frame::{Frame, Size};
pub use histogram::{ColorHistogram, HsvImage};
pub use kalman_filter::KalmanFilter;
pub use matching::{associate, overlap_losers};
pub use mean_shift::{TermCriteria, cam_shift, mean_shift};
pub use rect::{BoundingBox, PixelRect, iou, iou_batch};
pub use track::Track;
