//! Greedy, order-dependent matching between detections and tracks.

use crate::tracker::rect::{BoundingBox, iou, iou_batch};
use crate::tracker::track::Track;

/// Find the track a detection belongs to.
///
/// Tracks are scanned in order and the first uncorrected one whose box
/// overlaps `bbox` by more than `threshold` wins, even if a later track
/// overlaps more. `None` means the detection starts a new track.
pub fn associate(tracks: &[Track], bbox: &BoundingBox, threshold: f32) -> Option<usize> {
    tracks
        .iter()
        .position(|track| !track.is_corrected() && iou(bbox, &track.current_box()) > threshold)
}

/// Indices of boxes that lose an overlap conflict.
///
/// Every pair `(i, j)` with `i < j` whose IoU exceeds `threshold` is a
/// conflict; the strictly older box wins and on equal ages `i` loses. A box
/// that already lost keeps taking part in later pairs.
pub fn overlap_losers(boxes: &[BoundingBox], ages: &[u32], threshold: f32) -> Vec<usize> {
    debug_assert_eq!(boxes.len(), ages.len());

    let ious = iou_batch(boxes, boxes);
    let mut lost = vec![false; boxes.len()];
    for i in 0..boxes.len() {
        for j in i + 1..boxes.len() {
            if ious[[i, j]] > threshold {
                let loser = if ages[i] > ages[j] { j } else { i };
                lost[loser] = true;
            }
        }
    }

    lost.iter()
        .enumerate()
        .filter_map(|(i, &l)| if l { Some(i) } else { None })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxes() -> Vec<BoundingBox> {
        vec![
            BoundingBox::new(0.1, 0.1, 0.3, 0.3),
            BoundingBox::new(0.12, 0.11, 0.29, 0.31),
            BoundingBox::new(0.6, 0.6, 0.8, 0.8),
        ]
    }

    #[test]
    fn test_older_box_wins() {
        assert_eq!(overlap_losers(&boxes(), &[1, 5, 3], 0.1), vec![0]);
        assert_eq!(overlap_losers(&boxes(), &[5, 1, 3], 0.1), vec![1]);
    }

    #[test]
    fn test_equal_ages_first_loses() {
        assert_eq!(overlap_losers(&boxes(), &[2, 2, 2], 0.1), vec![0]);
    }

    #[test]
    fn test_disjoint_boxes_do_not_conflict() {
        let b = boxes();
        assert!(overlap_losers(&[b[0], b[2]], &[0, 0], 0.1).is_empty());
    }

    #[test]
    fn test_loser_still_takes_part() {
        // 0 loses to 1, then 0 is still older than 2 and removes it.
        let b = vec![
            BoundingBox::new(0.1, 0.1, 0.3, 0.3),
            BoundingBox::new(0.1, 0.1, 0.3, 0.3),
            BoundingBox::new(0.11, 0.1, 0.31, 0.3),
        ];
        assert_eq!(overlap_losers(&b, &[3, 4, 1], 0.1), vec![0, 2]);
    }

    #[test]
    fn test_threshold_is_strict() {
        let a = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let b = BoundingBox::new(0.0, 0.0, 0.5, 0.5);
        // IoU is exactly 0.25.
        assert!(overlap_losers(&[a, b], &[0, 0], 0.25).is_empty());
        assert_eq!(overlap_losers(&[a, b], &[0, 0], 0.2), vec![0]);
    }

    #[test]
    fn test_no_boxes() {
        assert!(overlap_losers(&[], &[], 0.1).is_empty());
    }
}
