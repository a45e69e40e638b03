//! Pointer tracking over a noisy, intermittently-missing detection stream
//!
//! The detector can skip frames, report low-confidence hands, or drop the
//! fingertip landmark. The tracker gates on confidence, mirrors coordinates
//! for the front-facing camera, and holds the last confidently-seen position
//! so the pointer survives short detection gaps.

use glam::Vec2;

use super::keypoints::{HandDetection, INDEX_FINGER_TIP};
use crate::consts::DETECTION_CONFIDENCE;
use crate::mirror_x;

/// Tracker output for one frame
#[derive(Debug, Clone, Default)]
pub struct TrackerFrame {
    /// Pointer position in surface coordinates, sticky across detection
    /// gaps. None only if no hand has ever been confidently seen.
    pub pointer: Option<Vec2>,
    /// Full mirrored keypoint set when a confident hand was seen this frame
    /// (for skeleton rendering), regardless of fingertip availability.
    pub keypoints: Option<Vec<Vec2>>,
}

/// Confidence-gated, mirrored, sticky pointer source
#[derive(Debug)]
pub struct PointerTracker {
    surface_width: f32,
    last_known: Option<Vec2>,
}

impl PointerTracker {
    pub fn new(surface_width: f32) -> Self {
        Self {
            surface_width,
            last_known: None,
        }
    }

    /// Last confidently-detected pointer position, if any
    pub fn last_known(&self) -> Option<Vec2> {
        self.last_known
    }

    /// Consume one frame's detections.
    ///
    /// The best-scoring hand wins. Below-threshold frames, empty frames, and
    /// frames missing the fingertip landmark all fall back to the sticky
    /// position rather than dropping the pointer.
    pub fn update(&mut self, hands: &[HandDetection]) -> TrackerFrame {
        let best = hands.iter().max_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let Some(hand) = best else {
            return TrackerFrame {
                pointer: self.last_known,
                keypoints: None,
            };
        };
        if hand.score < DETECTION_CONFIDENCE {
            return TrackerFrame {
                pointer: self.last_known,
                keypoints: None,
            };
        }

        let mirrored: Vec<Vec2> = hand
            .keypoints
            .iter()
            .map(|k| Vec2::new(mirror_x(self.surface_width, k.x), k.y))
            .collect();

        let pointer = match mirrored.get(INDEX_FINGER_TIP).copied() {
            Some(tip) => {
                self.last_known = Some(tip);
                Some(tip)
            }
            None => self.last_known,
        };

        TrackerFrame {
            pointer,
            keypoints: Some(mirrored),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::keypoints::{Keypoint, NUM_KEYPOINTS};

    fn full_hand(score: f32, tip_x: f32, tip_y: f32) -> HandDetection {
        let mut keypoints = vec![Keypoint { x: 10.0, y: 20.0 }; NUM_KEYPOINTS];
        keypoints[INDEX_FINGER_TIP] = Keypoint { x: tip_x, y: tip_y };
        HandDetection { score, keypoints }
    }

    #[test]
    fn test_confident_hand_mirrors_fingertip() {
        let mut tracker = PointerTracker::new(640.0);
        let frame = tracker.update(&[full_hand(0.9, 100.0, 150.0)]);
        assert_eq!(frame.pointer, Some(Vec2::new(540.0, 150.0)));
        assert_eq!(tracker.last_known(), Some(Vec2::new(540.0, 150.0)));

        let keypoints = frame.keypoints.expect("confident hand exposes skeleton");
        assert_eq!(keypoints.len(), NUM_KEYPOINTS);
        assert_eq!(keypoints[0], Vec2::new(630.0, 20.0));
    }

    #[test]
    fn test_low_confidence_falls_back_to_sticky() {
        let mut tracker = PointerTracker::new(640.0);
        tracker.update(&[full_hand(0.8, 100.0, 150.0)]);

        let frame = tracker.update(&[full_hand(0.4, 300.0, 300.0)]);
        assert_eq!(frame.pointer, Some(Vec2::new(540.0, 150.0)));
        assert!(frame.keypoints.is_none(), "no skeleton for gated frames");
    }

    #[test]
    fn test_empty_frame_falls_back_to_sticky() {
        let mut tracker = PointerTracker::new(640.0);
        tracker.update(&[full_hand(0.8, 100.0, 150.0)]);

        let frame = tracker.update(&[]);
        assert_eq!(frame.pointer, Some(Vec2::new(540.0, 150.0)));
    }

    #[test]
    fn test_never_seen_yields_none() {
        let mut tracker = PointerTracker::new(640.0);
        let frame = tracker.update(&[]);
        assert!(frame.pointer.is_none());
        assert!(frame.keypoints.is_none());
    }

    #[test]
    fn test_missing_fingertip_keeps_sticky_but_shows_skeleton() {
        let mut tracker = PointerTracker::new(640.0);
        tracker.update(&[full_hand(0.9, 100.0, 150.0)]);

        // Confident hand, but the buffer stops short of the index tip
        let partial = HandDetection {
            score: 0.9,
            keypoints: vec![Keypoint { x: 5.0, y: 5.0 }; INDEX_FINGER_TIP],
        };
        let frame = tracker.update(&[partial]);
        assert_eq!(frame.pointer, Some(Vec2::new(540.0, 150.0)));
        assert!(frame.keypoints.is_some());
    }

    #[test]
    fn test_best_scoring_hand_wins() {
        let mut tracker = PointerTracker::new(640.0);
        let frame = tracker.update(&[full_hand(0.6, 100.0, 100.0), full_hand(0.95, 200.0, 200.0)]);
        assert_eq!(frame.pointer, Some(Vec2::new(440.0, 200.0)));
    }

    #[test]
    fn test_exact_threshold_accepted() {
        let mut tracker = PointerTracker::new(640.0);
        let frame = tracker.update(&[full_hand(DETECTION_CONFIDENCE, 100.0, 100.0)]);
        assert!(frame.pointer.is_some());
    }
}
