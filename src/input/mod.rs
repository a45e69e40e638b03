//! Input signal tracking
//!
//! Turns raw per-frame hand detections into a stable-or-absent pointer plus
//! a decaying trail. The pose detector itself is an external collaborator;
//! this module only consumes its per-frame results.

pub mod keypoints;
pub mod tracker;
pub mod trail;

pub use keypoints::{HAND_CONNECTIONS, HandDetection, Keypoint};
pub use tracker::{PointerTracker, TrackerFrame};
pub use trail::{Trail, TrailPoint};
