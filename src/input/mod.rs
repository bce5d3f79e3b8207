//! Hand-tracking input
//!
//! The landmark model is a black box: per video frame it reports zero or more
//! hands, each an ordered list of normalized landmarks. Only the index
//! fingertip of the first hand drives the blade.

pub mod skeleton;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::INDEX_FINGER_TIP;

pub use skeleton::{HAND_CHAINS, skeleton_polylines};

/// One landmark in normalized frame coordinates (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// Ordered landmarks for one detected hand
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HandLandmarks {
    pub points: Vec<Landmark>,
}

/// Everything the model found in one frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Detection {
    pub hands: Vec<HandLandmarks>,
}

impl Detection {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Detection with a single hand whose index fingertip is at (x, y)
    pub fn fingertip(x: f32, y: f32) -> Self {
        let mut points = vec![Landmark::default(); INDEX_FINGER_TIP + 1];
        points[INDEX_FINGER_TIP] = Landmark::new(x, y);
        Self {
            hands: vec![HandLandmarks { points }],
        }
    }

    /// Index fingertip of the first hand, if present
    pub fn index_fingertip(&self) -> Option<Landmark> {
        self.hands.first()?.points.get(INDEX_FINGER_TIP).copied()
    }

    /// Parse a landmarker result as the browser model reports it:
    /// `{"landmarks": [[{x, y, z}, ...], ...]}`. A blank payload means no hands.
    pub fn from_landmarks_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::empty());
        }
        let result: LandmarkerResult = serde_json::from_str(json)?;
        Ok(Self {
            hands: result
                .landmarks
                .into_iter()
                .map(|points| HandLandmarks { points })
                .collect(),
        })
    }
}

#[derive(Deserialize)]
struct LandmarkerResult {
    #[serde(default)]
    landmarks: Vec<Vec<Landmark>>,
}

/// The hand-landmark model
pub trait HandLandmarker {
    fn detect_for_video(&mut self, timestamp_ms: f64) -> Detection;
}

/// The camera stream
pub trait VideoSource {
    /// Presentation time of the frame currently available
    fn current_time(&self) -> f64;

    /// Stop the stream and release the device
    fn release(&mut self) {}
}

/// Result of polling the camera for one tick
#[derive(Debug, Clone, PartialEq)]
pub enum Poll {
    /// The video has not advanced since the last poll
    Stale,
    /// A new frame was analysed
    Fresh {
        /// Normalized cut point (mirrored, y up), `None` when there is no usable input
        cut: Option<Vec2>,
        detection: Detection,
    },
}

/// Turns landmark detections into cut points
#[derive(Debug, Clone)]
pub struct InputAdapter {
    safety_margin: f32,
    last_video_time: Option<f64>,
}

impl InputAdapter {
    pub fn new(safety_margin: f32) -> Self {
        Self {
            safety_margin,
            last_video_time: None,
        }
    }

    /// Run detection if the video advanced since the previous poll
    pub fn poll<V, L>(&mut self, video: &V, landmarker: &mut L, now_ms: f64) -> Poll
    where
        V: VideoSource + ?Sized,
        L: HandLandmarker + ?Sized,
    {
        let video_time = video.current_time();
        if !self.needs_detection(video_time) {
            return Poll::Stale;
        }
        self.last_video_time = Some(video_time);

        let detection = landmarker.detect_for_video(now_ms);
        let cut = self.cut_point(&detection);
        Poll::Fresh { cut, detection }
    }

    /// Whether a frame at `video_time` is new, so the model should run on it
    pub fn needs_detection(&self, video_time: f64) -> bool {
        self.last_video_time != Some(video_time)
    }

    /// Mirrored fingertip position, or `None` inside the dead zone / without hands
    pub fn cut_point(&self, detection: &Detection) -> Option<Vec2> {
        let tip = detection.index_fingertip()?;
        // Front camera: mirror both axes
        let x = 1.0 - tip.x;
        let y = 1.0 - tip.y;

        let m = self.safety_margin;
        let inside = x > m && x < 1.0 - m && y > m && y < 1.0 - m;
        inside.then(|| Vec2::new(x, y))
    }
}
