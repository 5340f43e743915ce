pub mod detector;
pub mod landmark;

#[cfg(feature = "desktop")]
pub use detector::HandDetector;
pub use detector::parse_response;
pub use landmark::{Detection, FrameHands, HandLandmarks, Handedness, Landmark, LandmarkIndex};
