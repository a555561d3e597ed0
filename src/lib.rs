//! Parses .bvh motion capture, solves forward kinematics for every frame and re-projects the skeleton
//! onto the 33-point body pose landmark scheme.
//!
//! ```no_run
//! use bvh_landmarks::{bvh_to_landmarks, MapperConfig};
//!
//! let text = std::fs::read_to_string("walk.bvh").unwrap();
//! let poses = bvh_to_landmarks(&text, &MapperConfig::default()).unwrap();
//! println!("{} frames at {} fps", poses.frame_count, poses.frame_rate);
//! ```

pub mod config;
pub mod cursor;
pub mod error;
pub mod kinematics;
pub mod landmarks;
pub mod parse;
pub mod types;
mod utils;

pub use config::MapperConfig;
pub use error::{BvhError, Result};
pub use landmarks::{map_landmarks, map_landmarks_with, Landmark, LandmarkSlot, PoseSequence, POSE_LANDMARKS};
pub use parse::parse_bvh;
pub use types::{Channel, Joint, JointId, JointKind, Keyframe, Skeleton};

/// Text in, landmark frames out: parse, solve, map.
pub fn bvh_to_landmarks(text: &str, config: &MapperConfig) -> Result<PoseSequence> {
    let skeleton = parse_bvh(text)?;
    map_landmarks(&skeleton, config)
}
