//! Re-projection of solved joints onto the 33-point body pose landmark scheme.
//!
//! The scheme has more points than a mocap skeleton has joints, so several slots share a joint:
//! every facial point sits on `Head`, the heels sit on the feet.

use crate::config::MapperConfig;
use crate::error::{BvhError, Result};
use crate::types::{JointId, Skeleton};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const LANDMARK_COUNT: usize = 33;

/// One output slot and the joint it reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandmarkSlot {
    pub index: usize,
    pub landmark: &'static str,
    /// Exact, case-sensitive joint name
    pub joint: &'static str,
}

const fn slot(index: usize, landmark: &'static str, joint: &'static str) -> LandmarkSlot {
    LandmarkSlot {
        index,
        landmark,
        joint,
    }
}

pub static POSE_LANDMARKS: [LandmarkSlot; LANDMARK_COUNT] = [
    slot(0, "nose", "Head"),
    slot(1, "left_eye_inner", "Head"),
    slot(2, "left_eye", "Head"),
    slot(3, "left_eye_outer", "Head"),
    slot(4, "right_eye_inner", "Head"),
    slot(5, "right_eye", "Head"),
    slot(6, "right_eye_outer", "Head"),
    slot(7, "left_ear", "Head"),
    slot(8, "right_ear", "Head"),
    slot(9, "mouth_left", "Head"),
    slot(10, "mouth_right", "Head"),
    slot(11, "left_shoulder", "LeftArm"),
    slot(12, "right_shoulder", "RightArm"),
    slot(13, "left_elbow", "LeftForeArm"),
    slot(14, "right_elbow", "RightForeArm"),
    slot(15, "left_wrist", "LeftHand"),
    slot(16, "right_wrist", "RightHand"),
    slot(17, "left_pinky", "LeftHandPinky1"),
    slot(18, "right_pinky", "RightHandPinky1"),
    slot(19, "left_index", "LeftHandIndex1"),
    slot(20, "right_index", "RightHandIndex1"),
    slot(21, "left_thumb", "LeftHandThumb1"),
    slot(22, "right_thumb", "RightHandThumb1"),
    slot(23, "left_hip", "LeftUpLeg"),
    slot(24, "right_hip", "RightUpLeg"),
    slot(25, "left_knee", "LeftLeg"),
    slot(26, "right_knee", "RightLeg"),
    slot(27, "left_ankle", "LeftFoot"),
    slot(28, "right_ankle", "RightFoot"),
    slot(29, "left_heel", "LeftFoot"),
    slot(30, "right_heel", "RightFoot"),
    slot(31, "left_foot_index", "LeftToeBase"),
    slot(32, "right_foot_index", "RightToeBase"),
];

/////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub visibility: f64,
}

/// Pose data as the visualizer reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseSequence {
    /// Frames per second
    pub frame_rate: f64,
    pub frame_count: usize,
    pub width: u32,
    pub height: u32,
    /// `frames[frame][slot]`, slots in table order
    pub frames: Vec<Vec<Landmark>>,
}

impl PoseSequence {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/////////////////////////////////////////////////////////////////////////////////////////////////

/// Maps a solved skeleton through [`POSE_LANDMARKS`].
pub fn map_landmarks(skeleton: &Skeleton, config: &MapperConfig) -> Result<PoseSequence> {
    map_landmarks_with(skeleton, &POSE_LANDMARKS, config)
}

/// Maps a solved skeleton through any slot table. Every slot must resolve or nothing is produced.
pub fn map_landmarks_with(
    skeleton: &Skeleton,
    table: &[LandmarkSlot],
    config: &MapperConfig,
) -> Result<PoseSequence> {
    if !skeleton.is_solved() {
        return Err(BvhError::Unsolved);
    }
    config.validate()?;
    let joints = resolve(skeleton, table)?;

    let frames: Vec<Vec<Landmark>> = (0..skeleton.frame_count())
        .map(|frame| {
            joints
                .iter()
                .map(|&id| {
                    let position = skeleton.joint(id).frames[frame].absolute_position;
                    let [x, y, z] = config.normalize(position.into());
                    Landmark {
                        x,
                        y,
                        z,
                        visibility: config.visibility,
                    }
                })
                .collect()
        })
        .collect();

    debug!(
        slots = table.len(),
        frames = frames.len(),
        "mapped joints to landmarks"
    );

    Ok(PoseSequence {
        frame_rate: skeleton.frame_rate(),
        frame_count: skeleton.frame_count(),
        width: config.width,
        height: config.height,
        frames,
    })
}

fn resolve(skeleton: &Skeleton, table: &[LandmarkSlot]) -> Result<Vec<JointId>> {
    table
        .iter()
        .map(|slot| {
            skeleton.find(slot.joint).ok_or_else(|| BvhError::BoneNotFound {
                slot: slot.landmark.to_string(),
                joint: slot.joint.to_string(),
            })
        })
        .collect()
}
