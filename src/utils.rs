use crate::types::{Channel, Position, Quaternion, Transform};
use cgmath::{Deg, Rotation3};

/// Incremental rotation for one rotation channel, angle in DEGREES.
/// Returns `None` for position channels.
pub(crate) fn channel_rotation(channel: Channel, degrees: f64) -> Option<Quaternion> {
    let angle = Deg(degrees);
    match channel {
        Channel::RotationX => Some(Quaternion::from_angle_x(angle)),
        Channel::RotationY => Some(Quaternion::from_angle_y(angle)),
        Channel::RotationZ => Some(Quaternion::from_angle_z(angle)),
        _ => None,
    }
}

/// Bone-local transform: offset, then frame translation, then frame rotation.
pub(crate) fn local_transform(offset: Position, translation: Position, rotation: Quaternion) -> Transform {
    Transform::from_translation(offset) * Transform::from_translation(translation) * Transform::from(rotation)
}

pub(crate) fn translation_of(transform: &Transform) -> Position {
    transform.w.truncate()
}
