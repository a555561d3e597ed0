use crate::types::{Joint, Position, Quaternion, Skeleton, Transform};
use crate::utils;
use cgmath::{One, SquareMatrix, Zero};
use tracing::{debug, trace};

/// Forward kinematics. For every frame, walks the tree root to leaves and writes each animated joint's
/// `absolute_transform`, `absolute_position` and `absolute_rotation`.
///
/// A joint's local transform is `translate(offset) * translate(local_position) * rotate(local_rotation)`,
/// its absolute transform is the parent's absolute transform (same frame) times that. End Sites are skipped.
/// Running it twice gives the same result.
pub fn solve(skeleton: &mut Skeleton) {
    for frame in 0..skeleton.frame_count {
        trace!(frame, "solving frame");
        solve_joint(&mut skeleton.root, frame, Transform::identity(), Quaternion::one());
    }
    skeleton.solved = true;
    debug!(
        joints = skeleton.len(),
        frames = skeleton.frame_count,
        "forward kinematics done"
    );
}

fn solve_joint(joint: &mut Joint, frame: usize, parent_transform: Transform, parent_rotation: Quaternion) {
    if joint.is_end_site() {
        return;
    }

    let keyframe = &mut joint.frames[frame];
    let local = utils::local_transform(joint.offset, keyframe.local_position, keyframe.local_rotation);
    keyframe.absolute_transform = parent_transform * local;
    keyframe.absolute_position = utils::translation_of(&keyframe.absolute_transform);
    keyframe.absolute_rotation = parent_rotation * keyframe.local_rotation;

    let transform = keyframe.absolute_transform;
    let rotation = keyframe.absolute_rotation;
    for child in joint.children.iter_mut() {
        solve_joint(child, frame, transform, rotation);
    }
}

/// Global rest-pose position of every joint, End Sites included, indexed by `JointId`.
/// Just the offsets summed down each chain, no motion applied.
pub fn rest_positions(skeleton: &Skeleton) -> Vec<Position> {
    fn walk(joint: &Joint, parent: Position, positions: &mut Vec<Position>) {
        let position = parent + joint.offset;
        positions.push(position);
        for child in &joint.children {
            walk(child, position, positions);
        }
    }

    let mut positions = Vec::with_capacity(skeleton.len());
    walk(skeleton.root(), Position::zero(), &mut positions);
    positions
}
