use approx::assert_abs_diff_eq;
use bvh_landmarks::kinematics::rest_positions;
use bvh_landmarks::types::{Position, END_SITE_NAME};
use bvh_landmarks::{bvh_to_landmarks, parse_bvh, BvhError, JointKind, MapperConfig, POSE_LANDMARKS};
use std::collections::BTreeSet;

const HUMANOID: &str = include_str!("data/humanoid.bvh");

fn absolute(text: &str, joint: &str, frame: usize) -> Position {
    let skeleton = parse_bvh(text).unwrap();
    skeleton.joint_by_name(joint).unwrap().frames[frame].absolute_position
}

#[test]
fn flat_list_matches_header_count() {
    let headers = HUMANOID
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("ROOT") || l.starts_with("JOINT") || l.eq_ignore_ascii_case("end site"))
        .count();
    let skeleton = parse_bvh(HUMANOID).unwrap();
    assert_eq!(skeleton.len(), headers);
    assert_eq!(skeleton.len(), 36);

    let end_sites = skeleton.joints().filter(|(_, j)| j.kind == JointKind::EndSite).count();
    assert_eq!(end_sites, 9);
    for (_, joint) in skeleton.joints() {
        if joint.kind == JointKind::EndSite {
            assert_eq!(joint.name, END_SITE_NAME);
            assert!(joint.frames.is_empty());
        } else {
            assert_eq!(joint.frames.len(), skeleton.frame_count());
        }
    }
}

#[test]
fn parsing_is_deterministic() {
    assert_eq!(parse_bvh(HUMANOID).unwrap(), parse_bvh(HUMANOID).unwrap());
    assert_eq!(
        bvh_to_landmarks(HUMANOID, &MapperConfig::default()).unwrap(),
        bvh_to_landmarks(HUMANOID, &MapperConfig::default()).unwrap()
    );
}

#[test]
fn single_root_is_offset_plus_translation() {
    let text = "HIERARCHY
ROOT Hips
{
\tOFFSET 1 2 3
\tCHANNELS 6 Xposition Yposition Zposition Yrotation Xrotation Zrotation
}
MOTION
Frames: 2
Frame Time: 0.5
10 20 30 0 0 0
-1 -2 -3 45 30 60
";
    assert_abs_diff_eq!(absolute(text, "Hips", 0), Position::new(11.0, 22.0, 33.0), epsilon = 1e-12);
    assert_abs_diff_eq!(absolute(text, "Hips", 1), Position::new(0.0, 0.0, 0.0), epsilon = 1e-12);
}

#[test]
fn minimal_example() {
    let text = "HIERARCHY\nROOT Hips\n{\nOFFSET 0 0 0\nCHANNELS 3 Xposition Yposition Zposition\n}\nMOTION\nFrames: 1\nFrame Time: 0.0333\n1 2 3\n";
    let skeleton = parse_bvh(text).unwrap();
    let frame = &skeleton.root().frames[0];
    assert_eq!(frame.local_position, Position::new(1.0, 2.0, 3.0));
    assert_eq!(frame.absolute_position, Position::new(1.0, 2.0, 3.0));
}

#[test]
fn root_turn_carries_the_arm() {
    // frame 1: hips at (10, 90, 0), turned 90 degrees about Y, so +X maps to -Z
    assert_abs_diff_eq!(absolute(HUMANOID, "LeftHand", 1), Position::new(10.0, 130.0, -65.0), epsilon = 1e-9);
    assert_abs_diff_eq!(absolute(HUMANOID, "Head", 1), Position::new(10.0, 145.0, 0.0), epsilon = 1e-9);
}

#[test]
fn elbow_bend_moves_only_the_forearm_chain() {
    // frame 2: LeftForeArm rotated 90 degrees about Z
    assert_abs_diff_eq!(absolute(HUMANOID, "LeftForeArm", 2), Position::new(40.0, 130.0, 0.0), epsilon = 1e-9);
    assert_abs_diff_eq!(absolute(HUMANOID, "LeftHand", 2), Position::new(40.0, 155.0, 0.0), epsilon = 1e-9);
    assert_abs_diff_eq!(absolute(HUMANOID, "RightHand", 2), Position::new(-65.0, 130.0, 0.0), epsilon = 1e-9);
}

#[test]
fn rest_pose_matches_first_frame() {
    // frame 0 is the rest pose lifted to hip height
    let skeleton = parse_bvh(HUMANOID).unwrap();
    let rest = rest_positions(&skeleton);
    let lift = Position::new(0.0, 90.0, 0.0);
    for (id, joint) in skeleton.joints().filter(|(_, j)| j.kind != JointKind::EndSite) {
        assert_abs_diff_eq!(joint.frames[0].absolute_position, rest[id.0] + lift, epsilon = 1e-9);
    }
}

#[test]
fn removing_any_landmark_bone_fails() {
    let bones: BTreeSet<&str> = POSE_LANDMARKS.iter().map(|slot| slot.joint).collect();
    for bone in bones {
        let text = HUMANOID.replace(&format!("JOINT {bone}\n"), &format!("JOINT {bone}_renamed\n"));
        assert_ne!(text, HUMANOID, "{bone} should be declared in the fixture");
        match bvh_to_landmarks(&text, &MapperConfig::default()) {
            Err(BvhError::BoneNotFound { joint, .. }) => assert_eq!(joint, bone),
            other => panic!("removing {bone} gave {other:?}"),
        }
    }
}

#[test]
fn structural_errors_surface_through_the_pipeline() {
    let err = bvh_to_landmarks("HIERARCHY\nROOT Hips\n{\nOFFSET 0 0\n", &MapperConfig::default()).unwrap_err();
    assert!(matches!(err, BvhError::Structural { .. }));
    assert!(err.to_string().contains("OFFSET with 3 values"));
}
