use cgmath::{Matrix4, One, Quaternion as CgQuaternion, SquareMatrix, Vector3, Zero};
use std::collections::HashMap;

/////////////////////////////////////////////////////////////////////////////////////////////////

pub type Index = usize;
pub type Quaternion = CgQuaternion<f64>;
pub type Position = Vector3<f64>;
pub type Transform = Matrix4<f64>;

/// Name given to every End Site, the format doesn't name them.
pub const END_SITE_NAME: &str = "EndSite";

/// Frames per second = `FRAME_RATE_NUMERATOR / sample_interval`, with the interval in seconds.
pub const FRAME_RATE_NUMERATOR: f64 = 1.0;

/////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointKind {
    Root,
    Joint,
    EndSite,
}

/// One animatable degree of freedom, in the order the file declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    PositionX,
    PositionY,
    PositionZ,
    RotationX,
    RotationY,
    RotationZ,
}

impl Channel {
    /// Tag as written in a CHANNELS line. Case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Channel> {
        match tag {
            "Xposition" => Some(Channel::PositionX),
            "Yposition" => Some(Channel::PositionY),
            "Zposition" => Some(Channel::PositionZ),
            "Xrotation" => Some(Channel::RotationX),
            "Yrotation" => Some(Channel::RotationY),
            "Zrotation" => Some(Channel::RotationZ),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Channel::PositionX => "Xposition",
            Channel::PositionY => "Yposition",
            Channel::PositionZ => "Zposition",
            Channel::RotationX => "Xrotation",
            Channel::RotationY => "Yrotation",
            Channel::RotationZ => "Zrotation",
        }
    }

    pub fn is_rotation(self) -> bool {
        matches!(
            self,
            Channel::RotationX | Channel::RotationY | Channel::RotationZ
        )
    }
}

/////////////////////////////////////////////////////////////////////////////////////////////////

/// Motion of one joint at one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    pub time: f64,
    pub local_position: Position,
    pub local_rotation: Quaternion,
    // filled in by the FK pass
    pub absolute_transform: Transform,
    pub absolute_position: Position,
    pub absolute_rotation: Quaternion,
}

impl Keyframe {
    pub fn new(time: f64) -> Self {
        Keyframe {
            time,
            local_position: Position::zero(),
            local_rotation: Quaternion::one(),
            absolute_transform: Transform::identity(),
            absolute_position: Position::zero(),
            absolute_rotation: Quaternion::one(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub name: String,
    pub kind: JointKind,
    pub offset: Position,
    pub channels: Vec<Channel>,
    pub children: Vec<Joint>,
    pub frames: Vec<Keyframe>,
}

impl Joint {
    pub fn is_end_site(&self) -> bool {
        self.kind == JointKind::EndSite
    }
}

/// Handle into [`Skeleton`]: the joint's preorder position in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointId(pub Index);

/// The parsed joint tree plus a name index over it.
///
/// The tree owns every joint. `paths` stores, per [`JointId`], the child indices leading from the root
/// to that joint, so lookups never hold a second reference into the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    pub(crate) root: Joint,
    pub(crate) paths: Vec<Vec<Index>>,
    pub(crate) parents: Vec<Option<JointId>>,
    pub(crate) names: HashMap<String, JointId>,
    pub(crate) frame_count: usize,
    pub(crate) sample_interval: f64,
    /// Set once the FK pass has written the absolute fields
    pub(crate) solved: bool,
}

impl Skeleton {
    pub fn root(&self) -> &Joint {
        &self.root
    }

    /// Number of joints, End Sites included.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Whether every keyframe's absolute transform has been computed.
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Seconds per frame.
    pub fn sample_interval(&self) -> f64 {
        self.sample_interval
    }

    /// Frames per second.
    pub fn frame_rate(&self) -> f64 {
        FRAME_RATE_NUMERATOR / self.sample_interval
    }

    /// Length of the clip in seconds.
    pub fn duration(&self) -> f64 {
        self.frame_count as f64 * self.sample_interval
    }

    /// Panics if `id` did not come from this skeleton.
    pub fn joint(&self, id: JointId) -> &Joint {
        self.paths[id.0]
            .iter()
            .fold(&self.root, |joint, &child| &joint.children[child])
    }

    /// All joints in declaration (pre-)order.
    pub fn joints(&self) -> impl Iterator<Item = (JointId, &Joint)> + '_ {
        (0..self.len()).map(move |i| (JointId(i), self.joint(JointId(i))))
    }

    /// Exact, case-sensitive lookup. End Sites are never indexed by name.
    pub fn find(&self, name: &str) -> Option<JointId> {
        self.names.get(name).copied()
    }

    pub fn joint_by_name(&self, name: &str) -> Option<&Joint> {
        self.find(name).map(|id| self.joint(id))
    }

    pub fn parent(&self, id: JointId) -> Option<JointId> {
        self.parents[id.0]
    }

    /// `(parent, child)` pairs in preorder, one per bone segment.
    pub fn bones(&self) -> Vec<(JointId, JointId)> {
        (1..self.len())
            .filter_map(|i| self.parent(JointId(i)).map(|p| (p, JointId(i))))
            .collect()
    }
}
