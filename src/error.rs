use thiserror::Error;

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, BvhError>;

/// Everything that can go wrong between raw .bvh text and a landmark sequence.
///
/// `line` is the 1-based physical line in the input, or `0` when the input ended early.
#[derive(Debug, Error)]
pub enum BvhError {
    /// Malformed HIERARCHY grammar.
    #[error("line {line}: expected {expected}, found `{found}`")]
    Structural {
        line: usize,
        expected: String,
        found: String,
    },

    /// Malformed MOTION header, unknown channel tag or frame token mismatch.
    #[error("line {line}: {message}")]
    MotionFormat { line: usize, message: String },

    /// A landmark slot points at a joint the skeleton doesn't have.
    #[error("landmark `{slot}` needs bone `{joint}` which is not in the skeleton")]
    BoneNotFound { slot: String, joint: String },

    /// Landmarks were asked for before forward kinematics ran.
    #[error("skeleton has no absolute transforms yet, run forward kinematics first")]
    Unsolved,

    #[error("invalid mapper config: {0}")]
    Config(#[from] serde_json::Error),
}

impl BvhError {
    pub(crate) fn structural(line: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        BvhError::Structural {
            line,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn motion(line: usize, message: impl Into<String>) -> Self {
        BvhError::MotionFormat {
            line,
            message: message.into(),
        }
    }
}
