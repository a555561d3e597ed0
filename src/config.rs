//! Output-space settings for the landmark mapper.

use crate::error::{BvhError, Result};
use serde::{de::Error as _, Deserialize, Serialize};

/// Divisor applied per axis before the offset. A negative divisor flips the axis (image y grows downward).
pub const DEFAULT_SCALE: [f64; 3] = [200.0, -200.0, 200.0];
pub const DEFAULT_OFFSET: [f64; 3] = [0.5, 1.0, 0.0];
pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;
/// Mocap joints are always "seen".
pub const DEFAULT_VISIBILITY: f64 = 1.0;
/// Most decimals `precision` may ask for, past this f64 rounding is meaningless.
pub const MAX_PRECISION: u32 = 15;

/// How joint positions land in the visualizer's normalized space:
/// `out[axis] = position[axis] / scale[axis] + offset[axis]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub scale: [f64; 3],
    pub offset: [f64; 3],
    /// Canvas size reported with the output
    pub width: u32,
    pub height: u32,
    pub visibility: f64,
    /// Round every coordinate to this many decimals, `None` keeps full precision
    pub precision: Option<u32>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        MapperConfig {
            scale: DEFAULT_SCALE,
            offset: DEFAULT_OFFSET,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            visibility: DEFAULT_VISIBILITY,
            precision: None,
        }
    }
}

impl MapperConfig {
    /// Missing fields fall back to the defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MapperConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Divisors must be finite and non-zero, offsets and visibility finite.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| BvhError::Config(serde_json::Error::custom(message));
        if let Some(scale) = self.scale.iter().find(|s| !s.is_finite() || **s == 0.0) {
            return Err(invalid(format!("scale divisor {scale} must be finite and non-zero")));
        }
        if let Some(offset) = self.offset.iter().find(|o| !o.is_finite()) {
            return Err(invalid(format!("offset {offset} must be finite")));
        }
        if !self.visibility.is_finite() {
            return Err(invalid(format!("visibility {} must be finite", self.visibility)));
        }
        if let Some(precision) = self.precision.filter(|p| *p > MAX_PRECISION) {
            return Err(invalid(format!("precision {precision} is above {MAX_PRECISION}")));
        }
        Ok(())
    }

    pub fn normalize(&self, position: [f64; 3]) -> [f64; 3] {
        std::array::from_fn(|axis| {
            let value = position[axis] / self.scale[axis] + self.offset[axis];
            match self.precision {
                Some(decimals) => {
                    let factor = 10f64.powi(decimals as i32);
                    (value * factor).round() / factor
                }
                None => value,
            }
        })
    }
}
