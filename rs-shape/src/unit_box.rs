use bevy_math::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShapeError};

/// Texels per block edge. Box coordinates are stored in texels so rotation
/// and mirroring never accumulate rounding error.
pub const TEXELS: u8 = 16;

/// An axis-aligned box inside the unit cube, stored in sixteenths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TexelBounds", into = "TexelBounds")]
pub struct UnitBox {
    min: [u8; 3],
    max: [u8; 3],
}

/// Raw `from`/`to` pair as written in template files.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TexelBounds {
    pub from: [u8; 3],
    pub to: [u8; 3],
}

impl TryFrom<TexelBounds> for UnitBox {
    type Error = ShapeError;

    fn try_from(bounds: TexelBounds) -> Result<Self> {
        UnitBox::from_texels(bounds.from, bounds.to)
    }
}

impl From<UnitBox> for TexelBounds {
    fn from(shape: UnitBox) -> Self {
        Self {
            from: shape.min,
            to: shape.max,
        }
    }
}

impl UnitBox {
    pub const FULL: Self = Self {
        min: [0, 0, 0],
        max: [TEXELS, TEXELS, TEXELS],
    };

    /// For literal constants only; runtime input goes through
    /// [`UnitBox::from_texels`].
    pub(crate) const fn texels(min: [u8; 3], max: [u8; 3]) -> Self {
        Self { min, max }
    }

    pub fn from_texels(min: [u8; 3], max: [u8; 3]) -> Result<Self> {
        for axis in 0..3 {
            if max[axis] > TEXELS || min[axis] > max[axis] {
                return Err(ShapeError::Configuration(format!(
                    "box {min:?}..{max:?} is not inside the unit cube"
                )));
            }
        }
        Ok(Self { min, max })
    }

    /// Builds a box from block-relative fractions. Every coordinate must be a
    /// whole number of sixteenths in `[0, 1]`.
    pub fn from_fractions(min: [f32; 3], max: [f32; 3]) -> Result<Self> {
        Self::from_texels(to_texels(min)?, to_texels(max)?)
    }

    pub fn min_texels(&self) -> [u8; 3] {
        self.min
    }

    pub fn max_texels(&self) -> [u8; 3] {
        self.max
    }

    pub fn min(&self) -> Vec3 {
        texels_to_vec(self.min)
    }

    pub fn max(&self) -> Vec3 {
        texels_to_vec(self.max)
    }

    /// `[minX, minY, minZ, maxX, maxY, maxZ]` as fractions of a block.
    pub fn to_array(&self) -> [f32; 6] {
        let (min, max) = (self.min(), self.max());
        [min.x, min.y, min.z, max.x, max.y, max.z]
    }

    /// Rotates by `turns` quarter turns about the vertical axis through the
    /// block centre. One quarter turn maps `(x, z)` to `(1 - z, x)`.
    pub fn rotated(self, turns: i32) -> Self {
        let mut out = self;
        for _ in 0..turns.rem_euclid(4) {
            out = out.quarter_turn();
        }
        out
    }

    pub fn rotated_by(self, rotation: Rotation) -> Self {
        self.rotated(rotation.step() as i32)
    }

    fn quarter_turn(self) -> Self {
        let [min_x, min_y, min_z] = self.min;
        let [max_x, max_y, max_z] = self.max;
        Self {
            min: [TEXELS - max_z, min_y, min_x],
            max: [TEXELS - min_z, max_y, max_x],
        }
    }

    /// Reflects through the horizontal plane `y = 0.5`.
    pub fn mirrored_y(self) -> Self {
        Self {
            min: [self.min[0], TEXELS - self.max[1], self.min[2]],
            max: [self.max[0], TEXELS - self.min[1], self.max[2]],
        }
    }
}

/// A validated rotation step in `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rotation(u8);

impl Rotation {
    pub fn new(step: u8) -> Result<Self> {
        if step > 3 {
            return Err(ShapeError::Configuration(format!(
                "rotation step {step} is outside 0..=3"
            )));
        }
        Ok(Self(step))
    }

    pub fn step(self) -> u8 {
        self.0
    }
}

/// Rotates a horizontal direction by the same quarter turn as
/// [`UnitBox::rotated`], so offsets stay attached to the geometry they guard.
pub fn rotate_offset(offset: IVec3, turns: i32) -> IVec3 {
    let mut out = offset;
    for _ in 0..turns.rem_euclid(4) {
        out = IVec3::new(-out.z, out.y, out.x);
    }
    out
}

fn to_texels(v: [f32; 3]) -> Result<[u8; 3]> {
    let mut out = [0u8; 3];
    for (slot, value) in out.iter_mut().zip(v) {
        let scaled = value * TEXELS as f32;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-4 || !(0.0..=TEXELS as f32).contains(&rounded) {
            return Err(ShapeError::Configuration(format!(
                "coordinate {value} is not a sixteenth inside [0, 1]"
            )));
        }
        *slot = rounded as u8;
    }
    Ok(out)
}

fn texels_to_vec(v: [u8; 3]) -> Vec3 {
    Vec3::new(v[0] as f32, v[1] as f32, v[2] as f32) / TEXELS as f32
}
