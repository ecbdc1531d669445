// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::math::Vec2;

/// 3D vector used for lattice points, probe positions, and displacements.
///
/// * `x`/`y` span the lattice plane; `z` is depth and is carried through
///   constraint resolution untouched.
/// * Arithmetic uses `f32` so results round identically on every target.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    data: [f32; 3],
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit vector pointing along the positive X axis.
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit vector pointing along the positive Y axis.
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Creates a vector from components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { data: [x, y, z] }
    }

    /// Returns the components as an array.
    pub fn to_array(self) -> [f32; 3] {
        self.data
    }

    /// X component.
    pub fn x(&self) -> f32 {
        self.data[0]
    }

    /// Y component.
    pub fn y(&self) -> f32 {
        self.data[1]
    }

    /// Z (depth) component.
    pub fn z(&self) -> f32 {
        self.data[2]
    }

    /// Returns a copy with `x` replaced.
    pub fn with_x(self, x: f32) -> Self {
        Self::new(x, self.data[1], self.data[2])
    }

    /// Returns a copy with `y` replaced.
    pub fn with_y(self, y: f32) -> Self {
        Self::new(self.data[0], y, self.data[2])
    }

    /// Adds two vectors.
    pub fn add(&self, other: &Self) -> Self {
        Self::new(
            self.data[0] + other.data[0],
            self.data[1] + other.data[1],
            self.data[2] + other.data[2],
        )
    }

    /// Subtracts another vector.
    pub fn sub(&self, other: &Self) -> Self {
        Self::new(
            self.data[0] - other.data[0],
            self.data[1] - other.data[1],
            self.data[2] - other.data[2],
        )
    }

    /// Dot product with another vector.
    pub fn dot(&self, other: &Self) -> f32 {
        self.data[0] * other.data[0] + self.data[1] * other.data[1] + self.data[2] * other.data[2]
    }

    /// Vector length (Euclidean norm).
    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Drops the depth axis.
    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.data[0], self.data[1])
    }

    /// Distance to `other` measured in the lattice plane only.
    pub fn planar_distance(&self, other: &Self) -> f32 {
        self.xy().sub(&other.xy()).length()
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(value: [f32; 3]) -> Self {
        Self { data: value }
    }
}
