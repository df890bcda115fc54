mod aabb;
mod linear_bounds;
mod quad;

pub use aabb::AABB;
pub use linear_bounds::{LinearBounds, TimeRange};
pub use quad::Quad;

use simba::simd::WideF32x4;

pub type FloatType = f32;
pub type SimdFloatType = WideF32x4;

pub type WorldPoint = nalgebra::Point3<FloatType>;
pub type WorldVector = nalgebra::Vector3<FloatType>;
pub type WorldBox = AABB<WorldPoint>;

/// Four points packed lane-wise, one coordinate vector per axis.
pub type WorldPoint4 = nalgebra::Point3<SimdFloatType>;
pub type WorldBox4 = AABB<WorldPoint4>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}
