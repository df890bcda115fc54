use assert2::assert;

use super::{FloatType, WorldBox};

/// Normalized time interval, subset of [0, 1].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeRange {
    pub lower: FloatType,
    pub upper: FloatType,
}

impl TimeRange {
    pub const FULL: TimeRange = TimeRange {
        lower: 0.0,
        upper: 1.0,
    };

    pub fn new(lower: FloatType, upper: FloatType) -> TimeRange {
        assert!(0.0 <= lower && lower <= upper && upper <= 1.0);
        TimeRange { lower, upper }
    }

    pub fn size(&self) -> FloatType {
        self.upper - self.lower
    }
}

/// Bounds that move linearly from `bounds0` at the start of a time range to
/// `bounds1` at its end.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearBounds {
    pub bounds0: WorldBox,
    pub bounds1: WorldBox,
}

impl LinearBounds {
    pub fn new(bounds0: WorldBox, bounds1: WorldBox) -> LinearBounds {
        LinearBounds { bounds0, bounds1 }
    }

    pub fn constant(bounds: WorldBox) -> LinearBounds {
        LinearBounds {
            bounds0: bounds.clone(),
            bounds1: bounds,
        }
    }

    pub fn interpolate(&self, t: FloatType) -> WorldBox {
        self.bounds0.lerp(&self.bounds1, t)
    }

    /// Box enclosing the motion over the whole time range
    pub fn global_bounds(&self) -> WorldBox {
        self.bounds0.union(&self.bounds1)
    }

    /// Linear bounds over `time_range` of geometry given by key frames at uniformly spaced
    /// times `i / segment_count`, `i` in `0..=segment_count`.
    ///
    /// The ends are interpolated from the neighbouring key frames, then moved outwards
    /// until the interpolated box encloses every key frame strictly inside the range.
    pub fn from_time_segments(
        time_range: TimeRange,
        segment_count: usize,
        bounds_at: impl Fn(usize) -> WorldBox,
    ) -> LinearBounds {
        if segment_count == 0 {
            return LinearBounds::constant(bounds_at(0));
        }

        let segments = segment_count as FloatType;
        let lower = time_range.lower * segments;
        let upper = time_range.upper * segments;
        let lower_floor = lower.floor();
        let upper_ceil = upper.ceil();

        let ilower = (lower_floor as usize).min(segment_count - 1);
        let iupper = (upper_ceil as usize).clamp(ilower + 1, segment_count);
        let lower_fraction = lower - ilower as FloatType;
        let upper_fraction = iupper as FloatType - upper;

        let lower_bounds = bounds_at(ilower);
        let upper_bounds = bounds_at(iupper);

        if iupper - ilower == 1 {
            return LinearBounds {
                bounds0: lower_bounds.lerp(&upper_bounds, lower_fraction),
                bounds1: upper_bounds.lerp(&lower_bounds, upper_fraction),
            };
        }

        let mut bounds0 = lower_bounds.lerp(&bounds_at(ilower + 1), lower_fraction);
        let mut bounds1 = upper_bounds.lerp(&bounds_at(iupper - 1), upper_fraction);

        for i in (ilower + 1)..iupper {
            let f = (i as FloatType / segments - time_range.lower) / time_range.size();
            let interpolated = bounds0.lerp(&bounds1, f);
            let key = bounds_at(i);

            let lower_delta = (key.min - interpolated.min).inf(&nalgebra::zero());
            let upper_delta = (key.max - interpolated.max).sup(&nalgebra::zero());

            bounds0.min += lower_delta;
            bounds1.min += lower_delta;
            bounds0.max += upper_delta;
            bounds1.max += upper_delta;
        }

        LinearBounds { bounds0, bounds1 }
    }
}
