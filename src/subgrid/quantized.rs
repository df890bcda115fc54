//! N subgrids sharing one geometry, with bounds quantized to 8 bits per plane.
//!
//! Each axis stores an origin (`start`) and a step (`scale`); a quantized value `q`
//! stands for `q * scale + start`. Lower bounds are rounded down and upper bounds up,
//! so the decoded box always contains the exact one.

use arrayvec::ArrayVec;
use bytemuck::{Pod, Zeroable};
use itertools::izip;
use simba::simd::WideF32x4;
use wide::f32x4;

use super::{CellCoord, Subgrid};
use crate::{
    geometry::{
        Axis, FloatType, WorldBox, WorldBox4, WorldPoint, WorldPoint4, WorldVector,
    },
    scene::GridMesh,
    util::bit_iter,
};

pub const MIN_QUANTIZED: u8 = 0;
pub const MAX_QUANTIZED: u8 = 255;

/// Decodes a quantized value.
/// Every check during quantization goes through here, so that it matches the decoding exactly.
#[inline(always)]
fn reconstruct(q: u8, start: FloatType, scale: FloatType) -> FloatType {
    FloatType::from(q) * scale + start
}

/// Bounds of N lanes along a single axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuantizedAxis<const N: usize> {
    pub start: FloatType,
    pub scale: FloatType,
    pub lower: [u8; N],
    pub upper: [u8; N],
}

impl<const N: usize> QuantizedAxis<N> {
    /// All lanes empty
    pub fn empty() -> Self {
        QuantizedAxis {
            start: 0.0,
            scale: 0.0,
            lower: [MAX_QUANTIZED; N],
            upper: [MIN_QUANTIZED; N],
        }
    }

    /// Quantizes intervals `[lower[i], upper[i]]` of the lanes where `valid[i]` is set.
    /// Other lanes get the empty interval (lower 255, upper 0) whatever their values.
    pub fn quantize(lower: &[FloatType; N], upper: &[FloatType; N], valid: &[bool; N]) -> Self {
        let Some((min, max)) = izip!(lower, upper, valid)
            .filter(|(_, _, valid)| **valid)
            .map(|(l, u, _)| (*l, *u))
            .reduce(|(min, max), (l, u)| (min.min(l), max.max(u)))
        else {
            return Self::empty();
        };

        let mut quantized = QuantizedAxis {
            start: min,
            scale: covering_scale(min, max),
            ..Self::empty()
        };

        for (i, (&l, &u, &v)) in izip!(lower, upper, valid).enumerate() {
            if v {
                assert2::debug_assert!(l <= u, "lane {i}: [{l}, {u}]");
                (quantized.lower[i], quantized.upper[i]) = quantized.quantize_lane(l, u);
            }
        }

        assert2::debug_assert!(
            quantized.contains(lower, upper, valid),
            "{quantized:?}, lower: {lower:?}, upper: {upper:?}"
        );

        quantized
    }

    fn quantize_lane(&self, lower: FloatType, upper: FloatType) -> (u8, u8) {
        if self.scale == 0.0 {
            // All valid lanes are the single point `start`
            return (MIN_QUANTIZED, MIN_QUANTIZED);
        }

        // Float to int `as` saturates into 0..=255
        let mut q_lower = ((lower - self.start) / self.scale).floor() as u8;
        let mut q_upper = ((upper - self.start) / self.scale).ceil() as u8;

        // Rounding in the division can land on the wrong side of the bound.
        // Both loops terminate at the latest at the ends of the range, which are exact.
        while q_lower > MIN_QUANTIZED && reconstruct(q_lower, self.start, self.scale) > lower {
            q_lower -= 1;
        }
        while q_upper < MAX_QUANTIZED && reconstruct(q_upper, self.start, self.scale) < upper {
            q_upper += 1;
        }

        (q_lower, q_upper)
    }

    /// Checks that every valid lane decodes to a superset of its interval.
    pub fn contains(&self, lower: &[FloatType; N], upper: &[FloatType; N], valid: &[bool; N]) -> bool {
        let decoded_lower = self.dequantize_lower();
        let decoded_upper = self.dequantize_upper();
        izip!(lower, upper, valid, decoded_lower, decoded_upper)
            .all(|(l, u, v, dl, du)| !v || (dl <= *l && du >= *u))
    }

    pub fn dequantize_lower(&self) -> [FloatType; N] {
        self.lower.map(|q| reconstruct(q, self.start, self.scale))
    }

    pub fn dequantize_upper(&self) -> [FloatType; N] {
        self.upper.map(|q| reconstruct(q, self.start, self.scale))
    }
}

/// Smallest step such that `start + 255 * step` doesn't fall below `max`.
fn covering_scale(min: FloatType, max: FloatType) -> FloatType {
    let steps = FloatType::from(MAX_QUANTIZED);
    let diff = max - min;
    let mut scale = if diff.is_finite() {
        diff / steps
    } else {
        // Span beyond f32::MAX, min and max have opposite signs so nothing cancels
        max / steps - min / steps
    };

    let mut iterations = 0usize;
    while reconstruct(MAX_QUANTIZED, min, scale) < max {
        scale = scale.next_up();
        iterations += 1;
    }
    if iterations > 0 {
        log::trace!("scale for [{min}, {max}] needed {iterations} extra steps");
    }

    scale
}

/// Position of a subgrid inside its geometry, without the geometry id.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct SubgridId {
    pub x: CellCoord,
    pub y: CellCoord,
    pub primitive_id: u32,
}

impl SubgridId {
    pub fn with_geometry(self, geometry_id: u32) -> Subgrid {
        Subgrid::new(self.x, self.y, geometry_id, self.primitive_id)
    }
}

impl From<Subgrid> for SubgridId {
    fn from(value: Subgrid) -> Self {
        SubgridId {
            x: value.x(),
            y: value.y(),
            primitive_id: value.primitive_id(),
        }
    }
}

const LOWER_X: usize = 0;
const UPPER_X: usize = 1;

/// Up to N subgrids of one grid mesh with their quantized bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct QuantizedSubgrids<const N: usize> {
    pub(super) subgrids: [SubgridId; N],
    pub(super) geometry_id: u32,
    pub(super) start: WorldPoint,
    pub(super) scale: WorldVector,
    /// Planes in order lower x, upper x, lower y, upper y, lower z, upper z;
    /// byte offset of plane `p` in `all_planes()` is `p * N`.
    pub(super) planes: [[u8; N]; 6],
}

pub type QuantizedSubgrids4 = QuantizedSubgrids<4>;

impl<const N: usize> QuantizedSubgrids<N> {
    fn lower_plane(axis: Axis) -> usize {
        2 * axis.index()
    }

    fn upper_plane(axis: Axis) -> usize {
        2 * axis.index() + 1
    }

    /// Quantizes bounds of lanes marked valid; the rest become empty lanes with a zero id.
    pub fn build(
        geometry_id: u32,
        subgrids: [SubgridId; N],
        bounds: &[WorldBox; N],
        valid: &[bool; N],
    ) -> Self {
        let mut start = WorldPoint::origin();
        let mut scale = WorldVector::zeros();
        let mut planes = [[MIN_QUANTIZED; N]; 6];

        for axis in Axis::ALL {
            let a = axis.index();
            let lower = bounds.each_ref().map(|b| b.min[a]);
            let upper = bounds.each_ref().map(|b| b.max[a]);
            let quantized = QuantizedAxis::quantize(&lower, &upper, valid);

            start[a] = quantized.start;
            scale[a] = quantized.scale;
            planes[Self::lower_plane(axis)] = quantized.lower;
            planes[Self::upper_plane(axis)] = quantized.upper;
        }

        let subgrids = std::array::from_fn(|i| {
            if valid[i] {
                subgrids[i]
            } else {
                SubgridId::default()
            }
        });

        QuantizedSubgrids {
            subgrids,
            geometry_id,
            start,
            scale,
            planes,
        }
    }

    /// Fills the first `cells.len()` lanes, remaining lanes are empty.
    /// Panics if there are more than N cells or they don't all belong to `geometry_id`.
    pub fn from_subgrids(geometry_id: u32, cells: &[(Subgrid, WorldBox)]) -> Self {
        assert2::assert!(
            cells.len() <= N,
            "{} subgrids don't fit into {N} lanes",
            cells.len()
        );
        assert2::assert!(
            cells.iter().all(|(s, _)| s.geometry_id() == geometry_id),
            "all subgrids must belong to geometry {geometry_id}"
        );

        let valid = std::array::from_fn(|i| i < cells.len());
        let subgrids = std::array::from_fn(|i| {
            cells
                .get(i)
                .map_or_else(SubgridId::default, |(s, _)| SubgridId::from(*s))
        });
        let bounds = std::array::from_fn(|i| {
            cells
                .get(i)
                .map_or_else(WorldBox::empty, |(_, b)| b.clone())
        });

        Self::build(geometry_id, subgrids, &bounds, &valid)
    }

    /// Computes exact bounds of the subgrids at `time_step` and quantizes them.
    pub fn from_mesh(
        mesh: &GridMesh,
        geometry_id: u32,
        subgrids: &ArrayVec<Subgrid, N>,
        time_step: usize,
    ) -> Self {
        let cells: ArrayVec<(Subgrid, WorldBox), N> = subgrids
            .iter()
            .map(|s| (*s, s.bounds(mesh, time_step)))
            .collect();
        Self::from_subgrids(geometry_id, &cells)
    }

    pub fn geometry_id(&self) -> u32 {
        self.geometry_id
    }

    /// Subgrid in lane `i`, panics if `i >= N`.
    pub fn subgrid(&self, i: usize) -> Subgrid {
        assert2::assert!(i < N, "lane {i} out of {N}");
        self.subgrids[i].with_geometry(self.geometry_id)
    }

    pub fn primitive_id(&self, i: usize) -> u32 {
        assert2::assert!(i < N, "lane {i} out of {N}");
        self.subgrids[i].primitive_id
    }

    pub fn start(&self) -> &WorldPoint {
        &self.start
    }

    pub fn scale(&self) -> &WorldVector {
        &self.scale
    }

    pub fn quantized_lower(&self, axis: Axis) -> &[u8; N] {
        &self.planes[Self::lower_plane(axis)]
    }

    pub fn quantized_upper(&self, axis: Axis) -> &[u8; N] {
        &self.planes[Self::upper_plane(axis)]
    }

    /// All six planes as one block of 6N bytes.
    pub fn all_planes(&self) -> &[u8] {
        self.planes.as_flattened()
    }

    pub fn axis(&self, axis: Axis) -> QuantizedAxis<N> {
        QuantizedAxis {
            start: self.start[axis.index()],
            scale: self.scale[axis.index()],
            lower: *self.quantized_lower(axis),
            upper: *self.quantized_upper(axis),
        }
    }

    pub fn dequantize_lower(&self, axis: Axis) -> [FloatType; N] {
        self.axis(axis).dequantize_lower()
    }

    pub fn dequantize_upper(&self, axis: Axis) -> [FloatType; N] {
        self.axis(axis).dequantize_upper()
    }

    /// Decoded bounds of a single lane
    pub fn dequantize_lane(&self, i: usize) -> WorldBox {
        assert2::assert!(i < N, "lane {i} out of {N}");
        let decode = |plane: usize, a: usize| {
            reconstruct(self.planes[plane][i], self.start[a], self.scale[a])
        };
        WorldBox::new(
            WorldPoint::new(decode(0, 0), decode(2, 1), decode(4, 2)),
            WorldPoint::new(decode(1, 0), decode(3, 1), decode(5, 2)),
        )
    }

    /// Valid lanes never decode to lower > upper, invalid lanes always store 255 / 0.
    pub fn is_lane_valid(&self, i: usize) -> bool {
        self.planes[LOWER_X][i] <= self.planes[UPPER_X][i]
    }

    /// Bit `i` set for each valid lane `i`
    pub fn valid_mask(&self) -> u64 {
        const { std::assert!(N <= u64::BITS as usize) };
        (0..N)
            .filter(|&i| self.is_lane_valid(i))
            .fold(0, |mask, i| mask | (1u64 << i))
    }

    pub fn valid_lanes(&self) -> impl Iterator<Item = usize> + use<N> {
        bit_iter(self.valid_mask())
    }

    pub fn len(&self) -> usize {
        self.valid_mask().count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.valid_mask() == 0
    }
}

impl QuantizedSubgrids<4> {
    /// Decodes all lanes and planes in one pass.
    /// Gives exactly the values of `dequantize_lower` and `dequantize_upper`.
    pub fn dequantize_box4(&self) -> WorldBox4 {
        let decode = |plane: usize, a: usize| {
            let q = f32x4::from(self.planes[plane].map(FloatType::from));
            WideF32x4(q * f32x4::splat(self.scale[a]) + f32x4::splat(self.start[a]))
        };
        WorldBox4::new(
            WorldPoint4::new(decode(0, 0), decode(2, 1), decode(4, 2)),
            WorldPoint4::new(decode(1, 0), decode(3, 1), decode(5, 2)),
        )
    }
}

impl<const N: usize> std::fmt::Display for QuantizedSubgrids<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "QuantizedSubgrids<{N}> ")?;
        for i in self.valid_lanes() {
            let id = &self.subgrids[i];
            write!(
                f,
                "( x = {}, y = {}, primitive_id = {} ), ",
                id.x.magnitude(),
                id.y.magnitude(),
                id.primitive_id
            )?;
        }
        write!(f, "geometry_id {}", self.geometry_id)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        geometry::test::{simple_float, world_box},
        scene::grid_mesh::test::planar_grid_mesh,
    };

    use assert2::assert;
    use proptest::prelude::*;
    use simba::simd::SimdValue as _;
    use test_strategy::proptest;

    fn interval_lanes<const N: usize>(
        intervals: [(FloatType, FloatType); N],
    ) -> ([FloatType; N], [FloatType; N]) {
        (intervals.map(|i| i.0), intervals.map(|i| i.1))
    }

    #[test]
    fn four_lane_example() {
        let (lower, upper) =
            interval_lanes([(0.0, 1.0), (2.0, 3.0), (5.0, 9.0), (-100.0, f32::NAN)]);
        let valid = [true, true, true, false];
        let q = QuantizedAxis::quantize(&lower, &upper, &valid);

        assert!(q.start == 0.0);
        assert!(reconstruct(MAX_QUANTIZED, q.start, q.scale) >= 9.0);
        assert!(q.lower[3] == MAX_QUANTIZED);
        assert!(q.upper[3] == MIN_QUANTIZED);
        assert!(q.upper[2] == MAX_QUANTIZED);

        let decoded_lower = q.dequantize_lower();
        let decoded_upper = q.dequantize_upper();
        for i in 0..3 {
            assert!(decoded_lower[i] <= lower[i]);
            assert!(decoded_upper[i] >= upper[i]);
        }
        assert!(decoded_lower[3] > decoded_upper[3]);
    }

    #[test]
    fn identical_bounds_give_zero_scale() {
        let (lower, upper) = interval_lanes([(3.5, 3.5); 4]);
        let q = QuantizedAxis::quantize(&lower, &upper, &[true; 4]);

        assert!(q.scale == 0.0);
        assert!(q.start == 3.5);
        assert!(q.dequantize_lower() == [3.5; 4]);
        assert!(q.dequantize_upper() == [3.5; 4]);
    }

    #[test]
    fn zero_scale_keeps_invalid_lanes_marked() {
        let (lower, upper) = interval_lanes([(1.0, 1.0), (1.0, 1.0), (7.0, 8.0)]);
        let q = QuantizedAxis::quantize(&lower, &upper, &[true, true, false]);

        assert!(q.scale == 0.0);
        assert!(q.lower == [0, 0, MAX_QUANTIZED]);
        assert!(q.upper == [0, 0, MIN_QUANTIZED]);
    }

    #[test]
    fn no_valid_lanes() {
        let (lower, upper) = interval_lanes([(0.0, 1.0); 8]);
        let q = QuantizedAxis::quantize(&lower, &upper, &[false; 8]);
        assert!(q == QuantizedAxis::empty());
        assert!(q.dequantize_lower().iter().all(|x| x.is_finite()));
    }

    #[test]
    fn span_wider_than_float_range() {
        let lower = [-3.0e38, 1.0e38, 0.0, 0.0];
        let upper = [-2.0e38, 3.0e38, 0.0, 0.0];
        let valid = [true, true, false, false];
        let q = QuantizedAxis::quantize(&lower, &upper, &valid);

        assert!(q.scale.is_finite());
        assert!(q.contains(&lower, &upper, &valid));
        assert!(q.dequantize_lower().iter().all(|x| !x.is_nan()));
        assert!(q.dequantize_upper().iter().all(|x| !x.is_nan()));
    }

    #[test]
    fn narrow_intervals_far_from_origin() {
        let base = 1.0e6f32;
        let ulp = base.next_up() - base;
        let (lower, upper) = interval_lanes([
            (base, base + ulp),
            (base + 2.0 * ulp, base + 3.0 * ulp),
            (base + 3.0 * ulp, base + 3.0 * ulp),
            (base + ulp, base + 4.0 * ulp),
        ]);
        let valid = [true; 4];
        let q = QuantizedAxis::quantize(&lower, &upper, &valid);
        assert!(q.contains(&lower, &upper, &valid));
    }

    fn interval() -> impl Strategy<Value = (FloatType, FloatType)> {
        (simple_float(), simple_float()).prop_map(|(a, b)| (a.min(b), a.max(b)))
    }

    /// Narrow intervals with a large common offset
    fn offset_interval() -> impl Strategy<Value = (FloatType, FloatType)> {
        (-1.0e7f32..1.0e7f32, 0.0f32..1.0e-2, 0.0f32..1.0)
            .prop_map(|(offset, a, b)| (offset + a, offset + a + b))
    }

    /// Any finite float, including huge and subnormal values
    fn finite_interval() -> impl Strategy<Value = (FloatType, FloatType)> {
        let finite = || any::<FloatType>().prop_filter("finite", |x| x.is_finite());
        (finite(), finite()).prop_map(|(a, b)| (a.min(b), a.max(b)))
    }

    fn check_axis<const N: usize>(intervals: [(FloatType, FloatType); N], valid: [bool; N]) {
        let (lower, upper) = interval_lanes(intervals);
        let q = QuantizedAxis::quantize(&lower, &upper, &valid);
        let decoded_lower = q.dequantize_lower();
        let decoded_upper = q.dequantize_upper();

        for i in 0..N {
            if valid[i] {
                assert!(decoded_lower[i] <= lower[i]);
                assert!(decoded_upper[i] >= upper[i]);
            } else {
                assert!(q.lower[i] == MAX_QUANTIZED);
                assert!(q.upper[i] == MIN_QUANTIZED);
                if q.scale > 0.0 {
                    assert!(decoded_lower[i] > decoded_upper[i]);
                }
            }
        }

        assert!(q.dequantize_lower() == decoded_lower);
        assert!(q.dequantize_upper() == decoded_upper);
    }

    #[proptest]
    fn quantization_is_sound(
        #[strategy(proptest::array::uniform8(interval()))] intervals: [(FloatType, FloatType); 8],
        valid: [bool; 8],
    ) {
        check_axis(intervals, valid);
    }

    #[proptest]
    fn quantization_is_sound_far_from_origin(
        #[strategy(proptest::array::uniform4(offset_interval()))]
        intervals: [(FloatType, FloatType); 4],
        valid: [bool; 4],
    ) {
        check_axis(intervals, valid);
    }

    #[proptest]
    fn quantization_is_sound_over_whole_float_range(
        #[strategy(proptest::array::uniform4(finite_interval()))]
        intervals: [(FloatType, FloatType); 4],
        valid: [bool; 4],
    ) {
        check_axis(intervals, valid);
    }

    fn ids<const N: usize>() -> [SubgridId; N] {
        std::array::from_fn(|i| SubgridId {
            x: CellCoord::new(2 * i as u16, false),
            y: CellCoord::new(i as u16, i % 2 == 0),
            primitive_id: 10 + i as u32,
        })
    }

    #[proptest]
    fn container_bounds_are_sound(
        #[strategy(proptest::array::uniform4(world_box()))] bounds: [WorldBox; 4],
        valid: [bool; 4],
    ) {
        let q = QuantizedSubgrids::build(5, ids(), &bounds, &valid);

        for i in 0..4 {
            assert!(q.is_lane_valid(i) == valid[i]);
            if valid[i] {
                assert!(q.dequantize_lane(i).contains(&bounds[i]));
                assert!(q.subgrid(i) == ids::<4>()[i].with_geometry(5));
            } else {
                assert!(q.subgrid(i) == SubgridId::default().with_geometry(5));
            }
        }
    }

    #[proptest]
    fn simd_decoding_matches_scalar(
        #[strategy(proptest::array::uniform4(world_box()))] bounds: [WorldBox; 4],
        valid: [bool; 4],
    ) {
        let q = QuantizedSubgrids4::build(0, ids(), &bounds, &valid);
        let packed = q.dequantize_box4();

        for axis in Axis::ALL {
            let a = axis.index();
            let lower = q.dequantize_lower(axis);
            let upper = q.dequantize_upper(axis);
            for i in 0..4 {
                assert!(packed.min[a].extract(i) == lower[i]);
                assert!(packed.max[a].extract(i) == upper[i]);
            }
        }
        for i in 0..4 {
            assert!(packed.extract(i) == q.dequantize_lane(i));
        }
    }

    fn unit_box(offset: f32) -> WorldBox {
        WorldBox::new(
            WorldPoint::from([offset; 3]),
            WorldPoint::from([offset + 1.0; 3]),
        )
    }

    fn subgrid(x: u16, primitive_id: u32) -> Subgrid {
        Subgrid::new(CellCoord::new(x, false), CellCoord::new(0, false), 1, primitive_id)
    }

    #[test]
    fn from_subgrids_pads_lanes() {
        let cells = [(subgrid(0, 0), unit_box(0.0)), (subgrid(2, 0), unit_box(4.0))];
        let q = QuantizedSubgrids4::from_subgrids(1, &cells);

        assert!(q.len() == 2);
        assert!(!q.is_empty());
        assert!(q.valid_mask() == 0b0011);
        assert!(q.valid_lanes().collect::<Vec<_>>() == vec![0, 1]);
        assert!(q.subgrid(1) == cells[1].0);
        assert!(q.primitive_id(3) == 0);
        assert!(q.start() == &WorldPoint::from([0.0; 3]));
        for axis in Axis::ALL {
            assert!(q.quantized_lower(axis)[2..] == [MAX_QUANTIZED; 2]);
            assert!(q.quantized_upper(axis)[2..] == [MIN_QUANTIZED; 2]);
        }
    }

    #[test]
    fn empty_container() {
        let q = QuantizedSubgrids::<8>::from_subgrids(3, &[]);
        assert!(q.is_empty());
        assert!(q.len() == 0);
        assert!(q.geometry_id() == 3);
        assert!(q.scale() == &WorldVector::zeros());
    }

    #[test]
    fn plane_offsets() {
        let cells = [(subgrid(0, 0), unit_box(0.0)), (subgrid(2, 0), unit_box(4.0))];
        let q = QuantizedSubgrids4::from_subgrids(1, &cells);
        let planes = q.all_planes();

        assert!(planes.len() == 24);
        for axis in Axis::ALL {
            let a = axis.index();
            assert!(planes[8 * a..8 * a + 4] == q.quantized_lower(axis)[..]);
            assert!(planes[8 * a + 4..8 * a + 8] == q.quantized_upper(axis)[..]);
        }
    }

    #[test]
    #[should_panic]
    fn too_many_subgrids() {
        let cells: [_; 3] = std::array::from_fn(|i| (subgrid(2 * i as u16, 0), unit_box(0.0)));
        QuantizedSubgrids::<2>::from_subgrids(1, &cells);
    }

    #[test]
    #[should_panic]
    fn mixed_geometries() {
        let other = Subgrid::new(CellCoord::new(0, false), CellCoord::new(0, false), 2, 0);
        let cells = [(subgrid(0, 0), unit_box(0.0)), (other, unit_box(0.0))];
        QuantizedSubgrids4::from_subgrids(1, &cells);
    }

    #[test]
    #[should_panic]
    fn lane_out_of_range() {
        QuantizedSubgrids4::from_subgrids(1, &[]).subgrid(4);
    }

    #[test]
    fn from_mesh_encloses_exact_bounds() {
        let mesh = planar_grid_mesh(7, 5, 8);
        let subgrids: ArrayVec<Subgrid, 4> = mesh.subgrids(0).take(4).collect();
        let q = QuantizedSubgrids::from_mesh(&mesh, 0, &subgrids, 0);

        assert!(q.len() == 4);
        for (i, s) in subgrids.iter().enumerate() {
            assert!(q.subgrid(i) == *s);
            assert!(q.dequantize_lane(i).contains(&s.bounds(&mesh, 0)));
        }
    }

    #[test]
    fn display_lists_valid_lanes() {
        let q = QuantizedSubgrids4::from_subgrids(1, &[(subgrid(2, 7), unit_box(0.0))]);
        assert!(
            q.to_string()
                == "QuantizedSubgrids<4> ( x = 2, y = 0, primitive_id = 7 ), geometry_id 1"
        );
    }
}
