use nalgebra::{DefaultAllocator, DimName, OPoint, Scalar, allocator::Allocator};
use simba::simd::{SimdPartialOrd, SimdValue};

use super::{FloatType, WorldBox, WorldPoint};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AABB<Point> {
    pub min: Point,
    pub max: Point,
}

impl<Point> AABB<Point> {
    pub fn new(min: Point, max: Point) -> AABB<Point> {
        AABB { min, max }
    }

    pub fn map<Point2, F: FnMut(&Point) -> Point2>(&self, mut f: F) -> AABB<Point2> {
        AABB {
            min: f(&self.min),
            max: f(&self.max),
        }
    }

    pub fn zip_map<Point2, Point3, F: FnMut(&Point, &Point2) -> Point3>(
        &self,
        rhs: &AABB<Point2>,
        mut f: F,
    ) -> AABB<Point3> {
        AABB {
            min: f(&self.min, &rhs.min),
            max: f(&self.max, &rhs.max),
        }
    }

    pub fn zip_apply<Point2, F: FnMut(&mut Point, &Point2)>(
        &mut self,
        rhs: &AABB<Point2>,
        mut f: F,
    ) {
        f(&mut self.min, &rhs.min);
        f(&mut self.max, &rhs.max);
    }
}

impl<T: Scalar, D: DimName> AABB<OPoint<T, D>>
where
    DefaultAllocator: Allocator<D>,
{
    pub fn map_coords<T2: Scalar, F: FnMut(T) -> T2>(&self, mut f: F) -> AABB<OPoint<T2, D>> {
        self.map(|x| x.map(&mut f))
    }

    pub fn zip_map_coords<T2: Scalar, T3: Scalar, F: FnMut(T, T2) -> T3>(
        &self,
        rhs: &AABB<OPoint<T2, D>>,
        mut f: F,
    ) -> AABB<OPoint<T3, D>> {
        self.zip_map(rhs, |x, y| OPoint {
            coords: x.coords.zip_map(&y.coords, &mut f),
        })
    }

    pub fn zip_apply_coords<T2: Scalar, F: FnMut(&mut T, T2)>(
        &mut self,
        rhs: &AABB<OPoint<T2, D>>,
        mut f: F,
    ) {
        self.zip_apply(rhs, |x, y| x.coords.zip_apply(&y.coords, &mut f))
    }
}

impl<T: Scalar + SimdPartialOrd, D: DimName> AABB<OPoint<T, D>>
where
    DefaultAllocator: Allocator<D>,
{
    pub fn extend_point(self, p: &OPoint<T, D>) -> Self {
        AABB {
            min: self.min.inf(p),
            max: self.max.sup(p),
        }
    }

    pub fn union(&self, other: &Self) -> Self {
        AABB {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }
}

impl WorldBox {
    /// Box with min at +inf and max at -inf, neutral element of `union`.
    pub fn empty() -> Self {
        AABB {
            min: WorldPoint::from([FloatType::INFINITY; 3]),
            max: WorldPoint::from([FloatType::NEG_INFINITY; 3]),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min
            .iter()
            .zip(self.max.iter())
            .any(|(min, max)| !(min <= max))
    }

    pub fn is_finite(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|x| x.is_finite())
    }

    /// Checks that `other` lies completely inside this box (boundaries included).
    pub fn contains(&self, other: &WorldBox) -> bool {
        self.min.iter().zip(other.min.iter()).all(|(a, b)| a <= b)
            && self.max.iter().zip(other.max.iter()).all(|(a, b)| a >= b)
    }

    /// Linear interpolation between two boxes, `t == 0` gives `self`.
    pub fn lerp(&self, other: &WorldBox, t: FloatType) -> WorldBox {
        self.zip_map_coords(other, |a, b| (1.0 - t) * a + t * b)
    }
}

impl<Point> From<[Point; 2]> for AABB<Point> {
    fn from(value: [Point; 2]) -> Self {
        let [min, max] = value;
        AABB { min, max }
    }
}

impl<T: SimdValue + Scalar, D: DimName> SimdValue for AABB<OPoint<T, D>>
where
    T::Element: SimdValue + Scalar,
    DefaultAllocator: Allocator<D>,
{
    const LANES: usize = T::LANES;

    type Element = AABB<OPoint<T::Element, D>>;

    type SimdBool = T::SimdBool;

    fn splat(val: Self::Element) -> Self {
        val.map_coords(|x| T::splat(x))
    }

    fn extract(&self, i: usize) -> Self::Element {
        self.map_coords(|x| x.extract(i))
    }

    unsafe fn extract_unchecked(&self, i: usize) -> Self::Element {
        unsafe { self.map_coords(|x| x.extract_unchecked(i)) }
    }

    fn replace(&mut self, i: usize, val: Self::Element) {
        self.zip_apply_coords(&val, |x, y| x.replace(i, y.clone()));
    }

    unsafe fn replace_unchecked(&mut self, i: usize, val: Self::Element) {
        unsafe {
            self.zip_apply_coords(&val, |x, y| x.replace_unchecked(i, y.clone()));
        }
    }

    fn select(self, cond: Self::SimdBool, other: Self) -> Self {
        self.zip_map_coords(&other, |x, y| x.select(cond, y.clone()))
    }
}
