use std::ops::{Index, IndexMut};

use super::{FloatType, WorldPoint, WorldVector};

/// Four corners of a quad, in winding order.
#[derive(Clone, Debug, PartialEq)]
pub struct Quad<Point>([Point; 4]);

impl<Point> Quad<Point> {
    pub fn new(a: Point, b: Point, c: Point, d: Point) -> Quad<Point> {
        Quad([a, b, c, d])
    }

    pub fn iter<'a>(&'a self) -> impl Iterator<Item = &'a Point> {
        self.0.iter()
    }

    pub fn into_array(self) -> [Point; 4] {
        self.0
    }

    pub fn map<Point2, F: FnMut(&Point) -> Point2>(&self, mut f: F) -> Quad<Point2> {
        Quad([f(&self[0]), f(&self[1]), f(&self[2]), f(&self[3])])
    }
}

impl<Point> From<[Point; 4]> for Quad<Point> {
    fn from(value: [Point; 4]) -> Self {
        Quad(value)
    }
}

impl<Point> Index<usize> for Quad<Point> {
    type Output = Point;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<Point> IndexMut<usize> for Quad<Point> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl Quad<WorldPoint> {
    /// Area-weighted normal; cross product of the diagonals, halved.
    /// Exact for planar quads, zero for quads collapsed onto a line or a point.
    pub fn vector_area(&self) -> WorldVector {
        let d0 = self[2] - self[0];
        let d1 = self[3] - self[1];
        d0.cross(&d1) * 0.5
    }

    pub fn area(&self) -> FloatType {
        self.vector_area().norm()
    }

    pub fn is_degenerate(&self) -> bool {
        self.vector_area() == WorldVector::zeros()
    }
}
