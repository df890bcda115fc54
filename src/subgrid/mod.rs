//! Leaf primitives of a BVH over grid meshes.
//!
//! A `Subgrid` addresses a 2x2 block of quads (3x3 vertices) inside one grid of a
//! `GridMesh`, `QuantizedSubgrids` groups several of them together with their bounds
//! compressed to one byte per plane.

mod cache_layout;
mod gather;
mod packing;
mod quantized;

pub use cache_layout::CacheLayoutError;
pub use gather::GatheredQuads;
pub use packing::SubgridLeaves;
pub use quantized::{
    MAX_QUANTIZED, MIN_QUANTIZED, QuantizedAxis, QuantizedSubgrids, QuantizedSubgrids4, SubgridId,
};

use bytemuck::{Pod, Zeroable};

use crate::{
    geometry::{LinearBounds, TimeRange, WorldBox},
    scene::{Grid, GridMesh, Scene, SceneError},
};

/// Column or row of a subgrid.
///
/// Low 15 bits hold the coordinate, the top bit is set when the subgrid's 3x3 vertex
/// neighbourhood would extend past the end of the grid in this direction.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct CellCoord(u16);

impl CellCoord {
    const BOUNDARY_FLAG: u16 = 1 << 15;
    const MAGNITUDE_MASK: u16 = Self::BOUNDARY_FLAG - 1;

    pub const MAX_MAGNITUDE: u16 = Self::MAGNITUDE_MASK;

    /// Panics if the magnitude doesn't fit into 15 bits
    pub fn new(magnitude: u16, at_boundary: bool) -> Self {
        assert2::assert!(magnitude <= Self::MAX_MAGNITUDE);
        let flag = if at_boundary { Self::BOUNDARY_FLAG } else { 0 };
        CellCoord(magnitude | flag)
    }

    pub fn from_raw(raw: u16) -> Self {
        CellCoord(raw)
    }

    pub fn raw(self) -> u16 {
        self.0
    }

    pub fn magnitude(self) -> u16 {
        self.0 & Self::MAGNITUDE_MASK
    }

    pub fn at_boundary(self) -> bool {
        self.0 & Self::BOUNDARY_FLAG != 0
    }
}

impl std::fmt::Debug for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellCoord")
            .field("magnitude", &self.magnitude())
            .field("at_boundary", &self.at_boundary())
            .finish()
    }
}

/// Reference to one subgrid of a grid mesh.
/// Holds no vertex data, only what is needed to find the vertices again.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Subgrid {
    x: CellCoord,
    y: CellCoord,
    geometry_id: u32,
    primitive_id: u32,
}

impl Subgrid {
    pub fn new(x: CellCoord, y: CellCoord, geometry_id: u32, primitive_id: u32) -> Self {
        Subgrid {
            x,
            y,
            geometry_id,
            primitive_id,
        }
    }

    /// Subgrid anchored at cell `(x, y)` of `grid`, boundary flags derived from the grid
    /// dimensions. Panics if the cell is outside of the grid.
    pub fn for_grid(grid: &Grid, x: u16, y: u16, geometry_id: u32, primitive_id: u32) -> Self {
        assert2::assert!(x < grid.cell_count_x(), "column {x} outside of {grid:?}");
        assert2::assert!(y < grid.cell_count_y(), "row {y} outside of {grid:?}");
        Subgrid {
            x: CellCoord::new(x, grid.at_boundary_x(x)),
            y: CellCoord::new(y, grid.at_boundary_y(y)),
            geometry_id,
            primitive_id,
        }
    }

    pub fn column(&self) -> u16 {
        self.x.magnitude()
    }

    pub fn row(&self) -> u16 {
        self.y.magnitude()
    }

    pub fn x(&self) -> CellCoord {
        self.x
    }

    pub fn y(&self) -> CellCoord {
        self.y
    }

    pub fn at_boundary_x(&self) -> bool {
        self.x.at_boundary()
    }

    pub fn at_boundary_y(&self) -> bool {
        self.y.at_boundary()
    }

    pub fn geometry_id(&self) -> u32 {
        self.geometry_id
    }

    pub fn primitive_id(&self) -> u32 {
        self.primitive_id
    }

    /// Exact bounds of the 3x3 vertex neighbourhood at the given time step.
    pub fn bounds(&self, mesh: &GridMesh, time_step: usize) -> WorldBox {
        let grid = mesh.grid(self.primitive_id);
        self.neighbourhood_indices(grid)
            .as_flattened()
            .iter()
            .fold(WorldBox::empty(), |bounds, &index| {
                bounds.extend_point(&mesh.vertex(index, time_step))
            })
    }

    pub fn bounds_in_scene(&self, scene: &Scene, time_step: usize) -> Result<WorldBox, SceneError> {
        let mesh = scene.grid_mesh(self.geometry_id)?;
        Ok(self.bounds(mesh, time_step))
    }

    /// Bounds moving linearly between time step `time_step` and the next one.
    pub fn linear_bounds(&self, mesh: &GridMesh, time_step: usize) -> LinearBounds {
        assert2::assert!(
            time_step + 1 < mesh.time_step_count(),
            "time step {time_step} has no following step"
        );
        LinearBounds::new(
            self.bounds(mesh, time_step),
            self.bounds(mesh, time_step + 1),
        )
    }

    /// Conservative linear bounds over a normalized time range, possibly spanning several
    /// time segments of the mesh. Static meshes give constant bounds.
    pub fn linear_bounds_over(&self, mesh: &GridMesh, time_range: TimeRange) -> LinearBounds {
        LinearBounds::from_time_segments(time_range, mesh.time_segment_count(), |step| {
            self.bounds(mesh, step)
        })
    }
}

impl std::fmt::Display for Subgrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Subgrid ( x = {}, y = {}, geometry_id = {}, primitive_id = {} )",
            self.column(),
            self.row(),
            self.geometry_id,
            self.primitive_id
        )
    }
}
