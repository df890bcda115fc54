use assert2::assert;
use bon::bon;
use thiserror::Error;

use crate::{
    geometry::WorldPoint,
    subgrid::{CellCoord, Subgrid},
};

/// One structured grid inside a grid mesh: `resolution_x * resolution_y` vertices,
/// consecutive rows `line_stride` vertices apart in the vertex buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    pub start_vertex: u32,
    pub line_stride: u32,
    pub resolution_x: u16,
    pub resolution_y: u16,
}

impl Grid {
    pub const MIN_RESOLUTION: u16 = 2;
    /// Cells must be addressable by a `CellCoord`.
    pub const MAX_RESOLUTION: u16 = CellCoord::MAX_MAGNITUDE + 1;

    /// Number of quads in one grid line
    pub fn cell_count_x(&self) -> u16 {
        self.resolution_x - 1
    }

    /// Number of quad rows
    pub fn cell_count_y(&self) -> u16 {
        self.resolution_y - 1
    }

    /// Index of the last vertex the grid references.
    pub fn last_vertex(&self) -> u64 {
        u64::from(self.start_vertex)
            + u64::from(self.resolution_y - 1) * u64::from(self.line_stride)
            + u64::from(self.resolution_x - 1)
    }

    /// Whether the 3x3 neighbourhood of a cell in column `x` would run past the grid line.
    pub fn at_boundary_x(&self, x: u16) -> bool {
        u32::from(x) + 2 >= u32::from(self.resolution_x)
    }

    /// Whether the 3x3 neighbourhood of a cell in row `y` would run past the last row.
    pub fn at_boundary_y(&self, y: u16) -> bool {
        u32::from(y) + 2 >= u32::from(self.resolution_y)
    }

    /// Anchors of the subgrids covering this grid.
    /// Each subgrid spans 2x2 cells, so anchors step by two in both directions.
    pub fn subgrid_anchors(&self) -> impl Iterator<Item = (u16, u16)> + use<> {
        let cells_x = self.cell_count_x();
        let cells_y = self.cell_count_y();
        (0..cells_y)
            .step_by(2)
            .flat_map(move |y| (0..cells_x).step_by(2).map(move |x| (x, y)))
    }

    pub fn subgrid_count(&self) -> usize {
        usize::from(self.cell_count_x().div_ceil(2)) * usize::from(self.cell_count_y().div_ceil(2))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridMeshError {
    #[error("grid {grid} has resolution {resolution_x}x{resolution_y}, outside of 2..=32768")]
    ResolutionOutOfRange {
        grid: usize,
        resolution_x: u16,
        resolution_y: u16,
    },

    #[error("grid {grid} has line stride {line_stride}, shorter than its resolution {resolution_x}")]
    StrideTooShort {
        grid: usize,
        line_stride: u32,
        resolution_x: u16,
    },

    #[error("grid {grid} reaches vertex {last_vertex}, but the mesh only has {vertex_count} vertices")]
    VertexOutOfRange {
        grid: usize,
        last_vertex: u64,
        vertex_count: usize,
    },

    #[error("time step {time_step} has {actual} vertices, expected {expected}")]
    TimeStepLength {
        time_step: usize,
        expected: usize,
        actual: usize,
    },
}

/// Geometry made of structured vertex grids, with optional motion key frames.
#[derive(Clone, Debug)]
pub struct GridMesh {
    /// Vertex buffer per time step, all of the same length
    time_steps: Vec<Vec<WorldPoint>>,
    grids: Vec<Grid>,
}

#[bon]
impl GridMesh {
    /// `vertices` are the positions at time step 0, `motion_steps` the positions at
    /// the following time steps.
    #[builder]
    pub fn new(
        vertices: Vec<WorldPoint>,
        #[builder(default)] motion_steps: Vec<Vec<WorldPoint>>,
        grids: Vec<Grid>,
    ) -> Result<Self, GridMeshError> {
        let vertex_count = vertices.len();

        for (i, step) in motion_steps.iter().enumerate() {
            if step.len() != vertex_count {
                return Err(GridMeshError::TimeStepLength {
                    time_step: i + 1,
                    expected: vertex_count,
                    actual: step.len(),
                });
            }
        }

        for (i, grid) in grids.iter().enumerate() {
            validate_grid(i, grid, vertex_count)?;
        }

        let mut time_steps = Vec::with_capacity(1 + motion_steps.len());
        time_steps.push(vertices);
        time_steps.extend(motion_steps);

        Ok(GridMesh { time_steps, grids })
    }
}

fn validate_grid(index: usize, grid: &Grid, vertex_count: usize) -> Result<(), GridMeshError> {
    let resolution_range = Grid::MIN_RESOLUTION..=Grid::MAX_RESOLUTION;
    if !resolution_range.contains(&grid.resolution_x)
        || !resolution_range.contains(&grid.resolution_y)
    {
        return Err(GridMeshError::ResolutionOutOfRange {
            grid: index,
            resolution_x: grid.resolution_x,
            resolution_y: grid.resolution_y,
        });
    }

    if grid.line_stride < u32::from(grid.resolution_x) {
        return Err(GridMeshError::StrideTooShort {
            grid: index,
            line_stride: grid.line_stride,
            resolution_x: grid.resolution_x,
        });
    }

    let last_vertex = grid.last_vertex();
    if last_vertex >= vertex_count as u64 {
        return Err(GridMeshError::VertexOutOfRange {
            grid: index,
            last_vertex,
            vertex_count,
        });
    }

    Ok(())
}

impl GridMesh {
    pub fn vertex(&self, index: usize, time_step: usize) -> WorldPoint {
        self.time_steps[time_step][index]
    }

    pub fn vertices(&self, time_step: usize) -> &[WorldPoint] {
        &self.time_steps[time_step]
    }

    pub fn vertex_count(&self) -> usize {
        self.time_steps[0].len()
    }

    pub fn time_step_count(&self) -> usize {
        self.time_steps.len()
    }

    pub fn time_segment_count(&self) -> usize {
        self.time_steps.len() - 1
    }

    /// Grid of the given primitive, panics if there is no such grid.
    pub fn grid(&self, primitive_id: u32) -> &Grid {
        let index = primitive_id as usize;
        assert!(
            index < self.grids.len(),
            "primitive {primitive_id} is not a grid of this mesh"
        );
        &self.grids[index]
    }

    pub fn grids(&self) -> &[Grid] {
        &self.grids
    }

    /// All subgrids of all grids of this mesh, grid by grid, row by row.
    pub fn subgrids(&self, geometry_id: u32) -> impl Iterator<Item = Subgrid> + '_ {
        self.grids.iter().enumerate().flat_map(move |(primitive_id, grid)| {
            grid.subgrid_anchors()
                .map(move |(x, y)| Subgrid::for_grid(grid, x, y, geometry_id, primitive_id as u32))
        })
    }

    pub fn subgrid_count(&self) -> usize {
        self.grids.iter().map(Grid::subgrid_count).sum()
    }
}
