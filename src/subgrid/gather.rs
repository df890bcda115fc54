use simba::simd::SimdValue as _;

use super::Subgrid;
use crate::{
    geometry::{Quad, SimdFloatType, WorldPoint, WorldPoint4},
    scene::{Grid, GridMesh, Scene, SceneError},
};

/// Corners (row, column) of the four quads in the 3x3 neighbourhood, in winding order
/// around the centre vertex.
const QUAD_CORNERS: [[(usize, usize); 4]; 4] = [
    [(0, 0), (0, 1), (1, 1), (1, 0)],
    [(0, 1), (0, 2), (1, 2), (1, 1)],
    [(1, 1), (1, 2), (2, 2), (2, 1)],
    [(1, 0), (1, 1), (2, 1), (2, 0)],
];

/// Order of quads in `gather_vertices` output, row major.
const FLAT_QUAD_ORDER: [usize; 4] = [0, 1, 3, 2];

/// The four quads of a subgrid, each one stored with its corners in SIMD lanes.
#[derive(Clone, Debug)]
pub struct GatheredQuads([WorldPoint4; 4]);

impl GatheredQuads {
    pub fn lanes(&self) -> &[WorldPoint4; 4] {
        &self.0
    }

    /// Quad `i` with its corners unpacked.
    pub fn quad(&self, i: usize) -> Quad<WorldPoint> {
        let packed = &self.0[i];
        Quad::from(std::array::from_fn(|corner| {
            packed.map(|coordinate| coordinate.extract(corner))
        }))
    }

    pub fn quads(&self) -> impl Iterator<Item = Quad<WorldPoint>> + '_ {
        (0..4).map(|i| self.quad(i))
    }
}

/// Packs four points into lanes.
fn transpose(corners: [WorldPoint; 4]) -> WorldPoint4 {
    WorldPoint4::new(
        SimdFloatType::from(corners.map(|p| p.x)),
        SimdFloatType::from(corners.map(|p| p.y)),
        SimdFloatType::from(corners.map(|p| p.z)),
    )
}

impl Subgrid {
    /// Vertex indices of the 3x3 neighbourhood, `[row][column]`.
    ///
    /// Neighbours past the end of the grid are replaced by the last valid column or row,
    /// so the indices never leave the grid.
    pub fn neighbourhood_indices(&self, grid: &Grid) -> [[usize; 3]; 3] {
        let line_stride = grid.line_stride as usize;
        let v00 = grid.start_vertex as usize
            + usize::from(self.column())
            + usize::from(self.row()) * line_stride;
        let delta_x = if self.at_boundary_x() { 0 } else { 1 };
        let delta_y = if self.at_boundary_y() { 0 } else { line_stride };

        let column_offsets = [0, 1, 1 + delta_x];
        let row_offsets = [0, line_stride, line_stride + delta_y];

        row_offsets.map(|row| column_offsets.map(|column| v00 + row + column))
    }

    pub fn gather_quads(&self, mesh: &GridMesh, grid: &Grid) -> GatheredQuads {
        self.gather_quads_at(mesh, grid, 0)
    }

    /// Loads the four quads around the centre vertex of this subgrid.
    /// Quads reaching past the grid boundary come out degenerate (zero area).
    pub fn gather_quads_at(
        &self,
        mesh: &GridMesh,
        grid: &Grid,
        time_step: usize,
    ) -> GatheredQuads {
        let vertices = self.load_neighbourhood(mesh, grid, time_step);
        GatheredQuads(
            QUAD_CORNERS.map(|corners| transpose(corners.map(|(r, c)| vertices[r][c]))),
        )
    }

    pub fn gather_quads_in_scene(
        &self,
        scene: &Scene,
        time_step: usize,
    ) -> Result<GatheredQuads, SceneError> {
        let mesh = scene.grid_mesh(self.geometry_id())?;
        let grid = mesh.grid(self.primitive_id());
        Ok(self.gather_quads_at(mesh, grid, time_step))
    }

    /// The four quads as 16 consecutive corners: top left, top right, bottom left,
    /// bottom right quad.
    pub fn gather_vertices(&self, mesh: &GridMesh, time_step: usize) -> [WorldPoint; 16] {
        let grid = mesh.grid(self.primitive_id());
        let vertices = self.load_neighbourhood(mesh, grid, time_step);
        std::array::from_fn(|i| {
            let (r, c) = QUAD_CORNERS[FLAT_QUAD_ORDER[i / 4]][i % 4];
            vertices[r][c]
        })
    }

    fn load_neighbourhood(
        &self,
        mesh: &GridMesh,
        grid: &Grid,
        time_step: usize,
    ) -> [[WorldPoint; 3]; 3] {
        self.neighbourhood_indices(grid)
            .map(|row| row.map(|index| mesh.vertex(index, time_step)))
    }
}
