pub mod grid_mesh;

pub use grid_mesh::{Grid, GridMesh, GridMeshError};

use index_vec::IndexVec;
use thiserror::Error;

index_vec::define_index_type! {
    /// Identifier of a geometry registered in a `Scene`
    pub struct GeometryId = u32;
    IMPL_RAW_CONVERSIONS = true;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("geometry {0} is not a grid mesh of this scene")]
    UnknownGeometry(u32),
}

/// Owner of the grid meshes, subgrids refer to them by geometry id.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    meshes: IndexVec<GeometryId, GridMesh>,
}

impl Scene {
    pub fn new() -> Scene {
        Scene::default()
    }

    pub fn add_grid_mesh(&mut self, mesh: GridMesh) -> GeometryId {
        self.meshes.push(mesh)
    }

    pub fn grid_mesh(&self, geometry_id: u32) -> Result<&GridMesh, SceneError> {
        self.meshes
            .get(GeometryId::from_raw(geometry_id))
            .ok_or(SceneError::UnknownGeometry(geometry_id))
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GeometryId, &GridMesh)> {
        self.meshes.iter_enumerated()
    }
}
