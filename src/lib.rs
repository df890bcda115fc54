pub mod geometry;
pub mod scene;
pub mod subgrid;
mod util;

pub use scene::{GeometryId, GridMesh, Scene};
pub use subgrid::{QuantizedSubgrids, Subgrid, SubgridLeaves};
pub use util::LaneOccupancy;
