use itertools::Itertools;

use super::{QuantizedSubgrids, Subgrid};
use crate::{
    scene::GridMesh,
    util::{LaneOccupancy, lane_windows},
};

/// Leaf containers of one grid mesh, in the order the mesh lists its subgrids.
#[derive(Clone, Debug)]
pub struct SubgridLeaves<const N: usize> {
    leaves: Vec<QuantizedSubgrids<N>>,
    skipped: usize,
}

impl<const N: usize> SubgridLeaves<N> {
    /// Packs all subgrids of a mesh N per container, using bounds at `time_step`.
    /// Subgrids with non-finite bounds can't be quantized and are left out.
    pub fn pack_mesh(mesh: &GridMesh, geometry_id: u32, time_step: usize) -> Self {
        let mut skipped = 0usize;

        let cells = mesh
            .subgrids(geometry_id)
            .map(|subgrid| (subgrid, subgrid.bounds(mesh, time_step)))
            .filter(|(subgrid, bounds)| {
                if bounds.is_finite() {
                    true
                } else {
                    log::warn!("skipping {subgrid}, bounds {bounds:?} are not finite");
                    skipped += 1;
                    false
                }
            });

        let leaves = lane_windows::<_, N>(cells)
            .map(|window| QuantizedSubgrids::from_subgrids(geometry_id, &window))
            .collect_vec();

        log::debug!(
            "geometry {geometry_id}: packed {} subgrids into {} leaves of {N}, skipped {skipped}",
            mesh.subgrid_count() - skipped,
            leaves.len()
        );

        SubgridLeaves { leaves, skipped }
    }

    pub fn leaves(&self) -> &[QuantizedSubgrids<N>] {
        &self.leaves
    }

    pub fn into_leaves(self) -> Vec<QuantizedSubgrids<N>> {
        self.leaves
    }

    /// Number of subgrids left out because of non-finite bounds
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn subgrids(&self) -> impl Iterator<Item = Subgrid> + '_ {
        self.leaves
            .iter()
            .flat_map(|leaf| leaf.valid_lanes().map(move |i| leaf.subgrid(i)))
    }

    pub fn occupancy(&self) -> LaneOccupancy {
        let mut occupancy = LaneOccupancy::new(N);
        for leaf in &self.leaves {
            occupancy.add_container(leaf.len());
        }
        occupancy
    }

    pub fn log_statistics(&self) {
        log::info!("Subgrid leaves: {}", self.occupancy());
        if self.skipped > 0 {
            log::info!("Skipped subgrids: {}", self.skipped);
        }
    }
}
