use std::fmt::Display;

/// How full the lanes of a set of N-wide containers are.
#[derive(Clone, Debug, PartialEq)]
pub struct LaneOccupancy {
    pub lanes: usize,
    pub containers: usize,
    pub used_lanes: usize,
    /// Number of containers with each count of valid lanes, index 0..=lanes
    pub histogram: Vec<usize>,
}

impl LaneOccupancy {
    pub fn new(lanes: usize) -> Self {
        LaneOccupancy {
            lanes,
            containers: 0,
            used_lanes: 0,
            histogram: vec![0; lanes + 1],
        }
    }

    pub fn add_container(&mut self, valid_lanes: usize) {
        assert2::assert!(valid_lanes <= self.lanes);
        self.containers += 1;
        self.used_lanes += valid_lanes;
        self.histogram[valid_lanes] += 1;
    }

    pub fn total_lanes(&self) -> usize {
        self.containers * self.lanes
    }

    /// Fraction of used lanes, 0 without any containers.
    pub fn fill_ratio(&self) -> f32 {
        if self.containers == 0 {
            0.0
        } else {
            self.used_lanes as f32 / self.total_lanes() as f32
        }
    }
}

impl Display for LaneOccupancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} / {} lanes used ({:.1}%) in {} containers",
            self.used_lanes,
            self.total_lanes(),
            self.fill_ratio() * 100.0,
            self.containers
        )
    }
}
