use std::collections::BTreeMap;

use super::point::{Composition, PointId};

/// Nodes sharing one species signature, placed on a common circle.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterPlacement {
    pub signature: String,
    /// Fragment compositions shared by every member.
    pub fragments: Vec<Composition>,
    /// Cluster center in canvas coordinates.
    pub center: [f64; 2],
    /// Radius of the local circle; zero for a single-member cluster.
    pub radius: f64,
    /// Members in placement order around the circle.
    pub members: Vec<PointId>,
}

/// Final 2-D coordinates of every network node, plus the cluster geometry
/// that produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    positions: BTreeMap<PointId, [f64; 2]>,
    clusters: Vec<ClusterPlacement>,
}

impl Layout {
    pub(crate) fn from_clusters(
        clusters: Vec<ClusterPlacement>,
        positions: BTreeMap<PointId, [f64; 2]>,
    ) -> Self {
        Self { positions, clusters }
    }

    pub fn position(&self, id: PointId) -> Option<[f64; 2]> {
        self.positions.get(&id).copied()
    }

    pub fn positions(&self) -> impl Iterator<Item = (PointId, [f64; 2])> + '_ {
        self.positions.iter().map(|(id, pos)| (*id, *pos))
    }

    pub fn clusters(&self) -> &[ClusterPlacement] {
        &self.clusters
    }

    pub fn cluster_of(&self, id: PointId) -> Option<&ClusterPlacement> {
        self.clusters.iter().find(|c| c.members.contains(&id))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Axis-aligned bounding box `[min_x, min_y, max_x, max_y]` of all nodes.
    pub fn bounds(&self) -> Option<[f64; 4]> {
        self.positions.values().fold(None, |acc, [x, y]| match acc {
            None => Some([*x, *y, *x, *y]),
            Some([x0, y0, x1, y1]) => Some([x0.min(*x), y0.min(*y), x1.max(*x), y1.max(*y)]),
        })
    }
}
