mod assemble;
mod bond_table;
mod bonding;
mod canon;
mod config;
mod error;
mod identity;
mod layout;

pub use assemble::assemble;
pub use bond_table::{BondReference, BondTable};
pub use bonding::infer_bonds;
pub use config::{AtlasConfig, BondTableSource, LayoutConfig, PerceptionConfig};
pub use error::Error;
pub use identity::{derive_identity, molecular_graph};
pub use layout::layout;

use std::collections::HashMap;

use tracing::debug;

use crate::io;
use crate::model::layout::Layout;
use crate::model::network::{ReactionNetwork, Transition};
use crate::model::point::{PointId, PointKind, StationaryPoint};

/// Bonds a parsed point and derives its species identity.
///
/// # Errors
///
/// Returns [`Error::InvalidTolerance`] for a non-positive or non-finite tolerance.
pub fn perceive(
    point: StationaryPoint,
    table: &BondTable,
    tolerance: f64,
) -> Result<StationaryPoint, Error> {
    let bonds = infer_bonds(&point, table, tolerance)?;
    let point = point.with_bonds(bonds);
    let identity = derive_identity(&point)?;
    Ok(point.with_identity(identity))
}

/// Perceives every point with the table and tolerance named by `config`.
///
/// The table is loaded and the tolerance checked before any point is touched,
/// so a configuration error never leaves a partially bonded batch behind.
pub fn perceive_all(
    points: Vec<StationaryPoint>,
    config: &PerceptionConfig,
) -> Result<Vec<StationaryPoint>, Error> {
    if !(config.tolerance.is_finite() && config.tolerance > 0.0) {
        return Err(Error::InvalidTolerance(config.tolerance));
    }
    let table = bond_table::load_table(config.bond_table.as_ref())?;

    let count = points.len();
    let perceived = points
        .into_iter()
        .map(|point| perceive(point, &table, config.tolerance))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        points = count,
        table_entries = table.len(),
        tolerance = config.tolerance,
        "perceived bonds and species identities"
    );
    Ok(perceived)
}

/// Perceived stationary points together with their assembled network and layout.
#[derive(Debug, Clone)]
pub struct Atlas {
    equilibria: Vec<StationaryPoint>,
    transitions: Vec<StationaryPoint>,
    /// Network nodes as indices into `equilibria`.
    nodes: Vec<usize>,
    /// Network edges as `(transition, from, to)` indices.
    edges: Vec<(usize, usize, usize)>,
    layout: Layout,
}

impl Atlas {
    /// Perceives, assembles and lays out already parsed points.
    pub fn build(
        equilibria: Vec<StationaryPoint>,
        transitions: Vec<StationaryPoint>,
        config: &AtlasConfig,
    ) -> Result<Self, Error> {
        let equilibria = perceive_all(equilibria, &config.perception)?;
        let transitions = perceive_all(transitions, &config.perception)?;

        let (nodes, edges, layout) = {
            let network = assemble(&equilibria, &transitions)?;
            let layout = layout(&network, &config.layout)?;

            let eq_slot = slots(&equilibria);
            let ts_slot = slots(&transitions);
            let nodes = network.nodes().iter().map(|p| eq_slot[&p.id]).collect();
            let edges = network
                .edges()
                .iter()
                .map(|e| (ts_slot[&e.point.id], eq_slot[&e.from.id], eq_slot[&e.to.id]))
                .collect();
            (nodes, edges, layout)
        };

        Ok(Self {
            equilibria,
            transitions,
            nodes,
            edges,
            layout,
        })
    }

    /// Every parsed equilibrium, including those no transition state reaches.
    pub fn equilibria(&self) -> &[StationaryPoint] {
        &self.equilibria
    }

    /// Every parsed transition state, including dropped dangling ones.
    pub fn transitions(&self) -> &[StationaryPoint] {
        &self.transitions
    }

    pub fn network(&self) -> ReactionNetwork<'_> {
        let nodes = self.nodes.iter().map(|&i| &self.equilibria[i]).collect();
        let edges = self
            .edges
            .iter()
            .map(|&(t, from, to)| Transition {
                point: &self.transitions[t],
                from: &self.equilibria[from],
                to: &self.equilibria[to],
            })
            .collect();
        ReactionNetwork::from_parts(nodes, edges)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }
}

fn slots(points: &[StationaryPoint]) -> HashMap<PointId, usize> {
    points.iter().enumerate().map(|(i, p)| (p.id, i)).collect()
}

/// Parses both logs and builds the [`Atlas`] in one call.
///
/// # Errors
///
/// Any parse, configuration, assembly or identity error aborts the whole build.
pub fn build_atlas(eq_text: &str, ts_text: &str, config: &AtlasConfig) -> Result<Atlas, Error> {
    let equilibria = io::parse_log(eq_text, PointKind::Eq)?;
    let transitions = io::parse_log(ts_text, PointKind::Ts)?;
    Atlas::build(equilibria, transitions, config)
}
