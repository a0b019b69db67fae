use std::collections::HashMap;
use std::fmt;

use petgraph::graph::{NodeIndex, UnGraph};

use super::point::{PointId, StationaryPoint};

/// Hartree → kcal/mol conversion used for energy-gap classification.
pub const HARTREE_TO_KCAL_PER_MOL: f64 = 627.51;

/// Energy gap between the two equilibria joined by a transition state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnergyClass {
    /// |ΔE| < 50 kcal/mol.
    Low,
    /// 50 ≤ |ΔE| < 100 kcal/mol.
    Medium,
    /// |ΔE| ≥ 100 kcal/mol.
    High,
}

impl EnergyClass {
    pub const LOW_LIMIT: f64 = 50.0;
    pub const MEDIUM_LIMIT: f64 = 100.0;

    pub fn from_gap(gap_kcal: f64) -> Self {
        let gap = gap_kcal.abs();
        if gap < Self::LOW_LIMIT {
            EnergyClass::Low
        } else if gap < Self::MEDIUM_LIMIT {
            EnergyClass::Medium
        } else {
            EnergyClass::High
        }
    }
}

impl fmt::Display for EnergyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnergyClass::Low => write!(f, "low"),
            EnergyClass::Medium => write!(f, "medium"),
            EnergyClass::High => write!(f, "high"),
        }
    }
}

/// A transition state whose endpoints both resolved to equilibria.
#[derive(Debug, Clone, Copy)]
pub struct Transition<'a> {
    pub point: &'a StationaryPoint,
    pub from: &'a StationaryPoint,
    pub to: &'a StationaryPoint,
}

impl<'a> Transition<'a> {
    #[inline]
    pub fn id(&self) -> PointId {
        self.point.id
    }

    /// |E(from) − E(to)| in kcal/mol.
    pub fn energy_gap(&self) -> f64 {
        (self.from.energy - self.to.energy).abs() * HARTREE_TO_KCAL_PER_MOL
    }

    pub fn energy_class(&self) -> EnergyClass {
        EnergyClass::from_gap(self.energy_gap())
    }

    /// Height of the transition state above the lower of its two endpoints, in kcal/mol.
    pub fn barrier(&self) -> f64 {
        (self.point.energy - self.from.energy.min(self.to.energy)) * HARTREE_TO_KCAL_PER_MOL
    }

    /// Counts the `targets` whose first bonding partner differs between the
    /// two endpoints (an unbonded atom has no partner).
    ///
    /// Returns `None` if a target index is outside either endpoint's atom list.
    pub fn moved_atoms(&self, targets: &[usize]) -> Option<usize> {
        let mut moved = 0;
        for &atom in targets {
            if atom >= self.from.n_atoms() || atom >= self.to.n_atoms() {
                return None;
            }
            if self.from.first_partner(atom) != self.to.first_partner(atom) {
                moved += 1;
            }
        }
        Some(moved)
    }
}

/// How transition states appear in a [`ReactionNetwork::to_graph`] view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphMode {
    /// Equilibria are nodes; each transition state is one edge between them.
    #[default]
    Direct,
    /// Transition states become nodes of their own, linked to both endpoints.
    ThroughTransitionStates,
}

/// Deduplicated equilibria connected through fully resolved transition states.
///
/// Nodes and edges borrow the parsed points; nothing is copied.
#[derive(Debug, Clone, Default)]
pub struct ReactionNetwork<'a> {
    nodes: Vec<&'a StationaryPoint>,
    edges: Vec<Transition<'a>>,
}

impl<'a> ReactionNetwork<'a> {
    pub(crate) fn from_parts(nodes: Vec<&'a StationaryPoint>, edges: Vec<Transition<'a>>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[&'a StationaryPoint] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Transition<'a>] {
        &self.edges
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: PointId) -> Option<&'a StationaryPoint> {
        self.nodes.iter().copied().find(|p| p.id == id)
    }

    /// Number of transition-state edges touching the node (a self-loop counts twice).
    pub fn degree(&self, id: PointId) -> usize {
        self.edges
            .iter()
            .map(|e| usize::from(e.from.id == id) + usize::from(e.to.id == id))
            .sum()
    }

    /// Lowest and highest energy over all nodes and edges, in Hartree.
    pub fn energy_range(&self) -> Option<(f64, f64)> {
        self.nodes
            .iter()
            .map(|p| p.energy)
            .chain(self.edges.iter().map(|e| e.point.energy))
            .fold(None, |acc, e| match acc {
                None => Some((e, e)),
                Some((lo, hi)) => Some((lo.min(e), hi.max(e))),
            })
    }

    /// Builds a `petgraph` view of the network; edge weights are the transition states.
    pub fn to_graph(&self, mode: GraphMode) -> UnGraph<&'a StationaryPoint, &'a StationaryPoint> {
        let mut graph = UnGraph::with_capacity(self.nodes.len(), self.edges.len());
        let mut index: HashMap<PointId, NodeIndex> = HashMap::with_capacity(self.nodes.len());

        for node in &self.nodes {
            index.insert(node.id, graph.add_node(*node));
        }

        for edge in &self.edges {
            let from = index[&edge.from.id];
            let to = index[&edge.to.id];
            match mode {
                GraphMode::Direct => {
                    graph.add_edge(from, to, edge.point);
                }
                GraphMode::ThroughTransitionStates => {
                    let ts = graph.add_node(edge.point);
                    graph.add_edge(from, ts, edge.point);
                    graph.add_edge(ts, to, edge.point);
                }
            }
        }

        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::point::{Bond, Connection, Endpoint};
    use crate::model::types::{BondOrder, Element};

    fn eq(index: u32, energy: f64) -> StationaryPoint {
        let mut p = StationaryPoint::new(
            PointId::equilibrium(index),
            vec![Atom::new(Element::H, [0.0; 3]), Atom::new(Element::H, [0.74, 0.0, 0.0])],
        );
        p.energy = energy;
        p
    }

    fn ts(index: u32, energy: f64, from: u32, to: u32) -> StationaryPoint {
        let mut p = eq(0, energy);
        p.id = PointId::transition(index);
        p.connection = Some(Connection::new(
            Endpoint::Equilibrium(from),
            Endpoint::Equilibrium(to),
        ));
        p
    }

    #[test]
    fn energy_class_thresholds() {
        assert_eq!(EnergyClass::from_gap(0.0), EnergyClass::Low);
        assert_eq!(EnergyClass::from_gap(49.999), EnergyClass::Low);
        assert_eq!(EnergyClass::from_gap(50.0), EnergyClass::Medium);
        assert_eq!(EnergyClass::from_gap(-75.0), EnergyClass::Medium);
        assert_eq!(EnergyClass::from_gap(100.0), EnergyClass::High);
        assert_eq!(EnergyClass::High.to_string(), "high");
    }

    #[test]
    fn transition_energy_gap_in_kcal() {
        let a = eq(0, -1.0);
        let b = eq(1, -1.1);
        let t = ts(0, -0.9, 0, 1);
        let edge = Transition { point: &t, from: &a, to: &b };
        assert!((edge.energy_gap() - 0.1 * HARTREE_TO_KCAL_PER_MOL).abs() < 1e-9);
        assert_eq!(edge.energy_class(), EnergyClass::High);
        assert!((edge.barrier() - 0.2 * HARTREE_TO_KCAL_PER_MOL).abs() < 1e-9);
    }

    #[test]
    fn moved_atoms_compares_first_partner() {
        let a = eq(0, 0.0).with_bonds(vec![Bond::new(0, 1, BondOrder::Single)]);
        let b = eq(1, 0.0).with_bonds(vec![]);
        let t = ts(0, 0.0, 0, 1);
        let edge = Transition { point: &t, from: &a, to: &b };
        assert_eq!(edge.moved_atoms(&[0, 1]), Some(2));
        assert_eq!(edge.moved_atoms(&[]), Some(0));
        assert_eq!(edge.moved_atoms(&[5]), None);

        let same = Transition { point: &t, from: &a, to: &a };
        assert_eq!(same.moved_atoms(&[0, 1]), Some(0));
    }

    #[test]
    fn graph_views_and_energy_range() {
        let a = eq(0, -1.0);
        let b = eq(1, -2.0);
        let t1 = ts(0, -0.5, 0, 1);
        let t2 = ts(1, -0.7, 1, 0);
        let network = ReactionNetwork::from_parts(
            vec![&a, &b],
            vec![
                Transition { point: &t1, from: &a, to: &b },
                Transition { point: &t2, from: &b, to: &a },
            ],
        );

        assert_eq!(network.degree(PointId::equilibrium(0)), 2);
        assert_eq!(network.energy_range(), Some((-2.0, -0.5)));
        assert_eq!(network.node(PointId::equilibrium(1)).map(|p| p.id), Some(b.id));

        let direct = network.to_graph(GraphMode::Direct);
        assert_eq!(direct.node_count(), 2);
        assert_eq!(direct.edge_count(), 2);

        let through = network.to_graph(GraphMode::ThroughTransitionStates);
        assert_eq!(through.node_count(), 4);
        assert_eq!(through.edge_count(), 4);
    }

    #[test]
    fn empty_network_has_no_energy_range() {
        let network = ReactionNetwork::default();
        assert!(network.is_empty());
        assert_eq!(network.energy_range(), None);
    }
}
