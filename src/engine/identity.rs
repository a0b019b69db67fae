use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::{Bfs, EdgeRef};
use tracing::trace;

use super::canon::{self, Fragment};
use crate::model::point::{Composition, IdentityUnavailable, SpeciesIdentity, StationaryPoint};
use crate::model::types::{BondOrder, Element};

/// Molecular graph of a bonded point: atoms as element-labelled nodes (node
/// index = atom index), bonds as order-labelled edges.
pub fn molecular_graph(
    point: &StationaryPoint,
) -> Result<UnGraph<Element, BondOrder>, IdentityUnavailable> {
    let bonds = point.bonds().ok_or(IdentityUnavailable(point.id))?;
    let mut graph = UnGraph::with_capacity(point.n_atoms(), bonds.len());
    for atom in &point.atoms {
        graph.add_node(atom.element);
    }
    for bond in bonds {
        graph.add_edge(NodeIndex::new(bond.i), NodeIndex::new(bond.j), bond.order);
    }
    Ok(graph)
}

/// Derives the canonical signature and per-fragment composition of a bonded point.
///
/// Fragments are the connected components of the molecular graph, numbered by
/// their lowest atom index. Each fragment gets a canonical line notation; the
/// signature joins the sorted notations with `.`, so it depends neither on
/// atom order nor on fragment order.
///
/// # Errors
///
/// Returns [`IdentityUnavailable`] if the point has not been bonded yet.
pub fn derive_identity(point: &StationaryPoint) -> Result<SpeciesIdentity, IdentityUnavailable> {
    let graph = molecular_graph(point)?;
    let n = graph.node_count();

    let mut fragment_of = vec![usize::MAX; n];
    let mut local = vec![0usize; n];
    let mut members: Vec<Vec<NodeIndex>> = Vec::new();

    for start in graph.node_indices() {
        if fragment_of[start.index()] != usize::MAX {
            continue;
        }
        let mut component = Vec::new();
        let mut bfs = Bfs::new(&graph, start);
        while let Some(node) = bfs.next(&graph) {
            component.push(node);
        }
        component.sort_unstable();
        for (i, node) in component.iter().enumerate() {
            fragment_of[node.index()] = members.len();
            local[node.index()] = i;
        }
        members.push(component);
    }

    let mut bonds: Vec<Vec<(usize, usize, BondOrder)>> = vec![Vec::new(); members.len()];
    for edge in graph.edge_references() {
        let (s, t) = (edge.source().index(), edge.target().index());
        bonds[fragment_of[s]].push((local[s], local[t], *edge.weight()));
    }

    let mut notations = Vec::with_capacity(members.len());
    let mut fragments = Vec::with_capacity(members.len());
    for (component, fragment_bonds) in members.iter().zip(bonds) {
        let labels: Vec<Element> = component.iter().map(|&node| graph[node]).collect();

        let mut composition = Composition::new();
        for element in &labels {
            *composition.entry(*element).or_insert(0) += 1;
        }
        fragments.push(composition);

        notations.push(canon::line_notation(&Fragment::new(labels, fragment_bonds)));
    }
    notations.sort_unstable();
    let signature = notations.join(".");

    trace!(point = %point.id, fragments = fragments.len(), %signature, "derived species identity");
    Ok(SpeciesIdentity {
        signature,
        fragments,
    })
}
