use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use super::error::Error;
use crate::model::network::{ReactionNetwork, Transition};
use crate::model::point::{PointId, PointKind, StationaryPoint};

/// Assembles the reaction network from parsed equilibria and transition states.
///
/// Transition states with an unresolved endpoint are dropped. Every remaining
/// transition state becomes its own edge, so two transition states joining
/// the same pair of equilibria give two parallel edges. Nodes are the
/// equilibria referenced by at least one edge, deduplicated by index, in the
/// order they are first referenced (`from` before `to`).
///
/// # Errors
///
/// - [`Error::UnexpectedKind`] if a point is in the wrong list.
/// - [`Error::DuplicatePoint`] if two points of one kind share an index.
/// - [`Error::UnknownEquilibrium`] if an endpoint names an unparsed equilibrium.
/// - [`Error::AtomCountMismatch`] if a transition state and an endpoint differ in atom count.
pub fn assemble<'a>(
    equilibria: &'a [StationaryPoint],
    transitions: &'a [StationaryPoint],
) -> Result<ReactionNetwork<'a>, Error> {
    let mut by_index: HashMap<u32, &'a StationaryPoint> = HashMap::with_capacity(equilibria.len());
    for eq in equilibria {
        expect_kind(eq, PointKind::Eq)?;
        if by_index.insert(eq.id.index, eq).is_some() {
            return Err(Error::DuplicatePoint(eq.id));
        }
    }

    let mut seen_transitions = HashSet::with_capacity(transitions.len());
    let mut seen_nodes = HashSet::new();
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut dropped = 0usize;

    for ts in transitions {
        expect_kind(ts, PointKind::Ts)?;
        if !seen_transitions.insert(ts.id) {
            return Err(Error::DuplicatePoint(ts.id));
        }

        let endpoints = ts
            .connection
            .and_then(|c| c.from.equilibrium().zip(c.to.equilibrium()));
        let Some((from, to)) = endpoints else {
            trace!(point = %ts.id, "dropping transition state with unresolved endpoint");
            dropped += 1;
            continue;
        };

        let from = resolve(ts, from, &by_index)?;
        let to = resolve(ts, to, &by_index)?;

        for endpoint in [from, to] {
            if seen_nodes.insert(endpoint.id) {
                nodes.push(endpoint);
            }
        }
        edges.push(Transition { point: ts, from, to });
    }

    debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        dropped,
        "assembled reaction network"
    );
    Ok(ReactionNetwork::from_parts(nodes, edges))
}

fn expect_kind(point: &StationaryPoint, expected: PointKind) -> Result<(), Error> {
    if point.kind() == expected {
        Ok(())
    } else {
        Err(Error::UnexpectedKind {
            point: point.id,
            expected,
        })
    }
}

fn resolve<'a>(
    ts: &StationaryPoint,
    index: u32,
    by_index: &HashMap<u32, &'a StationaryPoint>,
) -> Result<&'a StationaryPoint, Error> {
    let eq = by_index
        .get(&index)
        .copied()
        .ok_or(Error::UnknownEquilibrium {
            transition: ts.id,
            reference: PointId::equilibrium(index),
        })?;
    if eq.n_atoms() != ts.n_atoms() {
        return Err(Error::AtomCountMismatch {
            transition: ts.id,
            equilibrium: eq.id,
            expected: eq.n_atoms(),
            found: ts.n_atoms(),
        });
    }
    Ok(eq)
}
