//! Two-level layout: nodes sharing a species signature sit on a local circle,
//! and the circles are placed by a force-directed layout of the cluster graph.

use std::collections::{BTreeMap, HashMap};
use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::config::LayoutConfig;
use super::error::Error;
use crate::model::layout::{ClusterPlacement, Layout};
use crate::model::network::ReactionNetwork;
use crate::model::point::{Composition, PointId};

/// Minimum pair distance used in the force computation.
const MIN_DISTANCE: f64 = 0.01;
/// Mean per-node displacement below which the force iteration stops early.
const CONVERGENCE: f64 = 1e-4;

struct Cluster {
    signature: String,
    fragments: Vec<Composition>,
    composition_key: Vec<Composition>,
    members: Vec<PointId>,
}

/// Computes 2-D positions for every node of `network`.
///
/// # Errors
///
/// Returns [`Error::IdentityUnavailable`] if a node has no species identity.
pub fn layout(network: &ReactionNetwork<'_>, config: &LayoutConfig) -> Result<Layout, Error> {
    let clusters = group_by_signature(network)?;
    if clusters.is_empty() {
        return Ok(Layout::default());
    }

    let weights = cluster_weights(&clusters, config);
    let centers = place_clusters(&weights, config);

    let mut positions = BTreeMap::new();
    let mut placements = Vec::with_capacity(clusters.len());
    for (cluster, center) in clusters.into_iter().zip(centers) {
        let (radius, offsets) = circle_offsets(cluster.members.len(), config.local_spacing);
        for (id, [dx, dy]) in cluster.members.iter().zip(offsets) {
            positions.insert(*id, [center[0] + dx, center[1] + dy]);
        }
        placements.push(ClusterPlacement {
            signature: cluster.signature,
            fragments: cluster.fragments,
            center,
            radius,
            members: cluster.members,
        });
    }

    debug!(
        nodes = positions.len(),
        clusters = placements.len(),
        "computed clustered layout"
    );
    Ok(Layout::from_clusters(placements, positions))
}

/// Clusters in order of first appearance among the network nodes.
fn group_by_signature(network: &ReactionNetwork<'_>) -> Result<Vec<Cluster>, Error> {
    let mut clusters: Vec<Cluster> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for node in network.nodes() {
        let identity = node.identity()?;
        match index.get(identity.signature.as_str()) {
            Some(&i) => clusters[i].members.push(node.id),
            None => {
                index.insert(identity.signature.as_str(), clusters.len());
                clusters.push(Cluster {
                    signature: identity.signature.clone(),
                    fragments: identity.fragments.clone(),
                    composition_key: identity.composition_key(),
                    members: vec![node.id],
                });
            }
        }
    }
    Ok(clusters)
}

/// Radius and per-member offsets of a `k`-member circle.
///
/// The radius grows as `spacing * sqrt(k - 1)`, so a single member sits on
/// the cluster center.
pub(crate) fn circle_offsets(k: usize, spacing: f64) -> (f64, Vec<[f64; 2]>) {
    let radius = spacing * (k.saturating_sub(1) as f64).sqrt();
    let offsets = (0..k)
        .map(|i| {
            let angle = TAU * i as f64 / k as f64;
            [radius * angle.cos(), radius * angle.sin()]
        })
        .collect();
    (radius, offsets)
}

/// Complete weighted cluster graph as a dense symmetric matrix.
fn cluster_weights(clusters: &[Cluster], config: &LayoutConfig) -> Vec<Vec<f64>> {
    let c = clusters.len();
    let mut weights = vec![vec![0.0; c]; c];
    for i in 0..c {
        for j in (i + 1)..c {
            let w = if clusters[i].composition_key == clusters[j].composition_key {
                config.related_weight
            } else {
                config.baseline_weight
            };
            weights[i][j] = w;
            weights[j][i] = w;
        }
    }
    weights
}

/// Fruchterman-Reingold placement of the cluster centers, rescaled so the
/// largest coordinate magnitude is `global_spacing * sqrt(c - 1)`.
fn place_clusters(weights: &[Vec<f64>], config: &LayoutConfig) -> Vec<[f64; 2]> {
    let c = weights.len();
    if c <= 1 {
        return vec![[0.0, 0.0]; c];
    }

    let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or(LayoutConfig::DEFAULT_SEED));
    let mut pos: Vec<[f64; 2]> = (0..c).map(|_| [rng.random(), rng.random()]).collect();

    let optimal = (1.0 / c as f64).sqrt();
    let mut temperature = 0.1 * spread(&pos);
    let cooling = temperature / (config.iterations as f64 + 1.0);

    for _ in 0..config.iterations {
        let mut displacement = vec![[0.0f64; 2]; c];
        for i in 0..c {
            for j in 0..c {
                if i == j {
                    continue;
                }
                let delta = [pos[i][0] - pos[j][0], pos[i][1] - pos[j][1]];
                let distance = delta[0].hypot(delta[1]).max(MIN_DISTANCE);
                let force = optimal * optimal / (distance * distance)
                    - weights[i][j] * distance / optimal;
                displacement[i][0] += delta[0] * force;
                displacement[i][1] += delta[1] * force;
            }
        }

        let mut moved = 0.0;
        for (p, d) in pos.iter_mut().zip(&displacement) {
            let mut length = d[0].hypot(d[1]);
            if length < MIN_DISTANCE {
                length = 0.1;
            }
            let step = [d[0] * temperature / length, d[1] * temperature / length];
            p[0] += step[0];
            p[1] += step[1];
            moved += step[0] * step[0] + step[1] * step[1];
        }
        temperature -= cooling;
        if moved.sqrt() / (c as f64) < CONVERGENCE {
            break;
        }
    }

    rescale(&mut pos, config.global_spacing * ((c - 1) as f64).sqrt());
    pos
}

/// Largest extent of the point cloud along either axis.
fn spread(pos: &[[f64; 2]]) -> f64 {
    let extent = |axis: usize| {
        let (lo, hi) = pos.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p[axis]), hi.max(p[axis]))
        });
        hi - lo
    };
    extent(0).max(extent(1))
}

/// Centers the cloud on the origin and scales its largest coordinate magnitude to `scale`.
fn rescale(pos: &mut [[f64; 2]], scale: f64) {
    let n = pos.len() as f64;
    let mean = pos
        .iter()
        .fold([0.0, 0.0], |acc, p| [acc[0] + p[0] / n, acc[1] + p[1] / n]);
    for p in pos.iter_mut() {
        p[0] -= mean[0];
        p[1] -= mean[1];
    }
    let limit = pos
        .iter()
        .flat_map(|p| [p[0].abs(), p[1].abs()])
        .fold(0.0, f64::max);
    if limit > 0.0 {
        for p in pos.iter_mut() {
            p[0] *= scale / limit;
            p[1] *= scale / limit;
        }
    }
}
