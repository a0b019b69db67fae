//! Canonical labelling and line notation for connected bonded fragments.
//!
//! Labelling follows the individualization-refinement scheme: the vertex
//! partition is refined by iterated neighbourhood colouring until stable,
//! then every vertex of the first non-singleton cell is individualized in
//! turn and the search recurses. Each discrete leaf partition is a candidate
//! labelling; the one whose relabelled graph is lexicographically smallest
//! wins. Because the search visits every branch (only twin vertices, whose
//! swap is an automorphism, are skipped), the winner does not depend on the
//! input atom order.
//!
//! The line notation is written from the winning labelling with a two-pass
//! depth-first traversal: the first pass finds the spanning tree and the ring
//! closure bonds, the second writes atoms, ring digits and branches.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::types::{BondOrder, Element};

/// A labelled graph with vertices numbered `0..len`.
#[derive(Debug, Clone)]
pub(crate) struct Fragment {
    labels: Vec<Element>,
    /// Neighbours of every vertex, sorted by vertex index.
    adjacency: Vec<Vec<(usize, BondOrder)>>,
    bonds: Vec<(usize, usize, BondOrder)>,
}

impl Fragment {
    pub(crate) fn new(labels: Vec<Element>, bonds: Vec<(usize, usize, BondOrder)>) -> Self {
        let mut adjacency = vec![Vec::new(); labels.len()];
        for &(a, b, order) in &bonds {
            adjacency[a].push((b, order));
            adjacency[b].push((a, order));
        }
        for neighbours in &mut adjacency {
            neighbours.sort_unstable();
        }
        Self {
            labels,
            adjacency,
            bonds,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.labels.len()
    }

    /// Same element and same labelled neighbourhood.
    fn are_twins(&self, u: usize, v: usize) -> bool {
        self.labels[u] == self.labels[v] && self.adjacency[u] == self.adjacency[v]
    }
}

/// `colours[v]` is the position of the first vertex of `v`'s cell in the
/// ordered partition, so cells are numbered by where they start.
type Colouring = Vec<usize>;

/// Relabelled graph: element numbers by rank, then sorted `(rank, rank, order)` edges.
type Certificate = (Vec<u8>, Vec<(usize, usize, u8)>);

/// Canonical rank of every vertex; a permutation of `0..len`.
pub(crate) fn canonical_ranks(fragment: &Fragment) -> Vec<usize> {
    let mut search = Search {
        fragment,
        best: None,
    };
    search.descend(initial_colouring(fragment));
    search.best.map(|(_, ranks)| ranks).unwrap_or_default()
}

/// Canonical line notation of a connected fragment.
pub(crate) fn line_notation(fragment: &Fragment) -> String {
    let ranks = canonical_ranks(fragment);
    let Some(root) = ranks.iter().position(|&r| r == 0) else {
        return String::new();
    };

    let neighbours: Vec<Vec<(usize, BondOrder)>> = fragment
        .adjacency
        .iter()
        .map(|around| {
            let mut around = around.clone();
            around.sort_unstable_by_key(|&(u, _)| ranks[u]);
            around
        })
        .collect();

    let mut tree = Traversal::new(fragment.len());
    tree.explore(root, None, &neighbours);

    let mut writer = Writer {
        fragment,
        tree: &tree,
        out: String::new(),
        digits: RingDigits::default(),
    };
    writer.write(root);
    writer.out
}

fn ranked<K: Ord>(mut keyed: Vec<(K, usize)>) -> (Colouring, usize) {
    keyed.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    let mut colours = vec![0; keyed.len()];
    let mut cells = 0;
    let mut start = 0;
    for (i, (key, v)) in keyed.iter().enumerate() {
        if i == 0 || *key != keyed[i - 1].0 {
            start = i;
            cells += 1;
        }
        colours[*v] = start;
    }
    (colours, cells)
}

fn initial_colouring(fragment: &Fragment) -> Colouring {
    let keyed = (0..fragment.len())
        .map(|v| (fragment.labels[v], v))
        .collect();
    ranked(keyed).0
}

fn refine(fragment: &Fragment, mut colours: Colouring) -> Colouring {
    let mut cells = colours.iter().collect::<BTreeSet<_>>().len();
    loop {
        let keyed = (0..fragment.len())
            .map(|v| {
                let mut around: Vec<(usize, u8)> = fragment.adjacency[v]
                    .iter()
                    .map(|&(u, order)| (colours[u], order.value()))
                    .collect();
                around.sort_unstable();
                ((colours[v], around), v)
            })
            .collect();
        let (next, next_cells) = ranked(keyed);
        colours = next;
        if next_cells == cells {
            return colours;
        }
        cells = next_cells;
    }
}

/// First cell (by position) holding more than one vertex.
fn target_cell(colours: &[usize]) -> Option<usize> {
    let mut sizes = vec![0usize; colours.len()];
    for &c in colours {
        sizes[c] += 1;
    }
    sizes.iter().position(|&size| size > 1)
}

fn certificate(fragment: &Fragment, ranks: &[usize]) -> Certificate {
    let mut atoms = vec![0u8; fragment.len()];
    for (v, &rank) in ranks.iter().enumerate() {
        atoms[rank] = fragment.labels[v].atomic_number();
    }
    let mut edges: Vec<(usize, usize, u8)> = fragment
        .bonds
        .iter()
        .map(|&(a, b, order)| {
            let (x, y) = (ranks[a], ranks[b]);
            (x.min(y), x.max(y), order.value())
        })
        .collect();
    edges.sort_unstable();
    (atoms, edges)
}

struct Search<'f> {
    fragment: &'f Fragment,
    best: Option<(Certificate, Colouring)>,
}

impl Search<'_> {
    fn descend(&mut self, colours: Colouring) {
        let colours = refine(self.fragment, colours);

        let Some(cell) = target_cell(&colours) else {
            let leaf = certificate(self.fragment, &colours);
            if self.best.as_ref().is_none_or(|(best, _)| leaf < *best) {
                self.best = Some((leaf, colours));
            }
            return;
        };

        let members: Vec<usize> = (0..colours.len()).filter(|&v| colours[v] == cell).collect();
        let mut explored: Vec<usize> = Vec::with_capacity(members.len());
        for &v in &members {
            if explored.iter().any(|&u| self.fragment.are_twins(u, v)) {
                continue;
            }
            explored.push(v);

            let mut next = colours.clone();
            for &u in &members {
                if u != v {
                    next[u] = cell + 1;
                }
            }
            self.descend(next);
        }
    }
}

/// Spanning tree and ring closures of a depth-first traversal.
struct Traversal {
    visited: Vec<bool>,
    children: Vec<Vec<(usize, BondOrder)>>,
    /// Ring bonds opened at a vertex: (partner, order), in discovery order.
    openings: Vec<Vec<(usize, BondOrder)>>,
    /// Ring bonds closed at a vertex: the ancestor that opened them.
    closings: Vec<Vec<usize>>,
    ring_bonds: BTreeSet<(usize, usize)>,
}

impl Traversal {
    fn new(len: usize) -> Self {
        Self {
            visited: vec![false; len],
            children: vec![Vec::new(); len],
            openings: vec![Vec::new(); len],
            closings: vec![Vec::new(); len],
            ring_bonds: BTreeSet::new(),
        }
    }

    fn explore(&mut self, v: usize, parent: Option<usize>, neighbours: &[Vec<(usize, BondOrder)>]) {
        self.visited[v] = true;
        for &(u, order) in &neighbours[v] {
            if Some(u) == parent {
                continue;
            }
            if !self.visited[u] {
                self.children[v].push((u, order));
                self.explore(u, Some(v), neighbours);
            } else if self.ring_bonds.insert((u.min(v), u.max(v))) {
                self.openings[u].push((v, order));
                self.closings[v].push(u);
            }
        }
    }
}

#[derive(Default)]
struct RingDigits {
    in_use: BTreeSet<usize>,
    assigned: BTreeMap<(usize, usize), usize>,
}

impl RingDigits {
    fn open(&mut self, a: usize, b: usize) -> usize {
        let digit = (1..)
            .find(|d| !self.in_use.contains(d))
            .unwrap_or_default();
        self.in_use.insert(digit);
        self.assigned.insert((a.min(b), a.max(b)), digit);
        digit
    }

    fn close(&mut self, a: usize, b: usize) -> Option<usize> {
        let digit = self.assigned.remove(&(a.min(b), a.max(b)))?;
        self.in_use.remove(&digit);
        Some(digit)
    }
}

struct Writer<'a> {
    fragment: &'a Fragment,
    tree: &'a Traversal,
    out: String,
    digits: RingDigits,
}

impl Writer<'_> {
    fn write(&mut self, v: usize) {
        let tree = self.tree;
        let element = self.fragment.labels[v];
        if element.is_organic_subset() {
            self.out.push_str(element.symbol());
        } else {
            self.out.push('[');
            self.out.push_str(element.symbol());
            self.out.push(']');
        }

        for &ancestor in &tree.closings[v] {
            if let Some(digit) = self.digits.close(ancestor, v) {
                push_digit(&mut self.out, digit);
            }
        }
        for &(partner, order) in &tree.openings[v] {
            let digit = self.digits.open(v, partner);
            self.out.push_str(order.line_symbol());
            push_digit(&mut self.out, digit);
        }

        let children = &tree.children[v];
        for (i, &(child, order)) in children.iter().enumerate() {
            let branch = i + 1 < children.len();
            if branch {
                self.out.push('(');
            }
            self.out.push_str(order.line_symbol());
            self.write(child);
            if branch {
                self.out.push(')');
            }
        }
    }
}

fn push_digit(out: &mut String, digit: usize) {
    if digit < 10 {
        out.push_str(&digit.to_string());
    } else {
        out.push_str(&format!("%{digit}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BondOrder::{Double, Single, Triple};
    use Element::{C, H, N, O};

    fn notation(labels: &[Element], bonds: &[(usize, usize, BondOrder)]) -> String {
        line_notation(&Fragment::new(labels.to_vec(), bonds.to_vec()))
    }

    /// Applies `perm` (old index -> new index) to a labelled graph.
    fn permuted(
        labels: &[Element],
        bonds: &[(usize, usize, BondOrder)],
        perm: &[usize],
    ) -> (Vec<Element>, Vec<(usize, usize, BondOrder)>) {
        let mut relabelled = vec![H; labels.len()];
        for (old, &new) in perm.iter().enumerate() {
            relabelled[new] = labels[old];
        }
        let bonds = bonds
            .iter()
            .map(|&(a, b, o)| (perm[a], perm[b], o))
            .collect();
        (relabelled, bonds)
    }

    #[test]
    fn vinyl_cyanide_fragment_notation() {
        let labels = [C, H, H, C, N];
        let bonds = [(0, 1, Single), (0, 2, Single), (0, 3, Double), (3, 4, Triple)];
        assert_eq!(notation(&labels, &bonds), "[H]C([H])=C#N");
    }

    #[test]
    fn single_atom_and_brackets() {
        assert_eq!(notation(&[H], &[]), "[H]");
        assert_eq!(notation(&[C], &[]), "C");
        assert_eq!(notation(&[Element::Fe], &[]), "[Fe]");
        assert_eq!(notation(&[H, H], &[(0, 1, Single)]), "[H][H]");
    }

    #[test]
    fn ring_closure_digits() {
        let ring = [(0, 1, Single), (1, 2, Single), (2, 0, Single)];
        assert_eq!(notation(&[C, C, C], &ring), "C1CC1");
    }

    #[test]
    fn ring_bond_order_is_written_at_opening() {
        let ring = [(0, 1, Single), (1, 2, Single), (2, 0, Double)];
        let text = notation(&[C, C, C], &ring);
        assert_eq!(text.matches('=').count(), 1);
        assert_eq!(text.matches('1').count(), 2);
    }

    #[test]
    fn notation_is_independent_of_atom_order() {
        // Ethanol: C0 C1 O2 and six hydrogens.
        let labels = [C, C, O, H, H, H, H, H, H];
        let bonds = [
            (0, 1, Single),
            (1, 2, Single),
            (0, 3, Single),
            (0, 4, Single),
            (0, 5, Single),
            (1, 6, Single),
            (1, 7, Single),
            (2, 8, Single),
        ];
        let reference = notation(&labels, &bonds);
        let perm = [8, 2, 5, 0, 7, 3, 1, 6, 4];
        let (l, b) = permuted(&labels, &bonds, &perm);
        assert_eq!(notation(&l, &b), reference);
    }

    #[test]
    fn distinguishes_constitutional_isomers() {
        let ethanol = notation(
            &[C, C, O, H, H, H, H, H, H],
            &[
                (0, 1, Single),
                (1, 2, Single),
                (0, 3, Single),
                (0, 4, Single),
                (0, 5, Single),
                (1, 6, Single),
                (1, 7, Single),
                (2, 8, Single),
            ],
        );
        let dimethyl_ether = notation(
            &[C, O, C, H, H, H, H, H, H],
            &[
                (0, 1, Single),
                (1, 2, Single),
                (0, 3, Single),
                (0, 4, Single),
                (0, 5, Single),
                (2, 6, Single),
                (2, 7, Single),
                (2, 8, Single),
            ],
        );
        assert_ne!(ethanol, dimethyl_ether);
    }

    #[test]
    fn distinguishes_bond_orders() {
        let single = notation(&[C, C], &[(0, 1, Single)]);
        let double = notation(&[C, C], &[(0, 1, Double)]);
        assert_eq!(single, "CC");
        assert_eq!(double, "C=C");
    }

    #[test]
    fn symmetric_ring_is_stable_under_rotation() {
        // Kekulé benzene carbon skeleton.
        let labels = [C; 6];
        let bonds: Vec<_> = (0..6)
            .map(|i| (i, (i + 1) % 6, if i % 2 == 0 { Double } else { Single }))
            .collect();
        let reference = notation(&labels, &bonds);
        for shift in 1..6 {
            let perm: Vec<usize> = (0..6).map(|i| (i + shift) % 6).collect();
            let (l, b) = permuted(&labels, &bonds, &perm);
            assert_eq!(notation(&l, &b), reference);
        }
    }

    #[test]
    fn ranks_form_a_permutation() {
        let fragment = Fragment::new(
            vec![C, H, H, H, H],
            vec![(0, 1, Single), (0, 2, Single), (0, 3, Single), (0, 4, Single)],
        );
        let mut ranks = canonical_ranks(&fragment);
        ranks.sort_unstable();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4]);
    }
}
