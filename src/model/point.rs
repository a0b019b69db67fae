use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use super::atom::Atom;
use super::types::{BondOrder, Element};

/// Which family of stationary point a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PointKind {
    /// Equilibrium structure (local minimum).
    Eq,
    /// Transition state (first-order saddle point).
    Ts,
}

impl PointKind {
    pub fn tag(&self) -> &'static str {
        match self {
            PointKind::Eq => "EQ",
            PointKind::Ts => "TS",
        }
    }
}

impl fmt::Display for PointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Stable name of a stationary point, e.g. `EQ17` or `TS4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId {
    pub kind: PointKind,
    pub index: u32,
}

impl PointId {
    pub fn new(kind: PointKind, index: u32) -> Self {
        Self { kind, index }
    }

    pub fn equilibrium(index: u32) -> Self {
        Self::new(PointKind::Eq, index)
    }

    pub fn transition(index: u32) -> Self {
        Self::new(PointKind::Ts, index)
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.index)
    }
}

/// One side of a transition state's reaction path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// The path relaxes into the equilibrium with this index.
    Equilibrium(u32),
    /// The path trails off without reaching a characterized equilibrium (`DC`).
    Unresolved,
}

impl Endpoint {
    pub fn equilibrium(&self) -> Option<u32> {
        match self {
            Endpoint::Equilibrium(index) => Some(*index),
            Endpoint::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Endpoint::Equilibrium(_))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Equilibrium(index) => write!(f, "{}", PointId::equilibrium(*index)),
            Endpoint::Unresolved => f.write_str("DC"),
        }
    }
}

/// Endpoints of a transition state, as named in its `CONNECTION` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    pub from: Endpoint,
    pub to: Endpoint,
}

impl Connection {
    pub fn new(from: Endpoint, to: Endpoint) -> Self {
        Self { from, to }
    }

    pub fn is_dangling(&self) -> bool {
        !self.from.is_resolved() || !self.to.is_resolved()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(idx1: usize, idx2: usize, order: BondOrder) -> Self {
        if idx1 <= idx2 {
            Self { i: idx1, j: idx2, order }
        } else {
            Self { i: idx2, j: idx1, order }
        }
    }

    /// The atom on the other end of this bond, if `atom` participates in it.
    #[inline]
    pub fn partner_of(&self, atom: usize) -> Option<usize> {
        if self.i == atom {
            Some(self.j)
        } else if self.j == atom {
            Some(self.i)
        } else {
            None
        }
    }
}

/// Element counts of one connected fragment.
pub type Composition = BTreeMap<Element, usize>;

/// Canonical structural identity of a bonded stationary point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpeciesIdentity {
    /// Canonical line notation; equal for isomorphic bonded structures.
    pub signature: String,
    /// Element counts per connected fragment, ordered by each fragment's lowest atom index.
    pub fragments: Vec<Composition>,
}

impl SpeciesIdentity {
    /// Fragment compositions as an order-independent multiset.
    pub fn composition_key(&self) -> Vec<Composition> {
        let mut key = self.fragments.clone();
        key.sort();
        key
    }

    /// Hill-order formula, one term per fragment (e.g. `C2H2N + H`).
    pub fn formula(&self) -> String {
        self.fragments
            .iter()
            .map(hill_formula)
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

fn hill_formula(fragment: &Composition) -> String {
    let mut terms: Vec<(&'static str, usize)> = fragment
        .iter()
        .map(|(element, count)| (element.symbol(), *count))
        .collect();
    if fragment.contains_key(&Element::C) {
        terms.sort_by_key(|(symbol, _)| match *symbol {
            "C" => (0, ""),
            "H" => (1, ""),
            other => (2, other),
        });
    } else {
        terms.sort_by_key(|(symbol, _)| *symbol);
    }
    terms
        .into_iter()
        .map(|(symbol, count)| match count {
            1 => symbol.to_string(),
            n => format!("{symbol}{n}"),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("species identity of {0} requested before bond perception")]
pub struct IdentityUnavailable(pub PointId);

/// A parsed equilibrium or transition-state geometry with its scalar properties.
///
/// Bonds and the species identity start out empty and are attached once by
/// the perception stage; afterwards the point is treated as immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct StationaryPoint {
    pub id: PointId,
    /// Point-group label, passed through verbatim.
    pub symmetry: String,
    pub atoms: Vec<Atom>,
    /// Total electronic energy in Hartree.
    pub energy: f64,
    /// The two bracketed energy components reported next to the total.
    pub energy_components: [f64; 2],
    pub spin: f64,
    pub zpve: f64,
    /// Normal-mode force-constant eigenvalues.
    pub eigenvalues: Vec<f64>,
    /// Present only for transition states.
    pub connection: Option<Connection>,
    bonds: Option<Vec<Bond>>,
    identity: Option<SpeciesIdentity>,
}

impl StationaryPoint {
    pub fn new(id: PointId, atoms: Vec<Atom>) -> Self {
        Self {
            id,
            symmetry: String::new(),
            atoms,
            energy: 0.0,
            energy_components: [0.0; 2],
            spin: 0.0,
            zpve: 0.0,
            eigenvalues: Vec::new(),
            connection: None,
            bonds: None,
            identity: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> PointKind {
        self.id.kind
    }

    #[inline]
    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn nmode(&self) -> usize {
        self.eigenvalues.len()
    }

    #[inline]
    pub fn is_transition_state(&self) -> bool {
        self.connection.is_some()
    }

    /// `true` for a transition state with at least one unresolved endpoint.
    pub fn has_dangling_connection(&self) -> bool {
        self.connection.is_some_and(|c| c.is_dangling())
    }

    /// Inferred bonds, or `None` before bond perception.
    pub fn bonds(&self) -> Option<&[Bond]> {
        self.bonds.as_deref()
    }

    pub fn is_perceived(&self) -> bool {
        self.identity.is_some()
    }

    pub fn identity(&self) -> Result<&SpeciesIdentity, IdentityUnavailable> {
        self.identity.as_ref().ok_or(IdentityUnavailable(self.id))
    }

    pub fn signature(&self) -> Result<&str, IdentityUnavailable> {
        self.identity().map(|identity| identity.signature.as_str())
    }

    pub fn fragment_composition(&self) -> Result<&[Composition], IdentityUnavailable> {
        self.identity().map(|identity| identity.fragments.as_slice())
    }

    /// First bonding partner of `atom` in bond-list order.
    pub fn first_partner(&self, atom: usize) -> Option<usize> {
        self.bonds()?.iter().find_map(|bond| bond.partner_of(atom))
    }

    /// Attaches a freshly inferred bond set; any previous identity is discarded.
    pub(crate) fn with_bonds(mut self, bonds: Vec<Bond>) -> Self {
        debug_assert!(bonds.iter().all(|b| b.i < b.j && b.j < self.atoms.len()));
        self.bonds = Some(bonds);
        self.identity = None;
        self
    }

    pub(crate) fn with_identity(mut self, identity: SpeciesIdentity) -> Self {
        debug_assert!(self.bonds.is_some());
        self.identity = Some(identity);
        self
    }
}

impl fmt::Display for StationaryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
