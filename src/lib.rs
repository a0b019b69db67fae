//! Reaction-network reconstruction from quantum-chemistry reaction-path searches.
//!
//! Equilibrium ("EQ") and transition-state ("TS") geometries are parsed from
//! their record logs, bonded purely from interatomic distances, identified by a
//! canonical structural signature, assembled into a network of equilibria
//! joined by transition states, and laid out in two dimensions with nodes of
//! the same species grouped on a common circle.
//!
//! # Features
//!
//! - **Record parsing** — Keyword-anchored grammar for EQ/TS blocks, tolerant
//!   of prefix tokens, with block-numbered parse errors
//! - **Bond perception** — Distance-based bond and bond-order inference against
//!   a sorted reference-length table (embedded default, or custom TOML/JSON)
//! - **Species identity** — Canonical line notation per connected fragment,
//!   invariant under atom relabelling, plus per-fragment element counts
//! - **Network assembly** — Dangling transition states dropped, equilibria
//!   deduplicated by index, parallel transition states kept as separate edges
//! - **Clustered layout** — Local circles per species, placed by a seeded
//!   force-directed layout of the cluster graph
//!
//! # Quick Start
//!
//! ```
//! use reaction_atlas::{Atlas, AtlasConfig, AtlasError, Atom, Connection, Element};
//! use reaction_atlas::{Endpoint, PointId, StationaryPoint};
//!
//! let h2 = |id, separation| {
//!     StationaryPoint::new(
//!         id,
//!         vec![
//!             Atom::new(Element::H, [0.0, 0.0, 0.0]),
//!             Atom::new(Element::H, [separation, 0.0, 0.0]),
//!         ],
//!     )
//! };
//!
//! // A bound and a dissociated H2, joined by one transition state.
//! let equilibria = vec![h2(PointId::equilibrium(0), 0.74), h2(PointId::equilibrium(1), 4.0)];
//! let mut ts = h2(PointId::transition(0), 1.2);
//! ts.connection = Some(Connection::new(Endpoint::Equilibrium(0), Endpoint::Equilibrium(1)));
//!
//! let atlas = Atlas::build(equilibria, vec![ts], &AtlasConfig::default())?;
//!
//! let network = atlas.network();
//! assert_eq!(network.node_count(), 2);
//! assert_eq!(network.edge_count(), 1);
//!
//! assert_eq!(atlas.equilibria()[0].signature()?, "[H][H]");
//! assert_eq!(atlas.equilibria()[1].signature()?, "[H].[H]");
//!
//! assert_eq!(atlas.layout().clusters().len(), 2);
//! assert!(atlas.layout().position(PointId::equilibrium(1)).is_some());
//! # Ok::<(), AtlasError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`io`] — Record-block grammar and log loading
//! - [`build_atlas`] / [`Atlas`] — One-call pipeline from log text to layout
//! - [`perceive`], [`assemble`], [`layout()`] — The individual pipeline stages
//!
//! # Data Types
//!
//! - [`StationaryPoint`] — Parsed EQ/TS geometry with energies, bonds and identity
//! - [`PointId`] — `EQ17`-style point name
//! - [`Connection`] / [`Endpoint`] — Transition-state endpoints (`DC` = unresolved)
//! - [`SpeciesIdentity`] — Canonical signature and per-fragment composition
//! - [`ReactionNetwork`] / [`Transition`] — Assembled nodes and edges
//! - [`EnergyClass`] — Low/medium/high endpoint energy gap of an edge
//! - [`Layout`] / [`ClusterPlacement`] — Node coordinates and cluster geometry
//!
//! ## Configuration
//!
//! - [`PerceptionConfig`] — Bond-length table source and distance tolerance
//! - [`BondTable`] — Sorted bond-length references
//! - [`LayoutConfig`] — Spacing, cluster-graph weights, iterations and seed
//! - [`AtlasConfig`] — Both of the above for [`build_atlas`]

mod engine;
mod model;

pub mod io;

pub use model::atom::Atom;
pub use model::types::{BondOrder, Element, ParseBondOrderError, ParseElementError};

pub use model::point::{
    Bond, Composition, Connection, Endpoint, IdentityUnavailable, PointId, PointKind,
    SpeciesIdentity, StationaryPoint,
};

pub use model::network::{
    EnergyClass, GraphMode, HARTREE_TO_KCAL_PER_MOL, ReactionNetwork, Transition,
};

pub use model::layout::{ClusterPlacement, Layout};

pub use engine::{
    Atlas, AtlasConfig, BondReference, BondTable, BondTableSource, LayoutConfig,
    PerceptionConfig, assemble, build_atlas, derive_identity, infer_bonds, layout,
    molecular_graph, perceive, perceive_all,
};

pub use engine::Error as AtlasError;
