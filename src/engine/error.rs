//! Error types for perception, assembly and layout.
//!
//! Parsing failures come from [`crate::io`] and are wrapped here so that the
//! one-call pipeline has a single error type. Configuration problems (the
//! bond-length table, the tolerance factor) and inconsistencies between
//! transition states and the equilibria they reference are reported directly.

use thiserror::Error;

use crate::model::point::{IdentityUnavailable, PointId, PointKind};

/// Errors that can occur while building a reaction atlas.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to parse a bond-length table given as TOML.
    #[error("failed to parse bond-length table: {0}")]
    BondTableParse(#[from] toml::de::Error),

    /// Failed to parse a bond-length table given as JSON.
    #[error("failed to parse bond-length table JSON: {0}")]
    BondTableJson(#[from] serde_json::Error),

    /// The bond-length table has no entries, so no bond could ever be inferred.
    #[error("bond-length table contains no entries")]
    EmptyBondTable,

    /// A table entry names an unknown element, a non-positive length or an
    /// unsupported bond order.
    #[error("invalid bond-length table entry {index}: {detail}")]
    InvalidBondTableEntry {
        /// Position of the entry in the table as written.
        index: usize,
        /// Description of the problem.
        detail: String,
    },

    /// The distance tolerance factor is not a positive finite number.
    #[error("bond tolerance must be a positive finite factor, got {0}")]
    InvalidTolerance(f64),

    /// A species identity was requested before bond perception ran.
    #[error(transparent)]
    IdentityUnavailable(#[from] IdentityUnavailable),

    /// A transition state names an equilibrium index that was never parsed.
    #[error("{transition} references {reference}, which is not among the parsed equilibria")]
    UnknownEquilibrium {
        transition: PointId,
        reference: PointId,
    },

    /// A transition state and one of its endpoints disagree on the atom count.
    #[error("{transition} has {found} atoms but its endpoint {equilibrium} has {expected}")]
    AtomCountMismatch {
        transition: PointId,
        equilibrium: PointId,
        expected: usize,
        found: usize,
    },

    /// Two parsed points share the same id.
    #[error("stationary point {0} appears more than once")]
    DuplicatePoint(PointId),

    /// A point was passed where the other kind was expected.
    #[error("{point} was given where a {expected} point was expected")]
    UnexpectedKind { point: PointId, expected: PointKind },

    /// Reading or parsing a stationary-point log failed.
    #[error(transparent)]
    Io(#[from] crate::io::Error),
}

impl Error {
    /// Creates an [`InvalidBondTableEntry`](Error::InvalidBondTableEntry) error.
    pub fn invalid_entry(index: usize, details: impl Into<String>) -> Self {
        Self::InvalidBondTableEntry {
            index,
            detail: details.into(),
        }
    }
}
