//! Stationary-point record grammar.
//!
//! A record block is read as a flat whitespace-separated token stream. Each
//! section is anchored on a keyword located by value, so arbitrary prefix
//! tokens (comment markers, program banners) are tolerated, and a fixed
//! number of tokens is then read relative to that keyword:
//!
//! ```text
//! # Geometry of EQ 0, SYMMETRY = C2v
//! C    -0.000112000000    1.198714000000    0.000000000000
//! ...
//! Energy    = -132.055704962587 (-132.055704962587 :    0.000000000000)
//! Spin(**2) =    0.770506670235
//! ZPVE      =    0.031274079270
//! Normal mode eigenvalues : nmode = 9
//!   0.005453116   0.006931664   ...
//! CONNECTION : 0 - DC
//! ```
//!
//! The `CONNECTION` section is read only for transition-state blocks.

use super::error::Error;
use crate::model::atom::Atom;
use crate::model::point::{Connection, Endpoint, PointId, PointKind, StationaryPoint};
use crate::model::types::Element;

const GEOMETRY: &str = "Geometry";
const SYMMETRY: &str = "SYMMETRY";
const ENERGY: &str = "Energy";
const SPIN: &str = "Spin(**2)";
const ZPVE: &str = "ZPVE";
const NMODE: &str = "nmode";
const CONNECTION: &str = "CONNECTION";

const UNRESOLVED: &str = "DC";

/// Tokens per atom record: symbol, x, y, z.
const ATOM_RECORD_TOKENS: usize = 4;

/// Parses one record block into a [`StationaryPoint`] of the given kind.
///
/// The returned point carries geometry and scalar properties only; bonds and
/// species identity are attached later by the perception stage.
///
/// # Errors
///
/// Returns [`Error::Parse`] when a keyword is missing, a numeric field does
/// not parse, the coordinate section is empty or not a whole number of atom
/// records, an element symbol is unknown, or the header names the wrong kind.
pub fn parse_block(text: &str, kind: PointKind) -> Result<StationaryPoint, Error> {
    let tokens = Tokens::new(text, kind);

    let id = header_id(&tokens)?;
    let symmetry = tokens.after(SYMMETRY, 2)?.to_string();
    let atoms = atom_records(&tokens)?;
    let (energy, energy_components) = energy_section(&tokens)?;
    let spin = tokens.float_after(SPIN, 2)?;
    let zpve = tokens.float_after(ZPVE, 2)?;
    let eigenvalues = normal_modes(&tokens)?;
    let connection = match kind {
        PointKind::Eq => None,
        PointKind::Ts => Some(connection_section(&tokens)?),
    };

    let mut point = StationaryPoint::new(id, atoms);
    point.symmetry = symmetry;
    point.energy = energy;
    point.energy_components = energy_components;
    point.spin = spin;
    point.zpve = zpve;
    point.eigenvalues = eigenvalues;
    point.connection = connection;
    Ok(point)
}

struct Tokens<'a> {
    tokens: Vec<&'a str>,
    kind: PointKind,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str, kind: PointKind) -> Self {
        Self {
            tokens: text.split_whitespace().collect(),
            kind,
        }
    }

    fn error(&self, details: impl Into<String>) -> Error {
        Error::parse(self.kind, details)
    }

    fn position(&self, keyword: &str) -> Result<usize, Error> {
        self.tokens
            .iter()
            .position(|t| *t == keyword)
            .ok_or_else(|| self.error(format!("missing keyword '{keyword}'")))
    }

    fn get(&self, at: usize, what: &str) -> Result<&'a str, Error> {
        self.tokens
            .get(at)
            .copied()
            .ok_or_else(|| self.error(format!("record ended before {what}")))
    }

    fn after(&self, keyword: &str, offset: usize) -> Result<&'a str, Error> {
        let at = self.position(keyword)? + offset;
        self.get(at, &format!("the value of '{keyword}'"))
    }

    fn float_after(&self, keyword: &str, offset: usize) -> Result<f64, Error> {
        let token = self.after(keyword, offset)?;
        self.float(token, keyword)
    }

    fn float(&self, token: &str, what: &str) -> Result<f64, Error> {
        token
            .parse::<f64>()
            .map_err(|_| self.error(format!("invalid number '{token}' for {what}")))
    }
}

fn header_id(tokens: &Tokens<'_>) -> Result<PointId, Error> {
    let tag = tokens.after(GEOMETRY, 2)?;
    if tag != tokens.kind.tag() {
        return Err(tokens.error(format!(
            "header names a '{tag}' record where {} was expected",
            tokens.kind
        )));
    }

    let raw = tokens.after(GEOMETRY, 3)?;
    let index = raw
        .trim_end_matches(',')
        .parse::<u32>()
        .map_err(|_| tokens.error(format!("invalid point index '{raw}'")))?;
    Ok(PointId::new(tokens.kind, index))
}

fn atom_records(tokens: &Tokens<'_>) -> Result<Vec<Atom>, Error> {
    let start = tokens.position(SYMMETRY)? + 3;
    let end = tokens.position(ENERGY)?;
    let span = end.saturating_sub(start);

    if span == 0 {
        return Err(tokens.error("coordinate section contains no atom records"));
    }
    if span % ATOM_RECORD_TOKENS != 0 {
        return Err(tokens.error(format!(
            "coordinate section spans {span} tokens, not a multiple of {ATOM_RECORD_TOKENS}"
        )));
    }

    tokens.tokens[start..end]
        .chunks_exact(ATOM_RECORD_TOKENS)
        .map(|record| {
            let element = Element::from_symbol_lenient(record[0])
                .map_err(|e| tokens.error(e.to_string()))?;
            let x = tokens.float(record[1], "x coordinate")?;
            let y = tokens.float(record[2], "y coordinate")?;
            let z = tokens.float(record[3], "z coordinate")?;
            Ok(Atom::new(element, [x, y, z]))
        })
        .collect()
}

fn energy_section(tokens: &Tokens<'_>) -> Result<(f64, [f64; 2]), Error> {
    let total = tokens.float_after(ENERGY, 2)?;
    let first = tokens.after(ENERGY, 3)?.trim_start_matches('(');
    let second = tokens.after(ENERGY, 5)?.trim_end_matches(')');
    Ok((
        total,
        [
            tokens.float(first, "energy component")?,
            tokens.float(second, "energy component")?,
        ],
    ))
}

fn normal_modes(tokens: &Tokens<'_>) -> Result<Vec<f64>, Error> {
    let header = tokens.position(NMODE)?;
    let raw = tokens.get(header + 2, "the value of 'nmode'")?;
    let nmode = raw
        .parse::<usize>()
        .map_err(|_| tokens.error(format!("invalid mode count '{raw}'")))?;

    let first = header + 3;
    let Some(values) = tokens.tokens.get(first..).and_then(|rest| rest.get(..nmode)) else {
        return Err(tokens.error(format!(
            "expected {nmode} eigenvalues, found {}",
            tokens.tokens.len().saturating_sub(first)
        )));
    };

    values.iter().map(|t| tokens.float(t, "eigenvalue")).collect()
}

fn connection_section(tokens: &Tokens<'_>) -> Result<Connection, Error> {
    let from = endpoint(tokens, tokens.after(CONNECTION, 2)?)?;
    let to = endpoint(tokens, tokens.after(CONNECTION, 4)?)?;
    Ok(Connection::new(from, to))
}

fn endpoint(tokens: &Tokens<'_>, raw: &str) -> Result<Endpoint, Error> {
    if raw == UNRESOLVED {
        return Ok(Endpoint::Unresolved);
    }
    raw.parse::<u32>()
        .map(Endpoint::Equilibrium)
        .map_err(|_| tokens.error(format!("invalid connection endpoint '{raw}'")))
}
