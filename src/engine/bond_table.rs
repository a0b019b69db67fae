use super::error::Error;
use crate::model::types::{BondOrder, Element};
use serde::Deserialize;
use std::sync::OnceLock;

const DEFAULT_TABLE_TOML: &str = include_str!("../../resources/bond_lengths.toml");

static DEFAULT_TABLE: OnceLock<BondTable> = OnceLock::new();

/// One bond-length table record as written on disk.
#[derive(Debug, Clone, Deserialize)]
struct RawBondRecord {
    elements: [String; 2],
    length: f64,
    bond_order: u8,
}

#[derive(Debug, Deserialize)]
struct TomlBondTable {
    #[serde(default)]
    bond: Vec<RawBondRecord>,
}

/// Reference length for one unordered element pair at one bond order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondReference {
    /// The element pair, lower atomic number first.
    pub elements: (Element, Element),
    /// Reference length in Angstrom.
    pub length: f64,
    pub order: BondOrder,
}

impl BondReference {
    pub fn new(a: Element, b: Element, length: f64, order: BondOrder) -> Self {
        Self {
            elements: if a <= b { (a, b) } else { (b, a) },
            length,
            order,
        }
    }

    #[inline]
    pub fn matches(&self, a: Element, b: Element) -> bool {
        let pair = if a <= b { (a, b) } else { (b, a) };
        self.elements == pair
    }
}

/// Bond-length references sorted by ascending length.
///
/// The ordering is what makes first-match lookup prefer the shorter,
/// higher-order reference for a pair; it is established on construction and
/// never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct BondTable {
    entries: Vec<BondReference>,
}

impl BondTable {
    /// Builds a table from references in any order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyBondTable`] for an empty list and
    /// [`Error::InvalidBondTableEntry`] for a non-positive or non-finite length.
    pub fn new(mut entries: Vec<BondReference>) -> Result<Self, Error> {
        if entries.is_empty() {
            return Err(Error::EmptyBondTable);
        }
        for (index, entry) in entries.iter().enumerate() {
            if !(entry.length.is_finite() && entry.length > 0.0) {
                return Err(Error::invalid_entry(
                    index,
                    format!("length {} is not a positive distance", entry.length),
                ));
            }
        }
        entries.sort_by(|a, b| a.length.total_cmp(&b.length));
        Ok(Self { entries })
    }

    /// Parses a table from TOML with one `[[bond]]` table per record.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        let raw: TomlBondTable = toml::from_str(text)?;
        Self::from_raw(raw.bond)
    }

    /// Parses a table from a JSON array of
    /// `{"elements": [a, b], "length": l, "bond_order": n}` records.
    pub fn from_json_str(text: &str) -> Result<Self, Error> {
        let raw: Vec<RawBondRecord> = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    fn from_raw(records: Vec<RawBondRecord>) -> Result<Self, Error> {
        let entries = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                let [a, b] = &record.elements;
                let a = Element::from_symbol_lenient(a)
                    .map_err(|e| Error::invalid_entry(index, e.to_string()))?;
                let b = Element::from_symbol_lenient(b)
                    .map_err(|e| Error::invalid_entry(index, e.to_string()))?;
                let order = BondOrder::try_from(record.bond_order)
                    .map_err(|e| Error::invalid_entry(index, e.to_string()))?;
                Ok(BondReference::new(a, b, record.length, order))
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Self::new(entries)
    }

    /// The embedded default table, parsed on first use.
    pub fn builtin() -> &'static BondTable {
        DEFAULT_TABLE.get_or_init(|| {
            BondTable::from_toml_str(DEFAULT_TABLE_TOML)
                .expect("Failed to parse embedded bond-length table. This is a library bug.")
        })
    }

    pub fn entries(&self) -> &[BondReference] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; an empty table cannot be constructed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First reference (in ascending length) for the pair whose length times
    /// `tolerance` still covers `distance`.
    pub fn classify(
        &self,
        a: Element,
        b: Element,
        distance: f64,
        tolerance: f64,
    ) -> Option<BondOrder> {
        self.entries
            .iter()
            .find(|entry| entry.matches(a, b) && distance <= entry.length * tolerance)
            .map(|entry| entry.order)
    }
}

/// Resolves a custom table source, or falls back to the embedded default.
pub fn load_table(custom: Option<&super::config::BondTableSource>) -> Result<BondTable, Error> {
    use super::config::BondTableSource;
    match custom {
        Some(BondTableSource::Toml(text)) => BondTable::from_toml_str(text),
        Some(BondTableSource::Json(text)) => BondTable::from_json_str(text),
        None => Ok(BondTable::builtin().clone()),
    }
}
