use tracing::trace;

use super::bond_table::BondTable;
use super::error::Error;
use crate::model::point::{Bond, StationaryPoint};

/// Infers bonds of `point` from interatomic distances alone.
///
/// Every atom pair `x < y` is checked against `table` in ascending reference
/// length; the first reference for the pair's elements whose scaled length
/// `length * tolerance` covers the distance decides the bond order. Pairs no
/// reference covers stay unbonded. The result is ordered by `(x, y)`.
///
/// # Errors
///
/// Returns [`Error::InvalidTolerance`] unless `tolerance` is positive and finite.
pub fn infer_bonds(
    point: &StationaryPoint,
    table: &BondTable,
    tolerance: f64,
) -> Result<Vec<Bond>, Error> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(Error::InvalidTolerance(tolerance));
    }

    let atoms = &point.atoms;
    let mut bonds = Vec::new();
    for (x, a) in atoms.iter().enumerate() {
        for (y, b) in atoms.iter().enumerate().skip(x + 1) {
            let distance = a.distance_to(b);
            if let Some(order) = table.classify(a.element, b.element, distance, tolerance) {
                bonds.push(Bond::new(x, y, order));
            }
        }
    }

    trace!(point = %point.id, bonds = bonds.len(), "inferred bonds");
    Ok(bonds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::bond_table::BondReference;
    use crate::model::atom::Atom;
    use crate::model::point::PointId;
    use crate::model::types::{BondOrder, Element};

    fn point(atoms: Vec<Atom>) -> StationaryPoint {
        StationaryPoint::new(PointId::equilibrium(0), atoms)
    }

    fn carbon_table() -> BondTable {
        BondTable::new(vec![
            BondReference::new(Element::C, Element::C, 1.54, BondOrder::Single),
            BondReference::new(Element::C, Element::C, 1.34, BondOrder::Double),
        ])
        .unwrap()
    }

    #[test]
    fn acetonitrile_like_geometry_gets_expected_bonds() {
        let p = point(vec![
            Atom::new(Element::C, [-0.000112, 1.198714, 0.0]),
            Atom::new(Element::H, [-0.000007, 1.750081, 0.933062]),
            Atom::new(Element::H, [-0.000007, 1.750081, -0.933062]),
            Atom::new(Element::C, [0.0, -0.182179, 0.0]),
            Atom::new(Element::N, [0.000098, -1.371339, 0.0]),
        ]);
        let bonds = infer_bonds(&p, BondTable::builtin(), 1.1).unwrap();
        assert_eq!(
            bonds,
            vec![
                Bond::new(0, 1, BondOrder::Single),
                Bond::new(0, 2, BondOrder::Single),
                Bond::new(0, 3, BondOrder::Double),
                Bond::new(3, 4, BondOrder::Triple),
            ]
        );
    }

    #[test]
    fn double_wins_over_single_when_both_cover_distance() {
        let p = point(vec![
            Atom::new(Element::C, [0.0, 0.0, 0.0]),
            Atom::new(Element::C, [1.34, 0.0, 0.0]),
        ]);
        let bonds = infer_bonds(&p, &carbon_table(), 1.1).unwrap();
        assert_eq!(bonds, vec![Bond::new(0, 1, BondOrder::Double)]);
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        let table = BondTable::new(vec![BondReference::new(
            Element::C,
            Element::C,
            1.5,
            BondOrder::Single,
        )])
        .unwrap();
        let limit = 1.5 * 1.1;
        let at = point(vec![
            Atom::new(Element::C, [0.0; 3]),
            Atom::new(Element::C, [limit, 0.0, 0.0]),
        ]);
        let beyond = point(vec![
            Atom::new(Element::C, [0.0; 3]),
            Atom::new(Element::C, [limit + 1e-9, 0.0, 0.0]),
        ]);
        assert_eq!(infer_bonds(&at, &table, 1.1).unwrap().len(), 1);
        assert!(infer_bonds(&beyond, &table, 1.1).unwrap().is_empty());
    }

    #[test]
    fn unlisted_pairs_stay_unbonded() {
        let p = point(vec![
            Atom::new(Element::C, [0.0; 3]),
            Atom::new(Element::O, [1.2, 0.0, 0.0]),
        ]);
        assert!(infer_bonds(&p, &carbon_table(), 1.1).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_positive_tolerance() {
        let p = point(vec![Atom::new(Element::C, [0.0; 3])]);
        assert!(matches!(
            infer_bonds(&p, &carbon_table(), 0.0),
            Err(Error::InvalidTolerance(_))
        ));
        assert!(matches!(
            infer_bonds(&p, &carbon_table(), f64::NAN),
            Err(Error::InvalidTolerance(_))
        ));
    }
}
