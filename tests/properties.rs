use proptest::prelude::*;

use reaction_atlas::{
    Atlas, AtlasConfig, Atom, BondOrder, BondReference, BondTable, Connection, Element, Endpoint,
    LayoutConfig, PointId, StationaryPoint, infer_bonds, perceive,
};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Ethanol heavy atoms plus hydrogens, in Angstrom.
fn ethanol() -> Vec<Atom> {
    vec![
        Atom::new(Element::C, [-1.270, 0.248, 0.000]),
        Atom::new(Element::C, [0.139, -0.308, 0.000]),
        Atom::new(Element::O, [1.036, 0.789, 0.000]),
        Atom::new(Element::H, [-1.317, 0.885, 0.883]),
        Atom::new(Element::H, [-1.317, 0.885, -0.883]),
        Atom::new(Element::H, [-2.030, -0.533, 0.000]),
        Atom::new(Element::H, [0.358, -0.920, 0.876]),
        Atom::new(Element::H, [0.358, -0.920, -0.876]),
        Atom::new(Element::H, [1.939, 0.473, 0.000]),
    ]
}

/// Dimethyl ether: same composition as ethanol, different connectivity.
fn dimethyl_ether() -> Vec<Atom> {
    vec![
        Atom::new(Element::C, [-1.166, -0.199, 0.000]),
        Atom::new(Element::O, [0.000, 0.586, 0.000]),
        Atom::new(Element::C, [1.166, -0.199, 0.000]),
        Atom::new(Element::H, [-2.030, 0.466, 0.000]),
        Atom::new(Element::H, [-1.208, -0.841, 0.889]),
        Atom::new(Element::H, [-1.208, -0.841, -0.889]),
        Atom::new(Element::H, [2.030, 0.466, 0.000]),
        Atom::new(Element::H, [1.208, -0.841, 0.889]),
        Atom::new(Element::H, [1.208, -0.841, -0.889]),
    ]
}

/// Regular C6 hexagon with radial hydrogens; every ring bond perceives alike.
fn benzene() -> Vec<Atom> {
    let mut atoms = Vec::with_capacity(12);
    for i in 0..6 {
        let angle = std::f64::consts::TAU * i as f64 / 6.0;
        atoms.push(Atom::new(
            Element::C,
            [1.42 * angle.cos(), 1.42 * angle.sin(), 0.0],
        ));
    }
    for i in 0..6 {
        let angle = std::f64::consts::TAU * i as f64 / 6.0;
        atoms.push(Atom::new(
            Element::H,
            [2.50 * angle.cos(), 2.50 * angle.sin(), 0.0],
        ));
    }
    atoms
}

fn equilibrium(index: u32, atoms: Vec<Atom>) -> StationaryPoint {
    StationaryPoint::new(PointId::equilibrium(index), atoms)
}

fn signature(atoms: Vec<Atom>) -> String {
    let point = perceive(equilibrium(0, atoms), BondTable::builtin(), 1.1).unwrap();
    point.signature().unwrap().to_string()
}

fn permute(atoms: &[Atom], order: &[usize]) -> Vec<Atom> {
    order.iter().map(|&i| atoms[i].clone()).collect()
}

fn carbon_pair_table() -> BondTable {
    BondTable::new(vec![
        BondReference::new(Element::C, Element::C, 1.54, BondOrder::Single),
        BondReference::new(Element::C, Element::C, 1.34, BondOrder::Double),
    ])
    .unwrap()
}

fn carbon_pair(distance: f64) -> StationaryPoint {
    equilibrium(
        0,
        vec![
            Atom::new(Element::C, [0.0, 0.0, 0.0]),
            Atom::new(Element::C, [distance, 0.0, 0.0]),
        ],
    )
}

fn hydrogen_pair(id: PointId, separation: f64) -> StationaryPoint {
    StationaryPoint::new(
        id,
        vec![
            Atom::new(Element::H, [0.0, 0.0, 0.0]),
            Atom::new(Element::H, [separation, 0.0, 0.0]),
        ],
    )
}

/// `bound` bonded H2 equilibria followed by `free` dissociated ones, chained
/// by transition states so every equilibrium is a network node.
fn hydrogen_atlas(bound: usize, free: usize, config: &AtlasConfig) -> Atlas {
    let equilibria: Vec<_> = (0..bound + free)
        .map(|i| {
            let separation = if i < bound { 0.74 } else { 4.0 };
            hydrogen_pair(PointId::equilibrium(i as u32), separation)
        })
        .collect();
    let last = (bound + free - 1) as u32;
    // A lone equilibrium is kept in the network through a self-loop.
    let transitions: Vec<_> = (0..last.max(1))
        .map(|i| {
            let mut ts = hydrogen_pair(PointId::transition(i), 1.2);
            ts.connection = Some(Connection::new(
                Endpoint::Equilibrium(i),
                Endpoint::Equilibrium((i + 1).min(last)),
            ));
            ts
        })
        .collect();
    Atlas::build(equilibria, transitions, config).unwrap()
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn signature_is_invariant_under_atom_relabelling(
        order in Just((0..9).collect::<Vec<usize>>()).prop_shuffle()
    ) {
        let atoms = ethanol();
        prop_assert_eq!(signature(permute(&atoms, &order)), signature(atoms));
    }

    #[test]
    fn ring_signature_is_invariant_under_atom_relabelling(
        order in Just((0..12).collect::<Vec<usize>>()).prop_shuffle()
    ) {
        let atoms = benzene();
        prop_assert_eq!(signature(permute(&atoms, &order)), signature(atoms));
    }

    #[test]
    fn isomers_stay_distinct_under_relabelling(
        a in Just((0..9).collect::<Vec<usize>>()).prop_shuffle(),
        b in Just((0..9).collect::<Vec<usize>>()).prop_shuffle()
    ) {
        let ethanol = signature(permute(&ethanol(), &a));
        let ether = signature(permute(&dimethyl_ether(), &b));
        prop_assert_ne!(ethanol, ether);
    }

    #[test]
    fn tolerance_boundary_is_inclusive(
        length in 0.5f64..3.0,
        tolerance in 1.0f64..1.5
    ) {
        let table = BondTable::new(vec![
            BondReference::new(Element::C, Element::C, length, BondOrder::Single),
        ]).unwrap();
        let limit = length * tolerance;

        let at = infer_bonds(&carbon_pair(limit), &table, tolerance).unwrap();
        prop_assert_eq!(at.len(), 1);

        let beyond = infer_bonds(&carbon_pair(limit * (1.0 + 1e-9)), &table, tolerance).unwrap();
        prop_assert!(beyond.is_empty());
    }

    #[test]
    fn shorter_reference_wins_when_both_cover(distance in 0.1f64..1.47) {
        let bonds = infer_bonds(&carbon_pair(distance), &carbon_pair_table(), 1.1).unwrap();
        prop_assert_eq!(bonds.len(), 1);
        prop_assert_eq!(bonds[0].order, BondOrder::Double);
    }

    #[test]
    fn double_wins_over_single_for_any_table_order(
        entries in Just(vec![
            BondReference::new(Element::C, Element::C, 1.54, BondOrder::Single),
            BondReference::new(Element::C, Element::C, 1.34, BondOrder::Double),
            BondReference::new(Element::C, Element::C, 1.20, BondOrder::Triple),
            BondReference::new(Element::C, Element::H, 1.09, BondOrder::Single),
        ]).prop_shuffle(),
        distance in 1.33f64..1.47
    ) {
        let table = BondTable::new(entries).unwrap();
        let bonds = infer_bonds(&carbon_pair(distance), &table, 1.1).unwrap();
        prop_assert_eq!(bonds.len(), 1);
        prop_assert_eq!(bonds[0].order, BondOrder::Double);
    }

    #[test]
    fn longer_reference_applies_beyond_the_shorter(distance in 1.48f64..1.69) {
        let bonds = infer_bonds(&carbon_pair(distance), &carbon_pair_table(), 1.1).unwrap();
        prop_assert_eq!(bonds.len(), 1);
        prop_assert_eq!(bonds[0].order, BondOrder::Single);
    }

    #[test]
    fn cluster_members_stay_within_local_radius(k in 1usize..=50) {
        let config = AtlasConfig::default();
        let atlas = hydrogen_atlas(k, 0, &config);
        let layout = atlas.layout();
        prop_assert_eq!(layout.len(), k);
        prop_assert_eq!(layout.clusters().len(), 1);

        let cluster = &layout.clusters()[0];
        let bound = config.layout.local_spacing * ((k - 1) as f64).sqrt();
        prop_assert!((cluster.radius - bound).abs() < 1e-9);
        for id in &cluster.members {
            let [x, y] = layout.position(*id).unwrap();
            let r = (x - cluster.center[0]).hypot(y - cluster.center[1]);
            prop_assert!(r <= bound + 1e-9);
        }
    }

    #[test]
    fn every_node_is_positioned_in_exactly_one_cluster(
        bound in 1usize..12,
        free in 1usize..12
    ) {
        let atlas = hydrogen_atlas(bound, free, &AtlasConfig::default());
        let layout = atlas.layout();
        prop_assert_eq!(layout.len(), bound + free);
        prop_assert_eq!(layout.clusters().len(), 2);

        for node in atlas.network().nodes() {
            let owners = layout
                .clusters()
                .iter()
                .filter(|c| c.members.contains(&node.id))
                .count();
            prop_assert_eq!(owners, 1);
        }
        let sizes: Vec<_> = layout.clusters().iter().map(|c| c.members.len()).collect();
        prop_assert_eq!(sizes, vec![bound, free]);
    }

    #[test]
    fn fixed_seed_layout_is_reproducible(seed in any::<u64>()) {
        let config = AtlasConfig {
            layout: LayoutConfig { seed: Some(seed), ..LayoutConfig::default() },
            ..AtlasConfig::default()
        };
        let a = hydrogen_atlas(3, 2, &config);
        let b = hydrogen_atlas(3, 2, &config);
        prop_assert_eq!(a.layout(), b.layout());
    }
}
