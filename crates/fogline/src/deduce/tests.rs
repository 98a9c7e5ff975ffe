use super::*;
use crate::primitives::{disk, world_boundary, FeasibleRegion, GeomCfg, LonLat};
use geo::{Area, Contains, Point};
use proptest::prelude::*;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

const ORIGIN: LonLat = LonLat { lon: 0.0, lat: 0.0 };
const WORLD_AREA: f64 = 360.0 * 180.0;

fn malformed(id: &str, sequence: u64) -> Clue {
    Clue {
        id: id.to_string(),
        kind: ClueKind::Proximity,
        params: ClueParams::default(),
        outcome: true,
        sequence,
    }
}

#[test]
fn empty_history_has_no_mask() {
    let region = fold(&[]);
    assert_eq!(region, FeasibleRegion::Unconstrained);
    assert!(mask(&region).is_none());
    assert!(fog_mask(&[]).is_none());
}

#[test]
fn single_inclusion_keeps_only_the_disk() {
    let history = vec![Clue::proximity("r1", 1, ORIGIN, 1000.0, true)];
    let disk_area = disk(ORIGIN, 1000.0).unsigned_area();

    let region = fold(&history);
    let area = region.area_deg2().unwrap();
    assert!((area - disk_area).abs() < 1e-12);
    assert!(region.contains(ORIGIN));
    assert!(!region.contains(LonLat::new(0.0, 0.1)));

    let m = mask(&region).unwrap();
    assert_eq!(m.polygons().0.len(), 1);
    assert_eq!(m.polygons().0[0].interiors().len(), 1);
    assert!((m.area_deg2() - (WORLD_AREA - disk_area)).abs() < 1e-3 * disk_area);
    assert!(!m.polygons().contains(&Point::new(0.0, 0.0)));
    assert!(m.polygons().contains(&Point::new(50.0, 20.0)));
}

#[test]
fn exclusion_from_unconstrained_keeps_the_rest_of_the_world() {
    let history = vec![Clue::proximity("r1", 1, ORIGIN, 1000.0, false)];
    let disk_area = disk(ORIGIN, 1000.0).unsigned_area();

    let region = fold(&history);
    let area = region.area_deg2().unwrap();
    assert!((area - (WORLD_AREA - disk_area)).abs() < 1e-3 * disk_area);
    assert!(!region.contains(ORIGIN));
    assert!(region.contains(LonLat::new(0.0, 0.1)));

    let m = mask(&region).unwrap();
    assert!((m.area_deg2() - disk_area).abs() < 1e-2 * disk_area);
    assert!(m.polygons().contains(&Point::new(0.0, 0.0)));
    assert!(!m.polygons().contains(&Point::new(0.0, 0.1)));
}

#[test]
fn disjoint_inclusions_contradict() {
    let history = vec![
        Clue::proximity("r1", 1, ORIGIN, 1000.0, true),
        Clue::proximity("r2", 2, LonLat::new(1.0, 1.0), 1000.0, true),
    ];
    let region = fold(&history);
    assert!(region.is_empty());
    let m = mask(&region).unwrap();
    assert_eq!(m, FogMask::full());
    assert!((m.area_deg2() - world_boundary().unsigned_area()).abs() < 1e-9);
}

#[test]
fn empty_region_absorbs_later_clues() {
    let history = vec![
        Clue::proximity("r1", 1, ORIGIN, 1000.0, true),
        Clue::proximity("r2", 2, LonLat::new(1.0, 1.0), 1000.0, true),
        Clue::proximity("r3", 3, ORIGIN, 50_000.0, true),
        Clue::proximity("r4", 4, ORIGIN, 10.0, false),
        Clue::comparative("t1", 5, ORIGIN, LonLat::new(0.0, 1.0), true),
    ];
    assert!(fold(&history).is_empty());
}

#[test]
fn comparative_closer_to_b_lies_north_of_bisector() {
    let history = vec![Clue::comparative(
        "t1",
        1,
        ORIGIN,
        LonLat::new(0.0, 1.0),
        true,
    )];
    let region = fold(&history);
    let mut inside = 0;
    for i in 0..41 {
        for j in 0..40 {
            let p = LonLat::new(-1.0 + 0.05 * i as f64, (j as f64 + 0.5) * 0.05);
            if region.contains(p) {
                inside += 1;
                assert!(p.lat > 0.5, "sample {p:?} south of bisector");
            }
        }
    }
    assert!(inside > 100);
}

#[test]
fn comparative_closer_to_a_lies_south_of_bisector() {
    let history = vec![Clue::comparative(
        "t1",
        1,
        ORIGIN,
        LonLat::new(0.0, 1.0),
        false,
    )];
    let region = fold(&history);
    assert!(region.contains(LonLat::new(0.0, 0.2)));
    assert!(!region.contains(LonLat::new(0.0, 0.8)));
    for p in region.polygons().unwrap().0[0].exterior().points() {
        assert!(p.y() <= 0.5 + 1e-12);
    }
}

#[test]
fn comparative_halves_a_proximity_disk() {
    let center = LonLat::new(0.0, 0.5);
    let history = vec![
        Clue::proximity("r1", 1, center, 20_000.0, true),
        Clue::comparative("t1", 2, ORIGIN, LonLat::new(0.0, 1.0), true),
    ];
    let full = disk(center, 20_000.0).unsigned_area();
    let region = fold(&history);
    let area = region.area_deg2().unwrap();
    assert!((area - 0.5 * full).abs() < 1e-2 * full, "area {area} vs {full}");
    assert!(region.contains(LonLat::new(0.0, 0.6)));
    assert!(!region.contains(LonLat::new(0.0, 0.4)));
}

#[test]
fn exclusion_by_reference_always_subtracts() {
    let dest = ORIGIN;
    let seeker = LonLat::new(0.0, 0.01);
    let mut clue = Clue::exclusion("ta1", 1, dest, seeker);
    // the outcome flag does not turn this kind into an inclusion
    clue.outcome = true;
    let region = fold(&[clue]);
    assert!(!region.contains(LonLat::new(0.0, 0.005)));
    assert!(region.contains(LonLat::new(0.0, 0.02)));
    assert_eq!(
        fold_op(ClueKind::ExclusionByReference, true),
        Some(FoldOp::Difference)
    );
}

#[test]
fn fold_operator_table() {
    assert_eq!(fold_op(ClueKind::Proximity, true), Some(FoldOp::Intersect));
    assert_eq!(fold_op(ClueKind::Proximity, false), Some(FoldOp::Difference));
    assert_eq!(
        fold_op(ClueKind::ComparativeDistance, true),
        Some(FoldOp::Intersect)
    );
    assert_eq!(
        fold_op(ClueKind::ComparativeDistance, false),
        Some(FoldOp::Intersect)
    );
    assert_eq!(fold_op(ClueKind::Unsupported, true), None);
}

#[test]
fn malformed_clue_changes_nothing() {
    let clean = vec![
        Clue::proximity("r1", 1, ORIGIN, 30_000.0, true),
        Clue::comparative("t1", 3, ORIGIN, LonLat::new(0.2, 0.0), true),
        Clue::proximity("r2", 4, LonLat::new(0.1, 0.0), 2_000.0, false),
    ];
    let mut noisy = clean.clone();
    noisy.insert(1, malformed("bad", 2));
    assert_eq!(fold(&noisy), fold(&clean));
}

#[test]
fn invalid_parameters_are_rejected_per_clue() {
    let cfg = GeomCfg::default();
    assert_eq!(
        constraint_for(&malformed("m", 1), cfg),
        Err(ClueError::MissingParam("center"))
    );
    let neg = Clue::proximity("n", 1, ORIGIN, -5.0, true);
    assert_eq!(constraint_for(&neg, cfg), Err(ClueError::InvalidRadius(-5.0)));
    let off_map = Clue::proximity("o", 1, LonLat::new(0.0, 95.0), 100.0, true);
    assert!(matches!(
        constraint_for(&off_map, cfg),
        Err(ClueError::InvalidPoint { name: "center", .. })
    ));
    let same = Clue::comparative("s", 1, ORIGIN, ORIGIN, true);
    assert_eq!(constraint_for(&same, cfg), Err(ClueError::CoincidentPoints));
    let mut half = Clue::exclusion("e", 1, ORIGIN, ORIGIN);
    half.params.reference_point = None;
    assert_eq!(
        constraint_for(&half, cfg),
        Err(ClueError::MissingParam("reference_point"))
    );

    // skipped clues leave an otherwise empty history unconstrained
    assert_eq!(
        fold(&[neg, off_map, same, half]),
        FeasibleRegion::Unconstrained
    );
}

#[test]
fn zero_radius_inclusion_is_a_contradiction() {
    let history = vec![Clue::proximity("r0", 1, ORIGIN, 0.0, true)];
    assert!(fold(&history).is_empty());
    // and as an exclusion it removes nothing
    let history = vec![
        Clue::proximity("r1", 1, ORIGIN, 1000.0, true),
        Clue::proximity("r0", 2, ORIGIN, 0.0, false),
    ];
    assert_eq!(
        fold(&history),
        fold(&[Clue::proximity("r1", 1, ORIGIN, 1000.0, true)])
    );
}

#[test]
fn proximity_across_the_antimeridian_wraps_in_mask_and_region() {
    let center = LonLat::new(179.99, 0.0);
    let wrapped = LonLat::new(-179.995, 0.0);
    let disk_area = disk(center, 5_000.0).unsigned_area();

    let outside = fold(&[Clue::proximity("r1", 1, center, 5_000.0, false)]);
    assert!(!outside.contains(wrapped));
    let m = mask(&outside).unwrap();
    assert!(m.polygons().contains(&Point::from(wrapped)));
    let total = m.area_deg2() + outside.area_deg2().unwrap();
    assert!((total - WORLD_AREA).abs() < 1e-3 * disk_area, "total {total}");

    let inside = fold(&[Clue::proximity("r1", 1, center, 5_000.0, true)]);
    assert!(inside.contains(wrapped));
    let m = mask(&inside).unwrap();
    assert!(!m.polygons().contains(&Point::from(wrapped)));
    assert!(m.polygons().contains(&Point::new(-179.9, 0.0)));
    let total = m.area_deg2() + inside.area_deg2().unwrap();
    assert!((total - WORLD_AREA).abs() < 1e-3 * disk_area, "total {total}");
}

#[test]
fn proximity_at_the_pole_stays_small() {
    let pole = LonLat::new(0.0, 90.0);
    let region = fold(&[Clue::proximity("r1", 1, pole, 1_000.0, true)]);
    let m2 = region.area_m2().unwrap();
    assert!(m2 < 4.0e6, "area {m2}");
    // a thin band below the pole in planar degrees
    assert!(region.area_deg2().unwrap() < 3.5);
    assert!(!region.contains(LonLat::new(0.0, 89.9)));
}

#[test]
fn history_is_folded_by_sequence_not_slice_order() {
    let mut history = vec![
        Clue::proximity("r1", 10, ORIGIN, 30_000.0, true),
        Clue::proximity("r2", 20, LonLat::new(0.1, 0.0), 5_000.0, false),
        Clue::comparative("t1", 30, ORIGIN, LonLat::new(0.0, 0.2), true),
        Clue::exclusion("x1", 40, LonLat::new(-0.1, 0.05), LonLat::new(-0.1, 0.06)),
    ];
    let expected = fold(&history);
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..5 {
        history.shuffle(&mut rng);
        assert_eq!(fold(&history), expected);
    }
}

#[test]
fn sequence_ties_are_broken_by_id() {
    let a = Clue::proximity("a", 5, ORIGIN, 30_000.0, true);
    let b = Clue::proximity("b", 5, LonLat::new(0.1, 0.0), 5_000.0, false);
    assert_eq!(
        fold(&[a.clone(), b.clone()]),
        fold(&[b, a])
    );
}

#[test]
fn folding_twice_is_identical() {
    let history = vec![
        Clue::proximity("r1", 1, LonLat::new(-2.7, 53.76), 40_000.0, true),
        Clue::comparative("t1", 2, LonLat::new(-2.7, 53.76), LonLat::new(-2.6, 53.8), false),
        Clue::exclusion("x1", 3, LonLat::new(-2.9, 53.7), LonLat::new(-2.85, 53.72)),
    ];
    let first = fold(&history);
    let second = fold(&history);
    assert_eq!(first, second);
    assert_eq!(mask(&first), mask(&second));
}

#[test]
fn constraints_follow_fold_order_and_skip_malformed() {
    let history = vec![
        Clue::comparative("t1", 3, ORIGIN, LonLat::new(0.0, 1.0), false),
        malformed("bad", 2),
        Clue::proximity("r1", 1, ORIGIN, 1000.0, false),
    ];
    let cs = constraints(&history, GeomCfg::default());
    let ids: Vec<&str> = cs.iter().map(|c| c.clue_id.as_str()).collect();
    assert_eq!(ids, vec!["r1", "t1"]);
    assert_eq!(cs[0].op, FoldOp::Difference);
    assert_eq!(cs[1].op, FoldOp::Intersect);
}

#[test]
fn parses_card_name_event_format() {
    let raw = r#"[
        {"id": "e1", "type": "RADAR", "params": {"center": [0.0, 0.0], "radius": 1000}, "answer": true, "timestamp": 1700000000},
        {"id": "e2", "type": "THERMOMETER", "params": {"start": [0.0, 0.0], "end": [0.0, 0.01]}, "answer": false, "timestamp": 1700000100},
        {"id": "e3", "type": "TRAVEL_AGENT", "params": {"dest": [0.001, 0.0], "seekerLoc": [0.002, 0.0]}, "answer": false, "timestamp": 1700000200},
        {"id": "e4", "type": "MATCHING", "params": {}, "answer": true, "timestamp": 1700000300}
    ]"#;
    let history: Vec<Clue> = serde_json::from_str(raw).unwrap();
    assert_eq!(history[0].kind, ClueKind::Proximity);
    assert_eq!(history[0].params.radius_m, Some(1000.0));
    assert_eq!(history[1].kind, ClueKind::ComparativeDistance);
    assert_eq!(history[1].params.point_b, Some(LonLat::new(0.0, 0.01)));
    assert_eq!(history[2].kind, ClueKind::ExclusionByReference);
    assert_eq!(history[2].params.reference_point, Some(LonLat::new(0.002, 0.0)));
    assert_eq!(history[3].kind, ClueKind::Unsupported);

    let region = fold(&history);
    assert!(region.contains(LonLat::new(-0.005, 0.0)));
    assert!(!region.contains(LonLat::new(0.0, 0.008)));
}

#[test]
fn parses_canonical_format_and_missing_params() {
    let raw = r#"[
        {"id": "a", "kind": "PROXIMITY", "params": {"center": [1.0, 2.0], "radius_m": 250.5}, "outcome": false, "sequence": 1},
        {"id": "b", "kind": "COMPARATIVE_DISTANCE", "outcome": true, "sequence": 2}
    ]"#;
    let history: Vec<Clue> = serde_json::from_str(raw).unwrap();
    assert_eq!(history[0].params.center, Some(LonLat::new(1.0, 2.0)));
    assert_eq!(history[1].params, ClueParams::default());
    let back = serde_json::to_value(&history[0]).unwrap();
    assert_eq!(back["kind"], "PROXIMITY");
    assert!(back["params"].get("point_a").is_none());
}

#[test]
fn geojson_mask_has_world_ring_and_hole() {
    let history = vec![Clue::proximity("r1", 1, ORIGIN, 1000.0, true)];
    let region = fold(&history);
    let doc = mask(&region).unwrap().to_geojson();
    assert_eq!(doc["type"], "Feature");
    assert_eq!(doc["geometry"]["type"], "MultiPolygon");
    let rings = doc["geometry"]["coordinates"][0].as_array().unwrap();
    assert_eq!(rings.len(), 2);
    let hole = rings[1].as_array().unwrap();
    assert_eq!(hole.first(), hole.last());

    let r = region.to_geojson();
    assert_eq!(r["properties"]["state"], "bounded");
    assert!(FeasibleRegion::Unconstrained.to_geojson()["geometry"].is_null());

    let overlay = geojson::constraints_collection(&constraints(&history, GeomCfg::default()));
    assert_eq!(overlay["features"][0]["properties"]["op"], "intersect");
    assert_eq!(overlay["features"][0]["geometry"]["type"], "Polygon");
}

fn clue_from_spec(i: usize, spec: (u8, f64, f64, f64, bool)) -> Clue {
    let (kind, x, y, r, outcome) = spec;
    let id = format!("c{i}");
    let seq = i as u64;
    match kind {
        0 => Clue::proximity(&id, seq, LonLat::new(x, y), r, outcome),
        1 => Clue::comparative(&id, seq, LonLat::new(x, y), LonLat::new(x + 0.01, y - 0.01), outcome),
        2 => Clue::exclusion(&id, seq, LonLat::new(x, y), LonLat::new(x, y + r / 110_574.0)),
        _ => malformed(&id, seq),
    }
}

fn history_and_shuffle() -> impl Strategy<Value = (Vec<Clue>, Vec<Clue>)> {
    prop::collection::vec(
        (0u8..4, -0.05f64..0.05, -0.05f64..0.05, 500.0f64..8000.0, any::<bool>()),
        1..6,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, s)| clue_from_spec(i, s))
            .collect::<Vec<_>>()
    })
    .prop_flat_map(|h| (Just(h.clone()), Just(h).prop_shuffle()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn fold_ignores_slice_order((history, shuffled) in history_and_shuffle()) {
        prop_assert_eq!(fold(&history), fold(&shuffled));
    }

    #[test]
    fn mask_and_region_partition_the_world((history, _) in history_and_shuffle()) {
        let region = fold(&history);
        match mask(&region) {
            None => prop_assert!(region.is_unconstrained()),
            Some(m) => {
                let total = m.area_deg2() + region.area_deg2().unwrap();
                prop_assert!((total - WORLD_AREA).abs() < 1e-3, "total {}", total);
            }
        }
    }
}
