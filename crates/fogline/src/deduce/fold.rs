//! History fold and fog-mask derivation.
//!
//! Both are pure: the caller owns the history and recomputes from scratch on
//! every change. Boolean differences do not commute across interleavings, so
//! there is no incremental update path.

use geo::orient::{Direction, Orient};
use geo::{Area, MultiPolygon};
use tracing::{debug, warn};

use super::clue::{constraint_for, Clue, Constraint, FoldOp};
use crate::primitives::{
    difference, intersect, try_boolean, world_boundary, BoolOp, FeasibleRegion, GeomCfg,
};

/// Clues in fold order: by `sequence`, ties broken by `id`.
fn ordered(history: &[Clue]) -> Vec<&Clue> {
    let mut out: Vec<&Clue> = history.iter().collect();
    out.sort_by(|a, b| a.sequence.cmp(&b.sequence).then_with(|| a.id.cmp(&b.id)));
    out
}

/// Fold a history with default geometry settings.
#[inline]
pub fn fold(history: &[Clue]) -> FeasibleRegion {
    fold_with(history, GeomCfg::default())
}

/// Fold every well-formed clue, in sequence order, into one feasible region.
///
/// Malformed clues are logged and skipped. Once Empty, the region stays Empty.
pub fn fold_with(history: &[Clue], cfg: GeomCfg) -> FeasibleRegion {
    let mut feasible = FeasibleRegion::Unconstrained;
    for clue in ordered(history) {
        let constraint = match constraint_for(clue, cfg) {
            Ok(c) => c,
            Err(err) => {
                warn!(clue = %clue.id, sequence = clue.sequence, %err, "skipping clue");
                continue;
            }
        };
        feasible = match constraint.op {
            FoldOp::Intersect => intersect(&feasible, &constraint.shape, cfg),
            FoldOp::Difference => difference(&feasible, &constraint.shape, cfg),
        };
        debug!(
            clue = %clue.id,
            sequence = clue.sequence,
            op = ?constraint.op,
            state = feasible.label(),
            "folded clue"
        );
    }
    feasible
}

/// Per-clue constraints in fold order; malformed clues are omitted.
pub fn constraints(history: &[Clue], cfg: GeomCfg) -> Vec<Constraint> {
    ordered(history)
        .into_iter()
        .filter_map(|clue| match constraint_for(clue, cfg) {
            Ok(c) => Some(c),
            Err(err) => {
                warn!(clue = %clue.id, %err, "no constraint for clue");
                None
            }
        })
        .collect()
}

/// Area to obscure: world boundary with the feasible region cut out.
///
/// Exterior rings counter-clockwise, holes clockwise.
#[derive(Clone, Debug, PartialEq)]
pub struct FogMask(pub MultiPolygon<f64>);

impl FogMask {
    /// The whole world obscured.
    pub fn full() -> Self {
        FogMask(MultiPolygon::new(vec![world_boundary()]))
    }
    #[inline]
    pub fn polygons(&self) -> &MultiPolygon<f64> {
        &self.0
    }
    /// Planar area in square degrees.
    #[inline]
    pub fn area_deg2(&self) -> f64 {
        self.0.unsigned_area()
    }
}

/// Derive the fog mask.
///
/// - Unconstrained → `None` (nothing to hide).
/// - Bounded(r) → world boundary minus `r`.
/// - Empty → the full world boundary.
///
/// If the subtraction itself fails the whole world is obscured.
pub fn mask(feasible: &FeasibleRegion) -> Option<FogMask> {
    match feasible {
        FeasibleRegion::Unconstrained => None,
        FeasibleRegion::Empty => Some(FogMask::full()),
        FeasibleRegion::Bounded(region) => {
            let world = MultiPolygon::new(vec![world_boundary()]);
            let mut out = world;
            for poly in &region.0 {
                match try_boolean(&out, poly, BoolOp::Difference) {
                    Ok(next) => out = next,
                    Err(err) => {
                        warn!(%err, "mask subtraction failed; obscuring everything");
                        return Some(FogMask::full());
                    }
                }
            }
            Some(FogMask(out.orient(Direction::Default)))
        }
    }
}

/// `mask(fold(history))` with default geometry settings.
#[inline]
pub fn fog_mask(history: &[Clue]) -> Option<FogMask> {
    mask(&fold(history))
}
