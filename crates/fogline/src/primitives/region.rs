//! Feasible regions and guarded boolean operations.
//!
//! `intersect` and `difference` wrap `geo::BooleanOps`. They never fail: a
//! panic or non-finite output from the clipper turns the step into a no-op
//! (the region is returned unchanged) and is logged. Zero-area results
//! collapse to `FeasibleRegion::Empty`.
//!
//! Shapes are folded onto the world rectangle first (`wrap_to_world`), so a
//! disk straddling ±180° constrains both sides of the antimeridian.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use geo::orient::{Direction, Orient};
use geo::{
    Area, BooleanOps, BoundingRect, ChamberlainDuquetteArea, Contains, Coord, CoordsIter, MapCoords,
    MultiPolygon, Point, Polygon,
};
use tracing::warn;

use super::shapes::{is_empty_polygon, world_boundary};
use super::types::{GeomCfg, LonLat};

/// Set of locations consistent with the clues folded so far.
#[derive(Clone, Debug, PartialEq)]
pub enum FeasibleRegion {
    /// No constraint yet; conceptually the whole plane.
    Unconstrained,
    /// Concrete polygon set, exterior rings counter-clockwise, holes clockwise.
    Bounded(MultiPolygon<f64>),
    /// Contradictory clues; no location fits.
    Empty,
}

impl FeasibleRegion {
    /// Bounded if `mp` has area above `eps`, Empty otherwise.
    pub fn from_multi(mp: MultiPolygon<f64>, eps: f64) -> Self {
        if mp.unsigned_area() <= eps {
            FeasibleRegion::Empty
        } else {
            FeasibleRegion::Bounded(mp.orient(Direction::Default))
        }
    }
    #[inline]
    pub fn is_unconstrained(&self) -> bool {
        matches!(self, FeasibleRegion::Unconstrained)
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, FeasibleRegion::Empty)
    }
    #[inline]
    pub fn polygons(&self) -> Option<&MultiPolygon<f64>> {
        if let FeasibleRegion::Bounded(mp) = self {
            Some(mp)
        } else {
            None
        }
    }
    /// Short state name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            FeasibleRegion::Unconstrained => "unconstrained",
            FeasibleRegion::Bounded(_) => "bounded",
            FeasibleRegion::Empty => "empty",
        }
    }
    /// Planar area in square degrees; `None` when unconstrained.
    pub fn area_deg2(&self) -> Option<f64> {
        match self {
            FeasibleRegion::Unconstrained => None,
            FeasibleRegion::Bounded(mp) => Some(mp.unsigned_area()),
            FeasibleRegion::Empty => Some(0.0),
        }
    }
    /// Approximate spherical area in square meters; `None` when unconstrained.
    pub fn area_m2(&self) -> Option<f64> {
        match self {
            FeasibleRegion::Unconstrained => None,
            FeasibleRegion::Bounded(mp) => Some(mp.chamberlain_duquette_unsigned_area()),
            FeasibleRegion::Empty => Some(0.0),
        }
    }
    /// Whether `p` is still a possible location (strict interior for Bounded).
    pub fn contains(&self, p: LonLat) -> bool {
        match self {
            FeasibleRegion::Unconstrained => true,
            FeasibleRegion::Bounded(mp) => mp.contains(&Point::from(p)),
            FeasibleRegion::Empty => false,
        }
    }
}

/// Boolean operator applied by the clipper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoolOp {
    Intersection,
    Difference,
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolOp::Intersection => f.write_str("intersection"),
            BoolOp::Difference => f.write_str("difference"),
        }
    }
}

/// Failure inside a single boolean operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OpError {
    #[error("{op}: operand has non-finite coordinates")]
    NonFiniteInput { op: BoolOp },
    #[error("{op}: clipper panicked: {message}")]
    Panicked { op: BoolOp, message: String },
    #[error("{op}: clipper produced non-finite coordinates")]
    NonFiniteOutput { op: BoolOp },
}

fn all_finite<G: CoordsIter<Scalar = f64>>(g: &G) -> bool {
    g.coords_iter().all(|c| c.x.is_finite() && c.y.is_finite())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Run one clipper operation, converting panics and non-finite output into `OpError`.
pub fn try_boolean<B>(a: &MultiPolygon<f64>, b: &B, op: BoolOp) -> Result<MultiPolygon<f64>, OpError>
where
    B: BooleanOps<Scalar = f64> + CoordsIter<Scalar = f64>,
{
    if !all_finite(a) || !all_finite(b) {
        return Err(OpError::NonFiniteInput { op });
    }
    let out = panic::catch_unwind(AssertUnwindSafe(|| match op {
        BoolOp::Intersection => a.intersection(b),
        BoolOp::Difference => a.difference(b),
    }))
    .map_err(|payload| OpError::Panicked {
        op,
        message: panic_message(payload.as_ref()),
    })?;
    if !all_finite(&out) {
        return Err(OpError::NonFiniteOutput { op });
    }
    Ok(out)
}

/// `shape` folded onto the world rectangle.
///
/// Shapes already inside lon ∈ [-180, 180], lat ∈ [-90, 90] come back as is.
/// Otherwise the copies shifted by -360°, 0° and +360° are clipped to the
/// world; a shape at most 360° wide yields non-overlapping pieces.
pub fn wrap_to_world(shape: &Polygon<f64>) -> Result<MultiPolygon<f64>, OpError> {
    if !all_finite(shape) {
        return Err(OpError::NonFiniteInput {
            op: BoolOp::Intersection,
        });
    }
    let Some(bbox) = shape.bounding_rect() else {
        return Ok(MultiPolygon::new(Vec::new()));
    };
    let (min, max) = (bbox.min(), bbox.max());
    if min.x >= -180.0 && max.x <= 180.0 && min.y >= -90.0 && max.y <= 90.0 {
        return Ok(MultiPolygon::new(vec![shape.clone()]));
    }
    let copies: Vec<Polygon<f64>> = [-360.0, 0.0, 360.0]
        .into_iter()
        .filter(|dx| max.x + dx > -180.0 && min.x + dx < 180.0)
        .map(|dx| shape.map_coords(move |c| Coord { x: c.x + dx, y: c.y }))
        .collect();
    let world = MultiPolygon::new(vec![world_boundary()]);
    try_boolean(&world, &MultiPolygon::new(copies), BoolOp::Intersection)
}

/// Restrict `region` to `shape`.
///
/// - Unconstrained → `shape` on the world (Empty if it has no area).
/// - Empty stays Empty.
/// - On clipper failure the region is returned unchanged.
pub fn intersect(region: &FeasibleRegion, shape: &Polygon<f64>, cfg: GeomCfg) -> FeasibleRegion {
    if region.is_empty() || is_empty_polygon(shape) {
        return FeasibleRegion::Empty;
    }
    let result = wrap_to_world(shape).and_then(|pieces| match region {
        FeasibleRegion::Bounded(mp) => try_boolean(mp, &pieces, BoolOp::Intersection),
        _ => Ok(pieces),
    });
    match result {
        Ok(out) => FeasibleRegion::from_multi(out, cfg.area_eps),
        Err(err) => {
            warn!(%err, "intersection failed; constraint ignored");
            region.clone()
        }
    }
}

/// Remove `shape` from `region`.
///
/// - Unconstrained → world boundary minus `shape`.
/// - Empty stays Empty.
/// - An empty `shape` removes nothing; on clipper failure the region is returned unchanged.
pub fn difference(region: &FeasibleRegion, shape: &Polygon<f64>, cfg: GeomCfg) -> FeasibleRegion {
    if is_empty_polygon(shape) {
        return region.clone();
    }
    let base = match region {
        FeasibleRegion::Empty => return FeasibleRegion::Empty,
        FeasibleRegion::Unconstrained => MultiPolygon::new(vec![world_boundary()]),
        FeasibleRegion::Bounded(mp) => mp.clone(),
    };
    let result =
        wrap_to_world(shape).and_then(|pieces| try_boolean(&base, &pieces, BoolOp::Difference));
    match result {
        Ok(out) => FeasibleRegion::from_multi(out, cfg.area_eps),
        Err(err) => {
            warn!(%err, "difference failed; constraint ignored");
            region.clone()
        }
    }
}
