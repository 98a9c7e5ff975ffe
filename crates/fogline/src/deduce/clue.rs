//! Clue records and the clue → constraint mapping.

use geo::Polygon;
use serde::{Deserialize, Serialize};

use crate::primitives::{
    bisector_half_plane_with, disk_with, distance_m, is_empty_polygon, GeomCfg, LonLat,
};

/// Clue kind. The game's card names (RADAR, THERMOMETER, TRAVEL_AGENT) are accepted as aliases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClueKind {
    /// "Are you within R of this point?"
    #[serde(alias = "RADAR")]
    Proximity,
    /// "Am I closer to you than I was?" (hotter/colder)
    #[serde(alias = "THERMOMETER")]
    ComparativeDistance,
    /// "You are farther from the destination than I am." Exclusion-only.
    #[serde(alias = "TRAVEL_AGENT")]
    ExclusionByReference,
    /// Any kind without geometry; skipped by the fold.
    #[serde(other)]
    Unsupported,
}

/// Kind-specific parameters. Absent fields stay `None` so that one bad clue
/// does not reject a whole history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClueParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<LonLat>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "radius")]
    pub radius_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "start")]
    pub point_a: Option<LonLat>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "end")]
    pub point_b: Option<LonLat>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "dest")]
    pub destination: Option<LonLat>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        alias = "seekerLoc",
        alias = "reference"
    )]
    pub reference_point: Option<LonLat>,
}

/// One resolved yes/no question.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clue {
    pub id: String,
    #[serde(alias = "type")]
    pub kind: ClueKind,
    #[serde(default)]
    pub params: ClueParams,
    #[serde(alias = "answer")]
    pub outcome: bool,
    #[serde(alias = "timestamp")]
    pub sequence: u64,
}

impl Clue {
    pub fn proximity(id: &str, sequence: u64, center: LonLat, radius_m: f64, inside: bool) -> Self {
        Self {
            id: id.to_string(),
            kind: ClueKind::Proximity,
            params: ClueParams {
                center: Some(center),
                radius_m: Some(radius_m),
                ..ClueParams::default()
            },
            outcome: inside,
            sequence,
        }
    }

    /// `closer_to_b`: the hider is closer to `b` than to `a`.
    pub fn comparative(id: &str, sequence: u64, a: LonLat, b: LonLat, closer_to_b: bool) -> Self {
        Self {
            id: id.to_string(),
            kind: ClueKind::ComparativeDistance,
            params: ClueParams {
                point_a: Some(a),
                point_b: Some(b),
                ..ClueParams::default()
            },
            outcome: closer_to_b,
            sequence,
        }
    }

    /// The hider is farther from `destination` than `reference_point` is.
    pub fn exclusion(id: &str, sequence: u64, destination: LonLat, reference_point: LonLat) -> Self {
        Self {
            id: id.to_string(),
            kind: ClueKind::ExclusionByReference,
            params: ClueParams {
                destination: Some(destination),
                reference_point: Some(reference_point),
                ..ClueParams::default()
            },
            outcome: false,
            sequence,
        }
    }
}

/// How a constraint shape is folded into the feasible region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoldOp {
    /// Target is inside the shape.
    Intersect,
    /// Target is outside the shape.
    Difference,
}

/// Operator for a kind and outcome; `None` for unsupported kinds.
///
/// Comparative clues always intersect (both outcomes name the side the target
/// is on). Exclusion clues always subtract, whatever the outcome flag says.
pub fn fold_op(kind: ClueKind, outcome: bool) -> Option<FoldOp> {
    match kind {
        ClueKind::Proximity if outcome => Some(FoldOp::Intersect),
        ClueKind::Proximity => Some(FoldOp::Difference),
        ClueKind::ComparativeDistance => Some(FoldOp::Intersect),
        ClueKind::ExclusionByReference => Some(FoldOp::Difference),
        ClueKind::Unsupported => None,
    }
}

/// Shape and operator derived from exactly one clue.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    pub clue_id: String,
    pub sequence: u64,
    pub op: FoldOp,
    pub shape: Polygon<f64>,
}

/// Reason a clue cannot contribute a constraint.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClueError {
    #[error("clue kind has no spatial constraint")]
    UnsupportedKind,
    #[error("missing parameter `{0}`")]
    MissingParam(&'static str),
    #[error("parameter `{name}` is not a valid lon/lat: [{lon}, {lat}]")]
    InvalidPoint { name: &'static str, lon: f64, lat: f64 },
    #[error("parameter `radius_m` must be finite and non-negative, got {0}")]
    InvalidRadius(f64),
    #[error("comparison points `point_a` and `point_b` coincide")]
    CoincidentPoints,
}

fn point(value: Option<LonLat>, name: &'static str) -> Result<LonLat, ClueError> {
    let p = value.ok_or(ClueError::MissingParam(name))?;
    if !p.is_valid() {
        return Err(ClueError::InvalidPoint {
            name,
            lon: p.lon,
            lat: p.lat,
        });
    }
    Ok(p)
}

fn radius(value: Option<f64>) -> Result<f64, ClueError> {
    let r = value.ok_or(ClueError::MissingParam("radius_m"))?;
    if !r.is_finite() || r < 0.0 {
        return Err(ClueError::InvalidRadius(r));
    }
    Ok(r)
}

/// Map a clue to its constraint shape.
///
/// A zero radius is accepted and yields an empty disk (Empty on intersect,
/// no-op on difference). Everything else that cannot form a shape is a
/// `ClueError`.
pub fn constraint_for(clue: &Clue, cfg: GeomCfg) -> Result<Constraint, ClueError> {
    let op = fold_op(clue.kind, clue.outcome).ok_or(ClueError::UnsupportedKind)?;
    let p = &clue.params;
    let shape = match clue.kind {
        ClueKind::Proximity => {
            let center = point(p.center, "center")?;
            disk_with(center, radius(p.radius_m)?, cfg)
        }
        ClueKind::ComparativeDistance => {
            let a = point(p.point_a, "point_a")?;
            let b = point(p.point_b, "point_b")?;
            let half = bisector_half_plane_with(a, b, clue.outcome, cfg);
            if is_empty_polygon(&half) {
                return Err(ClueError::CoincidentPoints);
            }
            half
        }
        ClueKind::ExclusionByReference => {
            let dest = point(p.destination, "destination")?;
            let reference = point(p.reference_point, "reference_point")?;
            disk_with(dest, distance_m(reference, dest), cfg)
        }
        ClueKind::Unsupported => return Err(ClueError::UnsupportedKind),
    };
    Ok(Constraint {
        clue_id: clue.id.clone(),
        sequence: clue.sequence,
        op,
        shape,
    })
}
