//! GeoJSON export for masks, regions and constraint overlays.
//!
//! Coordinates are written as `[lon, lat]`; ring winding is passed through
//! unchanged (masks and regions are already oriented).

use geo::{LineString, MultiPolygon, Polygon};
use serde_json::{json, Value};

use super::clue::Constraint;
use super::fold::FogMask;
use crate::primitives::FeasibleRegion;

fn ring(ls: &LineString<f64>) -> Value {
    Value::Array(ls.0.iter().map(|c| json!([c.x, c.y])).collect())
}

fn polygon_rings(p: &Polygon<f64>) -> Value {
    let mut rings = vec![ring(p.exterior())];
    rings.extend(p.interiors().iter().map(ring));
    Value::Array(rings)
}

/// `MultiPolygon` geometry object.
pub fn multi_polygon_geometry(mp: &MultiPolygon<f64>) -> Value {
    json!({
        "type": "MultiPolygon",
        "coordinates": mp.0.iter().map(polygon_rings).collect::<Vec<_>>(),
    })
}

/// `Polygon` geometry object.
pub fn polygon_geometry(p: &Polygon<f64>) -> Value {
    json!({ "type": "Polygon", "coordinates": polygon_rings(p) })
}

/// `LineString` geometry object.
pub fn line_geometry(ls: &LineString<f64>) -> Value {
    json!({ "type": "LineString", "coordinates": ring(ls) })
}

/// Wrap a geometry in a `Feature`.
pub fn feature(geometry: Value, properties: Value) -> Value {
    json!({ "type": "Feature", "geometry": geometry, "properties": properties })
}

impl FogMask {
    /// Mask as a GeoJSON `Feature`.
    pub fn to_geojson(&self) -> Value {
        feature(
            multi_polygon_geometry(&self.0),
            json!({ "layer": "fog-mask" }),
        )
    }
}

impl FeasibleRegion {
    /// Region as a GeoJSON `Feature`; `null` geometry when unconstrained.
    pub fn to_geojson(&self) -> Value {
        let geometry = match self {
            FeasibleRegion::Unconstrained => Value::Null,
            FeasibleRegion::Bounded(mp) => multi_polygon_geometry(mp),
            FeasibleRegion::Empty => multi_polygon_geometry(&MultiPolygon::new(Vec::new())),
        };
        feature(geometry, json!({ "state": self.label() }))
    }
}

/// Constraint shapes as a `FeatureCollection` for debug overlays.
pub fn constraints_collection(constraints: &[Constraint]) -> Value {
    let features: Vec<Value> = constraints
        .iter()
        .map(|c| {
            feature(
                polygon_geometry(&c.shape),
                json!({ "clue_id": c.clue_id, "sequence": c.sequence, "op": c.op }),
            )
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}
