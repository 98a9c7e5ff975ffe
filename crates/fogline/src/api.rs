//! Curated surface for host applications.
//!
//! The map layer needs three things per history change: the fog mask, the
//! play-area mask, and (optionally) per-clue overlays. Everything here is a
//! thin composition of `deduce` and `primitives`.

pub use crate::deduce::geojson::{constraints_collection, feature, line_geometry, polygon_geometry};
pub use crate::deduce::{constraints, fog_mask, fold, fold_with, mask, Clue, FogMask};
pub use crate::primitives::{bisector_line, play_area_mask, FeasibleRegion, GeomCfg, LonLat};

use serde_json::{json, Value};

use crate::deduce::ClueKind;

/// Half-length of the bisector overlay drawn for comparative clues, in meters.
pub const BISECTOR_OVERLAY_HALF_LENGTH_M: f64 = 10_000.0;

/// Fog mask for `history` as GeoJSON; `Value::Null` when nothing is hidden.
pub fn fog_mask_geojson(history: &[Clue], cfg: GeomCfg) -> Value {
    mask(&fold_with(history, cfg))
        .map(|m| m.to_geojson())
        .unwrap_or(Value::Null)
}

/// Bisector lines of every well-formed comparative clue, as a `FeatureCollection`.
pub fn bisector_overlay(history: &[Clue]) -> Value {
    let features: Vec<Value> = history
        .iter()
        .filter(|c| c.kind == ClueKind::ComparativeDistance)
        .filter_map(|c| {
            let (a, b) = (c.params.point_a?, c.params.point_b?);
            if !(a.is_valid() && b.is_valid()) {
                return None;
            }
            let line = bisector_line(a, b, BISECTOR_OVERLAY_HALF_LENGTH_M);
            if line.0.is_empty() {
                return None;
            }
            Some(feature(
                line_geometry(&line),
                json!({ "clue_id": c.id, "sequence": c.sequence }),
            ))
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

/// Play-area mask (world with the game zone punched out) as a GeoJSON `Feature`.
pub fn play_area_geojson(center: LonLat, radius_m: f64) -> Value {
    feature(
        polygon_geometry(&play_area_mask(center, radius_m)),
        json!({ "layer": "play-area" }),
    )
}
