//! Basic geographic types and tolerances used by the primitives.
//!
//! - `LonLat`: decimal-degree point, serialized as a `[lon, lat]` pair.
//! - `GeomCfg`: centralizes vertex counts, half-plane extent and area epsilon.
//! - `LocalChart`: local equirectangular chart (meters) around an origin.
//!
//! Code cross-refs: `shapes::{disk_with, bisector_half_plane_with}`, `region::FeasibleRegion`

use geo::{Coord, Point};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Meters per degree of longitude at the equator.
pub(crate) const M_PER_DEG_LON: f64 = 111_320.0;
/// Meters per degree of latitude.
pub(crate) const M_PER_DEG_LAT: f64 = 110_574.0;
/// Floor for `cos(lat)` so charts stay finite at the poles.
/// Disks that cover a pole are built as polar caps instead (`shapes::polar_cap`).
const MIN_COS_LAT: f64 = 1e-6;

/// Point in decimal degrees. Wire form is `[lon, lat]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
    /// Finite and inside lon ∈ [-180, 180], lat ∈ [-90, 90].
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.is_finite() && (-180.0..=180.0).contains(&self.lon) && (-90.0..=90.0).contains(&self.lat)
    }
}

impl From<[f64; 2]> for LonLat {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}
impl From<LonLat> for [f64; 2] {
    fn from(p: LonLat) -> Self {
        [p.lon, p.lat]
    }
}
impl From<LonLat> for Coord<f64> {
    fn from(p: LonLat) -> Self {
        Coord { x: p.lon, y: p.lat }
    }
}
impl From<LonLat> for Point<f64> {
    fn from(p: LonLat) -> Self {
        Point::new(p.lon, p.lat)
    }
}

/// Geometry configuration (construction sizes and tolerances).
#[derive(Clone, Copy, Debug)]
pub struct GeomCfg {
    /// Vertex count of disk approximations.
    pub disk_vertices: usize,
    /// Half-width and forward depth of the bisector quadrilateral, in meters.
    pub half_plane_width_m: f64,
    /// Planar area (deg²) at or below which a clipped region counts as empty.
    pub area_eps: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            disk_vertices: 64,
            half_plane_width_m: 100_000.0,
            area_eps: 1e-12,
        }
    }
}

/// Local equirectangular chart: degrees around `origin` ↦ meters east/north.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LocalChart {
    origin: LonLat,
    m_per_deg: Vector2<f64>,
}

impl LocalChart {
    pub(crate) fn at(origin: LonLat) -> Self {
        let cos_lat = origin.lat.to_radians().cos().max(MIN_COS_LAT);
        Self {
            origin,
            m_per_deg: Vector2::new(M_PER_DEG_LON * cos_lat, M_PER_DEG_LAT),
        }
    }
    #[inline]
    pub(crate) fn project(&self, p: LonLat) -> Vector2<f64> {
        let d = Vector2::new(wrap_lon_delta(p.lon - self.origin.lon), p.lat - self.origin.lat);
        d.component_mul(&self.m_per_deg)
    }
    /// Inverse of `project`, with the longitude offset clamped to ±180° and the
    /// latitude to [-90, 90].
    #[inline]
    pub(crate) fn unproject(&self, v: Vector2<f64>) -> LonLat {
        let d = v.component_div(&self.m_per_deg);
        LonLat::new(
            self.origin.lon + d.x.clamp(-180.0, 180.0),
            (self.origin.lat + d.y).clamp(-90.0, 90.0),
        )
    }
}

/// Longitude difference folded into (-180, 180].
#[inline]
pub(crate) fn wrap_lon_delta(d: f64) -> f64 {
    if !d.is_finite() {
        return d;
    }
    let x = (d + 180.0).rem_euclid(360.0) - 180.0;
    if x == -180.0 {
        180.0
    } else {
        x
    }
}
