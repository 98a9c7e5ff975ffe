//! Constraint shapes: disks, bisector half-planes, the world boundary.
//!
//! All shapes are built in a local equirectangular chart (`LocalChart`) and
//! mapped back to lon/lat. That approximation is good for gameplay radii
//! (sub-200 km); nothing here attempts true geodesic circles.
//!
//! Exterior rings are counter-clockwise. Degenerate inputs produce an empty
//! polygon (no rings) instead of an error; callers decide what that means.

use geo::{Coord, Distance, Haversine, LineString, Point, Polygon};
use nalgebra::Vector2;

use super::types::{wrap_lon_delta, GeomCfg, LocalChart, LonLat, M_PER_DEG_LAT};

/// Minimum separation (meters) for a bisector to be well defined.
const MIN_SEPARATION_M: f64 = 1e-3;

/// Polygon with no rings; zero area, absorbs nothing.
#[inline]
pub fn empty_polygon() -> Polygon<f64> {
    Polygon::new(LineString::new(Vec::new()), Vec::new())
}

/// True if the polygon has no usable exterior ring.
#[inline]
pub fn is_empty_polygon(p: &Polygon<f64>) -> bool {
    p.exterior().0.len() < 4
}

/// The universal set: lon ∈ [-180, 180], lat ∈ [-90, 90], wound counter-clockwise.
pub fn world_boundary() -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![
            (-180.0, -90.0),
            (180.0, -90.0),
            (180.0, 90.0),
            (-180.0, 90.0),
            (-180.0, -90.0),
        ]),
        Vec::new(),
    )
}

/// Great-circle (haversine) distance in meters.
#[inline]
pub fn distance_m(a: LonLat, b: LonLat) -> f64 {
    Haversine::distance(Point::from(a), Point::from(b))
}

/// Disk of `radius_m` around `center` with the default vertex count.
#[inline]
pub fn disk(center: LonLat, radius_m: f64) -> Polygon<f64> {
    disk_with(center, radius_m, GeomCfg::default())
}

/// Regular `cfg.disk_vertices`-gon approximating a disk.
///
/// Radius ≤ 0, NaN radius, or a non-finite center yields `empty_polygon()`.
/// A disk that reaches over a pole is returned as a `polar_cap`.
pub fn disk_with(center: LonLat, radius_m: f64, cfg: GeomCfg) -> Polygon<f64> {
    if !(radius_m.is_finite() && radius_m > 0.0) || !center.is_finite() {
        return empty_polygon();
    }
    let n = cfg.disk_vertices.max(3);
    if (90.0 - center.lat.abs()) * M_PER_DEG_LAT < radius_m {
        return polar_cap(center, radius_m, n);
    }
    let chart = LocalChart::at(center);
    let ring: Vec<Coord<f64>> = (0..n)
        .map(|i| {
            let theta = std::f64::consts::TAU * (i as f64) / (n as f64);
            let v = Vector2::new(theta.cos(), theta.sin()) * radius_m;
            chart.unproject(v).into()
        })
        .collect();
    Polygon::new(LineString::from(ring), Vec::new())
}

/// Disk containing the nearer pole, in polar azimuthal coordinates.
///
/// Distance from the pole is `(90 - |lat|)` degrees times `M_PER_DEG_LAT`.
/// For each bearing `phi` off the center's meridian the boundary sits at the
/// far intersection of that ray with the circle; `n + 1` samples span
/// `center.lon ± 180`, then the ring closes along the pole's latitude.
fn polar_cap(center: LonLat, radius_m: f64, n: usize) -> Polygon<f64> {
    let north = center.lat >= 0.0;
    let pole_lat = if north { 90.0 } else { -90.0 };
    let rho_c = (90.0 - center.lat.abs()).max(0.0) * M_PER_DEG_LAT;
    let mut ring: Vec<Coord<f64>> = (0..=n)
        .map(|i| {
            let phi = -std::f64::consts::PI + std::f64::consts::TAU * (i as f64) / (n as f64);
            let s = rho_c * phi.sin();
            let rho = rho_c * phi.cos() + (radius_m * radius_m - s * s).max(0.0).sqrt();
            let off = (rho / M_PER_DEG_LAT).min(180.0);
            let lat = if north { 90.0 - off } else { -90.0 + off };
            Coord {
                x: center.lon + phi.to_degrees(),
                y: lat,
            }
        })
        .collect();
    // counter-clockwise in lon/lat: the boundary, then back along the pole line
    if north {
        ring.push(Coord { x: center.lon + 180.0, y: pole_lat });
        ring.push(Coord { x: center.lon - 180.0, y: pole_lat });
    } else {
        ring.reverse();
        ring.push(Coord { x: center.lon - 180.0, y: pole_lat });
        ring.push(Coord { x: center.lon + 180.0, y: pole_lat });
    }
    Polygon::new(LineString::from(ring), Vec::new())
}

/// Frame of the perpendicular bisector of `from → to` in a chart at their midpoint.
struct BisectorFrame {
    chart: LocalChart,
    /// Midpoint in chart coordinates (meters).
    mid: Vector2<f64>,
    /// Unit vector from `from` toward `to`.
    fwd: Vector2<f64>,
    /// `fwd` rotated +90° (counter-clockwise).
    left: Vector2<f64>,
}

impl BisectorFrame {
    fn new(from: LonLat, to: LonLat) -> Option<Self> {
        if !from.is_finite() || !to.is_finite() {
            return None;
        }
        let origin = LonLat::new(
            from.lon + 0.5 * wrap_lon_delta(to.lon - from.lon),
            0.5 * (from.lat + to.lat),
        );
        let chart = LocalChart::at(origin);
        let p_from = chart.project(from);
        let p_to = chart.project(to);
        let axis = p_to - p_from;
        let len = axis.norm();
        if !len.is_finite() || len < MIN_SEPARATION_M {
            return None;
        }
        let fwd = axis / len;
        Some(Self {
            chart,
            mid: (p_from + p_to) * 0.5,
            fwd,
            left: Vector2::new(-fwd.y, fwd.x),
        })
    }
}

/// Bounded stand-in for the half-plane of points closer to `b` (or to `a`).
#[inline]
pub fn bisector_half_plane(a: LonLat, b: LonLat, side_toward_b: bool) -> Polygon<f64> {
    bisector_half_plane_with(a, b, side_toward_b, GeomCfg::default())
}

/// Quadrilateral with one edge on the perpendicular bisector of `a`–`b`.
///
/// The edge spans `cfg.half_plane_width_m` either side of the midpoint and the
/// quad extends the same distance forward, toward `b` when `side_toward_b`,
/// otherwise toward `a`. Coincident or non-finite points yield `empty_polygon()`.
pub fn bisector_half_plane_with(
    a: LonLat,
    b: LonLat,
    side_toward_b: bool,
    cfg: GeomCfg,
) -> Polygon<f64> {
    let (from, to) = if side_toward_b { (a, b) } else { (b, a) };
    let Some(f) = BisectorFrame::new(from, to) else {
        return empty_polygon();
    };
    let w = cfg.half_plane_width_m;
    let corners = [
        f.mid + f.left * w,
        f.mid - f.left * w,
        f.mid - f.left * w + f.fwd * w,
        f.mid + f.left * w + f.fwd * w,
    ];
    let ring: Vec<Coord<f64>> = corners.iter().map(|v| f.chart.unproject(*v).into()).collect();
    Polygon::new(LineString::from(ring), Vec::new())
}

/// Segment of the perpendicular bisector of `a`–`b`, `half_length_m` each side
/// of the midpoint. Empty for coincident points.
pub fn bisector_line(a: LonLat, b: LonLat, half_length_m: f64) -> LineString<f64> {
    let Some(f) = BisectorFrame::new(a, b) else {
        return LineString::new(Vec::new());
    };
    let ends = [f.mid + f.left * half_length_m, f.mid - f.left * half_length_m];
    LineString::from(
        ends.iter()
            .map(|v| Coord::from(f.chart.unproject(*v)))
            .collect::<Vec<_>>(),
    )
}

/// World boundary with the play-area disk punched out as a hole.
///
/// Hides everything outside the game zone. Ring winding: exterior
/// counter-clockwise, hole clockwise.
pub fn play_area_mask(center: LonLat, radius_m: f64) -> Polygon<f64> {
    play_area_mask_with(center, radius_m, GeomCfg::default())
}

/// `play_area_mask` with explicit configuration.
pub fn play_area_mask_with(center: LonLat, radius_m: f64, cfg: GeomCfg) -> Polygon<f64> {
    let zone = disk_with(center, radius_m, cfg);
    let (world, _) = world_boundary().into_inner();
    if is_empty_polygon(&zone) {
        return Polygon::new(world, Vec::new());
    }
    let (mut hole, _) = zone.into_inner();
    hole.0.reverse();
    Polygon::new(world, vec![hole])
}
