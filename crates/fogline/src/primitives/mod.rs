//! Geometry primitives (leaf layer).
//!
//! Purpose
//! - Build the constraint shapes a clue can produce (disk, bisector half-plane)
//!   and the universal set (world boundary) in lon/lat degrees.
//! - Provide boolean operators over feasible regions that degrade to no-ops
//!   instead of failing.
//!
//! Conventions
//! - Points are `[lon, lat]` decimal degrees; radii and widths are meters.
//! - Shapes use a local equirectangular chart around their center/midpoint.
//! - Exterior rings counter-clockwise, holes clockwise.
//!
//! Code cross-refs: `crate::deduce::{fold, mask}`

mod region;
mod shapes;
mod types;

pub use region::{
    difference, intersect, try_boolean, wrap_to_world, BoolOp, FeasibleRegion, OpError,
};
pub use shapes::{
    bisector_half_plane, bisector_half_plane_with, bisector_line, disk, disk_with, distance_m,
    empty_polygon, is_empty_polygon, play_area_mask, play_area_mask_with, world_boundary,
};
pub use types::{GeomCfg, LonLat};
