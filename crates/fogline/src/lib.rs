//! Spatial deduction for location-based hide-and-seek.
//!
//! Seekers ask yes/no clues about the hider's position. This crate folds the
//! resolved clue history into the region still consistent with every clue and
//! derives the fog mask a map layer should draw over everything else.
//!
//! Layers (leaves first)
//! - `primitives`: disks, bisector half-planes, world boundary, guarded
//!   boolean operations over `FeasibleRegion`.
//! - `deduce`: clue model, clue → constraint mapping, `fold`, `mask`, GeoJSON.
//!
//! API Policy
//! - `fold` and `mask` are pure and synchronous. Callers own the history
//!   buffer, pre-filter unresolved clues, and recompute on every change.

pub mod api;
pub mod deduce;
pub mod primitives;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::deduce::{
        constraints, fog_mask, fold, fold_with, mask, Clue, ClueKind, ClueParams, FogMask, FoldOp,
    };
    pub use crate::primitives::{FeasibleRegion, GeomCfg, LonLat};
}
