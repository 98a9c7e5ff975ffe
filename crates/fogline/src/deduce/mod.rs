//! Spatial deduction engine.
//!
//! Purpose
//! - Map each resolved clue to a constraint shape and fold operator.
//! - Fold an ordered clue history into a `FeasibleRegion` and derive the fog
//!   mask from it.
//!
//! Model
//! - `fold(history) -> FeasibleRegion` and `mask(&region) -> Option<FogMask>`
//!   are pure; callers pass only resolved clues and recompute on every change.
//! - History is folded in `(sequence, id)` order, never in slice order.
//! - A malformed clue or a failed clipping step contributes nothing; there is
//!   no error path out of the fold.
//!
//! Code cross-refs: `crate::primitives::{intersect, difference, FeasibleRegion}`

mod clue;
mod fold;
pub mod geojson;

pub use clue::{constraint_for, fold_op, Clue, ClueError, ClueKind, ClueParams, Constraint, FoldOp};
pub use fold::{constraints, fog_mask, fold, fold_with, mask, FogMask};

#[cfg(test)]
mod tests;
