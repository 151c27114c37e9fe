//! Sizing and layout: precalculation and side assembly (spec.md §4.4-§4.5).
//! Component C4.

mod assemble;
mod precalc;

pub use assemble::{assemble_horizontal_side, assemble_vertical_side};
pub use precalc::{horiz_precalc, vert_precalc, Iltf};
