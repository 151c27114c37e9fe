//! Side assembly into 2-D character grids (spec.md §4.5).
//!
//! Grounded on `examples/original_source/src/generate.c`'s `vert_assemble`
//! (confusingly, the source's `vert_assemble` builds the *horizontal*
//! top/bottom sides, and `horiz_assemble` the *vertical* left/right ones —
//! this implementation uses the clearer
//! `assemble_horizontal_side`/`assemble_vertical_side` names instead).

use crate::precalc::Iltf;
use boxes_design::{Design, Side};
use boxes_text::BxString;

/// Build the top or bottom side as a rectangle of `height(side)` rows,
/// each `width(NW) + iltf.total() + width(NE)` columns wide (spec.md §4.5
/// first paragraph).
pub fn assemble_horizontal_side(design: &Design, side: Side, iltf: &Iltf) -> Vec<BxString> {
    let shapes = side.shapes();
    let (corner_a, corner_b) = (shapes[0], shapes[4]);
    let edges = side.edges();
    let height = design.side_height(side);
    let mut rows = Vec::with_capacity(height);
    for r in 0..height {
        let mut row = shape_row(design, corner_a, r);
        for (k, &edge) in edges.iter().enumerate() {
            row = row.concat(&repeated_edge_row(design, edge, r, iltf.0[k]));
        }
        row = row.concat(&shape_row(design, corner_b, r));
        rows.push(row);
    }
    rows
}

/// Build the left or right side as a rectangle of `height(NW) + iltf.total()
/// + height(SW)` rows, each `width(side)` columns wide (spec.md §4.5 second
/// paragraph).
pub fn assemble_vertical_side(design: &Design, side: Side, iltf: &Iltf) -> Vec<BxString> {
    let shapes = side.shapes();
    let (corner_a, corner_b) = (shapes[0], shapes[4]);
    let edges = side.edges();
    let width = design.side_width(side);
    let mut rows = Vec::new();
    let a_height = design.shape(corner_a).height();
    for r in 0..a_height {
        rows.push(pad_to_width(shape_row(design, corner_a, r), width));
    }
    for (k, &edge) in edges.iter().enumerate() {
        let edge_height = design.shape(edge).height().max(1);
        let copies = if iltf.0[k] == 0 { 0 } else { iltf.0[k] / edge_height };
        for _ in 0..copies {
            for r in 0..edge_height {
                rows.push(pad_to_width(shape_row(design, edge, r), width));
            }
        }
    }
    let b_height = design.shape(corner_b).height();
    for r in 0..b_height {
        rows.push(pad_to_width(shape_row(design, corner_b, r), width));
    }
    rows
}

fn shape_row(design: &Design, shape: boxes_design::Shape, r: usize) -> BxString {
    let entry = design.shape(shape);
    if entry.is_empty() {
        return BxString::empty();
    }
    entry.lines[r % entry.height()].clone()
}

/// Repeat `edge`'s row `r` (modulo its own height) enough times to cover
/// `columns` display columns. `columns` is always an exact multiple of the
/// shape's width by construction of the precalc step that produced it.
fn repeated_edge_row(design: &Design, edge: boxes_design::Shape, r: usize, columns: usize) -> BxString {
    let entry = design.shape(edge);
    if entry.is_empty() || columns == 0 {
        return BxString::empty();
    }
    let line = entry.lines[r % entry.height()].clone();
    let width = line.num_columns().max(1);
    let copies = columns / width;
    let mut out = BxString::empty();
    for _ in 0..copies {
        out = out.concat(&line);
    }
    out
}

fn pad_to_width(line: BxString, width: usize) -> BxString {
    let short = width.saturating_sub(line.num_columns());
    if short == 0 {
        line
    } else {
        line.append_spaces(short)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::precalc::horiz_precalc;
    use boxes_design::default_design;

    #[test]
    fn assembled_top_has_design_height_and_converged_width() {
        let design = default_design();
        let (top_iltf, _bot_iltf) = horiz_precalc(design, 10);
        let rows = assemble_horizontal_side(design, Side::Top, &top_iltf);
        assert_eq!(rows.len(), design.side_height(Side::Top));
        let nw = design.shape(boxes_design::Shape::Nw).width();
        let ne = design.shape(boxes_design::Shape::Ne).width();
        for row in &rows {
            assert_eq!(row.num_columns(), nw + top_iltf.total() + ne);
        }
    }

    #[test]
    fn assembled_left_has_design_width_and_rows_equal_to_vertical_total() {
        let design = default_design();
        use crate::precalc::vert_precalc;
        let (left_iltf, _right_iltf) = vert_precalc(design, 3);
        let rows = assemble_vertical_side(design, Side::Left, &left_iltf);
        let nw_h = design.shape(boxes_design::Shape::Nw).height();
        let sw_h = design.shape(boxes_design::Shape::Sw).height();
        assert_eq!(rows.len(), nw_h + left_iltf.total() + sw_h);
        let w = design.side_width(Side::Left);
        for row in &rows {
            assert_eq!(row.num_columns(), w);
        }
    }
}
