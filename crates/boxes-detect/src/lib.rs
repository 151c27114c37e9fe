//! Design autodetection (spec.md §4.7). Component C6.
//!
//! Grounded on `examples/original_source/src/detect.c`'s four comparison
//! modes and per-shape scoring; the original's nested nested loops are
//! expressed here as small per-region helper functions instead.

use boxes_design::{Catalog, Design, Shape, Side};
use boxes_input::{Input, Line};
use boxes_text::BxString;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareMode {
    Literal,
    IgnoreInvisibleInput,
    IgnoreInvisibleShape,
    IgnoreInvisibleAll,
}

const MODES: [CompareMode; 4] = [
    CompareMode::Literal,
    CompareMode::IgnoreInvisibleInput,
    CompareMode::IgnoreInvisibleShape,
    CompareMode::IgnoreInvisibleAll,
];

/// A mode "wins outright" once some design scores above this under it
/// (spec.md §4.7 "as soon as some mode yields more than 2 hits").
const DECISIVE_SCORE: u64 = 2;

/// Pick the design that best explains `input` (spec.md §4.7). `None` only
/// when the catalog or the input is empty; the caller (the remover) treats
/// that as a fatal autodetection failure.
pub fn detect<'a>(catalog: &'a Catalog, input: &Input) -> Option<&'a Design> {
    if catalog.is_empty() || input.lines.is_empty() {
        return None;
    }

    let input_has_invisible = input.lines.iter().any(|l| l.text.num_invisible() > 0);
    let any_design_has_invisible = catalog.iter().any(design_has_invisible);

    let mut best_overall: Option<(&Design, u64)> = None;
    for mode in MODES {
        if !mode_is_viable(mode, input_has_invisible, any_design_has_invisible) {
            continue;
        }
        let mut best_this_mode: Option<(&Design, u64)> = None;
        for design in catalog.iter() {
            let score = score_design(design, input, mode);
            if best_this_mode.as_ref().is_none_or(|&(_, s)| score > s) {
                best_this_mode = Some((design, score));
            }
        }
        if let Some((design, score)) = best_this_mode {
            tracing::debug!(target: "detect", ?mode, design = design.name.as_str(), score, "scored mode");
            best_overall = Some((design, score));
            if score > DECISIVE_SCORE {
                break;
            }
        }
    }
    best_overall.map(|(d, _)| d)
}

fn mode_is_viable(mode: CompareMode, input_has_invisible: bool, design_has_invisible: bool) -> bool {
    match mode {
        CompareMode::Literal => true,
        CompareMode::IgnoreInvisibleInput => input_has_invisible && !design_has_invisible,
        CompareMode::IgnoreInvisibleShape => !input_has_invisible && design_has_invisible,
        CompareMode::IgnoreInvisibleAll => true,
    }
}

fn design_has_invisible(design: &Design) -> bool {
    Shape::ALL
        .iter()
        .any(|&s| design.shape(s).lines.iter().any(|l| l.num_invisible() > 0))
}

fn design_text(s: &BxString, mode: CompareMode) -> String {
    match mode {
        CompareMode::IgnoreInvisibleShape | CompareMode::IgnoreInvisibleAll => {
            s.visible_only().to_text()
        }
        _ => s.to_text(),
    }
}

fn input_text(s: &BxString, mode: CompareMode) -> String {
    match mode {
        CompareMode::IgnoreInvisibleInput | CompareMode::IgnoreInvisibleAll => {
            s.visible_only().to_text()
        }
        _ => s.to_text(),
    }
}

fn line_text(line: &Line, mode: CompareMode) -> String {
    input_text(&line.text, mode)
}

fn score_design(design: &Design, input: &Input, mode: CompareMode) -> u64 {
    let n = input.lines.len();
    let mut score = score_corners(design, input, mode, n);
    score += score_horizontal_edges(design, input, mode, n);
    score += score_vertical_edges(design, input, mode, n);
    score
}

fn score_corners(design: &Design, input: &Input, mode: CompareMode, n: usize) -> u64 {
    let mut score = 0u64;
    for &(corner, top) in &[
        (Shape::Nw, true),
        (Shape::Ne, true),
        (Shape::Se, false),
        (Shape::Sw, false),
    ] {
        let entry = design.shape(corner);
        if entry.is_blank() {
            continue;
        }
        let west = matches!(corner, Shape::Nw | Shape::Sw);
        for r in 0..entry.height() {
            let li = if top { r } else { n.saturating_sub(entry.height()) + r };
            let Some(line) = input.lines.get(li) else {
                continue;
            };
            let needle = design_text(&entry.lines[r], mode);
            if needle.is_empty() {
                continue;
            }
            let haystack = line_text(line, mode);
            let hit = if west {
                haystack.starts_with(&needle)
            } else {
                haystack.ends_with(&needle)
            };
            if hit {
                score += 1;
            }
        }
    }
    score
}

fn score_horizontal_edges(design: &Design, input: &Input, mode: CompareMode, n: usize) -> u64 {
    let mut score = 0u64;
    for side in [Side::Top, Side::Bottom] {
        if design.side_is_empty(side) {
            continue;
        }
        let top = side == Side::Top;
        for e in side.edges() {
            let entry = design.shape(e);
            if entry.is_blank() {
                continue;
            }
            for r in 0..entry.height() {
                let li = if top { r } else { n.saturating_sub(entry.height()) + r };
                let Some(line) = input.lines.get(li) else {
                    continue;
                };
                let mut needle = design_text(&entry.lines[r], mode);
                if needle.is_empty() {
                    continue;
                }
                if entry.elastic {
                    needle = format!("{needle}{needle}");
                }
                let haystack = line_text(line, mode);
                if haystack.contains(&needle) {
                    score += 1;
                }
            }
        }
    }
    score
}

fn score_vertical_edges(design: &Design, input: &Input, mode: CompareMode, n: usize) -> u64 {
    let mut score = 0u64;
    let top_h = design.side_height(Side::Top);
    let bot_h = design.side_height(Side::Bottom);
    let body_end = n.saturating_sub(bot_h);
    for side in [Side::Left, Side::Right] {
        if design.side_is_empty(side) {
            continue;
        }
        let west = side == Side::Left;
        for e in side.edges() {
            let entry = design.shape(e);
            if entry.is_blank() {
                continue;
            }
            for row_idx in top_h..body_end {
                let Some(line) = input.lines.get(row_idx) else {
                    continue;
                };
                let haystack = line_text(line, mode);
                let hit = entry.lines.iter().any(|shape_line| {
                    let needle = design_text(shape_line, mode);
                    !needle.is_empty()
                        && if west {
                            haystack.starts_with(&needle)
                        } else {
                            haystack.ends_with(&needle)
                        }
                });
                if hit {
                    score += 1;
                }
            }
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxes_design::default_design;
    use boxes_generate::{generate, GenerateOptions};
    use boxes_input::ReadOptions;

    fn catalog_with_default() -> Catalog {
        Catalog::from_designs(vec![default_design().clone()])
    }

    #[test]
    fn detects_the_design_used_to_draw_the_box() {
        let catalog = catalog_with_default();
        let source = Input::read(b"hello\n".as_slice(), &ReadOptions::default()).unwrap();
        let drawn = generate(default_design(), &source, &GenerateOptions::default()).unwrap();
        let boxed = Input::read(drawn.as_bytes(), &ReadOptions::default()).unwrap();
        let found = detect(&catalog, &boxed).unwrap();
        assert_eq!(found.name, "default");
    }

    #[test]
    fn empty_catalog_detects_nothing() {
        let catalog = Catalog::empty();
        let input = Input::read(b"hello\n".as_slice(), &ReadOptions::default()).unwrap();
        assert!(detect(&catalog, &input).is_none());
    }

    #[test]
    fn empty_input_detects_nothing() {
        let catalog = catalog_with_default();
        let input = Input::read(b"".as_slice(), &ReadOptions::default()).unwrap();
        assert!(detect(&catalog, &input).is_none());
    }
}
