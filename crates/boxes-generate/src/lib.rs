//! Output composition: the final boxed text (spec.md §4.6). Component C5.
//!
//! Grounded on `examples/original_source/src/generate.c`'s `output_box`/
//! `justify_line` for the row-composition order (top slab, vfill, content,
//! vfill, bottom slab) and on the teacher's `thiserror`-per-crate error
//! convention.

use boxes_design::{Design, IndentMode, Padding, Shape, Side};
use boxes_input::{Input, TabMode};
use boxes_sizing::{assemble_horizontal_side, assemble_vertical_side, horiz_precalc, vert_precalc};
use boxes_text::{validate::ValidationContext, BxString, BxStringError};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Text(#[from] BxStringError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eol {
    Lf,
    Cr,
    CrLf,
}

impl Eol {
    pub fn as_str(self) -> &'static str {
        match self {
            Eol::Lf => "\n",
            Eol::Cr => "\r",
            Eol::CrLf => "\r\n",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub halign: HAlign,
    pub valign: VAlign,
    pub justify: Justify,
    pub eol: Eol,
    pub indent: IndentMode,
    /// Effective padding: already merged with any `-p` override by the caller.
    pub padding: Padding,
    /// Effective minimum size: already merged with any `-s` override by the caller.
    pub min_width: usize,
    pub min_height: usize,
    pub tab_stop: usize,
    /// How the leading box indent is re-emitted: `Keep` restores literal TABs
    /// at their original columns, `Unexpand` re-compacts the indent into
    /// TABs regardless of how it was read, `Expand` leaves it as spaces.
    pub tab_mode: TabMode,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            halign: HAlign::Center,
            valign: VAlign::Center,
            justify: Justify::Left,
            eol: Eol::Lf,
            indent: IndentMode::Box,
            padding: Padding::default(),
            min_width: 0,
            min_height: 0,
            tab_stop: 8,
            tab_mode: TabMode::Expand,
        }
    }
}

/// Draw `input` inside `design`, per spec.md §4.6. Returns the complete
/// output text, final newline handling already applied.
pub fn generate(design: &Design, input: &Input, opts: &GenerateOptions) -> Result<String, GenerateError> {
    let nw_w = design.shape(Shape::Nw).width();
    let ne_w = design.shape(Shape::Ne).width();
    let nw_h = design.shape(Shape::Nw).height();
    let sw_h = design.shape(Shape::Sw).height();

    let min_width = opts.min_width.max(design.min_width);
    let min_height = opts.min_height.max(design.min_height);

    let target_width = (input.max_columns + opts.padding.left + opts.padding.right)
        .max(min_width.saturating_sub(nw_w + ne_w));
    let target_height = (input.lines.len() + opts.padding.top + opts.padding.bottom)
        .max(min_height.saturating_sub(nw_h + sw_h));

    let (top_iltf, bot_iltf) = horiz_precalc(design, target_width);
    let (left_iltf, right_iltf) = vert_precalc(design, target_height);

    let top_rows = assemble_horizontal_side(design, Side::Top, &top_iltf);
    let bot_rows = assemble_horizontal_side(design, Side::Bottom, &bot_iltf);
    let left_rows = assemble_vertical_side(design, Side::Left, &left_iltf);
    let right_rows = assemble_vertical_side(design, Side::Right, &right_iltf);

    let content_width = top_iltf.total().max(bot_iltf.total());
    let content_height = left_iltf.total().max(right_iltf.total());

    let hfill = content_width.saturating_sub(input.max_columns + opts.padding.left + opts.padding.right);
    let (hfill1, hfill2) = split_fill(hfill, match opts.halign {
        HAlign::Left => FillPos::Start,
        HAlign::Center => FillPos::Center,
        HAlign::Right => FillPos::End,
    });

    let vfill = content_height.saturating_sub(input.lines.len() + opts.padding.top + opts.padding.bottom);
    let (vfill1, vfill2) = split_fill(vfill, match opts.valign {
        VAlign::Top => FillPos::Start,
        VAlign::Center => FillPos::Center,
        VAlign::Bottom => FillPos::End,
    });

    let indent_str = match opts.indent {
        IndentMode::Box => reconstruct_indent(input, opts.tab_stop, opts.tab_mode)?,
        IndentMode::Text | IndentMode::None => BxString::empty(),
    };

    let mut rows: Vec<BxString> = Vec::new();

    for j in 0..design.side_height(Side::Top) {
        rows.push(
            indent_str
                .concat(&left_rows[j])
                .concat(&top_rows[j])
                .concat(&right_rows[j]),
        );
    }

    let mut body_idx = nw_h;
    let push_blank_body_row = |rows: &mut Vec<BxString>, body_idx: &mut usize| {
        let content = BxString::empty().append_spaces(content_width);
        rows.push(
            indent_str
                .concat(&left_rows[*body_idx])
                .concat(&content)
                .concat(&right_rows[*body_idx]),
        );
        *body_idx += 1;
    };

    for _ in 0..opts.padding.top {
        push_blank_body_row(&mut rows, &mut body_idx);
    }
    for _ in 0..vfill1 {
        push_blank_body_row(&mut rows, &mut body_idx);
    }

    for line in &input.lines {
        let slack = input.max_columns.saturating_sub(line.text.num_columns());
        let (shift, shift2) = split_fill(slack, match opts.justify {
            Justify::Left => FillPos::Start,
            Justify::Center => FillPos::Center,
            Justify::Right => FillPos::End,
        });
        let content = BxString::empty()
            .append_spaces(opts.padding.left)
            .append_spaces(hfill1)
            .append_spaces(shift)
            .concat(&line.text)
            .append_spaces(shift2)
            .append_spaces(hfill2)
            .append_spaces(opts.padding.right);
        rows.push(
            indent_str
                .concat(&left_rows[body_idx])
                .concat(&content)
                .concat(&right_rows[body_idx]),
        );
        body_idx += 1;
    }

    for _ in 0..vfill2 {
        push_blank_body_row(&mut rows, &mut body_idx);
    }
    for _ in 0..opts.padding.bottom {
        push_blank_body_row(&mut rows, &mut body_idx);
    }

    for j in 0..design.side_height(Side::Bottom) {
        rows.push(
            indent_str
                .concat(&left_rows[body_idx + j])
                .concat(&bot_rows[j])
                .concat(&right_rows[body_idx + j]),
        );
    }

    tracing::debug!(
        target: "generate",
        rows = rows.len(),
        content_width,
        content_height,
        "drew box"
    );

    let mut out = String::new();
    let n = rows.len();
    for (i, row) in rows.iter().enumerate() {
        out.push_str(row.trim_right().to_text().as_str());
        if i + 1 < n || input.final_newline {
            out.push_str(opts.eol.as_str());
        }
    }
    Ok(out)
}

#[derive(Clone, Copy)]
enum FillPos {
    Start,
    Center,
    End,
}

fn split_fill(total: usize, pos: FillPos) -> (usize, usize) {
    match pos {
        FillPos::Start => (0, total),
        FillPos::End => (total, 0),
        FillPos::Center => {
            let first = total / 2;
            (first, total - first)
        }
    }
}

/// Rebuild the outer box indent (spec.md §4.6 "Indent preservation").
///
/// `Keep` mode restores literal TABs at their original columns, using the
/// first line with recorded tab positions as the representative pattern for
/// the shared box-wide indent, since `common_indent` is necessarily a prefix
/// of every line's own indent. `Unexpand` mode ignores tab positions (the
/// reader never records them outside `Keep`) and instead re-compacts the
/// indent's column count into TABs the way
/// `examples/original_source/src/generate.c`'s unexpand path does: one TAB
/// per whole `tab_stop` columns, then literal spaces for the remainder.
/// `Expand` leaves the indent as spaces.
fn reconstruct_indent(input: &Input, tab_stop: usize, tab_mode: TabMode) -> Result<BxString, GenerateError> {
    let common_indent = input.common_indent;
    if common_indent == 0 {
        return Ok(BxString::empty());
    }

    let text = if tab_mode == TabMode::Unexpand {
        let tab_stop = tab_stop.max(1);
        let ntabs = common_indent / tab_stop;
        let remainder = common_indent % tab_stop;
        "\t".repeat(ntabs) + &" ".repeat(remainder)
    } else {
        let tab_positions = input
            .lines
            .iter()
            .find(|l| !l.tab_positions.is_empty())
            .map(|l| l.tab_positions.as_slice())
            .unwrap_or(&[]);
        let tabs: HashSet<usize> = tab_positions.iter().copied().collect();

        let mut text = String::new();
        let mut col = 0usize;
        while col < common_indent {
            if tabs.contains(&col) {
                let next_stop = ((col / tab_stop) + 1) * tab_stop;
                if next_stop <= common_indent {
                    text.push('\t');
                    col = next_stop;
                    continue;
                }
            }
            text.push(' ');
            col += 1;
        }
        text
    };

    Ok(BxString::from_code_points(
        &text.chars().collect::<Vec<_>>(),
        ValidationContext::Anywhere,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxes_design::default_design;
    use boxes_input::ReadOptions;

    fn draw(text: &str, opts: &GenerateOptions) -> String {
        let mut input = Input::read(text.as_bytes(), &ReadOptions::default()).unwrap();
        input.strip_common_indent(opts.indent, false);
        let design = default_design();
        generate(design, &input, opts).unwrap()
    }

    #[test]
    fn single_line_box_has_top_content_bottom() {
        let out = draw("hello\n", &GenerateOptions::default());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("hello"));
    }

    #[test]
    fn content_width_covers_longest_line() {
        let out = draw("a\nlonger line\n", &GenerateOptions::default());
        let lines: Vec<&str> = out.lines().collect();
        let widths: HashSet<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert_eq!(widths.len(), 1, "all rows must share one width: {:?}", lines);
    }

    #[test]
    fn no_final_newline_is_preserved() {
        let out = draw("hello", &GenerateOptions::default());
        assert!(!out.ends_with('\n'));
    }

    #[test]
    fn final_newline_is_preserved_when_present() {
        let out = draw("hello\n", &GenerateOptions::default());
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn box_indent_mode_prefixes_every_row() {
        let out = draw("  hello\n", &GenerateOptions::default());
        let first_line = out.lines().next().unwrap();
        assert!(first_line.starts_with("  "));
    }

    #[test]
    fn unexpand_tab_mode_recompacts_indent_into_tabs() {
        let opts = GenerateOptions { tab_stop: 4, tab_mode: TabMode::Unexpand, ..GenerateOptions::default() };
        let out = draw("        hello\n", &opts);
        let first_line = out.lines().next().unwrap();
        assert!(first_line.starts_with("\t\t"), "expected two tabs, got {first_line:?}");
    }

    #[test]
    fn expand_tab_mode_leaves_indent_as_spaces() {
        let opts = GenerateOptions { tab_stop: 4, tab_mode: TabMode::Expand, ..GenerateOptions::default() };
        let out = draw("        hello\n", &opts);
        let first_line = out.lines().next().unwrap();
        assert!(first_line.starts_with("        "));
        assert!(!first_line.contains('\t'));
    }

    #[test]
    fn text_indent_mode_has_no_outer_indent() {
        let opts = GenerateOptions {
            indent: IndentMode::Text,
            ..GenerateOptions::default()
        };
        let out = draw("  hello\n", &opts);
        let first_line = out.lines().next().unwrap();
        assert!(!first_line.starts_with("  "));
    }
}
