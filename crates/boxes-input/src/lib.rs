//! Input model: reads lines, expands tabs, computes common indent, and
//! applies substitution rules (spec.md §3.3, §4.3). Component C3.

mod reader;
mod tabs;

pub use reader::{read_raw_lines, ReadError, DEFAULT_MAX_LINE_BYTES};
pub use tabs::{expand_tabs, TabMode};

use boxes_design::{IndentMode, Rule};
use boxes_text::validate::ValidationContext;
use boxes_text::{BxString, BxStringError};
use std::io::BufRead;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error("invalid character in input: {0}")]
    InvalidChar(#[from] BxStringError),
}

/// One line of input (spec.md §3.3).
#[derive(Debug, Clone)]
pub struct Line {
    pub text: BxString,
    /// Populated only when tab mode is `keep` (spec.md §3.3).
    pub tab_positions: Vec<usize>,
}

/// `Input = { lines, max_columns, common_indent, final_newline }` (spec.md §3.3).
#[derive(Debug, Clone)]
pub struct Input {
    pub lines: Vec<Line>,
    pub max_columns: usize,
    pub common_indent: usize,
    pub final_newline: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    pub tab_stop: usize,
    pub tab_mode: TabMode,
    pub max_line_bytes: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            tab_stop: 8,
            tab_mode: TabMode::Expand,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

impl Input {
    /// Read and analyze input (spec.md §4.3 "Reading" + "Analysis" steps
    /// 1-2), without yet stripping common indent or applying rules — those
    /// are separate steps since remove mode skips the former and rule
    /// direction (forward vs reverse) depends on the caller's mode.
    pub fn read<R: BufRead>(reader: R, opts: &ReadOptions) -> Result<Self, InputError> {
        let (raw_lines, final_newline) = read_raw_lines(reader, opts.max_line_bytes)?;
        let mut lines = Vec::with_capacity(raw_lines.len());
        for raw in &raw_lines {
            let chars: Vec<char> = raw.chars().collect();
            let (expanded, tab_positions) = expand_tabs(&chars, opts.tab_stop, opts.tab_mode);
            let text = BxString::from_code_points(&expanded, ValidationContext::Anywhere)?;
            lines.push(Line { text, tab_positions });
        }
        let max_columns = lines.iter().map(|l| l.text.num_columns()).max().unwrap_or(0);
        let common_indent = compute_common_indent(&lines);
        tracing::debug!(
            target: "input",
            lines = lines.len(),
            max_columns,
            common_indent,
            "read input"
        );
        Ok(Self {
            lines,
            max_columns,
            common_indent,
            final_newline,
        })
    }

    /// spec.md §4.3 step 3: strip `common_indent` columns from the front of
    /// every line when not in `text` indent mode and not removing.
    pub fn strip_common_indent(&mut self, indent: IndentMode, removing: bool) {
        if indent == IndentMode::Text || removing || self.common_indent == 0 {
            return;
        }
        for line in &mut self.lines {
            let v = line.text.visible_at_or_after_column(self.common_indent);
            if let Ok(trimmed) = line.text.substring(v, line.text.num_visible()) {
                line.text = trimmed;
            }
        }
        self.max_columns = self.max_columns.saturating_sub(self.common_indent);
    }

    /// spec.md §4.3 step 4: apply replacement rules in order, rebuilding
    /// each line's bxstring afterward so metrics stay consistent.
    pub fn apply_rules(&mut self, rules: &[Rule]) -> Result<(), InputError> {
        if rules.is_empty() {
            return Ok(());
        }
        for line in &mut self.lines {
            let mut text = line.text.to_text();
            for rule in rules {
                text = rule.apply(&text);
            }
            let cps: Vec<char> = text.chars().collect();
            line.text = BxString::from_code_points(&cps, ValidationContext::Anywhere)?;
        }
        self.max_columns = self.lines.iter().map(|l| l.text.num_columns()).max().unwrap_or(0);
        Ok(())
    }
}

fn compute_common_indent(lines: &[Line]) -> usize {
    lines
        .iter()
        .filter(|l| !l.text.is_blank())
        .map(|l| l.text.indent())
        .min()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_and_computes_common_indent() {
        let data = b"  first\n    second\n".as_slice();
        let input = Input::read(data, &ReadOptions::default()).unwrap();
        assert_eq!(input.common_indent, 2);
        assert_eq!(input.lines.len(), 2);
    }

    #[test]
    fn all_blank_input_has_zero_common_indent() {
        let data = b"   \n   \n".as_slice();
        let input = Input::read(data, &ReadOptions::default()).unwrap();
        assert_eq!(input.common_indent, 0);
    }

    #[test]
    fn strip_common_indent_shrinks_lines_and_max_columns() {
        let data = b"  first\n    second\n".as_slice();
        let mut input = Input::read(data, &ReadOptions::default()).unwrap();
        input.strip_common_indent(IndentMode::Box, false);
        assert_eq!(input.lines[0].text.to_text(), "first");
        assert_eq!(input.lines[1].text.to_text(), "  second");
        assert_eq!(input.max_columns, 8);
    }

    #[test]
    fn text_indent_mode_skips_stripping() {
        let data = b"  first\n".as_slice();
        let mut input = Input::read(data, &ReadOptions::default()).unwrap();
        input.strip_common_indent(IndentMode::Text, false);
        assert_eq!(input.lines[0].text.to_text(), "  first");
    }

    #[test]
    fn keep_mode_records_tab_positions() {
        let data = b"\tindented\n".as_slice();
        let opts = ReadOptions {
            tab_mode: TabMode::Keep,
            ..ReadOptions::default()
        };
        let input = Input::read(data, &opts).unwrap();
        assert_eq!(input.lines[0].tab_positions, vec![0]);
    }
}
