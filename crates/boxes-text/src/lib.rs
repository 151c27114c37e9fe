//! `bxstring`: an immutable, column- and visibility-aware string primitive
//! (spec.md §3.1, §4.1).
//!
//! Every operation returns a new value; nothing mutates a `BxString` in
//! place. Indices into `first_of`/`visible_at` run over "visible index"
//! space `0..=num_visible`, with the last slot describing the terminator
//! (end of string), exactly as `examples/original_source/src/bxstring.h`
//! documents for `first_char`/`visible_char`.

mod ansi;
pub mod validate;
pub mod width;

use ansi::{CsiScanner, Feed};
use std::fmt;
use thiserror::Error;
use validate::ValidationContext;

#[derive(Debug, Error)]
pub enum BxStringError {
    #[error("disallowed control character U+{:04X} in this context", *.0 as u32)]
    DisallowedControlChar(char),
    #[error("internal error: index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

type Result<T> = std::result::Result<T, BxStringError>;

/// Column/visibility-aware immutable string (spec.md §3.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BxString {
    code_points: Vec<char>,
    ascii_shadow: String,
    num_invisible: usize,
    num_columns: usize,
    indent: usize,
    trailing: usize,
    /// Length `num_visible + 1`; last entry is the terminator.
    first_of: Vec<usize>,
    /// Length `num_visible + 1`; last entry is the terminator (`num_code_points`).
    visible_at: Vec<usize>,
    /// Cumulative display column at each visible index; length `num_visible + 1`.
    columns_at: Vec<usize>,
}

impl BxString {
    /// Build from a plain ASCII string (no tabs, no escapes expected, but
    /// not enforced beyond the `Anywhere` predicate).
    pub fn from_ascii(s: &str) -> Result<Self> {
        Self::from_code_points(&s.chars().collect::<Vec<_>>(), ValidationContext::Anywhere)
    }

    /// Build from a sequence of Unicode scalar values (the "UTF-32" of
    /// spec.md §3.1), validating control characters against `ctx`.
    pub fn from_code_points(cps: &[char], ctx: ValidationContext) -> Result<Self> {
        let mut code_points = Vec::with_capacity(cps.len());
        let mut ascii_shadow = String::new();
        let mut first_of = Vec::new();
        let mut visible_at = Vec::new();
        let mut columns_at = Vec::new();
        let mut num_invisible = 0usize;
        let mut num_columns = 0usize;
        let mut pending_prefix_start: Option<usize> = None;
        let mut scanner = CsiScanner::new();
        let mut seen_non_blank = false;
        let mut trailing_run = 0usize;

        for &c in cps {
            let code_index = code_points.len();
            code_points.push(c);
            match scanner.feed(c) {
                Feed::Visible => {
                    if !validate::is_allowed(ctx, c) {
                        return Err(BxStringError::DisallowedControlChar(c));
                    }
                    let start = pending_prefix_start.take().unwrap_or(code_index);
                    first_of.push(start);
                    visible_at.push(code_index);
                    let w = width::scalar_width(c);
                    columns_at.push(num_columns);
                    num_columns += w;
                    push_ascii_shadow(&mut ascii_shadow, c, w);
                    if width::is_blank(c) {
                        if !seen_non_blank {
                            // still inside the leading indent run
                        }
                        trailing_run += w;
                    } else {
                        seen_non_blank = true;
                        trailing_run = 0;
                    }
                }
                Feed::InProgress => {
                    num_invisible += 1;
                    if pending_prefix_start.is_none() {
                        pending_prefix_start = Some(code_index);
                    }
                }
                Feed::Closed { reset } => {
                    num_invisible += 1;
                    if pending_prefix_start.is_none() {
                        pending_prefix_start = Some(code_index);
                    }
                    if reset {
                        pending_prefix_start = None;
                    }
                }
            }
        }

        let terminator = code_points.len();
        first_of.push(pending_prefix_start.unwrap_or(terminator));
        visible_at.push(terminator);
        columns_at.push(num_columns);

        // `indent` is the width of the leading blank run; recompute directly
        // rather than trust the incremental accumulator above (clearer and
        // cheap at these sizes).
        let num_visible = visible_at.len() - 1;
        let mut indent = 0usize;
        for v in 0..num_visible {
            let c = code_points[visible_at[v]];
            if width::is_blank(c) {
                indent += width::scalar_width(c);
            } else {
                break;
            }
        }
        let trailing = if seen_non_blank { trailing_run } else { 0 };

        Ok(Self {
            code_points,
            ascii_shadow,
            num_invisible,
            num_columns,
            indent,
            trailing,
            first_of,
            visible_at,
            columns_at,
        })
    }

    fn build_unchecked(cps: Vec<char>) -> Self {
        Self::from_code_points(&cps, ValidationContext::Anywhere)
            .expect("rebuilding from already-validated code points cannot fail")
    }

    pub fn empty() -> Self {
        Self::build_unchecked(Vec::new())
    }

    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    // ---- accessors ----

    pub fn num_code_points(&self) -> usize {
        self.code_points.len()
    }

    pub fn num_visible(&self) -> usize {
        self.visible_at.len() - 1
    }

    pub fn num_invisible(&self) -> usize {
        self.num_invisible
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn trailing(&self) -> usize {
        self.trailing
    }

    pub fn ascii_shadow(&self) -> &str {
        &self.ascii_shadow
    }

    pub fn code_points(&self) -> &[char] {
        &self.code_points
    }

    pub fn first_of(&self) -> &[usize] {
        &self.first_of
    }

    pub fn visible_at(&self) -> &[usize] {
        &self.visible_at
    }

    pub fn is_blank(&self) -> bool {
        self.num_visible() == self.indent_visible_count() && self.trailing == 0
    }

    fn indent_visible_count(&self) -> usize {
        // Number of visible chars counted as indent == num_visible when the
        // whole string is blank (trailing forced to 0 in that case).
        if self.trailing == 0 && self.num_visible() > 0 {
            let all_blank = (0..self.num_visible())
                .all(|v| width::is_blank(self.code_points[self.visible_at[v]]));
            if all_blank {
                return self.num_visible();
            }
        }
        0
    }

    /// The visible character at visible index `v` (`v < num_visible`).
    pub fn visible_char(&self, v: usize) -> Option<char> {
        if v >= self.num_visible() {
            return None;
        }
        Some(self.code_points[self.visible_at[v]])
    }

    /// Starting display column of visible index `v` (`v` may equal `num_visible`).
    pub fn column_of(&self, v: usize) -> usize {
        self.columns_at.get(v).copied().unwrap_or(self.num_columns)
    }

    /// First visible index whose column is `>= col`.
    pub fn visible_at_or_after_column(&self, col: usize) -> usize {
        self.columns_at.partition_point(|&c| c < col)
    }

    /// Render including any invisible (ANSI) content, exactly as it would be
    /// written to output.
    pub fn to_text(&self) -> String {
        self.code_points.iter().collect()
    }

    // ---- operations ----

    /// Substring by visible index range `[start, end)`, preserving any
    /// invisible prefix attached to the first included visible character.
    pub fn substring(&self, start: usize, end: usize) -> Result<Self> {
        let n = self.num_visible();
        if start > end || end > n {
            return Err(BxStringError::IndexOutOfBounds {
                index: end,
                len: n,
            });
        }
        let lo = self.first_of[start];
        let hi = self.first_of[end];
        Ok(Self::build_unchecked(self.code_points[lo..hi].to_vec()))
    }

    /// As [`BxString::substring`], then trimmed of leading/trailing blanks.
    pub fn substring_trim(&self, start: usize, end: usize) -> Result<Self> {
        Ok(self.substring(start, end)?.trim())
    }

    pub fn concat(&self, other: &Self) -> Self {
        let mut cps = self.code_points.clone();
        cps.extend_from_slice(&other.code_points);
        Self::build_unchecked(cps)
    }

    /// First visible index at or after `from` whose visible character is `c`.
    pub fn find(&self, c: char, from: usize) -> Option<usize> {
        (from..self.num_visible()).find(|&v| self.visible_char(v) == Some(c))
    }

    /// Remove `n` visible characters from the front.
    pub fn cut_front(&self, n: usize) -> Result<Self> {
        self.substring(n.min(self.num_visible()), self.num_visible())
    }

    fn leading_blank_count(&self) -> usize {
        (0..self.num_visible())
            .take_while(|&v| width::is_blank(self.code_points[self.visible_at[v]]))
            .count()
    }

    fn trailing_blank_count(&self) -> usize {
        let n = self.num_visible();
        (0..n)
            .rev()
            .take_while(|&v| width::is_blank(self.code_points[self.visible_at[v]]))
            .count()
    }

    pub fn trim_left(&self) -> Self {
        let lead = self.leading_blank_count();
        self.substring(lead, self.num_visible())
            .unwrap_or_else(|_| self.clone())
    }

    pub fn trim_right(&self) -> Self {
        let trail = self.trailing_blank_count();
        self.substring(0, self.num_visible() - trail.min(self.num_visible()))
            .unwrap_or_else(|_| self.clone())
    }

    pub fn trim(&self) -> Self {
        let n = self.num_visible();
        let lead = self.leading_blank_count();
        if lead >= n {
            return Self::empty();
        }
        let trail = self.trailing_blank_count();
        self.substring(lead, n - trail)
            .unwrap_or_else(|_| self.clone())
    }

    fn spaces(n: usize) -> Self {
        Self::build_unchecked(std::iter::repeat_n(' ', n).collect())
    }

    pub fn prepend_spaces(&self, n: usize) -> Self {
        Self::spaces(n).concat(self)
    }

    pub fn append_spaces(&self, n: usize) -> Self {
        self.concat(&Self::spaces(n))
    }

    /// Drop every invisible code point, keeping only the visible characters.
    pub fn visible_only(&self) -> Self {
        let cps: Vec<char> = (0..self.num_visible())
            .map(|v| self.code_points[self.visible_at[v]])
            .collect();
        Self::build_unchecked(cps)
    }

    /// Case-sensitive, code-point-exact comparison (invisibles included).
    pub fn code_points_eq(&self, other: &Self) -> bool {
        self.code_points == other.code_points
    }

    /// Re-validate every visible character against `ctx`.
    pub fn validate_context(&self, ctx: ValidationContext) -> Result<()> {
        for v in 0..self.num_visible() {
            let c = self.code_points[self.visible_at[v]];
            if !validate::is_allowed(ctx, c) {
                return Err(BxStringError::DisallowedControlChar(c));
            }
        }
        Ok(())
    }
}

impl fmt::Display for BxString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

fn push_ascii_shadow(ascii: &mut String, c: char, w: usize) {
    if width::is_blank(c) {
        for _ in 0..w {
            ascii.push(' ');
        }
    } else if c.is_ascii() {
        ascii.push(c);
    } else {
        for _ in 0..w {
            ascii.push('x');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_num_code_points() {
        let s = BxString::from_ascii("  hi  ").unwrap();
        assert_eq!(
            s.num_code_points(),
            s.num_visible() + s.num_invisible()
        );
    }

    #[test]
    fn plain_ascii_indent_and_trailing() {
        let s = BxString::from_ascii("  hi  ").unwrap();
        assert_eq!(s.indent(), 2);
        assert_eq!(s.trailing(), 2);
        assert_eq!(s.num_columns(), 6);
    }

    #[test]
    fn all_blank_string_has_zero_trailing() {
        let s = BxString::from_ascii("    ").unwrap();
        assert_eq!(s.indent(), 4);
        assert_eq!(s.trailing(), 0);
        assert!(s.is_blank());
    }

    #[test]
    fn empty_string_is_blank() {
        let s = BxString::empty();
        assert_eq!(s.num_visible(), 0);
        assert_eq!(s.indent(), 0);
        assert_eq!(s.trailing(), 0);
    }

    #[test]
    fn csi_color_sequence_is_invisible_and_skipped_in_width() {
        let input: Vec<char> = format!("\u{1B}[31mred\u{1B}[0m").chars().collect();
        let s = BxString::from_code_points(&input, ValidationContext::Anywhere).unwrap();
        assert_eq!(s.num_visible(), 3);
        assert_eq!(s.num_columns(), 3);
        assert!(s.num_invisible() > 0);
    }

    #[test]
    fn first_of_attaches_invisible_prefix_to_next_visible() {
        let input: Vec<char> = format!("\u{1B}[31mred").chars().collect();
        let s = BxString::from_code_points(&input, ValidationContext::Anywhere).unwrap();
        // visible index 0 ('r') should have first_of pointing at the ESC.
        assert_eq!(s.first_of()[0], 0);
        assert_eq!(s.visible_at()[0], input.len() - 3);
    }

    #[test]
    fn reset_clears_pending_prefix() {
        // ESC[0m (reset) then ESC[31m (color, not reset) then 'x'.
        let input: Vec<char> = format!("\u{1B}[0m\u{1B}[31mx").chars().collect();
        let s = BxString::from_code_points(&input, ValidationContext::Anywhere).unwrap();
        assert_eq!(s.num_visible(), 1);
        // The pending prefix start should be the color sequence only (index 4),
        // not the reset sequence (index 0), since the reset cleared it.
        assert_eq!(s.first_of()[0], 4);
    }

    #[test]
    fn double_wide_glyph_counts_two_columns() {
        let s = BxString::from_ascii("").unwrap();
        assert_eq!(s.num_columns(), 0);
        let wide = BxString::from_code_points(&['界'], ValidationContext::Anywhere).unwrap();
        assert_eq!(wide.num_columns(), 2);
        assert_eq!(wide.num_visible(), 1);
    }

    #[test]
    fn substring_and_trim_roundtrip() {
        let s = BxString::from_ascii("  hello world  ").unwrap();
        let trimmed = s.trim();
        assert_eq!(trimmed.to_text(), "hello world");
    }

    #[test]
    fn cut_front_removes_visible_prefix() {
        let s = BxString::from_ascii("hello").unwrap();
        let cut = s.cut_front(2).unwrap();
        assert_eq!(cut.to_text(), "llo");
    }

    #[test]
    fn concat_and_prepend_append_spaces() {
        let a = BxString::from_ascii("ab").unwrap();
        let b = a.prepend_spaces(2).append_spaces(1);
        assert_eq!(b.to_text(), "  ab ");
    }

    #[test]
    fn visible_only_drops_escapes() {
        let input: Vec<char> = format!("\u{1B}[31mred\u{1B}[0m").chars().collect();
        let s = BxString::from_code_points(&input, ValidationContext::Anywhere).unwrap();
        let vis = s.visible_only();
        assert_eq!(vis.to_text(), "red");
        assert_eq!(vis.num_invisible(), 0);
    }

    #[test]
    fn find_returns_visible_index() {
        let s = BxString::from_ascii("abcabc").unwrap();
        assert_eq!(s.find('c', 0), Some(2));
        assert_eq!(s.find('c', 3), Some(5));
        assert_eq!(s.find('z', 0), None);
    }

    #[test]
    fn rebuilding_from_code_points_is_equal() {
        let s = BxString::from_ascii("  hi there  ").unwrap();
        let rebuilt = BxString::from_code_points(s.code_points(), ValidationContext::Anywhere)
            .unwrap();
        assert_eq!(s, rebuilt);
    }

    #[test]
    fn out_of_bounds_substring_is_an_error_not_a_panic() {
        let s = BxString::from_ascii("ab").unwrap();
        assert!(s.substring(0, 5).is_err());
    }
}
