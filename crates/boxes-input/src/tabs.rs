//! Tab expansion (spec.md §4.3 step 3).
//!
//! Grounded on `examples/original_source/src/input.c`'s tab-expansion pass:
//! each tab advances to the next multiple of the configured tab stop;
//! `keep` mode additionally records the pre-expansion column of every tab
//! so the CLI can restore it on output (§4.6 "Indent preservation").

/// How `-t` (§6.1) wants tabs handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabMode {
    /// Expand tabs to spaces, do not remember where they were.
    Expand,
    /// Expand tabs to spaces, but remember each tab's column so the
    /// leading indent can restore literal TABs on output.
    Keep,
    /// Expand tabs to spaces at read time (same expansion as `Expand`); the
    /// re-compaction of the leading indent back into TABs on output is a
    /// generator-side concern (`boxes_generate::generate`'s
    /// `reconstruct_indent`), not a reader-side one.
    Unexpand,
}

/// Expand every TAB in `line` to the next multiple of `tab_stop` columns.
/// Returns the expanded text and, when `mode == Keep`, the output column
/// at which each tab began.
pub fn expand_tabs(line: &[char], tab_stop: usize, mode: TabMode) -> (Vec<char>, Vec<usize>) {
    let tab_stop = tab_stop.max(1);
    let mut out = Vec::with_capacity(line.len());
    let mut tab_positions = Vec::new();
    let mut col = 0usize;
    for &c in line {
        if c == '\t' {
            if mode == TabMode::Keep {
                tab_positions.push(col);
            }
            let next_stop = ((col / tab_stop) + 1) * tab_stop;
            for _ in col..next_stop {
                out.push(' ');
            }
            col = next_stop;
        } else {
            out.push(c);
            col += 1;
        }
    }
    (out, tab_positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_to_next_stop() {
        let (out, _) = expand_tabs(&['a', '\t', 'b'], 4, TabMode::Expand);
        assert_eq!(out, vec!['a', ' ', ' ', ' ', 'b']);
    }

    #[test]
    fn keep_mode_records_tab_columns() {
        let (_out, positions) = expand_tabs(&['\t', 'x', '\t'], 4, TabMode::Keep);
        assert_eq!(positions, vec![0, 5]);
    }

    #[test]
    fn expand_mode_records_nothing() {
        let (_out, positions) = expand_tabs(&['\t'], 4, TabMode::Expand);
        assert!(positions.is_empty());
    }
}
