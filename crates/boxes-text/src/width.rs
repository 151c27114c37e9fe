//! Display column width for a single Unicode scalar value (spec.md §3.1,
//! §4.1).
//!
//! Grounded on the teacher's `core-text::width::egc_width`, simplified to
//! the scalar-value granularity spec.md actually asks for: bxstring tracks
//! `char`s, not joined grapheme clusters, so there is no ZWJ/keycap/skin-tone
//! classification to do here — only "0 for combining marks, 1 or 2 for
//! printable, blank classification covers whitespace + TAB".

use unicode_width::UnicodeWidthChar;

/// Column width contributed by one visible scalar value.
pub fn scalar_width(c: char) -> usize {
    if c == '\t' {
        // Tabs are expanded to spaces before a Line's bxstring is built
        // (boxes-input); a literal tab reaching here (e.g. inside a shape
        // or sample string) is treated as a single blank column.
        return 1;
    }
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Unicode whitespace or TAB (spec.md §4.1 "classification 'blank'").
pub fn is_blank(c: char) -> bool {
    c.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_width_one() {
        assert_eq!(scalar_width('a'), 1);
    }

    #[test]
    fn wide_cjk_is_width_two() {
        assert_eq!(scalar_width('界'), 2);
    }

    #[test]
    fn combining_mark_is_width_zero() {
        assert_eq!(scalar_width('\u{0301}'), 0);
    }

    #[test]
    fn tab_counts_as_one_blank_column() {
        assert_eq!(scalar_width('\t'), 1);
        assert!(is_blank('\t'));
    }

    #[test]
    fn space_is_blank() {
        assert!(is_blank(' '));
        assert!(!is_blank('a'));
    }
}
