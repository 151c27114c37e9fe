//! The backtracking shape matcher `hmm` (spec.md §4.8). Component C7.
//!
//! Grounded on `examples/original_source/src/remove.c`'s `hmm`/
//! `hmm_shiftable` recursive matcher. The five-case recursion in spec.md
//! §4.8 leaves one genuine ambiguity unresolved — exactly which shape
//! positions case 1's "scan edge shapes `[shape_idx..3]`" ranges over once
//! `shape_idx` has already advanced past the left corner. This
//! implementation resolves it as: the slide-search in case 1 only ever
//! considers the three edge positions (indices 0..3 of `shapes`), never
//! the right corner (index 4) — so once `shape_idx` reaches 4 while still
//! unanchored on the left, the search range is empty and case 1 falls
//! through to its own "all empty" branch (succeed iff the remainder is
//! blank). This is recorded as a deliberate interpretation, not a guess
//! papered over silently (see DESIGN.md).

/// Try to explain `row` as a tiling of the five prepared shape lines of one
/// horizontal side (corner, edge, edge, edge, corner), allowing elastic
/// edges to repeat and allowing blank trim at both corners.
pub fn match_horiz_line(row: &str, shapes: [&str; 5], elastic: [bool; 5]) -> bool {
    let chars: Vec<char> = row.chars().collect();
    let shape_chars: Vec<Vec<char>> = shapes.iter().map(|s| s.chars().collect()).collect();
    hmm(&chars, 0, chars.len(), shape_chars, elastic, 0, false, false)
}

#[allow(clippy::too_many_arguments)]
fn hmm(
    chars: &[char],
    cur: usize,
    end: usize,
    shapes: Vec<Vec<char>>,
    elastic: [bool; 5],
    shape_idx: usize,
    anchored_left: bool,
    anchored_right: bool,
) -> bool {
    // Case 1: still unanchored on the left — search ahead for the first
    // non-empty edge rather than requiring an exact match at `cur`.
    if !anchored_left {
        let search_end = 3.min(shapes.len());
        if shape_idx < search_end {
            if let Some(k) = (shape_idx..search_end).find(|&k| !shapes[k].is_empty()) {
                return match find_after_blanks(chars, cur, end, &shapes[k]) {
                    Some(pos) => {
                        let next_cur = pos + shapes[k].len();
                        let advance = hmm(
                            chars,
                            next_cur,
                            end,
                            shapes.clone(),
                            elastic,
                            k + 1,
                            true,
                            anchored_right,
                        );
                        if advance {
                            true
                        } else if elastic[k] {
                            hmm(chars, next_cur, end, shapes, elastic, k, true, anchored_right)
                        } else {
                            false
                        }
                    }
                    None => false,
                };
            }
        }
        // Edge range [shape_idx..search_end] is empty or all-blank: succeed
        // only if there's nothing left to explain.
        return is_blank_run(chars, cur, end);
    }

    // Case 2: input row exhausted.
    if cur == end {
        return (shape_idx..shapes.len()).all(|i| shapes[i].is_empty());
    }

    // Case 3: shape sequence exhausted.
    if shape_idx >= shapes.len() {
        return is_blank_run(chars, cur, end);
    }

    // Case 4: current shape is empty, tail-recurse.
    if shapes[shape_idx].is_empty() {
        return hmm(chars, cur, end, shapes, elastic, shape_idx + 1, anchored_left, anchored_right);
    }

    // Case 5: normal match attempt, with right-side shortening on failure.
    if prefix_match(chars, cur, end, &shapes[shape_idx]) {
        let next_cur = cur + shapes[shape_idx].len();
        if elastic[shape_idx] {
            if hmm(
                chars,
                next_cur,
                end,
                shapes.clone(),
                elastic,
                shape_idx,
                true,
                anchored_right,
            ) {
                return true;
            }
            hmm(chars, next_cur, end, shapes, elastic, shape_idx + 1, true, anchored_right)
        } else {
            hmm(chars, next_cur, end, shapes, elastic, shape_idx + 1, true, anchored_right)
        }
    } else if !anchored_right {
        match drop_trailing_blank(&shapes[shape_idx]) {
            Some(shortened) => {
                let mut shapes = shapes;
                shapes[shape_idx] = shortened;
                hmm(chars, cur, end, shapes, elastic, shape_idx, anchored_left, anchored_right)
            }
            None => false,
        }
    } else {
        false
    }
}

fn is_blank_run(chars: &[char], cur: usize, end: usize) -> bool {
    chars[cur..end].iter().all(|c| c.is_whitespace())
}

fn prefix_match(chars: &[char], cur: usize, end: usize, needle: &[char]) -> bool {
    end - cur >= needle.len() && chars[cur..cur + needle.len()] == needle[..]
}

/// First position at or after `cur` where `needle` appears, requiring every
/// character strictly before that position (and after `cur`) to be blank.
fn find_after_blanks(chars: &[char], cur: usize, end: usize, needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > end.saturating_sub(cur) {
        return None;
    }
    for pos in cur..=end - needle.len() {
        if chars[pos..pos + needle.len()] == needle[..] {
            return Some(pos);
        }
        if !chars[pos].is_whitespace() {
            return None;
        }
    }
    None
}

fn drop_trailing_blank(s: &[char]) -> Option<Vec<char>> {
    match s.last() {
        Some(c) if c.is_whitespace() => Some(s[..s.len() - 1].to_vec()),
        _ => None,
    }
}

/// General-purpose shape shortener (spec.md §4.8 "Shape shortening"), used
/// by the remover's column-quality matching (C8) independently of `hmm`.
/// Removes one blank from the preferred side (if allowed and present),
/// falling back to the other allowed side. Returns the shortened text and
/// its new length ("quality"). Never removes a non-blank character.
pub fn shorten(text: &str, prefer_left: bool, allow_left: bool, allow_right: bool) -> Option<(String, usize)> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return None;
    }
    let sides = if prefer_left { [true, false] } else { [false, true] };
    for side_left in sides {
        if side_left && allow_left && chars.first().is_some_and(|c| c.is_whitespace()) {
            let v: String = chars[1..].iter().collect();
            let len = chars.len() - 1;
            return Some((v, len));
        }
        if !side_left && allow_right && chars.last().is_some_and(|c| c.is_whitespace()) {
            let v: String = chars[..chars.len() - 1].iter().collect();
            let len = chars.len() - 1;
            return Some((v, len));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic_shapes() -> [&'static str; 5] {
        ["+", "-", "-", "-", "+"]
    }

    #[test]
    fn exact_tiling_matches() {
        let row = "+---------+";
        assert!(match_horiz_line(row, classic_shapes(), [false, true, false, false, false]));
    }

    #[test]
    fn mismatched_content_fails() {
        let row = "+hello----+";
        assert!(!match_horiz_line(row, classic_shapes(), [false, true, false, false, false]));
    }

    #[test]
    fn trailing_trim_at_right_corner_is_tolerated() {
        // Right corner's own row has trailing blanks the input row lacks.
        let row = "+--------+";
        let shapes = ["+", "-", "-", "-", "+  "];
        assert!(match_horiz_line(row, shapes, [false, true, false, false, false]));
    }

    #[test]
    fn empty_corners_allow_blank_only_row() {
        let row = "   ";
        let shapes = ["", "", "", "", ""];
        assert!(match_horiz_line(row, shapes, [false, false, false, false, false]));
    }

    #[test]
    fn shorten_prefers_requested_side() {
        let (text, len) = shorten("ab ", true, true, true).unwrap();
        assert_eq!(text, "ab");
        assert_eq!(len, 2);
    }

    #[test]
    fn shorten_falls_back_when_preferred_side_has_no_blank() {
        let (text, _) = shorten(" ab", false, true, true).unwrap();
        assert_eq!(text, "ab");
    }

    #[test]
    fn shorten_never_removes_non_blank() {
        assert!(shorten("ab", true, true, true).is_none());
    }
}
