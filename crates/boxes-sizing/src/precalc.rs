//! Horizontal & vertical pre-calculation (spec.md §4.4).
//!
//! Grounded on `examples/original_source/src/generate.c`'s `horiz_precalc`
//! / `vert_precalc`, reimplemented as the iterative two-pointer algorithm
//! spec.md §4.4 describes (rather than the source's while-loop with nested
//! switch, per spec.md §9).

use boxes_design::{Design, Side};

/// "Individual lines/columns to fill" for the three edge slots of one side
/// (spec.md glossary "iltf").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Iltf(pub [usize; 3]);

impl Iltf {
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

/// Safety bound on precalc iterations; a valid design (per
/// `Design::validate`) always converges in at most a handful of steps, so
/// hitting this indicates a degenerate design that slipped past validation.
const MAX_STEPS: usize = 1_000_000;

/// spec.md §4.4 "Horizontal". `target_width` is already
/// `max(input.max_columns, design.min_width - width(NW) - width(NE))`,
/// computed by the caller (the generator, which knows the input extent).
pub fn horiz_precalc(design: &Design, target_width: usize) -> (Iltf, Iltf) {
    let top_edges = Side::Top.edges();
    let bot_edges = Side::Bottom.edges();
    let widths = [
        top_edges.map(|s| design.shape(s).width()),
        bot_edges.map(|s| design.shape(s).width()),
    ];
    let elastic = [
        top_edges.map(|s| design.shape(s).elastic),
        bot_edges.map(|s| design.shape(s).elastic),
    ];
    let [top, bot] = precalc_sides(target_width, widths, elastic, "sizing:horiz");
    (Iltf(top), Iltf(bot))
}

/// spec.md §4.4 "Vertical": symmetric, height instead of width, left/right
/// instead of top/bottom.
pub fn vert_precalc(design: &Design, target_height: usize) -> (Iltf, Iltf) {
    let left_edges = Side::Left.edges();
    let right_edges = Side::Right.edges();
    let heights = [
        left_edges.map(|s| design.shape(s).height()),
        right_edges.map(|s| design.shape(s).height()),
    ];
    let elastic = [
        left_edges.map(|s| design.shape(s).elastic),
        right_edges.map(|s| design.shape(s).elastic),
    ];
    let [left, right] = precalc_sides(target_height, heights, elastic, "sizing:vert");
    (Iltf(left), Iltf(right))
}

/// Core two-pointer convergence loop, shared by the horizontal and
/// vertical cases: repeatedly grow whichever side is currently behind
/// (ties favor side 0) by one copy of the appropriate edge, until both
/// reach `target` and agree.
fn precalc_sides(
    target: usize,
    sizes: [[usize; 3]; 2],
    elastic: [[bool; 3]; 2],
    log_target: &'static str,
) -> [[usize; 3]; 2] {
    let mut total = [0usize; 2];
    let mut iltf = [[0usize; 3]; 2];
    let mut toggle = [false; 2];

    for _ in 0..MAX_STEPS {
        if total[0] >= target && total[1] >= target && total[0] == total[1] {
            return iltf;
        }
        let side = if total[0] <= total[1] { 0 } else { 1 };
        let uneven = total[0] != total[1];
        let side_is_short = total[side] < target;
        let present: Vec<usize> = (0..3).filter(|&i| sizes[side][i] > 0).collect();

        let progressed = match present.len() {
            0 => false,
            1 => {
                let i = present[0];
                try_grow(&mut total, &mut iltf, side, i, sizes, side_is_short, uneven)
            }
            2 => {
                let non_elastic: Vec<usize> =
                    present.iter().copied().filter(|&i| !elastic[side][i]).collect();
                let mut progressed = false;
                for i in non_elastic {
                    if iltf[side][i] == 0 {
                        grow(&mut total, &mut iltf, side, i, sizes);
                        progressed = true;
                    }
                }
                if !progressed {
                    if let Some(&i) = present.iter().find(|&&i| elastic[side][i]) {
                        progressed =
                            try_grow(&mut total, &mut iltf, side, i, sizes, side_is_short, uneven);
                    }
                }
                progressed
            }
            3 => {
                let mut progressed = false;
                for &i in &present {
                    if !elastic[side][i] && iltf[side][i] == 0 {
                        grow(&mut total, &mut iltf, side, i, sizes);
                        progressed = true;
                    }
                }
                if !progressed {
                    let elastics: Vec<usize> =
                        present.iter().copied().filter(|&i| elastic[side][i]).collect();
                    if elastics.len() == 2 && elastics[0] == 0 && elastics[1] == 2 {
                        let i = if toggle[side] { 2 } else { 0 };
                        if try_grow(&mut total, &mut iltf, side, i, sizes, side_is_short, uneven) {
                            toggle[side] = !toggle[side];
                            progressed = true;
                        }
                    } else if let Some(&i) = elastics.first() {
                        progressed =
                            try_grow(&mut total, &mut iltf, side, i, sizes, side_is_short, uneven);
                    }
                }
                progressed
            }
            _ => unreachable!("a side has exactly 3 edge slots"),
        };

        if !progressed {
            // Neither side can grow further but they disagree or haven't
            // reached target: a degenerate design slipped past validation.
            tracing::warn!(target: log_target, top = total[0], bot = total[1], target, "precalc stalled");
            return iltf;
        }
    }
    tracing::warn!(target: log_target, "precalc exceeded iteration bound, returning partial result");
    iltf
}

fn grow(total: &mut [usize; 2], iltf: &mut [[usize; 3]; 2], side: usize, i: usize, sizes: [[usize; 3]; 2]) {
    total[side] += sizes[side][i];
    iltf[side][i] += sizes[side][i];
}

#[allow(clippy::too_many_arguments)]
fn try_grow(
    total: &mut [usize; 2],
    iltf: &mut [[usize; 3]; 2],
    side: usize,
    i: usize,
    sizes: [[usize; 3]; 2],
    side_is_short: bool,
    uneven: bool,
) -> bool {
    if iltf[side][i] == 0 || side_is_short || uneven {
        grow(total, iltf, side, i, sizes);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxes_design::default_design;

    #[test]
    fn converges_on_builtin_design() {
        let design = default_design();
        let (top, bot) = horiz_precalc(design, 20);
        assert_eq!(top.total(), bot.total());
        assert!(top.total() >= 20);
    }

    #[test]
    fn vertical_converges_too() {
        let design = default_design();
        let (left, right) = vert_precalc(design, 5);
        assert_eq!(left.total(), right.total());
        assert!(left.total() >= 5);
    }

    #[test]
    fn elastic_on_both_ends_splits_evenly_scenario() {
        // spec.md §8 scenario 5: NNW=2 fixed, N=1 elastic, NNE=2 fixed,
        // target 9 -> N fills 5 columns, iltf = [2, 5, 2].
        let sizes = [[2usize, 1, 2], [2, 1, 2]];
        let elastic = [[false, true, false], [false, true, false]];
        let result = precalc_sides(9, sizes, elastic, "test");
        assert_eq!(result[0], [2, 5, 2]);
    }
}
