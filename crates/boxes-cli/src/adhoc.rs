//! `-c`/`--create` ad-hoc single-shape design (spec.md §6.1).
//!
//! Grounded on `examples/original_source/src/boxes.c`'s `build_design`:
//! the user's string becomes the sole west shape, and every other side is
//! filled with the minimal elastic placeholder shapes `Design::validate`
//! requires rather than trying to special-case a one-sided design.

use boxes_design::{Design, IndentMode, Padding, Shape, ShapeEntry};
use boxes_text::validate::ValidationContext;
use boxes_text::BxString;
use std::collections::{HashMap, HashSet};

use crate::error::CliError;

fn spaces(width: usize, height: usize) -> Vec<BxString> {
    let line = BxString::from_code_points(&vec![' '; width], ValidationContext::InShape)
        .expect("space-only line is always valid shape content");
    vec![line; height]
}

/// Build the `<Command Line Definition>` design whose west shape is `text`.
pub fn build(text: &str) -> Result<Design, CliError> {
    let w_line = BxString::from_code_points(
        &text.chars().collect::<Vec<_>>(),
        ValidationContext::InShape,
    )
    .map_err(|e| CliError::Usage(format!("invalid -c argument: {e}")))?;
    let w_width = w_line.num_columns();

    let mut shapes = HashMap::new();
    shapes.insert(
        Shape::W,
        ShapeEntry { elastic: true, lines: vec![w_line] },
    );
    shapes.insert(Shape::Nw, ShapeEntry { elastic: false, lines: spaces(w_width, 1) });
    shapes.insert(Shape::Sw, ShapeEntry { elastic: false, lines: spaces(w_width, 1) });
    shapes.insert(Shape::Ne, ShapeEntry { elastic: false, lines: spaces(1, 1) });
    shapes.insert(Shape::Se, ShapeEntry { elastic: false, lines: spaces(1, 1) });
    shapes.insert(Shape::N, ShapeEntry { elastic: true, lines: spaces(1, 1) });
    shapes.insert(Shape::S, ShapeEntry { elastic: true, lines: spaces(1, 1) });
    shapes.insert(Shape::E, ShapeEntry { elastic: true, lines: spaces(1, 1) });

    let sample = vec![BxString::from_code_points(
        &"n/a".chars().collect::<Vec<_>>(),
        ValidationContext::InShape,
    )
    .unwrap()];

    let design = Design {
        name: "<Command Line Definition>".to_string(),
        aliases: Vec::new(),
        author: None,
        designer: None,
        sample,
        indent: IndentMode::Box,
        shapes,
        min_width: w_width + 2,
        min_height: 3,
        max_shape_height: 1,
        padding: Padding { top: 0, right: 0, bottom: 0, left: 1 },
        tags: HashSet::from(["transient".to_string()]),
        replace_rules: Vec::new(),
        reverse_rules: Vec::new(),
    };
    design.validate().map_err(|e| CliError::Usage(e.to_string()))?;
    Ok(design)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_passes_validation() {
        let design = build("hello").unwrap();
        assert_eq!(design.min_width, 7);
        assert_eq!(design.min_height, 3);
        assert!(design.shape(Shape::W).elastic);
    }

    #[test]
    fn build_rejects_invalid_content() {
        assert!(build("bad\ncontent").is_err());
    }
}
