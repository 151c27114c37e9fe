//! `Design`, `ShapeEntry`, and replacement `Rule` (spec.md §3.2).
//!
//! Grounded on `examples/original_source/src/boxes.h`'s `design_t`/`shape_t`
//! structs for the field set, and on the teacher's `thiserror`-per-crate
//! error convention (`core-state::PasteError`) for `DesignError`.

use crate::shape::{Shape, Side};
use boxes_text::BxString;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DesignError {
    #[error("design '{0}': corner shape must not be elastic")]
    ElasticCorner(String),
    #[error("design '{0}': side {1:?} has no elastic edge")]
    NoElasticEdge(String, Side),
    #[error("design '{0}': side {1:?} has two adjoining elastic edges")]
    AdjoiningElastic(String, Side),
    #[error("design '{0}': shape {1:?} marked elastic but has no content")]
    ElasticEmpty(String, Shape),
    #[error("design '{0}': shapes on side {1:?} do not share a common {2}")]
    SideSizeMismatch(String, Side, &'static str),
    #[error("invalid regex in design '{0}': {1}")]
    BadRegex(String, #[source] regex::Error),
    #[error("replacement template references undefined capture group '{0}'")]
    UndefinedGroup(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentMode {
    Box,
    Text,
    None,
}

impl IndentMode {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "box" => Some(IndentMode::Box),
            "text" => Some(IndentMode::Text),
            "none" => Some(IndentMode::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
    pub left: usize,
}

/// One of the 16 rectangles making up a design (spec.md §3.2).
#[derive(Debug, Clone)]
pub struct ShapeEntry {
    pub elastic: bool,
    pub lines: Vec<BxString>,
}

impl ShapeEntry {
    pub fn blank() -> Self {
        Self {
            elastic: false,
            lines: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }

    pub fn width(&self) -> usize {
        self.lines.first().map(|l| l.num_columns()).unwrap_or(0)
    }

    /// True if every line of this shape is entirely blank (or the shape is empty).
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.is_blank())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMode {
    Once,
    Global,
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub source: String,
    pub replacement: String,
    pub mode: RuleMode,
    pattern: Regex,
}

impl Rule {
    pub fn new(source: &str, replacement: &str, mode: RuleMode) -> Result<Self, DesignError> {
        let pattern =
            Regex::new(source).map_err(|e| DesignError::BadRegex(source.to_string(), e))?;
        validate_replacement_groups(&pattern, replacement)?;
        Ok(Self {
            source: source.to_string(),
            replacement: replacement.to_string(),
            mode,
            pattern,
        })
    }

    /// Apply this rule to one line of text, honoring `g`/`o` mode.
    pub fn apply(&self, text: &str) -> String {
        match self.mode {
            RuleMode::Once => self.pattern.replace(text, self.replacement.as_str()).into_owned(),
            RuleMode::Global => self
                .pattern
                .replace_all(text, self.replacement.as_str())
                .into_owned(),
        }
    }
}

/// The `regex` crate silently substitutes the empty string for a `$name`
/// reference that names no capture group; spec.md §7 requires that to be a
/// run-ending error instead, so group references are checked up front.
fn validate_replacement_groups(pattern: &Regex, replacement: &str) -> Result<(), DesignError> {
    let bytes = replacement.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' && i + 1 < bytes.len() {
            let rest = &replacement[i + 1..];
            let (name, _consumed) = if let Some(stripped) = rest.strip_prefix('{') {
                let end = stripped.find('}');
                match end {
                    Some(end) => (&stripped[..end], end + 2),
                    None => (rest, rest.len()),
                }
            } else {
                let end = rest
                    .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                    .unwrap_or(rest.len());
                (&rest[..end], end)
            };
            if !name.is_empty() && name != "$" {
                let exists = name
                    .parse::<usize>()
                    .map(|idx| idx < pattern.captures_len())
                    .unwrap_or_else(|_| pattern.capture_names().flatten().any(|n| n == name));
                if !exists {
                    return Err(DesignError::UndefinedGroup(name.to_string()));
                }
            }
        }
        i += 1;
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct Design {
    pub name: String,
    pub aliases: Vec<String>,
    pub author: Option<String>,
    pub designer: Option<String>,
    pub sample: Vec<BxString>,
    pub indent: IndentMode,
    pub shapes: HashMap<Shape, ShapeEntry>,
    pub min_width: usize,
    pub min_height: usize,
    pub max_shape_height: usize,
    pub padding: Padding,
    pub tags: HashSet<String>,
    pub replace_rules: Vec<Rule>,
    pub reverse_rules: Vec<Rule>,
}

impl Design {
    pub fn shape(&self, s: Shape) -> &ShapeEntry {
        static BLANK: std::sync::OnceLock<ShapeEntry> = std::sync::OnceLock::new();
        self.shapes
            .get(&s)
            .unwrap_or_else(|| BLANK.get_or_init(ShapeEntry::blank))
    }

    /// All names this design answers to, case-insensitively (spec.md §6.1).
    pub fn matches_name(&self, query: &str) -> bool {
        self.name.eq_ignore_ascii_case(query)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(query))
    }

    /// True if every shape on `side` is blank (spec.md §4.6 "empty side").
    pub fn side_is_empty(&self, side: Side) -> bool {
        side.shapes().iter().all(|&s| self.shape(s).is_blank())
    }

    pub fn side_height(&self, side: Side) -> usize {
        shape::highest(side.shapes().iter().map(|&s| self.shape(s).height()))
    }

    pub fn side_width(&self, side: Side) -> usize {
        shape::highest(side.shapes().iter().map(|&s| self.shape(s).width()))
    }

    /// spec.md §3.2's `blank_leftward`: on this `line` of `side`, are every
    /// shape strictly to the left of `index` blank?
    pub fn blank_leftward(&self, side: Side, index: usize, line: usize) -> bool {
        let shapes = side.shapes();
        shapes[..index]
            .iter()
            .all(|&s| shape_line_is_blank(self.shape(s), line))
    }

    /// spec.md §3.2's `blank_rightward`: symmetric, strictly to the right.
    pub fn blank_rightward(&self, side: Side, index: usize, line: usize) -> bool {
        let shapes = side.shapes();
        shapes[index + 1..]
            .iter()
            .all(|&s| shape_line_is_blank(self.shape(s), line))
    }

    /// Validate the design invariants from spec.md §3.2.
    pub fn validate(&self) -> Result<(), DesignError> {
        for &s in Shape::ALL.iter().filter(|s| s.is_corner()) {
            if self.shape(s).elastic {
                return Err(DesignError::ElasticCorner(self.name.clone()));
            }
        }
        for side in Side::ALL {
            let edges = side.edges();
            let elastic: Vec<bool> = edges.iter().map(|&e| self.shape(e).elastic).collect();
            let non_empty_elastic = edges
                .iter()
                .zip(&elastic)
                .any(|(e, &el)| el && !self.shape(*e).is_empty());
            if !non_empty_elastic {
                return Err(DesignError::NoElasticEdge(self.name.clone(), side));
            }
            if (elastic[0] && elastic[1]) || (elastic[1] && elastic[2]) {
                return Err(DesignError::AdjoiningElastic(self.name.clone(), side));
            }
            for (&e, &el) in edges.iter().zip(&elastic) {
                if el && self.shape(e).is_empty() {
                    return Err(DesignError::ElasticEmpty(self.name.clone(), e));
                }
            }
            let heights: Vec<usize> = side
                .shapes()
                .iter()
                .map(|&s| self.shape(s).height())
                .filter(|&h| h > 0)
                .collect();
            if side.is_horizontal()
                && !heights.is_empty()
                && heights.iter().any(|&h| h != heights[0])
            {
                return Err(DesignError::SideSizeMismatch(
                    self.name.clone(),
                    side,
                    "height",
                ));
            }
            let widths: Vec<usize> = side
                .shapes()
                .iter()
                .map(|&s| self.shape(s).width())
                .filter(|&w| w > 0)
                .collect();
            if !side.is_horizontal() && !widths.is_empty() && widths.iter().any(|&w| w != widths[0])
            {
                return Err(DesignError::SideSizeMismatch(
                    self.name.clone(),
                    side,
                    "width",
                ));
            }
        }
        Ok(())
    }
}

fn shape_line_is_blank(entry: &ShapeEntry, line: usize) -> bool {
    match entry.lines.get(line % entry.height().max(1)) {
        Some(l) => l.is_blank(),
        None => true,
    }
}

use crate::shape;

#[cfg(test)]
mod tests {
    use super::*;
    use boxes_text::validate::ValidationContext;

    fn bx(s: &str) -> BxString {
        BxString::from_code_points(&s.chars().collect::<Vec<_>>(), ValidationContext::InShape)
            .unwrap()
    }

    fn minimal_design() -> Design {
        let mut shapes = HashMap::new();
        shapes.insert(
            Shape::Nw,
            ShapeEntry {
                elastic: false,
                lines: vec![bx("/")],
            },
        );
        shapes.insert(
            Shape::Ne,
            ShapeEntry {
                elastic: false,
                lines: vec![bx("\\")],
            },
        );
        shapes.insert(
            Shape::Se,
            ShapeEntry {
                elastic: false,
                lines: vec![bx("/")],
            },
        );
        shapes.insert(
            Shape::Sw,
            ShapeEntry {
                elastic: false,
                lines: vec![bx("\\")],
            },
        );
        for &(side, mid) in &[
            (Side::Top, Shape::N),
            (Side::Bottom, Shape::S),
            (Side::Left, Shape::W),
            (Side::Right, Shape::E),
        ] {
            let _ = side;
            shapes.insert(
                mid,
                ShapeEntry {
                    elastic: true,
                    lines: vec![bx("*")],
                },
            );
        }
        Design {
            name: "test".to_string(),
            aliases: vec![],
            author: None,
            designer: None,
            sample: vec![],
            indent: IndentMode::Box,
            shapes,
            min_width: 2,
            min_height: 2,
            max_shape_height: 1,
            padding: Padding::default(),
            tags: HashSet::new(),
            replace_rules: vec![],
            reverse_rules: vec![],
        }
    }

    #[test]
    fn minimal_design_validates() {
        minimal_design().validate().unwrap();
    }

    #[test]
    fn elastic_corner_rejected() {
        let mut d = minimal_design();
        d.shapes.get_mut(&Shape::Nw).unwrap().elastic = true;
        assert!(matches!(d.validate(), Err(DesignError::ElasticCorner(_))));
    }

    #[test]
    fn matches_name_is_case_insensitive() {
        let mut d = minimal_design();
        d.aliases.push("Alias".to_string());
        assert!(d.matches_name("TEST"));
        assert!(d.matches_name("alias"));
        assert!(!d.matches_name("other"));
    }

    #[test]
    fn rule_rejects_undefined_group() {
        assert!(Rule::new("a(b)c", "$2", RuleMode::Global).is_err());
        assert!(Rule::new("a(b)c", "$1", RuleMode::Global).is_ok());
    }

    #[test]
    fn rule_applies_global_and_once() {
        let r = Rule::new("a", "X", RuleMode::Global).unwrap();
        assert_eq!(r.apply("banana"), "bXnXnX");
        let r = Rule::new("a", "X", RuleMode::Once).unwrap();
        assert_eq!(r.apply("banana"), "bXnana");
    }
}
