//! Recursive-descent parser for the `BOX name ... END name` grammar
//! (spec.md §6.2), grounded on `examples/original_source/src/parsing.c`
//! and `parsecode.c`. Parsing is pure (no file I/O, see `loader.rs` for
//! `parent` resolution and discovery); it walks the input line by line,
//! switching between tokenized header lines and literal line-capture for
//! `sample`/`shapes` blocks.

use crate::design::{Design, DesignError, IndentMode, Padding, Rule, RuleMode, ShapeEntry};
use crate::lexer::{tokenize, Token};
use crate::shape::Shape;
use boxes_text::validate::ValidationContext;
use boxes_text::BxString;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error, Clone)]
#[error("{file}: {line}: {message}")]
pub struct ConfigError {
    pub file: String,
    pub line: usize,
    pub message: String,
}

impl ConfigError {
    fn at(file: &str, line: usize, message: impl Into<String>) -> Self {
        Self {
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }
}

/// A design still missing any fields inherited via `parent` (spec.md §6.2).
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub name: String,
    pub aliases: Vec<String>,
    pub author: Option<String>,
    pub designer: Option<String>,
    pub sample_lines: Vec<String>,
    pub indent: Option<IndentMode>,
    pub shapes: HashMap<Shape, ShapeEntry>,
    pub elastic: HashSet<Shape>,
    pub padding: Option<Padding>,
    pub tags: HashSet<String>,
    pub replace_rules: Vec<(String, String, RuleMode)>,
    pub reverse_rules: Vec<(String, String, RuleMode)>,
    pub parent: Option<String>,
    start_line: usize,
}

/// Parse a whole config file's text into drafts, collecting recoverable
/// errors per block rather than aborting the file (spec.md §7 "Config"
/// error kind: "continue parsing subsequent designs when recovery is
/// possible").
pub fn parse_drafts(source: &str, file: &str) -> (Vec<Draft>, Vec<ConfigError>) {
    let lines: Vec<&str> = source.lines().collect();
    let mut drafts = Vec::new();
    let mut errors = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let trimmed = lines[i].trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            i += 1;
            continue;
        }
        if starts_with_kw(trimmed, "BOX") {
            let header_line = i + 1;
            let header_toks = tokenize(trimmed);
            let (name, aliases) = match parse_box_header(&header_toks) {
                Some(v) => v,
                None => {
                    errors.push(ConfigError::at(file, header_line, "malformed BOX header"));
                    i += 1;
                    continue;
                }
            };
            // Find the matching END line (case-insensitive, same name).
            let mut j = i + 1;
            let mut end_idx = None;
            while j < lines.len() {
                let t = lines[j].trim();
                if starts_with_kw(t, "END") {
                    end_idx = Some(j);
                    break;
                }
                j += 1;
            }
            let end_idx = match end_idx {
                Some(e) => e,
                None => {
                    errors.push(ConfigError::at(
                        file,
                        header_line,
                        format!("BOX '{name}' missing matching END"),
                    ));
                    break;
                }
            };
            match parse_box_body(&name, &aliases, &lines[i + 1..end_idx], header_line, file) {
                Ok(draft) => drafts.push(draft),
                Err(e) => errors.push(e),
            }
            i = end_idx + 1;
            continue;
        }
        errors.push(ConfigError::at(
            file,
            i + 1,
            format!("unexpected line outside BOX block: '{trimmed}'"),
        ));
        i += 1;
    }
    (drafts, errors)
}

fn starts_with_kw(line: &str, kw: &str) -> bool {
    let mut it = line.splitn(2, char::is_whitespace);
    it.next().is_some_and(|w| w.eq_ignore_ascii_case(kw))
}

fn parse_box_header(toks: &[Spanned]) -> Option<(String, Vec<String>)> {
    if toks.is_empty() {
        return None;
    }
    let mut names = Vec::new();
    for t in &toks[1..] {
        if let Token::Ident(s) = &t.token {
            names.push(s.clone());
        }
    }
    let name = names.first()?.clone();
    Some((name, names[1..].to_vec()))
}

use crate::lexer::Spanned;

fn parse_box_body(
    name: &str,
    aliases: &[String],
    lines: &[&str],
    base_line: usize,
    file: &str,
) -> Result<Draft, ConfigError> {
    let mut draft = Draft {
        name: name.to_string(),
        aliases: aliases.to_vec(),
        start_line: base_line,
        ..Default::default()
    };
    let mut i = 0;
    while i < lines.len() {
        let line_no = base_line + 1 + i;
        let raw = lines[i];
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            i += 1;
            continue;
        }
        if starts_with_kw(trimmed, "SAMPLE") {
            i += 1;
            let mut sample = Vec::new();
            while i < lines.len() && !starts_with_kw(lines[i].trim(), "ENDSAMPLE") {
                sample.push(lines[i].to_string());
                i += 1;
            }
            if i >= lines.len() {
                return Err(ConfigError::at(file, line_no, "sample missing ENDSAMPLE"));
            }
            // Leading blank lines are stripped (spec.md §6.3).
            while sample.first().is_some_and(|l| l.trim().is_empty()) {
                sample.remove(0);
            }
            draft.sample_lines = sample;
            i += 1;
            continue;
        }
        if starts_with_kw(trimmed, "SHAPES") {
            // Expect a `{` (same line or its own) then one or more
            // `name ( "line" "line" ... )` blocks.
            if !trimmed.contains('{') {
                i += 1;
                while i < lines.len() && !lines[i].contains('{') {
                    i += 1;
                }
            }
            i += 1;
            loop {
                while i < lines.len() && lines[i].trim().is_empty() {
                    i += 1;
                }
                if i >= lines.len() {
                    return Err(ConfigError::at(file, line_no, "shapes block missing '}'"));
                }
                if lines[i].trim() == "}" {
                    i += 1;
                    break;
                }
                let shape_line_no = base_line + 1 + i;
                let header = lines[i].trim();
                let (shape_name, rest) = header
                    .split_once('(')
                    .ok_or_else(|| ConfigError::at(file, shape_line_no, "expected 'name ('"))?;
                let shape = Shape::from_name(shape_name.trim()).ok_or_else(|| {
                    ConfigError::at(
                        file,
                        shape_line_no,
                        format!("unknown shape name '{}'", shape_name.trim()),
                    )
                })?;
                let mut body_lines = Vec::new();
                let mut rest = rest.to_string();
                i += 1;
                loop {
                    if let Some(close) = rest.find(')') {
                        let before = &rest[..close];
                        collect_quoted_lines(before, &mut body_lines);
                        break;
                    }
                    collect_quoted_lines(&rest, &mut body_lines);
                    if i >= lines.len() {
                        return Err(ConfigError::at(
                            file,
                            shape_line_no,
                            format!("shape '{shape_name}' missing closing ')'"),
                        ));
                    }
                    rest = lines[i].to_string();
                    i += 1;
                }
                let mut bx_lines = Vec::new();
                for l in &body_lines {
                    bx_lines.push(build_bxstring(l, ValidationContext::InShape, file, shape_line_no)?);
                }
                draft.shapes.insert(
                    shape,
                    ShapeEntry {
                        elastic: false,
                        lines: bx_lines,
                    },
                );
            }
            continue;
        }
        if starts_with_kw(trimmed, "ELASTIC") {
            let inside = between_parens(trimmed).unwrap_or_default();
            for name in inside.split(',') {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                match Shape::from_name(name) {
                    Some(s) => {
                        draft.elastic.insert(s);
                    }
                    None => {
                        return Err(ConfigError::at(
                            file,
                            line_no,
                            format!("unknown shape '{name}' in elastic list"),
                        ))
                    }
                }
            }
            i += 1;
            continue;
        }
        if starts_with_kw(trimmed, "PADDING") {
            let inside = between_parens(trimmed).unwrap_or_default();
            let nums: Vec<usize> = inside
                .split(',')
                .filter_map(|s| s.trim().parse::<usize>().ok())
                .collect();
            draft.padding = Some(match nums.len() {
                1 => Padding {
                    top: nums[0],
                    right: nums[0],
                    bottom: nums[0],
                    left: nums[0],
                },
                2 => Padding {
                    top: nums[0],
                    right: nums[1],
                    bottom: nums[0],
                    left: nums[1],
                },
                4 => Padding {
                    top: nums[0],
                    right: nums[1],
                    bottom: nums[2],
                    left: nums[3],
                },
                _ => {
                    return Err(ConfigError::at(
                        file,
                        line_no,
                        "padding expects 1, 2, or 4 numbers",
                    ))
                }
            });
            i += 1;
            continue;
        }
        if starts_with_kw(trimmed, "TAGS") {
            let toks = tokenize(trimmed);
            for t in &toks[1..] {
                if let Token::Ident(s) = &t.token {
                    draft.tags.insert(s.to_ascii_lowercase());
                }
            }
            i += 1;
            continue;
        }
        if starts_with_kw(trimmed, "INDENT") {
            let toks = tokenize(trimmed);
            let mode = toks.get(1).and_then(|t| match &t.token {
                Token::Ident(s) => IndentMode::from_name(s),
                _ => None,
            });
            draft.indent = Some(mode.ok_or_else(|| {
                ConfigError::at(file, line_no, "indent expects box|text|none")
            })?);
            i += 1;
            continue;
        }
        if starts_with_kw(trimmed, "AUTHOR") {
            draft.author = quoted_value(trimmed);
            i += 1;
            continue;
        }
        if starts_with_kw(trimmed, "DESIGNER") {
            draft.designer = quoted_value(trimmed);
            i += 1;
            continue;
        }
        if starts_with_kw(trimmed, "PARENT") {
            draft.parent = quoted_value(trimmed);
            i += 1;
            continue;
        }
        if starts_with_kw(trimmed, "REPLACE") || starts_with_kw(trimmed, "REVERSE") {
            let toks = tokenize(trimmed);
            let strs: Vec<&String> = toks
                .iter()
                .filter_map(|t| match &t.token {
                    Token::Str(s) => Some(s),
                    _ => None,
                })
                .collect();
            if strs.len() != 2 {
                return Err(ConfigError::at(
                    file,
                    line_no,
                    "replace/reverse expects pattern and replacement strings",
                ));
            }
            let mode = if toks
                .iter()
                .any(|t| matches!(&t.token, Token::Ident(s) if s.eq_ignore_ascii_case("g")))
            {
                RuleMode::Global
            } else {
                RuleMode::Once
            };
            let entry = (strs[0].clone(), strs[1].clone(), mode);
            if starts_with_kw(trimmed, "REPLACE") {
                draft.replace_rules.push(entry);
            } else {
                draft.reverse_rules.push(entry);
            }
            i += 1;
            continue;
        }
        return Err(ConfigError::at(
            file,
            line_no,
            format!("unrecognized directive: '{trimmed}'"),
        ));
    }
    Ok(draft)
}

fn collect_quoted_lines(segment: &str, out: &mut Vec<String>) {
    let mut rest = segment;
    while let Some(start) = rest.find('"') {
        let after = &rest[start + 1..];
        if let Some(end) = after.find('"') {
            out.push(after[..end].to_string());
            rest = &after[end + 1..];
        } else {
            break;
        }
    }
}

fn between_parens(line: &str) -> Option<String> {
    let start = line.find('(')?;
    let end = line.rfind(')')?;
    if end <= start {
        return None;
    }
    Some(line[start + 1..end].to_string())
}

fn quoted_value(line: &str) -> Option<String> {
    let toks = tokenize(line);
    toks.iter().find_map(|t| match &t.token {
        Token::Str(s) => Some(s.clone()),
        _ => None,
    })
}

fn build_bxstring(
    s: &str,
    ctx: ValidationContext,
    file: &str,
    line: usize,
) -> Result<BxString, ConfigError> {
    let cps: Vec<char> = s.chars().collect();
    BxString::from_code_points(&cps, ctx)
        .map_err(|e| ConfigError::at(file, line, format!("invalid character in shape line: {e}")))
}

/// Finalize one draft into a [`Design`], applying fields inherited from
/// `parent` (already-finalized designs from the referenced file, looked up
/// by name) and compiling its rules.
pub fn finalize(draft: Draft, parent: Option<&Design>) -> Result<Design, DesignError> {
    let mut shapes = draft.shapes;
    if let Some(p) = parent {
        for &s in Shape::ALL.iter() {
            shapes.entry(s).or_insert_with(|| p.shape(s).clone());
        }
    }
    for s in &draft.elastic {
        if let Some(entry) = shapes.get_mut(s) {
            entry.elastic = true;
        }
    }

    let sample = if !draft.sample_lines.is_empty() {
        draft
            .sample_lines
            .iter()
            .map(|l| BxString::from_ascii(l).unwrap_or_else(|_| BxString::empty()))
            .collect()
    } else {
        parent.map(|p| p.sample.clone()).unwrap_or_default()
    };

    let indent = draft
        .indent
        .or_else(|| parent.map(|p| p.indent))
        .unwrap_or(IndentMode::Box);
    let padding = draft
        .padding
        .or_else(|| parent.map(|p| p.padding))
        .unwrap_or_default();
    let mut tags = draft.tags;
    if let Some(p) = parent {
        for t in &p.tags {
            tags.insert(t.clone());
        }
    }

    let mut replace_rules = Vec::new();
    for (pat, rep, mode) in &draft.replace_rules {
        replace_rules.push(Rule::new(pat, rep, *mode)?);
    }
    let mut reverse_rules = Vec::new();
    for (pat, rep, mode) in &draft.reverse_rules {
        reverse_rules.push(Rule::new(pat, rep, *mode)?);
    }
    if replace_rules.is_empty() {
        if let Some(p) = parent {
            replace_rules = p.replace_rules.clone();
        }
    }
    if reverse_rules.is_empty() {
        if let Some(p) = parent {
            reverse_rules = p.reverse_rules.clone();
        }
    }

    use crate::shape::Side;
    let min_width_of = |shapes: &HashMap<Shape, ShapeEntry>| {
        Side::Top
            .shapes()
            .iter()
            .map(|s| shapes.get(s).map(|e| e.width()).unwrap_or(0))
            .sum()
    };
    let min_height_of = |shapes: &HashMap<Shape, ShapeEntry>| {
        Side::Left
            .shapes()
            .iter()
            .map(|s| shapes.get(s).map(|e| e.height()).unwrap_or(0))
            .sum()
    };
    let max_shape_height = shapes.values().map(|e| e.height()).max().unwrap_or(0);

    let design = Design {
        name: draft.name,
        aliases: draft.aliases,
        author: draft.author.or_else(|| parent.and_then(|p| p.author.clone())),
        designer: draft
            .designer
            .or_else(|| parent.and_then(|p| p.designer.clone())),
        sample,
        indent,
        min_width: min_width_of(&shapes),
        min_height: min_height_of(&shapes),
        max_shape_height,
        shapes,
        padding,
        tags,
        replace_rules,
        reverse_rules,
    };
    design.validate()?;
    Ok(design)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = r#"
BOX simple
    indent box
    padding (1,1,1,1)
    sample
      /****\
      *hi  *
      \****/
    endsample
    shapes {
        nw ("/")
        n  ("*")
        ne ("\")
        e  ("*")
        se ("/")
        s  ("*")
        sw ("\")
        w  ("*")
    }
    elastic (n, s, e, w)
END simple
"#;

    #[test]
    fn parses_simple_design() {
        let (drafts, errors) = parse_drafts(SIMPLE, "test.cfg");
        assert!(errors.is_empty(), "errors: {errors:?}");
        assert_eq!(drafts.len(), 1);
        let design = finalize(drafts.into_iter().next().unwrap(), None).unwrap();
        assert_eq!(design.name, "simple");
        assert!(design.shape(Shape::N).elastic);
        assert!(!design.shape(Shape::Nw).elastic);
        assert_eq!(design.padding.top, 1);
    }

    #[test]
    fn missing_end_is_a_recoverable_error() {
        let (_drafts, errors) = parse_drafts("BOX oops\nindent box\n", "test.cfg");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("missing matching END"));
    }

    #[test]
    fn aliases_and_tags_parsed() {
        let src = r#"
BOX stone, stony, rock
    tags classic, ascii
    shapes {
        nw ("+")
        n  ("-")
        ne ("+")
        e  ("|")
        se ("+")
        s  ("-")
        sw ("+")
        w  ("|")
    }
    elastic (n, s, e, w)
END stone
"#;
        let (drafts, errors) = parse_drafts(src, "test.cfg");
        assert!(errors.is_empty(), "errors: {errors:?}");
        let draft = drafts.into_iter().next().unwrap();
        assert_eq!(draft.aliases, vec!["stony", "rock"]);
        assert!(draft.tags.contains("classic"));
    }
}
