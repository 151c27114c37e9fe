//! `-l/--list` and `-q/--tag-query` (spec.md §6.1 "external collaborator").
//!
//! Grounded on `examples/original_source/src/list.c`'s `list_designs`/
//! `print_design_details` for the listing format and `query.c`'s
//! `parse_query`/`filter_by_tag` for the tag-query grammar and semantics.

use std::collections::HashSet;

use boxes_design::{Catalog, Design};

use crate::error::CliError;

const QUERY_ALL: &str = "(all)";
const QUERY_UNDOC: &str = "(undoc)";

#[derive(Debug, Clone)]
enum QueryTerm {
    Plus(String),
    Minus(String),
    Plain(String),
}

/// spec.md §6.1 `-q`: comma list of `[+|-]tag`, plus the literals `(all)`
/// and `(undoc)`. An empty query, or one made up only of `-tag` negations
/// (no positive element), implicitly gains a trailing `(all)` term so that
/// pure exclusion lists still have something to exclude from.
pub fn parse_query(spec: &str) -> Result<Vec<QueryTerm>, CliError> {
    let mut terms = Vec::new();
    let mut has_positive = false;
    for raw in spec.split(',') {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let (term, tag) = match trimmed.strip_prefix('+') {
            Some(rest) => (QueryTerm::Plus(rest.to_string()), rest),
            None => match trimmed.strip_prefix('-') {
                Some(rest) => (QueryTerm::Minus(rest.to_string()), rest),
                None => (QueryTerm::Plain(trimmed.to_string()), trimmed),
            },
        };
        if !matches!(term, QueryTerm::Minus(_)) {
            has_positive = true;
        }
        if tag != QUERY_ALL && tag != QUERY_UNDOC && !is_valid_tag(tag) {
            return Err(CliError::Usage(format!("not a tag -- {tag}")));
        }
        terms.push(term);
    }
    if terms.is_empty() {
        return Err(CliError::Usage(format!("empty tag query -- {spec}")));
    }
    if !has_positive {
        terms.push(QueryTerm::Plain(QUERY_ALL.to_string()));
    }
    Ok(terms)
}

fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn matches_query(tags: &HashSet<String>, query: &[QueryTerm]) -> bool {
    let mut result = query.iter().any(|t| matches!(t, QueryTerm::Plain(t) if t == QUERY_ALL));
    for term in query {
        match term {
            QueryTerm::Plus(tag) => {
                result = tags.contains(tag);
                if !result {
                    break;
                }
            }
            QueryTerm::Minus(tag) => {
                if tags.contains(tag) {
                    result = false;
                    break;
                }
            }
            QueryTerm::Plain(tag) if tag != QUERY_ALL => {
                if tags.contains(tag) {
                    result = true;
                }
            }
            QueryTerm::Plain(_) => {}
        }
    }
    result
}

fn names(design: &Design) -> String {
    if design.aliases.is_empty() {
        design.name.clone()
    } else {
        format!("{} alias {}", design.name, design.aliases.join(", "))
    }
}

fn design_block(design: &Design) -> String {
    let sample: Vec<String> = design.sample.iter().map(|l| l.to_text()).collect();
    let sample = sample.join("\n");
    match (&design.author, &design.designer) {
        (Some(author), Some(designer)) if author != designer => {
            format!("{}\n{}, coded by {}:\n\n{}\n", names(design), designer, author, sample)
        }
        (_, Some(designer)) => format!("{}\n{}:\n\n{}\n", names(design), designer, sample),
        (Some(author), None) => {
            format!("{}\nunknown artist, coded by {}:\n\n{}\n", names(design), author, sample)
        }
        (None, None) => format!("{}:\n\n{}\n", names(design), sample),
    }
}

fn design_details(design: &Design) -> String {
    let mut out = String::new();
    out.push_str(&format!("Complete Design Information for \"{}\":\n", design.name));
    out.push_str(&"-".repeat(36 + design.name.len()));
    out.push('\n');
    out.push_str("Alias Names:            ");
    if design.aliases.is_empty() {
        out.push_str("none");
    } else {
        out.push_str(&design.aliases.join(", "));
    }
    out.push('\n');
    out.push_str(&format!(
        "Author:                 {}\n",
        design.author.as_deref().unwrap_or("(unknown author)")
    ));
    out.push_str(&format!(
        "Original Designer:      {}\n",
        design.designer.as_deref().unwrap_or("(unknown artist)")
    ));
    out.push_str("Indentation Mode:       ");
    out.push_str(match design.indent {
        boxes_design::IndentMode::Box => "box (indent box)",
        boxes_design::IndentMode::Text => "text (retain indentation inside of box)",
        boxes_design::IndentMode::None => "none (discard indentation)",
    });
    out.push('\n');
    out.push_str("Replacement Rules:      ");
    if design.replace_rules.is_empty() {
        out.push_str("none\n");
    } else {
        for (i, rule) in design.replace_rules.iter().enumerate() {
            out.push_str(&format!(
                "{}. ({}) \"{}\" WITH \"{}\"\n",
                i + 1,
                if rule.mode == boxes_design::RuleMode::Global { "glob" } else { "once" },
                rule.source,
                rule.replacement
            ));
        }
    }
    out.push_str(&format!(
        "Minimum Box Dimensions: {} x {}  (width x height)\n",
        design.min_width, design.min_height
    ));
    out
}

/// Full `-l` output. When `selected` is `Some` (an explicit `-d` was given
/// alongside `-l`), prints that one design's full detail block; otherwise
/// lists every design matching `query` (default: everything), sorted by
/// name, followed by a tag-frequency footer.
pub fn list(catalog: &Catalog, selected: Option<&Design>, query: Option<&str>) -> Result<String, CliError> {
    if let Some(design) = selected {
        return Ok(design_details(design));
    }

    let terms = match query {
        Some(q) => parse_query(q)?,
        None => vec![QueryTerm::Plain(QUERY_ALL.to_string())],
    };

    let mut designs: Vec<&Design> = catalog.iter().filter(|d| matches_query(&d.tags, &terms)).collect();
    designs.sort_by(|a, b| a.name.to_ascii_lowercase().cmp(&b.name.to_ascii_lowercase()));

    let mut out = String::new();
    out.push_str(&format!("{} Box Designs:\n\n", designs.len()));
    for design in &designs {
        out.push_str(&design_block(design));
        out.push('\n');
    }

    let mut tag_counts: std::collections::BTreeMap<&str, usize> = std::collections::BTreeMap::new();
    for design in &designs {
        for tag in &design.tags {
            *tag_counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }
    if !tag_counts.is_empty() {
        out.push_str("Other available tags:\n");
        for (tag, count) in tag_counts {
            out.push_str(&format!("  {tag} ({count})\n"));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_all_matches_everything() {
        let q = parse_query("(all)").unwrap();
        assert!(matches_query(&tags(&["ascii"]), &q));
    }

    #[test]
    fn plus_filters_to_tag() {
        let q = parse_query("+ascii").unwrap();
        assert!(matches_query(&tags(&["ascii", "box"]), &q));
        assert!(!matches_query(&tags(&["box"]), &q));
    }

    #[test]
    fn minus_only_excludes_from_implied_all() {
        let q = parse_query("-code").unwrap();
        assert!(matches_query(&tags(&["ascii"]), &q));
        assert!(!matches_query(&tags(&["code"]), &q));
    }

    #[test]
    fn invalid_tag_is_usage_error() {
        assert!(parse_query("not a tag!").is_err());
    }
}
