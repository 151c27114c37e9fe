//! Compiled-in fallback design (SPEC_FULL §1.4).
//!
//! The original project always has at least one design available even
//! with no config file on disk. This embeds exactly one minimal design —
//! a single-line-corner "stone" style box named `default` — parsed through
//! the same `BOX...END` grammar as any on-disk config, grounded in the
//! `sample` block convention of spec.md §6.3.

use crate::config::{finalize, parse_drafts};
use crate::design::Design;
use std::sync::OnceLock;

const BUILTIN_CONFIG: &str = r#"
BOX default
    author "boxes"
    indent box
    padding (0,1,0,1)
    tags classic
    sample
        +----------+
        |  sample  |
        +----------+
    endsample
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
END default
"#;

pub fn default_design() -> &'static Design {
    static DESIGN: OnceLock<Design> = OnceLock::new();
    DESIGN.get_or_init(|| {
        let (drafts, errors) = parse_drafts(BUILTIN_CONFIG, "<builtin>");
        assert!(errors.is_empty(), "builtin config must parse cleanly: {errors:?}");
        finalize(
            drafts.into_iter().next().expect("builtin config defines one design"),
            None,
        )
        .expect("builtin design must satisfy design invariants")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_design_is_valid() {
        let d = default_design();
        assert_eq!(d.name, "default");
        d.validate().unwrap();
    }
}
