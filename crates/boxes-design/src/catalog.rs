//! The design catalog: the process-wide, read-only-after-load set of
//! designs (spec.md §5 "Shared resources"). Resolves `parent` references
//! (one level, see below) and falls back to the built-in default when no
//! config file is found or none of its designs survive parsing.

use crate::builtin::default_design;
use crate::config::{finalize, parse_drafts, ConfigError};
use crate::design::Design;
use crate::discovery::discover;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    designs: Vec<Design>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self { designs: Vec::new() }
    }

    pub fn from_designs(designs: Vec<Design>) -> Self {
        Self { designs }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Design> {
        self.designs.iter()
    }

    pub fn by_name(&self, query: &str) -> Option<&Design> {
        self.designs.iter().find(|d| d.matches_name(query))
    }

    pub fn by_tag(&self, tag: &str) -> impl Iterator<Item = &Design> {
        let tag = tag.to_ascii_lowercase();
        self.designs.iter().filter(move |d| d.tags.contains(&tag))
    }

    pub fn is_empty(&self) -> bool {
        self.designs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.designs.len()
    }

    /// Load the catalog: discover (or use `explicit`) a config file, parse
    /// it (resolving one level of `parent` references), and fall back to
    /// the built-in `default` design if the file is missing or yields no
    /// valid design. Returns every recoverable parse/validation error
    /// alongside the catalog (spec.md §7 "Config" error kind).
    pub fn load(explicit: Option<&Path>) -> Result<(Catalog, Vec<ConfigError>), CatalogError> {
        let mut errors = Vec::new();
        let designs = match discover(explicit) {
            Some(path) => {
                let (designs, mut file_errors) = load_file(&path)?;
                errors.append(&mut file_errors);
                designs
            }
            None => Vec::new(),
        };
        if designs.is_empty() {
            return Ok((Catalog::from_designs(vec![default_design().clone()]), errors));
        }
        Ok((Catalog::from_designs(designs), errors))
    }
}

fn load_file(path: &Path) -> Result<(Vec<Design>, Vec<ConfigError>), CatalogError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CatalogError::Io(path.to_path_buf(), e))?;
    let file_label = path.display().to_string();
    let (drafts, mut errors) = parse_drafts(&text, &file_label);

    // Resolve `parent` references one level deep: load the referenced file
    // (relative to this file's directory) and index its designs by name.
    let mut parent_catalogs: HashMap<String, HashMap<String, Design>> = HashMap::new();
    for draft in &drafts {
        if let Some(parent_path) = &draft.parent {
            if parent_catalogs.contains_key(parent_path) {
                continue;
            }
            let resolved = path
                .parent()
                .map(|dir| dir.join(parent_path))
                .unwrap_or_else(|| PathBuf::from(parent_path));
            match std::fs::read_to_string(&resolved) {
                Ok(parent_text) => {
                    let (parent_drafts, mut parent_errors) =
                        parse_drafts(&parent_text, &resolved.display().to_string());
                    errors.append(&mut parent_errors);
                    let mut by_name = HashMap::new();
                    for pd in parent_drafts {
                        let name = pd.name.clone();
                        if let Ok(design) = finalize(pd, None) {
                            by_name.insert(name, design);
                        }
                    }
                    parent_catalogs.insert(parent_path.clone(), by_name);
                }
                Err(e) => {
                    errors.push(ConfigError {
                        file: file_label.clone(),
                        line: 0,
                        message: format!("cannot read parent config '{parent_path}': {e}"),
                    });
                }
            }
        }
    }

    let mut designs = Vec::new();
    for draft in drafts {
        let parent_design = draft
            .parent
            .as_ref()
            .and_then(|p| parent_catalogs.get(p))
            .and_then(|by_name| by_name.get(&draft.name));
        let name = draft.name.clone();
        match finalize(draft, parent_design) {
            Ok(design) => designs.push(design),
            Err(e) => errors.push(ConfigError {
                file: file_label.clone(),
                line: 0,
                message: format!("design '{name}': {e}"),
            }),
        }
    }
    Ok((designs, errors))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_builtin_when_no_file_found() {
        let dir = tempfile::tempdir().unwrap();
        let prev = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let result = Catalog::load(None);
        std::env::set_current_dir(prev).unwrap();
        let (catalog, errors) = result.unwrap();
        assert!(errors.is_empty());
        assert_eq!(catalog.len(), 1);
        assert!(catalog.by_name("default").is_some());
    }

    #[test]
    fn loads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("my.cfg");
        std::fs::write(
            &cfg,
            r#"
BOX round
    shapes {
        nw ("(")
        n  ("-")
        ne (")")
        e  ("|")
        se (")")
        s  ("-")
        sw ("(")
        w  ("|")
    }
    elastic (n, s, e, w)
END round
"#,
        )
        .unwrap();
        let (catalog, errors) = Catalog::load(Some(&cfg)).unwrap();
        assert!(errors.is_empty(), "errors: {errors:?}");
        assert_eq!(catalog.len(), 1);
        assert!(catalog.by_name("round").is_some());
    }

    #[test]
    fn parent_reference_inherits_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let parent_cfg = dir.path().join("base.cfg");
        std::fs::write(
            &parent_cfg,
            r#"
BOX child
    padding (2,2,2,2)
    shapes {
        nw ("(")
        n  ("-")
        ne (")")
        e  ("|")
        se (")")
        s  ("-")
        sw ("(")
        w  ("|")
    }
    elastic (n, s, e, w)
END child
"#,
        )
        .unwrap();
        let main_cfg = dir.path().join("main.cfg");
        std::fs::write(
            &main_cfg,
            "BOX child\n    parent \"base.cfg\"\nEND child\n",
        )
        .unwrap();
        let (catalog, errors) = Catalog::load(Some(&main_cfg)).unwrap();
        assert!(errors.is_empty(), "errors: {errors:?}");
        let design = catalog.by_name("child").unwrap();
        assert_eq!(design.padding.top, 2);
    }
}
