//! Config file discovery (spec.md §6.5, SPEC_FULL §1.3).
//!
//! Grounded on the teacher's `core_config::discover()` shape: an explicit
//! path wins, otherwise a short, documented search order using the `dirs`
//! crate — the same dependency the teacher already pulls in for config
//! directory lookup.

use std::path::{Path, PathBuf};

/// Search order when no `-f`/`--config` path was given: `./boxes.cfg`,
/// `./.boxes`, then the user config directory's `boxes/config`.
pub fn discover(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    for candidate in ["boxes.cfg", ".boxes"] {
        let p = PathBuf::from(candidate);
        if p.is_file() {
            return Some(p);
        }
    }
    if let Some(dir) = dirs::config_dir() {
        let p = dir.join("boxes").join("config");
        if p.is_file() {
            return Some(p);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_always_wins() {
        let p = PathBuf::from("/some/explicit/path.cfg");
        assert_eq!(discover(Some(&p)), Some(p));
    }

    #[test]
    fn finds_boxes_cfg_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("boxes.cfg");
        std::fs::write(&cfg, "BOX x\nEND x\n").unwrap();
        let prev = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let found = discover(None);
        std::env::set_current_dir(prev).unwrap();
        assert_eq!(found, Some(PathBuf::from("boxes.cfg")));
    }
}
