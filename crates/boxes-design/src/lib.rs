//! Shape table, `Design`/`Rule` model, and config loading (spec.md §3.2,
//! §4.2, §6.2). Component C2 of the pipeline in spec.md §2.

mod builtin;
pub mod catalog;
pub mod config;
pub mod design;
mod lexer;
pub mod discovery;
pub mod shape;

pub use builtin::default_design;
pub use catalog::{Catalog, CatalogError};
pub use config::ConfigError;
pub use design::{Design, DesignError, IndentMode, Padding, Rule, RuleMode, ShapeEntry};
pub use shape::{find_shape, highest, widest, Shape, Side};
