mod expander;

pub use expander::{lexical_join, logical_cwd, same_file, PathExpander};
