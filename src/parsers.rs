pub(crate) mod newick;

pub use newick::{NewickError, NewickResult, parse_reference_tree};
