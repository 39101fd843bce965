mod node;
mod tree;

use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Set of species names carried by a node or referenced by a character state.
pub type SpeciesSet = FxHashSet<Arc<str>>;

pub use node::{Node, NodeId, NodeType};
pub use tree::{Tree, TreeError};
