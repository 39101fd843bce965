mod annotate;
mod characters;
mod clades;
mod error;
mod homology;
mod parsers;
mod phylo;

pub use annotate::Annotation;
pub use annotate::annotate_tree;
pub use annotate::display_names;
pub use annotate::render_newick;
pub use characters::Character;
pub use characters::CharacterError;
pub use characters::parse_character_table;
pub use characters::single_origin_labels;
pub use clades::Clade;
pub use clades::CladeError;
pub use clades::CladeList;
pub use error::Error;
pub use error::Result;
pub use homology::BipartitionKey;
pub use homology::Bipartitions;
pub use homology::HomologyError;
pub use homology::ResolvedClade;
pub use homology::Resolution;
pub use homology::group_by_bipartition;
pub use homology::resolve_homology;
pub use parsers::NewickError;
pub use parsers::NewickResult;
pub use parsers::parse_reference_tree;
pub use phylo::Node;
pub use phylo::NodeId;
pub use phylo::SpeciesSet;
pub use phylo::Tree;
pub use phylo::TreeError;
