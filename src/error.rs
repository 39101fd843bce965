use crate::characters::CharacterError;
use crate::clades::CladeError;
use crate::homology::HomologyError;
use crate::parsers::NewickError;
use crate::phylo::TreeError;
use thiserror::Error;

/// Any error the pipeline can surface, one variant per stage.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Newick(#[from] NewickError),
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Character(#[from] CharacterError),
    #[error(transparent)]
    Clade(#[from] CladeError),
    #[error(transparent)]
    Homology(#[from] HomologyError),
}

pub type Result<T> = std::result::Result<T, Error>;
