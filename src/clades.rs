use crate::phylo::{NodeId, SpeciesSet, Tree};
use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CladeError {
    #[error("No clade in the reference tree contains any species of character \"{character}\".")]
    UnmatchedCharacter { character: String },
}

/// One bracketed group or tip of the reference tree, carried as the set of
/// species it contains.
#[derive(Debug, Clone)]
pub struct Clade {
    node_id: NodeId,
    species: SpeciesSet,
}

impl Clade {
    pub fn node_id(&self) -> NodeId { self.node_id }
    pub fn species(&self) -> &SpeciesSet { &self.species }
    pub fn species_count(&self) -> usize { self.species.len() }

    pub fn contains_all(&self, subset: &SpeciesSet) -> bool {
        self.species.is_superset(subset)
    }
}

/// Every clade of a reference tree, ordered so that lookups resolve to the
/// smallest enclosing clade first.
///
/// Multi-species groups are collected in post-order, tips follow in text
/// order, and a stable sort by species count then puts the singletons first
/// and the full species set last.
#[derive(Debug, Default, Clone)]
pub struct CladeList {
    clades: Vec<Clade>,
}

impl CladeList {
    pub fn from_tree(tree: &Tree) -> Self {
        let mut clades: Vec<Clade> = Vec::new();
        for node_id in tree.internal_node_ids_postorder() {
            let species = tree.species(&node_id);
            if species.len() > 1 {
                clades.push(Clade { node_id, species: species.clone() });
            }
        }
        for node_id in tree.tip_node_ids_all() {
            clades.push(Clade { node_id, species: tree.species(&node_id).clone() });
        }
        clades.sort_by_key(Clade::species_count);
        CladeList { clades }
    }

    pub fn clades(&self) -> &[Clade] { &self.clades }
    pub fn len(&self) -> usize { self.clades.len() }
    pub fn is_empty(&self) -> bool { self.clades.is_empty() }

    /// The species set of the whole tree.
    pub fn full_species(&self) -> Option<&SpeciesSet> {
        self.clades.last().map(Clade::species)
    }

    /// The smallest clade containing every tree species of `subset`.
    ///
    /// Species missing from the tree are dropped before the search. A
    /// `subset` with no species in the tree at all has no meaningful answer
    /// and is an error, reported under the character's label.
    pub fn enclosing_clade(
        &self,
        subset: &SpeciesSet,
        character: &str,
    ) -> Result<&Clade, CladeError> {
        let restricted: SpeciesSet = match self.full_species() {
            Some(full) => subset.intersection(full).cloned().collect(),
            None => SpeciesSet::default(),
        };
        if restricted.len() < subset.len() {
            debug!(
                "Character \"{character}\": {} of {} species are not in the reference tree.",
                subset.len() - restricted.len(),
                subset.len()
            );
        }
        if restricted.is_empty() {
            return Err(CladeError::UnmatchedCharacter { character: character.to_string() });
        }
        self.clades
            .iter()
            .find(|clade| clade.contains_all(&restricted))
            .ok_or_else(|| CladeError::UnmatchedCharacter { character: character.to_string() })
    }
}
