use crate::characters::Character;
use crate::clades::{CladeError, CladeList};
use crate::phylo::{NodeId, SpeciesSet, Tree};
use rustc_hash::FxHashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HomologyError {
    #[error("No bracketed group in the reference tree encloses the clade {{{species}}}.")]
    NoEnclosingGroup { species: String },
}

/// A character's two state clades resolved against the reference tree: the
/// smallest clade enclosing the smaller (derived) side and the smallest
/// clade enclosing the larger (ancestral) side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BipartitionKey {
    pub derived: NodeId,
    pub ancestral: NodeId,
}

/// Characters grouped by their bipartition key, in first-seen order.
#[derive(Debug, Default)]
pub struct Bipartitions {
    entries: Vec<(BipartitionKey, Vec<usize>)>,
}

impl Bipartitions {
    pub fn entries(&self) -> &[(BipartitionKey, Vec<usize>)] { &self.entries }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    fn push(&mut self, key: BipartitionKey, character_id: usize) {
        match self.entries.iter().position(|(k, _)| *k == key) {
            Some(i) => self.entries[i].1.push(character_id),
            None => self.entries.push((key, vec![character_id])),
        }
    }
}

/// Maps every character onto its bipartition key. Characters sharing a key
/// are treated as markers of the same transition.
pub fn group_by_bipartition(
    characters: &[Character],
    clades: &CladeList,
) -> Result<Bipartitions, CladeError> {
    let mut groups = Bipartitions::default();
    for character in characters {
        let derived = clades.enclosing_clade(character.smaller(), character.label())?;
        let ancestral = clades.enclosing_clade(character.larger(), character.label())?;
        groups.push(
            BipartitionKey { derived: derived.node_id(), ancestral: ancestral.node_id() },
            character.id(),
        );
    }
    Ok(groups)
}

/// One winning clade with the characters that resolved to it and the
/// internal node the labels will be attached to.
#[derive(Debug, Clone)]
pub struct ResolvedClade {
    winner: NodeId,
    attachment: NodeId,
    character_ids: Vec<usize>,
}

impl ResolvedClade {
    pub fn winner(&self) -> NodeId { self.winner }
    pub fn attachment(&self) -> NodeId { self.attachment }
    pub fn character_ids(&self) -> &[usize] { &self.character_ids }
}

#[derive(Debug, Default)]
pub struct Resolution {
    clades: Vec<ResolvedClade>,
    reversed: FxHashSet<usize>,
}

impl Resolution {
    pub fn clades(&self) -> &[ResolvedClade] { &self.clades }
    pub fn reversed(&self) -> &FxHashSet<usize> { &self.reversed }
    pub fn is_reversed(&self, character_id: usize) -> bool {
        self.reversed.contains(&character_id)
    }
}

/// Decides, for every bipartition, which of its two sides the tree supports.
///
/// Internal nodes are scanned in post-order; at each node the derived side is
/// tested before the ancestral side, and the first side enclosed by a node
/// wins the whole bipartition. Because post-order visits small groups before
/// the groups containing them, the side compatible with a more local part of
/// the tree wins. When the winning side's clade is strictly larger than the
/// other side's, the transition direction is recorded as reversed.
///
/// Bipartitions whose winners share a clade are merged into one
/// [`ResolvedClade`].
pub fn resolve_homology(tree: &Tree, groups: &Bipartitions) -> Result<Resolution, HomologyError> {
    let internals = tree.internal_node_ids_postorder();
    let mut resolution = Resolution::default();

    for (key, character_ids) in groups.entries() {
        let derived_species = tree.species(&key.derived);
        let ancestral_species = tree.species(&key.ancestral);

        let mut winner: Option<NodeId> = None;
        for node_id in &internals {
            let group_species = tree.species(node_id);
            if group_species.is_superset(derived_species) {
                winner = Some(key.derived);
                break;
            }
            if group_species.is_superset(ancestral_species) {
                winner = Some(key.ancestral);
                break;
            }
        }
        let winner_id = winner.ok_or_else(|| no_enclosing_group(derived_species))?;

        let other_count = if winner_id == key.derived {
            ancestral_species.len()
        } else {
            derived_species.len()
        };
        if tree.species_count(&winner_id) > other_count {
            resolution.reversed.extend(character_ids.iter().copied());
        }

        match resolution.clades.iter().position(|c| c.winner == winner_id) {
            Some(i) => resolution.clades[i]
                .character_ids
                .extend(character_ids.iter().copied()),
            None => {
                let winner_species = tree.species(&winner_id);
                let attachment = internals
                    .iter()
                    .copied()
                    .find(|node_id| tree.species(node_id).is_superset(winner_species))
                    .ok_or_else(|| no_enclosing_group(winner_species))?;
                resolution.clades.push(ResolvedClade {
                    winner: winner_id,
                    attachment,
                    character_ids: character_ids.clone(),
                });
            }
        }
    }
    Ok(resolution)
}

fn no_enclosing_group(species: &SpeciesSet) -> HomologyError {
    let mut names: Vec<&str> = species.iter().map(|species| species.as_ref()).collect();
    names.sort_unstable();
    HomologyError::NoEnclosingGroup { species: names.join(",") }
}
