use crate::phylo::SpeciesSet;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CharacterError {
    #[error("Origin table row at line {line} has {found} columns; at least 5 are required.")]
    OriginColumns { line: usize, found: usize },
    #[error("Origin table row at line {line} has a non-integer count: \"{value}\".")]
    OriginCount { line: usize, value: String },
    #[error("Character table row at line {line} has {found} columns; at least 3 are required.")]
    CharacterColumns { line: usize, found: usize },
    #[error("Character \"{label}\" is missing its second state row.")]
    MissingStateRow { label: String },
    #[error("Character \"{label}\" is paired with a row labeled \"{found}\".")]
    StateRowMismatch { label: String, found: String },
    #[error("Character \"{label}\" has state \"{value}\"; expected \"0\" or \"1\".")]
    InvalidState { label: String, value: String },
    #[error("Character \"{label}\" lists state \"{value}\" twice.")]
    DuplicateStateRow { label: String, value: char },
}

/// One accepted binary character: the species sets of its two states, split
/// into the smaller and the larger side. The smaller side is taken as
/// derived, so the transition runs from the larger side's state to the
/// smaller side's state.
#[derive(Debug, Clone)]
pub struct Character {
    id: usize,
    label: String,
    from_state: char,
    to_state: char,
    smaller: SpeciesSet,
    larger: SpeciesSet,
}

impl Character {
    /// One-based id; ids are dense over the accepted characters, in table
    /// order, and index the character slice.
    pub fn id(&self) -> usize { self.id }
    pub fn label(&self) -> &str { &self.label }
    pub fn smaller(&self) -> &SpeciesSet { &self.smaller }
    pub fn larger(&self) -> &SpeciesSet { &self.larger }

    pub fn description(&self) -> String {
        format!("{} {}->{}", self.label, self.from_state, self.to_state)
    }

    /// The transition read in the opposite direction, for characters whose
    /// derived side turns out to sit above the ancestral side in the tree.
    pub fn description_reversed(&self) -> String {
        format!("{} {}->{}", self.label, self.to_state, self.from_state)
    }
}

/// Reads the origin table and returns the labels of characters that arose
/// exactly once. A character qualifies when its origins-elsewhere flag is 0
/// and its three origin counts sum to 1. The header row and blank lines are
/// skipped.
pub fn single_origin_labels(content: &str) -> Result<FxHashSet<String>, CharacterError> {
    let mut labels: FxHashSet<String> = FxHashSet::default();
    for (line_idx, line) in content.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() < 5 {
            return Err(CharacterError::OriginColumns {
                line: line_idx + 1,
                found: columns.len(),
            });
        }
        let flag = parse_count(columns[4], line_idx + 1)?;
        if flag != 0 {
            continue;
        }
        let count_a = parse_count(columns[1], line_idx + 1)?;
        let count_b = parse_count(columns[2], line_idx + 1)?;
        let count_c = parse_count(columns[3], line_idx + 1)?;
        if count_a + count_b + count_c == 1 {
            labels.insert(columns[0].to_string());
        }
    }
    Ok(labels)
}

fn parse_count(value: &str, line: usize) -> Result<i64, CharacterError> {
    value.trim().parse::<i64>().map_err(|_| CharacterError::OriginCount {
        line,
        value: value.to_string(),
    })
}

/// Reads the character table, keeping only characters whose label appears in
/// `single_origin`. Rows come in pairs sharing a label, one per state, in
/// either state order. Rows are uppercased so the species names match the
/// normalized reference tree. The header row and blank lines are skipped.
pub fn parse_character_table(
    content: &str,
    single_origin: &FxHashSet<String>,
) -> Result<Vec<Character>, CharacterError> {
    let mut characters: Vec<Character> = Vec::new();
    let mut rows = content
        .lines()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty());

    while let Some((line_idx, line)) = rows.next() {
        let line = line.trim().to_uppercase();
        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() < 3 {
            return Err(CharacterError::CharacterColumns {
                line: line_idx + 1,
                found: columns.len(),
            });
        }
        let label = columns[0].to_string();
        if !single_origin.contains(&label) {
            continue;
        }

        let (second_idx, second) = rows
            .next()
            .ok_or_else(|| CharacterError::MissingStateRow { label: label.clone() })?;
        let second = second.trim().to_uppercase();
        let second_columns: Vec<&str> = second.split('\t').collect();
        if second_columns.len() < 3 {
            return Err(CharacterError::CharacterColumns {
                line: second_idx + 1,
                found: second_columns.len(),
            });
        }
        if second_columns[0] != label {
            return Err(CharacterError::StateRowMismatch {
                label,
                found: second_columns[0].to_string(),
            });
        }

        let first_state = state_of(columns[1], &label)?;
        let second_state = state_of(second_columns[1], &label)?;
        if first_state == second_state {
            return Err(CharacterError::DuplicateStateRow { label, value: first_state });
        }

        let first_species = species_of(columns[2]);
        let second_species = species_of(second_columns[2]);
        let id = characters.len() + 1;
        let character = if first_species.len() < second_species.len() {
            Character {
                id,
                label,
                from_state: second_state,
                to_state: first_state,
                smaller: first_species,
                larger: second_species,
            }
        } else {
            Character {
                id,
                label,
                from_state: first_state,
                to_state: second_state,
                smaller: second_species,
                larger: first_species,
            }
        };
        characters.push(character);
    }
    Ok(characters)
}

fn state_of(value: &str, label: &str) -> Result<char, CharacterError> {
    match value {
        "0" => Ok('0'),
        "1" => Ok('1'),
        _ => Err(CharacterError::InvalidState {
            label: label.to_string(),
            value: value.to_string(),
        }),
    }
}

fn species_of(column: &str) -> SpeciesSet {
    column.split(',').map(Arc::from).collect()
}
