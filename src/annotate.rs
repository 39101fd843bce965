use crate::characters::Character;
use crate::homology::Resolution;
use crate::phylo::{NodeId, Tree};
use log::info;

/// The annotated tree text and one log line per assigned label.
#[derive(Debug, Default, Clone)]
pub struct Annotation {
    pub tree: String,
    pub character_log: Vec<String>,
}

/// Attaches numeric labels to the tree and renders the result.
///
/// Resolved clades are processed from the smallest winner to the largest, so
/// related transitions get adjacent numbers. Label numbering starts at 1 and
/// advances once per character; a clade carrying several characters shows the
/// span as `"first-last"`. The log gets one line per character, in label
/// order, with the transition flipped for reversed characters.
///
/// Character ids must index `characters`, as produced by
/// [`crate::characters::parse_character_table`].
pub fn annotate_tree(
    tree: &mut Tree,
    resolution: &Resolution,
    characters: &[Character],
) -> Annotation {
    let mut entries: Vec<_> = resolution.clades().iter().collect();
    entries.sort_by_key(|entry| tree.species_count(&entry.winner()));

    let mut character_log: Vec<String> = Vec::new();
    let mut next_label: usize = 1;
    for entry in entries {
        let first = next_label;
        for &character_id in entry.character_ids() {
            let character = &characters[character_id - 1];
            if resolution.is_reversed(character_id) {
                character_log.push(character.description_reversed());
            } else {
                character_log.push(character.description());
            }
            next_label += 1;
        }
        let last = next_label - 1;
        let label = if first == last {
            format!("\"{first}\"")
        } else {
            format!("\"{first}-{last}\"")
        };
        info!("Label {label} -> clade of {} species.", tree.species_count(&entry.winner()));
        tree.add_label(&entry.attachment(), label);
    }

    let rendered = render_newick(tree);
    Annotation { tree: display_names(&rendered), character_log }
}

/// Renders the tree back to Newick text. Labels attached to a node come out
/// in reverse attachment order, immediately after the node's closing bracket.
/// Branch lengths are never written.
pub fn render_newick(tree: &Tree) -> String {
    match tree.root_id() {
        Some(root_id) => format!("{};", render_node(tree, &root_id)),
        None => String::new(),
    }
}

fn render_node(tree: &Tree, node_id: &NodeId) -> String {
    let mut out = String::new();
    let child_ids = tree.child_ids(node_id);
    if child_ids.is_empty() {
        if let Some(name) = tree.name(node_id) {
            out.push_str(&name);
        }
        return out;
    }
    out.push('(');
    for (i, child_id) in child_ids.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&render_node(tree, child_id));
    }
    out.push(')');
    for label in tree.labels(node_id).iter().rev() {
        out.push_str(label);
    }
    out
}

/// Rewrites every run of two or more uppercase letters and underscores into
/// display form: first letter kept, the rest lowercased, underscores turned
/// into spaces. Single letters and digits pass through untouched.
pub fn display_names(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i: usize = 0;
    while i < chars.len() {
        let c = chars[i];
        if !c.is_ascii_uppercase() {
            out.push(c);
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < chars.len() && (chars[j].is_ascii_uppercase() || chars[j] == '_') {
            j += 1;
        }
        out.push(c);
        if j - i >= 2 {
            for &rest in &chars[i + 1..j] {
                if rest == '_' {
                    out.push(' ');
                } else {
                    out.push(rest.to_ascii_lowercase());
                }
            }
        }
        i = j;
    }
    out
}
