use crate::phylo::{Node, NodeId, Tree, TreeError};
use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NewickError {
    #[error("The tree file contains no tree on its first line.")]
    EmptyInput,
    #[error("No bracketed clade structure found in the tree line.")]
    NoBracketStructure,
    #[error("Unbalanced parentheses in the tree line: {open} opening, {close} closing.")]
    UnbalancedParentheses { open: usize, close: usize },
    #[error("Unsupported branch length syntax near \"{near}\"; only \":1.0\" is recognized.")]
    UnsupportedBranchLength { near: String },
    #[error("Unexpected text outside the clade structure: \"{text}\".")]
    StrayText { text: String },
    #[error(transparent)]
    Tree(#[from] TreeError),
}

pub type NewickResult<T> = Result<T, NewickError>;

/// Parses the first line of `content` as a reference phylogeny.
///
/// The line is uppercased, `:1.0` branch lengths and semicolons are dropped,
/// and spaces inside names become underscores. Any branch length other than
/// `:1.0` is rejected. Internal node labels and a root label are accepted but
/// discarded.
pub fn parse_reference_tree(content: &str) -> NewickResult<Tree> {
    let line = normalize(content.lines().next().unwrap_or(""));
    if line.is_empty() {
        return Err(NewickError::EmptyInput);
    }
    if let Some(colon) = line.find(':') {
        let near: String = line[colon..].chars().take(12).collect();
        return Err(NewickError::UnsupportedBranchLength { near });
    }

    let open_idx = line.find('(').ok_or(NewickError::NoBracketStructure)?;
    let open = line.matches('(').count();
    let close = line.matches(')').count();
    if open != close || closes_before_opening(&line) {
        return Err(NewickError::UnbalancedParentheses { open, close });
    }
    if open_idx != 0 {
        return Err(NewickError::StrayText { text: line[..open_idx].to_string() });
    }
    let close_idx = matching_close(&line).ok_or(NewickError::UnbalancedParentheses {
        open,
        close,
    })?;

    let mut tree = Tree::new();
    let root_id = tree.add_node(Node::new(), None)?;
    build_clade(&line[1..close_idx], root_id, &mut tree)?;

    let rest = &line[close_idx + 1..];
    if !rest.is_empty() {
        if rest.contains(['(', ')', ',']) {
            return Err(NewickError::StrayText { text: rest.to_string() });
        }
        debug!("Discarding the root label \"{rest}\".");
    }

    tree.validate()?;
    Ok(tree)
}

/// First line, uppercased, with the decorations the tool ignores removed.
fn normalize(line: &str) -> String {
    line.trim()
        .to_uppercase()
        .replace(":1.0", "")
        .replace(';', "")
        .replace(' ', "_")
}

/// Builds the children of `parent_id` from `span`, the text between one
/// matching pair of parentheses.
fn build_clade(span: &str, parent_id: NodeId, tree: &mut Tree) -> NewickResult<()> {
    for chunk in split_top_level(span) {
        if let Some(stripped) = chunk.strip_prefix('(') {
            let close = matching_close(chunk).ok_or_else(|| {
                NewickError::UnbalancedParentheses {
                    open: chunk.matches('(').count(),
                    close: chunk.matches(')').count(),
                }
            })?;
            let label = &chunk[close + 1..];
            if label.contains(['(', ')']) {
                return Err(NewickError::StrayText { text: label.to_string() });
            }
            if !label.is_empty() {
                debug!("Discarding the internal node label \"{label}\".");
            }
            let node_id = tree.add_node(Node::new(), Some(parent_id))?;
            build_clade(&stripped[..close - 1], node_id, tree)?;
        } else if chunk.contains(['(', ')']) {
            return Err(NewickError::StrayText { text: chunk.to_string() });
        } else {
            let name = if chunk.is_empty() { None } else { Some(chunk) };
            tree.add_new_node(name, Some(parent_id))?;
        }
    }
    Ok(())
}

/// Splits `span` at the commas that sit outside any nested parentheses.
fn split_top_level(span: &str) -> Vec<&str> {
    let mut chunks: Vec<&str> = Vec::new();
    let mut depth: i64 = 0;
    let mut i0: usize = 0;
    for (i, c) in span.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                chunks.push(&span[i0..i]);
                i0 = i + 1;
            }
            _ => (),
        }
    }
    chunks.push(&span[i0..]);
    chunks
}

/// True when some `)` appears before the `(` that would open it.
fn closes_before_opening(s: &str) -> bool {
    let mut depth: i64 = 0;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return true;
                }
            }
            _ => (),
        }
    }
    false
}

/// Index of the `)` that closes the `(` opening `s`. `s` must start with `(`.
fn matching_close(s: &str) -> Option<usize> {
    let mut depth: i64 = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => (),
        }
    }
    None
}
