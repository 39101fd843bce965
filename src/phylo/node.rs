use super::SpeciesSet;
use slotmap::new_key_type;
use std::{fmt::Display, sync::Arc};

new_key_type! { pub struct NodeId; }

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    #[default]
    Unset,
    Tip,
    Internal,
    Root,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Node {
    node_id: Option<NodeId>,
    parent_id: Option<NodeId>,
    child_ids: Vec<NodeId>,
    name: Option<Arc<str>>,
    species: SpeciesSet,
    labels: Vec<String>,
    node_type: NodeType,
}

impl Node {
    pub fn new() -> Self { Self::default() }
    pub fn is_tip(&self) -> bool { self.node_type == NodeType::Tip }
    pub fn child_ids(&self) -> &[NodeId] { &self.child_ids }
    pub fn child_node_count(&self) -> usize { self.child_ids.len() }
    pub fn add_child_id(&mut self, node_id: NodeId) { self.child_ids.push(node_id) }
    pub fn node_id(&self) -> Option<&NodeId> { self.node_id.as_ref() }
    pub fn set_node_id(&mut self, node_id: NodeId) { self.node_id = Some(node_id); }
    pub fn parent_id(&self) -> Option<&NodeId> { self.parent_id.as_ref() }
    pub fn set_parent_id(&mut self, node_id: Option<NodeId>) { self.parent_id = node_id; }
    pub fn name(&self) -> Option<Arc<str>> { self.name.clone() }

    pub fn set_name<'a>(&mut self, name: Option<impl Into<&'a str>>) {
        self.name = name.map(|name| name.into().into());
    }

    pub fn species(&self) -> &SpeciesSet { &self.species }
    pub(crate) fn set_species(&mut self, species: SpeciesSet) { self.species = species }
    pub fn species_count(&self) -> usize { self.species.len() }
    pub fn labels(&self) -> &[String] { &self.labels }
    pub fn push_label(&mut self, label: String) { self.labels.push(label) }
    pub fn node_type(&self) -> NodeType { self.node_type }

    pub fn set_node_type(&mut self) -> NodeType {
        if self.parent_id.is_none() {
            self.node_type = NodeType::Root
        } else if self.child_ids.is_empty() {
            self.node_type = NodeType::Tip
        } else {
            self.node_type = NodeType::Internal
        }
        self.node_type
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let disp = format!("{self:?}");
        write!(f, "{}", &disp[7..disp.len() - 1])
    }
}

impl Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                NodeType::Unset => "Unset",
                NodeType::Tip => "Tip",
                NodeType::Internal => "Internal",
                NodeType::Root => "Root",
            }
        )
    }
}
