use super::SpeciesSet;
use super::node::{Node, NodeId, NodeType};
use slotmap::SlotMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Parent node with NodeId: {0} does not exist.")]
    ParentNodeDoesNotExist(NodeId),
    #[error("Tree validation failed: {0}.")]
    InvalidTree(String),
    #[error("Tip node with NodeId: {0} has no name.")]
    UnnamedTip(NodeId),
    #[error("Species \"{0}\" appears on more than one tip.")]
    DuplicateSpecies(String),
}

#[derive(Debug, Default, Clone)]
pub struct Tree {
    nodes: SlotMap<NodeId, Node>,
    root_id: Option<NodeId>,
    tip_count_all: usize,
    internal_node_count_all: usize,
    node_count_all: usize,
}

impl Tree {
    // =========================================================================
    // Construction
    // =========================================================================

    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_new_node<'a>(
        &mut self,
        name: Option<impl Into<&'a str>>,
        parent_node_id: Option<NodeId>,
    ) -> Result<NodeId, TreeError> {
        let mut node = Node::new();
        node.set_name(name);
        self.add_node(node, parent_node_id)
    }

    pub fn add_node(
        &mut self,
        mut node: Node,
        parent_node_id: Option<NodeId>,
    ) -> Result<NodeId, TreeError> {
        if let Some(parent_node_id_value) = parent_node_id {
            if !self.node_exists(parent_node_id_value) {
                return Err(TreeError::ParentNodeDoesNotExist(parent_node_id_value));
            }
            node.set_parent_id(parent_node_id);
        }
        let node_id = self.nodes.insert_with_key(|node_id| {
            node.set_node_id(node_id);
            node
        });
        if let Some(parent_node_id_value) = parent_node_id
            && let Some(parent_node) = self.nodes.get_mut(parent_node_id_value)
        {
            parent_node.add_child_id(node_id);
        }
        Ok(node_id)
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Assigns node types, checks the single-root property, and fills the
    /// descendant species set of every node. Tip names double as species
    /// names and must be present and unique across the tree.
    pub fn validate(&mut self) -> Result<NodeId, TreeError> {
        let mut count_of_tip: usize = 0;
        let mut count_of_internal: usize = 0;
        let mut count_of_root: usize = 0;
        let mut root_id: Option<NodeId> = None;

        for node in self.nodes.values_mut() {
            match node.set_node_type() {
                NodeType::Unset => (),
                NodeType::Tip => count_of_tip += 1,
                NodeType::Internal => count_of_internal += 1,
                NodeType::Root => {
                    count_of_root += 1;
                    root_id = node.node_id().copied();
                }
            }
        }

        if count_of_root != 1 {
            return Err(TreeError::InvalidTree(format!(
                "count_of_root({count_of_root}) should equal 1"
            )));
        }

        let root_id = root_id
            .ok_or_else(|| TreeError::InvalidTree("the root node has no NodeId".into()))?;

        self.root_id = Some(root_id);
        self.tip_count_all = count_of_tip;
        self.internal_node_count_all = count_of_internal + count_of_root;
        self.node_count_all = count_of_tip + count_of_internal + count_of_root;

        let mut seen: SpeciesSet = SpeciesSet::default();
        self.build_species_sets(root_id, &mut seen)?;

        Ok(root_id)
    }

    fn build_species_sets(
        &mut self,
        node_id: NodeId,
        seen: &mut SpeciesSet,
    ) -> Result<SpeciesSet, TreeError> {
        let child_ids = self.nodes[node_id].child_ids().to_vec();
        let mut species = SpeciesSet::default();
        if child_ids.is_empty() {
            let name = self.nodes[node_id]
                .name()
                .ok_or(TreeError::UnnamedTip(node_id))?;
            if !seen.insert(name.clone()) {
                return Err(TreeError::DuplicateSpecies(name.to_string()));
            }
            species.insert(name);
        } else {
            for child_id in child_ids {
                species.extend(self.build_species_sets(child_id, seen)?);
            }
        }
        self.nodes[node_id].set_species(species.clone());
        Ok(species)
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Internal node ids in post-order: children before their parent, left to
    /// right. The root comes last.
    pub fn internal_node_ids_postorder(&self) -> Vec<NodeId> {
        let mut node_ids: Vec<NodeId> = Vec::new();
        if let Some(root_id) = self.root_id {
            self.collect_internal_ids_postorder(root_id, &mut node_ids);
        }
        node_ids
    }

    fn collect_internal_ids_postorder(&self, node_id: NodeId, node_ids: &mut Vec<NodeId>) {
        let child_ids = self.nodes[node_id].child_ids();
        if child_ids.is_empty() {
            return;
        }
        for child_id in child_ids {
            self.collect_internal_ids_postorder(*child_id, node_ids);
        }
        node_ids.push(node_id);
    }

    /// Tip node ids in the order the tips appear in the tree text.
    pub fn tip_node_ids_all(&self) -> Vec<NodeId> {
        match self.root_id {
            Some(root_id) => self.tip_node_ids(&root_id),
            None => Vec::new(),
        }
    }

    pub fn tip_node_ids(&self, node_id: &NodeId) -> Vec<NodeId> {
        let mut node_ids: Vec<NodeId> = Vec::new();
        self.collect_tip_ids(node_id, &mut node_ids);
        node_ids
    }

    fn collect_tip_ids(&self, node_id: &NodeId, node_ids: &mut Vec<NodeId>) {
        let node = &self.nodes[*node_id];
        if node.child_ids().is_empty() {
            node_ids.push(*node_id);
            return;
        }
        for child_id in node.child_ids() {
            self.collect_tip_ids(child_id, node_ids);
        }
    }

    // =========================================================================
    // Access
    // =========================================================================

    pub fn node(&self, node_id: &NodeId) -> &Node { &self.nodes[*node_id] }
    pub fn node_exists(&self, node_id: NodeId) -> bool { self.nodes.contains_key(node_id) }
    pub fn root_id(&self) -> Option<NodeId> { self.root_id }
    pub fn child_ids(&self, node_id: &NodeId) -> &[NodeId] { self.nodes[*node_id].child_ids() }
    pub fn is_tip(&self, node_id: &NodeId) -> bool { self.nodes[*node_id].is_tip() }
    pub fn name(&self, node_id: &NodeId) -> Option<Arc<str>> { self.nodes[*node_id].name() }
    pub fn species(&self, node_id: &NodeId) -> &SpeciesSet { self.nodes[*node_id].species() }
    pub fn species_count(&self, node_id: &NodeId) -> usize { self.nodes[*node_id].species_count() }
    pub fn labels(&self, node_id: &NodeId) -> &[String] { self.nodes[*node_id].labels() }

    pub fn add_label(&mut self, node_id: &NodeId, label: String) {
        self.nodes[*node_id].push_label(label);
    }

    pub fn tip_count_all(&self) -> usize { self.tip_count_all }
    pub fn internal_node_count_all(&self) -> usize { self.internal_node_count_all }
    pub fn node_count_all(&self) -> usize { self.node_count_all }
}
