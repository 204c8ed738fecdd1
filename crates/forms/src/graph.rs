use crate::block::{Block, BlockType, RelationshipType, SelectionStatus};
use crate::error::ResolveError;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Marker written for a selected checkbox or radio button.
pub const SELECTED_MARKER: &str = "X";

/// Edge between two blocks; `ordinal` keeps the provider's id order.
#[derive(Debug, Clone, Copy)]
struct Link {
    kind: RelationshipType,
    ordinal: usize,
}

/// Reference to a block id that is not part of the block set.
#[derive(Debug, Clone)]
struct Dangling {
    from: NodeIndex,
    kind: RelationshipType,
    id: String,
}

/// Borrowed view of a block set as a directed graph.
pub struct BlockGraph<'a> {
    graph: DiGraph<&'a Block, Link>,
    keys: Vec<NodeIndex>,
    values: HashSet<NodeIndex>,
    dangling: Vec<Dangling>,
}

impl<'a> BlockGraph<'a> {
    pub fn new(blocks: &'a [Block]) -> Self {
        let mut graph = DiGraph::with_capacity(blocks.len(), blocks.len());
        let mut index: HashMap<&'a str, NodeIndex> = HashMap::with_capacity(blocks.len());
        let mut keys = Vec::new();
        let mut values = HashSet::new();

        for block in blocks {
            if index.contains_key(block.id.as_str()) {
                log::warn!("Duplicate block id {}, keeping the first", block.id);
                continue;
            }
            let node = graph.add_node(block);
            index.insert(block.id.as_str(), node);
            if block.is_key() {
                keys.push(node);
            } else if block.is_value() {
                values.insert(node);
            }
        }

        let mut dangling = Vec::new();
        for node in graph.node_indices().collect::<Vec<_>>() {
            let block = graph[node];
            let mut ordinal = 0;
            for relationship in &block.relationships {
                for id in &relationship.ids {
                    match index.get(id.as_str()) {
                        Some(&target) => {
                            graph.add_edge(
                                node,
                                target,
                                Link {
                                    kind: relationship.kind,
                                    ordinal,
                                },
                            );
                        }
                        None => dangling.push(Dangling {
                            from: node,
                            kind: relationship.kind,
                            id: id.clone(),
                        }),
                    }
                    ordinal += 1;
                }
            }
        }

        Self {
            graph,
            keys,
            values,
            dangling,
        }
    }

    pub fn block_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Targets of `node` along `kind` edges, in provider order.
    fn targets(&self, node: NodeIndex, kind: RelationshipType) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges(node)
            .filter(|e| e.weight().kind == kind)
            .map(|e| (e.weight().ordinal, e.target()))
            .collect();
        edges.sort_unstable_by_key(|(ordinal, _)| *ordinal);
        edges.into_iter().map(|(_, target)| target).collect()
    }

    fn dangling_from(&self, node: NodeIndex, kind: RelationshipType) -> impl Iterator<Item = &Dangling> {
        self.dangling
            .iter()
            .filter(move |d| d.from == node && d.kind == kind)
    }

    fn missing(&self, id: impl Into<String>, from: NodeIndex) -> ResolveError {
        ResolveError::MissingBlock {
            id: id.into(),
            referenced_by: self.graph[from].id.clone(),
        }
    }

    /// Flattened text of a block: words followed by a space, selected marks as the
    /// marker, trimmed at the end.
    pub fn text_of(&self, node: NodeIndex) -> Result<String, ResolveError> {
        if let Some(missing) = self.dangling_from(node, RelationshipType::Child).next() {
            return Err(self.missing(missing.id.clone(), node));
        }

        let mut text = String::new();
        for child in self.targets(node, RelationshipType::Child) {
            let block = self.graph[child];
            match block.block_type {
                BlockType::Word => {
                    text.push_str(block.text.as_deref().unwrap_or_default());
                    text.push(' ');
                }
                BlockType::SelectionElement
                    if block.selection_status == Some(SelectionStatus::Selected) =>
                {
                    text.push_str(SELECTED_MARKER);
                    text.push(' ');
                }
                _ => {}
            }
        }
        Ok(text.trim().to_string())
    }

    fn value_of(&self, key: NodeIndex) -> Result<Option<NodeIndex>, ResolveError> {
        let targets = self.targets(key, RelationshipType::Value);
        let missing: Vec<_> = self.dangling_from(key, RelationshipType::Value).collect();

        match targets.len() + missing.len() {
            0 => Ok(None),
            1 => {
                if let Some(dangling) = missing.first() {
                    return Err(self.missing(dangling.id.clone(), key));
                }
                let value = targets[0];
                if self.values.contains(&value) {
                    Ok(Some(value))
                } else {
                    Err(self.missing(self.graph[value].id.clone(), key))
                }
            }
            count => Err(ResolveError::AmbiguousPairing {
                key_id: self.graph[key].id.clone(),
                count,
            }),
        }
    }

    /// Pair every key block with its value block, in document order.
    pub fn resolve(&self) -> Result<ResolvedForm, ResolveError> {
        let mut form = ResolvedForm::default();
        for &key in &self.keys {
            let Some(value) = self.value_of(key)? else {
                log::debug!("Key block {} has no VALUE edge, skipping", self.graph[key].id);
                continue;
            };
            let label = self.text_of(key)?;
            if label.is_empty() {
                log::debug!("Key block {} has no text, skipping", self.graph[key].id);
                continue;
            }
            form.push(label, self.text_of(value)?);
        }
        log::debug!(
            "Resolved {} labels from {} key blocks",
            form.fields.len(),
            self.keys.len()
        );
        Ok(form)
    }
}

/// One label and every value captured for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub label: String,
    pub values: Vec<String>,
}

/// Label to values mapping, in first-seen label order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedForm {
    fields: Vec<FormField>,
}

impl ResolvedForm {
    fn push(&mut self, label: String, value: String) {
        match self.fields.iter_mut().find(|f| f.label == label) {
            Some(field) => field.values.push(value),
            None => self.fields.push(FormField {
                label,
                values: vec![value],
            }),
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.label.as_str()).collect()
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<FormField> {
        self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Resolve a block set in one call.
pub fn resolve_blocks(blocks: &[Block]) -> Result<ResolvedForm, ResolveError> {
    BlockGraph::new(blocks).resolve()
}
