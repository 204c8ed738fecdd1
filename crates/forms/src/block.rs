use serde::{Deserialize, Serialize};

/// One element of a document-analysis result, in the provider's JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    pub id: String,

    pub block_type: BlockType,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entity_types: Vec<EntityType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_status: Option<SelectionStatus>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
}

impl Block {
    pub fn new(id: impl Into<String>, block_type: BlockType) -> Self {
        Self {
            id: id.into(),
            block_type,
            entity_types: Vec::new(),
            text: None,
            selection_status: None,
            relationships: Vec::new(),
        }
    }

    pub fn word(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(id, BlockType::Word)
        }
    }

    pub fn selection(id: impl Into<String>, status: SelectionStatus) -> Self {
        Self {
            selection_status: Some(status),
            ..Self::new(id, BlockType::SelectionElement)
        }
    }

    pub fn key_value_set(id: impl Into<String>, entity: EntityType) -> Self {
        Self {
            entity_types: vec![entity],
            ..Self::new(id, BlockType::KeyValueSet)
        }
    }

    pub fn with_relationship<I, S>(mut self, kind: RelationshipType, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relationships.push(Relationship {
            kind,
            ids: ids.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// `KEY_VALUE_SET` tagged with the `KEY` entity type.
    pub fn is_key(&self) -> bool {
        self.block_type == BlockType::KeyValueSet && self.entity_types.contains(&EntityType::Key)
    }

    /// `KEY_VALUE_SET` without the `KEY` entity type.
    pub fn is_value(&self) -> bool {
        self.block_type == BlockType::KeyValueSet && !self.entity_types.contains(&EntityType::Key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    Page,
    Line,
    Word,
    KeyValueSet,
    SelectionElement,
    Table,
    Cell,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Key,
    Value,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionStatus {
    Selected,
    NotSelected,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    /// Key block to its value block
    Value,
    /// Container to the words and marks it is made of
    Child,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(rename = "Type")]
    pub kind: RelationshipType,

    #[serde(rename = "Ids", default)]
    pub ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_provider_json_and_tolerates_unknown_kinds() {
        let raw = r#"{
            "Id": "k1",
            "BlockType": "KEY_VALUE_SET",
            "Confidence": 97.5,
            "EntityTypes": ["KEY"],
            "Relationships": [
                {"Type": "VALUE", "Ids": ["v1"]},
                {"Type": "CHILD", "Ids": ["w1", "w2"]},
                {"Type": "COMPLEX_FEATURES", "Ids": ["x"]}
            ]
        }"#;
        let block: Block = serde_json::from_str(raw).unwrap();
        assert!(block.is_key());
        assert_eq!(block.relationships[1].ids, vec!["w1", "w2"]);
        assert_eq!(block.relationships[2].kind, RelationshipType::Other);

        let query: Block = serde_json::from_str(r#"{"Id": "q", "BlockType": "QUERY"}"#).unwrap();
        assert_eq!(query.block_type, BlockType::Other);
        assert!(!query.is_value());
    }
}
