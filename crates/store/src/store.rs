use crate::error::Result;
use crate::types::Item;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Minimal single-table store: point writes, point reads and `begins_with` queries.
///
/// Query results come back ordered by sort key, the way the managed store returns them.
#[async_trait]
pub trait KvStore: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn put(&self, item: Item) -> Result<()>;

    async fn get(&self, pk: &str, sk: &str) -> Result<Option<Item>>;

    async fn query(&self, pk: &str, sk_prefix: &str) -> Result<Vec<Item>>;
}

/// Rows grouped by partition, each partition ordered by sort key.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Partitions(BTreeMap<String, BTreeMap<String, String>>);

impl Partitions {
    pub(crate) fn from_items(items: Vec<Item>) -> Self {
        let mut partitions = Self::default();
        for item in items {
            partitions.insert(item);
        }
        partitions
    }

    pub(crate) fn insert(&mut self, item: Item) {
        self.0
            .entry(item.pk)
            .or_default()
            .insert(item.sk, item.data);
    }

    pub(crate) fn get(&self, pk: &str, sk: &str) -> Option<Item> {
        let data = self.0.get(pk)?.get(sk)?;
        Some(Item {
            pk: pk.to_string(),
            sk: sk.to_string(),
            data: data.clone(),
        })
    }

    pub(crate) fn query(&self, pk: &str, sk_prefix: &str) -> Vec<Item> {
        let Some(partition) = self.0.get(pk) else {
            return Vec::new();
        };
        partition
            .range(sk_prefix.to_string()..)
            .take_while(|(sk, _)| sk.starts_with(sk_prefix))
            .map(|(sk, data)| Item {
                pk: pk.to_string(),
                sk: sk.clone(),
                data: data.clone(),
            })
            .collect()
    }

    pub(crate) fn items(&self) -> Vec<Item> {
        self.0
            .iter()
            .flat_map(|(pk, rows)| {
                rows.iter().map(move |(sk, data)| Item {
                    pk: pk.clone(),
                    sk: sk.clone(),
                    data: data.clone(),
                })
            })
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Partitions>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn put(&self, item: Item) -> Result<()> {
        log::debug!("put {} / {}", item.pk, item.sk);
        self.rows.write().await.insert(item);
        Ok(())
    }

    async fn get(&self, pk: &str, sk: &str) -> Result<Option<Item>> {
        Ok(self.rows.read().await.get(pk, sk))
    }

    async fn query(&self, pk: &str, sk_prefix: &str) -> Result<Vec<Item>> {
        let items = self.rows.read().await.query(pk, sk_prefix);
        log::debug!("query {pk} begins_with {sk_prefix:?}: {} rows", items.len());
        Ok(items)
    }
}
