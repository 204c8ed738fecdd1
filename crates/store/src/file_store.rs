use crate::error::Result;
use crate::store::{KvStore, Partitions};
use crate::types::Item;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Store persisted as a pretty-printed JSON array of items.
///
/// Every write rewrites the whole file (temp file, then rename), so the file on disk is
/// always a complete snapshot.
pub struct JsonFileStore {
    path: PathBuf,
    rows: Mutex<Partitions>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading existing rows if the file exists.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let rows = if tokio::fs::try_exists(&path).await? {
            log::info!("Loading store from {}", path.display());
            let data = tokio::fs::read_to_string(&path).await?;
            let items: Vec<Item> = if data.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&data)?
            };
            log::debug!("Loaded {} rows", items.len());
            Partitions::from_items(items)
        } else {
            log::info!("Creating new store at {}", path.display());
            Partitions::default()
        };

        Ok(Self {
            path,
            rows: Mutex::new(rows),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored row, ordered by partition and sort key.
    pub async fn items(&self) -> Vec<Item> {
        self.rows.lock().await.items()
    }

    async fn save(&self, rows: &Partitions) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let data = serde_json::to_string_pretty(&rows.items())?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, data).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for JsonFileStore {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    async fn put(&self, item: Item) -> Result<()> {
        let mut rows = self.rows.lock().await;
        log::debug!("put {} / {}", item.pk, item.sk);
        // Memory only changes once the snapshot is on disk.
        let mut next = rows.clone();
        next.insert(item);
        self.save(&next).await?;
        *rows = next;
        Ok(())
    }

    async fn get(&self, pk: &str, sk: &str) -> Result<Option<Item>> {
        Ok(self.rows.lock().await.get(pk, sk))
    }

    async fn query(&self, pk: &str, sk_prefix: &str) -> Result<Vec<Item>> {
        Ok(self.rows.lock().await.query(pk, sk_prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn rows_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("table.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        store
            .put(Item {
                pk: "TA1#".into(),
                sk: "TA1#".into(),
                data: "Yellow".into(),
            })
            .await
            .unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let item = reopened.get("TA1#", "TA1#").await.unwrap().unwrap();
        assert_eq!(item.data, "Yellow");
        assert_eq!(reopened.items().await.len(), 1);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn failed_save_leaves_rows_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blocker").join("table.json");
        let store = JsonFileStore::open(&path).await.unwrap();
        // A plain file where the parent directory should be makes the save fail.
        std::fs::write(dir.path().join("blocker"), b"").unwrap();

        let result = store
            .put(Item {
                pk: "TA1#".into(),
                sk: "TA1#".into(),
                data: "Yellow".into(),
            })
            .await;

        assert!(result.is_err());
        assert_eq!(store.get("TA1#", "TA1#").await.unwrap(), None);
        assert!(store.items().await.is_empty());
    }

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("absent.json"))
            .await
            .unwrap();
        assert!(store.items().await.is_empty());
        assert!(store.query("TA1#", "").await.unwrap().is_empty());
    }
}
