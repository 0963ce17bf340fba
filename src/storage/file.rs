//! File-backed menu store
//!
//! Stores the menu in a JSON file on disk with an in-memory cache.

use super::{DrinkStore, StorageError};
use crate::{Drink, Ingredient};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based menu storage
pub struct FileStore {
    /// Path to the storage file
    path: PathBuf,
    /// In-memory cache of the menu
    cache: RwLock<StoreCache>,
}

/// In-memory cache of all storage data
#[derive(Debug, Serialize, Deserialize)]
struct StoreCache {
    /// Drinks by ID
    drinks: HashMap<i64, Drink>,
    /// Next ID to assign
    next_id: i64,

    /// Index: title -> drink ID (not serialized, rebuilt on load)
    #[serde(skip)]
    title_index: HashMap<String, i64>,
}

impl Default for StoreCache {
    fn default() -> Self {
        Self {
            drinks: HashMap::new(),
            next_id: 1,
            title_index: HashMap::new(),
        }
    }
}

impl StoreCache {
    /// Rebuild the title index from primary data
    fn rebuild_indexes(&mut self) {
        self.title_index.clear();
        for (id, drink) in &self.drinks {
            self.title_index.insert(drink.title.clone(), *id);
        }
    }
}

impl FileStore {
    /// Open a store at `path`, loading existing data if present
    pub async fn new(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if path.exists() {
            Self::load(path).await
        } else {
            Self::create(path).await
        }
    }

    /// Create a new storage file
    async fn create(path: PathBuf) -> Result<Self, StorageError> {
        let store = Self {
            path,
            cache: RwLock::new(StoreCache::default()),
        };

        // Write initial empty menu
        store.save().await?;

        Ok(store)
    }

    /// Load an existing storage file
    async fn load(path: PathBuf) -> Result<Self, StorageError> {
        let content = fs::read_to_string(&path).await?;
        let mut cache: StoreCache = serde_json::from_str(&content)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        cache.rebuild_indexes();

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    /// Reload data from disk (for picking up external changes)
    pub async fn reload(&self) -> Result<(), StorageError> {
        let content = fs::read_to_string(&self.path).await?;
        let mut cache: StoreCache = serde_json::from_str(&content)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        cache.rebuild_indexes();

        *self.cache.write() = cache;

        Ok(())
    }

    /// Save the current state to disk
    async fn save(&self) -> Result<(), StorageError> {
        let content = {
            let cache = self.cache.read();
            serde_json::to_string_pretty(&*cache)
                .map_err(|e| StorageError::Serialization(e.to_string()))?
        };

        // Write atomically by writing to temp file first
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &content).await?;
        fs::rename(&temp_path, &self.path).await?;

        Ok(())
    }
}

#[async_trait]
impl DrinkStore for FileStore {
    async fn list(&self) -> Result<Vec<Drink>, StorageError> {
        let mut drinks: Vec<Drink> = {
            let cache = self.cache.read();
            cache.drinks.values().cloned().collect()
        };
        drinks.sort_by_key(|drink| drink.id);
        Ok(drinks)
    }

    async fn get(&self, id: i64) -> Result<Option<Drink>, StorageError> {
        let cache = self.cache.read();
        Ok(cache.drinks.get(&id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Drink>, StorageError> {
        let cache = self.cache.read();
        if let Some(id) = cache.title_index.get(title) {
            Ok(cache.drinks.get(id).cloned())
        } else {
            Ok(None)
        }
    }

    async fn insert(&self, title: String, recipe: Vec<Ingredient>) -> Result<Drink, StorageError> {
        let drink = {
            let mut cache = self.cache.write();

            if cache.title_index.contains_key(&title) {
                return Err(StorageError::DuplicateTitle(title));
            }

            let id = cache.next_id;
            cache.next_id += 1;

            let drink = Drink { id, title, recipe };
            cache.title_index.insert(drink.title.clone(), id);
            cache.drinks.insert(id, drink.clone());
            drink
        };

        self.save().await?;

        Ok(drink)
    }

    async fn update(&self, drink: &Drink) -> Result<(), StorageError> {
        {
            let mut cache = self.cache.write();

            let old_title = cache
                .drinks
                .get(&drink.id)
                .ok_or(StorageError::NotFound(drink.id))?
                .title
                .clone();

            // Check for duplicate title using index
            if let Some(existing_id) = cache.title_index.get(&drink.title) {
                if *existing_id != drink.id {
                    return Err(StorageError::DuplicateTitle(drink.title.clone()));
                }
            }

            // Update title index if the title changed
            if old_title != drink.title {
                cache.title_index.remove(&old_title);
                cache.title_index.insert(drink.title.clone(), drink.id);
            }

            cache.drinks.insert(drink.id, drink.clone());
        }

        self.save().await
    }

    async fn delete(&self, id: i64) -> Result<(), StorageError> {
        {
            let mut cache = self.cache.write();
            match cache.drinks.remove(&id) {
                Some(drink) => {
                    cache.title_index.remove(&drink.title);
                }
                None => return Err(StorageError::NotFound(id)),
            }
        }

        self.save().await
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Err(StorageError::Unavailable(
                "Storage file does not exist".to_string(),
            ));
        }

        fs::metadata(&self.path).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn espresso_recipe() -> Vec<Ingredient> {
        vec![Ingredient {
            name: "espresso".to_string(),
            color: "#6F4E37".to_string(),
            parts: 1,
        }]
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("menu.json")).await.unwrap();

        let drink = store
            .insert("Espresso".to_string(), espresso_recipe())
            .await
            .unwrap();
        assert_eq!(drink.id, 1);

        let loaded = store.get(drink.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, "Espresso");
        assert_eq!(loaded.recipe.len(), 1);
    }

    #[tokio::test]
    async fn test_ids_are_assigned_in_order() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("menu.json")).await.unwrap();

        let first = store
            .insert("Espresso".to_string(), espresso_recipe())
            .await
            .unwrap();
        let second = store
            .insert("Ristretto".to_string(), espresso_recipe())
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let list = store.list().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, 1);
        assert_eq!(list[1].id, 2);
    }

    #[tokio::test]
    async fn test_duplicate_title_rejected() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("menu.json")).await.unwrap();

        store
            .insert("Espresso".to_string(), espresso_recipe())
            .await
            .unwrap();

        let result = store.insert("Espresso".to_string(), espresso_recipe()).await;
        assert!(matches!(result, Err(StorageError::DuplicateTitle(_))));

        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_title() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("menu.json")).await.unwrap();

        store
            .insert("Espresso".to_string(), espresso_recipe())
            .await
            .unwrap();

        assert!(store.find_by_title("Espresso").await.unwrap().is_some());
        assert!(store.find_by_title("Cortado").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_retitles_and_frees_old_title() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("menu.json")).await.unwrap();

        let mut drink = store
            .insert("Espresso".to_string(), espresso_recipe())
            .await
            .unwrap();

        drink.title = "Doppio".to_string();
        store.update(&drink).await.unwrap();

        assert!(store.find_by_title("Espresso").await.unwrap().is_none());
        assert_eq!(
            store.find_by_title("Doppio").await.unwrap().unwrap().id,
            drink.id
        );

        // Old title is free for a new drink
        store
            .insert("Espresso".to_string(), espresso_recipe())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_to_taken_title_rejected() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("menu.json")).await.unwrap();

        store
            .insert("Espresso".to_string(), espresso_recipe())
            .await
            .unwrap();
        let mut second = store
            .insert("Ristretto".to_string(), espresso_recipe())
            .await
            .unwrap();

        second.title = "Espresso".to_string();
        let result = store.update(&second).await;
        assert!(matches!(result, Err(StorageError::DuplicateTitle(_))));
    }

    #[tokio::test]
    async fn test_update_missing_drink() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("menu.json")).await.unwrap();

        let ghost = Drink {
            id: 42,
            title: "Ghost".to_string(),
            recipe: espresso_recipe(),
        };

        let result = store.update(&ghost).await;
        assert!(matches!(result, Err(StorageError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_delete() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("menu.json")).await.unwrap();

        let drink = store
            .insert("Espresso".to_string(), espresso_recipe())
            .await
            .unwrap();

        store.delete(drink.id).await.unwrap();
        assert!(store.get(drink.id).await.unwrap().is_none());
        assert!(store.find_by_title("Espresso").await.unwrap().is_none());

        // Second delete reports not found
        let result = store.delete(drink.id).await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_persistence_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("menu.json");

        let first_id = {
            let store = FileStore::new(&path).await.unwrap();
            store
                .insert("Espresso".to_string(), espresso_recipe())
                .await
                .unwrap()
                .id
        };

        let store = FileStore::new(&path).await.unwrap();
        let list = store.list().await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, first_id);

        // ID assignment continues past what was persisted
        let next = store
            .insert("Ristretto".to_string(), espresso_recipe())
            .await
            .unwrap();
        assert!(next.id > first_id);
    }

    #[tokio::test]
    async fn test_reload_picks_up_external_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("menu.json");

        let store1 = FileStore::new(&path).await.unwrap();
        let store2 = FileStore::new(&path).await.unwrap();

        store1
            .insert("Espresso".to_string(), espresso_recipe())
            .await
            .unwrap();

        // store2 still has its stale cache
        assert!(store2.list().await.unwrap().is_empty());

        store2.reload().await.unwrap();
        assert_eq!(store2.list().await.unwrap().len(), 1);
        assert!(store2.find_by_title("Espresso").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("menu.json")).await.unwrap();
        assert!(store.health_check().await.is_ok());
    }
}
