use serde::{Serialize, de::DeserializeOwned};
use tracing::instrument;
use uuid::Uuid;

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::entities::{FoodAnalysis, Profile},
    library::{
        entities::{Favorite, HistoryEntry, StoredCollection},
        ports::KeyValueStore,
    },
};

pub const HISTORY_KEY: &str = "foodlenz_history";
pub const FAVORITES_KEY: &str = "foodlenz_favorites";
pub const HISTORY_LIMIT: usize = 20;
pub const STORAGE_FORMAT_VERSION: u32 = 1;

/// History and favorites, cached in memory and mirrored to a key-value store.
///
/// Constructed once at startup and handed to the controller; call [`load`]
/// before use. Every mutation is written through immediately.
///
/// [`load`]: PersistenceStore::load
#[derive(Debug)]
pub struct PersistenceStore<K> {
    kv: K,
    max_favorites: usize,
    history: Vec<HistoryEntry>,
    favorites: Vec<Favorite>,
}

impl<K> PersistenceStore<K>
where
    K: KeyValueStore,
{
    pub fn new(kv: K, max_favorites: usize) -> Self {
        Self {
            kv,
            max_favorites,
            history: Vec::new(),
            favorites: Vec::new(),
        }
    }

    pub async fn load(&mut self) {
        self.history = self.load_history().await;
        self.favorites = self.load_favorites().await;

        tracing::info!(
            history = self.history.len(),
            favorites = self.favorites.len(),
            "Local library loaded"
        );
    }

    /// Persisted history in stored order. Never fails: unreadable data yields an empty list.
    pub async fn load_history(&self) -> Vec<HistoryEntry> {
        match self.read_collection::<HistoryEntry>(HISTORY_KEY).await {
            Ok(mut entries) => {
                entries.truncate(HISTORY_LIMIT);
                entries.iter_mut().for_each(|entry| entry.image = None);
                entries
            }
            Err(e) => {
                tracing::warn!("Discarding stored history: {}", e);
                Vec::new()
            }
        }
    }

    /// Persisted favorites. Never fails: unreadable data yields an empty list.
    pub async fn load_favorites(&self) -> Vec<Favorite> {
        match self.read_collection::<Favorite>(FAVORITES_KEY).await {
            Ok(favorites) => {
                let mut unique: Vec<Favorite> = Vec::with_capacity(favorites.len());
                for favorite in favorites {
                    if !unique.iter().any(|f| f.name() == favorite.name()) {
                        unique.push(favorite);
                    }
                }
                unique
            }
            Err(e) => {
                tracing::warn!("Discarding stored favorites: {}", e);
                Vec::new()
            }
        }
    }

    /// Record a successful analysis and return the full entry, image included.
    ///
    /// The stored copy never carries the image. A failed write is logged and
    /// the in-memory history is still updated.
    #[instrument(skip(self, analysis, image), fields(food_name = %analysis.food_name))]
    pub async fn append_history(
        &mut self,
        analysis: FoodAnalysis,
        profile_snapshot: Profile,
        image: Option<String>,
    ) -> HistoryEntry {
        let entry = HistoryEntry::new(analysis, profile_snapshot, image);

        self.history.insert(0, entry.clone());
        self.history.truncate(HISTORY_LIMIT);

        let stored: Vec<HistoryEntry> = self.history.iter().map(HistoryEntry::without_image).collect();
        if let Err(e) = self.write_collection(HISTORY_KEY, &stored).await {
            tracing::error!("Failed to persist history: {}", e);
        }

        entry
    }

    /// Add or remove the analysis by food name; returns whether it is now a favorite.
    #[instrument(skip(self, analysis, image), fields(food_name = %analysis.food_name))]
    pub async fn toggle_favorite(
        &mut self,
        analysis: &FoodAnalysis,
        image: Option<&str>,
    ) -> Result<bool, CoreError> {
        let name = analysis.food_name.as_str();
        let mut updated = self.favorites.clone();

        let now_favorite = if self.is_favorite(name) {
            updated.retain(|f| f.name() != name);
            false
        } else {
            if updated.len() >= self.max_favorites {
                return Err(CoreError::FavoritesFull {
                    limit: self.max_favorites,
                });
            }
            updated.push(Favorite::new(analysis.clone(), image));
            true
        };

        self.write_collection(FAVORITES_KEY, &updated).await?;
        self.favorites = updated;

        Ok(now_favorite)
    }

    pub fn is_favorite(&self, food_name: &str) -> bool {
        self.favorites.iter().any(|f| f.name() == food_name)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn recent(&self, count: usize) -> &[HistoryEntry] {
        &self.history[..count.min(self.history.len())]
    }

    pub fn history_entry(&self, id: Uuid) -> Option<&HistoryEntry> {
        self.history.iter().find(|entry| entry.id == id)
    }

    pub fn favorites(&self) -> &[Favorite] {
        &self.favorites
    }

    pub fn max_favorites(&self) -> usize {
        self.max_favorites
    }

    async fn read_collection<T>(&self, key: &str) -> Result<Vec<T>, CoreError>
    where
        T: DeserializeOwned,
    {
        let Some(raw) = self.kv.get(key).await? else {
            return Ok(Vec::new());
        };

        let collection: StoredCollection<T> = serde_json::from_str(&raw)
            .map_err(|e| CoreError::StorageRead(format!("{} is corrupted: {}", key, e)))?;

        if collection.version != STORAGE_FORMAT_VERSION {
            return Err(CoreError::StorageRead(format!(
                "{} has unsupported version {}",
                key, collection.version
            )));
        }

        Ok(collection.items)
    }

    async fn write_collection<T>(&self, key: &str, items: &[T]) -> Result<(), CoreError>
    where
        T: Serialize + Clone,
    {
        let collection = StoredCollection {
            version: STORAGE_FORMAT_VERSION,
            items: items.to_vec(),
        };
        let raw = serde_json::to_string(&collection)
            .map_err(|e| CoreError::StorageWrite(format!("Failed to encode {}: {}", key, e)))?;

        self.kv.set(key, raw).await
    }
}
