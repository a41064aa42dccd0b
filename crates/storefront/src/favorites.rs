//! Favorites (wishlist) store.
//!
//! An ordered, duplicate-free list of products the shopper has hearted,
//! persisted under the `"favorites"` storage key as
//! `{ "favorites": [{ ...product, "addedAt": "<RFC 3339>" }] }`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use polished_core::{Product, ProductId};
use serde::{Deserialize, Serialize};

use crate::storage::{self, Storage};

/// Storage key for the favorites document.
pub const FAVORITES_STORAGE_KEY: &str = "favorites";

/// A favorited product and when it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteItem {
    #[serde(flatten)]
    pub product: Product,
    pub added_at: DateTime<Utc>,
}

/// The favorites list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "StoredFavorites")]
pub struct FavoritesState {
    favorites: Vec<FavoriteItem>,
}

#[derive(Deserialize)]
struct StoredFavorites {
    #[serde(default)]
    favorites: Vec<FavoriteItem>,
}

impl From<StoredFavorites> for FavoritesState {
    fn from(stored: StoredFavorites) -> Self {
        let mut favorites: Vec<FavoriteItem> = Vec::with_capacity(stored.favorites.len());
        for item in stored.favorites {
            if item.product.id.is_empty()
                || favorites.iter().any(|f| f.product.id == item.product.id)
            {
                continue;
            }
            favorites.push(item);
        }
        Self { favorites }
    }
}

impl FavoritesState {
    /// Favorites in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[FavoriteItem] {
        &self.favorites
    }

    /// Whether a product is favorited.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.favorites.iter().any(|f| &f.product.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }
}

/// A favorites state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesAction {
    /// Append a product unless it is already present.
    Add {
        product: Product,
        added_at: DateTime<Utc>,
    },
    Remove(ProductId),
    Clear,
}

/// Apply an action to the favorites list, returning the new state.
#[must_use]
pub fn reduce(state: FavoritesState, action: FavoritesAction) -> FavoritesState {
    match action {
        FavoritesAction::Add { product, added_at } => {
            if product.id.is_empty() || state.contains(&product.id) {
                return state;
            }
            let mut favorites = state.favorites;
            favorites.push(FavoriteItem { product, added_at });
            FavoritesState { favorites }
        }
        FavoritesAction::Remove(id) => {
            let mut favorites = state.favorites;
            favorites.retain(|f| f.product.id != id);
            FavoritesState { favorites }
        }
        FavoritesAction::Clear => FavoritesState::default(),
    }
}

/// The shopper's favorites with persistence.
pub struct FavoritesStore {
    storage: Arc<dyn Storage>,
    state: FavoritesState,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl FavoritesStore {
    /// Open the favorites list, rehydrating it from storage.
    ///
    /// Missing or malformed data yields an empty list.
    #[must_use]
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let state =
            match storage::load_json::<FavoritesState>(storage.as_ref(), FAVORITES_STORAGE_KEY) {
                Ok(Some(state)) => state,
                Ok(None) => FavoritesState::default(),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to load favorites, starting empty");
                    FavoritesState::default()
                }
            };

        Self { storage, state }
    }

    #[must_use]
    pub const fn state(&self) -> &FavoritesState {
        &self.state
    }

    /// Favorites in the order they were added.
    #[must_use]
    pub fn favorites(&self) -> &[FavoriteItem] {
        self.state.items()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Whether a product is favorited.
    #[must_use]
    pub fn is_favorite(&self, id: &ProductId) -> bool {
        self.state.contains(id)
    }

    /// Apply an action and persist the result.
    pub fn dispatch(&mut self, action: FavoritesAction) {
        tracing::debug!(?action, "Favorites action");
        self.state = reduce(std::mem::take(&mut self.state), action);
        self.persist();
    }

    /// Favorite a product, stamped with the current time.
    ///
    /// Already-favorited products keep their original timestamp.
    pub fn add_to_favorites(&mut self, product: &Product) {
        if product.id.is_empty() {
            tracing::warn!(name = %product.name, "Ignoring product without id");
            return;
        }
        self.dispatch(FavoritesAction::Add {
            product: product.clone(),
            added_at: Utc::now(),
        });
    }

    pub fn remove_from_favorites(&mut self, id: &ProductId) {
        self.dispatch(FavoritesAction::Remove(id.clone()));
    }

    pub fn clear_favorites(&mut self) {
        self.dispatch(FavoritesAction::Clear);
    }

    /// Add the product if absent, remove it if present. Returns whether it is
    /// a favorite afterwards.
    pub fn toggle_favorite(&mut self, product: &Product) -> bool {
        if self.is_favorite(&product.id) {
            self.remove_from_favorites(&product.id);
        } else {
            self.add_to_favorites(product);
        }
        self.is_favorite(&product.id)
    }

    /// Write the current state to storage, logging any failure.
    pub fn persist(&self) {
        if let Err(e) =
            storage::save_json(self.storage.as_ref(), FAVORITES_STORAGE_KEY, &self.state)
        {
            tracing::error!(error = %e, "Failed to save favorites");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::Ordering;

    use chrono::TimeZone;
    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::MemoryStorage;
    use crate::storage::tests::FlakyStorage;

    fn product(id: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::new(1899, 2),
            image: format!("https://example.com/{id}.jpg"),
            category: "Polish".to_string(),
            description: Some("Glossy".to_string()),
        }
    }

    fn store() -> (Arc<MemoryStorage>, FavoritesStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = FavoritesStore::open(storage.clone());
        (storage, store)
    }

    #[test]
    fn test_add_then_is_favorite() {
        let (_, mut favorites) = store();
        let a = product("a");

        assert!(!favorites.is_favorite(&a.id));
        favorites.add_to_favorites(&a);
        assert!(favorites.is_favorite(&a.id));
        assert_eq!(favorites.len(), 1);
    }

    #[test]
    fn test_adding_twice_keeps_one_entry_and_first_timestamp() {
        let first = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();

        let state = reduce(
            FavoritesState::default(),
            FavoritesAction::Add {
                product: product("a"),
                added_at: first,
            },
        );
        let state = reduce(
            state,
            FavoritesAction::Add {
                product: product("a"),
                added_at: later,
            },
        );

        assert_eq!(state.len(), 1);
        assert_eq!(state.items()[0].added_at, first);
    }

    #[test]
    fn test_remove_and_clear() {
        let (_, mut favorites) = store();
        favorites.add_to_favorites(&product("a"));
        favorites.add_to_favorites(&product("b"));
        favorites.add_to_favorites(&product("c"));

        favorites.remove_from_favorites(&ProductId::new("b"));
        let ids: Vec<&str> = favorites
            .favorites()
            .iter()
            .map(|f| f.product.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);

        favorites.remove_from_favorites(&ProductId::new("missing"));
        assert_eq!(favorites.len(), 2);

        favorites.clear_favorites();
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_toggle() {
        let (_, mut favorites) = store();
        let a = product("a");

        assert!(favorites.toggle_favorite(&a));
        assert!(favorites.is_favorite(&a.id));
        assert!(!favorites.toggle_favorite(&a));
        assert!(!favorites.is_favorite(&a.id));
    }

    #[test]
    fn test_product_without_id_is_ignored() {
        let (_, mut favorites) = store();
        favorites.add_to_favorites(&product(""));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_persists_and_rehydrates() {
        let (storage, mut favorites) = store();
        favorites.add_to_favorites(&product("a"));
        favorites.add_to_favorites(&product("b"));

        let reopened = FavoritesStore::open(storage.clone());
        assert_eq!(reopened.state(), favorites.state());

        let raw = storage.get_item(FAVORITES_STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["favorites"][0]["id"], "a");
        assert!(value["favorites"][0]["addedAt"].is_string());
    }

    #[test]
    fn test_malformed_storage_falls_back_to_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(FAVORITES_STORAGE_KEY, "[[[").unwrap();
        assert!(FavoritesStore::open(storage.clone()).is_empty());

        storage
            .set_item(FAVORITES_STORAGE_KEY, "{\"favorites\": \"nope\"}")
            .unwrap();
        assert!(FavoritesStore::open(storage).is_empty());
    }

    #[test]
    fn test_rehydration_drops_duplicates() {
        let storage = Arc::new(MemoryStorage::new());
        let stored = r#"{"favorites": [
            {"id":"a","name":"A","price":"1","image":"x","category":"c","addedAt":"2025-01-01T00:00:00Z"},
            {"id":"a","name":"A","price":"1","image":"x","category":"c","addedAt":"2025-03-01T00:00:00Z"}
        ]}"#;
        storage.set_item(FAVORITES_STORAGE_KEY, stored).unwrap();

        let favorites = FavoritesStore::open(storage);
        assert_eq!(favorites.len(), 1);
        assert_eq!(
            favorites.favorites()[0].added_at,
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_write_failure_does_not_abort_action() {
        let storage = Arc::new(FlakyStorage::default());
        storage.fail_writes.store(true, Ordering::SeqCst);

        let mut favorites = FavoritesStore::open(storage);
        favorites.add_to_favorites(&product("a"));
        assert_eq!(favorites.len(), 1);
    }
}
