//! `polished favorites` - manage the saved-for-later list.

use polished_core::ProductId;
use polished_core::format::format_datetime;
use polished_storefront::catalog::Catalog;
use polished_storefront::favorites::FavoritesStore;
use polished_storefront::pricing::format_amount;

use super::{CommandError, find_product, render};

/// Render the favorites list with the date each was added.
#[must_use]
pub fn show(favorites: &FavoritesStore) -> String {
    if favorites.is_empty() {
        return "No favorites yet.\n".to_owned();
    }

    let mut lines: Vec<String> = favorites
        .favorites()
        .iter()
        .map(|item| {
            format!(
                "{:<6} {:<28} {:>10}  added {}",
                item.product.id.as_str(),
                item.product.name,
                format_amount(item.product.price),
                format_datetime(&item.added_at)
            )
        })
        .collect();
    lines.push(String::new());
    lines.push(format!("{} saved", favorites.len()));
    render(&lines)
}

/// Favorite a catalog product. Already-favorited products are unchanged.
///
/// # Errors
///
/// Returns [`CommandError::UnknownProduct`] if no product has `id`.
pub fn add(
    favorites: &mut FavoritesStore,
    catalog: &Catalog,
    id: &str,
) -> Result<String, CommandError> {
    let product = find_product(catalog, id)?;
    favorites.add_to_favorites(product);
    Ok(show(favorites))
}

/// Remove a favorite. Unknown ids are ignored.
pub fn remove(favorites: &mut FavoritesStore, id: &str) -> String {
    favorites.remove_from_favorites(&ProductId::new(id));
    show(favorites)
}

/// Flip a product's favorite status.
///
/// # Errors
///
/// Returns [`CommandError::UnknownProduct`] if no product has `id`.
pub fn toggle(
    favorites: &mut FavoritesStore,
    catalog: &Catalog,
    id: &str,
) -> Result<String, CommandError> {
    let product = find_product(catalog, id)?;
    let verb = if favorites.toggle_favorite(product) {
        "Added"
    } else {
        "Removed"
    };
    Ok(format!("{verb} {}\n", product.name))
}

/// Remove every favorite.
pub fn clear(favorites: &mut FavoritesStore) -> String {
    favorites.clear_favorites();
    show(favorites)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use polished_storefront::storage::MemoryStorage;

    use super::*;

    fn store() -> FavoritesStore {
        FavoritesStore::open(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn test_show_empty() {
        assert_eq!(show(&store()), "No favorites yet.\n");
    }

    #[test]
    fn test_add_twice_keeps_one() {
        let catalog = Catalog::builtin();
        let id = catalog.all().first().unwrap().id.as_str().to_owned();
        let mut favorites = store();

        add(&mut favorites, &catalog, &id).unwrap();
        let out = add(&mut favorites, &catalog, &id).unwrap();

        assert_eq!(favorites.len(), 1);
        assert!(out.ends_with("1 saved\n"));
    }

    #[test]
    fn test_toggle() {
        let catalog = Catalog::builtin();
        let product = catalog.all().first().unwrap();
        let mut favorites = store();

        let out = toggle(&mut favorites, &catalog, product.id.as_str()).unwrap();
        assert_eq!(out, format!("Added {}\n", product.name));

        let out = toggle(&mut favorites, &catalog, product.id.as_str()).unwrap();
        assert_eq!(out, format!("Removed {}\n", product.name));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_unknown_product() {
        let err = toggle(&mut store(), &Catalog::builtin(), "nope").unwrap_err();
        assert!(matches!(err, CommandError::UnknownProduct(_)));
    }

    #[test]
    fn test_remove_and_clear() {
        let catalog = Catalog::builtin();
        let mut favorites = store();
        for product in catalog.all().iter().take(3) {
            favorites.add_to_favorites(product);
        }

        let first = catalog.all().first().unwrap().id.as_str().to_owned();
        remove(&mut favorites, &first);
        assert_eq!(favorites.len(), 2);

        assert_eq!(clear(&mut favorites), "No favorites yet.\n");
    }
}
