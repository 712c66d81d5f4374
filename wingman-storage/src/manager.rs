//! Keyed in-memory registry for one entity type.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use wingman_core::{Item, ItemLookup, StorageError};

/// Ordered registry of items keyed by [`Item::id`].
///
/// Items are stored as `Arc<T>` and updated copy-on-write, so an item handed
/// out by [`ItemManager::get`] or a resolver is a consistent snapshot that
/// later updates never change underneath its holder.
#[derive(Debug)]
pub struct ItemManager<T> {
    items: RwLock<Vec<Arc<T>>>,
}

impl<T> Default for ItemManager<T> {
    fn default() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }
}

impl<T> ItemManager<T>
where
    T: Item + Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    // Poisoning is recovered, never propagated.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Arc<T>>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Arc<T>>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn not_found(id: &str) -> StorageError {
        StorageError::NotFound {
            entity_type: T::ENTITY_TYPE,
            id: id.to_string(),
        }
    }

    /// Add a new item.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InsertFailed`] if an item with the same id is
    /// already registered.
    pub fn insert(&self, item: T) -> Result<Arc<T>, StorageError> {
        let mut items = self.write();
        if items.iter().any(|existing| existing.id() == item.id()) {
            return Err(StorageError::InsertFailed {
                entity_type: T::ENTITY_TYPE,
                id: item.id().to_string(),
                reason: "already exists".to_string(),
            });
        }
        let item = Arc::new(item);
        items.push(Arc::clone(&item));
        Ok(item)
    }

    pub fn get(&self, id: &str) -> Option<Arc<T>> {
        self.read().iter().find(|item| item.id() == id).cloned()
    }

    /// Like [`ItemManager::get`], but a missing id is an error.
    pub fn require(&self, id: &str) -> Result<Arc<T>, StorageError> {
        self.get(id).ok_or_else(|| Self::not_found(id))
    }

    /// Mutate the item with `id` in place and return what `f` returns.
    ///
    /// `f` must not change the item's id.
    pub fn update<U>(&self, id: &str, f: impl FnOnce(&mut T) -> U) -> Result<U, StorageError> {
        let mut items = self.write();
        let slot = items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| Self::not_found(id))?;
        Ok(f(Arc::make_mut(slot)))
    }

    pub fn remove(&self, id: &str) -> Result<Arc<T>, StorageError> {
        let mut items = self.write();
        let position = items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| Self::not_found(id))?;
        Ok(items.remove(position))
    }

    /// Ids of every registered item, in registration order.
    pub fn ids(&self) -> Vec<String> {
        self.read().iter().map(|item| item.id().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn clear(&self) {
        self.write().clear();
    }
}

impl<T> ItemLookup<T> for ItemManager<T>
where
    T: Item + Clone + Send + Sync + 'static,
{
    fn lookup(&self, id: &str) -> Option<Arc<T>> {
        self.get(id)
    }

    fn items(&self) -> Vec<Arc<T>> {
        self.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wingman_core::{Assignable, EntityType, Pilot};

    fn pilot(id: &str) -> Pilot {
        Pilot {
            id: id.to_string(),
            name: format!("Pilot {id}"),
            available: true,
        }
    }

    #[test]
    fn test_insert_get() {
        let manager = ItemManager::new();
        manager.insert(pilot("p1")).unwrap();
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.get("p1").unwrap().name, "Pilot p1");
        assert!(manager.get("p2").is_none());
        assert!(manager.contains("p1"));
    }

    #[test]
    fn test_insert_duplicate() {
        let manager = ItemManager::new();
        manager.insert(pilot("p1")).unwrap();
        let err = manager.insert(pilot("p1")).unwrap_err();
        assert!(matches!(
            err,
            StorageError::InsertFailed { entity_type: EntityType::Pilot, .. }
        ));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_update_is_copy_on_write() {
        let manager = ItemManager::new();
        manager.insert(pilot("p1")).unwrap();
        let before = manager.require("p1").unwrap();

        manager.update("p1", |p| p.set_available(false)).unwrap();

        assert!(before.is_available());
        assert!(!manager.require("p1").unwrap().is_available());
    }

    #[test]
    fn test_update_missing() {
        let manager: ItemManager<Pilot> = ItemManager::new();
        assert_eq!(
            manager.update("ghost", |_| ()),
            Err(StorageError::NotFound {
                entity_type: EntityType::Pilot,
                id: "ghost".to_string(),
            })
        );
    }

    #[test]
    fn test_remove_keeps_order() {
        let manager = ItemManager::new();
        for id in ["a", "b", "c"] {
            manager.insert(pilot(id)).unwrap();
        }
        manager.remove("b").unwrap();
        assert_eq!(manager.ids(), vec!["a", "c"]);
        assert!(manager.remove("b").is_err());
        manager.clear();
        assert!(manager.is_empty());
    }

    #[test]
    fn test_lookup_items_in_order() {
        let manager = ItemManager::new();
        manager.insert(pilot("x")).unwrap();
        manager.insert(pilot("y")).unwrap();
        let items = ItemLookup::items(&manager);
        let ids: Vec<&str> = items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y"]);
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use wingman_core::Crew;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Inserts and removals keep registration order and reject duplicates.
        #[test]
        fn prop_registry_matches_ordered_model(
            ops in prop::collection::vec((any::<bool>(), 0u8..12), 0..60)
        ) {
            let manager = ItemManager::new();
            let mut expected: Vec<String> = Vec::new();
            for (insert, n) in ops {
                let id = format!("c{n}");
                if insert {
                    let result = manager.insert(Crew {
                        id: id.clone(),
                        name: id.clone(),
                        available: true,
                    });
                    prop_assert_eq!(result.is_ok(), !expected.contains(&id));
                    if !expected.contains(&id) {
                        expected.push(id);
                    }
                } else {
                    let result = manager.remove(&id);
                    prop_assert_eq!(result.is_ok(), expected.contains(&id));
                    expected.retain(|e| e != &id);
                }
            }
            prop_assert_eq!(manager.ids(), expected);
        }
    }
}
