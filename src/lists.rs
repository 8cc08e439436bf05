//! The shared shopping and household task lists.
//!
//! Both are flat lists of items grouped by category name. Completing an item
//! removes it, the same as deleting it.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::board::fresh_id;
use crate::error::{BoardError, Result};
use crate::models::{Category, HouseholdItem, ShoppingItem, Urgency};
use crate::storage::{keys, load_json, load_json_list, save_json, Store};

/// An item kind that can live in a [`SharedList`].
pub trait ListEntry: Serialize + DeserializeOwned + Clone {
    const KEY: &'static str;
    const CATEGORIES_KEY: &'static str;

    fn default_categories() -> Vec<Category>;
    fn id(&self) -> u64;
    fn category(&self) -> &str;
}

impl ListEntry for ShoppingItem {
    const KEY: &'static str = keys::SHOPPING_LIST;
    const CATEGORIES_KEY: &'static str = keys::SHOPPING_CATEGORIES;

    fn default_categories() -> Vec<Category> {
        vec![
            Category::new("Online", "💻"),
            Category::new("Baumarkt", "🔨"),
            Category::new("DM", "💊"),
            Category::new("Books", "📚"),
        ]
    }

    fn id(&self) -> u64 {
        self.id
    }

    fn category(&self) -> &str {
        &self.category
    }
}

impl ListEntry for HouseholdItem {
    const KEY: &'static str = keys::TASKS_LIST;
    const CATEGORIES_KEY: &'static str = keys::TASKS_CATEGORIES;

    fn default_categories() -> Vec<Category> {
        vec![
            Category::new("Werkstatt", "🔧"),
            Category::new("Auto", "🚗"),
            Category::new("Haus", "🏠"),
            Category::new("Garten", "🌿"),
        ]
    }

    fn id(&self) -> u64 {
        self.id
    }

    fn category(&self) -> &str {
        &self.category
    }
}

pub struct SharedList<T: ListEntry, S: Store> {
    store: S,
    items: Vec<T>,
    categories: Vec<Category>,
}

pub type ShoppingList<S> = SharedList<ShoppingItem, S>;
pub type HouseholdList<S> = SharedList<HouseholdItem, S>;

impl<T: ListEntry, S: Store> SharedList<T, S> {
    /// Loads the list. Missing categories are seeded with the defaults.
    pub fn load(mut store: S) -> Result<Self> {
        let items: Vec<T> = load_json_list(&store, T::KEY);
        let mut categories: Vec<Category> = load_json(&store, T::CATEGORIES_KEY);
        if categories.is_empty() {
            categories = T::default_categories();
            save_json(&mut store, T::CATEGORIES_KEY, &categories)?;
        }
        Ok(SharedList { store, items, categories })
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a T> + 'a {
        self.items.iter().filter(move |i| i.category() == category)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn delete(&mut self, id: u64) -> Result<()> {
        let len_before = self.items.len();
        self.items.retain(|i| i.id() != id);
        if self.items.len() == len_before {
            return Err(BoardError::NotFound { kind: "item", id });
        }
        self.save()?;
        tracing::debug!(list = T::KEY, id, "item removed");
        Ok(())
    }

    pub fn complete(&mut self, id: u64) -> Result<()> {
        self.delete(id)
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn save(&mut self) -> Result<()> {
        save_json(&mut self.store, T::KEY, &self.items)
    }

    fn check_input(category: &str, text: &str) -> Result<()> {
        if category.trim().is_empty() || text.trim().is_empty() {
            return Err(BoardError::EmptyText);
        }
        Ok(())
    }

    fn next_id(&self) -> u64 {
        fresh_id(self.items.iter().map(|i| i.id()))
    }
}

impl<S: Store> SharedList<ShoppingItem, S> {
    pub fn add(&mut self, category: &str, text: &str, urgency: Urgency) -> Result<u64> {
        Self::check_input(category, text)?;
        let id = self.next_id();
        self.items.push(ShoppingItem {
            id,
            category: category.to_string(),
            text: text.to_string(),
            urgency,
            completed: false,
            created_at: Utc::now().to_rfc3339(),
        });
        self.save()?;
        tracing::debug!(list = keys::SHOPPING_LIST, id, "item added");
        Ok(id)
    }

    pub fn urgent_count(&self) -> usize {
        self.items.iter().filter(|i| i.urgency == Urgency::Urgent).count()
    }

    pub fn normal_count(&self) -> usize {
        self.items.iter().filter(|i| i.urgency == Urgency::Normal).count()
    }
}

impl<S: Store> SharedList<HouseholdItem, S> {
    pub fn add(&mut self, category: &str, text: &str) -> Result<u64> {
        Self::check_input(category, text)?;
        let id = self.next_id();
        self.items.push(HouseholdItem {
            id,
            category: category.to_string(),
            text: text.trim().to_string(),
            completed: false,
            created_at: Utc::now().to_rfc3339(),
        });
        self.save()?;
        tracing::debug!(list = keys::TASKS_LIST, id, "item added");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn seeds_default_categories() {
        let mut store = MemoryStore::new();
        let list = ShoppingList::load(&mut store).unwrap();
        assert_eq!(list.categories().len(), 4);
        assert_eq!(list.categories()[1].name, "Baumarkt");
        assert!(list.into_store().get(keys::SHOPPING_CATEGORIES).is_some());
    }

    #[test]
    fn shopping_counts_by_urgency() {
        let mut store = MemoryStore::new();
        let mut list = ShoppingList::load(&mut store).unwrap();
        let toothpaste = list.add("DM", "Toothpaste", Urgency::Urgent).unwrap();
        list.add("Books", "Atlas", Urgency::Normal).unwrap();
        list.add("Online", "Cable", Urgency::Normal).unwrap();
        assert_eq!(list.urgent_count(), 1);
        assert_eq!(list.normal_count(), 2);

        list.complete(toothpaste).unwrap();
        assert_eq!(list.urgent_count(), 0);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn household_list_rejects_empty_text() {
        let mut store = MemoryStore::new();
        let mut list = HouseholdList::load(&mut store).unwrap();
        assert!(matches!(list.add("Haus", "   "), Err(BoardError::EmptyText)));
        assert!(list.is_empty());
        assert!(matches!(list.delete(42), Err(BoardError::NotFound { .. })));
    }
}
