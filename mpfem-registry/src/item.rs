use std::any::type_name;
use std::fmt;
use std::hash::BuildHasherDefault;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHasher;

use crate::error::{RegistryError, StateViolation};
use crate::json::write_json;
use crate::value::{RegistryValue, RegistryValueItem, ValueSlot};
use crate::DEFAULT_INDENTATION;

pub(crate) type ItemMap = IndexMap<String, Arc<RegistryItem>, BuildHasherDefault<FxHasher>>;

/// What an item currently holds. The three states are mutually exclusive.
pub(crate) enum Contents {
    Empty,
    Value(Box<dyn ValueSlot>),
    // Never empty: removing the last child turns the item back into `Empty`
    Items(ItemMap),
}

/// A named node in the registry tree.
///
/// An item is either empty, holds a single typed value, or holds named children in insertion
/// order. Children are handed out as [`Arc`] handles. Removing a child detaches it from the tree;
/// outstanding handles keep the detached subtree alive but it is no longer reachable by name.
///
/// All methods take `&self`: every item guards its contents with its own lock, so different
/// parts of the tree can be modified from different threads at the same time.
pub struct RegistryItem {
    name: String,
    contents: RwLock<Contents>,
}

impl RegistryItem {
    /// Creates an empty item.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: RwLock::new(Contents::Empty),
        }
    }

    /// Creates an item holding `value`.
    pub fn with_value<T: RegistryValue>(name: impl Into<String>, value: T) -> Self {
        Self::with_value_item(name, RegistryValueItem::new(value))
    }

    /// Creates an item holding the given (possibly empty) typed slot.
    pub fn with_value_item<T: RegistryValue>(name: impl Into<String>, slot: RegistryValueItem<T>) -> Self {
        Self {
            name: name.into(),
            contents: RwLock::new(Contents::Value(Box::new(slot))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn info(&self) -> String {
        format!("{} RegistryItem", self.name)
    }

    pub fn has_value(&self) -> bool {
        match &*self.contents.read() {
            Contents::Value(slot) => slot.has_value(),
            _ => false,
        }
    }

    pub fn has_items(&self) -> bool {
        matches!(&*self.contents.read(), Contents::Items(_))
    }

    /// Whether this item has a direct child called `name`.
    pub fn has_item(&self, name: &str) -> bool {
        match &*self.contents.read() {
            Contents::Items(items) => items.contains_key(name),
            _ => false,
        }
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        match &*self.contents.read() {
            Contents::Items(items) => items.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(&*self.contents.read(), Contents::Empty)
    }

    /// Names of the direct children, in insertion order.
    pub fn item_names(&self) -> Vec<String> {
        match &*self.contents.read() {
            Contents::Items(items) => items.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Handles to the direct children, in insertion order.
    pub fn items(&self) -> Vec<Arc<RegistryItem>> {
        match &*self.contents.read() {
            Contents::Items(items) => items.values().cloned().collect(),
            _ => Vec::new(),
        }
    }

    pub fn get_item(&self, name: &str) -> Result<Arc<RegistryItem>, RegistryError> {
        self.find_item(name)
            .ok_or_else(|| RegistryError::not_found(name))
    }

    pub(crate) fn find_item(&self, name: &str) -> Option<Arc<RegistryItem>> {
        match &*self.contents.read() {
            Contents::Items(items) => items.get(name).cloned(),
            _ => None,
        }
    }

    /// Adds an empty child called `name`.
    pub fn add_item(&self, name: &str) -> Result<Arc<RegistryItem>, RegistryError> {
        self.insert_item(RegistryItem::new(name))
    }

    /// Adds a child called `name` holding `value`.
    pub fn add_value_item<T: RegistryValue>(&self, name: &str, value: T) -> Result<Arc<RegistryItem>, RegistryError> {
        self.insert_item(RegistryItem::with_value(name, value))
    }

    /// Adds a pre-built item as a child, keyed by the item's own name.
    pub fn insert_item(&self, item: RegistryItem) -> Result<Arc<RegistryItem>, RegistryError> {
        let mut contents = self.contents.write();
        match &mut *contents {
            Contents::Value(_) => Err(RegistryError::invalid_state(item.name, StateViolation::ChildOfValue)),
            Contents::Items(items) => {
                if items.contains_key(&item.name) {
                    return Err(RegistryError::conflict(item.name));
                }
                let item = Arc::new(item);
                items.insert(item.name.clone(), Arc::clone(&item));
                Ok(item)
            }
            Contents::Empty => {
                let item = Arc::new(item);
                let mut items = ItemMap::default();
                items.insert(item.name.clone(), Arc::clone(&item));
                *contents = Contents::Items(items);
                Ok(item)
            }
        }
    }

    /// Returns the child called `name`, adding an empty child first if there is none.
    pub(crate) fn get_or_add_item(&self, name: &str) -> Result<(Arc<RegistryItem>, bool), RegistryError> {
        if let Some(item) = self.find_item(name) {
            return Ok((item, false));
        }

        // Another thread may have added the child between the two lock acquisitions
        let mut contents = self.contents.write();
        match &mut *contents {
            Contents::Value(_) => Err(RegistryError::invalid_state(name, StateViolation::ChildOfValue)),
            Contents::Items(items) => {
                if let Some(item) = items.get(name) {
                    Ok((Arc::clone(item), false))
                } else {
                    let item = Arc::new(RegistryItem::new(name));
                    items.insert(name.to_string(), Arc::clone(&item));
                    Ok((item, true))
                }
            }
            Contents::Empty => {
                let item = Arc::new(RegistryItem::new(name));
                let mut items = ItemMap::default();
                items.insert(name.to_string(), Arc::clone(&item));
                *contents = Contents::Items(items);
                Ok((item, true))
            }
        }
    }

    /// Detaches the child called `name` and returns it.
    pub fn remove_item(&self, name: &str) -> Result<Arc<RegistryItem>, RegistryError> {
        let mut contents = self.contents.write();
        let (removed, now_empty) = match &mut *contents {
            Contents::Items(items) => {
                let removed = items
                    .shift_remove(name)
                    .ok_or_else(|| RegistryError::not_found(name))?;
                (removed, items.is_empty())
            }
            _ => return Err(RegistryError::not_found(name)),
        };
        if now_empty {
            *contents = Contents::Empty;
        }
        Ok(removed)
    }

    /// The string form of the stored value, if any.
    pub fn value_string(&self) -> Option<String> {
        match &*self.contents.read() {
            Contents::Value(slot) => slot.value_string(),
            _ => None,
        }
    }

    /// Calls `f` with a reference to the stored value.
    ///
    /// The item is read-locked while `f` runs, so `f` must not modify this item.
    pub fn inspect_value<T, R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, RegistryError>
    where
        T: RegistryValue,
    {
        match &*self.contents.read() {
            Contents::Value(slot) => {
                let typed = slot.downcast_ref::<T>().ok_or_else(|| {
                    let violation = StateViolation::ValueTypeMismatch {
                        expected: slot.value_type_name(),
                        found: type_name::<T>(),
                    };
                    RegistryError::invalid_state(self.name.as_str(), violation)
                })?;
                let value = typed
                    .value()
                    .ok_or_else(|| RegistryError::invalid_state(self.name.as_str(), StateViolation::EmptyValue))?;
                Ok(f(value))
            }
            _ => Err(RegistryError::invalid_state(self.name.as_str(), StateViolation::EmptyValue)),
        }
    }

    /// Returns a copy of the stored value.
    pub fn get_value<T>(&self) -> Result<T, RegistryError>
    where
        T: RegistryValue + Clone,
    {
        self.inspect_value(T::clone)
    }

    /// Stores a value in this item.
    ///
    /// An empty item becomes a value item of type `T`. A value item must already be of type
    /// `T`; its previous value is replaced. Items with children cannot hold values.
    pub fn set_value<T: RegistryValue>(&self, value: T) -> Result<(), RegistryError> {
        let mut contents = self.contents.write();
        match &mut *contents {
            Contents::Empty => {
                *contents = Contents::Value(Box::new(RegistryValueItem::new(value)));
                Ok(())
            }
            Contents::Value(slot) => {
                let expected = slot.value_type_name();
                let typed = slot.downcast_mut::<T>().ok_or_else(|| {
                    let violation = StateViolation::ValueTypeMismatch {
                        expected,
                        found: type_name::<T>(),
                    };
                    RegistryError::invalid_state(self.name.as_str(), violation)
                })?;
                typed.set(value);
                Ok(())
            }
            Contents::Items(_) => Err(RegistryError::invalid_state(
                self.name.as_str(),
                StateViolation::ValueOfContainer,
            )),
        }
    }

    /// Renders this item and its subtree in the JSON-like registry format.
    pub fn to_json(&self, indentation: &str) -> String {
        let mut output = String::new();
        write_json(self, &mut output, indentation, 0);
        output
    }

    pub(crate) fn contents(&self) -> parking_lot::RwLockReadGuard<'_, Contents> {
        self.contents.read()
    }
}

impl fmt::Debug for RegistryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("RegistryItem");
        debug.field("name", &self.name);
        match &*self.contents.read() {
            Contents::Empty => debug.finish(),
            Contents::Value(slot) => debug
                .field("type", &slot.value_type_name())
                .field("value", &slot.value_string())
                .finish(),
            Contents::Items(items) => debug.field("items", &items.values().collect::<Vec<_>>()).finish(),
        }
    }
}

impl fmt::Display for RegistryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json(DEFAULT_INDENTATION))
    }
}
