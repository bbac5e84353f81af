use std::any::{type_name, Any};
use std::fmt;

use crate::item::RegistryItem;

/// A value that can be stored in a [`RegistryItem`].
///
/// The only capability a stored value needs is a canonical string form, which is what the
/// JSON-like rendering of the registry prints.
pub trait RegistryValue: Any + Send + Sync {
    fn to_value_string(&self) -> String;
}

macro_rules! impl_registry_value_via_display {
    ($($ty:ty),*) => {
        $(
            impl RegistryValue for $ty {
                fn to_value_string(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

// Floating point numbers use the shortest representation that round-trips, so 3.14 is "3.14"
impl_registry_value_via_display!(f32, f64);
impl_registry_value_via_display!(i8, i16, i32, i64, i128, isize);
impl_registry_value_via_display!(u8, u16, u32, u64, u128, usize);
impl_registry_value_via_display!(bool, char, String, &'static str);

impl<T: RegistryValue> RegistryValue for Vec<T> {
    fn to_value_string(&self) -> String {
        let entries: Vec<_> = self.iter().map(RegistryValue::to_value_string).collect();
        format!("[{}]", entries.join(", "))
    }
}

/// A typed value slot.
///
/// The slot may be empty, which is used for entries whose value is configured after they have
/// been registered. Once an item holds a slot of type `T`, only values of type `T` can be
/// stored in it.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistryValueItem<T> {
    value: Option<T>,
}

impl<T: RegistryValue> RegistryValueItem<T> {
    pub fn new(value: T) -> Self {
        Self { value: Some(value) }
    }

    pub fn empty() -> Self {
        Self { value: None }
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Stores a value, returning the previous one.
    pub fn set(&mut self, value: T) -> Option<T> {
        self.value.replace(value)
    }

    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }

    /// Wraps the slot in a new item with the given name.
    pub fn into_item(self, name: impl Into<String>) -> RegistryItem {
        RegistryItem::with_value_item(name, self)
    }
}

impl<T: RegistryValue> Default for RegistryValueItem<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: RegistryValue> fmt::Debug for RegistryValueItem<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.value.as_ref().map(RegistryValue::to_value_string);
        f.debug_struct("RegistryValueItem")
            .field("type", &type_name::<T>())
            .field("value", &value)
            .finish()
    }
}

/// Object-safe view of a [`RegistryValueItem`] of unknown type.
pub(crate) trait ValueSlot: Send + Sync {
    fn has_value(&self) -> bool;
    fn value_string(&self) -> Option<String>;
    fn value_type_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: RegistryValue> ValueSlot for RegistryValueItem<T> {
    fn has_value(&self) -> bool {
        self.value.is_some()
    }

    fn value_string(&self) -> Option<String> {
        self.value.as_ref().map(RegistryValue::to_value_string)
    }

    fn value_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl dyn ValueSlot {
    pub(crate) fn downcast_ref<T: RegistryValue>(&self) -> Option<&RegistryValueItem<T>> {
        self.as_any().downcast_ref()
    }

    pub(crate) fn downcast_mut<T: RegistryValue>(&mut self) -> Option<&mut RegistryValueItem<T>> {
        self.as_any_mut().downcast_mut()
    }
}
